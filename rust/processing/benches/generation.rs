// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmark comparing cold and cache-satisfied node generation.
//!
//! A synthetic storey holds a grid of walls. Each scenario generates the
//! storey node once through the engine (cold) and once from the geometry
//! cache (warm), in both solid and mesh mode.
//!
//! Run with: cargo bench -p nativeifc-processing --bench generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nativeifc_core::{Element, ElementId, IfcModel, IfcType, RelationKind, Representation, RepresentationContext};
use nativeifc_geometry::{GeneratorConfig, JsonBrepKernel, MemoryEngine, Shape, SourceGeometry};
use nativeifc_processing::{Document, Generator, ModelNode, NodeId, RepresentationMode};
use std::sync::Arc;

const STOREY: u32 = 1;
const BODY: u32 = 11;

/// Storey with `count` walls laid out on a 10 m grid
fn storey_with_walls(count: u32) -> (Arc<IfcModel>, MemoryEngine) {
    let mut model = IfcModel::new();
    model.add_context(RepresentationContext::model(10, "Model"));
    model.add_context(RepresentationContext::sub(BODY, 10, "Body"));
    model.add_element(Element::new(STOREY, IfcType::IfcBuildingStorey)).unwrap();

    let mut geometry = Vec::with_capacity(count as usize);
    for i in 0..count {
        let id = model
            .add_element(Element::new(100 + i, IfcType::IfcWall).with_representation(Representation::in_context(BODY, "Body")))
            .unwrap();
        model.relate(RelationKind::Contains, ElementId(STOREY), id).unwrap();
        let x = f64::from(i % 10) * 10.0;
        let y = f64::from(i / 10) * 10.0;
        geometry.push((
            id,
            SourceGeometry::new(Shape::make_box(5.0, 0.3, 3.0))
                .at(x, y, 0.0)
                .with_style([0.6, 0.6, 0.55]),
        ));
    }

    let mut engine = MemoryEngine::new(Arc::new(JsonBrepKernel));
    for (id, g) in geometry {
        engine.insert(model.id(), id, g);
    }
    (Arc::new(model), engine)
}

fn setup(count: u32, mode: RepresentationMode) -> (Generator, Document, NodeId) {
    let (file, engine) = storey_with_walls(count);
    let mut generator = Generator::new(Arc::new(engine), Arc::new(JsonBrepKernel), GeneratorConfig::from_env());
    generator.register_file(&file);
    let mut doc = Document::with_scene();
    let node = doc.add_node(ModelNode::new(file, Some(ElementId(STOREY)), mode));
    (generator, doc, node)
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    let scenarios = [
        // (walls, mode, name)
        (10, RepresentationMode::Solid, "10_walls_solid"),
        (100, RepresentationMode::Solid, "100_walls_solid"),
        (10, RepresentationMode::Mesh, "10_walls_mesh"),
        (100, RepresentationMode::Mesh, "100_walls_mesh"),
    ];

    for (count, mode, name) in scenarios {
        group.throughput(Throughput::Elements(u64::from(count)));

        let (mut generator, mut doc, node) = setup(count, mode);
        group.bench_function(BenchmarkId::new("cold", name), |b| {
            b.iter(|| generator.generate(&mut doc, black_box(node), false).unwrap())
        });

        let (mut generator, mut doc, node) = setup(count, mode);
        generator.generate(&mut doc, node, false).unwrap();
        group.bench_function(BenchmarkId::new("warm", name), |b| {
            b.iter(|| generator.generate(&mut doc, black_box(node), true).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
