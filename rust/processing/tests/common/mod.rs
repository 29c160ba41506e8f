// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixture: a small storey with every element category
//!
//! ```text
//! project #1
//! └── building #2
//!     └── storey #3
//!         ├── wall #10 ── opening #13
//!         ├── wall #11
//!         ├── slab #12
//!         ├── furniture #15
//!         ├── annotation #16
//!         ├── assembly #20 ── member #21, member #22
//!         ├── beam #30 (representation, but no engine geometry)
//!         └── space #14
//! ```

#![allow(dead_code)]

use nativeifc_core::{Element, ElementId, IfcModel, IfcType, RelationKind, Representation, RepresentationContext};
use nativeifc_geometry::{GeneratorConfig, JsonBrepKernel, MemoryEngine, Shape, SourceGeometry};
use nativeifc_processing::{Document, Generator, ModelNode, NodeId, RepresentationMode};
use std::sync::{Arc, Once};

pub const BODY: u32 = 11;

/// Elements the storey draws itself, in resolution order
pub const STOREY_ELEMENTS: [u32; 7] = [10, 11, 12, 20, 21, 22, 30];

/// Elements with engine geometry among [`STOREY_ELEMENTS`]
pub const STOREY_SOLIDS: usize = 5;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
            .with_test_writer()
            .try_init();
    });
}

pub fn ids(raw: &[u32]) -> Vec<ElementId> {
    raw.iter().map(|&i| ElementId(i)).collect()
}

pub struct Fixture {
    pub file: Arc<IfcModel>,
    pub engine: Arc<MemoryEngine>,
    pub generator: Generator,
    pub doc: Document,
}

impl Fixture {
    /// Fixture with an interactive document
    pub fn new() -> Self {
        Self::build(true)
    }

    pub fn headless() -> Self {
        Self::build(false)
    }

    fn build(scene: bool) -> Self {
        init_tracing();

        let file = Arc::new(model());
        let mut engine = MemoryEngine::new(Arc::new(JsonBrepKernel));
        let placed = [10, 11, 12, 13, 14, 15, 16, 21, 22];
        for (i, id) in placed.into_iter().enumerate() {
            let geometry = SourceGeometry::new(Shape::make_box(1.0, 1.0, 1.0))
                .at(i as f64 + 1.0, 0.0, 0.0)
                .with_style([(id % 10) as f64 / 10.0, 0.5, 0.5]);
            engine.insert(file.id(), ElementId(id), geometry);
        }
        let engine = Arc::new(engine);

        let config = GeneratorConfig {
            scale: 1000.0,
            worker_threads: 2,
            ..GeneratorConfig::from_env()
        };
        let mut generator = Generator::new(engine.clone(), Arc::new(JsonBrepKernel), config);
        generator.register_file(&file);

        let doc = if scene { Document::with_scene() } else { Document::new() };
        Self {
            file,
            engine,
            generator,
            doc,
        }
    }

    /// Project, building and storey nodes; only the storey asks for `mode`
    pub fn storey(&mut self, mode: RepresentationMode) -> (NodeId, NodeId) {
        let project = self
            .doc
            .add_node(ModelNode::root(self.file.clone(), ElementId(1), RepresentationMode::None));
        let building = self
            .doc
            .add_child(project, self.node(2, RepresentationMode::None))
            .unwrap();
        let storey = self.doc.add_child(building, self.node(3, mode)).unwrap();
        (project, storey)
    }

    pub fn node(&self, id: u32, mode: RepresentationMode) -> ModelNode {
        ModelNode::new(self.file.clone(), Some(ElementId(id)), mode)
    }
}

fn model() -> IfcModel {
    let mut m = IfcModel::new();
    m.add_context(RepresentationContext::model(10, "Model"));
    m.add_context(RepresentationContext::sub(BODY, 10, "Body"));

    let body = || Representation::in_context(BODY, "Body");
    let elements = [
        Element::new(1, IfcType::IfcProject),
        Element::new(2, IfcType::IfcBuilding),
        Element::new(3, IfcType::IfcBuildingStorey).with_name("Level 1"),
        Element::new(10, IfcType::IfcWall).with_name("W-10").with_representation(body()),
        Element::new(11, IfcType::IfcWall).with_representation(body()),
        Element::new(12, IfcType::IfcSlab).with_representation(body()),
        Element::new(13, IfcType::IfcOpeningElement).with_representation(body()),
        Element::new(14, IfcType::IfcSpace).with_representation(body()),
        Element::new(15, IfcType::IfcFurniture).with_representation(body()),
        Element::new(16, IfcType::IfcAnnotation).with_representation(body()),
        Element::new(20, IfcType::IfcElementAssembly),
        Element::new(21, IfcType::IfcMember).with_representation(body()),
        Element::new(22, IfcType::IfcMember).with_representation(body()),
        Element::new(30, IfcType::IfcBeam).with_name("B-30").with_representation(body()),
    ];
    for element in elements {
        m.add_element(element).unwrap();
    }

    let relations = [
        (RelationKind::Aggregates, 1, 2),
        (RelationKind::Aggregates, 2, 3),
        (RelationKind::Contains, 3, 10),
        (RelationKind::Contains, 3, 11),
        (RelationKind::Contains, 3, 12),
        (RelationKind::Contains, 3, 15),
        (RelationKind::Contains, 3, 16),
        (RelationKind::Contains, 3, 20),
        (RelationKind::Contains, 3, 30),
        (RelationKind::Aggregates, 3, 14),
        (RelationKind::Voids, 10, 13),
        (RelationKind::Aggregates, 20, 21),
        (RelationKind::Aggregates, 20, 22),
    ];
    for (kind, parent, child) in relations {
        m.relate(kind, ElementId(parent), ElementId(child)).unwrap();
    }
    m
}
