// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape assembler: brep results to one solid with per-face colors

use super::store;
use crate::cache::CacheRegistry;
use crate::color::{surface_style_colors, Color};
use crate::config::GeneratorConfig;
use crate::engine::GeometryEngine;
use crate::iterator::{ExtractionMode, GeometryIterator, ItemGeometry};
use crate::kernel::BrepKernel;
use crate::placement::Placement;
use crate::progress::{generating_label, ProgressSink};
use crate::{Result, Shape};
use nativeifc_core::{ElementId, IfcModel};

/// Merged solid of a set of elements
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledShape {
    pub shape: Shape,
    /// One color per face, in face order of `shape`
    pub colors: Vec<Color>,
}

pub struct ShapeAssembler<'a> {
    engine: &'a dyn GeometryEngine,
    kernel: &'a dyn BrepKernel,
    config: &'a GeneratorConfig,
}

impl<'a> ShapeAssembler<'a> {
    pub fn new(engine: &'a dyn GeometryEngine, kernel: &'a dyn BrepKernel, config: &'a GeneratorConfig) -> Self {
        Self { engine, kernel, config }
    }

    /// Build the solid of `elements`
    ///
    /// With `use_cache`, cached solids are reused and only the others go
    /// through the engine. Results are merged into one shape: the solid
    /// itself when there is exactly one, a compound otherwise.
    pub fn assemble(
        &self,
        file: &IfcModel,
        elements: &[ElementId],
        use_cache: bool,
        caches: &mut CacheRegistry,
        progress: &mut dyn ProgressSink,
    ) -> Option<AssembledShape> {
        if elements.is_empty() {
            return None;
        }

        let mut cache = caches.get(file.id());
        let mut shapes: Vec<Shape> = Vec::new();
        let mut colors: Vec<Color> = Vec::new();

        let remaining: Vec<ElementId> = if use_cache {
            let mut rest = Vec::new();
            for &id in elements {
                let Some(shape) = cache.shape(id) else {
                    rest.push(id);
                    continue;
                };
                match cache.colors(id) {
                    Some(cached) if !cached.is_empty() => colors.extend_from_slice(cached),
                    _ => colors.extend(std::iter::repeat(self.config.default_face_color).take(shape.face_count())),
                }
                shapes.push(shape.clone());
            }
            tracing::debug!(hits = shapes.len(), misses = rest.len(), "Shape cache lookup");
            rest
        } else {
            elements.to_vec()
        };

        if remaining.is_empty() {
            store(caches, file.id(), cache);
            return Some(merge(shapes, colors));
        }

        let Some(iterator) = GeometryIterator::open(self.engine, file, &remaining, ExtractionMode::Brep, self.config)
        else {
            store(caches, file.id(), cache);
            return (!shapes.is_empty()).then(|| merge(shapes, colors));
        };

        progress.start(&generating_label(remaining.len()), remaining.len());
        for item in iterator {
            let ItemGeometry::Brep { data, surface_styles } = item.geometry else {
                continue;
            };
            let shape = match self.build_solid(&data, &item.matrix) {
                Ok(shape) => shape,
                Err(e) => {
                    tracing::warn!(element = %item.id, error = %e, "Skipping unreadable solid");
                    continue;
                }
            };

            let face_colors = surface_style_colors(
                &surface_styles,
                &shape.solid_face_counts(),
                shape.face_count(),
                self.config.default_face_color,
            );
            cache.insert_solid(item.id, shape.clone(), face_colors.clone());
            colors.extend(face_colors);
            shapes.push(shape);
            progress.advance();
        }
        progress.finish();

        store(caches, file.id(), cache);

        if shapes.is_empty() {
            return None;
        }
        Some(merge(shapes, colors))
    }

    /// Rehydrate a brep payload: scale first, then place
    fn build_solid(&self, data: &[u8], matrix: &[f64]) -> Result<Shape> {
        let placement = Placement::from_engine_matrix(matrix, self.config.scale)?;
        let mut shape = self.kernel.import_brep(data)?;
        shape.scale(self.config.scale);
        shape.transform(&placement);
        Ok(shape)
    }
}

fn merge(mut shapes: Vec<Shape>, colors: Vec<Color>) -> AssembledShape {
    let shape = if shapes.len() == 1 {
        shapes.remove(0)
    } else {
        Shape::compound(shapes)
    };
    AssembledShape { shape, colors }
}
