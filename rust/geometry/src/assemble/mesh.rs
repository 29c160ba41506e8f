// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh assembler: triangulated results to one group node
//!
//! A single element keeps its placement separate and returns it next to an
//! unplaced node. With several elements (grouping) each node gets its own
//! placement baked into its coordinates and no placement is returned.

use super::store;
use crate::cache::CacheRegistry;
use crate::config::GeneratorConfig;
use crate::engine::{GeometryEngine, RawMaterial};
use crate::iterator::{ExtractionMode, GeometryIterator, ItemGeometry};
use crate::mesh::{Material, MeshGroup, MeshNode};
use crate::placement::Placement;
use crate::progress::{generating_label, ProgressSink};
use nativeifc_core::{Element, ElementId, IfcModel};

/// Group node of a set of elements
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledMesh {
    pub group: MeshGroup,
    /// Placement of the single element, `None` when grouping
    pub placement: Option<Placement>,
}

pub struct MeshAssembler<'a> {
    engine: &'a dyn GeometryEngine,
    config: &'a GeneratorConfig,
}

impl<'a> MeshAssembler<'a> {
    pub fn new(engine: &'a dyn GeometryEngine, config: &'a GeneratorConfig) -> Self {
        Self { engine, config }
    }

    /// Build the mesh group of `elements`
    ///
    /// Elements without representation are dropped up front. Nodes taken
    /// from the cache are appended after all freshly built nodes.
    pub fn assemble(
        &self,
        file: &IfcModel,
        elements: &[ElementId],
        use_cache: bool,
        caches: &mut CacheRegistry,
        progress: &mut dyn ProgressSink,
    ) -> Option<AssembledMesh> {
        let elements: Vec<ElementId> = elements
            .iter()
            .copied()
            .filter(|&id| file.element(id).is_some_and(Element::has_representation))
            .collect();
        if elements.is_empty() {
            return None;
        }

        let grouping = elements.len() > 1;
        let mut cache = caches.get(file.id());
        let mut cached_nodes = MeshGroup::new();
        let mut placement: Option<Placement> = None;

        let remaining: Vec<ElementId> = if use_cache {
            let mut rest = Vec::new();
            for &id in &elements {
                let cached_placement = cache.placement(id).copied();
                if cached_placement.is_some() {
                    placement = cached_placement;
                }
                match cache.mesh(id) {
                    Some(node) if grouping => {
                        cached_nodes.add_child(node.placed(&cached_placement.unwrap_or_default()))
                    }
                    Some(node) => cached_nodes.add_child(node.clone()),
                    None => rest.push(id),
                }
            }
            if grouping {
                placement = None;
            }
            tracing::debug!(hits = cached_nodes.len(), misses = rest.len(), "Mesh cache lookup");
            rest
        } else {
            elements.clone()
        };

        if remaining.is_empty() {
            store(caches, file.id(), cache);
            return Some(AssembledMesh {
                group: cached_nodes,
                placement,
            });
        }

        if !cached_nodes.is_empty() {
            tracing::debug!(cached = cached_nodes.len(), "Cached nodes with calculated nodes");
        }

        let Some(iterator) = GeometryIterator::open(self.engine, file, &remaining, ExtractionMode::Mesh, self.config)
        else {
            store(caches, file.id(), cache);
            return (!cached_nodes.is_empty()).then(|| AssembledMesh {
                group: cached_nodes,
                placement: None,
            });
        };

        let mut group = MeshGroup::new();
        placement = None;
        progress.start(&generating_label(remaining.len()), remaining.len());
        for item in iterator {
            let ItemGeometry::Mesh { verts, faces, materials } = item.geometry else {
                continue;
            };

            let item_placement = match Placement::from_engine_matrix(&item.matrix, self.config.scale) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(element = %item.id, error = %e, "Skipping item with bad placement");
                    continue;
                }
            };
            let material = self.material(materials.first());
            let node = match MeshNode::from_raw(&verts, &faces, self.config.scale, material) {
                Ok(node) => node,
                Err(e) => {
                    tracing::warn!(element = %item.id, error = %e, "Skipping malformed mesh");
                    continue;
                }
            };

            cache.insert_mesh(item.id, node.clone(), item_placement);
            if grouping {
                group.add_child(node.placed(&item_placement));
            } else {
                group.add_child(node);
                placement = Some(item_placement);
            }
            progress.advance();
        }
        progress.finish();

        if grouping {
            placement = None;
        }
        group.append(cached_nodes);
        store(caches, file.id(), cache);

        if group.is_empty() {
            return None;
        }
        Some(AssembledMesh { group, placement })
    }

    /// Material from the first engine material, transparency dropped
    fn material(&self, raw: Option<&RawMaterial>) -> Material {
        match raw {
            Some(m) => Material::new([m.diffuse[0] as f32, m.diffuse[1] as f32, m.diffuse[2] as f32]),
            None => Material::new(self.config.default_mesh_color),
        }
    }
}
