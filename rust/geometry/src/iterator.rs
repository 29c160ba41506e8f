// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry iterator adapter
//!
//! Configures an engine run for brep or mesh extraction and turns its raw
//! pull stream into typed [`IteratorItem`]s. Items repeating an id already
//! yielded by the same adapter are skipped; the set of seen ids lives only
//! as long as the adapter.

use crate::config::GeneratorConfig;
use crate::engine::{EngineIterator, GeometryEngine, IteratorSettings, RawItem, RawMaterial};
use nativeifc_core::{ElementId, IfcModel};
use rustc_hash::FxHashSet;

/// What the engine should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Exact boundary representation payloads
    Brep,
    /// Triangulated vertex/face arrays
    Mesh,
}

/// Geometry payload of one item, exactly the fields valid for its mode
#[derive(Debug, Clone, PartialEq)]
pub enum ItemGeometry {
    Brep {
        data: Vec<u8>,
        surface_styles: Vec<f64>,
    },
    Mesh {
        verts: Vec<f64>,
        faces: Vec<i32>,
        materials: Vec<RawMaterial>,
    },
}

/// One extracted element
#[derive(Debug, Clone, PartialEq)]
pub struct IteratorItem {
    pub id: ElementId,
    /// Engine matrix, see [`Placement::from_engine_matrix`](crate::Placement::from_engine_matrix)
    pub matrix: Vec<f64>,
    pub geometry: ItemGeometry,
}

/// Pull adapter over an initialized engine run
pub struct GeometryIterator<'a> {
    inner: Box<dyn EngineIterator + 'a>,
    mode: ExtractionMode,
    done: FxHashSet<ElementId>,
    started: bool,
    exhausted: bool,
}

impl<'a> GeometryIterator<'a> {
    /// Engine settings for a run over `file`
    pub fn settings(file: &IfcModel, mode: ExtractionMode, config: &GeneratorConfig) -> IteratorSettings {
        let brep = mode == ExtractionMode::Brep;
        IteratorSettings {
            disable_triangulation: brep,
            use_brep_data: brep,
            sew_shells: brep && config.sew_shells,
            context_ids: file.body_context_ids(),
        }
    }

    /// Open and initialize an engine run
    ///
    /// Returns `None` when there is nothing to extract or the engine fails
    /// to initialize.
    pub fn open(
        engine: &'a dyn GeometryEngine,
        file: &'a IfcModel,
        elements: &[ElementId],
        mode: ExtractionMode,
        config: &GeneratorConfig,
    ) -> Option<Self> {
        if elements.is_empty() {
            return None;
        }

        let settings = Self::settings(file, mode, config);
        tracing::debug!(
            file = %file.id(),
            elements = elements.len(),
            mode = ?mode,
            contexts = ?settings.context_ids,
            workers = config.worker_threads,
            "Opening geometry iterator"
        );

        let mut inner = engine.iterator(settings, file, config.worker_threads, elements);
        if !inner.initialize() {
            tracing::warn!(file = %file.id(), elements = elements.len(), "Invalid iterator");
            return None;
        }

        Some(Self {
            inner,
            mode,
            done: FxHashSet::default(),
            started: false,
            exhausted: false,
        })
    }

    #[inline]
    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Convert a raw item to the typed payload of this run's mode
    fn classify(&self, raw: &RawItem) -> Option<IteratorItem> {
        let geometry = match self.mode {
            ExtractionMode::Brep => match &raw.brep_data {
                Some(data) => ItemGeometry::Brep {
                    data: data.clone(),
                    surface_styles: raw.surface_styles.clone(),
                },
                None => {
                    tracing::warn!(element = %raw.id, "Item without brep data");
                    return None;
                }
            },
            ExtractionMode::Mesh => ItemGeometry::Mesh {
                verts: raw.verts.clone(),
                faces: raw.faces.clone(),
                materials: raw.materials.clone(),
            },
        };
        Some(IteratorItem {
            id: raw.id,
            matrix: raw.matrix.clone(),
            geometry,
        })
    }
}

impl Iterator for GeometryIterator<'_> {
    type Item = IteratorItem;

    fn next(&mut self) -> Option<IteratorItem> {
        loop {
            if self.exhausted {
                return None;
            }
            if self.started {
                if !self.inner.advance() {
                    self.exhausted = true;
                    return None;
                }
            } else {
                self.started = true;
            }

            let Some(raw) = self.inner.get() else {
                continue;
            };
            if self.done.contains(&raw.id) {
                tracing::debug!(element = %raw.id, "Skipping repeated item");
                continue;
            }
            let id = raw.id;
            let item = self.classify(raw);
            self.done.insert(id);
            if item.is_some() {
                return item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativeifc_core::{Element, IfcType, RepresentationContext};

    /// Engine replaying a fixed item sequence
    struct ScriptedEngine {
        script: Vec<Option<RawItem>>,
        init: bool,
    }

    struct Scripted {
        script: Vec<Option<RawItem>>,
        init: bool,
        pos: usize,
    }

    impl EngineIterator for Scripted {
        fn initialize(&mut self) -> bool {
            self.init
        }

        fn get(&self) -> Option<&RawItem> {
            self.script.get(self.pos).and_then(Option::as_ref)
        }

        fn advance(&mut self) -> bool {
            self.pos += 1;
            self.pos < self.script.len()
        }
    }

    impl GeometryEngine for ScriptedEngine {
        fn iterator<'a>(
            &'a self,
            _settings: IteratorSettings,
            _file: &'a IfcModel,
            _workers: usize,
            _include: &[ElementId],
        ) -> Box<dyn EngineIterator + 'a> {
            Box::new(Scripted {
                script: self.script.clone(),
                init: self.init,
                pos: 0,
            })
        }
    }

    fn brep_item(id: u32) -> Option<RawItem> {
        Some(RawItem {
            id: ElementId(id),
            brep_data: Some(vec![id as u8]),
            ..RawItem::default()
        })
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            scale: 1000.0,
            worker_threads: 2,
            sew_shells: true,
            ..GeneratorConfig::from_env()
        }
    }

    #[test]
    fn test_repeated_and_empty_items_are_skipped() {
        let engine = ScriptedEngine {
            script: vec![brep_item(1), None, brep_item(2), brep_item(1), brep_item(3)],
            init: true,
        };
        let model = IfcModel::new();
        let it = GeometryIterator::open(&engine, &model, &[ElementId(1)], ExtractionMode::Brep, &config()).unwrap();
        let ids: Vec<u32> = it.map(|item| item.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_seen_ids_reset_per_adapter() {
        let engine = ScriptedEngine {
            script: vec![brep_item(1)],
            init: true,
        };
        let model = IfcModel::new();
        for _ in 0..2 {
            let it = GeometryIterator::open(&engine, &model, &[ElementId(1)], ExtractionMode::Brep, &config()).unwrap();
            assert_eq!(it.count(), 1);
        }
    }

    #[test]
    fn test_wrong_payload_is_skipped() {
        let engine = ScriptedEngine {
            script: vec![Some(RawItem { id: ElementId(4), ..RawItem::default() }), brep_item(5)],
            init: true,
        };
        let model = IfcModel::new();
        let it = GeometryIterator::open(&engine, &model, &[ElementId(4)], ExtractionMode::Brep, &config()).unwrap();
        let items: Vec<IteratorItem> = it.collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0].geometry, ItemGeometry::Brep { .. }));
    }

    #[test]
    fn test_open_returns_none() {
        let engine = ScriptedEngine {
            script: vec![brep_item(1)],
            init: false,
        };
        let model = IfcModel::new();
        assert!(GeometryIterator::open(&engine, &model, &[ElementId(1)], ExtractionMode::Mesh, &config()).is_none());
        assert!(GeometryIterator::open(&engine, &model, &[], ExtractionMode::Mesh, &config()).is_none());
    }

    #[test]
    fn test_settings() {
        let mut model = IfcModel::new();
        model.add_element(Element::new(1, IfcType::IfcWall)).unwrap();
        model.add_context(RepresentationContext::model(7, "Model"));
        model.add_context(RepresentationContext::sub(8, 7, "Body"));

        let brep = GeometryIterator::settings(&model, ExtractionMode::Brep, &config());
        assert!(brep.disable_triangulation && brep.use_brep_data && brep.sew_shells);
        assert_eq!(brep.context_ids, vec![8, 7]);

        let mesh = GeometryIterator::settings(&model, ExtractionMode::Mesh, &config());
        assert!(!mesh.disable_triangulation && !mesh.use_brep_data && !mesh.sew_shells);
    }
}
