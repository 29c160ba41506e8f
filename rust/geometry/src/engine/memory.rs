// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory extraction engine
//!
//! Serves geometry registered per (file, element) pair. Extraction of the
//! requested elements runs on a rayon pool sized by the worker count. Pools
//! are built on first use and shared by later iterators asking for the same
//! count. Results are then handed out one by one through the pull interface
//! in request order.

use super::{EngineIterator, GeometryEngine, IteratorSettings, RawItem, RawMaterial};
use crate::kernel::BrepKernel;
use crate::placement::ENGINE_MATRIX_LEN;
use crate::triangulation::triangulate_face;
use crate::{Error, Result, Shape};
use nativeifc_core::{ElementId, FileId, IfcModel};
use rayon::prelude::*;
use rayon::ThreadPool;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const IDENTITY_MATRIX: [f64; ENGINE_MATRIX_LEN] = [
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0, //
    0.0, 0.0, 0.0,
];

/// Geometry of one element as the engine knows it
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGeometry {
    /// Solid in the element's local frame, meters
    pub shape: Shape,
    /// Element placement in engine layout, origin in meters
    pub matrix: [f64; ENGINE_MATRIX_LEN],
    /// (r, g, b, transparency) per style
    pub surface_styles: Vec<f64>,
    /// Mesh materials; derived from the surface styles when empty
    pub materials: Vec<RawMaterial>,
}

impl SourceGeometry {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            matrix: IDENTITY_MATRIX,
            surface_styles: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Place the element at `(x, y, z)` meters
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.matrix[9] = x;
        self.matrix[10] = y;
        self.matrix[11] = z;
        self
    }

    pub fn with_matrix(mut self, matrix: [f64; ENGINE_MATRIX_LEN]) -> Self {
        self.matrix = matrix;
        self
    }

    /// Append an opaque surface style
    pub fn with_style(mut self, rgb: [f64; 3]) -> Self {
        self.surface_styles.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 0.0]);
        self
    }

    pub fn with_material(mut self, material: RawMaterial) -> Self {
        self.materials.push(material);
        self
    }

    fn mesh_materials(&self) -> Vec<RawMaterial> {
        if !self.materials.is_empty() {
            return self.materials.clone();
        }
        self.surface_styles
            .chunks_exact(4)
            .map(|s| RawMaterial {
                diffuse: [s[0], s[1], s[2]],
                transparency: s[3],
            })
            .collect()
    }
}

/// Engine serving pre-registered geometry
pub struct MemoryEngine {
    kernel: Arc<dyn BrepKernel>,
    geometry: FxHashMap<(FileId, ElementId), SourceGeometry>,
    pools: Mutex<FxHashMap<usize, Arc<ThreadPool>>>,
    opened: AtomicUsize,
}

impl MemoryEngine {
    pub fn new(kernel: Arc<dyn BrepKernel>) -> Self {
        Self {
            kernel,
            geometry: FxHashMap::default(),
            pools: Mutex::new(FxHashMap::default()),
            opened: AtomicUsize::new(0),
        }
    }

    /// Register the geometry of an element of `file`
    pub fn insert(&mut self, file: FileId, id: ElementId, geometry: SourceGeometry) {
        self.geometry.insert((file, id), geometry);
    }

    /// Number of iterators created so far
    pub fn iterators_opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Number of worker pools built so far
    pub fn pools_built(&self) -> usize {
        self.pools.lock().map_or(0, |pools| pools.len())
    }

    /// Worker pool with `workers` threads, built on first request
    fn pool(&self, workers: usize) -> Result<Arc<ThreadPool>> {
        let workers = workers.max(1);
        let mut pools = self
            .pools
            .lock()
            .map_err(|_| Error::EngineInit("worker pool registry poisoned".to_string()))?;
        if let Some(pool) = pools.get(&workers) {
            return Ok(Arc::clone(pool));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ifc-extract-{i}"))
            .build()
            .map_err(|e| Error::EngineInit(e.to_string()))?;
        let pool = Arc::new(pool);
        pools.insert(workers, Arc::clone(&pool));
        tracing::debug!(workers, "Started extraction workers");
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

impl GeometryEngine for MemoryEngine {
    fn iterator<'a>(
        &'a self,
        settings: IteratorSettings,
        file: &'a IfcModel,
        workers: usize,
        include: &[ElementId],
    ) -> Box<dyn EngineIterator + 'a> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        Box::new(MemoryIterator {
            engine: self,
            file,
            settings,
            workers,
            include: include.to_vec(),
            items: Vec::new(),
            pos: 0,
        })
    }
}

struct MemoryIterator<'a> {
    engine: &'a MemoryEngine,
    file: &'a IfcModel,
    settings: IteratorSettings,
    workers: usize,
    include: Vec<ElementId>,
    items: Vec<RawItem>,
    pos: usize,
}

impl MemoryIterator<'_> {
    /// Elements with registered geometry and a representation in the
    /// requested contexts
    fn jobs(&self) -> Vec<(ElementId, &SourceGeometry)> {
        let file_id = self.file.id();
        self.include
            .iter()
            .filter_map(|&id| {
                let representation = self.file.element(id)?.representation.as_ref()?;
                if !representation.uses_any_context(&self.settings.context_ids) {
                    return None;
                }
                self.engine.geometry.get(&(file_id, id)).map(|g| (id, g))
            })
            .collect()
    }
}

impl EngineIterator for MemoryIterator<'_> {
    fn initialize(&mut self) -> bool {
        let jobs = self.jobs();
        if jobs.is_empty() {
            return false;
        }

        let pool = match self.engine.pool(self.workers) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start extraction workers");
                return false;
            }
        };

        let settings = &self.settings;
        let kernel = self.engine.kernel.as_ref();
        let results: Vec<(ElementId, Result<RawItem>)> = pool.install(|| {
            jobs.par_iter()
                .map(|&(id, geometry)| (id, extract(id, geometry, settings, kernel)))
                .collect()
        });

        let mut items = Vec::with_capacity(results.len());
        for (id, result) in results {
            match result {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(element = %id, error = %e, "Extraction failed"),
            }
        }

        self.items = items;
        self.pos = 0;
        !self.items.is_empty()
    }

    fn get(&self) -> Option<&RawItem> {
        self.items.get(self.pos)
    }

    fn advance(&mut self) -> bool {
        if self.pos + 1 < self.items.len() {
            self.pos += 1;
            true
        } else {
            self.pos = self.items.len();
            false
        }
    }
}

/// Produce the raw item of one element for the given settings
fn extract(
    id: ElementId,
    geometry: &SourceGeometry,
    settings: &IteratorSettings,
    kernel: &dyn BrepKernel,
) -> Result<RawItem> {
    let mut item = RawItem {
        id,
        matrix: geometry.matrix.to_vec(),
        ..RawItem::default()
    };

    if settings.use_brep_data {
        item.brep_data = Some(kernel.export_brep(&geometry.shape)?);
        item.surface_styles = geometry.surface_styles.clone();
        return Ok(item);
    }

    let shape = geometry.shape.baked();
    for face in shape.solids.iter().flat_map(|s| s.faces.iter()) {
        let offset = item.verts.len() / 3;
        let indices = triangulate_face(&face.vertices)?;
        item.verts
            .extend(face.vertices.iter().flat_map(|v| [v.x, v.y, v.z]));
        item.faces
            .extend(indices.into_iter().map(|i| (offset + i) as i32));
    }
    item.materials = geometry.mesh_materials();
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::JsonBrepKernel;
    use nativeifc_core::{Element, IfcType, Representation};

    fn setup() -> (IfcModel, MemoryEngine) {
        let mut model = IfcModel::new();
        model
            .add_element(Element::new(1, IfcType::IfcWall).with_representation(Representation::in_context(10, "Body")))
            .unwrap();
        model
            .add_element(Element::new(2, IfcType::IfcSlab).with_representation(Representation::in_context(20, "Axis")))
            .unwrap();
        model.add_element(Element::new(3, IfcType::IfcBuildingStorey)).unwrap();

        let mut engine = MemoryEngine::new(Arc::new(JsonBrepKernel));
        for id in 1..=3 {
            engine.insert(
                model.id(),
                ElementId(id),
                SourceGeometry::new(Shape::make_box(1.0, 1.0, 1.0)).with_style([0.5, 0.5, 0.5]),
            );
        }
        (model, engine)
    }

    fn drain(iterator: &mut (dyn EngineIterator + '_)) -> Vec<RawItem> {
        let mut items = Vec::new();
        loop {
            if let Some(item) = iterator.get() {
                items.push(item.clone());
            }
            if !iterator.advance() {
                break;
            }
        }
        items
    }

    #[test]
    fn test_mesh_mode_triangulates() {
        let (model, engine) = setup();
        let mut it = engine.iterator(IteratorSettings::default(), &model, 2, &[ElementId(1)]);
        assert!(it.initialize());
        let items = drain(it.as_mut());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].verts.len(), 6 * 4 * 3);
        assert_eq!(items[0].faces.len(), 6 * 2 * 3);
        assert_eq!(items[0].materials[0].diffuse, [0.5, 0.5, 0.5]);
        assert!(items[0].brep_data.is_none());
    }

    #[test]
    fn test_brep_mode_exports_payload() {
        let (model, engine) = setup();
        let settings = IteratorSettings {
            disable_triangulation: true,
            use_brep_data: true,
            sew_shells: true,
            context_ids: Vec::new(),
        };
        let mut it = engine.iterator(settings, &model, 1, &[ElementId(1), ElementId(2)]);
        assert!(it.initialize());
        let items = drain(it.as_mut());
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.brep_data.is_some() && i.verts.is_empty()));
    }

    #[test]
    fn test_context_filter_and_missing_representation() {
        let (model, engine) = setup();
        let settings = IteratorSettings {
            context_ids: vec![10],
            ..IteratorSettings::default()
        };
        let mut it = engine.iterator(settings, &model, 4, &[ElementId(1), ElementId(2), ElementId(3)]);
        assert!(it.initialize());
        let ids: Vec<ElementId> = drain(it.as_mut()).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ElementId(1)]);
    }

    #[test]
    fn test_initialize_fails_without_geometry() {
        let (model, engine) = setup();
        let mut it = engine.iterator(IteratorSettings::default(), &model, 1, &[ElementId(3)]);
        assert!(!it.initialize());
        assert!(it.get().is_none());
        assert_eq!(engine.iterators_opened(), 1);
        assert_eq!(engine.pools_built(), 0);
    }

    #[test]
    fn test_iterators_share_worker_pools() {
        let (model, engine) = setup();
        for _ in 0..3 {
            let mut it = engine.iterator(IteratorSettings::default(), &model, 2, &[ElementId(1)]);
            assert!(it.initialize());
        }
        assert_eq!(engine.iterators_opened(), 3);
        assert_eq!(engine.pools_built(), 1);

        let first = engine.pool(2).unwrap();
        assert!(Arc::ptr_eq(&first, &engine.pool(2).unwrap()));
        // Zero workers still gets a single-threaded pool
        assert_eq!(engine.pool(0).unwrap().current_num_threads(), 1);
        assert_eq!(engine.pools_built(), 2);
    }
}
