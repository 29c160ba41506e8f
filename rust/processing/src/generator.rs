// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation orchestrator
//!
//! Entry point whenever a node's representation must be (re)computed. Each
//! call runs the same fixed sequence:
//!
//! 1. clean the display slot of the node
//! 2. assign a placeholder solid
//! 3. resolve the decomposition
//! 4. dispatch on the node's [`RepresentationMode`]
//! 5. commit the result onto the node
//!
//! Failures never escape: a node that produced nothing keeps its placeholder
//! and a [`Diagnostic`] is returned instead.

use crate::decomposition::resolve;
use crate::diagnostics::{report_unrenderable, Diagnostic};
use crate::document::Document;
use crate::error::Result;
use crate::node::{NodeId, RepresentationMode};
use nativeifc_core::IfcModel;
use nativeifc_geometry::{
    BrepKernel, CacheRegistry, Color, GeneratorConfig, GeometryEngine, LogProgress, MeshAssembler, ProgressSink,
    Shape, ShapeAssembler,
};
use std::sync::Arc;

/// Edge length of the placeholder solid, in host units
const PLACEHOLDER_SIZE: f64 = 1.0;

/// What one generation call did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutcome {
    /// Number of elements resolved for the node
    pub elements: usize,
    /// Whether geometry was committed onto the node
    pub generated: bool,
    /// Set when the node produced nothing and is worth reporting
    pub diagnostic: Option<Diagnostic>,
}

/// Geometry generator shared by every node of a session
pub struct Generator {
    engine: Arc<dyn GeometryEngine>,
    kernel: Arc<dyn BrepKernel>,
    config: GeneratorConfig,
    caches: CacheRegistry,
}

impl Generator {
    pub fn new(engine: Arc<dyn GeometryEngine>, kernel: Arc<dyn BrepKernel>, config: GeneratorConfig) -> Self {
        Self {
            engine,
            kernel,
            config,
            caches: CacheRegistry::new(),
        }
    }

    /// Start caching geometry of `file`
    pub fn register_file(&mut self, file: &IfcModel) {
        tracing::debug!(file = %file.id(), "Registering geometry cache");
        self.caches.register(file.id());
    }

    /// Drop the geometry cache of `file`
    pub fn close_file(&mut self, file: &IfcModel) {
        if self.caches.unregister(file.id()).is_some() {
            tracing::debug!(file = %file.id(), "Dropped geometry cache");
        }
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn engine(&self) -> &dyn GeometryEngine {
        self.engine.as_ref()
    }

    /// Generate with the node's one-shot cache flag
    ///
    /// The first call after creation or restore may be served from cache;
    /// the flag is cleared afterwards so later recomputes start over.
    pub fn execute(&mut self, doc: &mut Document, node: NodeId) -> Result<GenerationOutcome> {
        let use_cache = doc.require(node)?.fresh;
        let outcome = self.generate(doc, node, use_cache)?;
        doc.require_mut(node)?.fresh = false;
        Ok(outcome)
    }

    /// (Re)compute the representation of `node`
    pub fn generate(&mut self, doc: &mut Document, node: NodeId, use_cache: bool) -> Result<GenerationOutcome> {
        let mut progress = LogProgress::new();
        self.generate_with_progress(doc, node, use_cache, &mut progress)
    }

    pub fn generate_with_progress(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        use_cache: bool,
        progress: &mut dyn ProgressSink,
    ) -> Result<GenerationOutcome> {
        let (file, element, mode) = {
            let n = doc.require_mut(node)?;
            // Clean previous mesh content and keep the slot for re-attachment
            if let Some(view) = n.view.as_mut() {
                view.detach();
            }
            n.shape = Some(Shape::make_box(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
            (Arc::clone(&n.file), n.element, n.mode)
        };

        let elements = resolve(doc, node)?;
        let mut outcome = GenerationOutcome {
            elements: elements.len(),
            ..GenerationOutcome::default()
        };
        let mut colors: Vec<Color> = Vec::new();

        match mode {
            RepresentationMode::None => return Ok(outcome),
            RepresentationMode::Solid => {
                let assembler = ShapeAssembler::new(self.engine.as_ref(), self.kernel.as_ref(), &self.config);
                if let Some(assembled) = assembler.assemble(&file, &elements, use_cache, &mut self.caches, progress) {
                    let n = doc.require_mut(node)?;
                    n.placement = assembled.shape.placement;
                    n.shape = Some(assembled.shape);
                    colors = assembled.colors;
                    outcome.generated = true;
                }
            }
            RepresentationMode::Mesh => {
                if doc.require(node)?.view.is_none() {
                    tracing::debug!(node = %doc.require(node)?.label, "Skipping mesh generation without a view");
                    return Ok(outcome);
                }
                let assembler = MeshAssembler::new(self.engine.as_ref(), &self.config);
                if let Some(assembled) = assembler.assemble(&file, &elements, use_cache, &mut self.caches, progress) {
                    let n = doc.require_mut(node)?;
                    if let Some(view) = n.view.as_mut() {
                        view.attach(assembled.group);
                    }
                    if let Some(placement) = assembled.placement {
                        n.placement = placement;
                    }
                    outcome.generated = true;
                }
            }
        }

        if !outcome.generated {
            outcome.diagnostic = element.and_then(|id| report_unrenderable(&file, id));
        }
        if !colors.is_empty() {
            doc.set_colors(node, &colors)?;
        }

        tracing::debug!(
            node = %doc.require(node)?.label,
            mode = ?mode,
            elements = outcome.elements,
            generated = outcome.generated,
            use_cache,
            "Generated node"
        );
        Ok(outcome)
    }
}
