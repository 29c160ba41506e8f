// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation settings loaded from environment variables.

use crate::color::{Color, DEFAULT_FACE_COLOR, DEFAULT_MESH_COLOR};

/// Geometry generation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Linear-unit scale factor applied to engine output (engine works in
    /// meters, the host document in millimeters).
    pub scale: f64,
    /// Number of worker threads handed to the extraction engine.
    pub worker_threads: usize,
    /// Sew shells when extracting brep data.
    pub sew_shells: bool,
    /// Face color for solids that have no color information.
    pub default_face_color: Color,
    /// Diffuse color for mesh items without material.
    pub default_mesh_color: [f32; 3],
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            scale: std::env::var("NATIVEIFC_SCALE")
                .unwrap_or_else(|_| "1000.0".into())
                .parse()
                .unwrap_or(1000.0),
            worker_threads: std::env::var("NATIVEIFC_WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            sew_shells: std::env::var("NATIVEIFC_SEW_SHELLS")
                .map(|v| !matches!(v.trim(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            default_face_color: DEFAULT_FACE_COLOR,
            default_mesh_color: DEFAULT_MESH_COLOR,
        }
    }

    /// Same as [`from_env`](Self::from_env) with an explicit scale factor
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::from_env()
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
