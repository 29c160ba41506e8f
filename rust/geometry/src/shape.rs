// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary representation solids
//!
//! A [`Shape`] is a list of solids, each a list of planar polygonal faces,
//! positioned by a [`Placement`]. Vertices stay in the shape's local frame;
//! transforming a shape composes into its placement the way a CAD kernel
//! moves a shape's location without touching its topology.

use crate::placement::Placement;
use crate::Point3;
use serde::{Deserialize, Serialize};

/// Planar polygonal face, vertices in boundary order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<Point3<f64>>,
}

impl Face {
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        Self { vertices }
    }
}

/// Closed shell of faces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub faces: Vec<Face>,
}

/// One or more solids with a placement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub solids: Vec<Solid>,
    #[serde(default)]
    pub placement: Placement,
}

impl Shape {
    /// Shape made of a single solid
    pub fn from_solid(solid: Solid) -> Self {
        Self {
            solids: vec![solid],
            placement: Placement::identity(),
        }
    }

    /// Axis aligned box with one corner at the origin
    pub fn make_box(dx: f64, dy: f64, dz: f64) -> Self {
        let p = |x: f64, y: f64, z: f64| Point3::new(x * dx, y * dy, z * dz);
        let quad = |a, b, c, d| Face::new(vec![a, b, c, d]);
        let faces = vec![
            quad(p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)),
            quad(p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)),
            quad(p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)),
            quad(p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)),
            quad(p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)),
            quad(p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)),
        ];
        Self::from_solid(Solid { faces })
    }

    /// Uniform scale about the world origin
    ///
    /// Vertices are scaled and the placement origin follows, so the shape's
    /// world geometry is scaled as a whole.
    pub fn scale(&mut self, factor: f64) {
        for solid in &mut self.solids {
            for face in &mut solid.faces {
                for v in &mut face.vertices {
                    *v = Point3::from(v.coords * factor);
                }
            }
        }
        self.placement = self.placement.scaled_origin(factor);
    }

    /// Move the shape by `placement`, applied after its current placement
    pub fn transform(&mut self, placement: &Placement) {
        self.placement = placement.multiply(&self.placement);
    }

    /// Copy with the placement baked into the vertices
    pub fn baked(&self) -> Shape {
        if self.placement.is_identity() {
            return self.clone();
        }
        let solids = self
            .solids
            .iter()
            .map(|solid| Solid {
                faces: solid
                    .faces
                    .iter()
                    .map(|f| Face::new(f.vertices.iter().map(|v| self.placement.transform_point(v)).collect()))
                    .collect(),
            })
            .collect();
        Shape {
            solids,
            placement: Placement::identity(),
        }
    }

    /// Compound of several shapes
    ///
    /// Each part's placement is baked into its vertices; solids and faces
    /// keep the order of `parts`.
    pub fn compound(parts: Vec<Shape>) -> Shape {
        let solids = parts.iter().flat_map(|s| s.baked().solids).collect();
        Shape {
            solids,
            placement: Placement::identity(),
        }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.solids.iter().map(|s| s.faces.len()).sum()
    }

    /// Face count of each solid
    pub fn solid_face_counts(&self) -> Vec<usize> {
        self.solids.iter().map(|s| s.faces.len()).collect()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.face_count() == 0
    }

    /// World space bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.is_null() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        let points = self
            .solids
            .iter()
            .flat_map(|s| s.faces.iter())
            .flat_map(|f| f.vertices.iter());
        for v in points {
            let w = self.placement.transform_point(v);
            min = min.inf(&w);
            max = max.sup(&w);
        }
        (min, max)
    }
}
