// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene graph mesh nodes
//!
//! A [`MeshNode`] is the renderable fragment built for one element: a
//! material, a coordinate list and an indexed face set where every
//! triangle is terminated by [`FACE_END`]. A [`MeshGroup`] collects the
//! nodes of one generation call.

use crate::placement::Placement;
use crate::{Error, Point3, Result};

/// Terminator closing each face in [`MeshNode::coord_index`]
pub const FACE_END: i32 = -1;

/// Surface material of a mesh node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: [f32; 3],
    pub transparency: f32,
}

impl Material {
    pub fn new(diffuse: [f32; 3]) -> Self {
        Self {
            diffuse,
            transparency: 0.0,
        }
    }
}

/// Triangulated, renderable mesh of one element
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub material: Material,
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Indexed face set: `i0, i1, i2, FACE_END` per triangle
    pub coord_index: Vec<i32>,
}

impl MeshNode {
    /// Build a node from raw engine arrays
    ///
    /// `verts` is a flat coordinate stream grouped in triples and scaled by
    /// `scale`; `faces` a flat triangle index stream grouped in triples.
    /// Trailing partial groups are ignored.
    pub fn from_raw(verts: &[f64], faces: &[i32], scale: f64, material: Material) -> Result<Self> {
        let vertex_count = verts.len() / 3;

        let positions = verts
            .chunks_exact(3)
            .flat_map(|v| [(v[0] * scale) as f32, (v[1] * scale) as f32, (v[2] * scale) as f32])
            .collect();

        let mut coord_index = Vec::with_capacity(faces.len() / 3 * 4);
        for tri in faces.chunks_exact(3) {
            if let Some(&bad) = tri.iter().find(|&&i| i < 0 || i as usize >= vertex_count) {
                return Err(Error::TriangulationError(format!(
                    "Face index {} out of range for {} vertices",
                    bad, vertex_count
                )));
            }
            coord_index.extend_from_slice(tri);
            coord_index.push(FACE_END);
        }

        Ok(Self {
            material,
            positions,
            coord_index,
        })
    }

    /// Bake a placement into the vertex coordinates
    pub fn apply_placement(&mut self, placement: &Placement) {
        if placement.is_identity() {
            return;
        }
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = placement.transform_point(&p);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        }
    }

    /// Copy with the placement baked in
    pub fn placed(&self, placement: &Placement) -> MeshNode {
        let mut node = self.clone();
        node.apply_placement(placement);
        node
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.coord_index.len() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        self.positions.chunks_exact(3).for_each(|chunk| {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        });
        (min, max)
    }
}

/// Group node holding the mesh nodes of one generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGroup {
    pub children: Vec<MeshNode>,
}

impl MeshGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_child(&mut self, node: MeshNode) {
        self.children.push(node);
    }

    /// Move all children of `other` to the end of this group
    pub fn append(&mut self, other: MeshGroup) {
        self.children.extend(other.children);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.children.iter().map(MeshNode::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshNode {
        let verts = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        MeshNode::from_raw(&verts, &[0, 1, 2], 1000.0, Material::new([0.85; 3])).unwrap()
    }

    #[test]
    fn test_from_raw_scales_and_terminates_faces() {
        let node = triangle();
        assert_eq!(node.vertex_count(), 3);
        assert_eq!(node.positions[3], 1000.0);
        assert_eq!(node.coord_index, vec![0, 1, 2, FACE_END]);
        assert_eq!(node.triangle_count(), 1);
    }

    #[test]
    fn test_from_raw_rejects_bad_index() {
        let verts = [0.0; 9];
        assert!(MeshNode::from_raw(&verts, &[0, 1, 3], 1.0, Material::new([1.0; 3])).is_err());
    }

    #[test]
    fn test_apply_placement() {
        let node = triangle().placed(&Placement::translation(10.0, 20.0, 30.0));
        let (min, max) = node.bounds();
        assert_eq!(min, Point3::new(10.0, 20.0, 30.0));
        assert_eq!(max, Point3::new(1010.0, 1020.0, 30.0));
    }

    #[test]
    fn test_group_append() {
        let mut group = MeshGroup::new();
        group.add_child(triangle());
        let mut cached = MeshGroup::new();
        cached.add_child(triangle());
        cached.add_child(triangle());
        group.append(cached);
        assert_eq!(group.len(), 3);
        assert_eq!(group.triangle_count(), 3);
    }
}
