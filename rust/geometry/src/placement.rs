// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid placements and engine matrix conversion

use crate::{Error, Point3, Result, Vector3};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Number of values in an engine transformation matrix (3 rows x 4 columns)
pub const ENGINE_MATRIX_LEN: usize = 12;

/// Placement of a solid or mesh node, stored as a homogeneous 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    matrix: Matrix4<f64>,
}

impl Placement {
    #[inline]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    #[inline]
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Pure translation
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(x, y, z)),
        }
    }

    /// Convert an engine matrix
    ///
    /// The engine lays the matrix out column by column: X axis, Y axis,
    /// Z axis, then origin, three values each. Row `i` of the result is
    /// therefore `values[i], values[i + 3], values[i + 6], values[i + 9]`.
    /// The engine works in meters, so the origin is multiplied by `scale`.
    pub fn from_engine_matrix(values: &[f64], scale: f64) -> Result<Self> {
        if values.len() != ENGINE_MATRIX_LEN {
            return Err(Error::InvalidMatrix(values.len()));
        }

        let mut matrix = Matrix4::identity();
        for row in 0..3 {
            for col in 0..3 {
                matrix[(row, col)] = values[row + col * 3];
            }
            matrix[(row, 3)] = values[row + 9] * scale;
        }
        Ok(Self { matrix })
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Translation part
    #[inline]
    pub fn origin(&self) -> Vector3<f64> {
        Vector3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    #[inline]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// `self * other`: apply `other` first, then `self`
    #[inline]
    pub fn multiply(&self, other: &Placement) -> Placement {
        Placement {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Scale the translation part, leaving the rotation untouched
    ///
    /// This is how a placement follows its shape when the shape is scaled
    /// about the origin.
    pub fn scaled_origin(&self, factor: f64) -> Placement {
        let mut matrix = self.matrix;
        for row in 0..3 {
            matrix[(row, 3)] *= factor;
        }
        Placement { matrix }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}
