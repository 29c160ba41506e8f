// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face colors derived from engine surface styles

/// RGBA color in 0-1 range, alpha as in the host's diffuse color lists
/// (0.0 = opaque)
pub type Color = [f32; 4];

/// Neutral gray for solid faces without color information
pub const DEFAULT_FACE_COLOR: Color = [0.8, 0.8, 0.8, 0.0];

/// Neutral gray for mesh items without material
pub const DEFAULT_MESH_COLOR: [f32; 3] = [0.85, 0.85, 0.85];

/// Number of floats per style in an engine surface style array (r, g, b, transparency)
pub const STYLE_STRIDE: usize = 4;

/// Color of the style group at `index`, alpha pinned to opaque
///
/// Transparency from the style is dropped on purpose: the host renders
/// transparent faces incorrectly, so everything is emitted opaque for now.
#[inline]
fn style_color(styles: &[f64], index: usize) -> Option<Color> {
    let base = index * STYLE_STRIDE;
    let rgb = styles.get(base..base + 3)?;
    Some([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32, 0.0])
}

/// Per-face colors for a solid from its surface style array
///
/// `solid_faces` holds the face count of each sub-solid, `total_faces` the
/// face count of the whole shape. When the array encodes one style per
/// sub-solid (and there is more than one), each sub-solid's faces get their
/// own style. Otherwise every face gets the first style, or `fallback` when
/// the array carries no complete color.
pub fn surface_style_colors(
    styles: &[f64],
    solid_faces: &[usize],
    total_faces: usize,
    fallback: Color,
) -> Vec<Color> {
    let first = style_color(styles, 0).unwrap_or(fallback);

    let per_solid = styles.len() > STYLE_STRIDE
        && solid_faces.len() > 1
        && styles.len() / STYLE_STRIDE == solid_faces.len();

    if !per_solid {
        return vec![first; total_faces];
    }

    let mut colors = Vec::with_capacity(total_faces);
    for (i, &count) in solid_faces.iter().enumerate() {
        let color = style_color(styles, i).unwrap_or(first);
        colors.extend(std::iter::repeat(color).take(count));
    }
    // Faces outside any sub-solid (free shells) take the first style
    if colors.len() < total_faces {
        colors.resize(total_faces, first);
    }
    colors
}

/// Replace every channel by its absolute value
///
/// Engines report unset channels as -1.
pub fn sanitize(colors: &[Color]) -> Vec<Color> {
    colors
        .iter()
        .map(|c| [c[0].abs(), c[1].abs(), c[2].abs(), c[3].abs()])
        .collect()
}
