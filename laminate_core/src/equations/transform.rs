//! # Ply Frame Transform
//!
//! Rotation of plane-stress tensors between a ply's material axes (1, 2, 12)
//! and the laminate axes (x, y, xy).
//!
//! ```text
//!            y
//!            │   2        1 (fiber)
//!            │    ╲      ╱
//!            │     ╲    ╱  θ measured from x to the fiber,
//!            │      ╲  ╱   positive counter-clockwise
//!            └───────╳──────── x
//! ```
//!
//! ## Formula
//!
//! ```text
//! J(θ) = [  c²    s²    2sc   ]
//!        [  s²    c²   -2sc   ]
//!        [ -sc    sc   c²-s²  ]
//! ```
//!
//! J is the stress transformation matrix; its inverse is J(−θ), which is what
//! [`ply_frame_transform`] returns, so the inverse is exact at every angle and
//! the transform at θ = 0° is the exact identity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor3;

/// Transformation tensor and the derived matrices needed by the
/// global-stiffness rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTransform {
    /// Fiber angle in degrees
    pub angle_deg: f64,
    /// J(θ)
    #[serde(with = "crate::tensor::rows")]
    pub j: Tensor3,
    /// J⁻¹ = J(−θ)
    #[serde(with = "crate::tensor::rows")]
    pub j_inv: Tensor3,
    /// Jᵗ
    #[serde(with = "crate::tensor::rows")]
    pub j_t: Tensor3,
    /// (Jᵗ)⁻¹
    #[serde(with = "crate::tensor::rows")]
    pub j_t_inv: Tensor3,
}

/// Raw J(θ) for an angle in degrees.
///
/// # Example
/// ```rust
/// use laminate_core::equations::transform::transformation_matrix;
///
/// let j = transformation_matrix(90.0);
/// // At 90° the 1 and 2 axes swap
/// assert!((j[(0, 1)] - 1.0).abs() < 1e-12);
/// assert!((j[(1, 0)] - 1.0).abs() < 1e-12);
/// ```
pub fn transformation_matrix(angle_deg: f64) -> Tensor3 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let (c2, s2, sc) = (c * c, s * s, s * c);
    Tensor3::new(
        c2,  s2,  2.0 * sc,
        s2,  c2, -2.0 * sc,
        -sc, sc,  c2 - s2,
    )
}

/// Build J, J⁻¹, Jᵗ and (Jᵗ)⁻¹ for a fiber angle in degrees.
///
/// Any real angle is accepted. There is no failure path: J is a rotation and
/// always invertible.
///
/// # Example
/// ```rust
/// use laminate_core::equations::transform::ply_frame_transform;
/// use laminate_core::tensor::Tensor3;
///
/// let t = ply_frame_transform(30.0);
/// let product = t.j * t.j_inv;
/// assert!((product - Tensor3::identity()).amax() < 1e-12);
/// ```
pub fn ply_frame_transform(angle_deg: f64) -> FrameTransform {
    let j = transformation_matrix(angle_deg);
    let j_inv = transformation_matrix(-angle_deg);
    FrameTransform {
        angle_deg,
        j,
        j_inv,
        j_t: j.transpose(),
        j_t_inv: j_inv.transpose(),
    }
}

/// Memo key for an angle: exact bit pattern, with -0.0 folded into 0.0.
fn angle_key(angle_deg: f64) -> u64 {
    (angle_deg + 0.0).to_bits()
}

/// Sparse cache of frame transforms keyed by the exact angles in use.
///
/// Laminates usually repeat a handful of angles, so the transform is built
/// once per distinct angle.
#[derive(Debug, Clone, Default)]
pub struct TransformCache {
    entries: HashMap<u64, FrameTransform>,
}

impl TransformCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache holding exactly the distinct angles of `angles`
    pub fn for_angles<I: IntoIterator<Item = f64>>(angles: I) -> Self {
        let mut cache = Self::new();
        for angle in angles {
            cache.get_or_insert(angle);
        }
        cache
    }

    /// Look up the transform for `angle_deg`, computing it on first use
    pub fn get_or_insert(&mut self, angle_deg: f64) -> &FrameTransform {
        self.entries
            .entry(angle_key(angle_deg))
            .or_insert_with(|| ply_frame_transform(angle_deg + 0.0))
    }

    /// Look up a transform without computing it
    pub fn get(&self, angle_deg: f64) -> Option<&FrameTransform> {
        self.entries.get(&angle_key(angle_deg))
    }

    /// Number of distinct angles cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_at_zero() {
        let t = ply_frame_transform(0.0);
        assert_eq!(t.j, Tensor3::identity());
        assert_eq!(t.j_inv, Tensor3::identity());
        assert_eq!(t.j_t_inv, Tensor3::identity());
    }

    #[test]
    fn test_inverse_identity_for_all_angles() {
        let mut angle = -180.0;
        while angle <= 180.0 {
            let t = ply_frame_transform(angle);
            assert_abs_diff_eq!(t.j * t.j_inv, Tensor3::identity(), epsilon = 1e-9);
            assert_abs_diff_eq!(t.j_t * t.j_t_inv, Tensor3::identity(), epsilon = 1e-9);
            angle += 7.5;
        }
    }

    #[test]
    fn test_analytic_inverse_matches_numeric() {
        for angle in [15.0, 45.0, -60.0, 90.0, 123.4] {
            let t = ply_frame_transform(angle);
            let numeric = t.j.try_inverse().unwrap();
            assert_abs_diff_eq!(t.j_inv, numeric, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ninety_degrees_is_not_singular() {
        let t = ply_frame_transform(90.0);
        assert!(t.j.determinant().abs() > 0.5);
        assert_abs_diff_eq!(t.j[(2, 2)], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cache_keeps_distinct_angles_only() {
        let cache = TransformCache::for_angles([0.0, 90.0, 90.0, 0.0, -0.0, 45.0]);
        assert_eq!(cache.len(), 3);
        assert!(cache.get(45.0).is_some());
        assert!(cache.get(-45.0).is_none());
        assert_eq!(cache.get(-0.0).unwrap().angle_deg, 0.0);
    }
}
