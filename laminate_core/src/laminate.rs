//! # Laminate
//!
//! An ordered, immutable stack of plies and everything derived from it:
//! through-thickness geometry, per-ply stiffness in material and laminate
//! axes, and the laminate A/B/D matrices.
//!
//! Ply 0 is the bottom ply. Geometry is validated at construction; material
//! constants are validated the first time a stiffness is requested. Derived
//! tensors are computed on first request and memoized for the lifetime of the
//! `Laminate`, so asking twice never recomputes.
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::laminate::build_laminate;
//!
//! let lam = build_laminate(
//!     &[0.0, 90.0, 90.0, 0.0],
//!     &[0.25; 4],
//!     &[45600.0; 4],
//!     &[16200.0; 4],
//!     &[5830.0; 4],
//!     &[0.278; 4],
//! ).unwrap();
//!
//! assert_eq!(lam.ply_count(), 4);
//! assert!((lam.total_thickness() - 1.0).abs() < 1e-12);
//!
//! let abd = lam.stiffness().unwrap();
//! assert!(abd.b.amax() < 1e-9); // symmetric stack, no coupling
//! ```

use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::equations::integration::PlyContribution;
use crate::equations::stiffness::ply_global_stiffness;
use crate::equations::transform::{ply_frame_transform, FrameTransform, TransformCache};
use crate::errors::{LaminateError, LaminateResult};
use crate::materials::PlyMaterial;
use crate::tensor::{assemble_abd, Tensor3, Tensor6};

/// One layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    /// Fiber angle from the laminate x-axis, degrees
    pub angle: f64,
    /// Ply thickness
    pub thickness: f64,
    /// Elastic constants in material axes
    #[serde(flatten)]
    pub material: PlyMaterial,
}

impl Ply {
    pub fn new(angle: f64, thickness: f64, material: PlyMaterial) -> Self {
        Ply { angle, thickness, material }
    }
}

/// Altitudes of a ply's bottom and top faces, measured from the mid-plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Through-thickness bounds of every ply.
///
/// Single forward sweep: the first ply starts at −h/2 and each ply starts
/// where the previous one ends.
///
/// # Errors
/// `Configuration` for an empty sequence, a thickness that is not a
/// positive finite number, or thicknesses whose sum overflows.
///
/// # Example
/// ```rust
/// use laminate_core::laminate::ply_bounds;
///
/// let bounds = ply_bounds(&[0.2, 0.6, 0.2]).unwrap();
/// assert!((bounds[0].lower + 0.5).abs() < 1e-12);
/// assert_eq!(bounds[0].upper, bounds[1].lower);
/// assert!((bounds[2].upper - 0.5).abs() < 1e-12);
/// ```
pub fn ply_bounds(thicknesses: &[f64]) -> LaminateResult<Vec<PlyBounds>> {
    if thicknesses.is_empty() {
        return Err(LaminateError::configuration("ply list is empty"));
    }
    for (i, &t) in thicknesses.iter().enumerate() {
        if !t.is_finite() || t <= 0.0 {
            return Err(LaminateError::configuration_at(
                i,
                format!("thickness must be positive (got {})", t),
            ));
        }
    }

    let total: f64 = thicknesses.iter().sum();
    if !total.is_finite() {
        return Err(LaminateError::configuration(format!(
            "total thickness is not finite (sum of {} ply thicknesses overflows)",
            thicknesses.len()
        )));
    }
    let mut lower = -total / 2.0;
    Ok(thicknesses
        .iter()
        .map(|&t| {
            let bounds = PlyBounds { lower, upper: lower + t };
            lower = bounds.upper;
            bounds
        })
        .collect())
}

/// Laminate A, B and D matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaminateStiffness {
    /// Extensional stiffness
    #[serde(with = "crate::tensor::rows")]
    pub a: Tensor3,
    /// Bending-extension coupling
    #[serde(with = "crate::tensor::rows")]
    pub b: Tensor3,
    /// Bending stiffness
    #[serde(with = "crate::tensor::rows")]
    pub d: Tensor3,
}

impl LaminateStiffness {
    /// Sum per-ply contributions
    pub fn from_contributions(contributions: &[PlyContribution]) -> Self {
        contributions.iter().fold(
            LaminateStiffness {
                a: Tensor3::zeros(),
                b: Tensor3::zeros(),
                d: Tensor3::zeros(),
            },
            |acc, c| LaminateStiffness {
                a: acc.a + c.a,
                b: acc.b + c.b,
                d: acc.d + c.d,
            },
        )
    }

    /// 6×6 block matrix `[[A, B], [B, D]]`
    pub fn abd(&self) -> Tensor6 {
        assemble_abd(&self.a, &self.b, &self.d)
    }
}

/// An immutable ply stack with memoized derived quantities.
#[derive(Debug, Clone)]
pub struct Laminate {
    plies: Vec<Ply>,
    bounds: Vec<PlyBounds>,
    total_thickness: f64,
    transforms: OnceCell<TransformCache>,
    local: OnceCell<Vec<Tensor3>>,
    global: OnceCell<Vec<Tensor3>>,
    contributions: OnceCell<Vec<PlyContribution>>,
    stiffness: OnceCell<LaminateStiffness>,
}

impl Laminate {
    /// Build a laminate from an ordered ply list (ply 0 at the bottom).
    ///
    /// # Errors
    /// `Configuration` for an empty list, a non-positive thickness or a
    /// non-finite angle.
    pub fn new(plies: Vec<Ply>) -> LaminateResult<Self> {
        if let Some(i) = plies.iter().position(|p| !p.angle.is_finite()) {
            return Err(LaminateError::configuration_at(
                i,
                format!("angle must be finite (got {})", plies[i].angle),
            ));
        }

        let thicknesses: Vec<f64> = plies.iter().map(|p| p.thickness).collect();
        let bounds = ply_bounds(&thicknesses)?;
        let total_thickness: f64 = thicknesses.iter().sum();

        debug!("laminate built: {} plies, h = {}", plies.len(), total_thickness);

        Ok(Laminate {
            plies,
            bounds,
            total_thickness,
            transforms: OnceCell::new(),
            local: OnceCell::new(),
            global: OnceCell::new(),
            contributions: OnceCell::new(),
            stiffness: OnceCell::new(),
        })
    }

    /// Plies in stacking order
    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    /// Sum of ply thicknesses
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness
    }

    /// Through-thickness bounds, one per ply
    pub fn bounds(&self) -> &[PlyBounds] {
        &self.bounds
    }

    /// Frame transforms for the distinct angles of the stack
    pub fn transforms(&self) -> &TransformCache {
        self.transforms.get_or_init(|| {
            let cache = TransformCache::for_angles(self.plies.iter().map(|p| p.angle));
            debug!("frame transforms built for {} distinct angles", cache.len());
            cache
        })
    }

    /// Frame transform of the ply at `index`
    pub fn frame_transform(&self, index: usize) -> Option<&FrameTransform> {
        let angle = self.plies.get(index)?.angle;
        self.transforms().get(angle)
    }

    /// Q0 of every ply, in stacking order.
    ///
    /// # Errors
    /// `Domain` (with the ply index) for the first ply whose constants are
    /// physically inconsistent.
    pub fn local_stiffnesses(&self) -> LaminateResult<&[Tensor3]> {
        self.local
            .get_or_try_init(|| -> LaminateResult<Vec<Tensor3>> {
                self.plies
                    .iter()
                    .enumerate()
                    .map(|(i, p)| p.material.local_stiffness().map_err(|e| e.at_ply(i)))
                    .collect()
            })
            .map(Vec::as_slice)
    }

    /// Qx of every ply, in stacking order
    pub fn global_stiffnesses(&self) -> LaminateResult<&[Tensor3]> {
        self.global
            .get_or_try_init(|| -> LaminateResult<Vec<Tensor3>> {
                let local = self.local_stiffnesses()?;
                let transforms = self.transforms();
                Ok(self
                    .plies
                    .iter()
                    .zip(local)
                    .map(|(ply, q0)| {
                        // every stack angle is already in the cache
                        let t = transforms
                            .get(ply.angle)
                            .copied()
                            .unwrap_or_else(|| ply_frame_transform(ply.angle));
                        ply_global_stiffness(&t.j_inv, &t.j_t_inv, q0)
                    })
                    .collect())
            })
            .map(Vec::as_slice)
    }

    /// Per-ply A/B/D terms, in stacking order
    pub fn ply_contributions(&self) -> LaminateResult<&[PlyContribution]> {
        self.contributions
            .get_or_try_init(|| -> LaminateResult<Vec<PlyContribution>> {
                let global = self.global_stiffnesses()?;
                Ok(global
                    .iter()
                    .zip(&self.bounds)
                    .map(|(qx, z)| PlyContribution::integrate(qx, z.lower, z.upper))
                    .collect())
            })
            .map(Vec::as_slice)
    }

    /// Laminate A, B, D (summed once, then reused).
    ///
    /// # Errors
    /// `Domain` from the ply constants, or `Configuration` when an entry
    /// overflows to a non-finite value.
    pub fn stiffness(&self) -> LaminateResult<&LaminateStiffness> {
        self.stiffness.get_or_try_init(|| -> LaminateResult<LaminateStiffness> {
            let stiffness = LaminateStiffness::from_contributions(self.ply_contributions()?);
            for (name, m) in [("A", &stiffness.a), ("B", &stiffness.b), ("D", &stiffness.d)] {
                if m.iter().any(|v| !v.is_finite()) {
                    return Err(LaminateError::configuration(format!(
                        "{} matrix is not finite (thickness {} too large for the ply moduli)",
                        name, self.total_thickness
                    )));
                }
            }
            debug!("A/B/D assembled for {} plies", self.plies.len());
            Ok(stiffness)
        })
    }

    /// True when ply k and ply n−1−k match for every k (angle, thickness and
    /// material), which makes B vanish.
    pub fn is_symmetric(&self) -> bool {
        let n = self.plies.len();
        (0..n / 2).all(|k| self.plies[k] == self.plies[n - 1 - k])
    }

    /// Mean transverse modulus, used as the out-of-plane modulus estimate Ez
    pub fn mean_transverse_modulus(&self) -> f64 {
        self.plies.iter().map(|p| p.material.e_t).sum::<f64>() / self.plies.len() as f64
    }
}

/// Build a laminate from parallel per-ply sequences.
///
/// # Errors
/// `Configuration` when the sequences differ in length, are empty, or hold a
/// non-positive thickness.
pub fn build_laminate(
    angles: &[f64],
    thicknesses: &[f64],
    e_l: &[f64],
    e_t: &[f64],
    g_lt: &[f64],
    nu_lt: &[f64],
) -> LaminateResult<Laminate> {
    let n = angles.len();
    let lengths = [
        ("thicknesses", thicknesses.len()),
        ("E_l", e_l.len()),
        ("E_t", e_t.len()),
        ("G_lt", g_lt.len()),
        ("nu_lt", nu_lt.len()),
    ];
    if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != n) {
        return Err(LaminateError::configuration(format!(
            "shape mismatch: {} angles but {} values in {}",
            n, len, name
        )));
    }

    let plies = (0..n)
        .map(|i| Ply::new(angles[i], thicknesses[i], PlyMaterial::new(e_l[i], e_t[i], g_lt[i], nu_lt[i])))
        .collect();
    Laminate::new(plies)
}

/// A, B and D of a laminate.
pub fn laminate_abd(laminate: &Laminate) -> LaminateResult<LaminateStiffness> {
    laminate.stiffness().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::is_symmetric;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn glass() -> PlyMaterial {
        PlyMaterial::new(45600.0, 16200.0, 5830.0, 0.278)
    }

    fn stack(angles: &[f64], t: f64) -> Laminate {
        Laminate::new(angles.iter().map(|&a| Ply::new(a, t, glass())).collect()).unwrap()
    }

    #[test]
    fn test_bounds_are_contiguous_and_centered() {
        let bounds = ply_bounds(&[0.1, 0.3, 0.25, 0.05]).unwrap();
        assert_relative_eq!(bounds[0].lower, -0.35, max_relative = 1e-12);
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
        assert_relative_eq!(bounds[3].upper, 0.35, max_relative = 1e-12);
    }

    #[test]
    fn test_bounds_reject_bad_thickness() {
        let err = ply_bounds(&[0.25, 0.0, 0.25]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.ply_index(), Some(1));

        let err = ply_bounds(&[0.25, -0.1]).unwrap_err();
        assert_eq!(err.ply_index(), Some(1));

        assert!(ply_bounds(&[]).is_err());
    }

    #[test]
    fn test_bounds_reject_overflowing_total() {
        let err = ply_bounds(&[1e308, 1e308]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.ply_index(), None);
        assert!(err.to_string().contains("not finite"));

        let err = build_laminate(&[0.0, 90.0], &[1e308, 1e308], &[45600.0; 2], &[16200.0; 2], &[5830.0; 2], &[0.278; 2])
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_stiffness_overflow_rejected() {
        // finite total, but z³ overflows in D
        let lam = stack(&[0.0], 1e150);
        assert!(lam.total_thickness().is_finite());
        let err = lam.stiffness().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("D matrix is not finite"));
        assert!(laminate_abd(&lam).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        let err = build_laminate(&[0.0, 90.0], &[0.25], &[1.0; 2], &[1.0; 2], &[1.0; 2], &[0.2; 2]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("shape mismatch"));
    }

    #[test]
    fn test_empty_laminate_rejected() {
        assert!(Laminate::new(Vec::new()).is_err());
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let err = Laminate::new(vec![Ply::new(f64::NAN, 0.1, glass())]).unwrap_err();
        assert_eq!(err.ply_index(), Some(0));
    }

    #[test]
    fn test_domain_error_carries_ply_index() {
        let bad = PlyMaterial::new(10000.0, 9000.0, 3000.0, 1.2);
        let lam = Laminate::new(vec![
            Ply::new(0.0, 0.1, glass()),
            Ply::new(45.0, 0.1, glass()),
            Ply::new(90.0, 0.1, bad),
        ])
        .unwrap();

        let err = lam.stiffness().unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.ply_index(), Some(2));
    }

    #[test]
    fn test_transforms_only_for_used_angles() {
        let lam = stack(&[0.0, 45.0, -45.0, 90.0, 90.0, -45.0, 45.0, 0.0], 0.125);
        assert_eq!(lam.transforms().len(), 4);
        assert_eq!(lam.frame_transform(1).unwrap().angle_deg, 45.0);
        assert!(lam.frame_transform(8).is_none());
    }

    #[test]
    fn test_memoized_results_are_stable() {
        let lam = stack(&[0.0, 30.0, -30.0], 0.2);
        let first = *lam.stiffness().unwrap();
        let second = *lam.stiffness().unwrap();
        assert_eq!(first, second);
        assert!(std::ptr::eq(lam.stiffness().unwrap(), lam.stiffness().unwrap()));
    }

    #[test]
    fn test_abd_matrices_symmetric() {
        let lam = stack(&[15.0, -40.0, 70.0, 0.0], 0.2);
        let s = lam.stiffness().unwrap();
        assert!(is_symmetric(&s.a, 1e-12));
        assert!(is_symmetric(&s.b, 1e-12));
        assert!(is_symmetric(&s.d, 1e-12));
        assert!(is_symmetric(&s.abd(), 1e-12));
    }

    #[test]
    fn test_symmetric_stack_has_no_coupling() {
        let lam = stack(&[0.0, 45.0, -45.0, 90.0, 90.0, -45.0, 45.0, 0.0], 0.125);
        assert!(lam.is_symmetric());
        let s = lam.stiffness().unwrap();
        assert_abs_diff_eq!(s.b, Tensor3::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn test_unsymmetric_stack_has_coupling() {
        let lam = stack(&[0.0, 90.0], 0.5);
        assert!(!lam.is_symmetric());
        let s = lam.stiffness().unwrap();
        assert!(s.b[(0, 0)].abs() > 1.0);
    }

    #[test]
    fn test_cross_ply_has_no_shear_extension_coupling() {
        let lam = stack(&[0.0, 90.0, 0.0, 90.0, 90.0], 0.2);
        let a = lam.stiffness().unwrap().a;
        assert_abs_diff_eq!(a[(0, 2)], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a[(2, 0)], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a[(1, 2)], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a[(2, 1)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cross_ply_bending_favors_outer_plies() {
        let lam = stack(&[0.0, 90.0, 90.0, 0.0], 0.25);
        let s = lam.stiffness().unwrap();
        assert_relative_eq!(s.a[(0, 0)], s.a[(1, 1)], max_relative = 1e-12);
        assert_relative_eq!(s.d[(0, 0)], 3592.383, max_relative = 1e-6);
        assert_relative_eq!(s.d[(1, 1)], 1703.008, max_relative = 1e-6);
    }

    #[test]
    fn test_ply_contributions_sum_to_totals() {
        let lam = stack(&[10.0, 50.0, -20.0], 0.3);
        let total = lam.stiffness().unwrap();
        let a: Tensor3 = lam.ply_contributions().unwrap().iter().map(|c| c.a).sum();
        assert_relative_eq!(a, total.a, max_relative = 1e-12);
    }

    #[test]
    fn test_mean_transverse_modulus() {
        let lam = Laminate::new(vec![
            Ply::new(0.0, 0.1, PlyMaterial::new(100.0, 10.0, 5.0, 0.3)),
            Ply::new(0.0, 0.1, PlyMaterial::new(100.0, 30.0, 5.0, 0.3)),
        ])
        .unwrap();
        assert_relative_eq!(lam.mean_transverse_modulus(), 20.0);
    }
}
