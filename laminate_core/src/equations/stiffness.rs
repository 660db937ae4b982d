//! # Ply Stiffness Formulas
//!
//! Reduced (plane-stress) stiffness of a single orthotropic ply, first in its
//! material axes and then rotated into the laminate axes.
//!
//! ## Notation
//!
//! - `El`, `Et` = longitudinal / transverse moduli
//! - `Glt` = in-plane shear modulus
//! - `ν_lt` = major Poisson ratio, `ν_tl = ν_lt·Et/El` = minor Poisson ratio
//! - `Q0` = stiffness in material axes, `Qx` = stiffness in laminate axes

use crate::errors::{LaminateError, LaminateResult};
use crate::tensor::Tensor3;

/// Minor Poisson ratio from compliance reciprocity.
///
/// # Formula
/// ν_tl = ν_lt × Et / El
#[inline]
pub fn minor_poisson_ratio(e_l: f64, e_t: f64, nu_lt: f64) -> f64 {
    nu_lt * e_t / e_l
}

/// Reduced stiffness tensor of a ply in its material axes.
///
/// # Formula
/// ```text
/// Δ = 1 - ν_lt·ν_tl
///
/// Q0 = [ El/Δ        ν_lt·Et/Δ   0   ]
///      [ ν_tl·El/Δ   Et/Δ        0   ]
///      [ 0           0           Glt ]
/// ```
///
/// # Errors
/// `Domain` when a modulus is not strictly positive, a constant is not
/// finite, or `ν_lt·ν_tl ≥ 1`.
///
/// # Example
/// ```rust
/// use laminate_core::equations::stiffness::ply_local_stiffness;
///
/// let q0 = ply_local_stiffness(45600.0, 16200.0, 5830.0, 0.278).unwrap();
/// assert!((q0[(0, 0)] - 46887.35).abs() < 0.01);
/// assert!((q0[(0, 1)] - q0[(1, 0)]).abs() < 1e-9);
///
/// assert!(ply_local_stiffness(10000.0, 9000.0, 3000.0, 1.1).is_err());
/// ```
pub fn ply_local_stiffness(e_l: f64, e_t: f64, g_lt: f64, nu_lt: f64) -> LaminateResult<Tensor3> {
    for (name, value) in [("E_l", e_l), ("E_t", e_t), ("G_lt", g_lt)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(LaminateError::domain(format!(
                "{} must be a positive finite modulus (got {})",
                name, value
            )));
        }
    }
    if !nu_lt.is_finite() {
        return Err(LaminateError::domain(format!("nu_lt must be finite (got {})", nu_lt)));
    }

    let nu_tl = minor_poisson_ratio(e_l, e_t, nu_lt);
    let denom = 1.0 - nu_lt * nu_tl;
    if denom <= 0.0 {
        return Err(LaminateError::domain(format!(
            "nu_lt * nu_tl must be < 1 (got {:.4} with nu_lt = {}, nu_tl = {:.4})",
            nu_lt * nu_tl,
            nu_lt,
            nu_tl
        )));
    }

    Ok(Tensor3::new(
        e_l / denom,         nu_lt * e_t / denom, 0.0,
        nu_tl * e_l / denom, e_t / denom,         0.0,
        0.0,                 0.0,                 g_lt,
    ))
}

/// Rotate a local stiffness tensor into laminate axes.
///
/// # Formula
/// Qx = J⁻¹ · Q0 · (Jᵗ)⁻¹
///
/// Inputs come from [`crate::equations::transform::ply_frame_transform`].
#[inline]
pub fn ply_global_stiffness(j_inv: &Tensor3, j_t_inv: &Tensor3, q0: &Tensor3) -> Tensor3 {
    j_inv * q0 * j_t_inv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::transform::ply_frame_transform;
    use crate::tensor::is_symmetric;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const EL: f64 = 45600.0;
    const ET: f64 = 16200.0;
    const GLT: f64 = 5830.0;
    const NULT: f64 = 0.278;

    fn q0() -> Tensor3 {
        ply_local_stiffness(EL, ET, GLT, NULT).unwrap()
    }

    fn qx(angle: f64) -> Tensor3 {
        let t = ply_frame_transform(angle);
        ply_global_stiffness(&t.j_inv, &t.j_t_inv, &q0())
    }

    #[test]
    fn test_local_stiffness_values() {
        let q = q0();
        assert_relative_eq!(q[(0, 0)], 46887.346, max_relative = 1e-6);
        assert_relative_eq!(q[(1, 1)], 16657.347, max_relative = 1e-6);
        assert_relative_eq!(q[(0, 1)], 4630.742, max_relative = 1e-6);
        assert_eq!(q[(2, 2)], GLT);
        assert_eq!(q[(0, 2)], 0.0);
    }

    #[test]
    fn test_local_stiffness_is_symmetric() {
        assert!(is_symmetric(&q0(), 1e-12));
    }

    #[test]
    fn test_poisson_product_rejected() {
        // 0.9 * (0.9 * 9000/10000) = 0.729 < 1, still valid
        assert!(ply_local_stiffness(10000.0, 9000.0, 3000.0, 0.9).is_ok());

        let err = ply_local_stiffness(10000.0, 9000.0, 3000.0, 1.2).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert!(err.to_string().contains("nu_lt * nu_tl"));
    }

    #[test]
    fn test_non_positive_modulus_rejected() {
        assert!(ply_local_stiffness(0.0, ET, GLT, NULT).is_err());
        assert!(ply_local_stiffness(EL, -1.0, GLT, NULT).is_err());
        assert!(ply_local_stiffness(EL, ET, f64::NAN, NULT).is_err());
        assert!(ply_local_stiffness(EL, ET, GLT, f64::INFINITY).is_err());
    }

    #[test]
    fn test_zero_angle_is_exact() {
        assert_eq!(qx(0.0), q0());
    }

    #[test]
    fn test_ninety_degrees_swaps_axes() {
        let q = qx(90.0);
        assert_relative_eq!(q[(0, 0)], q0()[(1, 1)], max_relative = 1e-12);
        assert_relative_eq!(q[(1, 1)], q0()[(0, 0)], max_relative = 1e-12);
        assert_abs_diff_eq!(q[(0, 2)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_global_stiffness_symmetric() {
        for angle in [-75.0, -45.0, 15.0, 30.0, 60.0] {
            assert!(is_symmetric(&qx(angle), 1e-12), "Qx not symmetric at {}°", angle);
        }
    }

    #[test]
    fn test_angle_periodicity() {
        for angle in [-45.0, 0.0, 20.0, 45.0, 90.0] {
            assert_relative_eq!(qx(angle), qx(angle + 180.0), epsilon = 1e-8, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_plus_minus_45_shear_coupling_flips() {
        let plus = qx(45.0);
        let minus = qx(-45.0);
        assert_relative_eq!(plus[(0, 2)], -minus[(0, 2)], max_relative = 1e-12);
        assert_relative_eq!(plus[(0, 0)], minus[(0, 0)], max_relative = 1e-12);
    }
}
