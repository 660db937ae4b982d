//! # Through-Thickness Integration
//!
//! Contribution of one ply, lying between altitudes `z_l` and `z_u`, to the
//! laminate stiffness matrices. Altitudes are measured from the laminate
//! mid-plane (z = 0).
//!
//! ```text
//!   z_u ┌──────────────────┐  ply k
//!   z_l └──────────────────┘
//!  ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─  mid-plane, z = 0
//! ```
//!
//! Each term is a whole-tensor scalar multiple of the ply's `Qx`.

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor3;

/// A_k = Qx (z_u − z_l)
#[inline]
pub fn extensional_term(qx: &Tensor3, z_l: f64, z_u: f64) -> Tensor3 {
    qx * (z_u - z_l)
}

/// B_k = ½ Qx (z_u² − z_l²)
#[inline]
pub fn coupling_term(qx: &Tensor3, z_l: f64, z_u: f64) -> Tensor3 {
    qx * (0.5 * (z_u * z_u - z_l * z_l))
}

/// D_k = ⅓ Qx (z_u³ − z_l³)
#[inline]
pub fn bending_term(qx: &Tensor3, z_l: f64, z_u: f64) -> Tensor3 {
    qx * ((z_u.powi(3) - z_l.powi(3)) / 3.0)
}

/// The three integrated terms of one ply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyContribution {
    #[serde(with = "crate::tensor::rows")]
    pub a: Tensor3,
    #[serde(with = "crate::tensor::rows")]
    pub b: Tensor3,
    #[serde(with = "crate::tensor::rows")]
    pub d: Tensor3,
}

impl PlyContribution {
    /// Integrate `qx` between `z_l` and `z_u`
    pub fn integrate(qx: &Tensor3, z_l: f64, z_u: f64) -> Self {
        PlyContribution {
            a: extensional_term(qx, z_l, z_u),
            b: coupling_term(qx, z_l, z_u),
            d: bending_term(qx, z_l, z_u),
        }
    }
}
