//! # Ply Materials
//!
//! Orthotropic elastic constants of a unidirectional ply, plus a small
//! database of common fiber/matrix systems for demos and quick studies.
//!
//! Moduli are in MPa throughout the database; any consistent unit system
//! works for user-supplied values.
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::materials::{CompositeSystem, PlyMaterial};
//!
//! let carbon = CompositeSystem::T300_5208.material();
//! assert!(carbon.validate().is_ok());
//!
//! let custom = PlyMaterial::new(45600.0, 16200.0, 5830.0, 0.278);
//! println!("nu_tl = {:.4}", custom.minor_poisson());
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::stiffness::{minor_poisson_ratio, ply_local_stiffness};
use crate::errors::LaminateResult;
use crate::tensor::Tensor3;

/// Elastic constants of an orthotropic ply in its material axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyMaterial {
    /// Longitudinal (fiber direction) modulus El
    pub e_l: f64,
    /// Transverse modulus Et
    pub e_t: f64,
    /// In-plane shear modulus Glt
    pub g_lt: f64,
    /// Major Poisson ratio ν_lt
    pub nu_lt: f64,
}

impl PlyMaterial {
    pub fn new(e_l: f64, e_t: f64, g_lt: f64, nu_lt: f64) -> Self {
        PlyMaterial { e_l, e_t, g_lt, nu_lt }
    }

    /// Isotropic material: El = Et = E, G = E / (2(1+ν))
    pub fn isotropic(e: f64, nu: f64) -> Self {
        PlyMaterial::new(e, e, e / (2.0 * (1.0 + nu)), nu)
    }

    /// Minor Poisson ratio ν_tl = ν_lt·Et/El
    pub fn minor_poisson(&self) -> f64 {
        minor_poisson_ratio(self.e_l, self.e_t, self.nu_lt)
    }

    /// Reduced stiffness Q0 in material axes
    pub fn local_stiffness(&self) -> LaminateResult<Tensor3> {
        ply_local_stiffness(self.e_l, self.e_t, self.g_lt, self.nu_lt)
    }

    /// Check the constants are physically consistent
    pub fn validate(&self) -> LaminateResult<()> {
        self.local_stiffness().map(|_| ())
    }
}

/// Common unidirectional composite systems.
///
/// Typical handbook values at roughly 60% fiber volume fraction; use them for
/// preliminary sizing, not for certification.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeSystem {
    /// E-glass / epoxy
    #[serde(rename = "GLASS-EPOXY")]
    GlassEpoxy,
    /// T300/5208 carbon / epoxy
    #[serde(rename = "T300-5208")]
    T300_5208,
    /// Kevlar 49 / epoxy
    #[serde(rename = "KEVLAR49-EPOXY")]
    Kevlar49Epoxy,
    /// Boron / epoxy B(4)/5505
    #[serde(rename = "BORON-EPOXY")]
    BoronEpoxy,
}

impl CompositeSystem {
    /// All systems, for listings
    pub const ALL: [CompositeSystem; 4] = [
        CompositeSystem::GlassEpoxy,
        CompositeSystem::T300_5208,
        CompositeSystem::Kevlar49Epoxy,
        CompositeSystem::BoronEpoxy,
    ];

    /// Elastic constants (MPa)
    pub fn material(&self) -> PlyMaterial {
        match self {
            CompositeSystem::GlassEpoxy => PlyMaterial::new(45600.0, 16200.0, 5830.0, 0.278),
            CompositeSystem::T300_5208 => PlyMaterial::new(181000.0, 10300.0, 7170.0, 0.28),
            CompositeSystem::Kevlar49Epoxy => PlyMaterial::new(76000.0, 5500.0, 2300.0, 0.34),
            CompositeSystem::BoronEpoxy => PlyMaterial::new(204000.0, 18500.0, 5590.0, 0.23),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CompositeSystem::GlassEpoxy => "E-Glass/Epoxy",
            CompositeSystem::T300_5208 => "Carbon/Epoxy T300/5208",
            CompositeSystem::Kevlar49Epoxy => "Kevlar 49/Epoxy",
            CompositeSystem::BoronEpoxy => "Boron/Epoxy",
        }
    }
}

impl std::fmt::Display for CompositeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_database_is_consistent() {
        for system in CompositeSystem::ALL {
            let mat = system.material();
            assert!(mat.validate().is_ok(), "{} failed validation", system);
            assert!(mat.e_l > mat.e_t, "{} should be stiffer along the fiber", system);
        }
    }

    #[test]
    fn test_isotropic_shear_modulus() {
        let steel = PlyMaterial::isotropic(200000.0, 0.3);
        assert_relative_eq!(steel.g_lt, 76923.0769, max_relative = 1e-8);
        assert_relative_eq!(steel.minor_poisson(), 0.3);
    }

    #[test]
    fn test_invalid_material() {
        let bad = PlyMaterial::new(10000.0, 9000.0, 3000.0, 1.2);
        let err = bad.validate().unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_system_serialization() {
        let json = serde_json::to_string(&CompositeSystem::T300_5208).unwrap();
        assert_eq!(json, "\"T300-5208\"");
        let back: CompositeSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CompositeSystem::T300_5208);
    }
}
