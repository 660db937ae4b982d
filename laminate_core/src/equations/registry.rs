//! # Equation Registry
//!
//! Central registry of the laminate-theory equations used by the engine.
//! Each equation carries a plain-text formula, a literature reference and
//! the module/function that implements it, so the text report can list
//! exactly what was applied.
//!
//! ## Usage
//!
//! ```rust
//! use laminate_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::LocalStiffness, "ply 0");
//! tracker.record(Equation::LocalStiffness, "ply 1");
//!
//! assert_eq!(tracker.unique_equations(), vec![Equation::LocalStiffness]);
//! println!("{}", Equation::LocalStiffness.metadata().formula_plain);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Literature reference for an equation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Reference {
    /// R.M. Jones, Mechanics of Composite Materials
    Jones { edition: u8, section: &'static str },
    /// D. Gay, Composite Materials: Design and Applications
    Gay { edition: u8, chapter: u8 },
    /// Plain linear algebra / definition
    Definition,
}

impl Reference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            Reference::Jones { edition, section } => {
                format!("Jones, Mechanics of Composite Materials {}ed, Sec. {}", edition, section)
            }
            Reference::Gay { edition, chapter } => {
                format!("Gay, Composite Materials {}ed, Ch. {}", edition, chapter)
            }
            Reference::Definition => "Definition".to_string(),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Categories for grouping equations in the report appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Ply stiffness in material axes
    PlyStiffness,
    /// Axis rotation
    Transformation,
    /// Through-thickness geometry
    Geometry,
    /// A, B, D integration
    LaminateStiffness,
    /// Homogenized engineering constants
    EffectiveProperties,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::PlyStiffness => "Ply Stiffness",
            EquationCategory::Transformation => "Transformation",
            EquationCategory::Geometry => "Geometry",
            EquationCategory::LaminateStiffness => "Laminate Stiffness",
            EquationCategory::EffectiveProperties => "Effective Properties",
        }
    }

    /// Sort order in the appendix (pipeline order)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::PlyStiffness => 1,
            EquationCategory::Transformation => 2,
            EquationCategory::Geometry => 3,
            EquationCategory::LaminateStiffness => 4,
            EquationCategory::EffectiveProperties => 5,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str) -> Self {
        Self { symbol, description }
    }
}

/// Metadata for one equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Literature reference
    pub reference: Reference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Category for grouping
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Every equation applied by a homogenization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    /// ν_tl = ν_lt·Et/El
    MinorPoisson,
    /// Q0 reduced stiffness
    LocalStiffness,
    /// J(θ)
    TransformationMatrix,
    /// Qx = J⁻¹·Q0·(Jᵗ)⁻¹
    GlobalStiffness,
    /// z bounds from the mid-plane
    PlyBounds,
    /// A = Σ Qx (z_u − z_l)
    ExtensionalStiffness,
    /// B = ½ Σ Qx (z_u² − z_l²)
    CouplingStiffness,
    /// D = ⅓ Σ Qx (z_u³ − z_l³)
    BendingStiffness,
    /// Ex, Ey, Gxy, Nuxy from (A/h)⁻¹
    EffectiveConstants,
}

/// All equations in pipeline order
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::MinorPoisson,
    Equation::LocalStiffness,
    Equation::TransformationMatrix,
    Equation::GlobalStiffness,
    Equation::PlyBounds,
    Equation::ExtensionalStiffness,
    Equation::CouplingStiffness,
    Equation::BendingStiffness,
    Equation::EffectiveConstants,
];

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::MinorPoisson => EquationMetadata {
                name: "Minor Poisson Ratio",
                formula_plain: "nu_tl = nu_lt * Et / El",
                reference: Reference::Jones { edition: 2, section: "2.4" },
                variables: vec![
                    Variable::new("nu_lt", "Major Poisson ratio"),
                    Variable::new("El, Et", "Longitudinal and transverse moduli"),
                ],
                category: EquationCategory::PlyStiffness,
                source_module: "equations/stiffness.rs",
                source_function: "minor_poisson_ratio",
            },
            Equation::LocalStiffness => EquationMetadata {
                name: "Reduced Ply Stiffness",
                formula_plain: "Q11 = El/k, Q12 = nu_lt*Et/k, Q21 = nu_tl*El/k, Q22 = Et/k, Q66 = Glt, k = 1 - nu_lt*nu_tl",
                reference: Reference::Jones { edition: 2, section: "2.6" },
                variables: vec![
                    Variable::new("Q0", "Ply stiffness in material axes"),
                    Variable::new("Glt", "In-plane shear modulus"),
                ],
                category: EquationCategory::PlyStiffness,
                source_module: "equations/stiffness.rs",
                source_function: "ply_local_stiffness",
            },
            Equation::TransformationMatrix => EquationMetadata {
                name: "Stress Transformation Matrix",
                formula_plain: "J = [[c^2, s^2, 2sc], [s^2, c^2, -2sc], [-sc, sc, c^2 - s^2]]",
                reference: Reference::Gay { edition: 3, chapter: 11 },
                variables: vec![Variable::new("c, s", "cos and sin of the fiber angle")],
                category: EquationCategory::Transformation,
                source_module: "equations/transform.rs",
                source_function: "transformation_matrix",
            },
            Equation::GlobalStiffness => EquationMetadata {
                name: "Ply Stiffness in Laminate Axes",
                formula_plain: "Qx = J^-1 * Q0 * (J^t)^-1",
                reference: Reference::Jones { edition: 2, section: "2.8" },
                variables: vec![Variable::new("Qx", "Ply stiffness in laminate axes")],
                category: EquationCategory::Transformation,
                source_module: "equations/stiffness.rs",
                source_function: "ply_global_stiffness",
            },
            Equation::PlyBounds => EquationMetadata {
                name: "Ply Altitudes",
                formula_plain: "z_0 = -h/2, z_k = z_(k-1) + t_k",
                reference: Reference::Definition,
                variables: vec![
                    Variable::new("h", "Total laminate thickness"),
                    Variable::new("t_k", "Thickness of ply k"),
                ],
                category: EquationCategory::Geometry,
                source_module: "laminate.rs",
                source_function: "ply_bounds",
            },
            Equation::ExtensionalStiffness => EquationMetadata {
                name: "Extensional Stiffness",
                formula_plain: "A = sum(Qx_k * (z_k - z_(k-1)))",
                reference: Reference::Jones { edition: 2, section: "4.2" },
                variables: vec![Variable::new("A", "In-plane (membrane) stiffness")],
                category: EquationCategory::LaminateStiffness,
                source_module: "equations/integration.rs",
                source_function: "extensional_term",
            },
            Equation::CouplingStiffness => EquationMetadata {
                name: "Coupling Stiffness",
                formula_plain: "B = 1/2 * sum(Qx_k * (z_k^2 - z_(k-1)^2))",
                reference: Reference::Jones { edition: 2, section: "4.2" },
                variables: vec![Variable::new("B", "Bending-extension coupling stiffness")],
                category: EquationCategory::LaminateStiffness,
                source_module: "equations/integration.rs",
                source_function: "coupling_term",
            },
            Equation::BendingStiffness => EquationMetadata {
                name: "Bending Stiffness",
                formula_plain: "D = 1/3 * sum(Qx_k * (z_k^3 - z_(k-1)^3))",
                reference: Reference::Jones { edition: 2, section: "4.2" },
                variables: vec![Variable::new("D", "Bending stiffness")],
                category: EquationCategory::LaminateStiffness,
                source_module: "equations/integration.rs",
                source_function: "bending_term",
            },
            Equation::EffectiveConstants => EquationMetadata {
                name: "Homogenized Engineering Constants",
                formula_plain: "S = (A/h)^-1; Ex = 1/S11, Ey = 1/S22, Gxy = 1/S66, Nuxy = -Ex*S21",
                reference: Reference::Gay { edition: 3, chapter: 12 },
                variables: vec![
                    Variable::new("S", "Compliance of the normalized A matrix"),
                    Variable::new("h", "Total laminate thickness"),
                ],
                category: EquationCategory::EffectiveProperties,
                source_module: "calculations/homogenization.rs",
                source_function: "extract_properties",
            },
        }
    }
}

// ============================================================================
// Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Where it was used (e.g., "ply 3")
    pub context: String,
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage {
            equation,
            context: context.into(),
        });
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used, in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group unique equations by category, in pipeline order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}
