//! # Laminate Homogenization
//!
//! Replaces a ply stack by an equivalent homogeneous plate and reports its
//! in-plane engineering constants.
//!
//! ## Method
//!
//! 1. Q0 of each ply in material axes, rotated to laminate axes (Qx)
//! 2. Through-thickness integration of Qx into A, B, D
//! 3. Normalized extensional stiffness `Ā = A / h`, inverted to `S = Ā⁻¹`
//! 4. `Ex = 1/S11`, `Ey = 1/S22`, `Gxy = 1/S66`, `νxy = −Ex·S21`
//!
//! Only A enters the constants; B and D are reported alongside. For an
//! unsymmetric stack the constants describe the membrane response with the
//! plate held flat.
//!
//! ## Conditioning
//!
//! `Ā` is rejected as singular when its 2-norm condition number exceeds
//! `1/ε` (ε = machine epsilon). Above the warning threshold (1e10 by default)
//! the constants are still returned but flagged.
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::calculations::homogenization::{calculate, HomogenizationInput};
//! use laminate_core::laminate::Ply;
//! use laminate_core::materials::CompositeSystem;
//!
//! let glass = CompositeSystem::GlassEpoxy.material();
//! let input = HomogenizationInput {
//!     label: "Cross-ply".to_string(),
//!     plies: [0.0, 90.0, 90.0, 0.0].iter().map(|&a| Ply::new(a, 0.25, glass)).collect(),
//!     settings: Default::default(),
//! };
//!
//! let result = calculate(&input).unwrap();
//! let props = result.properties.unwrap();
//! assert!((props.ex - props.ey).abs() < 1e-6);
//! assert!(result.warnings.is_empty());
//! ```

use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::equations::registry::{Equation, EquationTracker};
use crate::errors::{LaminateError, LaminateResult};
use crate::laminate::{Laminate, LaminateStiffness, Ply, PlyBounds};
use crate::stack::AnalysisSettings;
use crate::tensor::{condition_number, Tensor3, Tensor6};

/// Condition number above which `Ā` is treated as singular
pub const SINGULAR_CONDITION_LIMIT: f64 = 1.0 / f64::EPSILON;

/// Default condition number above which a warning is raised
pub const DEFAULT_CONDITION_WARNING: f64 = 1e10;

/// Equivalent in-plane engineering constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveProperties {
    /// Modulus along x
    pub ex: f64,
    /// Modulus along y
    pub ey: f64,
    /// In-plane shear modulus
    pub gxy: f64,
    /// Poisson ratio (contraction along y under load along x)
    pub nuxy: f64,
}

/// Condition number of `Ā`, or `SingularMatrix` when it cannot be inverted
/// reliably.
fn checked_condition(a_bar: &Tensor3) -> LaminateResult<f64> {
    let cond = condition_number(a_bar);
    if cond.is_nan() {
        return Err(LaminateError::singular_matrix(
            "normalized extensional stiffness has non-finite entries",
        ));
    }
    if cond > SINGULAR_CONDITION_LIMIT {
        return Err(LaminateError::singular_matrix(format!(
            "normalized extensional stiffness is singular (condition number {:.3e})",
            cond
        )));
    }
    Ok(cond)
}

/// Effective constants from the extensional stiffness `a` of a laminate of
/// thickness `total_thickness`.
///
/// # Errors
/// `Configuration` for a non-positive thickness; `SingularMatrix` when `A/h`
/// holds non-finite entries, cannot be inverted, or is conditioned worse than
/// `1/ε`.
pub fn extract_properties(a: &Tensor3, total_thickness: f64) -> LaminateResult<EffectiveProperties> {
    extract_with_condition(a, total_thickness).map(|(props, _)| props)
}

/// Effective constants together with the condition number of `A/h`.
fn extract_with_condition(a: &Tensor3, total_thickness: f64) -> LaminateResult<(EffectiveProperties, f64)> {
    if !total_thickness.is_finite() || total_thickness <= 0.0 {
        return Err(LaminateError::configuration(format!(
            "total thickness must be positive (got {})",
            total_thickness
        )));
    }

    let a_bar = a / total_thickness;
    let cond = checked_condition(&a_bar)?;

    let s = a_bar
        .try_inverse()
        .ok_or_else(|| LaminateError::singular_matrix("normalized extensional stiffness is not invertible"))?;

    let ex = 1.0 / s[(0, 0)];
    let props = EffectiveProperties {
        ex,
        ey: 1.0 / s[(1, 1)],
        gxy: 1.0 / s[(2, 2)],
        nuxy: -ex * s[(1, 0)],
    };
    Ok((props, cond))
}

/// Effective constants of a laminate.
///
/// Reuses the laminate's memoized A matrix. Logs a warning when `Ā` is
/// near-singular (condition number above 1e10).
///
/// # Example
/// ```rust
/// use laminate_core::{build_laminate, effective_properties};
///
/// let lam = build_laminate(&[0.0], &[0.4], &[45600.0], &[16200.0], &[5830.0], &[0.278]).unwrap();
/// let props = effective_properties(&lam).unwrap();
/// assert!((props.ex - 45600.0).abs() < 1e-6);
/// assert!((props.nuxy - 0.278).abs() < 1e-12);
/// ```
pub fn effective_properties(laminate: &Laminate) -> LaminateResult<EffectiveProperties> {
    let a = laminate.stiffness()?.a;
    let (props, cond) = extract_with_condition(&a, laminate.total_thickness())?;
    if cond > DEFAULT_CONDITION_WARNING {
        warn!("extensional stiffness is ill-conditioned (condition number {:.3e})", cond);
    }
    Ok(props)
}

// ============================================================================
// Calculation pipeline
// ============================================================================

/// Input for a homogenization run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Cross-ply",
///   "plies": [
///     { "angle": 0.0, "thickness": 0.25, "e_l": 45600.0, "e_t": 16200.0, "g_lt": 5830.0, "nu_lt": 0.278 },
///     { "angle": 90.0, "thickness": 0.25, "e_l": 45600.0, "e_t": 16200.0, "g_lt": 5830.0, "nu_lt": 0.278 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomogenizationInput {
    /// User label for this laminate
    pub label: String,
    /// Plies in stacking order, bottom first
    pub plies: Vec<Ply>,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

/// Per-ply intermediate results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlyResult {
    pub index: usize,
    pub angle: f64,
    pub thickness: f64,
    pub bounds: PlyBounds,
    /// Stiffness in material axes
    #[serde(with = "crate::tensor::rows")]
    pub q0: Tensor3,
    /// Stiffness in laminate axes
    #[serde(with = "crate::tensor::rows")]
    pub qx: Tensor3,
}

/// Wall-clock time spent in one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: String,
    pub seconds: f64,
}

/// Result of a homogenization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomogenizationResult {
    pub label: String,
    pub ply_count: usize,
    pub total_thickness: f64,
    /// True when the stack mirrors about its mid-plane
    pub symmetric: bool,
    pub plies: Vec<PlyResult>,
    /// A, B and D
    pub stiffness: LaminateStiffness,
    /// 6×6 `[[A, B], [B, D]]`
    #[serde(with = "crate::tensor::rows")]
    pub abd: Tensor6,
    /// Effective constants; `None` when A/h could not be inverted
    pub properties: Option<EffectiveProperties>,
    /// Why the constants are missing
    pub extraction_error: Option<LaminateError>,
    /// Out-of-plane modulus estimate (mean ply transverse modulus)
    pub ez_estimate: f64,
    /// 2-norm condition number of A/h, when the constants were extracted
    pub condition_number: Option<f64>,
    pub warnings: Vec<String>,
    pub timings: Vec<StageTiming>,
    /// Equations applied, for the report appendix
    pub equations: EquationTracker,
}

/// Run the full homogenization pipeline.
///
/// A singular `A/h` does not fail the run: A, B and D are still returned,
/// with `properties` left empty and the cause in `extraction_error`.
///
/// # Errors
/// `Configuration` for a malformed stack, `Domain` for inconsistent ply
/// constants (both carrying the ply index).
pub fn calculate(input: &HomogenizationInput) -> LaminateResult<HomogenizationResult> {
    let mut timings = Vec::new();
    let mut stage = |name: &str, start: Instant| {
        timings.push(StageTiming {
            stage: name.to_string(),
            seconds: start.elapsed().as_secs_f64(),
        });
    };

    let start = Instant::now();
    let laminate = Laminate::new(input.plies.clone())?;
    stage("geometry", start);

    let start = Instant::now();
    let local = laminate.local_stiffnesses()?;
    let global = laminate.global_stiffnesses()?;
    stage("ply stiffness", start);

    let start = Instant::now();
    let stiffness = *laminate.stiffness()?;
    let abd = stiffness.abd();
    stage("laminate stiffness", start);

    let start = Instant::now();
    let extraction = match extract_with_condition(&stiffness.a, laminate.total_thickness()) {
        Err(e) if !matches!(e, LaminateError::SingularMatrix { .. }) => return Err(e),
        other => other,
    };
    stage("effective properties", start);

    let mut warnings = Vec::new();
    let (properties, cond, extraction_error) = match extraction {
        Ok((props, cond)) => {
            if cond > input.settings.condition_warning_threshold {
                let msg = format!(
                    "extensional stiffness is ill-conditioned (condition number {:.3e}); effective constants may be inaccurate",
                    cond
                );
                warn!("{}: {}", input.label, msg);
                warnings.push(msg);
            }
            debug!(
                "{}: Ex = {:.3}, Ey = {:.3}, Gxy = {:.3}, nuxy = {:.5}",
                input.label, props.ex, props.ey, props.gxy, props.nuxy
            );
            (Some(props), Some(cond), None)
        }
        Err(e) => {
            warn!("{}: {}; A, B and D are still reported", input.label, e);
            (None, None, Some(e))
        }
    };

    let mut equations = EquationTracker::new();
    for i in 0..laminate.ply_count() {
        let ctx = format!("ply {}", i);
        equations.record(Equation::MinorPoisson, ctx.clone());
        equations.record(Equation::LocalStiffness, ctx.clone());
        equations.record(Equation::TransformationMatrix, ctx.clone());
        equations.record(Equation::GlobalStiffness, ctx.clone());
        equations.record(Equation::PlyBounds, ctx.clone());
        equations.record(Equation::ExtensionalStiffness, ctx.clone());
        equations.record(Equation::CouplingStiffness, ctx.clone());
        equations.record(Equation::BendingStiffness, ctx);
    }
    if properties.is_some() {
        equations.record(Equation::EffectiveConstants, "laminate");
    }

    let plies = laminate
        .plies()
        .iter()
        .zip(laminate.bounds())
        .zip(local.iter().zip(global))
        .enumerate()
        .map(|(index, ((ply, bounds), (q0, qx)))| PlyResult {
            index,
            angle: ply.angle,
            thickness: ply.thickness,
            bounds: *bounds,
            q0: *q0,
            qx: *qx,
        })
        .collect();

    Ok(HomogenizationResult {
        label: input.label.clone(),
        ply_count: laminate.ply_count(),
        total_thickness: laminate.total_thickness(),
        symmetric: laminate.is_symmetric(),
        plies,
        stiffness,
        abd,
        properties,
        extraction_error,
        ez_estimate: laminate.mean_transverse_modulus(),
        condition_number: cond,
        warnings,
        timings,
        equations,
    })
}
