//! # Text Report
//!
//! Plain-text report of a homogenization run: stack summary, ply table,
//! rounded A/B/D, effective constants, warnings, the equations applied and
//! stage timings. Rounding follows the stack's [`AnalysisSettings`].
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::calculations::homogenization::calculate;
//! use laminate_core::materials::CompositeSystem;
//! use laminate_core::report::render_report;
//! use laminate_core::stack::{PlyRecord, StackFile};
//!
//! let mut stack = StackFile::new("Demo", "Engineer");
//! stack.push_ply(PlyRecord::new("P1", 0.0, 0.5, CompositeSystem::GlassEpoxy.material()));
//! stack.push_ply(PlyRecord::new("P2", 90.0, 0.5, CompositeSystem::GlassEpoxy.material()));
//!
//! let result = calculate(&stack.to_input()).unwrap();
//! let text = render_report(&stack, &result);
//! assert!(text.contains("Ex (MPa)"));
//! ```

use std::fmt::Write;

use crate::calculations::homogenization::{HomogenizationResult, StageTiming};
use crate::stack::{AnalysisSettings, StackFile};
use crate::tensor::{rounded, Tensor3};

const RULE: &str = "═══════════════════════════════════════════════════════════";

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}", RULE);
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

/// Matrix rounded to `decimals`, columns right-aligned to a common width.
pub fn format_matrix(m: &Tensor3, decimals: u32) -> String {
    let r = rounded(m, decimals);
    let cells: Vec<String> = r.iter().map(|v| format!("{:.*}", decimals as usize, v)).collect();
    let width = cells.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for i in 0..3 {
        // nalgebra storage is column-major
        let row: Vec<String> = (0..3).map(|j| format!("{:>w$}", cells[j * 3 + i], w = width)).collect();
        let _ = writeln!(out, "  [ {} ]", row.join("  "));
    }
    out
}

fn input_table(out: &mut String, stack: &StackFile) {
    let _ = writeln!(
        out,
        "  {:<8} {:>8} {:>9} {:>10} {:>10} {:>9} {:>7} {:>8}",
        "Ply", "angle", "t", "El", "Et", "Glt", "nu_lt", "prop %"
    );
    for (i, rec) in stack.plies.iter().enumerate() {
        let name = if rec.name.is_empty() {
            format!("#{}", i + 1)
        } else {
            rec.name.clone()
        };
        let _ = writeln!(
            out,
            "  {:<8} {:>8.1} {:>9.4} {:>10.1} {:>10.1} {:>9.1} {:>7.3} {:>8.1}",
            name,
            rec.angle,
            rec.thickness,
            rec.material.e_l,
            rec.material.e_t,
            rec.material.g_lt,
            rec.material.nu_lt,
            rec.proportion_or_zero()
        );
    }
}

fn round_to(v: f64, decimals: u32) -> f64 {
    let f = 10f64.powi(decimals as i32);
    (v * f).round() / f + 0.0
}

fn constants(out: &mut String, result: &HomogenizationResult, s: &AnalysisSettings) {
    let md = s.modulus_decimals as usize;
    let pd = s.poisson_decimals as usize;
    let ez = round_to(result.ez_estimate, s.modulus_decimals);

    let p = match &result.properties {
        Some(p) => p,
        None => {
            let reason = result
                .extraction_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no constants extracted".to_string());
            let _ = writeln!(out, "  Not available: {}", reason);
            let _ = writeln!(out, "  Ez (MPa)   : {:.*}  (mean ply Et)", md, ez);
            return;
        }
    };
    let _ = writeln!(out, "  Ex (MPa)   : {:.*}", md, round_to(p.ex, s.modulus_decimals));
    let _ = writeln!(out, "  Ey (MPa)   : {:.*}", md, round_to(p.ey, s.modulus_decimals));
    let _ = writeln!(out, "  Ez (MPa)   : {:.*}  (mean ply Et)", md, ez);
    let _ = writeln!(out, "  Gxy (MPa)  : {:.*}", md, round_to(p.gxy, s.modulus_decimals));
    let _ = writeln!(out, "  Nuxy       : {:.*}", pd, round_to(p.nuxy, s.poisson_decimals));
    if let Some(cond) = result.condition_number {
        let _ = writeln!(out, "  cond(A/h)  : {:.3e}", cond);
    }
}

/// One line per stage followed by the total.
pub fn format_timings(timings: &[StageTiming]) -> String {
    let mut out = String::new();
    for t in timings {
        let _ = writeln!(out, "  {:<22} {:.3} s", t.stage, t.seconds);
    }
    let total: f64 = timings.iter().map(|t| t.seconds).sum();
    let _ = writeln!(out, "  {:<22} {:.3} s", "total", total);
    out
}

/// Render the full report for `stack` and its result.
pub fn render_report(stack: &StackFile, result: &HomogenizationResult) -> String {
    let s = &stack.settings;
    let mut out = String::new();

    banner(&mut out, &format!("LAMINATE HOMOGENIZATION - {}", result.label));
    if !stack.meta.engineer.is_empty() {
        let _ = writeln!(out, "Engineer: {}", stack.meta.engineer);
    }
    let _ = writeln!(out, "Plies:           {}", result.ply_count);
    let _ = writeln!(out, "Total thickness: {:.3} mm", result.total_thickness);
    let _ = writeln!(
        out,
        "Stacking:        {}",
        if result.symmetric { "symmetric" } else { "unsymmetric (B != 0)" }
    );

    section(&mut out, "Input");
    input_table(&mut out, stack);

    section(&mut out, "Laminate stiffness");
    let _ = writeln!(out, "A (N/mm):");
    out.push_str(&format_matrix(&result.stiffness.a, s.matrix_decimals));
    let _ = writeln!(out, "B (N):");
    out.push_str(&format_matrix(&result.stiffness.b, s.matrix_decimals));
    let _ = writeln!(out, "D (N.mm):");
    out.push_str(&format_matrix(&result.stiffness.d, s.matrix_decimals));

    section(&mut out, "Effective properties");
    constants(&mut out, result, s);

    if !result.warnings.is_empty() {
        section(&mut out, "Warnings");
        for w in &result.warnings {
            let _ = writeln!(out, "  [WARN] {}", w);
        }
    }

    section(&mut out, "Equations");
    for (category, equations) in result.equations.by_category() {
        let _ = writeln!(out, "  {}", category.display_name());
        for eq in equations {
            let meta = eq.metadata();
            let _ = writeln!(out, "    {:<28} {}", meta.name, meta.formula_plain);
            let _ = writeln!(out, "    {:<28} ({})", "", meta.reference.citation());
        }
    }

    section(&mut out, "Timings");
    out.push_str(&format_timings(&result.timings));

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::homogenization::calculate;
    use crate::materials::{CompositeSystem, PlyMaterial};
    use crate::stack::PlyRecord;

    fn cross_ply() -> (StackFile, HomogenizationResult) {
        let mut stack = StackFile::new("Cross-ply", "Engineer");
        let glass = CompositeSystem::GlassEpoxy.material();
        for (i, angle) in [0.0, 90.0, 90.0, 0.0].iter().enumerate() {
            stack.push_ply(PlyRecord::new(format!("P{}", i + 1), *angle, 0.25, glass));
        }
        let result = calculate(&stack.to_input()).unwrap();
        (stack, result)
    }

    #[test]
    fn test_format_matrix_rounds_and_aligns() {
        let m = Tensor3::new(31772.346, 4630.742, 0.0, 4630.742, 31772.346, -1e-12, 0.0, -1e-12, 5830.0);
        let text = format_matrix(&m, 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  [ 31772.3   4630.7      0.0 ]");
        assert!(!text.contains("-0.0"));
    }

    #[test]
    fn test_report_sections() {
        let (stack, result) = cross_ply();
        let text = render_report(&stack, &result);

        for heading in ["Input", "Laminate stiffness", "Effective properties", "Equations", "Timings"] {
            assert!(text.contains(heading), "missing section {}", heading);
        }
        assert!(text.contains("Plies:           4"));
        assert!(text.contains("Total thickness: 1.000 mm"));
        assert!(text.contains("P3"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_report_constants_use_settings() {
        let (mut stack, result) = cross_ply();
        let text = render_report(&stack, &result);
        assert!(text.contains("Ex (MPa)   : 31097.4"));
        assert!(text.contains("Gxy (MPa)  : 5830.0"));
        assert!(text.contains("Nuxy       : 0.146"));
        assert!(text.contains("Ez (MPa)   : 16200.0"));

        stack.settings.modulus_decimals = 0;
        stack.settings.poisson_decimals = 5;
        let text = render_report(&stack, &result);
        assert!(text.contains("Ex (MPa)   : 31097\n"));
        assert!(text.contains("Nuxy       : 0.14575"));
    }

    #[test]
    fn test_report_lists_warnings() {
        let (stack, mut result) = cross_ply();
        result.warnings.push("extensional stiffness is ill-conditioned".to_string());
        let text = render_report(&stack, &result);
        assert!(text.contains("[WARN] extensional stiffness is ill-conditioned"));
    }

    #[test]
    fn test_singular_stack_still_reports_matrices() {
        let mut stack = StackFile::new("Degenerate", "");
        stack.push_ply(PlyRecord::new("P1", 0.0, 1.0, PlyMaterial::new(1.0e5, 1.0e-13, 1.0, 0.0)));
        let result = calculate(&stack.to_input()).unwrap();
        let text = render_report(&stack, &result);

        assert!(text.contains("A (N/mm):"));
        assert!(text.contains("  [ 100000.0       0.0       0.0 ]"));
        assert!(text.contains("Not available: Singular matrix"));
        assert!(text.contains("Ez (MPa)   : 0.0"));
        assert!(!text.contains("Ex (MPa)"));
        assert!(!text.contains("cond(A/h)"));
    }

    #[test]
    fn test_timings_total_includes_every_stage() {
        let timings = [
            StageTiming { stage: "read input".to_string(), seconds: 0.25 },
            StageTiming { stage: "write report".to_string(), seconds: 0.5 },
        ];
        let text = format_timings(&timings);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  write report"));
        assert!(lines[2].contains("total") && lines[2].ends_with("0.750 s"));
    }

    #[test]
    fn test_unnamed_plies_get_index() {
        let mut stack = StackFile::new("Plain", "");
        stack.push_ply(PlyRecord::new("", 0.0, 1.0, CompositeSystem::BoronEpoxy.material()));
        let result = calculate(&stack.to_input()).unwrap();
        let text = render_report(&stack, &result);
        assert!(text.contains("#1"));
        assert!(!text.contains("Engineer:"));
    }
}
