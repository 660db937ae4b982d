//! # Stack Files
//!
//! A stack file is the JSON description of one laminate: who defined it,
//! how results should be reported, and the ordered ply table.
//!
//! ## Structure
//!
//! ```text
//! StackFile
//! ├── meta: StackMetadata (schema version, label, engineer, timestamps)
//! ├── settings: AnalysisSettings (warning threshold, report rounding)
//! └── plies: Vec<PlyRecord> (bottom ply first)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::stack::{PlyRecord, StackFile};
//! use laminate_core::materials::CompositeSystem;
//!
//! let mut stack = StackFile::new("Spar cap", "Jane Engineer");
//! let carbon = CompositeSystem::T300_5208.material();
//! for (i, angle) in [0.0, 45.0, -45.0, 0.0].iter().enumerate() {
//!     stack.push_ply(PlyRecord::new(format!("P{}", i + 1), *angle, 0.125, carbon));
//! }
//!
//! let input = stack.to_input();
//! assert_eq!(input.plies.len(), 4);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::homogenization::{HomogenizationInput, DEFAULT_CONDITION_WARNING};
use crate::errors::LaminateResult;
use crate::laminate::{Laminate, Ply};
use crate::materials::PlyMaterial;

/// Current schema version for stack files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root stack file container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFile {
    pub meta: StackMetadata,

    #[serde(default)]
    pub settings: AnalysisSettings,

    /// Ply table, bottom ply first
    pub plies: Vec<PlyRecord>,
}

impl StackFile {
    /// Create an empty stack.
    pub fn new(label: impl Into<String>, engineer: impl Into<String>) -> Self {
        let now = Utc::now();
        StackFile {
            meta: StackMetadata {
                version: SCHEMA_VERSION.to_string(),
                label: label.into(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            plies: Vec::new(),
        }
    }

    /// Append a ply on top of the stack
    pub fn push_ply(&mut self, ply: PlyRecord) {
        self.plies.push(ply);
        self.touch();
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Plies in stacking order, without the informational fields
    pub fn plies(&self) -> Vec<Ply> {
        self.plies.iter().map(PlyRecord::ply).collect()
    }

    /// Homogenization input for this stack
    pub fn to_input(&self) -> HomogenizationInput {
        HomogenizationInput {
            label: self.meta.label.clone(),
            plies: self.plies(),
            settings: self.settings.clone(),
        }
    }

    /// Build the laminate described by this stack.
    pub fn to_laminate(&self) -> LaminateResult<Laminate> {
        Laminate::new(self.plies())
    }
}

/// Stack file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackMetadata {
    /// Schema version for forward compatibility
    pub version: String,

    /// Laminate name shown in reports
    pub label: String,

    #[serde(default)]
    pub engineer: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Analysis and reporting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Condition number of A/h above which results are flagged
    pub condition_warning_threshold: f64,

    /// Decimals for A, B and D in reports
    pub matrix_decimals: u32,

    /// Decimals for moduli in reports
    pub modulus_decimals: u32,

    /// Decimals for the Poisson ratio in reports
    pub poisson_decimals: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            condition_warning_threshold: DEFAULT_CONDITION_WARNING,
            matrix_decimals: 1,
            modulus_decimals: 1,
            poisson_decimals: 3,
        }
    }
}

/// One row of the ply table.
///
/// `name` and `proportion` are carried into reports only; they never enter
/// the calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "P1",
///   "angle": 45.0,
///   "thickness": 0.25,
///   "e_l": 45600.0,
///   "e_t": 16200.0,
///   "g_lt": 5830.0,
///   "nu_lt": 0.278,
///   "proportion": 12.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlyRecord {
    #[serde(default)]
    pub name: String,

    pub angle: f64,

    pub thickness: f64,

    #[serde(flatten)]
    pub material: PlyMaterial,

    /// Weight fraction, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportion: Option<f64>,
}

impl PlyRecord {
    pub fn new(name: impl Into<String>, angle: f64, thickness: f64, material: PlyMaterial) -> Self {
        PlyRecord {
            name: name.into(),
            angle,
            thickness,
            material,
            proportion: None,
        }
    }

    /// Set the weight fraction (percent)
    pub fn with_proportion(mut self, percent: f64) -> Self {
        self.proportion = Some(percent);
        self
    }

    /// Calculation view of this row
    pub fn ply(&self) -> Ply {
        Ply::new(self.angle, self.thickness, self.material)
    }

    /// Weight fraction, 0 when unspecified
    pub fn proportion_or_zero(&self) -> f64 {
        self.proportion.unwrap_or(0.0)
    }
}
