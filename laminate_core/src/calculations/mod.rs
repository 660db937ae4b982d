//! # Laminate Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> LaminateResult<*Result>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`homogenization`] - Effective in-plane constants of a laminate (CLT)

pub mod homogenization;

pub use homogenization::{
    calculate, effective_properties, extract_properties, EffectiveProperties, HomogenizationInput,
    HomogenizationResult, PlyResult, StageTiming,
};
