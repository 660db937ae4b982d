//! # laminate_core - Laminate Homogenization Engine
//!
//! `laminate_core` computes the effective in-plane engineering constants of
//! a laminated composite plate with Classical Laminate Theory (CLT). Given
//! the stacking sequence and the elastic constants of each ply it builds the
//! ply stiffnesses, rotates them into laminate axes, integrates them through
//! the thickness into the A, B and D matrices, and extracts Ex, Ey, Gxy and
//! νxy from the normalized extensional stiffness.
//!
//! ## Design Philosophy
//!
//! - **Immutable**: a [`Laminate`] never changes after construction; derived
//!   tensors are computed on first use and memoized
//! - **JSON-First**: inputs, results and errors implement Serialize/Deserialize
//! - **Rich Errors**: every failure names the violated rule and the offending ply
//!
//! ## Quick Start
//!
//! ```rust
//! use laminate_core::{build_laminate, effective_properties, laminate_abd};
//!
//! let lam = build_laminate(
//!     &[0.0, 90.0, 90.0, 0.0],
//!     &[0.25; 4],
//!     &[45600.0; 4],
//!     &[16200.0; 4],
//!     &[5830.0; 4],
//!     &[0.278; 4],
//! )?;
//!
//! let abd = laminate_abd(&lam)?;
//! assert!(abd.d[(0, 0)] > abd.d[(1, 1)]);
//!
//! let props = effective_properties(&lam)?;
//! println!("Ex = {:.1} MPa, nuxy = {:.3}", props.ex, props.nuxy);
//! # Ok::<(), laminate_core::LaminateError>(())
//! ```
//!
//! ## Modules
//!
//! - [`equations`] - CLT formulas: frame transform, ply stiffness, integration
//! - [`laminate`] - Ply stack, geometry and memoized A/B/D
//! - [`calculations`] - Homogenization pipeline and effective constants
//! - [`materials`] - Ply material type and common composite systems
//! - [`stack`] - Stack file data model and analysis settings
//! - [`file_io`] - Stack file load/save and report output
//! - [`report`] - Plain-text report
//! - [`tensor`] - Matrix types and helpers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod laminate;
pub mod materials;
pub mod report;
pub mod stack;
pub mod tensor;

// Re-export commonly used types at crate root for convenience
pub use calculations::homogenization::{effective_properties, EffectiveProperties};
pub use equations::stiffness::{ply_global_stiffness, ply_local_stiffness};
pub use equations::transform::{ply_frame_transform, FrameTransform};
pub use errors::{LaminateError, LaminateResult};
pub use file_io::{load_stack, save_report, save_stack};
pub use laminate::{build_laminate, laminate_abd, Laminate, LaminateStiffness, Ply};
pub use materials::PlyMaterial;
pub use stack::{AnalysisSettings, StackFile};
pub use tensor::{Tensor3, Tensor6};
