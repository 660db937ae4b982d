//! # Laminate Theory Equations
//!
//! Every formula of the homogenization pipeline lives here, as small pure
//! functions. Keeping them in one place makes them easy to check against the
//! literature and keeps the laminate and calculation modules free of
//! arithmetic detail.
//!
//! ## Modules
//!
//! - [`transform`] - Ply frame transformation J(θ) and its inverse
//! - [`stiffness`] - Reduced ply stiffness Q0 and rotated stiffness Qx
//! - [`integration`] - Per-ply A, B, D terms
//! - [`registry`] - Equation metadata and usage tracking for reports
//!
//! ## Conventions
//!
//! - **Angles**: degrees, measured from the laminate x-axis to the fiber,
//!   positive counter-clockwise
//! - **Altitude z**: measured from the mid-plane, positive upward; ply 0 is
//!   the bottom ply
//! - **Shear strain**: engineering shear γxy = 2εxy
//!
//! ## References
//!
//! - R.M. Jones, Mechanics of Composite Materials, 2nd Edition
//! - D. Gay, Composite Materials: Design and Applications, 3rd Edition

pub mod integration;
pub mod registry;
pub mod stiffness;
pub mod transform;

pub use integration::{bending_term, coupling_term, extensional_term, PlyContribution};
pub use registry::{Equation, EquationCategory, EquationTracker, Reference, ALL_EQUATIONS};
pub use stiffness::{minor_poisson_ratio, ply_global_stiffness, ply_local_stiffness};
pub use transform::{ply_frame_transform, transformation_matrix, FrameTransform, TransformCache};
