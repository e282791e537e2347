//! Blade-element momentum (BEM) design library for small horizontal-axis wind turbines.
//!
//! This library provides:
//! - Airfoil polar interpolation over Reynolds number and angle of attack
//! - Per-station BEM updates (induction factors, ideal chord, twist)
//! - Fixed-iteration sweeps over all radial stations
//! - Projection of the airfoil profile onto the designed blade in 3D
//!
//! # Example
//!
//! ```no_run
//! use windblade_calc::{design_blade, AirfoilShape, PolarSample, RotorConstants};
//!
//! # fn run(samples: Vec<PolarSample>, shape: AirfoilShape) -> windblade_calc::Result<()> {
//! let report = design_blade(&RotorConstants::small_s822(), &samples, &shape)?;
//! println!("Cp = {:.4}", report.cp_total);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::doc_markdown)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod constants;
pub mod design;
pub mod error;
pub mod geometry;
pub mod polar;
pub mod section;
pub mod solver;
pub mod vector;

#[cfg(test)]
mod test_support;

// Re-export key types and functions for easy use
pub use constants::RotorConstants;
pub use constants::model_params::{InitialGuess, ProjectionParams, SolverParams};
pub use design::{BladeDesign, DesignReport, StationReport, design_blade};
pub use error::{BladeError, Result};
pub use geometry::{AirfoilShape, GeometryProjector, ProfileSplit, ProjectedProfile, ProjectionMode};
pub use polar::{BestAlpha, PolarPoint, PolarSample, PolarSurface};
pub use section::{BladeSection, SectionSolver, SectionStep, ideal_chord};
pub use solver::{BladeSolver, RotorState, SolveOutcome, SweepResidual};
pub use vector::{Vec2, Vec3};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
