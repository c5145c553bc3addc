//! Steady-state relaxation solver for DC power trees.
//!
//! Voltages sweep from sources toward the leaves and currents sweep back
//! until both settle within tolerance; the converged operating point is
//! then expanded into a result table with per-subsystem and whole-system
//! aggregate rows.

pub mod error;
pub mod relax;
pub mod report;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use relax::{OperatingPoint, SolveConfig};
pub use report::ResultRow;
pub use solve::{solve, solve_phase};
