//! Side-by-side comparison of engines on one instance.
//!
//! The harness builds the QUBO once, drives each registered [`Solver`]
//! through the same request and collects a uniform row per engine: the
//! selection, its energy, the wall-clock time and the catalog analysis.
//! A failing engine becomes a failure row; it never aborts the comparison.
//!
//! [`Solver`]: crate::solver::Solver

mod config;
mod runner;

pub use config::HarnessConfig;
pub use runner::{Comparison, ComparisonHarness, EngineOutcome, EngineRun};
