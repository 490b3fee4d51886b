//! Facility site selection as a QUBO problem.
//!
//! Chooses a subset of candidate sites that minimizes installation cost
//! while rewarding population coverage and energy capacity, subject to a
//! budget, a maximum number of sites and a minimum population coverage.
//! The constraints are folded into a Quadratic Unconstrained Binary
//! Optimization matrix and solved by interchangeable engines:
//!
//! - **QUBO builder**: penalty formulation of the objective and the three
//!   soft constraints into a symmetric matrix `Q` plus a constant offset.
//! - **Simulated Annealing (SA)**: single-bit-flip Metropolis search with
//!   geometric or linear cooling.
//! - **Tabu Search (TS)**: best-improvement bit flips with a short-term
//!   memory of recently flipped variables.
//! - **Greedy**: coverage-per-cost ranking under the budget and site count.
//! - **Oracles**: contract for exact or variational backends, with an
//!   exhaustive reference oracle for small instances.
//! - **Comparison harness**: runs several engines on one instance and
//!   tabulates their selections, energies and timings.
//!
//! # Architecture
//!
//! Catalog order is the dimension order of every matrix, cost vector and
//! selection in the crate. All randomness flows through an explicit
//! generator argument, so every run is reproducible from its seed.

pub mod analysis;
pub mod catalog;
pub mod error;
#[cfg(feature = "serde")]
pub mod exchange;
pub mod greedy;
pub mod harness;
pub mod qubo;
pub mod sa;
pub mod selection;
pub mod solver;
pub mod tabu;
pub mod trace;

pub use error::{Error, Result};
pub use selection::Selection;
