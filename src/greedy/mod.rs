//! Greedy coverage-per-cost baseline.
//!
//! Ranks sites by `population_coverage / installation_cost` and admits them
//! in that order while the budget and the site count allow. Deterministic,
//! never backtracks, and has no energy function. Its selection is a cheap
//! seed state for the annealing and tabu engines.

mod runner;

pub use runner::{GreedyResult, GreedyRunner};
