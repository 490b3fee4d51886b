//! QUBO formulation of the site selection problem.
//!
//! The builder folds the objective and three soft constraints into a dense
//! symmetric matrix `Q` and a constant `offset` such that
//!
//! ```text
//! x·Q·x + offset = Σ (cost_i − α·pop_i − γ·energy_i)·x_i
//!                + θ·(Σ cost_i·x_i − budget)²
//!                + μ·(Σ x_i − max_count)²
//!                + λ·(min_population − Σ pop_i·x_i)²
//! ```
//!
//! for every binary `x`. All constraint pressure lives in `Q`; engines
//! minimize `x·Q·x` and add nothing of their own.

mod builder;
mod config;
mod types;

pub use builder::{build_qubo, evaluate, PenaltyBreakdown};
pub use config::QuboParams;
pub use types::QuboInstance;
