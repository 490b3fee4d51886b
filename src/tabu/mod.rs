//! Tabu Search (TS) over QUBO energies.
//!
//! A single-solution trajectory search that evaluates every single-bit
//! flip each iteration, moves to the best flip not in the tabu list (even
//! when it worsens the energy) and remembers the best state ever visited.
//! The tabu list forbids recently flipped indices, which keeps the search
//! from cycling back into the local minimum it just left.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search, Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
