//! Simulated Annealing (SA) over QUBO energies.
//!
//! A single-solution trajectory search on `{0,1}^n`: each step proposes
//! flipping one random bit and accepts it by the Metropolis criterion
//! (always when `ΔE <= 0`, otherwise with probability `exp(-ΔE / T)`), while
//! the temperature cools from `T_max` to `T_min` over a fixed number of
//! steps. The best state seen anywhere on the trajectory is returned.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
