//! Candidate site catalogs.
//!
//! A [`SiteCatalog`] is an ordered, immutable list of [`Site`]s. The row
//! order is the dimension order of every QUBO matrix, cost vector and
//! selection vector derived from it.

mod generator;
mod types;

pub use generator::{generate, ETHIOPIA_BBOX};
pub use types::{Site, SiteCatalog};
