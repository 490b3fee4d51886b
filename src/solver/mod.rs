//! Uniform solver contract and its implementations.
//!
//! Every engine, in-crate or external, is driven through [`Solver`]: a QUBO
//! (optionally with the catalog it was built from) goes in, a selection and
//! its energy come out. External exact or variational backends plug in via
//! [`QuboOracle`] and the [`OracleSolver`] adapter.

mod engines;
mod oracle;
mod types;

pub use engines::{GreedySolver, InitialState, SaSolver, TabuSolver};
pub use oracle::{
    ExhaustiveOracle, OracleOutcome, OracleRequest, OracleSolution, OracleSolver, QuboOracle,
};
pub use types::{SolutionReport, SolveOutcome, SolveRequest, Solver};
