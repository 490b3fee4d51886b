//! External exact/variational backends behind the [`Solver`] contract.
//!
//! An oracle is a black box: it receives the matrix, the per-site costs and
//! the constraint parameters and answers with a selection, an explicit
//! infeasibility signal, or an error. "Could not run" (`Err`) and "ran and
//! found nothing feasible" ([`OracleOutcome::Infeasible`]) are kept apart
//! all the way up to the comparison table.

use std::time::{Duration, Instant};

use rand::RngCore;

use super::types::{SolveOutcome, SolveRequest, Solver};
use crate::error::{Error, Result};
use crate::qubo::{QuboInstance, QuboParams};
use crate::selection::Selection;

/// Input handed to an oracle.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    pub qubo: &'a QuboInstance,
    /// Per-site costs, index-aligned with the matrix; empty when unknown.
    pub costs: &'a [f64],
    pub params: &'a QuboParams,
}

/// A solution as reported by an oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleSolution {
    pub selected_indices: Vec<usize>,
    /// Objective value the oracle achieved.
    pub fval: f64,
    /// Time the oracle reports for its own solve.
    pub time_sec: f64,
}

/// What an oracle answered.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleOutcome {
    Solved(OracleSolution),
    Infeasible,
}

/// Contract for exact or quantum-variational QUBO backends.
///
/// Calls block until the backend answers; callers that need a timeout wrap
/// the call themselves.
pub trait QuboOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Solves `request`. Returns `Err` when the backend is unavailable or
    /// crashed, never for infeasibility.
    fn solve(&self, request: &OracleRequest<'_>) -> Result<OracleOutcome>;
}

/// Adapts a [`QuboOracle`] to the [`Solver`] contract.
#[derive(Debug, Clone)]
pub struct OracleSolver<O> {
    oracle: O,
}

impl<O: QuboOracle> OracleSolver<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<O: QuboOracle> Solver for OracleSolver<O> {
    fn name(&self) -> &str {
        self.oracle.name()
    }

    fn solve(&self, request: &SolveRequest<'_>, _rng: &mut dyn RngCore) -> Result<SolveOutcome> {
        let costs = request.costs();
        let oracle_request = OracleRequest {
            qubo: request.qubo(),
            costs: &costs,
            params: request.params(),
        };

        let start = Instant::now();
        let outcome = self.oracle.solve(&oracle_request)?;
        let wall = start.elapsed();

        match outcome {
            OracleOutcome::Infeasible => {
                log::warn!(
                    "oracle `{}` reported no feasible assignment (budget {})",
                    self.oracle.name(),
                    request.params().budget
                );
                Ok(SolveOutcome::Infeasible {
                    budget: request.params().budget,
                    costs,
                })
            }
            OracleOutcome::Solved(solution) => {
                let selection = Selection::from_indices_checked(request.size(), &solution.selected_indices)
                    .map_err(|e| Error::OracleFailed {
                        oracle: self.oracle.name().to_string(),
                        reason: e.to_string(),
                    })?;
                let elapsed = if solution.time_sec.is_finite() && solution.time_sec >= 0.0 {
                    Duration::from_secs_f64(solution.time_sec)
                } else {
                    wall
                };
                Ok(SolveOutcome::Solved(request.report(
                    selection,
                    solution.fval,
                    elapsed,
                )))
            }
        }
    }
}

/// Exact in-process oracle that enumerates all `2^n` states.
///
/// States are visited in Gray-code order so each step is a single flip
/// priced in O(n). With `hard_budget` only states whose total cost stays
/// within the budget are admissible; if none is, the answer is
/// [`OracleOutcome::Infeasible`]. Instances above `max_variables` are
/// refused with [`Error::OracleFailed`].
#[derive(Debug, Clone)]
pub struct ExhaustiveOracle {
    pub hard_budget: bool,
    pub max_variables: usize,
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        Self {
            hard_budget: false,
            max_variables: 20,
        }
    }
}

impl ExhaustiveOracle {
    /// Hard ceiling on the enumerated dimension.
    pub const LIMIT: usize = 24;

    /// Enforces `Σ cost_i·x_i <= budget` as a hard constraint.
    pub fn with_hard_budget(mut self, hard_budget: bool) -> Self {
        self.hard_budget = hard_budget;
        self
    }

    /// Largest `n` accepted, capped at [`ExhaustiveOracle::LIMIT`].
    pub fn with_max_variables(mut self, n: usize) -> Self {
        self.max_variables = n.min(Self::LIMIT);
        self
    }

    fn failed(&self, reason: impl Into<String>) -> Error {
        Error::OracleFailed {
            oracle: self.name().to_string(),
            reason: reason.into(),
        }
    }
}

impl QuboOracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn solve(&self, request: &OracleRequest<'_>) -> Result<OracleOutcome> {
        let start = Instant::now();
        let qubo = request.qubo;
        let n = qubo.size();
        if n > self.max_variables {
            return Err(self.failed(format!(
                "{n} variables exceed the enumeration limit of {}",
                self.max_variables
            )));
        }
        if self.hard_budget {
            qubo.check_aligned("cost vector", request.costs.len())?;
        }

        let budget = request.params.budget;
        let slack = 1e-9 * budget.abs().max(1.0);
        let feasible = |cost: f64| !self.hard_budget || cost <= budget + slack;

        let mut x = Selection::empty(n);
        let mut energy = 0.0;
        let mut cost = 0.0;
        let mut best: Option<(Selection, f64)> = feasible(cost).then(|| (x.clone(), energy));

        for k in 1u64..(1u64 << n) {
            let bit = k.trailing_zeros() as usize;
            energy += qubo.flip_delta(&x, bit);
            if self.hard_budget {
                let c = request.costs[bit];
                cost += if x.is_selected(bit) { -c } else { c };
            }
            x.flip(bit);

            let improves = match &best {
                Some((_, e)) => energy < *e,
                None => true,
            };
            if improves && feasible(cost) {
                best = Some((x.clone(), energy));
            }
        }

        let time_sec = start.elapsed().as_secs_f64();
        Ok(match best {
            Some((selection, _)) => OracleOutcome::Solved(OracleSolution {
                fval: qubo.energy(&selection),
                selected_indices: selection.selected_indices(),
                time_sec,
            }),
            None => OracleOutcome::Infeasible,
        })
    }
}
