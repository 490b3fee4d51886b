//! [`Solver`] adapters for the in-crate engines.

use std::time::Instant;

use rand::RngCore;

use super::types::{SolveOutcome, SolveRequest, Solver};
use crate::error::{Error, Result};
use crate::greedy::GreedyRunner;
use crate::sa::{SaConfig, SaRunner};
use crate::selection::Selection;
use crate::tabu::{TabuConfig, TabuRunner};

/// Where a trajectory engine starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InitialState {
    /// No site selected.
    #[default]
    Empty,
    /// Each bit drawn uniformly from the run's RNG.
    Random,
    /// The greedy engine's selection; needs the catalog.
    Greedy,
    /// An explicit state of length `n`.
    Given(Selection),
}

impl InitialState {
    fn resolve(&self, request: &SolveRequest<'_>, solver: &str, rng: &mut dyn RngCore) -> Result<Selection> {
        let n = request.size();
        match self {
            InitialState::Empty => Ok(Selection::empty(n)),
            InitialState::Random => Ok(Selection::random(n, rng)),
            InitialState::Greedy => {
                let catalog = request.catalog().ok_or_else(|| Error::CatalogRequired {
                    solver: solver.to_string(),
                })?;
                let params = request.params();
                Ok(GreedyRunner::run(catalog, params.budget, params.max_count).selection)
            }
            InitialState::Given(selection) => {
                request.qubo().check_selection(selection)?;
                Ok(selection.clone())
            }
        }
    }
}

/// Simulated Annealing behind the [`Solver`] contract.
#[derive(Debug, Clone, Default)]
pub struct SaSolver {
    pub config: SaConfig,
    pub initial: InitialState,
}

impl SaSolver {
    pub fn new(config: SaConfig) -> Self {
        Self {
            config,
            initial: InitialState::Empty,
        }
    }

    pub fn with_initial(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }
}

impl Solver for SaSolver {
    fn name(&self) -> &str {
        "sa"
    }

    fn solve(&self, request: &SolveRequest<'_>, rng: &mut dyn RngCore) -> Result<SolveOutcome> {
        let start = Instant::now();
        let initial = self.initial.resolve(request, self.name(), rng)?;
        let result = SaRunner::run(request.qubo(), &initial, &self.config, rng)?;
        Ok(SolveOutcome::Solved(request.report(
            result.best,
            result.best_energy,
            start.elapsed(),
        )))
    }
}

/// Tabu Search behind the [`Solver`] contract.
#[derive(Debug, Clone)]
pub struct TabuSolver {
    pub config: TabuConfig,
    pub initial: InitialState,
}

impl Default for TabuSolver {
    fn default() -> Self {
        Self::new(TabuConfig::default())
    }
}

impl TabuSolver {
    /// Starts from a random state.
    pub fn new(config: TabuConfig) -> Self {
        Self {
            config,
            initial: InitialState::Random,
        }
    }

    pub fn with_initial(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }
}

impl Solver for TabuSolver {
    fn name(&self) -> &str {
        "tabu"
    }

    fn solve(&self, request: &SolveRequest<'_>, rng: &mut dyn RngCore) -> Result<SolveOutcome> {
        let start = Instant::now();
        let initial = self.initial.resolve(request, self.name(), rng)?;
        let result = TabuRunner::run(request.qubo(), &initial, &self.config)?;
        Ok(SolveOutcome::Solved(request.report(
            result.best,
            result.best_energy,
            start.elapsed(),
        )))
    }
}

/// The greedy coverage-per-cost engine behind the [`Solver`] contract.
///
/// Reads budget and `max_count` from the request parameters. The reported
/// energy is the selection's `x·Q·x`, for comparison with the other engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn name(&self) -> &str {
        "greedy"
    }

    fn solve(&self, request: &SolveRequest<'_>, _rng: &mut dyn RngCore) -> Result<SolveOutcome> {
        let start = Instant::now();
        let catalog = request.catalog().ok_or_else(|| Error::CatalogRequired {
            solver: self.name().to_string(),
        })?;
        let result = GreedyRunner::run(catalog, request.params().budget, request.params().max_count);
        let energy = request.qubo().energy(&result.selection);
        Ok(SolveOutcome::Solved(request.report(
            result.selection,
            energy,
            start.elapsed(),
        )))
    }
}
