//! The uniform solver contract.

use std::time::Duration;

use rand::RngCore;

use crate::analysis::SiteAnalysis;
use crate::catalog::SiteCatalog;
use crate::error::Result;
use crate::qubo::{QuboInstance, QuboParams};
use crate::selection::Selection;

/// Input to [`Solver::solve`].
///
/// The matrix is the single source of constraint pressure. The catalog is
/// optional: engines that only minimize `x·Q·x` ignore it, while it enables
/// per-site reporting and the greedy engine. A catalog can only be attached
/// through [`SolveRequest::with_catalog`], so it always matches the matrix.
#[derive(Debug, Clone, Copy)]
pub struct SolveRequest<'a> {
    qubo: &'a QuboInstance,
    params: &'a QuboParams,
    catalog: Option<&'a SiteCatalog>,
}

impl<'a> SolveRequest<'a> {
    pub fn new(qubo: &'a QuboInstance, params: &'a QuboParams) -> Self {
        Self {
            qubo,
            params,
            catalog: None,
        }
    }

    /// Attaches the catalog the matrix was built from.
    ///
    /// Fails if the catalog and the matrix disagree on `n`.
    pub fn with_catalog(mut self, catalog: &'a SiteCatalog) -> Result<Self> {
        self.qubo.check_aligned("catalog", catalog.len())?;
        self.catalog = Some(catalog);
        Ok(self)
    }

    pub fn qubo(&self) -> &'a QuboInstance {
        self.qubo
    }

    pub fn params(&self) -> &'a QuboParams {
        self.params
    }

    pub fn catalog(&self) -> Option<&'a SiteCatalog> {
        self.catalog
    }

    /// Dimension `n`.
    pub fn size(&self) -> usize {
        self.qubo.size()
    }

    /// Per-site costs, or an empty vector without a catalog.
    pub fn costs(&self) -> Vec<f64> {
        self.catalog.map(SiteCatalog::costs).unwrap_or_default()
    }

    /// Builds a report for `selection`, attaching the catalog analysis when
    /// a catalog is present.
    pub(crate) fn report(&self, selection: Selection, energy: f64, elapsed: Duration) -> SolutionReport {
        let analysis = self
            .catalog
            .map(|catalog| crate::analysis::summarize(&selection, catalog));
        SolutionReport {
            selection,
            energy,
            elapsed,
            analysis,
        }
    }
}

/// A solved run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionReport {
    /// The returned selection.
    pub selection: Selection,
    /// Achieved energy `x·Q·x` (the offset is not included).
    pub energy: f64,
    /// Wall-clock time spent in the engine.
    pub elapsed: Duration,
    /// Catalog aggregates, when the request carried a catalog.
    pub analysis: Option<SiteAnalysis>,
}

impl SolutionReport {
    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.selected_indices()
    }
}

/// What a solver returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// A selection was found.
    Solved(SolutionReport),
    /// The solver proved no feasible assignment exists. The attempted
    /// budget and costs are echoed for diagnosis.
    Infeasible { budget: f64, costs: Vec<f64> },
}

impl SolveOutcome {
    pub fn report(&self) -> Option<&SolutionReport> {
        match self {
            SolveOutcome::Solved(report) => Some(report),
            SolveOutcome::Infeasible { .. } => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

/// Uniform engine contract: a QUBO in, a selection and its energy out.
///
/// Randomness comes only from the `rng` argument, so a run is reproducible
/// from its seed and concurrent runs never share generator state.
///
/// Implementations return `Err` only for malformed requests or when an
/// external backend fails; a poor selection is still `Ok`.
pub trait Solver: Send + Sync {
    /// Short engine name used in comparison tables.
    fn name(&self) -> &str;

    /// Solves the request.
    fn solve(&self, request: &SolveRequest<'_>, rng: &mut dyn RngCore) -> Result<SolveOutcome>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, request: &SolveRequest<'_>, rng: &mut dyn RngCore) -> Result<SolveOutcome> {
        (**self).solve(request, rng)
    }
}
