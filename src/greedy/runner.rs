//! Greedy admission loop.

use crate::analysis::{summarize, SiteAnalysis};
use crate::catalog::SiteCatalog;
use crate::selection::Selection;
use crate::trace::{NoopObserver, SearchObserver};

/// Result of a greedy run.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    /// Selected sites.
    pub selection: Selection,
    /// Aggregates of `selection`.
    pub analysis: SiteAnalysis,
    /// Catalog indices in the order they were admitted.
    pub admitted: Vec<usize>,
}

/// Greedy coverage-per-cost engine.
pub struct GreedyRunner;

impl GreedyRunner {
    /// Ranks sites by coverage per cost (descending, ties by index) and
    /// admits each one that keeps the cumulative cost within `budget` while
    /// fewer than `max_count` sites are admitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_siting::catalog::SiteCatalog;
    /// use u_siting::greedy::GreedyRunner;
    ///
    /// let catalog = SiteCatalog::from_columns(
    ///     &[100.0, 200.0, 150.0],
    ///     &[500.0, 300.0, 800.0],
    ///     &[0.0; 3],
    /// ).unwrap();
    /// let result = GreedyRunner::run(&catalog, 300.0, 2);
    /// assert_eq!(result.selection.selected_indices(), vec![0, 2]);
    /// assert_eq!(result.admitted, vec![2, 0]);
    /// ```
    pub fn run(catalog: &SiteCatalog, budget: f64, max_count: usize) -> GreedyResult {
        Self::run_observed(catalog, budget, max_count, &mut NoopObserver)
    }

    /// Like [`GreedyRunner::run`], reporting the state after each admission.
    ///
    /// The greedy policy has no energy; observers receive `NaN`, which
    /// [`ProgressTrace`](crate::trace::ProgressTrace) records as `None`.
    pub fn run_observed<O: SearchObserver + ?Sized>(
        catalog: &SiteCatalog,
        budget: f64,
        max_count: usize,
        observer: &mut O,
    ) -> GreedyResult {
        let n = catalog.len();
        let ratios: Vec<f64> = catalog.iter().map(|s| s.coverage_ratio()).collect();

        // Stable sort keeps equal ratios in index order.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| ratios[b].total_cmp(&ratios[a]));

        let mut selection = Selection::empty(n);
        let mut admitted = Vec::new();
        let mut total_cost = 0.0;

        for i in order {
            if admitted.len() >= max_count {
                break;
            }
            let cost = catalog.sites()[i].installation_cost;
            if total_cost + cost <= budget {
                selection.set(i, true);
                admitted.push(i);
                total_cost += cost;
                observer.observe(admitted.len(), f64::NAN, &selection);
            }
        }

        log::debug!(
            "greedy done: admitted {} of {n} sites, cost {total_cost} of budget {budget}",
            admitted.len()
        );

        let analysis = summarize(&selection, catalog);
        GreedyResult {
            selection,
            analysis,
            admitted,
        }
    }
}
