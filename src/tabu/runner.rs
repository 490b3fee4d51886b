//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from the given state
//! 2. At each iteration:
//!    a. Price every single-bit flip of the current state
//!    b. Pick the lowest-energy flip whose index is not tabu
//!    c. Apply it unconditionally and append its index to the tabu list
//!    d. Update the global best if improved
//! 3. Stop after the configured number of iterations
//!
//! If every index is tabu the iteration makes no move.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::TabuConfig;
use crate::error::Result;
use crate::qubo::QuboInstance;
use crate::selection::Selection;
use crate::trace::{NoopObserver, SearchObserver};

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best state found.
    pub best: Selection,
    /// Energy of the best state, recomputed in full.
    pub best_energy: f64,
    /// Energy of the initial state.
    pub initial_energy: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Iteration after which the best state was found (0 = initial state).
    pub best_iteration: usize,
    /// Iterations where every move was tabu.
    pub skipped_iterations: usize,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Best energy after each iteration.
    pub energy_history: Vec<f64>,
}

/// FIFO tabu list with O(1) membership.
struct TabuList {
    queue: VecDeque<usize>,
    member: Vec<bool>,
    tenure: usize,
}

impl TabuList {
    fn new(n: usize, tenure: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(tenure.min(n)),
            member: vec![false; n],
            tenure,
        }
    }

    #[inline]
    fn contains(&self, i: usize) -> bool {
        self.member[i]
    }

    fn push(&mut self, i: usize) {
        if self.tenure == 0 {
            return;
        }
        if self.queue.len() >= self.tenure {
            if let Some(old) = self.queue.pop_front() {
                self.member[old] = false;
            }
        }
        self.queue.push_back(i);
        self.member[i] = true;
    }
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Runs Tabu Search from `initial`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_siting::qubo::QuboInstance;
    /// use u_siting::tabu::{TabuConfig, TabuRunner};
    /// use u_siting::Selection;
    ///
    /// let q = QuboInstance::from_rows(vec![vec![-1.0, 2.0], vec![2.0, -1.0]], 0.0).unwrap();
    /// let config = TabuConfig::default().with_iterations(10).with_tenure(1);
    /// let result = TabuRunner::run(&q, &Selection::empty(2), &config).unwrap();
    /// assert_eq!(result.best_energy, -1.0);
    /// ```
    pub fn run(qubo: &QuboInstance, initial: &Selection, config: &TabuConfig) -> Result<TabuResult> {
        Self::run_with_cancel(qubo, initial, config, &mut NoopObserver, None)
    }

    /// Runs Tabu Search, reporting progress to `observer` every
    /// `config.progress_interval` iterations.
    pub fn run_observed<O: SearchObserver + ?Sized>(
        qubo: &QuboInstance,
        initial: &Selection,
        config: &TabuConfig,
        observer: &mut O,
    ) -> Result<TabuResult> {
        Self::run_with_cancel(qubo, initial, config, observer, None)
    }

    /// Runs Tabu Search with an optional cancellation token, checked
    /// between iterations.
    pub fn run_with_cancel<O: SearchObserver + ?Sized>(
        qubo: &QuboInstance,
        initial: &Selection,
        config: &TabuConfig,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabuResult> {
        qubo.check_selection(initial)?;
        let n = qubo.size();

        if n > 0 && config.tenure >= n {
            log::warn!(
                "tabu tenure {} >= {n} variables: every move will eventually be tabu",
                config.tenure
            );
        }

        let initial_energy = qubo.energy(initial);
        let mut current = initial.clone();
        let mut current_energy = initial_energy;
        let mut best = initial.clone();
        let mut best_energy = initial_energy;
        let mut best_iteration = 0usize;

        let mut tabu = TabuList::new(n, config.tenure);
        let mut energy_history = Vec::with_capacity(config.iterations);
        let mut executed = 0usize;
        let mut skipped_iterations = 0usize;
        let mut cancelled = false;

        log::debug!(
            "tabu start: n={n}, iterations={}, tenure={}, E0={initial_energy}",
            config.iterations,
            config.tenure
        );

        if config.progress_interval > 0 {
            observer.observe(0, current_energy, &current);
        }

        for _ in 0..config.iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Best-improvement over all non-tabu flips; ties go to the lowest index.
            let mut chosen: Option<(usize, f64)> = None;
            for i in 0..n {
                if tabu.contains(i) {
                    continue;
                }
                let delta = qubo.flip_delta(&current, i);
                if chosen.is_none_or(|(_, d)| delta < d) {
                    chosen = Some((i, delta));
                }
            }

            executed += 1;

            match chosen {
                Some((i, delta)) => {
                    current.flip(i);
                    current_energy += delta;
                    tabu.push(i);

                    if current_energy < best_energy {
                        best.clone_from(&current);
                        best_energy = current_energy;
                        best_iteration = executed;
                    }
                }
                None => skipped_iterations += 1,
            }

            energy_history.push(best_energy);

            if config.progress_interval > 0 && executed.is_multiple_of(config.progress_interval) {
                observer.observe(executed, current_energy, &current);
            }
        }

        best_energy = qubo.energy(&best);
        if best_energy > initial_energy {
            best.clone_from(initial);
            best_energy = initial_energy;
            best_iteration = 0;
        }

        log::debug!(
            "tabu done: iterations={executed}, skipped={skipped_iterations}, best={best_energy} at {best_iteration}"
        );

        Ok(TabuResult {
            best,
            best_energy,
            initial_energy,
            iterations: executed,
            best_iteration,
            skipped_iterations,
            cancelled,
            energy_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SiteCatalog;
    use crate::qubo::{build_qubo, QuboParams};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two basins: {0} at -2 and {1,2} at -3, separated by a penalty on 0-1.
    fn two_basins() -> QuboInstance {
        QuboInstance::from_rows(
            vec![
                vec![-2.0, 3.0, 3.0],
                vec![3.0, -1.0, -0.5],
                vec![3.0, -0.5, -1.0],
            ],
            0.0,
        )
        .unwrap()
    }

    fn catalog_qubo() -> QuboInstance {
        let catalog = SiteCatalog::from_columns(
            &[100.0, 200.0, 150.0, 120.0, 90.0, 300.0],
            &[500.0, 300.0, 800.0, 400.0, 200.0, 900.0],
            &[10.0, 20.0, 30.0, 5.0, 8.0, 40.0],
        )
        .unwrap();
        let params = QuboParams::default()
            .with_budget(400.0)
            .with_max_count(3)
            .with_min_population(1500.0)
            .with_penalties(0.01, 50.0, 0.001);
        build_qubo(&catalog, &params)
    }

    #[test]
    fn test_tabu_escapes_local_minimum() {
        let q = two_basins();
        // from empty the greedy first move is site 0 (-2); tabu must climb out
        let config = TabuConfig::default().with_iterations(20).with_tenure(1);
        let result = TabuRunner::run(&q, &Selection::empty(3), &config).unwrap();
        assert_eq!(result.best.selected_indices(), vec![1, 2]);
        assert_eq!(result.best_energy, -3.0);
    }

    #[test]
    fn test_tabu_first_move_is_best_improvement() {
        let q = two_basins();
        let config = TabuConfig::default().with_iterations(1).with_tenure(1);
        let result = TabuRunner::run(&q, &Selection::empty(3), &config).unwrap();
        assert_eq!(result.best.selected_indices(), vec![0]);
        assert_eq!(result.best_iteration, 1);
    }

    #[test]
    fn test_tabu_zero_iterations() {
        let q = two_basins();
        let initial = Selection::from_indices(3, &[0, 1]);
        let result = TabuRunner::run(&q, &initial, &TabuConfig::default().with_iterations(0)).unwrap();
        assert_eq!(result.best, initial);
        assert_eq!(result.best_energy, q.energy(&initial));
        assert_eq!(result.iterations, 0);
        assert!(result.energy_history.is_empty());
    }

    #[test]
    fn test_tabu_all_tabu_skips() {
        let q = two_basins();
        // tenure 5 > n = 3: after three moves every index is forbidden
        let config = TabuConfig::default().with_iterations(10).with_tenure(5);
        let result = TabuRunner::run(&q, &Selection::empty(3), &config).unwrap();
        assert_eq!(result.iterations, 10);
        assert_eq!(result.skipped_iterations, 7);
    }

    #[test]
    fn test_tabu_zero_tenure_never_forbids() {
        let q = two_basins();
        let config = TabuConfig::default().with_iterations(6).with_tenure(0);
        let result = TabuRunner::run(&q, &Selection::empty(3), &config).unwrap();
        assert_eq!(result.skipped_iterations, 0);
        // without memory it oscillates on site 0
        assert_eq!(result.best.selected_indices(), vec![0]);
    }

    #[test]
    fn test_tabu_energy_history_non_increasing() {
        let q = catalog_qubo();
        let mut rng = StdRng::seed_from_u64(42);
        let initial = Selection::random(6, &mut rng);
        let config = TabuConfig::default().with_iterations(100).with_tenure(2);
        let result = TabuRunner::run(&q, &initial, &config).unwrap();
        assert_eq!(result.energy_history.len(), 100);
        for window in result.energy_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best energy history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        assert!(result.best_energy <= result.initial_energy);
    }

    #[test]
    fn test_tabu_deterministic() {
        let q = catalog_qubo();
        let config = TabuConfig::default().with_iterations(50).with_tenure(3);
        let a = TabuRunner::run(&q, &Selection::empty(6), &config).unwrap();
        let b = TabuRunner::run(&q, &Selection::empty(6), &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_energy.to_bits(), b.best_energy.to_bits());
    }

    #[test]
    fn test_tabu_empty_instance() {
        let q = QuboInstance::new(0, vec![], 1.0).unwrap();
        let result = TabuRunner::run(&q, &Selection::empty(0), &TabuConfig::default()).unwrap();
        assert!(result.best.is_empty());
        assert_eq!(result.best_energy, 0.0);
    }

    #[test]
    fn test_tabu_progress_snapshots() {
        let q = catalog_qubo();
        let config = TabuConfig::default()
            .with_iterations(30)
            .with_tenure(2)
            .with_progress_interval(10);
        let mut steps = Vec::new();
        let mut obs = |step: usize, _e: f64, _s: &Selection| steps.push(step);
        TabuRunner::run_observed(&q, &Selection::empty(6), &config, &mut obs).unwrap();
        assert_eq!(steps, vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_tabu_cancellation() {
        let q = catalog_qubo();
        let result = TabuRunner::run_with_cancel(
            &q,
            &Selection::empty(6),
            &TabuConfig::default(),
            &mut NoopObserver,
            Some(Arc::new(AtomicBool::new(true))),
        )
        .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
    }
}
