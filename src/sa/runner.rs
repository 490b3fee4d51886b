//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;

use super::config::SaConfig;
use crate::error::Result;
use crate::qubo::QuboInstance;
use crate::selection::Selection;
use crate::trace::{NoopObserver, SearchObserver};

/// Best-energy history is sampled every this many steps.
const HISTORY_INTERVAL: usize = 100;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// Best state seen over the whole trajectory.
    pub best: Selection,

    /// Energy `x·Q·x` of `best`, recomputed in full.
    pub best_energy: f64,

    /// Energy of the initial state.
    pub initial_energy: f64,

    /// Number of steps executed.
    pub steps: usize,

    /// Temperature of the last executed step.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best energy sampled at regular intervals.
    pub energy_history: Vec<f64>,
}

/// Executes Simulated Annealing over a QUBO energy landscape.
///
/// The state space is `{0,1}^n`, moves flip one uniformly chosen bit, and
/// each proposal is priced in O(n) with [`QuboInstance::flip_delta`].
/// Moves are accepted by the Metropolis criterion.
pub struct SaRunner;

impl SaRunner {
    /// Anneals from `initial` and returns the best state found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use u_siting::qubo::QuboInstance;
    /// use u_siting::sa::{SaConfig, SaRunner};
    /// use u_siting::Selection;
    ///
    /// let q = QuboInstance::from_rows(vec![vec![-1.0, 2.0], vec![2.0, -1.0]], 0.0).unwrap();
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let result = SaRunner::run(&q, &Selection::empty(2), &SaConfig::default().with_steps(500), &mut rng).unwrap();
    /// assert_eq!(result.best_energy, -1.0);
    /// ```
    pub fn run<R: Rng + ?Sized>(
        qubo: &QuboInstance,
        initial: &Selection,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult> {
        Self::run_with_cancel(qubo, initial, config, rng, &mut NoopObserver, None)
    }

    /// Runs SA, reporting progress to `observer` every
    /// `config.progress_interval` steps.
    pub fn run_observed<R, O>(
        qubo: &QuboInstance,
        initial: &Selection,
        config: &SaConfig,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<SaResult>
    where
        R: Rng + ?Sized,
        O: SearchObserver + ?Sized,
    {
        Self::run_with_cancel(qubo, initial, config, rng, observer, None)
    }

    /// Runs SA with an optional cancellation token, checked between steps.
    pub fn run_with_cancel<R, O>(
        qubo: &QuboInstance,
        initial: &Selection,
        config: &SaConfig,
        rng: &mut R,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult>
    where
        R: Rng + ?Sized,
        O: SearchObserver + ?Sized,
    {
        qubo.check_selection(initial)?;
        let n = qubo.size();

        if n == 0 {
            return Ok(SaResult {
                best: Selection::empty(0),
                best_energy: 0.0,
                initial_energy: 0.0,
                steps: 0,
                final_temperature: config.min_temperature,
                accepted_moves: 0,
                improving_moves: 0,
                cancelled: false,
                energy_history: vec![0.0],
            });
        }

        config.validate()?;

        let initial_energy = qubo.energy(initial);
        let mut current = initial.clone();
        let mut current_energy = initial_energy;
        let mut best = initial.clone();
        let mut best_energy = initial_energy;

        let mut executed = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut temperature = config.initial_temperature;
        let mut cancelled = false;

        let mut energy_history = vec![best_energy];

        log::debug!(
            "SA start: n={n}, steps={}, T={}..{}, E0={initial_energy}",
            config.steps,
            config.initial_temperature,
            config.min_temperature
        );

        if config.progress_interval > 0 {
            observer.observe(0, current_energy, &current);
        }

        for k in 0..config.steps {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            temperature = config.temperature(k);
            let i = rng.random_range(0..n);
            let delta = qubo.flip_delta(&current, i);

            // Metropolis acceptance criterion
            let accept = if delta <= 0.0 {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                true
            } else {
                let probability = (-delta / temperature).exp();
                rng.random::<f64>() < probability
            };

            if accept {
                current.flip(i);
                current_energy += delta;
                accepted_moves += 1;

                if current_energy < best_energy {
                    best.clone_from(&current);
                    best_energy = current_energy;
                }
            }

            executed += 1;

            if config.progress_interval > 0 && executed.is_multiple_of(config.progress_interval) {
                observer.observe(executed, current_energy, &current);
            }
            if executed.is_multiple_of(HISTORY_INTERVAL) {
                energy_history.push(best_energy);
            }
        }

        // Incremental deltas accumulate rounding; report the exact energy and
        // never something worse than the start.
        best_energy = qubo.energy(&best);
        if best_energy > initial_energy {
            best.clone_from(initial);
            best_energy = initial_energy;
        }

        if energy_history
            .last()
            .is_none_or(|&last| (last - best_energy).abs() > 1e-15)
        {
            energy_history.push(best_energy);
        }

        log::debug!(
            "SA done: steps={executed}, accepted={accepted_moves}, best={best_energy}, cancelled={cancelled}"
        );

        Ok(SaResult {
            best,
            best_energy,
            initial_energy,
            steps: executed,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
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
    use crate::sa::CoolingSchedule;
    use crate::trace::ProgressTrace;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Diagonal rewards with a strong pairwise conflict between 0 and 1.
    fn conflict_qubo() -> QuboInstance {
        QuboInstance::from_rows(
            vec![
                vec![-3.0, 5.0, 0.0, 0.0],
                vec![5.0, -4.0, 0.0, 0.0],
                vec![0.0, 0.0, -1.0, 0.0],
                vec![0.0, 0.0, 0.0, 2.0],
            ],
            0.0,
        )
        .unwrap()
    }

    fn small_catalog_qubo() -> QuboInstance {
        let catalog = SiteCatalog::from_columns(
            &[100.0, 200.0, 150.0, 120.0, 90.0],
            &[500.0, 300.0, 800.0, 400.0, 200.0],
            &[10.0, 20.0, 30.0, 5.0, 8.0],
        )
        .unwrap();
        let params = QuboParams::default()
            .with_budget(300.0)
            .with_max_count(2)
            .with_min_population(1000.0)
            .with_penalties(0.01, 50.0, 0.001);
        build_qubo(&catalog, &params)
    }

    #[test]
    fn test_sa_finds_optimum_of_conflict_qubo() {
        let q = conflict_qubo();
        let config = SaConfig::default()
            .with_steps(2_000)
            .with_initial_temperature(10.0)
            .with_min_temperature(0.01);
        let mut rng = StdRng::seed_from_u64(42);
        let result = SaRunner::run(&q, &Selection::empty(4), &config, &mut rng).unwrap();

        // optimum: select 1 and 2 → -4 - 1 = -5
        assert_eq!(result.best.selected_indices(), vec![1, 2]);
        assert_eq!(result.best_energy, -5.0);
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_sa_zero_steps_returns_initial() {
        let q = conflict_qubo();
        let initial = Selection::from_indices(4, &[0, 3]);
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            SaRunner::run(&q, &initial, &SaConfig::default().with_steps(0), &mut rng).unwrap();
        assert_eq!(result.best, initial);
        assert_eq!(result.best_energy, q.energy(&initial));
        assert_eq!(result.steps, 0);
    }

    #[test]
    fn test_sa_empty_instance() {
        let q = QuboInstance::new(0, vec![], 7.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = SaRunner::run(&q, &Selection::empty(0), &SaConfig::default(), &mut rng).unwrap();
        assert!(result.best.is_empty());
        assert_eq!(result.best_energy, 0.0);
    }

    #[test]
    fn test_sa_rejects_misaligned_initial_state() {
        let q = conflict_qubo();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SaRunner::run(&q, &Selection::empty(3), &SaConfig::default(), &mut rng).is_err());
    }

    #[test]
    fn test_sa_best_not_worse_than_initial() {
        let q = small_catalog_qubo();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let initial = Selection::random(5, &mut rng);
            let config = SaConfig::default().with_steps(300);
            let result = SaRunner::run(&q, &initial, &config, &mut rng).unwrap();
            assert!(result.best_energy <= q.energy(&initial));
            assert_eq!(result.best_energy, q.energy(&result.best));
        }
    }

    #[test]
    fn test_sa_reproducible_with_same_seed() {
        let q = small_catalog_qubo();
        let config = SaConfig::default().with_steps(1_000);
        let a = SaRunner::run(&q, &Selection::empty(5), &config, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = SaRunner::run(&q, &Selection::empty(5), &config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_sa_observer_does_not_change_trajectory() {
        let q = small_catalog_qubo();
        let config = SaConfig::default().with_steps(1_000).with_progress_interval(10);
        let plain =
            SaRunner::run(&q, &Selection::empty(5), &config, &mut StdRng::seed_from_u64(3)).unwrap();

        let mut trace = ProgressTrace::new();
        let traced = SaRunner::run_observed(
            &q,
            &Selection::empty(5),
            &config,
            &mut StdRng::seed_from_u64(3),
            &mut trace,
        )
        .unwrap();

        assert_eq!(plain.best, traced.best);
        assert_eq!(plain.accepted_moves, traced.accepted_moves);
        // initial snapshot plus one every 10 steps
        assert_eq!(trace.len(), 1 + 100);
        assert_eq!(trace.snapshots()[0].step, 0);
        assert_eq!(trace.snapshots()[100].step, 1_000);
    }

    #[test]
    fn test_sa_snapshot_energy_matches_state() {
        let q = small_catalog_qubo();
        let config = SaConfig::default().with_steps(500).with_progress_interval(1);
        let mut checked = 0usize;
        let mut check = |_step: usize, energy: f64, state: &Selection| {
            let exact = q.energy(state);
            assert!((energy - exact).abs() <= 1e-6 * exact.abs().max(1.0));
            checked += 1;
        };
        SaRunner::run_observed(
            &q,
            &Selection::empty(5),
            &config,
            &mut StdRng::seed_from_u64(5),
            &mut check,
        )
        .unwrap();
        assert_eq!(checked, 501);
    }

    #[test]
    fn test_sa_metropolis_accepts_uphill() {
        // At a temperature far above every delta almost all moves are accepted.
        let q = conflict_qubo();
        let config = SaConfig::default()
            .with_steps(2_000)
            .with_initial_temperature(1e8)
            .with_min_temperature(1e7)
            .with_cooling(CoolingSchedule::Linear);
        let result =
            SaRunner::run(&q, &Selection::empty(4), &config, &mut StdRng::seed_from_u64(42)).unwrap();
        let acceptance = result.accepted_moves as f64 / result.steps as f64;
        assert!(acceptance > 0.95, "expected high acceptance, got {acceptance}");
        assert!(result.accepted_moves > result.improving_moves);
    }

    #[test]
    fn test_sa_cancellation() {
        let q = conflict_qubo();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SaRunner::run_with_cancel(
            &q,
            &Selection::empty(4),
            &SaConfig::default(),
            &mut StdRng::seed_from_u64(42),
            &mut NoopObserver,
            Some(cancel),
        )
        .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.steps, 0);
    }

    #[test]
    fn test_sa_energy_history_non_increasing() {
        let q = small_catalog_qubo();
        let config = SaConfig::default().with_steps(5_000);
        let result =
            SaRunner::run(&q, &Selection::empty(5), &config, &mut StdRng::seed_from_u64(42)).unwrap();
        for window in result.energy_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-6 * window[0].abs().max(1.0),
                "best energy history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_sa_invalid_config() {
        let q = conflict_qubo();
        let config = SaConfig::default().with_min_temperature(-1.0);
        assert!(SaRunner::run(&q, &Selection::empty(4), &config, &mut StdRng::seed_from_u64(0)).is_err());
    }
}
