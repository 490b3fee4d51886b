//! Comparison harness execution.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::HarnessConfig;
use crate::catalog::SiteCatalog;
use crate::error::Result;
use crate::qubo::{build_qubo, QuboInstance, QuboParams};
use crate::selection::Selection;
use crate::solver::{SolutionReport, SolveOutcome, SolveRequest, Solver};

/// How a single engine run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The engine returned a selection.
    Solved(SolutionReport),
    /// The engine ran and reported that nothing feasible exists.
    Infeasible { budget: f64, costs: Vec<f64> },
    /// The engine could not run; the rest of the comparison is unaffected.
    Failed { reason: String },
}

/// One row of a [`Comparison`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    /// Engine name as reported by [`Solver::name`].
    pub name: String,
    pub outcome: EngineOutcome,
    /// Wall-clock time measured by the harness around the call.
    pub elapsed: Duration,
}

impl EngineRun {
    pub fn report(&self) -> Option<&SolutionReport> {
        match &self.outcome {
            EngineOutcome::Solved(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, EngineOutcome::Failed { .. })
    }
}

/// Results of all engines over one instance, in registration order.
#[derive(Debug, Clone)]
pub struct Comparison {
    qubo: QuboInstance,
    runs: Vec<EngineRun>,
}

impl Comparison {
    /// The matrix every engine was given.
    pub fn qubo(&self) -> &QuboInstance {
        &self.qubo
    }

    pub fn runs(&self) -> &[EngineRun] {
        &self.runs
    }

    /// First run registered under `name`.
    pub fn get(&self, name: &str) -> Option<&EngineRun> {
        self.runs.iter().find(|run| run.name == name)
    }

    /// Solved run with the lowest energy; ties go to the earlier engine.
    pub fn best(&self) -> Option<&EngineRun> {
        self.runs
            .iter()
            .filter_map(|run| run.report().map(|report| (run, report.energy)))
            .fold(None, |best: Option<(&EngineRun, f64)>, (run, energy)| match best {
                Some((_, e)) if e <= energy => best,
                _ => Some((run, energy)),
            })
            .map(|(run, _)| run)
    }

    pub fn failures(&self) -> impl Iterator<Item = &EngineRun> {
        self.runs.iter().filter(|run| run.is_failed())
    }
}

impl fmt::Display for Comparison {
    /// Fixed-width summary table, one row per engine. `Capacity` is the
    /// selected energy capacity in kWh/day; `Energy (QUBO)` is `x·Q·x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .runs
            .iter()
            .map(|run| run.name.len())
            .max()
            .unwrap_or(0)
            .max("Solver".len());

        writeln!(
            f,
            "{:<width$}  {:>5}  {:>14}  {:>12}  {:>14}  {:>16}  {:>9}",
            "Solver", "Sites", "Cost", "Population", "Capacity", "Energy (QUBO)", "Time (s)"
        )?;
        for run in &self.runs {
            let secs = run.elapsed.as_secs_f64();
            match &run.outcome {
                EngineOutcome::Solved(report) => {
                    let (cost, population, capacity) = report
                        .analysis
                        .as_ref()
                        .map(|a| (a.total_cost, a.total_population, a.total_energy))
                        .unwrap_or((f64::NAN, f64::NAN, f64::NAN));
                    writeln!(
                        f,
                        "{:<width$}  {:>5}  {:>14.2}  {:>12.0}  {:>14.2}  {:>16.4}  {:>9.3}",
                        run.name,
                        report.selection.count(),
                        cost,
                        population,
                        capacity,
                        report.energy,
                        secs
                    )?;
                }
                EngineOutcome::Infeasible { budget, .. } => {
                    writeln!(f, "{:<width$}  INFEASIBLE (budget {budget})", run.name)?;
                }
                EngineOutcome::Failed { reason } => {
                    writeln!(f, "{:<width$}  FAILED: {reason}", run.name)?;
                }
            }
        }
        Ok(())
    }
}

/// Runs several engines over one catalog and tabulates the results.
///
/// The QUBO is built once and shared read-only. Each engine gets its own
/// generator seeded from [`HarnessConfig::engine_seed`], so results depend
/// only on the seed and the registration order, not on scheduling. An
/// engine that fails is recorded as [`EngineOutcome::Failed`] and the
/// others still run.
///
/// # Examples
///
/// ```
/// use u_siting::catalog::SiteCatalog;
/// use u_siting::harness::{ComparisonHarness, HarnessConfig};
/// use u_siting::qubo::QuboParams;
/// use u_siting::solver::GreedySolver;
///
/// let catalog = SiteCatalog::from_columns(
///     &[100.0, 200.0, 150.0],
///     &[500.0, 300.0, 800.0],
///     &[10.0, 20.0, 30.0],
/// ).unwrap();
/// let params = QuboParams::default().with_budget(300.0).with_max_count(2);
/// let comparison = ComparisonHarness::new(HarnessConfig::default())
///     .with_solver(GreedySolver)
///     .run(&catalog, &params)
///     .unwrap();
/// let greedy = comparison.get("greedy").unwrap().report().unwrap();
/// assert_eq!(greedy.selected_indices(), vec![0, 2]);
/// ```
pub struct ComparisonHarness {
    config: HarnessConfig,
    solvers: Vec<Box<dyn Solver>>,
}

impl ComparisonHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            solvers: Vec::new(),
        }
    }

    /// Registers an engine; engines run and report in registration order.
    /// Repeated names are reported as `name#2`, `name#3`, ...
    pub fn with_solver<S: Solver + 'static>(mut self, solver: S) -> Self {
        self.solvers.push(Box::new(solver));
        self
    }

    pub fn add_solver(&mut self, solver: Box<dyn Solver>) {
        self.solvers.push(solver);
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.solvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }

    /// Builds the QUBO for `catalog` under `params` and runs every engine.
    ///
    /// Fails only when `params` is invalid; engine failures are recorded in
    /// the returned [`Comparison`].
    pub fn run(&self, catalog: &SiteCatalog, params: &QuboParams) -> Result<Comparison> {
        params.validate()?;
        let qubo = build_qubo(catalog, params);
        let mut runs = {
            let request = SolveRequest::new(&qubo, params).with_catalog(catalog)?;
            self.run_all(&request)
        };
        disambiguate(&mut runs);
        Ok(Comparison { qubo, runs })
    }

    fn run_all(&self, request: &SolveRequest<'_>) -> Vec<EngineRun> {
        log::debug!(
            "comparing {} engines on n={} (seed {})",
            self.solvers.len(),
            request.size(),
            self.config.seed
        );

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;
            return self
                .solvers
                .par_iter()
                .enumerate()
                .map(|(index, solver)| self.run_one(index, solver.as_ref(), request))
                .collect();
        }

        self.solvers
            .iter()
            .enumerate()
            .map(|(index, solver)| self.run_one(index, solver.as_ref(), request))
            .collect()
    }

    fn run_one(&self, index: usize, solver: &dyn Solver, request: &SolveRequest<'_>) -> EngineRun {
        let name = solver.name().to_string();
        let start = Instant::now();

        // Nothing to search; every engine reports the empty selection.
        let outcome = if request.size() == 0 {
            EngineOutcome::Solved(request.report(Selection::empty(0), 0.0, Duration::ZERO))
        } else {
            let mut rng = StdRng::seed_from_u64(self.config.engine_seed(index));
            match solver.solve(request, &mut rng) {
                Ok(SolveOutcome::Solved(report)) => EngineOutcome::Solved(report),
                Ok(SolveOutcome::Infeasible { budget, costs }) => {
                    EngineOutcome::Infeasible { budget, costs }
                }
                Err(e) => {
                    log::warn!("engine `{name}` failed: {e}");
                    EngineOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };

        let elapsed = start.elapsed();
        match &outcome {
            EngineOutcome::Solved(report) => log::info!(
                "engine `{name}` selected {} sites, energy {:.4}, {:.3}s",
                report.selection.count(),
                report.energy,
                elapsed.as_secs_f64()
            ),
            EngineOutcome::Infeasible { .. } => log::info!("engine `{name}` reported infeasible"),
            EngineOutcome::Failed { .. } => {}
        }

        EngineRun {
            name,
            outcome,
            elapsed,
        }
    }
}

/// Renames repeated engine names to `name#2`, `name#3`, ... in
/// registration order, so every row of a comparison has a distinct name.
fn disambiguate(runs: &mut [EngineRun]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for run in runs {
        let count = seen.entry(run.name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            run.name = format!("{}#{}", run.name, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sa::SaConfig;
    use crate::solver::{ExhaustiveOracle, GreedySolver, OracleSolver, SaSolver, TabuSolver};
    use crate::tabu::TabuConfig;
    use rand::RngCore;

    struct Crashing;

    impl Solver for Crashing {
        fn name(&self) -> &str {
            "crashing"
        }

        fn solve(&self, _request: &SolveRequest<'_>, _rng: &mut dyn RngCore) -> Result<SolveOutcome> {
            Err(Error::OracleFailed {
                oracle: "crashing".into(),
                reason: "connection refused".into(),
            })
        }
    }

    fn fixture() -> (SiteCatalog, QuboParams) {
        let catalog = SiteCatalog::from_columns(
            &[100.0, 200.0, 150.0, 120.0],
            &[500.0, 300.0, 800.0, 400.0],
            &[10.0, 20.0, 30.0, 5.0],
        )
        .unwrap();
        let params = QuboParams::default()
            .with_budget(300.0)
            .with_max_count(2)
            .with_min_population(1000.0)
            .with_penalties(0.01, 50.0, 0.001);
        (catalog, params)
    }

    fn harness(config: HarnessConfig) -> ComparisonHarness {
        ComparisonHarness::new(config)
            .with_solver(SaSolver::new(SaConfig::default().with_steps(2_000).with_initial_temperature(500.0)))
            .with_solver(Crashing)
            .with_solver(TabuSolver::new(TabuConfig::default().with_iterations(50).with_tenure(1)))
            .with_solver(GreedySolver)
    }

    #[test]
    fn test_failure_does_not_abort_others() {
        let (catalog, params) = fixture();
        let comparison = harness(HarnessConfig::default()).run(&catalog, &params).unwrap();

        let names: Vec<&str> = comparison.runs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sa", "crashing", "tabu", "greedy"]);
        assert!(comparison.get("crashing").unwrap().is_failed());
        assert_eq!(comparison.failures().count(), 1);
        for name in ["sa", "tabu", "greedy"] {
            let report = comparison.get(name).unwrap().report().unwrap();
            assert!(report.analysis.is_some());
        }
    }

    #[test]
    fn test_reproducible_for_same_seed() {
        let (catalog, params) = fixture();
        let a = harness(HarnessConfig::default().with_seed(9)).run(&catalog, &params).unwrap();
        let b = harness(HarnessConfig::default().with_seed(9)).run(&catalog, &params).unwrap();
        for (x, y) in a.runs().iter().zip(b.runs()) {
            assert_eq!(
                x.report().map(|r| r.selection.clone()),
                y.report().map(|r| r.selection.clone())
            );
        }
    }

    #[test]
    fn test_empty_catalog_skips_engines() {
        let params = QuboParams::default();
        let comparison = harness(HarnessConfig::default())
            .run(&SiteCatalog::default(), &params)
            .unwrap();
        assert_eq!(comparison.qubo().size(), 0);
        for run in comparison.runs() {
            let report = run.report().unwrap();
            assert!(report.selection.is_empty());
            assert_eq!(report.energy, 0.0);
        }
    }

    #[test]
    fn test_infeasible_oracle_recorded() {
        let (catalog, params) = fixture();
        let params = params.with_budget(-1.0);
        let comparison = ComparisonHarness::new(HarnessConfig::default())
            .with_solver(OracleSolver::new(ExhaustiveOracle::default().with_hard_budget(true)))
            .with_solver(GreedySolver)
            .run(&catalog, &params)
            .unwrap();
        let exact = comparison.get("exhaustive").unwrap();
        assert!(matches!(exact.outcome, EngineOutcome::Infeasible { budget, .. } if budget == -1.0));
        assert_eq!(comparison.get("greedy").unwrap().report().unwrap().selection.count(), 0);
    }

    #[test]
    fn test_best_and_table() {
        let (catalog, params) = fixture();
        let comparison = ComparisonHarness::new(HarnessConfig::default())
            .with_solver(GreedySolver)
            .with_solver(OracleSolver::new(ExhaustiveOracle::default()))
            .with_solver(Crashing)
            .run(&catalog, &params)
            .unwrap();

        let best = comparison.best().unwrap();
        let exact = comparison.get("exhaustive").unwrap().report().unwrap();
        assert_eq!(best.report().unwrap().energy, exact.energy);

        let table = comparison.to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Solver"));
        assert!(lines[3].contains("FAILED: oracle `crashing` failed: connection refused"));
    }

    #[test]
    fn test_duplicate_names_disambiguated() {
        let (catalog, params) = fixture();
        let comparison = ComparisonHarness::new(HarnessConfig::default())
            .with_solver(SaSolver::new(SaConfig::default().with_steps(200)))
            .with_solver(GreedySolver)
            .with_solver(SaSolver::new(SaConfig::default().with_steps(400)))
            .with_solver(SaSolver::new(SaConfig::default().with_steps(800)))
            .run(&catalog, &params)
            .unwrap();
        let names: Vec<&str> = comparison.runs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sa", "greedy", "sa#2", "sa#3"]);
        assert!(comparison.get("sa#3").unwrap().report().is_some());
    }

    #[test]
    fn test_table_shows_capacity() {
        let (catalog, params) = fixture();
        let comparison = ComparisonHarness::new(HarnessConfig::default())
            .with_solver(GreedySolver)
            .run(&catalog, &params)
            .unwrap();
        let table = comparison.to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("Capacity"));
        assert!(lines[0].contains("Energy (QUBO)"));
        let capacity = comparison.get("greedy").unwrap().report().unwrap().analysis.as_ref().unwrap().total_energy;
        assert!(lines[1].contains(&format!("{capacity:.2}")));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (catalog, params) = fixture();
        let params = params.with_penalties(-1.0, 1.0, 1.0);
        assert!(harness(HarnessConfig::default()).run(&catalog, &params).is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let (catalog, params) = fixture();
        let seq = harness(HarnessConfig::default()).run(&catalog, &params).unwrap();
        let par = harness(HarnessConfig::default().with_parallel(true))
            .run(&catalog, &params)
            .unwrap();
        for (x, y) in seq.runs().iter().zip(par.runs()) {
            assert_eq!(x.name, y.name);
            assert_eq!(
                x.report().map(|r| r.selection.clone()),
                y.report().map(|r| r.selection.clone())
            );
        }
    }
}
