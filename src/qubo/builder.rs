//! QUBO construction and direct penalty evaluation.

use super::config::QuboParams;
use super::types::QuboInstance;
use crate::catalog::SiteCatalog;
use crate::selection::Selection;

/// Builds the QUBO instance for `catalog` under `params`.
///
/// Terms are accumulated in a fixed order (reward, budget, cardinality,
/// coverage), so identical inputs give bit-identical output. Each squared
/// penalty `w·(Σ a_i·x_i − b)²` expands into a diagonal `w·(a_i² − 2·b·a_i)`,
/// a cross term `2·w·a_i·a_j` per unordered pair split evenly over
/// `Q[i][j]` and `Q[j][i]`, and a constant `w·b²` in the offset.
///
/// An empty catalog yields a `0 × 0` matrix whose offset is the sum of the
/// three constants.
///
/// # Examples
///
/// ```
/// use u_siting::catalog::SiteCatalog;
/// use u_siting::qubo::{build_qubo, evaluate, QuboParams};
/// use u_siting::Selection;
///
/// let catalog = SiteCatalog::from_columns(&[100.0, 200.0], &[50.0, 80.0], &[0.0, 0.0]).unwrap();
/// let params = QuboParams::default().with_budget(250.0).with_max_count(1);
/// let qubo = build_qubo(&catalog, &params);
///
/// let x = Selection::from_indices(2, &[1]);
/// let direct = evaluate(&catalog, &params, &x).total();
/// assert!((qubo.objective(&x) - direct).abs() <= 1e-9 * direct.abs().max(1.0));
/// ```
pub fn build_qubo(catalog: &SiteCatalog, params: &QuboParams) -> QuboInstance {
    let costs = catalog.costs();
    let populations = catalog.populations();
    let energies = catalog.energies();
    let n = costs.len();

    let mut q = QuboInstance::zeros(n, 0.0);

    for i in 0..n {
        q.add(
            i,
            i,
            costs[i] - params.alpha * populations[i] - params.gamma * energies[i],
        );
    }

    add_squared_penalty(&mut q, &costs, params.budget, params.theta);

    let ones = vec![1.0; n];
    add_squared_penalty(&mut q, &ones, params.max_count as f64, params.mu);

    add_squared_penalty(&mut q, &populations, params.min_population, params.lambda);

    log::debug!(
        "built QUBO: n={n}, offset={:.6e}, budget={}, max_count={}, min_population={}",
        q.offset(),
        params.budget,
        params.max_count,
        params.min_population
    );
    q
}

/// Adds `weight·(Σ a_i·x_i − target)²` to `q`.
///
/// `(b − Σ a·x)²` and `(Σ a·x − b)²` are the same polynomial, so this also
/// encodes the coverage term.
fn add_squared_penalty(q: &mut QuboInstance, a: &[f64], target: f64, weight: f64) {
    let n = a.len();
    for i in 0..n {
        q.add(i, i, weight * (a[i] * a[i] - 2.0 * target * a[i]));
        // The pair's 2·w·a_i·a_j is split evenly across (i, j) and (j, i).
        for j in (i + 1)..n {
            let v = weight * a[i] * a[j];
            q.add(i, j, v);
            q.add(j, i, v);
        }
    }
    q.add_offset(weight * target * target);
}

/// Objective and penalty terms of a selection, evaluated from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyBreakdown {
    /// `Σ (cost − α·pop − γ·energy)` over selected sites.
    pub objective: f64,
    /// `θ·(Σ cost − budget)²`.
    pub budget: f64,
    /// `μ·(count − max_count)²`.
    pub cardinality: f64,
    /// `λ·(min_population − Σ pop)²`.
    pub coverage: f64,
}

impl PenaltyBreakdown {
    /// Objective plus all penalties; equals `x·Q·x + offset`.
    pub fn total(&self) -> f64 {
        self.objective + self.budget + self.cardinality + self.coverage
    }
}

/// Evaluates the penalized objective of `x` directly, without a matrix.
///
/// # Panics
///
/// Panics if `x` is longer than the catalog.
pub fn evaluate(catalog: &SiteCatalog, params: &QuboParams, x: &Selection) -> PenaltyBreakdown {
    let mut objective = 0.0;
    let mut cost = 0.0;
    let mut population = 0.0;
    let mut count = 0usize;
    for i in x.iter_selected() {
        let site = &catalog.sites()[i];
        objective += site.installation_cost
            - params.alpha * site.population_coverage
            - params.gamma * site.energy_capacity;
        cost += site.installation_cost;
        population += site.population_coverage;
        count += 1;
    }

    let over_budget = cost - params.budget;
    let over_count = count as f64 - params.max_count as f64;
    let under_coverage = params.min_population - population;

    PenaltyBreakdown {
        objective,
        budget: params.theta * over_budget * over_budget,
        cardinality: params.mu * over_count * over_count,
        coverage: params.lambda * under_coverage * under_coverage,
    }
}
