//! Constraint parameters and penalty weights.

use crate::error::{Error, Result};

/// Constraint parameters and penalty weights for [`build_qubo`](super::build_qubo).
///
/// # Examples
///
/// ```
/// use u_siting::qubo::QuboParams;
///
/// let params = QuboParams::default()
///     .with_budget(300.0)
///     .with_max_count(2)
///     .with_min_population(0.0);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuboParams {
    /// Total installation budget.
    pub budget: f64,
    /// Target number of selected sites.
    pub max_count: usize,
    /// Minimum population that should be covered.
    pub min_population: f64,
    /// Reward per covered person (α).
    pub alpha: f64,
    /// Reward per kWh/day of capacity (γ).
    pub gamma: f64,
    /// Budget penalty weight (θ).
    pub theta: f64,
    /// Cardinality penalty weight (μ).
    pub mu: f64,
    /// Coverage penalty weight (λ).
    pub lambda: f64,
}

impl Default for QuboParams {
    fn default() -> Self {
        Self {
            budget: 900_000.0,
            max_count: 10,
            min_population: 15_000.0,
            alpha: 1e-1,
            gamma: 1e-1,
            theta: 1e-6,
            mu: 2.0,
            lambda: 1e-2,
        }
    }
}

impl QuboParams {
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_min_population(mut self, min_population: f64) -> Self {
        self.min_population = min_population;
        self
    }

    /// Sets the objective weights α (coverage) and γ (capacity).
    pub fn with_rewards(mut self, alpha: f64, gamma: f64) -> Self {
        self.alpha = alpha;
        self.gamma = gamma;
        self
    }

    /// Sets the penalty weights θ (budget), μ (cardinality) and λ (coverage).
    pub fn with_penalties(mut self, theta: f64, mu: f64, lambda: f64) -> Self {
        self.theta = theta;
        self.mu = mu;
        self.lambda = lambda;
        self
    }

    /// Validates the parameters.
    ///
    /// Zero budgets and zero weights are valid degenerate instances; only
    /// non-finite numbers and negative penalty weights are rejected.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("budget", self.budget),
            ("min_population", self.min_population),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("theta", self.theta),
            ("mu", self.mu),
            ("lambda", self.lambda),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(Error::invalid_config(field, format!("must be finite, got {value}")));
            }
        }
        for (field, value) in [("theta", self.theta), ("mu", self.mu), ("lambda", self.lambda)] {
            if value < 0.0 {
                return Err(Error::invalid_config(
                    field,
                    format!("penalty weight must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}
