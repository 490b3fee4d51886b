//! SA configuration and cooling schedules.

use crate::error::{Error, Result};

/// Cooling schedule from `initial_temperature` down to `min_temperature`.
///
/// Both schedules are monotonically non-increasing and reach
/// `min_temperature` exactly at the final step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric interpolation: `T_k = T_max · (T_min / T_max)^(k / (steps − 1))`.
    ///
    /// Standard annealing schedule; spends most steps at low temperature.
    #[default]
    Geometric,

    /// Linear interpolation: `T_k = T_max − k · (T_max − T_min) / (steps − 1)`.
    Linear,
}

/// Configuration for the Simulated Annealing engine.
///
/// # Examples
///
/// ```
/// use u_siting::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_steps(20_000)
///     .with_initial_temperature(25_000.0)
///     .with_min_temperature(0.001)
///     .with_cooling(CoolingSchedule::Geometric)
///     .with_progress_interval(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Number of single-bit-flip proposals.
    pub steps: usize,

    /// Starting temperature `T_max`. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Final temperature `T_min`.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Observer interval in steps. 0 disables progress snapshots.
    pub progress_interval: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            steps: 10_000,
            initial_temperature: 25_000.0,
            min_temperature: 0.001,
            cooling: CoolingSchedule::default(),
            progress_interval: 0,
        }
    }
}

impl SaConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_progress_interval(mut self, every: usize) -> Self {
        self.progress_interval = every;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(Error::invalid_config(
                "initial_temperature",
                format!("must be positive and finite, got {}", self.initial_temperature),
            ));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(Error::invalid_config(
                "min_temperature",
                format!("must be positive and finite, got {}", self.min_temperature),
            ));
        }
        if self.min_temperature > self.initial_temperature {
            return Err(Error::invalid_config(
                "min_temperature",
                "must not exceed initial_temperature",
            ));
        }
        Ok(())
    }

    /// Temperature at step `k` (0-based) of a run of `self.steps` steps.
    pub fn temperature(&self, k: usize) -> f64 {
        let (t_max, t_min) = (self.initial_temperature, self.min_temperature);
        if self.steps <= 1 || k + 1 >= self.steps {
            return t_min;
        }
        let frac = k as f64 / (self.steps - 1) as f64;
        let t = match self.cooling {
            CoolingSchedule::Geometric => t_max * (t_min / t_max).powf(frac),
            CoolingSchedule::Linear => t_max - frac * (t_max - t_min),
        };
        t.max(t_min)
    }
}
