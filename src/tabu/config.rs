//! Tabu Search configuration.

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_siting::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_iterations(1000)
///     .with_tenure(7);
/// assert_eq!(config.iterations, 1000);
/// assert_eq!(config.tenure, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Number of iterations. The search always runs all of them.
    pub iterations: usize,
    /// Capacity of the tabu list: how many recently flipped indices are
    /// forbidden. A tenure of `n` or more eventually forbids every move.
    pub tenure: usize,
    /// Observer interval in iterations. 0 disables progress snapshots.
    pub progress_interval: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            tenure: 10,
            progress_interval: 0,
        }
    }
}

impl TabuConfig {
    /// Sets the number of iterations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the tabu tenure.
    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = tenure;
        self
    }

    /// Sets the observer interval.
    pub fn with_progress_interval(mut self, every: usize) -> Self {
        self.progress_interval = every;
        self
    }
}
