//! Harness configuration.

/// Configuration for a [`ComparisonHarness`](super::ComparisonHarness) run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarnessConfig {
    /// Base seed; engine `i` draws from a generator seeded with `seed + i`.
    pub seed: u64,

    /// Run engines concurrently. Requires the `parallel` feature; ignored
    /// otherwise. Results keep registration order either way.
    pub parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            parallel: false,
        }
    }
}

impl HarnessConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed handed to the engine registered at `index`.
    pub fn engine_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}
