//! Progress observation for engine runs.
//!
//! Observers are a pure side channel: engines call them at configured
//! intervals and never read anything back, so attaching one does not change
//! the search trajectory.

use crate::catalog::SiteCatalog;
use crate::selection::Selection;

/// Receives snapshots of an engine's current state.
pub trait SearchObserver {
    /// Called with the step number, the current energy and the current state.
    fn observe(&mut self, step: usize, energy: f64, state: &Selection);
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn observe(&mut self, _step: usize, _energy: f64, _state: &Selection) {}
}

impl<F: FnMut(usize, f64, &Selection)> SearchObserver for F {
    fn observe(&mut self, step: usize, energy: f64, state: &Selection) {
        self(step, energy, state)
    }
}

/// One recorded point of a search trajectory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    pub step: usize,
    /// Current energy; `None` for engines without one (greedy).
    pub energy: Option<f64>,
    pub total_cost: f64,
    pub total_population: f64,
    /// Selection as `0`/`1` per catalog index.
    pub solution: Vec<u8>,
}

/// Observer that records snapshots, deriving totals from a catalog.
///
/// Without a catalog the totals are left at zero.
#[derive(Debug, Clone, Default)]
pub struct ProgressTrace<'a> {
    catalog: Option<&'a SiteCatalog>,
    snapshots: Vec<ProgressSnapshot>,
}

impl<'a> ProgressTrace<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace that also records total cost and population per snapshot.
    pub fn with_catalog(catalog: &'a SiteCatalog) -> Self {
        Self {
            catalog: Some(catalog),
            snapshots: Vec::new(),
        }
    }

    pub fn snapshots(&self) -> &[ProgressSnapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<ProgressSnapshot> {
        self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SearchObserver for ProgressTrace<'_> {
    fn observe(&mut self, step: usize, energy: f64, state: &Selection) {
        let (total_cost, total_population) = match self.catalog {
            Some(catalog) if catalog.len() == state.len() => catalog.totals(state),
            _ => (0.0, 0.0),
        };
        self.snapshots.push(ProgressSnapshot {
            step,
            energy: energy.is_finite().then_some(energy),
            total_cost,
            total_population,
            solution: state.to_binary(),
        });
    }
}
