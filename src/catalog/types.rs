//! Site and catalog types.

use crate::error::{Error, Result};
use crate::selection::Selection;

/// A candidate facility site.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    /// External identifier, e.g. `Site_17`.
    pub id: String,
    /// Installation cost in USD.
    pub installation_cost: f64,
    /// Population covered when the site is built.
    pub population_coverage: f64,
    /// Solar potential in kWh/m²/day.
    pub solar_potential: f64,
    /// Energy capacity in kWh/day.
    pub energy_capacity: f64,
    /// `(x, y)`; longitude/latitude for generated catalogs.
    pub coordinates: (f64, f64),
}

impl Site {
    /// Site with the three attributes the optimizer uses; the rest default to zero.
    pub fn new(
        id: impl Into<String>,
        installation_cost: f64,
        population_coverage: f64,
        energy_capacity: f64,
    ) -> Self {
        Self {
            id: id.into(),
            installation_cost,
            population_coverage,
            solar_potential: 0.0,
            energy_capacity,
            coordinates: (0.0, 0.0),
        }
    }

    /// Population covered per dollar. Zero-cost sites rank first when they
    /// cover anyone and last otherwise.
    pub fn coverage_ratio(&self) -> f64 {
        if self.installation_cost > 0.0 {
            self.population_coverage / self.installation_cost
        } else if self.population_coverage > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// Ordered, immutable collection of candidate sites.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiteCatalog {
    sites: Vec<Site>,
}

impl SiteCatalog {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    /// Catalog built from parallel cost/population/energy columns.
    pub fn from_columns(costs: &[f64], populations: &[f64], energies: &[f64]) -> Result<Self> {
        Error::ensure_len("population column", costs.len(), populations.len())?;
        Error::ensure_len("energy column", costs.len(), energies.len())?;
        let sites = costs
            .iter()
            .zip(populations)
            .zip(energies)
            .enumerate()
            .map(|(i, ((&c, &p), &e))| Site::new(format!("Site_{}", i + 1), c, p, e))
            .collect();
        Ok(Self { sites })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn get(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    /// Installation costs, index-aligned with the catalog.
    pub fn costs(&self) -> Vec<f64> {
        self.sites.iter().map(|s| s.installation_cost).collect()
    }

    /// Population coverage, index-aligned with the catalog.
    pub fn populations(&self) -> Vec<f64> {
        self.sites.iter().map(|s| s.population_coverage).collect()
    }

    /// Energy capacity, index-aligned with the catalog.
    pub fn energies(&self) -> Vec<f64> {
        self.sites.iter().map(|s| s.energy_capacity).collect()
    }

    /// Fails unless `selection` has one entry per catalog row.
    pub fn check_selection(&self, selection: &Selection) -> Result<()> {
        Error::ensure_len("selection", self.len(), selection.len())
    }

    /// Total cost and population of a selection. Lengths must already match.
    pub(crate) fn totals(&self, selection: &Selection) -> (f64, f64) {
        selection
            .iter_selected()
            .map(|i| &self.sites[i])
            .fold((0.0, 0.0), |(c, p), s| {
                (c + s.installation_cost, p + s.population_coverage)
            })
    }
}

impl From<Vec<Site>> for SiteCatalog {
    fn from(sites: Vec<Site>) -> Self {
        Self::new(sites)
    }
}

impl<'a> IntoIterator for &'a SiteCatalog {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}
