//! Mapping selection vectors back onto the catalog.

use crate::catalog::{Site, SiteCatalog};
use crate::error::Result;
use crate::selection::Selection;

/// Aggregates of a selection over its catalog.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteAnalysis {
    pub total_cost: f64,
    pub total_population: f64,
    pub total_energy: f64,
    pub num_sites: usize,
    /// Selected sites in catalog order.
    pub selected_sites: Vec<Site>,
}

impl SiteAnalysis {
    /// Ids of the selected sites, in catalog order.
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected_sites.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Summarizes the sites selected by `x`.
///
/// `x` must have one entry per catalog row. An empty selection yields
/// all-zero totals.
///
/// # Examples
///
/// ```
/// use u_siting::analysis::analyze;
/// use u_siting::catalog::SiteCatalog;
/// use u_siting::Selection;
///
/// let catalog = SiteCatalog::from_columns(&[100.0, 200.0], &[5.0, 7.0], &[1.0, 2.0]).unwrap();
/// let a = analyze(&Selection::from_indices(2, &[1]), &catalog).unwrap();
/// assert_eq!(a.total_cost, 200.0);
/// assert_eq!(a.num_sites, 1);
/// ```
pub fn analyze(x: &Selection, catalog: &SiteCatalog) -> Result<SiteAnalysis> {
    catalog.check_selection(x)?;
    Ok(summarize(x, catalog))
}

/// [`analyze`] for callers that built `x` from `catalog` themselves.
pub(crate) fn summarize(x: &Selection, catalog: &SiteCatalog) -> SiteAnalysis {
    let mut analysis = SiteAnalysis::default();
    for i in x.iter_selected() {
        let site = &catalog.sites()[i];
        analysis.total_cost += site.installation_cost;
        analysis.total_population += site.population_coverage;
        analysis.total_energy += site.energy_capacity;
        analysis.num_sites += 1;
        analysis.selected_sites.push(site.clone());
    }
    analysis
}
