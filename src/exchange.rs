//! JSON exchange records.
//!
//! These are the shapes external oracles and reporting tools read and
//! write: the QUBO instance (`{"Q": [[..]], "offset"?}`), the per-site cost
//! vector, site records with their tabular column names, solver results and
//! progress traces. Every record is index-aligned with the catalog.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Site, SiteCatalog};
use crate::error::{Error, Result};
use crate::harness::{Comparison, EngineOutcome, EngineRun};
use crate::qubo::QuboInstance;
use crate::solver::{OracleOutcome, OracleSolution, SolutionReport};
use crate::trace::ProgressSnapshot;

/// Message carried by a result record for an infeasible run.
pub const INFEASIBLE_MESSAGE: &str = "No feasible solution under budget constraint";

/// A QUBO instance as exchanged with oracles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuboRecord {
    /// Square, row-major matrix.
    #[serde(rename = "Q")]
    pub q: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

impl QuboRecord {
    /// Validates squareness; a missing offset reads as zero.
    pub fn into_instance(self) -> Result<QuboInstance> {
        QuboInstance::from_rows(self.q, self.offset.unwrap_or(0.0))
    }
}

impl From<&QuboInstance> for QuboRecord {
    fn from(qubo: &QuboInstance) -> Self {
        Self {
            q: qubo.to_rows(),
            offset: Some(qubo.offset()),
        }
    }
}

/// One catalog row with its tabular column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(rename = "Site_ID")]
    pub site_id: String,
    #[serde(rename = "Installation_Cost_USD")]
    pub installation_cost_usd: f64,
    #[serde(rename = "Population_Coverage")]
    pub population_coverage: f64,
    #[serde(rename = "Solar_Potential_kWh_m2_day")]
    pub solar_potential_kwh_m2_day: f64,
    #[serde(rename = "Energy_Capacity_kWh_day")]
    pub energy_capacity_kwh_day: f64,
    #[serde(rename = "X_coord")]
    pub x_coord: f64,
    #[serde(rename = "Y_coord")]
    pub y_coord: f64,
}

impl From<&Site> for SiteRecord {
    fn from(site: &Site) -> Self {
        Self {
            site_id: site.id.clone(),
            installation_cost_usd: site.installation_cost,
            population_coverage: site.population_coverage,
            solar_potential_kwh_m2_day: site.solar_potential,
            energy_capacity_kwh_day: site.energy_capacity,
            x_coord: site.coordinates.0,
            y_coord: site.coordinates.1,
        }
    }
}

impl From<SiteRecord> for Site {
    fn from(record: SiteRecord) -> Self {
        Site {
            id: record.site_id,
            installation_cost: record.installation_cost_usd,
            population_coverage: record.population_coverage,
            solar_potential: record.solar_potential_kwh_m2_day,
            energy_capacity: record.energy_capacity_kwh_day,
            coordinates: (record.x_coord, record.y_coord),
        }
    }
}

/// Outcome of one solver run in exchange form.
///
/// On failure `error` is set, `selected_indices` is empty and `fval` is
/// `null`. An infeasible run carries [`INFEASIBLE_MESSAGE`] and, when
/// written by this crate, echoes `budget` and `costs`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultRecord {
    pub selected_indices: Vec<usize>,
    pub fval: Option<f64>,
    pub time_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_population: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sites: Option<usize>,
}

impl ResultRecord {
    pub fn from_report(report: &SolutionReport) -> Self {
        let analysis = report.analysis.as_ref();
        Self {
            selected_indices: report.selected_indices(),
            fval: Some(report.energy),
            time_sec: report.elapsed.as_secs_f64(),
            total_cost: analysis.map(|a| a.total_cost),
            total_population: analysis.map(|a| a.total_population),
            total_energy: analysis.map(|a| a.total_energy),
            num_sites: analysis.map(|a| a.num_sites),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>, time_sec: f64) -> Self {
        Self {
            error: Some(error.into()),
            time_sec,
            ..Self::default()
        }
    }

    pub fn infeasible(budget: f64, costs: Vec<f64>, time_sec: f64) -> Self {
        Self {
            budget: Some(budget),
            costs: Some(costs),
            ..Self::failure(INFEASIBLE_MESSAGE, time_sec)
        }
    }

    pub fn from_run(run: &EngineRun) -> Self {
        let secs = run.elapsed.as_secs_f64();
        match &run.outcome {
            EngineOutcome::Solved(report) => Self {
                time_sec: secs,
                ..Self::from_report(report)
            },
            EngineOutcome::Infeasible { budget, costs } => Self::infeasible(*budget, costs.clone(), secs),
            EngineOutcome::Failed { reason } => Self::failure(reason.clone(), secs),
        }
    }

    /// Reads a record returned by the oracle named `oracle`.
    ///
    /// An error carrying [`INFEASIBLE_MESSAGE`] or an echoed budget is
    /// infeasibility; any other error, or a missing `fval`, is an
    /// [`Error::OracleFailed`].
    pub fn into_oracle_outcome(self, oracle: &str) -> Result<OracleOutcome> {
        let failed = |reason: String| Error::OracleFailed {
            oracle: oracle.to_string(),
            reason,
        };
        match (self.error, self.budget, self.fval) {
            (Some(_), Some(_), _) => Ok(OracleOutcome::Infeasible),
            (Some(reason), None, _) if reason == INFEASIBLE_MESSAGE => Ok(OracleOutcome::Infeasible),
            (Some(reason), None, _) => Err(failed(reason)),
            (None, _, None) => Err(failed("result has no fval".into())),
            (None, _, Some(fval)) => Ok(OracleOutcome::Solved(OracleSolution {
                selected_indices: self.selected_indices,
                fval,
                time_sec: self.time_sec,
            })),
        }
    }
}

pub fn qubo_to_json(qubo: &QuboInstance) -> Result<String> {
    Ok(serde_json::to_string(&QuboRecord::from(qubo))?)
}

/// Parses `{"Q": [[..]], "offset"?}`, rejecting non-square matrices.
pub fn qubo_from_json(json: &str) -> Result<QuboInstance> {
    serde_json::from_str::<QuboRecord>(json)?.into_instance()
}

/// The catalog's cost column as a flat array.
pub fn costs_to_json(catalog: &SiteCatalog) -> Result<String> {
    Ok(serde_json::to_string(&catalog.costs())?)
}

pub fn costs_from_json(json: &str) -> Result<Vec<f64>> {
    Ok(serde_json::from_str(json)?)
}

pub fn catalog_to_json(catalog: &SiteCatalog) -> Result<String> {
    let records: Vec<SiteRecord> = catalog.iter().map(SiteRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

pub fn catalog_from_json(json: &str) -> Result<SiteCatalog> {
    let records: Vec<SiteRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(Site::from).collect::<Vec<_>>().into())
}

pub fn trace_to_json(snapshots: &[ProgressSnapshot]) -> Result<String> {
    Ok(serde_json::to_string(snapshots)?)
}

pub fn trace_from_json(json: &str) -> Result<Vec<ProgressSnapshot>> {
    Ok(serde_json::from_str(json)?)
}

/// Result records keyed by engine name, in registration order.
struct RunsByName<'a>(&'a [EngineRun]);

impl Serialize for RunsByName<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for run in self.0 {
            map.serialize_entry(&run.name, &ResultRecord::from_run(run))?;
        }
        map.end()
    }
}

/// Every run of `comparison` as `{engine name: result record}`, keys in
/// registration order.
pub fn comparison_to_json(comparison: &Comparison) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RunsByName(comparison.runs()))?)
}
