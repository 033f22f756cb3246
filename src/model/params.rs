//! Economic constant tables injected into every projection.

use serde::{Deserialize, Serialize};

/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Straight-line amortization period for grid infrastructure (years).
pub const AMORTIZATION_YEARS: f64 = 20.0;

/// Per-MW grid infrastructure and capacity costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfrastructureCosts {
    /// Transmission cost per MW of added peak ($).
    pub transmission_cost_per_mw: f64,
    /// Distribution cost per MW of added peak ($).
    pub distribution_cost_per_mw: f64,
    /// Generic capacity cost ($/MW-year).
    pub capacity_cost_per_mw_year: f64,
    /// Annual baseline grid upgrade escalation (fraction).
    pub annual_baseline_upgrade_pct: f64,
}

impl Default for InfrastructureCosts {
    fn default() -> Self {
        Self {
            transmission_cost_per_mw: 350_000.0,
            distribution_cost_per_mw: 150_000.0,
            capacity_cost_per_mw_year: 150_000.0,
            annual_baseline_upgrade_pct: 0.015,
        }
    }
}

/// Large-load tariff the data center is billed under.
///
/// Demand charges are split into a coincident-peak part, billed on usage
/// during system peak hours, and a non-coincident-peak part, billed on the
/// customer's own monthly peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateStructure {
    /// Coincident-peak demand charge ($/MW-month).
    pub coincident_peak_charge_per_mw_month: f64,
    /// Non-coincident-peak demand charge ($/MW-month).
    pub non_coincident_peak_charge_per_mw_month: f64,
    /// Utility margin on energy sales ($/MWh).
    pub energy_margin_per_mwh: f64,
    /// ERCOT-style 4CP transmission rate ($/kW-month).
    pub four_cp_transmission_rate_per_kw_month: f64,
}

impl Default for RateStructure {
    fn default() -> Self {
        Self {
            coincident_peak_charge_per_mw_month: 5_430.0,
            non_coincident_peak_charge_per_mw_month: 3_620.0,
            energy_margin_per_mwh: 4.88,
            four_cp_transmission_rate_per_kw_month: 5.50,
        }
    }
}

impl RateStructure {
    /// Coincident-peak charge annualized ($/MW-year).
    pub fn coincident_peak_charge_per_mw_year(&self) -> f64 {
        self.coincident_peak_charge_per_mw_month * 12.0
    }
}

/// Projection calendar and escalation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeParams {
    /// Calendar year of projection year 0.
    pub base_year: i32,
    pub general_inflation: f64,
    /// Default horizon when the caller does not give one.
    pub projection_years: usize,
}

impl Default for TimeParams {
    fn default() -> Self {
        Self {
            base_year: 2025,
            general_inflation: 0.025,
            projection_years: 10,
        }
    }
}

/// Full parameter set for one projection.
///
/// Built once and passed by reference; nothing in the engine reads
/// ambient globals.
///
/// # Examples
///
/// ```
/// use bill_impact::model::params::ModelParams;
///
/// let params = ModelParams::default();
/// assert_eq!(params.rates.coincident_peak_charge_per_mw_year(), 65_160.0);
/// assert!((params.baseline_escalation_rate() - 0.045).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParams {
    pub infrastructure: InfrastructureCosts,
    pub rates: RateStructure,
    pub time: TimeParams,
}

/// Grid modernization escalation added to every baseline year.
pub const GRID_MODERNIZATION_PCT: f64 = 0.005;

impl ModelParams {
    /// Annual baseline bill growth: inflation + upgrades + grid modernization.
    pub fn baseline_escalation_rate(&self) -> f64 {
        self.time.general_inflation
            + self.infrastructure.annual_baseline_upgrade_pct
            + GRID_MODERNIZATION_PCT
    }
}
