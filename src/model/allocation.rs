//! Residential cost allocation under a growing large load.

use serde::Serialize;

use super::params::HOURS_PER_YEAR;
use super::types::UtilityProfile;

/// Residential share of system peak demand.
pub const RESIDENTIAL_PEAK_SHARE: f64 = 0.45;

/// Years until the data center reaches full production.
pub const RAMP_YEARS: f64 = 3.0;

/// Years of rate cases before the computed allocation fully applies.
pub const REGULATORY_LAG_YEARS: f64 = 5.0;

const VOLUMETRIC_WEIGHT: f64 = 0.40;
const DEMAND_WEIGHT: f64 = 0.40;
const CUSTOMER_WEIGHT: f64 = 0.20;

/// Bounds on the final residential allocation.
pub const MIN_ALLOCATION: f64 = 0.15;
pub const MAX_ALLOCATION: f64 = 0.50;

/// Residential allocation and the shares it was blended from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationResult {
    /// Final residential allocation, clamped to `[0.15, 0.50]`.
    pub fraction: f64,
    pub volumetric_share: f64,
    pub demand_share: f64,
    pub customer_share: f64,
}

/// Computes the fraction of net utility cost assigned to residential customers.
///
/// The allocation blends volumetric (40%), peak-demand (40%), and customer
/// count (20%) shares computed with the data center's ramped-in energy and
/// peak. Rate-case inertia moves the result from the base allocation to the
/// blend over five years.
///
/// Denominators are not checked: zero system energy or peak yields NaN.
///
/// # Examples
///
/// ```
/// use bill_impact::model::allocation::allocate;
/// use bill_impact::model::types::UtilityProfile;
///
/// let utility = UtilityProfile::default();
/// let result = allocate(&utility, 1_000.0, 0.8, 1.0, 0);
/// // No regulatory lag has elapsed in the first year online.
/// assert_eq!(result.fraction, 0.40);
/// ```
pub fn allocate(
    utility: &UtilityProfile,
    dc_capacity_mw: f64,
    dc_load_factor: f64,
    dc_peak_coincidence: f64,
    years_online: u32,
) -> AllocationResult {
    let system_energy_mwh = utility.pre_dc_system_energy_gwh * 1000.0;
    let residential_energy_mwh = system_energy_mwh * utility.residential_energy_share;

    let dc_energy_mwh = dc_capacity_mw * dc_load_factor * HOURS_PER_YEAR;
    let ramp = ramp_factor(years_online);
    let post_dc_energy_mwh = system_energy_mwh + dc_energy_mwh * ramp;
    let volumetric_share = residential_energy_mwh / post_dc_energy_mwh;

    let residential_peak_mw = utility.system_peak_mw * RESIDENTIAL_PEAK_SHARE;
    let post_dc_peak_mw = utility.system_peak_mw + dc_capacity_mw * dc_peak_coincidence * ramp;
    let demand_share = residential_peak_mw / post_dc_peak_mw;

    // +1 keeps the denominator non-zero.
    let total_customers = (utility.residential_customers
        + utility.commercial_customers
        + utility.industrial_customers
        + 1) as f64;
    let customer_share = utility.residential_customers as f64 / total_customers;

    let weighted = volumetric_share * VOLUMETRIC_WEIGHT
        + demand_share * DEMAND_WEIGHT
        + customer_share * CUSTOMER_WEIGHT;

    let lag = regulatory_lag_factor(years_online);
    let base = utility.effective_base_allocation();
    let adjusted = base * (1.0 - lag) + weighted * lag;

    AllocationResult {
        fraction: adjusted.clamp(MIN_ALLOCATION, MAX_ALLOCATION),
        volumetric_share,
        demand_share,
        customer_share,
    }
}

/// Fraction of the data center's energy and peak present after `years_online`.
pub fn ramp_factor(years_online: u32) -> f64 {
    (f64::from(years_online) / RAMP_YEARS).min(1.0)
}

/// Fraction of the computed allocation reflected in rates after `years_online`.
pub fn regulatory_lag_factor(years_online: u32) -> f64 {
    (f64::from(years_online) / REGULATORY_LAG_YEARS).min(1.0)
}
