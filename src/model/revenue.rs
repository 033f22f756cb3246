//! Utility revenue collected from the data center.

use serde::Serialize;

use super::params::{HOURS_PER_YEAR, RateStructure};

/// Annual revenue the data center pays the utility, by component ($/year).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueOffset {
    /// Demand charges billed on usage during system peak hours.
    pub cp_demand_revenue: f64,
    /// Demand charges billed on the customer's own monthly peak.
    pub ncp_demand_revenue: f64,
    /// CP + NCP.
    pub demand_revenue: f64,
    pub energy_margin: f64,
    /// Demand revenue + energy margin.
    pub total: f64,
}

/// Computes the data center's annual revenue contribution.
///
/// A flexible data center pays less coincident-peak revenue because it
/// curtails during system peaks, but still registers its own monthly peak
/// and pays the full non-coincident-peak charge.
///
/// # Examples
///
/// ```
/// use bill_impact::model::params::RateStructure;
/// use bill_impact::model::revenue::revenue_offset;
///
/// let r = revenue_offset(&RateStructure::default(), 1_000.0, 0.8, 1.0);
/// assert_eq!(r.cp_demand_revenue, 1_000.0 * 5_430.0 * 12.0);
/// assert_eq!(r.total, r.demand_revenue + r.energy_margin);
/// ```
pub fn revenue_offset(
    rates: &RateStructure,
    capacity_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
) -> RevenueOffset {
    revenue_offset_with_billing_capacity(
        rates,
        capacity_mw,
        capacity_mw,
        load_factor,
        peak_coincidence,
    )
}

/// Like [`revenue_offset`], with a separate capacity for NCP billing and energy.
pub fn revenue_offset_with_billing_capacity(
    rates: &RateStructure,
    capacity_mw: f64,
    billing_capacity_mw: f64,
    load_factor: f64,
    peak_coincidence: f64,
) -> RevenueOffset {
    let coincident_peak_mw = capacity_mw * peak_coincidence;
    let cp_demand_revenue = coincident_peak_mw * rates.coincident_peak_charge_per_mw_month * 12.0;
    let ncp_demand_revenue =
        billing_capacity_mw * rates.non_coincident_peak_charge_per_mw_month * 12.0;
    let demand_revenue = cp_demand_revenue + ncp_demand_revenue;

    let annual_mwh = billing_capacity_mw * load_factor * HOURS_PER_YEAR;
    let energy_margin = annual_mwh * rates.energy_margin_per_mwh;

    RevenueOffset {
        cp_demand_revenue,
        ncp_demand_revenue,
        demand_revenue,
        energy_margin,
        total: demand_revenue + energy_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firm_load_components() {
        let r = revenue_offset(&RateStructure::default(), 1_000.0, 0.8, 1.0);
        assert_eq!(r.cp_demand_revenue, 65_160_000.0);
        assert_eq!(r.ncp_demand_revenue, 43_440_000.0);
        assert_eq!(r.demand_revenue, 108_600_000.0);
        // 7_008_000 MWh * 4.88
        assert!((r.energy_margin - 34_199_040.0).abs() < 1e-3);
    }

    #[test]
    fn curtailment_reduces_only_cp_revenue() {
        let rates = RateStructure::default();
        let firm = revenue_offset(&rates, 1_000.0, 0.95, 1.0);
        let flex = revenue_offset(&rates, 1_000.0, 0.95, 0.75);
        assert!(flex.cp_demand_revenue < firm.cp_demand_revenue);
        assert_eq!(flex.ncp_demand_revenue, firm.ncp_demand_revenue);
        assert_eq!(flex.energy_margin, firm.energy_margin);
    }

    #[test]
    fn billing_capacity_drives_ncp_and_energy() {
        let rates = RateStructure::default();
        let r = revenue_offset_with_billing_capacity(&rates, 1_000.0, 500.0, 1.0, 1.0);
        assert_eq!(r.cp_demand_revenue, 1_000.0 * 5_430.0 * 12.0);
        assert_eq!(r.ncp_demand_revenue, 500.0 * 3_620.0 * 12.0);
        assert!((r.energy_margin - 500.0 * 8760.0 * 4.88).abs() < 1e-6);
    }

    #[test]
    fn zero_capacity_yields_zero_revenue() {
        let r = revenue_offset(&RateStructure::default(), 0.0, 0.8, 1.0);
        assert_eq!(r.total, 0.0);
    }
}
