//! Net residential bill impact of a data center in one projected year.

use serde::Serialize;
use tracing::trace;

use super::params::{AMORTIZATION_YEARS, ModelParams};
use super::revenue::revenue_offset;
use super::types::{LoadOperation, MarketStructure};

/// Share of standard transmission cost charged as interconnection facilities under 4CP.
const FOUR_CP_INTERCONNECTION_SHARE: f64 = 0.3;

/// Capacity cost scale in energy-only markets (no capacity market exists).
const ENERGY_ONLY_CAPACITY_SCALE: f64 = 0.50;

/// Weight of the table capacity cost when blended with a market price.
const CAPACITY_PRICE_BLEND: f64 = 0.5;

const DR_CREDIT_CAPACITY_MARKET: f64 = 0.90;
const DR_CREDIT_DEFAULT: f64 = 0.80;
const GENERATION_CREDIT: f64 = 0.95;

const MARGIN_FLOW_THROUGH_ENERGY_ONLY: f64 = 0.90;
const MARGIN_FLOW_THROUGH_DEFAULT: f64 = 0.85;

/// Share of NCP demand revenue credited against fixed costs.
const NCP_BENEFIT_SHARE: f64 = 0.20;

/// Residential allocation scale under 4CP, where large loads pay transmission directly.
const ENERGY_ONLY_ALLOCATION_SCALE: f64 = 0.70;

/// Capacity price ($/MW-day) above which residential allocation is scaled up.
const HIGH_CAPACITY_PRICE: f64 = 100.0;
const MAX_CAPACITY_PRICE_MULTIPLIER: f64 = 1.15;

/// Net impact of the data center and its components ($/year unless noted).
///
/// A negative `per_customer_monthly` is a bill decrease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactResult {
    /// Residential bill change per customer per month ($).
    pub per_customer_monthly: f64,
    /// Annualized transmission + distribution + capacity cost net of credits.
    pub gross_cost: f64,
    /// Revenue credited against the gross cost.
    pub revenue_offset: f64,
    /// `gross_cost - revenue_offset`.
    pub net_impact: f64,
    /// Residential allocation after market adjustment.
    pub adjusted_allocation: f64,
    /// Demand-response plus generation capacity credit.
    pub capacity_credit: f64,
    /// Whether the load curtails at system peak.
    pub is_flexible: bool,
    pub transmission_annual: f64,
    pub distribution_annual: f64,
    /// Capacity cost before credits.
    pub capacity_cost: f64,
    /// Capacity cost per MW-year after market blending.
    pub base_capacity_cost: f64,
}

/// Combines infrastructure cost, capacity cost/credit, and revenue offset
/// into the monthly per-household bill change.
///
/// Denominators are not checked: zero residential customers yields an
/// infinite or NaN result.
///
/// # Examples
///
/// ```
/// use bill_impact::model::impact::net_impact;
/// use bill_impact::model::params::ModelParams;
/// use bill_impact::model::types::{LoadOperation, MarketStructure};
///
/// let firm = LoadOperation {
///     capacity_mw: 1_000.0,
///     load_factor: 0.8,
///     peak_coincidence: 1.0,
///     onsite_generation_mw: 0.0,
/// };
/// let r = net_impact(
///     &ModelParams::default(),
///     &firm,
///     560_000,
///     0.40,
///     false,
///     &MarketStructure::default(),
/// );
/// assert!(r.per_customer_monthly > 0.0);
/// assert!(!r.is_flexible);
/// ```
pub fn net_impact(
    params: &ModelParams,
    load: &LoadOperation,
    residential_customers: u64,
    residential_allocation: f64,
    include_capacity_credit: bool,
    market: &MarketStructure,
) -> ImpactResult {
    let infra = &params.infrastructure;
    let rates = &params.rates;

    let is_flexible = load.peak_coincidence < 1.0;
    let effective_peak_mw = load.capacity_mw * load.peak_coincidence - load.onsite_generation_mw;
    let billed_peak_mw = effective_peak_mw.max(0.0);

    let transmission_annual = if market.is_energy_only() {
        // 4CP: billed on contribution during the four annual system peaks.
        let four_cp_cost =
            billed_peak_mw * 1000.0 * rates.four_cp_transmission_rate_per_kw_month * 12.0;
        let interconnection =
            billed_peak_mw * infra.transmission_cost_per_mw * FOUR_CP_INTERCONNECTION_SHARE;
        four_cp_cost + interconnection / AMORTIZATION_YEARS
    } else {
        billed_peak_mw * infra.transmission_cost_per_mw / AMORTIZATION_YEARS
    };
    let distribution_annual = billed_peak_mw * infra.distribution_cost_per_mw / AMORTIZATION_YEARS;

    let base_capacity_cost = base_capacity_cost(params, market);
    let net_capacity_cost_per_mw =
        (base_capacity_cost - rates.coincident_peak_charge_per_mw_year()).max(0.0);
    let capacity_cost = billed_peak_mw * net_capacity_cost_per_mw;

    let mut capacity_cost_or_credit = capacity_cost;
    let mut capacity_credit = 0.0;
    if include_capacity_credit && is_flexible {
        let curtailable_mw = load.capacity_mw * (1.0 - load.peak_coincidence);
        let dr_multiplier = if market.has_capacity_market() {
            DR_CREDIT_CAPACITY_MARKET
        } else {
            DR_CREDIT_DEFAULT
        };
        let dr_credit = curtailable_mw * base_capacity_cost * dr_multiplier;
        let generation_credit = load.onsite_generation_mw * base_capacity_cost * GENERATION_CREDIT;
        capacity_credit = dr_credit + generation_credit;
        capacity_cost_or_credit -= capacity_credit;
    }

    let gross_cost = transmission_annual + distribution_annual + capacity_cost_or_credit;

    let revenue = revenue_offset(
        rates,
        load.capacity_mw,
        load.load_factor,
        load.peak_coincidence,
    );
    let flow_through = if market.is_energy_only() {
        MARGIN_FLOW_THROUGH_ENERGY_ONLY
    } else {
        MARGIN_FLOW_THROUGH_DEFAULT
    };
    let ncp_benefit = revenue.ncp_demand_revenue * NCP_BENEFIT_SHARE;
    let revenue_offset = revenue.energy_margin * flow_through + ncp_benefit;

    let net_annual_impact = gross_cost - revenue_offset;

    let adjusted_allocation = market_adjusted_allocation(residential_allocation, market);
    let residential_impact = net_annual_impact * adjusted_allocation;
    let per_customer_monthly = residential_impact / residential_customers as f64 / 12.0;

    trace!(
        market = market.label(),
        transmission_annual,
        distribution_annual,
        capacity_cost,
        capacity_credit,
        revenue_offset,
        net_annual_impact,
        adjusted_allocation,
        "net impact breakdown"
    );

    ImpactResult {
        per_customer_monthly,
        gross_cost,
        revenue_offset,
        net_impact: net_annual_impact,
        adjusted_allocation,
        capacity_credit,
        is_flexible,
        transmission_annual,
        distribution_annual,
        capacity_cost,
        base_capacity_cost,
    }
}

/// Capacity cost per MW-year after blending with the market price signal.
///
/// With a capacity market and a positive clearing price, the table value is
/// blended 50/50 with `price × 365 × pass-through`. Energy-only markets pay
/// half the table value.
pub fn base_capacity_cost(params: &ModelParams, market: &MarketStructure) -> f64 {
    let table = params.infrastructure.capacity_cost_per_mw_year;
    match market {
        MarketStructure::EnergyOnly { .. } => table * ENERGY_ONLY_CAPACITY_SCALE,
        MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(price),
            capacity_cost_pass_through,
            ..
        } if *price > 0.0 => {
            let price_annual = price * 365.0;
            table * CAPACITY_PRICE_BLEND
                + price_annual * capacity_cost_pass_through * (1.0 - CAPACITY_PRICE_BLEND)
        }
        _ => table,
    }
}

/// Applies the market-specific scale to a residential allocation.
///
/// 4CP markets scale it by 0.70. Capacity markets clearing above
/// $100/MW-day scale it up by up to 1.15×.
pub fn market_adjusted_allocation(allocation: f64, market: &MarketStructure) -> f64 {
    match market {
        MarketStructure::EnergyOnly { .. } => allocation * ENERGY_ONLY_ALLOCATION_SCALE,
        MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(price),
            ..
        } if *price > HIGH_CAPACITY_PRICE => {
            let multiplier =
                (1.0 + (price - HIGH_CAPACITY_PRICE) / 1000.0).min(MAX_CAPACITY_PRICE_MULTIPLIER);
            allocation * multiplier
        }
        _ => allocation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firm() -> LoadOperation {
        LoadOperation {
            capacity_mw: 1_000.0,
            load_factor: 0.8,
            peak_coincidence: 1.0,
            onsite_generation_mw: 0.0,
        }
    }

    fn flexible() -> LoadOperation {
        LoadOperation {
            capacity_mw: 1_000.0,
            load_factor: 0.95,
            peak_coincidence: 0.75,
            onsite_generation_mw: 0.0,
        }
    }

    fn pjm() -> MarketStructure {
        MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(269.92),
            capacity_cost_pass_through: 0.50,
            base_residential_allocation: Some(0.35),
        }
    }

    fn ercot() -> MarketStructure {
        MarketStructure::EnergyOnly {
            capacity_cost_pass_through: 0.25,
            base_residential_allocation: Some(0.30),
        }
    }

    #[test]
    fn regulated_firm_load_breakdown() {
        let params = ModelParams::default();
        let r = net_impact(&params, &firm(), 560_000, 0.40, false, &MarketStructure::default());

        assert!((r.transmission_annual - 17_500_000.0).abs() < 1e-6);
        assert!((r.distribution_annual - 7_500_000.0).abs() < 1e-6);
        // (150_000 - 65_160) per MW
        assert!((r.capacity_cost - 84_840_000.0).abs() < 1e-6);
        assert!((r.gross_cost - 109_840_000.0).abs() < 1e-6);
        // 34_199_040 * 0.85 + 43_440_000 * 0.20
        assert!((r.revenue_offset - 37_757_184.0).abs() < 1e-3);
        assert!((r.net_impact - 72_082_816.0).abs() < 1e-3);
        let expected = 72_082_816.0 * 0.40 / 560_000.0 / 12.0;
        assert!((r.per_customer_monthly - expected).abs() < 1e-9);
        assert_eq!(r.capacity_credit, 0.0);
        assert!(!r.is_flexible);
    }

    #[test]
    fn flexible_credit_rewards_curtailment() {
        let params = ModelParams::default();
        let market = MarketStructure::default();
        let r = net_impact(&params, &flexible(), 560_000, 0.40, true, &market);

        // 250 MW curtailable * 150_000 * 0.80
        assert!((r.capacity_credit - 30_000_000.0).abs() < 1e-6);
        assert!((r.gross_cost - 52_380_000.0).abs() < 1e-3);
        assert!(r.is_flexible);

        let no_credit = net_impact(&params, &flexible(), 560_000, 0.40, false, &market);
        assert!(r.per_customer_monthly < no_credit.per_customer_monthly);
    }

    #[test]
    fn onsite_generation_can_make_impact_a_credit() {
        let params = ModelParams::default();
        let load = LoadOperation {
            onsite_generation_mw: 200.0,
            ..flexible()
        };
        let r = net_impact(&params, &load, 560_000, 0.40, true, &MarketStructure::default());

        // DR 30_000_000 + generation 200 * 150_000 * 0.95
        assert!((r.capacity_credit - 58_500_000.0).abs() < 1e-6);
        assert!(r.net_impact < 0.0);
        assert!(r.per_customer_monthly < 0.0);
    }

    #[test]
    fn credit_ignored_for_firm_load() {
        let params = ModelParams::default();
        let market = MarketStructure::default();
        let with = net_impact(&params, &firm(), 560_000, 0.40, true, &market);
        let without = net_impact(&params, &firm(), 560_000, 0.40, false, &market);
        assert_eq!(with, without);
    }

    #[test]
    fn generation_beyond_peak_clamps_costs_to_zero() {
        let params = ModelParams::default();
        let load = LoadOperation {
            onsite_generation_mw: 900.0,
            ..flexible()
        };
        let r = net_impact(&params, &load, 560_000, 0.40, false, &MarketStructure::default());
        assert_eq!(r.transmission_annual, 0.0);
        assert_eq!(r.distribution_annual, 0.0);
        assert_eq!(r.capacity_cost, 0.0);
    }

    #[test]
    fn energy_only_uses_four_cp_transmission() {
        let params = ModelParams::default();
        let r = net_impact(&params, &firm(), 560_000, 0.40, false, &ercot());

        // 1000 MW * 1000 kW/MW * 5.50 * 12 + 1000 * 350_000 * 0.3 / 20
        let expected = 66_000_000.0 + 5_250_000.0;
        assert!((r.transmission_annual - expected).abs() < 1e-6);
        // Half the table capacity cost, less the 65_160 CP charge.
        assert_eq!(r.base_capacity_cost, 75_000.0);
        assert!((r.capacity_cost - 9_840_000.0).abs() < 1e-6);
        assert!((r.adjusted_allocation - 0.28).abs() < 1e-12);
    }

    #[test]
    fn capacity_price_blends_base_cost() {
        let params = ModelParams::default();
        let blended = base_capacity_cost(&params, &pjm());
        let expected = 75_000.0 + 269.92 * 365.0 * 0.50 * 0.5;
        assert!((blended - expected).abs() < 1e-6);

        let no_price = MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: None,
            capacity_cost_pass_through: 0.50,
            base_residential_allocation: None,
        };
        assert_eq!(base_capacity_cost(&params, &no_price), 150_000.0);
    }

    #[test]
    fn high_capacity_price_scales_allocation() {
        // 1 + 169.92 / 1000
        let scaled = market_adjusted_allocation(0.40, &pjm());
        assert!((scaled - 0.40 * 1.15).abs() < 1e-12);

        let moderate = MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(150.0),
            capacity_cost_pass_through: 0.50,
            base_residential_allocation: None,
        };
        assert!((market_adjusted_allocation(0.40, &moderate) - 0.42).abs() < 1e-12);

        let miso = MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(30.0),
            capacity_cost_pass_through: 0.35,
            base_residential_allocation: None,
        };
        assert_eq!(market_adjusted_allocation(0.40, &miso), 0.40);
    }

    #[test]
    fn capacity_market_raises_dr_credit_multiplier() {
        let params = ModelParams::default();
        let miso = MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: None,
            capacity_cost_pass_through: 0.35,
            base_residential_allocation: None,
        };
        let r = net_impact(&params, &flexible(), 560_000, 0.40, true, &miso);
        assert!((r.capacity_credit - 250.0 * 150_000.0 * 0.90).abs() < 1e-6);
    }

    #[test]
    fn other_market_follows_regulated_branches() {
        let params = ModelParams::default();
        let spp = MarketStructure::Other {
            capacity_cost_pass_through: 0.40,
            base_residential_allocation: Some(0.40),
        };
        let a = net_impact(&params, &flexible(), 560_000, 0.40, true, &spp);
        let b = net_impact(&params, &flexible(), 560_000, 0.40, true, &MarketStructure::default());
        assert_eq!(a, b);
    }
}
