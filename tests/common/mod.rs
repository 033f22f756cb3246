//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::Rng;
use rand::rngs::StdRng;

use bill_impact::model::trajectory::ProjectionEngine;
use bill_impact::model::types::{DataCenterProfile, MarketStructure, UtilityProfile};

/// Engine with default economic constants.
pub fn default_engine() -> ProjectionEngine {
    ProjectionEngine::default()
}

/// Regulated utility: 560k residential customers, $130 bill, 4 GW peak.
pub fn default_utility() -> UtilityProfile {
    UtilityProfile::default()
}

/// 1 GW campus: 80% firm LF, 95% flexible LF at 75% peak coincidence, 200 MW onsite.
pub fn default_datacenter() -> DataCenterProfile {
    DataCenterProfile::default()
}

/// One of each market structure, with and without a capacity price.
pub fn all_markets() -> Vec<MarketStructure> {
    vec![
        MarketStructure::default(),
        MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(269.92),
            capacity_cost_pass_through: 0.50,
            base_residential_allocation: Some(0.35),
        },
        MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: None,
            capacity_cost_pass_through: 0.40,
            base_residential_allocation: None,
        },
        MarketStructure::EnergyOnly {
            capacity_cost_pass_through: 0.25,
            base_residential_allocation: Some(0.30),
        },
        MarketStructure::Other {
            capacity_cost_pass_through: 0.40,
            base_residential_allocation: Some(0.40),
        },
    ]
}

/// Random market, drawn from [`all_markets`] with a random capacity price.
pub fn random_market(rng: &mut StdRng) -> MarketStructure {
    let markets = all_markets();
    match markets[rng.random_range(0..markets.len())] {
        MarketStructure::CapacityMarket {
            capacity_cost_pass_through,
            base_residential_allocation,
            ..
        } => MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(rng.random_range(0.0..400.0)),
            capacity_cost_pass_through,
            base_residential_allocation,
        },
        other => other,
    }
}

/// Random valid utility profile.
pub fn random_utility(rng: &mut StdRng) -> UtilityProfile {
    UtilityProfile {
        residential_customers: rng.random_range(10_000..15_000_000),
        commercial_customers: rng.random_range(0..3_000_000),
        industrial_customers: rng.random_range(0..100_000),
        avg_monthly_bill: rng.random_range(60.0..250.0),
        pre_dc_system_energy_gwh: rng.random_range(1_000.0..400_000.0),
        residential_energy_share: rng.random_range(0.0..=1.0),
        system_peak_mw: rng.random_range(500.0..90_000.0),
        base_residential_allocation: rng.random_range(0.0..=1.0),
        market: random_market(rng),
    }
}

/// Random valid data center with flexible operation no worse than firm.
pub fn random_datacenter(rng: &mut StdRng) -> DataCenterProfile {
    let capacity_mw = rng.random_range(10.0..5_000.0);
    let firm_load_factor = rng.random_range(0.5..0.9);
    DataCenterProfile {
        capacity_mw,
        firm_load_factor,
        firm_peak_coincidence: 1.0,
        flex_load_factor: rng.random_range(firm_load_factor..=1.0),
        flex_peak_coincidence: rng.random_range(0.3..1.0),
        onsite_generation_mw: rng.random_range(0.0..=capacity_mw * 0.5),
    }
}
