//! Built-in catalog of real utilities and wholesale market presets.
//!
//! Figures reflect 2024 public filings (EIA, utility annual reports). Each
//! entry can be applied on top of a [`UtilityProfile`] to start a projection
//! from that utility's customer base and market.

use serde::Serialize;

use crate::model::types::{MarketStructure, UtilityProfile};

/// Historical capacity price used to normalize auction results ($/MW-day).
pub const HISTORICAL_CAPACITY_PRICE: f64 = 30.0;

/// Ceiling on the allocation bump from a high capacity price.
pub const MAX_CAPACITY_ADJUSTMENT: f64 = 0.10;

/// Allocation bump per multiple of the historical capacity price.
pub const CAPACITY_ADJUSTMENT_SLOPE: f64 = 0.02;

/// Scale applied to allocation in energy-only markets.
pub const ENERGY_ONLY_ALLOCATION_SCALE: f64 = 0.85;

/// Residential allocation of a regulated utility with no market override.
pub const REGULATED_BASE_ALLOCATION: f64 = 0.40;

pub const MIN_PRESET_ALLOCATION: f64 = 0.20;
pub const MAX_PRESET_ALLOCATION: f64 = 0.55;

/// Wholesale market a catalog utility belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    Regulated,
    Pjm,
    Ercot,
    Miso,
    Spp,
}

impl MarketType {
    pub const ALL: [MarketType; 5] = [
        MarketType::Regulated,
        MarketType::Pjm,
        MarketType::Ercot,
        MarketType::Miso,
        MarketType::Spp,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MarketType::Regulated => "regulated",
            MarketType::Pjm => "pjm",
            MarketType::Ercot => "ercot",
            MarketType::Miso => "miso",
            MarketType::Spp => "spp",
        }
    }

    /// Market parameters with the market's default residential allocation.
    pub fn structure(self) -> MarketStructure {
        match self {
            MarketType::Regulated => regulated(REGULATED_BASE_ALLOCATION),
            MarketType::Pjm => pjm(0.35),
            MarketType::Ercot => ercot(0.30),
            MarketType::Miso => MISO,
            MarketType::Spp => spp(0.40),
        }
    }

    pub fn notes(self) -> &'static str {
        match self {
            MarketType::Regulated => {
                "Vertically integrated utility. Infrastructure costs allocated through traditional rate base."
            }
            MarketType::Pjm => {
                "PJM capacity market. 2024 auction cleared at $269.92/MW-day (10x increase)."
            }
            MarketType::Ercot => {
                "Energy-only market with no capacity payments. Price signals drive investment."
            }
            MarketType::Miso => "MISO capacity market with lower clearing prices than PJM.",
            MarketType::Spp => {
                "Southwest Power Pool. Energy market but no mandatory capacity market."
            }
        }
    }
}

const fn regulated(base: f64) -> MarketStructure {
    MarketStructure::Regulated {
        base_residential_allocation: Some(base),
        capacity_cost_pass_through: 0.40,
    }
}

const fn pjm(base: f64) -> MarketStructure {
    MarketStructure::CapacityMarket {
        capacity_price_per_mw_day: Some(269.92),
        capacity_cost_pass_through: 0.50,
        base_residential_allocation: Some(base),
    }
}

const fn ercot(base: f64) -> MarketStructure {
    MarketStructure::EnergyOnly {
        capacity_cost_pass_through: 0.25,
        base_residential_allocation: Some(base),
    }
}

const fn spp(base: f64) -> MarketStructure {
    MarketStructure::Other {
        capacity_cost_pass_through: 0.40,
        base_residential_allocation: Some(base),
    }
}

const MISO: MarketStructure = MarketStructure::CapacityMarket {
    capacity_price_per_mw_day: Some(30.0),
    capacity_cost_pass_through: 0.35,
    base_residential_allocation: Some(0.38),
};

/// One utility in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilityPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    /// Empty for the custom entry.
    pub state: &'static str,
    /// Empty for the custom entry.
    pub region: &'static str,
    pub residential_customers: u64,
    pub total_customers: u64,
    pub system_peak_mw: f64,
    pub avg_monthly_bill: f64,
    pub avg_monthly_usage_kwh: f64,
    pub market_type: MarketType,
    pub market: MarketStructure,
    pub utility_owns_generation: bool,
    pub has_dc_activity: bool,
    pub dc_notes: &'static str,
    /// Suggested data center size for this territory (MW).
    pub default_dc_mw: f64,
}

impl UtilityPreset {
    /// Selector label, "Short Name (State)", or just the short name when no state is set.
    pub fn label(&self) -> String {
        if self.state.is_empty() {
            self.short_name.to_string()
        } else {
            format!("{} ({})", self.short_name, self.state)
        }
    }

    /// Region used for grouping; "Other" when unset.
    pub fn region_or_other(&self) -> &'static str {
        if self.region.is_empty() {
            "Other"
        } else {
            self.region
        }
    }

    /// Residential allocation adjusted for the market's capacity price.
    ///
    /// High capacity prices push allocation up in proportion to pass-through;
    /// energy-only markets scale it down. Result is clamped to
    /// [`MIN_PRESET_ALLOCATION`, `MAX_PRESET_ALLOCATION`].
    pub fn market_adjusted_allocation(&self) -> f64 {
        let mut allocation = self
            .market
            .base_residential_allocation()
            .unwrap_or(REGULATED_BASE_ALLOCATION);

        if self.market.has_capacity_market() {
            if let Some(price) = self.market.capacity_price_per_mw_day().filter(|p| *p != 0.0) {
                let multiplier = price / HISTORICAL_CAPACITY_PRICE;
                let adjustment =
                    MAX_CAPACITY_ADJUSTMENT.min((multiplier - 1.0) * CAPACITY_ADJUSTMENT_SLOPE);
                allocation += adjustment * self.market.capacity_cost_pass_through();
            }
        }

        if self.market.is_energy_only() {
            allocation *= ENERGY_ONLY_ALLOCATION_SCALE;
        }

        allocation.clamp(MIN_PRESET_ALLOCATION, MAX_PRESET_ALLOCATION)
    }

    /// Overwrites residential customers, bill, peak, and market on `profile`.
    ///
    /// Everything else (system energy, commercial and industrial counts) is
    /// left as configured.
    pub fn apply_to(&self, profile: &mut UtilityProfile) {
        profile.residential_customers = self.residential_customers;
        profile.avg_monthly_bill = self.avg_monthly_bill;
        profile.system_peak_mw = self.system_peak_mw;
        profile.market = self.market;
    }
}

/// The full utility catalog in display order.
pub const UTILITIES: &[UtilityPreset] = &[
    // Regulated / vertically integrated
    UtilityPreset {
        id: "pso-oklahoma",
        name: "Public Service Company of Oklahoma (PSO)",
        short_name: "PSO Oklahoma",
        state: "Oklahoma",
        region: "Southwest",
        residential_customers: 460_000,
        total_customers: 575_000,
        system_peak_mw: 4_400.0,
        avg_monthly_bill: 130.0,
        avg_monthly_usage_kwh: 1_100.0,
        market_type: MarketType::Spp,
        market: spp(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Multiple large data center proposals; PSO facing 31% power deficit by 2031 with 779MW of new large load requests",
        default_dc_mw: 1_000.0,
    },
    UtilityPreset {
        id: "duke-carolinas",
        name: "Duke Energy Carolinas",
        short_name: "Duke Carolinas",
        state: "North Carolina / South Carolina",
        region: "Southeast",
        residential_customers: 2_507_000,
        total_customers: 2_926_000,
        system_peak_mw: 20_700.0,
        avg_monthly_bill: 135.0,
        avg_monthly_usage_kwh: 1_000.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Growing data center presence in Charlotte metro area",
        default_dc_mw: 1_000.0,
    },
    UtilityPreset {
        id: "duke-progress",
        name: "Duke Energy Progress",
        short_name: "Duke Progress",
        state: "North Carolina / South Carolina",
        region: "Southeast",
        residential_customers: 1_400_000,
        total_customers: 1_700_000,
        system_peak_mw: 13_800.0,
        avg_monthly_bill: 132.0,
        avg_monthly_usage_kwh: 1_000.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Serves Raleigh area with growing tech sector",
        default_dc_mw: 800.0,
    },
    UtilityPreset {
        id: "georgia-power",
        name: "Georgia Power",
        short_name: "Georgia Power",
        state: "Georgia",
        region: "Southeast",
        residential_customers: 2_400_000,
        total_customers: 2_804_000,
        system_peak_mw: 17_100.0,
        avg_monthly_bill: 153.0,
        avg_monthly_usage_kwh: 1_150.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Projecting 8,200 MW load growth by 2030 including data centers",
        default_dc_mw: 1_200.0,
    },
    UtilityPreset {
        id: "aps-arizona",
        name: "Arizona Public Service (APS)",
        short_name: "APS Arizona",
        state: "Arizona",
        region: "Southwest",
        residential_customers: 1_200_000,
        total_customers: 1_400_000,
        system_peak_mw: 8_212.0,
        avg_monthly_bill: 140.0,
        avg_monthly_usage_kwh: 1_050.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Phoenix metro data center growth; 40% peak growth by 2031",
        default_dc_mw: 800.0,
    },
    UtilityPreset {
        id: "nv-energy",
        name: "NV Energy",
        short_name: "NV Energy Nevada",
        state: "Nevada",
        region: "West",
        residential_customers: 610_000,
        total_customers: 2_400_000,
        system_peak_mw: 9_000.0,
        avg_monthly_bill: 125.0,
        avg_monthly_usage_kwh: 900.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Data centers requesting to triple peak demand",
        default_dc_mw: 1_500.0,
    },
    UtilityPreset {
        id: "xcel-colorado",
        name: "Xcel Energy Colorado",
        short_name: "Xcel Colorado",
        state: "Colorado",
        region: "Mountain West",
        residential_customers: 1_400_000,
        total_customers: 1_600_000,
        system_peak_mw: 7_200.0,
        avg_monthly_bill: 105.0,
        avg_monthly_usage_kwh: 700.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Data centers to drive 2/3 of new demand",
        default_dc_mw: 600.0,
    },
    // AEP operating companies
    UtilityPreset {
        id: "aep-ohio",
        name: "AEP Ohio",
        short_name: "AEP Ohio",
        state: "Ohio",
        region: "Midwest",
        residential_customers: 1_200_000,
        total_customers: 1_500_000,
        system_peak_mw: 12_000.0,
        avg_monthly_bill: 135.0,
        avg_monthly_usage_kwh: 900.0,
        market_type: MarketType::Pjm,
        market: pjm(0.35),
        utility_owns_generation: false,
        has_dc_activity: true,
        dc_notes: "Ohio seeing significant data center growth; AEP proposed new rate class",
        default_dc_mw: 1_000.0,
    },
    UtilityPreset {
        id: "aep-indiana-michigan",
        name: "Indiana Michigan Power (I&M)",
        short_name: "AEP I&M",
        state: "Indiana / Michigan",
        region: "Midwest",
        residential_customers: 480_000,
        total_customers: 600_000,
        system_peak_mw: 5_500.0,
        avg_monthly_bill: 130.0,
        avg_monthly_usage_kwh: 950.0,
        market_type: MarketType::Pjm,
        market: pjm(0.38),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Northeast Indiana seeing industrial and data center growth",
        default_dc_mw: 500.0,
    },
    UtilityPreset {
        id: "aep-appalachian",
        name: "Appalachian Power (APCo)",
        short_name: "AEP Appalachian",
        state: "Virginia / West Virginia",
        region: "Appalachian",
        residential_customers: 800_000,
        total_customers: 1_000_000,
        system_peak_mw: 7_000.0,
        avg_monthly_bill: 125.0,
        avg_monthly_usage_kwh: 1_000.0,
        market_type: MarketType::Pjm,
        market: pjm(0.40),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Virginia portion seeing data center interest as NoVA constrained",
        default_dc_mw: 600.0,
    },
    UtilityPreset {
        id: "aep-swepco",
        name: "Southwestern Electric Power (SWEPCO)",
        short_name: "AEP SWEPCO",
        state: "Arkansas / Louisiana / Texas",
        region: "Southwest",
        residential_customers: 400_000,
        total_customers: 540_000,
        system_peak_mw: 4_800.0,
        avg_monthly_bill: 120.0,
        avg_monthly_usage_kwh: 1_100.0,
        market_type: MarketType::Spp,
        market: spp(0.40),
        utility_owns_generation: true,
        has_dc_activity: false,
        dc_notes: "Less data center activity than other AEP territories",
        default_dc_mw: 400.0,
    },
    // ISO market utilities
    UtilityPreset {
        id: "dominion-virginia",
        name: "Dominion Energy Virginia",
        short_name: "Dominion Virginia",
        state: "Virginia",
        region: "Mid-Atlantic",
        residential_customers: 2_500_000,
        total_customers: 2_800_000,
        system_peak_mw: 18_000.0,
        avg_monthly_bill: 145.0,
        avg_monthly_usage_kwh: 1_050.0,
        market_type: MarketType::Pjm,
        market: pjm(0.35),
        utility_owns_generation: true,
        has_dc_activity: true,
        dc_notes: "Data center capital of the world; forecasting 9GW DC peak in 10 years",
        default_dc_mw: 1_500.0,
    },
    // Energy-only
    UtilityPreset {
        id: "ercot-texas",
        name: "ERCOT (Texas Grid)",
        short_name: "ERCOT Texas",
        state: "Texas",
        region: "Texas",
        residential_customers: 12_000_000,
        total_customers: 26_000_000,
        system_peak_mw: 85_508.0,
        avg_monthly_bill: 140.0,
        avg_monthly_usage_kwh: 1_100.0,
        market_type: MarketType::Ercot,
        market: ercot(0.30),
        utility_owns_generation: false,
        has_dc_activity: true,
        dc_notes: "Data centers account for 46% of projected load growth",
        default_dc_mw: 3_000.0,
    },
    UtilityPreset {
        id: "custom",
        name: "Custom / Enter Your Own",
        short_name: "Custom",
        state: "",
        region: "",
        residential_customers: 500_000,
        total_customers: 600_000,
        system_peak_mw: 4_000.0,
        avg_monthly_bill: 144.0,
        avg_monthly_usage_kwh: 865.0,
        market_type: MarketType::Regulated,
        market: regulated(0.40),
        utility_owns_generation: true,
        has_dc_activity: false,
        dc_notes: "Enter your own utility parameters",
        default_dc_mw: 1_000.0,
    },
];

/// Looks up a catalog entry by id.
pub fn utility_by_id(id: &str) -> Option<&'static UtilityPreset> {
    UTILITIES.iter().find(|u| u.id == id)
}

/// `(label, id)` pairs for a selector, in catalog order.
pub fn utility_options() -> Vec<(String, &'static str)> {
    UTILITIES.iter().map(|u| (u.label(), u.id)).collect()
}

/// Catalog grouped by region, in order of first appearance.
pub fn utilities_by_region() -> Vec<(&'static str, Vec<&'static UtilityPreset>)> {
    group_by(|u| u.region_or_other())
}

/// Catalog grouped by market type, in order of first appearance.
pub fn utilities_by_market_type() -> Vec<(MarketType, Vec<&'static UtilityPreset>)> {
    group_by(|u| u.market_type)
}

fn group_by<K: PartialEq>(
    key: impl Fn(&UtilityPreset) -> K,
) -> Vec<(K, Vec<&'static UtilityPreset>)> {
    let mut groups: Vec<(K, Vec<&'static UtilityPreset>)> = Vec::new();
    for utility in UTILITIES {
        let k = key(utility);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(utility),
            None => groups.push((k, vec![utility])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in UTILITIES.iter().enumerate() {
            for b in &UTILITIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
        assert_eq!(UTILITIES.len(), 14);
    }

    #[test]
    fn lookup_by_id() {
        let dominion = utility_by_id("dominion-virginia");
        assert_eq!(dominion.map(|u| u.system_peak_mw), Some(18_000.0));
        assert!(utility_by_id("nope").is_none());
    }

    #[test]
    fn market_type_matches_structure() {
        for u in UTILITIES {
            assert_eq!(
                u.market.has_capacity_market(),
                matches!(u.market_type, MarketType::Pjm | MarketType::Miso),
                "{}",
                u.id
            );
            assert_eq!(u.market.is_energy_only(), u.market_type == MarketType::Ercot);
        }
    }

    #[test]
    fn options_label_custom_without_state() {
        let options = utility_options();
        assert_eq!(options.len(), UTILITIES.len());
        assert_eq!(options[0], ("PSO Oklahoma (Oklahoma)".to_string(), "pso-oklahoma"));
        let custom = options.iter().find(|(_, id)| *id == "custom");
        assert_eq!(custom.map(|(l, _)| l.as_str()), Some("Custom"));
    }

    #[test]
    fn region_groups_keep_first_seen_order() {
        let groups = utilities_by_region();
        let names: Vec<&str> = groups.iter().map(|(r, _)| *r).collect();
        assert_eq!(names[0], "Southwest");
        assert_eq!(names[1], "Southeast");
        assert_eq!(names.last().copied(), Some("Other"));

        let southwest = &groups[0].1;
        let ids: Vec<&str> = southwest.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["pso-oklahoma", "aps-arizona", "aep-swepco"]);

        let total: usize = groups.iter().map(|(_, us)| us.len()).sum();
        assert_eq!(total, UTILITIES.len());
    }

    #[test]
    fn market_groups() {
        let groups = utilities_by_market_type();
        let pjm = groups.iter().find(|(m, _)| *m == MarketType::Pjm);
        assert_eq!(pjm.map(|(_, us)| us.len()), Some(4));
        assert!(groups.iter().all(|(m, _)| *m != MarketType::Miso));
    }

    #[test]
    fn pjm_allocation_hits_adjustment_cap() {
        // 269.92/30 ≈ 9, so (9 - 1) * 0.02 = 0.16 is capped at 0.10.
        let dominion = utility_by_id("dominion-virginia");
        let alloc = dominion.map(|u| u.market_adjusted_allocation()).unwrap_or(0.0);
        assert!((alloc - (0.35 + 0.10 * 0.50)).abs() < 1e-12);
    }

    #[test]
    fn ercot_allocation_is_scaled_and_clamped() {
        // 0.30 * 0.85 = 0.255, inside the bounds.
        let ercot = utility_by_id("ercot-texas");
        let alloc = ercot.map(|u| u.market_adjusted_allocation()).unwrap_or(0.0);
        assert!((alloc - 0.255).abs() < 1e-12);
    }

    #[test]
    fn miso_price_at_historical_level_adds_nothing() {
        let preset = UtilityPreset {
            market_type: MarketType::Miso,
            market: MarketType::Miso.structure(),
            ..UTILITIES[0]
        };
        assert!((preset.market_adjusted_allocation() - 0.38).abs() < 1e-12);
    }

    #[test]
    fn allocation_clamps_low() {
        let preset = UtilityPreset {
            market: ercot(0.10),
            ..UTILITIES[0]
        };
        assert_eq!(preset.market_adjusted_allocation(), MIN_PRESET_ALLOCATION);
    }

    #[test]
    fn apply_overrides_only_catalog_fields() {
        let mut profile = UtilityProfile::default();
        let ercot = utility_by_id("ercot-texas");
        if let Some(u) = ercot {
            u.apply_to(&mut profile);
        }
        assert_eq!(profile.residential_customers, 12_000_000);
        assert_eq!(profile.avg_monthly_bill, 140.0);
        assert_eq!(profile.system_peak_mw, 85_508.0);
        assert!(profile.market.is_energy_only());
        assert_eq!(profile.commercial_customers, 85_000);
        assert_eq!(profile.pre_dc_system_energy_gwh, 20_000.0);
        assert_eq!(profile.effective_base_allocation(), 0.30);
    }
}
