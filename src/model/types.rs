//! Core projection types: utility and data-center profiles, market structure, scenarios.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default capacity-cost pass-through when a market does not specify one.
pub const DEFAULT_CAPACITY_COST_PASS_THROUGH: f64 = 0.40;

fn default_pass_through() -> f64 {
    DEFAULT_CAPACITY_COST_PASS_THROUGH
}

/// Wholesale market structure the utility operates in.
///
/// Selects the transmission, capacity, credit, and allocation formula
/// branches used by the net impact model. It never changes the shape of
/// the results.
///
/// # Examples
///
/// ```
/// use bill_impact::model::types::MarketStructure;
///
/// let pjm = MarketStructure::CapacityMarket {
///     capacity_price_per_mw_day: Some(269.92),
///     capacity_cost_pass_through: 0.50,
///     base_residential_allocation: Some(0.35),
/// };
/// assert!(pjm.has_capacity_market());
/// assert_eq!(pjm.capacity_price_per_mw_day(), Some(269.92));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketStructure {
    /// Vertically integrated utility; costs recovered through the rate base.
    Regulated {
        #[serde(default)]
        base_residential_allocation: Option<f64>,
        #[serde(default = "default_pass_through")]
        capacity_cost_pass_through: f64,
    },
    /// Organized market with a mandatory capacity market (PJM, MISO).
    CapacityMarket {
        /// Capacity auction clearing price ($/MW-day).
        #[serde(default)]
        capacity_price_per_mw_day: Option<f64>,
        #[serde(default = "default_pass_through")]
        capacity_cost_pass_through: f64,
        #[serde(default)]
        base_residential_allocation: Option<f64>,
    },
    /// Energy-only market with 4CP transmission allocation (ERCOT).
    EnergyOnly {
        #[serde(default = "default_pass_through")]
        capacity_cost_pass_through: f64,
        #[serde(default)]
        base_residential_allocation: Option<f64>,
    },
    /// Energy market without a mandatory capacity market (SPP).
    ///
    /// Uses the regulated formula branches.
    Other {
        #[serde(default = "default_pass_through")]
        capacity_cost_pass_through: f64,
        #[serde(default)]
        base_residential_allocation: Option<f64>,
    },
}

impl Default for MarketStructure {
    fn default() -> Self {
        Self::Regulated {
            base_residential_allocation: None,
            capacity_cost_pass_through: DEFAULT_CAPACITY_COST_PASS_THROUGH,
        }
    }
}

impl MarketStructure {
    /// Whether the market runs a capacity auction.
    pub fn has_capacity_market(&self) -> bool {
        matches!(self, Self::CapacityMarket { .. })
    }

    /// Whether transmission is allocated by four coincident peaks with no capacity market.
    pub fn is_energy_only(&self) -> bool {
        matches!(self, Self::EnergyOnly { .. })
    }

    /// Capacity price signal ($/MW-day), if the market publishes one.
    pub fn capacity_price_per_mw_day(&self) -> Option<f64> {
        match self {
            Self::CapacityMarket {
                capacity_price_per_mw_day,
                ..
            } => *capacity_price_per_mw_day,
            _ => None,
        }
    }

    /// Fraction of the capacity price passed through to retail rates.
    pub fn capacity_cost_pass_through(&self) -> f64 {
        match self {
            Self::Regulated {
                capacity_cost_pass_through,
                ..
            }
            | Self::CapacityMarket {
                capacity_cost_pass_through,
                ..
            }
            | Self::EnergyOnly {
                capacity_cost_pass_through,
                ..
            }
            | Self::Other {
                capacity_cost_pass_through,
                ..
            } => *capacity_cost_pass_through,
        }
    }

    /// Market-specific base residential allocation, overriding the utility's own.
    pub fn base_residential_allocation(&self) -> Option<f64> {
        match self {
            Self::Regulated {
                base_residential_allocation,
                ..
            }
            | Self::CapacityMarket {
                base_residential_allocation,
                ..
            }
            | Self::EnergyOnly {
                base_residential_allocation,
                ..
            }
            | Self::Other {
                base_residential_allocation,
                ..
            } => *base_residential_allocation,
        }
    }

    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Regulated { .. } => "regulated",
            Self::CapacityMarket { .. } => "capacity_market",
            Self::EnergyOnly { .. } => "energy_only",
            Self::Other { .. } => "other",
        }
    }
}

/// Utility system and customer base before the data center arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilityProfile {
    pub residential_customers: u64,
    pub commercial_customers: u64,
    pub industrial_customers: u64,
    /// Average residential monthly bill ($).
    pub avg_monthly_bill: f64,
    /// Annual system energy before the data center (GWh).
    pub pre_dc_system_energy_gwh: f64,
    /// Residential share of system energy (0.0–1.0).
    pub residential_energy_share: f64,
    /// System peak demand (MW).
    pub system_peak_mw: f64,
    /// Residential share of cost allocation before any rate case (0.0–1.0).
    pub base_residential_allocation: f64,
    pub market: MarketStructure,
}

impl Default for UtilityProfile {
    fn default() -> Self {
        Self {
            residential_customers: 560_000,
            commercial_customers: 85_000,
            industrial_customers: 5_000,
            avg_monthly_bill: 130.0,
            pre_dc_system_energy_gwh: 20_000.0,
            residential_energy_share: 0.35,
            system_peak_mw: 4_000.0,
            base_residential_allocation: 0.40,
            market: MarketStructure::default(),
        }
    }
}

impl UtilityProfile {
    /// Allocation the regulatory-lag blend starts from.
    ///
    /// A market-level override wins over the utility's own value.
    pub fn effective_base_allocation(&self) -> f64 {
        self.market
            .base_residential_allocation()
            .unwrap_or(self.base_residential_allocation)
    }
}

/// Proposed data center and its operating modes.
///
/// # Examples
///
/// ```
/// use bill_impact::model::types::DataCenterProfile;
///
/// let dc = DataCenterProfile::default().resized(2_000.0);
/// assert_eq!(dc.capacity_mw, 2_000.0);
/// assert_eq!(dc.onsite_generation_mw, 400.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataCenterProfile {
    /// Nameplate capacity (MW).
    pub capacity_mw: f64,
    pub firm_load_factor: f64,
    pub firm_peak_coincidence: f64,
    pub flex_load_factor: f64,
    /// Fraction of capacity running during system peak when flexible (0.75 = 25% curtailable).
    pub flex_peak_coincidence: f64,
    /// Onsite dispatchable generation (MW, <= capacity).
    pub onsite_generation_mw: f64,
}

impl Default for DataCenterProfile {
    fn default() -> Self {
        Self {
            capacity_mw: 1_000.0,
            firm_load_factor: 0.80,
            firm_peak_coincidence: 1.0,
            flex_load_factor: 0.95,
            flex_peak_coincidence: 0.75,
            onsite_generation_mw: 200.0,
        }
    }
}

impl DataCenterProfile {
    /// Returns a copy at a new capacity, keeping the onsite generation ratio.
    pub fn resized(&self, capacity_mw: f64) -> Self {
        let ratio = if self.capacity_mw > 0.0 {
            self.onsite_generation_mw / self.capacity_mw
        } else {
            0.0
        };
        Self {
            capacity_mw,
            onsite_generation_mw: (capacity_mw * ratio).floor(),
            ..self.clone()
        }
    }
}

/// How the data center draws power in one projected year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOperation {
    pub capacity_mw: f64,
    pub load_factor: f64,
    pub peak_coincidence: f64,
    pub onsite_generation_mw: f64,
}

/// Projection scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// No data center.
    Baseline,
    /// Firm, inflexible load.
    Unoptimized,
    /// Curtails during system peaks.
    Flexible,
    /// Curtails and dispatches onsite generation.
    Dispatchable,
}

impl Scenario {
    /// All scenarios in report order.
    pub const ALL: [Scenario; 4] = [
        Scenario::Baseline,
        Scenario::Unoptimized,
        Scenario::Flexible,
        Scenario::Dispatchable,
    ];

    /// Stable identifier used in CSV headers and JSON keys.
    pub fn id(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Unoptimized => "unoptimized",
            Self::Flexible => "flexible",
            Self::Dispatchable => "dispatchable",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::Unoptimized => "Firm Load",
            Self::Flexible => "Flexible Load",
            Self::Dispatchable => "Flex + Generation",
        }
    }

    /// Inflation dampening applied when the impact is a net credit.
    ///
    /// The baseline carries no impact and is left undampened.
    pub fn credit_dampening(self) -> f64 {
        match self {
            Self::Baseline => 1.0,
            Self::Unoptimized => 0.80,
            Self::Flexible => 0.90,
            Self::Dispatchable => 0.95,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_override_wins_over_utility_base() {
        let mut utility = UtilityProfile::default();
        assert_eq!(utility.effective_base_allocation(), 0.40);

        utility.market = MarketStructure::EnergyOnly {
            capacity_cost_pass_through: 0.25,
            base_residential_allocation: Some(0.30),
        };
        assert_eq!(utility.effective_base_allocation(), 0.30);
    }

    #[test]
    fn only_capacity_market_reports_price() {
        let regulated = MarketStructure::default();
        assert!(!regulated.has_capacity_market());
        assert_eq!(regulated.capacity_price_per_mw_day(), None);
        assert_eq!(regulated.capacity_cost_pass_through(), 0.40);

        let miso = MarketStructure::CapacityMarket {
            capacity_price_per_mw_day: Some(30.0),
            capacity_cost_pass_through: 0.35,
            base_residential_allocation: Some(0.38),
        };
        assert!(miso.has_capacity_market());
        assert!(!miso.is_energy_only());
        assert_eq!(miso.capacity_price_per_mw_day(), Some(30.0));
    }

    #[test]
    fn resized_keeps_generation_ratio() {
        let dc = DataCenterProfile {
            capacity_mw: 1_000.0,
            onsite_generation_mw: 250.0,
            ..DataCenterProfile::default()
        };
        let big = dc.resized(3_000.0);
        assert_eq!(big.onsite_generation_mw, 750.0);
        assert_eq!(big.flex_peak_coincidence, dc.flex_peak_coincidence);
    }

    #[test]
    fn market_parses_from_tagged_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            market: MarketStructure,
        }
        let parsed: Result<Wrapper, _> = toml::from_str(
            r#"
[market]
type = "capacity_market"
capacity_price_per_mw_day = 269.92
capacity_cost_pass_through = 0.5
"#,
        );
        let market = parsed.map(|w| w.market).ok();
        assert_eq!(
            market,
            Some(MarketStructure::CapacityMarket {
                capacity_price_per_mw_day: Some(269.92),
                capacity_cost_pass_through: 0.5,
                base_residential_allocation: None,
            })
        );
    }

    #[test]
    fn scenario_ids_are_stable() {
        let ids: Vec<&str> = Scenario::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["baseline", "unoptimized", "flexible", "dispatchable"]);
        assert_eq!(Scenario::Baseline.credit_dampening(), 1.0);
        assert_eq!(Scenario::Dispatchable.credit_dampening(), 0.95);
    }
}
