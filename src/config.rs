//! TOML-based projection configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub use crate::error::ConfigError;
use crate::model::params::ModelParams;
use crate::model::types::{DataCenterProfile, MarketStructure, UtilityProfile};

/// Longest accepted projection horizon (years).
pub const MAX_PROJECTION_YEARS: usize = 50;

/// Top-level projection configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`ProjectionConfig::from_toml_file`] or use
/// [`ProjectionConfig::default_preset`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Utility system and customer base.
    #[serde(default)]
    pub utility: UtilityProfile,
    /// Proposed data center.
    #[serde(default)]
    pub datacenter: DataCenterProfile,
    /// Projection horizon.
    #[serde(default)]
    pub projection: ProjectionSettings,
    /// Economic constant overrides.
    #[serde(default)]
    pub params: ModelParams,
}

/// Projection horizon settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionSettings {
    /// Years projected after year 0.
    pub years: usize,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self { years: 10 }
    }
}

impl ProjectionConfig {
    /// Returns the default regulated-utility scenario.
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// Returns a PJM-style capacity market with a high clearing price.
    pub fn pjm() -> Self {
        Self {
            utility: UtilityProfile {
                base_residential_allocation: 0.35,
                market: MarketStructure::CapacityMarket {
                    capacity_price_per_mw_day: Some(269.92),
                    capacity_cost_pass_through: 0.50,
                    base_residential_allocation: Some(0.35),
                },
                ..UtilityProfile::default()
            },
            ..Self::default()
        }
    }

    /// Returns an ERCOT-style energy-only market with 4CP transmission.
    pub fn ercot() -> Self {
        Self {
            utility: UtilityProfile {
                base_residential_allocation: 0.30,
                market: MarketStructure::EnergyOnly {
                    capacity_cost_pass_through: 0.25,
                    base_residential_allocation: Some(0.30),
                },
                ..UtilityProfile::default()
            },
            ..Self::default()
        }
    }

    /// Returns a large, highly flexible campus with substantial onsite generation.
    pub fn flexible_heavy() -> Self {
        Self {
            datacenter: DataCenterProfile {
                capacity_mw: 2_000.0,
                flex_load_factor: 0.97,
                flex_peak_coincidence: 0.60,
                onsite_generation_mw: 600.0,
                ..DataCenterProfile::default()
            },
            projection: ProjectionSettings { years: 15 },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "pjm", "ercot", "flexible_heavy"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "pjm" => Ok(Self::pjm()),
            "ercot" => Ok(Self::ercot()),
            "flexible_heavy" => Ok(Self::flexible_heavy()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// The projection formulas divide by customer counts, system energy,
    /// system peak, and capacity, so those must be strictly positive.
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let u = &self.utility;
        if u.residential_customers == 0 {
            errors.push(ConfigError::new("utility.residential_customers", "must be > 0"));
        }
        positive(&mut errors, "utility.avg_monthly_bill", u.avg_monthly_bill);
        positive(
            &mut errors,
            "utility.pre_dc_system_energy_gwh",
            u.pre_dc_system_energy_gwh,
        );
        positive(&mut errors, "utility.system_peak_mw", u.system_peak_mw);
        fraction(
            &mut errors,
            "utility.residential_energy_share",
            u.residential_energy_share,
        );
        fraction(
            &mut errors,
            "utility.base_residential_allocation",
            u.base_residential_allocation,
        );

        let m = &u.market;
        fraction(
            &mut errors,
            "utility.market.capacity_cost_pass_through",
            m.capacity_cost_pass_through(),
        );
        if let Some(base) = m.base_residential_allocation() {
            fraction(&mut errors, "utility.market.base_residential_allocation", base);
        }
        if let Some(price) = m.capacity_price_per_mw_day() {
            if !price.is_finite() || price < 0.0 {
                errors.push(ConfigError::new(
                    "utility.market.capacity_price_per_mw_day",
                    "must be >= 0",
                ));
            }
        }

        let dc = &self.datacenter;
        positive(&mut errors, "datacenter.capacity_mw", dc.capacity_mw);
        fraction(&mut errors, "datacenter.firm_load_factor", dc.firm_load_factor);
        fraction(
            &mut errors,
            "datacenter.firm_peak_coincidence",
            dc.firm_peak_coincidence,
        );
        fraction(&mut errors, "datacenter.flex_load_factor", dc.flex_load_factor);
        fraction(
            &mut errors,
            "datacenter.flex_peak_coincidence",
            dc.flex_peak_coincidence,
        );
        if !(dc.onsite_generation_mw >= 0.0) {
            errors.push(ConfigError::new(
                "datacenter.onsite_generation_mw",
                "must be >= 0",
            ));
        } else if dc.onsite_generation_mw > dc.capacity_mw {
            errors.push(ConfigError::new(
                "datacenter.onsite_generation_mw",
                "must be <= datacenter.capacity_mw",
            ));
        }

        let years = self.projection.years;
        if years == 0 || years > MAX_PROJECTION_YEARS {
            errors.push(ConfigError::new(
                "projection.years",
                format!("must be in [1, {MAX_PROJECTION_YEARS}]"),
            ));
        }

        if !(self.params.time.general_inflation >= 0.0) {
            errors.push(ConfigError::new("params.time.general_inflation", "must be >= 0"));
        }

        errors
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    // Written so NaN fails too.
    if !(value > 0.0 && value.is_finite()) {
        errors.push(ConfigError::new(field, "must be > 0"));
    }
}

fn fraction(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_valid() {
        let cfg = ProjectionConfig::default_preset();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProjectionConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ProjectionConfig::PRESETS {
            let cfg = ProjectionConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[utility]
residential_customers = 1200000
commercial_customers = 250000
industrial_customers = 50000
avg_monthly_bill = 135.0
pre_dc_system_energy_gwh = 60000.0
residential_energy_share = 0.38
system_peak_mw = 12000.0
base_residential_allocation = 0.35

[utility.market]
type = "capacity_market"
capacity_price_per_mw_day = 269.92
capacity_cost_pass_through = 0.5
base_residential_allocation = 0.35

[datacenter]
capacity_mw = 1500.0
firm_load_factor = 0.85
firm_peak_coincidence = 1.0
flex_load_factor = 0.95
flex_peak_coincidence = 0.7
onsite_generation_mw = 300.0

[projection]
years = 20

[params.time]
general_inflation = 0.03
"#;
        let cfg = ProjectionConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.projection.years), Some(20));
        assert_eq!(
            cfg.as_ref().map(|c| c.utility.residential_customers),
            Some(1_200_000)
        );
        assert_eq!(
            cfg.as_ref()
                .and_then(|c| c.utility.market.capacity_price_per_mw_day()),
            Some(269.92)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.params.time.general_inflation),
            Some(0.03)
        );
        // Untouched tables keep defaults.
        assert_eq!(
            cfg.as_ref().map(|c| c.params.rates.energy_margin_per_mwh),
            Some(4.88)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[datacenter]
capacity_mw = 1000.0
bogus_field = true
"#;
        assert!(ProjectionConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_market_type_rejected() {
        let toml = r#"
[utility.market]
type = "nodal"
"#;
        assert!(ProjectionConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[datacenter]
capacity_mw = 3000.0
"#;
        let cfg = ProjectionConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.datacenter.capacity_mw), Some(3_000.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.datacenter.flex_peak_coincidence),
            Some(0.75)
        );
        assert_eq!(cfg.as_ref().map(|c| c.utility.system_peak_mw), Some(4_000.0));
        assert_eq!(cfg.as_ref().map(|c| c.projection.years), Some(10));
    }

    #[test]
    fn validation_catches_zero_customers() {
        let mut cfg = ProjectionConfig::default();
        cfg.utility.residential_customers = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "utility.residential_customers"));
    }

    #[test]
    fn validation_catches_nan_peak() {
        let mut cfg = ProjectionConfig::default();
        cfg.utility.system_peak_mw = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "utility.system_peak_mw"));
    }

    #[test]
    fn validation_catches_out_of_range_fraction() {
        let mut cfg = ProjectionConfig::default();
        cfg.datacenter.flex_peak_coincidence = 1.2;
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "datacenter.flex_peak_coincidence"));
    }

    #[test]
    fn validation_catches_generation_above_capacity() {
        let mut cfg = ProjectionConfig::default();
        cfg.datacenter.onsite_generation_mw = 1_500.0;
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "datacenter.onsite_generation_mw"));
    }

    #[test]
    fn validation_catches_bad_horizon() {
        let mut cfg = ProjectionConfig::default();
        cfg.projection.years = 0;
        assert!(cfg.validate().iter().any(|e| e.field == "projection.years"));
        cfg.projection.years = 51;
        assert!(cfg.validate().iter().any(|e| e.field == "projection.years"));
    }

    #[test]
    fn ercot_preset_is_energy_only() {
        let cfg = ProjectionConfig::ercot();
        assert!(cfg.utility.market.is_energy_only());
        assert_eq!(cfg.utility.effective_base_allocation(), 0.30);
    }
}
