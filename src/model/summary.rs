//! Headline comparison metrics derived from a complete trajectory set.

use std::fmt;

use serde::Serialize;

use super::trajectory::TrajectorySet;
use super::types::{Scenario, UtilityProfile};
use crate::error::ProjectionError;

/// One value per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioValues {
    pub baseline: f64,
    pub unoptimized: f64,
    pub flexible: f64,
    pub dispatchable: f64,
}

impl ScenarioValues {
    pub fn get(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Baseline => self.baseline,
            Scenario::Unoptimized => self.unoptimized,
            Scenario::Flexible => self.flexible,
            Scenario::Dispatchable => self.dispatchable,
        }
    }
}

/// Final-year difference from the baseline for each data-center scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioDeltas {
    pub unoptimized: f64,
    pub flexible: f64,
    pub dispatchable: f64,
}

/// Final-year savings relative to firm (unoptimized) load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Savings {
    pub flexible: f64,
    pub dispatchable: f64,
}

/// Aggregate comparison metrics for one utility/data-center pair.
///
/// Computed post-hoc from the trajectories so reported numbers always
/// agree with the projected series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Starting residential bill ($/month).
    pub current_monthly_bill: f64,
    /// Bill in the final projected year ($/month).
    pub final_year_bills: ScenarioValues,
    /// Scenario final bill minus baseline final bill ($/month).
    pub final_year_difference: ScenarioDeltas,
    /// Unoptimized final bill minus flexible/dispatchable final bill ($/month).
    pub savings_vs_unoptimized: Savings,
    /// Σ(monthly bill × 12) over all projected years ($).
    pub cumulative_costs: ScenarioValues,
}

impl SummaryStats {
    /// Reduces a trajectory set to summary metrics.
    ///
    /// # Errors
    ///
    /// Returns a `ProjectionError` if any trajectory is empty or the
    /// trajectories differ in length.
    pub fn from_trajectories(
        trajectories: &TrajectorySet,
        utility: &UtilityProfile,
    ) -> Result<Self, ProjectionError> {
        let expected = trajectories.baseline.len();
        let mut finals = [0.0_f64; 4];
        let mut cumulative = [0.0_f64; 4];

        for (i, t) in trajectories.iter().enumerate() {
            let Some(final_bill) = t.final_bill() else {
                return Err(ProjectionError::EmptyTrajectory(t.scenario));
            };
            if t.len() != expected {
                return Err(ProjectionError::LengthMismatch {
                    scenario: t.scenario,
                    expected,
                    actual: t.len(),
                });
            }
            finals[i] = final_bill;
            cumulative[i] = t.cumulative_cost();
        }

        let [baseline, unoptimized, flexible, dispatchable] = finals;

        Ok(Self {
            current_monthly_bill: utility.avg_monthly_bill,
            final_year_bills: ScenarioValues {
                baseline,
                unoptimized,
                flexible,
                dispatchable,
            },
            final_year_difference: ScenarioDeltas {
                unoptimized: unoptimized - baseline,
                flexible: flexible - baseline,
                dispatchable: dispatchable - baseline,
            },
            savings_vs_unoptimized: Savings {
                flexible: unoptimized - flexible,
                dispatchable: unoptimized - dispatchable,
            },
            cumulative_costs: ScenarioValues {
                baseline: cumulative[0],
                unoptimized: cumulative[1],
                flexible: cumulative[2],
                dispatchable: cumulative[3],
            },
        })
    }

    /// Final-year difference from baseline; zero for the baseline itself.
    pub fn final_year_difference(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Baseline => 0.0,
            Scenario::Unoptimized => self.final_year_difference.unoptimized,
            Scenario::Flexible => self.final_year_difference.flexible,
            Scenario::Dispatchable => self.final_year_difference.dispatchable,
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Bill Impact Summary ---")?;
        writeln!(
            f,
            "Current monthly bill:   ${:.2}",
            self.current_monthly_bill
        )?;
        for scenario in Scenario::ALL {
            writeln!(
                f,
                "{:<18} final ${:>8.2}/mo  ({:>+7.2} vs baseline)  cumulative ${:>10.0}",
                scenario.display_name(),
                self.final_year_bills.get(scenario),
                self.final_year_difference(scenario),
                self.cumulative_costs.get(scenario),
            )?;
        }
        write!(
            f,
            "Savings vs firm load:   flexible ${:.2}/mo, flex + generation ${:.2}/mo",
            self.savings_vs_unoptimized.flexible, self.savings_vs_unoptimized.dispatchable
        )
    }
}
