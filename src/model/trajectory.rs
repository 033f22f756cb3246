//! Multi-year monthly bill projections per scenario.

use serde::Serialize;
use tracing::debug;

use super::allocation::allocate;
use super::impact::{ImpactResult, net_impact};
use super::params::ModelParams;
use super::types::{DataCenterProfile, LoadOperation, Scenario, UtilityProfile};

/// Projection years before the data center affects bills (construction and interconnection).
pub const CONSTRUCTION_YEARS: usize = 2;

/// Share of a full year's impact realized in the first year online.
pub const FIRST_YEAR_PHASE_IN: f64 = 0.5;

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    /// Calendar year.
    pub year: i32,
    /// Bill without the data center ($/month).
    pub baseline_bill: f64,
    /// Phased and escalated data-center impact ($/month, negative = savings).
    pub dc_impact: f64,
    /// `baseline_bill + dc_impact`.
    pub monthly_bill: f64,
}

/// Monthly bill projection for one scenario, year 0 through the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub scenario: Scenario,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Calendar years in projection order.
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Monthly bills in projection order.
    pub fn monthly_bills(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.monthly_bill).collect()
    }

    /// Bill in the last projected year, if any.
    pub fn final_bill(&self) -> Option<f64> {
        self.points.last().map(|p| p.monthly_bill)
    }

    /// Sum of annual bills (`monthly × 12`) over every projected year.
    pub fn cumulative_cost(&self) -> f64 {
        self.points.iter().map(|p| p.monthly_bill * 12.0).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The four scenario trajectories over a common horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySet {
    pub baseline: Trajectory,
    pub unoptimized: Trajectory,
    pub flexible: Trajectory,
    pub dispatchable: Trajectory,
}

impl TrajectorySet {
    pub fn get(&self, scenario: Scenario) -> &Trajectory {
        match scenario {
            Scenario::Baseline => &self.baseline,
            Scenario::Unoptimized => &self.unoptimized,
            Scenario::Flexible => &self.flexible,
            Scenario::Dispatchable => &self.dispatchable,
        }
    }

    /// Trajectories in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        Scenario::ALL.into_iter().map(|s| self.get(s))
    }
}

/// Load parameters a scenario runs the data center with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Operation passed to the net impact model.
    pub load: LoadOperation,
    /// Peak coincidence used for allocation, net of onsite generation.
    pub allocation_peak_coincidence: f64,
    pub include_capacity_credit: bool,
    /// Inflation dampening when the impact is a net credit.
    pub credit_dampening: f64,
}

impl OperatingPoint {
    /// Operating point for `scenario`, or `None` for the baseline.
    pub fn for_scenario(scenario: Scenario, dc: &DataCenterProfile) -> Option<Self> {
        let credit_dampening = scenario.credit_dampening();
        let point = match scenario {
            Scenario::Baseline => return None,
            Scenario::Unoptimized => Self {
                load: LoadOperation {
                    capacity_mw: dc.capacity_mw,
                    load_factor: dc.firm_load_factor,
                    peak_coincidence: dc.firm_peak_coincidence,
                    onsite_generation_mw: 0.0,
                },
                allocation_peak_coincidence: dc.firm_peak_coincidence,
                include_capacity_credit: false,
                credit_dampening,
            },
            Scenario::Flexible => Self {
                load: LoadOperation {
                    capacity_mw: dc.capacity_mw,
                    load_factor: dc.flex_load_factor,
                    peak_coincidence: dc.flex_peak_coincidence,
                    onsite_generation_mw: 0.0,
                },
                allocation_peak_coincidence: dc.flex_peak_coincidence,
                include_capacity_credit: true,
                credit_dampening,
            },
            Scenario::Dispatchable => Self {
                load: LoadOperation {
                    capacity_mw: dc.capacity_mw,
                    load_factor: dc.flex_load_factor,
                    peak_coincidence: dc.flex_peak_coincidence,
                    onsite_generation_mw: dc.onsite_generation_mw,
                },
                allocation_peak_coincidence: (dc.flex_peak_coincidence
                    - dc.onsite_generation_mw / dc.capacity_mw)
                    .max(0.0),
                include_capacity_credit: true,
                credit_dampening,
            },
        };
        Some(point)
    }
}

/// Projects residential bills for each scenario over a horizon.
///
/// Holds only the immutable parameter set, so a single engine may be
/// shared across threads and called repeatedly with identical results.
///
/// # Examples
///
/// ```
/// use bill_impact::model::trajectory::ProjectionEngine;
/// use bill_impact::model::types::{DataCenterProfile, UtilityProfile};
///
/// let engine = ProjectionEngine::default();
/// let set = engine.generate_all(&UtilityProfile::default(), &DataCenterProfile::default(), None);
/// assert_eq!(set.baseline.len(), 11);
/// assert_eq!(set.flexible.points[1].dc_impact, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    params: ModelParams,
}

impl ProjectionEngine {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Bills without a data center: geometric escalation from the starting bill.
    pub fn baseline(&self, utility: &UtilityProfile, years: usize) -> Trajectory {
        let rate = self.params.baseline_escalation_rate();
        let points = (0..=years)
            .map(|year| {
                let bill = if year == 0 {
                    utility.avg_monthly_bill
                } else {
                    utility.avg_monthly_bill * (1.0 + rate).powi(year as i32)
                };
                TrajectoryPoint {
                    year: self.calendar_year(year),
                    baseline_bill: bill,
                    dc_impact: 0.0,
                    monthly_bill: bill,
                }
            })
            .collect();
        Trajectory {
            scenario: Scenario::Baseline,
            points,
        }
    }

    /// Trajectory for one scenario.
    pub fn trajectory(
        &self,
        scenario: Scenario,
        utility: &UtilityProfile,
        dc: &DataCenterProfile,
        years: usize,
    ) -> Trajectory {
        let baseline = self.baseline(utility, years);
        let Some(op) = OperatingPoint::for_scenario(scenario, dc) else {
            return baseline;
        };
        let inflation = self.params.time.general_inflation;

        let points = baseline
            .points
            .iter()
            .enumerate()
            .map(|(year, base)| {
                if year < CONSTRUCTION_YEARS {
                    return *base;
                }
                let years_online = (year - CONSTRUCTION_YEARS) as u32;
                let phase_in = if year == CONSTRUCTION_YEARS {
                    FIRST_YEAR_PHASE_IN
                } else {
                    1.0
                };

                let impact = self.impact_at(&op, utility, years_online);
                let mut dc_impact = impact.per_customer_monthly * phase_in;
                let escalation = if dc_impact > 0.0 {
                    1.0 + inflation
                } else {
                    // Credits erode slower than costs grow.
                    1.0 + inflation * op.credit_dampening
                };
                dc_impact *= escalation.powi(years_online as i32);

                debug!(
                    scenario = %scenario,
                    year = base.year,
                    years_online,
                    phase_in,
                    dc_impact,
                    "projected data center impact"
                );

                TrajectoryPoint {
                    year: base.year,
                    baseline_bill: base.baseline_bill,
                    dc_impact,
                    monthly_bill: base.baseline_bill + dc_impact,
                }
            })
            .collect();

        Trajectory { scenario, points }
    }

    /// All four trajectories; `years = None` uses the configured horizon.
    pub fn generate_all(
        &self,
        utility: &UtilityProfile,
        dc: &DataCenterProfile,
        years: Option<usize>,
    ) -> TrajectorySet {
        let years = years.unwrap_or(self.params.time.projection_years);
        TrajectorySet {
            baseline: self.baseline(utility, years),
            unoptimized: self.trajectory(Scenario::Unoptimized, utility, dc, years),
            flexible: self.trajectory(Scenario::Flexible, utility, dc, years),
            dispatchable: self.trajectory(Scenario::Dispatchable, utility, dc, years),
        }
    }

    /// Raw impact for `scenario` after `years_online`, before phase-in and escalation.
    ///
    /// Returns `None` for the baseline.
    pub fn scenario_impact(
        &self,
        scenario: Scenario,
        utility: &UtilityProfile,
        dc: &DataCenterProfile,
        years_online: u32,
    ) -> Option<ImpactResult> {
        OperatingPoint::for_scenario(scenario, dc).map(|op| self.impact_at(&op, utility, years_online))
    }

    fn impact_at(
        &self,
        op: &OperatingPoint,
        utility: &UtilityProfile,
        years_online: u32,
    ) -> ImpactResult {
        let allocation = allocate(
            utility,
            op.load.capacity_mw,
            op.load.load_factor,
            op.allocation_peak_coincidence,
            years_online,
        );
        net_impact(
            &self.params,
            &op.load,
            utility.residential_customers,
            allocation.fraction,
            op.include_capacity_credit,
            &utility.market,
        )
    }

    fn calendar_year(&self, year: usize) -> i32 {
        self.params.time.base_year + year as i32
    }
}
