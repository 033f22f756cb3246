//! Grid headroom views: how much of a flexible data center's demand the
//! grid can serve hour by hour, and how much has to shift off-peak.
//!
//! Grid capacity is the pre-data-center system peak plus the firm
//! data-center baseline. In any hour the data center wants to run at its
//! flexible load factor; it gets whatever fits under capacity and the
//! remainder is reported as shifted workload.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::model::types::{DataCenterProfile, UtilityProfile};

/// Summer peak-day load shape as a fraction of system peak, midnight first.
pub const DAILY_SHAPE: [f64; 24] = [
    0.62, 0.58, 0.55, 0.53, 0.52, 0.54, // 12am-6am
    0.60, 0.68, 0.76, 0.84, 0.90, 0.94, // 6am-12pm
    0.97, 0.99, 1.00, 1.00, 0.99, 0.96, // 12pm-6pm
    0.90, 0.82, 0.75, 0.70, 0.66, 0.64, // 6pm-12am
];

/// Hourly samples in one synthetic load year.
pub const SYNTHETIC_YEAR_HOURS: usize = 8760;

/// Points sampled from the sorted annual curve.
pub const DURATION_SAMPLES: usize = 200;

/// Seed for the weather noise so repeated runs draw the same year.
pub const DEFAULT_WEATHER_SEED: u64 = 12345;

const WEEKEND_FACTOR: f64 = 0.88;
const WEATHER_NOISE_MIN: f64 = 0.95;
const WEATHER_NOISE_SPAN: f64 = 0.10;

/// Data-center service at one grid load level (MW).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadroomPoint {
    pub base_grid_mw: f64,
    pub grid_capacity_mw: f64,
    /// Capacity × flexible load factor.
    pub dc_wants_mw: f64,
    pub dc_served_mw: f64,
    /// Served load up to the firm baseline.
    pub firm_dc_mw: f64,
    /// Served load above the firm baseline.
    pub flex_bonus_mw: f64,
    /// Demand that did not fit under grid capacity.
    pub shifted_mw: f64,
}

/// One hour of the peak-day profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHour {
    pub hour: usize,
    /// 12-hour clock label ("12 AM", "1 PM").
    pub label: String,
    #[serde(flatten)]
    pub point: HeadroomPoint,
}

/// One sample of the annual load-duration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationSample {
    /// Position in the sorted year (0 = highest-load hour).
    pub hour_number: usize,
    /// Share of the year with load at or above this level (0–100).
    pub percentile: f64,
    #[serde(flatten)]
    pub point: HeadroomPoint,
}

/// Capacity envelope shared by every hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Headroom {
    pub system_peak_mw: f64,
    pub firm_baseline_mw: f64,
    pub dc_wants_mw: f64,
}

impl Headroom {
    pub fn new(utility: &UtilityProfile, dc: &DataCenterProfile) -> Self {
        Self {
            system_peak_mw: utility.system_peak_mw,
            firm_baseline_mw: dc.capacity_mw * dc.firm_load_factor,
            dc_wants_mw: dc.capacity_mw * dc.flex_load_factor,
        }
    }

    pub fn grid_capacity_mw(&self) -> f64 {
        self.system_peak_mw + self.firm_baseline_mw
    }

    /// Most the data center can draw above its firm baseline.
    pub fn max_flex_bonus_mw(&self) -> f64 {
        (self.dc_wants_mw - self.firm_baseline_mw).max(0.0)
    }

    /// Splits data-center demand at a given base grid load.
    pub fn at(&self, base_grid_mw: f64) -> HeadroomPoint {
        let grid_capacity_mw = self.grid_capacity_mw();
        let available = (grid_capacity_mw - base_grid_mw).max(0.0);
        let served = self.dc_wants_mw.min(available);

        HeadroomPoint {
            base_grid_mw,
            grid_capacity_mw,
            dc_wants_mw: self.dc_wants_mw,
            dc_served_mw: served,
            firm_dc_mw: self.firm_baseline_mw.min(served),
            flex_bonus_mw: (served - self.firm_baseline_mw).max(0.0),
            shifted_mw: (self.dc_wants_mw - available).max(0.0),
        }
    }
}

fn hour_label(hour: usize) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

/// Hour-by-hour service on a summer peak day.
pub fn peak_day_profile(utility: &UtilityProfile, dc: &DataCenterProfile) -> Vec<PeakHour> {
    let headroom = Headroom::new(utility, dc);
    DAILY_SHAPE
        .iter()
        .enumerate()
        .map(|(hour, shape)| PeakHour {
            hour,
            label: hour_label(hour),
            point: headroom.at(utility.system_peak_mw * shape),
        })
        .collect()
}

/// Synthetic hourly base grid load for one year (MW), in chronological order.
///
/// Combines a seasonal curve peaking mid-year, the daily shape, a weekend
/// dip, and uniform weather noise in [0.95, 1.05).
pub fn synthetic_year(system_peak_mw: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..SYNTHETIC_YEAR_HOURS)
        .map(|h| {
            let day = h / 24;
            let summer = ((day as f64 - 180.0) * PI / 182.5).cos();
            let seasonal = 0.75 + 0.25 * summer.max(summer * 0.3 + 0.2);
            let weekend = if matches!(day % 7, 5 | 6) {
                WEEKEND_FACTOR
            } else {
                1.0
            };
            let weather = WEATHER_NOISE_MIN + rng.random::<f64>() * WEATHER_NOISE_SPAN;
            system_peak_mw * seasonal * DAILY_SHAPE[h % 24] * weekend * weather
        })
        .collect()
}

/// Annual load-duration curve sampled at [`DURATION_SAMPLES`] points.
///
/// Base grid load is sorted highest first; service is computed at each
/// sampled position.
pub fn load_duration_curve(
    utility: &UtilityProfile,
    dc: &DataCenterProfile,
    seed: u64,
) -> Vec<DurationSample> {
    let headroom = Headroom::new(utility, dc);
    let mut year = synthetic_year(utility.system_peak_mw, seed);
    year.sort_by(|a, b| b.total_cmp(a));

    (0..DURATION_SAMPLES)
        .map(|i| {
            let position = i as f64 / DURATION_SAMPLES as f64 * SYNTHETIC_YEAR_HOURS as f64;
            DurationSample {
                hour_number: position.round() as usize,
                percentile: i as f64 / DURATION_SAMPLES as f64 * 100.0,
                point: headroom.at(year[position as usize]),
            }
        })
        .collect()
}

/// Headline shifting metrics across both views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftingSummary {
    pub firm_baseline_mw: f64,
    pub max_flex_bonus_mw: f64,
    /// Peak-day hours with any shifted workload.
    pub hours_with_shifting: usize,
    pub peak_shifted_mw: f64,
    /// Mean flexible bonus over the duration curve × hours per year.
    pub annual_flex_bonus_mwh: f64,
}

impl ShiftingSummary {
    pub fn from_views(
        headroom: &Headroom,
        peak_day: &[PeakHour],
        duration: &[DurationSample],
    ) -> Self {
        let avg_bonus = if duration.is_empty() {
            0.0
        } else {
            duration.iter().map(|d| d.point.flex_bonus_mw).sum::<f64>() / duration.len() as f64
        };
        Self {
            firm_baseline_mw: headroom.firm_baseline_mw,
            max_flex_bonus_mw: headroom.max_flex_bonus_mw(),
            hours_with_shifting: peak_day.iter().filter(|h| h.point.shifted_mw > 0.0).count(),
            peak_shifted_mw: peak_day
                .iter()
                .map(|h| h.point.shifted_mw)
                .fold(0.0, f64::max),
            annual_flex_bonus_mwh: avg_bonus * SYNTHETIC_YEAR_HOURS as f64,
        }
    }
}
