//! Trial Feature Extraction
//!
//! ## Selection
//!
//! Only records where the arm actually loads the platform are used:
//! CoP defined and `F_tot > 1 N`. A trial with fewer than 20 such records
//! is rejected as empty.
//!
//! ## Normalization
//!
//! Time runs in seconds from the first selected record. CoP coordinates are
//! taken relative to the first selected record, so features describe the
//! movement rather than where the subject happened to sit.
//!
//! ## Features
//!
//! | Feature                 | Definition                                      |
//! |-------------------------|-------------------------------------------------|
//! | `cop_mean_x_rel`        | mean relative x                                 |
//! | `cop_max_x_rel`         | max relative x                                  |
//! | `cop_min_x_rel`         | min relative x                                  |
//! | `cop_mean_y_rel`        | mean relative y                                 |
//! | `cop_displacement_x`    | range of x                                      |
//! | `cop_displacement_y`    | range of y                                      |
//! | `peak_force`            | max `F_tot` (N)                                 |
//! | `duration_s`            | time of the last selected record                |
//! | `cop_path_length`       | summed step length of the CoP path (cm)         |
//! | `rfd`                   | sit-to-stand only: peak / time to peak (N/s)    |
//! | `peak_force_derivative` | tap only: max \|ΔF/Δt\| over Δt > 0 (N/s)       |

use serde::{Deserialize, Serialize};

use armrest_core::TelemetryRecord;

use crate::error::Result;
use crate::protocol::Task;
use crate::trial::Trial;

/// Total force a record needs to count as loaded (N)
pub const MIN_LOADED_FORCE_N: f32 = 1.0;

/// Fewest loaded records a trial needs to be analysed
pub const MIN_LOADED_RECORDS: usize = 20;

/// Floor on the time to peak force, avoids dividing by zero (s)
const MIN_TIME_TO_PEAK_S: f64 = 1e-6;

/// Features of one trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialFeatures {
    pub cop_mean_x_rel: f64,
    pub cop_max_x_rel: f64,
    pub cop_min_x_rel: f64,
    pub cop_mean_y_rel: f64,
    pub cop_displacement_x: f64,
    pub cop_displacement_y: f64,
    pub peak_force: f64,
    pub duration_s: f64,
    pub cop_path_length: f64,
    pub rfd: f64,
    pub peak_force_derivative: f64,
}

/// A selected record on the trial's own time and position base
#[derive(Debug, Clone, Copy)]
struct Sample {
    t: f64,
    x: f64,
    y: f64,
    force: f64,
}

fn normalize(records: &[&TelemetryRecord]) -> Vec<Sample> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    records
        .iter()
        .map(|r| Sample {
            t: r.timestamp.saturating_sub(first.timestamp) as f64 / 1000.0,
            x: f64::from(r.cop_x) - f64::from(first.cop_x),
            y: f64::from(r.cop_y) - f64::from(first.cop_y),
            force: f64::from(r.f_total),
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

impl TrialFeatures {
    /// Extract features, or `None` when too few records are loaded
    pub fn extract(trial: &Trial, task: Task) -> Option<Self> {
        let selected: Vec<&TelemetryRecord> = trial.loaded(MIN_LOADED_FORCE_N).collect();
        if selected.len() < MIN_LOADED_RECORDS {
            return None;
        }
        let samples = normalize(&selected);

        let (min_x, max_x) = min_max(samples.iter().map(|s| s.x));
        let (min_y, max_y) = min_max(samples.iter().map(|s| s.y));

        // First occurrence of the maximum
        let peak = samples
            .iter()
            .fold(None::<&Sample>, |best, s| match best {
                Some(b) if b.force >= s.force => Some(b),
                _ => Some(s),
            })?;

        let path_length: f64 = samples
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum();

        let rfd = match task {
            Task::SitToStand => {
                let time_to_peak = if peak.t > 0.0 { peak.t } else { MIN_TIME_TO_PEAK_S };
                peak.force / time_to_peak
            }
            _ => 0.0,
        };

        let peak_force_derivative = match task {
            Task::Tap => samples
                .windows(2)
                .filter(|w| w[1].t > w[0].t)
                .map(|w| ((w[1].force - w[0].force) / (w[1].t - w[0].t)).abs())
                .fold(0.0, f64::max),
            _ => 0.0,
        };

        Some(Self {
            cop_mean_x_rel: mean(samples.iter().map(|s| s.x)),
            cop_max_x_rel: max_x,
            cop_min_x_rel: min_x,
            cop_mean_y_rel: mean(samples.iter().map(|s| s.y)),
            cop_displacement_x: max_x - min_x,
            cop_displacement_y: max_y - min_y,
            peak_force: peak.force,
            duration_s: samples.last().map_or(0.0, |s| s.t),
            cop_path_length: path_length,
            rfd,
            peak_force_derivative,
        })
    }

    /// Feature values in declaration order, for averaging
    pub(crate) fn values(&self) -> [f64; 11] {
        [
            self.cop_mean_x_rel,
            self.cop_max_x_rel,
            self.cop_min_x_rel,
            self.cop_mean_y_rel,
            self.cop_displacement_x,
            self.cop_displacement_y,
            self.peak_force,
            self.duration_s,
            self.cop_path_length,
            self.rfd,
            self.peak_force_derivative,
        ]
    }

    pub(crate) fn from_values(v: [f64; 11]) -> Self {
        Self {
            cop_mean_x_rel: v[0],
            cop_max_x_rel: v[1],
            cop_min_x_rel: v[2],
            cop_mean_y_rel: v[3],
            cop_displacement_x: v[4],
            cop_displacement_y: v[5],
            peak_force: v[6],
            duration_s: v[7],
            cop_path_length: v[8],
            rfd: v[9],
            peak_force_derivative: v[10],
        }
    }

    /// JSON object keyed by feature name
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
