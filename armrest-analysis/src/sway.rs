//! Sway Statistics
//!
//! ## Confidence Ellipse
//!
//! The spread of CoP points is summarized by the 95 % confidence ellipse of
//! a bivariate normal fitted to them:
//!
//! ```text
//! Σ        = sample covariance of (x, y)          (n − 1 denominator)
//! λ₁ ≥ λ₂  = eigenvalues of Σ, negatives clamped to 0
//! width    = 2·√(χ²·λ₁)      height = 2·√(χ²·λ₂)  (χ² = χ²₀.₉₅(2) = 5.991…)
//! angle    = atan2 of the λ₁ eigenvector, in degrees, within (−90°, 90°]
//! area     = π · (width/2) · (height/2)
//! ```
//!
//! ## Mean Trajectory
//!
//! Repetitions of a task differ in length, so each one is resampled over its
//! own time span onto a fixed number of points (linear interpolation) and the
//! resampled paths are averaged point by point. The three channel forces
//! are resampled alongside the CoP, and the instant of largest mean total
//! force gives the peak forces and the CoP at the peak.

use serde::{Deserialize, Serialize};

use crate::features::{MIN_LOADED_FORCE_N, MIN_LOADED_RECORDS};
use crate::trial::Trial;

/// χ² quantile for 95 % coverage with 2 degrees of freedom
pub const CHI2_95_2DOF: f64 = 5.991_464_547;

/// Points on a resampled trajectory
pub const TRAJECTORY_POINTS: usize = 101;

/// 95 % confidence ellipse of a CoP cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwayEllipse {
    /// Mean CoP (cm)
    pub center: (f64, f64),
    /// Major axis length (cm)
    pub width: f64,
    /// Minor axis length (cm)
    pub height: f64,
    /// Major axis orientation (degrees from +x)
    pub angle_deg: f64,
    /// Ellipse area (cm²)
    pub area: f64,
}

impl SwayEllipse {
    /// Fit the ellipse; `None` with fewer than two points
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }

        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
        let (mx, my) = (sx / n as f64, sy / n as f64);

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for &(x, y) in points {
            let (dx, dy) = (x - mx, y - my);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        let dof = (n - 1) as f64;
        let (a, c, b) = (sxx / dof, syy / dof, sxy / dof);

        // Symmetric 2×2 eigenproblem in closed form
        let half_trace = (a + c) / 2.0;
        let radius = (((a - c) / 2.0).powi(2) + b * b).sqrt();
        let major = (half_trace + radius).max(0.0);
        let minor = (half_trace - radius).max(0.0);

        let (vx, vy) = if b != 0.0 {
            (major - c, b)
        } else if a >= c {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };
        let mut angle_deg = vy.atan2(vx).to_degrees();
        // Eigenvectors have no sign; report the half-plane facing +x
        if angle_deg <= -90.0 {
            angle_deg += 180.0;
        } else if angle_deg > 90.0 {
            angle_deg -= 180.0;
        }

        let width = 2.0 * (CHI2_95_2DOF * major).sqrt();
        let height = 2.0 * (CHI2_95_2DOF * minor).sqrt();

        Some(Self {
            center: (mx, my),
            width,
            height,
            angle_deg,
            area: std::f64::consts::PI * (width / 2.0) * (height / 2.0),
        })
    }
}

/// Resampled channels: F_left, F_right, F_vtc, CoP x, CoP y
const SIGNALS: usize = 5;

/// One loaded record: seconds from the first loaded record, then the signals
type PathPoint = (f64, [f64; SIGNALS]);

/// Loaded records of a trial, or `None` when the trial is too sparse
fn loaded_path(trial: &Trial) -> Option<Vec<PathPoint>> {
    let records: Vec<_> = trial.loaded(MIN_LOADED_FORCE_N).collect();
    if records.len() < MIN_LOADED_RECORDS {
        return None;
    }
    let t0 = records[0].timestamp;
    Some(
        records
            .iter()
            .map(|r| {
                let t = r.timestamp.saturating_sub(t0) as f64 / 1000.0;
                let signals = [r.f_left, r.f_right, r.f_vtc, r.cop_x, r.cop_y].map(f64::from);
                (t, signals)
            })
            .collect(),
    )
}

/// Linear interpolation of `path` at time `t`, clamped to its ends
///
/// `path` must be non-empty and ordered by time.
fn interpolate(path: &[PathPoint], t: f64) -> [f64; SIGNALS] {
    let upper = path.partition_point(|&(pt, _)| pt < t);
    if upper == 0 {
        return path[0].1;
    }
    if upper == path.len() {
        return path[path.len() - 1].1;
    }
    let (t0, v0) = path[upper - 1];
    let (t1, v1) = path[upper];
    let w = if t1 > t0 { (t - t0) / (t1 - t0) } else { 1.0 };
    let mut out = v0;
    for (o, (a, b)) in out.iter_mut().zip(v0.iter().zip(v1.iter())) {
        *o = a + w * (b - a);
    }
    out
}

fn resample(path: &[PathPoint], points: usize) -> Vec<[f64; SIGNALS]> {
    let start = path[0].0;
    let end = path[path.len() - 1].0;
    let step = if points > 1 { (end - start) / (points - 1) as f64 } else { 0.0 };
    (0..points).map(|i| interpolate(path, start + step * i as f64)).collect()
}

fn average(paths: &[Vec<PathPoint>], points: usize) -> Option<Vec<[f64; SIGNALS]>> {
    if paths.is_empty() {
        return None;
    }
    let resampled: Vec<_> = paths.iter().map(|path| resample(path, points)).collect();
    let count = resampled.len() as f64;
    let mean = (0..points)
        .map(|i| {
            let mut sums = [0.0; SIGNALS];
            for path in &resampled {
                for (sum, value) in sums.iter_mut().zip(path[i].iter()) {
                    *sum += value;
                }
            }
            sums.map(|sum| sum / count)
        })
        .collect();
    Some(mean)
}

/// Mean force and CoP traces over the repetitions of a task
///
/// Every repetition is resampled over its own loaded span, so index `i`
/// is the same fraction of the movement in each of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanSignals {
    /// Mean left force (N)
    pub f_left: Vec<f64>,
    /// Mean right force (N)
    pub f_right: Vec<f64>,
    /// Mean vertex force (N)
    pub f_vtc: Vec<f64>,
    /// Mean CoP (cm)
    pub cop: Vec<(f64, f64)>,
    /// Index of the largest mean total force (first one on ties)
    pub peak_index: usize,
    /// Mean left, right and vertex force at the peak (N)
    pub peak_forces: (f64, f64, f64),
    /// Mean CoP at the peak (cm)
    pub peak_cop: (f64, f64),
}

impl MeanSignals {
    /// Average the trials on `points` samples, `None` if no trial is usable
    pub fn from_trials<'a>(trials: impl IntoIterator<Item = &'a Trial>, points: usize) -> Option<Self> {
        let paths: Vec<_> = trials.into_iter().filter_map(loaded_path).collect();
        Self::from_paths(&paths, points)
    }

    fn from_paths(paths: &[Vec<PathPoint>], points: usize) -> Option<Self> {
        let mean = average(paths, points)?;

        let mut peak_index = 0;
        let mut peak_total = f64::NEG_INFINITY;
        for (i, s) in mean.iter().enumerate() {
            let total = s[0] + s[1] + s[2];
            if total > peak_total {
                peak_total = total;
                peak_index = i;
            }
        }
        let peak = mean.get(peak_index)?;

        Some(Self {
            f_left: mean.iter().map(|s| s[0]).collect(),
            f_right: mean.iter().map(|s| s[1]).collect(),
            f_vtc: mean.iter().map(|s| s[2]).collect(),
            cop: mean.iter().map(|s| (s[3], s[4])).collect(),
            peak_index,
            peak_forces: (peak[0], peak[1], peak[2]),
            peak_cop: (peak[3], peak[4]),
        })
    }

    /// Mean total force trace (N)
    pub fn total(&self) -> Vec<f64> {
        self.f_left
            .iter()
            .zip(&self.f_right)
            .zip(&self.f_vtc)
            .map(|((l, r), v)| l + r + v)
            .collect()
    }
}

/// Point-wise mean of the resampled CoP paths of `trials`
///
/// Trials with too few loaded records are left out; `None` if none remain.
pub fn mean_trajectory<'a>(
    trials: impl IntoIterator<Item = &'a Trial>,
    points: usize,
) -> Option<Vec<(f64, f64)>> {
    MeanSignals::from_trials(trials, points).map(|signals| signals.cop)
}

/// Sway summary of the repetitions of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaySummary {
    /// Ellipse over the loaded points of every usable repetition
    pub ellipse: SwayEllipse,
    /// Mean resampled force and CoP traces
    pub signals: MeanSignals,
    /// Repetitions that contributed
    pub trials_used: usize,
}

impl SwaySummary {
    /// Summarize the repetitions, `None` if none has enough loaded records
    pub fn from_trials<'a>(trials: impl IntoIterator<Item = &'a Trial>) -> Option<Self> {
        let paths: Vec<_> = trials.into_iter().filter_map(loaded_path).collect();
        let cloud: Vec<(f64, f64)> = paths
            .iter()
            .flat_map(|p| p.iter().map(|(_, s)| (s[3], s[4])))
            .collect();

        Some(Self {
            ellipse: SwayEllipse::fit(&cloud)?,
            signals: MeanSignals::from_paths(&paths, TRAJECTORY_POINTS)?,
            trials_used: paths.len(),
        })
    }

    /// Mean CoP trajectory
    pub fn mean_trajectory(&self) -> &[(f64, f64)] {
        &self.signals.cop
    }
}
