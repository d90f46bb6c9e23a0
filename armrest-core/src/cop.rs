//! Center of Pressure and Dead-Zone Detection
//!
//! ## Per-Cycle Computation
//!
//! ```text
//! F_total = F_left + F_right + F_vtc
//! rested  = F_total > threshold
//!
//! rested:      CoP = Σ pᵢ·Fᵢ / F_total
//!              inside = |CoP − center| ≤ radius
//!              changed = inside ≠ previous
//! not rested:  CoP undefined, inside forced false, changed = false
//! ```
//!
//! `center` is the unweighted centroid of the three sensor positions.
//!
//! ## State Machine
//!
//! ```text
//!            changed           changed
//!   Outside ─────────▶ Inside ─────────▶ Outside      (rested cycles)
//!      ▲                  │
//!      └──────────────────┘
//!        lost rest: silent reset, no changed flag
//! ```
//!
//! The only state carried between cycles is the previous membership.
//!
//! ## Division Guard
//!
//! The CoP is computed only when `F_total > threshold`, and configuration
//! validation rejects a threshold that is not strictly positive, so the
//! denominator is never zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{ChannelSet, Point};
use crate::config::PlatformConfig;

/// Outcome of one cycle of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlatformState {
    /// Calibrated force per channel (N)
    pub forces: ChannelSet<f32>,
    /// Sum of the channel forces (N)
    pub total_force: f32,
    /// Total force above the rest threshold
    pub is_rested: bool,
    /// Center of pressure, only while rested
    pub cop: Option<Point>,
    /// Dead-zone membership after this cycle
    pub in_dead_zone: bool,
    /// Membership differs from the previous rested cycle
    pub state_changed: bool,
}

impl PlatformState {
    /// CoP coordinates for telemetry, `(NaN, NaN)` when not rested
    pub fn cop_xy(&self) -> (f32, f32) {
        match self.cop {
            Some(p) => (p.x, p.y),
            None => (f32::NAN, f32::NAN),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PlatformState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "F_tot={} rested={} cop={} dz={} changed={}",
            self.total_force,
            self.is_rested,
            self.cop,
            self.in_dead_zone,
            self.state_changed
        )
    }
}

/// Rest detection, CoP and dead-zone tracking
#[derive(Debug, Clone)]
pub struct CopEngine {
    /// Sensor positions (cm)
    positions: ChannelSet<Point>,
    /// Geometric center of the array (cm)
    center: Point,
    /// Minimum total force for a rested arm (N)
    rest_threshold: f32,
    /// Dead-zone radius around `center` (cm)
    dead_zone_radius: f32,
    /// Membership carried from the previous cycle
    was_in_dead_zone: bool,
}

impl CopEngine {
    /// Engine for a geometry, starting outside the dead zone
    pub fn new(positions: ChannelSet<Point>, rest_threshold: f32, dead_zone_radius: f32) -> Self {
        Self {
            center: Point::centroid(&positions),
            positions,
            rest_threshold,
            dead_zone_radius,
            was_in_dead_zone: false,
        }
    }

    /// Engine for the configured geometry
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(config.positions, config.rest_threshold_n, config.dead_zone_radius_cm)
    }

    /// Geometric center the dead zone is drawn around
    pub fn center(&self) -> Point {
        self.center
    }

    /// Membership carried into the next cycle
    pub fn in_dead_zone(&self) -> bool {
        self.was_in_dead_zone
    }

    /// Force-weighted centroid of the sensor positions
    ///
    /// Callers must ensure `total` is non-zero.
    fn weighted_centroid(&self, forces: &ChannelSet<f32>, total: f32) -> Point {
        let (mx, my) = self
            .positions
            .iter()
            .zip(forces.iter())
            .fold((0.0, 0.0), |(mx, my), (p, f)| (mx + p.x * f, my + p.y * f));
        Point::new(mx / total, my / total)
    }

    /// Run one cycle on calibrated forces
    pub fn update(&mut self, forces: ChannelSet<f32>) -> PlatformState {
        let total_force: f32 = forces.iter().sum();
        let is_rested = total_force > self.rest_threshold;

        if !is_rested {
            // Losing rest leaves the dead zone without signalling a change
            self.was_in_dead_zone = false;
            return PlatformState {
                forces,
                total_force,
                is_rested,
                cop: None,
                in_dead_zone: false,
                state_changed: false,
            };
        }

        let cop = self.weighted_centroid(&forces, total_force);
        let in_dead_zone = cop.distance_to(self.center) <= self.dead_zone_radius;
        let state_changed = in_dead_zone != self.was_in_dead_zone;
        if state_changed {
            log_debug!(
                "CoP ({:.2}, {:.2}) {} dead zone",
                cop.x,
                cop.y,
                if in_dead_zone { "entered" } else { "left" }
            );
        }
        self.was_in_dead_zone = in_dead_zone;

        PlatformState {
            forces,
            total_force,
            is_rested,
            cop: Some(cop),
            in_dead_zone,
            state_changed,
        }
    }
}

impl Default for CopEngine {
    fn default() -> Self {
        Self::from_config(&PlatformConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    const EQUAL: ChannelSet<f32> = ChannelSet::new(10.0, 10.0, 10.0);
    const LEFT_ONLY: ChannelSet<f32> = ChannelSet::new(30.0, 0.0, 0.0);
    const UNLOADED: ChannelSet<f32> = ChannelSet::new(1.0, 1.0, 1.0);

    #[test]
    fn unloaded_reports_no_cop() {
        let mut engine = CopEngine::default();
        let state = engine.update(ChannelSet::splat(0.0));
        assert_eq!(state.total_force, 0.0);
        assert!(!state.is_rested);
        assert!(state.cop.is_none());
        let (x, y) = state.cop_xy();
        assert!(x.is_nan() && y.is_nan());
    }

    #[test]
    fn threshold_is_strict() {
        let mut engine = CopEngine::default();
        let state = engine.update(ChannelSet::new(3.5, 0.0, 0.0));
        assert!(!state.is_rested);
        let state = engine.update(ChannelSet::new(3.6, 0.0, 0.0));
        assert!(state.is_rested);
    }

    #[test]
    fn single_contributor_puts_cop_on_that_sensor() {
        let mut engine = CopEngine::default();
        let state = engine.update(ChannelSet::new(0.0, 0.0, 12.0));
        assert_eq!(state.cop, Some(Point::new(3.5, 22.0)));
        assert!(!state.in_dead_zone);
    }

    #[test]
    fn equal_forces_land_on_center() {
        let mut engine = CopEngine::default();
        let state = engine.update(EQUAL);
        let cop = state.cop.unwrap();
        assert!(cop.distance_to(engine.center()) < 1e-5);
        assert!(state.in_dead_zone);
        assert!(state.state_changed);
    }

    #[test]
    fn entering_dead_zone_flags_once() {
        let mut engine = CopEngine::default();
        let flags: Vec<bool> = [LEFT_ONLY, LEFT_ONLY, EQUAL, EQUAL, EQUAL]
            .into_iter()
            .map(|f| engine.update(f).state_changed)
            .collect();
        assert_eq!(flags, vec![false, false, true, false, false]);
    }

    #[test]
    fn leaving_while_rested_flags() {
        let mut engine = CopEngine::default();
        engine.update(EQUAL);
        let state = engine.update(LEFT_ONLY);
        assert!(state.state_changed);
        assert!(!state.in_dead_zone);
    }

    #[test]
    fn losing_rest_resets_silently() {
        let mut engine = CopEngine::default();
        assert!(engine.update(EQUAL).in_dead_zone);

        let state = engine.update(UNLOADED);
        assert!(!state.is_rested);
        assert!(!state.in_dead_zone);
        assert!(!state.state_changed);
        assert!(!engine.in_dead_zone());

        // Coming back inside counts as a fresh entry
        assert!(engine.update(EQUAL).state_changed);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let positions = ChannelSet::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 6.0),
        );
        // Center (2, 2); all load on the left sensor puts CoP at distance sqrt(8)
        let mut engine = CopEngine::new(positions, 1.0, libm::sqrtf(8.0));
        let mut forces = ChannelSet::splat(0.0);
        forces[Channel::Left] = 5.0;
        assert!(engine.update(forces).in_dead_zone);
    }
}
