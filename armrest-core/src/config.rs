//! Platform configuration
//!
//! All deployment constants in one value. There is no runtime source for
//! these: `PlatformConfig::default()` is the firmware's configuration and the
//! `with_*` methods exist for tests, replay and bench recalibration.
//!
//! ```rust
//! use armrest_core::PlatformConfig;
//!
//! let config = PlatformConfig::default()
//!     .with_dead_zone_radius(1.5)
//!     .with_log_interval(20);
//!
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationModel, TransferFunction};
use crate::channel::{Channel, ChannelSet, Point};
use crate::constants::{
    DEAD_ZONE_RADIUS_CM, EMA_ALPHA, LOG_INTERVAL_MS, MIN_REST_THRESHOLD_N, POSITION_LEFT_CM,
    POSITION_RIGHT_CM, POSITION_VERTEX_CM, ZEROING_DELAY_MS, ZEROING_SAMPLES,
};
use crate::errors::{ConfigError, ConfigResult};

/// Every deployment-specific parameter of the platform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlatformConfig {
    /// Voltage → force chain
    pub calibration: CalibrationModel,
    /// Sensor positions (cm)
    pub positions: ChannelSet<Point>,
    /// Total force above which the arm is rested (N)
    pub rest_threshold_n: f32,
    /// Dead-zone radius around the geometric center (cm)
    pub dead_zone_radius_cm: f32,
    /// EMA smoothing factor, in (0, 1)
    pub ema_alpha: f32,
    /// Auto-zero sampling rounds
    pub zeroing_samples: u32,
    /// Wait after each auto-zero round (ms)
    pub zeroing_delay_ms: u32,
    /// Minimum spacing between telemetry records (ms)
    pub log_interval_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationModel::default(),
            positions: ChannelSet::new(
                POSITION_LEFT_CM.into(),
                POSITION_RIGHT_CM.into(),
                POSITION_VERTEX_CM.into(),
            ),
            rest_threshold_n: MIN_REST_THRESHOLD_N,
            dead_zone_radius_cm: DEAD_ZONE_RADIUS_CM,
            ema_alpha: EMA_ALPHA,
            zeroing_samples: ZEROING_SAMPLES,
            zeroing_delay_ms: ZEROING_DELAY_MS,
            log_interval_ms: LOG_INTERVAL_MS,
        }
    }
}

impl PlatformConfig {
    /// Replace the transfer polynomial
    pub fn with_transfer(mut self, transfer: TransferFunction) -> Self {
        self.calibration.transfer = transfer;
        self
    }

    /// Replace the relative sensitivities
    pub fn with_sensitivity(mut self, sensitivity: ChannelSet<f32>) -> Self {
        self.calibration.sensitivity = sensitivity;
        self
    }

    /// Replace the global force scale
    pub fn with_force_scale(mut self, scale: f32) -> Self {
        self.calibration.force_scale = scale;
        self
    }

    /// Replace the sensor positions
    pub fn with_positions(mut self, positions: ChannelSet<Point>) -> Self {
        self.positions = positions;
        self
    }

    /// Replace the rest threshold (N)
    pub fn with_rest_threshold(mut self, threshold: f32) -> Self {
        self.rest_threshold_n = threshold;
        self
    }

    /// Replace the dead-zone radius (cm)
    pub fn with_dead_zone_radius(mut self, radius: f32) -> Self {
        self.dead_zone_radius_cm = radius;
        self
    }

    /// Replace the EMA factor
    pub fn with_ema_alpha(mut self, alpha: f32) -> Self {
        self.ema_alpha = alpha;
        self
    }

    /// Replace the auto-zero sample count and delay
    pub fn with_zeroing(mut self, samples: u32, delay_ms: u32) -> Self {
        self.zeroing_samples = samples;
        self.zeroing_delay_ms = delay_ms;
        self
    }

    /// Replace the telemetry interval (ms)
    pub fn with_log_interval(mut self, interval_ms: u64) -> Self {
        self.log_interval_ms = interval_ms;
        self
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> ConfigResult<()> {
        let cal = &self.calibration;
        let scalars = [
            ("p1", cal.transfer.p1),
            ("p2", cal.transfer.p2),
            ("p3", cal.transfer.p3),
            ("force_scale", cal.force_scale),
            ("rest_threshold_n", self.rest_threshold_n),
            ("dead_zone_radius_cm", self.dead_zone_radius_cm),
            ("ema_alpha", self.ema_alpha),
        ];
        if let Some(&(name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFiniteParameter { name });
        }
        if self.positions.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ConfigError::NonFiniteParameter { name: "positions" });
        }
        if cal.sensitivity.iter().any(|s| !s.is_finite()) {
            return Err(ConfigError::NonFiniteParameter { name: "sensitivity" });
        }

        if self.ema_alpha <= 0.0 || self.ema_alpha >= 1.0 {
            return Err(ConfigError::InvalidSmoothingFactor { alpha: self.ema_alpha });
        }
        if self.rest_threshold_n <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold { threshold: self.rest_threshold_n });
        }
        if self.dead_zone_radius_cm < 0.0 {
            return Err(ConfigError::NegativeDeadZoneRadius { radius: self.dead_zone_radius_cm });
        }
        if cal.force_scale <= 0.0 {
            return Err(ConfigError::NonPositiveScale { scale: cal.force_scale });
        }
        for (channel, &s) in cal.sensitivity.entries() {
            if s <= 0.0 {
                return Err(ConfigError::NonPositiveSensitivity { channel });
            }
        }
        if self.zeroing_samples == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if self.log_interval_ms == 0 {
            return Err(ConfigError::ZeroLogInterval);
        }

        Ok(())
    }

    /// Position of one sensor
    pub fn position(&self, channel: Channel) -> Point {
        self.positions[channel]
    }
}
