//! Voltage to Force Calibration
//!
//! ## Model
//!
//! Each Hall sensor sits under a sprung magnet; load brings the magnet closer
//! and the output voltage rises. The bench fit is two-stage:
//!
//! ```text
//! 1. raw   = P1·v² + P2·v + P3          (v = filtered voltage, absolute)
//! 2. force = raw × c_rel[channel] × k   (c_rel: relative sensitivity,
//!                                        k: global scale to Newtons)
//! ```
//!
//! Two clips keep the output non-negative:
//! - at or below the channel's rest voltage the raw value is 0
//! - a polynomial that evaluates negative (just above rest) is clipped to 0
//!
//! Note that the rest test compares against the baseline, while the
//! polynomial sees the absolute voltage, not `v - v_rest`. The coefficients
//! were fitted that way; substituting the delta would shift every reading.
//!
//! ```rust
//! use armrest_core::force_from_voltage;
//!
//! // Below rest: always zero
//! assert_eq!(force_from_voltage(1.20, 1.25, 1.0, 5.91), 0.0);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelSet};
use crate::constants::calibration::{
    ADC_MAX_COUNTS, ADC_REFERENCE_V, SENSITIVITY_LEFT, SENSITIVITY_RIGHT, SENSITIVITY_VERTEX,
    SYSTEM_FORCE_SCALE, TRANSFER_P1, TRANSFER_P2, TRANSFER_P3,
};
use crate::zeroing::RestBaselines;

/// Quadratic voltage → raw-unit transfer function
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransferFunction {
    /// Quadratic coefficient
    pub p1: f32,
    /// Linear coefficient
    pub p2: f32,
    /// Constant term
    pub p3: f32,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self {
            p1: TRANSFER_P1,
            p2: TRANSFER_P2,
            p3: TRANSFER_P3,
        }
    }
}

impl TransferFunction {
    /// Polynomial value at `voltage`, without any clipping
    pub fn evaluate(&self, voltage: f32) -> f32 {
        self.p1 * voltage * voltage + self.p2 * voltage + self.p3
    }

    /// Raw units for a filtered voltage, clipped at rest and at zero
    pub fn raw_units(&self, voltage: f32, rest: f32) -> f32 {
        if voltage <= rest {
            return 0.0;
        }
        let raw = self.evaluate(voltage);
        if raw > 0.0 {
            raw
        } else {
            0.0
        }
    }
}

/// Force from a filtered voltage using the deployed transfer function
///
/// Never negative: 0 at or below `rest`, and 0 wherever the polynomial
/// dips below zero.
pub fn force_from_voltage(voltage: f32, rest: f32, relative_sensitivity: f32, global_scale: f32) -> f32 {
    TransferFunction::default().raw_units(voltage, rest) * relative_sensitivity * global_scale
}

/// Convert a 12-bit ADC reading to volts
pub fn counts_to_voltage(counts: u16) -> f32 {
    f32::from(counts) * (ADC_REFERENCE_V / f32::from(ADC_MAX_COUNTS))
}

/// Complete calibration for all three channels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationModel {
    /// Shared transfer function
    pub transfer: TransferFunction,
    /// Relative sensitivity per channel (left = reference)
    pub sensitivity: ChannelSet<f32>,
    /// Corrected raw units → Newtons
    pub force_scale: f32,
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self {
            transfer: TransferFunction::default(),
            sensitivity: ChannelSet::new(SENSITIVITY_LEFT, SENSITIVITY_RIGHT, SENSITIVITY_VERTEX),
            force_scale: SYSTEM_FORCE_SCALE,
        }
    }
}

impl CalibrationModel {
    /// Force on one channel
    pub fn force(&self, channel: Channel, voltage: f32, rest: f32) -> f32 {
        self.transfer.raw_units(voltage, rest) * self.sensitivity[channel] * self.force_scale
    }

    /// Forces on all channels from filtered voltages
    pub fn forces(&self, voltages: &ChannelSet<f32>, baselines: &RestBaselines) -> ChannelSet<f32> {
        ChannelSet::from_fn(|channel| self.force(channel, voltages[channel], baselines.get(channel)))
    }
}
