//! Error Types
//!
//! The numerical pipeline itself has no failure modes: a voltage below its
//! baseline reads as zero force, zero total force never reaches the CoP
//! division and an unloaded platform reports no CoP. What can fail is
//! everything around it:
//!
//! - **Configuration** ([`ConfigError`]): constants that would break an
//!   invariant of the pipeline (a smoothing factor of 1, a zero rest
//!   threshold that would let the CoP divide by zero)
//! - **Collaborators** ([`PipelineError`]): the ADC or the telemetry link
//! - **Telemetry decoding** ([`TelemetryParseError`]): host-side parsing of
//!   recorded lines
//!
//! Errors are small and `Copy` so they can be returned from the sample loop
//! without allocation.
//!
//! ## Operational caveats (not errors)
//!
//! Touching the platform during auto-zero, or a shell whose sensors moved
//! since the geometry was measured, silently biases every reading. Neither is
//! detectable from the signals alone.

use core::fmt;

use thiserror_no_std::Error;

use crate::channel::Channel;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration rejected by [`PlatformConfig::validate`](crate::PlatformConfig::validate)
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// EMA factor outside the open interval (0, 1)
    #[error("Smoothing factor {alpha} must lie strictly between 0 and 1")]
    InvalidSmoothingFactor {
        /// Rejected factor
        alpha: f32,
    },

    /// Rest threshold must be positive, it guards the CoP division
    #[error("Rest threshold {threshold} N must be positive")]
    NonPositiveThreshold {
        /// Rejected threshold
        threshold: f32,
    },

    /// Dead zone with negative radius
    #[error("Dead-zone radius {radius} cm must not be negative")]
    NegativeDeadZoneRadius {
        /// Rejected radius
        radius: f32,
    },

    /// Global force scale must be positive
    #[error("Force scale {scale} must be positive")]
    NonPositiveScale {
        /// Rejected scale
        scale: f32,
    },

    /// Relative sensitivity must be positive
    #[error("Sensitivity of channel {channel:?} must be positive")]
    NonPositiveSensitivity {
        /// Offending channel
        channel: Channel,
    },

    /// Auto-zero needs at least one sample
    #[error("Zeroing sample count must be at least 1")]
    ZeroSampleCount,

    /// Telemetry interval of zero would emit every cycle
    #[error("Log interval must be at least 1 ms")]
    ZeroLogInterval,

    /// NaN or infinite constant
    #[error("Parameter {name} is not a finite number")]
    NonFiniteParameter {
        /// Name of the parameter
        name: &'static str,
    },
}

/// The analog sampler failed on one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerError<E> {
    /// Channel being read
    pub channel: Channel,
    /// Error reported by the sampler
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for SamplerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sampling {} failed: {}", self.channel.name(), self.error)
    }
}

/// Failure of the sample loop
///
/// Generic over the sampler error `S` and the telemetry sink error `K`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineError<S, K> {
    /// Analog sampling failed
    Sampler(SamplerError<S>),
    /// Telemetry sink rejected a header or record
    Sink(K),
    /// Configuration rejected before the loop started
    Config(ConfigError),
}

impl<S: fmt::Display, K: fmt::Display> fmt::Display for PipelineError<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampler(e) => write!(f, "{}", e),
            Self::Sink(e) => write!(f, "Telemetry sink error: {}", e),
            Self::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl<S, K> From<SamplerError<S>> for PipelineError<S, K> {
    fn from(e: SamplerError<S>) -> Self {
        Self::Sampler(e)
    }
}

impl<S, K> From<ConfigError> for PipelineError<S, K> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Telemetry line could not be decoded
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryParseError {
    /// Wrong number of comma-separated fields
    #[error("Expected 9 fields, found {found}")]
    FieldCount {
        /// Fields present on the line
        found: usize,
    },

    /// Numeric field that is neither a number nor `nan`
    #[error("Field {field} is not a number")]
    InvalidNumber {
        /// Column name
        field: &'static str,
    },

    /// Flag field that is not `0`, `1`, `true` or `false`
    #[error("Field {field} is not a flag")]
    InvalidFlag {
        /// Column name
        field: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSmoothingFactor { alpha } =>
                defmt::write!(fmt, "Smoothing factor {} not in (0, 1)", alpha),
            Self::NonPositiveThreshold { threshold } =>
                defmt::write!(fmt, "Rest threshold {} <= 0", threshold),
            Self::NegativeDeadZoneRadius { radius } =>
                defmt::write!(fmt, "Dead-zone radius {} < 0", radius),
            Self::NonPositiveScale { scale } =>
                defmt::write!(fmt, "Force scale {} <= 0", scale),
            Self::NonPositiveSensitivity { channel } =>
                defmt::write!(fmt, "Sensitivity of {} <= 0", channel),
            Self::ZeroSampleCount =>
                defmt::write!(fmt, "Zero zeroing samples"),
            Self::ZeroLogInterval =>
                defmt::write!(fmt, "Zero log interval"),
            Self::NonFiniteParameter { name } =>
                defmt::write!(fmt, "{} not finite", name),
        }
    }
}

#[cfg(feature = "defmt")]
impl<S: defmt::Format, K: defmt::Format> defmt::Format for PipelineError<S, K> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Sampler(e) =>
                defmt::write!(fmt, "Sampling {} failed: {}", e.channel, e.error),
            Self::Sink(e) =>
                defmt::write!(fmt, "Telemetry sink: {}", e),
            Self::Config(e) =>
                defmt::write!(fmt, "Config: {}", e),
        }
    }
}
