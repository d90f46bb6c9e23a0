//! Deployment Constants for the Armrest Platform
//!
//! Every number that ties the firmware to one physical build lives here,
//! with its unit and where it came from. [`PlatformConfig`](crate::PlatformConfig)
//! gathers them into a single value at startup; nothing reads them at runtime
//! from anywhere else.
//!
//! ## Organization
//!
//! - **Calibration**: transfer polynomial, relative sensitivities, force scale
//! - **Geometry**: sensor positions and the dead zone
//! - **Timing**: filter, zeroing and logging cadence
//!
//! Re-deriving any of these (new magnets, new armrest shell) means
//! re-running the bench procedure documented next to the constant.

/// Voltage-to-force calibration coefficients.
pub mod calibration;

/// Sensor placement and dead-zone geometry (centimeters).
pub mod geometry;

/// Sampling, smoothing and logging cadence.
pub mod timing;

pub use calibration::{
    TRANSFER_P1, TRANSFER_P2, TRANSFER_P3,
    SENSITIVITY_LEFT, SENSITIVITY_RIGHT, SENSITIVITY_VERTEX,
    SYSTEM_FORCE_SCALE, ADC_REFERENCE_V, ADC_MAX_COUNTS,
};

pub use geometry::{
    POSITION_LEFT_CM, POSITION_RIGHT_CM, POSITION_VERTEX_CM,
    DEAD_ZONE_RADIUS_CM, MIN_REST_THRESHOLD_N,
};

pub use timing::{
    EMA_ALPHA, ZEROING_SAMPLES, ZEROING_DELAY_MS, LOG_INTERVAL_MS,
};
