//! Timing and Smoothing Constants

/// EMA smoothing factor applied to each channel's voltage.
///
/// Lower is smoother. Must lie strictly between 0 and 1.
pub const EMA_ALPHA: f32 = 0.15;

/// Samples per channel averaged during auto-zero.
pub const ZEROING_SAMPLES: u32 = 200;

/// Delay between auto-zero sampling rounds (milliseconds).
///
/// 200 × 10 ms keeps startup at about two seconds.
pub const ZEROING_DELAY_MS: u32 = 10;

/// Minimum spacing between telemetry records (milliseconds).
///
/// 20 Hz is enough for the live CoP plot and keeps the serial link idle
/// most of the time at 115200 baud.
pub const LOG_INTERVAL_MS: u64 = 50;
