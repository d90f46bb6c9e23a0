//! Real-time signal chain for the three-sensor armrest force platform
//!
//! Samples three Hall-effect transducers, turns their voltages into calibrated
//! forces, locates the center of pressure (CoP) while the arm is rested and
//! reports entries into and exits from a dead zone around the platform center.
//! A telemetry record is emitted at a fixed wall-clock interval.
//!
//! Key constraints:
//! - Runs on an ESP32 (`no_std`, no heap allocation in the hot path)
//! - One cooperative loop, no interrupts or shared state
//! - Exactly three channels at a fixed geometry
//!
//! ```no_run
//! use armrest_core::{AutoZero, PlatformConfig, SampleLoop};
//! # use armrest_core::traits::{AnalogSampler, Delay, TelemetrySink, TimeSource};
//! # use armrest_core::{Channel, TelemetryRecord, time::Timestamp};
//! # struct Adc; impl AnalogSampler for Adc { type Error = ();
//! #   fn read_voltage(&mut self, _: Channel) -> nb::Result<f32, ()> { Ok(1.2) } }
//! # struct Serial; impl TelemetrySink for Serial { type Error = ();
//! #   fn write_header(&mut self, _: &str) -> Result<(), ()> { Ok(()) }
//! #   fn emit(&mut self, _: &TelemetryRecord) -> Result<(), ()> { Ok(()) } }
//! # struct Clock; impl TimeSource for Clock { fn now(&self) -> Timestamp { 0 } }
//! # struct Wait; impl Delay for Wait { fn delay_ms(&mut self, _: u32) {} }
//! # fn main() -> Result<(), armrest_core::PipelineError<(), ()>> {
//! let config = PlatformConfig::default();
//! let mut adc = Adc;
//!
//! // Platform must be unloaded while this runs
//! let baselines = AutoZero::from_config(&config)?.run(&mut adc, &mut Wait)?;
//!
//! let mut platform = SampleLoop::new(config, baselines, adc, Serial, Clock)?;
//! platform.start()?;
//! loop {
//!     platform.step()?;
//! }
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod calibration;
pub mod channel;
pub mod config;
pub mod constants;
pub mod cop;
pub mod errors;
pub mod filter;
pub mod pipeline;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod traits;
pub mod zeroing;

// Public API
pub use calibration::{CalibrationModel, TransferFunction, force_from_voltage};
pub use channel::{Channel, ChannelSet, Point};
pub use config::PlatformConfig;
pub use cop::{CopEngine, PlatformState};
pub use errors::{ConfigError, PipelineError, TelemetryParseError};
pub use filter::EmaFilter;
pub use pipeline::{CycleOutcome, LogGate, SampleLoop};
pub use session::Session;
pub use telemetry::{TelemetryRecord, TELEMETRY_HEADER};
pub use zeroing::{AutoZero, RestBaselines};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
