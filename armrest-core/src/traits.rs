//! Collaborator traits
//!
//! The pipeline never touches hardware directly. Four small traits stand in
//! for the board:
//!
//! - [`AnalogSampler`]: one voltage per channel per cycle
//! - [`TelemetrySink`]: header once, then one record per gated cycle
//! - [`TimeSource`]: millisecond clock for timestamps and the log gate
//! - [`Delay`]: blocking wait between auto-zero rounds
//!
//! ## Example Implementation
//!
//! ```rust
//! use armrest_core::traits::AnalogSampler;
//! use armrest_core::{Channel, calibration::counts_to_voltage};
//!
//! struct Adc1 {
//!     // ... ADC peripheral and pins
//! }
//!
//! impl AnalogSampler for Adc1 {
//!     type Error = ();
//!
//!     fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, ()> {
//!         let counts: u16 = match channel {
//!             Channel::Left => 1500,   // GPIO32
//!             Channel::Right => 1510,  // GPIO35
//!             Channel::Vertex => 1490, // GPIO34
//!         };
//!         Ok(counts_to_voltage(counts))
//!     }
//! }
//! ```

use crate::channel::Channel;
use crate::telemetry::TelemetryRecord;
use crate::time::Timestamp;

/// Source of analog readings
///
/// Non-blocking in the `nb` sense: a conversion still in progress returns
/// `WouldBlock` and the caller retries.
pub trait AnalogSampler {
    /// Driver error
    type Error;

    /// Read one channel, in volts (0.0 to 3.3 on the ESP32)
    fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, Self::Error>;
}

/// Destination of telemetry records (serial port, file, test buffer)
pub trait TelemetrySink {
    /// Transport error
    type Error;

    /// Write the column header, once before any record
    fn write_header(&mut self, header: &str) -> Result<(), Self::Error>;

    /// Write one record
    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error>;
}

/// Source of time for the system
///
/// Monotonic milliseconds are all the pipeline needs. The epoch is
/// implementation defined; telemetry timestamps are taken from it as-is.
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Blocking delay
pub trait Delay {
    /// Wait at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

impl<S: AnalogSampler + ?Sized> AnalogSampler for &mut S {
    type Error = S::Error;

    fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, Self::Error> {
        (**self).read_voltage(channel)
    }
}

impl<K: TelemetrySink + ?Sized> TelemetrySink for &mut K {
    type Error = K::Error;

    fn write_header(&mut self, header: &str) -> Result<(), Self::Error> {
        (**self).write_header(header)
    }

    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        (**self).emit(record)
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
