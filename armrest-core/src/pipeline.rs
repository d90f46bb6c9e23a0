//! Sample Loop Orchestration
//!
//! ## Overview
//!
//! [`SampleLoop`] drives one full pass of the chain per iteration, as fast as
//! the host allows, and hands a record to the telemetry sink only when the
//! [`LogGate`] opens:
//!
//! ```text
//! every iteration:   sample ─▶ filter ─▶ calibrate ─▶ CoP / dead zone
//! gated (50 ms):                                        └─▶ sink.emit()
//! ```
//!
//! Decoupling the two keeps the filter bandwidth tied to the real sampling
//! rate while the serial log stays at a fixed 20 Hz.
//!
//! ## Timing
//!
//! The gate compares timestamps; it is not a scheduler. A record goes out on
//! the first iteration at least one interval after the previous record, so
//! emission jitter is one iteration long. A dead-zone change that happens on
//! a cycle without a record is not reported in telemetry.
//!
//! ## Usage
//!
//! ```rust
//! use armrest_core::{ChannelSet, PlatformConfig, RestBaselines, SampleLoop};
//! use armrest_core::telemetry::IoSink;
//! use armrest_core::time::MockTimeSource;
//! # use armrest_core::{traits::AnalogSampler, Channel};
//! # struct Adc;
//! # impl AnalogSampler for Adc {
//! #     type Error = ();
//! #     fn read_voltage(&mut self, _: Channel) -> nb::Result<f32, ()> { Ok(1.4) }
//! # }
//!
//! let clock = MockTimeSource::new(0);
//! let baselines = RestBaselines::new(ChannelSet::splat(1.4));
//! let mut platform = SampleLoop::new(
//!     PlatformConfig::default(), baselines, Adc, IoSink::new(Vec::new()), &clock,
//! ).unwrap();
//!
//! platform.start().unwrap();
//! clock.advance(50);
//! let outcome = platform.step().unwrap();
//! assert!(outcome.emitted);
//! ```

use crate::channel::{Channel, ChannelSet};
use crate::config::PlatformConfig;
use crate::cop::PlatformState;
use crate::errors::{PipelineError, SamplerError};
use crate::session::Session;
use crate::telemetry::{TelemetryRecord, TELEMETRY_HEADER};
use crate::time::Timestamp;
use crate::traits::{AnalogSampler, TelemetrySink, TimeSource};
use crate::zeroing::RestBaselines;

/// Fixed-interval emission gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogGate {
    /// Minimum spacing between emissions (ms)
    interval_ms: u64,
    /// Time of the last emission; 0 before the first
    last_emit: Timestamp,
}

impl LogGate {
    /// Gate with the given interval
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms, last_emit: 0 }
    }

    /// Open the gate if at least one interval has passed, recording `now`
    pub fn try_open(&mut self, now: Timestamp) -> bool {
        if now.saturating_sub(self.last_emit) >= self.interval_ms {
            self.last_emit = now;
            true
        } else {
            false
        }
    }

    /// Time of the last emission
    pub fn last_emit(&self) -> Timestamp {
        self.last_emit
    }

    /// Configured interval (ms)
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    /// Cycle timestamp (ms)
    pub timestamp: Timestamp,
    /// Pipeline output for this cycle
    pub state: PlatformState,
    /// A record went to the sink
    pub emitted: bool,
}

/// Cooperative sample loop
///
/// Owns the session, the collaborators and the log gate. Single-threaded,
/// no suspension points: [`step`](Self::step) runs one cycle to completion.
pub struct SampleLoop<A, K, C> {
    session: Session,
    sampler: A,
    sink: K,
    clock: C,
    gate: LogGate,
    cycles: u64,
}

impl<A, K, C> SampleLoop<A, K, C>
where
    A: AnalogSampler,
    K: TelemetrySink,
    C: TimeSource,
{
    /// Build the loop from auto-zero baselines
    pub fn new(
        config: PlatformConfig,
        baselines: RestBaselines,
        sampler: A,
        sink: K,
        clock: C,
    ) -> Result<Self, PipelineError<A::Error, K::Error>> {
        let session = Session::new(&config, baselines)?;
        Ok(Self {
            session,
            sampler,
            sink,
            clock,
            gate: LogGate::new(config.log_interval_ms),
            cycles: 0,
        })
    }

    /// Write the telemetry header. Call once before the first step.
    pub fn start(&mut self) -> Result<(), PipelineError<A::Error, K::Error>> {
        self.sink.write_header(TELEMETRY_HEADER).map_err(PipelineError::Sink)
    }

    fn sample(&mut self) -> Result<ChannelSet<f32>, SamplerError<A::Error>> {
        let mut volts = ChannelSet::splat(0.0f32);
        for channel in Channel::ALL {
            volts[channel] = nb::block!(self.sampler.read_voltage(channel)).map_err(|error| {
                log_warn!("Sampling {} failed", channel.name());
                SamplerError { channel, error }
            })?;
        }
        Ok(volts)
    }

    /// Run one cycle: sample, process, and emit if the gate is open
    pub fn step(&mut self) -> Result<CycleOutcome, PipelineError<A::Error, K::Error>> {
        let volts = self.sample()?;
        let state = self.session.process(volts);
        self.cycles += 1;

        let timestamp = self.clock.now();
        let emitted = self.gate.try_open(timestamp);
        if emitted {
            let record = TelemetryRecord::from_state(timestamp, &state);
            self.sink.emit(&record).map_err(PipelineError::Sink)?;
        }

        Ok(CycleOutcome { timestamp, state, emitted })
    }

    /// Run until a collaborator fails
    ///
    /// Never returns `Ok`; on the device the loop ends at power-off.
    pub fn run(&mut self) -> Result<core::convert::Infallible, PipelineError<A::Error, K::Error>> {
        loop {
            self.step()?;
        }
    }

    /// Cycles completed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Pipeline state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Telemetry gate
    pub fn gate(&self) -> &LogGate {
        &self.gate
    }

    /// Telemetry sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (A, K, C) {
        (self.sampler, self.sink, self.clock)
    }
}
