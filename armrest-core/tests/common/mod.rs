//! Common test utilities for the armrest integration tests
//!
//! - Scripted analog samplers (constant load, per-cycle script, failure)
//! - A recording telemetry sink
//! - Voltage fixtures derived from the default transfer polynomial

#![allow(dead_code)]

use std::collections::VecDeque;

use armrest_core::{
    traits::{AnalogSampler, Delay, TelemetrySink},
    Channel, ChannelSet, RestBaselines, TelemetryRecord, TransferFunction,
};

/// Rest voltages of a typical unit
pub const REST_VOLTS: ChannelSet<f32> = ChannelSet::new(1.40, 1.45, 1.38);

pub fn baselines() -> RestBaselines {
    RestBaselines::new(REST_VOLTS)
}

/// Voltage at which the default polynomial yields `raw` units
///
/// Lower root of `P1·v² + P2·v + (P3 − raw) = 0`; the other root lies above
/// the 3.3 V ADC range.
pub fn voltage_for_raw(raw: f32) -> f32 {
    let tf = TransferFunction::default();
    let (a, b, c) = (tf.p1 as f64, tf.p2 as f64, (tf.p3 - raw) as f64);
    let disc = (b * b - 4.0 * a * c).sqrt();
    ((-b + disc) / (2.0 * a)) as f32
}

/// Channel voltages that produce roughly `raw` units on the loaded channels
/// and rest on the others
pub fn loaded(left: f32, right: f32, vertex: f32) -> ChannelSet<f32> {
    let raws = ChannelSet::new(left, right, vertex);
    ChannelSet::from_fn(|channel| {
        if raws[channel] > 0.0 {
            voltage_for_raw(raws[channel])
        } else {
            REST_VOLTS[channel]
        }
    })
}

/// Sampler that replays one voltage triple per cycle, then holds the last
pub struct ScriptedSampler {
    script: VecDeque<ChannelSet<f32>>,
    current: ChannelSet<f32>,
    pending: Option<Channel>,
    pub reads: u32,
}

impl ScriptedSampler {
    /// Same voltages every cycle
    pub fn constant(volts: ChannelSet<f32>) -> Self {
        Self::script(vec![volts])
    }

    /// One entry per cycle; the final entry repeats forever
    pub fn script(cycles: Vec<ChannelSet<f32>>) -> Self {
        let mut script: VecDeque<_> = cycles.into();
        let current = script.pop_front().unwrap_or(REST_VOLTS);
        Self {
            script,
            current,
            pending: None,
            reads: 0,
        }
    }

    /// Append `count` cycles of `volts`
    pub fn then(mut self, volts: ChannelSet<f32>, count: usize) -> Self {
        self.script.extend(std::iter::repeat(volts).take(count));
        self
    }
}

impl AnalogSampler for ScriptedSampler {
    type Error = ();

    fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, ()> {
        // First attempt on the left channel of each cycle is still converting
        if channel == Channel::Left && self.pending.is_none() {
            self.pending = Some(channel);
            return Err(nb::Error::WouldBlock);
        }
        self.reads += 1;
        let value = self.current[channel];
        if channel == Channel::Vertex {
            self.pending = None;
            if let Some(next) = self.script.pop_front() {
                self.current = next;
            }
        }
        Ok(value)
    }
}

/// Sampler whose `channel` fails after `good_cycles` successful cycles
pub struct FailingSampler {
    pub channel: Channel,
    pub good_cycles: u32,
    cycles: u32,
}

impl FailingSampler {
    pub fn new(channel: Channel, good_cycles: u32) -> Self {
        Self { channel, good_cycles, cycles: 0 }
    }
}

impl AnalogSampler for FailingSampler {
    type Error = &'static str;

    fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, &'static str> {
        if channel == self.channel && self.cycles >= self.good_cycles {
            return Err(nb::Error::Other("adc timeout"));
        }
        if channel == Channel::Vertex {
            self.cycles += 1;
        }
        Ok(REST_VOLTS[channel])
    }
}

/// Sink that keeps everything it is given
#[derive(Default)]
pub struct RecordingSink {
    pub headers: Vec<String>,
    pub records: Vec<TelemetryRecord>,
}

impl TelemetrySink for RecordingSink {
    type Error = ();

    fn write_header(&mut self, header: &str) -> Result<(), ()> {
        self.headers.push(header.to_string());
        Ok(())
    }

    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), ()> {
        self.records.push(*record);
        Ok(())
    }
}

/// Sink that refuses every record
pub struct ClosedPort;

impl TelemetrySink for ClosedPort {
    type Error = &'static str;

    fn write_header(&mut self, _header: &str) -> Result<(), &'static str> {
        Ok(())
    }

    fn emit(&mut self, _record: &TelemetryRecord) -> Result<(), &'static str> {
        Err("port closed")
    }
}

/// Delay that only counts
#[derive(Default)]
pub struct NoDelay {
    pub total_ms: u64,
}

impl Delay for NoDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}
