//! Startup Auto-Zero
//!
//! ## Procedure
//!
//! Before the first cycle the platform must be unloaded. The calibrator then
//! reads all three channels `N` times, waiting a fixed delay after each round,
//! and takes the arithmetic mean per channel:
//!
//! ```text
//! round:   read L, read R, read V, wait 10 ms      (× 200 ≈ 2 s)
//! v_rest = Σ v / N                                  (per channel)
//! ```
//!
//! The means become the rest baselines: the clip level of the calibration
//! and the starting value of each channel's filter. They are never updated
//! afterwards.
//!
//! ## Caveat
//!
//! Nothing checks that the platform really was unloaded. An arm on the
//! armrest during zeroing raises the baselines and every later force reads
//! low, with no error raised.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelSet};
use crate::config::PlatformConfig;
use crate::constants::timing::{ZEROING_DELAY_MS, ZEROING_SAMPLES};
use crate::errors::{ConfigError, ConfigResult, SamplerError};
use crate::traits::{AnalogSampler, Delay};

/// Per-channel rest voltages (V)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestBaselines {
    volts: ChannelSet<f32>,
}

impl RestBaselines {
    /// Baselines from known voltages (replay, tests)
    pub const fn new(volts: ChannelSet<f32>) -> Self {
        Self { volts }
    }

    /// Baseline of one channel
    pub fn get(&self, channel: Channel) -> f32 {
        self.volts[channel]
    }

    /// All baselines
    pub fn volts(&self) -> &ChannelSet<f32> {
        &self.volts
    }
}

/// One-shot auto-zero procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoZero {
    /// Sampling rounds
    samples: u32,
    /// Wait after each round (ms)
    delay_ms: u32,
}

impl AutoZero {
    /// Procedure with an explicit sample count and delay
    ///
    /// At least one round is required, as in [`PlatformConfig::validate`].
    pub fn new(samples: u32, delay_ms: u32) -> ConfigResult<Self> {
        if samples == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        Ok(Self { samples, delay_ms })
    }

    /// Procedure as configured for the deployment
    pub fn from_config(config: &PlatformConfig) -> ConfigResult<Self> {
        Self::new(config.zeroing_samples, config.zeroing_delay_ms)
    }

    /// Sampling rounds
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Blocking time of the procedure, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.samples) * u64::from(self.delay_ms)
    }

    /// Run the procedure
    ///
    /// Blocks for about [`duration_ms`](Self::duration_ms). Fails on the
    /// first sampler error; partial sums are discarded.
    pub fn run<A, D>(&self, sampler: &mut A, delay: &mut D) -> Result<RestBaselines, SamplerError<A::Error>>
    where
        A: AnalogSampler + ?Sized,
        D: Delay + ?Sized,
    {
        log_info!(
            "Starting auto-zero ({} samples). Do not touch the platform",
            self.samples
        );

        let mut sums = ChannelSet::splat(0.0f32);
        for _ in 0..self.samples {
            for channel in Channel::ALL {
                sums[channel] += nb::block!(sampler.read_voltage(channel))
                    .map_err(|error| SamplerError { channel, error })?;
            }
            delay.delay_ms(self.delay_ms);
        }

        let count = self.samples as f32;
        let baselines = RestBaselines::new(sums.map(|sum| sum / count));

        log_info!(
            "Auto-zero complete. Rest voltages [V]: left={:.4}, right={:.4}, vtc={:.4}",
            baselines.get(Channel::Left),
            baselines.get(Channel::Right),
            baselines.get(Channel::Vertex)
        );

        Ok(baselines)
    }
}

impl Default for AutoZero {
    fn default() -> Self {
        Self {
            samples: ZEROING_SAMPLES,
            delay_ms: ZEROING_DELAY_MS,
        }
    }
}
