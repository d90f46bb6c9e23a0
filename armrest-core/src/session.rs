//! Per-run pipeline state
//!
//! A [`Session`] owns everything the chain mutates between cycles: the three
//! filter outputs and the dead-zone membership. Baselines and calibration
//! are fixed at construction. One session is created after auto-zero and
//! threaded through every cycle; there are no globals.
//!
//! ```text
//! raw volts ─▶ EMA ─▶ calibration ─▶ CoP / dead zone ─▶ PlatformState
//! ```

use crate::calibration::CalibrationModel;
use crate::channel::{Channel, ChannelSet};
use crate::config::PlatformConfig;
use crate::cop::{CopEngine, PlatformState};
use crate::errors::ConfigResult;
use crate::filter::EmaFilter;
use crate::zeroing::RestBaselines;

/// Pipeline state for one run of the platform
#[derive(Debug, Clone)]
pub struct Session {
    calibration: CalibrationModel,
    baselines: RestBaselines,
    filters: ChannelSet<EmaFilter>,
    engine: CopEngine,
}

impl Session {
    /// Session seeded with auto-zero baselines
    ///
    /// Each filter starts at its channel's baseline.
    pub fn new(config: &PlatformConfig, baselines: RestBaselines) -> ConfigResult<Self> {
        if let Err(e) = config.validate() {
            log_warn!("Rejecting platform configuration: {}", e);
            return Err(e);
        }

        Ok(Self {
            calibration: config.calibration,
            filters: ChannelSet::from_fn(|channel| EmaFilter::new(config.ema_alpha, baselines.get(channel))),
            baselines,
            engine: CopEngine::from_config(config),
        })
    }

    /// Run one cycle on raw voltages
    pub fn process(&mut self, raw: ChannelSet<f32>) -> PlatformState {
        let mut filtered = ChannelSet::splat(0.0f32);
        for channel in Channel::ALL {
            filtered[channel] = self.filters[channel].update(raw[channel]);
        }

        let forces = self.calibration.forces(&filtered, &self.baselines);
        self.engine.update(forces)
    }

    /// Current filter outputs (V)
    pub fn filtered(&self) -> ChannelSet<f32> {
        ChannelSet::from_fn(|channel| self.filters[channel].value())
    }

    /// Rest baselines this session was built with
    pub fn baselines(&self) -> &RestBaselines {
        &self.baselines
    }

    /// Dead-zone engine
    pub fn engine(&self) -> &CopEngine {
        &self.engine
    }
}
