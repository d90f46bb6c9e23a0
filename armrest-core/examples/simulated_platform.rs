//! Simulated Armrest Platform
//!
//! Runs the full chain on the host against a synthetic load profile and
//! prints telemetry to stdout in the same CSV format the firmware writes to
//! its serial port.
//!
//! ## Load Profile
//!
//! ```text
//!   0.0 s - 1.0 s   arm lifted (rest voltages)
//!   1.0 s - 2.5 s   arm leaning on the left sensor
//!   2.5 s - 4.0 s   arm centered on the platform (dead zone)
//!   4.0 s - 5.0 s   arm lifted again
//! ```
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example simulated_platform > trial.csv
//! ```

use core::convert::Infallible;

use armrest_core::{
    time::StdClock,
    traits::{AnalogSampler, StdDelay, TimeSource},
    telemetry::IoSink,
    AutoZero, Channel, ChannelSet, PlatformConfig, SampleLoop,
};

const RUN_MS: u64 = 5000;
const REST: ChannelSet<f32> = ChannelSet::new(1.40, 1.45, 1.38);
const LEAN_LEFT: ChannelSet<f32> = ChannelSet::new(2.70, 1.45, 1.38);
const CENTERED: ChannelSet<f32> = ChannelSet::new(2.70, 2.70, 2.70);

/// Profile-driven sampler with a little deterministic noise
struct SimulatedSensors {
    clock: StdClock,
    seed: u32,
}

impl SimulatedSensors {
    fn noise(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.seed >> 16) as f32 / 65_535.0 - 0.5) * 0.004
    }

    fn profile(&self) -> &'static ChannelSet<f32> {
        match self.clock.now() {
            t if t < 1000 => &REST,
            t if t < 2500 => &LEAN_LEFT,
            t if t < 4000 => &CENTERED,
            _ => &REST,
        }
    }
}

impl AnalogSampler for SimulatedSensors {
    type Error = Infallible;

    fn read_voltage(&mut self, channel: Channel) -> nb::Result<f32, Infallible> {
        let level = self.profile()[channel];
        Ok(level + self.noise())
    }
}

fn main() -> Result<(), String> {
    let config = PlatformConfig::default().with_zeroing(50, 2);
    let clock = StdClock::new();
    let mut sensors = SimulatedSensors { clock: clock.clone(), seed: 42 };

    let zero = AutoZero::from_config(&config).map_err(|e| e.to_string())?;
    eprintln!("Auto-zero ({} ms), platform unloaded...", zero.duration_ms());
    let baselines = zero
        .run(&mut sensors, &mut StdDelay)
        .map_err(|e| e.to_string())?;
    for channel in Channel::ALL {
        eprintln!("  {:>5}: {:.4} V", channel.name(), baselines.get(channel));
    }

    let stdout = std::io::stdout();
    let mut platform = SampleLoop::new(config, baselines, sensors, IoSink::new(stdout.lock()), &clock)
        .map_err(|e| e.to_string())?;
    platform.start().map_err(|e| e.to_string())?;

    let mut entries = 0;
    while clock.now() < RUN_MS {
        let outcome = platform.step().map_err(|e| e.to_string())?;
        if outcome.state.state_changed && outcome.state.in_dead_zone {
            entries += 1;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    eprintln!("{} cycles, {} dead-zone entries", platform.cycles(), entries);
    Ok(())
}
