//! Exponential moving average
//!
//! The only smoothing stage in the chain. Runs on every channel's voltage,
//! every cycle, before calibration:
//!
//! ```text
//! y[n] = α·x[n] + (1 − α)·y[n−1]
//! ```
//!
//! Its bandwidth is tied to the true sampling rate, which is why the loop
//! samples as fast as it can and only rate-limits telemetry.

/// Single-pole low-pass filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaFilter {
    /// Smoothing factor in (0, 1); lower is smoother
    alpha: f32,
    /// Current output
    value: f32,
}

impl EmaFilter {
    /// Create a filter already settled at `initial`
    ///
    /// Seeding with the channel's rest voltage avoids the ramp a zero start
    /// would push through calibration on the first cycles.
    pub const fn new(alpha: f32, initial: f32) -> Self {
        Self { alpha, value: initial }
    }

    /// Feed one sample and return the new output
    pub fn update(&mut self, sample: f32) -> f32 {
        // Incremental form of α·x + (1 − α)·y, chosen for its rounding: a
        // sample equal to the output leaves it bit-for-bit unchanged. The two
        // forms can differ in the last bits of an f32.
        self.value += self.alpha * (sample - self.value);
        self.value
    }

    /// Current output
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_moves_by_alpha() {
        let mut f = EmaFilter::new(0.15, 1.0);
        let y = f.update(2.0);
        assert!((y - 1.15).abs() < 1e-6);
        assert_eq!(f.value(), y);
    }

    #[test]
    fn fixed_point_at_initial_value() {
        let mut f = EmaFilter::new(0.15, 1.234);
        for _ in 0..10_000 {
            assert_eq!(f.update(1.234), 1.234);
        }
    }

    #[test]
    fn matches_weighted_sum_form() {
        let (alpha, prev) = (0.15f32, 1.4f32);
        for sample in [1.4f32, 1.61, 2.7, 3.3, 0.0] {
            let mut f = EmaFilter::new(alpha, prev);
            let weighted = alpha * sample + (1.0 - alpha) * prev;
            assert!((f.update(sample) - weighted).abs() <= 4.0 * f32::EPSILON);
        }
    }

    #[test]
    fn converges_to_step() {
        let mut f = EmaFilter::new(0.15, 1.0);
        for _ in 0..200 {
            f.update(2.5);
        }
        assert!((f.value() - 2.5).abs() < 1e-5);
    }
}
