//! Calibration Coefficients
//!
//! The force chain is a two-stage model fitted on the bench:
//!
//! ```text
//! volts ──(quadratic)──▶ raw units ──(× relative sensitivity)──▶ corrected ──(× scale)──▶ N
//! ```

// ===== TRANSFER FUNCTION =====

/// Quadratic coefficient of the voltage → raw-unit polynomial.
///
/// `raw = P1·v² + P2·v + P3`, fitted against absolute sensor voltage.
///
/// Source: least-squares fit over the bench loading sweep
pub const TRANSFER_P1: f32 = -2.139_716_83;

/// Linear coefficient of the voltage → raw-unit polynomial.
pub const TRANSFER_P2: f32 = 18.968_568_57;

/// Constant term of the voltage → raw-unit polynomial.
pub const TRANSFER_P3: f32 = -25.610_222_89;

// ===== RELATIVE SENSITIVITY =====

/// Left sensor sensitivity. Reference channel, so exactly 1.
pub const SENSITIVITY_LEFT: f32 = 1.0;

/// Right sensor sensitivity relative to the left one.
///
/// Source: same known load placed on each sensor, 23 vs 26 raw units
pub const SENSITIVITY_RIGHT: f32 = 23.0 / 26.0;

/// Vertex sensor sensitivity relative to the left one.
///
/// Source: same known load placed on each sensor, 23 vs 32.4 raw units
pub const SENSITIVITY_VERTEX: f32 = 23.0 / 32.4;

// ===== GLOBAL SCALE =====

/// Corrected raw units → Newtons.
///
/// A 3 kg mass at the platform center: `(3.0 × 9.81) / F_tot_raw_corrected`.
pub const SYSTEM_FORCE_SCALE: f32 = 5.91;

// ===== ADC =====

/// ADC full-scale voltage (V). ESP32 ADC1 with 11 dB attenuation.
pub const ADC_REFERENCE_V: f32 = 3.3;

/// Maximum 12-bit ADC reading.
pub const ADC_MAX_COUNTS: u16 = 4095;
