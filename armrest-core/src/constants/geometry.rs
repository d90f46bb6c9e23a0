//! Platform Geometry
//!
//! Sensor centers measured on the armrest shell, in centimeters, with the
//! left sensor at the origin and x pointing towards the right sensor.
//!
//! ```text
//!            Vertex (3.5, 22.0)
//!               /\
//!              /  \
//!             /    \
//!            /  ·   \      · = geometric center (3.5, 7.33)
//!           /________\
//!  Left (0, 0)     Right (7, 0)
//! ```

/// Left sensor position (cm).
pub const POSITION_LEFT_CM: (f32, f32) = (0.0, 0.0);

/// Right sensor position (cm).
pub const POSITION_RIGHT_CM: (f32, f32) = (7.0, 0.0);

/// Vertex (top) sensor position (cm).
pub const POSITION_VERTEX_CM: (f32, f32) = (3.5, 22.0);

/// Dead-zone radius around the geometric center (cm).
///
/// Source: maximum CoP fluctuation observed under a stable resting arm
pub const DEAD_ZONE_RADIUS_CM: f32 = 2.0;

/// Total force above which the arm counts as rested (N).
///
/// Source: a multiple of the standard deviation of at-rest total-force noise
pub const MIN_REST_THRESHOLD_N: f32 = 3.5;
