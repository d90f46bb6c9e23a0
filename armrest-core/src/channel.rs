//! Sensor Channels and Planar Geometry
//!
//! The platform has exactly three transducers. Rather than three loose fields
//! per quantity, every per-sensor value is stored in a [`ChannelSet`], a
//! fixed array indexed by [`Channel`]:
//!
//! ```rust
//! use armrest_core::{Channel, ChannelSet};
//!
//! let mut forces = ChannelSet::splat(0.0f32);
//! forces[Channel::Left] = 12.5;
//!
//! assert_eq!(forces.iter().sum::<f32>(), 12.5);
//! ```

use core::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of one transducer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Left sensor, the calibration reference
    Left,
    /// Right sensor
    Right,
    /// Vertex (top) sensor, towards the hand
    Vertex,
}

impl Channel {
    /// All channels in sampling and telemetry order
    pub const ALL: [Channel; 3] = [Channel::Left, Channel::Right, Channel::Vertex];

    /// Position of this channel inside a [`ChannelSet`]
    pub const fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
            Channel::Vertex => 2,
        }
    }

    /// Short name used in logs and telemetry columns
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
            Channel::Vertex => "vtc",
        }
    }
}

/// One value per channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSet<T> {
    values: [T; 3],
}

impl<T> ChannelSet<T> {
    /// Build from values in `Left, Right, Vertex` order
    pub const fn new(left: T, right: T, vertex: T) -> Self {
        Self { values: [left, right, vertex] }
    }

    /// Build by evaluating `f` once per channel, in channel order
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            values: [f(Channel::Left), f(Channel::Right), f(Channel::Vertex)],
        }
    }

    /// Apply `f` to every value
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ChannelSet<U> {
        ChannelSet { values: self.values.map(f) }
    }

    /// Iterate values in channel order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Iterate `(channel, value)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.values.iter())
    }

    /// Iterate values mutably in channel order
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }
}

impl<T: Copy> ChannelSet<T> {
    /// Same value on every channel
    pub const fn splat(value: T) -> Self {
        Self { values: [value; 3] }
    }
}

impl<T> Index<Channel> for ChannelSet<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.values[channel.index()]
    }
}

impl<T> IndexMut<Channel> for ChannelSet<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.values[channel.index()]
    }
}

/// Point on the platform plane (cm)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Medio-lateral coordinate
    pub x: f32,
    /// Antero-posterior coordinate
    pub y: f32,
}

impl Point {
    /// Create a point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }

    /// Unweighted centroid of the three sensor positions
    pub fn centroid(points: &ChannelSet<Point>) -> Point {
        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 3.0, sy / 3.0)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Point {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "({}, {})", self.x, self.y)
    }
}
