//! Telemetry Records
//!
//! ## Wire Format
//!
//! One CSV line per record, preceded once by a header:
//!
//! ```text
//! Timestamp,F_left,F_right,F_vtc,F_tot,is_rested,copStateChanged,CoP_X,CoP_Y
//! 1250,59.100,0.000,0.000,59.100,1,0,0.00,0.00
//! 1300,0.000,0.000,0.000,0.000,0,0,nan,nan
//! ```
//!
//! - timestamp: milliseconds since start
//! - forces: 3 decimal places
//! - flags: `1` / `0`
//! - CoP: 2 decimal places, `nan` while the arm is not rested
//!
//! Host tools parse the same format back with [`str::parse`]. A line parses
//! only if it has exactly 9 fields, which is also how the acquisition side
//! drops partial lines from a serial link.

use core::fmt::{self, Write as _};
use core::str::FromStr;

use heapless::String;

use crate::channel::Channel;
use crate::cop::PlatformState;
use crate::errors::TelemetryParseError;
use crate::time::Timestamp;

/// Column header, written once before any record
pub const TELEMETRY_HEADER: &str =
    "Timestamp,F_left,F_right,F_vtc,F_tot,is_rested,copStateChanged,CoP_X,CoP_Y";

/// Number of fields on a telemetry line
pub const TELEMETRY_FIELDS: usize = 9;

/// Capacity of a formatted line. Nine fields of realistic magnitude need
/// well under half of this.
pub const LINE_CAPACITY: usize = 128;

const COLUMNS: [&str; TELEMETRY_FIELDS] = [
    "Timestamp", "F_left", "F_right", "F_vtc", "F_tot",
    "is_rested", "copStateChanged", "CoP_X", "CoP_Y",
];

/// One telemetry row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    /// Milliseconds since start
    pub timestamp: Timestamp,
    /// Left force (N)
    pub f_left: f32,
    /// Right force (N)
    pub f_right: f32,
    /// Vertex force (N)
    pub f_vtc: f32,
    /// Total force (N)
    pub f_total: f32,
    /// Arm rested this cycle
    pub is_rested: bool,
    /// Dead-zone membership changed this cycle
    pub state_changed: bool,
    /// CoP x (cm), NaN when not rested
    pub cop_x: f32,
    /// CoP y (cm), NaN when not rested
    pub cop_y: f32,
}

impl TelemetryRecord {
    /// Record for a cycle's state at `timestamp`
    pub fn from_state(timestamp: Timestamp, state: &PlatformState) -> Self {
        let (cop_x, cop_y) = state.cop_xy();
        Self {
            timestamp,
            f_left: state.forces[Channel::Left],
            f_right: state.forces[Channel::Right],
            f_vtc: state.forces[Channel::Vertex],
            f_total: state.total_force,
            is_rested: state.is_rested,
            state_changed: state.state_changed,
            cop_x,
            cop_y,
        }
    }

    /// Both CoP coordinates are defined
    pub fn has_cop(&self) -> bool {
        !self.cop_x.is_nan() && !self.cop_y.is_nan()
    }

    /// Format into a fixed-capacity line, without allocating
    pub fn to_line(&self) -> Result<String<LINE_CAPACITY>, fmt::Error> {
        let mut line = String::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

/// Write `value` with `decimals` places, or `nan`
fn write_fixed(f: &mut fmt::Formatter<'_>, value: f32, decimals: usize) -> fmt::Result {
    if value.is_nan() {
        f.write_str("nan")
    } else {
        write!(f, "{:.*}", decimals, value)
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.timestamp)?;
        for force in [self.f_left, self.f_right, self.f_vtc, self.f_total] {
            write_fixed(f, force, 3)?;
            f.write_char(',')?;
        }
        write!(f, "{},{},", u8::from(self.is_rested), u8::from(self.state_changed))?;
        write_fixed(f, self.cop_x, 2)?;
        f.write_char(',')?;
        write_fixed(f, self.cop_y, 2)
    }
}

fn parse_number(field: &str, column: usize) -> Result<f32, TelemetryParseError> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("nan") {
        return Ok(f32::NAN);
    }
    field
        .parse()
        .map_err(|_| TelemetryParseError::InvalidNumber { field: COLUMNS[column] })
}

fn parse_flag(field: &str, column: usize) -> Result<bool, TelemetryParseError> {
    match field.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        _ => Err(TelemetryParseError::InvalidFlag { field: COLUMNS[column] }),
    }
}

impl FromStr for TelemetryRecord {
    type Err = TelemetryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields: [&str; TELEMETRY_FIELDS] = [""; TELEMETRY_FIELDS];
        let mut found = 0;
        for field in line.split(',') {
            if found < TELEMETRY_FIELDS {
                fields[found] = field;
            }
            found += 1;
        }
        if found != TELEMETRY_FIELDS {
            return Err(TelemetryParseError::FieldCount { found });
        }

        let timestamp = fields[0]
            .trim()
            .parse()
            .map_err(|_| TelemetryParseError::InvalidNumber { field: COLUMNS[0] })?;

        Ok(Self {
            timestamp,
            f_left: parse_number(fields[1], 1)?,
            f_right: parse_number(fields[2], 2)?,
            f_vtc: parse_number(fields[3], 3)?,
            f_total: parse_number(fields[4], 4)?,
            is_rested: parse_flag(fields[5], 5)?,
            state_changed: parse_flag(fields[6], 6)?,
            cop_x: parse_number(fields[7], 7)?,
            cop_y: parse_number(fields[8], 8)?,
        })
    }
}

/// Telemetry sink over any `std::io::Write` (serial port, file, stdout)
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> crate::traits::TelemetrySink for IoSink<W> {
    type Error = std::io::Error;

    fn write_header(&mut self, header: &str) -> Result<(), Self::Error> {
        writeln!(self.writer, "{}", header)
    }

    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        writeln!(self.writer, "{}", record)
    }
}
