//! Recorded trial loading
//!
//! A trial file is the raw serial stream of one recording: the telemetry
//! header, then one record per line. Lines garbled on the serial link
//! (partial reads, wrong field count, non-numeric fields) are skipped and
//! counted rather than failing the whole trial.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use armrest_core::{TelemetryRecord, TELEMETRY_HEADER};
use log::{debug, warn};

use crate::error::{AnalysisError, Result};

/// Records of one recording, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trial {
    records: Vec<TelemetryRecord>,
    skipped: usize,
}

impl Trial {
    /// Trial from already-decoded records
    pub fn from_records(records: Vec<TelemetryRecord>) -> Self {
        Self { records, skipped: 0 }
    }

    /// Read a telemetry stream, skipping the header and undecodable lines
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut trial = Trial::default();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line == TELEMETRY_HEADER {
                continue;
            }
            match line.parse::<TelemetryRecord>() {
                Ok(record) => trial.records.push(record),
                Err(error) => {
                    debug!("{}", AnalysisError::Record { line: index + 1, error });
                    trial.skipped += 1;
                }
            }
        }
        if trial.skipped > 0 {
            warn!("Skipped {} malformed telemetry lines", trial.skipped);
        }
        Ok(trial)
    }

    /// Read a trial file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading trial {}", path.display());
        Self::read(File::open(path)?)
    }

    /// Decoded records
    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    /// Lines that could not be decoded
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of decoded records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No record decoded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records the analysis uses: CoP defined and total force above
    /// `min_force_n`
    pub fn loaded(&self, min_force_n: f32) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.has_cop() && r.f_total > min_force_n)
    }
}
