//! Directory of recorded trials
//!
//! Loads every `*.csv` in a directory whose name parses as a [`TrialId`].
//! Files with other names are ignored with a warning, like stray exports in
//! the acquisition folder.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::features::TrialFeatures;
use crate::protocol::{Task, TrialId};
use crate::sway::SwaySummary;
use crate::trial::Trial;

/// Trials of one acquisition campaign, ordered by identity
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    trials: BTreeMap<TrialId, Trial>,
}

impl Dataset {
    /// Load every trial file in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut dataset = Dataset::default();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let id = match TrialId::from_path(&path) {
                Ok(id) => id,
                Err(e @ (AnalysisError::InvalidFileName(_) | AnalysisError::UnknownTask(_))) => {
                    warn!("Ignoring {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            dataset.insert(id, Trial::open(&path)?);
        }

        info!("Loaded {} trials from {}", dataset.len(), dir.display());
        Ok(dataset)
    }

    /// Add or replace a trial
    pub fn insert(&mut self, id: TrialId, trial: Trial) {
        self.trials.insert(id, trial);
    }

    /// Number of trials
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// No trial loaded
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Trials in identity order
    pub fn trials(&self) -> impl Iterator<Item = (&TrialId, &Trial)> {
        self.trials.iter()
    }

    /// Features of every trial that has enough loaded records
    pub fn features(&self) -> Vec<(TrialId, TrialFeatures)> {
        self.trials
            .iter()
            .filter_map(|(id, trial)| match TrialFeatures::extract(trial, id.task) {
                Some(features) => Some((id.clone(), features)),
                None => {
                    warn!("{}: not enough loaded records, trial discarded", id);
                    None
                }
            })
            .collect()
    }

    /// Repetitions grouped by subject and task
    pub fn by_subject_task(&self) -> BTreeMap<(String, Task), Vec<&Trial>> {
        let mut groups: BTreeMap<(String, Task), Vec<&Trial>> = BTreeMap::new();
        for (id, trial) in &self.trials {
            groups.entry((id.subject.clone(), id.task)).or_default().push(trial);
        }
        groups
    }

    /// Sway summary per subject and task, skipping groups without usable data
    pub fn sway_summaries(&self) -> BTreeMap<(String, Task), SwaySummary> {
        self.by_subject_task()
            .into_iter()
            .filter_map(|(key, trials)| {
                match SwaySummary::from_trials(trials) {
                    Some(summary) => Some((key, summary)),
                    None => {
                        warn!("Skipping {}_{}: insufficient data", key.0, key.1);
                        None
                    }
                }
            })
            .collect()
    }
}
