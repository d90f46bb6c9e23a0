//! Mean-level aggregation
//!
//! Repetitions of a task by the same subject are averaged feature by
//! feature, giving one profile per (subject, task) pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::TrialFeatures;
use crate::protocol::{Task, TrialId};

/// Averaged features of one subject on one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectTaskProfile {
    /// Subject code
    pub subject: String,
    /// Task
    pub task: Task,
    /// Repetitions averaged
    pub trials: usize,
    /// Mean of each feature over the repetitions
    pub features: TrialFeatures,
}

/// Average trial features per subject and task, ordered by subject then task
pub fn aggregate_by_subject_task<'a, I>(rows: I) -> Vec<SubjectTaskProfile>
where
    I: IntoIterator<Item = &'a (TrialId, TrialFeatures)>,
{
    let mut groups: BTreeMap<(&str, Task), (usize, [f64; 11])> = BTreeMap::new();
    for (id, features) in rows {
        let (count, sums) = groups
            .entry((id.subject.as_str(), id.task))
            .or_insert((0, [0.0; 11]));
        *count += 1;
        for (sum, value) in sums.iter_mut().zip(features.values()) {
            *sum += value;
        }
    }

    groups
        .into_iter()
        .map(|((subject, task), (count, sums))| SubjectTaskProfile {
            subject: subject.to_string(),
            task,
            trials: count,
            features: TrialFeatures::from_values(sums.map(|s| s / count as f64)),
        })
        .collect()
}
