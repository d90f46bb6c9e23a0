//! Acquisition Protocol
//!
//! ## Session Layout
//!
//! Every subject runs the same fixed sequence of recorded trials:
//!
//! | Task         | Repetitions | Duration |
//! |--------------|-------------|----------|
//! | `sway`       | 1           | 30 s     |
//! | `lean_right` | 5           | 7 s      |
//! | `lean_left`  | 5           | 7 s      |
//! | `sts`        | 5           | 5 s      |
//! | `tap`        | 5           | 3 s      |
//!
//! Each trial is stored as `{subject}_{task}_rep{n}.csv` with the telemetry
//! header on the first line. [`TrialId`] renders and parses those names.
//!
//! ```rust
//! use armrest_analysis::{Task, TrialId};
//!
//! let id: TrialId = "S03_lean_right_rep2.csv".parse().unwrap();
//! assert_eq!(id.subject, "S03");
//! assert_eq!(id.task, Task::LeanRight);
//! assert_eq!(id.repetition, 2);
//! assert_eq!(id.file_name(), "S03_lean_right_rep2.csv");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Recorded task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Task {
    /// Resting stability, sit still
    #[serde(rename = "sway")]
    Sway,
    /// Slow lean to the right and back
    #[serde(rename = "lean_right")]
    LeanRight,
    /// Slow lean to the left and back
    #[serde(rename = "lean_left")]
    LeanLeft,
    /// Sit-to-stand
    #[serde(rename = "sts")]
    SitToStand,
    /// Sharp tap on the armrest
    #[serde(rename = "tap")]
    Tap,
}

impl Task {
    /// All tasks in protocol order
    pub const ALL: [Task; 5] = [
        Task::Sway,
        Task::LeanRight,
        Task::LeanLeft,
        Task::SitToStand,
        Task::Tap,
    ];

    /// Name used in file names
    pub fn name(self) -> &'static str {
        match self {
            Task::Sway => "sway",
            Task::LeanRight => "lean_right",
            Task::LeanLeft => "lean_left",
            Task::SitToStand => "sts",
            Task::Tap => "tap",
        }
    }

    /// What the operator reads to the subject
    pub fn instruction(self) -> &'static str {
        match self {
            Task::Sway => "Sit still and relaxed, as motionless as possible.",
            Task::LeanRight => "When I press Start, lean SLOWLY to the RIGHT, hold, and return to center.",
            Task::LeanLeft => "When I press Start, lean SLOWLY to the LEFT, hold, and return to center.",
            Task::SitToStand => "When I press Start, stand up naturally.",
            Task::Tap => "Rest your arm and, after I press Start, give a sharp tap on the armrest.",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Task::ALL
            .into_iter()
            .find(|task| task.name() == s)
            .ok_or_else(|| AnalysisError::UnknownTask(s.to_string()))
    }
}

/// One block of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolStep {
    /// Task recorded
    pub task: Task,
    /// Number of trials
    pub repetitions: u32,
    /// Recording length of each trial
    pub duration: Duration,
}

/// One planned trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTrial {
    /// Task recorded
    pub task: Task,
    /// 1-based repetition within the task
    pub repetition: u32,
    /// Recording length
    pub duration: Duration,
}

/// Ordered sequence of recorded tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    steps: Vec<ProtocolStep>,
}

impl Default for Protocol {
    fn default() -> Self {
        let step = |task, repetitions, secs| ProtocolStep {
            task,
            repetitions,
            duration: Duration::from_secs(secs),
        };
        Self {
            steps: vec![
                step(Task::Sway, 1, 30),
                step(Task::LeanRight, 5, 7),
                step(Task::LeanLeft, 5, 7),
                step(Task::SitToStand, 5, 5),
                step(Task::Tap, 5, 3),
            ],
        }
    }
}

impl Protocol {
    /// Protocol from explicit steps
    pub fn new(steps: Vec<ProtocolStep>) -> Self {
        Self { steps }
    }

    /// Steps in order
    pub fn steps(&self) -> &[ProtocolStep] {
        &self.steps
    }

    /// Every trial in recording order
    pub fn trials(&self) -> impl Iterator<Item = PlannedTrial> + '_ {
        self.steps.iter().flat_map(|step| {
            (1..=step.repetitions).map(move |repetition| PlannedTrial {
                task: step.task,
                repetition,
                duration: step.duration,
            })
        })
    }

    /// Total recording time, excluding pauses between trials
    pub fn recording_time(&self) -> Duration {
        self.steps.iter().map(|s| s.duration * s.repetitions).sum()
    }
}

/// Identity of a recorded trial
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrialId {
    /// Subject code
    pub subject: String,
    /// Task recorded
    pub task: Task,
    /// 1-based repetition
    pub repetition: u32,
}

impl TrialId {
    /// Create a trial identity
    pub fn new(subject: impl Into<String>, task: Task, repetition: u32) -> Self {
        Self { subject: subject.into(), task, repetition }
    }

    /// `{subject}_{task}_rep{n}.csv`
    pub fn file_name(&self) -> String {
        format!("{}_{}_rep{}.csv", self.subject, self.task, self.repetition)
    }

    /// Identity from the file name of a path
    pub fn from_path(path: &Path) -> Result<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AnalysisError::InvalidFileName(path.display().to_string()))?
            .parse()
    }
}

impl FromStr for TrialId {
    type Err = AnalysisError;

    /// Subject is the first `_` part, repetition the last, task everything
    /// in between
    fn from_str(name: &str) -> Result<Self> {
        let invalid = || AnalysisError::InvalidFileName(name.to_string());
        let stem = name.strip_suffix(".csv").unwrap_or(name);

        let (subject, rest) = stem.split_once('_').ok_or_else(invalid)?;
        let (task, rep) = rest.rsplit_once('_').ok_or_else(invalid)?;
        if subject.is_empty() {
            return Err(invalid());
        }
        let repetition = rep
            .strip_prefix("rep")
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;

        Ok(Self {
            subject: subject.to_string(),
            task: task.parse()?,
            repetition,
        })
    }
}

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} rep {}", self.subject, self.task, self.repetition)
    }
}
