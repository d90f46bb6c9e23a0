//! Host-side analysis of armrest telemetry
//!
//! ## Overview
//!
//! The platform streams one CSV record every 50 ms. An acquisition session
//! records a fixed protocol of tasks per subject, one file per repetition.
//! This crate turns those files into numbers:
//!
//! ```text
//! {subject}_{task}_rep{n}.csv ─▶ Trial ─▶ TrialFeatures ─▶ SubjectTaskProfile
//!                                   └───▶ SwaySummary (ellipse, mean path)
//! ```
//!
//! - [`protocol`]: tasks, repetitions, trial file names
//! - [`trial`]: tolerant loading of recorded telemetry
//! - [`features`]: per-trial CoP and force features
//! - [`sway`]: 95 % confidence ellipse, mean force and CoP traces
//! - [`summary`]: mean-level profiles per subject and task
//! - [`dataset`]: a directory of trials
//!
//! ## Example
//!
//! ```rust,no_run
//! use armrest_analysis::{aggregate_by_subject_task, Dataset};
//!
//! let dataset = Dataset::load("data/raw")?;
//! for profile in aggregate_by_subject_task(&dataset.features()) {
//!     println!("{} {}: peak {:.1} N", profile.subject, profile.task, profile.features.peak_force);
//! }
//! # Ok::<(), armrest_analysis::AnalysisError>(())
//! ```
//!
//! Classification and plotting are left to downstream tools; every result
//! type here serializes with serde.

#![deny(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod features;
pub mod protocol;
pub mod summary;
pub mod sway;
pub mod trial;

pub use dataset::Dataset;
pub use error::{AnalysisError, Result};
pub use features::TrialFeatures;
pub use protocol::{Protocol, Task, TrialId};
pub use summary::{aggregate_by_subject_task, SubjectTaskProfile};
pub use sway::{mean_trajectory, MeanSignals, SwayEllipse, SwaySummary};
pub use trial::Trial;
