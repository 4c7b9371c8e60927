//! Per-scenario transforms for the three corpus stages.
//!
//! The traversal in `corpus` owns I/O; a stage only decides what to change in
//! a single scenario and reports how many edits it made.
mod annotate;
mod classify;
mod reconcile;

use crate::config::CorpusConfig;
use crate::scenario::Scenario;
use anyhow::Result;
use serde::Serialize;
use std::ops::AddAssign;

pub use annotate::Annotator;
pub use classify::Classifier;
pub use reconcile::Reconciler;

/// Edits made by one stage. `fallbacks` counts classifier results that no
/// rule matched, so reviewers can find low-confidence messages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditCount {
    pub changes: usize,
    pub fallbacks: usize,
}

impl EditCount {
    pub fn changed(changes: usize) -> Self {
        Self {
            changes,
            fallbacks: 0,
        }
    }
}

impl AddAssign for EditCount {
    fn add_assign(&mut self, other: Self) {
        self.changes += other.changes;
        self.fallbacks += other.fallbacks;
    }
}

/// A stage's edit applied to one scenario of the document at `doc_path`.
pub trait ScenarioTransform {
    fn apply(&self, scenario: &mut Scenario<'_>, doc_path: &str) -> Result<EditCount>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Annotate,
    Classify,
    Reconcile,
}

impl Stage {
    /// Full pipeline order: placeholders first, then resolution, then the
    /// success/failure consistency pass.
    pub const PIPELINE: [Stage; 3] = [Stage::Annotate, Stage::Classify, Stage::Reconcile];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Annotate => "annotate",
            Stage::Classify => "classify",
            Stage::Reconcile => "reconcile",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Annotate => "ADDING VALIDATION BLOCKS TO x-specs",
            Stage::Classify => "FIXING expectError: null PLACEHOLDERS",
            Stage::Reconcile => "REMOVING INVALID expectError FROM SUCCESS ASSERTIONS",
        }
    }

    /// Past-tense description of `count` edits for the run report.
    pub fn describe_changes(self, count: usize) -> String {
        match self {
            Stage::Annotate => format!("Added {count} validation blocks"),
            Stage::Classify => format!("Fixed {count} placeholders"),
            Stage::Reconcile => format!("Removed {count} invalid expectError"),
        }
    }

    pub fn transform(self, config: &CorpusConfig) -> Box<dyn ScenarioTransform + '_> {
        match self {
            Stage::Annotate => Box::new(Annotator::new(&config.placeholder_field)),
            Stage::Classify => Box::new(Classifier),
            Stage::Reconcile => Box::new(Reconciler),
        }
    }
}
