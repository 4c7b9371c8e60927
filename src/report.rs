//! Run reports for stage commands.
//!
//! Counters are accumulated here from traversal results rather than kept as
//! process state. The same report renders as text for terminals or as JSON
//! with `--json`.
use crate::corpus::DocumentVisit;
use crate::stages::{EditCount, Stage};
use serde::Serialize;

/// Current schema version for `--json` run reports.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

fn is_zero(value: &usize) -> bool {
    *value == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentChange {
    pub path: String,
    pub changes: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub fallbacks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub documents_updated: usize,
    pub changes: usize,
    pub fallbacks: usize,
    pub documents: Vec<DocumentChange>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            documents_updated: 0,
            changes: 0,
            fallbacks: 0,
            documents: Vec::new(),
        }
    }

    fn record(&mut self, path: &str, edit: EditCount) {
        if edit.changes == 0 {
            return;
        }
        self.documents_updated += 1;
        self.changes += edit.changes;
        self.fallbacks += edit.fallbacks;
        self.documents.push(DocumentChange {
            path: path.to_string(),
            changes: edit.changes,
            fallbacks: edit.fallbacks,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDocument {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub dry_run: bool,
    pub documents_scanned: usize,
    pub documents_written: usize,
    pub stages: Vec<StageReport>,
    pub failed: Vec<FailedDocument>,
}

impl RunReport {
    pub fn new(stages: &[Stage], dry_run: bool) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            dry_run,
            documents_scanned: 0,
            documents_written: 0,
            stages: stages.iter().copied().map(StageReport::new).collect(),
            failed: Vec::new(),
        }
    }

    pub fn record_visit(&mut self, path: &str, visit: &DocumentVisit) {
        self.documents_scanned += 1;
        if visit.written {
            self.documents_written += 1;
        }
        for (stage, edit) in self.stages.iter_mut().zip(&visit.edits) {
            stage.record(path, *edit);
        }
    }

    pub fn record_failure(&mut self, path: &str, err: &anyhow::Error) {
        self.documents_scanned += 1;
        self.failed.push(FailedDocument {
            path: path.to_string(),
            error: format!("{err:#}"),
        });
    }

    pub fn total_changes(&self) -> usize {
        self.stages.iter().map(|stage| stage.changes).sum()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for stage in &self.stages {
            render_stage(&mut out, stage, self.dry_run);
        }
        if self.stages.len() > 1 {
            out.push_str(&format!(
                "\nPipeline: {} documents scanned, {} total changes\n",
                self.documents_scanned,
                self.total_changes()
            ));
        }
        if !self.failed.is_empty() {
            out.push_str(&format!(
                "Documents that failed to load: {}\n",
                self.failed.len()
            ));
        }
        if self.dry_run {
            out.push_str("Dry run: no files were written.\n");
        }
        out
    }
}

fn render_stage(out: &mut String, stage: &StageReport, dry_run: bool) {
    out.push_str(&format!("=== {} ===\n\n", stage.stage.title()));
    for doc in &stage.documents {
        let mut line = format!(
            "  {} - {}",
            doc.path,
            stage.stage.describe_changes(doc.changes)
        );
        if doc.fallbacks > 0 {
            line.push_str(&format!(" ({} generic)", doc.fallbacks));
        }
        out.push_str(&line);
        out.push('\n');
    }
    let verb = if dry_run {
        "Files that would be updated"
    } else {
        "Files updated"
    };
    out.push_str(&format!("\n{} complete\n", stage.stage.as_str()));
    out.push_str(&format!("   {verb}: {}\n", stage.documents_updated));
    out.push_str(&format!(
        "   {}\n",
        stage.stage.describe_changes(stage.changes)
    ));
    if stage.stage == Stage::Classify {
        out.push_str(&format!(
            "   Fallback messages needing review: {}\n",
            stage.fallbacks
        ));
    }
}
