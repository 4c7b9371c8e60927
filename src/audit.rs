//! Read-only corpus audit.
//!
//! Counts what a full pipeline run should leave at zero (unannotated
//! scenarios, `null` placeholders, assertions that claim both success and
//! failure) plus fallback messages that still need a human look.
use crate::classifier::FALLBACK_MESSAGE;
use crate::corpus::{load_document, DocumentPath};
use crate::report::FailedDocument;
use crate::scenario::{
    expect_error_state, is_conflicting, ExpectError, Scenario, EXPECT_ERROR_KEY, SPECS_KEY,
};
use serde::Serialize;
use serde_json::Value;
use std::ops::AddAssign;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditCounts {
    pub scenarios: usize,
    pub unannotated: usize,
    pub undetermined: usize,
    pub conflicting: usize,
    pub fallback_messages: usize,
}

impl AuditCounts {
    pub fn has_violations(&self) -> bool {
        self.unannotated > 0 || self.undetermined > 0 || self.conflicting > 0
    }

    fn has_findings(&self) -> bool {
        self.has_violations() || self.fallback_messages > 0
    }
}

impl AddAssign for AuditCounts {
    fn add_assign(&mut self, other: Self) {
        self.scenarios += other.scenarios;
        self.unannotated += other.unannotated;
        self.undetermined += other.undetermined;
        self.conflicting += other.conflicting;
        self.fallback_messages += other.fallback_messages;
    }
}

pub fn audit_tree(mut tree: Value) -> AuditCounts {
    let mut counts = AuditCounts::default();
    let Some(specs) = tree.get_mut(SPECS_KEY).and_then(Value::as_array_mut) else {
        return counts;
    };
    for fields in specs.iter_mut().filter_map(Value::as_object_mut) {
        let scenario = Scenario::new(fields);
        counts.scenarios += 1;
        if !scenario.is_annotated() {
            counts.unannotated += 1;
            continue;
        }
        for assertion in scenario.assertions() {
            if expect_error_state(assertion) == ExpectError::Undetermined {
                counts.undetermined += 1;
            }
            if is_conflicting(assertion) {
                counts.conflicting += 1;
            }
            if assertion.get(EXPECT_ERROR_KEY).and_then(Value::as_str) == Some(FALLBACK_MESSAGE) {
                counts.fallback_messages += 1;
            }
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentAudit {
    pub path: String,
    #[serde(flatten)]
    pub counts: AuditCounts,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub documents_scanned: usize,
    pub totals: AuditCounts,
    /// Only documents with at least one finding.
    pub documents: Vec<DocumentAudit>,
    pub failed: Vec<FailedDocument>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        !self.totals.has_violations() && self.failed.is_empty()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("=== AUDITING x-specs ===\n\n");
        for doc in &self.documents {
            let counts = &doc.counts;
            out.push_str(&format!(
                "  {} - unannotated {}, undetermined {}, conflicting {}, fallback {}\n",
                doc.path,
                counts.unannotated,
                counts.undetermined,
                counts.conflicting,
                counts.fallback_messages
            ));
        }
        let totals = &self.totals;
        out.push_str(&format!(
            "\nDocuments scanned: {}\n   Scenarios: {}\n   Unannotated scenarios: {}\n   Undetermined placeholders: {}\n   Conflicting assertions: {}\n   Fallback messages needing review: {}\n",
            self.documents_scanned,
            totals.scenarios,
            totals.unannotated,
            totals.undetermined,
            totals.conflicting,
            totals.fallback_messages
        ));
        if !self.failed.is_empty() {
            out.push_str(&format!(
                "Documents that failed to load: {}\n",
                self.failed.len()
            ));
        }
        out
    }
}

/// Audit every document; load failures are recorded, not fatal.
pub fn audit_documents(documents: &[DocumentPath]) -> AuditReport {
    let mut report = AuditReport::default();
    for doc in documents {
        report.documents_scanned += 1;
        let tree = match load_document(&doc.path) {
            Ok(tree) => tree,
            Err(err) => {
                eprintln!("ERROR processing {}: {err:#}", doc.display);
                report.failed.push(FailedDocument {
                    path: doc.display.clone(),
                    error: format!("{err:#}"),
                });
                continue;
            }
        };
        let counts = audit_tree(tree);
        report.totals += counts;
        if counts.has_findings() {
            report.documents.push(DocumentAudit {
                path: doc.display.clone(),
                counts,
            });
        }
    }
    report
}
