//! Command runners for the corpus stages.
//!
//! Each command resolves the corpus and its config, walks the discovered
//! documents one at a time, and prints a report. Per-document failures are
//! reported and skipped; only corpus and config errors abort a command.
use crate::audit;
use crate::cli::{AuditArgs, StageArgs};
use crate::config::{self, CorpusConfig};
use crate::corpus::{self, DocumentPath};
use crate::report::RunReport;
use crate::stages::{ScenarioTransform, Stage};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A corpus directory with its config and discovered documents.
pub struct Corpus {
    pub root: PathBuf,
    pub config: CorpusConfig,
    pub documents: Vec<DocumentPath>,
}

impl Corpus {
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("resolve corpus directory {}", root.display()))?;
        let config = config::load_config(&root, config_path)?;
        let documents = corpus::discover(&root, &config.roots)?;
        tracing::info!(
            corpus = %root.display(),
            documents = documents.len(),
            "discovered documents"
        );
        Ok(Self {
            root,
            config,
            documents,
        })
    }
}

/// Run `stages` in order over every document, one document at a time.
pub fn process_corpus(corpus: &Corpus, stages: &[Stage], write: bool) -> RunReport {
    let boxed: Vec<_> = stages
        .iter()
        .map(|stage| stage.transform(&corpus.config))
        .collect();
    let transforms: Vec<&dyn ScenarioTransform> = boxed.iter().map(|t| t.as_ref()).collect();

    let mut report = RunReport::new(stages, !write);
    for doc in &corpus.documents {
        match corpus::visit_document(doc, &transforms, write) {
            Ok(visit) => report.record_visit(&doc.display, &visit),
            Err(err) => {
                eprintln!("ERROR processing {}: {err:#}", doc.display);
                report.record_failure(&doc.display, &err);
            }
        }
    }
    report
}

pub fn run_stages(stages: &[Stage], args: &StageArgs) -> Result<()> {
    let corpus = Corpus::open(&args.corpus, args.config.as_deref())?;
    let report = process_corpus(&corpus, stages, !args.dry_run);
    if args.json {
        print_json(&report)?;
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

/// Audit the corpus; fails when any invariant violation or load failure is
/// found so the command can gate CI.
pub fn run_audit(args: &AuditArgs) -> Result<()> {
    let corpus = Corpus::open(&args.corpus, args.config.as_deref())?;
    let report = audit::audit_documents(&corpus.documents);
    if args.json {
        print_json(&report)?;
    } else {
        print!("{}", report.render_text());
    }
    if !report.is_clean() {
        return Err(anyhow!(
            "audit found {} unannotated scenarios, {} undetermined placeholders, {} conflicting assertions, {} unreadable documents in {}",
            report.totals.unannotated,
            report.totals.undetermined,
            report.totals.conflicting,
            report.failed.len(),
            corpus.root.display()
        ));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}
