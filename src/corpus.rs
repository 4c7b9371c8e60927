//! Corpus discovery and the shared document traversal.
//!
//! Every stage goes through `visit_document`: load one JSON document, hand
//! each `x-specs` scenario to the stage transforms, and write the tree back
//! only when something changed.
use crate::config::RootConfig;
use crate::scenario::{Scenario, SPECS_KEY};
use crate::stages::{EditCount, ScenarioTransform};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A discovered document with the path string reports and rules see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    pub path: PathBuf,
    pub display: String,
}

/// Collect documents under every root, sorted by path and de-duplicated.
pub fn discover(corpus_root: &Path, roots: &[RootConfig]) -> Result<Vec<DocumentPath>> {
    let mut seen = BTreeSet::new();
    for root in roots {
        let dir = corpus_root.join(&root.path);
        if !dir.exists() {
            continue;
        }
        let entries = fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))?;
        let mut found = Vec::new();
        walk_entries(entries, &mut found);
        seen.extend(found.into_iter().filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&root.suffix))
        }));
    }
    Ok(seen
        .into_iter()
        .map(|path| DocumentPath {
            display: corpus_relative(&path, corpus_root),
            path,
        })
        .collect())
}

/// Walk below a root without following directory symlinks. A symlink to a
/// file is listed; a symlink to a directory is not entered.
fn walk_entries(entries: fs::ReadDir, found: &mut Vec<PathBuf>) {
    for entry in entries {
        let (path, file_type) = match entry.and_then(|e| Ok((e.path(), e.file_type()?))) {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if file_type.is_dir() {
            match fs::read_dir(&path) {
                Ok(nested) => walk_entries(nested, found),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                }
            }
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            found.push(path);
        }
    }
}

fn corpus_relative(path: &Path, corpus_root: &Path) -> String {
    path.strip_prefix(corpus_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Result of running transforms over one document. `edits[i]` belongs to
/// `transforms[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentVisit {
    pub edits: Vec<EditCount>,
    pub written: bool,
}

impl DocumentVisit {
    pub fn changes(&self) -> usize {
        self.edits.iter().map(|edit| edit.changes).sum()
    }
}

/// Run `transforms` in order over every scenario of `doc`, writing the tree
/// back when at least one change was made and `write` is set. Documents
/// without an `x-specs` array come back with zero edits.
pub fn visit_document(
    doc: &DocumentPath,
    transforms: &[&dyn ScenarioTransform],
    write: bool,
) -> Result<DocumentVisit> {
    let mut tree = load_document(&doc.path)?;
    let edits = transform_tree(&mut tree, &doc.display, transforms)?;
    let mut visit = DocumentVisit {
        edits,
        written: false,
    };
    if visit.changes() == 0 {
        tracing::debug!(path = %doc.display, "no changes");
        return Ok(visit);
    }
    if write {
        write_document(&doc.path, &tree)?;
        visit.written = true;
        tracing::info!(path = %doc.display, changes = visit.changes(), "wrote document");
    }
    Ok(visit)
}

pub fn transform_tree(
    tree: &mut Value,
    doc_path: &str,
    transforms: &[&dyn ScenarioTransform],
) -> Result<Vec<EditCount>> {
    let mut edits = vec![EditCount::default(); transforms.len()];
    let Some(specs) = tree.get_mut(SPECS_KEY).and_then(Value::as_array_mut) else {
        return Ok(edits);
    };
    for (transform, edit) in transforms.iter().zip(edits.iter_mut()) {
        for fields in specs.iter_mut().filter_map(Value::as_object_mut) {
            let mut scenario = Scenario::new(fields);
            *edit += transform.apply(&mut scenario, doc_path)?;
        }
    }
    Ok(edits)
}

pub fn load_document(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

/// Pretty-print with two-space indentation and a single trailing newline.
///
/// The text goes to a temp file next to the file `path` resolves to, which
/// then replaces it. A symlinked document stays a symlink and the file keeps
/// its permissions.
pub fn write_document(path: &Path, tree: &Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(tree)
        .with_context(|| format!("serialize {}", path.display()))?;
    text.push('\n');
    let target = fs::canonicalize(path).with_context(|| format!("resolve {}", path.display()))?;
    let permissions = fs::metadata(&target)
        .with_context(|| format!("stat {}", target.display()))?
        .permissions();
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("document path has no file name: {}", target.display()))?;
    let tmp_path = target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, text.as_bytes())
        .with_context(|| format!("write {}", tmp_path.display()))?;
    let published =
        fs::set_permissions(&tmp_path, permissions).and_then(|()| fs::rename(&tmp_path, &target));
    if let Err(err) = published {
        fs::remove_file(&tmp_path).ok();
        return Err(err).with_context(|| format!("publish {}", path.display()));
    }
    Ok(())
}
