//! Corpus configuration helpers.
//!
//! The config names the document roots to walk and the placeholder field the
//! annotator writes. It is optional: a corpus without `xspecs.json` uses the
//! defaults below.
use crate::scenario::FieldConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current schema version for `xspecs.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Config file looked up in the corpus directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "xspecs.json";

/// One directory walked recursively for documents ending in `suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    pub path: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    pub schema_version: u32,
    #[serde(default = "default_roots")]
    pub roots: Vec<RootConfig>,
    #[serde(default)]
    pub placeholder_field: FieldConfig,
}

fn default_roots() -> Vec<RootConfig> {
    vec![
        RootConfig {
            path: "specs/app/tables".to_string(),
            suffix: ".schema.json".to_string(),
        },
        RootConfig {
            path: "specs/api/paths/tables".to_string(),
            suffix: ".json".to_string(),
        },
    ]
}

pub fn default_config() -> CorpusConfig {
    CorpusConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        roots: default_roots(),
        placeholder_field: FieldConfig::default(),
    }
}

/// Load the config from `explicit`, or from `<corpus>/xspecs.json` when it
/// exists. An explicit path that cannot be read is an error.
pub fn load_config(corpus_root: &Path, explicit: Option<&Path>) -> Result<CorpusConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = corpus_root.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                return Ok(default_config());
            }
            candidate
        }
    };
    let config = read_config(&path)?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<CorpusConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: CorpusConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

pub fn validate_config(config: &CorpusConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported xspecs config schema_version {}",
            config.schema_version
        ));
    }
    if config.roots.is_empty() {
        return Err(anyhow!("config must list at least one root"));
    }
    for root in &config.roots {
        if root.path.trim().is_empty() {
            return Err(anyhow!("root path must not be empty"));
        }
        if root.suffix.trim().is_empty() {
            return Err(anyhow!("root {} has an empty suffix", root.path));
        }
    }
    if config.placeholder_field.name.trim().is_empty() {
        return Err(anyhow!("placeholder_field.name must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
