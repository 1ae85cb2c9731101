//! Run configuration file loading.
//!
//! A run configuration is a TOML document with run-wide switches and an
//! `[[entry]]` table per inspected target:
//!
//! ```toml
//! fail_on_error = true
//! verbose = false
//!
//! [[entry]]
//! path = "."
//! prefix = "myproject"
//! depth = "infinity"
//! report_unversioned = true
//! report_ignored = false
//! report_out_of_date = false
//! ```
//!
//! Every entry field is optional. A missing path defaults to the current
//! directory, a missing prefix is derived from the path, and an empty or
//! absent entry list collapses to one default entry.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use revstamp_utils::error::ConfigError;

use crate::entry::{Depth, EntryConfig, default_prefix};

/// One `[[entry]]` table as written in the file, before defaulting.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawEntry {
    path: Option<Utf8PathBuf>,
    prefix: Option<String>,
    depth: Option<String>,
    report_unversioned: Option<bool>,
    report_ignored: Option<bool>,
    report_out_of_date: Option<bool>,
}

/// A parsed run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Whether a fatal status-source failure stops the run. When false, the
    /// failure is logged and the entry degrades to an empty summary. Applies
    /// uniformly to every entry of the run.
    #[serde(default = "default_true")]
    pub fail_on_error: bool,

    /// Whether the per-record fold trace is emitted.
    #[serde(default)]
    pub verbose: bool,

    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

fn default_true() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_on_error: true,
            verbose: false,
            entries: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Load and parse a run configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist and
    /// [`ConfigError::InvalidFile`] if it is not valid TOML.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_string(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile(format!(
            "failed to read {path}: {e}"
        )))?;
        toml::from_str(&contents).map_err(|e| ConfigError::InvalidFile(e.to_string()))
    }

    /// Resolve the configured entries, applying the defaulting rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unrecognized depth string.
    pub fn resolve_entries(&self) -> Result<Vec<EntryConfig>, ConfigError> {
        if self.entries.is_empty() {
            return Ok(vec![EntryConfig::default_entry()]);
        }
        self.entries.iter().map(resolve_entry).collect()
    }
}

fn resolve_entry(raw: &RawEntry) -> Result<EntryConfig, ConfigError> {
    let path = raw.path.clone().unwrap_or_else(|| Utf8PathBuf::from("."));
    let prefix = match &raw.prefix {
        Some(prefix) => prefix.clone(),
        None => default_prefix(&path),
    };
    let depth = match &raw.depth {
        Some(depth) => depth.parse::<Depth>()?,
        None => Depth::default(),
    };
    Ok(EntryConfig {
        path,
        prefix,
        depth,
        report_unversioned: raw.report_unversioned.unwrap_or(true),
        report_ignored: raw.report_ignored.unwrap_or(false),
        report_out_of_date: raw.report_out_of_date.unwrap_or(false),
    })
}
