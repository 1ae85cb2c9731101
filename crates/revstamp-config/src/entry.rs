//! Per-entry configuration.
//!
//! An entry is one inspected file-or-directory target with its own report
//! options and its own prefix for the output properties. The depth value is
//! informational: it constrains what the external status walk produces and is
//! handed through to it unchanged, never re-validated by the aggregation core.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use revstamp_utils::error::ConfigError;

/// Prefix used when no better one can be derived from the entry path.
pub const FALLBACK_PREFIX: &str = "revstamp";

/// Depth of items below the entry path whose status should be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Only the entry itself.
    Empty,
    /// The entry and its file children.
    Files,
    /// The entry and its immediate children.
    Immediates,
    /// The entry and everything below it.
    #[default]
    Infinity,
}

impl Depth {
    /// Canonical lowercase name, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Files => "files",
            Self::Immediates => "immediates",
            Self::Infinity => "infinity",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Depth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(Self::Empty),
            "files" => Ok(Self::Files),
            "immediates" => Ok(Self::Immediates),
            "infinity" => Ok(Self::Infinity),
            other => Err(ConfigError::InvalidValue {
                key: "depth".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for a single inspected entry.
///
/// # Example
///
/// ```rust
/// use revstamp_config::{Depth, EntryConfig};
///
/// let entry = EntryConfig::new("/work/checkout", "myproject");
/// assert_eq!(entry.prefix, "myproject");
/// assert_eq!(entry.depth, Depth::Infinity);
/// assert!(entry.report_unversioned);
/// assert!(!entry.report_ignored);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// The local path to inspect.
    pub path: Utf8PathBuf,

    /// The namespace prepended to every property name for this entry.
    pub prefix: String,

    /// Depth of the status walk below `path`.
    #[serde(default)]
    pub depth: Depth,

    /// Whether items not under version control surface in the status code.
    #[serde(default = "default_true")]
    pub report_unversioned: bool,

    /// Whether ignored items surface in the status code.
    #[serde(default)]
    pub report_ignored: bool,

    /// Whether the remote repository is checked and out-of-date items are
    /// reported with a trailing marker.
    #[serde(default)]
    pub report_out_of_date: bool,
}

fn default_true() -> bool {
    true
}

impl EntryConfig {
    /// Create an entry with default report options.
    pub fn new(path: impl Into<Utf8PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.into(),
            depth: Depth::default(),
            report_unversioned: true,
            report_ignored: false,
            report_out_of_date: false,
        }
    }

    /// The entry used when the run configures none: the current directory,
    /// with a prefix derived from it.
    #[must_use]
    pub fn default_entry() -> Self {
        let path = Utf8PathBuf::from(".");
        let prefix = default_prefix(&path);
        Self::new(path, prefix)
    }
}

/// Derive a property prefix from an entry path: its file name, falling back
/// to the current directory's name for `.`-like paths, then to
/// [`FALLBACK_PREFIX`].
#[must_use]
pub(crate) fn default_prefix(path: &camino::Utf8Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string();
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| {
            cwd.file_name()
                .and_then(|name| name.to_str().map(str::to_string))
        })
        .unwrap_or_else(|| FALLBACK_PREFIX.to_string())
}
