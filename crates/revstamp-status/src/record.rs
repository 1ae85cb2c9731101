use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single path's local or remote state.
///
/// The enum is closed on purpose: the renderer indexes two static symbol
/// tables by variant, and the aggregation core treats any kind it cannot
/// render as a per-entry diagnostic instead of dropping it.
///
/// `None` and `Normal` carry no news and are always discarded before
/// rendering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// No status information is available for the path.
    #[default]
    None,
    /// The path is versioned and unchanged.
    Normal,
    /// The path is scheduled for addition.
    Added,
    /// The path is in a conflicted state.
    Conflicted,
    /// The path is scheduled for deletion.
    Deleted,
    /// The path is configured to be ignored.
    Ignored,
    /// The path's content has local modifications.
    Modified,
    /// The path was deleted and replaced in place.
    Replaced,
    /// The path is pulled in from an external definition.
    External,
    /// The path is not under version control.
    Unversioned,
    /// The path is versioned but missing from the working copy.
    Missing,
    /// The directory is versioned but its contents are incomplete.
    Incomplete,
    /// The path is obstructed by an item of a different kind.
    Obstructed,
}

impl StatusKind {
    /// Canonical lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Normal => "normal",
            Self::Added => "added",
            Self::Conflicted => "conflicted",
            Self::Deleted => "deleted",
            Self::Ignored => "ignored",
            Self::Modified => "modified",
            Self::Replaced => "replaced",
            Self::External => "external",
            Self::Unversioned => "unversioned",
            Self::Missing => "missing",
            Self::Incomplete => "incomplete",
            Self::Obstructed => "obstructed",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status observation for one visited path, as produced by the external
/// working-copy walk.
///
/// Revisions are non-negative when valid; absent or negative values mean "not
/// applicable". `repository_changed_revision` is only populated when the walk
/// was asked to contact the remote repository. The repository identity fields
/// are expected to be identical across all records of one stream and are
/// captured from the first record only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    /// The visited path, relative to the walk root. Only used for the
    /// per-record fold trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Local classification of the path itself.
    #[serde(default)]
    pub local_status: StatusKind,

    /// Classification of the path's properties. Meaningful only when
    /// `local_status` is [`StatusKind::Normal`].
    #[serde(default)]
    pub properties_status: StatusKind,

    /// The working revision of the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,

    /// The revision at which the path was last committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_revision: Option<i64>,

    /// The commit timestamp paired with `changed_revision`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_date: Option<DateTime<Utc>>,

    /// The latest revision known in the remote repository for this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_changed_revision: Option<i64>,

    /// Root URL of the remote repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_root: Option<String>,

    /// Path of this entry relative to the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_relative_path: Option<String>,
}
