//! The status fold.
//!
//! [`StatusAccumulator`] reduces a stream of [`StatusRecord`]s into the
//! per-entry [`Summary`]. Every record contributes independently (max/min
//! over revisions, set union over kinds, OR over staleness, larger-revision
//! wins for the committed pair), so the fold is a commutative monoid:
//! partial accumulators over disjoint sub-streams combined with
//! [`merge`](StatusAccumulator::merge) produce the same summary as one
//! in-order fold. The only order-sensitive detail is which record supplies
//! the committed date when two records tie on the winning committed
//! revision; in a real repository such records carry the same commit date.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use revstamp_config::EntryConfig;

use crate::record::{StatusKind, StatusRecord};
use crate::symbols::{SymbolTable, render};

/// The sentinel reported for a revision no record supplied.
pub const UNSET_REVISION: i64 = -1;

/// The committed revision and its timestamp. Replaced as one unit so the
/// date always belongs to the record that supplied the winning revision.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Committed {
    revision: i64,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
struct RepositoryIdentity {
    root: String,
    path: String,
}

/// Accumulating state of one entry's status fold.
#[derive(Debug, Clone, Default)]
pub struct StatusAccumulator {
    repository: Option<RepositoryIdentity>,
    max_revision: Option<i64>,
    min_revision: Option<i64>,
    committed: Option<Committed>,
    kinds: BTreeSet<StatusKind>,
    out_of_date: bool,
}

impl StatusAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the accumulator.
    pub fn observe(&mut self, record: &StatusRecord) {
        if self.repository.is_none() {
            self.repository = Some(RepositoryIdentity {
                root: record.repository_root.clone().unwrap_or_default(),
                path: record.repository_relative_path.clone().unwrap_or_default(),
            });
        }

        if let Some(revision) = record.revision.filter(|r| *r >= 0) {
            self.max_revision = Some(self.max_revision.map_or(revision, |m| m.max(revision)));
            // revision 0 is the repository-root placeholder and never
            // participates in the mixed-revisions range
            if revision > 0 {
                self.min_revision = Some(self.min_revision.map_or(revision, |m| m.min(revision)));
            }
        }

        if let Some(changed) = record.changed_revision.filter(|r| *r >= 0)
            && self.committed.is_none_or(|c| c.revision < changed)
        {
            self.committed = Some(Committed {
                revision: changed,
                date: record.changed_date,
            });
        }

        self.kinds.insert(record.local_status);
        if record.local_status == StatusKind::Normal {
            self.kinds.insert(record.properties_status);
        }

        if let Some(repository_changed) = record.repository_changed_revision
            && repository_changed > record.changed_revision.unwrap_or(UNSET_REVISION)
        {
            self.out_of_date = true;
        }
    }

    /// Combine two partial folds.
    ///
    /// The repository identity is left-biased: whichever side already
    /// captured one keeps it, matching the first-record-wins rule of the
    /// sequential fold.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        if self.repository.is_none() {
            self.repository = other.repository;
        }
        self.max_revision = merge_extremum(self.max_revision, other.max_revision, i64::max);
        self.min_revision = merge_extremum(self.min_revision, other.min_revision, i64::min);
        self.committed = match (self.committed, other.committed) {
            (Some(left), Some(right)) => {
                Some(if right.revision > left.revision { right } else { left })
            }
            (left, right) => left.or(right),
        };
        self.kinds.extend(other.kinds.iter().copied());
        self.out_of_date |= other.out_of_date;
        self
    }

    /// Whether any record (or the info fallback) supplied a repository path.
    #[must_use]
    pub fn has_repository_identity(&self) -> bool {
        self.repository
            .as_ref()
            .is_some_and(|identity| !identity.path.is_empty())
    }

    /// Install the repository identity obtained from the info collaborator
    /// when the walk itself stayed silent.
    pub fn set_repository(&mut self, root: String, path: String) {
        self.repository = Some(RepositoryIdentity { root, path });
    }

    /// Mark the entry as not under version control.
    pub fn force_unversioned(&mut self) {
        self.kinds.insert(StatusKind::Unversioned);
    }

    /// Finalize the fold into an immutable [`Summary`].
    #[must_use]
    pub fn finish(self, config: &EntryConfig) -> Summary {
        let mixed_revisions = matches!(
            (self.max_revision, self.min_revision),
            (Some(max), Some(min)) if max > 0 && min > 0 && max != min
        );

        let default = render(&self.kinds, self.out_of_date, config, &SymbolTable::DEFAULT);
        let special = render(&self.kinds, self.out_of_date, config, &SymbolTable::SPECIAL);
        debug_assert_eq!(default.unrecognized, special.unrecognized);

        let (repository_root, repository_path) = match self.repository {
            Some(identity) => (identity.root, identity.path),
            None => (String::new(), String::new()),
        };

        Summary {
            repository_root,
            repository_path,
            max_revision: self.max_revision.unwrap_or(UNSET_REVISION),
            mixed_revisions,
            max_committed_revision: self
                .committed
                .map_or(UNSET_REVISION, |c| c.revision),
            committed_date: self.committed.and_then(|c| c.date),
            out_of_date: self.out_of_date,
            status_code: default.code,
            special_status_code: special.code,
            unrecognized: default.unrecognized,
        }
    }
}

/// One entry's aggregated version-control state, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Root URL of the remote repository; empty for unversioned entries.
    pub repository_root: String,
    /// Entry path relative to the repository root; empty for unversioned
    /// entries.
    pub repository_path: String,
    /// Highest observed working revision, or -1 if none.
    pub max_revision: i64,
    /// Whether at least two distinct positive working revisions were seen.
    pub mixed_revisions: bool,
    /// Highest observed committed revision, or -1 if none.
    pub max_committed_revision: i64,
    /// The commit timestamp of the record supplying `max_committed_revision`.
    pub committed_date: Option<DateTime<Utc>>,
    /// Whether any path's committed revision is behind the remote repository.
    pub out_of_date: bool,
    /// Status code in the default encoding.
    pub status_code: String,
    /// Status code in the special encoding.
    pub special_status_code: String,
    /// Observed status kinds the renderer does not handle. Never fatal;
    /// surfaced to the caller once per entry.
    pub unrecognized: Vec<StatusKind>,
}

impl Summary {
    /// The fixed summary for an entry that is not under version control:
    /// status-kind set exactly `{unversioned}`, revisions at the sentinel,
    /// empty repository identity.
    #[must_use]
    pub fn unversioned(config: &EntryConfig) -> Self {
        let mut accumulator = StatusAccumulator::new();
        accumulator.force_unversioned();
        accumulator.finish(config)
    }

    /// The fully empty summary substituted when a fatal status failure is
    /// downgraded: no status kinds at all, hence empty status codes.
    #[must_use]
    pub fn empty(config: &EntryConfig) -> Self {
        StatusAccumulator::new().finish(config)
    }
}

/// Fold a complete record stream for one entry.
///
/// An empty stream means the entry produced no observations at all and
/// collapses to [`Summary::unversioned`].
#[must_use]
pub fn aggregate(config: &EntryConfig, records: &[StatusRecord]) -> Summary {
    if records.is_empty() {
        return Summary::unversioned(config);
    }
    let mut accumulator = StatusAccumulator::new();
    for record in records {
        accumulator.observe(record);
    }
    accumulator.finish(config)
}

fn merge_extremum(
    left: Option<i64>,
    right: Option<i64>,
    pick: fn(i64, i64) -> i64,
) -> Option<i64> {
    match (left, right) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> EntryConfig {
        EntryConfig::new(".", "test")
    }

    fn record(local: StatusKind, revision: i64) -> StatusRecord {
        StatusRecord {
            local_status: local,
            revision: Some(revision),
            ..StatusRecord::default()
        }
    }

    #[test]
    fn mixed_revisions_with_properties_modification() {
        // records: modified@5, normal@7 with modified properties
        let records = vec![
            record(StatusKind::Modified, 5),
            StatusRecord {
                local_status: StatusKind::Normal,
                properties_status: StatusKind::Modified,
                revision: Some(7),
                ..StatusRecord::default()
            },
        ];
        let summary = aggregate(&entry(), &records);
        assert_eq!(summary.max_revision, 7);
        assert!(summary.mixed_revisions);
        assert_eq!(summary.status_code, "M");
        assert_eq!(summary.special_status_code, "M");
    }

    #[test]
    fn properties_status_ignored_unless_local_is_normal() {
        let records = vec![StatusRecord {
            local_status: StatusKind::Modified,
            properties_status: StatusKind::Conflicted,
            revision: Some(3),
            ..StatusRecord::default()
        }];
        let summary = aggregate(&entry(), &records);
        // the conflicted properties status must not leak into the code
        assert_eq!(summary.status_code, "M");
    }

    #[test]
    fn empty_stream_collapses_to_unversioned() {
        let summary = aggregate(&entry(), &[]);
        assert_eq!(summary.max_revision, -1);
        assert_eq!(summary.max_committed_revision, -1);
        assert_eq!(summary.committed_date, None);
        assert_eq!(summary.repository_root, "");
        assert_eq!(summary.repository_path, "");
        assert_eq!(summary.status_code, "?");
        assert_eq!(summary.special_status_code, "u");
        assert!(!summary.mixed_revisions);
    }

    #[test]
    fn unversioned_marker_respects_report_flag() {
        let mut config = entry();
        config.report_unversioned = false;
        let summary = aggregate(&config, &[]);
        assert_eq!(summary.status_code, "");
        assert_eq!(summary.special_status_code, "");
    }

    #[test]
    fn empty_summary_has_no_status_at_all() {
        let summary = Summary::empty(&entry());
        assert_eq!(summary.status_code, "");
        assert_eq!(summary.max_revision, -1);
        assert_eq!(summary.repository_root, "");
    }

    #[test]
    fn out_of_date_is_sticky_and_rendered() {
        let mut config = entry();
        config.report_out_of_date = true;
        let records = vec![
            StatusRecord {
                local_status: StatusKind::Normal,
                properties_status: StatusKind::None,
                changed_revision: Some(8),
                repository_changed_revision: Some(10),
                ..StatusRecord::default()
            },
            // a later up-to-date record must not clear the flag
            StatusRecord {
                local_status: StatusKind::Normal,
                properties_status: StatusKind::None,
                changed_revision: Some(10),
                repository_changed_revision: Some(10),
                ..StatusRecord::default()
            },
        ];
        let summary = aggregate(&config, &records);
        assert!(summary.out_of_date);
        assert_eq!(summary.status_code, "*");
        assert_eq!(summary.special_status_code, "d");
    }

    #[test]
    fn out_of_date_with_absent_committed_revision() {
        let records = vec![StatusRecord {
            local_status: StatusKind::Normal,
            repository_changed_revision: Some(4),
            ..StatusRecord::default()
        }];
        let summary = aggregate(&entry(), &records);
        assert!(summary.out_of_date);
    }

    #[test]
    fn revision_zero_never_influences_mixed_revisions() {
        let records = vec![record(StatusKind::Normal, 0), record(StatusKind::Normal, 6)];
        let summary = aggregate(&entry(), &records);
        assert_eq!(summary.max_revision, 6);
        assert!(!summary.mixed_revisions);
    }

    #[test]
    fn single_revision_is_not_mixed() {
        let records = vec![record(StatusKind::Normal, 6), record(StatusKind::Normal, 6)];
        let summary = aggregate(&entry(), &records);
        assert!(!summary.mixed_revisions);
    }

    #[test]
    fn committed_pair_updates_atomically() {
        let early = Utc.with_ymd_and_hms(2011, 3, 5, 10, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2012, 3, 1, 14, 30, 5).unwrap();
        let records = vec![
            StatusRecord {
                local_status: StatusKind::Normal,
                changed_revision: Some(118),
                changed_date: Some(late),
                ..StatusRecord::default()
            },
            StatusRecord {
                local_status: StatusKind::Normal,
                changed_revision: Some(90),
                changed_date: Some(early),
                ..StatusRecord::default()
            },
        ];
        let summary = aggregate(&entry(), &records);
        assert_eq!(summary.max_committed_revision, 118);
        // the date stays with the record that supplied revision 118
        assert_eq!(summary.committed_date, Some(late));
    }

    #[test]
    fn repository_identity_captured_from_first_record() {
        let records = vec![
            StatusRecord {
                local_status: StatusKind::Normal,
                repository_root: Some("https://svn.example.org/repo".to_string()),
                repository_relative_path: Some("trunk/app".to_string()),
                ..StatusRecord::default()
            },
            StatusRecord {
                local_status: StatusKind::Normal,
                repository_root: Some("https://svn.example.org/other".to_string()),
                repository_relative_path: Some("branches/x".to_string()),
                ..StatusRecord::default()
            },
        ];
        let summary = aggregate(&entry(), &records);
        assert_eq!(summary.repository_root, "https://svn.example.org/repo");
        assert_eq!(summary.repository_path, "trunk/app");
    }

    #[test]
    fn negative_revisions_are_not_applicable() {
        let records = vec![record(StatusKind::Normal, -1), record(StatusKind::Normal, -5)];
        let summary = aggregate(&entry(), &records);
        assert_eq!(summary.max_revision, -1);
        assert!(!summary.mixed_revisions);
    }

    #[test]
    fn merge_agrees_with_sequential_fold() {
        let records = vec![
            record(StatusKind::Modified, 5),
            record(StatusKind::Added, 9),
            StatusRecord {
                local_status: StatusKind::Normal,
                changed_revision: Some(12),
                repository_changed_revision: Some(14),
                ..StatusRecord::default()
            },
            record(StatusKind::Deleted, 2),
        ];

        let mut sequential = StatusAccumulator::new();
        for r in &records {
            sequential.observe(r);
        }

        for split in 0..=records.len() {
            let (left, right) = records.split_at(split);
            let mut a = StatusAccumulator::new();
            for r in left {
                a.observe(r);
            }
            let mut b = StatusAccumulator::new();
            for r in right {
                b.observe(r);
            }
            let merged = a.merge(b).finish(&entry());
            assert_eq!(merged, sequential.clone().finish(&entry()));
        }
    }

    #[test]
    fn merge_keeps_committed_pair_with_larger_revision() {
        let date = Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap();
        let mut a = StatusAccumulator::new();
        a.observe(&StatusRecord {
            local_status: StatusKind::Normal,
            changed_revision: Some(3),
            ..StatusRecord::default()
        });
        let mut b = StatusAccumulator::new();
        b.observe(&StatusRecord {
            local_status: StatusKind::Normal,
            changed_revision: Some(7),
            changed_date: Some(date),
            ..StatusRecord::default()
        });
        let summary = a.merge(b).finish(&entry());
        assert_eq!(summary.max_committed_revision, 7);
        assert_eq!(summary.committed_date, Some(date));
    }
}
