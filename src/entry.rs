//! Entry processing pipeline.
//!
//! Ties the seams together for one run: ask the external record producer for
//! an entry's status stream, fold it, fall back to the info collaborator when
//! the stream supplied no repository identity, apply the error policy, and
//! register the resulting properties with the sink.

use camino::Utf8Path;
use tracing::{debug, error, info, warn};

use revstamp_config::EntryConfig;
use revstamp_props::{PropertySink, register_summary};
use revstamp_status::{StatusAccumulator, StatusRecord, Summary};
use revstamp_utils::error::{RevstampError, SourceError};

/// The external status walk: produces the finite record stream for one
/// entry. All I/O against the working-copy store (and, when out-of-date
/// reporting is on, the remote repository) lives behind this trait.
pub trait RecordSource {
    /// Collect the status records for `entry`, honoring its depth and report
    /// options.
    ///
    /// # Errors
    ///
    /// [`SourceError::NotWorkingCopy`] / [`SourceError::PathNotFound`] mark
    /// the entry as not under version control; anything else is a hard
    /// producer failure.
    fn status(&self, entry: &EntryConfig) -> Result<Vec<StatusRecord>, SourceError>;
}

/// Repository identity as reported by the info collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Root URL of the repository.
    pub repository_root: String,
    /// Full URL of the inspected entry.
    pub url: String,
}

/// The external info/URL lookup, consulted only when the status stream did
/// not supply a repository identity for an existing versioned path.
pub trait InfoLookup {
    /// Look up the repository identity of a local path.
    ///
    /// # Errors
    ///
    /// Same contract as [`RecordSource::status`].
    fn info(&self, path: &Utf8Path) -> Result<RepositoryInfo, SourceError>;
}

/// Derive the repository-relative path from an entry URL: the repository
/// root prefix and one leading separator are stripped.
#[must_use]
pub fn repository_path_from_url(repository_root: &str, url: &str) -> String {
    url.strip_prefix(repository_root)
        .map(|path| path.strip_prefix('/').unwrap_or(path))
        .unwrap_or_default()
        .to_string()
}

/// One processed entry together with its summary.
#[derive(Debug, Clone)]
pub struct EntrySummary {
    pub entry: EntryConfig,
    pub summary: Summary,
}

/// Inspect one entry.
///
/// Degradable producer failures (the entry is simply not under version
/// control) resolve to [`Summary::unversioned`]. Other producer failures
/// propagate when `fail_on_error` is set and otherwise degrade to
/// [`Summary::empty`] after being logged.
///
/// # Errors
///
/// Returns the producer failure when `fail_on_error` is set.
pub fn process_entry(
    source: &dyn RecordSource,
    info: Option<&dyn InfoLookup>,
    entry: &EntryConfig,
    fail_on_error: bool,
) -> Result<Summary, RevstampError> {
    let records = match source.status(entry) {
        Ok(records) => records,
        Err(err) if err.is_degradable() => {
            debug!("{err}, reporting {} as unversioned", entry.path);
            return Ok(Summary::unversioned(entry));
        }
        Err(err) if fail_on_error => return Err(err.into()),
        Err(err) => {
            error!("{err}; continuing with an empty summary for {}", entry.path);
            return Ok(Summary::empty(entry));
        }
    };

    let mut accumulator = StatusAccumulator::new();
    for record in &records {
        debug!(
            path = record.path.as_deref().unwrap_or(""),
            local = %record.local_status,
            properties = %record.properties_status,
            revision = record.revision.unwrap_or(-1),
            committed = record.changed_revision.unwrap_or(-1),
            "status record"
        );
        accumulator.observe(record);
    }

    if !accumulator.has_repository_identity() {
        match info {
            Some(lookup) => match lookup.info(&entry.path) {
                Ok(identity) => {
                    let path =
                        repository_path_from_url(&identity.repository_root, &identity.url);
                    accumulator.set_repository(identity.repository_root, path);
                }
                Err(err) if err.is_degradable() => {
                    debug!("{err}, reporting {} as unversioned", entry.path);
                    return Ok(Summary::unversioned(entry));
                }
                Err(err) if fail_on_error => return Err(err.into()),
                Err(err) => {
                    error!("{err}; continuing with an empty summary for {}", entry.path);
                    return Ok(Summary::empty(entry));
                }
            },
            // no lookup collaborator and no observations at all: treat the
            // entry as unversioned
            None if records.is_empty() => return Ok(Summary::unversioned(entry)),
            None => {}
        }
    }

    Ok(accumulator.finish(entry))
}

/// Inspect every configured entry in order and register its properties.
///
/// # Errors
///
/// Stops at the first fatal producer failure when `fail_on_error` is set.
pub fn run_entries(
    source: &dyn RecordSource,
    info: Option<&dyn InfoLookup>,
    entries: &[EntryConfig],
    fail_on_error: bool,
    sink: &mut dyn PropertySink,
) -> Result<Vec<EntrySummary>, RevstampError> {
    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in entries {
        info!("inspecting {}", entry.path);
        let summary = process_entry(source, info, entry, fail_on_error)?;
        if !summary.unrecognized.is_empty() {
            let names: Vec<&str> = summary.unrecognized.iter().map(|k| k.as_str()).collect();
            warn!(
                "the following statuses of {} are not taken into account: {}",
                entry.path,
                names.join(", ")
            );
        }
        register_summary(sink, &entry.prefix, &summary);
        outcomes.push(EntrySummary {
            entry: entry.clone(),
            summary,
        });
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use revstamp_props::PropertyMap;
    use revstamp_status::StatusKind;

    struct FixedSource(Result<Vec<StatusRecord>, fn(&EntryConfig) -> SourceError>);

    impl RecordSource for FixedSource {
        fn status(&self, entry: &EntryConfig) -> Result<Vec<StatusRecord>, SourceError> {
            match &self.0 {
                Ok(records) => Ok(records.clone()),
                Err(make) => Err(make(entry)),
            }
        }
    }

    struct FixedInfo(RepositoryInfo);

    impl InfoLookup for FixedInfo {
        fn info(&self, _path: &Utf8Path) -> Result<RepositoryInfo, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn entry() -> EntryConfig {
        EntryConfig::new("/work/checkout", "app")
    }

    #[test]
    fn strips_root_and_one_separator() {
        assert_eq!(
            repository_path_from_url("https://svn.example.org/repo", "https://svn.example.org/repo/trunk/app"),
            "trunk/app"
        );
        assert_eq!(repository_path_from_url("https://svn.example.org/repo", "https://other.example.org/x"), "");
    }

    #[test]
    fn degradable_failure_reports_unversioned() {
        let source = FixedSource(Err(|entry| SourceError::NotWorkingCopy {
            path: entry.path.to_string(),
        }));
        let summary = process_entry(&source, None, &entry(), true).unwrap();
        assert_eq!(summary.status_code, "?");
        assert_eq!(summary.max_revision, -1);
    }

    #[test]
    fn fatal_failure_propagates_by_default() {
        let source = FixedSource(Err(|_| SourceError::Backend {
            reason: "connection refused".to_string(),
        }));
        let err = process_entry(&source, None, &entry(), true).unwrap_err();
        assert!(matches!(err, RevstampError::Source(_)));
    }

    #[test]
    fn fatal_failure_degrades_to_empty_when_keeping_going() {
        let source = FixedSource(Err(|_| SourceError::Backend {
            reason: "connection refused".to_string(),
        }));
        let summary = process_entry(&source, None, &entry(), false).unwrap();
        // distinct from the unversioned fallback: no status at all
        assert_eq!(summary.status_code, "");
        assert_eq!(summary.max_revision, -1);
    }

    #[test]
    fn empty_stream_without_lookup_is_unversioned() {
        let source = FixedSource(Ok(vec![]));
        let summary = process_entry(&source, None, &entry(), true).unwrap();
        assert_eq!(summary.status_code, "?");
    }

    #[test]
    fn silent_stream_uses_info_lookup() {
        let source = FixedSource(Ok(vec![]));
        let lookup = FixedInfo(RepositoryInfo {
            repository_root: "https://svn.example.org/repo".to_string(),
            url: "https://svn.example.org/repo/trunk/app".to_string(),
        });
        let summary = process_entry(&source, Some(&lookup), &entry(), true).unwrap();
        assert_eq!(summary.repository_root, "https://svn.example.org/repo");
        assert_eq!(summary.repository_path, "trunk/app");
        // versioned but status-silent: nothing to report
        assert_eq!(summary.status_code, "");
    }

    #[test]
    fn stream_identity_wins_over_lookup() {
        let source = FixedSource(Ok(vec![StatusRecord {
            local_status: StatusKind::Normal,
            revision: Some(7),
            repository_root: Some("https://svn.example.org/repo".to_string()),
            repository_relative_path: Some("trunk/app".to_string()),
            ..StatusRecord::default()
        }]));
        let lookup = FixedInfo(RepositoryInfo {
            repository_root: "https://svn.example.org/ignored".to_string(),
            url: "https://svn.example.org/ignored/x".to_string(),
        });
        let summary = process_entry(&source, Some(&lookup), &entry(), true).unwrap();
        assert_eq!(summary.repository_path, "trunk/app");
        assert_eq!(summary.max_revision, 7);
    }

    #[test]
    fn run_entries_registers_prefixed_properties() {
        let source = FixedSource(Ok(vec![StatusRecord {
            local_status: StatusKind::Modified,
            revision: Some(42),
            ..StatusRecord::default()
        }]));
        let mut sink = PropertyMap::new();
        let outcomes =
            run_entries(&source, None, &[entry()], true, &mut sink).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(sink.get("app.revision"), Some("42"));
        assert_eq!(sink.get("app.status"), Some("M"));
        assert_eq!(sink.len(), 8);
    }
}
