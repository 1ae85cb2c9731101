//! revstamp - working-copy revision and status stamping for build pipelines
//!
//! revstamp inspects version-controlled entries (files or directory trees)
//! and produces one compact, stable summary per entry: the revision range,
//! the last-committed revision and date, and a terse multi-character status
//! code in two encodings. Summaries are surfaced as named build properties
//! under a per-entry prefix.
//!
//! The status walk itself is an external collaborator: revstamp consumes its
//! record stream through the [`RecordSource`] seam and never talks to a
//! version-control backend directly. The same goes for the host build's
//! property registry, behind [`PropertySink`].
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Fold collected record streams into build properties
//! revstamp --config revstamp.toml --records records.json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use revstamp::{EntryConfig, StatusKind, StatusRecord, aggregate};
//!
//! let entry = EntryConfig::new(".", "myproject");
//! let records = vec![StatusRecord {
//!     local_status: StatusKind::Modified,
//!     revision: Some(42),
//!     ..StatusRecord::default()
//! }];
//! let summary = aggregate(&entry, &records);
//! assert_eq!(summary.max_revision, 42);
//! assert_eq!(summary.status_code, "M");
//! ```
//!
//! # Stable Public API
//!
//! - [`StatusKind`], [`StatusRecord`], [`Summary`], [`StatusAccumulator`],
//!   [`aggregate`] - the aggregation core
//! - [`SymbolTable`], [`render`] - status code rendering
//! - [`EntryConfig`], [`Depth`], [`RunConfig`] - configuration
//! - [`PropertySink`], [`PropertyMap`], [`register_summary`] - the output
//!   boundary
//! - [`RecordSource`], [`InfoLookup`], [`process_entry`], [`run_entries`] -
//!   the entry pipeline
//! - [`RevstampError`], [`ExitCode`] - errors and CLI exit codes

pub use revstamp_config::{Depth, EntryConfig, RunConfig};
pub use revstamp_props::{
    PROPERTY_KEYS, PropertyMap, PropertySink, format_committed_date, property_name,
    register_summary,
};
pub use revstamp_status::{
    RENDER_ORDER, RenderedStatus, StatusAccumulator, StatusKind, StatusRecord, Summary,
    SymbolTable, aggregate, render,
};
pub use revstamp_utils::error::{ConfigError, RevstampError, SourceError};
pub use revstamp_utils::exit_codes::ExitCode;
pub use revstamp_utils::logging::init_tracing;

pub mod cli;
pub mod entry;

pub use entry::{
    EntrySummary, InfoLookup, RecordSource, RepositoryInfo, process_entry,
    repository_path_from_url, run_entries,
};
