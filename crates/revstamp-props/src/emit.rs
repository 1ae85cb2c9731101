use chrono::{DateTime, Utc};

use revstamp_status::Summary;

use crate::sink::PropertySink;

/// The per-entry property names, in emission order.
pub const PROPERTY_KEYS: [&str; 8] = [
    "repository",
    "path",
    "revision",
    "mixedRevisions",
    "committedRevision",
    "committedDate",
    "status",
    "specialStatus",
];

/// Build the full property name for an entry prefix and key.
#[must_use]
pub fn property_name(prefix: &str, key: &str) -> String {
    format!("{prefix}.{key}")
}

/// Format a committed date for property output, e.g.
/// `2012-03-01 14:30:05 +0000 (Thu, 01 Mar 2012)`. Absent dates become the
/// empty string.
#[must_use]
pub fn format_committed_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M:%S %z (%a, %d %b %Y)").to_string())
        .unwrap_or_default()
}

/// Register one entry's summary with the property sink, in the fixed key
/// order of [`PROPERTY_KEYS`].
pub fn register_summary(sink: &mut dyn PropertySink, prefix: &str, summary: &Summary) {
    let values = [
        summary.repository_root.clone(),
        summary.repository_path.clone(),
        summary.max_revision.to_string(),
        summary.mixed_revisions.to_string(),
        summary.max_committed_revision.to_string(),
        format_committed_date(summary.committed_date.as_ref()),
        summary.status_code.clone(),
        summary.special_status_code.clone(),
    ];
    for (key, value) in PROPERTY_KEYS.iter().zip(values) {
        sink.set_property(&property_name(prefix, key), value);
    }
}
