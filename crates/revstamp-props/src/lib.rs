//! Build property emission for revstamp.
//!
//! The output boundary: a [`Summary`](revstamp_status::Summary) is surfaced
//! to the host build process as a fixed, ordered set of named properties
//! under a caller-supplied prefix.

mod emit;
mod sink;

pub use emit::{PROPERTY_KEYS, format_committed_date, property_name, register_summary};
pub use sink::{PropertyMap, PropertySink};
