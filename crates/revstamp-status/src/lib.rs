//! Status aggregation engine for revstamp.
//!
//! This crate is the pure core of revstamp: it folds the per-path status
//! observations produced by an external working-copy walk into one
//! [`Summary`] per inspected entry, and renders the summary's status-kind set
//! into the two terse symbol encodings. It performs no I/O and holds no
//! locks; partial folds over disjoint sub-streams can be combined with
//! [`StatusAccumulator::merge`] without changing the result.

mod aggregate;
mod record;
mod symbols;

pub use aggregate::{StatusAccumulator, Summary, aggregate};
pub use record::{StatusKind, StatusRecord};
pub use symbols::{RENDER_ORDER, RenderedStatus, SymbolTable, render};
