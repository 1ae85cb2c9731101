//! Status code rendering.
//!
//! A summary's status-kind set is rendered into a short code by testing for
//! kinds in a fixed priority order and emitting one character per match. The
//! order lives in [`RENDER_ORDER`] rather than in the statement order of a
//! chain of set removals, so it is an explicit, testable constant; permuting
//! the input stream can never change the rendered code.

use std::collections::BTreeSet;

use revstamp_config::EntryConfig;

use crate::record::StatusKind;

/// The fixed priority order in which status kinds are rendered.
///
/// `None` and `Normal` never render and are not listed.
pub const RENDER_ORDER: [StatusKind; 11] = [
    StatusKind::Added,
    StatusKind::Conflicted,
    StatusKind::Deleted,
    StatusKind::Ignored,
    StatusKind::Modified,
    StatusKind::Replaced,
    StatusKind::External,
    StatusKind::Unversioned,
    StatusKind::Missing,
    StatusKind::Incomplete,
    StatusKind::Obstructed,
];

/// A symbol table mapping each renderable status kind to one character.
///
/// Two instances exist. [`SymbolTable::DEFAULT`] follows the common
/// single-letter working-copy status convention. [`SymbolTable::SPECIAL`]
/// overrides the four characters that are ambiguous or awkward to parse
/// (`?`, the shared `!`, `~`) with distinct lowercase letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTable {
    added: char,
    conflicted: char,
    deleted: char,
    ignored: char,
    modified: char,
    replaced: char,
    external: char,
    unversioned: char,
    missing: char,
    incomplete: char,
    obstructed: char,
    out_of_date: char,
}

impl SymbolTable {
    /// The conventional single-letter encoding.
    ///
    /// `Missing` and `Incomplete` share the `!` glyph. The collision is
    /// inherited behavior and kept; the special table disambiguates the two.
    pub const DEFAULT: SymbolTable = SymbolTable {
        added: 'A',
        conflicted: 'C',
        deleted: 'D',
        ignored: 'I',
        modified: 'M',
        replaced: 'R',
        external: 'X',
        unversioned: '?',
        missing: '!',
        incomplete: '!',
        obstructed: '~',
        out_of_date: '*',
    };

    /// The machine-friendly encoding: distinct lowercase letters for the
    /// kinds the default table renders ambiguously, default otherwise.
    pub const SPECIAL: SymbolTable = SymbolTable {
        added: 'A',
        conflicted: 'C',
        deleted: 'D',
        ignored: 'I',
        modified: 'M',
        replaced: 'R',
        external: 'X',
        unversioned: 'u',
        missing: 'm',
        incomplete: 'i',
        obstructed: 'o',
        out_of_date: 'd',
    };

    /// The character for a status kind, or `None` for the kinds that never
    /// render (`None`, `Normal`).
    #[must_use]
    pub const fn symbol(&self, kind: StatusKind) -> Option<char> {
        match kind {
            StatusKind::None | StatusKind::Normal => None,
            StatusKind::Added => Some(self.added),
            StatusKind::Conflicted => Some(self.conflicted),
            StatusKind::Deleted => Some(self.deleted),
            StatusKind::Ignored => Some(self.ignored),
            StatusKind::Modified => Some(self.modified),
            StatusKind::Replaced => Some(self.replaced),
            StatusKind::External => Some(self.external),
            StatusKind::Unversioned => Some(self.unversioned),
            StatusKind::Missing => Some(self.missing),
            StatusKind::Incomplete => Some(self.incomplete),
            StatusKind::Obstructed => Some(self.obstructed),
        }
    }

    /// The trailing marker appended when the entry is out of date.
    #[must_use]
    pub const fn out_of_date_symbol(&self) -> char {
        self.out_of_date
    }
}

/// A rendered status code plus the kinds the renderer did not handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedStatus {
    /// The status code, one character per observed kind, priority-ordered.
    pub code: String,
    /// Kinds observed in the stream but absent from [`RENDER_ORDER`].
    /// Reported to the caller instead of being silently dropped.
    pub unrecognized: Vec<StatusKind>,
}

/// Render a status-kind set into a code using the given symbol table.
///
/// Each kind in [`RENDER_ORDER`] is consumed from a working copy of the set
/// so no kind is emitted twice. `Ignored` and `Unversioned` are consumed but
/// only emitted when the entry's report options allow them. Whatever remains
/// after the ordered pass is returned as unrecognized.
#[must_use]
pub fn render(
    kinds: &BTreeSet<StatusKind>,
    out_of_date: bool,
    config: &EntryConfig,
    table: &SymbolTable,
) -> RenderedStatus {
    let mut remaining = kinds.clone();
    remaining.remove(&StatusKind::None);
    remaining.remove(&StatusKind::Normal);

    let mut code = String::new();
    for kind in RENDER_ORDER {
        if !remaining.remove(&kind) {
            continue;
        }
        match kind {
            StatusKind::Ignored if !config.report_ignored => continue,
            StatusKind::Unversioned if !config.report_unversioned => continue,
            _ => {}
        }
        if let Some(symbol) = table.symbol(kind) {
            code.push(symbol);
        }
    }

    let unrecognized: Vec<StatusKind> = remaining.into_iter().collect();

    if out_of_date && config.report_out_of_date {
        code.push(table.out_of_date_symbol());
    }

    RenderedStatus { code, unrecognized }
}
