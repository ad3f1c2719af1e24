//! Error kinds surfaced to callers of the lexer/parser engines.
//!
//! No engine in this crate panics on malformed input; every fallible
//! operation returns a [`BuildError`]. `thiserror` derives `Display` for
//! the eight kinds below so each can carry its own payload without
//! hand-writing eight `Display` impls.

use std::fmt;

use crate::symbol::Symbol;

/// The kind of LR table conflict found while building `ACTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "shift-reduce"),
            ConflictKind::ReduceReduce => write!(f, "reduce-reduce"),
        }
    }
}

/// One conflicting `(state, symbol)` cell, reported with enough detail to
/// pinpoint the offending state and symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state_id: usize,
    pub symbol: Symbol,
    pub kind: ConflictKind,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state {} on '{}': {} conflict",
            self.state_id, self.symbol, self.kind
        )
    }
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(Conflict::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every error kind an engine in this crate can surface.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Malformed lexical spec: missing `=`, empty name/rhs, no compiled rules.
    #[error("spec syntax error: {0}")]
    SpecSyntax(String),

    /// Unbalanced parentheses, operator without an operand, empty regex.
    #[error("regex syntax error: {0}")]
    RegexSyntax(String),

    /// lhs not a declared nonterminal, ill-formed production line.
    #[error("grammar syntax error: {0}")]
    GrammarSyntax(String),

    /// SLR(1) table construction found a reduce-reduce conflict.
    /// Shift-reduce conflicts are resolved by preferring shift instead of
    /// failing the build; see `ParseTable::shift_reduce_conflicts`.
    #[error("grammar is not SLR(1): {}", format_conflicts(.0))]
    GrammarNotSlr1(Vec<Conflict>),

    /// LR(1) table construction found a conflict.
    #[error("grammar is not LR(1): {}", format_conflicts(.0))]
    GrammarNotLr1(Vec<Conflict>),

    /// Empty spec or empty grammar when a build was requested.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Failure to read/write an exported table or tree file.
    #[error("table I/O error: {0}")]
    TableIO(String),

    /// The parse driver encountered an empty ACTION cell.
    #[error("parse failure at position {pointer}: {message}")]
    ParseFailure { pointer: usize, message: String },
}

impl BuildError {
    pub fn conflicts(&self) -> Option<&[Conflict]> {
        match self {
            BuildError::GrammarNotSlr1(c) | BuildError::GrammarNotLr1(c) => Some(c),
            _ => None,
        }
    }
}
