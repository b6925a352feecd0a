//! Domain-level errors (no external dependencies)

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What the tokenizer expected when a mandatory match failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    MissingNodeName,
    MissingPairKey,
    MissingPairValue,
}

impl SyntaxErrorKind {
    pub fn expected(&self) -> &'static str {
        match self {
            SyntaxErrorKind::MissingNodeName => "node name",
            SyntaxErrorKind::MissingPairKey => "pair key",
            SyntaxErrorKind::MissingPairValue => "pair value",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}", self.expected())
    }
}

/// A failed mandatory token match. Aborts the whole parse.
///
/// `line_number` and `column` are 1-based; `column` counts characters and
/// points at the first character the tokenizer could not consume.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line_number}, column {column}: {line:?}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: String,
    pub line_number: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Build an error for `remainder`, which must be a suffix of `line`.
    pub(crate) fn at(kind: SyntaxErrorKind, line: &str, line_number: usize, remainder: &str) -> Self {
        let consumed = &line[..line.len() - remainder.len()];
        Self {
            kind,
            line: line.to_string(),
            line_number,
            column: consumed.chars().count() + 1,
        }
    }
}

/// Domain errors represent catalog rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("syntax error in {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("manifest directory not found: {0}")]
    ManifestDirNotFound(PathBuf),

    #[error("unexpected manifest category '{category}': {path}")]
    UnexpectedCategory { path: PathBuf, category: String },

    #[error("invalid hex digest '{digest}': {reason}")]
    InvalidDigest { digest: String, reason: String },

    #[error("invalid memory size '{value}' in game '{game}'")]
    InvalidSize { game: String, value: String },
}
