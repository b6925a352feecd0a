//! Indentation stack for BML lines.
//!
//! Levels are exact whitespace prefixes, not column counts. Each line is
//! checked against the open prefixes from the innermost outward: a matching
//! prefix is stripped, a mismatch closes the innermost open level.

use tracing::trace;

use crate::domain::tokenizer::skip_blanks;

/// Outcome of resolving one line against the open levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Levels closed by this line, innermost first
    pub ascents: usize,
    /// Whether the line opened a new, deeper level
    pub opened: bool,
    /// Line content after all indentation
    pub remainder: &'a str,
}

#[derive(Debug, Default, Clone)]
pub struct IndentTracker {
    levels: Vec<String>,
}

impl IndentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Close levels the line no longer matches, then open one if whitespace remains.
    pub fn resolve<'a>(&mut self, line: &'a str) -> Resolution<'a> {
        let mut ascents = 0;
        let mut stripped = line;
        for i in (0..self.levels.len()).rev() {
            match stripped.strip_prefix(self.levels[i].as_str()) {
                Some(rest) => stripped = rest,
                None => {
                    // Always the innermost level, even after inner prefixes matched
                    self.levels.pop();
                    ascents += 1;
                }
            }
        }

        let remainder = skip_blanks(stripped);
        let opened = remainder.len() != stripped.len();
        if opened {
            let prefix = &stripped[..stripped.len() - remainder.len()];
            trace!(prefix = ?prefix, depth = self.levels.len() + 1, "open level");
            self.levels.push(prefix.to_string());
        }

        Resolution {
            ascents,
            opened,
            remainder,
        }
    }
}
