//! BML tree builder.
//!
//! A single pass over physical lines driven by two pieces of state: `cur`, the
//! node new entries attach to, and `hang`, set while the most recently created
//! node has not yet received an indented block. A hanging node closes on the
//! next line at its own level, so equal-indent lines become siblings.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::Document;
use crate::domain::error::{SyntaxError, SyntaxErrorKind};
use crate::domain::indent::IndentTracker;
use crate::domain::tokenizer::{skip_blanks, Tokenizer};

/// Parse a whole manifest held in memory. Accepts LF and CRLF line endings.
pub fn parse(text: &str) -> Result<Document, SyntaxError> {
    parse_lines(text.lines())
}

/// Parse a sequence of physical lines with line terminators already removed.
#[instrument(level = "debug", skip_all)]
pub fn parse_lines<I, S>(lines: I) -> Result<Document, SyntaxError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new();
    for (number, line) in lines.into_iter().enumerate() {
        parser.feed(line.as_ref(), number + 1)?;
    }
    let doc = parser.finish();
    debug!(nodes = doc.len(), "parsed document");
    Ok(doc)
}

/// Line-at-a-time state machine behind [`parse`].
pub struct Parser {
    doc: Document,
    tokenizer: Tokenizer,
    indents: IndentTracker,
    cur: Index,
    hang: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        let doc = Document::new();
        let cur = doc.root_index();
        Self {
            doc,
            tokenizer: Tokenizer::new(),
            indents: IndentTracker::new(),
            cur,
            hang: false,
        }
    }

    fn ascend(&mut self) {
        self.cur = self.doc.parent_or_root(self.cur);
    }

    /// Consume one physical line. `line_number` is 1-based and only used for errors.
    pub fn feed(&mut self, line: &str, line_number: usize) -> Result<(), SyntaxError> {
        if line.trim_matches([' ', '\t', '\r', '\n']).is_empty() {
            return Ok(());
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let resolution = self.indents.resolve(line);
        for _ in 0..resolution.ascents {
            if self.hang {
                self.hang = false;
                self.ascend();
            }
            self.ascend();
        }
        if !resolution.opened && self.hang {
            self.ascend();
        }
        self.hang = false;

        let part = resolution.remainder;
        trace!(line_number, depth = self.indents.depth(), part, "line");

        if let Some(segment) = part.strip_prefix(':') {
            self.doc.append_block(self.cur, segment);
            return Ok(());
        }

        let (name, part) = self
            .tokenizer
            .name(part)
            .ok_or_else(|| SyntaxError::at(SyntaxErrorKind::MissingNodeName, line, line_number, part))?;
        self.cur = self.doc.append(self.cur, name, None);
        self.hang = true;

        if let Some(value) = part.strip_prefix(':') {
            self.doc.append_block(self.cur, value.trim_matches([' ', '\t']));
            return Ok(());
        }

        let mut part = skip_blanks(part);
        while !part.is_empty() {
            let (key, rest) = self
                .tokenizer
                .key(part)
                .ok_or_else(|| SyntaxError::at(SyntaxErrorKind::MissingPairKey, line, line_number, part))?;
            let (value, rest) = self
                .tokenizer
                .value(rest)
                .ok_or_else(|| SyntaxError::at(SyntaxErrorKind::MissingPairValue, line, line_number, rest))?;
            self.doc.append(self.cur, key, Some(value.to_string()));
            part = skip_blanks(rest);
        }
        Ok(())
    }

    /// Hand out the tree as built; nodes were attached when created.
    pub fn finish(self) -> Document {
        self.doc
    }
}
