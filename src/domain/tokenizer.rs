//! Anchored token extraction from a line remainder.
//!
//! Every pattern is anchored at the cursor and greedy; a successful match
//! returns the token and the unconsumed rest of the input.

use regex::Regex;

const NAME_PATTERN: &str = r"^[A-Za-z0-9.\-]+";
const KEY_PATTERN: &str = r"^([A-Za-z0-9.\-]+)=";
const VALUE_PATTERN: &str = r#"^(?:([^\s"]+)|"([^"]*)")"#;

/// Compiled token patterns for names, `key=` prefixes and values.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    name_regex: Regex,
    key_regex: Regex,
    value_regex: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            name_regex: Regex::new(NAME_PATTERN).unwrap(),
            key_regex: Regex::new(KEY_PATTERN).unwrap(),
            value_regex: Regex::new(VALUE_PATTERN).unwrap(),
        }
    }

    /// Match a node name.
    pub fn name<'a>(&self, input: &'a str) -> Option<(&'a str, &'a str)> {
        let m = self.name_regex.find(input)?;
        Some((m.as_str(), &input[m.end()..]))
    }

    /// Match a pair key; the trailing `=` is consumed but not returned.
    pub fn key<'a>(&self, input: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.key_regex.captures(input)?;
        let key = caps.get(1)?.as_str();
        let end = caps.get(0)?.end();
        Some((key, &input[end..]))
    }

    /// Match a bare word or a double-quoted string (quotes stripped, no escapes).
    pub fn value<'a>(&self, input: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.value_regex.captures(input)?;
        let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let end = caps.get(0)?.end();
        Some((value, &input[end..]))
    }
}

/// Strip leading spaces and tabs only.
pub fn skip_blanks(input: &str) -> &str {
    input.trim_start_matches([' ', '\t'])
}
