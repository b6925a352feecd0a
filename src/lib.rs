//! bmlgen: BML manifest parser and static preservation catalog generator
//!
//! Layers, innermost first:
//! - `domain`: BML parser, arena document, manifest entities
//! - `application`: URL hashing, HTML rendering, catalog and site services
//! - `infrastructure`: filesystem access and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{parse, parse_lines, Document, NodeRef, SyntaxError, SyntaxErrorKind};
