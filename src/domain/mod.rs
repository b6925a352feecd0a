//! Domain layer: BML parsing and catalog entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod entities;
pub mod error;
pub mod indent;
pub mod parser;
pub mod tokenizer;

pub use arena::{Document, Node, NodeRef, ROOT_NAME};
pub use display::TreeNodeConvert;
pub use entities::*;
pub use error::{DomainError, SyntaxError, SyntaxErrorKind};
pub use parser::{parse, parse_lines, Parser};
