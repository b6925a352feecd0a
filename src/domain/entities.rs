//! Domain entities: catalog pages built from parsed manifests
//!
//! Each manifest file becomes either a board list or a game list, depending on
//! the first directory below the manifests root.

use std::path::{Component, Path, PathBuf};

use crate::domain::arena::{Document, NodeRef};
use crate::domain::error::DomainError;

/// Separator between directory components in a category label.
pub const CATEGORY_SEPARATOR: &str = " — ";

const BOARDS_DIR: &str = "Boards";
const GAMES_DIR: &str = "Games";

/// Which page family a manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ManifestKind {
    Boards,
    Games,
}

/// Display category derived from a manifest's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category {
    pub kind: ManifestKind,
    /// Directory components below the manifests root, e.g. `Games — Super Famicom`
    pub label: String,
}

impl Category {
    /// Classify `file` (somewhere below `root`) by its directory.
    ///
    /// `Manifests/Games/Super Famicom/x.bml` → `Games — Super Famicom`.
    pub fn classify(root: &Path, file: &Path) -> Result<Self, DomainError> {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let dirs: Vec<String> = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let kind = match dirs.first().map(String::as_str) {
            Some(BOARDS_DIR) => ManifestKind::Boards,
            Some(GAMES_DIR) => ManifestKind::Games,
            other => {
                return Err(DomainError::UnexpectedCategory {
                    path: file.to_path_buf(),
                    category: other.unwrap_or_default().to_string(),
                })
            }
        };

        Ok(Self {
            kind,
            label: dirs.join(CATEGORY_SEPARATOR),
        })
    }
}

/// Parsed manifest with its source location and classification.
#[derive(Debug)]
pub struct Manifest {
    /// File stem, e.g. `Super Famicom` for `Super Famicom.bml`
    pub name: String,
    pub path: PathBuf,
    pub category: Category,
    pub document: Document,
}

/// One board entry of a board list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub name: String,
    pub hash: String,
}

/// Page listing board definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardList {
    pub name: String,
    pub revision: String,
    pub hash: String,
    pub boards: Vec<Board>,
}

/// One memory component on a game's board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    pub kind: String,
    /// Parsed hex size; always present for ROM components
    pub size: Option<u64>,
    /// `size` as written in the manifest
    pub size_text: String,
    pub content: String,
}

impl Memory {
    pub fn is_rom(&self) -> bool {
        self.kind == "ROM"
    }

    /// Size for display: hex when it parsed, the manifest text otherwise.
    pub fn display_size(&self) -> String {
        match self.size {
            Some(size) => format!("{size:#x}"),
            None => self.size_text.clone(),
        }
    }
}

/// One game entry of a game list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub name: String,
    pub region: String,
    pub revision: String,
    pub board: String,
    pub sha256: String,
    pub hash: String,
    pub memory: Vec<Memory>,
}

impl Game {
    /// Total size of all ROM components.
    pub fn rom_size(&self) -> u64 {
        self.memory
            .iter()
            .filter(|m| m.is_rom())
            .filter_map(|m| m.size)
            .sum()
    }
}

/// Page listing the games of one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameList {
    pub name: String,
    pub revision: String,
    pub hash: String,
    pub games: Vec<Game>,
}

/// `database.revision`, shared by both manifest kinds.
pub fn database_revision(doc: &Document) -> String {
    doc.path_chain("database", &["revision"])
        .map(|n| n.text().to_string())
        .unwrap_or_default()
}

fn child_text(node: NodeRef<'_>, name: &str) -> String {
    node.path(name).map(|n| n.text().to_string()).unwrap_or_default()
}

/// Parse a hexadecimal size with optional `0x` prefix.
pub fn parse_hex_size(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}

impl Board {
    pub fn from_node(node: NodeRef<'_>, hash: String) -> Self {
        Self {
            name: node.text().to_string(),
            hash,
        }
    }
}

impl Game {
    /// Read a `game` node. `hash` derives the URL identifier from the `sha256` text.
    pub fn from_node<F>(node: NodeRef<'_>, hash: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Result<String, DomainError>,
    {
        let name = child_text(node, "name");
        let sha256 = child_text(node, "sha256");

        let mut memory = Vec::new();
        if let Some(board) = node.path("board") {
            for component in board.elements("memory") {
                let kind = child_text(component, "type");
                let size_text = child_text(component, "size");
                let size = parse_hex_size(&size_text);
                // Only ROM sizes count towards the game size; other components may be free-form
                if kind == "ROM" && size.is_none() {
                    return Err(DomainError::InvalidSize {
                        game: name,
                        value: size_text,
                    });
                }
                memory.push(Memory {
                    kind,
                    size,
                    size_text,
                    content: child_text(component, "content"),
                });
            }
        }

        Ok(Self {
            region: child_text(node, "region"),
            revision: child_text(node, "revision"),
            board: child_text(node, "board"),
            hash: hash(&sha256)?,
            sha256,
            name,
            memory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse;
    use rstest::rstest;

    #[rstest]
    #[case("Manifests/Games/Super Famicom/a.bml", ManifestKind::Games, "Games — Super Famicom")]
    #[case("Manifests/Boards/b.bml", ManifestKind::Boards, "Boards")]
    #[case("Manifests/Games/x/y/c.bml", ManifestKind::Games, "Games — x — y")]
    fn given_manifest_path_when_classifying_then_kind_and_label(
        #[case] file: &str,
        #[case] kind: ManifestKind,
        #[case] label: &str,
    ) {
        let category = Category::classify(Path::new("Manifests"), Path::new(file)).unwrap();
        assert_eq!(category.kind, kind);
        assert_eq!(category.label, label);
    }

    #[rstest]
    #[case("Manifests/Other/a.bml")]
    #[case("Manifests/a.bml")]
    fn given_unknown_directory_when_classifying_then_errors(#[case] file: &str) {
        let result = Category::classify(Path::new("Manifests"), Path::new(file));
        assert!(matches!(result, Err(DomainError::UnexpectedCategory { .. })));
    }

    #[rstest]
    #[case("0x20000", Some(0x20000))]
    #[case("8000", Some(0x8000))]
    #[case("0XFF", Some(0xff))]
    #[case("zz", None)]
    #[case("", None)]
    fn given_size_text_when_parsing_hex_then_value(#[case] text: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_hex_size(text), expected);
    }

    #[test]
    fn given_game_node_when_reading_then_sums_rom_only() {
        let doc = parse(
            "game\n  sha256: ab\n  name: Example\n  region: NA\n  revision: 1.0\n  board: SHVC-1A0N-30\n    memory type=ROM size=0x80000 content=Program\n    memory type=RAM size=0x2000 content=Save\n    memory type=ROM size=0x800 content=Expansion\n",
        )
        .unwrap();
        let game = Game::from_node(doc.path("game").unwrap(), |d| Ok(format!("h-{d}"))).unwrap();
        assert_eq!(game.name, "Example");
        assert_eq!(game.board, "SHVC-1A0N-30");
        assert_eq!(game.hash, "h-ab");
        assert_eq!(game.memory.len(), 3);
        assert_eq!(game.rom_size(), 0x80800);
    }

    #[test]
    fn given_bad_size_when_reading_game_then_invalid_size() {
        let doc = parse("game\n  name: X\n  board\n    memory type=ROM size=nope\n").unwrap();
        let result = Game::from_node(doc.path("game").unwrap(), |_| Ok(String::new()));
        assert!(matches!(result, Err(DomainError::InvalidSize { .. })));
    }

    #[test]
    fn given_free_form_size_on_non_rom_when_reading_game_then_kept_as_text() {
        let doc = parse(
            "game\n  name: X\n  board\n    memory type=ROM size=0x100\n    memory type=RTC size=n/a\n",
        )
        .unwrap();
        let game = Game::from_node(doc.path("game").unwrap(), |_| Ok(String::new())).unwrap();
        assert_eq!(game.rom_size(), 0x100);
        assert_eq!(game.memory[1].size, None);
        assert_eq!(game.memory[1].display_size(), "n/a");
        assert_eq!(game.memory[0].display_size(), "0x100");
    }

    #[test]
    fn given_rom_without_size_when_reading_game_then_invalid_size() {
        let doc = parse("game\n  name: X\n  board\n    memory type=ROM\n").unwrap();
        let result = Game::from_node(doc.path("game").unwrap(), |_| Ok(String::new()));
        assert!(matches!(result, Err(DomainError::InvalidSize { .. })));
    }

    #[test]
    fn given_database_header_when_reading_revision_then_text() {
        let doc = parse("database\n  revision: 2018-09-21\n\nboard: X").unwrap();
        assert_eq!(database_revision(&doc), "2018-09-21");
    }
}
