//! Manifest catalog service
//!
//! Discovers manifests below a root directory, parses them and turns each
//! into a board list or game list page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::application::hash::{game_url_hash, manifest_url_hash};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    database_revision, parse, Board, BoardList, Category, Document, DomainError, Game, GameList,
    Manifest, ManifestKind,
};
use crate::infrastructure::traits::FileSystem;

/// Page content of one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Boards(BoardList),
    Games(GameList),
}

impl Page {
    pub fn name(&self) -> &str {
        match self {
            Page::Boards(list) => &list.name,
            Page::Games(list) => &list.name,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Page::Boards(list) => board_list_url(list),
            Page::Games(list) => game_list_url(list),
        }
    }
}

pub fn board_list_url(list: &BoardList) -> String {
    format!("/boards/{}", list.hash)
}

pub fn game_list_url(list: &GameList) -> String {
    format!("/games/{}", list.hash)
}

pub fn game_url(list: &GameList, game: &Game) -> String {
    format!("{}/{}", game_list_url(list), game.hash)
}

/// A classified page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub category: Category,
    pub source: PathBuf,
    pub page: Page,
}

/// All pages of a manifest tree, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn board_lists(&self) -> impl Iterator<Item = &BoardList> {
        self.entries.iter().filter_map(|e| match &e.page {
            Page::Boards(list) => Some(list),
            Page::Games(_) => None,
        })
    }

    pub fn game_lists(&self) -> impl Iterator<Item = &GameList> {
        self.entries.iter().filter_map(|e| match &e.page {
            Page::Games(list) => Some(list),
            Page::Boards(_) => None,
        })
    }
}

/// Dot-files and dot-directories are not part of the manifest tree.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Service for reading manifests into a catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse one BML file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_document(&self, path: &Path) -> ApplicationResult<Document> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read manifest", path)?;
        parse(&content).map_err(|source| {
            ApplicationError::Domain(DomainError::Syntax {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    /// All files below `root` with the given extension, sorted by path.
    pub fn discover(&self, root: &Path, extension: &str) -> ApplicationResult<Vec<PathBuf>> {
        if !self.fs.is_dir(root) {
            return Err(DomainError::ManifestDirNotFound(root.to_path_buf()).into());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::OperationFailed {
                context: format!("scan {}", root.display()),
                source: Box::new(e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .map(|ext| ext == extension)
                .unwrap_or(false);
            if matches {
                files.push(entry.into_path());
            }
        }

        debug!("discover: found {} manifests in {}", files.len(), root.display());
        Ok(files)
    }

    /// Classify and parse one manifest below `root`.
    pub fn load_manifest(&self, root: &Path, path: &Path) -> ApplicationResult<Manifest> {
        let category = Category::classify(root, path)?;
        let document = self.load_document(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Manifest {
            name,
            path: path.to_path_buf(),
            category,
            document,
        })
    }

    /// Parse every manifest below `root` in parallel. The first failure aborts the run.
    #[instrument(level = "debug", skip(self))]
    pub fn load_all(&self, root: &Path, extension: &str) -> ApplicationResult<Vec<Manifest>> {
        let files = self.discover(root, extension)?;
        files
            .par_iter()
            .map(|path| self.load_manifest(root, path))
            .collect()
    }

    /// Turn one parsed manifest into its page.
    pub fn build_page(&self, manifest: &Manifest) -> ApplicationResult<Page> {
        let doc = &manifest.document;
        let revision = database_revision(doc);
        let hash = manifest_url_hash(&manifest.name);

        let page = match manifest.category.kind {
            ManifestKind::Boards => Page::Boards(BoardList {
                name: manifest.name.clone(),
                revision,
                hash,
                boards: doc
                    .elements("board")
                    .into_iter()
                    .map(|node| Board::from_node(node, manifest_url_hash(node.text())))
                    .collect(),
            }),
            ManifestKind::Games => Page::Games(GameList {
                name: manifest.name.clone(),
                revision,
                hash,
                games: doc
                    .elements("game")
                    .into_iter()
                    .map(|node| Game::from_node(node, game_url_hash))
                    .collect::<Result<_, _>>()?,
            }),
        };
        Ok(page)
    }

    /// Load and classify a whole manifest tree.
    pub fn build_catalog(&self, root: &Path, extension: &str) -> ApplicationResult<Catalog> {
        let manifests = self.load_all(root, extension)?;
        let mut entries = Vec::with_capacity(manifests.len());
        for manifest in &manifests {
            entries.push(CatalogEntry {
                category: manifest.category.clone(),
                source: manifest.path.clone(),
                page: self.build_page(manifest)?,
            });
        }
        info!("catalog: {} pages from {}", entries.len(), root.display());
        Ok(Catalog { entries })
    }
}
