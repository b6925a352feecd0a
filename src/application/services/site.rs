//! Static site service
//!
//! Writes the rendered catalog under an output directory:
//!
//! ```text
//! <out>/index.html
//! <out>/boards/<hash>/index.html
//! <out>/games/<hash>/index.html
//! <out>/games/<hash>/<game-hash>/index.html
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::render::{
    board_list_html, game_html, game_list_html, html_page, index_html, PageLink,
};
use crate::application::services::catalog::{game_url, Catalog, Page};
use crate::application::{ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

const INDEX_FILE: &str = "index.html";

/// Files written by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub written: Vec<PathBuf>,
    /// Destinations written more than once (URL hash collisions)
    pub collisions: Vec<PathBuf>,
}

/// Service for writing the catalog as static HTML.
pub struct SiteService {
    fs: Arc<dyn FileSystem>,
    title: String,
}

impl SiteService {
    /// Create a new site service; `title` goes into every page's `<title>`.
    pub fn new(fs: Arc<dyn FileSystem>, title: impl Into<String>) -> Self {
        Self {
            fs,
            title: title.into(),
        }
    }

    /// Output file for a site URL such as `/games/abcd`.
    pub fn page_path(output_dir: &Path, url: &str) -> PathBuf {
        output_dir.join(url.trim_start_matches('/')).join(INDEX_FILE)
    }

    fn write_page(
        &self,
        report: &mut SiteReport,
        seen: &mut HashSet<PathBuf>,
        path: PathBuf,
        body: &str,
    ) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(&path)
            .with_path_context("create directory", &path)?;
        self.fs
            .write(&path, &html_page(&self.title, body))
            .with_path_context("write page", &path)?;
        debug!("wrote {}", path.display());
        if !seen.insert(path.clone()) {
            warn!("page written twice: {}", path.display());
            report.collisions.push(path.clone());
        }
        report.written.push(path);
        Ok(())
    }

    /// Render every page of `catalog` plus the index into `output_dir`.
    pub fn generate(&self, catalog: &Catalog, output_dir: &Path) -> ApplicationResult<SiteReport> {
        let mut report = SiteReport::default();
        let mut seen = HashSet::new();
        let mut categories: BTreeMap<&str, Vec<PageLink>> = BTreeMap::new();

        for entry in &catalog.entries {
            let url = entry.page.url();
            match &entry.page {
                Page::Boards(list) => {
                    let path = Self::page_path(output_dir, &url);
                    self.write_page(&mut report, &mut seen, path, &board_list_html(list))?;
                }
                Page::Games(list) => {
                    for game in &list.games {
                        let path = Self::page_path(output_dir, &game_url(list, game));
                        self.write_page(&mut report, &mut seen, path, &game_html(game))?;
                    }
                    let body = game_list_html(list, |game| game_url(list, game));
                    let path = Self::page_path(output_dir, &url);
                    self.write_page(&mut report, &mut seen, path, &body)?;
                }
            }
            categories
                .entry(entry.category.label.as_str())
                .or_default()
                .push(PageLink {
                    url,
                    name: entry.page.name().to_string(),
                });
        }

        let body = index_html(categories.iter().map(|(label, pages)| (*label, pages.as_slice())));
        self.write_page(&mut report, &mut seen, output_dir.join(INDEX_FILE), &body)?;

        info!(
            "site: wrote {} pages to {}",
            report.written.len(),
            output_dir.display()
        );
        Ok(report)
    }
}
