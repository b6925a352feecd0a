//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::hash::{game_url_hash, manifest_url_hash};
use crate::application::services::Catalog;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, HashCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Document, NodeRef, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    debug!("project_dir: {}", project_dir.display());

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => _config(command, &project_dir),
        Commands::Hash { command } => _hash(command),
        _ => {
            let settings = Settings::load(Some(&project_dir))?;
            let container = ServiceContainer::new(settings);
            match command {
                Commands::Parse { file } => _parse(&container, file),
                Commands::Query { file, path, all } => _query(&container, file, path, *all),
                Commands::Check { dir } => _check(&container, dir.as_deref()),
                Commands::Generate { manifests, output } => {
                    _generate(&container, manifests.as_deref(), output.as_deref())
                }
                Commands::Completion { .. } | Commands::Config { .. } | Commands::Hash { .. } => {
                    Ok(())
                }
            }
        }
    }
}

#[instrument(skip(container))]
fn _parse(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let doc = container.catalog.load_document(file)?;
    output::info(&doc.to_tree_string());
    output::detail(&describe(&doc));
    Ok(())
}

/// Node count below the root and nesting depth, root excluded.
pub fn describe(doc: &Document) -> String {
    format!(
        "{} nodes, depth {}",
        doc.iter().count(),
        doc.depth().saturating_sub(1)
    )
}

/// Resolve `names` against `doc`; with `all`, every match of the last name.
pub fn query<'a>(doc: &'a Document, names: &[String], all: bool) -> Vec<NodeRef<'a>> {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let Some((last, init)) = names.split_last() else {
        return Vec::new();
    };

    if !all {
        return doc
            .root()
            .path_chain(names[0], &names[1..])
            .into_iter()
            .collect();
    }

    let parent = match init.split_first() {
        Some((first, rest)) => doc.root().path_chain(first, rest),
        None => Some(doc.root()),
    };
    parent.map(|p| p.elements(last)).unwrap_or_default()
}

#[instrument(skip(container))]
fn _query(container: &ServiceContainer, file: &Path, names: &[String], all: bool) -> CliResult<()> {
    let doc = container.catalog.load_document(file)?;
    let matches = query(&doc, names, all);
    if matches.is_empty() {
        return Err(ApplicationError::NotFound {
            path: file.to_path_buf(),
            name: names.join("."),
        }
        .into());
    }
    for node in matches {
        debug!(node = %node.qualified_name(), "match");
        output::info(node.text());
    }
    Ok(())
}

fn summarize(catalog: &Catalog) -> String {
    let boards: usize = catalog.board_lists().map(|l| l.boards.len()).sum();
    let games: usize = catalog.game_lists().map(|l| l.games.len()).sum();
    format!(
        "{} manifests: {} boards, {} games",
        catalog.entries.len(),
        boards,
        games
    )
}

#[instrument(skip(container))]
fn _check(container: &ServiceContainer, dir: Option<&Path>) -> CliResult<()> {
    let settings = &container.settings;
    let root = dir.unwrap_or(settings.manifests_dir.as_path());
    let catalog = container
        .catalog
        .build_catalog(root, &settings.manifest_extension)?;
    output::success(&summarize(&catalog));
    Ok(())
}

#[instrument(skip(container))]
fn _generate(
    container: &ServiceContainer,
    manifests: Option<&Path>,
    out: Option<&Path>,
) -> CliResult<()> {
    let settings = &container.settings;
    let root = manifests.unwrap_or(settings.manifests_dir.as_path());
    let out = out.unwrap_or(settings.output_dir.as_path());

    let catalog = container
        .catalog
        .build_catalog(root, &settings.manifest_extension)?;
    let report = container.site.generate(&catalog, out)?;

    for path in &report.collisions {
        output::warning(&format!("overwritten by a colliding URL hash: {}", path.display()));
    }
    output::success(&summarize(&catalog));
    output::action(
        "Generated",
        &format!("{} pages in {}", report.written.len(), out.display()),
    );
    Ok(())
}

fn _hash(command: &HashCommands) -> CliResult<()> {
    match command {
        HashCommands::Name { name } => output::info(&manifest_url_hash(name)),
        HashCommands::Digest { digest } => {
            let hash = game_url_hash(digest).map_err(ApplicationError::from)?;
            output::info(&hash);
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path: PathBuf = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (unavailable)"),
            }
            output::detail(&format!("local:  {}", local_config_path(project_dir).display()));
        }
    }
    Ok(())
}
