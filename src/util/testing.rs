use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["rayon", "walkdir"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Board manifest with two boards.
pub const BOARDS_MANIFEST: &str = "\
database
  revision: 2018-09-21

board: SHVC-1A0N-(01,02,10,20,30)
  memory type=ROM content=Program
    map address=00-7d,80-ff:8000-ffff mask=0x8000

board: SHVC-1A3M-(01,10,20,30)
  memory type=ROM content=Program
  memory type=RAM content=Save
";

/// Game manifest with two games, one of them with mixed memory.
pub const GAMES_MANIFEST: &str = "\
database
  revision: 2018-10-07

game
  sha256: c1a0b2b2e8a4fbc4d0f79f7c6c3b9e4e0b2f8d2b5d4f6c3a9e8d7c6b5a4f3e2d
  label:  Example Quest
  name:   Example Quest
  region: SNS-EQ-USA
  revision: SNS-EQ-0
  board:  SHVC-1A3M-30
    memory
      type: ROM
      size: 0x100000
      content: Program
    memory
      type: RAM
      size: 0x2000
      content: Save

game
  sha256: 00ff
  name:   Second Game
  region: SHVC-SG
  revision: SHVC-SG-0
  board:  SHVC-1A0N-30
    memory
      type: ROM
      size: 80000
      content: Program
";

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_manifest(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {}: {e}", parent.display()));
    }
    fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}

/// Lay out a `Manifests` tree with one board and one game manifest below `dir`.
pub fn setup_manifest_tree(dir: &Path) -> PathBuf {
    let root = dir.join("Manifests");
    write_manifest(&root, "Boards/Super Famicom.bml", BOARDS_MANIFEST);
    write_manifest(&root, "Games/Super Famicom.bml", GAMES_MANIFEST);
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_fixture_manifests_when_parsing_then_succeeds() {
        let boards = parse(BOARDS_MANIFEST).unwrap();
        let games = parse(GAMES_MANIFEST).unwrap();
        assert_eq!(boards.elements("board").len(), 2);
        assert_eq!(games.elements("game").len(), 2);
    }
}
