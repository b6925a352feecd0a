//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// BML manifest parser and static preservation catalog generator
#[derive(Parser, Debug)]
#[command(name = "bmlgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a manifest and print its node tree
    Parse {
        /// BML file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the text of a node path (e.g. `database revision`)
    Query {
        /// BML file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node names from the top level down
        #[arg(required = true, num_args = 1..)]
        path: Vec<String>,
        /// Print every node matching the last name, not just the first
        #[arg(short, long)]
        all: bool,
    },

    /// Parse all manifests and report the first error
    Check {
        /// Manifest root (default: manifests_dir from config)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Generate the static site
    Generate {
        /// Manifest root (default: manifests_dir from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        manifests: Option<PathBuf>,
        /// Output directory (default: output_dir from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Compute URL identifiers
    Hash {
        #[command(subcommand)]
        command: HashCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum HashCommands {
    /// 4-character identifier of a manifest or board name
    Name {
        name: String,
    },
    /// 8-character identifier of a game's sha256 digest
    Digest {
        digest: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
