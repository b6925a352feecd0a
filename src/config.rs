//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bmlgen/bmlgen.toml`
//! 3. Local config: `<project_dir>/.bmlgen.toml`
//! 4. Environment variables: `BMLGEN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// `<title>` of generated pages unless configured.
pub const DEFAULT_SITE_TITLE: &str = "Preservation — byuu.org";

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub manifests_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub site_title: Option<String>,
    pub manifest_extension: Option<String>,
}

/// Unified configuration for bmlgen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the manifest tree (default: Manifests)
    pub manifests_dir: PathBuf,
    /// Directory the site is written to (default: public)
    pub output_dir: PathBuf,
    /// `<title>` of every generated page
    pub site_title: String,
    /// Extension of manifest files, without the dot (default: bml)
    pub manifest_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifests_dir: PathBuf::from("Manifests"),
            output_dir: PathBuf::from("public"),
            site_title: DEFAULT_SITE_TITLE.into(),
            manifest_extension: "bml".into(),
        }
    }
}

/// Get the XDG config directory for bmlgen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bmlgen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bmlgen.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".bmlgen.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.manifests_dir = PathBuf::from(expand_env_vars(&self.manifests_dir.to_string_lossy()));
        self.output_dir = PathBuf::from(expand_env_vars(&self.output_dir.to_string_lossy()));
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            manifests_dir: overlay
                .manifests_dir
                .clone()
                .unwrap_or_else(|| self.manifests_dir.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            site_title: overlay
                .site_title
                .clone()
                .unwrap_or_else(|| self.site_title.clone()),
            manifest_extension: overlay
                .manifest_extension
                .clone()
                .unwrap_or_else(|| self.manifest_extension.clone()),
        }
    }

    /// Relative directories are taken relative to `project_dir`.
    fn anchor_paths(&mut self, project_dir: &Path) {
        if self.manifests_dir.is_relative() {
            self.manifests_dir = project_dir.join(&self.manifests_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = project_dir.join(&self.output_dir);
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config; relative
    ///   `manifests_dir`/`output_dir` are resolved against it
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        if let Some(project) = project_dir {
            current.anchor_paths(project);
        }

        Ok(current)
    }

    /// Apply BMLGEN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("BMLGEN").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("manifests_dir") {
            settings.manifests_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("site_title") {
            settings.site_title = val;
        }
        if let Ok(val) = config.get_string("manifest_extension") {
            settings.manifest_extension = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bmlgen configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bmlgen/bmlgen.toml
#   Local:  <project_dir>/.bmlgen.toml
#   Env:    BMLGEN_* environment variables

# Root of the manifest tree: <manifests_dir>/{Boards,Games}/**/*.bml
# manifests_dir = "Manifests"

# Where the generated site is written
# output_dir = "public"

# <title> of every page
# site_title = "Preservation — byuu.org"

# Manifest file extension
# manifest_extension = "bml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
