use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "bumpversion.toml";

/// Represents the complete configuration for bumpversion.
///
/// Selects which git backend to use and how to reach the remote.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub git: GitConfig,
}

/// How git is driven.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Run the `git` executable
    #[default]
    Git,
    /// Use libgit2 in-process
    Libgit2,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_program() -> String {
    "git".to_string()
}

/// Settings for the git backends.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Remote whose tags must match the local ones, and where tags are pushed
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Executable used by the `git` backend
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            program: default_program(),
        }
    }
}

/// Returns the first configuration file that exists, if any.
///
/// Lookup order:
/// 1. `bumpversion.toml` in `directory`, the directory the bump runs in
/// 2. `.bumpversion.toml` in the user config directory
pub fn find_config_file(directory: &Path) -> Option<PathBuf> {
    let local = directory.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| BumpError::config(e.message().to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file; when absent
///   [find_config_file] decides
/// * `directory` - Directory the bump runs in (`-C`), searched for a
///   project-local file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, directory: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match find_config_file(directory) {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    tracing::debug!("loading configuration from {}", path.display());
    let content = fs::read_to_string(&path)
        .map_err(|e| BumpError::config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&content)
        .map_err(|e| BumpError::config(format!("{}: {}", path.display(), config_reason(e))))
}

fn config_reason(err: BumpError) -> String {
    match err {
        BumpError::Config(reason) => reason,
        other => other.to_string(),
    }
}
