//! Locating and reading `ecfg.toml`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::version::VersionError;

use super::toml_schema::EcfgToml;

pub const CONFIG_FILE_NAME: &str = "ecfg.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid version in config file: {0}")]
    Version(#[from] VersionError),
}

/// Search `start_dir` and its ancestors for `filename`.
///
/// With `stop_at_git_root`, the search ends at the first directory holding
/// a `.git` entry.
pub fn find_file_upward(start_dir: &Path, filename: &str, stop_at_git_root: bool) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .take_while({
            let mut stop = false;
            move |dir| {
                if stop {
                    return false;
                }
                stop = stop_at_git_root && dir.join(".git").exists();
                true
            }
        })
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Find `ecfg.toml` in `start_dir` or above, not leaving the git repository.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, CONFIG_FILE_NAME, true)
}

pub fn load_config(path: &Path) -> Result<EcfgToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
