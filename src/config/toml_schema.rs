//! TOML schema for ecfg.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parser::ErrorPolicy;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EcfgToml {
    #[serde(default)]
    pub resolve: ResolveSection,

    #[serde(default)]
    pub walk: WalkSection,
}

/// `[resolve]` section
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveSection {
    /// Config file name to look for (default: .editorconfig)
    pub file_name: Option<String>,

    /// EditorConfig version to emulate, e.g. "0.17.2"
    pub version: Option<String>,

    /// Directories the upward search never leaves. Relative paths are
    /// relative to the directory holding ecfg.toml.
    pub root_dirs: Option<Vec<PathBuf>>,

    /// Keep properties set to `unset` (default: false)
    pub keep_unset: Option<bool>,

    /// Fail on syntax errors in config files (default: false)
    pub strict: Option<bool>,

    /// What parse problems do: "ignore", "log", "strict_syntax" or
    /// "strict". Takes precedence over `strict` (default: "log")
    pub error_policy: Option<ErrorPolicy>,
}

/// `[walk]` section, for directory arguments
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkSection {
    /// Skip hidden files (default: true)
    pub hidden: Option<bool>,

    /// Respect .gitignore (default: true)
    pub git_ignore: Option<bool>,
}
