//! Configuration merging
//!
//! Priority: CLI args > ecfg.toml > defaults

use std::path::{Path, PathBuf};

use crate::parser::ErrorPolicy;
use crate::resolver::ResolverConfig;
use crate::resource::slash_path;
use crate::version::Version;
use crate::walker::WalkOptions;

use super::file::ConfigError;
use super::toml_schema::{ResolveSection, WalkSection};

/// Resolver options given on the command line.
///
/// `None` and empty lists mean "not given".
#[derive(Debug, Default)]
pub struct CliResolveOptions {
    pub file_name: Option<String>,
    pub version: Option<Version>,
    pub root_dirs: Vec<PathBuf>,
    pub keep_unset: Option<bool>,
    pub strict: Option<bool>,
}

/// Merge resolver settings.
///
/// Relative CLI root dirs start at `cwd`; relative TOML ones start at the
/// directory given with the TOML section.
pub fn merge_resolver_config(
    cli: &CliResolveOptions,
    cwd: &Path,
    toml: Option<(&ResolveSection, &Path)>,
) -> Result<ResolverConfig, ConfigError> {
    let defaults = ResolverConfig::default();
    let section = toml.map(|(section, _)| section);

    let version = match cli.version {
        Some(version) => version,
        None => match section.and_then(|t| t.version.as_deref()) {
            Some(text) => text.parse()?,
            None => defaults.version,
        },
    };

    let root_dirs = if !cli.root_dirs.is_empty() {
        absolute_dirs(&cli.root_dirs, cwd)
    } else {
        match toml {
            Some((ResolveSection { root_dirs: Some(dirs), .. }, toml_dir)) => absolute_dirs(dirs, toml_dir),
            _ => defaults.root_dirs,
        }
    };

    // --strict > error_policy > strict > default
    let error_policy = match (cli.strict, section) {
        (Some(true), _) => ErrorPolicy::StrictSyntax,
        (Some(false), _) => defaults.error_policy,
        (None, Some(ResolveSection { error_policy: Some(policy), .. })) => *policy,
        (None, Some(ResolveSection { strict: Some(true), .. })) => ErrorPolicy::StrictSyntax,
        _ => defaults.error_policy,
    };

    Ok(ResolverConfig {
        file_name: cli
            .file_name
            .clone()
            .or_else(|| section.and_then(|t| t.file_name.clone()))
            .unwrap_or(defaults.file_name),
        root_dirs,
        keep_unset: cli
            .keep_unset
            .or_else(|| section.and_then(|t| t.keep_unset))
            .unwrap_or(defaults.keep_unset),
        error_policy,
        version,
    })
}

/// Walk settings come from ecfg.toml only.
pub fn merge_walk_options(toml: Option<&WalkSection>) -> WalkOptions {
    let defaults = WalkOptions::default();
    WalkOptions {
        hidden: toml.and_then(|t| t.hidden).unwrap_or(defaults.hidden),
        git_ignore: toml.and_then(|t| t.git_ignore).unwrap_or(defaults.git_ignore),
    }
}

fn absolute_dirs(dirs: &[PathBuf], base: &Path) -> Vec<String> {
    dirs.iter()
        .map(|dir| {
            let joined = base.join(dir);
            // `.` and `..` would never equal a walked directory path
            let dir = joined.canonicalize().unwrap_or(joined);
            slash_path(&dir)
        })
        .collect()
}
