//! Configuration file support for ecfg.
//!
//! This module provides:
//! - Loading settings from `ecfg.toml`
//! - Config file discovery (search upward from the current directory)
//! - Merging CLI args, config file, and defaults
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{find_config_file, find_file_upward, load_config, ConfigError, CONFIG_FILE_NAME};
pub use init::{generate_init_file, generate_init_file_in, ECFG_TOML_TEMPLATE};
pub use merge::{merge_resolver_config, merge_walk_options, CliResolveOptions};
pub use toml_schema::{EcfgToml, ResolveSection, WalkSection};
