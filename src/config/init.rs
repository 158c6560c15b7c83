//! Template generation for `--init`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

pub const ECFG_TOML_TEMPLATE: &str = r#"# ecfg.toml - settings for the ecfg EditorConfig resolver
#
# ecfg prints the EditorConfig properties that apply to each file it is
# given. Command line flags override the values below.

[resolve]
# Name of the files holding EditorConfig sections.
# Default: ".editorconfig"
# file_name = ".editorconfig"

# EditorConfig version to emulate. Versions before 0.10.0 do not derive
# indent_size = tab from indent_style = tab.
# Default: the latest supported version
# version = "0.17.2"

# Directories the search for config files never climbs above, even
# without root = true. Relative paths start at this file's directory.
# root_dirs = ["."]

# Report properties set to "unset" instead of dropping them.
# Default: false
# keep_unset = false

# Stop with an error on syntax errors in config files.
# Default: false
# strict = false

# What parse problems do: "ignore", "log", "strict_syntax" or "strict".
# Overrides strict when set.
# Default: "log"
# error_policy = "log"

[walk]
# Skip hidden files when a directory is given.
# Default: true
# hidden = true

# Respect .gitignore when a directory is given.
# Default: true
# git_ignore = true
"#;

/// Write the template into `dir` (the current directory if `None`).
///
/// Refuses to overwrite an existing file.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |d| d.join(CONFIG_FILE_NAME));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{CONFIG_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, ECFG_TOML_TEMPLATE)?;
    Ok(path)
}

pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
