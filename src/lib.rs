//! EditorConfig resolution.
//!
//! Given a file path, [`Resolver`] finds the `.editorconfig` files above it,
//! parses them and computes the properties that apply to the file:
//!
//! ```no_run
//! use ecfg::{FileResource, Resolver};
//!
//! let resolved = Resolver::default()
//!     .resolve(&FileResource::new("/home/me/project/src/main.rs"))
//!     .unwrap();
//! for property in resolved.properties() {
//!     println!("{}={}", property.name(), property.value());
//! }
//! ```

pub mod colors;
pub mod config;
pub mod glob;
pub mod model;
mod output;
pub mod parser;
pub mod progress;
pub mod property_type;
pub mod resolver;
pub mod resource;
pub mod version;
pub mod walker;

pub use colors::{should_use_colors, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_resolver_config, merge_walk_options,
    CliResolveOptions, ConfigError, EcfgToml, ECFG_TOML_TEMPLATE,
};
pub use glob::{Glob, GlobError};
pub use model::{EditorConfig, ParseOptions, Properties, Property, PropertyError, Section};
pub use output::{print_diff, DiagnosticPrinter, FormatMode, OutputContext, OutputMode, RunResult};
pub use parser::{CollectingErrorHandler, ErrorEvent, ErrorHandler, ErrorKind, ErrorPolicy, ParseError};
pub use progress::ProgressReporter;
pub use property_type::{EndOfLine, IndentStyle, PropertyType, PropertyTypeRegistry, Value};
pub use resolver::{Loader, ParsingLoader, ResolveError, ResolvedProperties, Resolver, ResolverConfig};
pub use resource::{FilePath, FileResource, MemoryTree, Resource, ResourcePath};
pub use version::Version;
pub use walker::{walk_paths, WalkOptions};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Print the resolved properties of every file under `paths`.
pub fn run_resolve(
    paths: &[String],
    resolver: &Resolver,
    walk: WalkOptions,
    ctx: &OutputContext,
) -> io::Result<RunResult> {
    let mut result = RunResult::default();
    let files = walk_paths(paths, walk).collect::<io::Result<Vec<_>>>()?;

    // More than one file gets `[path]` headers
    let with_headers = files.len() > 1;
    let progress = ProgressReporter::new(files.len() as u64, ctx.show_progress);
    let mut diagnostics = DiagnosticPrinter::new(resolver.config().error_policy, ctx);

    for path in &files {
        let target = FileResource::new(absolute(path)?);
        progress.advance(&path.to_string_lossy());

        match resolver.resolve_with(&target, &mut diagnostics) {
            Ok(resolved) => {
                let label = path.to_string_lossy();
                let header = with_headers.then_some(label.as_ref());
                progress.suspend(|| output::print_properties(header, &resolved, ctx));
                result.files_processed += 1;
            }
            Err(e) => {
                progress.suspend(|| output::print_failure(path, &e, ctx));
                result.files_failed += 1;
            }
        }
    }

    progress.finish();
    output::print_summary(&result, diagnostics.warnings(), false, ctx);

    Ok(result)
}

/// Format each config file under `paths` canonically.
///
/// Directories are searched for files named `file_name`, hidden or not.
pub fn run_format(
    paths: &[String],
    file_name: &str,
    options: &ParseOptions,
    policy: ErrorPolicy,
    mode: FormatMode,
    ctx: &OutputContext,
) -> io::Result<RunResult> {
    let mut result = RunResult::default();
    let mut files = Vec::new();
    for path in paths {
        if Path::new(path).is_dir() {
            let walk = WalkOptions {
                hidden: false,
                ..WalkOptions::default()
            };
            for file in walk_paths(std::slice::from_ref(path), walk) {
                let file = file?;
                if file.file_name().is_some_and(|name| name == file_name) {
                    files.push(file);
                }
            }
        } else {
            files.push(PathBuf::from(path));
        }
    }

    let with_headers = files.len() > 1;
    let mut diagnostics = DiagnosticPrinter::new(policy, ctx);

    for path in &files {
        match format_file(path, options, &mut diagnostics) {
            Ok((original, formatted)) => {
                result.files_processed += 1;
                let label = path.to_string_lossy();
                let changed = original != formatted;

                if changed {
                    result.files_unformatted += 1;
                }
                if mode.diff {
                    if changed {
                        print_diff(&label, &original, &formatted);
                    }
                } else if mode.check {
                    if changed {
                        output::print_unformatted(path, ctx);
                    }
                } else {
                    output::print_formatted(with_headers.then_some(label.as_ref()), &formatted);
                }
            }
            Err(e) => {
                output::print_failure(path, e.as_ref(), ctx);
                result.files_failed += 1;
            }
        }
    }

    if !mode.check {
        // only `--check` turns unformatted files into a failure
        result.files_unformatted = 0;
    }
    output::print_summary(&result, diagnostics.warnings(), mode.check, ctx);

    Ok(result)
}

fn format_file(
    path: &Path,
    options: &ParseOptions,
    errors: &mut dyn ErrorHandler,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    let original = fs::read_to_string(path)?;
    let resource = FileResource::new(absolute(path)?);
    let config = EditorConfig::parse(&resource, options, errors)?;
    Ok((original, config.to_string()))
}

/// Absolute form of `path`, with symlinks resolved where the path exists so
/// that it lines up with canonical root directories.
fn absolute(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    // a file that does not exist yet, in a directory that might
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => Ok(parent
            .canonicalize()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|_| absolute.clone())),
        _ => Ok(absolute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absolute_keeps_missing_file_name() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("new.rs");

        let result = absolute(&missing).unwrap();
        assert_eq!(result, dir.path().canonicalize().unwrap().join("new.rs"));
    }

    #[test]
    fn test_absolute_resolves_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "").unwrap();

        assert_eq!(absolute(&file).unwrap(), file.canonicalize().unwrap());
    }

    #[test]
    fn test_format_file_reports_original_and_canonical() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".editorconfig");
        fs::write(&file, "root=true\n[*]\nindent_size=2\n").unwrap();

        let (original, formatted) = format_file(
            &file,
            &ParseOptions::default(),
            &mut CollectingErrorHandler::new(),
        )
        .unwrap();
        assert_eq!(original, "root=true\n[*]\nindent_size=2\n");
        assert_eq!(formatted, "root = true\n\n[*]\nindent_size = 2\n");
    }

    #[test]
    fn test_format_file_missing() {
        let result = format_file(
            Path::new("/no/such/.editorconfig"),
            &ParseOptions::default(),
            &mut CollectingErrorHandler::new(),
        );
        assert!(result.is_err());
    }
}
