use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

use clap::Parser;
use ecfg::{
    find_config_file, generate_init_file, load_config, merge_resolver_config, merge_walk_options,
    run_format, run_resolve, should_use_colors, CliResolveOptions, EcfgToml, FormatMode,
    OutputContext, OutputMode, ParseOptions, Resolver, RunResult, Version,
};

#[derive(Parser)]
#[command(name = "ecfg")]
#[command(version, about = "Print the EditorConfig properties that apply to files")]
struct Cli {
    /// Target files or directories (config files with --fmt)
    #[arg(required_unless_present = "init")]
    paths: Vec<String>,

    /// Name of the config files to look for [default: .editorconfig]
    #[arg(short = 'f', long, value_name = "NAME")]
    file_name: Option<String>,

    /// EditorConfig version to emulate
    #[arg(short = 'b', long, value_name = "VERSION")]
    ec_version: Option<Version>,

    /// Never look for config files above this directory (repeatable)
    #[arg(long, value_name = "DIR")]
    root_dir: Vec<PathBuf>,

    /// Fail on syntax errors in config files
    #[arg(long)]
    strict: bool,

    /// Report properties set to `unset` instead of dropping them
    #[arg(long)]
    keep_unset: bool,

    /// Print config files in canonical formatting
    #[arg(long)]
    fmt: bool,

    /// With --fmt: report unformatted files, exit 1 if any
    #[arg(long, requires = "fmt")]
    check: bool,

    /// With --fmt: show changes as a unified diff
    #[arg(long, requires = "fmt")]
    diff: bool,

    /// Only print results, no warnings or summary
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Force colored output
    #[arg(long)]
    color: bool,

    /// Generate a template ecfg.toml configuration file
    #[arg(long)]
    init: bool,

    /// Config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

static TRACING_INIT: Once = Once::new();

/// Log to stderr when `RUST_LOG` is set, e.g. `RUST_LOG=ecfg=debug`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if cli.init {
        return handle_init();
    }

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let toml_config = load_configuration(cli.config.as_deref(), &cwd, cli.quiet);
    let toml_section = toml_config
        .as_ref()
        .map(|(config, dir)| (&config.resolve, dir.as_path()));

    // Merge configurations: CLI > TOML > defaults
    let resolver_config = match merge_resolver_config(&build_cli_options(&cli), &cwd, toml_section) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    let walk = merge_walk_options(toml_config.as_ref().map(|(config, _)| &config.walk));

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let ctx = OutputContext::new(
        mode,
        should_use_colors(cli.color, cli.no_color),
        !cli.quiet && std::io::stderr().is_terminal(),
    );

    let result = if cli.fmt {
        let options = ParseOptions {
            version: resolver_config.version,
            ..ParseOptions::default()
        };
        let format = FormatMode {
            check: cli.check,
            diff: cli.diff,
        };
        run_format(
            &cli.paths,
            &resolver_config.file_name,
            &options,
            resolver_config.error_policy,
            format,
            &ctx,
        )
    } else {
        let resolver = Resolver::new(resolver_config);
        run_resolve(&cli.paths, &resolver, walk, &ctx)
    };

    exit_code(result)
}

fn exit_code(result: std::io::Result<RunResult>) -> ExitCode {
    match result {
        Ok(result) if result.has_problems() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// The TOML config and the directory relative root dirs start from
fn load_configuration(explicit_path: Option<&Path>, cwd: &Path, quiet: bool) -> Option<(EcfgToml, PathBuf)> {
    let config_path = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file(cwd))?;

    match load_config(&config_path) {
        Ok(config) => {
            if !quiet {
                eprintln!("Using config: {}", config_path.display());
            }
            let dir = config_path
                .parent()
                .map(|p| cwd.join(p))
                .unwrap_or_else(|| cwd.to_path_buf());
            Some((config, dir))
        }
        Err(e) => {
            eprintln!("Warning: Failed to load {}: {}", config_path.display(), e);
            None
        }
    }
}

fn build_cli_options(cli: &Cli) -> CliResolveOptions {
    // Boolean flags are always present in clap (default false), so false
    // means "not set" and leaves the config file value in place.
    CliResolveOptions {
        file_name: cli.file_name.clone(),
        version: cli.ec_version,
        root_dirs: cli.root_dir.clone(),
        keep_unset: cli.keep_unset.then_some(true),
        strict: cli.strict.then_some(true),
    }
}
