use crate::colors::Colors;
use crate::parser::{ErrorEvent, ErrorHandler, ErrorPolicy, ParseError};
use crate::resolver::ResolvedProperties;
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
}

/// What `run_format` does with each file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatMode {
    /// Report files that are not canonically formatted
    pub check: bool,
    /// Show a unified diff instead of the formatted text
    pub diff: bool,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            show_progress,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_unformatted: usize,
}

impl RunResult {
    pub fn has_problems(&self) -> bool {
        self.files_failed > 0 || self.files_unformatted > 0
    }
}

/// Prints parse problems to stderr, once per distinct problem, and aborts
/// where `policy` says so.
pub struct DiagnosticPrinter {
    policy: ErrorPolicy,
    colors: Colors,
    quiet: bool,
    seen: HashSet<ErrorEvent>,
}

impl DiagnosticPrinter {
    pub fn new(policy: ErrorPolicy, ctx: &OutputContext) -> Self {
        Self {
            policy,
            colors: ctx.colors,
            quiet: ctx.mode == OutputMode::Quiet,
            seen: HashSet::new(),
        }
    }

    pub fn warnings(&self) -> usize {
        self.seen.len()
    }
}

impl ErrorHandler for DiagnosticPrinter {
    fn on_error(&mut self, event: ErrorEvent) -> Result<(), ParseError> {
        match self.policy {
            ErrorPolicy::Ignore => return Ok(()),
            ErrorPolicy::Strict => return Err(event.into()),
            ErrorPolicy::StrictSyntax if event.kind.is_syntax_error() => return Err(event.into()),
            ErrorPolicy::Log | ErrorPolicy::StrictSyntax => {}
        }

        if !self.quiet && !self.seen.contains(&event) {
            eprintln!("{}Warning:{} {event}", self.colors.warning, self.colors.reset());
        }
        self.seen.insert(event);
        Ok(())
    }
}

/// `header` is printed as `[header]` above the properties when given.
pub fn print_properties(header: Option<&str>, resolved: &ResolvedProperties, ctx: &OutputContext) {
    if let Some(header) = header {
        println!("{}[{header}]{}", ctx.colors.info, ctx.colors.reset());
    }
    for property in resolved.properties() {
        println!("{}={}", property.name(), property.value());
    }
}

pub fn print_failure(path: &Path, error: &dyn Error, ctx: &OutputContext) {
    eprintln!(
        "{}Error:{} {}: {}",
        ctx.colors.error,
        ctx.colors.reset(),
        path.display(),
        error_chain(error)
    );
}

/// `error` followed by each of its sources, separated by `: `
pub fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

pub fn print_formatted(header: Option<&str>, formatted: &str) {
    if let Some(header) = header {
        println!("# {header}");
    }
    print!("{formatted}");
}

pub fn print_unformatted(path: &Path, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        println!("{}", path.display());
        return;
    }
    println!(
        "{}Unformatted:{} {}",
        ctx.colors.error,
        ctx.colors.reset(),
        path.display()
    );
}

pub fn print_diff(label: &str, original: &str, content: &str) {
    let diff = TextDiff::from_lines(original, content);

    println!("--- {label}");
    println!("+++ {label}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

pub fn print_summary(result: &RunResult, warnings: usize, check: bool, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    let mut parts = vec![];
    if result.files_failed > 0 {
        parts.push(format!(
            "{}{} files failed{}",
            ctx.colors.error,
            result.files_failed,
            ctx.colors.reset()
        ));
    }
    if check && result.files_unformatted > 0 {
        parts.push(format!(
            "{}{} files not formatted{}",
            ctx.colors.error,
            result.files_unformatted,
            ctx.colors.reset()
        ));
    }
    if warnings > 0 {
        parts.push(format!(
            "{}{} warnings{}",
            ctx.colors.warning,
            warnings,
            ctx.colors.reset()
        ));
    }

    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ErrorKind, Location, Span};

    fn event(kind: ErrorKind) -> ErrorEvent {
        ErrorEvent {
            kind,
            message: "problem".into(),
            resource: "/p/.editorconfig".into(),
            span: Span::point(Location::START),
        }
    }

    fn quiet() -> OutputContext {
        OutputContext::new(OutputMode::Quiet, false, false)
    }

    #[test]
    fn test_printer_counts_distinct_warnings() {
        let mut printer = DiagnosticPrinter::new(ErrorPolicy::Log, &quiet());
        printer.on_error(event(ErrorKind::InvalidGlob)).unwrap();
        printer.on_error(event(ErrorKind::InvalidGlob)).unwrap();
        printer.on_error(event(ErrorKind::GlobNotClosed)).unwrap();
        assert_eq!(printer.warnings(), 2);
    }

    #[test]
    fn test_printer_strict_syntax() {
        let mut printer = DiagnosticPrinter::new(ErrorPolicy::StrictSyntax, &quiet());
        assert!(printer.on_error(event(ErrorKind::InvalidPropertyValue)).is_ok());
        assert!(printer.on_error(event(ErrorKind::PropertyValueMissing)).is_err());
    }

    #[test]
    fn test_printer_ignore() {
        let mut printer = DiagnosticPrinter::new(ErrorPolicy::Ignore, &quiet());
        printer.on_error(event(ErrorKind::GlobNotClosed)).unwrap();
        assert_eq!(printer.warnings(), 0);
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = ParseError::Io {
            resource: "/p/.editorconfig".into(),
            source: io,
        };
        assert_eq!(
            error_chain(&error),
            "failed to read /p/.editorconfig: gone"
        );
    }

    #[test]
    fn test_run_result_problems() {
        assert!(!RunResult::default().has_problems());
        assert!(RunResult {
            files_unformatted: 1,
            ..RunResult::default()
        }
        .has_problems());
    }
}
