//! EditorConfig glob patterns
//!
//! Section headers use a small glob dialect: `*`, `**`, `?`, bracket classes,
//! brace alternation and `{n..m}` integer ranges. A pattern is translated
//! once into an anchored [`Regex`]; integer ranges become capture groups
//! whose values are range-checked after the regex matches.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Longest accepted pattern, in characters
pub const MAX_PATTERN_LENGTH: usize = 4096;

/// Regex fragment captured for each `{n..m}` range
const INTEGER_CAPTURE: &str = "([+-]?[0-9]+)";

/// Why a glob never matches anything
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    #[error("glob pattern is {0} characters long (limit {MAX_PATTERN_LENGTH})")]
    TooLong(usize),
    #[error("section header has no closing ']'")]
    NotClosed,
    #[error("glob does not compile: {0}")]
    Compile(String),
}

/// Inclusive bounds of a `{min..max}` brace group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

impl NumericRange {
    /// Leading zeros never match, with or without a sign, so `{-10..10}`
    /// rejects `05`, `-03` and a bare `0`.
    fn accepts(&self, text: &str) -> bool {
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if digits.starts_with('0') {
            return false;
        }
        text.parse::<i64>()
            .is_ok_and(|n| self.min <= n && n <= self.max)
    }
}

/// A compiled section glob.
///
/// Construction never fails: a pattern that cannot be compiled yields a glob
/// that is permanently invalid and matches no path.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    base_dir: String,
    matcher: Result<Regex, GlobError>,
    ranges: Vec<NumericRange>,
}

impl Glob {
    /// Compile `pattern` relative to `base_dir`, the directory holding the
    /// `.editorconfig` file (forward slashes, no trailing slash).
    pub fn new(base_dir: &str, pattern: &str) -> Self {
        let (matcher, ranges) = match compile(base_dir, pattern) {
            Ok((regex, ranges)) => (Ok(regex), ranges),
            Err(e) => (Err(e), Vec::new()),
        };

        Self {
            source: pattern.to_string(),
            base_dir: base_dir.to_string(),
            matcher,
            ranges,
        }
    }

    /// A glob that is invalid from the start, e.g. for an unclosed header.
    pub fn invalid(base_dir: &str, pattern: &str, error: GlobError) -> Self {
        Self {
            source: pattern.to_string(),
            base_dir: base_dir.to_string(),
            matcher: Err(error),
            ranges: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    pub fn is_valid(&self) -> bool {
        self.matcher.is_ok()
    }

    pub fn error(&self) -> Option<&GlobError> {
        self.matcher.as_ref().err()
    }

    /// Integer ranges in the order their brace groups appear
    pub fn ranges(&self) -> &[NumericRange] {
        &self.ranges
    }

    /// The translated regex, if the glob compiled.
    pub fn regex(&self) -> Option<&str> {
        self.matcher.as_ref().ok().map(Regex::as_str)
    }

    /// Check whether the full `path` (forward slashes) matches.
    pub fn matches(&self, path: &str) -> bool {
        let Ok(regex) = &self.matcher else {
            return false;
        };
        let Some(captures) = regex.captures(path) else {
            return false;
        };

        self.ranges.iter().enumerate().all(|(idx, range)| {
            captures
                .get(idx + 1)
                .is_some_and(|m| range.accepts(m.as_str()))
        })
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.base_dir == other.base_dir
    }
}

impl Eq for Glob {}

fn compile(base_dir: &str, pattern: &str) -> Result<(Regex, Vec<NumericRange>), GlobError> {
    let length = pattern.chars().count();
    if length > MAX_PATTERN_LENGTH {
        return Err(GlobError::TooLong(length));
    }

    // `\#` and `\;` are only escaped to keep the parser from seeing a comment
    let pattern = pattern.replace("\\#", "#").replace("\\;", ";");

    let full = if pattern.contains('/') {
        let relative = pattern.strip_prefix('/').unwrap_or(&pattern);
        format!("{}/{}", escape_glob(base_dir.trim_end_matches('/')), relative)
    } else {
        format!("**/{pattern}")
    };

    let chars: Vec<char> = full.chars().collect();
    let mut ranges = Vec::new();
    let body = translate(&chars, &mut ranges);

    let regex = RegexBuilder::new(&format!("^(?s:{body})$"))
        .build()
        .map_err(|e| GlobError::Compile(e.to_string()))?;

    Ok((regex, ranges))
}

/// Backslash-escape glob metacharacters so a directory name matches literally.
fn escape_glob(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '{' | '}' | ',' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn translate(pattern: &[char], ranges: &mut Vec<NumericRange>) -> String {
    let balanced = braces_balanced(pattern);
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut brace_level = 0usize;
    let mut in_brackets = false;
    let mut escaped = false;
    let mut i = 0;

    while i < pattern.len() {
        let c = pattern[i];
        i += 1;

        if escaped {
            escaped = false;
            if in_brackets {
                push_class_literal(&mut out, c);
            } else {
                push_literal(&mut out, c);
            }
            continue;
        }

        if in_brackets {
            match c {
                '\\' => escaped = true,
                ']' => {
                    out.push(']');
                    in_brackets = false;
                }
                '-' => out.push('-'),
                _ => push_class_literal(&mut out, c),
            }
            continue;
        }

        match c {
            '\\' => escaped = true,
            '*' => {
                if pattern.get(i) == Some(&'*') {
                    out.push_str(".*");
                    i += 1;
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '[' => {
                if find_bracket_close(pattern, i).is_some() {
                    if matches!(pattern.get(i), Some('!' | '^')) {
                        out.push_str("[^/");
                        i += 1;
                    } else {
                        out.push('[');
                    }
                    in_brackets = true;
                } else {
                    push_literal(&mut out, '[');
                }
            }
            '{' => match scan_brace(pattern, i) {
                BraceScan::Closed(end) => {
                    let inner = &pattern[i..end];
                    if let Some(range) = numeric_range(inner) {
                        ranges.push(range);
                        out.push_str(INTEGER_CAPTURE);
                    } else {
                        // `{single}` is not an alternation, match it verbatim
                        out.push_str("\\{");
                        out.push_str(&translate(inner, ranges));
                        out.push_str("\\}");
                    }
                    i = end + 1;
                }
                BraceScan::Alternation if balanced => {
                    out.push_str("(?:");
                    brace_level += 1;
                }
                _ => push_literal(&mut out, '{'),
            },
            ',' if brace_level > 0 => out.push('|'),
            '}' if brace_level > 0 => {
                out.push(')');
                brace_level -= 1;
            }
            '/' if pattern[i..].starts_with(&['*', '*', '/']) => {
                // `**` between separators may also match zero directories
                out.push_str("(?:/|/.*/)");
                i += 3;
            }
            _ => push_literal(&mut out, c),
        }
    }

    if escaped {
        push_literal(&mut out, '\\');
    }

    out
}

/// Position of the `]` closing a bracket expression opened just before
/// `start`, or `None` if the expression is unclosed or spans a `/`.
fn find_bracket_close(pattern: &[char], start: usize) -> Option<usize> {
    let mut escaped = false;
    for (j, &c) in pattern.iter().enumerate().skip(start) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '/' => return None,
            ']' => return Some(j),
            _ => {}
        }
    }
    None
}

enum BraceScan {
    /// `}` found at this index with no comma before it
    Closed(usize),
    /// A comma appears before the closing brace
    Alternation,
    Unclosed,
}

fn scan_brace(pattern: &[char], start: usize) -> BraceScan {
    let mut escaped = false;
    for (j, &c) in pattern.iter().enumerate().skip(start) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => return BraceScan::Alternation,
            '}' => return BraceScan::Closed(j),
            _ => {}
        }
    }
    BraceScan::Unclosed
}

fn braces_balanced(pattern: &[char]) -> bool {
    let mut open = 0usize;
    let mut close = 0usize;
    let mut escaped = false;
    for &c in pattern {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }
    open == close
}

/// Parse `n..m` where both ends are optionally signed integers.
fn numeric_range(inner: &[char]) -> Option<NumericRange> {
    let text: String = inner.iter().collect();
    let (min, max) = text.split_once("..")?;
    Some(NumericRange {
        min: parse_signed(min)?,
        max: parse_signed(max)?,
    })
}

fn parse_signed(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn push_literal(out: &mut String, c: char) {
    match c {
        'a'..='z' | 'A'..='Z' | '0'..='9' | ' ' | '_' | '-' => out.push(c),
        '\n' => out.push_str("\\n"),
        _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
    }
}

fn push_class_literal(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        // `regex::escape` covers the class operators `-`, `&&`, `~~` and `[`
        _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
    }
}
