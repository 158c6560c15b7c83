//! Known EditorConfig properties and how their values are parsed

use std::fmt;
use std::sync::Arc;

pub const INDENT_STYLE: &str = "indent_style";
pub const INDENT_SIZE: &str = "indent_size";
pub const TAB_WIDTH: &str = "tab_width";
pub const END_OF_LINE: &str = "end_of_line";
pub const CHARSET: &str = "charset";
pub const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
pub const INSERT_FINAL_NEWLINE: &str = "insert_final_newline";
pub const ROOT: &str = "root";

/// Value that removes a property set by a farther `.editorconfig`
pub const UNSET: &str = "unset";

/// A parsed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Integer(u32),
    IndentStyle(IndentStyle),
    EndOfLine(EndOfLine),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentStyle {
    Space,
    Tab,
}

impl IndentStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            IndentStyle::Space => "space",
            IndentStyle::Tab => "tab",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndOfLine {
    Cr,
    Crlf,
    Lf,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Cr => "cr",
            EndOfLine::Crlf => "crlf",
            EndOfLine::Lf => "lf",
        }
    }

    /// The line terminator this value stands for
    pub fn terminator(self) -> &'static str {
        match self {
            EndOfLine::Cr => "\r",
            EndOfLine::Crlf => "\r\n",
            EndOfLine::Lf => "\n",
        }
    }
}

/// Outcome of running a property parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    /// Accepted. `None` for values that carry no typed form, such as
    /// `indent_size = tab` or `unset`.
    Valid(Option<Value>),
    /// Rejected, with a human-readable reason
    Invalid(String),
}

pub type ValueParser = fn(&str) -> ParsedValue;
pub type Normalizer = fn(&str) -> String;

/// A recognized property: its name, parser and normalization.
#[derive(Debug, Clone)]
pub struct PropertyType {
    name: String,
    description: String,
    parser: ValueParser,
    normalizer: Option<Normalizer>,
    possible_values: Vec<&'static str>,
}

impl PropertyType {
    pub fn new(name: &str, description: &str, parser: ValueParser) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            description: description.to_string(),
            parser,
            normalizer: None,
            possible_values: Vec::new(),
        }
    }

    /// Lower-case values before parsing
    pub fn lowercased(mut self) -> Self {
        self.normalizer = Some(str::to_lowercase);
        self
    }

    pub fn normalized_with(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Canonical values, for documentation only
    pub fn with_possible_values(mut self, values: &[&'static str]) -> Self {
        self.possible_values = values.to_vec();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn possible_values(&self) -> &[&'static str] {
        &self.possible_values
    }

    pub fn normalize(&self, value: &str) -> String {
        match self.normalizer {
            Some(normalize) => normalize(value),
            None => value.to_string(),
        }
    }

    /// Parse an already normalized value. `unset` is valid for every type.
    pub fn parse(&self, value: &str) -> ParsedValue {
        if value.eq_ignore_ascii_case(UNSET) {
            return ParsedValue::Valid(None);
        }
        (self.parser)(value)
    }
}

impl PartialEq for PropertyType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Lets a type stand in for its name in lookups
impl AsRef<str> for PropertyType {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ===========================================
// Value parsers
// ===========================================

pub fn parse_bool(value: &str) -> ParsedValue {
    if value.eq_ignore_ascii_case("true") {
        ParsedValue::Valid(Some(Value::Bool(true)))
    } else if value.eq_ignore_ascii_case("false") {
        ParsedValue::Valid(Some(Value::Bool(false)))
    } else {
        ParsedValue::Invalid(format!("'{value}' is not 'true' or 'false'"))
    }
}

pub fn parse_positive_integer(value: &str) -> ParsedValue {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => ParsedValue::Valid(Some(Value::Integer(n))),
        _ => ParsedValue::Invalid(format!("'{value}' is not a positive integer")),
    }
}

fn parse_indent_size(value: &str) -> ParsedValue {
    if value == "tab" {
        return ParsedValue::Valid(None);
    }
    parse_positive_integer(value)
}

fn parse_indent_style(value: &str) -> ParsedValue {
    let style = [IndentStyle::Space, IndentStyle::Tab]
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(value));
    match style {
        Some(style) => ParsedValue::Valid(Some(Value::IndentStyle(style))),
        None => ParsedValue::Invalid(format!("'{value}' is not one of space, tab")),
    }
}

fn parse_end_of_line(value: &str) -> ParsedValue {
    let eol = [EndOfLine::Cr, EndOfLine::Crlf, EndOfLine::Lf]
        .into_iter()
        .find(|e| e.as_str().eq_ignore_ascii_case(value));
    match eol {
        Some(eol) => ParsedValue::Valid(Some(Value::EndOfLine(eol))),
        None => ParsedValue::Invalid(format!("'{value}' is not one of cr, crlf, lf")),
    }
}

pub fn parse_text(value: &str) -> ParsedValue {
    ParsedValue::Valid(Some(Value::Text(value.to_string())))
}

// ===========================================
// Typed access
// ===========================================

/// Rust types a property value can be read as
pub trait FromValue: Sized {
    /// Short name used in error messages
    const EXPECTED: &'static str;

    /// `value` is the parsed form if any; `text` the normalized source text.
    fn from_value(value: Option<&Value>, text: &str) -> Option<Self>;
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Option<&Value>, _text: &str) -> Option<Self> {
        match value {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "positive integer";

    fn from_value(value: Option<&Value>, _text: &str) -> Option<Self> {
        match value {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for IndentStyle {
    const EXPECTED: &'static str = "indent style";

    fn from_value(value: Option<&Value>, _text: &str) -> Option<Self> {
        match value {
            Some(Value::IndentStyle(style)) => Some(*style),
            _ => None,
        }
    }
}

impl FromValue for EndOfLine {
    const EXPECTED: &'static str = "end of line";

    fn from_value(value: Option<&Value>, _text: &str) -> Option<Self> {
        match value {
            Some(Value::EndOfLine(eol)) => Some(*eol),
            _ => None,
        }
    }
}

/// Any value reads as its text
impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(_value: Option<&Value>, text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

// ===========================================
// Registry
// ===========================================

/// Lookup table of property types, keyed case-insensitively by name.
///
/// Immutable once shared; wrap in an `Arc` to use across threads.
#[derive(Debug, Clone)]
pub struct PropertyTypeRegistry {
    types: Vec<Arc<PropertyType>>,
}

impl PropertyTypeRegistry {
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// The standard EditorConfig properties
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.register(
            PropertyType::new(
                INDENT_STYLE,
                "Indentation with hard tabs or soft spaces",
                parse_indent_style,
            )
            .lowercased()
            .with_possible_values(&["tab", "space"]),
        );
        registry.register(
            PropertyType::new(
                INDENT_SIZE,
                "Columns per indentation level, or 'tab' to use tab_width",
                parse_indent_size,
            )
            .lowercased()
            .with_possible_values(&["1", "2", "3", "4", "5", "6", "7", "8", "tab"]),
        );
        registry.register(
            PropertyType::new(
                TAB_WIDTH,
                "Columns used to represent a tab character",
                parse_positive_integer,
            )
            .with_possible_values(&["1", "2", "3", "4", "5", "6", "7", "8"]),
        );
        registry.register(
            PropertyType::new(END_OF_LINE, "Line ending style", parse_end_of_line)
                .lowercased()
                .with_possible_values(&["lf", "crlf", "cr"]),
        );
        registry.register(
            PropertyType::new(CHARSET, "File character encoding", parse_text)
                .lowercased()
                .with_possible_values(&["latin1", "utf-8", "utf-8-bom", "utf-16be", "utf-16le"]),
        );
        registry.register(
            PropertyType::new(
                TRIM_TRAILING_WHITESPACE,
                "Remove whitespace before line endings",
                parse_bool,
            )
            .lowercased()
            .with_possible_values(&["true", "false"]),
        );
        registry.register(
            PropertyType::new(
                INSERT_FINAL_NEWLINE,
                "End the file with a newline",
                parse_bool,
            )
            .lowercased()
            .with_possible_values(&["true", "false"]),
        );
        registry.register(
            PropertyType::new(
                ROOT,
                "Stop searching parent directories for .editorconfig files",
                parse_bool,
            )
            .with_possible_values(&["true", "false"]),
        );

        registry
    }

    /// Add a type, replacing any type of the same name.
    pub fn register(&mut self, property_type: PropertyType) {
        let property_type = Arc::new(property_type);
        match self
            .types
            .iter_mut()
            .find(|t| t.name() == property_type.name())
        {
            Some(slot) => *slot = property_type,
            None => self.types.push(property_type),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PropertyType>> {
        self.types
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PropertyType>> {
        self.types.iter()
    }
}

impl Default for PropertyTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
