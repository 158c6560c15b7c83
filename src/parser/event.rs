//! Parse events and source locations

use std::fmt;

use super::error::{ErrorEvent, ErrorHandler, ErrorKind, ParseError};

/// A position in the parsed text.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const START: Location = Location {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)` of an event in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn point(at: Location) -> Self {
        Self { start: at, end: at }
    }
}

/// Structural events, emitted in document order:
///
/// ```text
/// StartDocument
///   { BlankLine | Comment | StartSection [Glob] Property* EndSection }*
/// EndDocument
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    StartDocument,
    BlankLine,
    /// Comment text after the `#` or `;` marker, untrimmed
    Comment { text: &'a str },
    StartSection,
    /// Section header text between `[` and `]`. `closed` is false when the
    /// header had no closing bracket; `text` is then the rest of the line.
    Glob { text: &'a str, closed: bool },
    /// A `name = value` pair. The name is lower-cased; the value is the raw
    /// source text with surrounding whitespace removed.
    Property { name: &'a str, value: &'a str },
    EndSection,
    EndDocument,
}

/// Receives parse events.
///
/// Returning an error aborts the parse and propagates out of
/// [`parse`](super::parse).
pub trait ParseHandler {
    fn handle(
        &mut self,
        event: Event<'_>,
        span: Span,
        ctx: &mut ParseContext<'_>,
    ) -> Result<(), ParseError>;
}

/// Per-parse state shared with handlers: the resource being parsed and the
/// error handler deciding whether problems abort the parse.
pub struct ParseContext<'a> {
    resource: &'a str,
    error_handler: &'a mut dyn ErrorHandler,
}

impl<'a> ParseContext<'a> {
    pub fn new(resource: &'a str, error_handler: &'a mut dyn ErrorHandler) -> Self {
        Self {
            resource,
            error_handler,
        }
    }

    pub fn resource(&self) -> &str {
        self.resource
    }

    /// Hand a problem to the error handler.
    pub fn report(
        &mut self,
        kind: ErrorKind,
        message: impl Into<String>,
        span: Span,
    ) -> Result<(), ParseError> {
        self.error_handler.on_error(ErrorEvent {
            kind,
            message: message.into(),
            resource: self.resource.to_string(),
            span,
        })
    }
}
