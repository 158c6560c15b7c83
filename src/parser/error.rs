//! Parse error reporting
//!
//! Problems found while parsing are reported as [`ErrorEvent`]s to an
//! [`ErrorHandler`], which decides whether parsing continues. Syntax errors
//! skip the offending line; semantic errors (bad globs, bad values) are kept
//! in the model as never-matching globs or invalid properties.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::event::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Section header without an unescaped closing `]`
    GlobNotClosed,
    /// Property line starting with `=` or `:`
    PropertyNameMissing,
    /// Property name not followed by `=` or `:`
    PropertyAssignmentMissing,
    /// Property with nothing after the separator
    PropertyValueMissing,
    /// Control character inside a name or value
    InvalidCharacter,
    InvalidGlob,
    InvalidPropertyValue,
}

impl ErrorKind {
    pub fn is_syntax_error(self) -> bool {
        !matches!(self, ErrorKind::InvalidGlob | ErrorKind::InvalidPropertyValue)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::GlobNotClosed => "GLOB_NOT_CLOSED",
            ErrorKind::PropertyNameMissing => "PROPERTY_NAME_MISSING",
            ErrorKind::PropertyAssignmentMissing => "PROPERTY_ASSIGNMENT_MISSING",
            ErrorKind::PropertyValueMissing => "PROPERTY_VALUE_MISSING",
            ErrorKind::InvalidCharacter => "INVALID_CHARACTER",
            ErrorKind::InvalidGlob => "INVALID_GLOB",
            ErrorKind::InvalidPropertyValue => "INVALID_PROPERTY_VALUE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found at a location in a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{resource}:{}: {message} [{kind}]", .span.start)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub message: String,
    pub resource: String,
    pub span: Span,
}

#[derive(Debug, Error)]
pub enum ParseError {
    /// The error handler chose to abort on this event
    #[error(transparent)]
    Rejected(#[from] ErrorEvent),
    #[error("failed to read {resource}")]
    Io {
        resource: String,
        #[source]
        source: io::Error,
    },
}

/// Decides what happens with each reported problem.
///
/// Return `Ok(())` to keep parsing, or an error to abort.
pub trait ErrorHandler {
    fn on_error(&mut self, event: ErrorEvent) -> Result<(), ParseError>;
}

/// Built-in error handling policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Drop every event
    Ignore,
    /// Log every event as a warning and continue
    #[default]
    Log,
    /// Abort on syntax errors, log semantic ones
    StrictSyntax,
    /// Abort on any event
    Strict,
}

impl ErrorHandler for ErrorPolicy {
    fn on_error(&mut self, event: ErrorEvent) -> Result<(), ParseError> {
        match self {
            ErrorPolicy::Ignore => Ok(()),
            ErrorPolicy::Strict => Err(event.into()),
            ErrorPolicy::StrictSyntax if event.kind.is_syntax_error() => Err(event.into()),
            ErrorPolicy::Log | ErrorPolicy::StrictSyntax => {
                tracing::warn!(
                    resource = %event.resource,
                    line = event.span.start.line,
                    column = event.span.start.column,
                    kind = %event.kind,
                    "{}",
                    event.message
                );
                Ok(())
            }
        }
    }
}

/// Records every event and keeps parsing
#[derive(Debug, Default)]
pub struct CollectingErrorHandler {
    events: Vec<ErrorEvent>,
}

impl CollectingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ErrorEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ErrorEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn on_error(&mut self, event: ErrorEvent) -> Result<(), ParseError> {
        self.events.push(event);
        Ok(())
    }
}
