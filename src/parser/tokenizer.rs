//! Character-level `.editorconfig` tokenizer
//!
//! The input is buffered once and walked with one character of lookahead
//! (`current`) and one of lookbehind (`last`). Every physical line is
//! classified by its first non-blank character and turned into events.

use super::error::{ErrorKind, ParseError};
use super::event::{Event, Location, ParseContext, ParseHandler, Span};

const BOM: char = '\u{FEFF}';

pub(super) struct Tokenizer<'h, 'c> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    last: Option<char>,
    section_open: bool,
    handler: &'h mut dyn ParseHandler,
    ctx: ParseContext<'c>,
}

impl<'h, 'c> Tokenizer<'h, 'c> {
    pub(super) fn new(text: &str, handler: &'h mut dyn ParseHandler, ctx: ParseContext<'c>) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            last: None,
            section_open: false,
            handler,
            ctx,
        }
    }

    pub(super) fn run(mut self) -> Result<(), ParseError> {
        self.emit(Event::StartDocument, Span::point(self.location()))?;

        if self.current() == Some(BOM) {
            self.advance();
        }

        while self.current().is_some() {
            self.parse_line()?;
        }

        self.close_section()?;
        self.emit(Event::EndDocument, Span::point(self.location()))
    }

    // ===========================================
    // Cursor
    // ===========================================

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn location(&self) -> Location {
        Location {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) {
        let Some(c) = self.current() else {
            return;
        };
        self.pos += 1;
        self.last = Some(c);

        // A CR directly followed by LF is counted with the LF
        let line_break = c == '\n' || (c == '\r' && self.current() != Some('\n'));
        if line_break {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Move the cursor back to `pos` on the current line.
    fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.column -= self.pos - pos;
        self.pos = pos;
        self.last = pos.checked_sub(1).and_then(|p| self.chars.get(p).copied());
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current(), None | Some('\n' | '\r'))
    }

    fn skip_blanks(&mut self) {
        while matches!(self.current(), Some(' ' | '\t')) {
            self.advance();
        }
    }

    fn consume_line_break(&mut self) {
        if self.current() == Some('\r') {
            self.advance();
        }
        if self.current() == Some('\n') {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        self.consume_line_break();
    }

    // ===========================================
    // Events
    // ===========================================

    fn emit(&mut self, event: Event<'_>, span: Span) -> Result<(), ParseError> {
        tracing::trace!(?event, at = %span.start, "parse event");
        self.handler.handle(event, span, &mut self.ctx)
    }

    fn report(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) -> Result<(), ParseError> {
        self.ctx.report(kind, message, span)
    }

    fn open_section(&mut self, at: Location) -> Result<(), ParseError> {
        self.close_section()?;
        self.section_open = true;
        self.emit(Event::StartSection, Span::point(at))
    }

    fn close_section(&mut self) -> Result<(), ParseError> {
        if self.section_open {
            self.section_open = false;
            self.emit(Event::EndSection, Span::point(self.location()))?;
        }
        Ok(())
    }

    // ===========================================
    // Lines
    // ===========================================

    fn parse_line(&mut self) -> Result<(), ParseError> {
        self.skip_blanks();
        let start = self.location();

        match self.current() {
            // blanks at the very end of the input
            None => Ok(()),
            Some('\n' | '\r') => {
                self.consume_line_break();
                self.emit(Event::BlankLine, Span::point(start))
            }
            Some('#' | ';') => {
                self.parse_comment()?;
                self.consume_line_break();
                Ok(())
            }
            Some('[') => self.parse_section_header(),
            Some(_) => self.parse_property(),
        }
    }

    /// Read a comment from its marker to the end of the line.
    fn parse_comment(&mut self) -> Result<(), ParseError> {
        let start = self.location();
        self.advance();

        let mut text = String::new();
        while let Some(c) = self.current() {
            if c == '\n' || c == '\r' {
                break;
            }
            text.push(c);
            self.advance();
        }

        self.emit(Event::Comment { text: &text }, Span::new(start, self.location()))
    }

    fn parse_section_header(&mut self) -> Result<(), ParseError> {
        let start = self.location();
        self.open_section(start)?;
        self.advance();

        let glob_start = self.pos;
        let glob_start_loc = self.location();
        while !self.at_line_end() {
            self.advance();
        }
        let line_end = self.location();

        let raw = &self.chars[glob_start..self.pos];
        match find_header_close(raw) {
            Some(close) => {
                let text: String = raw[..close].iter().collect();
                self.rewind(glob_start + close);
                let glob_end = self.location();
                self.advance();

                self.emit(
                    Event::Glob {
                        text: &text,
                        closed: true,
                    },
                    Span::new(glob_start_loc, glob_end),
                )?;

                self.skip_blanks();
                if matches!(self.current(), Some('#' | ';')) {
                    self.parse_comment()?;
                }
                self.skip_line();
            }
            None => {
                let text: String = raw.iter().collect();
                self.report(
                    ErrorKind::GlobNotClosed,
                    "section header is missing its closing ']'",
                    Span::new(start, line_end),
                )?;
                self.emit(
                    Event::Glob {
                        text: text.trim_end(),
                        closed: false,
                    },
                    Span::new(glob_start_loc, line_end),
                )?;
                self.consume_line_break();
            }
        }

        Ok(())
    }

    fn parse_property(&mut self) -> Result<(), ParseError> {
        let start = self.location();
        if !self.section_open {
            self.open_section(start)?;
        }

        let mut name = String::new();
        while let Some(c) = self.current() {
            if matches!(c, '=' | ':' | ' ' | '\t' | '\n' | '\r') {
                break;
            }
            if c.is_control() {
                return self.invalid_character(c);
            }
            name.push(c);
            self.advance();
        }

        if name.is_empty() {
            self.report(
                ErrorKind::PropertyNameMissing,
                "property has no name",
                Span::new(start, self.location()),
            )?;
            self.skip_line();
            return Ok(());
        }
        let name = name.to_lowercase();

        self.skip_blanks();
        if matches!(self.current(), Some('=' | ':')) {
            self.advance();
        } else {
            let at = self.location();
            self.report(
                ErrorKind::PropertyAssignmentMissing,
                format!("expected '=' or ':' after property name '{name}'"),
                Span::new(at, at),
            )?;
            self.skip_line();
            return Ok(());
        }

        self.skip_blanks();
        let mut value = String::new();
        let mut value_end = self.location();
        let mut escaped = false;
        let mut inline_comment = false;
        while let Some(c) = self.current() {
            if c == '\n' || c == '\r' {
                break;
            }
            // `;` and `#` only open a comment after whitespace
            if !escaped && matches!(c, ';' | '#') && matches!(self.last, Some(' ' | '\t')) {
                inline_comment = true;
                break;
            }
            if c.is_control() && c != '\t' {
                return self.invalid_character(c);
            }
            escaped = !escaped && c == '\\';
            value.push(c);
            self.advance();
            if c != ' ' && c != '\t' {
                value_end = self.location();
            }
        }
        value.truncate(value.trim_end_matches([' ', '\t']).len());

        if value.is_empty() {
            self.report(
                ErrorKind::PropertyValueMissing,
                format!("property '{name}' has no value"),
                Span::new(start, self.location()),
            )?;
        } else {
            self.emit(
                Event::Property {
                    name: &name,
                    value: &value,
                },
                Span::new(start, value_end),
            )?;
        }

        if inline_comment {
            self.parse_comment()?;
        }
        self.skip_line();
        Ok(())
    }

    fn invalid_character(&mut self, c: char) -> Result<(), ParseError> {
        let at = self.location();
        self.advance();
        self.report(
            ErrorKind::InvalidCharacter,
            format!("unexpected control character U+{:04X}", c as u32),
            Span::new(at, self.location()),
        )?;
        self.skip_line();
        Ok(())
    }
}

/// Index of the `]` closing a section header within the rest of its line.
///
/// An unescaped `;` or `#` after whitespace starts an inline comment; the
/// last unescaped `]` before it closes the header. Brackets inside the
/// comment never do.
fn find_header_close(raw: &[char]) -> Option<usize> {
    let mut close = None;
    let mut escaped = false;
    for (i, &c) in raw.iter().enumerate() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ';' | '#' if i > 0 && matches!(raw[i - 1], ' ' | '\t') => break,
            ']' => close = Some(i),
            _ => {}
        }
    }
    close
}
