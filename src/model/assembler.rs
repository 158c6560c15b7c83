//! Builds an [`EditorConfig`] from parse events

use crate::glob::{Glob, GlobError};
use crate::parser::{ErrorKind, Event, ParseContext, ParseError, ParseHandler, Span};
use crate::property_type::{ParsedValue, Value, ROOT};

use super::property::Property;
use super::section::{Section, SectionBuilder};
use super::{EditorConfig, ParseOptions};

pub struct ModelAssembler<'a> {
    base_dir: &'a str,
    options: &'a ParseOptions,
    root: Option<bool>,
    sections: Vec<Section>,
    current: Option<SectionBuilder>,
}

impl<'a> ModelAssembler<'a> {
    /// `base_dir` is the directory holding the parsed file.
    pub fn new(base_dir: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            base_dir,
            options,
            root: None,
            sections: Vec::new(),
            current: None,
        }
    }

    pub fn finish(self) -> EditorConfig {
        EditorConfig {
            root: self.root,
            sections: self.sections,
        }
    }

    fn glob(&mut self, text: &str, closed: bool, span: Span, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        let glob = if closed {
            Glob::new(self.base_dir, text)
        } else {
            // already reported as GLOB_NOT_CLOSED
            Glob::invalid(self.base_dir, text, GlobError::NotClosed)
        };

        if let (true, Some(error)) = (closed, glob.error()) {
            ctx.report(ErrorKind::InvalidGlob, format!("[{text}]: {error}"), span)?;
        }

        if let Some(section) = self.current.as_mut() {
            section.set_glob(glob);
        }
        Ok(())
    }

    fn property(&mut self, name: &str, value: &str, span: Span, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        let options = self.options;
        let registry = &options.registry;
        let Some(section) = self.current.as_mut() else {
            return Ok(());
        };

        // `root` only means something before the first header
        if !section.has_glob() && name == ROOT {
            let parsed = registry
                .get(ROOT)
                .map(|ty| ty.parse(&ty.normalize(value)))
                .unwrap_or_else(|| ParsedValue::Invalid(format!("'{value}' is not 'true' or 'false'")));
            match parsed {
                ParsedValue::Valid(Some(Value::Bool(root))) => self.root = Some(root),
                ParsedValue::Valid(_) => {}
                ParsedValue::Invalid(reason) => {
                    ctx.report(ErrorKind::InvalidPropertyValue, format!("root: {reason}"), span)?;
                }
            }
            return Ok(());
        }

        let property = Property::new(name, value, registry);
        if let Some(reason) = property.error() {
            ctx.report(ErrorKind::InvalidPropertyValue, format!("{name}: {reason}"), span)?;
        }
        section.property(property);
        Ok(())
    }

    fn end_section(&mut self) {
        let Some(section) = self.current.take() else {
            return;
        };
        // a preamble holding only `root` leaves no section behind
        if !section.has_glob() && section.is_empty() {
            return;
        }
        self.sections
            .push(section.build(&self.options.registry, self.options.version));
    }
}

impl ParseHandler for ModelAssembler<'_> {
    fn handle(&mut self, event: Event<'_>, span: Span, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        match event {
            Event::StartSection => {
                self.end_section();
                self.current = Some(SectionBuilder::new(None));
            }
            Event::Glob { text, closed } => self.glob(text, closed, span, ctx)?,
            Event::Property { name, value } => self.property(name, value, span, ctx)?,
            Event::EndSection | Event::EndDocument => self.end_section(),
            Event::StartDocument | Event::BlankLine | Event::Comment { .. } => {}
        }
        Ok(())
    }
}
