//! The parsed form of one `.editorconfig` file

mod assembler;
mod property;
mod section;

pub use assembler::ModelAssembler;
pub use property::{Properties, Property, PropertyError};
pub use section::{Section, SectionBuilder};

use std::fmt;
use std::sync::Arc;

use crate::parser::{self, ErrorHandler, ParseError};
use crate::property_type::PropertyTypeRegistry;
use crate::resource::Resource;
use crate::version::Version;

/// How property values are interpreted while building the model
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub registry: Arc<PropertyTypeRegistry>,
    pub version: Version,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            registry: Arc::new(PropertyTypeRegistry::standard()),
            version: Version::CURRENT,
        }
    }
}

/// One `.editorconfig` document
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    root: Option<bool>,
    sections: Vec<Section>,
}

impl EditorConfig {
    /// Parse `resource`; globs are anchored at its parent directory.
    pub fn parse(
        resource: &dyn Resource,
        options: &ParseOptions,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<Self, ParseError> {
        let base_dir = resource
            .parent()
            .map(|dir| dir.path().to_string())
            .unwrap_or_default();

        let mut assembler = ModelAssembler::new(&base_dir, options);
        parser::parse(resource, &mut assembler, error_handler)?;
        Ok(assembler.finish())
    }

    /// Parse `text` as if it were a file in `base_dir`.
    pub fn parse_str(
        base_dir: &str,
        text: &str,
        options: &ParseOptions,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<Self, ParseError> {
        let resource = if base_dir == "/" {
            "/.editorconfig".to_string()
        } else {
            format!("{base_dir}/.editorconfig")
        };

        let mut assembler = ModelAssembler::new(base_dir, options);
        parser::parse_str(&resource, text, &mut assembler, error_handler)?;
        Ok(assembler.finish())
    }

    /// The declared `root` flag, `None` when the file does not set it
    pub fn root(&self) -> Option<bool> {
        self.root
    }

    pub fn is_root(&self) -> bool {
        self.root == Some(true)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Canonical formatting: `name = value` with single spaces, a blank line
/// between sections, comments and derived properties dropped.
impl fmt::Display for EditorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        if let Some(root) = self.root {
            writeln!(f, "root = {root}")?;
            first = false;
        }

        for section in &self.sections {
            if !first {
                writeln!(f)?;
            }
            first = false;

            if let Some(glob) = section.glob() {
                match glob.error() {
                    Some(crate::glob::GlobError::NotClosed) => writeln!(f, "[{}", glob.source())?,
                    _ => writeln!(f, "[{}]", glob.source())?,
                }
            }
            for property in section.properties().iter().filter(|p| !p.is_derived()) {
                writeln!(f, "{} = {}", property.name(), property.source_value())?;
            }
        }

        Ok(())
    }
}
