//! Sections and the indentation defaulting rules

use crate::glob::Glob;
use crate::property_type::{PropertyTypeRegistry, INDENT_SIZE, INDENT_STYLE, TAB_WIDTH, UNSET};
use crate::version::Version;

use super::property::{Properties, Property};

/// A glob and the properties that apply where it matches.
///
/// A section without a glob is the anonymous preamble section and applies
/// to every path.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    glob: Option<Glob>,
    properties: Properties,
}

impl Section {
    pub fn glob(&self) -> Option<&Glob> {
        self.glob.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// `path` is an absolute path with `/` separators.
    pub fn matches(&self, path: &str) -> bool {
        match &self.glob {
            None => true,
            Some(glob) if !glob.is_valid() => false,
            Some(glob) if glob.source().is_empty() => true,
            Some(glob) => glob.matches(path),
        }
    }
}

/// Collects a section's properties; consumed by [`SectionBuilder::build`].
#[derive(Debug, Default)]
pub struct SectionBuilder {
    glob: Option<Glob>,
    properties: Properties,
}

impl SectionBuilder {
    pub fn new(glob: Option<Glob>) -> Self {
        Self {
            glob,
            properties: Properties::new(),
        }
    }

    pub fn set_glob(&mut self, glob: Glob) {
        self.glob = Some(glob);
    }

    pub fn has_glob(&self) -> bool {
        self.glob.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Later properties replace earlier ones of the same name.
    pub fn property(&mut self, property: Property) -> &mut Self {
        self.properties.insert(property);
        self
    }

    pub fn build(mut self, registry: &PropertyTypeRegistry, version: Version) -> Section {
        apply_indent_defaults(&mut self.properties, registry, version);
        Section {
            glob: self.glob,
            properties: self.properties,
        }
    }
}

/// Fill in `indent_size` and `tab_width` from each other.
///
/// - `indent_style = tab` without `indent_size` gives `indent_size = tab`
///   (from version 0.10.0)
/// - `indent_size` other than `tab` or `unset` without `tab_width` gives a
///   matching `tab_width`
/// - `indent_size = tab` with a `tab_width` takes the `tab_width` value
fn apply_indent_defaults(
    properties: &mut Properties,
    registry: &PropertyTypeRegistry,
    version: Version,
) {
    let value_of = |props: &Properties, name| props.get(name).map(|p| p.value().to_string());

    if version >= Version::INDENT_SIZE_TAB
        && value_of(properties, INDENT_STYLE).as_deref() == Some("tab")
        && !properties.contains(INDENT_SIZE)
    {
        properties.insert(Property::derived(INDENT_SIZE, "tab", registry));
    }

    if let Some(size) = value_of(properties, INDENT_SIZE) {
        if size != "tab" && size != UNSET && !properties.contains(TAB_WIDTH) {
            properties.insert(Property::derived(TAB_WIDTH, &size, registry));
        }
    }

    if value_of(properties, INDENT_SIZE).as_deref() == Some("tab") {
        if let Some(width) = value_of(properties, TAB_WIDTH) {
            properties.insert(Property::derived(INDENT_SIZE, &width, registry));
        }
    }
}
