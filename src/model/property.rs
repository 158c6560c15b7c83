//! Properties and the ordered property map

use std::sync::Arc;

use thiserror::Error;

use crate::property_type::{FromValue, ParsedValue, PropertyType, PropertyTypeRegistry, Value, UNSET};

/// Typed access to a property failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("invalid value '{value}' for property '{name}': {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
    #[error("property '{name}' = '{value}' cannot be read as {expected}")]
    WrongType {
        name: String,
        value: String,
        expected: &'static str,
    },
}

/// A `name = value` pair with its parsed value.
///
/// Unregistered names are kept verbatim and read as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    source_value: String,
    value: String,
    property_type: Option<Arc<PropertyType>>,
    parsed: Option<Value>,
    error: Option<String>,
    derived: bool,
}

impl Property {
    /// Build a property, normalizing and parsing `source_value` with the
    /// type registered under `name`.
    pub fn new(name: &str, source_value: &str, registry: &PropertyTypeRegistry) -> Self {
        let name = name.to_lowercase();
        let property_type = registry.get(&name).cloned();

        let (value, parsed, error) = match &property_type {
            Some(ty) => {
                let value = ty.normalize(source_value);
                match ty.parse(&value) {
                    ParsedValue::Valid(parsed) => (value, parsed, None),
                    ParsedValue::Invalid(reason) => (value, None, Some(reason)),
                }
            }
            None => (
                source_value.to_string(),
                Some(Value::Text(source_value.to_string())),
                None,
            ),
        };

        Self {
            name,
            source_value: source_value.to_string(),
            value,
            property_type,
            parsed,
            error,
            derived: false,
        }
    }

    /// A property synthesized from other properties rather than read from text
    pub(crate) fn derived(name: &str, value: &str, registry: &PropertyTypeRegistry) -> Self {
        Self {
            derived: true,
            ..Self::new(name, value, registry)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value exactly as written
    pub fn source_value(&self) -> &str {
        &self.source_value
    }

    /// The normalized value
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn property_type(&self) -> Option<&Arc<PropertyType>> {
        self.property_type.as_ref()
    }

    pub fn parsed(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Why the value was rejected, if it was
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_unset(&self) -> bool {
        self.value.eq_ignore_ascii_case(UNSET)
    }

    /// Synthesized by the indentation defaulting rules
    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Read the value as `T`; fails for invalid values and mismatched types.
    pub fn value_as<T: FromValue>(&self) -> Result<T, PropertyError> {
        if let Some(reason) = &self.error {
            return Err(PropertyError::Invalid {
                name: self.name.clone(),
                value: self.source_value.clone(),
                reason: reason.clone(),
            });
        }

        T::from_value(self.parsed.as_ref(), &self.value).ok_or_else(|| PropertyError::WrongType {
            name: self.name.clone(),
            value: self.value.clone(),
            expected: T::EXPECTED,
        })
    }
}

/// Properties keyed by name, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `property`, replacing one of the same name in place.
    pub fn insert(&mut self, property: Property) -> Option<Property> {
        match self.entries.iter_mut().find(|p| p.name == property.name) {
            Some(slot) => Some(std::mem::replace(slot, property)),
            None => {
                self.entries.push(property);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Property> {
        let idx = self
            .entries
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(idx))
    }

    pub fn retain(&mut self, keep: impl FnMut(&Property) -> bool) {
        self.entries.retain(keep);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for property in iter {
            properties.insert(property);
        }
        properties
    }
}
