//! Resolves the properties that apply to a file
//!
//! The resolver walks from the file's directory towards the filesystem
//! root collecting `.editorconfig` documents, then applies their matching
//! sections farthest first so that the closest file wins.

use std::sync::Arc;

use thiserror::Error;

use crate::model::{EditorConfig, ParseOptions, Properties, Property, PropertyError};
use crate::parser::{ErrorHandler, ErrorPolicy, ParseError};
use crate::property_type::{FromValue, PropertyTypeRegistry};
use crate::resource::Resource;
use crate::version::Version;

pub const DEFAULT_FILE_NAME: &str = ".editorconfig";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
}

/// Turns a config resource into a document.
///
/// Implement this to add caching; [`ParsingLoader`] parses every time.
pub trait Loader: Send + Sync {
    fn load(
        &self,
        resource: &dyn Resource,
        options: &ParseOptions,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<Arc<EditorConfig>, ParseError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParsingLoader;

impl Loader for ParsingLoader {
    fn load(
        &self,
        resource: &dyn Resource,
        options: &ParseOptions,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<Arc<EditorConfig>, ParseError> {
        EditorConfig::parse(resource, options, error_handler).map(Arc::new)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Name of the config files to look for
    pub file_name: String,
    /// Directories the upward walk never leaves
    pub root_dirs: Vec<String>,
    /// Keep properties whose value is `unset`
    pub keep_unset: bool,
    pub error_policy: ErrorPolicy,
    pub version: Version,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            root_dirs: Vec::new(),
            keep_unset: false,
            error_policy: ErrorPolicy::default(),
            version: Version::CURRENT,
        }
    }
}

pub struct Resolver {
    config: ResolverConfig,
    options: ParseOptions,
    loader: Box<dyn Loader>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_registry(config, Arc::new(PropertyTypeRegistry::standard()))
    }

    pub fn with_registry(config: ResolverConfig, registry: Arc<PropertyTypeRegistry>) -> Self {
        let options = ParseOptions {
            registry,
            version: config.version,
        };
        Self {
            config,
            options,
            loader: Box::new(ParsingLoader),
        }
    }

    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PropertyTypeRegistry> {
        &self.options.registry
    }

    /// Resolve `target`, handling parse problems with the configured policy.
    pub fn resolve(&self, target: &dyn Resource) -> Result<ResolvedProperties, ResolveError> {
        let mut policy = self.config.error_policy;
        self.resolve_with(target, &mut policy)
    }

    pub fn resolve_with(
        &self,
        target: &dyn Resource,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<ResolvedProperties, ResolveError> {
        let documents = self.collect(target, error_handler)?;

        let mut properties = Properties::new();
        for (_, document) in documents.iter().rev() {
            for section in document.sections() {
                if !section.matches(target.path()) {
                    continue;
                }
                for property in section.properties() {
                    properties.insert(property.clone());
                }
            }
        }

        // indentation defaults were applied per section while parsing
        if !self.config.keep_unset {
            properties.retain(|p| !p.is_unset());
        }

        tracing::debug!(
            file = target.path(),
            files = documents.len(),
            properties = properties.len(),
            "resolved"
        );

        Ok(ResolvedProperties {
            properties,
            editorconfigs: documents.into_iter().map(|(path, _)| path).collect(),
        })
    }

    /// Documents that apply to `target`, closest first
    fn collect(
        &self,
        target: &dyn Resource,
        error_handler: &mut dyn ErrorHandler,
    ) -> Result<Vec<(String, Arc<EditorConfig>)>, ResolveError> {
        let mut documents = Vec::new();
        let mut dir = target.parent();

        while let Some(current) = dir {
            let candidate = current.resolve(&self.config.file_name);
            if candidate.exists() {
                let document = self
                    .loader
                    .load(candidate.as_ref(), &self.options, error_handler)
                    .map_err(|source| ResolveError::Parse {
                        path: candidate.path().to_string(),
                        source,
                    })?;
                tracing::debug!(path = candidate.path(), root = ?document.root(), "loaded");

                let is_root = document.is_root();
                documents.push((candidate.path().to_string(), document));
                if is_root {
                    tracing::debug!(path = candidate.path(), "stopping at root = true");
                    break;
                }
            }

            if self.config.root_dirs.iter().any(|root| root == current.path()) {
                tracing::debug!(dir = current.path(), "stopping at configured root directory");
                break;
            }
            dir = current.parent();
        }

        Ok(documents)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

/// The effective properties for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedProperties {
    properties: Properties,
    editorconfigs: Vec<String>,
}

impl ResolvedProperties {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Paths of the files that were read, closest first
    pub fn editorconfigs(&self) -> &[String] {
        &self.editorconfigs
    }

    /// Look up a property by name or by its [`PropertyType`].
    ///
    /// [`PropertyType`]: crate::property_type::PropertyType
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Property> {
        self.properties.get(key.as_ref())
    }

    /// Read `key` as `T`, or `default` when it is absent.
    ///
    /// Invalid values and values that have no `T` form also give `default`
    /// unless `throw_on_invalid` is set.
    pub fn get_value<T: FromValue>(
        &self,
        key: impl AsRef<str>,
        default: T,
        throw_on_invalid: bool,
    ) -> Result<T, PropertyError> {
        let Some(property) = self.properties.get(key.as_ref()) else {
            return Ok(default);
        };
        match property.value_as::<T>() {
            Ok(value) => Ok(value),
            Err(e) if throw_on_invalid => Err(e),
            Err(_) => Ok(default),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
