//! Dialect lookup by name.
//!
//! The [`DialectRegistry`] is an ordinary value: build it once at startup,
//! register every dialect the application needs, then share it (typically in
//! an `Arc`). Registration takes `&mut self`, so the borrow checker keeps
//! writes out of the read phase.
//!
//! ```rust
//! use oxide_dialect::dialect::{Dialect, DialectRegistry};
//!
//! let registry = DialectRegistry::with_defaults();
//! let dialect = registry.require("default").unwrap();
//! assert_eq!(dialect.driver(), "");
//! assert!(registry.get("oracle").is_none());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::{DefaultDialect, Dialect};

/// Name under which the default dialect is registered.
pub const DEFAULT_DIALECT: &str = "default";

/// Dialect selection, suitable for embedding in application config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Registered dialect name. Empty selects whatever is registered under `""`.
    pub name: String,
    /// Escaping flag to apply on resolve. `None` leaves the dialect as it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escaping: Option<bool>,
}

impl DialectConfig {
    /// Creates a config selecting `name` without touching its escaping flag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            escaping: None,
        }
    }

    /// Sets the escaping flag applied on resolve.
    #[must_use]
    pub const fn escaping(mut self, escaping: bool) -> Self {
        self.escaping = Some(escaping);
        self
    }
}

/// Registry of dialects by name.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the default dialect registered under
    /// `"default"` and `""`, both pointing at the same instance.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let default: Arc<dyn Dialect> = Arc::new(DefaultDialect::new());
        registry.register_arc(DEFAULT_DIALECT, Arc::clone(&default));
        registry.register_arc("", default);
        registry
    }

    /// Registers a dialect by name.
    pub fn register(&mut self, name: impl Into<String>, dialect: impl Dialect + 'static) {
        self.register_arc(name, Arc::new(dialect));
    }

    /// Registers a shared dialect by name.
    ///
    /// A name that is already registered is rebound to the new dialect.
    pub fn register_arc(&mut self, name: impl Into<String>, dialect: Arc<dyn Dialect>) {
        let name = name.into();
        debug!(name = %name, driver = dialect.driver(), "registering dialect");
        if self.dialects.insert(name.clone(), dialect).is_some() {
            warn!(name = %name, "dialect registered twice, previous entry replaced");
        }
    }

    /// Returns the dialect registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        let found = self.dialects.get(name).cloned();
        if found.is_none() {
            debug!(name, "dialect not registered");
        }
        found
    }

    /// Returns the dialect registered under `name`, or [`Error::DialectNotFound`].
    pub fn require(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        self.get(name)
            .ok_or_else(|| Error::DialectNotFound(String::from(name)))
    }

    /// Resolves the configured dialect.
    ///
    /// An explicit escaping flag is set on the shared instance, so it affects
    /// every holder of that dialect. Configs that leave it unset never reset
    /// a flag chosen elsewhere.
    pub fn resolve(&self, config: &DialectConfig) -> Result<Arc<dyn Dialect>> {
        let dialect = self.require(&config.name)?;
        if let Some(escaping) = config.escaping {
            dialect.set_escaping(escaping);
        }
        Ok(dialect)
    }

    /// Returns whether a dialect is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}
