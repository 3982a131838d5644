//! Suite registry
//!
//! Suites are registered once at startup under a short selection key; the
//! runner instantiates them on demand through a supplier closure, so every
//! run starts from a fresh suite instance.

use thiserror::Error;
use veritest_core::RunnableSuite;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Keys are used verbatim on the command line, so they must be non-empty
    /// and free of spaces and quotes.
    #[error("invalid suite key {0:?}: keys must be non-empty and must not contain spaces or quotes")]
    InvalidName(String),
    #[error("duplicate suite key {0:?}")]
    DuplicateName(String),
}

/// Opt-out switches for a registered suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationFlags {
    /// Excluded from a run with no explicit suite keys.
    pub omit_from_default: bool,
    /// Hidden from `--list-suites`.
    pub omit_from_listing: bool,
}

type SuiteSupplier = Box<dyn Fn() -> Box<dyn RunnableSuite>>;

pub struct SuiteEntry {
    key: String,
    description: String,
    flags: RegistrationFlags,
    supplier: SuiteSupplier,
}

impl std::fmt::Debug for SuiteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteEntry")
            .field("key", &self.key)
            .field("description", &self.description)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl SuiteEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> RegistrationFlags {
        self.flags
    }

    /// Builds a fresh instance of the registered suite.
    pub fn instantiate(&self) -> Box<dyn RunnableSuite> {
        (self.supplier)()
    }
}

/// All suites known to the runner, in registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<SuiteEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register<S, F>(
        &mut self,
        key: &str,
        description: &str,
        supplier: F,
    ) -> Result<(), RegistryError>
    where
        S: RunnableSuite + 'static,
        F: Fn() -> S + 'static,
    {
        self.register_with_flags(key, description, RegistrationFlags::default(), supplier)
    }

    pub fn register_with_flags<S, F>(
        &mut self,
        key: &str,
        description: &str,
        flags: RegistrationFlags,
        supplier: F,
    ) -> Result<(), RegistryError>
    where
        S: RunnableSuite + 'static,
        F: Fn() -> S + 'static,
    {
        if key.is_empty() || key.contains([' ', '"', '\'']) {
            return Err(RegistryError::InvalidName(key.to_string()));
        }
        if self.entries.iter().any(|entry| entry.key == key) {
            return Err(RegistryError::DuplicateName(key.to_string()));
        }
        self.entries.push(SuiteEntry {
            key: key.to_string(),
            description: description.to_string(),
            flags,
            supplier: Box::new(move || Box::new(supplier())),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[SuiteEntry] {
        &self.entries
    }

    pub fn find(&self, key: &str) -> Option<&SuiteEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}
