// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Lookup of format plug-ins by name.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{ReaderConfig, WriterConfig};
use crate::json::{JsonReader, JsonWriter};
use crate::Error;

use super::{Reader, Writer};

/// Creates a reader for the given input file or directory.
pub type ReaderFactory = fn(&Path, &ReaderConfig) -> Box<dyn Reader>;

/// Creates a writer.
pub type WriterFactory = fn(&WriterConfig) -> Box<dyn Writer>;

/// Maps format names to reader and writer factories.
///
/// Format names are matched case-insensitively.
#[derive(Clone, Default)]
pub struct Registry {
    readers: BTreeMap<String, ReaderFactory>,
    writers: BTreeMap<String, WriterFactory>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("readers", &self.reader_formats())
            .field("writers", &self.writer_formats())
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the formats this crate implements.
    pub fn with_builtin() -> Result<Self, Error> {
        let mut registry = Self::new();
        registry.register_reader::<JsonReader>(|input, config| {
            Box::new(JsonReader::new(input, config.clone()))
        })?;
        registry.register_writer::<JsonWriter>(|config| Box::new(JsonWriter::new(config.clone())))?;
        Ok(registry)
    }

    /// Registers a reader under all of its `register_names`.
    ///
    /// Fails without registering anything if one of the names is taken.
    pub fn register_reader<R: Reader>(&mut self, factory: ReaderFactory) -> Result<(), Error> {
        let names = R::register_names();
        if let Some(taken) = names.iter().find(|n| self.readers.contains_key(&key(n))) {
            return Err(Error::duplicate_name(format!(
                "A reader is already registered for `{taken}`."
            )));
        }
        for name in names {
            self.readers.insert(key(name), factory);
        }
        Ok(())
    }

    /// Registers a writer under all of its `register_names`.
    pub fn register_writer<W: Writer>(&mut self, factory: WriterFactory) -> Result<(), Error> {
        let names = W::register_names();
        if let Some(taken) = names.iter().find(|n| self.writers.contains_key(&key(n))) {
            return Err(Error::duplicate_name(format!(
                "A writer is already registered for `{taken}`."
            )));
        }
        for name in names {
            self.writers.insert(key(name), factory);
        }
        Ok(())
    }

    /// Creates the reader registered for `format`.
    pub fn reader(
        &self,
        format: &str,
        input: &Path,
        config: &ReaderConfig,
    ) -> Result<Box<dyn Reader>, Error> {
        let factory = self.readers.get(&key(format)).ok_or_else(|| {
            Error::unknown_format(format!(
                "No reader registered for `{}`. Known formats: {}.",
                format,
                self.reader_formats().join(", ")
            ))
        })?;
        Ok(factory(input, config))
    }

    /// Creates the writer registered for `format`.
    pub fn writer(&self, format: &str, config: &WriterConfig) -> Result<Box<dyn Writer>, Error> {
        let factory = self.writers.get(&key(format)).ok_or_else(|| {
            Error::unknown_format(format!(
                "No writer registered for `{}`. Known formats: {}.",
                format,
                self.writer_formats().join(", ")
            ))
        })?;
        Ok(factory(config))
    }

    /// Registered reader format names, sorted.
    pub fn reader_formats(&self) -> Vec<&str> {
        self.readers.keys().map(String::as_str).collect()
    }

    /// Registered writer format names, sorted.
    pub fn writer_formats(&self) -> Vec<&str> {
        self.writers.keys().map(String::as_str).collect()
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}
