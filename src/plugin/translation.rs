// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A translation job: read, repair, write.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{ReaderConfig, WriterConfig};
use crate::diagnostics::Diagnostics;
use crate::modifier::Modifier;
use crate::{Error, Store};

use super::Registry;

/// Summary of a successful translation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    /// Number of primary entities in the store handed to the writer,
    /// including dropped ones.
    pub element_count: usize,
    /// Issues raised by the reader, the modifier and the writer, in that
    /// order.
    pub diagnostics: Diagnostics,
}

/// Reads a model in one format and writes it in another.
///
/// The store lives only as long as [`Translation::run`].  When any stage
/// fails, the partly populated store is discarded and the error returned.
#[derive(Clone, Debug)]
pub struct Translation {
    from: String,
    to: String,
    input: PathBuf,
    reader_config: ReaderConfig,
    writer_config: WriterConfig,
    modifier: Option<Modifier>,
}

impl Translation {
    /// Creates a job that reads `input` in the `from` format and writes it
    /// in the `to` format, running the default modifier in between.
    pub fn new(from: impl Into<String>, to: impl Into<String>, input: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            input: input.into(),
            reader_config: ReaderConfig::default(),
            writer_config: WriterConfig::default(),
            modifier: Some(Modifier::default()),
        }
    }

    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader_config = config;
        self
    }

    pub fn with_writer_config(mut self, config: WriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Sets the modifier to run between reading and writing, or none.
    pub fn with_modifier(mut self, modifier: Option<Modifier>) -> Self {
        self.modifier = modifier;
        self
    }

    /// Runs the job with the plug-ins of the given registry.
    pub fn run(&self, registry: &Registry) -> Result<Report, Error> {
        let mut reader = registry.reader(&self.from, &self.input, &self.reader_config)?;
        let mut writer = registry.writer(&self.to, &self.writer_config)?;

        let mut store = Store::new();
        let mut diagnostics = reader
            .parse(&mut store)?
            .check_strict(self.reader_config.strict)?;
        tracing::info!(
            "Read {} entities from {} as {}.",
            store.len(),
            self.input.display(),
            self.from
        );

        if let Some(modifier) = &self.modifier {
            diagnostics.extend(modifier.apply(&mut store));
        }

        diagnostics.extend(
            writer
                .write(&store)?
                .check_strict(self.writer_config.strict)?,
        );
        tracing::info!(
            "Wrote {} entities as {} with {} warnings and {} errors.",
            store.len(),
            self.to,
            diagnostics.warning_count(),
            diagnostics.error_count()
        );

        Ok(Report {
            element_count: store.len(),
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonWriter;
    use crate::model::{ElementKind, Node};
    use crate::plugin::Writer;
    use crate::test_utils::four_bus_feeder;

    #[test]
    fn test_json_to_json() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.json");
        let output = dir.path().join("output.json");

        let mut store = four_bus_feeder()?;
        store.get_mut::<crate::model::Load>("ld_1ph")?.connection_type = None;
        JsonWriter::new(WriterConfig {
            output_path: Some(input.clone()),
            ..Default::default()
        })
        .write(&store)?;

        let report = Translation::new("json", "JSON", &input)
            .with_writer_config(WriterConfig {
                output_path: Some(output.clone()),
                ..Default::default()
            })
            .run(&Registry::with_builtin()?)?;
        assert_eq!(report.element_count, store.len());
        assert_eq!(report.diagnostics.in_category("connection").count(), 1);

        let mut written = Store::new();
        crate::json::JsonReader::from_str(&std::fs::read_to_string(&output)?, &mut written)?;
        assert_eq!(written.get::<Node>("n4")?.nominal_voltage, Some(4_160.0));
        assert_eq!(written.count(ElementKind::Load), 3);
        Ok(())
    }

    #[test]
    fn test_strict_reader() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.json");
        std::fs::write(
            &input,
            r#"{"model": [], "metadata": {"time": "2024-01-01T00:00:00+00:00", "model_size": 3}}"#,
        )?;
        let registry = Registry::with_builtin()?;
        let lenient = Translation::new("json", "json", &input).with_writer_config(WriterConfig {
            output_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        let report = lenient.run(&registry)?;
        assert_eq!(report.element_count, 0);
        assert!(dir.path().join("Model.json").exists());

        let strict = lenient.with_reader_config(ReaderConfig { strict: true });
        assert!(strict
            .run(&registry)
            .is_err_and(|e| e.kind() == crate::ErrorKind::Strict));
        Ok(())
    }

    #[test]
    fn test_unknown_formats() {
        let registry = Registry::new();
        assert!(Translation::new("cyme", "json", "feeder")
            .run(&registry)
            .is_err_and(|e| e.kind() == crate::ErrorKind::UnknownFormat));
    }
}
