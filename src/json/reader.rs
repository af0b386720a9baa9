// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

use std::path::{Path, PathBuf};

use crate::config::ReaderConfig;
use crate::diagnostics::Diagnostics;
use crate::model::Element;
use crate::plugin::Reader;
use crate::{Error, Store};

use super::{decode_object, DEFAULT_FILE_NAME};

/// Reads a JSON model file into a store.
///
/// Entities whose name is already taken within their type are renamed with
/// a numeric suffix and reported.
#[derive(Clone, Debug)]
pub struct JsonReader {
    input: PathBuf,
    config: ReaderConfig,
}

impl JsonReader {
    /// Creates a reader for a model file, or for the `Model.json` file in a
    /// directory.
    pub fn new(input: &Path, config: ReaderConfig) -> Self {
        Self {
            input: input.to_path_buf(),
            config,
        }
    }

    /// Parses a model from text into `store`.
    ///
    /// Fails on the first entity that can't be decoded; the entities added
    /// before it stay in the store.
    pub fn from_str(text: &str, store: &mut Store) -> Result<Diagnostics, Error> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        let model = json
            .get("model")
            .and_then(|m| m.as_array())
            .ok_or_else(|| Error::parse("The model file has no `model` list."))?;

        let mut diagnostics = Diagnostics::new();
        for object in model {
            let element = Element::from_object(decode_object(object)?)?;
            let wanted = element.name().to_string();
            let class = element.class();
            let name = store.add_with_unique_name(element)?;
            if name != wanted {
                diagnostics.warn(
                    "rename",
                    &name,
                    format!("{class} `{wanted}` already exists. Renamed to `{name}`."),
                );
            }
        }

        match json["metadata"]["model_size"].as_u64() {
            Some(size) if size as usize != model.len() => diagnostics.warn(
                "metadata",
                "model_size",
                format!(
                    "The metadata gives {} entities, but the model holds {}.",
                    size,
                    model.len()
                ),
            ),
            Some(_) => {}
            None => tracing::debug!("The model file has no model size."),
        }
        Ok(diagnostics)
    }

    fn input_path(&self) -> PathBuf {
        if self.input.is_dir() {
            self.input.join(DEFAULT_FILE_NAME)
        } else {
            self.input.clone()
        }
    }
}

impl Reader for JsonReader {
    fn register_names() -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&mut self, store: &mut Store) -> Result<Diagnostics, Error> {
        let path = self.input_path();
        let text = std::fs::read_to_string(&path)?;
        let diagnostics = Self::from_str(&text, store)?;
        tracing::info!(
            "Read {} entities from {}.",
            store.len(),
            path.display()
        );
        diagnostics.check_strict(self.config.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonWriter;
    use crate::model::{ConnectionType, Line, Load, Node, PowerTransformer};
    use crate::plugin::Writer;
    use crate::test_utils::four_bus_feeder;
    use crate::{ErrorKind, Phase};

    const TIME: &str = "2024-05-01T12:00:00+00:00";

    #[test]
    fn test_round_trip() -> Result<(), Error> {
        let store = four_bus_feeder()?;
        let (text, _) = JsonWriter::render(&store, TIME)?;

        let mut read = Store::new();
        assert!(JsonReader::from_str(&text, &mut read)?.is_empty());
        assert_eq!(read.len(), store.len());
        assert_eq!(read.get::<Load>("ld_delta")?.connection_type, Some(ConnectionType::D));
        assert_eq!(
            read.get::<PowerTransformer>("t1")?,
            store.get::<PowerTransformer>("t1")?
        );
        assert_eq!(read.get::<Line>("l2")?.phases(), vec![Phase::A, Phase::B, Phase::C, Phase::N]);

        let (again, _) = JsonWriter::render(&read, TIME)?;
        assert_eq!(again, text);
        Ok(())
    }

    #[test]
    fn test_legacy_tags_and_renames() -> Result<(), Error> {
        let text = r#"{
            "model": [
                {"class": "Node", "name": {"class": "unicode", "value": "n1"}},
                {"class": "Node", "name": {"class": "str", "value": "n1"},
                 "nominal_voltage": {"class": "float", "value": 480.0}},
                {"class": "Line", "name": {"class": "str", "value": "n1"}}
            ],
            "metadata": {"time": "2024-05-01T12:00:00+00:00", "model_size": 3}
        }"#;
        let mut store = Store::new();
        let diagnostics = JsonReader::from_str(text, &mut store)?;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.in_category("rename").count(), 1);
        assert_eq!(store.get::<Node>("n1_1")?.nominal_voltage, Some(480.0));
        assert!(store.get::<Line>("n1").is_ok());
        Ok(())
    }

    #[test]
    fn test_invalid_models() {
        let mut store = Store::new();
        assert!(JsonReader::from_str(r#"{"metadata": {}}"#, &mut store)
            .is_err_and(|e| e == Error::parse("The model file has no `model` list.")));
        assert!(JsonReader::from_str("{", &mut store).is_err_and(|e| e.kind() == ErrorKind::Parse));

        let secondary = r#"{"model": [{"class": "Wire", "phase": {"class": "str", "value": "A"}}]}"#;
        assert!(JsonReader::from_str(secondary, &mut store).is_err_and(|e| e
            == Error::invalid_element_type(
                "`Wire` is a secondary entity and can't stand on its own."
            )));

        let unknown = r#"{"model": [{"class": "Node", "name": {"class": "str", "value": "n"},
            "colour": {"class": "str", "value": "red"}}]}"#;
        assert!(JsonReader::from_str(unknown, &mut store)
            .is_err_and(|e| e == Error::unknown_attribute("Node has no attribute `colour`.")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_parse_directory() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        JsonWriter::new(crate::config::WriterConfig {
            output_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
        .write(&four_bus_feeder()?)?;

        let mut store = Store::new();
        let mut reader = JsonReader::new(dir.path(), ReaderConfig { strict: true });
        assert!(reader.parse(&mut store)?.is_empty());
        assert_eq!(store.get::<Node>("n4")?.name(), "n4");

        let mut missing = JsonReader::new(&dir.path().join("nope.json"), ReaderConfig::default());
        assert!(missing
            .parse(&mut Store::new())
            .is_err_and(|e| e.kind() == ErrorKind::Io));
        Ok(())
    }
}
