// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

use std::path::PathBuf;

use serde_json::json;

use crate::config::WriterConfig;
use crate::diagnostics::Diagnostics;
use crate::plugin::Writer;
use crate::{Error, Store};

use super::{encode_object, DEFAULT_FILE_NAME};

/// Writes a store as a JSON model file.
///
/// Entities are written grouped by type, in the order of
/// [`ElementKind::ALL`][crate::model::ElementKind::ALL], and in insertion
/// order within a type.  Dropped entities, and dropped wires and phase
/// loads, are left out.
#[derive(Clone, Debug)]
pub struct JsonWriter {
    config: WriterConfig,
}

impl JsonWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Renders the model with the given metadata timestamp.
    pub fn render(store: &Store, time: &str) -> Result<(String, Diagnostics), Error> {
        let mut diagnostics = Diagnostics::new();
        let model = store
            .iter_elements(None)
            .filter(|e| {
                if e.is_dropped() {
                    tracing::debug!("Skipping dropped {} {}.", e.class(), e.name());
                }
                !e.is_dropped()
            })
            .map(|e| encode_object(&e.to_object(), e.name(), &mut diagnostics))
            .collect::<Vec<_>>();
        let size = model.len();
        let envelope = json!({
            "model": model,
            "metadata": { "time": time, "model_size": size },
        });
        let mut text = serde_json::to_string_pretty(&envelope)?;
        text.push('\n');
        Ok((text, diagnostics))
    }

    fn output_path(&self) -> Result<PathBuf, Error> {
        let path = self
            .config
            .output_path
            .clone()
            .ok_or_else(|| Error::io("The JSON writer was given no output path."))?;
        if path.is_dir() {
            Ok(path.join(DEFAULT_FILE_NAME))
        } else {
            Ok(path)
        }
    }
}

impl Writer for JsonWriter {
    fn register_names() -> &'static [&'static str] {
        &["json"]
    }

    fn write(&mut self, store: &Store) -> Result<Diagnostics, Error> {
        let path = self.output_path()?;
        let time = chrono::Utc::now().to_rfc3339();
        let (text, diagnostics) = Self::render(store, &time)?;
        std::fs::write(&path, text)?;
        tracing::info!("Wrote the JSON model to {}.", path.display());
        diagnostics.check_strict(self.config.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Line, Node};
    use crate::test_utils::FeederBuilder;

    const TIME: &str = "2024-05-01T12:00:00+00:00";

    #[test]
    fn test_render() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .line_phases("l1", "a", "b", &[crate::Phase::A])
            .node("a")
            .build()?;
        let mut gone = Node::new("gone");
        gone.drop = true;
        store.add(gone)?;

        let (text, diagnostics) = JsonWriter::render(&store, TIME)?;
        assert!(diagnostics.is_empty());
        let json: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(json["metadata"]["time"], TIME);
        assert_eq!(json["metadata"]["model_size"], 2);

        // nodes come before lines, whatever the insertion order
        let model = json["model"].as_array().cloned().unwrap_or_default();
        let classes = model.iter().map(|o| o["class"].clone()).collect::<Vec<_>>();
        assert_eq!(classes, vec!["Node", "Line"]);
        assert_eq!(model[0]["name"], serde_json::json!({"class": "str", "value": "a"}));
        assert_eq!(model[1]["length"]["class"], "float");
        assert_eq!(model[1]["length"]["value"], 100.0);
        assert_eq!(model[1]["is_switch"]["class"], "NoneType");
        assert_eq!(model[1]["wires"]["value"][0]["phase"]["value"], "A");

        let first_keys = model[1]
            .as_object()
            .map(|o| o.keys().take(3).cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(first_keys, vec!["class", "name", "substation_name"]);
        assert!(store.get::<Line>("l1").is_ok());
        assert_eq!(store.count(ElementKind::Node), 2);
        Ok(())
    }

    #[test]
    fn test_write_to_directory() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let store = FeederBuilder::new().node("a").build()?;
        let mut writer = JsonWriter::new(WriterConfig {
            output_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        writer.write(&store)?;
        let text = std::fs::read_to_string(dir.path().join("Model.json"))?;
        assert!(text.contains("\"model_size\": 1"));

        assert!(JsonWriter::new(WriterConfig::default())
            .write(&store)
            .is_err_and(|e| e == Error::io("The JSON writer was given no output path.")));
        Ok(())
    }
}
