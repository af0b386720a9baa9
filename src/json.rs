// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The JSON format: the one serialization the core fully owns.
//!
//! A model file is an envelope around a list of entity objects:
//!
//! ```json
//! { "model": [ { "class": "Node", "name": { "class": "str", "value": "n1" }, ... } ],
//!   "metadata": { "time": "2024-05-01T12:00:00+00:00", "model_size": 1 } }
//! ```
//!
//! Every attribute of an object is wrapped in `{ "class": <tag>, "value": <payload> }`,
//! with the tags `NoneType`, `bool`, `int`, `float`, `str` (or `unicode` on
//! input), `complex` (payload `[re, im]`) and `list` (payload: a list of
//! wrappers).  Secondary entities appear inline, as objects with their own
//! `class` and wrapped attributes.

mod reader;
mod writer;

pub use reader::JsonReader;
pub use writer::JsonWriter;

use num_complex::Complex64;
use serde_json::{json, Map, Number};

use crate::diagnostics::Diagnostics;
use crate::model::{Object, Value};
use crate::Error;

/// File name used when the reader or writer is given a directory.
pub const DEFAULT_FILE_NAME: &str = "Model.json";

fn wrap(class: &str, value: serde_json::Value) -> serde_json::Value {
    json!({ "class": class, "value": value })
}

fn number(value: f64) -> Option<serde_json::Value> {
    Number::from_f64(value).map(serde_json::Value::Number)
}

/// Encodes an entity as a JSON object.
///
/// Non-finite floats can't be represented and are written as `NoneType`,
/// with a warning about `entity`.
pub(crate) fn encode_object(
    object: &Object,
    entity: &str,
    diagnostics: &mut Diagnostics,
) -> serde_json::Value {
    let mut map = Map::new();
    map.insert("class".into(), serde_json::Value::String(object.class.clone()));
    for (name, value) in &object.attributes {
        map.insert(name.clone(), encode_value(value, entity, diagnostics));
    }
    serde_json::Value::Object(map)
}

fn encode_value(value: &Value, entity: &str, diagnostics: &mut Diagnostics) -> serde_json::Value {
    match value {
        Value::Null => wrap("NoneType", serde_json::Value::Null),
        Value::Bool(b) => wrap("bool", json!(b)),
        Value::Int(i) => wrap("int", json!(i)),
        Value::Float(f) => match number(*f) {
            Some(n) => wrap("float", n),
            None => non_finite(entity, diagnostics),
        },
        Value::Str(s) => wrap("str", json!(s)),
        Value::Complex(c) => match (number(c.re), number(c.im)) {
            (Some(re), Some(im)) => wrap("complex", json!([re, im])),
            _ => non_finite(entity, diagnostics),
        },
        Value::List(items) => wrap(
            "list",
            serde_json::Value::Array(
                items
                    .iter()
                    .filter(|item| !is_dropped(item))
                    .map(|item| encode_value(item, entity, diagnostics))
                    .collect(),
            ),
        ),
        Value::Object(object) => encode_object(object, entity, diagnostics),
    }
}

fn non_finite(entity: &str, diagnostics: &mut Diagnostics) -> serde_json::Value {
    diagnostics.warn("serialize", entity, "Non-finite number written as null.");
    wrap("NoneType", serde_json::Value::Null)
}

/// Secondary entities with a `drop` flag set are left out of lists.
fn is_dropped(value: &Value) -> bool {
    matches!(value, Value::Object(object) if object.get("drop") == Some(&Value::Bool(true)))
}

/// Decodes an entity object.
pub(crate) fn decode_object(json: &serde_json::Value) -> Result<Object, Error> {
    let map = json
        .as_object()
        .ok_or_else(|| Error::parse(format!("Expected an entity object, found `{json}`.")))?;
    let class = map
        .get("class")
        .and_then(|c| c.as_str())
        .ok_or_else(|| Error::parse("Entity object without a `class`."))?;
    let mut object = Object::new(class);
    for (name, value) in map.iter().filter(|(name, _)| name.as_str() != "class") {
        let value = decode_value(value)
            .map_err(|e| Error::parse(format!("{class}.{name}: {}", e.description())))?;
        object.attributes.push((name.clone(), value));
    }
    Ok(object)
}

fn decode_value(json: &serde_json::Value) -> Result<Value, Error> {
    let tag = json
        .get("class")
        .and_then(|c| c.as_str())
        .ok_or_else(|| Error::parse(format!("Expected a value wrapper, found `{json}`.")))?;
    let payload = json.get("value").unwrap_or(&serde_json::Value::Null);
    let mismatch = || Error::parse(format!("`{payload}` is not a valid `{tag}` value."));

    let value = match tag {
        "NoneType" => Value::Null,
        "bool" => Value::Bool(payload.as_bool().ok_or_else(mismatch)?),
        "int" => Value::Int(payload.as_i64().ok_or_else(mismatch)?),
        "float" => Value::Float(payload.as_f64().ok_or_else(mismatch)?),
        "str" | "unicode" => Value::Str(payload.as_str().ok_or_else(mismatch)?.to_string()),
        "complex" => match payload.as_array().map(Vec::as_slice) {
            Some([re, im]) => Value::Complex(Complex64::new(
                re.as_f64().ok_or_else(mismatch)?,
                im.as_f64().ok_or_else(mismatch)?,
            )),
            _ => return Err(mismatch()),
        },
        "list" => Value::List(
            payload
                .as_array()
                .ok_or_else(mismatch)?
                .iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        ),
        _ => Value::Object(decode_object(json)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, Wire};
    use crate::Phase;

    #[test]
    fn test_value_wrappers() -> Result<(), Error> {
        let mut diagnostics = Diagnostics::new();
        let object = Object::new("Test")
            .with("a", Value::Null)
            .with("b", Value::Complex(Complex64::new(0.5, -1.25)))
            .with("c", Value::List(vec![Value::Int(1), Value::Float(2.5)]))
            .with("d", Value::Float(f64::NAN));
        let json = encode_object(&object, "t1", &mut diagnostics);
        assert_eq!(
            json.to_string(),
            concat!(
                r#"{"class":"Test","a":{"class":"NoneType","value":null},"#,
                r#""b":{"class":"complex","value":[0.5,-1.25]},"#,
                r#""c":{"class":"list","value":[{"class":"int","value":1},{"class":"float","value":2.5}]},"#,
                r#""d":{"class":"NoneType","value":null}}"#
            )
        );
        assert_eq!(diagnostics.in_category("serialize").count(), 1);

        let decoded = decode_object(&json)?;
        assert_eq!(decoded.get("b"), object.get("b"));
        assert_eq!(decoded.get("d"), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn test_dropped_wires_left_out() {
        let mut dropped = Wire::with_phase(Phase::B);
        dropped.drop = true;
        let object = Object::new("Line").with(
            "wires",
            Value::List(vec![
                Value::Object(Wire::with_phase(Phase::A).to_object()),
                Value::Object(dropped.to_object()),
            ]),
        );
        let json = encode_object(&object, "l1", &mut Diagnostics::new());
        assert_eq!(json["wires"]["value"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["wires"]["value"][0]["class"], "Wire");
        assert_eq!(json["wires"]["value"][0]["phase"]["value"], "A");
    }

    #[test]
    fn test_decode_errors() {
        let bad = serde_json::json!({
            "class": "Node",
            "nominal_voltage": { "class": "float", "value": "high" }
        });
        assert!(decode_object(&bad).is_err_and(|e| e
            == Error::parse("Node.nominal_voltage: `\"high\"` is not a valid `float` value.")));

        let bare = serde_json::json!({ "class": "Node", "name": "n1" });
        assert!(decode_object(&bare).is_err_and(|e| e
            == Error::parse("Node.name: Expected a value wrapper, found `\"n1\"`.")));

        let complex = serde_json::json!({
            "class": "Source", "z": { "class": "complex", "value": [1.0] }
        });
        assert!(decode_object(&complex).is_err());
    }
}
