// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Dynamically typed attribute values.
//!
//! A [`Value`] is what an entity attribute looks like when it is accessed by
//! name instead of through its typed field.  The variants mirror the type tags
//! of the JSON format: primitives, complex numbers, lists, and inline entity
//! objects.

use num_complex::Complex64;

use crate::Error;

/// An attribute value, detached from the entity that holds it.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Complex(Complex64),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Returns the type tag of the value, as used in the JSON format.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Complex(_) => "complex",
            Value::List(_) => "list",
            Value::Object(object) => &object.class,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// An entity detached from its typed record: a class name and its
/// attributes, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    pub class: String,
    pub attributes: Vec<(String, Value)>,
}

impl Object {
    /// Creates an empty object of the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute and returns the object, for chaining.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Returns the value of the attribute with the given name, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Conversion of a typed attribute into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Checked conversion of a [`Value`] into a typed attribute.
///
/// Implementations coerce between compatible representations (an integer
/// where a float is expected, `0`/`1` where a boolean is expected) and reject
/// everything else.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Error>;
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::invalid_attribute(format!(
        "expected {}, found {}.",
        expected,
        found.type_name()
    ))
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
            Value::Bool(b) => Ok(i64::from(b)),
            other => Err(mismatch("int", &other)),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("str", &other)),
        }
    }
}

impl ToValue for Complex64 {
    fn to_value(&self) -> Value {
        Value::Complex(*self)
    }
}

impl FromValue for Complex64 {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Complex(c) => Ok(c),
            Value::Float(f) => Ok(Complex64::new(f, 0.0)),
            Value::Int(i) => Ok(Complex64::new(i as f64, 0.0)),
            other => Err(mismatch("complex", &other)),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(mismatch("list", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coercion() -> Result<(), Error> {
        assert_eq!(f64::from_value(Value::Int(3))?, 3.0);
        assert_eq!(i64::from_value(Value::Float(4.0))?, 4);
        assert_eq!(bool::from_value(Value::Int(1))?, true);
        assert_eq!(
            Complex64::from_value(Value::Float(0.5))?,
            Complex64::new(0.5, 0.0)
        );

        assert!(i64::from_value(Value::Float(4.5))
            .is_err_and(|e| e == Error::invalid_attribute("expected int, found float.")));
        assert!(bool::from_value(Value::Int(2))
            .is_err_and(|e| e == Error::invalid_attribute("expected bool, found int.")));
        assert!(String::from_value(Value::Bool(true))
            .is_err_and(|e| e == Error::invalid_attribute("expected str, found bool.")));

        Ok(())
    }

    #[test]
    fn test_scalar_vs_list() -> Result<(), Error> {
        let list = Value::List(vec![Value::Float(1.0), Value::Int(2)]);
        assert_eq!(Vec::<f64>::from_value(list.clone())?, vec![1.0, 2.0]);
        assert!(f64::from_value(list)
            .is_err_and(|e| e == Error::invalid_attribute("expected float, found list.")));
        assert!(Vec::<f64>::from_value(Value::Float(1.0))
            .is_err_and(|e| e == Error::invalid_attribute("expected list, found float.")));

        assert_eq!(Option::<f64>::from_value(Value::Null)?, None);
        assert_eq!(Some(2.5).to_value(), Value::Float(2.5));
        assert_eq!(None::<f64>.to_value(), Value::Null);

        Ok(())
    }

    #[test]
    fn test_object_lookup() {
        let object = Object::new("Position")
            .with("long", Value::Float(1.0))
            .with("lat", Value::Float(2.0));
        assert_eq!(object.get("lat"), Some(&Value::Float(2.0)));
        assert_eq!(object.get("elevation"), None);
        assert_eq!(Value::Object(object).type_name(), "Position");
    }
}
