// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Declarative macros that generate the entity records and their enums.
//!
//! Every entity is a plain struct with one public field per attribute,
//! except the name of primary entities, which only the store changes. The
//! macros add the reflective surface used by the serializers: the class name,
//! the ordered attribute names, and checked access by attribute name.

/// Defines an enum whose variants are stored and serialized as strings.
///
/// Generates `as_str`, `Display`, `FromStr` (exact match first, then ASCII
/// case-insensitive), and the conversions to and from [`Value`].
///
/// [`Value`]: crate::model::Value
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Returns the canonical string for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $text,
                    )*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s == $text {
                        return Ok(Self::$variant);
                    }
                )*
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )*
                Err($crate::Error::invalid_attribute(format!(
                    "`{}` is not a valid {}. Expected one of: {}.",
                    s,
                    stringify!($name),
                    [$($text),*].join(", ")
                )))
            }
        }

        impl $crate::model::ToValue for $name {
            fn to_value(&self) -> $crate::model::Value {
                $crate::model::Value::Str(self.as_str().to_string())
            }
        }

        impl $crate::model::FromValue for $name {
            fn from_value(value: $crate::model::Value) -> Result<Self, $crate::Error> {
                match value {
                    $crate::model::Value::Str(s) => s.parse(),
                    other => Err($crate::Error::invalid_attribute(format!(
                        "expected a {} string, found {}.",
                        stringify!($name),
                        other.type_name()
                    ))),
                }
            }
        }
    };
}

/// Defines an enum whose variants carry fixed integer codes.
///
/// The codes are what gets serialized; unknown codes are rejected.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Returns the integer code of this variant.
            pub fn code(&self) -> i64 {
                match self {
                    $(
                        Self::$variant => $code,
                    )*
                }
            }

            /// Returns the variant for the given integer code.
            pub fn from_code(code: i64) -> Result<Self, $crate::Error> {
                match code {
                    $(
                        $code => Ok(Self::$variant),
                    )*
                    _ => Err($crate::Error::invalid_attribute(format!(
                        "`{}` is not a valid {} code. Expected one of: {}.",
                        code,
                        stringify!($name),
                        [$(format!("{}", $code)),*].join(", ")
                    ))),
                }
            }
        }

        impl $crate::model::ToValue for $name {
            fn to_value(&self) -> $crate::model::Value {
                $crate::model::Value::Int(self.code())
            }
        }

        impl $crate::model::FromValue for $name {
            fn from_value(value: $crate::model::Value) -> Result<Self, $crate::Error> {
                let code = <i64 as $crate::model::FromValue>::from_value(value)?;
                Self::from_code(code)
            }
        }
    };
}

/// Defines an entity record.
///
/// Each field may carry an `as "name"` clause when its serialized attribute
/// name differs from the Rust field name.
macro_rules! entity {
    (@attr $field:ident) => {
        stringify!($field)
    };
    (@attr $field:ident $attr:literal) => {
        $attr
    };
    // A restricted field is assigned once, on a record that doesn't have it
    // yet.  Later changes go through the store.
    (@assign_once $restrict:ident, $this:ident, $field:ident, $value:ident, $class:literal) => {
        if !$this.$field.is_empty() && $this.$field != $value {
            return Err($crate::Error::invalid_attribute(format!(
                "{} `{}`: rename entities through the store.",
                $class, $this.$field
            )));
        }
    };
    (
        $(#[$meta:meta])*
        pub struct $name:ident as $class:literal {
            $(
                $(#[$fmeta:meta])*
                $(($restrict:ident))? $field:ident $(as $attr:literal)? : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $(($restrict))? $field: $ty,
            )*
        }

        impl $crate::model::Attributes for $name {
            const CLASS: &'static str = $class;

            fn attribute_names() -> &'static [&'static str] {
                &[$(entity!(@attr $field $($attr)?)),*]
            }

            fn attribute(&self, name: &str) -> Option<$crate::model::Value> {
                $(
                    if name == entity!(@attr $field $($attr)?) {
                        return Some($crate::model::ToValue::to_value(&self.$field));
                    }
                )*
                None
            }

            fn set_attribute(
                &mut self,
                name: &str,
                value: $crate::model::Value,
            ) -> Result<(), $crate::Error> {
                $(
                    if name == entity!(@attr $field $($attr)?) {
                        let parsed: $ty = $crate::model::FromValue::from_value(value).map_err(|e| {
                            $crate::Error::invalid_attribute(format!(
                                "{}.{}: {}",
                                $class,
                                name,
                                e.description()
                            ))
                        })?;
                        $(entity!(@assign_once $restrict, self, $field, parsed, $class);)?
                        self.$field = parsed;
                        return Ok(());
                    }
                )*
                Err($crate::Error::unknown_attribute(format!(
                    "{} has no attribute `{}`.",
                    $class, name
                )))
            }
        }

        impl $crate::model::ToValue for $name {
            fn to_value(&self) -> $crate::model::Value {
                $crate::model::Value::Object($crate::model::Attributes::to_object(self))
            }
        }

        impl $crate::model::FromValue for $name {
            fn from_value(value: $crate::model::Value) -> Result<Self, $crate::Error> {
                match value {
                    $crate::model::Value::Object(object) => {
                        <Self as $crate::model::Attributes>::from_object(object)
                    }
                    other => Err($crate::Error::invalid_attribute(format!(
                        "expected a {} object, found {}.",
                        $class,
                        other.type_name()
                    ))),
                }
            }
        }
    };
}

/// Defines a primary entity: an [`entity!`] that carries the common base
/// attributes and can be registered in a [`Store`][crate::Store].
macro_rules! primary {
    (
        $(#[$meta:meta])*
        pub struct $name:ident as $class:literal {
            $($body:tt)*
        }
    ) => {
        entity! {
            $(#[$meta])*
            pub struct $name as $class {
                /// Identifier, unique among the entities of the same type.
                /// Renamed through [`Store::rename_element`][crate::Store::rename_element].
                (crate) name: String,
                /// Name of the substation this entity belongs to.
                substation_name: Option<String>,
                /// Name of the feeder this entity belongs to.
                feeder_name: Option<String>,
                /// When set, writers skip this entity.
                drop: bool,
                $($body)*
            }
        }

        impl $name {
            /// Creates an entity with the given name and every other
            /// attribute unset.
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    ..Default::default()
                }
            }

            /// The name this entity is stored under.
            pub fn name(&self) -> &str {
                &self.name
            }
        }

        impl $crate::model::Entity for $name {
            const KIND: $crate::model::ElementKind = $crate::model::ElementKind::$name;

            fn name(&self) -> &str {
                &self.name
            }

            fn into_element(self) -> $crate::model::Element {
                $crate::model::Element::$name(self)
            }

            fn from_element(element: &$crate::model::Element) -> Option<&Self> {
                match element {
                    $crate::model::Element::$name(e) => Some(e),
                    _ => None,
                }
            }

            fn from_element_mut(element: &mut $crate::model::Element) -> Option<&mut Self> {
                match element {
                    $crate::model::Element::$name(e) => Some(e),
                    _ => None,
                }
            }
        }
    };
}
