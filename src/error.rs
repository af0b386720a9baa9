// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur while building, transforming or
//! serializing a feeder model.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (DuplicateName, duplicate_name),
    (ElementNotFound, element_not_found),
    (InvalidElementType, invalid_element_type),
    (InvalidGraph, invalid_graph),
    (UnknownAttribute, unknown_attribute),
    (InvalidAttribute, invalid_attribute),
    (Parse, parse),
    (Io, io),
    (UnknownFormat, unknown_format),
    (Strict, strict),
    (Internal, internal)
);

impl ErrorKind {
    /// Returns true for the errors raised by the store itself.
    ///
    /// Structural errors are always fatal to a translation job.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName | Self::ElementNotFound | Self::InvalidElementType
        )
    }
}

/// An error that can occur while populating a [`Store`][crate::Store],
/// deriving its [`Network`][crate::Network], or reading and writing a
/// serialized model.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human readable description of the error.
    pub fn description(&self) -> &str {
        &self.desc
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::io(err.to_string())
        } else {
            Error::parse(err.to_string())
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            Error::io(err.to_string())
        } else {
            Error::parse(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::duplicate_name("Node `n1` already exists.");
        assert_eq!(err.to_string(), "DuplicateName: Node `n1` already exists.");
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(err.description(), "Node `n1` already exists.");
    }

    #[test]
    fn test_structural_kinds() {
        assert!(ErrorKind::DuplicateName.is_structural());
        assert!(ErrorKind::ElementNotFound.is_structural());
        assert!(ErrorKind::InvalidElementType.is_structural());
        assert!(!ErrorKind::Parse.is_structural());
        assert!(!ErrorKind::Strict.is_structural());
    }

    #[test]
    fn test_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        assert_eq!(Error::from(io_err).kind(), ErrorKind::Io);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), ErrorKind::Parse);
    }
}
