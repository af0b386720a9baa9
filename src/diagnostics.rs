// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A record of the problems met while reading, repairing or writing a model.
//!
//! Readers, the modifier and writers keep going past data they can't use.
//! Each such event is logged with `tracing` and also collected here, so that
//! a translation job can report everything that was skipped or defaulted.

use serde::Serialize;

use crate::Error;

/// Severity of an [`Issue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The entity was repaired or a default was used.
    Warning,
    /// The entity could not be used and was dropped or left unchanged.
    Error,
}

/// A single problem, usually attached to one entity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Pipeline stage or concern, e.g. `"parse"`, `"cycle"`, `"voltage"`.
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({entity})")?;
        }
        Ok(())
    }
}

/// The issues collected by one stage, or by a whole translation job.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records and logs a warning about the named entity.
    pub fn warn(&mut self, category: &str, entity: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{entity}: {message}");
        self.issues.push(Issue {
            severity: Severity::Warning,
            category: category.to_string(),
            message,
            entity: Some(entity.to_string()),
        });
    }

    /// Records and logs an error about the named entity.
    pub fn error(&mut self, category: &str, entity: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{entity}: {message}");
        self.issues.push(Issue {
            severity: Severity::Error,
            category: category.to_string(),
            message,
            entity: Some(entity.to_string()),
        });
    }

    /// Appends the issues of another stage.
    pub fn extend(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Issues of the given category.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Returns the diagnostics unchanged when `strict` is false or when
    /// there is nothing to report, and a `Strict` error naming the first
    /// issue otherwise.
    pub fn check_strict(self, strict: bool) -> Result<Self, Error> {
        match self.issues.first() {
            Some(first) if strict => Err(Error::strict(format!(
                "{} issue(s), the first being {}",
                self.len(),
                first
            ))),
            _ => Ok(self),
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
