// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The contracts between the core and format plug-ins.
//!
//! A [`Reader`] populates a [`Store`] from some source format, and a
//! [`Writer`] serializes a store into a target format.  Plug-ins are
//! registered by format name in a [`Registry`], and a [`Translation`] runs
//! a reader, the structural modifier and a writer in sequence.
//!
//! Readers must leave the store with unique names per type, renaming with a
//! deterministic suffix when the source has duplicates, and must convert all
//! quantities to the canonical units documented on each attribute.  Writers
//! may assume the modifier has run, must skip every entity whose `drop` flag
//! is set, and should approximate what their format can't express instead of
//! failing.

mod registry;
mod translation;

pub use registry::{Registry, ReaderFactory, WriterFactory};
pub use translation::{Report, Translation};

use crate::diagnostics::Diagnostics;
use crate::{Error, Store};

/// A source-format plug-in.
pub trait Reader {
    /// Format names the reader is registered under, e.g. `"json"`.
    fn register_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Populates `store` in place.
    ///
    /// Entities the reader could not use are reported in the returned
    /// diagnostics.  Structural errors from the store are returned as they
    /// are.
    fn parse(&mut self, store: &mut Store) -> Result<Diagnostics, Error>;
}

/// A target-format plug-in.
pub trait Writer {
    /// Format names the writer is registered under.
    fn register_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Serializes `store`, skipping dropped entities.
    fn write(&mut self, store: &Store) -> Result<Diagnostics, Error>;
}
