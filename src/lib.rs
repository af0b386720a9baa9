// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# DiTTo core

This is a library for translating electrical distribution feeder models
between formats.  Every format is read into one canonical, format-independent
model, repaired there, and written out again, so that `N` formats need `N`
readers and `N` writers instead of `N²` converters.

## The model and the `Store`

The canonical model is a set of typed equipment records: [`Node`]s (buses),
[`Line`]s, [`PowerTransformer`]s, [`Regulator`]s, [`Load`]s and the other
types in [`model`].  Records refer to each other by name.  A [`Store`] owns
them, bucketed by type, with names unique within a type:

```
use ditto_core::{model::Node, Store};

let mut store = Store::new();
store.add(Node::new("n1"))?;
assert!(store.add(Node::new("n1")).is_err());
assert_eq!(store.get::<Node>("n1")?.name(), "n1");
# Ok::<(), ditto_core::Error>(())
```

## The `Network`

A [`Network`] is an undirected graph view of a store: buses are nodes, and
lines, transformers and regulators are edges.  It is built on demand with
[`Network::build`] and answers topology queries: islands, cycles,
breadth-first order from the source, upstream transformers and the extent of
a feeder.

## The structural modifier

[`Modifier::apply`] repairs a freshly read model so that writers can consume
it: it breaks loops, orients branches away from the source, prunes
disconnected islands, creates missing buses, propagates nominal voltages to
buses and loads, and tags entities with their feeder.  Problems it can't
repair are collected in the returned [`Diagnostics`].

## Readers and writers

Format plug-ins implement the [`Reader`] and [`Writer`] traits and are looked
up by format name in a [`Registry`].  A [`Translation`] runs a reader, the
modifier and a writer in sequence.  The crate's own format is JSON, see
[`json`].
*/

#[macro_use]
mod macros;

mod error;
pub use error::{Error, ErrorKind};

pub mod config;
pub use config::{CycleBreakPolicy, ModifierConfig, ReaderConfig, WriterConfig};

mod phase;
pub use phase::{energized_count, Phase};

pub mod model;
pub use model::{
    Element, ElementKind, Entity, Line, Load, Node, PowerSource, PowerTransformer, Regulator,
};

mod store;
pub use store::Store;

mod network;
pub use network::{Branch, Cycle, DirectedBranch, Network, Reach};

mod diagnostics;
pub use diagnostics::{Diagnostics, Issue, Severity};

mod modifier;
pub use modifier::Modifier;

mod plugin;
pub use plugin::{Reader, ReaderFactory, Registry, Report, Translation, Writer, WriterFactory};

pub mod json;
pub mod timeseries;
pub mod units;

#[cfg(test)]
mod test_utils;
