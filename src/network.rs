// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph view of the buses of a feeder model, and the two-terminal
//! equipment that connects them.
//!
//! The view is derived from a [`Store`][crate::Store] and is not kept in
//! sync with it: after mutating the store, build a new [`Network`].

mod creation;
mod cycles;
mod orientation;
mod retrieval;
mod traversal;

pub use cycles::Cycle;
pub use traversal::Reach;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use std::collections::HashMap;

use crate::model::ElementKind;

/// Buses in the `UnGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any bus name, so
/// that buses can be retrieved from their names.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// An edge of the network: a line, a transformer or a regulator.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// Name of the entity in its store bucket.
    pub name: String,
    pub kind: ElementKind,
    /// Meters, for lines.
    pub length: Option<f64>,
    /// Number of energized phases.
    pub phase_count: usize,
}

impl Branch {
    pub fn is_single_phase(&self) -> bool {
        self.phase_count == 1
    }

    pub fn is_transformer(&self) -> bool {
        self.kind == ElementKind::PowerTransformer
    }
}

/// A branch seen from one of its ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectedBranch<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub branch: &'a Branch,
}

/// Breadth-first levels of every bus, from the source for the component
/// that holds it and from the first bus of every other component.
#[derive(Clone, Debug, Default)]
pub(crate) struct Levels {
    depth: HashMap<NodeIndex, usize>,
    parent: HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
}

/// An undirected graph of buses and branches.
#[derive(Clone, Debug)]
pub struct Network {
    graph: UnGraph<String, Branch>,
    node_indices: NodeIndexMap,
    source: Option<NodeIndex>,
    levels: Levels,
}
