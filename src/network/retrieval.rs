// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving buses and branches from a [`Network`].

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::Error;

use super::{Branch, DirectedBranch, Network};

/// Lookups on the network.
impl Network {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn branch_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_bus(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// The bus the network was rooted at.
    pub fn source(&self) -> Option<&str> {
        self.source.map(|index| self.graph[index].as_str())
    }

    /// Names of all buses, in insertion order.
    pub fn buses(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// All branches, in insertion order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.graph.edge_weights()
    }

    /// Branches with both ends, as they were inserted.
    pub fn directed_branches(&self) -> impl Iterator<Item = DirectedBranch<'_>> {
        self.graph.edge_references().map(|edge| DirectedBranch {
            from: &self.graph[edge.source()],
            to: &self.graph[edge.target()],
            branch: edge.weight(),
        })
    }

    /// Branches attached to the given bus, seen from that bus.
    pub fn branches_at(&self, bus: &str) -> Result<Vec<DirectedBranch<'_>>, Error> {
        let index = self.index(bus)?;
        Ok(self
            .graph
            .edges(index)
            .map(|edge| self.directed(index, edge.id()))
            .collect())
    }

    /// Buses adjacent to the given bus.
    pub fn neighbors(&self, bus: &str) -> Result<Vec<&str>, Error> {
        Ok(self
            .branches_at(bus)?
            .into_iter()
            .map(|b| b.to)
            .collect())
    }

    /// Number of breadth-first hops from the root of the bus's component.
    pub fn depth(&self, bus: &str) -> Result<usize, Error> {
        let index = self.index(bus)?;
        self.levels.depth.get(&index).copied().ok_or_else(|| {
            Error::internal(format!("Bus `{bus}` was not reached by the level search."))
        })
    }

    /// The branch that leads from the given bus towards the root of its
    /// component, as seen from the upstream bus.
    pub fn parent_branch(&self, bus: &str) -> Result<Option<DirectedBranch<'_>>, Error> {
        let index = self.index(bus)?;
        Ok(self
            .levels
            .parent
            .get(&index)
            .map(|(parent, edge)| self.directed(*parent, *edge)))
    }

    pub(crate) fn index(&self, bus: &str) -> Result<NodeIndex, Error> {
        self.node_indices
            .get(bus)
            .copied()
            .ok_or_else(|| Error::element_not_found(format!("Bus `{bus}` is not in the network.")))
    }

    pub(crate) fn bus_name(&self, index: NodeIndex) -> &str {
        &self.graph[index]
    }

    /// The given edge, seen from `from`, which must be one of its ends.
    pub(crate) fn directed(&self, from: NodeIndex, edge: EdgeIndex) -> DirectedBranch<'_> {
        let to = match self.graph.edge_endpoints(edge) {
            Some((a, b)) if a == from => b,
            Some((a, _)) => a,
            None => from,
        };
        DirectedBranch {
            from: &self.graph[from],
            to: &self.graph[to],
            branch: &self.graph[edge],
        }
    }

    /// Depth of a bus by index; buses are always reached by the level
    /// search, so a missing entry reads as the root level.
    pub(crate) fn level(&self, index: NodeIndex) -> usize {
        self.levels.depth.get(&index).copied().unwrap_or(0)
    }
}
