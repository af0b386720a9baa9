// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for walking the [`Network`].

use std::collections::{HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::Error;

use super::{DirectedBranch, Network};

/// The buses and branches reached by a walk from one bus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reach<'a> {
    pub buses: Vec<&'a str>,
    pub branches: Vec<DirectedBranch<'a>>,
}

/// Graph traversal.
impl Network {
    /// Returns the connected components, as lists of bus names.
    ///
    /// The component that holds the source comes first, followed by the
    /// others in the order their first bus was added.
    pub fn find_islands(&self) -> Vec<Vec<&str>> {
        let mut seen = HashSet::new();
        let mut islands = Vec::new();
        let roots = self.source.into_iter().chain(self.graph.node_indices());
        for root in roots {
            if !seen.insert(root) {
                continue;
            }
            let mut island = vec![root];
            let mut queue = VecDeque::from([root]);
            while let Some(index) = queue.pop_front() {
                for next in self.graph.neighbors(index) {
                    if seen.insert(next) {
                        island.push(next);
                        queue.push_back(next);
                    }
                }
            }
            islands.push(island.into_iter().map(|i| self.bus_name(i)).collect());
        }
        islands
    }

    /// Returns the branches reachable from `source`, or from the network's
    /// source when `None`, in breadth-first order.
    ///
    /// Each branch is reported once, directed away from the bus it was
    /// first reached from.
    pub fn bfs_order(&self, source: Option<&str>) -> Result<Vec<DirectedBranch<'_>>, Error> {
        let start = match source {
            Some(name) => self.index(name)?,
            None => self.source_index()?,
        };
        Ok(self.walk(start, &HashSet::new()).branches)
    }

    /// Walks from `bus` towards the source and returns the name of the
    /// first transformer on the way, if any.
    pub fn get_upstream_transformer(&self, bus: &str) -> Result<Option<&str>, Error> {
        let source = self.source_index()?;
        let mut current = self.index(bus)?;
        while current != source {
            let Some((parent, edge)) = self.levels.parent.get(&current) else {
                return Err(Error::invalid_graph(format!(
                    "Bus `{bus}` is not connected to the source."
                )));
            };
            let branch = &self.graph[*edge];
            if branch.is_transformer() {
                return Ok(Some(&branch.name));
            }
            current = *parent;
        }
        Ok(None)
    }

    /// Returns the branches that have both ends in `buses`.
    pub fn find_internal_edges<S: AsRef<str>>(&self, buses: &[S]) -> Vec<DirectedBranch<'_>> {
        let set = buses
            .iter()
            .filter_map(|b| self.node_indices.get(b.as_ref()))
            .collect::<HashSet<_>>();
        self.graph
            .edge_references()
            .filter(|e| set.contains(&e.source()) && set.contains(&e.target()))
            .map(|e| DirectedBranch {
                from: &self.graph[e.source()],
                to: &self.graph[e.target()],
                branch: e.weight(),
            })
            .collect()
    }

    /// Returns everything reachable from `start` without entering any of
    /// the `barriers` buses.
    pub fn downstream<S: AsRef<str>>(&self, start: &str, barriers: &[S]) -> Result<Reach<'_>, Error> {
        let start = self.index(start)?;
        let barriers = barriers
            .iter()
            .filter_map(|b| self.node_indices.get(b.as_ref()).copied())
            .filter(|b| *b != start)
            .collect::<HashSet<_>>();
        Ok(self.walk(start, &barriers))
    }

    pub(crate) fn source_index(&self) -> Result<NodeIndex, Error> {
        self.source
            .ok_or_else(|| Error::invalid_graph("The network has no source bus."))
    }

    fn walk(&self, start: NodeIndex, barriers: &HashSet<NodeIndex>) -> Reach<'_> {
        let mut reach = Reach::default();
        let mut seen = HashSet::from([start]);
        let mut used_edges = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            reach.buses.push(self.bus_name(index));
            for edge in self.graph.edges(index) {
                let next = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                if barriers.contains(&next) || !used_edges.insert(edge.id()) {
                    continue;
                }
                reach.branches.push(self.directed(index, edge.id()));
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        reach
    }
}
