// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for deriving a [`Network`] from a [`Store`].

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::model::{Element, Node, PowerSource, PowerTransformer};
use crate::{Error, Store};

use super::{Branch, Levels, Network, NodeIndexMap};

/// `Network` instantiation.
impl Network {
    /// Builds the network of the given store, rooted at `source`.
    ///
    /// When `source` is `None`, the bus of the power source flagged as the
    /// source bus is used, or that of the first power source.  Dropped
    /// entities are ignored.  Returns an error if an explicit `source` is not
    /// a bus of the network.
    pub fn build(store: &Store, source: Option<&str>) -> Result<Self, Error> {
        let mut graph = UnGraph::default();
        let mut indices = NodeIndexMap::new();

        for node in store.iter::<Node>().filter(|n| !n.drop) {
            Self::ensure_node(&mut graph, &mut indices, &node.name);
        }

        for element in store.iter_elements(None) {
            if element.is_dropped() || !element.kind().is_branch() {
                continue;
            }
            let Some((from, to)) = element.endpoints() else {
                tracing::debug!(
                    "{} {} is missing an endpoint and is left out of the network.",
                    element.class(),
                    element.name()
                );
                continue;
            };
            if from == to {
                tracing::warn!(
                    "{} {} connects bus {} to itself and is left out of the network.",
                    element.class(),
                    element.name(),
                    from
                );
                continue;
            }
            let Some(branch) = Self::branch(store, element) else {
                continue;
            };
            let a = Self::ensure_node(&mut graph, &mut indices, from);
            let b = Self::ensure_node(&mut graph, &mut indices, to);
            graph.add_edge(a, b, branch);
        }

        let source = match source {
            Some(name) => Some(*indices.get(name).ok_or_else(|| {
                Error::element_not_found(format!("Source bus `{name}` is not in the network."))
            })?),
            None => Self::find_source(store).and_then(|name| indices.get(name).copied()),
        };

        let mut network = Self {
            graph,
            node_indices: indices,
            source,
            levels: Levels::default(),
        };
        network.levels = network.compute_levels();
        Ok(network)
    }

    /// The bus of the power source that energizes the feeder: the one flagged
    /// as the source bus, or else the first one.
    pub fn find_source(store: &Store) -> Option<&str> {
        let sources = store
            .iter::<PowerSource>()
            .filter(|s| !s.drop)
            .collect::<Vec<_>>();
        sources
            .iter()
            .find(|s| s.is_sourcebus())
            .or(sources.first())
            .and_then(|s| s.connecting_element.as_deref())
    }

    fn ensure_node(
        graph: &mut UnGraph<String, Branch>,
        indices: &mut NodeIndexMap,
        name: &str,
    ) -> NodeIndex {
        if let Some(index) = indices.get(name) {
            return *index;
        }
        let index = graph.add_node(name.to_string());
        indices.insert(name.to_string(), index);
        index
    }

    /// The edge weight for a branch entity.
    ///
    /// A regulator whose windings are carried by a transformer in the store
    /// is represented by that transformer alone.
    fn branch(store: &Store, element: &Element) -> Option<Branch> {
        let (length, phase_count) = match element {
            Element::Line(line) => (line.length, line.phase_count()),
            Element::PowerTransformer(xfmr) => (None, xfmr.phase_count()),
            Element::Regulator(reg) => {
                let carried = reg
                    .connected_transformer
                    .as_deref()
                    .and_then(|name| store.get::<PowerTransformer>(name).ok())
                    .is_some_and(|xfmr| !xfmr.drop);
                if carried {
                    return None;
                }
                (None, reg.phase_count())
            }
            _ => return None,
        };
        Some(Branch {
            name: element.name().to_string(),
            kind: element.kind(),
            length,
            phase_count,
        })
    }

    /// Breadth-first levels, starting from the source and then from the
    /// lowest-indexed bus of each remaining component.
    fn compute_levels(&self) -> Levels {
        let mut levels = Levels::default();
        let roots = self
            .source
            .into_iter()
            .chain(self.graph.node_indices());
        for root in roots {
            if levels.depth.contains_key(&root) {
                continue;
            }
            levels.depth.insert(root, 0);
            let mut queue = VecDeque::from([root]);
            while let Some(index) = queue.pop_front() {
                let depth = levels.depth[&index];
                for edge in self.graph.edges(index) {
                    let next = if edge.source() == index {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    if levels.depth.contains_key(&next) {
                        continue;
                    }
                    levels.depth.insert(next, depth + 1);
                    levels.parent.insert(next, (index, edge.id()));
                    queue.push_back(next);
                }
            }
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Line, Regulator};
    use crate::test_utils::FeederBuilder;

    #[test]
    fn test_nodes_and_edges() -> Result<(), Error> {
        let store = FeederBuilder::new()
            .source("src", "a", 12_470.0)
            .node("a")
            .node("b")
            .node("lonely")
            .line("ab", "a", "b")
            .line("bc", "b", "c")
            .build()?;
        let network = Network::build(&store, None)?;

        // `c` only exists as a line endpoint, `lonely` only as a Node
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.branch_count(), 2);
        assert!(network.contains_bus("c"));
        assert!(network.contains_bus("lonely"));
        assert_eq!(network.source(), Some("a"));
        Ok(())
    }

    #[test]
    fn test_skipped_branches() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .node("a")
            .node("b")
            .line("ab", "a", "b")
            .line("loop", "a", "a")
            .transformer("t1", "a", "b", 12_470.0, 480.0)
            .build()?;
        let mut dropped = Line::between("dropped", "a", "b");
        dropped.drop = true;
        store.add(dropped)?;
        let mut half = Line::new("half");
        half.from_element = Some("a".into());
        store.add(half)?;

        let mut carried = Regulator::new("reg");
        carried.from_element = Some("a".into());
        carried.to_element = Some("b".into());
        carried.connected_transformer = Some("t1".into());
        store.add(carried)?;
        let mut standalone = Regulator::new("reg2");
        standalone.from_element = Some("a".into());
        standalone.to_element = Some("b".into());
        store.add(standalone)?;

        let network = Network::build(&store, None)?;
        let mut names = network
            .branches()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, vec!["ab", "reg2", "t1"]);
        assert_eq!(network.source(), None);
        Ok(())
    }

    #[test]
    fn test_explicit_source() -> Result<(), Error> {
        let store = FeederBuilder::new()
            .source("src", "a", 12_470.0)
            .line("ab", "a", "b")
            .build()?;
        assert_eq!(Network::build(&store, Some("b"))?.source(), Some("b"));
        assert!(Network::build(&store, Some("zz")).is_err_and(
            |e| e == Error::element_not_found("Source bus `zz` is not in the network.")
        ));
        Ok(())
    }

    #[test]
    fn test_source_selection() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("pv_equivalent", "b", 480.0)
            .line("ab", "a", "b")
            .build()?;
        store.get_mut::<PowerSource>("pv_equivalent")?.is_sourcebus = None;
        assert_eq!(Network::find_source(&store), Some("b"));

        let mut head = PowerSource::new("head");
        head.connecting_element = Some("a".into());
        head.is_sourcebus = Some(true);
        store.add(head)?;
        assert_eq!(Network::find_source(&store), Some("a"));
        assert_eq!(
            store.get::<PowerSource>("pv_equivalent")?.is_sourcebus(),
            false
        );
        assert!(store.contains(ElementKind::PowerSource, "head"));
        Ok(())
    }
}
