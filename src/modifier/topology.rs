// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Topology repairs: opening loops and removing disconnected islands.

use std::collections::HashSet;

use crate::diagnostics::Diagnostics;
use crate::model::{ElementKind, Regulator};
use crate::network::{Branch, Network};
use crate::Store;

use super::Modifier;

impl Modifier {
    /// Removes one branch from every loop of three or more branches, until
    /// none is left.  Returns the number of removed branches.
    ///
    /// Parallel branches between the same two buses are kept.
    pub fn delete_cycles(&self, store: &mut Store, diagnostics: &mut Diagnostics) -> usize {
        let mut removed = 0;
        loop {
            let network = match Network::build(store, None) {
                Ok(network) => network,
                Err(err) => {
                    diagnostics.error("cycle", "network", err.to_string());
                    return removed;
                }
            };
            let cycles = network.find_cycles();
            let Some(cycle) = cycles.iter().find(|c| !c.is_parallel()) else {
                return removed;
            };
            let Some(branch) = network.middle_single_phase(cycle, self.config.cycle_break_policy)
            else {
                diagnostics.error("cycle", &cycle.nodes[0], "No branch to break the loop at.");
                return removed;
            };
            let through = cycle.nodes.join(", ");
            if let Err(err) = remove_branch(store, branch) {
                diagnostics.error("cycle", &branch.name, err.to_string());
                return removed;
            }
            diagnostics.warn(
                "cycle",
                &branch.name,
                format!("Removed to break the loop through {through}."),
            );
            removed += 1;
        }
    }

    /// Removes the islands that are not connected to the source.
    ///
    /// A bus that no branch touches is always removed.  Other islands with
    /// fewer than `min_island_size` buses are always removed, larger ones
    /// only when `prune_islands` is set.  Removing an island removes its
    /// `Node`s and branches, and marks the shunt devices and remaining
    /// branches attached to its buses to be dropped.  Returns the number of
    /// removed buses.
    ///
    /// Without a source bus nothing is removed, and an error is recorded.
    pub fn prune_islands(
        &self,
        store: &mut Store,
        network: &Network,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        if network.source().is_none() {
            diagnostics.error(
                "island",
                "network",
                "No power source bus. Islands were not pruned.",
            );
            return 0;
        }
        let mut pruned = HashSet::new();
        // the first island holds the source
        for island in network.find_islands().into_iter().skip(1) {
            let size = island.len();
            if size > 1 && size >= self.config.min_island_size && !self.config.prune_islands {
                diagnostics.warn(
                    "island",
                    island[0],
                    format!("Kept a disconnected island of {size} buses."),
                );
                continue;
            }
            for edge in network.find_internal_edges(island.as_slice()) {
                if let Err(err) = remove_branch(store, edge.branch) {
                    diagnostics.error("island", &edge.branch.name, err.to_string());
                }
            }
            for bus in &island {
                if store.contains(ElementKind::Node, bus) {
                    if let Err(err) = store.remove_element(ElementKind::Node, bus) {
                        diagnostics.error("island", bus, err.to_string());
                    }
                }
                pruned.insert(bus.to_string());
            }
            diagnostics.warn(
                "island",
                island[0],
                format!("Removed a disconnected island of {size} buses."),
            );
        }
        self.drop_dangling(store, &pruned, diagnostics);
        pruned.len()
    }

    /// Marks the entities that refer to one of the `pruned` buses.
    fn drop_dangling(
        &self,
        store: &mut Store,
        pruned: &HashSet<String>,
        diagnostics: &mut Diagnostics,
    ) {
        if pruned.is_empty() {
            return;
        }
        for element in store.iter_elements_mut(None) {
            if element.is_dropped() || element.kind() == ElementKind::Node {
                continue;
            }
            let dangling = element
                .referenced_buses()
                .into_iter()
                .find(|bus| pruned.contains(*bus))
                .map(str::to_string);
            if let Some(bus) = dangling {
                element.set_drop(true);
                diagnostics.warn(
                    "reference",
                    element.name(),
                    format!("Refers to the removed bus `{bus}`. Dropped."),
                );
            }
        }
    }
}

/// Removes a branch entity.  Removing a transformer also removes the
/// regulators it carries.
fn remove_branch(store: &mut Store, branch: &Branch) -> Result<(), crate::Error> {
    store.remove_element(branch.kind, &branch.name)?;
    if branch.kind == ElementKind::PowerTransformer {
        let carried = store
            .iter::<Regulator>()
            .filter(|r| r.connected_transformer.as_deref() == Some(branch.name.as_str()))
            .map(|r| r.name.clone())
            .collect::<Vec<_>>();
        for name in carried {
            store.remove_element(ElementKind::Regulator, &name)?;
        }
    }
    Ok(())
}
