// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The structural modifier: repairs a freshly read model so that writers can
//! consume it without guessing.
//!
//! [`Modifier::apply`] runs every step in order.  The steps are also public,
//! for callers that need only some of them, but each one expects the
//! previous ones to have run.
//!
//! No step fails on data it can't repair.  The entity is left as it is, and
//! the problem is logged and recorded in the returned [`Diagnostics`].

mod feeders;
mod repair;
mod topology;
mod voltages;

use crate::config::ModifierConfig;
use crate::diagnostics::Diagnostics;
use crate::network::Network;
use crate::Store;

/// Applies the structural repairs to a [`Store`].
#[derive(Clone, Debug, Default)]
pub struct Modifier {
    config: ModifierConfig,
}

impl Modifier {
    pub fn new(config: ModifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModifierConfig {
        &self.config
    }

    /// Runs the whole pipeline on the given store.
    pub fn apply(&self, store: &mut Store) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        self.synthesize_regulator_transformers(store, &mut diagnostics);
        self.normalize_connections(store, &mut diagnostics);
        self.normalize_wires(store, &mut diagnostics);

        let cycles = self.delete_cycles(store, &mut diagnostics);
        tracing::info!("Broke {cycles} loops.");

        let Some(network) = self.rebuild(store, &mut diagnostics) else {
            return diagnostics;
        };
        if network.source().is_none() {
            diagnostics.error(
                "topology",
                "network",
                "No power source bus. Skipping orientation, pruning and voltage propagation.",
            );
        } else {
            if let Err(err) = network.direct_from_source(store) {
                diagnostics.error("orientation", "network", err.to_string());
            }
            self.align_regulators(store, &mut diagnostics);
            let pruned = self.prune_islands(store, &network, &mut diagnostics);
            tracing::info!("Pruned {pruned} disconnected buses.");
        }
        self.add_missing_nodes(store, &mut diagnostics);

        let Some(network) = self.rebuild(store, &mut diagnostics) else {
            return diagnostics;
        };
        if network.source().is_some() {
            let assigned = self.propagate_voltages(store, &network, &mut diagnostics);
            tracing::info!("Assigned nominal voltages to {assigned} buses.");
        }
        self.tag_feeders(store, &network, &mut diagnostics);

        diagnostics
    }

    fn rebuild(&self, store: &Store, diagnostics: &mut Diagnostics) -> Option<Network> {
        match Network::build(store, None) {
            Ok(network) => Some(network),
            Err(err) => {
                diagnostics.error("topology", "network", err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Line, Load, Node, PowerTransformer, Regulator};
    use crate::test_utils::{four_bus_feeder, FeederBuilder};
    use crate::{Error, Phase};

    #[test]
    fn test_four_bus_feeder() -> Result<(), Error> {
        let mut store = four_bus_feeder()?;
        let diagnostics = Modifier::default().apply(&mut store);
        assert_eq!(diagnostics.error_count(), 0);

        let voltage = |name: &str| store.get::<Node>(name).map(|n| n.nominal_voltage);
        assert_eq!(voltage("sourcebus")?, Some(12_470.0));
        assert_eq!(voltage("n2")?, Some(12_470.0));
        assert_eq!(voltage("n3")?, Some(4_160.0));
        assert_eq!(voltage("n4")?, Some(4_160.0));

        let single = store.get::<Load>("ld_1ph")?;
        let vph = single.nominal_voltage.ok_or(Error::internal("no voltage"))?;
        assert!((vph - 2_401.78).abs() < 0.01);
        assert_eq!(single.phase_loads[0].nominal_voltage, Some(vph));
        assert_eq!(single.upstream_transformer_name.as_deref(), Some("t1"));
        assert_eq!(store.get::<Load>("ld_delta")?.nominal_voltage, Some(4_160.0));
        assert_eq!(store.get::<Load>("ld_3ph")?.nominal_voltage, Some(4_160.0));
        Ok(())
    }

    #[test]
    fn test_triangle_loses_one_branch() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "A", 12_470.0)
            .node("A")
            .node("B")
            .node("C")
            .line("ab", "A", "B")
            .line("bc", "B", "C")
            .line("ac", "A", "C")
            .build()?;
        let diagnostics = Modifier::default().apply(&mut store);

        assert_eq!(store.names(ElementKind::Line), vec!["ab", "ac"]);
        assert_eq!(diagnostics.in_category("cycle").count(), 1);
        assert!(Network::build(&store, None)?
            .find_cycles()
            .iter()
            .all(|c| c.is_parallel()));
        Ok(())
    }

    #[test]
    fn test_step_down_voltages() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "head", 13_200.0)
            .node_with_voltage("head", 13_200.0)
            .node("mv")
            .node("lv1")
            .node("lv2")
            .node("lv3")
            .line("l1", "head", "mv")
            .transformer("t1", "mv", "lv1", 13_200.0, 480.0)
            .line("l2", "lv1", "lv2")
            .line("l3", "lv1", "lv3")
            .build()?;
        Modifier::default().apply(&mut store);
        for bus in ["lv1", "lv2", "lv3"] {
            assert_eq!(store.get::<Node>(bus)?.nominal_voltage, Some(480.0));
        }
        assert_eq!(store.get::<Node>("mv")?.nominal_voltage, Some(13_200.0));
        Ok(())
    }

    #[test]
    fn test_edges_end_on_nodes() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "head", 12_470.0)
            .line("l1", "head", "a")
            .line("l2", "a", "b")
            .build()?;
        let diagnostics = Modifier::default().apply(&mut store);
        assert_eq!(store.names(ElementKind::Node), vec!["head", "a", "b"]);
        assert_eq!(diagnostics.in_category("reference").count(), 3);

        let network = Network::build(&store, None)?;
        for branch in network.directed_branches() {
            assert!(store.contains(ElementKind::Node, branch.from));
            assert!(store.contains(ElementKind::Node, branch.to));
        }
        Ok(())
    }

    #[test]
    fn test_reversed_regulator_feeder() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "head", 4_160.0)
            .regulator("reg1", "rg", "head", 4_160.0)
            .line("l1", "rg", "far")
            .load("ld", "far", &[Phase::A], 10_000.0)
            .build()?;
        Modifier::default().apply(&mut store);

        let reg = store.get::<Regulator>("reg1")?;
        assert_eq!(reg.connected_transformer.as_deref(), Some("reg1_transformer"));
        assert_eq!(reg.from_element.as_deref(), Some("head"));
        let xfmr = store.get::<PowerTransformer>("reg1_transformer")?;
        assert_eq!(xfmr.from_element.as_deref(), Some("head"));
        assert_eq!(xfmr.to_element.as_deref(), Some("rg"));
        assert_eq!(store.get::<Line>("l1")?.from_element.as_deref(), Some("rg"));
        assert_eq!(store.get::<Node>("far")?.nominal_voltage, Some(4_160.0));
        assert_eq!(
            store.get::<Load>("ld")?.upstream_transformer_name.as_deref(),
            Some("reg1_transformer")
        );
        Ok(())
    }

    #[test]
    fn test_lone_bus_removed_when_islands_are_kept() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "sub", 12_470.0)
            .node("sub")
            .node("a")
            .node("lonely")
            .line("l1", "sub", "a")
            .build()?;
        let modifier = Modifier::new(ModifierConfig {
            min_island_size: 1,
            prune_islands: false,
            ..Default::default()
        });
        let diagnostics = modifier.apply(&mut store);
        assert_eq!(store.names(ElementKind::Node), vec!["sub", "a"]);
        assert_eq!(diagnostics.error_count(), 0);
        Ok(())
    }

    #[test]
    fn test_no_source() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .node("a")
            .line("ab", "a", "b")
            .build()?;
        let diagnostics = Modifier::default().apply(&mut store);
        assert_eq!(diagnostics.error_count(), 1);
        // nothing was pruned
        assert_eq!(store.names(ElementKind::Line), vec!["ab"]);
        assert!(store.contains(ElementKind::Node, "b"));
        Ok(())
    }
}
