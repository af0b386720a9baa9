// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Stamping feeder and substation names on the entities served by each
//! feeder head.

use std::collections::HashSet;

use crate::diagnostics::Diagnostics;
use crate::model::{ElementKind, FeederMetadata};
use crate::network::Network;
use crate::Store;

use super::Modifier;

impl Modifier {
    /// For every feeder, sets `feeder_name` and `substation_name` on the
    /// buses, branches and shunt devices below its head bus, stopping at the
    /// head buses of other feeders.  A feeder without a substation leaves
    /// the substation names already set in place.
    ///
    /// The walk goes away from the source only.  Returns the number of
    /// tagged entities.
    pub fn tag_feeders(
        &self,
        store: &mut Store,
        network: &Network,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let feeders = store
            .iter::<FeederMetadata>()
            .filter(|f| !f.drop)
            .cloned()
            .collect::<Vec<_>>();
        let heads = feeders
            .iter()
            .filter_map(|f| f.headnode.clone())
            .collect::<Vec<_>>();

        let mut tagged = 0;
        for feeder in &feeders {
            let Some(head) = feeder.headnode.as_deref() else {
                diagnostics.warn("feeder", &feeder.name, "Feeder has no head bus.");
                continue;
            };
            let mut barriers = heads
                .iter()
                .filter(|h| h.as_str() != head)
                .cloned()
                .collect::<Vec<_>>();
            match network.parent_branch(head) {
                Ok(Some(parent)) => barriers.push(parent.from.to_string()),
                Ok(None) => {}
                Err(err) => {
                    diagnostics.warn("feeder", &feeder.name, err.to_string());
                    continue;
                }
            }
            let reach = match network.downstream(head, &barriers) {
                Ok(reach) => reach,
                Err(err) => {
                    diagnostics.warn("feeder", &feeder.name, err.to_string());
                    continue;
                }
            };
            let buses = reach.buses.iter().copied().collect::<HashSet<_>>();
            let branches = reach
                .branches
                .iter()
                .map(|b| (b.branch.kind, b.branch.name.as_str()))
                .collect::<HashSet<_>>();

            for element in store.iter_elements_mut(None) {
                let kind = element.kind();
                let reached = match kind {
                    ElementKind::Node => buses.contains(element.name()),
                    ElementKind::Line | ElementKind::PowerTransformer => {
                        branches.contains(&(kind, element.name()))
                    }
                    // carried regulators are not part of the network
                    ElementKind::Regulator => {
                        branches.contains(&(kind, element.name()))
                            || element
                                .endpoints()
                                .is_some_and(|(a, b)| buses.contains(a) && buses.contains(b))
                    }
                    _ if kind.is_shunt() => element
                        .connecting_element()
                        .is_some_and(|bus| buses.contains(bus)),
                    _ => false,
                };
                if reached {
                    element.set_feeder_name(Some(feeder.name.clone()));
                    if let Some(substation) = &feeder.substation_name {
                        element.set_substation_name(Some(substation.clone()));
                    }
                    tagged += 1;
                }
            }
            tracing::debug!("Feeder {} serves {} buses.", feeder.name, buses.len());
        }
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Load, Node};
    use crate::test_utils::FeederBuilder;
    use crate::{Error, Phase};

    #[test]
    fn test_two_feeders() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .source("src", "sub", 12_470.0)
            .node("sub")
            .node("h1")
            .node("a")
            .node("h2")
            .node("b")
            .line("f1_head", "sub", "h1")
            .line("f1_a", "h1", "a")
            .line("f2_head", "sub", "h2")
            .line("f2_b", "h2", "b")
            .load("ld_a", "a", &[Phase::A], 1_000.0)
            .load("ld_b", "b", &[Phase::A], 1_000.0)
            .feeder("feeder_1", "h1", "substation")
            .feeder("feeder_2", "h2", "substation")
            .build()?;
        let network = Network::build(&store, None)?;
        let tagged =
            Modifier::default().tag_feeders(&mut store, &network, &mut Diagnostics::new());
        // h1, a, f1_a and ld_a for each feeder
        assert_eq!(tagged, 8);

        let feeder_of = |kind: ElementKind, name: &str| {
            store
                .get_element(kind, name)
                .map(|e| e.feeder_name().map(str::to_string))
        };
        assert_eq!(feeder_of(ElementKind::Node, "a")?.as_deref(), Some("feeder_1"));
        assert_eq!(feeder_of(ElementKind::Load, "ld_b")?.as_deref(), Some("feeder_2"));
        assert_eq!(feeder_of(ElementKind::Line, "f2_b")?.as_deref(), Some("feeder_2"));
        // upstream of both heads
        assert_eq!(feeder_of(ElementKind::Node, "sub")?, None);
        assert_eq!(feeder_of(ElementKind::Line, "f1_head")?, None);

        assert_eq!(
            store.get::<Node>("h2")?.substation_name.as_deref(),
            Some("substation")
        );
        assert!(store.get::<Load>("ld_a")?.feeder_name.is_some());
        assert!(store.get::<Line>("f1_a")?.substation_name.is_some());
        Ok(())
    }

    #[test]
    fn test_feeder_without_substation() -> Result<(), Error> {
        let mut bus = Node::new("a");
        bus.substation_name = Some("north".into());
        let mut feeder = FeederMetadata::new("f1");
        feeder.headnode = Some("h".into());
        let mut store = FeederBuilder::new()
            .source("src", "sub", 12_470.0)
            .node("sub")
            .node("h")
            .with(bus)
            .line("head", "sub", "h")
            .line("ha", "h", "a")
            .with(feeder)
            .build()?;
        let network = Network::build(&store, None)?;
        let tagged =
            Modifier::default().tag_feeders(&mut store, &network, &mut Diagnostics::new());
        assert_eq!(tagged, 3);

        let a = store.get::<Node>("a")?;
        assert_eq!(a.feeder_name.as_deref(), Some("f1"));
        assert_eq!(a.substation_name.as_deref(), Some("north"));
        assert_eq!(store.get::<Node>("h")?.substation_name, None);
        Ok(())
    }

    #[test]
    fn test_missing_head() -> Result<(), Error> {
        let mut store = FeederBuilder::new()
            .line("l1", "a", "b")
            .feeder("f1", "nowhere", "sub")
            .with(FeederMetadata::new("f2"))
            .build()?;
        let network = Network::build(&store, None)?;
        let mut diagnostics = Diagnostics::new();
        assert_eq!(Modifier::default().tag_feeders(&mut store, &network, &mut diagnostics), 0);
        assert_eq!(diagnostics.in_category("feeder").count(), 2);
        Ok(())
    }
}
