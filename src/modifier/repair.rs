// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Entity-level repairs: missing transformers behind regulators, missing
//! connection types, duplicate wires and buses without a `Node`.

use std::collections::HashSet;

use crate::diagnostics::Diagnostics;
use crate::model::{Capacitor, Entity, Line, Load, Node, PowerTransformer, Regulator};
use crate::network::Network;
use crate::Store;

use super::Modifier;

impl Modifier {
    /// Gives every regulator without a usable `connected_transformer` a
    /// transformer of its own, named `<regulator>_transformer`, with the
    /// regulator's ends, windings and reactances.
    ///
    /// Returns the number of transformers created.
    pub fn synthesize_regulator_transformers(
        &self,
        store: &mut Store,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let orphans = store
            .iter::<Regulator>()
            .filter(|reg| !reg.drop)
            .filter(|reg| {
                !reg.connected_transformer
                    .as_deref()
                    .is_some_and(|name| store.get::<PowerTransformer>(name).is_ok())
            })
            .cloned()
            .collect::<Vec<_>>();

        let mut created = 0;
        for reg in orphans {
            if reg.from_element.is_none() || reg.to_element.is_none() {
                diagnostics.error(
                    "regulator",
                    &reg.name,
                    "Regulator is missing an end. No transformer created.",
                );
                continue;
            }
            let xfmr = PowerTransformer {
                name: format!("{}_transformer", reg.name),
                substation_name: reg.substation_name.clone(),
                feeder_name: reg.feeder_name.clone(),
                from_element: reg.from_element.clone(),
                to_element: reg.to_element.clone(),
                reactances: reg.reactances.clone(),
                windings: reg.windings.clone(),
                positions: reg.positions.clone(),
                ..Default::default()
            };
            let name = match store.add_with_unique_name(xfmr.into_element()) {
                Ok(name) => name,
                Err(err) => {
                    diagnostics.error("regulator", &reg.name, err.to_string());
                    continue;
                }
            };
            tracing::debug!("Created transformer {name} for regulator {}.", reg.name);
            if let Ok(stored) = store.get_mut::<Regulator>(&reg.name) {
                stored.connected_transformer = Some(name);
            }
            created += 1;
        }
        created
    }

    /// Gives loads and capacitors without a connection type the configured
    /// default.
    pub fn normalize_connections(&self, store: &mut Store, diagnostics: &mut Diagnostics) {
        let default = self.config.default_load_connection;
        for load in store.iter_mut::<Load>().filter(|l| l.connection_type.is_none()) {
            load.connection_type = Some(default);
            diagnostics.warn(
                "connection",
                &load.name,
                format!("No connection type. Using {default}."),
            );
        }
        for cap in store
            .iter_mut::<Capacitor>()
            .filter(|c| c.connection_type.is_none())
        {
            cap.connection_type = Some(default);
            diagnostics.warn(
                "connection",
                &cap.name,
                format!("No connection type. Using {default}."),
            );
        }
    }

    /// Keeps the first wire of every phase on each line and marks the
    /// others to be dropped.
    pub fn normalize_wires(&self, store: &mut Store, diagnostics: &mut Diagnostics) {
        for line in store.iter_mut::<Line>() {
            let mut seen = HashSet::new();
            for wire in line.wires.iter_mut().filter(|w| !w.drop) {
                let Some(phase) = wire.phase else {
                    continue;
                };
                if !seen.insert(phase) {
                    wire.drop = true;
                    diagnostics.warn(
                        "wire",
                        &line.name,
                        format!("More than one wire on phase {phase}. Dropping the extra ones."),
                    );
                }
            }
        }
    }

    /// Points every regulator the same way as the transformer that carries
    /// it, after the transformers were oriented.
    pub fn align_regulators(&self, store: &mut Store, diagnostics: &mut Diagnostics) {
        let ends = store
            .iter::<PowerTransformer>()
            .map(|x| (x.name.clone(), (x.from_element.clone(), x.to_element.clone())))
            .collect::<std::collections::HashMap<_, _>>();
        for reg in store.iter_mut::<Regulator>().filter(|r| !r.drop) {
            let Some((from, to)) = reg
                .connected_transformer
                .as_ref()
                .and_then(|name| ends.get(name))
            else {
                continue;
            };
            if (&reg.from_element, &reg.to_element) != (to, from) {
                continue;
            }
            if reg.windings.len() > 2 {
                diagnostics.warn(
                    "orientation",
                    &reg.name,
                    "Regulator with more than two windings points towards the source.",
                );
                continue;
            }
            std::mem::swap(&mut reg.from_element, &mut reg.to_element);
            reg.windings.reverse();
        }
    }

    /// Adds a `Node` for every bus that branches refer to but that has no
    /// `Node` of its own.
    pub fn add_missing_nodes(&self, store: &mut Store, diagnostics: &mut Diagnostics) {
        let missing = match Network::build(store, None) {
            Ok(network) => network
                .buses()
                .filter(|bus| store.get::<Node>(bus).is_err())
                .map(str::to_string)
                .collect::<Vec<_>>(),
            Err(err) => {
                diagnostics.error("topology", "network", err.to_string());
                return;
            }
        };
        for bus in missing {
            match store.add(Node::new(bus.as_str())) {
                Ok(()) => diagnostics.warn("reference", &bus, "Bus has no Node. Created one."),
                Err(err) => diagnostics.error("reference", &bus, err.to_string()),
            }
        }
    }
}
