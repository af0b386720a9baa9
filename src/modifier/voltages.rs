// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Propagation of nominal voltages from the source and the transformers to
//! the buses and loads below them.

use std::collections::HashMap;

use crate::diagnostics::Diagnostics;
use crate::model::{ConnectionType, Load, Node, PowerSource, PowerTransformer};
use crate::network::Network;
use crate::Store;

use super::Modifier;

impl Modifier {
    /// Gives every bus without a nominal voltage the voltage of the
    /// secondary winding of the first transformer between it and the
    /// source, or the source voltage when there is none.  Then sets the
    /// nominal voltage of every load from its bus.
    ///
    /// Returns the number of `Node`s that received a voltage.
    pub fn propagate_voltages(
        &self,
        store: &mut Store,
        network: &Network,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let bus_voltages = self.bus_voltages(store, network, diagnostics);

        let mut assigned = 0;
        for node in store.iter_mut::<Node>().filter(|n| !n.drop) {
            if node.nominal_voltage.is_some() {
                continue;
            }
            if let Some((voltage, _)) = bus_voltages.get(&node.name) {
                node.nominal_voltage = Some(*voltage);
                assigned += 1;
            }
        }

        for load in store.iter_mut::<Load>().filter(|l| !l.drop) {
            let Some(bus) = load.connecting_element.as_deref() else {
                diagnostics.warn("voltage", &load.name, "Load has no bus.");
                continue;
            };
            let Some((line_voltage, upstream)) = bus_voltages.get(bus) else {
                diagnostics.warn(
                    "voltage",
                    &load.name,
                    format!("No voltage known for bus `{bus}`."),
                );
                continue;
            };
            let voltage = load_voltage(*line_voltage, load);
            load.nominal_voltage = Some(voltage);
            for phase_load in &mut load.phase_loads {
                phase_load.nominal_voltage = Some(voltage);
            }
            if upstream.is_some() {
                load.upstream_transformer_name = upstream.clone();
            }
        }
        assigned
    }

    /// The line-to-line voltage of every bus connected to the source,
    /// with the transformer it comes from.
    ///
    /// A voltage set on a `Node` wins over the propagated one.
    fn bus_voltages(
        &self,
        store: &Store,
        network: &Network,
        diagnostics: &mut Diagnostics,
    ) -> HashMap<String, (f64, Option<String>)> {
        let source_voltage = network.source().and_then(|bus| {
            store
                .iter::<PowerSource>()
                .filter(|s| !s.drop && s.connecting_element.as_deref() == Some(bus))
                .find_map(|s| s.nominal_voltage)
        });

        let mut voltages = HashMap::new();
        for bus in network.buses() {
            let upstream = match network.get_upstream_transformer(bus) {
                Ok(upstream) => upstream,
                Err(err) => {
                    diagnostics.warn("voltage", bus, err.to_string());
                    continue;
                }
            };
            let stated = store.get::<Node>(bus).ok().and_then(|n| n.nominal_voltage);
            let propagated = match upstream {
                Some(name) => store
                    .get::<PowerTransformer>(name)
                    .ok()
                    .and_then(|x| x.secondary_winding())
                    .and_then(|w| w.nominal_voltage),
                None => source_voltage,
            };
            match stated.or(propagated) {
                Some(voltage) => {
                    voltages.insert(bus.to_string(), (voltage, upstream.map(str::to_string)));
                }
                None => diagnostics.warn(
                    "voltage",
                    bus,
                    match upstream {
                        Some(name) => {
                            format!("Transformer `{name}` has no secondary winding voltage.")
                        }
                        None => "The power source has no nominal voltage.".to_string(),
                    },
                ),
            }
        }
        voltages
    }
}

/// Single-phase wye loads see the phase-to-ground voltage, all others the
/// line-to-line voltage.
fn load_voltage(line_voltage: f64, load: &Load) -> f64 {
    let phase_count = crate::phase::energized_count(load.phases());
    if load.connection_type == Some(ConnectionType::Y) && phase_count == 1 {
        line_voltage / 3f64.sqrt()
    } else {
        line_voltage
    }
}
