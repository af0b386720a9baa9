// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by the tests of all modules.
//!
//! - the `FeederBuilder`, which can declaratively build feeder models for use
//!   in tests.
//! - the `four_bus_feeder` fixture.

use crate::model::{
    ConnectionType, Element, Entity, FeederMetadata, Line, Load, Node, PhaseLoad, PhaseWinding,
    PowerSource, PowerTransformer, Regulator, VoltageType, Winding, WindingConnection, Wire,
};
use crate::{Error, Phase, Store};

const THREE_PHASE: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

/// A builder for creating feeder models easily, for use in tests.
///
/// Entities are added to the store in the order they were declared, and
/// [`FeederBuilder::build`] fails on the first store error.
pub(crate) struct FeederBuilder {
    elements: Vec<Element>,
}

impl FeederBuilder {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Adds an arbitrary entity.
    pub(crate) fn with(mut self, entity: impl Entity) -> Self {
        self.elements.push(entity.into_element());
        self
    }

    pub(crate) fn node(self, name: &str) -> Self {
        self.with(Node::new(name))
    }

    pub(crate) fn node_with_voltage(self, name: &str, voltage: f64) -> Self {
        let mut node = Node::new(name);
        node.nominal_voltage = Some(voltage);
        node.phases = THREE_PHASE.to_vec();
        self.with(node)
    }

    /// Adds a three-phase source bus flagged as the feeder head.
    pub(crate) fn source(self, name: &str, bus: &str, voltage: f64) -> Self {
        let mut source = PowerSource::new(name);
        source.connecting_element = Some(bus.into());
        source.nominal_voltage = Some(voltage);
        source.phases = THREE_PHASE.to_vec();
        source.is_sourcebus = Some(true);
        self.with(source)
    }

    /// Adds a three-phase line with a neutral, 100 meters long.
    pub(crate) fn line(self, name: &str, from: &str, to: &str) -> Self {
        self.line_phases(name, from, to, &[Phase::A, Phase::B, Phase::C, Phase::N])
    }

    pub(crate) fn line_phases(self, name: &str, from: &str, to: &str, phases: &[Phase]) -> Self {
        let mut line = Line::between(name, from, to);
        line.length = Some(100.0);
        line.wires = phases.iter().map(|p| Wire::with_phase(*p)).collect();
        self.with(line)
    }

    /// Adds a three-phase, two-winding wye-wye transformer.
    pub(crate) fn transformer(
        self,
        name: &str,
        from: &str,
        to: &str,
        high_voltage: f64,
        low_voltage: f64,
    ) -> Self {
        let mut xfmr = PowerTransformer::between(name, from, to);
        xfmr.reactances = vec![6.0];
        xfmr.windings = vec![
            winding(VoltageType::High, high_voltage, &THREE_PHASE),
            winding(VoltageType::Low, low_voltage, &THREE_PHASE),
        ];
        self.with(xfmr)
    }

    /// Adds a single-phase center-tap transformer, with the tap on its second
    /// winding.
    pub(crate) fn center_tap(
        self,
        name: &str,
        from: &str,
        to: &str,
        high_voltage: f64,
        low_voltage: f64,
    ) -> Self {
        let mut xfmr = PowerTransformer::between(name, from, to);
        xfmr.reactances = vec![2.04, 2.04, 1.36];
        xfmr.windings = vec![
            winding(VoltageType::High, high_voltage, &[Phase::A]),
            winding(VoltageType::Low, low_voltage, &[Phase::A]),
            winding(VoltageType::Low, low_voltage, &[Phase::A]),
        ];
        self.with(xfmr)
    }

    /// Adds a three-phase regulator with its own windings.
    pub(crate) fn regulator(self, name: &str, from: &str, to: &str, voltage: f64) -> Self {
        let mut reg = Regulator::new(name);
        reg.from_element = Some(from.into());
        reg.to_element = Some(to.into());
        reg.bandwidth = Some(2.0);
        reg.bandcenter = Some(122.0);
        reg.pt_ratio = Some(20.0);
        reg.reactances = vec![1.0];
        reg.windings = vec![
            winding(VoltageType::High, voltage, &THREE_PHASE),
            winding(VoltageType::Low, voltage, &THREE_PHASE),
        ];
        self.with(reg)
    }

    /// Adds a wye-connected load with `p` watts on each of `phases`.
    pub(crate) fn load(self, name: &str, bus: &str, phases: &[Phase], p: f64) -> Self {
        let mut load = Load::new(name);
        load.connecting_element = Some(bus.into());
        load.connection_type = Some(ConnectionType::Y);
        load.phase_loads = phases
            .iter()
            .map(|phase| PhaseLoad::new(*phase, p, p / 2.0))
            .collect();
        self.with(load)
    }

    pub(crate) fn feeder(self, name: &str, headnode: &str, substation: &str) -> Self {
        let mut feeder = FeederMetadata::new(name);
        feeder.headnode = Some(headnode.into());
        feeder.substation_name = Some(substation.into());
        self.with(feeder)
    }

    pub(crate) fn build(self) -> Result<Store, Error> {
        let mut store = Store::new();
        for element in self.elements {
            store.add_element(element)?;
        }
        Ok(store)
    }
}

fn winding(voltage_type: VoltageType, voltage: f64, phases: &[Phase]) -> Winding {
    Winding {
        connection_type: Some(WindingConnection::Y),
        voltage_type: Some(voltage_type),
        nominal_voltage: Some(voltage),
        rated_power: Some(6_000_000.0),
        resistance: Some(0.5),
        phase_windings: phases
            .iter()
            .map(|phase| PhaseWinding {
                phase: Some(*phase),
                tap_position: Some(0),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A small radial feeder: a 12.47 kV source, a step-down transformer to
/// 4.16 kV, and three loads at the far end.
///
/// ```text
/// sourcebus --l1-- n2 ==t1== n3 --l2-- n4 [ld_3ph, ld_1ph, ld_delta]
/// ```
///
/// None of the buses has a nominal voltage.
pub(crate) fn four_bus_feeder() -> Result<Store, Error> {
    let mut store = FeederBuilder::new()
        .source("source", "sourcebus", 12_470.0)
        .node("sourcebus")
        .node("n2")
        .node("n3")
        .node("n4")
        .line("l1", "sourcebus", "n2")
        .transformer("t1", "n2", "n3", 12_470.0, 4_160.0)
        .line("l2", "n3", "n4")
        .load("ld_3ph", "n4", &THREE_PHASE, 100_000.0)
        .load("ld_1ph", "n4", &[Phase::B], 50_000.0)
        .load("ld_delta", "n4", &[Phase::C], 25_000.0)
        .build()?;
    store.get_mut::<Load>("ld_delta")?.connection_type = Some(ConnectionType::D);
    Ok(store)
}
