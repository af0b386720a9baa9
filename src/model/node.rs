// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Buses, sources and feeder descriptors.

use num_complex::Complex64;

use super::secondary::Position;
use crate::Phase;

primary! {
    /// A bus: a point of electrical connection.
    pub struct Node as "Node" {
        phases: Vec<Phase>,
        /// Volts, line-to-line for polyphase buses.
        nominal_voltage: Option<f64>,
        positions: Vec<Position>,
        is_substation_connection: Option<bool>,
        /// Target voltage, in per-unit, when the bus is a regulation
        /// reference.
        setpoint: Option<f64>,
    }
}

primary! {
    /// A point of energization: the feeder head or a source equivalent.
    pub struct PowerSource as "PowerSource" {
        connecting_element: Option<String>,
        /// Volts, line-to-line.
        nominal_voltage: Option<f64>,
        phases: Vec<Phase>,
        /// Ohms.
        positive_sequence_impedance: Option<Complex64>,
        /// Ohms.
        zero_sequence_impedance: Option<Complex64>,
        per_unit: Option<f64>,
        /// Volt-amperes.
        rated_power: Option<f64>,
        /// Set on the feeder head, unset on inverters modeled as sources.
        is_sourcebus: Option<bool>,
        positions: Vec<Position>,
    }
}

impl PowerSource {
    /// Returns true if this source energizes the feeder.
    pub fn is_sourcebus(&self) -> bool {
        self.is_sourcebus.unwrap_or(false)
    }
}

primary! {
    /// Bounds a sub-network served from one head bus.
    pub struct FeederMetadata as "Feeder_metadata" {
        headnode: Option<String>,
        /// Volts, line-to-line.
        nominal_voltage: Option<f64>,
        source_id as "sourceID": Option<String>,
        positions: Vec<Position>,
    }
}
