// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Secondary entities.
//!
//! These are owned by a primary entity and are never registered in a store on
//! their own.

use super::enums::{LoadModel, VoltageType, WindingConnection};
use crate::Phase;

entity! {
    /// A geographic coordinate.
    pub struct Position as "Position" {
        /// Longitude, or the x coordinate of a projected system.
        long: Option<f64>,
        /// Latitude, or the y coordinate of a projected system.
        lat: Option<f64>,
        /// Elevation, in meters.
        elevation: Option<f64>,
    }
}

impl Position {
    pub fn new(long: f64, lat: f64) -> Self {
        Self {
            long: Some(long),
            lat: Some(lat),
            elevation: None,
        }
    }
}

entity! {
    /// Per-phase tap and line-drop compensation data on one winding.
    pub struct PhaseWinding as "PhaseWinding" {
        phase: Option<Phase>,
        tap_position: Option<i64>,
        /// Compensator resistance, in volts.
        compensator_r: Option<f64>,
        /// Compensator reactance, in volts.
        compensator_x: Option<f64>,
    }
}

entity! {
    /// One side of a transformer.
    pub struct Winding as "Winding" {
        connection_type: Option<WindingConnection>,
        voltage_type: Option<VoltageType>,
        /// Volts, line-to-line for polyphase windings.
        nominal_voltage: Option<f64>,
        /// Volt-amperes.
        rated_power: Option<f64>,
        /// Volt-amperes.
        emergency_power: Option<f64>,
        /// Percent of the winding base impedance.
        resistance: Option<f64>,
        is_grounded: Option<bool>,
        phase_windings: Vec<PhaseWinding>,
    }
}

impl Winding {
    /// Phases carried by the winding, in declaration order.
    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phase_windings.iter().filter_map(|pw| pw.phase)
    }
}

entity! {
    /// One conductor of a line.
    pub struct Wire as "Wire" {
        phase: Option<Phase>,
        nameclass: Option<String>,
        /// Horizontal offset, in meters.
        x as "X": Option<f64>,
        /// Height above ground, in meters.
        y as "Y": Option<f64>,
        /// Meters.
        diameter: Option<f64>,
        /// Geometric mean radius, in meters.
        gmr: Option<f64>,
        /// Amperes.
        ampacity: Option<f64>,
        /// Amperes.
        emergency_ampacity: Option<f64>,
        /// Ohm per meter.
        resistance: Option<f64>,
        /// Meters.
        insulation_thickness: Option<f64>,
        concentric_neutral_gmr: Option<f64>,
        concentric_neutral_resistance: Option<f64>,
        concentric_neutral_diameter: Option<f64>,
        concentric_neutral_outside_diameter: Option<f64>,
        concentric_neutral_nstrand: Option<i64>,
        is_fuse: Option<bool>,
        is_switch: Option<bool>,
        is_open: Option<bool>,
        is_recloser: Option<bool>,
        is_breaker: Option<bool>,
        is_sectionalizer: Option<bool>,
        is_network_protector: Option<bool>,
        /// Amperes.
        interrupting_rating: Option<f64>,
        drop: bool,
    }
}

impl Wire {
    pub fn with_phase(phase: Phase) -> Self {
        Self {
            phase: Some(phase),
            ..Default::default()
        }
    }

    /// Returns true if the wire has concentric-neutral data.
    pub fn is_concentric_neutral(&self) -> bool {
        self.concentric_neutral_gmr.is_some()
            || self.concentric_neutral_diameter.is_some()
            || self.concentric_neutral_nstrand.is_some()
    }
}

entity! {
    /// Per-phase demand of a load.
    pub struct PhaseLoad as "PhaseLoad" {
        phase: Option<Phase>,
        /// Watts.
        p: Option<f64>,
        /// Vars.
        q: Option<f64>,
        /// Volts, filled in from the connecting bus.
        nominal_voltage: Option<f64>,
        model: Option<LoadModel>,
        use_zip: Option<bool>,
        ppercentimpedance: Option<f64>,
        qpercentimpedance: Option<f64>,
        ppercentcurrent: Option<f64>,
        qpercentcurrent: Option<f64>,
        ppercentpower: Option<f64>,
        qpercentpower: Option<f64>,
        drop: bool,
    }
}

impl PhaseLoad {
    pub fn new(phase: Phase, p: f64, q: f64) -> Self {
        Self {
            phase: Some(phase),
            p: Some(p),
            q: Some(q),
            ..Default::default()
        }
    }

    /// Returns true if the ZIP fractions are present and each triplet sums
    /// to 100 percent.
    pub fn has_valid_zip(&self) -> bool {
        let sum = |a: Option<f64>, b: Option<f64>, c: Option<f64>| match (a, b, c) {
            (Some(a), Some(b), Some(c)) => Some(a + b + c),
            _ => None,
        };
        let p = sum(
            self.ppercentimpedance,
            self.ppercentcurrent,
            self.ppercentpower,
        );
        let q = sum(
            self.qpercentimpedance,
            self.qpercentcurrent,
            self.qpercentpower,
        );
        matches!((p, q), (Some(p), Some(q)) if (p - 100.0).abs() < 1e-6 && (q - 100.0).abs() < 1e-6)
    }
}

entity! {
    /// Per-phase unit of a capacitor bank.
    pub struct PhaseCapacitor as "PhaseCapacitor" {
        phase: Option<Phase>,
        /// Vars.
        var: Option<f64>,
        /// 1 when closed, 0 when open.
        switch: Option<i64>,
        sections: Option<i64>,
        normalsections: Option<i64>,
    }
}

entity! {
    /// Per-phase output of a storage device.
    pub struct PhaseStorage as "PhaseStorage" {
        phase: Option<Phase>,
        /// Watts.
        p: Option<f64>,
        /// Vars.
        q: Option<f64>,
    }
}

/// Class names of the secondary entities.
pub const SECONDARY_CLASSES: &[&str] = &[
    "Position",
    "PhaseWinding",
    "Winding",
    "Wire",
    "PhaseLoad",
    "PhaseCapacitor",
    "PhaseStorage",
];
