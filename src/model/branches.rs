// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Two-terminal equipment: lines, transformers and regulators.
//!
//! These are the entities that become edges of the [`Network`][crate::Network].

use num_complex::Complex64;

use super::enums::LineType;
use super::secondary::{Position, Winding, Wire};
use crate::phase::energized_count;
use crate::Phase;

primary! {
    /// A line segment, or a switching device modeled as one.
    pub struct Line as "Line" {
        from_element: Option<String>,
        to_element: Option<String>,
        /// Meters.
        length: Option<f64>,
        /// Volts, line-to-line.
        nominal_voltage: Option<f64>,
        line_type: Option<LineType>,
        is_switch: Option<bool>,
        is_fuse: Option<bool>,
        is_recloser: Option<bool>,
        is_breaker: Option<bool>,
        is_sectionalizer: Option<bool>,
        is_network_protector: Option<bool>,
        is_banked: Option<bool>,
        /// Failures per year per mile.
        faultrate: Option<f64>,
        /// Ohm per meter.
        impedance_matrix: Vec<Vec<Complex64>>,
        /// Nanofarad per meter.
        capacitance_matrix: Vec<Vec<Complex64>>,
        nameclass: Option<String>,
        wires: Vec<Wire>,
        positions: Vec<Position>,
    }
}

impl Line {
    /// Creates a line between two buses.
    pub fn between(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            from_element: Some(from.into()),
            to_element: Some(to.into()),
            ..Self::new(name)
        }
    }

    /// Phases of the wires that are not dropped, including the neutral.
    pub fn phases(&self) -> Vec<Phase> {
        self.wires
            .iter()
            .filter(|w| !w.drop)
            .filter_map(|w| w.phase)
            .collect()
    }

    /// Number of energized phases carried by the line.
    pub fn phase_count(&self) -> usize {
        energized_count(self.phases())
    }

    /// A zero-length switch is a closed switch.
    pub fn is_closed_switch(&self) -> bool {
        self.is_switch == Some(true)
            && self.length == Some(0.0)
            && !self.wires.iter().any(|w| w.is_open == Some(true))
    }

    /// Returns true if the line models a switching or protective device.
    pub fn is_switching_device(&self) -> bool {
        [
            self.is_switch,
            self.is_fuse,
            self.is_recloser,
            self.is_breaker,
            self.is_sectionalizer,
            self.is_network_protector,
        ]
        .iter()
        .any(|flag| *flag == Some(true))
    }
}

primary! {
    /// A multi-winding transformer.
    ///
    /// Center-tapped transformers have three windings, with the tap on the
    /// second one, and three reactances `[XHL, XLT, XHT]`.
    pub struct PowerTransformer as "PowerTransformer" {
        from_element: Option<String>,
        to_element: Option<String>,
        /// Percent.
        loadloss: Option<f64>,
        /// Percent.
        noload_loss: Option<f64>,
        /// Normal rating of the high side, in volt-amperes.
        normhkva: Option<f64>,
        /// Percent. One value for two windings, `[XHL, XLT, XHT]` for three.
        reactances: Vec<f64>,
        install_type: Option<String>,
        windings: Vec<Winding>,
        positions: Vec<Position>,
    }
}

impl PowerTransformer {
    /// Creates a transformer between two buses.
    pub fn between(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            from_element: Some(from.into()),
            to_element: Some(to.into()),
            ..Self::new(name)
        }
    }

    pub fn is_center_tap(&self) -> bool {
        self.windings.len() == 3 && self.reactances.len() == 3
    }

    /// The winding that feeds the `to_element` side.
    pub fn secondary_winding(&self) -> Option<&Winding> {
        self.windings.get(1)
    }

    /// Number of energized phases on the primary winding.
    pub fn phase_count(&self) -> usize {
        self.windings
            .first()
            .map(|w| energized_count(w.phases()))
            .unwrap_or(0)
    }
}

primary! {
    /// A tap-changing voltage regulator.
    pub struct Regulator as "Regulator" {
        /// The transformer that carries the regulator's windings.
        connected_transformer: Option<String>,
        from_element: Option<String>,
        to_element: Option<String>,
        /// Volts on the PT secondary base.
        bandwidth: Option<f64>,
        /// Volts on the PT secondary base.
        bandcenter: Option<f64>,
        /// Seconds.
        delay: Option<f64>,
        highstep: Option<i64>,
        lowstep: Option<i64>,
        pt_ratio: Option<f64>,
        ct_ratio: Option<f64>,
        /// Amperes.
        ct_prim: Option<f64>,
        pt_phase: Option<Phase>,
        /// Index of the regulated winding.
        winding: Option<i64>,
        /// Volts on the PT secondary base.
        voltage_limit: Option<f64>,
        /// Percent.
        reactances: Vec<f64>,
        windings: Vec<Winding>,
        positions: Vec<Position>,
    }
}

impl Regulator {
    /// Number of energized phases on the regulated winding.
    pub fn phase_count(&self) -> usize {
        self.windings
            .first()
            .map(|w| energized_count(w.phases()))
            .unwrap_or(0)
    }
}
