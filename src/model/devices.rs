// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Shunt devices attached to a single bus, and the timeseries they refer to.

use super::enums::{CapacitorMode, ConnectionType, DispatchMode, PvControlType, StorageState};
use super::secondary::{PhaseCapacitor, PhaseLoad, PhaseStorage, Position};
use crate::Phase;

primary! {
    /// A lumped customer load.
    pub struct Load as "Load" {
        connecting_element: Option<String>,
        connection_type: Option<ConnectionType>,
        /// Volts. Phase-to-ground for single-phase wye loads, line-to-line
        /// otherwise.
        nominal_voltage: Option<f64>,
        /// Per-unit.
        vmin: Option<f64>,
        /// Per-unit.
        vmax: Option<f64>,
        phase_loads: Vec<PhaseLoad>,
        /// Names of [`Timeseries`] entities.
        timeseries: Vec<String>,
        /// First transformer between the load and the source.
        upstream_transformer_name: Option<String>,
        positions: Vec<Position>,
    }
}

impl Load {
    /// Phases of the phase loads that are not dropped.
    pub fn phases(&self) -> Vec<Phase> {
        self.phase_loads
            .iter()
            .filter(|pl| !pl.drop)
            .filter_map(|pl| pl.phase)
            .collect()
    }

    /// Total active power of the phase loads that are not dropped, in watts.
    pub fn total_p(&self) -> f64 {
        self.phase_loads
            .iter()
            .filter(|pl| !pl.drop)
            .filter_map(|pl| pl.p)
            .sum()
    }

    /// Total reactive power of the phase loads that are not dropped, in vars.
    pub fn total_q(&self) -> f64 {
        self.phase_loads
            .iter()
            .filter(|pl| !pl.drop)
            .filter_map(|pl| pl.q)
            .sum()
    }
}

primary! {
    /// A shunt capacitor bank, with optional switching control.
    pub struct Capacitor as "Capacitor" {
        connecting_element: Option<String>,
        connection_type: Option<ConnectionType>,
        /// Volts.
        nominal_voltage: Option<f64>,
        mode: Option<CapacitorMode>,
        /// Lower control setpoint, in the unit of `mode`.
        low: Option<f64>,
        /// Upper control setpoint, in the unit of `mode`.
        high: Option<f64>,
        /// Seconds.
        delay: Option<f64>,
        pt_ratio: Option<f64>,
        ct_ratio: Option<f64>,
        pt_phase: Option<Phase>,
        /// Element whose terminal the control measures.
        measuring_element: Option<String>,
        phase_capacitors: Vec<PhaseCapacitor>,
        positions: Vec<Position>,
    }
}

impl Capacitor {
    /// Total rating of the bank, in vars.
    pub fn total_var(&self) -> f64 {
        self.phase_capacitors.iter().filter_map(|pc| pc.var).sum()
    }
}

primary! {
    /// A photovoltaic system behind an inverter.
    pub struct Photovoltaic as "Photovoltaic" {
        connecting_element: Option<String>,
        /// Volts.
        nominal_voltage: Option<f64>,
        phases: Vec<Phase>,
        /// Inverter rating, in volt-amperes.
        rated_power: Option<f64>,
        /// Watts.
        active_rating: Option<f64>,
        /// Vars.
        reactive_rating: Option<f64>,
        power_factor: Option<f64>,
        control_type: Option<PvControlType>,
        min_powerfactor: Option<f64>,
        cutin_percent: Option<f64>,
        cutout_percent: Option<f64>,
        v_min_pu: Option<f64>,
        v_max_pu: Option<f64>,
        /// Percent per second.
        rise_limit: Option<f64>,
        /// Percent per second.
        fall_limit: Option<f64>,
        voltvar_curve: Option<String>,
        voltwatt_curve: Option<String>,
        watt_powerfactor_curve: Option<String>,
        /// Names of [`Timeseries`] entities.
        timeseries: Vec<String>,
        positions: Vec<Position>,
    }
}

primary! {
    /// A battery or other storage device.
    pub struct Storage as "Storage" {
        connecting_element: Option<String>,
        /// Volts.
        nominal_voltage: Option<f64>,
        /// Volt-amperes.
        rated_power: Option<f64>,
        /// Kilowatt-hours.
        rated_kwh as "rated_kWh": Option<f64>,
        /// Kilowatt-hours.
        stored_kwh as "stored_kWh": Option<f64>,
        /// Percent of rated energy kept in reserve.
        reserve: Option<f64>,
        state: Option<StorageState>,
        /// Percent of rated power.
        discharge_rate: Option<f64>,
        /// Percent of rated power.
        charge_rate: Option<f64>,
        /// Percent.
        charging_efficiency: Option<f64>,
        /// Percent.
        discharging_efficiency: Option<f64>,
        /// Percent.
        resistance: Option<f64>,
        /// Percent.
        reactance: Option<f64>,
        model as "model_": Option<DispatchMode>,
        phase_storages: Vec<PhaseStorage>,
        yearly: Option<String>,
        daily: Option<String>,
        duty: Option<String>,
        /// Per-unit of the peak load.
        discharge_trigger: Option<f64>,
        /// Per-unit of the peak load.
        charge_trigger: Option<f64>,
        positions: Vec<Position>,
    }
}

impl Storage {
    /// Phases of the per-phase outputs.
    pub fn phases(&self) -> Vec<Phase> {
        self.phase_storages.iter().filter_map(|ps| ps.phase).collect()
    }
}

primary! {
    /// A reference to a load-shape or irradiance series.
    ///
    /// The samples are not held here; see [`crate::timeseries`] for lazy
    /// access to them.
    pub struct Timeseries as "Timeseries" {
        data_label: Option<String>,
        /// A file path, or a tag naming an in-memory dataset.
        data_location: Option<String>,
        /// Seconds between samples.
        interval: Option<f64>,
        data_type: Option<String>,
        /// `1` means the data is used as-is.
        scale_factor: Option<f64>,
        loaded: Option<bool>,
    }
}
