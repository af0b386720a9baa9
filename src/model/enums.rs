// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Enumerated attribute types shared by the entity records.

string_enum! {
    /// How a load or a capacitor bank is connected.
    pub enum ConnectionType {
        /// Wye, phase-to-neutral.
        Y => "Y",
        /// Delta, phase-to-phase.
        D => "D",
    }
}

string_enum! {
    /// How a transformer winding is connected.
    pub enum WindingConnection {
        Y => "Y",
        D => "D",
        /// Zig-zag.
        Z => "Z",
    }
}

coded_enum! {
    /// Which side of a transformer a winding sits on.
    pub enum VoltageType {
        High = 0,
        Mid = 1,
        Low = 2,
    }
}

string_enum! {
    /// Construction of a line segment.
    pub enum LineType {
        Overhead => "overhead",
        Underground => "underground",
    }
}

coded_enum! {
    /// Load model, numbered as OpenDSS numbers them.
    pub enum LoadModel {
        /// Constant P and Q.
        ConstantPower = 1,
        /// Constant impedance.
        ConstantImpedance = 2,
        /// Constant current magnitude.
        ConstantCurrent = 5,
        /// ZIP composite.
        Zip = 8,
    }
}

string_enum! {
    /// Inverter control mode of a photovoltaic system.
    pub enum PvControlType {
        VoltvarVarsOverWatts => "voltvar_vars_over_watts",
        VoltvarWattsOverVars => "voltvar_watts_over_vars",
        VoltvarFixedVars => "voltvar_fixed_vars",
        VoltvarNovars => "voltvar_novars",
        Voltwatt => "voltwatt",
        WattPowerfactor => "watt_powerfactor",
        Powerfactor => "powerfactor",
        Disabled => "none",
    }
}

impl PvControlType {
    /// Returns true for the volt-var family of control modes.
    pub fn is_voltvar(&self) -> bool {
        matches!(
            self,
            Self::VoltvarVarsOverWatts
                | Self::VoltvarWattsOverVars
                | Self::VoltvarFixedVars
                | Self::VoltvarNovars
        )
    }
}

string_enum! {
    /// Control mode of a switched capacitor bank.
    pub enum CapacitorMode {
        Voltage => "voltage",
        ReactivePower => "reactivePower",
        CurrentFlow => "currentFlow",
        Admittance => "admittance",
        TimeScheduled => "timeScheduled",
        Disabled => "none",
    }
}

string_enum! {
    /// Operating state of a storage device.
    pub enum StorageState {
        Idling => "IDLING",
        Charging => "CHARGING",
        Discharging => "DISCHARGING",
    }
}

string_enum! {
    /// Dispatch model of a storage device.
    pub enum DispatchMode {
        Default => "default",
        Follow => "follow",
        External => "external",
        LoadLevel => "loadlevel",
        Price => "price",
    }
}
