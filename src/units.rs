// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Conversions between the canonical units of the model and the units that
//! source and target formats use.
//!
//! The model stores watts, vars, volt-amperes, volts and meters.  Readers
//! convert into these units with the `from_*` helpers, writers convert out
//! of them with the `to_*` helpers.

const FEET_PER_METER: f64 = 1.0 / 0.3048;

string_enum! {
    /// A unit of length, as found in distribution model formats.
    pub enum LengthUnit {
        Meter => "m",
        Foot => "ft",
        Kilofoot => "kft",
        Mile => "mi",
        Kilometer => "km",
    }
}

impl LengthUnit {
    /// Meters in one of this unit.
    pub fn meters(&self) -> f64 {
        match self {
            Self::Meter => 1.0,
            Self::Foot => 0.3048,
            Self::Kilofoot => 304.8,
            Self::Mile => 1_609.344,
            Self::Kilometer => 1_000.0,
        }
    }

    /// Converts a length in this unit to meters.
    pub fn to_meters(&self, length: f64) -> f64 {
        length * self.meters()
    }

    /// Converts a length in meters to this unit.
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.meters()
    }

    /// Converts a per-length quantity, such as ohms per mile, to the same
    /// quantity per meter.
    pub fn per_meter(&self, per_unit_length: f64) -> f64 {
        per_unit_length / self.meters()
    }
}

/// Kilowatts, kilovolt-amperes or kilovars to watts, volt-amperes or vars.
pub fn from_kilo(value: f64) -> f64 {
    value * 1_000.0
}

/// Watts, volt-amperes or vars to kilowatts, kilovolt-amperes or kilovars.
pub fn to_kilo(value: f64) -> f64 {
    value / 1_000.0
}

/// Kilovolts to volts.
pub fn from_kv(kv: f64) -> f64 {
    from_kilo(kv)
}

/// Volts to kilovolts.
pub fn to_kv(volts: f64) -> f64 {
    to_kilo(volts)
}

/// Meters to feet.
pub fn to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Line-to-line voltage to line-to-neutral voltage, for balanced wye
/// systems.
pub fn line_to_neutral(volts: f64) -> f64 {
    volts / 3f64.sqrt()
}
