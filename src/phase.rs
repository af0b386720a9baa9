// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Phase` enum, which labels the conductors of a
//! bus or a piece of equipment.

string_enum! {
    /// A phase label.
    ///
    /// `S1` and `S2` are the two hot legs of a split-phase (center-tapped)
    /// secondary.
    pub enum Phase {
        A => "A",
        B => "B",
        C => "C",
        N => "N",
        S1 => "s1",
        S2 => "s2",
    }
}

impl Phase {
    /// Returns true for the neutral conductor.
    pub fn is_neutral(&self) -> bool {
        *self == Phase::N
    }

    /// Returns true for the legs of a split-phase secondary.
    pub fn is_split(&self) -> bool {
        matches!(self, Phase::S1 | Phase::S2)
    }
}

/// Returns the number of energized (non-neutral) phases in `phases`,
/// counting each label once.
pub fn energized_count(phases: impl IntoIterator<Item = Phase>) -> usize {
    let mut seen: Vec<Phase> = Vec::new();
    for phase in phases {
        if !phase.is_neutral() && !seen.contains(&phase) {
            seen.push(phase);
        }
    }
    seen.len()
}
