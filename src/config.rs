// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the structural modifier
//! and for readers and writers.

use std::path::PathBuf;

use crate::model::ConnectionType;

/// How the modifier picks the branch to remove from a loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleBreakPolicy {
    /// The middle branch of the longest run of single-phase branches in the
    /// loop.  Loops without single-phase branches fall back to
    /// [`FarthestFromSource`][Self::FarthestFromSource].
    #[default]
    LongestSinglePhase,

    /// The branch whose nearer end is farthest from the source.
    FarthestFromSource,
}

/// Configuration options for the structural modifier.
#[derive(Clone, Debug)]
pub struct ModifierConfig {
    /// Disconnected islands with fewer buses than this are always removed.
    pub min_island_size: usize,

    /// Whether to also remove disconnected islands with at least
    /// `min_island_size` buses.  When this is `false`, such islands are
    /// reported and kept.
    pub prune_islands: bool,

    pub cycle_break_policy: CycleBreakPolicy,

    /// Connection type given to loads and capacitors that don't have one.
    pub default_load_connection: ConnectionType,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            min_island_size: 10,
            prune_islands: true,
            cycle_break_policy: CycleBreakPolicy::default(),
            default_load_connection: ConnectionType::Y,
        }
    }
}

/// Configuration options for readers.
#[derive(Clone, Default, Debug)]
pub struct ReaderConfig {
    /// Whether warnings raised while parsing should fail the read.
    pub strict: bool,
}

/// Configuration options for writers.
#[derive(Clone, Default, Debug)]
pub struct WriterConfig {
    /// Whether warnings raised while writing should fail the write.
    pub strict: bool,

    /// Where to write the model.  Writers pick their own default file names
    /// inside it when this is a directory.
    pub output_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModifierConfig::default();
        assert_eq!(config.min_island_size, 10);
        assert!(config.prune_islands);
        assert_eq!(config.cycle_break_policy, CycleBreakPolicy::LongestSinglePhase);
        assert_eq!(config.default_load_connection, ConnectionType::Y);

        assert!(!ReaderConfig::default().strict);
        assert!(WriterConfig::default().output_path.is_none());
    }
}
