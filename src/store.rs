// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The store that owns every primary entity of a feeder model.

mod creation;
mod mutation;
mod retrieval;

use std::collections::{BTreeMap, HashMap};

use crate::model::{Element, ElementKind};

/// Entities of one type, in insertion order, with a name index.
///
/// Removal leaves a tombstone behind, so the positions of the other entities
/// stay valid.  Tombstones are compacted away once they outnumber the live
/// entities.
#[derive(Clone, Debug, Default)]
pub(crate) struct Bucket {
    slots: Vec<Option<Element>>,
    index: HashMap<String, usize>,
}

impl Bucket {
    fn len(&self) -> usize {
        self.index.len()
    }

    fn get(&self, name: &str) -> Option<&Element> {
        self.index.get(name).and_then(|&i| self.slots[i].as_ref())
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.index.get(name).and_then(|&i| self.slots[i].as_mut())
    }

    fn iter(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().flatten()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.slots.iter_mut().flatten()
    }

    fn insert(&mut self, element: Element) {
        self.index
            .insert(element.name().to_string(), self.slots.len());
        self.slots.push(Some(element));
    }

    fn remove(&mut self, name: &str) -> Option<Element> {
        let position = self.index.remove(name)?;
        let element = self.slots[position].take();
        if self.slots.len() > 2 * self.index.len() {
            self.compact();
        }
        element
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index = self
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name().to_string(), i))
            .collect();
    }
}

/// Owns all primary entities of a model, bucketed by type.
///
/// Names are unique within a type.  Iteration within a type follows
/// insertion order; iteration across types follows [`ElementKind`]
/// declaration order.
///
/// The store does not maintain referential integrity: removing an entity
/// leaves every reference to it by name in place.
#[derive(Clone, Debug, Default)]
pub struct Store {
    buckets: BTreeMap<ElementKind, Bucket>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entities, across all types.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entities of the given type.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.buckets
            .get(&kind)
            .map(Bucket::len)
            .unwrap_or(0)
    }
}
