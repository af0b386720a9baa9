// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for removing and renaming the entities of a [`Store`].

use crate::model::{Element, ElementKind};
use crate::{Error, Store};

/// Entity removal and renaming.
impl Store {
    /// Removes and returns the entity of the given type and name.
    ///
    /// Other entities that refer to it by name are left in place.
    pub fn remove_element(&mut self, kind: ElementKind, name: &str) -> Result<Element, Error> {
        self.buckets
            .get_mut(&kind)
            .and_then(|b| b.remove(name))
            .ok_or_else(|| Error::element_not_found(format!("{} `{}` not found.", kind, name)))
    }

    /// Renames an entity, keeping its position in iteration order.
    ///
    /// Fails with a `DuplicateName` error, leaving the store unchanged, if
    /// another entity of the same type already has the new name.
    pub fn rename_element(
        &mut self,
        kind: ElementKind,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), Error> {
        if new_name.is_empty() {
            return Err(Error::invalid_element_type(format!(
                "{kind} `{old_name}` can't be renamed to an empty name."
            )));
        }
        let Some(bucket) = self.buckets.get_mut(&kind) else {
            return Err(Error::element_not_found(format!(
                "{kind} `{old_name}` not found."
            )));
        };
        let Some(&position) = bucket.index.get(old_name) else {
            return Err(Error::element_not_found(format!(
                "{kind} `{old_name}` not found."
            )));
        };
        if old_name == new_name {
            return Ok(());
        }
        if bucket.index.contains_key(new_name) {
            return Err(Error::duplicate_name(format!(
                "{kind} `{new_name}` already exists."
            )));
        }
        bucket.index.remove(old_name);
        bucket.index.insert(new_name.to_string(), position);
        if let Some(element) = bucket.slots[position].as_mut() {
            element.set_name(new_name.to_string());
        }
        Ok(())
    }

    /// Removes every entity.
    pub fn clear_elements(&mut self) {
        self.buckets.clear();
    }
}
