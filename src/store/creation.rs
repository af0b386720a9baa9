// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for adding entities to a [`Store`].

use crate::model::{Element, Entity};
use crate::{Error, Store};

/// Entity insertion.
impl Store {
    /// Adds an entity to the bucket of its type.
    ///
    /// Fails with a `DuplicateName` error if the bucket already holds an
    /// entity with the same name, and with an `InvalidElementType` error if
    /// the entity has no name.  The store is unchanged on failure.
    pub fn add_element(&mut self, element: Element) -> Result<(), Error> {
        if element.name().is_empty() {
            return Err(Error::invalid_element_type(format!(
                "{} has no name.",
                element.class()
            )));
        }
        let kind = element.kind();
        let bucket = self.buckets.entry(kind).or_default();
        if bucket.index.contains_key(element.name()) {
            return Err(Error::duplicate_name(format!(
                "{} `{}` already exists.",
                kind,
                element.name()
            )));
        }
        bucket.insert(element);
        Ok(())
    }

    /// Adds a typed entity.  Same as [`Store::add_element`].
    pub fn add<T: Entity>(&mut self, entity: T) -> Result<(), Error> {
        self.add_element(entity.into_element())
    }

    /// Adds an entity, appending `_1`, `_2`, ... to its name until it is
    /// unique within its type.  Returns the name it was stored under.
    ///
    /// This is the renaming rule readers use when the source format allows
    /// duplicate names.
    pub fn add_with_unique_name(&mut self, mut element: Element) -> Result<String, Error> {
        let base = element.name().to_string();
        let mut name = base.clone();
        let mut suffix = 0;
        while self.contains(element.kind(), &name) {
            suffix += 1;
            name = format!("{base}_{suffix}");
        }
        element.set_name(name.clone());
        self.add_element(element)?;
        Ok(name)
    }
}
