// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for looking up and iterating over the entities of a [`Store`].

use crate::model::{Element, ElementKind, Entity};
use crate::{Error, Store};

fn not_found(kind: ElementKind, name: &str) -> Error {
    Error::element_not_found(format!("{} `{}` not found.", kind, name))
}

/// Entity lookup and iteration.
impl Store {
    /// Returns true if the store holds an entity of the given type and name.
    pub fn contains(&self, kind: ElementKind, name: &str) -> bool {
        self.buckets
            .get(&kind)
            .is_some_and(|b| b.index.contains_key(name))
    }

    /// Returns the entity of the given type and name.
    pub fn get_element(&self, kind: ElementKind, name: &str) -> Result<&Element, Error> {
        self.buckets
            .get(&kind)
            .and_then(|b| b.get(name))
            .ok_or_else(|| not_found(kind, name))
    }

    /// Returns the entity of the given type and name, mutably.
    ///
    /// Use [`Store::rename_element`] to change its name.
    pub fn get_element_mut(
        &mut self,
        kind: ElementKind,
        name: &str,
    ) -> Result<&mut Element, Error> {
        self.buckets
            .get_mut(&kind)
            .and_then(|b| b.get_mut(name))
            .ok_or_else(|| not_found(kind, name))
    }

    /// Returns the typed entity with the given name.
    pub fn get<T: Entity>(&self, name: &str) -> Result<&T, Error> {
        self.get_element(T::KIND, name)
            .and_then(|e| T::from_element(e).ok_or_else(|| wrong_bucket(T::KIND, name)))
    }

    /// Returns the typed entity with the given name, mutably.
    ///
    /// The name can't be assigned through the returned reference; use
    /// [`Store::rename_element`] so the store's index follows:
    ///
    /// ```compile_fail
    /// use ditto_core::{Node, Store};
    ///
    /// let mut store = Store::new();
    /// store.add(Node::new("a"))?;
    /// store.get_mut::<Node>("a")?.name = "b".into();
    /// # Ok::<(), ditto_core::Error>(())
    /// ```
    pub fn get_mut<T: Entity>(&mut self, name: &str) -> Result<&mut T, Error> {
        self.get_element_mut(T::KIND, name)
            .and_then(|e| T::from_element_mut(e).ok_or_else(|| wrong_bucket(T::KIND, name)))
    }

    /// Looks an entity up by name alone, across all types.
    ///
    /// Kept for callers that only have a name.  Fails with a `DuplicateName`
    /// error if more than one type holds the name.
    pub fn element_by_name(&self, name: &str) -> Result<&Element, Error> {
        let mut matches = self.buckets.values().filter_map(|b| b.get(name));
        let Some(first) = matches.next() else {
            return Err(Error::element_not_found(format!("`{name}` not found.")));
        };
        let rest = matches.map(|e| e.class()).collect::<Vec<_>>();
        if !rest.is_empty() {
            return Err(Error::duplicate_name(format!(
                "`{}` names more than one element: {}, {}.",
                name,
                first.class(),
                rest.join(", ")
            )));
        }
        Ok(first)
    }

    /// Iterates over the entities of one type, or of all types, in order.
    pub fn iter_elements(&self, kind: Option<ElementKind>) -> impl Iterator<Item = &Element> {
        self.buckets
            .iter()
            .filter(move |(k, _)| kind.map_or(true, |kind| **k == kind))
            .flat_map(|(_, b)| b.iter())
    }

    /// Iterates mutably over the entities of one type, or of all types.
    pub fn iter_elements_mut(
        &mut self,
        kind: Option<ElementKind>,
    ) -> impl Iterator<Item = &mut Element> {
        self.buckets
            .iter_mut()
            .filter(move |(k, _)| kind.map_or(true, |kind| **k == kind))
            .flat_map(|(_, b)| b.iter_mut())
    }

    /// Returns the entities of one type, or of all types, that satisfy the
    /// given predicate.
    pub fn list_elements(
        &self,
        kind: Option<ElementKind>,
        filter: impl Fn(&Element) -> bool,
    ) -> Vec<&Element> {
        self.iter_elements(kind).filter(|e| filter(e)).collect()
    }

    /// Iterates over the typed entities of type `T`.
    pub fn iter<'a, T: Entity + 'a>(&'a self) -> impl Iterator<Item = &'a T> {
        self.iter_elements(Some(T::KIND))
            .filter_map(|e| T::from_element(e))
    }

    /// Iterates mutably over the typed entities of type `T`.
    pub fn iter_mut<'a, T: Entity + 'a>(&'a mut self) -> impl Iterator<Item = &'a mut T> {
        self.iter_elements_mut(Some(T::KIND))
            .filter_map(|e| T::from_element_mut(e))
    }

    /// Names of the entities of the given type, in insertion order.
    pub fn names(&self, kind: ElementKind) -> Vec<String> {
        self.iter_elements(Some(kind))
            .map(|e| e.name().to_string())
            .collect()
    }
}

fn wrong_bucket(kind: ElementKind, name: &str) -> Error {
    Error::internal(format!("{kind} bucket holds a foreign element `{name}`."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Load, Node};

    fn store() -> Result<Store, Error> {
        let mut store = Store::new();
        store.add(Node::new("n2"))?;
        store.add(Node::new("n1"))?;
        store.add(Node::new("n3"))?;
        store.add(Line::between("l1", "n1", "n2"))?;
        store.add(Line::between("n3", "n2", "n3"))?;
        let mut load = Load::new("ld");
        load.connecting_element = Some("n3".into());
        store.add(load)?;
        Ok(store)
    }

    #[test]
    fn test_typed_lookup() -> Result<(), Error> {
        let store = store()?;
        let line = store.get::<Line>("l1")?;
        assert_eq!(line.from_element.as_deref(), Some("n1"));

        assert!(store
            .get::<Line>("n1")
            .is_err_and(|e| e == Error::element_not_found("Line `n1` not found.")));
        assert!(store
            .get_element(ElementKind::Capacitor, "c1")
            .is_err_and(|e| e == Error::element_not_found("Capacitor `c1` not found.")));
        Ok(())
    }

    #[test]
    fn test_every_element_finds_itself() -> Result<(), Error> {
        let store = store()?;
        for element in store.iter_elements(None) {
            let found = store.get_element(element.kind(), element.name())?;
            assert!(std::ptr::eq(found, element));
        }
        Ok(())
    }

    #[test]
    fn test_insertion_order() -> Result<(), Error> {
        let store = store()?;
        assert_eq!(store.names(ElementKind::Node), vec!["n2", "n1", "n3"]);
        assert!(store
            .iter::<Node>()
            .map(|n| n.name.as_str())
            .eq(["n2", "n1", "n3"]));

        let kinds = store
            .iter_elements(None)
            .map(|e| e.kind())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Node,
                ElementKind::Node,
                ElementKind::Node,
                ElementKind::Line,
                ElementKind::Line,
                ElementKind::Load,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_filtered_listing() -> Result<(), Error> {
        let store = store()?;
        let touching_n3 = store.list_elements(None, |e| e.referenced_buses().contains(&"n3"));
        assert_eq!(
            touching_n3.iter().map(|e| e.name()).collect::<Vec<_>>(),
            vec!["n3", "ld"]
        );
        assert_eq!(
            store
                .list_elements(Some(ElementKind::Node), |e| e.name() != "n1")
                .len(),
            2
        );
        Ok(())
    }

    #[test]
    fn test_lookup_by_name_alone() -> Result<(), Error> {
        let store = store()?;
        assert_eq!(store.element_by_name("l1")?.kind(), ElementKind::Line);
        assert!(store
            .element_by_name("n3")
            .is_err_and(|e| e
                == Error::duplicate_name("`n3` names more than one element: Node, Line.")));
        assert!(store
            .element_by_name("zz")
            .is_err_and(|e| e == Error::element_not_found("`zz` not found.")));
        Ok(())
    }

    #[test]
    fn test_typed_mutation() -> Result<(), Error> {
        let mut store = store()?;
        store.get_mut::<Node>("n1")?.nominal_voltage = Some(4160.0);
        for node in store.iter_mut::<Node>() {
            node.setpoint = Some(1.0);
        }
        assert_eq!(store.get::<Node>("n1")?.nominal_voltage, Some(4160.0));
        assert!(store.iter::<Node>().all(|n| n.setpoint == Some(1.0)));
        Ok(())
    }
}
