// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Orienting the branches of a [`Store`] away from the source bus.

use crate::model::Element;
use crate::{Error, Store};

use super::Network;

impl Network {
    /// Re-orients every branch reachable from the source so that its
    /// `from_element` is the end reached first in breadth-first order.
    ///
    /// Branches already oriented that way are left alone.  Transformers and
    /// regulators with two windings have their windings swapped along with
    /// their ends; those with more windings are left as they are.  Returns
    /// the number of reversed branches.
    pub fn direct_from_source(&self, store: &mut Store) -> Result<usize, Error> {
        let mut reversed = 0;
        for directed in self.bfs_order(None)? {
            let element = store.get_element_mut(directed.branch.kind, &directed.branch.name)?;
            if element.endpoints() != Some((directed.to, directed.from)) {
                continue;
            }
            let windings = match &mut *element {
                Element::PowerTransformer(xfmr) => Some(&mut xfmr.windings),
                Element::Regulator(reg) => Some(&mut reg.windings),
                _ => None,
            };
            match windings {
                Some(windings) if windings.len() > 2 => {
                    tracing::warn!(
                        "{} {} has {} windings and points towards the source. Leaving it as is.",
                        directed.branch.kind,
                        directed.branch.name,
                        windings.len()
                    );
                    continue;
                }
                Some(windings) => windings.reverse(),
                None => {}
            }
            element.reverse();
            reversed += 1;
        }
        tracing::debug!("Reversed {reversed} branches to point away from the source.");
        Ok(reversed)
    }
}
