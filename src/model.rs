// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The canonical, format-independent entity model.
//!
//! Every piece of equipment is a record with one public field per attribute.
//! Unset attributes are `None` (or an empty list), never a silent zero.
//! Cross-entity references are names, resolved through the
//! [`Store`][crate::Store] on demand.
//!
//! Quantities are stored in canonical units: watts, vars and volt-amperes for
//! power, volts for voltage, meters for length, ohm per meter for line
//! impedance.  Readers convert into these units and writers convert out of
//! them; see [`crate::units`].

mod branches;
mod devices;
mod enums;
mod node;
mod secondary;
mod value;

pub use branches::{Line, PowerTransformer, Regulator};
pub use devices::{Capacitor, Load, Photovoltaic, Storage, Timeseries};
pub use enums::{
    CapacitorMode, ConnectionType, DispatchMode, LineType, LoadModel, PvControlType,
    StorageState, VoltageType, WindingConnection,
};
pub use node::{FeederMetadata, Node, PowerSource};
pub use secondary::{
    PhaseCapacitor, PhaseLoad, PhaseStorage, PhaseWinding, Position, Winding, Wire,
    SECONDARY_CLASSES,
};
pub use value::{FromValue, Object, ToValue, Value};

use crate::{Error, Store};

/// Reflective access to the attributes of an entity.
///
/// Implemented by every entity record, primary and secondary.
pub trait Attributes: Default + Sized {
    /// The class name of the entity, as used in serialized models.
    const CLASS: &'static str;

    /// The attribute names, in declaration order.
    fn attribute_names() -> &'static [&'static str];

    /// Returns the value of the named attribute, or `None` if the entity has
    /// no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Assigns the named attribute.
    ///
    /// Fails with an `UnknownAttribute` error if the entity has no such
    /// attribute and with an `InvalidAttribute` error if the value has the
    /// wrong shape or is not a member of the attribute's enum.  The entity is
    /// unchanged on failure.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), Error>;

    /// Returns all attributes, in declaration order.
    fn to_object(&self) -> Object {
        Object {
            class: Self::CLASS.to_string(),
            attributes: Self::attribute_names()
                .iter()
                .map(|name| {
                    let value = self.attribute(name).unwrap_or(Value::Null);
                    (name.to_string(), value)
                })
                .collect(),
        }
    }

    /// Builds an entity from an object of the same class.
    fn from_object(object: Object) -> Result<Self, Error> {
        if object.class != Self::CLASS {
            return Err(Error::invalid_element_type(format!(
                "Expected a `{}` object, found `{}`.",
                Self::CLASS,
                object.class
            )));
        }
        Self::from_attributes(object.attributes)
    }

    /// Builds an entity from keyword attributes.  Unknown attributes fail
    /// fast.
    fn from_attributes(
        attributes: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, Error> {
        let mut entity = Self::default();
        for (name, value) in attributes {
            entity.set_attribute(&name, value)?;
        }
        Ok(entity)
    }
}

/// A primary entity: one that a [`Store`] indexes by name.
pub trait Entity: Attributes {
    /// The bucket of the store that holds entities of this type.
    const KIND: ElementKind;

    fn name(&self) -> &str;

    fn into_element(self) -> Element;

    fn from_element(element: &Element) -> Option<&Self>;

    fn from_element_mut(element: &mut Element) -> Option<&mut Self>;

    /// Registers the entity in the store.
    fn build(self, store: &mut Store) -> Result<(), Error> {
        store.add_element(self.into_element())
    }
}

string_enum! {
    /// The type of a primary entity, and of the store bucket holding it.
    ///
    /// The declaration order is the order in which writers emit types.
    pub enum ElementKind {
        Node => "Node",
        PowerSource => "PowerSource",
        FeederMetadata => "Feeder_metadata",
        Line => "Line",
        PowerTransformer => "PowerTransformer",
        Regulator => "Regulator",
        Load => "Load",
        Capacitor => "Capacitor",
        Photovoltaic => "Photovoltaic",
        Storage => "Storage",
        Timeseries => "Timeseries",
    }
}

impl ElementKind {
    /// Returns true for the kinds that connect two buses.
    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Line | Self::PowerTransformer | Self::Regulator)
    }

    /// Returns true for the kinds attached to a single bus through
    /// `connecting_element`.
    pub fn is_shunt(&self) -> bool {
        matches!(
            self,
            Self::PowerSource | Self::Load | Self::Capacitor | Self::Photovoltaic | Self::Storage
        )
    }
}

/// Any primary entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Node(Node),
    PowerSource(PowerSource),
    FeederMetadata(FeederMetadata),
    Line(Line),
    PowerTransformer(PowerTransformer),
    Regulator(Regulator),
    Load(Load),
    Capacitor(Capacitor),
    Photovoltaic(Photovoltaic),
    Storage(Storage),
    Timeseries(Timeseries),
}

/// Evaluates `$body` with `$e` bound to the record inside any `Element`.
macro_rules! dispatch {
    ($element:expr, $e:ident => $body:expr) => {
        match $element {
            Element::Node($e) => $body,
            Element::PowerSource($e) => $body,
            Element::FeederMetadata($e) => $body,
            Element::Line($e) => $body,
            Element::PowerTransformer($e) => $body,
            Element::Regulator($e) => $body,
            Element::Load($e) => $body,
            Element::Capacitor($e) => $body,
            Element::Photovoltaic($e) => $body,
            Element::Storage($e) => $body,
            Element::Timeseries($e) => $body,
        }
    };
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Node(_) => ElementKind::Node,
            Element::PowerSource(_) => ElementKind::PowerSource,
            Element::FeederMetadata(_) => ElementKind::FeederMetadata,
            Element::Line(_) => ElementKind::Line,
            Element::PowerTransformer(_) => ElementKind::PowerTransformer,
            Element::Regulator(_) => ElementKind::Regulator,
            Element::Load(_) => ElementKind::Load,
            Element::Capacitor(_) => ElementKind::Capacitor,
            Element::Photovoltaic(_) => ElementKind::Photovoltaic,
            Element::Storage(_) => ElementKind::Storage,
            Element::Timeseries(_) => ElementKind::Timeseries,
        }
    }

    pub fn name(&self) -> &str {
        dispatch!(self, e => &e.name)
    }

    /// Renames the entity.  Only the store may do this, so that its index
    /// stays consistent.
    pub(crate) fn set_name(&mut self, name: String) {
        dispatch!(self, e => e.name = name)
    }

    pub fn substation_name(&self) -> Option<&str> {
        dispatch!(self, e => e.substation_name.as_deref())
    }

    pub fn set_substation_name(&mut self, substation_name: Option<String>) {
        dispatch!(self, e => e.substation_name = substation_name)
    }

    pub fn feeder_name(&self) -> Option<&str> {
        dispatch!(self, e => e.feeder_name.as_deref())
    }

    pub fn set_feeder_name(&mut self, feeder_name: Option<String>) {
        dispatch!(self, e => e.feeder_name = feeder_name)
    }

    /// Returns true if writers must skip the entity.
    pub fn is_dropped(&self) -> bool {
        dispatch!(self, e => e.drop)
    }

    pub fn set_drop(&mut self, drop: bool) {
        dispatch!(self, e => e.drop = drop)
    }

    /// The bus names at both ends of a branch, if both are set.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let (from, to) = match self {
            Element::Line(e) => (&e.from_element, &e.to_element),
            Element::PowerTransformer(e) => (&e.from_element, &e.to_element),
            Element::Regulator(e) => (&e.from_element, &e.to_element),
            _ => return None,
        };
        Some((from.as_deref()?, to.as_deref()?))
    }

    /// Swaps the two ends of a branch.  Returns false if the element is not
    /// a branch.
    pub fn reverse(&mut self) -> bool {
        let (from, to) = match self {
            Element::Line(e) => (&mut e.from_element, &mut e.to_element),
            Element::PowerTransformer(e) => (&mut e.from_element, &mut e.to_element),
            Element::Regulator(e) => (&mut e.from_element, &mut e.to_element),
            _ => return false,
        };
        std::mem::swap(from, to);
        true
    }

    /// The bus a shunt device is attached to.
    pub fn connecting_element(&self) -> Option<&str> {
        match self {
            Element::PowerSource(e) => e.connecting_element.as_deref(),
            Element::Load(e) => e.connecting_element.as_deref(),
            Element::Capacitor(e) => e.connecting_element.as_deref(),
            Element::Photovoltaic(e) => e.connecting_element.as_deref(),
            Element::Storage(e) => e.connecting_element.as_deref(),
            _ => None,
        }
    }

    /// Every bus name this element refers to: branch ends, the connecting
    /// bus, and a capacitor's measuring element.
    pub fn referenced_buses(&self) -> Vec<&str> {
        let mut buses = Vec::new();
        if let Some((from, to)) = self.endpoints() {
            buses.push(from);
            buses.push(to);
        }
        if let Some(bus) = self.connecting_element() {
            buses.push(bus);
        }
        if let Element::Capacitor(cap) = self {
            if let Some(bus) = cap.measuring_element.as_deref() {
                buses.push(bus);
            }
        }
        buses
    }

    /// The class name, as used in serialized models.
    pub fn class(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn attribute_names(&self) -> &'static [&'static str] {
        match self {
            Element::Node(_) => Node::attribute_names(),
            Element::PowerSource(_) => PowerSource::attribute_names(),
            Element::FeederMetadata(_) => FeederMetadata::attribute_names(),
            Element::Line(_) => Line::attribute_names(),
            Element::PowerTransformer(_) => PowerTransformer::attribute_names(),
            Element::Regulator(_) => Regulator::attribute_names(),
            Element::Load(_) => Load::attribute_names(),
            Element::Capacitor(_) => Capacitor::attribute_names(),
            Element::Photovoltaic(_) => Photovoltaic::attribute_names(),
            Element::Storage(_) => Storage::attribute_names(),
            Element::Timeseries(_) => Timeseries::attribute_names(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        dispatch!(self, e => e.attribute(name))
    }

    /// Assigns an attribute by name.  The `name` attribute can't be assigned
    /// here; use [`Store::rename_element`] instead.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if name == "name" {
            return Err(Error::invalid_attribute(format!(
                "{} `{}`: rename entities through the store.",
                self.class(),
                self.name()
            )));
        }
        dispatch!(self, e => e.set_attribute(name, value))
    }

    pub fn to_object(&self) -> Object {
        dispatch!(self, e => e.to_object())
    }

    /// Builds a primary entity from an object.
    ///
    /// Fails with an `InvalidElementType` error if the class is unknown or
    /// names a secondary entity, or if the object has no name.
    pub fn from_object(object: Object) -> Result<Element, Error> {
        let Object { class, attributes } = object;
        Self::from_attributes(&class, attributes)
    }

    /// Builds a primary entity of the given class from keyword attributes.
    pub fn from_attributes(
        class: &str,
        attributes: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Element, Error> {
        let kind = class.parse::<ElementKind>().map_err(|_| {
            if SECONDARY_CLASSES.contains(&class) {
                Error::invalid_element_type(format!(
                    "`{class}` is a secondary entity and can't stand on its own."
                ))
            } else {
                Error::invalid_element_type(format!("`{class}` is not a known entity type."))
            }
        })?;
        let element = match kind {
            ElementKind::Node => Element::Node(Node::from_attributes(attributes)?),
            ElementKind::PowerSource => {
                Element::PowerSource(PowerSource::from_attributes(attributes)?)
            }
            ElementKind::FeederMetadata => {
                Element::FeederMetadata(FeederMetadata::from_attributes(attributes)?)
            }
            ElementKind::Line => Element::Line(Line::from_attributes(attributes)?),
            ElementKind::PowerTransformer => {
                Element::PowerTransformer(PowerTransformer::from_attributes(attributes)?)
            }
            ElementKind::Regulator => Element::Regulator(Regulator::from_attributes(attributes)?),
            ElementKind::Load => Element::Load(Load::from_attributes(attributes)?),
            ElementKind::Capacitor => Element::Capacitor(Capacitor::from_attributes(attributes)?),
            ElementKind::Photovoltaic => {
                Element::Photovoltaic(Photovoltaic::from_attributes(attributes)?)
            }
            ElementKind::Storage => Element::Storage(Storage::from_attributes(attributes)?),
            ElementKind::Timeseries => {
                Element::Timeseries(Timeseries::from_attributes(attributes)?)
            }
        };
        if element.name().is_empty() {
            return Err(Error::invalid_element_type(format!(
                "{} has no name.",
                element.class()
            )));
        }
        Ok(element)
    }
}
