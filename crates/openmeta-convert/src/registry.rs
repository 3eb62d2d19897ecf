//! The bean registry: which bean kinds can be built, and how.
//!
//! The set of kinds is fixed at compile time. Each kind contributes a
//! [`BeanDescriptor`] naming its entity type, the shape of input it
//! consumes and the function that builds it.

use std::collections::BTreeMap;
use std::fmt;

use openmeta_core::instance::{InstanceType, Relationship};

use crate::beans::{self, Bean, BeanKind};
use crate::converter::ConversionRequest;
use crate::error::{ConversionContext, ConvertError, Result};

/// What a bean is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// A single entity.
    Entity,
    /// An entity and at most one relationship that attaches it to something.
    EntityWithRelationship,
    /// An entity and any number of relationships routed into slots.
    EntityWithRelationships,
    /// A relationship, optionally seen from a starting entity.
    Relationship,
}

impl InputShape {
    /// Returns `true` if beans of this shape place relationships in slots.
    pub fn consumes_relationships(&self) -> bool {
        matches!(
            self,
            Self::EntityWithRelationship | Self::EntityWithRelationships
        )
    }
}

/// Builds a bean from a validated request.
pub type BuildFn = for<'a> fn(&ConversionRequest<'a>) -> Result<Bean>;

/// Which end of a relationship the bean's own entity must occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityEnd {
    One,
    Two,
}

impl EntityEnd {
    /// Returns `true` if `entity_guid` sits at this end of `relationship`.
    pub fn holds(self, relationship: &Relationship, entity_guid: &str) -> bool {
        match self {
            Self::One => relationship.end_one.guid() == entity_guid,
            Self::Two => relationship.end_two.guid() == entity_guid,
        }
    }
}

/// A relationship type a bean has a place for, and the end the bean's
/// entity takes in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipSlot {
    pub type_name: &'static str,
    pub entity_end: EntityEnd,
}

impl RelationshipSlot {
    pub const fn new(type_name: &'static str, entity_end: EntityEnd) -> Self {
        Self {
            type_name,
            entity_end,
        }
    }

    /// Returns `true` if `relationship` fills this slot for `entity_guid`.
    pub fn fits(&self, relationship: &Relationship, entity_guid: &str) -> bool {
        relationship.header.instance_type.is_type_of(self.type_name)
            && self.entity_end.holds(relationship, entity_guid)
    }
}

/// Everything the converter needs to know about one bean kind.
#[derive(Clone, Copy)]
pub struct BeanDescriptor {
    pub kind: BeanKind,
    pub bean_class: &'static str,
    /// The entity type the bean is built from; `None` for relationship beans.
    pub entity_type: Option<&'static str>,
    pub input: InputShape,
    pub relationship_slots: &'static [RelationshipSlot],
    pub build: BuildFn,
}

impl BeanDescriptor {
    /// Returns `true` if some slot takes relationships of `instance_type`,
    /// directly or through a super type.
    pub fn accepts_relationship(&self, instance_type: &InstanceType) -> bool {
        self.relationship_slots
            .iter()
            .any(|slot| instance_type.is_type_of(slot.type_name))
    }

    /// Type names of the relationships the bean has slots for.
    pub fn relationship_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relationship_slots.iter().map(|slot| slot.type_name)
    }
}

impl fmt::Debug for BeanDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDescriptor")
            .field("kind", &self.kind)
            .field("bean_class", &self.bean_class)
            .field("entity_type", &self.entity_type)
            .field("input", &self.input)
            .field("relationship_slots", &self.relationship_slots)
            .finish_non_exhaustive()
    }
}

/// The bean kinds available to a converter.
#[derive(Debug, Clone, Default)]
pub struct BeanRegistry {
    descriptors: BTreeMap<BeanKind, BeanDescriptor>,
}

impl BeanRegistry {
    /// A registry with every built-in bean kind.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for descriptor in [
            beans::referenceable::descriptor(),
            beans::glossary::descriptor(),
            beans::asset::descriptor(),
            beans::collection::collection_descriptor(),
            beans::actor::descriptor(),
            beans::collection::member_descriptor(),
            beans::like::descriptor(),
            beans::action::descriptor(),
            beans::related::descriptor(),
        ] {
            registry.register(descriptor);
        }
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds or replaces the descriptor for its kind.
    pub fn register(&mut self, descriptor: BeanDescriptor) {
        self.descriptors.insert(descriptor.kind, descriptor);
    }

    pub fn get(&self, kind: BeanKind) -> Option<&BeanDescriptor> {
        self.descriptors.get(&kind)
    }

    /// Resolves a bean tag, failing with `InvalidBeanClass` if the tag is
    /// unknown or its kind is not registered here.
    pub fn lookup(&self, tag: &str, context: &ConversionContext) -> Result<&BeanDescriptor> {
        let kind: BeanKind = tag
            .parse()
            .map_err(|reason: String| ConvertError::invalid_bean_class(tag, reason, context))?;
        self.get(kind).ok_or_else(|| {
            ConvertError::invalid_bean_class(tag, "bean kind is not registered", context)
        })
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in bean kind order.
    pub fn iter(&self) -> impl Iterator<Item = &BeanDescriptor> {
        self.descriptors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmeta_core::instance::EntityProxy;

    fn ctx() -> ConversionContext {
        ConversionContext::new("test", "lookup")
    }

    #[test]
    fn standard_registers_every_kind() {
        let registry = BeanRegistry::standard();
        assert_eq!(registry.len(), BeanKind::ALL.len());
        for kind in BeanKind::ALL {
            let descriptor = registry.get(*kind).unwrap();
            assert_eq!(descriptor.kind, *kind);
        }
    }

    #[test]
    fn lookup_by_tag() {
        let registry = BeanRegistry::standard();
        let descriptor = registry.lookup("glossary-term", &ctx()).unwrap();
        assert_eq!(descriptor.bean_class, "GlossaryTermElement");
        assert_eq!(descriptor.entity_type, Some("GlossaryTerm"));
    }

    #[test]
    fn unknown_tag_is_invalid_bean_class() {
        let err = BeanRegistry::standard().lookup("widget", &ctx()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBeanClass { .. }));
        assert_eq!(err.bean_class(), "widget");
    }

    #[test]
    fn unregistered_kind_is_invalid_bean_class() {
        let err = BeanRegistry::empty().lookup("asset", &ctx()).unwrap_err();
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn relationship_slots() {
        let registry = BeanRegistry::standard();
        let action = registry.get(BeanKind::Action).unwrap();
        assert!(action.input.consumes_relationships());
        assert!(action.accepts_relationship(&InstanceType::new("ActionTarget")));
        assert!(!action.accepts_relationship(&InstanceType::new("AttachedLike")));
        assert!(
            action.accepts_relationship(
                &InstanceType::new("UrgentActionTarget").with_super_types(["ActionTarget"])
            )
        );
        assert!(!registry.get(BeanKind::Asset).unwrap().input.consumes_relationships());
    }

    #[test]
    fn slot_checks_the_entity_end() {
        let rel = Relationship::new(
            "m-1",
            InstanceType::new("CollectionMembership"),
            EntityProxy::new("coll-1", InstanceType::new("Collection")),
            EntityProxy::new("asset-1", InstanceType::new("Asset")),
        );
        let member = RelationshipSlot::new("CollectionMembership", EntityEnd::Two);
        assert!(member.fits(&rel, "asset-1"));
        assert!(!member.fits(&rel, "coll-1"));
        assert!(RelationshipSlot::new("CollectionMembership", EntityEnd::One).fits(&rel, "coll-1"));
        assert!(!RelationshipSlot::new("CollectionMembership", EntityEnd::One).fits(&rel, "x"));
        assert!(!RelationshipSlot::new("AttachedLike", EntityEnd::One).fits(&rel, "coll-1"));
    }
}
