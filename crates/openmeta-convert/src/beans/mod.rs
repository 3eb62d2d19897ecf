//! Typed beans built from metadata instances.
//!
//! Every bean kind has a module holding its property struct, its element
//! struct and a descriptor that tells the registry how to build it.

pub mod action;
pub mod actor;
pub mod asset;
pub mod collection;
pub mod enums;
pub mod glossary;
pub mod header;
pub mod like;
pub mod referenceable;
pub mod related;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use openmeta_core::property::{InstanceProperties, PropertyValue};

pub use action::{ActionElement, ActionTargetElement, ActionTargetProperties, ToDoProperties};
pub use actor::{ActorProfileElement, ActorProfileProperties};
pub use asset::{AssetElement, AssetProperties};
pub use collection::{
    CollectionElement, CollectionMemberElement, CollectionProperties, MembershipElement,
    MembershipProperties,
};
pub use enums::{ActivityStatus, MembershipStatus, ToDoStatus};
pub use glossary::{GlossaryTermElement, GlossaryTermProperties};
pub use header::{ElementClassification, ElementHeader, ElementOrigin, ElementType, ElementVersions};
pub use like::{AttachmentElement, AttachmentProperties, LikeElement, LikeProperties};
pub use referenceable::{ReferenceableElement, ReferenceableProperties};
pub use related::{ElementStub, RelatedElement, RelationshipProperties};

/// Lays a bean's properties back out as a generic property bag.
pub trait ToInstanceProperties {
    fn to_instance_properties(&self) -> InstanceProperties;
}

/// The kinds of bean the converter can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeanKind {
    Referenceable,
    GlossaryTerm,
    Asset,
    Collection,
    ActorProfile,
    CollectionMember,
    Like,
    Action,
    RelatedElement,
}

impl BeanKind {
    pub const ALL: &'static [Self] = &[
        Self::Referenceable,
        Self::GlossaryTerm,
        Self::Asset,
        Self::Collection,
        Self::ActorProfile,
        Self::CollectionMember,
        Self::Like,
        Self::Action,
        Self::RelatedElement,
    ];

    /// The tag callers use to request this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Referenceable => "referenceable",
            Self::GlossaryTerm => "glossary-term",
            Self::Asset => "asset",
            Self::Collection => "collection",
            Self::ActorProfile => "actor-profile",
            Self::CollectionMember => "collection-member",
            Self::Like => "like",
            Self::Action => "action",
            Self::RelatedElement => "related-element",
        }
    }
}

impl fmt::Display for BeanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BeanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| format!("unknown bean kind {s:?}"))
    }
}

/// A fully built bean of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "beanKind", rename_all = "kebab-case")]
pub enum Bean {
    Referenceable(ReferenceableElement),
    GlossaryTerm(GlossaryTermElement),
    Asset(AssetElement),
    Collection(CollectionElement),
    ActorProfile(ActorProfileElement),
    CollectionMember(CollectionMemberElement),
    Like(LikeElement),
    Action(ActionElement),
    RelatedElement(RelatedElement),
}

impl Bean {
    pub fn kind(&self) -> BeanKind {
        match self {
            Self::Referenceable(_) => BeanKind::Referenceable,
            Self::GlossaryTerm(_) => BeanKind::GlossaryTerm,
            Self::Asset(_) => BeanKind::Asset,
            Self::Collection(_) => BeanKind::Collection,
            Self::ActorProfile(_) => BeanKind::ActorProfile,
            Self::CollectionMember(_) => BeanKind::CollectionMember,
            Self::Like(_) => BeanKind::Like,
            Self::Action(_) => BeanKind::Action,
            Self::RelatedElement(_) => BeanKind::RelatedElement,
        }
    }

    /// Name of the bean's element struct, as used in error messages.
    pub fn bean_class(&self) -> &'static str {
        match self {
            Self::Referenceable(_) => "ReferenceableElement",
            Self::GlossaryTerm(_) => "GlossaryTermElement",
            Self::Asset(_) => "AssetElement",
            Self::Collection(_) => "CollectionElement",
            Self::ActorProfile(_) => "ActorProfileElement",
            Self::CollectionMember(_) => "CollectionMemberElement",
            Self::Like(_) => "LikeElement",
            Self::Action(_) => "ActionElement",
            Self::RelatedElement(_) => "RelatedElement",
        }
    }

    /// The header of the primary instance. For a related element this is
    /// the relationship's header.
    pub fn header(&self) -> &ElementHeader {
        match self {
            Self::Referenceable(b) => &b.header,
            Self::GlossaryTerm(b) => &b.header,
            Self::Asset(b) => &b.header,
            Self::Collection(b) => &b.header,
            Self::ActorProfile(b) => &b.header,
            Self::CollectionMember(b) => &b.header,
            Self::Like(b) => &b.header,
            Self::Action(b) => &b.header,
            Self::RelatedElement(b) => &b.relationship_header,
        }
    }

    pub fn guid(&self) -> &str {
        &self.header().guid
    }

    /// Properties of the primary instance that the bean does not model.
    pub fn extended_properties(&self) -> &BTreeMap<String, PropertyValue> {
        match self {
            Self::Referenceable(b) => &b.properties.extended_properties,
            Self::GlossaryTerm(b) => &b.properties.base.extended_properties,
            Self::Asset(b) => &b.properties.base.extended_properties,
            Self::Collection(b) => &b.properties.base.extended_properties,
            Self::ActorProfile(b) => &b.properties.base.extended_properties,
            Self::CollectionMember(b) => &b.properties.extended_properties,
            Self::Like(b) => &b.properties.extended_properties,
            Self::Action(b) => &b.properties.base.extended_properties,
            Self::RelatedElement(b) => &b.relationship_properties.extended_properties,
        }
    }

    /// Rebuilds the primary instance's property bag from the bean.
    pub fn to_instance_properties(&self) -> InstanceProperties {
        match self {
            Self::Referenceable(b) => b.properties.to_instance_properties(),
            Self::GlossaryTerm(b) => b.properties.to_instance_properties(),
            Self::Asset(b) => b.properties.to_instance_properties(),
            Self::Collection(b) => b.properties.to_instance_properties(),
            Self::ActorProfile(b) => b.properties.to_instance_properties(),
            Self::CollectionMember(b) => b.properties.to_instance_properties(),
            Self::Like(b) => b.properties.to_instance_properties(),
            Self::Action(b) => b.properties.to_instance_properties(),
            Self::RelatedElement(b) => b.relationship_properties.to_instance_properties(),
        }
    }
}
