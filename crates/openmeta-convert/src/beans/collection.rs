//! Collection and collection member beans.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openmeta_core::instance::Relationship;
use openmeta_core::property::{InstanceProperties, PropertyValue};

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::enums::MembershipStatus;
use crate::beans::header::ElementHeader;
use crate::beans::referenceable::ReferenceableProperties;
use crate::beans::related::ElementStub;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, EntityEnd, InputShape, RelationshipSlot};

const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const COLLECTION_TYPE: &str = "collectionType";

pub const COLLECTION_MEMBERSHIP: &str = "CollectionMembership";

// The collection is end one, the member end two.
const MEMBERSHIP_SLOT: RelationshipSlot =
    RelationshipSlot::new(COLLECTION_MEMBERSHIP, EntityEnd::Two);

const MEMBERSHIP_RATIONALE: &str = "membershipRationale";
const CREATED_BY: &str = "createdBy";
const EXPRESSION: &str = "expression";
const CONFIDENCE: &str = "confidence";
const STATUS: &str = "status";
const USER_DEFINED_STATUS: &str = "userDefinedStatus";
const STEWARD: &str = "steward";
const STEWARD_TYPE_NAME: &str = "stewardTypeName";
const STEWARD_PROPERTY_NAME: &str = "stewardPropertyName";
const SOURCE: &str = "source";
const NOTES: &str = "notes";

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
}

impl ToInstanceProperties for CollectionProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.base.write_to(&mut writer);
        writer
            .string(NAME, &self.name)
            .string(DESCRIPTION, &self.description)
            .string(COLLECTION_TYPE, &self.collection_type)
            .extended(&self.base.extended_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionElement {
    pub header: ElementHeader,
    pub properties: CollectionProperties,
}

pub(crate) fn collection_descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::Collection,
        bean_class: "CollectionElement",
        entity_type: Some("Collection"),
        input: InputShape::Entity,
        relationship_slots: &[],
        build: build_collection,
    }
}

fn build_collection(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let base = ReferenceableProperties::take_from(&mut bag);
    let mut properties = CollectionProperties {
        base,
        name: bag.take_string(NAME),
        description: bag.take_string(DESCRIPTION),
        collection_type: bag.take_string(COLLECTION_TYPE),
    };
    properties.base.extended_properties = bag.into_extended();

    Ok(Bean::Collection(CollectionElement {
        header: ElementHeader::from_entity(entity),
        properties,
    }))
}

// ---------------------------------------------------------------------------
// Collection member
// ---------------------------------------------------------------------------

/// Properties of a `CollectionMembership` relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_rationale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Percentage confidence, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steward: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steward_type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steward_property_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl MembershipProperties {
    fn from_relationship(relationship: &Relationship) -> Self {
        let mut bag = PropertyBag::from_properties(&relationship.properties);
        let (effective_from, effective_to) = bag.take_effectivity();
        let mut properties = Self {
            membership_rationale: bag.take_string(MEMBERSHIP_RATIONALE),
            created_by: bag.take_string(CREATED_BY),
            expression: bag.take_string(EXPRESSION),
            confidence: bag.take_int(CONFIDENCE),
            status: bag.take_enum(STATUS),
            user_defined_status: bag.take_string(USER_DEFINED_STATUS),
            steward: bag.take_string(STEWARD),
            steward_type_name: bag.take_string(STEWARD_TYPE_NAME),
            steward_property_name: bag.take_string(STEWARD_PROPERTY_NAME),
            source: bag.take_string(SOURCE),
            notes: bag.take_string(NOTES),
            effective_from,
            effective_to,
            extended_properties: BTreeMap::new(),
        };
        properties.extended_properties = bag.into_extended();
        properties
    }
}

impl ToInstanceProperties for MembershipProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        PropertyWriter::new()
            .string(MEMBERSHIP_RATIONALE, &self.membership_rationale)
            .string(CREATED_BY, &self.created_by)
            .string(EXPRESSION, &self.expression)
            .int(CONFIDENCE, self.confidence)
            .enumeration(STATUS, self.status)
            .string(USER_DEFINED_STATUS, &self.user_defined_status)
            .string(STEWARD, &self.steward)
            .string(STEWARD_TYPE_NAME, &self.steward_type_name)
            .string(STEWARD_PROPERTY_NAME, &self.steward_property_name)
            .string(SOURCE, &self.source)
            .string(NOTES, &self.notes)
            .effectivity(self.effective_from, self.effective_to)
            .extended(&self.extended_properties)
            .finish()
    }
}

/// The membership relationship and the collection it points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipElement {
    pub relationship_header: ElementHeader,
    pub properties: MembershipProperties,
    pub collection: ElementStub,
}

/// An element that belongs to a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMemberElement {
    pub header: ElementHeader,
    pub properties: ReferenceableProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipElement>,
}

pub(crate) fn member_descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::CollectionMember,
        bean_class: "CollectionMemberElement",
        entity_type: Some("Referenceable"),
        input: InputShape::EntityWithRelationship,
        relationship_slots: &[MEMBERSHIP_SLOT],
        build: build_member,
    }
}

fn build_member(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let mut properties = ReferenceableProperties::take_from(&mut bag);
    properties.extended_properties = bag.into_extended();

    let membership = request
        .route_single(MEMBERSHIP_SLOT)?
        .map(|relationship| MembershipElement {
            relationship_header: ElementHeader::from_relationship(relationship),
            properties: MembershipProperties::from_relationship(relationship),
            collection: ElementStub::from_proxy(relationship.other_end(entity.guid())),
        });

    Ok(Bean::CollectionMember(CollectionMemberElement {
        header: ElementHeader::from_entity(entity),
        properties,
        membership,
    }))
}
