//! Like beans: an emoji attached to an element.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openmeta_core::instance::Relationship;
use openmeta_core::property::{InstanceProperties, PropertyValue};

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::related::ElementStub;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, EntityEnd, InputShape, RelationshipSlot};

const EMOJI: &str = "emoji";
const IS_PUBLIC: &str = "isPublic";

pub const ATTACHED_LIKE: &str = "AttachedLike";

// The liked element is end one, the like end two.
const ATTACHMENT_SLOT: RelationshipSlot = RelationshipSlot::new(ATTACHED_LIKE, EntityEnd::Two);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl ToInstanceProperties for LikeProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        PropertyWriter::new()
            .int(EMOJI, self.emoji)
            .effectivity(self.effective_from, self.effective_to)
            .extended(&self.extended_properties)
            .finish()
    }
}

/// Properties of the attachment relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl AttachmentProperties {
    fn from_relationship(relationship: &Relationship) -> Self {
        let mut bag = PropertyBag::from_properties(&relationship.properties);
        let (effective_from, effective_to) = bag.take_effectivity();
        let is_public = bag.take_bool(IS_PUBLIC);
        Self {
            is_public,
            effective_from,
            effective_to,
            extended_properties: bag.into_extended(),
        }
    }
}

impl ToInstanceProperties for AttachmentProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        PropertyWriter::new()
            .bool(IS_PUBLIC, self.is_public)
            .effectivity(self.effective_from, self.effective_to)
            .extended(&self.extended_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentElement {
    pub relationship_header: ElementHeader,
    pub properties: AttachmentProperties,
    pub attached_to: ElementStub,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeElement {
    pub header: ElementHeader,
    pub properties: LikeProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentElement>,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::Like,
        bean_class: "LikeElement",
        entity_type: Some("Like"),
        input: InputShape::EntityWithRelationship,
        relationship_slots: &[ATTACHMENT_SLOT],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let (effective_from, effective_to) = bag.take_effectivity();
    let emoji = bag.take_int(EMOJI);
    let properties = LikeProperties {
        emoji,
        effective_from,
        effective_to,
        extended_properties: bag.into_extended(),
    };

    let attachment = request
        .route_single(ATTACHMENT_SLOT)?
        .map(|relationship| AttachmentElement {
            relationship_header: ElementHeader::from_relationship(relationship),
            properties: AttachmentProperties::from_relationship(relationship),
            attached_to: ElementStub::from_proxy(relationship.other_end(entity.guid())),
        });

    Ok(Bean::Like(LikeElement {
        header: ElementHeader::from_entity(entity),
        properties,
        attachment,
    }))
}
