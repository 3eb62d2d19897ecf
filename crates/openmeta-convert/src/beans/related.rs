//! Beans describing one end of a relationship as seen from the other.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openmeta_core::instance::{EntityProxy, QUALIFIED_NAME, Relationship};
use openmeta_core::property::{InstanceProperties, PropertyValue};

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, InputShape};

/// Header and unique name of an element at a relationship end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStub {
    pub header: ElementHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
}

impl ElementStub {
    pub fn from_proxy(proxy: &EntityProxy) -> Self {
        Self {
            header: ElementHeader::from_proxy(proxy),
            unique_name: proxy.unique_properties.get_str(QUALIFIED_NAME).map(str::to_owned),
        }
    }
}

/// Properties of a relationship no bean models explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl RelationshipProperties {
    pub(crate) fn from_relationship(relationship: &Relationship) -> Self {
        let mut bag = PropertyBag::from_properties(&relationship.properties);
        let (effective_from, effective_to) = bag.take_effectivity();
        Self {
            effective_from,
            effective_to,
            extended_properties: bag.into_extended(),
        }
    }
}

impl ToInstanceProperties for RelationshipProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        PropertyWriter::new()
            .effectivity(self.effective_from, self.effective_to)
            .extended(&self.extended_properties)
            .finish()
    }
}

/// A relationship and the element at its far end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedElement {
    pub relationship_header: ElementHeader,
    pub relationship_properties: RelationshipProperties,
    pub related_element: ElementStub,
}

impl RelatedElement {
    /// Builds the view of `relationship` from the entity `starting_guid`.
    pub(crate) fn from_relationship(relationship: &Relationship, starting_guid: &str) -> Self {
        Self {
            relationship_header: ElementHeader::from_relationship(relationship),
            relationship_properties: RelationshipProperties::from_relationship(relationship),
            related_element: ElementStub::from_proxy(relationship.other_end(starting_guid)),
        }
    }
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::RelatedElement,
        bean_class: "RelatedElement",
        entity_type: None,
        input: InputShape::Relationship,
        relationship_slots: &[],
        build,
    }
}

/// Without a starting entity the relationship is read from end one.
fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let relationship = request.require_relationship()?;
    let starting_guid = match request.entity() {
        Some(entity) => entity.guid(),
        None => relationship.end_one.guid(),
    };
    Ok(Bean::RelatedElement(RelatedElement::from_relationship(
        relationship,
        starting_guid,
    )))
}
