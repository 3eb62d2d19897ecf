//! Properties shared by every referenceable element, and the plain
//! referenceable bean built from any entity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openmeta_core::instance::QUALIFIED_NAME;
use openmeta_core::property::{InstanceProperties, PropertyValue};

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, InputShape};

pub const ADDITIONAL_PROPERTIES: &str = "additionalProperties";

/// Unique name, free-form string properties, effectivity and leftovers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceableProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    /// Properties of subtypes this bean does not model.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl ReferenceableProperties {
    /// Takes the referenceable properties out of `bag`.
    ///
    /// `extended_properties` is left empty; the caller fills it once every
    /// subtype property has been taken.
    pub(crate) fn take_from(bag: &mut PropertyBag) -> Self {
        let (effective_from, effective_to) = bag.take_effectivity();
        Self {
            qualified_name: bag.take_string(QUALIFIED_NAME),
            additional_properties: bag.take_string_map(ADDITIONAL_PROPERTIES),
            effective_from,
            effective_to,
            extended_properties: BTreeMap::new(),
        }
    }

    /// Writes the named fields; extended properties are written by the caller
    /// after its own fields.
    pub(crate) fn write_to(&self, writer: &mut PropertyWriter) {
        writer
            .string(QUALIFIED_NAME, &self.qualified_name)
            .string_map(ADDITIONAL_PROPERTIES, &self.additional_properties)
            .effectivity(self.effective_from, self.effective_to);
    }
}

impl ToInstanceProperties for ReferenceableProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.write_to(&mut writer);
        writer.extended(&self.extended_properties).finish()
    }
}

/// Any referenceable entity, without subtype-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceableElement {
    pub header: ElementHeader,
    pub properties: ReferenceableProperties,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::Referenceable,
        bean_class: "ReferenceableElement",
        entity_type: Some("Referenceable"),
        input: InputShape::Entity,
        relationship_slots: &[],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let mut properties = ReferenceableProperties::take_from(&mut bag);
    properties.extended_properties = bag.into_extended();

    Ok(Bean::Referenceable(ReferenceableElement {
        header: ElementHeader::from_entity(entity),
        properties,
    }))
}
