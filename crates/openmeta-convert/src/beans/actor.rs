//! Actor profile beans.

use serde::{Deserialize, Serialize};

use openmeta_core::property::InstanceProperties;

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::referenceable::ReferenceableProperties;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, InputShape};

/// Stored as `name` on the entity.
const KNOWN_NAME: &str = "name";
const DESCRIPTION: &str = "description";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorProfileProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToInstanceProperties for ActorProfileProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.base.write_to(&mut writer);
        writer
            .string(KNOWN_NAME, &self.known_name)
            .string(DESCRIPTION, &self.description)
            .extended(&self.base.extended_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorProfileElement {
    pub header: ElementHeader,
    pub properties: ActorProfileProperties,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::ActorProfile,
        bean_class: "ActorProfileElement",
        entity_type: Some("ActorProfile"),
        input: InputShape::Entity,
        relationship_slots: &[],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let base = ReferenceableProperties::take_from(&mut bag);
    let mut properties = ActorProfileProperties {
        base,
        known_name: bag.take_string(KNOWN_NAME),
        description: bag.take_string(DESCRIPTION),
    };
    properties.base.extended_properties = bag.into_extended();

    Ok(Bean::ActorProfile(ActorProfileElement {
        header: ElementHeader::from_entity(entity),
        properties,
    }))
}
