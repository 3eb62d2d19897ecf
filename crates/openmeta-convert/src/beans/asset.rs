//! Asset beans.

use serde::{Deserialize, Serialize};

use openmeta_core::property::InstanceProperties;

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::referenceable::ReferenceableProperties;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, InputShape};

const NAME: &str = "name";
const VERSION_IDENTIFIER: &str = "versionIdentifier";
const DESCRIPTION: &str = "description";
const DEPLOYED_IMPLEMENTATION_TYPE: &str = "deployedImplementationType";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Technology the asset is implemented with, e.g. "PostgreSQL Database".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_implementation_type: Option<String>,
}

impl ToInstanceProperties for AssetProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.base.write_to(&mut writer);
        writer
            .string(NAME, &self.name)
            .string(VERSION_IDENTIFIER, &self.version_identifier)
            .string(DESCRIPTION, &self.description)
            .string(DEPLOYED_IMPLEMENTATION_TYPE, &self.deployed_implementation_type)
            .extended(&self.base.extended_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetElement {
    pub header: ElementHeader,
    pub properties: AssetProperties,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::Asset,
        bean_class: "AssetElement",
        entity_type: Some("Asset"),
        input: InputShape::Entity,
        relationship_slots: &[],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let base = ReferenceableProperties::take_from(&mut bag);
    let mut properties = AssetProperties {
        base,
        name: bag.take_string(NAME),
        version_identifier: bag.take_string(VERSION_IDENTIFIER),
        description: bag.take_string(DESCRIPTION),
        deployed_implementation_type: bag.take_string(DEPLOYED_IMPLEMENTATION_TYPE),
    };
    properties.base.extended_properties = bag.into_extended();

    Ok(Bean::Asset(AssetElement {
        header: ElementHeader::from_entity(entity),
        properties,
    }))
}
