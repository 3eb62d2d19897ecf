//! Glossary term beans.

use serde::{Deserialize, Serialize};

use openmeta_core::property::InstanceProperties;

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::header::ElementHeader;
use crate::beans::referenceable::ReferenceableProperties;
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, InputShape};

const DISPLAY_NAME: &str = "displayName";
const SUMMARY: &str = "summary";
const DESCRIPTION: &str = "description";
const EXAMPLES: &str = "examples";
const ABBREVIATION: &str = "abbreviation";
const USAGE: &str = "usage";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl ToInstanceProperties for GlossaryTermProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.base.write_to(&mut writer);
        writer
            .string(DISPLAY_NAME, &self.display_name)
            .string(SUMMARY, &self.summary)
            .string(DESCRIPTION, &self.description)
            .string(EXAMPLES, &self.examples)
            .string(ABBREVIATION, &self.abbreviation)
            .string(USAGE, &self.usage)
            .extended(&self.base.extended_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermElement {
    pub header: ElementHeader,
    pub properties: GlossaryTermProperties,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::GlossaryTerm,
        bean_class: "GlossaryTermElement",
        entity_type: Some("GlossaryTerm"),
        input: InputShape::Entity,
        relationship_slots: &[],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let mut bag = PropertyBag::from_properties(&entity.properties);
    let base = ReferenceableProperties::take_from(&mut bag);
    let mut properties = GlossaryTermProperties {
        base,
        display_name: bag.take_string(DISPLAY_NAME),
        summary: bag.take_string(SUMMARY),
        description: bag.take_string(DESCRIPTION),
        examples: bag.take_string(EXAMPLES),
        abbreviation: bag.take_string(ABBREVIATION),
        usage: bag.take_string(USAGE),
    };
    properties.base.extended_properties = bag.into_extended();

    Ok(Bean::GlossaryTerm(GlossaryTermElement {
        header: ElementHeader::from_entity(entity),
        properties,
    }))
}
