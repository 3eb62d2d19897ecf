//! The standard header carried by every bean.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openmeta_core::enums::{InstanceProvenance, InstanceStatus};
use openmeta_core::instance::{
    Classification, EntityDetail, EntityProxy, InstanceHeader, InstanceType, Relationship,
};
use openmeta_core::property::PropertyValue;

/// Type information for an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementType {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_id: String,
    pub type_name: String,
    #[serde(default)]
    pub type_version: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub super_type_names: Vec<String>,
}

impl From<&InstanceType> for ElementType {
    fn from(t: &InstanceType) -> Self {
        Self {
            type_id: t.type_def_guid.clone(),
            type_name: t.type_def_name.clone(),
            type_version: t.type_def_version,
            super_type_names: t.type_def_super_types.clone(),
        }
    }
}

/// Who changed an element and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVersions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: i64,
}

/// Where an element's home copy lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementOrigin {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub home_metadata_collection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_metadata_collection_name: Option<String>,
    #[serde(default)]
    pub provenance: InstanceProvenance,
}

/// A classification as seen on a bean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementClassification {
    pub name: String,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl From<&Classification> for ElementClassification {
    fn from(c: &Classification) -> Self {
        Self {
            name: c.name.clone(),
            status: c.status.clone(),
            properties: c.properties.properties.clone(),
        }
    }
}

/// Identity, type, status, versions, origin and classifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementHeader {
    pub guid: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default)]
    pub versions: ElementVersions,
    #[serde(default)]
    pub origin: ElementOrigin,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<ElementClassification>,
}

impl ElementHeader {
    /// Derives a header from an instance header and its classifications.
    pub fn from_instance(header: &InstanceHeader, classifications: &[Classification]) -> Self {
        Self {
            guid: header.guid.clone(),
            element_type: ElementType::from(&header.instance_type),
            status: header.status.clone(),
            versions: ElementVersions {
                created_by: header.created_by.clone(),
                updated_by: header.updated_by.clone(),
                create_time: header.create_time,
                update_time: header.update_time,
                version: header.version,
            },
            origin: ElementOrigin {
                home_metadata_collection_id: header.metadata_collection_id.clone(),
                home_metadata_collection_name: header.metadata_collection_name.clone(),
                provenance: header.provenance.clone(),
            },
            classifications: classifications.iter().map(ElementClassification::from).collect(),
        }
    }

    pub fn from_entity(entity: &EntityDetail) -> Self {
        Self::from_instance(&entity.header, &entity.classifications)
    }

    pub fn from_relationship(relationship: &Relationship) -> Self {
        Self::from_instance(&relationship.header, &[])
    }

    pub fn from_proxy(proxy: &EntityProxy) -> Self {
        Self::from_instance(&proxy.header, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmeta_core::property::InstanceProperties;

    #[test]
    fn header_copies_identity_and_classifications() {
        let mut entity = EntityDetail::new(
            "asset-1",
            InstanceType::new("DataSet").with_super_types(["Asset", "Referenceable"]),
        )
        .with_classification(
            Classification::new("Confidentiality")
                .with_properties(InstanceProperties::new().with("level", 3i32)),
        );
        entity.header.status = InstanceStatus::Deprecated;
        entity.header.created_by = Some("erinoverview".into());
        entity.header.metadata_collection_id = "mc-1".into();
        entity.header.version = 4;

        let header = ElementHeader::from_entity(&entity);

        assert_eq!(header.guid, "asset-1");
        assert_eq!(header.element_type.type_name, "DataSet");
        assert_eq!(header.element_type.super_type_names, vec!["Asset", "Referenceable"]);
        assert_eq!(header.status, InstanceStatus::Deprecated);
        assert_eq!(header.versions.created_by.as_deref(), Some("erinoverview"));
        assert_eq!(header.versions.version, 4);
        assert_eq!(header.origin.home_metadata_collection_id, "mc-1");

        let c = header.classifications.iter().find(|c| c.name == "Confidentiality").unwrap();
        assert_eq!(c.properties["level"], PropertyValue::Int(3));
        assert!(header.classifications.iter().all(|c| c.name != "Criticality"));
    }
}
