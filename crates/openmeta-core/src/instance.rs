//! Entities, relationships and the headers they share.
//!
//! These are read-only views produced by a repository. Converters copy what
//! they need out of them and never mutate them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{InstanceProvenance, InstanceStatus};
use crate::property::InstanceProperties;

/// The kind of instance a header describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceCategory {
    Entity,
    Relationship,
    Classification,
}

impl fmt::Display for InstanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entity => "entity",
            Self::Relationship => "relationship",
            Self::Classification => "classification",
        })
    }
}

/// The open-metadata type of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceType {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_def_guid: String,

    pub type_def_name: String,

    #[serde(default)]
    pub type_def_version: i64,

    /// Super type names, nearest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_def_super_types: Vec<String>,
}

impl InstanceType {
    pub fn new(type_def_name: impl Into<String>) -> Self {
        Self {
            type_def_name: type_def_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the super type chain.
    pub fn with_super_types<S: Into<String>>(mut self, supers: impl IntoIterator<Item = S>) -> Self {
        self.type_def_super_types = supers.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if this type is `type_name` or one of its subtypes.
    pub fn is_type_of(&self, type_name: &str) -> bool {
        self.type_def_name == type_name
            || self.type_def_super_types.iter().any(|s| s == type_name)
    }
}

/// Identity, type, status and version information shared by every instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHeader {
    pub guid: String,

    #[serde(rename = "type")]
    pub instance_type: InstanceType,

    #[serde(default, skip_serializing_if = "InstanceStatus::is_default")]
    pub status: InstanceStatus,

    #[serde(default, skip_serializing_if = "InstanceProvenance::is_default")]
    pub provenance: InstanceProvenance,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata_collection_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_collection_name: Option<String>,

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

impl InstanceHeader {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            guid: guid.into(),
            instance_type,
            ..Self::default()
        }
    }

    /// Name of the instance's type.
    pub fn type_name(&self) -> &str {
        &self.instance_type.type_def_name
    }
}

/// A classification attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub name: String,

    #[serde(default, skip_serializing_if = "InstanceProperties::is_empty")]
    pub properties: InstanceProperties,

    #[serde(default, skip_serializing_if = "InstanceStatus::is_default")]
    pub status: InstanceStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub version: i64,
}

impl Classification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: InstanceProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// A stored metadata entity with its full property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    #[serde(flatten)]
    pub header: InstanceHeader,

    #[serde(default, skip_serializing_if = "InstanceProperties::is_empty")]
    pub properties: InstanceProperties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
}

impl EntityDetail {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            header: InstanceHeader::new(guid, instance_type),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: InstanceProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }

    pub fn guid(&self) -> &str {
        &self.header.guid
    }

    /// Builds the proxy used when this entity is a relationship end.
    ///
    /// The proxy carries the entity's `qualifiedName` as its only unique
    /// property.
    pub fn to_proxy(&self) -> EntityProxy {
        let mut unique_properties = InstanceProperties::new();
        if let Some(value) = self.properties.get(QUALIFIED_NAME) {
            unique_properties.insert(QUALIFIED_NAME, value.clone());
        }
        EntityProxy {
            header: self.header.clone(),
            unique_properties,
        }
    }
}

/// Property name of the unique name carried by every referenceable.
pub const QUALIFIED_NAME: &str = "qualifiedName";

/// A lightweight reference to an entity, used as a relationship end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProxy {
    #[serde(flatten)]
    pub header: InstanceHeader,

    #[serde(default, skip_serializing_if = "InstanceProperties::is_empty")]
    pub unique_properties: InstanceProperties,
}

impl EntityProxy {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            header: InstanceHeader::new(guid, instance_type),
            unique_properties: InstanceProperties::new(),
        }
    }

    pub fn guid(&self) -> &str {
        &self.header.guid
    }
}

/// A typed link between two entities, carrying its own property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(flatten)]
    pub header: InstanceHeader,

    #[serde(default, skip_serializing_if = "InstanceProperties::is_empty")]
    pub properties: InstanceProperties,

    pub end_one: EntityProxy,

    pub end_two: EntityProxy,
}

impl Relationship {
    pub fn new(
        guid: impl Into<String>,
        instance_type: InstanceType,
        end_one: EntityProxy,
        end_two: EntityProxy,
    ) -> Self {
        Self {
            header: InstanceHeader::new(guid, instance_type),
            properties: InstanceProperties::new(),
            end_one,
            end_two,
        }
    }

    pub fn with_properties(mut self, properties: InstanceProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn guid(&self) -> &str {
        &self.header.guid
    }

    /// Returns `true` if either end refers to `entity_guid`.
    pub fn touches(&self, entity_guid: &str) -> bool {
        self.end_one.guid() == entity_guid || self.end_two.guid() == entity_guid
    }

    /// The end opposite `starting_guid`.
    ///
    /// If `starting_guid` is not end one, end one is returned.
    pub fn other_end(&self, starting_guid: &str) -> &EntityProxy {
        if self.end_one.guid() == starting_guid {
            &self.end_two
        } else {
            &self.end_one
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;

    fn term() -> EntityDetail {
        EntityDetail::new(
            "term-1",
            InstanceType::new("GlossaryTerm").with_super_types(["Referenceable", "OpenMetadataRoot"]),
        )
        .with_properties(
            InstanceProperties::new()
                .with(QUALIFIED_NAME, "term::customer")
                .with("displayName", "Customer"),
        )
    }

    #[test]
    fn is_type_of_checks_supertypes() {
        let t = term();
        assert!(t.header.instance_type.is_type_of("GlossaryTerm"));
        assert!(t.header.instance_type.is_type_of("Referenceable"));
        assert!(!t.header.instance_type.is_type_of("Asset"));
    }

    #[test]
    fn proxy_carries_qualified_name_only() {
        let proxy = term().to_proxy();
        assert_eq!(proxy.guid(), "term-1");
        assert_eq!(proxy.unique_properties.len(), 1);
        assert_eq!(
            proxy.unique_properties.get(QUALIFIED_NAME),
            Some(&PropertyValue::from("term::customer"))
        );
    }

    #[test]
    fn other_end_selection() {
        let a = EntityProxy::new("a", InstanceType::new("Collection"));
        let b = EntityProxy::new("b", InstanceType::new("Asset"));
        let rel = Relationship::new("r", InstanceType::new("CollectionMembership"), a, b);
        assert_eq!(rel.other_end("a").guid(), "b");
        assert_eq!(rel.other_end("b").guid(), "a");
        assert_eq!(rel.other_end("zzz").guid(), "a");
        assert!(rel.touches("b"));
        assert!(!rel.touches("c"));
    }

    #[test]
    fn entity_json_is_flat() {
        let json = serde_json::to_value(term()).unwrap();
        assert_eq!(json["guid"], "term-1");
        assert_eq!(json["type"]["typeDefName"], "GlossaryTerm");
        assert!(json.get("status").is_none(), "default status is omitted");

        let back: EntityDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, term());
    }

    #[test]
    fn category_display() {
        assert_eq!(InstanceCategory::Relationship.to_string(), "relationship");
    }
}
