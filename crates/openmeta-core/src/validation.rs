//! Instance validation rules.

use crate::instance::{EntityDetail, InstanceCategory, InstanceHeader, Relationship};
use crate::property::InstanceProperties;

/// Error type for validation failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} has no guid")]
    MissingGuid(InstanceCategory),

    #[error("{category} {guid} has no type name")]
    MissingTypeName {
        category: InstanceCategory,
        guid: String,
    },

    #[error("relationship {guid} has no guid on end {end}")]
    MissingEndGuid { guid: String, end: u8 },

    #[error("{category} {guid} has an empty property name")]
    EmptyPropertyName {
        category: InstanceCategory,
        guid: String,
    },

    #[error("{category} {guid} becomes effective after it stops being effective")]
    EffectivityInverted {
        category: InstanceCategory,
        guid: String,
    },
}

/// Validates an entity's header and property bag.
pub fn validate_entity(entity: &EntityDetail) -> Result<(), ValidationError> {
    validate_header(&entity.header, InstanceCategory::Entity)?;
    validate_properties(&entity.properties, &entity.header, InstanceCategory::Entity)
}

/// Validates a relationship's header, property bag and both ends.
pub fn validate_relationship(relationship: &Relationship) -> Result<(), ValidationError> {
    let category = InstanceCategory::Relationship;
    validate_header(&relationship.header, category)?;
    for (end, proxy) in [(1, &relationship.end_one), (2, &relationship.end_two)] {
        if proxy.guid().is_empty() {
            return Err(ValidationError::MissingEndGuid {
                guid: relationship.header.guid.clone(),
                end,
            });
        }
    }
    validate_properties(&relationship.properties, &relationship.header, category)
}

fn validate_header(
    header: &InstanceHeader,
    category: InstanceCategory,
) -> Result<(), ValidationError> {
    if header.guid.is_empty() {
        return Err(ValidationError::MissingGuid(category));
    }
    if header.type_name().is_empty() {
        return Err(ValidationError::MissingTypeName {
            category,
            guid: header.guid.clone(),
        });
    }
    Ok(())
}

fn validate_properties(
    properties: &InstanceProperties,
    header: &InstanceHeader,
    category: InstanceCategory,
) -> Result<(), ValidationError> {
    if properties.iter().any(|(name, _)| name.is_empty()) {
        return Err(ValidationError::EmptyPropertyName {
            category,
            guid: header.guid.clone(),
        });
    }
    if let (Some(from), Some(to)) = (properties.effective_from_time, properties.effective_to_time) {
        if from > to {
            return Err(ValidationError::EffectivityInverted {
                category,
                guid: header.guid.clone(),
            });
        }
    }
    Ok(())
}
