//! Conversion error types.

use std::fmt;

use openmeta_core::instance::{InstanceCategory, Relationship};

/// Identifies the caller of a conversion, for error messages and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionContext {
    pub service_name: String,
    pub method_name: String,
}

impl ConversionContext {
    pub fn new(service_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            method_name: method_name.into(),
        }
    }
}

impl fmt::Display for ConversionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service_name, self.method_name)
    }
}

/// Errors raised while building a bean.
///
/// Conversion is deterministic, so none of these are retryable.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The primary instance was required but not supplied.
    #[error("{context}: no {category} was supplied to build {bean_class}")]
    MissingInstance {
        bean_class: String,
        category: InstanceCategory,
        context: ConversionContext,
    },

    /// The requested bean class is not known to the registry.
    #[error("{context}: bean class {bean_class} cannot be built: {reason}")]
    InvalidBeanClass {
        bean_class: String,
        reason: String,
        context: ConversionContext,
    },

    /// A relationship had no matching slot in the bean.
    #[error("{context}: {relationship_type} relationship {guid} has no place in {bean_class}")]
    UnrecognizedRelationshipType {
        bean_class: String,
        relationship_type: String,
        guid: String,
        context: ConversionContext,
    },

    /// A relationship supplied with an entity does not connect to it.
    #[error("{context}: {relationship_type} relationship {guid} does not connect to {entity_guid}, cannot build {bean_class}")]
    DetachedRelationship {
        bean_class: String,
        relationship_type: String,
        guid: String,
        entity_guid: String,
        context: ConversionContext,
    },

    /// The entity is not of the type the bean is built from.
    #[error("{context}: {bean_class} is built from {expected} entities but {guid} is a {actual}")]
    UnexpectedElementType {
        bean_class: String,
        expected: String,
        actual: String,
        guid: String,
        context: ConversionContext,
    },
}

/// Convenience alias used throughout the conversion crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`ConvertError::MissingInstance`].
    pub fn missing_instance(
        bean_class: impl Into<String>,
        category: InstanceCategory,
        context: &ConversionContext,
    ) -> Self {
        Self::MissingInstance {
            bean_class: bean_class.into(),
            category,
            context: context.clone(),
        }
    }

    /// Creates a [`ConvertError::InvalidBeanClass`].
    pub fn invalid_bean_class(
        bean_class: impl Into<String>,
        reason: impl Into<String>,
        context: &ConversionContext,
    ) -> Self {
        Self::InvalidBeanClass {
            bean_class: bean_class.into(),
            reason: reason.into(),
            context: context.clone(),
        }
    }

    /// Creates a [`ConvertError::DetachedRelationship`].
    pub fn detached_relationship(
        bean_class: impl Into<String>,
        relationship: &Relationship,
        entity_guid: impl Into<String>,
        context: &ConversionContext,
    ) -> Self {
        Self::DetachedRelationship {
            bean_class: bean_class.into(),
            relationship_type: relationship.header.type_name().to_owned(),
            guid: relationship.guid().to_owned(),
            entity_guid: entity_guid.into(),
            context: context.clone(),
        }
    }

    // -- Accessors -----------------------------------------------------------

    /// The bean class the failed conversion was building.
    pub fn bean_class(&self) -> &str {
        match self {
            Self::MissingInstance { bean_class, .. }
            | Self::InvalidBeanClass { bean_class, .. }
            | Self::UnrecognizedRelationshipType { bean_class, .. }
            | Self::DetachedRelationship { bean_class, .. }
            | Self::UnexpectedElementType { bean_class, .. } => bean_class,
        }
    }

    /// The caller that requested the conversion.
    pub fn context(&self) -> &ConversionContext {
        match self {
            Self::MissingInstance { context, .. }
            | Self::InvalidBeanClass { context, .. }
            | Self::UnrecognizedRelationshipType { context, .. }
            | Self::DetachedRelationship { context, .. }
            | Self::UnexpectedElementType { context, .. } => context,
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`ConvertError::MissingInstance`].
    pub fn is_missing_instance(&self) -> bool {
        matches!(self, Self::MissingInstance { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context_and_bean_class() {
        let ctx = ConversionContext::new("asset-manager", "getAssetByGUID");
        let err = ConvertError::missing_instance("AssetElement", InstanceCategory::Entity, &ctx);
        assert_eq!(
            err.to_string(),
            "asset-manager.getAssetByGUID: no entity was supplied to build AssetElement"
        );
        assert_eq!(err.bean_class(), "AssetElement");
        assert_eq!(err.context(), &ctx);
        assert!(err.is_missing_instance());
    }

    #[test]
    fn invalid_bean_class_message() {
        let ctx = ConversionContext::new("svc", "m");
        let err = ConvertError::invalid_bean_class("widget", "no such bean kind", &ctx);
        assert_eq!(err.to_string(), "svc.m: bean class widget cannot be built: no such bean kind");
        assert!(!err.is_missing_instance());
    }

    #[test]
    fn detached_relationship_message() {
        use openmeta_core::instance::{EntityProxy, InstanceType};

        let ctx = ConversionContext::new("svc", "m");
        let rel = Relationship::new(
            "t-9",
            InstanceType::new("ActionTarget"),
            EntityProxy::new("other-todo", InstanceType::new("ToDo")),
            EntityProxy::new("asset-9", InstanceType::new("Asset")),
        );
        let err = ConvertError::detached_relationship("ActionElement", &rel, "todo-1", &ctx);
        assert_eq!(
            err.to_string(),
            "svc.m: ActionTarget relationship t-9 does not connect to todo-1, cannot build ActionElement"
        );
        assert_eq!(err.bean_class(), "ActionElement");
    }
}
