//! The `MetadataCollection` trait: read access to stored instances.
//!
//! Handlers depend on this trait rather than on a concrete store so that
//! other backends can be substituted.

use std::collections::BTreeMap;

use serde::Serialize;

use openmeta_core::instance::{EntityDetail, Relationship};

use crate::error::Result;

/// Instance counts for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatistics {
    pub entity_count: usize,
    pub relationship_count: usize,
    /// Number of entities per type name.
    pub entities_by_type: BTreeMap<String, usize>,
    /// Number of relationships per type name.
    pub relationships_by_type: BTreeMap<String, usize>,
}

/// Read-only access to a collection of metadata instances.
///
/// Instances are returned as owned copies; callers never see the store's own
/// values.
pub trait MetadataCollection: Send + Sync {
    /// Retrieves an entity by guid.
    fn get_entity(&self, guid: &str) -> Result<EntityDetail>;

    /// Retrieves a relationship by guid.
    fn get_relationship(&self, guid: &str) -> Result<Relationship>;

    /// Returns every relationship with the entity at either end, in load
    /// order. Fails if the entity is unknown.
    fn get_relationships_for_entity(&self, guid: &str) -> Result<Vec<Relationship>>;

    /// Returns every entity of `type_name` or one of its subtypes, in load
    /// order.
    fn find_entities_by_type(&self, type_name: &str) -> Result<Vec<EntityDetail>>;

    /// Returns instance counts.
    fn statistics(&self) -> Result<CollectionStatistics>;
}
