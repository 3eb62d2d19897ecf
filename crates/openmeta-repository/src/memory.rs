//! [`InMemoryCollection`] -- a metadata collection held in memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use openmeta_core::instance::{EntityDetail, Relationship};
use openmeta_core::jsonl::{self, InstanceDocument, JsonlError};
use openmeta_core::validation::{validate_entity, validate_relationship};

use crate::error::{RepositoryError, Result};
use crate::traits::{CollectionStatistics, MetadataCollection};

#[derive(Debug, Default)]
struct Instances {
    entities: Vec<EntityDetail>,
    entity_index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
    relationship_index: HashMap<String, usize>,
}

/// In-memory implementation of [`MetadataCollection`].
///
/// Instances live behind a `Mutex`. Loading the same guid twice replaces the
/// earlier instance in place, so load order is kept.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    instances: Mutex<Instances>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSONL instance document from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(?path, "loading instance document");
        let file = File::open(path).map_err(JsonlError::from)?;
        let collection = Self::from_reader(BufReader::new(file))?;
        let stats = collection.statistics()?;
        info!(
            entities = stats.entity_count,
            relationships = stats.relationship_count,
            "instance document loaded"
        );
        Ok(collection)
    }

    /// Loads JSONL instance documents from a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let collection = Self::new();
        for document in jsonl::read_jsonl(reader) {
            collection.insert(document?)?;
        }
        Ok(collection)
    }

    /// Builds a collection from already-parsed documents.
    pub fn from_documents(documents: impl IntoIterator<Item = InstanceDocument>) -> Result<Self> {
        let collection = Self::new();
        for document in documents {
            collection.insert(document)?;
        }
        Ok(collection)
    }

    /// Validates and stores one instance.
    pub fn insert(&self, document: InstanceDocument) -> Result<()> {
        match document {
            InstanceDocument::Entity(entity) => self.insert_entity(entity),
            InstanceDocument::Relationship(relationship) => self.insert_relationship(relationship),
        }
    }

    pub fn insert_entity(&self, entity: EntityDetail) -> Result<()> {
        validate_entity(&entity)?;
        let mut instances = self.lock()?;
        let guid = entity.guid().to_owned();
        match instances.entity_index.get(&guid).copied() {
            Some(idx) => {
                debug!(%guid, "replacing entity");
                instances.entities[idx] = entity;
            }
            None => {
                debug!(%guid, type_name = entity.header.type_name(), "adding entity");
                let idx = instances.entities.len();
                instances.entities.push(entity);
                instances.entity_index.insert(guid, idx);
            }
        }
        Ok(())
    }

    pub fn insert_relationship(&self, relationship: Relationship) -> Result<()> {
        validate_relationship(&relationship)?;
        let mut instances = self.lock()?;
        let guid = relationship.guid().to_owned();
        match instances.relationship_index.get(&guid).copied() {
            Some(idx) => {
                debug!(%guid, "replacing relationship");
                instances.relationships[idx] = relationship;
            }
            None => {
                debug!(
                    %guid,
                    type_name = relationship.header.type_name(),
                    "adding relationship"
                );
                let idx = instances.relationships.len();
                instances.relationships.push(relationship);
                instances.relationship_index.insert(guid, idx);
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Instances>> {
        self.instances
            .lock()
            .map_err(|e| RepositoryError::Internal(format!("mutex poisoned: {e}")))
    }
}

impl MetadataCollection for InMemoryCollection {
    fn get_entity(&self, guid: &str) -> Result<EntityDetail> {
        let instances = self.lock()?;
        instances
            .entity_index
            .get(guid)
            .map(|&idx| instances.entities[idx].clone())
            .ok_or_else(|| RepositoryError::entity_not_found(guid))
    }

    fn get_relationship(&self, guid: &str) -> Result<Relationship> {
        let instances = self.lock()?;
        instances
            .relationship_index
            .get(guid)
            .map(|&idx| instances.relationships[idx].clone())
            .ok_or_else(|| RepositoryError::relationship_not_found(guid))
    }

    fn get_relationships_for_entity(&self, guid: &str) -> Result<Vec<Relationship>> {
        let instances = self.lock()?;
        if !instances.entity_index.contains_key(guid) {
            return Err(RepositoryError::entity_not_found(guid));
        }
        Ok(instances
            .relationships
            .iter()
            .filter(|r| r.touches(guid))
            .cloned()
            .collect())
    }

    fn find_entities_by_type(&self, type_name: &str) -> Result<Vec<EntityDetail>> {
        let instances = self.lock()?;
        Ok(instances
            .entities
            .iter()
            .filter(|e| e.header.instance_type.is_type_of(type_name))
            .cloned()
            .collect())
    }

    fn statistics(&self) -> Result<CollectionStatistics> {
        let instances = self.lock()?;
        let mut stats = CollectionStatistics {
            entity_count: instances.entities.len(),
            relationship_count: instances.relationships.len(),
            ..CollectionStatistics::default()
        };
        for entity in &instances.entities {
            *stats
                .entities_by_type
                .entry(entity.header.type_name().to_owned())
                .or_default() += 1;
        }
        for relationship in &instances.relationships {
            *stats
                .relationships_by_type
                .entry(relationship.header.type_name().to_owned())
                .or_default() += 1;
        }
        Ok(stats)
    }
}
