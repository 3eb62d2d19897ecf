//! Fetch-and-convert on top of a metadata collection.

use tracing::debug;

use openmeta_core::instance::EntityDetail;
use openmeta_repository::{MetadataCollection, RepositoryError};

use crate::beans::Bean;
use crate::converter::{Converter, Related};
use crate::error::{ConversionContext, ConvertError};
use crate::registry::{BeanDescriptor, InputShape};

/// Errors raised by an [`ElementHandler`].
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl HandlerError {
    /// Returns `true` if the requested instance does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;

/// Pairs a repository with a converter.
#[derive(Debug)]
pub struct ElementHandler<R> {
    repository: R,
    converter: Converter,
}

impl<R: MetadataCollection> ElementHandler<R> {
    pub fn new(repository: R, converter: Converter) -> Self {
        Self {
            repository,
            converter,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Fetches the entity `guid` and builds the bean named by `tag` from it.
    ///
    /// The entity's relationships are fetched only when the bean has slots
    /// for them, and only those of a type some slot takes are passed on.
    pub fn get_bean(&self, tag: &str, guid: &str, context: &ConversionContext) -> Result<Bean> {
        let descriptor = self.converter.registry().lookup(tag, context)?;
        if descriptor.input == InputShape::Relationship {
            let relationship = self.repository.get_relationship(guid)?;
            return Ok(self
                .converter
                .convert_relationship(tag, None, Some(&relationship), context)?);
        }

        let entity = self.repository.get_entity(guid)?;
        self.convert_entity(descriptor, &entity, context)
    }

    /// Builds a bean for every entity of the bean's entity type, in
    /// repository order.
    pub fn find_beans(&self, tag: &str, context: &ConversionContext) -> Result<Vec<Bean>> {
        let descriptor = self.converter.registry().lookup(tag, context)?;
        let Some(entity_type) = descriptor.entity_type else {
            return Err(ConvertError::invalid_bean_class(
                descriptor.bean_class,
                "bean is not built from entities",
                context,
            )
            .into());
        };

        let entities = self.repository.find_entities_by_type(entity_type)?;
        debug!(tag, entity_type, count = entities.len(), "converting entities");
        entities
            .iter()
            .map(|entity| self.convert_entity(descriptor, entity, context))
            .collect()
    }

    fn convert_entity(
        &self,
        descriptor: &BeanDescriptor,
        entity: &EntityDetail,
        context: &ConversionContext,
    ) -> Result<Bean> {
        let mut relationships = Vec::new();
        if descriptor.input.consumes_relationships() {
            for relationship in self.repository.get_relationships_for_entity(entity.guid())? {
                if descriptor.accepts_relationship(&relationship.header.instance_type) {
                    relationships.push(relationship);
                } else {
                    debug!(
                        relationship = relationship.guid(),
                        relationship_type = relationship.header.type_name(),
                        bean_class = descriptor.bean_class,
                        "relationship type has no slot, not passing it on"
                    );
                }
            }
        }
        let tag = descriptor.kind.tag();
        Ok(self
            .converter
            .convert(tag, Some(entity), Related::Many(&relationships), context)?)
    }
}
