//! Repository error types.

use openmeta_core::instance::InstanceCategory;
use openmeta_core::jsonl::JsonlError;
use openmeta_core::validation::ValidationError;

/// Errors that can occur while reading from a metadata collection.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The requested instance was not found.
    #[error("{category} not found: {guid}")]
    NotFound {
        /// Whether an entity or a relationship was looked up.
        category: InstanceCategory,
        /// The guid that was looked up.
        guid: String,
    },

    /// The instance document could not be read.
    #[error("failed to read instances: {0}")]
    Jsonl(#[from] JsonlError),

    /// A loaded instance failed validation.
    #[error("invalid instance: {0}")]
    Invalid(#[from] ValidationError),

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the repository crate.
pub type Result<T> = std::result::Result<T, RepositoryError>;

impl RepositoryError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`RepositoryError::NotFound`] for an entity.
    pub fn entity_not_found(guid: impl Into<String>) -> Self {
        Self::NotFound {
            category: InstanceCategory::Entity,
            guid: guid.into(),
        }
    }

    /// Creates a [`RepositoryError::NotFound`] for a relationship.
    pub fn relationship_not_found(guid: impl Into<String>) -> Self {
        Self::NotFound {
            category: InstanceCategory::Relationship,
            guid: guid.into(),
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`RepositoryError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
