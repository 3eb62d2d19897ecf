//! Repository access for the converter.
//!
//! Provides the [`MetadataCollection`] trait and an in-memory implementation
//! ([`InMemoryCollection`]) loaded from JSONL instance documents.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::RepositoryError;
pub use memory::InMemoryCollection;
pub use traits::{CollectionStatistics, MetadataCollection};
