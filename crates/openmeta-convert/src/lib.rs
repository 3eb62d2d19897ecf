//! Converts generic metadata instances into typed beans.
//!
//! A [`Converter`] looks a bean kind up in its [`BeanRegistry`] and builds the
//! bean from an entity, an entity plus relationships, or a relationship.
//! Known properties become named fields; anything else is kept in the
//! bean's extended properties. [`ElementHandler`] adds repository lookups on
//! top.

pub mod bag;
pub mod beans;
pub mod converter;
pub mod error;
pub mod handler;
pub mod registry;

pub use bag::{PropertyBag, PropertyEnum, PropertyWriter};
pub use beans::{Bean, BeanKind, ToInstanceProperties};
pub use converter::{ConversionRequest, Converter, Related};
pub use error::{ConversionContext, ConvertError};
pub use handler::{ElementHandler, HandlerError};
pub use registry::{BeanDescriptor, BeanRegistry, EntityEnd, InputShape, RelationshipSlot};
