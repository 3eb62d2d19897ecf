//! Generic metadata instance model.
//!
//! Repositories hand out entities and relationships as type-agnostic
//! property bags. This crate holds those instance types, the closed enums
//! that describe them, validation rules, and the JSONL document format
//! used to persist them.

pub mod enums;
pub mod instance;
pub mod jsonl;
pub mod property;
pub mod validation;
