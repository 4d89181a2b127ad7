//! Core algorithms - schemas, range resolution, serialization.
//!
//! These operate on the entity types and hold no state of their own.

pub mod json;
pub mod ranges;
pub mod schema;
pub mod serialize;

pub use schema::{FieldDef, FieldKind, Schema};
pub use serialize::Loaded;
