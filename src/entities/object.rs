//! Schema-tagged objects in detached form.
//!
//! A `SerializableObject` is the self-contained record of any schema-tagged
//! value: a `SchemaId` plus its fields. Tree nodes convert to and from it on
//! the way to JSON, and objects of unknown schema are kept as-is in this form.

use std::fmt;

use super::any::AnyDictionary;
use super::keys::{K_METADATA, K_NAME};
use crate::error::{Error, Result};

/// `(name, version)` pair, written as `"Name.Version"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaId {
    pub name: String,
    pub version: i64,
}

impl SchemaId {
    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self { name: name.into(), version }
    }

    /// Parse `"Name.Version"`. The version is the part after the last dot.
    pub fn parse(tag: &str) -> Result<Self> {
        let (name, version) = tag
            .rsplit_once('.')
            .ok_or_else(|| Error::UnresolvableSchema(format!("malformed schema tag '{tag}'")))?;
        if name.is_empty() {
            return Err(Error::UnresolvableSchema(format!("malformed schema tag '{tag}'")));
        }
        let version = version
            .parse::<i64>()
            .map_err(|_| Error::UnresolvableSchema(format!("bad schema version in '{tag}'")))?;
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.version)
    }
}

/// Detached schema-tagged record.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializableObject {
    schema: SchemaId,
    fields: AnyDictionary,
}

impl SerializableObject {
    pub fn new(schema: SchemaId, fields: AnyDictionary) -> Self {
        Self { schema, fields }
    }

    pub fn schema(&self) -> &SchemaId {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema_version(&self) -> i64 {
        self.schema.version
    }

    pub fn fields(&self) -> &AnyDictionary {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut AnyDictionary {
        &mut self.fields
    }

    pub fn into_fields(self) -> AnyDictionary {
        self.fields
    }

    /// `name` field, empty when absent or not a string.
    pub fn name(&self) -> &str {
        self.fields.get_str(K_NAME).ok().flatten().unwrap_or("")
    }

    pub fn metadata(&self) -> Option<&AnyDictionary> {
        self.fields.get_dictionary(K_METADATA).ok().flatten()
    }
}

/// Value types that are not tree nodes but still carry a schema
/// (media references, markers, effects).
pub trait Serializable: Sized {
    fn schema_id(&self) -> SchemaId;
    fn to_object(&self) -> SerializableObject;
    fn from_object(obj: SerializableObject) -> Result<Self>;
}
