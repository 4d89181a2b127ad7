//! Marker: a named, colored range annotation on an item.

use super::any::AnyDictionary;
use super::keys::{K_COLOR, K_COMMENT, K_MARKED_RANGE, K_METADATA, K_NAME};
use super::object::{SchemaId, Serializable, SerializableObject};
use crate::error::{Error, Result};
use crate::time::TimeRange;

pub const MARKER_SCHEMA_NAME: &str = "Marker";

/// Common color names used by editorial tools.
pub mod color {
    pub const PINK: &str = "PINK";
    pub const RED: &str = "RED";
    pub const ORANGE: &str = "ORANGE";
    pub const YELLOW: &str = "YELLOW";
    pub const GREEN: &str = "GREEN";
    pub const CYAN: &str = "CYAN";
    pub const BLUE: &str = "BLUE";
    pub const PURPLE: &str = "PURPLE";
    pub const MAGENTA: &str = "MAGENTA";
    pub const BLACK: &str = "BLACK";
    pub const WHITE: &str = "WHITE";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    /// Range in the owning item's trimmed space.
    pub marked_range: TimeRange,
    pub color: String,
    pub comment: String,
    pub metadata: AnyDictionary,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            name: String::new(),
            marked_range: TimeRange::default(),
            color: color::RED.to_string(),
            comment: String::new(),
            metadata: AnyDictionary::new(),
        }
    }
}

impl Marker {
    pub fn new(name: impl Into<String>, marked_range: TimeRange) -> Self {
        Self { name: name.into(), marked_range, ..Self::default() }
    }
}

impl Serializable for Marker {
    fn schema_id(&self) -> SchemaId {
        SchemaId::new(MARKER_SCHEMA_NAME, 2)
    }

    fn to_object(&self) -> SerializableObject {
        let mut f = AnyDictionary::new();
        f.set(K_NAME, self.name.as_str());
        f.set(K_MARKED_RANGE, self.marked_range);
        f.set(K_COLOR, self.color.as_str());
        f.set(K_COMMENT, self.comment.as_str());
        f.set(K_METADATA, self.metadata.clone());
        SerializableObject::new(self.schema_id(), f)
    }

    fn from_object(obj: SerializableObject) -> Result<Self> {
        if obj.schema_name() != MARKER_SCHEMA_NAME {
            return Err(Error::SerializationTypeMismatch(format!(
                "expected {MARKER_SCHEMA_NAME}, found {}",
                obj.schema()
            )));
        }
        let f = obj.fields();
        Ok(Self {
            name: f.get_str(K_NAME)?.unwrap_or_default().to_string(),
            marked_range: f.get_time_range_or(K_MARKED_RANGE, TimeRange::default())?,
            color: f.get_str(K_COLOR)?.unwrap_or(color::RED).to_string(),
            comment: f.get_str(K_COMMENT)?.unwrap_or_default().to_string(),
            metadata: f.get_dictionary(K_METADATA)?.cloned().unwrap_or_default(),
        })
    }
}
