//! UnknownNode: tree child whose schema is not registered.
//!
//! Keeps the whole record so it writes back unchanged. Lays out as a
//! zero-duration leaf.

use once_cell::sync::Lazy;

use super::any::{Any, AnyDictionary};
use super::keys::{K_METADATA, K_NAME};
use super::node::Composable;
use super::object::SerializableObject;

static EMPTY_METADATA: Lazy<AnyDictionary> = Lazy::new(AnyDictionary::new);

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownNode {
    object: SerializableObject,
}

impl UnknownNode {
    pub fn new(object: SerializableObject) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &SerializableObject {
        &self.object
    }

    pub fn into_object(self) -> SerializableObject {
        self.object
    }
}

impl Composable for UnknownNode {
    fn name(&self) -> &str {
        self.object.name()
    }

    fn set_name(&mut self, name: String) {
        self.object.fields_mut().set(K_NAME, name);
    }

    fn metadata(&self) -> &AnyDictionary {
        self.object.metadata().unwrap_or(&EMPTY_METADATA)
    }

    fn metadata_mut(&mut self) -> &mut AnyDictionary {
        let fields = self.object.fields_mut();
        if !matches!(fields.get(K_METADATA), Some(Any::Dictionary(_))) {
            fields.set(K_METADATA, AnyDictionary::new());
        }
        match fields.get_mut(K_METADATA) {
            Some(Any::Dictionary(d)) => d,
            _ => unreachable!("metadata set above"),
        }
    }

    fn schema_name(&self) -> &str {
        self.object.schema_name()
    }

    fn schema_version(&self) -> i64 {
        self.object.schema_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::object::SchemaId;

    #[test]
    fn test_unknown_metadata_access() {
        let mut f = AnyDictionary::new();
        f.set(K_NAME, "odd");
        let mut node = UnknownNode::new(SerializableObject::new(SchemaId::new("Widget", 2), f));
        assert_eq!(node.name(), "odd");
        assert!(node.metadata().is_empty());

        node.metadata_mut().set("k", 1);
        assert_eq!(node.metadata().get_i64("k").unwrap(), Some(1));
        assert_eq!(node.schema_name(), "Widget");
        assert_eq!(node.schema_version(), 2);
    }
}
