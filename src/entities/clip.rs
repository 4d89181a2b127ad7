//! Clip: a trimmed window onto one piece of media.

use super::any::AnyDictionary;
use super::item::Item;
use super::media_reference::MediaReference;
use super::node::Composable;
use crate::time::TimeRange;

pub const CLIP_SCHEMA_NAME: &str = "Clip";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clip {
    pub name: String,
    pub metadata: AnyDictionary,
    pub item: Item,
    /// Exclusively owned; defaults to a missing reference.
    pub media_reference: MediaReference,
}

impl Clip {
    pub fn new(name: impl Into<String>, media_reference: MediaReference, source_range: Option<TimeRange>) -> Self {
        Self {
            name: name.into(),
            metadata: AnyDictionary::new(),
            item: Item::with_source_range(source_range),
            media_reference,
        }
    }

    pub fn source_range(&self) -> Option<TimeRange> {
        self.item.source_range
    }

    pub fn set_source_range(&mut self, range: Option<TimeRange>) {
        self.item.source_range = range;
    }

    /// Replace the media reference, returning the old one.
    pub fn set_media_reference(&mut self, reference: MediaReference) -> MediaReference {
        std::mem::replace(&mut self.media_reference, reference)
    }
}

impl Composable for Clip {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn metadata(&self) -> &AnyDictionary {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut AnyDictionary {
        &mut self.metadata
    }

    fn schema_name(&self) -> &str {
        CLIP_SCHEMA_NAME
    }

    fn schema_version(&self) -> i64 {
        1
    }

    fn item(&self) -> Option<&Item> {
        Some(&self.item)
    }

    fn item_mut(&mut self) -> Option<&mut Item> {
        Some(&mut self.item)
    }
}
