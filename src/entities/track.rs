//! Track: children laid end to end in time.

use std::fmt;

use super::any::AnyDictionary;
use super::item::Item;
use super::node::{Composable, NodeId};
use crate::time::TimeRange;

pub const TRACK_SCHEMA_NAME: &str = "Track";

/// Track kind, serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
    Other(String),
}

impl TrackKind {
    pub fn as_str(&self) -> &str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Other(s) => s,
        }
    }
}

impl From<&str> for TrackKind {
    fn from(s: &str) -> Self {
        match s {
            "Video" => TrackKind::Video,
            "Audio" => TrackKind::Audio,
            other => TrackKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub name: String,
    pub metadata: AnyDictionary,
    pub item: Item,
    pub kind: TrackKind,
    /// Owned children in playback order. Mutated only through the arena.
    children: Vec<NodeId>,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self { name: name.into(), kind, ..Self::default() }
    }

    pub fn with_source_range(mut self, source_range: Option<TimeRange>) -> Self {
        self.item.source_range = source_range;
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}

impl Composable for Track {
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
        TRACK_SCHEMA_NAME
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_kind_strings() {
        assert_eq!(TrackKind::from("Audio"), TrackKind::Audio);
        assert_eq!(TrackKind::from("Subtitle"), TrackKind::Other("Subtitle".into()));
        assert_eq!(TrackKind::Other("Subtitle".into()).to_string(), "Subtitle");
        assert_eq!(TrackKind::default().as_str(), "Video");
    }
}
