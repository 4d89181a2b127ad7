//! Transition: overlap between the items on either side of it in a track.

use super::any::AnyDictionary;
use super::node::Composable;
use crate::config::DEFAULT_TRANSITION_TYPE;
use crate::time::RationalTime;

pub const TRANSITION_SCHEMA_NAME: &str = "Transition";

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub name: String,
    pub metadata: AnyDictionary,
    /// Time taken from the preceding item.
    pub in_offset: RationalTime,
    /// Time taken from the following item.
    pub out_offset: RationalTime,
    pub transition_type: String,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            name: String::new(),
            metadata: AnyDictionary::new(),
            in_offset: RationalTime::default(),
            out_offset: RationalTime::default(),
            transition_type: DEFAULT_TRANSITION_TYPE.to_string(),
        }
    }
}

impl Transition {
    pub fn new(name: impl Into<String>, in_offset: RationalTime, out_offset: RationalTime) -> Self {
        Self { name: name.into(), in_offset, out_offset, ..Self::default() }
    }

    /// `in_offset + out_offset`
    pub fn duration(&self) -> RationalTime {
        self.in_offset + self.out_offset
    }
}

impl Composable for Transition {
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
        TRANSITION_SCHEMA_NAME
    }

    fn schema_version(&self) -> i64 {
        1
    }

    fn overlap(&self) -> Option<(RationalTime, RationalTime)> {
        Some((self.in_offset, self.out_offset))
    }
}
