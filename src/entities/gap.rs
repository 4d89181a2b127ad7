//! Gap: empty space of a given duration.

use super::any::AnyDictionary;
use super::item::Item;
use super::node::Composable;
use crate::time::{RationalTime, TimeRange};

pub const GAP_SCHEMA_NAME: &str = "Gap";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gap {
    pub name: String,
    pub metadata: AnyDictionary,
    pub item: Item,
}

impl Gap {
    pub fn new(source_range: Option<TimeRange>) -> Self {
        Self { item: Item::with_source_range(source_range), ..Self::default() }
    }

    /// Gap covering `[0, duration)` at the duration's rate.
    pub fn with_duration(duration: RationalTime) -> Self {
        Self::new(Some(TimeRange::new(RationalTime::zero(duration.rate()), duration)))
    }
}

impl Composable for Gap {
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
        GAP_SCHEMA_NAME
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
