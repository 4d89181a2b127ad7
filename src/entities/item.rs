//! Fields shared by every item (clip, gap, track, stack).

use super::effect::Effect;
use super::marker::Marker;
use crate::time::TimeRange;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Trimmed portion of the available range; `None` uses all of it.
    pub source_range: Option<TimeRange>,
    pub markers: Vec<Marker>,
    pub effects: Vec<Effect>,
    pub enabled: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self { source_range: None, markers: Vec::new(), effects: Vec::new(), enabled: true }
    }
}

impl Item {
    pub fn with_source_range(source_range: Option<TimeRange>) -> Self {
        Self { source_range, ..Self::default() }
    }
}
