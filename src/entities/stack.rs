//! Stack: children layered in parallel, all starting at zero.
//! Children are ordered back to front.

use super::any::AnyDictionary;
use super::item::Item;
use super::node::{Composable, NodeId};
use crate::time::TimeRange;

pub const STACK_SCHEMA_NAME: &str = "Stack";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
    pub name: String,
    pub metadata: AnyDictionary,
    pub item: Item,
    children: Vec<NodeId>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
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

impl Composable for Stack {
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
        STACK_SCHEMA_NAME
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
