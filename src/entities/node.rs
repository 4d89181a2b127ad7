//! Composable trait - base interface for everything that lives in a track or stack.
//!
//! Composables are the building blocks of the timeline tree:
//! - Clip, Gap, Transition: leaves
//! - Track, Stack: compositions owning an ordered list of children
//! - UnknownNode: leaf of unrecognized schema, kept for round trips
//!
//! Nodes do not own each other. They live in an [`Arena`](super::arena::Arena)
//! and refer to children by [`NodeId`]; the parent link lives in the arena
//! slot, so a node value itself never points back up the tree.

use std::fmt;

use enum_dispatch::enum_dispatch;
use uuid::Uuid;

use super::any::AnyDictionary;
use super::item::Item;
use crate::time::RationalTime;

/// Stable handle of a node in an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u128> for NodeId {
    fn from(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

impl From<Uuid> for NodeId {
    fn from(v: Uuid) -> Self {
        Self(v)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Base trait for all node types.
/// Identification, metadata and the layout traits of a node.
#[enum_dispatch]
pub trait Composable {
    /// Display name of the node
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    fn metadata(&self) -> &AnyDictionary;

    fn metadata_mut(&mut self) -> &mut AnyDictionary;

    /// Schema name written to `OTIO_SCHEMA` ("Clip", "Track", ...)
    fn schema_name(&self) -> &str;

    fn schema_version(&self) -> i64;

    /// Shared item fields, `None` for transitions and unknown nodes.
    fn item(&self) -> Option<&Item> {
        None
    }

    fn item_mut(&mut self) -> Option<&mut Item> {
        None
    }

    /// `(in, out)` time shared with the neighbours instead of taking its own
    /// (transitions). `None` for items that occupy time.
    fn overlap(&self) -> Option<(RationalTime, RationalTime)> {
        None
    }

    fn is_overlapping(&self) -> bool {
        self.overlap().is_some()
    }
}
