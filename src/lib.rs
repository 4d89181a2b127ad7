//! OpenTimeline - editorial timeline interchange library
//!
//! Exact rational time, a composition tree of clips, gaps and transitions
//! inside tracks and stacks, range resolution over that tree, and a
//! schema-versioned JSON document form.

// Time algebra
pub mod time;

// Values, tree nodes, arena
pub mod entities;

// Schemas, range resolution, serialization
pub mod core;

pub mod cli;
pub mod config;
pub mod error;

pub use config::{ReadOptions, WriteOptions};
pub use crate::core::Loaded;
pub use entities::{
    Any, AnyDictionary, Arena, Clip, Composable, Effect, Gap, Marker, MediaReference, NodeId, NodeKind,
    SerializableObject, Stack, Timeline, Track, TrackKind, Transition,
};
pub use error::{Error, ErrorCode, Result, Status};
pub use time::{RationalTime, TimeRange, TimeTransform};
