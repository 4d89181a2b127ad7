//! Entities module - the values and tree nodes of an editorial document
//!
//! - Dynamic values: `Any`, `AnyDictionary`, `SerializableObject`
//! - Composables: `Clip`, `Gap`, `Transition`, `Track`, `Stack`, `UnknownNode`
//! - Attachments: `MediaReference`, `Marker`, `Effect`
//! - Ownership: `Arena` holds every node, `Timeline` is the document root

pub mod any;
pub mod keys;
pub mod object;

pub mod effect;
pub mod item;
pub mod marker;
pub mod media_reference;

pub mod node;
pub mod clip;
pub mod gap;
pub mod stack;
pub mod track;
pub mod transition;
pub mod unknown;
pub mod node_kind;

pub mod arena;
pub mod timeline;

pub use any::{Any, AnyDictionary, AnyVector};
pub use arena::Arena;
pub use clip::Clip;
pub use effect::{Effect, EffectKind};
pub use gap::Gap;
pub use item::Item;
pub use marker::Marker;
pub use media_reference::{MediaReference, ReferenceKind};
pub use node::{Composable, NodeId};
pub use node_kind::NodeKind;
pub use object::{SchemaId, Serializable, SerializableObject};
pub use stack::Stack;
pub use timeline::Timeline;
pub use track::{Track, TrackKind};
pub use transition::Transition;
pub use unknown::UnknownNode;
