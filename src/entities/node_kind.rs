//! NodeKind - enum wrapper for all composable types.
//!
//! Provides unified storage for the different node types in an arena slot.
//! `Composable` calls are dispatched statically over the variants.

use enum_dispatch::enum_dispatch;

use super::any::AnyDictionary;
use super::clip::Clip;
use super::gap::Gap;
use super::item::Item;
use super::node::{Composable, NodeId};
use super::stack::Stack;
use super::track::Track;
use super::transition::Transition;
use super::unknown::UnknownNode;
use crate::time::RationalTime;

#[enum_dispatch(Composable)]
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Clip(Clip),
    Gap(Gap),
    Transition(Transition),
    Track(Track),
    Stack(Stack),
    Unknown(UnknownNode),
}

impl NodeKind {
    pub fn is_clip(&self) -> bool {
        matches!(self, NodeKind::Clip(_))
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, NodeKind::Gap(_))
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, NodeKind::Transition(_))
    }

    pub fn is_track(&self) -> bool {
        matches!(self, NodeKind::Track(_))
    }

    pub fn is_stack(&self) -> bool {
        matches!(self, NodeKind::Stack(_))
    }

    /// Track or Stack
    pub fn is_composition(&self) -> bool {
        matches!(self, NodeKind::Track(_) | NodeKind::Stack(_))
    }

    /// Children of a composition, empty for leaves
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Track(t) => t.children(),
            NodeKind::Stack(s) => s.children(),
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Track(t) => Some(t.children_mut()),
            NodeKind::Stack(s) => Some(s.children_mut()),
            _ => None,
        }
    }

    pub fn as_clip(&self) -> Option<&Clip> {
        match self {
            NodeKind::Clip(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_clip_mut(&mut self) -> Option<&mut Clip> {
        match self {
            NodeKind::Clip(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_gap(&self) -> Option<&Gap> {
        match self {
            NodeKind::Gap(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_transition(&self) -> Option<&Transition> {
        match self {
            NodeKind::Transition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_transition_mut(&mut self) -> Option<&mut Transition> {
        match self {
            NodeKind::Transition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&Track> {
        match self {
            NodeKind::Track(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_track_mut(&mut self) -> Option<&mut Track> {
        match self {
            NodeKind::Track(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&Stack> {
        match self {
            NodeKind::Stack(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_stack_mut(&mut self) -> Option<&mut Stack> {
        match self {
            NodeKind::Stack(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_unknown(&self) -> Option<&UnknownNode> {
        match self {
            NodeKind::Unknown(n) => Some(n),
            _ => None,
        }
    }

    /// Variant name, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            NodeKind::Clip(_) => "Clip",
            NodeKind::Gap(_) => "Gap",
            NodeKind::Transition(_) => "Transition",
            NodeKind::Track(_) => "Track",
            NodeKind::Stack(_) => "Stack",
            NodeKind::Unknown(_) => "unknown",
        }
    }

    /// Short label for logs: `Clip 'shot_010'`
    pub fn label(&self) -> String {
        format!("{} '{}'", self.schema_name(), self.name())
    }
}
