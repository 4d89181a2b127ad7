//! Arena - the object table owning every node of one or more trees.
//!
//! Nodes are stored by [`NodeId`] together with their parent link. All
//! structural edits go through the methods here, so a child's parent link and
//! its parent's children list always change together:
//! - a node has at most one parent
//! - a node is never inserted below itself
//! - destroying a composition destroys its whole subtree
//!
//! Detaching (`remove_child`, `remove`, `clear_children`) hands the child id
//! back to the caller; the node stays in the arena, unparented.
//!
//! A timeline's tracks stack is marked as held: it cannot be attached below
//! another node or destroyed until the timeline lets go of it.

use indexmap::IndexMap;
use log::debug;

use super::any::AnyDictionary;
use super::clip::Clip;
use super::gap::Gap;
use super::node::{Composable, NodeId};
use super::node_kind::NodeKind;
use super::stack::Stack;
use super::track::Track;
use super::transition::Transition;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    /// Held as the tracks stack of a timeline.
    held_by_timeline: bool,
    /// Record fields the node's schema does not declare, kept for writing back.
    dynamic_fields: AnyDictionary,
}

impl Slot {
    fn new(kind: NodeKind) -> Self {
        Self { kind, parent: None, held_by_timeline: false, dynamic_fields: AnyDictionary::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: IndexMap<NodeId, Slot>,
}

/// Negative indices count from the end.
pub(crate) fn adjusted_index(index: i64, len: usize) -> i64 {
    if index < 0 { index + len as i64 } else { index }
}

/// Index of an existing element, `IllegalIndex` when out of bounds.
pub(crate) fn checked_index(index: i64, len: usize) -> Result<usize> {
    let adjusted = adjusted_index(index, len);
    if adjusted < 0 || adjusted >= len as i64 {
        return Err(Error::IllegalIndex { index, len });
    }
    Ok(adjusted as usize)
}

fn held(kind: &NodeKind) -> Error {
    Error::AlreadyHasParent(format!("{} is the tracks stack of a timeline", kind.label()))
}

/// Insertion position, clamped into `[0, len]`.
fn insert_position(index: i64, len: usize) -> usize {
    adjusted_index(index, len).clamp(0, len as i64) as usize
}

impl Arena {
    pub fn new() -> Self {
        Self { nodes: IndexMap::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Take ownership of a new, unparented node.
    pub fn add(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = NodeId::new();
        let kind = kind.into();
        debug!("Arena::add {} -> {}", kind.label(), id);
        self.nodes.insert(id, Slot::new(kind));
        id
    }

    /// Add an empty stack already held by a timeline.
    pub(crate) fn add_timeline_tracks(&mut self, name: &str) -> NodeId {
        let id = self.add(Stack::new(name));
        if let Some(slot) = self.nodes.get_mut(&id) {
            slot.held_by_timeline = true;
        }
        id
    }

    /// Mark an unparented stack as a timeline's tracks.
    pub(crate) fn claim_for_timeline(&mut self, id: NodeId) -> Result<()> {
        let slot = self.slot(id)?;
        if !slot.kind.is_stack() {
            return Err(Error::WrongType { key: id.to_string(), expected: "Stack", found: slot.kind.variant_name() });
        }
        if slot.held_by_timeline {
            return Err(Error::AlreadyHasParent(format!("{} already holds the tracks of a timeline", slot.kind.label())));
        }
        if let Some(p) = slot.parent {
            return Err(Error::AlreadyHasParent(format!("{} is a child of {}", slot.kind.label(), self.label(p))));
        }
        self.slot_mut(id)?.held_by_timeline = true;
        Ok(())
    }

    pub(crate) fn release_from_timeline(&mut self, id: NodeId) -> Result<()> {
        self.slot_mut(id)?.held_by_timeline = false;
        Ok(())
    }

    /// True for the tracks stack of a live timeline.
    pub fn is_held_by_timeline(&self, id: NodeId) -> Result<bool> {
        Ok(self.slot(id)?.held_by_timeline)
    }

    /// Fields read from a document that the node's schema does not declare.
    pub fn dynamic_fields(&self, id: NodeId) -> Result<&AnyDictionary> {
        Ok(&self.slot(id)?.dynamic_fields)
    }

    pub fn dynamic_fields_mut(&mut self, id: NodeId) -> Result<&mut AnyDictionary> {
        Ok(&mut self.slot_mut(id)?.dynamic_fields)
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeKind)> {
        self.nodes.iter().map(|(id, slot)| (*id, &slot.kind))
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|(_, s)| s.parent.is_none()).map(|(id, _)| *id).collect()
    }

    fn slot(&self, id: NodeId) -> Result<&Slot> {
        self.nodes.get(&id).ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot> {
        self.nodes.get_mut(&id).ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    pub fn get(&self, id: NodeId) -> Result<&NodeKind> {
        Ok(&self.slot(id)?.kind)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeKind> {
        Ok(&mut self.slot_mut(id)?.kind)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.slot(id)?.parent)
    }

    /// Children of a composition, empty for leaves.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.get(id)?.children())
    }

    pub fn clip(&self, id: NodeId) -> Option<&Clip> {
        self.nodes.get(&id).and_then(|s| s.kind.as_clip())
    }

    pub fn clip_mut(&mut self, id: NodeId) -> Option<&mut Clip> {
        self.nodes.get_mut(&id).and_then(|s| s.kind.as_clip_mut())
    }

    pub fn gap(&self, id: NodeId) -> Option<&Gap> {
        self.nodes.get(&id).and_then(|s| s.kind.as_gap())
    }

    pub fn transition(&self, id: NodeId) -> Option<&Transition> {
        self.nodes.get(&id).and_then(|s| s.kind.as_transition())
    }

    pub fn transition_mut(&mut self, id: NodeId) -> Option<&mut Transition> {
        self.nodes.get_mut(&id).and_then(|s| s.kind.as_transition_mut())
    }

    pub fn track(&self, id: NodeId) -> Option<&Track> {
        self.nodes.get(&id).and_then(|s| s.kind.as_track())
    }

    pub fn track_mut(&mut self, id: NodeId) -> Option<&mut Track> {
        self.nodes.get_mut(&id).and_then(|s| s.kind.as_track_mut())
    }

    pub fn stack(&self, id: NodeId) -> Option<&Stack> {
        self.nodes.get(&id).and_then(|s| s.kind.as_stack())
    }

    pub fn stack_mut(&mut self, id: NodeId) -> Option<&mut Stack> {
        self.nodes.get_mut(&id).and_then(|s| s.kind.as_stack_mut())
    }

    fn label(&self, id: NodeId) -> String {
        match self.nodes.get(&id) {
            Some(slot) => slot.kind.label(),
            None => id.to_string(),
        }
    }

    /// True if `id` sits somewhere below `root` (climbs parent links).
    pub fn has_descendant(&self, root: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(&id).and_then(|s| s.parent);
        while let Some(p) = current {
            if p == root {
                return true;
            }
            current = self.nodes.get(&p).and_then(|s| s.parent);
        }
        false
    }

    /// Position of `child` in `parent`'s children, by identity.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Result<Option<usize>> {
        Ok(self.children(parent)?.iter().position(|c| *c == child))
    }

    fn composition_children_mut(&mut self, parent: NodeId) -> Result<&mut Vec<NodeId>> {
        let label = self.label(parent);
        self.get_mut(parent)?.children_mut().ok_or(Error::NotAComposition(label))
    }

    /// Checks shared by every attach: parent is a composition, child is free,
    /// and the child is not the parent or one of its ancestors.
    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind = self.get(parent)?;
        if !parent_kind.is_composition() {
            return Err(Error::NotAComposition(parent_kind.label()));
        }
        let child_slot = self.slot(child)?;
        if child_slot.held_by_timeline {
            return Err(held(&child_slot.kind));
        }
        if let Some(p) = child_slot.parent {
            return Err(Error::AlreadyHasParent(format!(
                "{} is a child of {}",
                child_slot.kind.label(),
                self.label(p)
            )));
        }
        if child == parent || self.has_descendant(child, parent) {
            return Err(Error::CycleDetected(format!(
                "{} cannot contain {}",
                self.label(parent),
                child_slot.kind.label()
            )));
        }
        Ok(())
    }

    /// Insert `child` at `index` (clamped; negative counts from the end).
    pub fn insert_child(&mut self, parent: NodeId, index: i64, child: NodeId) -> Result<()> {
        self.check_attach(parent, child)?;
        let children = self.composition_children_mut(parent)?;
        let pos = insert_position(index, children.len());
        children.insert(pos, child);
        self.slot_mut(child)?.parent = Some(parent);
        debug!("insert {} into {} at {}", self.label(child), self.label(parent), pos);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_child(parent, i64::MAX, child)
    }

    /// Replace the child at `index`, returning the detached previous child.
    pub fn set_child(&mut self, parent: NodeId, index: i64, child: NodeId) -> Result<NodeId> {
        let pos = checked_index(index, self.children(parent)?.len())?;
        let old = self.children(parent)?[pos];
        if old == child {
            return Ok(old);
        }
        self.check_attach(parent, child)?;
        self.composition_children_mut(parent)?[pos] = child;
        self.slot_mut(child)?.parent = Some(parent);
        self.slot_mut(old)?.parent = None;
        debug!("replace {} with {} in {}", self.label(old), self.label(child), self.label(parent));
        Ok(old)
    }

    /// Detach the child at `index` and return it.
    pub fn remove_child(&mut self, parent: NodeId, index: i64) -> Result<NodeId> {
        let children = self.composition_children_mut(parent)?;
        let pos = checked_index(index, children.len())?;
        let child = children.remove(pos);
        self.slot_mut(child)?.parent = None;
        debug!("remove {} from {}", self.label(child), self.label(parent));
        Ok(child)
    }

    /// Detach `child` from `parent` by identity.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let pos = self.child_index(parent, child)?.ok_or_else(|| {
            Error::NotAChild(format!("{} is not in {}", self.label(child), self.label(parent)))
        })?;
        self.remove_child(parent, pos as i64)
    }

    /// Detach every child, returning them in order.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let old = std::mem::take(self.composition_children_mut(parent)?);
        for c in &old {
            self.slot_mut(*c)?.parent = None;
        }
        debug!("cleared {} children of {}", old.len(), self.label(parent));
        Ok(old)
    }

    /// Replace the children list in one step. Nothing changes on error.
    pub fn set_children(&mut self, parent: NodeId, list: Vec<NodeId>) -> Result<()> {
        let parent_kind = self.get(parent)?;
        if !parent_kind.is_composition() {
            return Err(Error::NotAComposition(parent_kind.label()));
        }
        for (i, c) in list.iter().enumerate() {
            if list[..i].contains(c) {
                return Err(Error::AlreadyHasParent(format!(
                    "{} appears twice in the new children of {}",
                    self.label(*c),
                    self.label(parent)
                )));
            }
            let slot = self.slot(*c)?;
            if slot.held_by_timeline {
                return Err(held(&slot.kind));
            }
            match slot.parent {
                Some(p) if p == parent => {}
                Some(p) => {
                    return Err(Error::AlreadyHasParent(format!(
                        "{} is a child of {}",
                        self.label(*c),
                        self.label(p)
                    )));
                }
                None => {
                    if *c == parent || self.has_descendant(*c, parent) {
                        return Err(Error::CycleDetected(format!(
                            "{} cannot contain {}",
                            self.label(parent),
                            self.label(*c)
                        )));
                    }
                }
            }
        }

        let old = std::mem::replace(self.composition_children_mut(parent)?, list.clone());
        for c in old.iter().filter(|c| !list.contains(c)) {
            self.slot_mut(*c)?.parent = None;
        }
        for c in &list {
            self.slot_mut(*c)?.parent = Some(parent);
        }
        debug!("set {} children on {}", list.len(), self.label(parent));
        Ok(())
    }

    /// Pre-order walk below `root` (root excluded).
    pub fn descendants(&self, root: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root)?.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id)?.iter().rev());
        }
        Ok(out)
    }

    /// First node below `root` named `name`, in pre-order.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self.descendants(root)?.into_iter().find(|id| self.nodes[id].kind.name() == name))
    }

    /// Every clip below `root`, in pre-order.
    pub fn clips(&self, root: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.descendants(root)?.into_iter().filter(|id| self.nodes[id].kind.is_clip()).collect())
    }

    /// Detach `id` from its parent (if any) and drop it with its subtree.
    /// Fails while a timeline holds `id` as its tracks.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let slot = self.slot(id)?;
        if slot.held_by_timeline {
            return Err(held(&slot.kind));
        }
        if let Some(parent) = self.parent(id)? {
            self.remove(parent, id)?;
        }
        let mut doomed = self.descendants(id)?;
        doomed.push(id);
        debug!("destroy {} ({} nodes)", self.label(id), doomed.len());
        for d in doomed {
            self.nodes.shift_remove(&d);
        }
        Ok(())
    }

    /// Copy `id` and its subtree under fresh ids. The copy is unparented
    /// and not held by any timeline.
    pub fn deep_copy(&mut self, id: NodeId) -> Result<NodeId> {
        let dynamic_fields = self.slot(id)?.dynamic_fields.clone();
        let mut kind = self.get(id)?.clone();
        let children = kind.children().to_vec();
        let mut copies = Vec::with_capacity(children.len());
        for c in children {
            copies.push(self.deep_copy(c)?);
        }
        if let Some(list) = kind.children_mut() {
            *list = copies.clone();
        }
        let copy = NodeId::new();
        self.nodes.insert(copy, Slot { dynamic_fields, ..Slot::new(kind) });
        for c in copies {
            self.slot_mut(c)?.parent = Some(copy);
        }
        Ok(copy)
    }
}
