//! Range resolution: where every node sits in time relative to its ancestors.
//!
//! ## Track layout
//!
//! Children are walked with a cursor starting at zero:
//! - an item takes `[cursor, cursor + duration)` and moves the cursor on
//! - a transition between two items pulls the cursor back by its length
//!   (`in_offset + out_offset`) and spans that overlap
//! - a transition at either end of the track takes no time and sits at
//!   `[cursor - in_offset, in_offset + out_offset)`
//!
//! The track's duration is the final cursor.
//!
//! ## Stack layout
//!
//! Every child starts at zero; the stack lasts as long as its longest child.

use log::trace;

use crate::entities::arena::{Arena, checked_index};
use crate::entities::node::{Composable, NodeId};
use crate::entities::node_kind::NodeKind;
use crate::entities::timeline::Timeline;
use crate::error::{Error, Result};
use crate::time::{RationalTime, TimeRange};

/// Two ranges share some time.
fn intersects(a: TimeRange, b: TimeRange) -> bool {
    a.overlaps(b)
}

impl Arena {
    /// Full extent of the node's media or content.
    pub fn available_range(&self, id: NodeId) -> Result<TimeRange> {
        let range = match self.get(id)? {
            NodeKind::Clip(c) => c.media_reference.available_range.ok_or_else(|| {
                Error::CannotComputeAvailableRange(format!(
                    "clip '{}' has no available range on its media reference",
                    c.name
                ))
            })?,
            NodeKind::Gap(g) => g.item.source_range.ok_or_else(|| {
                Error::CannotComputeAvailableRange(format!("gap '{}' has no source range", g.name))
            })?,
            NodeKind::Transition(t) => {
                let d = t.duration();
                TimeRange::new(RationalTime::zero(d.rate()), d)
            }
            NodeKind::Track(t) => {
                let (_, end) = self.track_layout(t.children())?;
                TimeRange::new(RationalTime::zero(end.rate()), end)
            }
            NodeKind::Stack(s) => {
                let end = self.stack_duration(s.children())?;
                TimeRange::new(RationalTime::zero(end.rate()), end)
            }
            NodeKind::Unknown(_) => TimeRange::default(),
        };
        trace!("available_range {} = {}", id, range);
        Ok(range)
    }

    /// `source_range` when set, otherwise the available range.
    pub fn trimmed_range(&self, id: NodeId) -> Result<TimeRange> {
        if let Some(sr) = self.get(id)?.item().and_then(|i| i.source_range) {
            return Ok(sr);
        }
        self.available_range(id)
    }

    pub fn duration(&self, id: NodeId) -> Result<RationalTime> {
        Ok(self.trimmed_range(id)?.duration())
    }

    /// Ranges of all children of a track plus the final cursor.
    fn track_layout(&self, children: &[NodeId]) -> Result<(Vec<TimeRange>, RationalTime)> {
        let overlapping = |i: usize| -> Result<bool> { Ok(self.get(children[i])?.is_overlapping()) };

        let mut cursor = RationalTime::default();
        let mut ranges = Vec::with_capacity(children.len());
        for (i, id) in children.iter().enumerate() {
            match self.get(*id)?.overlap() {
                Some((in_offset, out_offset)) => {
                    let len = in_offset + out_offset;
                    let between = i > 0 && i + 1 < children.len() && !overlapping(i - 1)? && !overlapping(i + 1)?;
                    if between {
                        cursor -= len;
                        ranges.push(TimeRange::new(cursor, len));
                    } else {
                        ranges.push(TimeRange::new(cursor - in_offset, len));
                    }
                }
                None => {
                    let dur = self.duration(*id)?;
                    ranges.push(TimeRange::new(cursor.rescaled_to(dur.rate()), dur));
                    cursor += dur;
                }
            }
        }
        Ok((ranges, cursor))
    }

    fn stack_duration(&self, children: &[NodeId]) -> Result<RationalTime> {
        let mut longest = RationalTime::default();
        for c in children {
            let d = self.duration(*c)?;
            if d > longest {
                longest = d;
            }
        }
        Ok(longest)
    }

    /// Ranges of every child, in the parent's untrimmed time.
    pub fn range_of_all_children(&self, parent: NodeId) -> Result<Vec<(NodeId, TimeRange)>> {
        let kind = self.get(parent)?;
        let ranges = match kind {
            NodeKind::Track(t) => self.track_layout(t.children())?.0,
            NodeKind::Stack(s) => s
                .children()
                .iter()
                .map(|c| {
                    let d = self.duration(*c)?;
                    Ok(TimeRange::new(RationalTime::zero(d.rate()), d))
                })
                .collect::<Result<Vec<_>>>()?,
            other => return Err(Error::NotAComposition(other.label())),
        };
        Ok(kind.children().iter().copied().zip(ranges).collect())
    }

    /// Range of the child at `index` (negative counts from the end).
    pub fn range_of_child_at_index(&self, parent: NodeId, index: i64) -> Result<TimeRange> {
        let kind = self.get(parent)?;
        if !kind.is_composition() {
            return Err(Error::NotAComposition(kind.label()));
        }
        let children = kind.children();
        let pos = checked_index(index, children.len())?;
        let range = match kind {
            NodeKind::Track(_) => self.track_layout(children)?.0[pos],
            _ => {
                let d = self.duration(children[pos])?;
                TimeRange::new(RationalTime::zero(d.rate()), d)
            }
        };
        trace!("range_of_child_at_index {}[{}] = {}", parent, pos, range);
        Ok(range)
    }

    /// Like `range_of_child_at_index`, clipped to the parent's source range.
    pub fn trimmed_range_of_child_at_index(&self, parent: NodeId, index: i64) -> Result<TimeRange> {
        let range = self.range_of_child_at_index(parent, index)?;
        let Some(window) = self.get(parent)?.item().and_then(|i| i.source_range) else {
            return Ok(range);
        };
        if !intersects(window, range) {
            return Err(Error::InvalidTimeRange(format!(
                "child {index} at {range} lies outside its parent's source range {window}"
            )));
        }
        Ok(window.clamped(range))
    }

    fn parent_and_index(&self, child: NodeId) -> Result<Option<(NodeId, usize)>> {
        let Some(parent) = self.parent(child)? else {
            return Ok(None);
        };
        let index = self.child_index(parent, child)?.ok_or_else(|| {
            Error::NotAChild(format!("{} is missing from its parent's children", child))
        })?;
        Ok(Some((parent, index)))
    }

    fn require_parent(&self, child: NodeId) -> Result<(NodeId, usize)> {
        self.parent_and_index(child)?
            .ok_or_else(|| Error::NoParent(self.get(child).map(|k| k.label()).unwrap_or_default()))
    }

    pub fn range_of_child_in_parent(&self, child: NodeId) -> Result<TimeRange> {
        let (parent, index) = self.require_parent(child)?;
        self.range_of_child_at_index(parent, index as i64)
    }

    pub fn trimmed_range_in_parent(&self, child: NodeId) -> Result<TimeRange> {
        let (parent, index) = self.require_parent(child)?;
        self.trimmed_range_of_child_at_index(parent, index as i64)
    }

    /// Range of `target` in `ancestor`'s time: each level's start offset is
    /// added while climbing parent links.
    pub fn range_of_child(&self, ancestor: NodeId, target: NodeId) -> Result<TimeRange> {
        let mut current = target;
        let mut result: Option<TimeRange> = None;
        loop {
            let (parent, index) = self.parent_and_index(current)?.ok_or_else(|| {
                Error::NotADescendant(format!("{} is not below {}", target, ancestor))
            })?;
            let r = self.range_of_child_at_index(parent, index as i64)?;
            result = Some(match result {
                None => r,
                Some(prev) => TimeRange::new(prev.start_time() + r.start_time(), prev.duration()),
            });
            if parent == ancestor {
                break;
            }
            current = parent;
        }
        let range = result.unwrap_or_default();
        trace!("range_of_child {} in {} = {}", target, ancestor, range);
        Ok(range)
    }

    /// Range of `target` in `ancestor`'s time, honouring every source range
    /// on the way up. `None` when some level trims the target out entirely.
    pub fn trimmed_range_of_child(&self, ancestor: NodeId, target: NodeId) -> Result<Option<TimeRange>> {
        let mut current = target;
        let mut range: Option<TimeRange> = None;
        loop {
            let (parent, index) = self.parent_and_index(current)?.ok_or_else(|| {
                Error::NotADescendant(format!("{} is not below {}", target, ancestor))
            })?;
            // `range` is in `current`'s child space; move it into `parent`'s.
            let placed = self.range_of_child_at_index(parent, index as i64)?;
            let mut r = match range {
                None => placed,
                Some(inner) => {
                    let offset = self
                        .get(current)?
                        .item()
                        .and_then(|i| i.source_range)
                        .map_or(RationalTime::default(), |sr| sr.start_time());
                    TimeRange::new(inner.start_time() - offset + placed.start_time(), inner.duration())
                }
            };
            if let Some(window) = self.get(parent)?.item().and_then(|i| i.source_range) {
                if !intersects(window, r) {
                    return Ok(None);
                }
                r = window.clamped(r);
            }
            range = Some(r);
            if parent == ancestor {
                return Ok(range);
            }
            current = parent;
        }
    }

    /// Children whose range intersects `search`, in order.
    pub fn children_in_range(&self, parent: NodeId, search: TimeRange) -> Result<Vec<NodeId>> {
        Ok(self
            .range_of_all_children(parent)?
            .into_iter()
            .filter(|(_, r)| intersects(*r, search))
            .map(|(id, _)| id)
            .collect())
    }

    /// Previous and next siblings of `child`.
    pub fn neighbors_of(&self, child: NodeId) -> Result<(Option<NodeId>, Option<NodeId>)> {
        let (parent, index) = self.require_parent(child)?;
        let siblings = self.children(parent)?;
        let prev = index.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(index + 1).copied();
        Ok((prev, next))
    }

    /// Extra media used by adjacent transitions in a track:
    /// `(previous transition's in_offset, next transition's out_offset)`.
    pub fn handles_of_child(&self, child: NodeId) -> Result<(Option<RationalTime>, Option<RationalTime>)> {
        let (parent, _) = self.require_parent(child)?;
        if !self.get(parent)?.is_track() {
            return Ok((None, None));
        }
        let (prev, next) = self.neighbors_of(child)?;
        let head = prev.and_then(|p| self.transition(p)).map(|t| t.in_offset);
        let tail = next.and_then(|n| self.transition(n)).map(|t| t.out_offset);
        Ok((head, tail))
    }
}

impl Timeline {
    pub fn duration(&self, arena: &Arena) -> Result<RationalTime> {
        arena.duration(self.tracks())
    }

    /// Range of `target` in the timeline's tracks stack.
    pub fn range_of_child(&self, arena: &Arena, target: NodeId) -> Result<TimeRange> {
        arena.range_of_child(self.tracks(), target)
    }

    pub fn trimmed_range_of_child(&self, arena: &Arena, target: NodeId) -> Result<Option<TimeRange>> {
        arena.trimmed_range_of_child(self.tracks(), target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::clip::Clip;
    use crate::entities::gap::Gap;
    use crate::entities::media_reference::MediaReference;
    use crate::entities::stack::Stack;
    use crate::entities::track::{Track, TrackKind};
    use crate::entities::transition::Transition;
    use crate::error::ErrorCode;

    fn rt(v: f64) -> RationalTime {
        RationalTime::new(v, 24.0)
    }

    fn tr(start: f64, dur: f64) -> TimeRange {
        TimeRange::new(rt(start), rt(dur))
    }

    fn clip(arena: &mut Arena, name: &str, dur: f64) -> NodeId {
        let media = MediaReference::external(format!("{name}.mov"), Some(tr(0.0, 100.0)));
        arena.add(Clip::new(name, media, Some(tr(0.0, dur))))
    }

    fn track_with(arena: &mut Arena, children: &[NodeId]) -> NodeId {
        let t = arena.add(Track::new("V1", TrackKind::Video));
        for c in children {
            arena.append_child(t, *c).unwrap();
        }
        t
    }

    /// Test: two 10-frame clips joined by a 2+2 transition
    /// Validates: track duration is 16 frames
    #[test]
    fn test_transition_between_clips() {
        let mut a = Arena::new();
        let c1 = clip(&mut a, "c1", 10.0);
        let tx = a.add(Transition::new("dissolve", rt(2.0), rt(2.0)));
        let c2 = clip(&mut a, "c2", 10.0);
        let t = track_with(&mut a, &[c1, tx, c2]);

        assert_eq!(a.duration(t).unwrap(), rt(16.0));
        assert_eq!(a.range_of_child_at_index(t, 0).unwrap(), tr(0.0, 10.0));
        assert_eq!(a.range_of_child_at_index(t, 1).unwrap(), tr(6.0, 4.0));
        assert_eq!(a.range_of_child_at_index(t, -1).unwrap(), tr(6.0, 10.0));
        assert_eq!(a.available_range(tx).unwrap(), tr(0.0, 4.0));
    }

    #[test]
    fn test_edge_transition_takes_no_time() {
        let mut a = Arena::new();
        let tx = a.add(Transition::new("fade_in", rt(0.0), rt(3.0)));
        let c1 = clip(&mut a, "c1", 10.0);
        let t = track_with(&mut a, &[tx, c1]);

        assert_eq!(a.duration(t).unwrap(), rt(10.0));
        assert_eq!(a.range_of_child_in_parent(tx).unwrap(), tr(0.0, 3.0));
        assert_eq!(a.range_of_child_in_parent(c1).unwrap(), tr(0.0, 10.0));
    }

    #[test]
    fn test_sequential_and_parallel_layout() {
        let mut a = Arena::new();
        let c1 = clip(&mut a, "c1", 10.0);
        let g = a.add(Gap::with_duration(rt(5.0)));
        let c2 = clip(&mut a, "c2", 7.0);
        let t1 = track_with(&mut a, &[c1, g, c2]);
        let c3 = clip(&mut a, "c3", 30.0);
        let t2 = track_with(&mut a, &[c3]);

        let stack = a.add(Stack::new("tracks"));
        a.append_child(stack, t1).unwrap();
        a.append_child(stack, t2).unwrap();

        assert_eq!(a.duration(t1).unwrap(), rt(22.0));
        assert_eq!(a.range_of_child_in_parent(c2).unwrap(), tr(15.0, 7.0));
        assert_eq!(a.duration(stack).unwrap(), rt(30.0));
        assert_eq!(a.range_of_child_at_index(stack, 0).unwrap(), tr(0.0, 22.0));

        let all = a.range_of_all_children(t1).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], (g, tr(10.0, 5.0)));
        assert_eq!(a.children_in_range(t1, tr(12.0, 5.0)).unwrap(), vec![g, c2]);
        // abutting at 10 does not count
        assert_eq!(a.children_in_range(t1, tr(10.0, 1.0)).unwrap(), vec![g]);
    }

    #[test]
    fn test_empty_compositions() {
        let mut a = Arena::new();
        let stack = a.add(Stack::new("empty"));
        let track = a.add(Track::new("V1", TrackKind::Video));
        assert_eq!(a.duration(stack).unwrap(), RationalTime::default());
        assert_eq!(a.duration(track).unwrap().value(), 0.0);
        assert_eq!(a.range_of_child_at_index(track, 0).unwrap_err().code(), ErrorCode::IllegalIndex);
    }

    /// Test: clip nested two levels below the tracks stack
    /// Validates: start is the sum of preceding siblings at each level
    #[test]
    fn test_range_of_nested_child() {
        let mut a = Arena::new();
        let tl = Timeline::new(&mut a, "edit");

        let lead = clip(&mut a, "lead", 12.0);
        let inner_lead = clip(&mut a, "inner_lead", 4.0);
        let target = clip(&mut a, "target", 6.0);
        let inner = track_with(&mut a, &[inner_lead, target]);
        let outer = track_with(&mut a, &[lead, inner]);
        a.append_child(tl.tracks(), outer).unwrap();

        let r = tl.range_of_child(&a, target).unwrap();
        assert_eq!(r.start_time(), rt(12.0 + 4.0));
        assert_eq!(r.duration(), rt(6.0));
        assert_eq!(tl.duration(&a).unwrap(), rt(22.0));

        // same answer from an intermediate ancestor
        assert_eq!(a.range_of_child(outer, target).unwrap(), tr(16.0, 6.0));
        assert_eq!(a.range_of_child(inner, target).unwrap(), tr(4.0, 6.0));
    }

    #[test]
    fn test_range_of_child_errors() {
        let mut a = Arena::new();
        let c = clip(&mut a, "c", 5.0);
        let t = track_with(&mut a, &[c]);
        let other = a.add(Track::new("other", TrackKind::Video));
        let loose = clip(&mut a, "loose", 5.0);

        assert_eq!(a.range_of_child(other, c).unwrap_err().code(), ErrorCode::NotADescendant);
        assert_eq!(a.range_of_child_in_parent(loose).unwrap_err().code(), ErrorCode::NoParent);
        assert_eq!(a.range_of_child(t, c).unwrap(), tr(0.0, 5.0));
    }

    /// Test: clip with no source range and no media range
    /// Validates: trimmed_range reports the missing range
    #[test]
    fn test_missing_reference_has_no_range() {
        let mut a = Arena::new();
        let c = a.add(Clip::new("offline", MediaReference::missing(), None));
        let err = a.trimmed_range(c).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotComputeAvailableRange);

        a.clip_mut(c).unwrap().set_source_range(Some(tr(0.0, 8.0)));
        assert_eq!(a.trimmed_range(c).unwrap(), tr(0.0, 8.0));
    }

    #[test]
    fn test_trimmed_child_ranges() {
        let mut a = Arena::new();
        let c1 = clip(&mut a, "c1", 10.0);
        let c2 = clip(&mut a, "c2", 10.0);
        let c3 = clip(&mut a, "c3", 10.0);
        let t = track_with(&mut a, &[c1, c2, c3]);
        a.track_mut(t).unwrap().item.source_range = Some(tr(5.0, 10.0));

        assert_eq!(a.duration(t).unwrap(), rt(10.0));
        assert_eq!(a.available_range(t).unwrap(), tr(0.0, 30.0));
        assert_eq!(a.trimmed_range_of_child_at_index(t, 0).unwrap(), tr(5.0, 5.0));
        assert_eq!(a.trimmed_range_in_parent(c2).unwrap(), tr(10.0, 5.0));
        let err = a.trimmed_range_of_child_at_index(t, 2).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTimeRange);

        let stack = a.add(Stack::new("tracks"));
        a.append_child(stack, t).unwrap();
        // [10, 15) in track space maps to [5, 10) once the 5-frame trim is removed
        assert_eq!(a.trimmed_range_of_child(stack, c2).unwrap(), Some(tr(5.0, 5.0)));
        assert_eq!(a.trimmed_range_of_child(stack, c3).unwrap(), None);
    }

    #[test]
    fn test_neighbors_and_handles() {
        let mut a = Arena::new();
        let c1 = clip(&mut a, "c1", 10.0);
        let tx = a.add(Transition::new("x", rt(3.0), rt(1.0)));
        let c2 = clip(&mut a, "c2", 10.0);
        let t = track_with(&mut a, &[c1, tx, c2]);

        assert_eq!(a.neighbors_of(tx).unwrap(), (Some(c1), Some(c2)));
        assert_eq!(a.neighbors_of(c1).unwrap(), (None, Some(tx)));
        assert_eq!(a.handles_of_child(c1).unwrap(), (None, Some(rt(1.0))));
        assert_eq!(a.handles_of_child(c2).unwrap(), (Some(rt(3.0)), None));
        assert_eq!(a.duration(t).unwrap(), rt(16.0));
    }

    #[test]
    fn test_mixed_rates_in_track() {
        let mut a = Arena::new();
        let c1 = clip(&mut a, "c1", 24.0);
        let media = MediaReference::external("b.mov", Some(TimeRange::new(RationalTime::new(0.0, 48.0), RationalTime::new(96.0, 48.0))));
        let c2 = a.add(Clip::new("c2", media, None));
        let t = track_with(&mut a, &[c1, c2]);

        // one second + two seconds
        assert_eq!(a.duration(t).unwrap(), RationalTime::new(3.0, 1.0));
        assert_eq!(a.range_of_child_in_parent(c2).unwrap().start_time(), RationalTime::new(1.0, 1.0));
    }
}
