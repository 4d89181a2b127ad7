//! Timeline: root of an editorial document.
//!
//! Not a composable itself. Owns exactly one stack (named "tracks") in the
//! arena; the tracks of the edit are that stack's children. The arena marks
//! that stack as held, so it cannot be reparented or destroyed behind the
//! timeline's back. A `Timeline` is therefore not `Clone`.

use super::any::AnyDictionary;
use super::arena::Arena;
use super::node::NodeId;
use super::track::TrackKind;
use crate::config::TRACKS_STACK_NAME;
use crate::error::Result;
use crate::time::RationalTime;

pub const TIMELINE_SCHEMA_NAME: &str = "Timeline";

#[derive(Debug, PartialEq)]
pub struct Timeline {
    pub name: String,
    pub metadata: AnyDictionary,
    pub global_start_time: Option<RationalTime>,
    /// Record fields the Timeline schema does not declare.
    pub dynamic_fields: AnyDictionary,
    tracks: NodeId,
}

impl Timeline {
    /// New timeline with an empty tracks stack added to `arena`.
    pub fn new(arena: &mut Arena, name: impl Into<String>) -> Self {
        let tracks = arena.add_timeline_tracks(TRACKS_STACK_NAME);
        Self::holding(name.into(), tracks)
    }

    /// Take an existing, unparented stack as the tracks.
    pub fn with_tracks(arena: &mut Arena, name: impl Into<String>, tracks: NodeId) -> Result<Self> {
        arena.claim_for_timeline(tracks)?;
        Ok(Self::holding(name.into(), tracks))
    }

    fn holding(name: String, tracks: NodeId) -> Self {
        Self {
            name,
            metadata: AnyDictionary::new(),
            global_start_time: None,
            dynamic_fields: AnyDictionary::new(),
            tracks,
        }
    }

    /// The owned tracks stack.
    pub fn tracks(&self) -> NodeId {
        self.tracks
    }

    /// Swap in another unparented stack. The old one is released and
    /// returned, still in the arena.
    pub fn set_tracks(&mut self, arena: &mut Arena, tracks: NodeId) -> Result<NodeId> {
        if tracks == self.tracks {
            return Ok(tracks);
        }
        arena.claim_for_timeline(tracks)?;
        arena.release_from_timeline(self.tracks)?;
        Ok(std::mem::replace(&mut self.tracks, tracks))
    }

    fn tracks_of_kind(&self, arena: &Arena, kind: &TrackKind) -> Result<Vec<NodeId>> {
        Ok(arena
            .children(self.tracks)?
            .iter()
            .copied()
            .filter(|id| arena.track(*id).is_some_and(|t| &t.kind == kind))
            .collect())
    }

    pub fn video_tracks(&self, arena: &Arena) -> Result<Vec<NodeId>> {
        self.tracks_of_kind(arena, &TrackKind::Video)
    }

    pub fn audio_tracks(&self, arena: &Arena) -> Result<Vec<NodeId>> {
        self.tracks_of_kind(arena, &TrackKind::Audio)
    }

    /// Every clip in the timeline, in pre-order.
    pub fn clips(&self, arena: &Arena) -> Result<Vec<NodeId>> {
        arena.clips(self.tracks)
    }

    /// Drop the tracks stack and everything below it.
    pub fn destroy(self, arena: &mut Arena) -> Result<()> {
        arena.release_from_timeline(self.tracks)?;
        arena.destroy(self.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::stack::Stack;
    use crate::entities::track::Track;
    use crate::error::ErrorCode;

    #[test]
    fn test_tracks_by_kind() {
        let mut arena = Arena::new();
        let tl = Timeline::new(&mut arena, "edit");
        let v1 = arena.add(Track::new("V1", TrackKind::Video));
        let a1 = arena.add(Track::new("A1", TrackKind::Audio));
        let v2 = arena.add(Track::new("V2", TrackKind::Video));
        for t in [v1, a1, v2] {
            arena.append_child(tl.tracks(), t).unwrap();
        }

        assert_eq!(tl.video_tracks(&arena).unwrap(), vec![v1, v2]);
        assert_eq!(tl.audio_tracks(&arena).unwrap(), vec![a1]);
        assert_eq!(arena.stack(tl.tracks()).unwrap().name, "tracks");

        tl.destroy(&mut arena).unwrap();
        assert!(arena.is_empty());
    }

    #[test]
    fn test_tracks_stack_has_one_owner() {
        let mut arena = Arena::new();
        let tl = Timeline::new(&mut arena, "edit");
        let v1 = arena.add(Track::new("V1", TrackKind::Video));
        arena.append_child(tl.tracks(), v1).unwrap();
        let loose = arena.add(Track::new("loose", TrackKind::Video));

        let err = arena.append_child(loose, tl.tracks()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyHasParent);
        assert_eq!(arena.parent(tl.tracks()).unwrap(), None);

        arena.destroy(loose).unwrap();
        assert_eq!(arena.destroy(tl.tracks()).unwrap_err().code(), ErrorCode::AlreadyHasParent);
        assert_eq!(tl.video_tracks(&arena).unwrap(), vec![v1]);
        assert!(tl.duration(&arena).is_ok());
    }

    #[test]
    fn test_with_and_set_tracks() {
        let mut arena = Arena::new();
        let first = arena.add(Stack::new("tracks"));
        let mut tl = Timeline::with_tracks(&mut arena, "edit", first).unwrap();
        assert!(arena.is_held_by_timeline(first).unwrap());

        // one stack cannot back two timelines
        let err = Timeline::with_tracks(&mut arena, "other", first).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyHasParent);
        let track = arena.add(Track::new("V1", TrackKind::Video));
        assert_eq!(Timeline::with_tracks(&mut arena, "bad", track).unwrap_err().code(), ErrorCode::WrongType);

        let second = arena.add(Stack::new("tracks"));
        assert_eq!(tl.set_tracks(&mut arena, second).unwrap(), first);
        assert_eq!(tl.tracks(), second);
        assert!(!arena.is_held_by_timeline(first).unwrap());
        arena.destroy(first).unwrap();

        tl.destroy(&mut arena).unwrap();
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(track));
    }
}
