//! Tree <-> `SerializableObject` <-> JSON.
//!
//! Writing walks a subtree and emits one record per node with its declared
//! fields in canonical order; children are nested records. Reading goes the
//! other way: each record is type-checked against its schema, dispatched on
//! the schema name and turned into arena nodes. A load that fails part way
//! destroys whatever it had already added.

use log::{debug, warn};

use super::json;
use super::schema::{self, Schema};
use crate::config::{DEFAULT_MEDIA_KEY, DEFAULT_TRANSITION_TYPE, ReadOptions, WriteOptions};
use crate::entities::any::{Any, AnyDictionary, AnyVector};
use crate::entities::arena::Arena;
use crate::entities::clip::Clip;
use crate::entities::effect::Effect;
use crate::entities::gap::Gap;
use crate::entities::item::Item;
use crate::entities::keys::*;
use crate::entities::marker::Marker;
use crate::entities::media_reference::MediaReference;
use crate::entities::node::{Composable, NodeId};
use crate::entities::node_kind::NodeKind;
use crate::entities::object::{SchemaId, Serializable, SerializableObject};
use crate::entities::stack::Stack;
use crate::entities::timeline::Timeline;
use crate::entities::track::{Track, TrackKind};
use crate::entities::transition::Transition;
use crate::entities::unknown::UnknownNode;
use crate::error::{Error, Result};
use crate::time::RationalTime;

/// Result of reading a document root.
#[derive(Debug, PartialEq)]
pub enum Loaded {
    /// A composable, now owned by the arena.
    Node(NodeId),
    /// A timeline whose tracks stack is now owned by the arena.
    Timeline(Timeline),
    /// Any other record: media references, markers, unknown schemas.
    Object(SerializableObject),
}

impl Loaded {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Loaded::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn into_timeline(self) -> Option<Timeline> {
        match self {
            Loaded::Timeline(t) => Some(t),
            _ => None,
        }
    }
}

// ============================================================================
// Writing
// ============================================================================

fn objects<T: Serializable>(items: &[T]) -> Any {
    Any::Vector(items.iter().map(|i| Any::from(i.to_object())).collect())
}

fn item_fields(name: &str, metadata: &AnyDictionary, item: &Item) -> AnyDictionary {
    let mut f = AnyDictionary::new();
    f.set(K_METADATA, metadata.clone());
    f.set(K_NAME, name);
    f.set(K_SOURCE_RANGE, item.source_range);
    f.set(K_EFFECTS, objects(&item.effects));
    f.set(K_MARKERS, objects(&item.markers));
    f.set(K_ENABLED, item.enabled);
    f
}

/// Declared keys win over a dynamic field of the same name.
fn append_dynamic(fields: &mut AnyDictionary, dynamic: &AnyDictionary) {
    for (k, v) in dynamic.iter() {
        if !fields.contains(k) {
            fields.set(k.as_str(), v.clone());
        }
    }
}

impl Arena {
    fn children_objects(&self, children: &[NodeId]) -> Result<Any> {
        let list = children.iter().map(|c| Ok(Any::from(self.to_object(*c)?))).collect::<Result<AnyVector>>()?;
        Ok(Any::Vector(list))
    }

    /// Detached record of `id` and its whole subtree. Dynamic fields follow
    /// the declared ones.
    pub fn to_object(&self, id: NodeId) -> Result<SerializableObject> {
        let kind = self.get(id)?;
        let schema = SchemaId::new(kind.schema_name(), kind.schema_version());
        let mut fields = match kind {
            NodeKind::Clip(c) => {
                let mut f = item_fields(&c.name, &c.metadata, &c.item);
                f.set(K_MEDIA_REFERENCE, c.media_reference.to_object());
                f
            }
            NodeKind::Gap(g) => item_fields(&g.name, &g.metadata, &g.item),
            NodeKind::Track(t) => {
                let mut f = item_fields(&t.name, &t.metadata, &t.item);
                f.set(K_CHILDREN, self.children_objects(t.children())?);
                f.set(K_KIND, t.kind.as_str());
                f
            }
            NodeKind::Stack(s) => {
                let mut f = item_fields(&s.name, &s.metadata, &s.item);
                f.set(K_CHILDREN, self.children_objects(s.children())?);
                f
            }
            NodeKind::Transition(t) => {
                let mut f = AnyDictionary::new();
                f.set(K_METADATA, t.metadata.clone());
                f.set(K_NAME, t.name.as_str());
                f.set(K_IN_OFFSET, t.in_offset);
                f.set(K_OUT_OFFSET, t.out_offset);
                f.set(K_TRANSITION_TYPE, t.transition_type.as_str());
                f
            }
            NodeKind::Unknown(u) => return Ok(u.object().clone()),
        };
        append_dynamic(&mut fields, self.dynamic_fields(id)?);
        Ok(SerializableObject::new(schema, fields))
    }

    pub fn timeline_to_object(&self, timeline: &Timeline) -> Result<SerializableObject> {
        let mut f = AnyDictionary::new();
        f.set(K_METADATA, timeline.metadata.clone());
        f.set(K_NAME, timeline.name.as_str());
        f.set(K_GLOBAL_START_TIME, timeline.global_start_time);
        f.set(K_TRACKS, self.to_object(timeline.tracks())?);
        append_dynamic(&mut f, &timeline.dynamic_fields);
        Ok(SerializableObject::new(SchemaId::new(schema::TIMELINE_SCHEMA.name, schema::TIMELINE_SCHEMA.version), f))
    }

    pub fn to_json_string(&self, id: NodeId, opts: &WriteOptions) -> Result<String> {
        json::write_value(&json::encode_object(&self.to_object(id)?), opts)
    }

    pub fn timeline_to_json_string(&self, timeline: &Timeline, opts: &WriteOptions) -> Result<String> {
        json::write_value(&json::encode_object(&self.timeline_to_object(timeline)?), opts)
    }

    /// Value equality of two subtrees (possibly in different arenas).
    pub fn is_equivalent_to(&self, id: NodeId, other: &Arena, other_id: NodeId) -> Result<bool> {
        Ok(self.to_object(id)? == other.to_object(other_id)?)
    }

    pub fn timelines_equivalent(&self, a: &Timeline, other: &Arena, b: &Timeline) -> Result<bool> {
        Ok(self.timeline_to_object(a)? == other.timeline_to_object(b)?)
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Type-check `obj` against its registered schema, warning on newer versions.
fn checked_schema(obj: &SerializableObject) -> Result<Option<&'static Schema>> {
    let Some(schema) = schema::lookup(obj.schema_name()) else {
        return Ok(None);
    };
    if obj.schema_version() > schema.version {
        warn!(
            "{} is newer than supported {}.{}, reading best effort",
            obj.schema(),
            schema.name,
            schema.version
        );
    }
    schema.check(obj.fields())?;
    Ok(Some(schema))
}

/// Keys a `Clip.2` record uses for its reference map. Read, then written
/// back in the `Clip.1` form.
const CLIP_REFERENCE_MAP_KEYS: &[&str] = &[K_MEDIA_REFERENCES, K_ACTIVE_MEDIA_REFERENCE_KEY];

/// Fields of a record that its schema does not declare.
fn dynamic_fields_of(schema: &Schema, f: &AnyDictionary) -> AnyDictionary {
    let consumed: &[&str] = if schema.name == schema::CLIP_SCHEMA.name { CLIP_REFERENCE_MAP_KEYS } else { &[] };
    f.iter()
        .filter(|(k, _)| schema.field(k).is_none() && !consumed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn object_list<T: Serializable>(fields: &AnyDictionary, key: &str) -> Result<Vec<T>> {
    let Some(list) = fields.get_vector(key)? else {
        return Ok(Vec::new());
    };
    list.iter()
        .map(|v| match v {
            Any::Object(o) => T::from_object((**o).clone()),
            other => Err(Error::SerializationTypeMismatch(format!(
                "{key}: expected object, found {}",
                other.type_name()
            ))),
        })
        .collect()
}

fn name_of(f: &AnyDictionary) -> Result<String> {
    Ok(f.get_str(K_NAME)?.unwrap_or_default().to_string())
}

fn metadata_of(f: &AnyDictionary) -> Result<AnyDictionary> {
    Ok(f.get_dictionary(K_METADATA)?.cloned().unwrap_or_default())
}

fn read_item(f: &AnyDictionary) -> Result<Item> {
    Ok(Item {
        source_range: f.get_time_range(K_SOURCE_RANGE)?,
        markers: object_list::<Marker>(f, K_MARKERS)?,
        effects: object_list::<Effect>(f, K_EFFECTS)?,
        enabled: f.get_bool_or(K_ENABLED, true)?,
    })
}

fn reference_from_any(value: Option<&Any>, key: &str) -> Result<MediaReference> {
    match value {
        None | Some(Any::None) => Ok(MediaReference::missing()),
        Some(Any::Object(o)) => MediaReference::from_object((**o).clone()),
        Some(other) => Err(Error::SerializationTypeMismatch(format!(
            "{key}: expected object, found {}",
            other.type_name()
        ))),
    }
}

/// Single reference, or the active one of a multi-reference clip.
fn read_media_reference(f: &AnyDictionary) -> Result<MediaReference> {
    if let Some(refs) = f.get_dictionary(K_MEDIA_REFERENCES)? {
        let key = f.get_str(K_ACTIVE_MEDIA_REFERENCE_KEY)?;
        debug!("clip with {} media references, using '{}'", refs.len(), key.unwrap_or(DEFAULT_MEDIA_KEY));
        return match key {
            Some(k) if !refs.contains(k) => Err(Error::MissingField(format!("{K_MEDIA_REFERENCES}.{k}"))),
            k => reference_from_any(refs.get(k.unwrap_or(DEFAULT_MEDIA_KEY)), K_MEDIA_REFERENCES),
        };
    }
    reference_from_any(f.get(K_MEDIA_REFERENCE), K_MEDIA_REFERENCE)
}

fn read_leaf(name: &str, f: &AnyDictionary) -> Result<NodeKind> {
    Ok(match name {
        "Clip" => NodeKind::Clip(Clip {
            name: name_of(f)?,
            metadata: metadata_of(f)?,
            item: read_item(f)?,
            media_reference: read_media_reference(f)?,
        }),
        "Gap" => NodeKind::Gap(Gap { name: name_of(f)?, metadata: metadata_of(f)?, item: read_item(f)? }),
        "Transition" => NodeKind::Transition(Transition {
            name: name_of(f)?,
            metadata: metadata_of(f)?,
            in_offset: f.get_rational_time_or(K_IN_OFFSET, RationalTime::default())?,
            out_offset: f.get_rational_time_or(K_OUT_OFFSET, RationalTime::default())?,
            transition_type: f.get_str(K_TRANSITION_TYPE)?.unwrap_or(DEFAULT_TRANSITION_TYPE).to_string(),
        }),
        other => return Err(Error::SerializationTypeMismatch(format!("{other} is not a composable"))),
    })
}

fn is_composable(name: &str) -> bool {
    matches!(schema::canonical_name(name), "Clip" | "Gap" | "Transition" | "Track" | "Stack")
}

impl Arena {
    /// Build nodes from a record. Unknown schemas become `UnknownNode`s.
    pub fn instantiate_node(&mut self, obj: SerializableObject, opts: &ReadOptions) -> Result<NodeId> {
        let Some(schema) = checked_schema(&obj)? else {
            if opts.strict_schemas {
                return Err(Error::UnresolvableSchema(obj.schema().to_string()));
            }
            debug!("unknown composable {}, keeping as passthrough", obj.schema());
            return Ok(self.add(UnknownNode::new(obj)));
        };

        let f = obj.fields();
        let kind = match schema.name {
            "Track" => {
                let mut track = Track::new(name_of(f)?, TrackKind::from(f.get_str(K_KIND)?.unwrap_or("Video")));
                track.metadata = metadata_of(f)?;
                track.item = read_item(f)?;
                NodeKind::Track(track)
            }
            "Stack" => {
                let mut stack = Stack::new(name_of(f)?);
                stack.metadata = metadata_of(f)?;
                stack.item = read_item(f)?;
                NodeKind::Stack(stack)
            }
            name => read_leaf(name, f)?,
        };
        let is_composition = kind.is_composition();
        let id = self.add(kind);
        *self.dynamic_fields_mut(id)? = dynamic_fields_of(schema, f);
        if !is_composition {
            return Ok(id);
        }

        if let Err(e) = self.attach_children(id, f, opts) {
            self.destroy(id)?;
            return Err(e);
        }
        Ok(id)
    }

    fn attach_children(&mut self, parent: NodeId, f: &AnyDictionary, opts: &ReadOptions) -> Result<()> {
        let Some(children) = f.get_vector(K_CHILDREN)? else {
            return Ok(());
        };
        for child in children {
            let Any::Object(o) = child else {
                return Err(Error::SerializationTypeMismatch(format!(
                    "{K_CHILDREN}: expected object, found {}",
                    child.type_name()
                )));
            };
            let c = self.instantiate_node((**o).clone(), opts)?;
            if let Err(e) = self.append_child(parent, c) {
                self.destroy(c)?;
                return Err(e);
            }
        }
        Ok(())
    }

    fn instantiate_timeline(&mut self, obj: &SerializableObject, opts: &ReadOptions) -> Result<Timeline> {
        let f = obj.fields();
        let name = name_of(f)?;
        let metadata = metadata_of(f)?;
        let global_start_time = f.get_rational_time(K_GLOBAL_START_TIME)?;
        let tracks = match f.get(K_TRACKS) {
            Some(Any::Object(o)) => self.instantiate_node((**o).clone(), opts)?,
            None | Some(Any::None) => self.add(Stack::new(crate::config::TRACKS_STACK_NAME)),
            Some(other) => {
                return Err(Error::SerializationTypeMismatch(format!(
                    "{K_TRACKS}: expected object, found {}",
                    other.type_name()
                )));
            }
        };
        if !self.get(tracks)?.is_stack() {
            let label = self.get(tracks)?.label();
            self.destroy(tracks)?;
            return Err(Error::SerializationTypeMismatch(format!("timeline tracks must be a Stack, found {label}")));
        }
        let mut timeline = match Timeline::with_tracks(self, name, tracks) {
            Ok(t) => t,
            Err(e) => {
                self.destroy(tracks)?;
                return Err(e);
            }
        };
        timeline.metadata = metadata;
        timeline.global_start_time = global_start_time;
        timeline.dynamic_fields = dynamic_fields_of(&schema::TIMELINE_SCHEMA, f);
        Ok(timeline)
    }

    /// Turn a document root into arena content.
    pub fn instantiate(&mut self, obj: SerializableObject, opts: &ReadOptions) -> Result<Loaded> {
        if schema::canonical_name(obj.schema_name()) == schema::TIMELINE_SCHEMA.name {
            checked_schema(&obj)?;
            return Ok(Loaded::Timeline(self.instantiate_timeline(&obj, opts)?));
        }
        if is_composable(obj.schema_name()) {
            return Ok(Loaded::Node(self.instantiate_node(obj, opts)?));
        }
        if checked_schema(&obj)?.is_none() && opts.strict_schemas {
            return Err(Error::UnresolvableSchema(obj.schema().to_string()));
        }
        Ok(Loaded::Object(obj))
    }

    /// Parse a JSON document and add its content to the arena.
    pub fn from_json_str(&mut self, text: &str, opts: &ReadOptions) -> Result<Loaded> {
        let value = json::read_value(text)?;
        match json::decode(&value, opts)? {
            Any::Object(obj) => self.instantiate(*obj, opts),
            other => Err(Error::SerializationTypeMismatch(format!(
                "document root must be a schema-tagged object, found {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::marker::Marker;
    use crate::error::ErrorCode;
    use crate::time::TimeRange;

    fn rt(v: f64) -> RationalTime {
        RationalTime::new(v, 24.0)
    }

    fn tr(start: f64, dur: f64) -> TimeRange {
        TimeRange::new(rt(start), rt(dur))
    }

    fn sample_timeline(a: &mut Arena) -> Timeline {
        let mut tl = Timeline::new(a, "edit");
        tl.global_start_time = Some(RationalTime::new(86400.0, 24.0));
        tl.metadata.set("project", "demo");

        let v1 = a.add(Track::new("V1", TrackKind::Video));
        let mut c1 = Clip::new("c1", MediaReference::external("a.mov", Some(tr(0.0, 100.0))), Some(tr(10.0, 10.0)));
        c1.item.markers.push(Marker::new("note", tr(1.0, 1.0)));
        c1.item.effects.push(Effect::linear_time_warp("speed", 2.0));
        let c1 = a.add(c1);
        let tx = a.add(Transition::new("x", rt(2.0), rt(2.0)));
        let c2 = a.add(Clip::new("c2", MediaReference::missing(), Some(tr(0.0, 10.0))));
        let gap = a.add(Gap::with_duration(rt(3.0)));
        for c in [c1, tx, c2, gap] {
            a.append_child(v1, c).unwrap();
        }
        let a1 = a.add(Track::new("A1", TrackKind::Audio));
        a.append_child(tl.tracks(), v1).unwrap();
        a.append_child(tl.tracks(), a1).unwrap();
        tl
    }

    #[test]
    fn test_timeline_round_trip() {
        let mut a = Arena::new();
        let tl = sample_timeline(&mut a);
        let text = a.timeline_to_json_string(&tl, &WriteOptions::default()).unwrap();

        let mut b = Arena::new();
        let loaded = b.from_json_str(&text, &ReadOptions::default()).unwrap();
        let tl2 = loaded.into_timeline().unwrap();
        assert!(a.timelines_equivalent(&tl, &b, &tl2).unwrap());
        assert_eq!(tl2.duration(&b).unwrap(), rt(19.0));
        assert_eq!(tl2.video_tracks(&b).unwrap().len(), 1);
        assert_eq!(tl2.audio_tracks(&b).unwrap().len(), 1);
        assert_eq!(b.len(), a.len());

        // second write is byte-identical
        let again = b.timeline_to_json_string(&tl2, &WriteOptions::default()).unwrap();
        assert_eq!(again, text);
    }

    #[test]
    fn test_canonical_field_order() {
        let mut a = Arena::new();
        let c = a.add(Clip::new("c", MediaReference::missing(), None));
        let obj = a.to_object(c).unwrap();
        let keys: Vec<&String> = obj.fields().keys().collect();
        assert_eq!(keys, ["metadata", "name", "source_range", "effects", "markers", "enabled", "media_reference"]);

        let text = a.to_json_string(c, &WriteOptions::compact()).unwrap();
        assert!(text.starts_with(r#"{"OTIO_SCHEMA":"Clip.1","metadata":{},"name":"c","source_range":null"#));
    }

    #[test]
    fn test_unknown_child_passthrough() {
        let text = r#"{
            "OTIO_SCHEMA": "Track.1",
            "name": "V1",
            "kind": "Video",
            "children": [
                {"OTIO_SCHEMA": "Gap.1", "name": "", "source_range": {
                    "OTIO_SCHEMA": "TimeRange.1",
                    "start_time": {"OTIO_SCHEMA": "RationalTime.1", "value": 0, "rate": 24},
                    "duration": {"OTIO_SCHEMA": "RationalTime.1", "value": 5, "rate": 24}}},
                {"OTIO_SCHEMA": "VendorSlate.2", "name": "slate", "color_bars": true}
            ]
        }"#;
        let mut a = Arena::new();
        let track = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        let children = a.children(track).unwrap().to_vec();
        assert_eq!(children.len(), 2);
        let unknown = a.get(children[1]).unwrap();
        assert_eq!(unknown.schema_name(), "VendorSlate");
        assert_eq!(unknown.name(), "slate");
        assert_eq!(a.duration(track).unwrap(), rt(5.0));

        let obj = a.to_object(children[1]).unwrap();
        assert_eq!(obj.fields().get_bool("color_bars").unwrap(), Some(true));
        assert_eq!(obj.schema_version(), 2);
    }

    #[test]
    fn test_strict_mode_rejects_unknown() {
        let text = r#"{"OTIO_SCHEMA": "Stack.1", "children": [{"OTIO_SCHEMA": "Widget.1"}]}"#;
        let mut a = Arena::new();
        let err = a.from_json_str(text, &ReadOptions::strict()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnresolvableSchema);
        assert!(a.is_empty());
    }

    #[test]
    fn test_failed_load_leaves_arena_empty() {
        let text = r#"{"OTIO_SCHEMA": "Track.1", "children": [
            {"OTIO_SCHEMA": "Gap.1", "name": "ok"},
            {"OTIO_SCHEMA": "Clip.1", "name": 42}
        ]}"#;
        let mut a = Arena::new();
        let err = a.from_json_str(text, &ReadOptions::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SerializationTypeMismatch);
        assert!(a.is_empty());
    }

    #[test]
    fn test_legacy_aliases() {
        let text = r#"{"OTIO_SCHEMA": "Sequence.1", "name": "old", "children": [{"OTIO_SCHEMA": "Filler.1"}]}"#;
        let mut a = Arena::new();
        let id = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        assert!(a.track(id).is_some());
        let child = a.children(id).unwrap()[0];
        assert!(a.gap(child).is_some());
        assert_eq!(a.to_object(id).unwrap().schema().to_string(), "Track.1");
    }

    #[test]
    fn test_newer_clip_with_reference_map() {
        let text = r#"{
            "OTIO_SCHEMA": "Clip.2",
            "name": "multi",
            "active_media_reference_key": "HIGH",
            "media_references": {
                "DEFAULT_MEDIA": {"OTIO_SCHEMA": "MissingReference.1"},
                "HIGH": {"OTIO_SCHEMA": "ExternalReference.1", "target_url": "hi.mov"}
            }
        }"#;
        let mut a = Arena::new();
        let id = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        let clip = a.clip(id).unwrap();
        assert_eq!(clip.media_reference.target_url(), Some("hi.mov"));
        assert!(clip.item.enabled);
    }

    /// Test: undeclared keys on known schemas survive a load
    /// Validates: they are written back after the declared fields
    #[test]
    fn test_dynamic_fields_round_trip() {
        let text = r#"{
            "OTIO_SCHEMA": "Timeline.1",
            "name": "edit",
            "studio_rev": 7,
            "tracks": {
                "OTIO_SCHEMA": "Stack.1",
                "children": [{
                    "OTIO_SCHEMA": "Track.1",
                    "children": [{"OTIO_SCHEMA": "Clip.1", "name": "c", "vendor": {"take": 3}}]
                }]
            }
        }"#;
        let mut a = Arena::new();
        let tl = a.from_json_str(text, &ReadOptions::default()).unwrap().into_timeline().unwrap();
        assert_eq!(tl.dynamic_fields.get_i64("studio_rev").unwrap(), Some(7));
        let clip = tl.clips(&a).unwrap()[0];
        let vendor = a.dynamic_fields(clip).unwrap().get_dictionary("vendor").unwrap().unwrap();
        assert_eq!(vendor.get_i64("take").unwrap(), Some(3));

        let obj = a.to_object(clip).unwrap();
        assert_eq!(obj.fields().keys().last().map(String::as_str), Some("vendor"));

        let out = a.timeline_to_json_string(&tl, &WriteOptions::compact()).unwrap();
        let mut b = Arena::new();
        let tl2 = b.from_json_str(&out, &ReadOptions::default()).unwrap().into_timeline().unwrap();
        assert!(a.timelines_equivalent(&tl, &b, &tl2).unwrap());
        assert_eq!(tl2.dynamic_fields.get_i64("studio_rev").unwrap(), Some(7));
    }

    #[test]
    fn test_reference_map_keys_not_kept_as_dynamic() {
        let text = r#"{
            "OTIO_SCHEMA": "Clip.2",
            "media_references": {"DEFAULT_MEDIA": {"OTIO_SCHEMA": "ExternalReference.1", "target_url": "a.mov"}}
        }"#;
        let mut a = Arena::new();
        let id = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        assert!(a.dynamic_fields(id).unwrap().is_empty());
        assert!(!a.to_object(id).unwrap().fields().contains(K_MEDIA_REFERENCES));
    }

    #[test]
    fn test_loaded_timeline_holds_its_stack() {
        let mut a = Arena::new();
        let tl = sample_timeline(&mut a);
        let text = a.timeline_to_json_string(&tl, &WriteOptions::compact()).unwrap();

        let mut b = Arena::new();
        let tl2 = b.from_json_str(&text, &ReadOptions::default()).unwrap().into_timeline().unwrap();
        assert!(b.is_held_by_timeline(tl2.tracks()).unwrap());
        assert_eq!(b.destroy(tl2.tracks()).unwrap_err().code(), ErrorCode::AlreadyHasParent);
        tl2.destroy(&mut b).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_timeline_tracks_must_be_stack() {
        let text = r#"{"OTIO_SCHEMA": "Timeline.1", "tracks": {"OTIO_SCHEMA": "Track.1"}}"#;
        let mut a = Arena::new();
        let err = a.from_json_str(text, &ReadOptions::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SerializationTypeMismatch);
        assert!(a.is_empty());
    }

    #[test]
    fn test_composition_fields_read() {
        let text = r#"{
            "OTIO_SCHEMA": "Track.1",
            "name": "A1",
            "kind": "Audio",
            "metadata": {"lang": "en"},
            "enabled": false,
            "source_range": {"OTIO_SCHEMA": "TimeRange.1",
                "start_time": {"OTIO_SCHEMA": "RationalTime.1", "value": 2, "rate": 24},
                "duration": {"OTIO_SCHEMA": "RationalTime.1", "value": 4, "rate": 24}},
            "children": [{"OTIO_SCHEMA": "Stack.1", "name": "nested", "metadata": {"n": 1}}]
        }"#;
        let mut a = Arena::new();
        let id = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        let track = a.track(id).unwrap();
        assert_eq!(track.name, "A1");
        assert_eq!(track.kind, TrackKind::Audio);
        assert_eq!(track.metadata.get_str("lang").unwrap(), Some("en"));
        assert!(!track.item.enabled);
        assert_eq!(track.item.source_range, Some(tr(2.0, 4.0)));

        let nested = a.stack(track.children()[0]).unwrap();
        assert_eq!(nested.name, "nested");
        assert_eq!(nested.metadata.get_i64("n").unwrap(), Some(1));
    }

    #[test]
    fn test_integer_time_scalar_loads() {
        let text = r#"{
            "OTIO_SCHEMA": "Gap.1",
            "effects": [{"OTIO_SCHEMA": "LinearTimeWarp.1", "effect_name": "speed", "time_scalar": 2}]
        }"#;
        let mut a = Arena::new();
        let id = a.from_json_str(text, &ReadOptions::default()).unwrap().as_node().unwrap();
        let fx = &a.gap(id).unwrap().item.effects[0];
        assert_eq!(fx.time_scalar(), Some(2.0));
    }

    #[test]
    fn test_active_reference_key_must_exist() {
        let text = r#"{
            "OTIO_SCHEMA": "Clip.2",
            "active_media_reference_key": "PROXY",
            "media_references": {"DEFAULT_MEDIA": {"OTIO_SCHEMA": "MissingReference.1"}}
        }"#;
        let mut a = Arena::new();
        let err = a.from_json_str(text, &ReadOptions::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert!(a.is_empty());
    }

    #[test]
    fn test_non_node_roots() {
        let mut a = Arena::new();
        let loaded = a
            .from_json_str(r#"{"OTIO_SCHEMA": "ExternalReference.1", "target_url": "x.mov"}"#, &ReadOptions::default())
            .unwrap();
        match loaded {
            Loaded::Object(obj) => {
                let r = MediaReference::from_object(obj).unwrap();
                assert_eq!(r.target_url(), Some("x.mov"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(a.from_json_str("[1, 2]", &ReadOptions::default()).is_err());
        assert!(a.from_json_str("{not json", &ReadOptions::default()).is_err());
    }

    #[test]
    fn test_equivalence_detects_changes() {
        let mut a = Arena::new();
        let tl = sample_timeline(&mut a);
        let copy = a.deep_copy(tl.tracks()).unwrap();
        assert!(a.is_equivalent_to(tl.tracks(), &a, copy).unwrap());

        let first_track = a.children(copy).unwrap()[0];
        let first_clip = a.children(first_track).unwrap()[0];
        a.get_mut(first_clip).unwrap().set_name("renamed".into());
        assert!(!a.is_equivalent_to(tl.tracks(), &a, copy).unwrap());
    }
}
