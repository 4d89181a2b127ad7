//! Static schemas for every serializable type.
//!
//! Each schema lists its fields in canonical write order together with the
//! value kind each field must hold. Used by the loader to type-check input
//! before the concrete type reads it, and by strict reading to tell known
//! schema names from unknown ones.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::entities::any::{Any, AnyDictionary};
use crate::entities::keys::*;
use crate::error::{Error, Result};

/// Value kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    /// Int or Double
    Number,
    String,
    RationalTime,
    TimeRange,
    TimeTransform,
    Dictionary,
    Vector,
    Object,
    Any,
}

impl FieldKind {
    pub fn matches(&self, value: &Any) -> bool {
        match (self, value) {
            (FieldKind::Any, _) => true,
            (FieldKind::Bool, Any::Bool(_)) => true,
            (FieldKind::Int, Any::Int(_)) => true,
            (FieldKind::Number, Any::Int(_) | Any::Double(_)) => true,
            (FieldKind::String, Any::String(_)) => true,
            (FieldKind::RationalTime, Any::RationalTime(_)) => true,
            (FieldKind::TimeRange, Any::TimeRange(_)) => true,
            (FieldKind::TimeTransform, Any::TimeTransform(_)) => true,
            (FieldKind::Dictionary, Any::Dictionary(_)) => true,
            (FieldKind::Vector, Any::Vector(_)) => true,
            (FieldKind::Object, Any::Object(_)) => true,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::RationalTime => "RationalTime",
            FieldKind::TimeRange => "TimeRange",
            FieldKind::TimeTransform => "TimeTransform",
            FieldKind::Dictionary => "dictionary",
            FieldKind::Vector => "vector",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub kind: FieldKind,
    /// Accepts null.
    pub nullable: bool,
}

impl FieldDef {
    pub const fn new(key: &'static str, kind: FieldKind) -> Self {
        Self { key, kind, nullable: false }
    }

    pub const fn nullable(key: &'static str, kind: FieldKind) -> Self {
        Self { key, kind, nullable: true }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub version: i64,
    pub fields: &'static [FieldDef],
}

impl Schema {
    pub const fn new(name: &'static str, version: i64, fields: &'static [FieldDef]) -> Self {
        Self { name, version, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Type-check the declared fields present in `fields`. Absent fields and
    /// undeclared extras are accepted.
    pub fn check(&self, fields: &AnyDictionary) -> Result<()> {
        for def in self.fields {
            let Some(value) = fields.get(def.key) else { continue };
            if value.is_none() && def.nullable {
                continue;
            }
            if !def.kind.matches(value) {
                return Err(Error::SerializationTypeMismatch(format!(
                    "{}.{}: expected {}, found {}",
                    self.name,
                    def.key,
                    def.kind.label(),
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}

use FieldKind as F;

// ============================================================================
// Time values
// ============================================================================

const RATIONAL_TIME_DEFS: &[FieldDef] = &[FieldDef::new(K_VALUE, F::Number), FieldDef::new(K_RATE, F::Number)];

pub static RATIONAL_TIME_SCHEMA: Schema = Schema::new("RationalTime", 1, RATIONAL_TIME_DEFS);

const TIME_RANGE_DEFS: &[FieldDef] = &[
    FieldDef::new(K_START_TIME, F::RationalTime),
    FieldDef::new(K_DURATION, F::RationalTime),
];

pub static TIME_RANGE_SCHEMA: Schema = Schema::new("TimeRange", 1, TIME_RANGE_DEFS);

const TIME_TRANSFORM_DEFS: &[FieldDef] = &[
    FieldDef::new(K_OFFSET, F::RationalTime),
    FieldDef::new(K_RATE, F::Number),
    FieldDef::new(K_SCALE, F::Number),
];

pub static TIME_TRANSFORM_SCHEMA: Schema = Schema::new("TimeTransform", 1, TIME_TRANSFORM_DEFS);

// ============================================================================
// Composables
// ============================================================================

const CLIP_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_SOURCE_RANGE, F::TimeRange),
    FieldDef::new(K_EFFECTS, F::Vector),
    FieldDef::new(K_MARKERS, F::Vector),
    FieldDef::new(K_ENABLED, F::Bool),
    FieldDef::nullable(K_MEDIA_REFERENCE, F::Object),
];

pub static CLIP_SCHEMA: Schema = Schema::new("Clip", 1, CLIP_DEFS);

const GAP_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_SOURCE_RANGE, F::TimeRange),
    FieldDef::new(K_EFFECTS, F::Vector),
    FieldDef::new(K_MARKERS, F::Vector),
    FieldDef::new(K_ENABLED, F::Bool),
];

pub static GAP_SCHEMA: Schema = Schema::new("Gap", 1, GAP_DEFS);

const TRACK_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_SOURCE_RANGE, F::TimeRange),
    FieldDef::new(K_EFFECTS, F::Vector),
    FieldDef::new(K_MARKERS, F::Vector),
    FieldDef::new(K_ENABLED, F::Bool),
    FieldDef::new(K_CHILDREN, F::Vector),
    FieldDef::new(K_KIND, F::String),
];

pub static TRACK_SCHEMA: Schema = Schema::new("Track", 1, TRACK_DEFS);

const STACK_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_SOURCE_RANGE, F::TimeRange),
    FieldDef::new(K_EFFECTS, F::Vector),
    FieldDef::new(K_MARKERS, F::Vector),
    FieldDef::new(K_ENABLED, F::Bool),
    FieldDef::new(K_CHILDREN, F::Vector),
];

pub static STACK_SCHEMA: Schema = Schema::new("Stack", 1, STACK_DEFS);

const TRANSITION_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::new(K_IN_OFFSET, F::RationalTime),
    FieldDef::new(K_OUT_OFFSET, F::RationalTime),
    FieldDef::new(K_TRANSITION_TYPE, F::String),
];

pub static TRANSITION_SCHEMA: Schema = Schema::new("Transition", 1, TRANSITION_DEFS);

const TIMELINE_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_GLOBAL_START_TIME, F::RationalTime),
    FieldDef::new(K_TRACKS, F::Object),
];

pub static TIMELINE_SCHEMA: Schema = Schema::new("Timeline", 1, TIMELINE_DEFS);

// ============================================================================
// Media references
// ============================================================================

const EXTERNAL_REFERENCE_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_AVAILABLE_RANGE, F::TimeRange),
    FieldDef::new(K_TARGET_URL, F::String),
];

pub static EXTERNAL_REFERENCE_SCHEMA: Schema = Schema::new("ExternalReference", 1, EXTERNAL_REFERENCE_DEFS);

const MISSING_REFERENCE_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_AVAILABLE_RANGE, F::TimeRange),
];

pub static MISSING_REFERENCE_SCHEMA: Schema = Schema::new("MissingReference", 1, MISSING_REFERENCE_DEFS);

const GENERATOR_REFERENCE_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::nullable(K_AVAILABLE_RANGE, F::TimeRange),
    FieldDef::new(K_GENERATOR_KIND, F::String),
    FieldDef::new(K_PARAMETERS, F::Dictionary),
];

pub static GENERATOR_REFERENCE_SCHEMA: Schema = Schema::new("GeneratorReference", 1, GENERATOR_REFERENCE_DEFS);

// ============================================================================
// Markers and effects
// ============================================================================

const MARKER_DEFS: &[FieldDef] = &[
    FieldDef::new(K_NAME, F::String),
    FieldDef::new(K_MARKED_RANGE, F::TimeRange),
    FieldDef::new(K_COLOR, F::String),
    FieldDef::new(K_COMMENT, F::String),
    FieldDef::new(K_METADATA, F::Dictionary),
];

pub static MARKER_SCHEMA: Schema = Schema::new("Marker", 2, MARKER_DEFS);

const EFFECT_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::new(K_EFFECT_NAME, F::String),
];

pub static EFFECT_SCHEMA: Schema = Schema::new("Effect", 1, EFFECT_DEFS);

const TIME_WARP_DEFS: &[FieldDef] = &[
    FieldDef::new(K_METADATA, F::Dictionary),
    FieldDef::new(K_NAME, F::String),
    FieldDef::new(K_EFFECT_NAME, F::String),
    FieldDef::new(K_TIME_SCALAR, F::Number),
];

pub static LINEAR_TIME_WARP_SCHEMA: Schema = Schema::new("LinearTimeWarp", 1, TIME_WARP_DEFS);
pub static FREEZE_FRAME_SCHEMA: Schema = Schema::new("FreezeFrame", 1, TIME_WARP_DEFS);

// ============================================================================
// Registry
// ============================================================================

/// Legacy names still found in older documents.
const ALIASES: &[(&str, &str)] = &[("Sequence", "Track"), ("Filler", "Gap")];

static REGISTRY: Lazy<IndexMap<&'static str, &'static Schema>> = Lazy::new(|| {
    [
        &RATIONAL_TIME_SCHEMA,
        &TIME_RANGE_SCHEMA,
        &TIME_TRANSFORM_SCHEMA,
        &CLIP_SCHEMA,
        &GAP_SCHEMA,
        &TRACK_SCHEMA,
        &STACK_SCHEMA,
        &TRANSITION_SCHEMA,
        &TIMELINE_SCHEMA,
        &EXTERNAL_REFERENCE_SCHEMA,
        &MISSING_REFERENCE_SCHEMA,
        &GENERATOR_REFERENCE_SCHEMA,
        &MARKER_SCHEMA,
        &EFFECT_SCHEMA,
        &LINEAR_TIME_WARP_SCHEMA,
        &FREEZE_FRAME_SCHEMA,
    ]
    .into_iter()
    .map(|s| (s.name, s))
    .collect()
});

/// Resolve legacy aliases to the current name.
pub fn canonical_name(name: &str) -> &str {
    ALIASES.iter().find(|(alias, _)| *alias == name).map_or(name, |(_, target)| *target)
}

pub fn lookup(name: &str) -> Option<&'static Schema> {
    REGISTRY.get(canonical_name(name)).copied()
}

pub fn is_registered(name: &str) -> bool {
    lookup(name).is_some()
}

/// All registered schemas, in registration order.
pub fn schemas() -> impl Iterator<Item = &'static Schema> {
    REGISTRY.values().copied()
}
