//! Field key constants for serialized objects.
//!
//! Avoid string typos, enable IDE autocomplete.
//! Usage: `fields.get_str(K_NAME)`

// === Identity ===
/// Schema tag: `"<name>.<version>"`
pub const K_SCHEMA: &str = "OTIO_SCHEMA";
/// Human-readable name
pub const K_NAME: &str = "name";
/// Free-form user data (AnyDictionary)
pub const K_METADATA: &str = "metadata";

// === Time values ===
pub const K_VALUE: &str = "value";
pub const K_RATE: &str = "rate";
pub const K_START_TIME: &str = "start_time";
pub const K_DURATION: &str = "duration";
pub const K_OFFSET: &str = "offset";
pub const K_SCALE: &str = "scale";

// === Item ===
/// Trimmed portion of the available range (TimeRange or null)
pub const K_SOURCE_RANGE: &str = "source_range";
pub const K_EFFECTS: &str = "effects";
pub const K_MARKERS: &str = "markers";
pub const K_ENABLED: &str = "enabled";

// === Clip ===
pub const K_MEDIA_REFERENCE: &str = "media_reference";
/// Newer clips: map of named references
pub const K_MEDIA_REFERENCES: &str = "media_references";
/// Newer clips: key into `media_references`
pub const K_ACTIVE_MEDIA_REFERENCE_KEY: &str = "active_media_reference_key";

// === Composition ===
pub const K_CHILDREN: &str = "children";
/// Track kind (Video, Audio, ...)
pub const K_KIND: &str = "kind";

// === Transition ===
pub const K_IN_OFFSET: &str = "in_offset";
pub const K_OUT_OFFSET: &str = "out_offset";
pub const K_TRANSITION_TYPE: &str = "transition_type";

// === Timeline ===
pub const K_GLOBAL_START_TIME: &str = "global_start_time";
pub const K_TRACKS: &str = "tracks";

// === Media references ===
pub const K_AVAILABLE_RANGE: &str = "available_range";
pub const K_TARGET_URL: &str = "target_url";
pub const K_GENERATOR_KIND: &str = "generator_kind";
pub const K_PARAMETERS: &str = "parameters";

// === Markers / effects ===
pub const K_MARKED_RANGE: &str = "marked_range";
pub const K_COLOR: &str = "color";
pub const K_COMMENT: &str = "comment";
pub const K_EFFECT_NAME: &str = "effect_name";
/// Speed multiplier for time effects
pub const K_TIME_SCALAR: &str = "time_scalar";
