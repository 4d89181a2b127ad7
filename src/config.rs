//! Configuration constants and read/write options.

/// Key holding `"<name>.<version>"` in every serialized object.
pub const SCHEMA_KEY: &str = "OTIO_SCHEMA";

/// Indent used when writing pretty JSON.
pub const DEFAULT_INDENT: usize = 4;

/// Name of the stack a new timeline owns.
pub const TRACKS_STACK_NAME: &str = "tracks";

pub const DEFAULT_TRANSITION_TYPE: &str = "SMPTE_Dissolve";

/// Reference picked from a multi-reference clip when no active key is given.
pub const DEFAULT_MEDIA_KEY: &str = "DEFAULT_MEDIA";

/// JSON output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per level; `None` writes compact single-line JSON.
    pub indent: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: Some(DEFAULT_INDENT) }
    }
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self { indent: None }
    }
}

/// JSON input settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Fail with `UnresolvableSchema` on unknown schema names instead of
    /// keeping them as passthrough objects.
    pub strict_schemas: bool,
}

impl ReadOptions {
    pub fn strict() -> Self {
        Self { strict_schemas: true }
    }
}
