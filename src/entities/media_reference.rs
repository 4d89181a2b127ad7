//! Media references: what a clip points at.

use super::any::{Any, AnyDictionary};
use super::keys::{K_AVAILABLE_RANGE, K_GENERATOR_KIND, K_METADATA, K_NAME, K_PARAMETERS, K_TARGET_URL};
use super::object::{SchemaId, Serializable, SerializableObject};
use crate::error::Result;
use crate::time::TimeRange;

pub const EXTERNAL_REFERENCE_SCHEMA_NAME: &str = "ExternalReference";
pub const MISSING_REFERENCE_SCHEMA_NAME: &str = "MissingReference";
pub const GENERATOR_REFERENCE_SCHEMA_NAME: &str = "GeneratorReference";

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceKind {
    /// File or URL on disk / network.
    External { target_url: String },
    /// Placeholder when the media is unknown or offline.
    Missing,
    /// Synthesized media (bars, solid color...).
    Generator { generator_kind: String, parameters: AnyDictionary },
    /// Unrecognized schema, written back as read.
    Unknown(SerializableObject),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaReference {
    pub name: String,
    pub metadata: AnyDictionary,
    pub available_range: Option<TimeRange>,
    pub kind: ReferenceKind,
}

impl Default for MediaReference {
    fn default() -> Self {
        Self::missing()
    }
}

impl MediaReference {
    pub fn missing() -> Self {
        Self {
            name: String::new(),
            metadata: AnyDictionary::new(),
            available_range: None,
            kind: ReferenceKind::Missing,
        }
    }

    pub fn external(target_url: impl Into<String>, available_range: Option<TimeRange>) -> Self {
        Self {
            available_range,
            kind: ReferenceKind::External { target_url: target_url.into() },
            ..Self::missing()
        }
    }

    pub fn generator(generator_kind: impl Into<String>, available_range: Option<TimeRange>) -> Self {
        Self {
            available_range,
            kind: ReferenceKind::Generator {
                generator_kind: generator_kind.into(),
                parameters: AnyDictionary::new(),
            },
            ..Self::missing()
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, ReferenceKind::Missing)
    }

    pub fn target_url(&self) -> Option<&str> {
        match &self.kind {
            ReferenceKind::External { target_url } => Some(target_url),
            _ => None,
        }
    }
}

impl Serializable for MediaReference {
    fn schema_id(&self) -> SchemaId {
        match &self.kind {
            ReferenceKind::External { .. } => SchemaId::new(EXTERNAL_REFERENCE_SCHEMA_NAME, 1),
            ReferenceKind::Missing => SchemaId::new(MISSING_REFERENCE_SCHEMA_NAME, 1),
            ReferenceKind::Generator { .. } => SchemaId::new(GENERATOR_REFERENCE_SCHEMA_NAME, 1),
            ReferenceKind::Unknown(obj) => obj.schema().clone(),
        }
    }

    fn to_object(&self) -> SerializableObject {
        // Passthrough: common fields are written back in place, the rest untouched.
        if let ReferenceKind::Unknown(obj) = &self.kind {
            let mut obj = obj.clone();
            let f = obj.fields_mut();
            if f.contains(K_METADATA) || !self.metadata.is_empty() {
                f.set(K_METADATA, self.metadata.clone());
            }
            if f.contains(K_NAME) || !self.name.is_empty() {
                f.set(K_NAME, self.name.as_str());
            }
            if f.contains(K_AVAILABLE_RANGE) || self.available_range.is_some() {
                f.set(K_AVAILABLE_RANGE, self.available_range);
            }
            return obj;
        }

        let mut f = AnyDictionary::new();
        f.set(K_METADATA, self.metadata.clone());
        f.set(K_NAME, self.name.as_str());
        f.set(K_AVAILABLE_RANGE, self.available_range);
        match &self.kind {
            ReferenceKind::External { target_url } => f.set(K_TARGET_URL, target_url.as_str()),
            ReferenceKind::Generator { generator_kind, parameters } => {
                f.set(K_GENERATOR_KIND, generator_kind.as_str());
                f.set(K_PARAMETERS, parameters.clone());
            }
            _ => {}
        }
        SerializableObject::new(self.schema_id(), f)
    }

    fn from_object(obj: SerializableObject) -> Result<Self> {
        let f = obj.fields();
        let name = f.get_str(K_NAME)?.unwrap_or_default().to_string();
        let metadata = f.get_dictionary(K_METADATA)?.cloned().unwrap_or_default();
        let available_range = f.get_time_range(K_AVAILABLE_RANGE)?;
        let kind = match obj.schema_name() {
            EXTERNAL_REFERENCE_SCHEMA_NAME => ReferenceKind::External {
                target_url: f.get_str(K_TARGET_URL)?.unwrap_or_default().to_string(),
            },
            MISSING_REFERENCE_SCHEMA_NAME => ReferenceKind::Missing,
            GENERATOR_REFERENCE_SCHEMA_NAME => ReferenceKind::Generator {
                generator_kind: f.get_str(K_GENERATOR_KIND)?.unwrap_or_default().to_string(),
                parameters: f.get_dictionary(K_PARAMETERS)?.cloned().unwrap_or_default(),
            },
            _ => {
                log::debug!("keeping media reference of unknown schema {} as passthrough", obj.schema());
                ReferenceKind::Unknown(obj.clone())
            }
        };
        Ok(Self { name, metadata, available_range, kind })
    }
}

impl From<MediaReference> for Any {
    fn from(r: MediaReference) -> Self {
        Any::from(r.to_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::RationalTime;

    fn range(start: f64, dur: f64) -> TimeRange {
        TimeRange::new(RationalTime::new(start, 24.0), RationalTime::new(dur, 24.0))
    }

    #[test]
    fn test_external_reference_fields() {
        let r = MediaReference::external("file:///shots/a.mov", Some(range(0.0, 48.0)));
        let obj = r.to_object();
        assert_eq!(obj.schema().to_string(), "ExternalReference.1");
        let keys: Vec<&String> = obj.fields().keys().collect();
        assert_eq!(keys, ["metadata", "name", "available_range", "target_url"]);
        assert_eq!(MediaReference::from_object(obj).unwrap(), r);
    }

    #[test]
    fn test_default_is_missing() {
        let r = MediaReference::default();
        assert!(r.is_missing());
        assert_eq!(r.available_range, None);
        let obj = r.to_object();
        assert_eq!(obj.fields().get(K_AVAILABLE_RANGE), Some(&Any::None));
    }

    #[test]
    fn test_unknown_reference_keeps_fields() {
        let mut f = AnyDictionary::new();
        f.set(K_NAME, "plate");
        f.set("stream_id", 7);
        f.set(K_AVAILABLE_RANGE, range(0.0, 10.0));
        let obj = SerializableObject::new(SchemaId::new("ImageSequenceReference", 1), f);

        let r = MediaReference::from_object(obj.clone()).unwrap();
        assert_eq!(r.available_range, Some(range(0.0, 10.0)));
        assert_eq!(r.name, "plate");
        assert_eq!(r.to_object(), obj);
    }
}
