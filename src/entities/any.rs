//! Dynamic value storage shared by every serializable type.
//!
//! `Any` is the closed set of values a metadata field (or a serialized field)
//! can hold. `AnyDictionary` is the ordered string-keyed map of them:
//! - insertion order is kept for deterministic output, `remove()` keeps the
//!   order of the remaining keys;
//! - typed getters never coerce: an `Int` is not a `Double`;
//! - `Clone` is deep, owned objects included, so a copy never shares an
//!   object with the original.

use indexmap::IndexMap;

use super::object::SerializableObject;
use crate::error::{Error, Result};
use crate::time::{RationalTime, TimeRange, TimeTransform};

pub type AnyVector = Vec<Any>;

/// Generic dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Any {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    RationalTime(RationalTime),
    TimeRange(TimeRange),
    TimeTransform(TimeTransform),
    Vector(AnyVector),
    Dictionary(AnyDictionary),
    Object(Box<SerializableObject>),
}

macro_rules! typed_accessor {
    ($name:ident, $variant:ident, $ty:ty, $label:literal) => {
        pub fn $name(&self) -> Result<$ty> {
            match self {
                Any::$variant(v) => Ok(*v),
                other => Err(other.wrong_type($label)),
            }
        }
    };
}

impl Any {
    /// Variant name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Any::None => "none",
            Any::Bool(_) => "bool",
            Any::Int(_) => "int",
            Any::Double(_) => "double",
            Any::String(_) => "string",
            Any::RationalTime(_) => "RationalTime",
            Any::TimeRange(_) => "TimeRange",
            Any::TimeTransform(_) => "TimeTransform",
            Any::Vector(_) => "vector",
            Any::Dictionary(_) => "dictionary",
            Any::Object(_) => "object",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Any::None)
    }

    fn wrong_type(&self, expected: &'static str) -> Error {
        Error::WrongType { key: String::new(), expected, found: self.type_name() }
    }

    typed_accessor!(as_bool, Bool, bool, "bool");
    typed_accessor!(as_i64, Int, i64, "int");
    typed_accessor!(as_f64, Double, f64, "double");
    typed_accessor!(as_rational_time, RationalTime, RationalTime, "RationalTime");
    typed_accessor!(as_time_range, TimeRange, TimeRange, "TimeRange");
    typed_accessor!(as_time_transform, TimeTransform, TimeTransform, "TimeTransform");

    /// Int or Double as `f64`, the one widening a `number` schema field allows.
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Any::Int(i) => Ok(*i as f64),
            Any::Double(d) => Ok(*d),
            other => Err(other.wrong_type("number")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Any::String(s) => Ok(s),
            other => Err(other.wrong_type("string")),
        }
    }

    pub fn as_vector(&self) -> Result<&AnyVector> {
        match self {
            Any::Vector(v) => Ok(v),
            other => Err(other.wrong_type("vector")),
        }
    }

    pub fn as_dictionary(&self) -> Result<&AnyDictionary> {
        match self {
            Any::Dictionary(d) => Ok(d),
            other => Err(other.wrong_type("dictionary")),
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Result<&mut AnyDictionary> {
        match self {
            Any::Dictionary(d) => Ok(d),
            other => Err(other.wrong_type("dictionary")),
        }
    }

    pub fn as_object(&self) -> Result<&SerializableObject> {
        match self {
            Any::Object(o) => Ok(o),
            other => Err(other.wrong_type("object")),
        }
    }
}

impl From<bool> for Any {
    fn from(v: bool) -> Self {
        Any::Bool(v)
    }
}

impl From<i64> for Any {
    fn from(v: i64) -> Self {
        Any::Int(v)
    }
}

impl From<i32> for Any {
    fn from(v: i32) -> Self {
        Any::Int(v as i64)
    }
}

impl From<f64> for Any {
    fn from(v: f64) -> Self {
        Any::Double(v)
    }
}

impl From<&str> for Any {
    fn from(v: &str) -> Self {
        Any::String(v.to_string())
    }
}

impl From<String> for Any {
    fn from(v: String) -> Self {
        Any::String(v)
    }
}

impl From<RationalTime> for Any {
    fn from(v: RationalTime) -> Self {
        Any::RationalTime(v)
    }
}

impl From<TimeRange> for Any {
    fn from(v: TimeRange) -> Self {
        Any::TimeRange(v)
    }
}

impl From<TimeTransform> for Any {
    fn from(v: TimeTransform) -> Self {
        Any::TimeTransform(v)
    }
}

impl From<AnyVector> for Any {
    fn from(v: AnyVector) -> Self {
        Any::Vector(v)
    }
}

impl From<AnyDictionary> for Any {
    fn from(v: AnyDictionary) -> Self {
        Any::Dictionary(v)
    }
}

impl From<SerializableObject> for Any {
    fn from(v: SerializableObject) -> Self {
        Any::Object(Box::new(v))
    }
}

impl<T: Into<Any>> From<Option<T>> for Any {
    fn from(v: Option<T>) -> Self {
        v.map_or(Any::None, Into::into)
    }
}

/// Ordered map: string key -> `Any`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyDictionary {
    map: IndexMap<String, Any>,
}

macro_rules! typed_getter {
    ($name:ident, $or:ident, $conv:ident, $ty:ty) => {
        /// `Ok(None)` when absent or null, `WrongType` when present with another variant.
        pub fn $name(&self, key: &str) -> Result<Option<$ty>> {
            self.present(key).map(|v| v.$conv().map_err(|e| with_key(e, key))).transpose()
        }

        pub fn $or(&self, key: &str, default: $ty) -> Result<$ty> {
            Ok(self.$name(key)?.unwrap_or(default))
        }
    };
}

fn with_key(e: Error, key: &str) -> Error {
    match e {
        Error::WrongType { expected, found, .. } => Error::WrongType { key: key.to_string(), expected, found },
        other => other,
    }
}

impl AnyDictionary {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Insert or replace. A replaced key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Any>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Any> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Any> {
        self.map.get_mut(key)
    }

    /// Remove by key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Any> {
        self.map.shift_remove(key)
    }

    /// Value under `key`, treating null as absent.
    fn present(&self, key: &str) -> Option<&Any> {
        self.map.get(key).filter(|v| !v.is_none())
    }

    typed_getter!(get_bool, get_bool_or, as_bool, bool);
    typed_getter!(get_i64, get_i64_or, as_i64, i64);
    typed_getter!(get_f64, get_f64_or, as_f64, f64);
    typed_getter!(get_number, get_number_or, as_number, f64);
    typed_getter!(get_rational_time, get_rational_time_or, as_rational_time, RationalTime);
    typed_getter!(get_time_range, get_time_range_or, as_time_range, TimeRange);

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        self.present(key).map(|v| v.as_str().map_err(|e| with_key(e, key))).transpose()
    }

    pub fn get_dictionary(&self, key: &str) -> Result<Option<&AnyDictionary>> {
        self.present(key).map(|v| v.as_dictionary().map_err(|e| with_key(e, key))).transpose()
    }

    pub fn get_vector(&self, key: &str) -> Result<Option<&AnyVector>> {
        self.present(key).map(|v| v.as_vector().map_err(|e| with_key(e, key))).transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Any)> {
        self.map.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Any)> {
        self.map.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<Any>> FromIterator<(K, V)> for AnyDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl IntoIterator for AnyDictionary {
    type Item = (String, Any);
    type IntoIter = indexmap::map::IntoIter<String, Any>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::object::SchemaId;
    use crate::error::ErrorCode;

    #[test]
    fn test_insertion_order_kept() {
        let mut d = AnyDictionary::new();
        d.set("zeta", 1);
        d.set("alpha", 2);
        d.set("mid", 3);
        let keys: Vec<&String> = d.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);

        // replace keeps position, remove keeps the rest in order
        d.set("zeta", 10);
        d.remove("alpha");
        let keys: Vec<&String> = d.keys().collect();
        assert_eq!(keys, ["zeta", "mid"]);
        assert_eq!(d.get_i64("zeta").unwrap(), Some(10));
    }

    #[test]
    fn test_typed_getters_no_coercion() {
        let mut d = AnyDictionary::new();
        d.set("count", 3);
        d.set("ratio", 0.5);
        d.set("label", "shot_010");

        assert_eq!(d.get_i64("count").unwrap(), Some(3));
        assert_eq!(d.get_f64("ratio").unwrap(), Some(0.5));
        assert_eq!(d.get_str("label").unwrap(), Some("shot_010"));
        assert_eq!(d.get_i64("missing").unwrap(), None);
        assert_eq!(d.get_bool_or("missing", true).unwrap(), true);
        d.set("nothing", Any::None);
        assert_eq!(d.get_time_range("nothing").unwrap(), None);

        let err = d.get_f64("count").unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongType);
        match err {
            Error::WrongType { key, expected, found } => {
                assert_eq!(key, "count");
                assert_eq!(expected, "double");
                assert_eq!(found, "int");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(d.get_str("ratio").is_err());
    }

    #[test]
    fn test_number_getter_accepts_int_and_double() {
        let mut d = AnyDictionary::new();
        d.set("int", 2);
        d.set("double", 0.5);
        d.set("text", "2");
        assert_eq!(d.get_number("int").unwrap(), Some(2.0));
        assert_eq!(d.get_number("double").unwrap(), Some(0.5));
        assert_eq!(d.get_number_or("missing", 1.0).unwrap(), 1.0);
        assert_eq!(d.get_number("text").unwrap_err().code(), ErrorCode::WrongType);
    }

    #[test]
    fn test_nested_containers() {
        let mut inner = AnyDictionary::new();
        inner.set("frame_in", RationalTime::new(86400.0, 24.0));
        let mut outer = AnyDictionary::new();
        outer.set("vendor", inner);
        outer.set("tags", vec![Any::from("a"), Any::from(2), Any::None]);

        let vendor = outer.get_dictionary("vendor").unwrap().unwrap();
        assert_eq!(
            vendor.get_rational_time("frame_in").unwrap(),
            Some(RationalTime::new(3600.0, 1.0))
        );
        assert_eq!(outer.get_vector("tags").unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut fields = AnyDictionary::new();
        fields.set("name", "sidecar");
        let obj = SerializableObject::new(SchemaId::new("Sidecar", 1), fields);

        let mut d = AnyDictionary::new();
        d.set("attached", obj);
        let mut copy = d.clone();
        assert_eq!(copy, d);

        if let Some(Any::Object(o)) = copy.get_mut("attached") {
            o.fields_mut().set("name", "changed");
        }
        assert_ne!(copy, d);
        let original = d.get("attached").unwrap().as_object().unwrap();
        assert_eq!(original.fields().get_str("name").unwrap(), Some("sidecar"));
    }

    #[test]
    fn test_option_into_any() {
        let none: Option<TimeRange> = None;
        assert!(Any::from(none).is_none());
        assert_eq!(Any::from(Some(true)), Any::Bool(true));
    }
}
