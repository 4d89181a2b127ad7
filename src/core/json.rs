//! JSON document form of `Any` values.
//!
//! Schema-tagged maps carry `"OTIO_SCHEMA": "<name>.<version>"` as their
//! first key. Time values decode straight into their `Any` variants; every
//! other tagged map becomes an `Any::Object`. Key order is kept both ways.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::schema;
use crate::config::{ReadOptions, SCHEMA_KEY, WriteOptions};
use crate::entities::any::{Any, AnyDictionary};
use crate::entities::keys::{K_DURATION, K_OFFSET, K_RATE, K_SCALE, K_START_TIME, K_VALUE};
use crate::entities::object::{SchemaId, SerializableObject};
use crate::error::{Error, Result};
use crate::time::{RationalTime, TimeRange, TimeTransform};

fn number(v: f64) -> Value {
    match Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None => {
            log::warn!("non-finite number {v} written as null");
            Value::Null
        }
    }
}

fn tagged(name: &str, version: i64) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert(SCHEMA_KEY.to_string(), Value::String(format!("{name}.{version}")));
    m
}

fn encode_time(t: RationalTime) -> Value {
    let mut m = tagged("RationalTime", 1);
    m.insert(K_VALUE.to_string(), number(t.value()));
    m.insert(K_RATE.to_string(), number(t.rate()));
    Value::Object(m)
}

fn encode_range(r: TimeRange) -> Value {
    let mut m = tagged("TimeRange", 1);
    m.insert(K_START_TIME.to_string(), encode_time(r.start_time()));
    m.insert(K_DURATION.to_string(), encode_time(r.duration()));
    Value::Object(m)
}

fn encode_transform(t: TimeTransform) -> Value {
    let mut m = tagged("TimeTransform", 1);
    m.insert(K_OFFSET.to_string(), encode_time(t.offset()));
    m.insert(K_RATE.to_string(), number(t.rate().unwrap_or(-1.0)));
    m.insert(K_SCALE.to_string(), number(t.scale()));
    Value::Object(m)
}

fn encode_fields(fields: &AnyDictionary, mut m: Map<String, Value>) -> Map<String, Value> {
    for (k, v) in fields.iter() {
        m.insert(k.clone(), encode(v));
    }
    m
}

pub fn encode_object(obj: &SerializableObject) -> Value {
    let m = tagged(obj.schema_name(), obj.schema_version());
    Value::Object(encode_fields(obj.fields(), m))
}

/// `Any` -> JSON value.
pub fn encode(any: &Any) -> Value {
    match any {
        Any::None => Value::Null,
        Any::Bool(b) => Value::Bool(*b),
        Any::Int(i) => Value::Number((*i).into()),
        Any::Double(d) => number(*d),
        Any::String(s) => Value::String(s.clone()),
        Any::RationalTime(t) => encode_time(*t),
        Any::TimeRange(r) => encode_range(*r),
        Any::TimeTransform(t) => encode_transform(*t),
        Any::Vector(v) => Value::Array(v.iter().map(encode).collect()),
        Any::Dictionary(d) => Value::Object(encode_fields(d, Map::new())),
        Any::Object(o) => encode_object(o),
    }
}

fn mismatch(what: &str, field: &str) -> Error {
    Error::SerializationTypeMismatch(format!("{what}: bad '{field}'"))
}

fn required<'a>(m: &'a Map<String, Value>, what: &str, field: &str) -> Result<&'a Value> {
    m.get(field).ok_or_else(|| Error::MissingField(format!("{what}.{field}")))
}

fn read_number(m: &Map<String, Value>, what: &str, field: &str) -> Result<f64> {
    required(m, what, field)?.as_f64().ok_or_else(|| mismatch(what, field))
}

fn read_time(m: &Map<String, Value>, what: &str, field: &str, opts: &ReadOptions) -> Result<RationalTime> {
    let v = required(m, what, field)?;
    decode(v, opts)?.as_rational_time().map_err(|_| mismatch(what, field))
}

fn decode_time_value(id: &SchemaId, m: &Map<String, Value>, opts: &ReadOptions) -> Result<Option<Any>> {
    let what = id.name.as_str();
    let any = match what {
        "RationalTime" => {
            let value = read_number(m, what, K_VALUE)?;
            let rate = read_number(m, what, K_RATE)?;
            Any::RationalTime(RationalTime::try_new(value, rate)?)
        }
        "TimeRange" => Any::TimeRange(TimeRange::new(
            read_time(m, what, K_START_TIME, opts)?,
            read_time(m, what, K_DURATION, opts)?,
        )),
        "TimeTransform" => {
            let offset = read_time(m, what, K_OFFSET, opts)?;
            let scale = m.get(K_SCALE).and_then(Value::as_f64).unwrap_or(1.0);
            let rate = m.get(K_RATE).and_then(Value::as_f64);
            Any::TimeTransform(TimeTransform::new(offset, scale, rate))
        }
        _ => return Ok(None),
    };
    Ok(Some(any))
}

fn decode_map(m: &Map<String, Value>, opts: &ReadOptions) -> Result<Any> {
    let Some(tag) = m.get(SCHEMA_KEY) else {
        let mut d = AnyDictionary::new();
        for (k, v) in m {
            d.set(k.as_str(), decode(v, opts)?);
        }
        return Ok(Any::Dictionary(d));
    };
    let tag = tag.as_str().ok_or_else(|| mismatch("object", SCHEMA_KEY))?;
    let id = SchemaId::parse(tag)?;

    if let Some(time) = decode_time_value(&id, m, opts)? {
        return Ok(time);
    }

    if !schema::is_registered(&id.name) {
        if opts.strict_schemas {
            return Err(Error::UnresolvableSchema(id.to_string()));
        }
        log::debug!("unknown schema {id}, keeping as passthrough");
    }

    let mut fields = AnyDictionary::new();
    for (k, v) in m.iter().filter(|(k, _)| k.as_str() != SCHEMA_KEY) {
        fields.set(k.as_str(), decode(v, opts)?);
    }
    Ok(Any::Object(Box::new(SerializableObject::new(id, fields))))
}

/// JSON value -> `Any`.
pub fn decode(value: &Value, opts: &ReadOptions) -> Result<Any> {
    Ok(match value {
        Value::Null => Any::None,
        Value::Bool(b) => Any::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Any::Int(i),
            None => Any::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Any::String(s.clone()),
        Value::Array(items) => Any::Vector(items.iter().map(|v| decode(v, opts)).collect::<Result<_>>()?),
        Value::Object(m) => decode_map(m, opts)?,
    })
}

/// Render a JSON value with the configured indent.
pub fn write_value(value: &Value, opts: &WriteOptions) -> Result<String> {
    match opts.indent {
        None => Ok(serde_json::to_string(value)?),
        Some(n) => {
            let pad = " ".repeat(n);
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(|e| Error::Json(e.to_string()))
        }
    }
}

pub fn read_value(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_values_decode() {
        let v = json!({
            "OTIO_SCHEMA": "TimeRange.1",
            "start_time": {"OTIO_SCHEMA": "RationalTime.1", "value": 10, "rate": 24},
            "duration": {"OTIO_SCHEMA": "RationalTime.1", "value": 5.0, "rate": 24.0}
        });
        let any = decode(&v, &ReadOptions::default()).unwrap();
        let r = any.as_time_range().unwrap();
        assert_eq!(r.start_time(), RationalTime::new(10.0, 24.0));
        assert_eq!(r.duration(), RationalTime::new(5.0, 24.0));
    }

    #[test]
    fn test_bad_rate_rejected() {
        let v = json!({"OTIO_SCHEMA": "RationalTime.1", "value": 1, "rate": 0});
        let err = decode(&v, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRate(_)));
    }

    #[test]
    fn test_missing_versus_mistyped_time_fields() {
        let v = json!({"OTIO_SCHEMA": "RationalTime.1", "value": 1});
        let err = decode(&v, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));

        let v = json!({"OTIO_SCHEMA": "RationalTime.1", "value": "one", "rate": 24});
        let err = decode(&v, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SerializationTypeMismatch(_)));
    }

    #[test]
    fn test_ints_stay_ints() {
        let v = json!({"a": 1, "b": 1.5, "c": [true, null, "x"]});
        let any = decode(&v, &ReadOptions::default()).unwrap();
        let d = any.as_dictionary().unwrap();
        assert_eq!(d.get("a"), Some(&Any::Int(1)));
        assert_eq!(d.get("b"), Some(&Any::Double(1.5)));
        assert_eq!(d.get_vector("c").unwrap().unwrap()[1], Any::None);
        assert_eq!(encode(&any), v);
    }

    #[test]
    fn test_unknown_schema_passthrough_and_strict() {
        let v = json!({"OTIO_SCHEMA": "Widget.3", "name": "w", "knobs": {"gain": 2}});
        let any = decode(&v, &ReadOptions::default()).unwrap();
        let obj = any.as_object().unwrap();
        assert_eq!(obj.schema_name(), "Widget");
        assert_eq!(obj.schema_version(), 3);
        assert_eq!(encode(&any), v);

        let err = decode(&v, &ReadOptions::strict()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableSchema(_)));
    }

    #[test]
    fn test_encode_keys_in_order() {
        let mut d = AnyDictionary::new();
        d.set("z", 1);
        d.set("a", RationalTime::new(1.0, 24.0));
        let out = write_value(&encode(&Any::Dictionary(d)), &WriteOptions::compact()).unwrap();
        assert_eq!(out, r#"{"z":1,"a":{"OTIO_SCHEMA":"RationalTime.1","value":1.0,"rate":24.0}}"#);
    }

    #[test]
    fn test_non_finite_written_as_null() {
        assert_eq!(encode(&Any::Double(f64::INFINITY)), Value::Null);
    }

    #[test]
    fn test_pretty_indent() {
        let out = write_value(&json!({"a": 1}), &WriteOptions { indent: Some(2) }).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }
}
