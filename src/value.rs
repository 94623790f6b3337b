use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::trace;

use crate::error::ConversionError;

/// One of the ten tags a [`Value`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Untyped,
    Integer,
    Float,
    Boolean,
    String,
    Date,
    Time,
    Datetime,
    List,
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Untyped => "untyped",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::Datetime => "datetime",
            Kind::List => "list",
            Kind::Record => "record",
        };
        write!(f, "{name}")
    }
}

/// A tagged sum over the ten value kinds. The payload is absent (`Raw::Null`)
/// exactly when the value `is_null`; every non-null value's payload matches
/// its `kind`.
#[derive(Debug, Clone)]
pub enum Value {
    Untyped,
    Integer(Kind, Option<i64>),
    Float(Kind, Option<f64>),
    Boolean(Kind, Option<bool>),
    String(Kind, Option<String>),
    Date(Kind, Option<NaiveDate>),
    Time(Kind, Option<NaiveTime>),
    Datetime(Kind, Option<NaiveDateTime>),
    List(Kind, Option<Vec<Value>>),
    Record(Kind, Option<BTreeMap<String, Value>>),
}

impl Value {
    pub fn null() -> Value {
        Value::Untyped
    }

    pub fn integer(v: i64) -> Value {
        Value::Integer(Kind::Integer, Some(v))
    }

    pub fn null_of(kind: Kind) -> Value {
        match kind {
            Kind::Untyped => Value::Untyped,
            Kind::Integer => Value::Integer(Kind::Integer, None),
            Kind::Float => Value::Float(Kind::Float, None),
            Kind::Boolean => Value::Boolean(Kind::Boolean, None),
            Kind::String => Value::String(Kind::String, None),
            Kind::Date => Value::Date(Kind::Date, None),
            Kind::Time => Value::Time(Kind::Time, None),
            Kind::Datetime => Value::Datetime(Kind::Datetime, None),
            Kind::List => Value::List(Kind::List, None),
            Kind::Record => Value::Record(Kind::Record, None),
        }
    }

    pub fn float(v: f64) -> Value {
        Value::Float(Kind::Float, Some(v))
    }

    pub fn boolean(v: bool) -> Value {
        Value::Boolean(Kind::Boolean, Some(v))
    }

    pub fn string(v: impl Into<String>) -> Value {
        Value::String(Kind::String, Some(v.into()))
    }

    pub fn date(v: NaiveDate) -> Value {
        Value::Date(Kind::Date, Some(v))
    }

    pub fn time(v: NaiveTime) -> Value {
        Value::Time(Kind::Time, Some(v))
    }

    pub fn datetime(v: NaiveDateTime) -> Value {
        Value::Datetime(Kind::Datetime, Some(v))
    }

    pub fn list(v: Vec<Value>) -> Value {
        Value::List(Kind::List, Some(v))
    }

    pub fn record(v: BTreeMap<String, Value>) -> Value {
        Value::Record(Kind::Record, Some(v))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Untyped => Kind::Untyped,
            Value::Integer(k, _)
            | Value::Float(k, _)
            | Value::Boolean(k, _)
            | Value::String(k, _)
            | Value::Date(k, _)
            | Value::Time(k, _)
            | Value::Datetime(k, _)
            | Value::List(k, _)
            | Value::Record(k, _) => *k,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Untyped => true,
            Value::Integer(_, v) => v.is_none(),
            Value::Float(_, v) => v.is_none(),
            Value::Boolean(_, v) => v.is_none(),
            Value::String(_, v) => v.is_none(),
            Value::Date(_, v) => v.is_none(),
            Value::Time(_, v) => v.is_none(),
            Value::Datetime(_, v) => v.is_none(),
            Value::List(_, v) => v.is_none(),
            Value::Record(_, v) => v.is_none(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(_, Some(s)) => s.is_empty(),
            Value::List(_, Some(l)) => l.is_empty(),
            Value::Record(_, Some(r)) => r.is_empty(),
            other => other.is_null(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(_, Some(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Datetime(_, v) => *v,
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(_, Some(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(_, Some(v)) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() && !matches!(self, Value::Untyped) {
            return write!(f, "");
        }
        match self {
            Value::Untyped => write!(f, ""),
            Value::Integer(_, Some(v)) => write!(f, "{v}"),
            Value::Float(_, Some(v)) => write!(f, "{v}"),
            Value::Boolean(_, Some(v)) => write!(f, "{}", if *v { "True" } else { "False" }),
            Value::String(_, Some(v)) => write!(f, "{v}"),
            Value::Date(_, Some(v)) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(_, Some(v)) => write!(f, "{}", format_time(v)),
            Value::Datetime(_, Some(v)) => {
                write!(f, "{}T{}", v.date().format("%Y-%m-%d"), format_time(&v.time()))
            }
            Value::List(_, Some(v)) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Record(_, Some(v)) => {
                let parts: Vec<String> =
                    v.iter().map(|(k, val)| format!("{k}: {val}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            _ => write!(f, ""),
        }
    }
}

fn format_time(t: &NaiveTime) -> String {
    if t.nanosecond() != 0 {
        t.format("%H:%M:%S%.3f").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    }
}

/// Value equality by kind and payload — used by `equal`/`notEqual` after the
/// right operand has already been cast to the left's kind.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Untyped, Value::Untyped) => true,
            (Value::Integer(_, a), Value::Integer(_, b)) => a == b,
            (Value::Float(_, a), Value::Float(_, b)) => a == b,
            (Value::Boolean(_, a), Value::Boolean(_, b)) => a == b,
            (Value::String(_, a), Value::String(_, b)) => a == b,
            (Value::Date(_, a), Value::Date(_, b)) => a == b,
            (Value::Time(_, a), Value::Time(_, b)) => a == b,
            (Value::Datetime(_, a), Value::Datetime(_, b)) => a == b,
            (Value::List(_, a), Value::List(_, b)) => a == b,
            (Value::Record(_, a), Value::Record(_, b)) => a == b,
            _ => false,
        }
    }
}

/// `cast(value, target_kind)`: identity and null propagate trivially;
/// otherwise follows the conversion table.
pub fn cast(value: &Value, target: Kind) -> Result<Value, ConversionError> {
    if value.kind() == target {
        return Ok(value.clone());
    }
    if value.is_null() {
        return Ok(Value::null_of(target));
    }

    let fail = || {
        trace!("conversion failed: {:?} -> {target}", value.kind());
        ConversionError::new(value.clone(), target)
    };

    match (value, target) {
        // integer ->
        (Value::Integer(_, Some(v)), Kind::Float) => Ok(Value::float(*v as f64)),
        (Value::Integer(_, Some(v)), Kind::Boolean) => Ok(Value::boolean(*v != 0)),
        (Value::Integer(_, Some(v)), Kind::String) => Ok(Value::string(v.to_string())),

        // float ->
        (Value::Float(_, Some(v)), Kind::Integer) => Ok(Value::integer(*v as i64)),
        (Value::Float(_, Some(v)), Kind::Boolean) => Ok(Value::boolean(*v != 0.0)),
        (Value::Float(_, Some(v)), Kind::String) => Ok(Value::string(v.to_string())),

        // boolean ->
        (Value::Boolean(_, Some(v)), Kind::Integer) => Ok(Value::integer(if *v { 1 } else { 0 })),
        (Value::Boolean(_, Some(v)), Kind::Float) => {
            Ok(Value::float(if *v { 1.0 } else { 0.0 }))
        }
        (Value::Boolean(_, Some(v)), Kind::String) => {
            Ok(Value::string(if *v { "True" } else { "False" }))
        }

        // string ->
        (Value::String(_, Some(s)), Kind::Integer) => {
            s.trim().parse::<i64>().map(Value::integer).map_err(|_| fail())
        }
        (Value::String(_, Some(s)), Kind::Float) => {
            s.trim().parse::<f64>().map(Value::float).map_err(|_| fail())
        }
        (Value::String(_, Some(s)), Kind::Boolean) => {
            Ok(Value::boolean(!(s.is_empty() || s == "False" || s == "false")))
        }
        (Value::String(_, Some(s)), Kind::Date) => parse_date(s).ok_or_else(fail),
        (Value::String(_, Some(s)), Kind::Time) => parse_time(s).ok_or_else(fail),
        (Value::String(_, Some(s)), Kind::Datetime) => parse_datetime(s).ok_or_else(fail),

        // date ->
        (Value::Date(_, Some(_)), Kind::Boolean) => Ok(Value::boolean(true)),
        (Value::Date(_, Some(v)), Kind::String) => Ok(Value::string(v.format("%Y-%m-%d").to_string())),
        (Value::Date(_, Some(v)), Kind::Datetime) => {
            Ok(Value::datetime(v.and_hms_opt(0, 0, 0).unwrap()))
        }

        // time ->
        (Value::Time(_, Some(_)), Kind::Boolean) => Ok(Value::boolean(true)),
        (Value::Time(_, Some(v)), Kind::String) => Ok(Value::string(format_time(v))),

        // datetime ->
        (Value::Datetime(_, Some(_)), Kind::Boolean) => Ok(Value::boolean(true)),
        (Value::Datetime(_, Some(v)), Kind::String) => Ok(Value::string(format!(
            "{}T{}",
            v.date().format("%Y-%m-%d"),
            format_time(&v.time())
        ))),
        (Value::Datetime(_, Some(v)), Kind::Date) => Ok(Value::date(v.date())),
        (Value::Datetime(_, Some(v)), Kind::Time) => Ok(Value::time(v.time())),

        // list/record ->
        (Value::List(_, Some(v)), Kind::Boolean) => Ok(Value::boolean(!v.is_empty())),
        (Value::Record(_, Some(v)), Kind::Boolean) => Ok(Value::boolean(!v.is_empty())),

        _ => Err(fail()),
    }
}

fn parse_date(s: &str) -> Option<Value> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(Value::date)
}

fn parse_time(s: &str) -> Option<Value> {
    let s = s.trim();
    for fmt in ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(Value::time(t));
        }
    }
    None
}

fn parse_datetime(s: &str) -> Option<Value> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Value::datetime(dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Value::datetime(d.and_hms_opt(0, 0, 0).unwrap()));
    }
    None
}

/// Bridges to and from `serde_json::Value` for hosts that exchange values as
/// JSON. Dates/times/datetimes round-trip as their ISO-ish display strings.
pub mod native {
    use super::*;
    use serde_json::Value as Json;

    pub fn json_to_bexl(json: &Json) -> Value {
        match json {
            Json::Null => Value::Untyped,
            Json::Bool(b) => Value::boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::integer(i)
                } else {
                    Value::float(n.as_f64().unwrap_or(0.0))
                }
            }
            Json::String(s) => Value::string(s.clone()),
            Json::Array(items) => Value::list(items.iter().map(json_to_bexl).collect()),
            Json::Object(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(k.clone(), json_to_bexl(v));
                }
                Value::record(out)
            }
        }
    }

    pub fn bexl_to_json(value: &Value) -> Json {
        if value.is_null() {
            return Json::Null;
        }
        match value {
            Value::Integer(_, Some(v)) => Json::Number((*v).into()),
            Value::Float(_, Some(v)) => {
                serde_json::Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null)
            }
            Value::Boolean(_, Some(v)) => Json::Bool(*v),
            Value::String(_, Some(v)) => Json::String(v.clone()),
            Value::Date(..) | Value::Time(..) | Value::Datetime(..) => {
                Json::String(value.to_string())
            }
            Value::List(_, Some(v)) => Json::Array(v.iter().map(bexl_to_json).collect()),
            Value::Record(_, Some(v)) => {
                let mut map = serde_json::Map::new();
                for (k, val) in v {
                    map.insert(k.clone(), bexl_to_json(val));
                }
                Json::Object(map)
            }
            _ => Json::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_cast_is_noop() {
        let v = Value::integer(5);
        assert_eq!(cast(&v, Kind::Integer).unwrap(), Value::integer(5));
    }

    #[test]
    fn null_cast_keeps_kind_null() {
        let v = Value::Untyped;
        let out = cast(&v, Kind::Integer).unwrap();
        assert_eq!(out.kind(), Kind::Integer);
        assert!(out.is_null());
    }

    #[test]
    fn string_to_integer_parses() {
        let v = Value::string("42");
        assert_eq!(cast(&v, Kind::Integer).unwrap(), Value::integer(42));
    }

    #[test]
    fn string_to_integer_rejects_garbage() {
        let v = Value::string("nope");
        assert!(cast(&v, Kind::Integer).is_err());
    }

    #[test]
    fn empty_string_is_empty_not_null() {
        let v = Value::string("");
        assert!(!v.is_null());
        assert!(v.is_empty());
    }
}
