use crate::dispatch::Registry;
use crate::error::{BexlError, ExecutionError};
use crate::value::{cast, Kind, Value};

pub fn register(registry: &mut Registry) {
    for k in [
        Kind::Untyped,
        Kind::Integer,
        Kind::Float,
        Kind::Boolean,
        Kind::String,
        Kind::Date,
        Kind::Time,
        Kind::Datetime,
        Kind::List,
        Kind::Record,
    ] {
        registry.signature("integer", vec![k], to_integer);
        registry.signature("float", vec![k], to_float);
        registry.signature("boolean", vec![k], to_boolean);
        registry.signature("string", vec![k], to_string_fn);

        registry.signature("isInteger", vec![k], is_integer);
        registry.signature("isFloat", vec![k], is_float);
        registry.signature("isBoolean", vec![k], is_boolean);
        registry.signature("isString", vec![k], is_string);
        registry.signature("isDate", vec![k], is_date);
        registry.signature("isTime", vec![k], is_time);
        registry.signature("isDatetime", vec![k], is_datetime);
        registry.signature("isList", vec![k], is_list);
        registry.signature("isRecord", vec![k], is_record);
        registry.signature("isNull", vec![k], is_null);
    }

    registry.variadic("list", 0, None, list_ctor);
    registry.variadic("record", 2, None, record_ctor);
    registry.signature("property", vec![Kind::Record, Kind::String], property);
    registry.variadic("coalesce", 0, None, coalesce);
}

fn to_integer(args: &[Value]) -> Result<Value, BexlError> {
    cast(&args[0], Kind::Integer).map_err(Into::into)
}

fn to_float(args: &[Value]) -> Result<Value, BexlError> {
    cast(&args[0], Kind::Float).map_err(Into::into)
}

fn to_boolean(args: &[Value]) -> Result<Value, BexlError> {
    cast(&args[0], Kind::Boolean).map_err(Into::into)
}

fn to_string_fn(args: &[Value]) -> Result<Value, BexlError> {
    cast(&args[0], Kind::String).map_err(Into::into)
}

fn is_kind(args: &[Value], kind: Kind) -> Result<Value, BexlError> {
    Ok(Value::boolean(!args[0].is_null() && args[0].kind() == kind))
}

fn is_integer(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Integer)
}

fn is_float(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Float)
}

fn is_boolean(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Boolean)
}

fn is_string(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::String)
}

fn is_date(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Date)
}

fn is_time(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Time)
}

fn is_datetime(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Datetime)
}

fn is_list(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::List)
}

fn is_record(args: &[Value]) -> Result<Value, BexlError> {
    is_kind(args, Kind::Record)
}

fn is_null(args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::boolean(args[0].is_null()))
}

fn list_ctor(args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::list(args.to_vec()))
}

fn record_ctor(args: &[Value]) -> Result<Value, BexlError> {
    if !args.len().is_multiple_of(2) {
        return Err(ExecutionError::new("record() requires an even number of arguments").into());
    }
    let mut map = std::collections::BTreeMap::new();
    let mut i = 0;
    while i < args.len() {
        let key = &args[i];
        let key_str = key
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ExecutionError::new("record() keys must be non-null strings"))?;
        map.insert(key_str.to_string(), args[i + 1].clone());
        i += 2;
    }
    Ok(Value::record(map))
}

fn property(args: &[Value]) -> Result<Value, BexlError> {
    let (record, key) = (&args[0], &args[1]);
    if record.is_null() {
        return Ok(Value::Untyped);
    }
    let Some(key) = key.as_str() else {
        return Err(ExecutionError::new("property() requires a string key").into());
    };
    record
        .as_record()
        .and_then(|r| r.get(key))
        .cloned()
        .ok_or_else(|| ExecutionError::new(format!("no such property \"{key}\"")).into())
}

fn coalesce(args: &[Value]) -> Result<Value, BexlError> {
    for v in args {
        if !v.is_null() {
            return Ok(v.clone());
        }
    }
    Ok(Value::Untyped)
}
