use chrono::Timelike;

use crate::dispatch::Registry;
use crate::error::{BexlError, DispatchError, ExecutionError};
use crate::value::{cast, Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.signature("min", vec![Kind::List], min);
    registry.signature("max", vec![Kind::List], max);
    registry.signature("sum", vec![Kind::List], sum);
    registry.signature("average", vec![Kind::List], average);
    registry.signature("all", vec![Kind::List], all);
    registry.signature("any", vec![Kind::List], any);
    registry.signature("none", vec![Kind::List], none);
    registry.signature("count", vec![Kind::List], count);
}

/// Numerics (int/float) and temporals (date/datetime, or time alone) are
/// each one type family; a list mixing families is an `ExecutionError`.
fn non_null_family(list: &[Value]) -> Result<Vec<&Value>, BexlError> {
    let non_null: Vec<&Value> = list.iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return Ok(non_null);
    }
    let numeric = |k: Kind| matches!(k, Kind::Integer | Kind::Float);
    let temporal = |k: Kind| matches!(k, Kind::Date | Kind::Datetime);
    let first_kind = non_null[0].kind();
    let consistent = if numeric(first_kind) {
        non_null.iter().all(|v| numeric(v.kind()))
    } else if temporal(first_kind) {
        non_null.iter().all(|v| temporal(v.kind()))
    } else {
        non_null.iter().all(|v| v.kind() == first_kind)
    };
    if !consistent {
        return Err(ExecutionError::new("list elements are not consistently typed").into());
    }
    Ok(non_null)
}

fn as_list(v: &Value) -> &[Value] {
    v.as_list().unwrap_or(&[])
}

fn min(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    let values = non_null_family(list)?;
    if values.is_empty() {
        return Ok(Value::Untyped);
    }
    Ok(reduce_numeric_or_temporal(values, |a, b| if a < b { a } else { b }))
}

fn max(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    let values = non_null_family(list)?;
    if values.is_empty() {
        return Ok(Value::Untyped);
    }
    Ok(reduce_numeric_or_temporal(values, |a, b| if a > b { a } else { b }))
}

fn as_f64(v: &Value) -> f64 {
    v.as_integer().map(|i| i as f64).unwrap_or_else(|| v.as_float().unwrap_or(0.0))
}

fn reduce_numeric_or_temporal(values: Vec<&Value>, pick: fn(f64, f64) -> f64) -> Value {
    match values[0].kind() {
        Kind::Integer | Kind::Float => {
            let picked = values.iter().map(|v| as_f64(v)).reduce(pick).unwrap();
            if values.iter().any(|v| v.kind() == Kind::Float) {
                Value::float(picked)
            } else {
                Value::integer(picked as i64)
            }
        }
        _ => {
            // dates/datetimes: compare by a representative ordering key.
            let mut best = values[0];
            for v in &values[1..] {
                let (a, b) = (key(best), key(v));
                if pick(a, b) == b {
                    best = v;
                }
            }
            best.clone()
        }
    }
}

fn key(v: &Value) -> f64 {
    match v {
        Value::Date(_, Some(d)) => d.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp() as f64,
        Value::Datetime(_, Some(dt)) => dt.and_utc().timestamp() as f64,
        Value::Time(_, Some(t)) => t.num_seconds_from_midnight() as f64,
        _ => 0.0,
    }
}

/// `sum`/`average` only ever accept a numeric (int/float) family; unlike
/// `min`/`max` they have no meaningful temporal interpretation, so any
/// non-numeric element is a `DispatchError`, not a silently-zeroed term.
fn non_null_numeric(list: &[Value]) -> Result<Vec<&Value>, BexlError> {
    let non_null: Vec<&Value> = list.iter().filter(|v| !v.is_null()).collect();
    if non_null.iter().any(|v| !matches!(v.kind(), Kind::Integer | Kind::Float)) {
        return Err(DispatchError::new("sum()/average() require a list of integers/floats").into());
    }
    Ok(non_null)
}

fn sum(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    let values = non_null_numeric(list)?;
    if values.is_empty() {
        return Ok(Value::Untyped);
    }
    let has_float = values.iter().any(|v| v.kind() == Kind::Float);
    let total: f64 = values.iter().map(|v| as_f64(v)).sum();
    if has_float {
        Ok(Value::float(total))
    } else {
        Ok(Value::integer(total as i64))
    }
}

fn average(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    let values = non_null_numeric(list)?;
    if values.is_empty() {
        return Ok(Value::Untyped);
    }
    let total: f64 = values.iter().map(|v| as_f64(v)).sum();
    Ok(Value::float(total / values.len() as f64))
}

fn all(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    if list.is_empty() {
        return Ok(Value::boolean(true));
    }
    for v in list {
        let b = cast(v, Kind::Boolean)?;
        if !b.as_boolean().unwrap_or(false) {
            return Ok(Value::boolean(false));
        }
    }
    Ok(Value::boolean(true))
}

fn any(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    if list.is_empty() {
        return Ok(Value::boolean(false));
    }
    for v in list {
        let b = cast(v, Kind::Boolean)?;
        if b.as_boolean().unwrap_or(false) {
            return Ok(Value::boolean(true));
        }
    }
    Ok(Value::boolean(false))
}

fn none(args: &[Value]) -> Result<Value, BexlError> {
    let result = any(args)?;
    Ok(Value::boolean(!result.as_boolean().unwrap()))
}

fn count(args: &[Value]) -> Result<Value, BexlError> {
    let list = as_list(&args[0]);
    let mut n = 0i64;
    for v in list {
        let b = cast(v, Kind::Boolean)?;
        if b.as_boolean().unwrap_or(false) {
            n += 1;
        }
    }
    Ok(Value::integer(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_over_a_time_only_list_finds_the_latest_time() {
        let earlier = Value::time(chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        let later = Value::time(chrono::NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        let list = Value::list(vec![earlier.clone(), later.clone()]);
        assert_eq!(max(&[list]).unwrap(), later);
    }

    #[test]
    fn sum_over_a_date_list_is_a_dispatch_error() {
        let list = Value::list(vec![
            Value::date(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Value::date(chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        ]);
        assert!(sum(&[list]).is_err());
    }
}
