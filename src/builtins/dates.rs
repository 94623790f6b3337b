use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Timelike};

use crate::dispatch::Registry;
use crate::error::{BexlError, ExecutionError};
use crate::value::{Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.signature("year", vec![Kind::Date], year);
    registry.signature("year", vec![Kind::Datetime], year);
    registry.signature("month", vec![Kind::Date], month);
    registry.signature("month", vec![Kind::Datetime], month);
    registry.signature("day", vec![Kind::Date], day);
    registry.signature("day", vec![Kind::Datetime], day);
    registry.signature("hour", vec![Kind::Time], hour);
    registry.signature("hour", vec![Kind::Datetime], hour);
    registry.signature("minute", vec![Kind::Time], minute);
    registry.signature("minute", vec![Kind::Datetime], minute);
    registry.signature("second", vec![Kind::Time], second);
    registry.signature("second", vec![Kind::Datetime], second);
    registry.signature("millisecond", vec![Kind::Time], millisecond);
    registry.signature("millisecond", vec![Kind::Datetime], millisecond);

    registry.variadic("today", 0, Some(0), today);
    registry.variadic("now", 0, Some(0), now);

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
        registry.signature("date", vec![k], cast_date);
        registry.signature("time", vec![k], cast_time);
        registry.signature("datetime", vec![k], cast_datetime);
    }

    registry.signature("date", vec![Kind::Integer, Kind::Integer, Kind::Integer], date_ctor);
    registry.signature(
        "time",
        vec![Kind::Integer, Kind::Integer, Kind::Integer],
        time_ctor,
    );
    registry.signature(
        "time",
        vec![Kind::Integer, Kind::Integer, Kind::Integer, Kind::Integer],
        time_ctor,
    );
    registry.signature(
        "datetime",
        vec![
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
        ],
        datetime_ctor,
    );
    registry.signature(
        "datetime",
        vec![
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
            Kind::Integer,
        ],
        datetime_ctor,
    );

    for n in [Kind::Integer, Kind::Float] {
        registry.signature("add", vec![Kind::Date, n], add_date);
        registry.signature("subtract", vec![Kind::Date, n], subtract_date);
        registry.signature("add", vec![Kind::Time, n], add_time);
        registry.signature("subtract", vec![Kind::Time, n], subtract_time);
        registry.signature("add", vec![Kind::Datetime, n], add_datetime);
        registry.signature("subtract", vec![Kind::Datetime, n], subtract_datetime);
    }
    registry.signature("subtract", vec![Kind::Date, Kind::Date], subtract_date_date);
    registry.signature("subtract", vec![Kind::Date, Kind::Datetime], subtract_date_datetime);
    registry.signature("subtract", vec![Kind::Datetime, Kind::Date], subtract_datetime_date);
    registry.signature(
        "subtract",
        vec![Kind::Datetime, Kind::Datetime],
        subtract_datetime_datetime,
    );
    registry.signature("subtract", vec![Kind::Time, Kind::Time], subtract_time_time);
}

fn cast_date(args: &[Value]) -> Result<Value, BexlError> {
    crate::value::cast(&args[0], Kind::Date).map_err(Into::into)
}

fn cast_time(args: &[Value]) -> Result<Value, BexlError> {
    crate::value::cast(&args[0], Kind::Time).map_err(Into::into)
}

fn cast_datetime(args: &[Value]) -> Result<Value, BexlError> {
    crate::value::cast(&args[0], Kind::Datetime).map_err(Into::into)
}

fn as_f64(v: &Value) -> f64 {
    v.as_integer().map(|i| i as f64).unwrap_or_else(|| v.as_float().unwrap_or(0.0))
}

fn year(args: &[Value]) -> Result<Value, BexlError> {
    accessor(&args[0], |d| d.year() as i64, |dt| dt.year() as i64)
}

fn month(args: &[Value]) -> Result<Value, BexlError> {
    accessor(&args[0], |d| d.month() as i64, |dt| dt.month() as i64)
}

fn day(args: &[Value]) -> Result<Value, BexlError> {
    accessor(&args[0], |d| d.day() as i64, |dt| dt.day() as i64)
}

fn accessor(
    v: &Value,
    from_date: fn(NaiveDate) -> i64,
    from_datetime: fn(chrono::NaiveDateTime) -> i64,
) -> Result<Value, BexlError> {
    if v.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    match v {
        Value::Date(_, Some(d)) => Ok(Value::integer(from_date(*d))),
        Value::Datetime(_, Some(dt)) => Ok(Value::integer(from_datetime(*dt))),
        _ => unreachable!(),
    }
}

fn hour(args: &[Value]) -> Result<Value, BexlError> {
    time_accessor(&args[0], |t| t.hour() as i64)
}

fn minute(args: &[Value]) -> Result<Value, BexlError> {
    time_accessor(&args[0], |t| t.minute() as i64)
}

fn second(args: &[Value]) -> Result<Value, BexlError> {
    time_accessor(&args[0], |t| t.second() as i64)
}

fn millisecond(args: &[Value]) -> Result<Value, BexlError> {
    time_accessor(&args[0], |t| (t.nanosecond() / 1_000_000) as i64)
}

fn time_accessor(v: &Value, from_time: fn(NaiveTime) -> i64) -> Result<Value, BexlError> {
    if v.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    match v {
        Value::Time(_, Some(t)) => Ok(Value::integer(from_time(*t))),
        Value::Datetime(_, Some(dt)) => Ok(Value::integer(from_time(dt.time()))),
        _ => unreachable!(),
    }
}

fn today(_args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::date(Local::now().date_naive()))
}

fn now(_args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::datetime(Local::now().naive_local()))
}

fn date_ctor(args: &[Value]) -> Result<Value, BexlError> {
    let (y, m, d) = (args[0].as_integer(), args[1].as_integer(), args[2].as_integer());
    let (Some(y), Some(m), Some(d)) = (y, m, d) else {
        return Ok(Value::null_of(Kind::Date));
    };
    NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32)
        .map(Value::date)
        .ok_or_else(|| ExecutionError::new("invalid date components").into())
}

fn time_ctor(args: &[Value]) -> Result<Value, BexlError> {
    let h = args[0].as_integer();
    let mi = args[1].as_integer();
    let s = args[2].as_integer();
    let ms = args.get(3).and_then(|v| v.as_integer()).unwrap_or(0);
    let (Some(h), Some(mi), Some(s)) = (h, mi, s) else {
        return Ok(Value::null_of(Kind::Time));
    };
    NaiveTime::from_hms_milli_opt(h as u32, mi as u32, s as u32, ms as u32)
        .map(Value::time)
        .ok_or_else(|| ExecutionError::new("invalid time components").into())
}

fn datetime_ctor(args: &[Value]) -> Result<Value, BexlError> {
    let y = args[0].as_integer();
    let mo = args[1].as_integer();
    let d = args[2].as_integer();
    let h = args[3].as_integer();
    let mi = args[4].as_integer();
    let s = args[5].as_integer();
    let ms = args.get(6).and_then(|v| v.as_integer()).unwrap_or(0);
    let (Some(y), Some(mo), Some(d), Some(h), Some(mi), Some(s)) = (y, mo, d, h, mi, s) else {
        return Ok(Value::null_of(Kind::Datetime));
    };
    let date = NaiveDate::from_ymd_opt(y as i32, mo as u32, d as u32)
        .ok_or_else(|| ExecutionError::new("invalid date components"))?;
    let time = NaiveTime::from_hms_milli_opt(h as u32, mi as u32, s as u32, ms as u32)
        .ok_or_else(|| ExecutionError::new("invalid time components"))?;
    Ok(Value::datetime(date.and_time(time)))
}

fn add_date(args: &[Value]) -> Result<Value, BexlError> {
    let (d, n) = (&args[0], &args[1]);
    if d.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Date));
    }
    let days = if let Some(f) = n.as_float() { f.ceil() as i64 } else { n.as_integer().unwrap() };
    Ok(Value::date(d.as_date().unwrap() + Duration::days(days)))
}

fn subtract_date(args: &[Value]) -> Result<Value, BexlError> {
    let (d, n) = (&args[0], &args[1]);
    if d.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Date));
    }
    let days = if let Some(f) = n.as_float() { f.ceil() as i64 } else { n.as_integer().unwrap() };
    Ok(Value::date(d.as_date().unwrap() - Duration::days(days)))
}

fn add_time(args: &[Value]) -> Result<Value, BexlError> {
    let (t, n) = (&args[0], &args[1]);
    if t.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Time));
    }
    let seconds = as_f64(n);
    let duration = Duration::milliseconds((seconds * 1000.0).round() as i64);
    Ok(Value::time(t.as_time().unwrap().overflowing_add_signed(duration).0))
}

fn subtract_time(args: &[Value]) -> Result<Value, BexlError> {
    let (t, n) = (&args[0], &args[1]);
    if t.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Time));
    }
    let seconds = as_f64(n);
    let duration = Duration::milliseconds((seconds * 1000.0).round() as i64);
    Ok(Value::time(t.as_time().unwrap().overflowing_sub_signed(duration).0))
}

fn add_datetime(args: &[Value]) -> Result<Value, BexlError> {
    let (dt, n) = (&args[0], &args[1]);
    if dt.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Datetime));
    }
    let days = if let Some(f) = n.as_float() { f.ceil() as i64 } else { n.as_integer().unwrap() };
    Ok(Value::datetime(dt.as_datetime().unwrap() + Duration::days(days)))
}

fn subtract_datetime(args: &[Value]) -> Result<Value, BexlError> {
    let (dt, n) = (&args[0], &args[1]);
    if dt.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::Datetime));
    }
    let days = if let Some(f) = n.as_float() { f.ceil() as i64 } else { n.as_integer().unwrap() };
    Ok(Value::datetime(dt.as_datetime().unwrap() - Duration::days(days)))
}

fn subtract_date_date(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    Ok(Value::integer((a.as_date().unwrap() - b.as_date().unwrap()).num_days()))
}

fn datetime_seconds(dt: chrono::NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 + dt.and_utc().timestamp_subsec_millis() as f64 / 1000.0
}

fn subtract_date_datetime(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::null_of(Kind::Float));
    }
    let a_dt = a.as_date().unwrap().and_hms_opt(0, 0, 0).unwrap();
    let seconds = datetime_seconds(a_dt) - datetime_seconds(b.as_datetime().unwrap());
    Ok(Value::float(seconds / 86400.0))
}

fn subtract_datetime_date(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::null_of(Kind::Float));
    }
    let b_dt = b.as_date().unwrap().and_hms_opt(0, 0, 0).unwrap();
    let seconds = datetime_seconds(a.as_datetime().unwrap()) - datetime_seconds(b_dt);
    Ok(Value::float(seconds / 86400.0))
}

fn subtract_datetime_datetime(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::null_of(Kind::Float));
    }
    let seconds = datetime_seconds(a.as_datetime().unwrap()) - datetime_seconds(b.as_datetime().unwrap());
    Ok(Value::float(seconds / 86400.0))
}

fn subtract_time_time(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Value::null_of(Kind::Float));
    }
    let today = Local::now().date_naive();
    let a_dt = today.and_time(a.as_time().unwrap());
    let b_dt = today.and_time(b.as_time().unwrap());
    Ok(Value::float((a_dt - b_dt).num_milliseconds() as f64 / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::cast;

    #[test]
    fn date_add_integer_adds_days() {
        let d = Value::date(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        let out = add_date(&[d, Value::integer(1)]).unwrap();
        assert_eq!(out, Value::date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()));
    }

    #[test]
    fn invalid_date_string_is_conversion_error() {
        assert!(cast(&Value::string("2020-02-30"), Kind::Date).is_err());
    }
}
