use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dispatch::Registry;
use crate::error::{BexlError, ExecutionError};
use crate::value::{Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.signature("negative", vec![Kind::Integer], negative);
    registry.signature("negative", vec![Kind::Float], negative);

    for (a, b) in [
        (Kind::Integer, Kind::Integer),
        (Kind::Integer, Kind::Float),
        (Kind::Float, Kind::Integer),
        (Kind::Float, Kind::Float),
    ] {
        registry.signature("add", vec![a, b], add);
        registry.signature("subtract", vec![a, b], subtract);
        registry.signature("multiply", vec![a, b], multiply);
        registry.signature("divide", vec![a, b], divide);
        registry.signature("modulo", vec![a, b], modulo);
        registry.signature("pow", vec![a, b], pow);
        registry.signature("log", vec![a, b], log);
        registry.signature("hypot", vec![a, b], hypot);
    }

    for k in [Kind::Integer, Kind::Float] {
        registry.signature("abs", vec![k], abs);
        registry.signature("ceil", vec![k], ceil);
        registry.signature("floor", vec![k], floor);
        registry.signature("trunc", vec![k], trunc);
        registry.signature("sin", vec![k], sin);
        registry.signature("cos", vec![k], cos);
        registry.signature("tan", vec![k], tan);
        registry.signature("sqrt", vec![k], sqrt);
    }

    registry.signature("round", vec![Kind::Integer], round1);
    registry.signature("round", vec![Kind::Float], round1);
    registry.signature("round", vec![Kind::Integer, Kind::Integer], round2);
    registry.signature("round", vec![Kind::Float, Kind::Integer], round2);

    registry.variadic("pi", 0, Some(0), pi);
    registry.variadic("e", 0, Some(0), e);
    registry.variadic("random", 0, Some(0), random);
}

fn both_null(a: &Value, b: &Value) -> bool {
    a.is_null() || b.is_null()
}

fn as_f64(v: &Value) -> f64 {
    v.as_integer().map(|i| i as f64).unwrap_or_else(|| v.as_float().unwrap_or(0.0))
}

fn negative(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(v.kind()));
    }
    Ok(match v {
        Value::Integer(_, Some(i)) => Value::integer(-i),
        Value::Float(_, Some(f)) => Value::float(-f),
        _ => unreachable!("dispatch guarantees numeric kind"),
    })
}

fn add(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(result_kind(a, b)));
    }
    match (a, b) {
        (Value::Integer(_, Some(x)), Value::Integer(_, Some(y))) => Ok(Value::integer(x + y)),
        _ => Ok(Value::float(as_f64(a) + as_f64(b))),
    }
}

fn subtract(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(result_kind(a, b)));
    }
    match (a, b) {
        (Value::Integer(_, Some(x)), Value::Integer(_, Some(y))) => Ok(Value::integer(x - y)),
        _ => Ok(Value::float(as_f64(a) - as_f64(b))),
    }
}

fn multiply(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(result_kind(a, b)));
    }
    match (a, b) {
        (Value::Integer(_, Some(x)), Value::Integer(_, Some(y))) => Ok(Value::integer(x * y)),
        _ => Ok(Value::float(as_f64(a) * as_f64(b))),
    }
}

fn divide(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(Kind::Float));
    }
    let denom = as_f64(b);
    if denom == 0.0 {
        return Err(ExecutionError::new("division by zero").into());
    }
    Ok(Value::float(as_f64(a) / denom))
}

fn modulo(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(result_kind(a, b)));
    }
    match (a, b) {
        (Value::Integer(_, Some(x)), Value::Integer(_, Some(y))) => {
            if *y == 0 {
                return Err(ExecutionError::new("modulo by zero").into());
            }
            let r = x % y;
            Ok(Value::integer(if r != 0 && (r < 0) != (*y < 0) { r + y } else { r }))
        }
        _ => {
            let denom = as_f64(b);
            if denom == 0.0 {
                return Err(ExecutionError::new("modulo by zero").into());
            }
            let r = as_f64(a) % denom;
            Ok(Value::float(if r != 0.0 && (r < 0.0) != (denom < 0.0) { r + denom } else { r }))
        }
    }
}

fn pow(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(result_kind(a, b)));
    }
    match (a, b) {
        (Value::Integer(_, Some(x)), Value::Integer(_, Some(y))) if *y >= 0 => {
            Ok(Value::integer(x.pow(*y as u32)))
        }
        _ => Ok(Value::float(as_f64(a).powf(as_f64(b)))),
    }
}

fn result_kind(a: &Value, b: &Value) -> Kind {
    if a.kind() == Kind::Float || b.kind() == Kind::Float {
        Kind::Float
    } else {
        a.kind()
    }
}

fn abs(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(v.kind()));
    }
    Ok(match v {
        Value::Integer(_, Some(i)) => Value::integer(i.abs()),
        Value::Float(_, Some(f)) => Value::float(f.abs()),
        _ => unreachable!(),
    })
}

fn unary_float_to_int(args: &[Value], f: fn(f64) -> f64) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    Ok(Value::integer(f(as_f64(v)) as i64))
}

fn ceil(args: &[Value]) -> Result<Value, BexlError> {
    unary_float_to_int(args, f64::ceil)
}

fn floor(args: &[Value]) -> Result<Value, BexlError> {
    unary_float_to_int(args, f64::floor)
}

fn trunc(args: &[Value]) -> Result<Value, BexlError> {
    unary_float_to_int(args, f64::trunc)
}

fn unary_float(args: &[Value], f: fn(f64) -> f64) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::Float));
    }
    Ok(Value::float(f(as_f64(v))))
}

fn sin(args: &[Value]) -> Result<Value, BexlError> {
    unary_float(args, f64::sin)
}

fn cos(args: &[Value]) -> Result<Value, BexlError> {
    unary_float(args, f64::cos)
}

fn tan(args: &[Value]) -> Result<Value, BexlError> {
    unary_float(args, f64::tan)
}

fn sqrt(args: &[Value]) -> Result<Value, BexlError> {
    unary_float(args, f64::sqrt)
}

fn log(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(Kind::Float));
    }
    Ok(Value::float(as_f64(a).log(as_f64(b))))
}

fn hypot(args: &[Value]) -> Result<Value, BexlError> {
    let (a, b) = (&args[0], &args[1]);
    if both_null(a, b) {
        return Ok(Value::null_of(Kind::Float));
    }
    Ok(Value::float(as_f64(a).hypot(as_f64(b))))
}

fn pi(_args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::float(std::f64::consts::PI))
}

fn e(_args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::float(std::f64::consts::E))
}

thread_local! {
    static RNG_STATE: Cell<u64> = Cell::new(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E3779B97F4A7C15)
            | 1,
    );
}

fn random(_args: &[Value]) -> Result<Value, BexlError> {
    let next = RNG_STATE.with(|state| {
        // xorshift64*
        let mut x = state.get();
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        state.set(x);
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    });
    Ok(Value::float((next >> 11) as f64 / (1u64 << 53) as f64))
}

/// Banker's rounding (round-half-to-even), so `round(0.5)` and `round(1.5)`
/// both land on the nearest even integer rather than always rounding up.
fn round_half_even(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let floor = scaled.floor();
    let diff = scaled - floor;
    let rounded = if (diff - 0.5).abs() < f64::EPSILON {
        if (floor as i64) % 2 == 0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / factor
}

fn round1(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    match v {
        Value::Integer(_, Some(i)) => Ok(Value::integer(*i)),
        Value::Float(_, Some(f)) => Ok(Value::integer(round_half_even(*f, 0) as i64)),
        _ => unreachable!(),
    }
}

fn round2(args: &[Value]) -> Result<Value, BexlError> {
    let (v, places) = (&args[0], &args[1]);
    if both_null(v, places) {
        return Ok(Value::null_of(Kind::Float));
    }
    let places = places.as_integer().unwrap_or(0) as i32;
    Ok(Value::float(round_half_even(as_f64(v), places)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_even_breaks_ties_toward_the_even_neighbor() {
        assert_eq!(round_half_even(0.5, 0), 0.0);
        assert_eq!(round_half_even(1.5, 0), 2.0);
        assert_eq!(round_half_even(2.5, 0), 2.0);
    }

    #[test]
    fn divide_by_zero_is_an_execution_error() {
        assert!(divide(&[Value::integer(1), Value::integer(0)]).is_err());
    }

    #[test]
    fn integer_add_stays_integer() {
        assert_eq!(add(&[Value::integer(2), Value::integer(3)]).unwrap(), Value::integer(5));
    }

    #[test]
    fn mixed_integer_float_add_widens_to_float() {
        assert_eq!(add(&[Value::integer(2), Value::float(0.5)]).unwrap(), Value::float(2.5));
    }
}
