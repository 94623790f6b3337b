use std::cmp::Ordering;

use crate::dispatch::Registry;
use crate::error::BexlError;
use crate::value::{cast, Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.variadic("equal", 2, Some(2), equal);
    registry.variadic("notEqual", 2, Some(2), not_equal);
    registry.variadic("lesser", 2, Some(2), lesser);
    registry.variadic("lesserEqual", 2, Some(2), lesser_equal);
    registry.variadic("greater", 2, Some(2), greater);
    registry.variadic("greaterEqual", 2, Some(2), greater_equal);

    for (a, b, c) in numeric_triples() {
        registry.signature("between", vec![a, b, c], between);
    }
}

fn numeric_triples() -> Vec<(Kind, Kind, Kind)> {
    let nums = [Kind::Integer, Kind::Float];
    let mut out = Vec::new();
    for a in nums {
        for b in nums {
            for c in nums {
                out.push((a, b, c));
            }
        }
    }
    out
}

/// Casts `right` to `left`'s kind (per the "comparison casts right to left"
/// rule) and compares. Ties back into `cast`, so an incompatible pair
/// surfaces as a `ConversionError` before any comparison happens.
fn casted_pair(left: &Value, right: &Value) -> Result<(Value, Value), BexlError> {
    let right = cast(right, left.kind())?;
    Ok((left.clone(), right))
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(_, Some(a)), Value::Integer(_, Some(b))) => a.partial_cmp(b),
        (Value::Float(_, Some(a)), Value::Float(_, Some(b))) => a.partial_cmp(b),
        (Value::Boolean(_, Some(a)), Value::Boolean(_, Some(b))) => a.partial_cmp(b),
        (Value::String(_, Some(a)), Value::String(_, Some(b))) => a.partial_cmp(b),
        (Value::Date(_, Some(a)), Value::Date(_, Some(b))) => a.partial_cmp(b),
        (Value::Time(_, Some(a)), Value::Time(_, Some(b))) => a.partial_cmp(b),
        (Value::Datetime(_, Some(a)), Value::Datetime(_, Some(b))) => a.partial_cmp(b),
        _ => None,
    }
}

fn equal(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(left == right))
}

fn not_equal(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(left != right))
}

fn lesser(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(ordering(&left, &right) == Some(Ordering::Less)))
}

fn lesser_equal(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(matches!(
        ordering(&left, &right),
        Some(Ordering::Less) | Some(Ordering::Equal)
    )))
}

fn greater(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(ordering(&left, &right) == Some(Ordering::Greater)))
}

fn greater_equal(args: &[Value]) -> Result<Value, BexlError> {
    let (left, right) = casted_pair(&args[0], &args[1])?;
    Ok(Value::boolean(matches!(
        ordering(&left, &right),
        Some(Ordering::Greater) | Some(Ordering::Equal)
    )))
}

fn between(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::boolean(false));
    }
    let start = cast(&args[1], v.kind())?;
    let end = cast(&args[2], v.kind())?;
    let above_start = matches!(
        ordering(&start, v),
        Some(Ordering::Less) | Some(Ordering::Equal)
    );
    let below_end = matches!(ordering(v, &end), Some(Ordering::Less) | Some(Ordering::Equal));
    Ok(Value::boolean(above_start && below_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesser_casts_the_right_operand_to_the_left_kind() {
        // right (2.5) casts down to the left's integer kind (2) before comparing.
        let out = lesser(&[Value::integer(1), Value::float(2.5)]).unwrap();
        assert_eq!(out, Value::boolean(true));
    }

    #[test]
    fn between_is_inclusive_on_both_ends() {
        assert_eq!(
            between(&[Value::integer(5), Value::integer(1), Value::integer(5)]).unwrap(),
            Value::boolean(true)
        );
    }

    #[test]
    fn between_with_a_null_subject_is_false() {
        assert_eq!(
            between(&[Value::null_of(Kind::Integer), Value::integer(1), Value::integer(5)]).unwrap(),
            Value::boolean(false)
        );
    }
}
