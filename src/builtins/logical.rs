use crate::dispatch::Registry;
use crate::error::{BexlError, ExecutionError};
use crate::value::{cast, Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.signature("not", vec![Kind::Boolean], not);
    registry.variadic("and", 2, Some(2), and);
    registry.variadic("or", 2, Some(2), or);
    registry.variadic("xor", 2, Some(2), xor);
    registry.variadic("if", 3, None, if_fn);
    registry.variadic("switch", 4, None, switch_fn);
}

fn not(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::Boolean));
    }
    Ok(Value::boolean(!v.as_boolean().unwrap()))
}

fn to_bool(v: &Value) -> Result<bool, BexlError> {
    let cast_value = cast(v, Kind::Boolean)?;
    Ok(cast_value.as_boolean().unwrap_or(false))
}

fn and(args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::boolean(to_bool(&args[0])? && to_bool(&args[1])?))
}

fn or(args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::boolean(to_bool(&args[0])? || to_bool(&args[1])?))
}

fn xor(args: &[Value]) -> Result<Value, BexlError> {
    Ok(Value::boolean(to_bool(&args[0])? ^ to_bool(&args[1])?))
}

fn if_fn(args: &[Value]) -> Result<Value, BexlError> {
    if args.len() % 2 != 1 {
        return Err(ExecutionError::new("if() requires an odd number of arguments").into());
    }
    let mut i = 0;
    while i + 1 < args.len() {
        if to_bool(&args[i])? {
            return Ok(args[i + 1].clone());
        }
        i += 2;
    }
    Ok(args[args.len() - 1].clone())
}

fn switch_fn(args: &[Value]) -> Result<Value, BexlError> {
    if !args.len().is_multiple_of(2) {
        return Err(ExecutionError::new("switch() requires an even number of arguments").into());
    }
    let value = &args[0];
    let mut i = 1;
    while i + 1 < args.len() {
        let key = cast(&args[i], value.kind())?;
        if key == *value {
            return Ok(args[i + 1].clone());
        }
        i += 2;
    }
    Ok(args[args.len() - 1].clone())
}
