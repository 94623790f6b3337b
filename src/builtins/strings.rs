use crate::dispatch::Registry;
use crate::error::BexlError;
use crate::value::{Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.signature("upper", vec![Kind::String], upper);
    registry.signature("lower", vec![Kind::String], lower);
    registry.signature("trim", vec![Kind::String], trim);
    registry.signature("ltrim", vec![Kind::String], ltrim);
    registry.signature("rtrim", vec![Kind::String], rtrim);
    registry.signature(
        "replace",
        vec![Kind::String, Kind::String, Kind::String],
        replace,
    );
}

fn unary_string(args: &[Value], f: fn(&str) -> String) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::String));
    }
    Ok(Value::string(f(v.as_str().unwrap())))
}

fn upper(args: &[Value]) -> Result<Value, BexlError> {
    unary_string(args, |s| s.to_uppercase())
}

fn lower(args: &[Value]) -> Result<Value, BexlError> {
    unary_string(args, |s| s.to_lowercase())
}

fn trim(args: &[Value]) -> Result<Value, BexlError> {
    unary_string(args, |s| s.trim().to_string())
}

fn ltrim(args: &[Value]) -> Result<Value, BexlError> {
    unary_string(args, |s| s.trim_start().to_string())
}

fn rtrim(args: &[Value]) -> Result<Value, BexlError> {
    unary_string(args, |s| s.trim_end().to_string())
}

fn replace(args: &[Value]) -> Result<Value, BexlError> {
    let (s, needle, repl) = (&args[0], &args[1], &args[2]);
    if s.is_null() || needle.is_null() || repl.is_null() {
        return Ok(Value::null_of(Kind::String));
    }
    Ok(Value::string(
        s.as_str().unwrap().replace(needle.as_str().unwrap(), repl.as_str().unwrap()),
    ))
}
