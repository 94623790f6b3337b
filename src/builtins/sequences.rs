use crate::dispatch::Registry;
use crate::error::{BexlError, DispatchError, ExecutionError};
use crate::value::{Kind, Value};

pub fn register(registry: &mut Registry) {
    registry.variadic("in", 2, Some(2), in_fn);
    registry.signature("length", vec![Kind::String], length);
    registry.signature("length", vec![Kind::List], length);

    for seq in [Kind::String, Kind::List] {
        registry.signature("head", vec![seq], head);
        registry.signature("head", vec![seq, Kind::Integer], head);
        registry.signature("head", vec![seq, Kind::Float], head);
        registry.signature("tail", vec![seq], tail);
        registry.signature("tail", vec![seq, Kind::Integer], tail);
        registry.signature("tail", vec![seq, Kind::Float], tail);
        registry.signature("slice", vec![seq, Kind::Integer], slice);
        registry.signature("slice", vec![seq, Kind::Integer, Kind::Integer], slice);
        registry.signature("at", vec![seq, Kind::Integer], at);
    }

    registry.variadic("concat", 2, None, concat);
    registry.signature("repeat", vec![Kind::String, Kind::Integer], repeat);
}

/// Reads a `head`/`tail`/`slice` count or bound argument, which dispatch
/// guarantees is an Integer or Float (never any other kind); a Float count
/// truncates, matching the original's `int(length.raw_value)`.
fn as_count(v: &Value) -> i64 {
    match v {
        Value::Integer(_, Some(i)) => *i,
        Value::Float(_, Some(f)) => *f as i64,
        _ => unreachable!("dispatch guarantees an integer or float count"),
    }
}

fn in_fn(args: &[Value]) -> Result<Value, BexlError> {
    let (needle, haystack) = (&args[0], &args[1]);
    if haystack.is_null() {
        return Ok(Value::boolean(false));
    }
    match haystack {
        Value::List(_, Some(items)) => Ok(Value::boolean(items.contains(needle))),
        Value::String(_, Some(hay)) => match needle.as_str() {
            Some(n) => Ok(Value::boolean(hay.contains(n))),
            None => Err(DispatchError::new(
                "in() on a string haystack requires a string needle",
            )
            .into()),
        },
        _ => Err(DispatchError::new("in() requires a list or string haystack").into()),
    }
}

fn length(args: &[Value]) -> Result<Value, BexlError> {
    let v = &args[0];
    if v.is_null() {
        return Ok(Value::null_of(Kind::Integer));
    }
    let len = match v {
        Value::String(_, Some(s)) => s.chars().count(),
        Value::List(_, Some(l)) => l.len(),
        _ => unreachable!(),
    };
    Ok(Value::integer(len as i64))
}

fn seq_len(v: &Value) -> Option<usize> {
    match v {
        Value::String(_, Some(s)) => Some(s.chars().count()),
        Value::List(_, Some(l)) => Some(l.len()),
        _ => None,
    }
}

fn head(args: &[Value]) -> Result<Value, BexlError> {
    let seq = &args[0];
    if seq.is_null() {
        return Ok(Value::null_of(seq.kind()));
    }
    let n = match args.get(1) {
        Some(v) if !v.is_null() => as_count(v),
        _ => 1,
    }
    .max(0) as usize;
    take_from(seq, 0, n)
}

fn tail(args: &[Value]) -> Result<Value, BexlError> {
    let seq = &args[0];
    if seq.is_null() {
        return Ok(Value::null_of(seq.kind()));
    }
    let total = seq_len(seq).unwrap_or(0);
    let n = match args.get(1) {
        Some(v) if !v.is_null() => as_count(v),
        _ => 1,
    }
    .max(0) as usize;
    let start = total.saturating_sub(n);
    take_from(seq, start, total)
}

fn take_from(seq: &Value, start: usize, end: usize) -> Result<Value, BexlError> {
    match seq {
        Value::String(_, Some(s)) => {
            let chars: Vec<char> = s.chars().collect();
            let end = end.min(chars.len());
            let start = start.min(end);
            Ok(Value::string(chars[start..end].iter().collect::<String>()))
        }
        Value::List(_, Some(l)) => {
            let end = end.min(l.len());
            let start = start.min(end);
            Ok(Value::list(l[start..end].to_vec()))
        }
        _ => Err(DispatchError::new("head()/tail() require a string or list").into()),
    }
}

fn concat(args: &[Value]) -> Result<Value, BexlError> {
    if args.iter().all(|v| v.kind() == Kind::String) {
        let mut out = String::new();
        for v in args {
            out.push_str(v.as_str().unwrap_or(""));
        }
        return Ok(Value::string(out));
    }
    if args.iter().all(|v| v.kind() == Kind::List) {
        let mut out = Vec::new();
        for v in args {
            out.extend(v.as_list().unwrap_or(&[]).iter().cloned());
        }
        return Ok(Value::list(out));
    }
    Err(DispatchError::new("concat() requires all string or all list arguments").into())
}

fn slice(args: &[Value]) -> Result<Value, BexlError> {
    let seq = &args[0];
    if seq.is_null() {
        return Ok(Value::null_of(seq.kind()));
    }
    let total = seq_len(seq).unwrap_or(0);
    let start = args[1].as_integer().unwrap_or(0).max(0) as usize;
    let end = match args.get(2) {
        Some(v) if !v.is_null() => v.as_integer().unwrap_or(total as i64).max(0) as usize,
        _ => total,
    };
    take_from(seq, start, end)
}

fn at(args: &[Value]) -> Result<Value, BexlError> {
    let (seq, index) = (&args[0], &args[1]);
    if seq.is_empty() {
        return Ok(Value::Untyped);
    }
    let idx = index.as_integer().ok_or_else(|| DispatchError::new("at() requires an integer index"))?;
    match seq {
        Value::String(_, Some(s)) => {
            let chars: Vec<char> = s.chars().collect();
            let resolved = resolve_index(idx, chars.len())
                .ok_or_else(|| ExecutionError::new("string index out of bounds"))?;
            Ok(Value::string(chars[resolved].to_string()))
        }
        Value::List(_, Some(l)) => {
            let resolved = resolve_index(idx, l.len())
                .ok_or_else(|| ExecutionError::new("list index out of bounds"))?;
            Ok(l[resolved].clone())
        }
        _ => Err(DispatchError::new("at() requires a string or list").into()),
    }
}

fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    let resolved = if idx < 0 { idx + len as i64 } else { idx };
    if resolved < 0 || resolved as usize >= len {
        None
    } else {
        Some(resolved as usize)
    }
}

fn repeat(args: &[Value]) -> Result<Value, BexlError> {
    let (s, n) = (&args[0], &args[1]);
    if s.is_null() || n.is_null() {
        return Ok(Value::null_of(Kind::String));
    }
    let count = n.as_integer().unwrap();
    if count < 0 {
        return Err(ExecutionError::new("repeat() rejects a negative count").into());
    }
    Ok(Value::string(s.as_str().unwrap().repeat(count as usize)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_truncates_a_float_count() {
        let list = Value::list(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        let out = head(&[list, Value::float(2.5)]).unwrap();
        assert_eq!(out.as_list().unwrap().len(), 2);
    }

    #[test]
    fn at_on_an_empty_list_is_untyped_null() {
        let out = at(&[Value::list(vec![]), Value::integer(0)]).unwrap();
        assert!(out.is_null());
    }

    #[test]
    fn at_on_an_empty_string_is_untyped_null() {
        let out = at(&[Value::string(""), Value::integer(0)]).unwrap();
        assert!(out.is_null());
    }
}
