use std::collections::HashMap;

use log::debug;

use crate::error::{BexlError, DispatchError};
use crate::value::{Kind, Value};

pub type Fun = fn(&[Value]) -> Result<Value, BexlError>;

/// Either a variadic implementation (arity-checked, any kinds) or a
/// signature table (exact `(kind_1, …, kind_n)` lookup, no implicit
/// widening).
enum Impl {
    Variadic { min: usize, max: Option<usize>, func: Fun },
    Table(HashMap<Vec<Kind>, Fun>),
}

/// One of the three disjoint registries (`unary_operators`, `binary_operators`,
/// `functions`). Populated once, read-only thereafter.
pub struct Registry {
    label: &'static str,
    entries: HashMap<String, Impl>,
}

impl Registry {
    pub fn new(label: &'static str) -> Self {
        Registry {
            label,
            entries: HashMap::new(),
        }
    }

    /// Registers a single exact signature for `name`, merging into any
    /// existing signature table for that name.
    pub fn signature(&mut self, name: &str, kinds: Vec<Kind>, func: Fun) {
        match self.entries.entry(name.to_string()).or_insert_with(|| Impl::Table(HashMap::new())) {
            Impl::Table(map) => {
                map.insert(kinds, func);
            }
            Impl::Variadic { .. } => {
                panic!("\"{name}\" registered as both variadic and signature-table");
            }
        }
    }

    pub fn variadic(&mut self, name: &str, min: usize, max: Option<usize>, func: Fun) {
        self.entries.insert(name.to_string(), Impl::Variadic { min, max, func });
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, BexlError> {
        let Some(entry) = self.entries.get(name) else {
            return Err(mismatch(self.label, name, args));
        };

        match entry {
            Impl::Variadic { min, max, func } => {
                let within = args.len() >= *min && max.is_none_or(|m| args.len() <= m);
                if !within {
                    return Err(mismatch(self.label, name, args));
                }
                func(args)
            }
            Impl::Table(map) => {
                let kinds: Vec<Kind> = args.iter().map(|v| v.kind()).collect();
                match map.get(&kinds) {
                    Some(func) => func(args),
                    None => Err(mismatch(self.label, name, args)),
                }
            }
        }
    }
}

fn mismatch(label: &str, name: &str, args: &[Value]) -> BexlError {
    let kinds: Vec<String> = args.iter().map(|v| v.kind().to_string()).collect();
    debug!("{label} dispatch miss: \"{name}\"({})", kinds.join(", "));
    DispatchError::new(format!(
        "{label} \"{name}\" cannot be invoked on arguments of type: ({})",
        kinds.join(", ")
    ))
    .into()
}
