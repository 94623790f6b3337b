use std::collections::HashMap;

use crate::error::ResolverError;
use crate::value::Value;

/// A name → Value mapping injected per evaluation call. Resolvers are
/// mutable by design but the evaluator itself never mutates them; callers
/// sharing one resolver across threads must synchronize externally.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    values: HashMap<String, Value>,
}

impl VariableResolver {
    pub fn new() -> Self {
        VariableResolver {
            values: HashMap::new(),
        }
    }

    pub fn from_map(map: HashMap<String, Value>) -> Self {
        VariableResolver { values: map }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The resolver-as-function lookup; unknown names raise `ResolverError`.
    pub fn resolve(&self, name: &str) -> Result<Value, ResolverError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ResolverError::new(format!("unknown variable \"{name}\"")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variable_is_an_error() {
        let resolver = VariableResolver::new();
        assert!(resolver.resolve("missing").is_err());
    }

    #[test]
    fn known_variable_resolves() {
        let mut resolver = VariableResolver::new();
        resolver.set("x", Value::integer(1));
        assert_eq!(resolver.resolve("x").unwrap(), Value::integer(1));
    }
}
