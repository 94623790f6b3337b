use crate::ast::Expr;
use crate::builtins::{operators, BINARY_OPERATORS, FUNCTIONS, UNARY_OPERATORS};
use crate::clock::{Clock, SystemClock};
use crate::error::{BexlError, DispatchError, ExecutionError};
use crate::resolver::VariableResolver;
use crate::value::Value;

/// Walks an [`Expr`] tree and produces a [`Value`], dispatching operators and
/// function calls through the shared registries. `today()`/`now()` bypass
/// the registry to read the injected clock instead.
pub struct Interpreter {
    clock: Box<dyn Clock>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter { clock: Box::new(SystemClock) }
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Interpreter { clock }
    }

    pub fn eval(&self, node: &Expr, resolver: &VariableResolver) -> Result<Value, BexlError> {
        self.eval_inner(node, resolver).map_err(|e| e.with_node(node.loc()))
    }

    fn eval_inner(&self, node: &Expr, resolver: &VariableResolver) -> Result<Value, BexlError> {
        match node {
            Expr::Literal { value, .. } => Ok(value.clone()),

            Expr::Variable { name, .. } => Ok(resolver.resolve(name)?),

            Expr::Grouping { inner, .. } => self.eval(inner, resolver),

            Expr::List { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, resolver)?);
                }
                Ok(Value::list(values))
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.eval(operand, resolver)?;
                let Some(name) = operators::unary_name(op.kind) else {
                    return Err(ExecutionError::new(format!("unknown unary operator {:?}", op.kind)).into());
                };
                UNARY_OPERATORS.call(name, &[value])
            }

            Expr::Binary { left, op, right, .. } => {
                let left_value = self.eval(left, resolver)?;
                let right_value = self.eval(right, resolver)?;
                let Some(name) = operators::binary_name(op.kind) else {
                    return Err(ExecutionError::new(format!("unknown binary operator {:?}", op.kind)).into());
                };
                BINARY_OPERATORS.call(name, &[left_value, right_value])
            }

            Expr::Function { name, args, .. } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, resolver)?);
                }
                match name.lexeme.as_str() {
                    "today" if values.is_empty() => Ok(Value::date(self.clock.today())),
                    "now" if values.is_empty() => Ok(Value::datetime(self.clock.now())),
                    _ => FUNCTIONS.call(&name.lexeme, &values),
                }
            }

            Expr::Indexing { target, index, start, end, .. } => {
                let target_value = self.eval(target, resolver)?;
                if let Some(index) = index {
                    let index_value = self.eval(index, resolver)?;
                    FUNCTIONS.call("at", &[target_value, index_value])
                } else {
                    let start_value = match start {
                        Some(e) => self.eval(e, resolver)?,
                        None => Value::integer(0),
                    };
                    match end {
                        Some(e) => {
                            let end_value = self.eval(e, resolver)?;
                            FUNCTIONS.call("slice", &[target_value, start_value, end_value])
                        }
                        None => FUNCTIONS.call("slice", &[target_value, start_value]),
                    }
                }
            }

            Expr::Property { target, name, .. } => {
                let target_value = self.eval(target, resolver)?;
                if target_value.kind() != crate::value::Kind::Record && !target_value.is_null() {
                    return Err(DispatchError::new("property access requires a record").into());
                }
                FUNCTIONS.call("property", &[target_value, Value::string(name.lexeme.clone())])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval(source: &str) -> Result<Value, BexlError> {
        let ast = Parser::parse(source)?;
        Interpreter::new().eval(&ast, &VariableResolver::new())
    }

    #[test]
    fn arithmetic_follows_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::integer(7));
    }

    #[test]
    fn string_plus_integer_is_a_dispatch_error() {
        assert!(matches!(eval("'foo' + 123"), Err(BexlError::Dispatch(_))));
    }

    #[test]
    fn list_indexing_is_zero_based() {
        assert_eq!(eval("[1,2,3][1]").unwrap(), Value::integer(2));
    }

    #[test]
    fn record_property_access() {
        assert_eq!(eval("record('x', 1, 'y', 2).y").unwrap(), Value::integer(2));
    }

    #[test]
    fn unknown_variable_is_resolver_error() {
        assert!(matches!(eval("$missing"), Err(BexlError::Resolver(_))));
    }

    #[test]
    fn average_of_empty_list_is_untyped_null() {
        let v = eval("average([])").unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn sum_widens_to_float_when_any_element_is_float() {
        assert_eq!(eval("sum([1, 2.0, 3])").unwrap(), Value::float(6.0));
    }

    #[test]
    fn if_picks_first_true_branch() {
        assert_eq!(eval("if(True, 'a', False, 'b', 'c')").unwrap(), Value::string("a"));
        assert_eq!(eval("if(False, 'a', True, 'b', 'c')").unwrap(), Value::string("b"));
        assert_eq!(eval("if(False, 'a', False, 'b', 'c')").unwrap(), Value::string("c"));
    }

    #[test]
    fn invalid_date_literal_is_conversion_error() {
        assert!(matches!(eval("date('2020-02-30')"), Err(BexlError::Conversion(_))));
    }

    #[test]
    fn variables_resolve_from_the_injected_resolver() {
        let ast = Parser::parse("$x + 1").unwrap();
        let mut resolver = VariableResolver::new();
        resolver.set("x", Value::integer(41));
        assert_eq!(Interpreter::new().eval(&ast, &resolver).unwrap(), Value::integer(42));
    }
}
