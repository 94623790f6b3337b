use bexl::{evaluate, BexlError, Value, VariableResolver};

fn eval(source: &str) -> Result<Value, BexlError> {
    evaluate(source, &VariableResolver::new())
}

fn eval_with(source: &str, resolver: &VariableResolver) -> Result<Value, BexlError> {
    evaluate(source, resolver)
}

#[test]
fn lexer_rejects_a_bare_equal_sign() {
    assert!(matches!(eval("foo=#"), Err(BexlError::Lexer(_))));
}

#[test]
fn lexer_rejects_an_unterminated_string() {
    assert!(matches!(eval("'foo"), Err(BexlError::Lexer(_))));
}

#[test]
fn lexer_rejects_an_incomplete_float_exponent() {
    assert!(matches!(eval("123e"), Err(BexlError::Lexer(_))));
}

#[test]
fn parser_rejects_trailing_tokens() {
    assert!(matches!(eval("1]"), Err(BexlError::Parser(_))));
}

#[test]
fn parser_rejects_an_unterminated_call_without_close_paren() {
    assert!(matches!(eval("foo("), Err(BexlError::Parser(_))));
}

#[test]
fn parser_rejects_an_unterminated_call_with_dangling_argument() {
    assert!(matches!(eval("foo(1"), Err(BexlError::Parser(_))));
}

#[test]
fn resolver_rejects_an_unbound_variable() {
    assert!(matches!(eval("$test"), Err(BexlError::Resolver(_))));
}

#[test]
fn property_access_on_a_missing_field_is_an_execution_error() {
    assert!(matches!(
        eval("record('foo', 123).bar"),
        Err(BexlError::Execution(_))
    ));
}

#[test]
fn unary_not_rejects_a_non_boolean_operand() {
    assert!(matches!(eval("!12"), Err(BexlError::Dispatch(_))));
}

#[test]
fn indexing_rejects_a_non_sequence_target() {
    assert!(matches!(eval("123[1]"), Err(BexlError::Dispatch(_))));
}

#[test]
fn slicing_rejects_a_non_sequence_target() {
    assert!(matches!(eval("123[1:2]"), Err(BexlError::Dispatch(_))));
}

#[test]
fn string_plus_integer_has_no_matching_signature() {
    assert!(matches!(eval("'foo'+123"), Err(BexlError::Dispatch(_))));
}

#[test]
fn calling_an_unknown_function_is_a_dispatch_error() {
    assert!(matches!(eval("doesntexist()"), Err(BexlError::Dispatch(_))));
}

#[test]
fn arithmetic_honors_precedence_and_associativity() {
    assert_eq!(eval("1 + 2 * 3").unwrap(), Value::integer(7));
    assert_eq!(eval("10 - 3 - 2").unwrap(), Value::integer(5));
}

#[test]
fn list_literals_index_and_slice() {
    assert_eq!(eval("[1,2,3][1]").unwrap(), Value::integer(2));
    assert_eq!(eval("[1,2,3][1:]").unwrap(), Value::list(vec![Value::integer(2), Value::integer(3)]));
    assert_eq!(eval("[1,2,3][:2]").unwrap(), Value::list(vec![Value::integer(1), Value::integer(2)]));
}

#[test]
fn if_picks_the_first_true_branch_else_the_fallback() {
    assert_eq!(eval("if(True, 'a', False, 'b', 'c')").unwrap(), Value::string("a"));
    assert_eq!(eval("if(False, 'a', True, 'b', 'c')").unwrap(), Value::string("b"));
    assert_eq!(eval("if(False, 'a', False, 'b', 'c')").unwrap(), Value::string("c"));
}

#[test]
fn switch_compares_the_subject_against_each_case() {
    assert_eq!(eval("switch(2, 1, 'one', 2, 'two', 'other')").unwrap(), Value::string("two"));
    assert_eq!(eval("switch(9, 1, 'one', 2, 'two', 'other')").unwrap(), Value::string("other"));
}

#[test]
fn record_property_access_reads_the_named_field() {
    assert_eq!(eval("record('x', 1, 'y', 2).y").unwrap(), Value::integer(2));
}

#[test]
fn invalid_calendar_date_is_a_conversion_error() {
    assert!(matches!(eval("date('2020-02-30')"), Err(BexlError::Conversion(_))));
}

#[test]
fn unknown_variable_is_a_resolver_error() {
    assert!(matches!(eval("$missing"), Err(BexlError::Resolver(_))));
}

#[test]
fn average_of_an_empty_list_is_untyped_null() {
    assert!(eval("average([])").unwrap().is_null());
}

#[test]
fn sum_widens_to_float_when_any_element_is_float() {
    assert_eq!(eval("sum([1, 2.0, 3])").unwrap(), Value::float(6.0));
}

#[test]
fn variables_resolve_through_the_injected_resolver() {
    let mut resolver = VariableResolver::new();
    resolver.set("price", Value::float(19.5));
    resolver.set("quantity", Value::integer(3));
    assert_eq!(eval_with("$price * $quantity", &resolver).unwrap(), Value::float(58.5));
}

#[test]
fn coalesce_returns_the_first_non_null_argument() {
    assert_eq!(eval("coalesce(Null, Null, 5)").unwrap(), Value::integer(5));
}

#[test]
fn string_builtins_trim_and_change_case() {
    assert_eq!(eval("upper(trim('  hi  '))").unwrap(), Value::string("HI"));
}

#[test]
fn in_on_a_null_haystack_is_false() {
    assert_eq!(eval("in(1, Null)").unwrap(), Value::boolean(false));
}

#[test]
fn head_and_tail_default_to_length_one() {
    assert_eq!(eval("head([1,2,3])").unwrap(), Value::list(vec![Value::integer(1)]));
    assert_eq!(eval("tail([1,2,3])").unwrap(), Value::list(vec![Value::integer(3)]));
}
