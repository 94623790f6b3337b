use crate::builtins::FUNCTIONS;
use crate::dispatch::Registry;
use crate::error::BexlError;
use crate::token::TokenKind;
use crate::value::{Kind, Value};

/// Maps an operator token kind to the name the binary/unary operator
/// registries are keyed by and the `functions` registry name it delegates
/// to — both are the same string here, since operators desugar to named
/// calls during evaluation.
pub fn unary_name(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Minus => Some("negative"),
        TokenKind::Bang => Some("not"),
        _ => None,
    }
}

pub fn binary_name(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Plus => Some("add"),
        TokenKind::Minus => Some("subtract"),
        TokenKind::Star => Some("multiply"),
        TokenKind::Slash => Some("divide"),
        TokenKind::Percent => Some("modulo"),
        TokenKind::StarStar => Some("pow"),
        TokenKind::Ampersand => Some("and"),
        TokenKind::Pipe => Some("or"),
        TokenKind::Caret => Some("xor"),
        TokenKind::EqualEqual => Some("equal"),
        TokenKind::BangEqual => Some("notEqual"),
        TokenKind::Less => Some("lesser"),
        TokenKind::LessEqual => Some("lesserEqual"),
        TokenKind::Greater => Some("greater"),
        TokenKind::GreaterEqual => Some("greaterEqual"),
        _ => None,
    }
}

macro_rules! delegate {
    ($fn_name:ident, $target:expr) => {
        fn $fn_name(args: &[Value]) -> Result<Value, BexlError> {
            FUNCTIONS.call($target, args)
        }
    };
}

delegate!(negative_op, "negative");
delegate!(not_op, "not");
delegate!(add_op, "add");
delegate!(subtract_op, "subtract");
delegate!(multiply_op, "multiply");
delegate!(divide_op, "divide");
delegate!(modulo_op, "modulo");
delegate!(pow_op, "pow");
delegate!(and_op, "and");
delegate!(or_op, "or");
delegate!(xor_op, "xor");
delegate!(equal_op, "equal");
delegate!(not_equal_op, "notEqual");
delegate!(lesser_op, "lesser");
delegate!(lesser_equal_op, "lesserEqual");
delegate!(greater_op, "greater");
delegate!(greater_equal_op, "greaterEqual");

const NUMERIC_PAIRS: [(Kind, Kind); 4] = [
    (Kind::Integer, Kind::Integer),
    (Kind::Integer, Kind::Float),
    (Kind::Float, Kind::Integer),
    (Kind::Float, Kind::Float),
];

pub fn register_unary(registry: &mut Registry) {
    registry.signature("negative", vec![Kind::Integer], negative_op);
    registry.signature("negative", vec![Kind::Float], negative_op);
    registry.signature("not", vec![Kind::Boolean], not_op);
}

pub fn register_binary(registry: &mut Registry) {
    for (a, b) in NUMERIC_PAIRS {
        registry.signature("add", vec![a, b], add_op);
        registry.signature("subtract", vec![a, b], subtract_op);
        registry.signature("multiply", vec![a, b], multiply_op);
        registry.signature("divide", vec![a, b], divide_op);
        registry.signature("modulo", vec![a, b], modulo_op);
        registry.signature("pow", vec![a, b], pow_op);
    }

    for n in [Kind::Integer, Kind::Float] {
        registry.signature("add", vec![Kind::Date, n], add_op);
        registry.signature("subtract", vec![Kind::Date, n], subtract_op);
        registry.signature("add", vec![Kind::Time, n], add_op);
        registry.signature("subtract", vec![Kind::Time, n], subtract_op);
        registry.signature("add", vec![Kind::Datetime, n], add_op);
        registry.signature("subtract", vec![Kind::Datetime, n], subtract_op);
    }
    registry.signature("subtract", vec![Kind::Date, Kind::Date], subtract_op);
    registry.signature("subtract", vec![Kind::Date, Kind::Datetime], subtract_op);
    registry.signature("subtract", vec![Kind::Datetime, Kind::Date], subtract_op);
    registry.signature("subtract", vec![Kind::Datetime, Kind::Datetime], subtract_op);
    registry.signature("subtract", vec![Kind::Time, Kind::Time], subtract_op);

    registry.variadic("and", 2, Some(2), and_op);
    registry.variadic("or", 2, Some(2), or_op);
    registry.variadic("xor", 2, Some(2), xor_op);
    registry.variadic("equal", 2, Some(2), equal_op);
    registry.variadic("notEqual", 2, Some(2), not_equal_op);
    registry.variadic("lesser", 2, Some(2), lesser_op);
    registry.variadic("lesserEqual", 2, Some(2), lesser_equal_op);
    registry.variadic("greater", 2, Some(2), greater_op);
    registry.variadic("greaterEqual", 2, Some(2), greater_equal_op);
}
