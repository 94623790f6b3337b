pub mod comparison;
pub mod dates;
pub mod lists;
pub mod logical;
pub mod numeric;
pub mod operators;
pub mod sequences;
pub mod strings;
pub mod types;

use once_cell::sync::Lazy;

use crate::dispatch::Registry;

/// The `functions` registry: identifier-keyed, shared by every built-in
/// module and by the binary/unary operator tables (which delegate to it by
/// name, e.g. `+` calls `add`).
pub static FUNCTIONS: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new("function");
    numeric::register(&mut registry);
    comparison::register(&mut registry);
    logical::register(&mut registry);
    lists::register(&mut registry);
    sequences::register(&mut registry);
    strings::register(&mut registry);
    dates::register(&mut registry);
    types::register(&mut registry);
    registry
});

/// The `unary_operators` registry: keyed by operator token kind, delegates
/// to `FUNCTIONS`.
pub static UNARY_OPERATORS: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new("unary operator");
    operators::register_unary(&mut registry);
    registry
});

/// The `binary_operators` registry: keyed by operator token kind, delegates
/// to `FUNCTIONS`.
pub static BINARY_OPERATORS: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new("binary operator");
    operators::register_binary(&mut registry);
    registry
});
