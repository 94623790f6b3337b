use crate::token::Token;
use crate::value::{Kind, Value};

/// Source location attached to a runtime error so callers can recover
/// `start_token`/`end_token` for display, mirroring what an AST node carries.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLoc {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub end_length: usize,
}

impl NodeLoc {
    pub fn new(start: &Token, end: &Token) -> Self {
        NodeLoc {
            start_line: start.line,
            start_column: start.column,
            end_line: end.line,
            end_column: end.column,
            end_length: end.length,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{message} (line {line}, column {column})")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{message} (line {}, column {})", token.line, token.column)]
pub struct ParserError {
    pub message: String,
    pub token: Token,
}

impl ParserError {
    pub fn line(&self) -> usize {
        self.token.line
    }

    pub fn column(&self) -> usize {
        self.token.column
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{message}")]
pub struct ResolverError {
    pub message: String,
    pub node: Option<NodeLoc>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{message}")]
pub struct DispatchError {
    pub message: String,
    pub node: Option<NodeLoc>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("cannot convert {value:?} to {target_kind:?}")]
pub struct ConversionError {
    pub value: Value,
    pub target_kind: Kind,
    pub node: Option<NodeLoc>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
    pub node: Option<NodeLoc>,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        ResolverError {
            message: message.into(),
            node: None,
        }
    }
}

impl DispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        DispatchError {
            message: message.into(),
            node: None,
        }
    }
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        ExecutionError {
            message: message.into(),
            node: None,
        }
    }
}

impl ConversionError {
    pub fn new(value: Value, target_kind: Kind) -> Self {
        ConversionError {
            value,
            target_kind,
            node: None,
        }
    }
}

/// The closed error taxonomy. Phase errors (`Lexer`/`Parser`) are never
/// caught by the evaluator; interpreter-phase errors are decorated with
/// the innermost AST node whose evaluation first raised them.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum BexlError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl BexlError {
    /// Attaches `node` to the error, unless it already carries a more
    /// precise (innermost) location.
    pub fn with_node(self, node: NodeLoc) -> Self {
        match self {
            BexlError::Resolver(mut e) => {
                if e.node.is_none() {
                    e.node = Some(node);
                }
                BexlError::Resolver(e)
            }
            BexlError::Dispatch(mut e) => {
                if e.node.is_none() {
                    e.node = Some(node);
                }
                BexlError::Dispatch(e)
            }
            BexlError::Conversion(mut e) => {
                if e.node.is_none() {
                    e.node = Some(node);
                }
                BexlError::Conversion(e)
            }
            BexlError::Execution(mut e) => {
                if e.node.is_none() {
                    e.node = Some(node);
                }
                BexlError::Execution(e)
            }
            other => other,
        }
    }
}
