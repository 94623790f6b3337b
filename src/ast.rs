use crate::error::NodeLoc;
use crate::token::Token;
use crate::value::Value;

/// The closed set of AST node variants. Every variant carries
/// `start_token`/`end_token` so an evaluation error at that node can report
/// a precise source span.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        value: Value,
        start_token: Token,
        end_token: Token,
    },
    Variable {
        name: String,
        start_token: Token,
        end_token: Token,
    },
    Grouping {
        inner: Box<Expr>,
        start_token: Token,
        end_token: Token,
    },
    List {
        elements: Vec<Expr>,
        start_token: Token,
        end_token: Token,
    },
    Unary {
        op: Token,
        operand: Box<Expr>,
        start_token: Token,
        end_token: Token,
    },
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
        start_token: Token,
        end_token: Token,
    },
    Function {
        name: Token,
        args: Vec<Expr>,
        start_token: Token,
        end_token: Token,
    },
    /// A single subscript or a slice. Exactly one of `index` or
    /// (`start`/`end`) is populated, never both.
    Indexing {
        target: Box<Expr>,
        index: Option<Box<Expr>>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        start_token: Token,
        end_token: Token,
    },
    Property {
        target: Box<Expr>,
        name: Token,
        start_token: Token,
        end_token: Token,
    },
}

impl Expr {
    pub fn start_token(&self) -> &Token {
        match self {
            Expr::Literal { start_token, .. }
            | Expr::Variable { start_token, .. }
            | Expr::Grouping { start_token, .. }
            | Expr::List { start_token, .. }
            | Expr::Unary { start_token, .. }
            | Expr::Binary { start_token, .. }
            | Expr::Function { start_token, .. }
            | Expr::Indexing { start_token, .. }
            | Expr::Property { start_token, .. } => start_token,
        }
    }

    pub fn end_token(&self) -> &Token {
        match self {
            Expr::Literal { end_token, .. }
            | Expr::Variable { end_token, .. }
            | Expr::Grouping { end_token, .. }
            | Expr::List { end_token, .. }
            | Expr::Unary { end_token, .. }
            | Expr::Binary { end_token, .. }
            | Expr::Function { end_token, .. }
            | Expr::Indexing { end_token, .. }
            | Expr::Property { end_token, .. } => end_token,
        }
    }

    pub fn loc(&self) -> NodeLoc {
        NodeLoc::new(self.start_token(), self.end_token())
    }

    /// Recursive, indented debug text, for pretty-printing an AST during
    /// development.
    pub fn pretty(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        match self {
            Expr::Literal { value, .. } => format!("{pad}Literal({value:?})"),
            Expr::Variable { name, .. } => format!("{pad}Variable(${name})"),
            Expr::Grouping { inner, .. } => {
                format!("{pad}Grouping(\n{}\n{pad})", inner.pretty(indent + 2))
            }
            Expr::List { elements, .. } => {
                let body: Vec<String> =
                    elements.iter().map(|e| e.pretty(indent + 2)).collect();
                format!("{pad}List(\n{}\n{pad})", body.join(",\n"))
            }
            Expr::Unary { op, operand, .. } => {
                format!(
                    "{pad}Unary({:?},\n{}\n{pad})",
                    op.kind,
                    operand.pretty(indent + 2)
                )
            }
            Expr::Binary { left, op, right, .. } => format!(
                "{pad}Binary(\n{},\n{pad}  {:?},\n{}\n{pad})",
                left.pretty(indent + 2),
                op.kind,
                right.pretty(indent + 2)
            ),
            Expr::Function { name, args, .. } => {
                let body: Vec<String> = args.iter().map(|e| e.pretty(indent + 2)).collect();
                format!("{pad}Function({}, \n{}\n{pad})", name.lexeme, body.join(",\n"))
            }
            Expr::Indexing { target, index, start, end, .. } => {
                let suffix = if let Some(index) = index {
                    format!("index=\n{}", index.pretty(indent + 2))
                } else {
                    format!(
                        "start={}, end={}",
                        start.as_ref().map(|e| e.pretty(0)).unwrap_or_default(),
                        end.as_ref().map(|e| e.pretty(0)).unwrap_or_default()
                    )
                };
                format!(
                    "{pad}Indexing(\n{},\n{pad}  {}\n{pad})",
                    target.pretty(indent + 2),
                    suffix
                )
            }
            Expr::Property { target, name, .. } => {
                format!(
                    "{pad}Property(\n{},\n{pad}  .{}\n{pad})",
                    target.pretty(indent + 2),
                    name.lexeme
                )
            }
        }
    }
}
