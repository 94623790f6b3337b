use crate::ast::Expr;
use crate::error::{BexlError, ParserError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Recursive-descent, single-pass, no-backtracking parser following the
/// fixed-precedence grammar (low to high): boolean, comparison, term,
/// factor, unary, primary+suffix.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn parse(source: &str) -> Result<Expr, BexlError> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expression()?;
        if !parser.is_at_end() {
            let token = parser.peek().clone();
            return Err(ParserError {
                message: format!("unexpected token \"{}\"", token.lexeme),
                token,
            }
            .into());
        }
        Ok(expr)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParserError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParserError {
                message: message.to_string(),
                token: self.peek().clone(),
            })
        }
    }

    fn expression(&mut self) -> Result<Expr, ParserError> {
        self.boolean()
    }

    fn boolean(&mut self) -> Result<Expr, ParserError> {
        self.binary_level(
            Self::comparison,
            &[TokenKind::Ampersand, TokenKind::Pipe, TokenKind::Caret],
        )
    }

    fn comparison(&mut self) -> Result<Expr, ParserError> {
        self.binary_level(
            Self::term,
            &[
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
        )
    }

    fn term(&mut self) -> Result<Expr, ParserError> {
        self.binary_level(Self::factor, &[TokenKind::Plus, TokenKind::Minus])
    }

    fn factor(&mut self) -> Result<Expr, ParserError> {
        self.binary_level(
            Self::unary,
            &[
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::StarStar,
                TokenKind::Percent,
            ],
        )
    }

    /// Generic left-associative binary level shared by boolean/comparison/term/factor.
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, ParserError>,
        ops: &[TokenKind],
    ) -> Result<Expr, ParserError> {
        let mut left = next(self)?;
        while let Some(op) = self.match_any(ops) {
            let right = next(self)?;
            let start_token = left.start_token().clone();
            let end_token = right.end_token().clone();
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                start_token,
                end_token,
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParserError> {
        if let Some(op) = self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let operand = self.unary()?;
            let start_token = op.clone();
            let end_token = operand.end_token().clone();
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                start_token,
                end_token,
            });
        }

        let mut expr = self.primary()?;
        loop {
            if self.check(TokenKind::LeftBracket) {
                expr = self.suffix_index(expr)?;
            } else if self.check(TokenKind::Period) {
                expr = self.suffix_property(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn suffix_property(&mut self, target: Expr) -> Result<Expr, ParserError> {
        self.advance(); // '.'
        let name = self.expect(TokenKind::Identifier, "expected property name after '.'")?;
        let start_token = target.start_token().clone();
        Ok(Expr::Property {
            target: Box::new(target),
            name: name.clone(),
            start_token,
            end_token: name,
        })
    }

    /// `[ (expression | expression? ':' expression?) ]`: exactly one of
    /// `index` or `start`/`end` ends up populated.
    fn suffix_index(&mut self, target: Expr) -> Result<Expr, ParserError> {
        self.advance(); // '['
        let start_token = target.start_token().clone();

        if self.check(TokenKind::Colon) {
            self.advance();
            let end = if self.check(TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(self.expression()?))
            };
            let close = self.expect(TokenKind::RightBracket, "expected ']'")?;
            return Ok(Expr::Indexing {
                target: Box::new(target),
                index: None,
                start: None,
                end,
                start_token,
                end_token: close,
            });
        }

        let first = self.expression()?;

        if self.check(TokenKind::Colon) {
            self.advance();
            let end = if self.check(TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(self.expression()?))
            };
            let close = self.expect(TokenKind::RightBracket, "expected ']'")?;
            return Ok(Expr::Indexing {
                target: Box::new(target),
                index: None,
                start: Some(Box::new(first)),
                end,
                start_token,
                end_token: close,
            });
        }

        let close = self.expect(TokenKind::RightBracket, "expected ']'")?;
        Ok(Expr::Indexing {
            target: Box::new(target),
            index: Some(Box::new(first)),
            start: None,
            end: None,
            start_token,
            end_token: close,
        })
    }

    fn primary(&mut self) -> Result<Expr, ParserError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False => {
                self.advance();
                let value = token.literal.clone().unwrap();
                Ok(Expr::Literal {
                    value,
                    start_token: token.clone(),
                    end_token: token,
                })
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal {
                    value: Value::Untyped,
                    start_token: token.clone(),
                    end_token: token,
                })
            }
            TokenKind::Dollar => {
                self.advance();
                let name_token =
                    self.expect(TokenKind::Identifier, "expected variable name after '$'")?;
                Ok(Expr::Variable {
                    name: name_token.lexeme.clone(),
                    start_token: token,
                    end_token: name_token,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                self.expect(TokenKind::LeftParen, "expected '(' after function name")?;
                let args = self.args(TokenKind::RightParen)?;
                let close = self.expect(TokenKind::RightParen, "expected ')'")?;
                Ok(Expr::Function {
                    name: token.clone(),
                    args,
                    start_token: token,
                    end_token: close,
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                let close = self.expect(TokenKind::RightParen, "expected ')'")?;
                Ok(Expr::Grouping {
                    inner: Box::new(inner),
                    start_token: token,
                    end_token: close,
                })
            }
            TokenKind::LeftBracket => {
                self.advance();
                let elements = self.args(TokenKind::RightBracket)?;
                let close = self.expect(TokenKind::RightBracket, "expected ']'")?;
                Ok(Expr::List {
                    elements,
                    start_token: token,
                    end_token: close,
                })
            }
            _ => Err(ParserError {
                message: format!("unexpected token \"{}\"", token.lexeme),
                token,
            }),
        }
    }

    fn args(&mut self, terminator: TokenKind) -> Result<Vec<Expr>, ParserError> {
        let mut args = Vec::new();
        if self.check(terminator) {
            return Ok(args);
        }
        args.push(self.expression()?);
        while self.check(TokenKind::Comma) {
            self.advance();
            args.push(self.expression()?);
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expr {
        Parser::parse(source).unwrap()
    }

    #[test]
    fn precedence_multiply_over_add() {
        // a + b * c parses with the multiply nested under the add's right side.
        match parse("1 + 2 * 3") {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op.kind, TokenKind::Plus);
                assert!(matches!(*right, Expr::Binary { .. }));
            }
            _ => panic!("expected Binary"),
        }
    }

    #[test]
    fn left_associative_subtraction() {
        // (a - b) - c: the left child of the outer Binary is itself a Binary.
        match parse("1 - 2 - 3") {
            Expr::Binary { left, .. } => assert!(matches!(*left, Expr::Binary { .. })),
            _ => panic!("expected Binary"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_power() {
        // -a ** b == (-a) ** b
        match parse("-1 ** 2") {
            Expr::Binary { left, .. } => assert!(matches!(*left, Expr::Unary { .. })),
            _ => panic!("expected Binary"),
        }
    }

    #[test]
    fn bare_index_vs_slice() {
        assert!(matches!(
            parse("[1,2,3][1]"),
            Expr::Indexing { index: Some(_), .. }
        ));
        assert!(matches!(
            parse("[1,2,3][1:]"),
            Expr::Indexing { index: None, start: Some(_), end: None, .. }
        ));
        assert!(matches!(
            parse("[1,2,3][:2]"),
            Expr::Indexing { index: None, start: None, end: Some(_), .. }
        ));
    }

    #[test]
    fn trailing_tokens_are_a_parser_error() {
        assert!(Parser::parse("1]").is_err());
    }

    #[test]
    fn unterminated_call_is_a_parser_error() {
        assert!(Parser::parse("foo(").is_err());
        assert!(Parser::parse("foo(1").is_err());
    }
}
