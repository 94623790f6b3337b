use crate::error::LexerError;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Hand-rolled, longest-match lexer over a `Vec<char>` source buffer.
/// Restartable by constructing a fresh `Lexer` and calling `tokenize`
/// again; `line`/`line_start` give `column = current - line_start`.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 0,
            line_start: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn column(&self) -> usize {
        self.pos - self.line_start
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\x0b') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.line_start = self.pos;
                }
                _ => break,
            }
        }
    }

    fn make_token(
        &self,
        kind: TokenKind,
        line: usize,
        column: usize,
        lexeme: impl Into<String>,
        literal: Option<Value>,
    ) -> Token {
        let lexeme = lexeme.into();
        let length = lexeme.chars().count();
        Token::new(kind, lexeme, literal, line, column, length)
    }

    fn error_at(&self, line: usize, column: usize, message: impl Into<String>) -> LexerError {
        LexerError {
            message: message.into(),
            line,
            column,
        }
    }

    fn two_char(
        &mut self,
        first: char,
        second: char,
        one: TokenKind,
        two: TokenKind,
        line: usize,
        column: usize,
    ) -> Result<Token, LexerError> {
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            Ok(self.make_token(two, line, column, format!("{first}{second}"), None))
        } else {
            Ok(self.make_token(one, line, column, first.to_string(), None))
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();
        let (line, column) = (self.line, self.column());

        let Some(c) = self.peek() else {
            return Ok(Token::eof(line, column));
        };

        match c {
            '+' => {
                self.advance();
                Ok(self.make_token(TokenKind::Plus, line, column, "+", None))
            }
            '-' => {
                self.advance();
                Ok(self.make_token(TokenKind::Minus, line, column, "-", None))
            }
            '/' => {
                self.advance();
                Ok(self.make_token(TokenKind::Slash, line, column, "/", None))
            }
            '%' => {
                self.advance();
                Ok(self.make_token(TokenKind::Percent, line, column, "%", None))
            }
            '&' => {
                self.advance();
                Ok(self.make_token(TokenKind::Ampersand, line, column, "&", None))
            }
            '|' => {
                self.advance();
                Ok(self.make_token(TokenKind::Pipe, line, column, "|", None))
            }
            '^' => {
                self.advance();
                Ok(self.make_token(TokenKind::Caret, line, column, "^", None))
            }
            '(' => {
                self.advance();
                Ok(self.make_token(TokenKind::LeftParen, line, column, "(", None))
            }
            ')' => {
                self.advance();
                Ok(self.make_token(TokenKind::RightParen, line, column, ")", None))
            }
            '[' => {
                self.advance();
                Ok(self.make_token(TokenKind::LeftBracket, line, column, "[", None))
            }
            ']' => {
                self.advance();
                Ok(self.make_token(TokenKind::RightBracket, line, column, "]", None))
            }
            ',' => {
                self.advance();
                Ok(self.make_token(TokenKind::Comma, line, column, ",", None))
            }
            '$' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dollar, line, column, "$", None))
            }
            ':' => {
                self.advance();
                Ok(self.make_token(TokenKind::Colon, line, column, ":", None))
            }
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Period, line, column, ".", None))
            }
            '*' => {
                self.advance();
                if self.peek() == Some('*') {
                    self.advance();
                    Ok(self.make_token(TokenKind::StarStar, line, column, "**", None))
                } else {
                    Ok(self.make_token(TokenKind::Star, line, column, "*", None))
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::EqualEqual, line, column, "==", None))
                } else {
                    Err(self.error_at(line, column, "unexpected character '='"))
                }
            }
            '!' => self.two_char('!', '=', TokenKind::Bang, TokenKind::BangEqual, line, column),
            '<' => self.two_char('<', '=', TokenKind::Less, TokenKind::LessEqual, line, column),
            '>' => {
                self.two_char('>', '=', TokenKind::Greater, TokenKind::GreaterEqual, line, column)
            }
            '\'' => self.string(line, column),
            c if c.is_ascii_digit() => self.number(line, column),
            c if c.is_ascii_alphabetic() => Ok(self.identifier(line, column)),
            other => Err(self.error_at(line, column, format!("unexpected character '{other}'"))),
        }
    }

    fn string(&mut self, line: usize, column: usize) -> Result<Token, LexerError> {
        let start = self.pos;
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error_at(line, column, "unterminated string")),
                Some('\'') => break,
                Some('\\') if self.peek() == Some('\'') => {
                    value.push('\'');
                    self.advance();
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                        self.line_start = self.pos;
                    }
                    value.push(c);
                }
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        Ok(self.make_token(TokenKind::String, line, column, lexeme, Some(Value::string(value))))
    }

    fn number(&mut self, line: usize, column: usize) -> Result<Token, LexerError> {
        let start = self.pos;
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                return Err(self.error_at(line, column, "incomplete float literal"));
            }
        }

        let lexeme: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            let parsed: f64 = lexeme
                .parse()
                .map_err(|_| self.error_at(line, column, "malformed float literal"))?;
            Ok(self.make_token(TokenKind::Float, line, column, lexeme, Some(Value::float(parsed))))
        } else {
            let parsed: i64 = lexeme
                .parse()
                .map_err(|_| self.error_at(line, column, "malformed integer literal"))?;
            Ok(self.make_token(
                TokenKind::Integer,
                line,
                column,
                lexeme,
                Some(Value::integer(parsed)),
            ))
        }
    }

    fn identifier(&mut self, line: usize, column: usize) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let (kind, literal) = match lexeme.as_str() {
            "True" => (TokenKind::True, Some(Value::boolean(true))),
            "False" => (TokenKind::False, Some(Value::boolean(false))),
            "Null" => (TokenKind::Null, Some(Value::Untyped)),
            _ => (TokenKind::Identifier, None),
        };
        self.make_token(kind, line, column, lexeme, literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn longest_match_star_star() {
        assert_eq!(kinds("2 ** 3"), vec![
            TokenKind::Integer,
            TokenKind::StarStar,
            TokenKind::Integer,
            TokenKind::Eof
        ]);
    }

    #[test]
    fn bare_equal_is_an_error() {
        assert!(Lexer::new("foo=#").tokenize().is_err());
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::new("'foo").tokenize().is_err());
    }

    #[test]
    fn incomplete_float_exponent_is_an_error() {
        assert!(Lexer::new("123e").tokenize().is_err());
    }

    #[test]
    fn trailing_dot_is_not_a_float() {
        let tokens = Lexer::new("1.").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Period);
    }

    #[test]
    fn escaped_quote_does_not_terminate_string() {
        let tokens = Lexer::new(r"'it\'s'").tokenize().unwrap();
        assert_eq!(tokens[0].literal, Some(Value::string("it's")));
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(kinds("True False Null")[..3], [
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null
        ]);
        assert_eq!(kinds("true")[0], TokenKind::Identifier);
    }

    #[test]
    fn line_and_column_track_newlines() {
        let tokens = Lexer::new("1\n  22").tokenize().unwrap();
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].column, 2);
    }
}
