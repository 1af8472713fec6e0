//! Token cursor shared by the verb parsers.
//!
//! Tokenizing is delegated to `sqlparser`; the cursor narrows its token set down to
//! what the constrained grammar needs and offers recursive-descent helpers on top.

use crate::core::ParseError;
use serde_json::Value;
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Word { value: String, quoted: bool },
    Number(String),
    Str(String),
    Placeholder,
    LParen,
    RParen,
    Comma,
    Eq,
    Star,
    Minus,
    Period,
    Semicolon,
    Other(String),
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Word { value, .. } => write!(f, "'{}'", value),
            Tok::Number(n) => write!(f, "{}", n),
            Tok::Str(s) => write!(f, "'{}'", s),
            Tok::Placeholder => f.write_str("?"),
            Tok::LParen => f.write_str("("),
            Tok::RParen => f.write_str(")"),
            Tok::Comma => f.write_str(","),
            Tok::Eq => f.write_str("="),
            Tok::Star => f.write_str("*"),
            Tok::Minus => f.write_str("-"),
            Tok::Period => f.write_str("."),
            Tok::Semicolon => f.write_str(";"),
            Tok::Other(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<Token> for Tok {
    fn from(token: Token) -> Self {
        match token {
            Token::Word(word) => Tok::Word {
                value: word.value,
                quoted: word.quote_style.is_some(),
            },
            Token::Number(n, _) => Tok::Number(n),
            Token::SingleQuotedString(s) | Token::DoubleQuotedString(s) => Tok::Str(s),
            Token::Placeholder(p) if p == "?" => Tok::Placeholder,
            Token::LParen => Tok::LParen,
            Token::RParen => Tok::RParen,
            Token::Comma => Tok::Comma,
            Token::Eq => Tok::Eq,
            Token::Mul => Tok::Star,
            Token::Minus => Tok::Minus,
            Token::Period => Tok::Period,
            Token::SemiColon => Tok::Semicolon,
            other => Tok::Other(other.to_string()),
        }
    }
}

/// Right-hand side of a column assignment or comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Placeholder,
    Literal(Value),
}

impl ValueExpr {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ValueExpr::Placeholder)
    }
}

pub fn tokenize(statement: &str) -> Result<Vec<Tok>, ParseError> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, statement)
        .tokenize()
        .map_err(|e| ParseError::Tokenize(e.to_string()))?;

    Ok(tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
        .map(Tok::from)
        .collect())
}

pub struct Cursor {
    tokens: Vec<Tok>,
    pos: usize,
}

impl Cursor {
    pub fn new(statement: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(statement)?,
            pos: 0,
        })
    }

    pub fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    pub fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    pub fn check(&self, tok: &Tok) -> bool {
        self.peek() == Some(tok)
    }

    pub fn eat(&mut self, tok: &Tok) -> bool {
        if self.check(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, tok: &Tok) -> Result<(), ParseError> {
        if self.eat(tok) {
            Ok(())
        } else {
            Err(self.unexpected(&tok.to_string()))
        }
    }

    /// True if the next token is the unquoted keyword `kw`.
    pub fn check_kw(&self, kw: &str) -> bool {
        matches!(
            self.peek(),
            Some(Tok::Word { value, quoted: false }) if value.eq_ignore_ascii_case(kw)
        )
    }

    pub fn eat_kw(&mut self, kw: &str) -> bool {
        if self.check_kw(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_kw(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            Err(self.unexpected(kw))
        }
    }

    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Tok::Word { value, .. }) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Table name, optionally schema-qualified.
    pub fn parse_table_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.parse_identifier()?;
        while self.eat(&Tok::Period) {
            name.push('.');
            name.push_str(&self.parse_identifier()?);
        }
        Ok(name)
    }

    /// `?` or a literal. Literals are unquoted but otherwise kept as text;
    /// only a bare `NULL` becomes JSON null.
    pub fn parse_value_expr(&mut self) -> Result<ValueExpr, ParseError> {
        let expr = match self.peek() {
            Some(Tok::Placeholder) => ValueExpr::Placeholder,
            Some(Tok::Str(s)) => ValueExpr::Literal(Value::String(s.clone())),
            Some(Tok::Number(n)) => ValueExpr::Literal(Value::String(n.clone())),
            Some(Tok::Minus) => {
                self.pos += 1;
                return match self.advance() {
                    Some(Tok::Number(n)) => Ok(ValueExpr::Literal(Value::String(format!("-{}", n)))),
                    _ => Err(self.unexpected("number")),
                };
            }
            Some(Tok::Word { value, quoted: false }) if value.eq_ignore_ascii_case("NULL") => {
                ValueExpr::Literal(Value::Null)
            }
            Some(Tok::Word { value, .. }) => ValueExpr::Literal(Value::String(value.clone())),
            _ => return Err(self.unexpected("value or '?'")),
        };
        self.pos += 1;
        Ok(expr)
    }

    /// `col = <value-or-?>`
    pub fn parse_equality(&mut self) -> Result<(String, ValueExpr), ParseError> {
        let column = self.parse_identifier()?;
        self.expect(&Tok::Eq)?;
        let value = self.parse_value_expr()?;
        Ok((column, value))
    }

    pub fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.eat(&Tok::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Accepts an optional trailing `;` and requires nothing after it.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        self.eat(&Tok::Semicolon);
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of statement"))
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self
                .peek()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "end of statement".to_string()),
        }
    }
}
