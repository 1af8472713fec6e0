//! Keyword scan that decides which verb parser a statement goes to.

use super::ast::Verb;
use super::lexer::{Tok, tokenize};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INSERT_INTO: Regex = Regex::new(r"(?i)\bINSERT\s+INTO\b").unwrap();
    static ref UPDATE: Regex = Regex::new(r"(?i)\bUPDATE\b").unwrap();
    static ref DELETE_FROM: Regex = Regex::new(r"(?i)\bDELETE\s+FROM\b").unwrap();
    static ref SELECT: Regex = Regex::new(r"(?i)\bSELECT\b").unwrap();
    static ref COUNT_STAR: Regex = Regex::new(r"(?i)\bCOUNT\s*\(\s*\*\s*\)").unwrap();
    static ref FROM: Regex = Regex::new(r"(?i)\bFROM\b").unwrap();
}

/// Classify a statement by keyword presence.
///
/// Precedence is INSERT INTO, UPDATE, DELETE FROM, SELECT. A SELECT whose projection
/// holds `COUNT(*)` is a COUNT. Keywords inside string literals or quoted identifiers
/// are ignored. Never fails: anything else is `Verb::Unknown`.
pub fn classify(statement: &str) -> Verb {
    let text = keyword_skeleton(statement).unwrap_or_else(|| statement.to_string());
    let text = text.as_str();

    if INSERT_INTO.is_match(text) {
        Verb::Insert
    } else if UPDATE.is_match(text) {
        Verb::Update
    } else if DELETE_FROM.is_match(text) {
        Verb::Delete
    } else if let Some(select) = SELECT.find(text) {
        let rest = &text[select.end()..];
        let projection = match FROM.find(rest) {
            Some(from) => &rest[..from.start()],
            None => rest,
        };
        if COUNT_STAR.is_match(projection) {
            Verb::Count
        } else {
            Verb::Select
        }
    } else {
        Verb::Unknown
    }
}

/// The statement with every literal and quoted identifier blanked out, so only bare
/// keywords and punctuation remain. `None` when the text does not tokenize; the raw
/// text is scanned instead and the verb parser reports the tokenizer error.
fn keyword_skeleton(statement: &str) -> Option<String> {
    let tokens = tokenize(statement).ok()?;
    let parts: Vec<String> = tokens
        .into_iter()
        .map(|tok| match tok {
            Tok::Word { value, quoted: false } => value,
            Tok::Word { quoted: true, .. } => "\"_\"".to_string(),
            Tok::Str(_) => "''".to_string(),
            Tok::Number(_) => "0".to_string(),
            Tok::Other(_) => "_".to_string(),
            symbol => symbol.to_string(),
        })
        .collect();
    Some(parts.join(" "))
}
