//! Statement classification and parsing.
//!
//! `parse_statement` classifies the text, hands it to the matching verb parser and
//! binds `?` placeholders, producing an [`Intent`].

pub mod ast;
pub mod binder;
pub mod classifier;
mod delete;
mod insert;
pub mod lexer;
mod select;
mod update;

pub use ast::{Intent, Predicate, Verb};
pub use binder::ParameterBinder;
pub use classifier::classify;

use crate::core::{ParseError, Result};
use log::debug;
use serde_json::Value;

const ECHO_LIMIT: usize = 64;

pub fn parse_statement(statement: &str, args: &[Value]) -> Result<Intent> {
    let verb = classify(statement);
    debug!("classified statement as {}: {}", verb, statement.trim());

    let binder = ParameterBinder::new(args);
    match verb {
        Verb::Insert => insert::parse_insert(statement, &binder),
        Verb::Update => update::parse_update(statement, &binder),
        Verb::Delete => delete::parse_delete(statement, &binder),
        Verb::Select | Verb::Count => select::parse_select(statement, verb, &binder),
        Verb::Unknown => Err(ParseError::Unrecognized(echo(statement)).into()),
    }
}

fn echo(statement: &str) -> String {
    let trimmed = statement.trim();
    match trimmed.char_indices().nth(ECHO_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
