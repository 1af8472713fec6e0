use super::ast::{Intent, Verb};
use super::binder::ParameterBinder;
use super::delete::bind_where;
use super::lexer::{Cursor, Tok};
use crate::core::{ParseError, Result};
use std::result::Result as StdResult;

/// `SELECT <cols-or-*> FROM <table> [WHERE <col> = ?] [LIMIT <int>]`
///
/// The projection is skipped: rows always come back with every column. `verb` is the
/// classifier's verdict and decides between a row query and a count.
pub fn parse_select(statement: &str, verb: Verb, binder: &ParameterBinder<'_>) -> Result<Intent> {
    let mut cursor = Cursor::new(statement)?;
    cursor.expect_kw("SELECT")?;
    skip_projection(&mut cursor)?;
    cursor.expect_kw("FROM")?;
    let table = cursor.parse_table_name()?;

    let filter = if cursor.eat_kw("WHERE") {
        Some(cursor.parse_equality()?)
    } else {
        None
    };

    let limit = if cursor.eat_kw("LIMIT") {
        Some(parse_limit(&mut cursor)?)
    } else {
        None
    };
    cursor.expect_end()?;

    let predicate = match filter {
        Some((column, expr)) => Some(bind_where(column, expr, binder)?),
        None => {
            binder.expect_count(0)?;
            None
        }
    };

    Ok(match verb {
        Verb::Count => Intent::count(table, predicate),
        _ => Intent::select(table, predicate, limit),
    })
}

fn skip_projection(cursor: &mut Cursor) -> StdResult<(), ParseError> {
    let mut depth = 0usize;
    let mut consumed = 0usize;
    loop {
        if depth == 0 && cursor.check_kw("FROM") {
            break;
        }
        match cursor.advance() {
            Some(Tok::LParen) => depth += 1,
            Some(Tok::RParen) => depth = depth.saturating_sub(1),
            Some(_) => {}
            None => return Err(cursor.unexpected("FROM")),
        }
        consumed += 1;
    }

    if consumed == 0 {
        return Err(cursor.unexpected("column list"));
    }
    Ok(())
}

fn parse_limit(cursor: &mut Cursor) -> StdResult<u64, ParseError> {
    match cursor.advance() {
        Some(Tok::Number(n)) => n.parse::<u64>().map_err(|_| ParseError::InvalidLimit(n)),
        Some(other) => Err(ParseError::InvalidLimit(other.to_string())),
        None => Err(ParseError::InvalidLimit("missing value".to_string())),
    }
}
