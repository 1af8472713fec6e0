//! Result Normalizer: store responses into the caller-facing shapes.

use crate::core::{Row, row_id};
use crate::executor::StoreResponse;
use crate::parser::Verb;
use serde::Serialize;
use serde_json::Value;

/// Outcome of `run`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunResult {
    /// Id of the first affected row; always `None` for DELETE
    pub id: Option<Value>,
    pub changes: u64,
}

impl RunResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResult {
    pub count: u64,
}

impl CountResult {
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        row.insert("count".to_string(), Value::from(self.count));
        row
    }
}

pub fn normalize_run(verb: Verb, response: StoreResponse) -> RunResult {
    let rows = match response {
        StoreResponse::Rows(rows) => rows,
        StoreResponse::Single(row) => row.into_iter().collect(),
        StoreResponse::Count(_) | StoreResponse::Nothing => return RunResult::empty(),
    };

    let id = match verb {
        Verb::Insert | Verb::Update => rows.first().and_then(row_id),
        _ => None,
    };
    RunResult {
        id,
        changes: rows.len() as u64,
    }
}

pub fn normalize_get(response: StoreResponse) -> Option<Row> {
    match response {
        StoreResponse::Single(row) => row,
        StoreResponse::Rows(rows) => rows.into_iter().next(),
        StoreResponse::Count(count) => Some(CountResult { count }.into_row()),
        StoreResponse::Nothing => None,
    }
}

pub fn normalize_all(response: StoreResponse) -> Vec<Row> {
    match response {
        StoreResponse::Rows(rows) => rows,
        StoreResponse::Single(row) => row.into_iter().collect(),
        StoreResponse::Count(count) => vec![CountResult { count }.into_row()],
        StoreResponse::Nothing => Vec::new(),
    }
}
