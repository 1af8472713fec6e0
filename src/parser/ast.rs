use crate::core::Row;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Insert,
    Update,
    Delete,
    Select,
    Count,
    Unknown,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Select => "SELECT",
            Self::Count => "COUNT",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Select | Self::Count)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single supported `WHERE col = value` filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// Normalized instruction produced from one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    pub verb: Verb,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_values: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Predicate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl Intent {
    pub fn insert(table: impl Into<String>, values: Row) -> Self {
        Self {
            values: Some(values),
            ..Self::bare(Verb::Insert, table)
        }
    }

    pub fn update(table: impl Into<String>, set_values: Row, predicate: Predicate) -> Self {
        Self {
            set_values: Some(set_values),
            predicate: Some(predicate),
            ..Self::bare(Verb::Update, table)
        }
    }

    pub fn delete(table: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            predicate: Some(predicate),
            ..Self::bare(Verb::Delete, table)
        }
    }

    pub fn select(table: impl Into<String>, predicate: Option<Predicate>, limit: Option<u64>) -> Self {
        Self {
            predicate,
            limit,
            ..Self::bare(Verb::Select, table)
        }
    }

    pub fn count(table: impl Into<String>, predicate: Option<Predicate>) -> Self {
        Self {
            predicate,
            ..Self::bare(Verb::Count, table)
        }
    }

    /// No-op intent for statements that were not understood.
    pub fn unknown(fallback_table: impl Into<String>) -> Self {
        Self::bare(Verb::Unknown, fallback_table)
    }

    fn bare(verb: Verb, table: impl Into<String>) -> Self {
        Self {
            verb,
            table: table.into(),
            values: None,
            set_values: None,
            predicate: None,
            limit: None,
        }
    }
}
