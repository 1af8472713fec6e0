use super::DocumentStore;
use crate::core::{ID_COLUMN, Row, StoreError, StoreResult, text_eq};
use crate::parser::Predicate;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How `MemoryStore` fills in a missing `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Per-table counter starting at 1.
    #[default]
    Serial,
    /// Random v4 UUID strings.
    Uuid,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    next_id: i64,
}

impl Table {
    fn push(&mut self, mut row: Row, ids: IdStrategy) -> Row {
        match row.get(ID_COLUMN) {
            None | Some(Value::Null) => {
                let id = match ids {
                    IdStrategy::Serial => {
                        self.next_id += 1;
                        Value::from(self.next_id)
                    }
                    IdStrategy::Uuid => Value::String(Uuid::new_v4().to_string()),
                };
                row.insert(ID_COLUMN.to_string(), id);
            }
            Some(id) => self.observe_id(id),
        }
        self.rows.push(row.clone());
        row
    }

    /// Keep the serial counter ahead of any numeric id written by hand.
    fn observe_id(&mut self, id: &Value) {
        if let Some(n) = id.as_i64() {
            self.next_id = self.next_id.max(n);
        }
    }
}

fn matches(row: &Row, filter: Option<&Predicate>) -> bool {
    match filter {
        Some(p) => text_eq(row.get(&p.column).unwrap_or(&Value::Null), &p.value),
        None => true,
    }
}

/// Schemaless in-process store.
///
/// Tables appear on first insert; reading a table that was never written yields no rows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    ids: IdStrategy,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_strategy(ids: IdStrategy) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            ids,
        }
    }

    /// Seed from a `{"table": [row, ...], ...}` document.
    pub fn from_json(document: &Value) -> StoreResult<Self> {
        let tables = document.as_object().ok_or_else(|| {
            StoreError::Decode("seed document must be an object of tables".to_string())
        })?;

        let store = Self::new();
        let mut seeded = HashMap::new();
        for (name, rows) in tables {
            let rows = rows.as_array().ok_or_else(|| {
                StoreError::Decode(format!("seed table '{}' must be an array of rows", name))
            })?;

            let mut table = Table::default();
            for row in rows {
                let row = row.as_object().cloned().ok_or_else(|| {
                    StoreError::Decode(format!("seed table '{}' contains a non-object row", name))
                })?;
                table.push(row, store.ids);
            }
            seeded.insert(name.clone(), table);
        }

        Ok(Self {
            tables: RwLock::new(seeded),
            ..store
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&text)?;
        Self::from_json(&document)
    }

    pub async fn table_names(&self) -> Vec<String> {
        let tables = self.tables.read().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, table: &str, values: &Row) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        Ok(vec![table.push(values.clone(), self.ids)])
    }

    async fn update(&self, table: &str, values: &Row, filter: &Predicate) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in table.rows.iter_mut().filter(|row| matches(row, Some(filter))) {
            for (column, value) in values {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        if let Some(id) = values.get(ID_COLUMN).filter(|_| !updated.is_empty()) {
            table.observe_id(id);
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Predicate) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Row>, Vec<Row>) = std::mem::take(&mut table.rows)
            .into_iter()
            .partition(|row| matches(row, Some(filter)));
        table.rows = kept;
        Ok(removed)
    }

    async fn select(
        &self,
        table: &str,
        filter: Option<&Predicate>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let limit = limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(table
            .rows
            .iter()
            .filter(|row| matches(row, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, table: &str, filter: Option<&Predicate>) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map_or(0, |t| t.rows.iter().filter(|row| matches(row, filter)).count() as u64))
    }
}
