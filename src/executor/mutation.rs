use super::executor::{Executor, StoreResponse, handles, required_predicate};
use super::ExecutionContext;
use crate::core::{Result, Row};
use crate::parser::{Intent, Verb};
use async_trait::async_trait;

pub struct InsertExecutor;

#[async_trait]
impl Executor for InsertExecutor {
    fn name(&self) -> &'static str {
        "INSERT"
    }

    fn can_handle(&self, intent: &Intent) -> bool {
        handles(intent, Verb::Insert)
    }

    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let empty = Row::new();
        let values = intent.values.as_ref().unwrap_or(&empty);
        let rows = ctx.store.insert(&intent.table, values).await?;
        Ok(StoreResponse::Rows(rows))
    }
}

pub struct UpdateExecutor;

#[async_trait]
impl Executor for UpdateExecutor {
    fn name(&self) -> &'static str {
        "UPDATE"
    }

    fn can_handle(&self, intent: &Intent) -> bool {
        handles(intent, Verb::Update)
    }

    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let predicate = required_predicate(intent)?;
        let empty = Row::new();
        let values = intent.set_values.as_ref().unwrap_or(&empty);
        let rows = ctx.store.update(&intent.table, values, predicate).await?;
        Ok(StoreResponse::Rows(rows))
    }
}

pub struct DeleteExecutor;

#[async_trait]
impl Executor for DeleteExecutor {
    fn name(&self) -> &'static str {
        "DELETE"
    }

    fn can_handle(&self, intent: &Intent) -> bool {
        handles(intent, Verb::Delete)
    }

    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let predicate = required_predicate(intent)?;
        let rows = ctx.store.delete(&intent.table, predicate).await?;
        Ok(StoreResponse::Rows(rows))
    }
}
