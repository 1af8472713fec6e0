use super::executor::{Executor, StoreResponse, handles};
use super::{CallMode, ExecutionContext};
use crate::core::Result;
use crate::parser::{Intent, Verb};
use async_trait::async_trait;
use log::debug;

pub struct SelectExecutor;

#[async_trait]
impl Executor for SelectExecutor {
    fn name(&self) -> &'static str {
        "SELECT"
    }

    fn can_handle(&self, intent: &Intent) -> bool {
        handles(intent, Verb::Select)
    }

    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let filter = intent.predicate.as_ref();

        if ctx.mode == CallMode::Get {
            return match ctx.store.select_single(&intent.table, filter).await {
                Ok(row) => Ok(StoreResponse::Single(Some(row))),
                Err(err) if err.is_not_found() => {
                    debug!("no row in '{}' for single lookup", intent.table);
                    Ok(StoreResponse::Single(None))
                }
                Err(err) => Err(err.into()),
            };
        }

        let rows = ctx.store.select(&intent.table, filter, intent.limit).await?;
        Ok(StoreResponse::Rows(rows))
    }
}

pub struct CountExecutor;

#[async_trait]
impl Executor for CountExecutor {
    fn name(&self) -> &'static str {
        "COUNT"
    }

    fn can_handle(&self, intent: &Intent) -> bool {
        handles(intent, Verb::Count)
    }

    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let count = ctx
            .store
            .count(&intent.table, intent.predicate.as_ref())
            .await?;
        Ok(StoreResponse::Count(count))
    }
}
