use super::ExecutionContext;
use crate::core::{ParseError, Result, Row};
use crate::parser::{Intent, Predicate, Verb};
use async_trait::async_trait;
use tracing::{Instrument, Level, event, info_span};

/// Raw store outcome, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreResponse {
    /// Rows returned by a mutation or a list query.
    Rows(Vec<Row>),
    /// Outcome of a single-row lookup; `None` when nothing matched.
    Single(Option<Row>),
    Count(u64),
    /// No store call was made.
    Nothing,
}

#[async_trait]
pub trait Executor: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, intent: &Intent) -> bool;
    async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse>;
}

pub struct ExecutorPipeline {
    executors: Vec<Box<dyn Executor>>,
}

impl ExecutorPipeline {
    pub fn new() -> Self {
        Self {
            executors: Vec::new(),
        }
    }

    pub fn register(&mut self, executor: Box<dyn Executor>) {
        self.executors.push(executor);
    }

    /// Run the first executor that accepts `intent`. Intents nobody handles are no-ops.
    pub async fn execute(&self, intent: &Intent, ctx: &ExecutionContext<'_>) -> Result<StoreResponse> {
        let Some(executor) = self.executors.iter().find(|e| e.can_handle(intent)) else {
            return Ok(StoreResponse::Nothing);
        };

        let span = info_span!(
            "store_call",
            executor = executor.name(),
            store = ctx.store.name(),
            verb = %intent.verb,
            table = %intent.table,
            mode = ctx.mode.as_str()
        );

        async {
            match executor.execute(intent, ctx).await {
                Ok(response) => {
                    event!(Level::DEBUG, "store call completed");
                    Ok(response)
                }
                Err(err) => {
                    event!(Level::ERROR, error = %err, "store call failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl Default for ExecutorPipeline {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn required_predicate(intent: &Intent) -> Result<&Predicate> {
    intent
        .predicate
        .as_ref()
        .ok_or_else(|| ParseError::MissingClause("WHERE").into())
}

pub(crate) fn handles(intent: &Intent, verb: Verb) -> bool {
    intent.verb == verb
}
