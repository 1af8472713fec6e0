pub mod context;
pub mod executor;
mod mutation;
mod query;

pub use context::{CallMode, ExecutionContext};
pub use executor::{Executor, ExecutorPipeline, StoreResponse};
pub use mutation::{DeleteExecutor, InsertExecutor, UpdateExecutor};
pub use query::{CountExecutor, SelectExecutor};

/// Pipeline with one executor per supported verb.
pub fn default_pipeline() -> ExecutorPipeline {
    let mut pipeline = ExecutorPipeline::new();
    pipeline.register(Box::new(InsertExecutor));
    pipeline.register(Box::new(UpdateExecutor));
    pipeline.register(Box::new(DeleteExecutor));
    pipeline.register(Box::new(SelectExecutor));
    pipeline.register(Box::new(CountExecutor));
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Row, ShimError, StoreError, StoreResult};
    use crate::parser::{Intent, Predicate};
    use crate::store::{DocumentStore, MemoryStore};
    use async_trait::async_trait;
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn insert(&self, _: &str, _: &Row) -> StoreResult<Vec<Row>> {
            Err(StoreError::Transport("connection refused".into()))
        }

        async fn update(&self, _: &str, _: &Row, _: &Predicate) -> StoreResult<Vec<Row>> {
            Err(StoreError::Transport("connection refused".into()))
        }

        async fn delete(&self, _: &str, _: &Predicate) -> StoreResult<Vec<Row>> {
            Err(StoreError::Transport("connection refused".into()))
        }

        async fn select(&self, _: &str, _: Option<&Predicate>, _: Option<u64>) -> StoreResult<Vec<Row>> {
            Err(StoreError::Transport("connection refused".into()))
        }

        async fn count(&self, _: &str, _: Option<&Predicate>) -> StoreResult<u64> {
            Err(StoreError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_unknown_intent_makes_no_store_call() {
        let pipeline = default_pipeline();
        let ctx = ExecutionContext::new(&BrokenStore, CallMode::Run);

        let response = pipeline.execute(&Intent::unknown("unknown"), &ctx).await.unwrap();
        assert_eq!(response, StoreResponse::Nothing);
    }

    #[tokio::test]
    async fn test_get_suppresses_not_found() {
        let pipeline = default_pipeline();
        let store = MemoryStore::new();
        let ctx = ExecutionContext::new(&store, CallMode::Get);

        let intent = Intent::select("users", Some(Predicate::new("role", json!("admin"))), None);
        let response = pipeline.execute(&intent, &ctx).await.unwrap();
        assert_eq!(response, StoreResponse::Single(None));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let pipeline = default_pipeline();
        let ctx = ExecutionContext::new(&BrokenStore, CallMode::Get);

        let intent = Intent::select("users", None, None);
        let err = pipeline.execute(&intent, &ctx).await.unwrap_err();
        assert!(matches!(err, ShimError::Store(StoreError::Transport(_))));
    }

    #[tokio::test]
    async fn test_update_without_predicate_is_rejected() {
        let pipeline = default_pipeline();
        let store = MemoryStore::new();
        let ctx = ExecutionContext::new(&store, CallMode::Run);

        let mut intent = Intent::update("t", Row::new(), Predicate::new("id", json!(1)));
        intent.predicate = None;
        let err = pipeline.execute(&intent, &ctx).await.unwrap_err();
        assert!(matches!(err, ShimError::Parse(_)));
    }
}
