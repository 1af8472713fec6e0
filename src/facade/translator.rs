use crate::config::{TranslatorConfig, UnknownStatementPolicy};
use crate::core::{Result, Row, ShimError};
use crate::executor::{CallMode, ExecutionContext, ExecutorPipeline, StoreResponse, default_pipeline};
use crate::parser::{Intent, Predicate, Verb, parse_statement};
use crate::result::{RunResult, normalize_all, normalize_get, normalize_run};
use crate::store::DocumentStore;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

/// Runs constrained SQL statements against a document store.
///
/// Every call is one pipeline: parse the statement into an [`Intent`], make one store
/// round-trip, normalize the response. The translator holds no per-call state, so a
/// single instance (or its clones) can serve concurrent callers.
///
/// # Examples
///
/// ```
/// use docsql::{MemoryStore, Translator};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> docsql::Result<()> {
/// let db = Translator::new(Arc::new(MemoryStore::new()));
///
/// let inserted = db
///     .run("INSERT INTO categories (name) VALUES (?)", &[json!("Weddings")])
///     .await?;
/// assert_eq!(inserted.changes, 1);
///
/// let row = db
///     .get("SELECT * FROM categories WHERE id = ?", &[inserted.id.unwrap()])
///     .await?;
/// assert_eq!(row.unwrap()["name"], json!("Weddings"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Translator {
    store: Arc<dyn DocumentStore>,
    pipeline: Arc<ExecutorPipeline>,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, TranslatorConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: TranslatorConfig) -> Self {
        Self {
            store,
            pipeline: Arc::new(default_pipeline()),
            config,
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Parse without the unknown-statement policy: a statement that is not understood
    /// comes back as `ShimError::Parse`.
    pub fn parse(&self, statement: &str, args: &[Value]) -> Result<Intent> {
        parse_statement(statement, args)
    }

    /// INSERT, UPDATE or DELETE.
    pub async fn run(&self, statement: &str, args: &[Value]) -> Result<RunResult> {
        let intent = self.resolve(statement, args)?;
        check_call(&intent, CallMode::Run)?;
        let response = self.execute_intent(&intent, CallMode::Run).await?;
        Ok(normalize_run(intent.verb, response))
    }

    /// One row (or `{count}` for COUNT); `None` when nothing matched.
    pub async fn get(&self, statement: &str, args: &[Value]) -> Result<Option<Row>> {
        let intent = self.resolve(statement, args)?;
        check_call(&intent, CallMode::Get)?;
        let response = self.execute_intent(&intent, CallMode::Get).await?;
        Ok(normalize_get(response))
    }

    /// Every matching row, capped by LIMIT. Never `None`.
    pub async fn all(&self, statement: &str, args: &[Value]) -> Result<Vec<Row>> {
        let intent = self.resolve(statement, args)?;
        check_call(&intent, CallMode::All)?;
        let response = self.execute_intent(&intent, CallMode::All).await?;
        Ok(normalize_all(response))
    }

    /// Update with the WHERE value passed by name instead of by argument position.
    pub async fn update(
        &self,
        table: &str,
        set_values: Row,
        where_column: &str,
        where_value: Value,
    ) -> Result<RunResult> {
        let intent = Intent::update(table, set_values, Predicate::new(where_column, where_value));
        let response = self.execute_intent(&intent, CallMode::Run).await?;
        Ok(normalize_run(intent.verb, response))
    }

    /// Execute an already-built intent and return the raw store response.
    pub async fn execute_intent(&self, intent: &Intent, mode: CallMode) -> Result<StoreResponse> {
        let ctx = ExecutionContext::new(self.store.as_ref(), mode);
        self.pipeline.execute(intent, &ctx).await
    }

    fn resolve(&self, statement: &str, args: &[Value]) -> Result<Intent> {
        match parse_statement(statement, args) {
            Ok(intent) => {
                debug!("intent: {:?}", intent);
                Ok(intent)
            }
            Err(ShimError::Parse(err))
                if self.config.unknown_statements == UnknownStatementPolicy::FailSoft =>
            {
                warn!("statement not understood, treating as no-op: {}", err);
                Ok(Intent::unknown(self.config.fallback_table.as_str()))
            }
            Err(err) => Err(err),
        }
    }
}

fn check_call(intent: &Intent, mode: CallMode) -> Result<()> {
    let allowed = match (mode, intent.verb) {
        (_, Verb::Unknown) => true,
        (CallMode::Run, verb) => verb.is_mutation(),
        (CallMode::Get | CallMode::All, verb) => verb.is_query(),
    };

    if allowed {
        Ok(())
    } else {
        Err(ShimError::WrongCall {
            verb: intent.verb.as_str(),
            call: mode.as_str(),
        })
    }
}
