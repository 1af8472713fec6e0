use crate::core::{Result, ShimError};
use std::env;
use std::fmt;
use std::time::Duration;

pub const ENV_STORE_URL: &str = "DOCSQL_STORE_URL";
pub const ENV_STORE_KEY: &str = "DOCSQL_STORE_KEY";
pub const ENV_STORE_SCHEMA: &str = "DOCSQL_STORE_SCHEMA";
pub const ENV_STORE_TIMEOUT_SECS: &str = "DOCSQL_STORE_TIMEOUT_SECS";
pub const ENV_STRICT: &str = "DOCSQL_STRICT";
pub const ENV_FALLBACK_TABLE: &str = "DOCSQL_FALLBACK_TABLE";

/// Table name carried by intents for statements that were not understood.
pub const DEFAULT_FALLBACK_TABLE: &str = "unknown";

/// What the translator does with a statement it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatementPolicy {
    /// Degrade to a no-op and return the call's empty result shape.
    #[default]
    FailSoft,
    /// Return the parse error to the caller.
    Reject,
}

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub unknown_statements: UnknownStatementPolicy,
    pub fallback_table: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            unknown_statements: UnknownStatementPolicy::default(),
            fallback_table: DEFAULT_FALLBACK_TABLE.to_string(),
        }
    }

    /// Shorthand for `unknown_statements(UnknownStatementPolicy::Reject)`.
    pub fn strict() -> Self {
        Self::new().unknown_statements(UnknownStatementPolicy::Reject)
    }

    pub fn unknown_statements(mut self, policy: UnknownStatementPolicy) -> Self {
        self.unknown_statements = policy;
        self
    }

    pub fn fallback_table(mut self, table: &str) -> Self {
        self.fallback_table = table.to_string();
        self
    }

    /// Read `DOCSQL_STRICT` and `DOCSQL_FALLBACK_TABLE`; unset variables keep defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if env::var(ENV_STRICT).is_ok_and(|v| is_truthy(&v)) {
            config.unknown_statements = UnknownStatementPolicy::Reject;
        }
        if let Ok(table) = env::var(ENV_FALLBACK_TABLE) {
            if !table.trim().is_empty() {
                config.fallback_table = table.trim().to_string();
            }
        }
        config
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Connection settings for a REST document store.
#[derive(Clone)]
pub struct StoreConfig {
    /// REST root, e.g. `https://project.example.co/rest/v1`
    pub base_url: String,

    /// Sent as both `apikey` and bearer token
    pub api_key: String,

    /// Non-default schema, sent as a profile header
    pub schema: Option<String>,

    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            schema: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env::var(ENV_STORE_URL)
            .map_err(|_| ShimError::Config(format!("{} is not set", ENV_STORE_URL)))?;
        let api_key = env::var(ENV_STORE_KEY)
            .map_err(|_| ShimError::Config(format!("{} is not set", ENV_STORE_KEY)))?;

        let mut config = Self::new(&base_url, &api_key);
        if let Ok(schema) = env::var(ENV_STORE_SCHEMA) {
            config = config.schema(&schema);
        }
        if let Ok(raw) = env::var(ENV_STORE_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ShimError::Config(format!("invalid {}='{}'", ENV_STORE_TIMEOUT_SECS, raw))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ShimError::Config("base_url cannot be empty".to_string()));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ShimError::Config(format!(
                "base_url must be http(s), got '{}'",
                self.base_url
            )));
        }

        if self.api_key.is_empty() {
            return Err(ShimError::Config("api_key cannot be empty".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(ShimError::Config("timeout must be > 0".to_string()));
        }

        Ok(())
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("schema", &self.schema)
            .field("timeout", &self.timeout)
            .finish()
    }
}
