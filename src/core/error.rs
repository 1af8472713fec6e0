use thiserror::Error;

/// Statement text that the parser could not turn into an intent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unrecognized statement: {0}")]
    Unrecognized(String),

    #[error("Tokenizer error: {0}")]
    Tokenize(String),

    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Column count ({columns}) does not match value count ({values})")]
    ColumnValueMismatch { columns: usize, values: usize },

    #[error("Invalid LIMIT: {0}")]
    InvalidLimit(String),

    #[error("Statement is missing its {0} clause")]
    MissingClause(&'static str),
}

/// Argument list that does not line up with the statement's placeholders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Statement binds {expected} argument(s), {supplied} supplied")]
    CountMismatch { expected: usize, supplied: usize },

    #[error("No argument at position {index} ({supplied} supplied)")]
    MissingArgument { index: usize, supplied: usize },
}

/// Failures reported by a document store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("No row found in '{table}'")]
    NotFound { table: String },

    #[error("Store returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{verb} statements cannot be used with {call}()")]
    WrongCall { verb: &'static str, call: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShimError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
