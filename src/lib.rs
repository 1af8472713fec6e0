// ============================================================================
// docsql: constrained SQL over schemaless document stores
// ============================================================================
//
// Code written against a `run/get/all` SQL interface keeps working when the
// backing store is a REST document store with no SQL dialect of its own.
// Supported statements:
//
//   INSERT INTO <table> (<col>, ...) VALUES (<val-or-?>, ...)
//   UPDATE <table> SET <col> = <val-or-?>, ... WHERE <col> = ?
//   DELETE FROM <table> WHERE <col> = ?
//   SELECT <cols-or-*> FROM <table> [WHERE <col> = ?] [LIMIT <int>]
//   SELECT COUNT(*) FROM <table> [WHERE <col> = ?]

pub mod config;
pub mod core;
pub mod executor;
pub mod facade;
pub mod parser;
pub mod result;
pub mod store;

pub use config::{StoreConfig, TranslatorConfig, UnknownStatementPolicy};
pub use core::{BindingError, ParseError, Result, Row, ShimError, StoreError};
pub use executor::CallMode;
pub use facade::Translator;
pub use parser::{Intent, Predicate, Verb};
pub use result::{CountResult, RunResult};
pub use store::{DocumentStore, IdStrategy, MemoryStore, RestStore};
