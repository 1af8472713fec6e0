use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docsql::{
    CallMode, DocumentStore, MemoryStore, RestStore, StoreConfig, Translator, TranslatorConfig,
    UnknownStatementPolicy,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docsql")]
#[command(about = "Run constrained SQL statements against a REST document store")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Fail on statements that cannot be parsed instead of returning empty results
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StoreArgs {
    /// Use an in-memory store instead of the REST store
    #[arg(long, global = true)]
    memory: bool,

    /// JSON file of `{"table": [rows]}` used to seed the in-memory store
    #[arg(long, global = true, requires = "memory")]
    seed: Option<PathBuf>,

    /// REST root (falls back to DOCSQL_STORE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// API key (falls back to DOCSQL_STORE_KEY)
    #[arg(long, global = true)]
    key: Option<String>,

    #[arg(long, global = true)]
    schema: Option<String>,

    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// INSERT / UPDATE / DELETE
    Run(StatementArgs),
    /// First matching row, or COUNT(*)
    Get(StatementArgs),
    /// Every matching row
    All(StatementArgs),
    /// Print the parsed intent without touching the store
    Explain(StatementArgs),
}

#[derive(Args)]
struct StatementArgs {
    statement: String,

    /// Bind values; JSON literals, anything else is taken as a string
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TranslatorConfig::from_env();
    if cli.strict {
        config = config.unknown_statements(UnknownStatementPolicy::Reject);
    }

    let (mode, stmt) = match cli.command {
        Command::Explain(stmt) => {
            let intent = docsql::parser::parse_statement(&stmt.statement, &bind_values(&stmt.args))?;
            return print_json(&intent);
        }
        Command::Run(stmt) => (CallMode::Run, stmt),
        Command::Get(stmt) => (CallMode::Get, stmt),
        Command::All(stmt) => (CallMode::All, stmt),
    };

    let store = open_store(&cli.store)?;
    let db = Translator::with_config(store, config);
    let args = bind_values(&stmt.args);

    match mode {
        CallMode::Run => print_json(&db.run(&stmt.statement, &args).await?),
        CallMode::Get => print_json(&db.get(&stmt.statement, &args).await?),
        CallMode::All => print_json(&db.all(&stmt.statement, &args).await?),
    }
}

fn open_store(args: &StoreArgs) -> Result<Arc<dyn DocumentStore>> {
    if args.memory {
        let store = match &args.seed {
            Some(path) => MemoryStore::from_json_file(path)
                .with_context(|| format!("load seed file {}", path.display()))?,
            None => MemoryStore::new(),
        };
        return Ok(Arc::new(store));
    }

    let mut config = match (&args.url, &args.key) {
        (Some(url), Some(key)) => StoreConfig::new(url, key),
        _ => StoreConfig::from_env().context("REST store needs --url/--key or DOCSQL_STORE_URL/DOCSQL_STORE_KEY")?,
    };
    if let Some(schema) = &args.schema {
        config = config.schema(schema);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.timeout(Duration::from_secs(secs));
    }

    tracing::debug!(?config, "opening REST store");
    Ok(Arc::new(RestStore::new(config)?))
}

fn bind_values(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
