use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use pay_stream::application::PayStream;
use pay_stream::config::AppConfig;
use pay_stream::domain::security::{ROLE_TRANSACTION_CREATOR, TenantId};
use pay_stream::domain::transaction::BulkTransactionDraft;
use pay_stream::interfaces::api::filters::{ROLES_HEADER, TENANT_HEADER, USER_HEADER};
use pay_stream::interfaces::api::{ApiRequest, Method, PayStreamApi};
use pay_stream::interfaces::csv::transaction_reader::TransactionReader;
use pay_stream::interfaces::script::{RequestReader, ResponseWriter};
use pay_stream::telemetry;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Prefix for hypermedia links in responses
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines request script, printing one response per line
    Replay {
        script: PathBuf,
    },
    /// Create one transaction batch from a CSV file
    Import {
        input: PathBuf,

        /// Tenant the batch is created in
        #[arg(long)]
        tenant: String,

        /// User recorded as the batch creator
        #[arg(long)]
        user: String,

        /// Request script replayed first (e.g. to register banks); its
        /// responses are discarded
        #[arg(long)]
        setup: Option<PathBuf>,
    },
}

#[cfg(feature = "storage-rocksdb")]
fn open_app(db_path: Option<&Path>) -> Result<PayStream> {
    use pay_stream::domain::ports::SystemClock;
    use pay_stream::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            info!(path = %path.display(), "using RocksDB storage");
            Ok(PayStream::new(
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store),
                Box::new(SystemClock),
            ))
        }
        None => Ok(PayStream::in_memory()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_app(db_path: Option<&Path>) -> Result<PayStream> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(PayStream::in_memory())
}

async fn replay<W: Write>(
    api: &PayStreamApi,
    script: &Path,
    writer: &mut ResponseWriter<W>,
) -> Result<()> {
    let file = File::open(script).into_diagnostic()?;
    let reader = RequestReader::new(BufReader::new(file));

    for request in reader.requests() {
        match request {
            Ok(request) => {
                let response = api.handle(request).await;
                writer.write_response(&response).into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading request: {}", e);
            }
        }
    }
    writer.flush().into_diagnostic()
}

async fn import(
    api: &PayStreamApi,
    input: &Path,
    tenant: &str,
    user: &str,
    setup: Option<&Path>,
) -> Result<()> {
    if let Some(setup) = setup {
        replay(api, setup, &mut ResponseWriter::new(io::sink())).await?;
    }

    let tenant = TenantId::new(tenant).into_diagnostic()?;
    let file = File::open(input).into_diagnostic()?;

    let mut bulk = BulkTransactionDraft {
        transactions: Vec::new(),
    };
    for draft in TransactionReader::new(file).drafts() {
        match draft {
            Ok(draft) => bulk.transactions.push(draft),
            Err(e) => eprintln!("Error reading transaction: {}", e),
        }
    }

    let request = ApiRequest::new(Method::Post, "/api/v1/transactions/bulk")
        .header(TENANT_HEADER, tenant.as_str())
        .header(USER_HEADER, user)
        .header(ROLES_HEADER, ROLE_TRANSACTION_CREATOR)
        .json(serde_json::to_value(&bulk).into_diagnostic()?);
    let response = api.handle(request).await;

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());
    writer.write_response(&response).into_diagnostic()?;
    writer.flush().into_diagnostic()?;

    if response.status >= 400 {
        return Err(miette::miette!("import failed with status {}", response.status));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = Some(db_path);
    }
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    telemetry::init(&config.logging, cli.verbose).into_diagnostic()?;

    let app = open_app(config.storage.db_path.as_deref())?;
    let api = PayStreamApi::new(app, &config.server.base_url);
    info!(base_url = %config.server.base_url, "api ready");

    match cli.command {
        Command::Replay { script } => {
            let stdout = io::stdout();
            replay(&api, &script, &mut ResponseWriter::new(stdout.lock())).await
        }
        Command::Import {
            input,
            tenant,
            user,
            setup,
        } => import(&api, &input, &tenant, &user, setup.as_deref()).await,
    }
}
