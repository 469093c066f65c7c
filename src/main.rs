use dotenvy::dotenv;
use mess_ledger::{
    cli::{self, Settings, terminal::Terminal},
    config::{
        database::{create_connection, create_tables, get_database_url},
        mess::{config_path, load_config_or_default},
    },
    core::{blob::SqliteBlobStore, store::LedgerStore},
    errors::Result,
};
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load rates, ledger key and menu
    let config = load_config_or_default(config_path())
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let settings = Settings::from_config(&config)?;

    // 4. Open the database and make sure the blob table exists
    let db = create_connection(&get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Load the ledger; load problems are reported, never fatal
    let (mut store, status) = LedgerStore::load(SqliteBlobStore::new(db), &config.ledger_key).await;

    // 6. Run the menu over stdin/stdout
    let stdin = io::stdin();
    let mut term = Terminal::new(stdin.lock(), io::stdout());
    term.report(&status)?;
    cli::run(&mut store, &settings, &mut term).await
}
