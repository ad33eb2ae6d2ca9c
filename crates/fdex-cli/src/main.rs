//! Command line interface for the FacturaDirecta export pipeline.
//!
//! Every command needs the database, so the pool is opened once here and
//! closed after the command finishes, whether it succeeded or not.

mod check;
mod export;
mod report;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fdex-cli")]
#[command(about = "Export ERP clients and suppliers to FacturaDirecta import CSVs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch records, map them, and write chunked import CSV files
    Export {
        #[arg(value_enum)]
        target: Target,

        /// Preview what would be exported without writing any files
        #[arg(long)]
        dry_run: bool,
    },
    /// Print per-country record counts
    Stats {
        #[arg(value_enum)]
        target: Target,
    },
    /// Group distinct localities by detected country and flag likely misses
    Analyze,
    /// Dump the distinct locality values as JSON
    Localities,
    /// Verify connectivity and show sample classifications
    Check,
}

/// Which source table a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Target {
    Clients,
    Suppliers,
}

impl Target {
    pub(crate) fn kind(self) -> fdex_core::RecordKind {
        match self {
            Target::Clients => fdex_core::RecordKind::Client,
            Target::Suppliers => fdex_core::RecordKind::Supplier,
        }
    }

    pub(crate) fn noun(self) -> &'static str {
        match self {
            Target::Clients => "clients",
            Target::Suppliers => "suppliers",
        }
    }
}

pub(crate) async fn fetch_records(
    pool: &sqlx::MySqlPool,
    target: Target,
) -> anyhow::Result<Vec<fdex_core::SourceRecord>> {
    let records = match target {
        Target::Clients => fdex_db::fetch_clients(pool).await?,
        Target::Suppliers => fdex_db::fetch_suppliers(pool).await?,
    };
    Ok(records)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fdex_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let pool =
        fdex_db::connect_pool(&config.database_url, fdex_db::PoolConfig::from(&config)).await?;

    let result = dispatch(cli.command, &pool, &config).await;
    pool.close().await;
    result
}

async fn dispatch(
    command: Commands,
    pool: &sqlx::MySqlPool,
    config: &fdex_core::AppConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Export { target, dry_run } => export::run(pool, config, target, dry_run).await,
        Commands::Stats { target } => report::run_stats(pool, target).await,
        Commands::Analyze => report::run_analyze(pool).await,
        Commands::Localities => report::run_localities(pool).await,
        Commands::Check => check::run(pool).await,
    }
}
