//! Load a legacy inventory workbook into the SQLite store.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use stockbook_api::config::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS};
use stockbook_infra::import::{xlsx, Importer, UnknownProductPolicy};
use stockbook_infra::SqliteStore;
use stockbook_observability::LogFormat;

#[derive(Parser)]
#[command(name = "stockbook-import")]
#[command(about = "Import products, receipts and dispatches from an inventory workbook")]
struct Cli {
    /// Workbook with the FD NAME MASTER, Inward Qty and Despatch Qty sheets
    #[arg(long, default_value = "inventory_data.xlsx")]
    workbook: PathBuf,

    /// SQLite database URL (created if missing)
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Reject movement rows naming a product missing from the master sheet
    /// instead of registering it
    #[arg(long)]
    reject_unknown_products: bool,

    /// Human-readable log output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    stockbook_observability::init(if cli.pretty {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    });

    // The workbook is read in full before the database is touched.
    let batch = xlsx::read_workbook(&cli.workbook)
        .with_context(|| format!("failed to read {}", cli.workbook.display()))?;

    let store = SqliteStore::connect(&cli.database_url, DEFAULT_MAX_CONNECTIONS)
        .await
        .with_context(|| format!("failed to open {}", cli.database_url))?;

    let policy = if cli.reject_unknown_products {
        UnknownProductPolicy::Reject
    } else {
        UnknownProductPolicy::AutoRegister
    };

    let report = Importer::new(store.clone(), policy)
        .run(batch)
        .await
        .context("import aborted")?;
    store.pool().close().await;

    println!(
        "products: {} registered, {} already present, {} auto-registered",
        report.products_registered, report.products_already_present, report.products_auto_registered
    );
    println!(
        "movements: {} inward, {} dispatch imported; {} blank rows skipped, {} rows rejected",
        report.inward_imported, report.outward_imported, report.blank_rows_skipped, report.rows_rejected
    );
    Ok(())
}
