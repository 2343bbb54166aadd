use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use tox_import::app::ports::RecordStorePort;
use tox_import::config::Config;
use tox_import::constants::PREVIEW_ROWS;
use tox_import::infra::SupabaseStore;
use tox_import::logging;
use tox_import::observability;
use tox_import::pipeline::ingestion::{render_preview, CsvSource};
use tox_import::pipeline::processing::process_row;
use tox_import::pipeline::Pipeline;
use tox_import::storage::InMemoryStore;

#[derive(Parser)]
#[command(name = "tox_import")]
#[command(about = "Import acute toxicity (chicken oral LD50) data into Supabase")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./import.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every row of the CSV file into the store
    Import {
        /// CSV file to import
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Target table
        #[arg(long)]
        table: Option<String>,
        /// Supabase project URL
        #[arg(long)]
        url: Option<String>,
        /// HTTP timeout per request
        #[arg(long)]
        timeout_seconds: Option<u64>,
        /// Build and account for records without writing to Supabase
        #[arg(long)]
        dry_run: bool,
        /// Exit with a non-zero status if any record failed
        #[arg(long)]
        fail_on_error: bool,
        /// Write the run's Prometheus metrics to this file when done
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },
    /// Show columns, the first rows, and the records they would produce
    Preview {
        /// CSV file to preview
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Number of rows to show
        #[arg(long, default_value_t = PREVIEW_ROWS)]
        rows: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let guard = logging::init_logging();
    observability::init_metrics();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Import aborted: {:#}", e);
            println!("❌ {:#}", e);
            1
        }
    };

    // flush the file log before exiting
    drop(guard);
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();

    match cli.command {
        Commands::Import {
            csv,
            table,
            url,
            timeout_seconds,
            dry_run,
            fail_on_error,
            metrics_file,
        } => {
            if let Some(csv) = csv {
                config.import.csv_path = Some(csv);
            }
            if let Some(table) = table {
                config.supabase.table = Some(table);
            }
            if let Some(url) = url {
                config.supabase.url = Some(url);
            }
            if let Some(timeout) = timeout_seconds {
                config.supabase.timeout_seconds = Some(timeout);
            }

            let summary_failed = import(&config, dry_run).await?;
            if let Some(text) = observability::render() {
                debug!("Run metrics:\n{}", text);
            }
            if let Some(path) = metrics_file {
                observability::write_snapshot(&path)?;
            }
            Ok(if fail_on_error && summary_failed > 0 { 2 } else { 0 })
        }
        Commands::Preview { csv, rows } => {
            if let Some(csv) = csv {
                config.import.csv_path = Some(csv);
            }
            preview(&config, rows)?;
            Ok(0)
        }
    }
}

/// Returns the number of failed records
async fn import(config: &Config, dry_run: bool) -> anyhow::Result<usize> {
    println!("{}", "=".repeat(50));
    println!("🧪 Toxicity data import");
    println!("{}", "=".repeat(50));

    let source = CsvSource::open(&config.csv_path())?;
    let headers = source.headers().to_vec();
    let rows = source.read_rows();
    println!("✅ Read {} rows", rows.len());
    println!("\n📊 Data preview:\n{}", render_preview(&headers, &rows, PREVIEW_ROWS));

    let table = config.table();
    let (store, dashboard): (Arc<dyn RecordStorePort>, Option<String>) = if dry_run {
        info!("Dry run: records are kept in memory");
        println!("📝 Dry run: nothing will be written to Supabase");
        let store: Arc<dyn RecordStorePort> = Arc::new(InMemoryStore::new());
        (store, None)
    } else {
        let settings = config.store_settings()?;
        let dashboard = format!("{}/project", settings.url);
        let store: Arc<dyn RecordStorePort> = Arc::new(SupabaseStore::new(&settings)?);
        (store, Some(dashboard))
    };

    let pipeline = Pipeline::new(store, table);
    println!("\n🔗 Connecting to the record store...");
    pipeline.preflight().await?;
    println!("✅ Connected");

    let summary = pipeline.run(rows).await;
    println!("\n{}", summary.render_report());
    println!("✨ Import complete!");
    if let Some(dashboard) = dashboard {
        println!("🌐 View the data in the Supabase dashboard: {}", dashboard);
    }

    Ok(summary.failed)
}

fn preview(config: &Config, limit: usize) -> anyhow::Result<()> {
    let source = CsvSource::open(&config.csv_path())?;
    let headers = source.headers().to_vec();
    let rows = source.read_rows();

    println!("📊 {} rows\n{}", rows.len(), render_preview(&headers, &rows, limit));
    println!("🔧 Records:");
    for row in rows.iter().take(limit) {
        let built = row
            .as_ref()
            .map_err(|e| e.to_string())
            .and_then(|r| process_row(r).map_err(|e| e.to_string()));
        match built {
            Ok(record) => println!("   {}", serde_json::to_string(&record)?),
            Err(e) => println!("   ⚠️  {}", e),
        }
    }
    Ok(())
}
