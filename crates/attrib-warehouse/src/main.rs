//! Attrib Warehouse - Load and verification tool

use anyhow::Result;
use attrib_common::logging::{init_logging, LogConfig, LogLevel};
use attrib_warehouse::config::DEFAULT_DDL_PATH;
use attrib_warehouse::{connect, loader, run_sql, verify, WarehouseConfig};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "attrib-warehouse")]
#[command(author, version, about = "Warehouse loading and verification")]
struct Cli {
    /// Pipeline stage to run
    #[command(subcommand)]
    stage: Stage,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Stage {
    /// Initialize the schema and reload both warehouse tables
    Load {
        /// Schema-definition script (idempotent)
        #[arg(long, default_value = DEFAULT_DDL_PATH)]
        ddl: String,

        /// Canonical events artifact
        #[arg(long, default_value = "data/events.csv")]
        events: String,

        /// Canonical spend artifact
        #[arg(long, default_value = "data/ad_spend.csv")]
        spend: String,
    },

    /// Report row counts across the warehouse tables
    Verify,

    /// Execute SQL files in order
    RunSql {
        /// SQL files to execute
        #[arg(required = true)]
        files: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("attrib-warehouse".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let config = WarehouseConfig::load()?;
    let mut conn = connect(&config).await?;

    match cli.stage {
        Stage::Load { ddl, events, spend } => {
            info!("Loading warehouse");
            loader::run(&mut conn, &ddl, &events, &spend).await?;
        },
        Stage::Verify => {
            for (table, count) in verify::run(&mut conn).await? {
                println!("{} => {}", table, count);
            }
        },
        Stage::RunSql { files } => {
            run_sql::run(&mut conn, &files).await?;
            info!("Done");
        },
    }

    Ok(())
}
