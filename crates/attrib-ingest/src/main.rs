//! Attrib Ingest - Source adapter tool

use anyhow::Result;
use attrib_common::logging::{init_logging, LogConfig, LogLevel};
use attrib_ingest::{columns, events, spend};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "attrib-ingest")]
#[command(author, version, about = "Marketing data source adapters")]
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
    /// Normalize a raw user-interaction export into canonical events
    Events {
        /// Raw input file
        #[arg(short, long, default_value = "data/raw_kaggle/events_source.csv")]
        input: String,

        /// Canonical output file
        #[arg(short, long, default_value = "data/events.csv")]
        output: String,
    },

    /// Normalize a raw ad-spend export into canonical spend records
    Spend {
        /// Raw input file
        #[arg(short, long, default_value = "data/raw_kaggle/spend_source.csv")]
        input: String,

        /// Canonical output file
        #[arg(short, long, default_value = "data/ad_spend.csv")]
        output: String,
    },

    /// Print the column names of a CSV export
    Columns {
        /// File to inspect
        file: String,
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
        .log_file_prefix("attrib-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.stage {
        Stage::Events { input, output } => {
            info!("Ingesting interaction events");
            events::ingest(&input, &output).await?;
        },
        Stage::Spend { input, output } => {
            info!("Ingesting ad spend");
            spend::ingest(&input, &output).await?;
        },
        Stage::Columns { file } => {
            columns::run(&file)?;
        },
    }

    Ok(())
}
