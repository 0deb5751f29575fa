//! Ecobici CLI: a small stand-in host for the Ecobici table functions.
//!
//! Commands:
//! - `functions`: list registered table functions with arguments and schemas
//! - `query`: bind a table function, pull every batch, print as DataFrames
//! - `trips`: download monthly trip archives for a range into a directory

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ecobici_core::table::{rows_to_dataframe, ColumnDef, Value};
use ecobici_core::{
    FeedFetcher, FetcherConfig, FunctionRegistry, MonthRange, RowProducer, YearMonth,
    STANDARD_BATCH_SIZE,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecobici", about = "Ecobici CLI: bike-share feeds as tables")]
struct Cli {
    /// Path to a TOML fetcher config (hosts, timeouts).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered table functions.
    Functions,
    /// Bind a table function and print every batch.
    Query {
        /// Function name, e.g. ecobici_station_status.
        function: String,

        /// Function arguments. Integers are passed as BIGINT, anything else as VARCHAR.
        args: Vec<String>,

        /// Maximum rows per pull.
        #[arg(long, default_value_t = STANDARD_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Download trip archives for a month range.
    Trips {
        /// First month (YYYY-MM).
        #[arg(long)]
        start: String,

        /// Last month (YYYY-MM). Defaults to the current month.
        #[arg(long)]
        end: Option<String>,

        /// Directory for the downloaded CSV files.
        #[arg(long, default_value = "trips")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => FetcherConfig::load(path)?,
        None => FetcherConfig::default(),
    };

    match cli.command {
        Commands::Functions => run_functions(config),
        Commands::Query {
            function,
            args,
            batch_size,
        } => run_query(config, &function, &args, batch_size),
        Commands::Trips {
            start,
            end,
            out_dir,
        } => run_trips(config, &start, end.as_deref(), &out_dir),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn registry(config: FetcherConfig) -> Result<FunctionRegistry> {
    let fetcher = FeedFetcher::from_config(config)?;
    let producer = Arc::new(RowProducer::new(fetcher));
    Ok(FunctionRegistry::with_producer(producer)?)
}

fn run_functions(config: FetcherConfig) -> Result<()> {
    let registry = registry(config)?;
    for function in registry.functions() {
        println!("{}", function.name);
        for signature in function.signatures {
            let args: Vec<String> = signature.iter().map(|t| t.to_string()).collect();
            println!("  ({})", args.join(", "));
        }
        for column in function.schema {
            println!("    {:<22} {}", column.name, column.ty);
        }
    }
    Ok(())
}

fn parse_argument(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::BigInt)
        .unwrap_or_else(|_| Value::Varchar(raw.to_string()))
}

fn run_query(config: FetcherConfig, function: &str, args: &[String], batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        bail!("--batch-size must be at least 1");
    }

    let registry = registry(config)?;
    let arguments = args.iter().map(|a| parse_argument(a)).collect();

    let mut batches = 0usize;
    let mut frame_error = None;
    let total = registry.scan(function, arguments, batch_size, |schema: &[ColumnDef], rows| {
        batches += 1;
        match rows_to_dataframe(schema, rows) {
            Ok(df) => println!("{df}"),
            Err(e) => {
                frame_error.get_or_insert(e);
            }
        }
    })?;

    if let Some(e) = frame_error {
        return Err(e).context("failed to build DataFrame from batch");
    }

    println!("{total} rows in {batches} batches");
    Ok(())
}

fn run_trips(config: FetcherConfig, start: &str, end: Option<&str>, out_dir: &Path) -> Result<()> {
    let start: YearMonth = start.parse()?;
    let end: YearMonth = match end {
        Some(end) => end.parse()?,
        None => YearMonth::from_date(chrono::Local::now().date_naive()),
    };
    let range = MonthRange::new(start, end);
    if range.is_empty() {
        bail!("--start {start} is after --end {end}");
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let fetcher = FeedFetcher::from_config(config)?;
    let report = fetcher.fetch_range_report(range);

    for month in &report.months {
        if let Ok(csv) = &month.result {
            let path = out_dir.join(format!("{}.csv", month.period));
            std::fs::write(&path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(period = %month.period, bytes = csv.len(), path = %path.display(), "saved archive");
        }
    }

    let fetched = report.fetched();
    let missing = report.missing();
    println!(
        "Fetched {}/{} months into {}",
        fetched.len(),
        report.attempted(),
        out_dir.display()
    );
    for (period, err) in &missing {
        println!("  missing {period}: {err}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arguments_become_bigint() {
        assert_eq!(parse_argument("2023"), Value::BigInt(2023));
        assert_eq!(parse_argument("-1"), Value::BigInt(-1));
        assert_eq!(parse_argument("march"), Value::Varchar("march".into()));
    }

    #[test]
    fn cli_parses_query_with_arguments() {
        let cli = Cli::try_parse_from([
            "ecobici",
            "query",
            "ecobici_historical_trips",
            "2023",
            "3",
            "--batch-size",
            "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Query {
                function,
                args,
                batch_size,
            } => {
                assert_eq!(function, "ecobici_historical_trips");
                assert_eq!(args, vec!["2023", "3"]);
                assert_eq!(batch_size, 1);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn cli_accepts_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["ecobici", "functions", "--config", "ecobici.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ecobici.toml")));
    }
}
