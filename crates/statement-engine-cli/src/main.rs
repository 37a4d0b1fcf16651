mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::history::HistoryArgs;
use commands::ratios::RatiosArgs;
use commands::statements::ApplyArgs;

/// Linked three-statement transaction engine
#[derive(Parser)]
#[command(
    name = "stmt",
    version,
    about = "Apply business transactions to linked financial statements",
    long_about = "A CLI for recording business transactions against a balance sheet, \
                  income statement and cash flow statement with decimal precision. \
                  Derived totals and financial ratios are recomputed after every \
                  transaction and any number of transactions can be undone."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration (seed statements, loan-payment split) as JSON or YAML
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine activity to stderr at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the seed statements, their totals and ratios
    Init,
    /// Apply one transaction or a batch of transactions
    Apply(ApplyArgs),
    /// Ratios and balance check after applying a batch
    Ratios(RatiosArgs),
    /// Transaction log after applying a batch, optionally undoing the newest entries
    History(HistoryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Init => commands::statements::run_init(config),
        Commands::Apply(args) => commands::statements::run_apply(args, config),
        Commands::Ratios(args) => commands::ratios::run_ratios(args, config),
        Commands::History(args) => commands::history::run_history(args, config),
        Commands::Version => {
            println!("stmt {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
