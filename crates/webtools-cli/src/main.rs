mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calculator::CalcArgs;
use commands::currency::{ConvertCurrencyArgs, RatesArgs};
use commands::life::LifeArgs;
use commands::loan::{AmortizeArgs, SolveRateArgs};
use commands::password::PasswordArgs;
use commands::units::{ConvertUnitArgs, ListUnitsArgs};
use config::WebToolsConfig;

/// Everyday calculators: loans, conversions, passwords, arithmetic, life totals
#[derive(Parser)]
#[command(
    name = "wt",
    version,
    about = "Everyday calculators with decimal precision",
    long_about = "WebTools on the command line: loan amortization and rate solving, \
                  unit and currency conversion, password generation, an arithmetic \
                  calculator, and a card-game life counter. Every command accepts \
                  flags, --input <file.json>, or JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Config file (defaults to $WEBTOOLS_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Decimal places for rounded money and rates (overrides `[output] precision`)
    #[arg(long, global = true)]
    precision: Option<u32>,

    /// Log more to stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly amortization schedule for a fixed-rate loan
    Amortize(AmortizeArgs),
    /// Solve the interest rate that gives a target monthly payment
    SolveRate(SolveRateArgs),
    /// Convert a value between length, weight, area, or temperature units
    ConvertUnit(ConvertUnitArgs),
    /// List the supported units and their ratios
    ListUnits(ListUnitsArgs),
    /// Convert an amount between currencies
    ConvertCurrency(ConvertCurrencyArgs),
    /// Fetch the latest exchange rates
    Rates(RatesArgs),
    /// Generate a random password
    Password(PasswordArgs),
    /// Evaluate an arithmetic expression
    Calc(CalcArgs),
    /// Track life totals and counters for a card game
    Life(LifeArgs),
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

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match WebToolsConfig::load(cli.config.as_deref()) {
        Ok(mut config) => {
            if let Some(dp) = cli.precision {
                config.output.precision = dp;
            }
            config
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::loan::run_amortize(args, &config),
        Commands::SolveRate(args) => commands::loan::run_solve_rate(args, &config),
        Commands::ConvertUnit(args) => commands::units::run_convert_unit(args),
        Commands::ListUnits(args) => commands::units::run_list_units(args),
        Commands::ConvertCurrency(args) => {
            commands::currency::run_convert_currency(args, &config).await
        }
        Commands::Rates(args) => commands::currency::run_rates(args, &config).await,
        Commands::Password(args) => commands::password::run_password(args, &config),
        Commands::Calc(args) => commands::calculator::run_calc(args),
        Commands::Life(args) => commands::life::run_life(args),
        Commands::Version => {
            println!("wt {}", env!("CARGO_PKG_VERSION"));
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
