mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::AmortizationArgs;
use commands::dead_cross::DeadCrossArgs;
use commands::depreciation::DepreciationArgs;
use commands::registration_tax::RegistrationTaxArgs;

/// Acquisition-financing calculators for rental real estate
#[derive(Parser)]
#[command(
    name = "rfa",
    version,
    about = "Acquisition-financing calculators for rental real estate",
    long_about = "A CLI for acquisition-financing calculations with decimal \
                  precision. Generates loan amortization and building \
                  depreciation schedules, finds the dead-cross year of a \
                  financed acquisition, and breaks down registration tax."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a loan amortization schedule
    Amortization(AmortizationArgs),
    /// Generate a building depreciation schedule
    Depreciation(DepreciationArgs),
    /// Find the dead-cross year of a financed acquisition
    DeadCross(DeadCrossArgs),
    /// Break down registration and license tax
    RegistrationTax(RegistrationTaxArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortization(args) => commands::amortization::run_amortization(args),
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::DeadCross(args) => commands::dead_cross::run_dead_cross(args),
        Commands::RegistrationTax(args) => {
            commands::registration_tax::run_registration_tax(args)
        }
        Commands::Version => {
            println!("rfa {}", env!("CARGO_PKG_VERSION"));
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
