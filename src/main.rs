use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod input;
mod models;
mod normalize;
mod reports;

const COUNTS_ARTIFACT: &str = "training_counts.json";
const FISCAL_YEAR_ARTIFACT: &str = "fiscal_year_completions.json";
const EXPIRING_ARTIFACT: &str = "expiring_trainings.json";

const DEFAULT_TRAININGS: [&str; 3] = [
    "Electrical Safety for Labs",
    "X-Ray Safety",
    "Laboratory Safety Training",
];

#[derive(Parser)]
#[command(name = "training-compliance")]
#[command(about = "Compliance reports over training-completion records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all three reports and write the JSON artifacts
    Report {
        #[arg(long, default_value = "trainings.txt")]
        input: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Training of interest for the fiscal-year report (repeatable)
        #[arg(long = "training")]
        trainings: Vec<String>,
        #[arg(long, default_value_t = 2024)]
        fiscal_year: i32,
        #[arg(long, value_parser = parse_reference_date, default_value = "10/01/2023")]
        reference_date: NaiveDate,
    },
    /// Print how many people most recently completed each training
    Counts {
        #[arg(long, default_value = "trainings.txt")]
        input: PathBuf,
    },
    /// Print who completed the given trainings in a fiscal year
    FiscalYear {
        #[arg(long, default_value = "trainings.txt")]
        input: PathBuf,
        /// Training of interest (repeatable)
        #[arg(long = "training")]
        trainings: Vec<String>,
        #[arg(long, default_value_t = 2024)]
        fiscal_year: i32,
    },
    /// Print trainings expired or expiring within 30 days of a date
    Expiring {
        #[arg(long, default_value = "trainings.txt")]
        input: PathBuf,
        #[arg(long, value_parser = parse_reference_date, default_value = "10/01/2023")]
        reference_date: NaiveDate,
    },
}

fn parse_reference_date(value: &str) -> Result<NaiveDate, String> {
    input::parse_date(value)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "reference date must not be empty".to_string())
}

fn trainings_of_interest(trainings: Vec<String>) -> BTreeSet<String> {
    if trainings.is_empty() {
        DEFAULT_TRAININGS.iter().map(|name| name.to_string()).collect()
    } else {
        trainings.into_iter().collect()
    }
}

fn write_artifact(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Report written to {}.", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            out_dir,
            trainings,
            fiscal_year,
            reference_date,
        } => {
            let people = input::load_people(&input)?;
            let config = reports::ReportConfig {
                trainings_of_interest: trainings_of_interest(trainings),
                fiscal_year,
                reference_date,
            };
            let bundle = reports::run_reports(&people, &config)?;

            // Serialize everything up front so a failure writes nothing.
            let artifacts = [
                (COUNTS_ARTIFACT, serde_json::to_string_pretty(&bundle.counts)?),
                (
                    FISCAL_YEAR_ARTIFACT,
                    serde_json::to_string_pretty(&bundle.fiscal_year)?,
                ),
                (
                    EXPIRING_ARTIFACT,
                    serde_json::to_string_pretty(&bundle.expiring)?,
                ),
            ];
            for (name, contents) in &artifacts {
                write_artifact(&out_dir.join(name), contents)?;
            }
            println!("Success!");
        }
        Commands::Counts { input } => {
            let people = input::load_people(&input)?;
            let counts = reports::training_counts(&people);

            if counts.is_empty() {
                println!("No completions found.");
                return Ok(());
            }

            println!("Completions by training:");
            for (training, count) in &counts {
                println!("- {training}: {count}");
            }
        }
        Commands::FiscalYear {
            input,
            trainings,
            fiscal_year,
        } => {
            let people = input::load_people(&input)?;
            let report = reports::fiscal_year_completions(
                &people,
                &trainings_of_interest(trainings),
                fiscal_year,
            )?;

            if report.is_empty() {
                println!("No completions in fiscal year {fiscal_year}.");
                return Ok(());
            }

            println!("Completions in fiscal year {fiscal_year}:");
            for (training, names) in &report {
                println!("- {training}: {}", names.join(", "));
            }
        }
        Commands::Expiring {
            input,
            reference_date,
        } => {
            let people = input::load_people(&input)?;
            let report = reports::expiring_trainings(&people, reference_date);

            if report.is_empty() {
                println!("No trainings expired or expiring soon.");
                return Ok(());
            }

            println!(
                "Trainings expired or expiring within 30 days of {}:",
                input::format_date(reference_date)
            );
            for (name, rows) in &report {
                println!("- {name}:");
                for row in rows {
                    let expires = row.expires.as_deref().unwrap_or("n/a");
                    println!("  - {} ({}, expires {})", row.training, row.status, expires);
                }
            }
        }
    }

    Ok(())
}
