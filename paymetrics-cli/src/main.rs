//! paymetrics: pull spending transactions out of bank alert emails
//!
//! Usage:
//!   paymetrics process --input emails.json        Run a batch from a JSON array
//!   paymetrics process --eml-dir ./mail           Run a batch from .eml files
//!   paymetrics summary --input records.json --from 2025-08-01 --to 2025-08-31
//!   paymetrics config init

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use paymetrics_core::{ExtractedTransaction, SystemClock};
use paymetrics_finance::{Categorizer, DateRange, Pipeline, summarize, write_csv, write_json};
use paymetrics_ingest::{EmailFilter, InstitutionRegistry};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config::{Config, OutputFormat};

mod config;
mod input;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PAYMETRICS_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "paymetrics", version = VERSION, about = "Bank alert email transaction extractor")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and categorize transactions from a batch of emails
    Process {
        /// JSON array of emails ({id, sender, subject, body, ...})
        #[arg(long, conflicts_with = "eml_dir", required_unless_present = "eml_dir")]
        input: Option<PathBuf>,

        /// Directory searched recursively for .eml files
        #[arg(long)]
        eml_dir: Option<PathBuf>,

        /// JSON array of category definitions (default: built-in categories)
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Output format (default: from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write records here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show which institution a sender address belongs to
    ClassifySender { sender: String },

    /// Run the transaction filter on a single email
    Filter {
        #[arg(long)]
        sender: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Categorize a merchant (with --description, the combined-text rules)
    Categorize {
        merchant: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// Spending totals by category and account over a date range
    Summary {
        /// Records exported by `process` (.json or .csv)
        #[arg(long)]
        input: PathBuf,
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.paymetrics/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries records; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(io::stderr))
        .init();

    match cli.command {
        Command::Process {
            input,
            eml_dir,
            categories,
            format,
            out,
        } => {
            let cfg = config::load_config()?;
            cmd_process(&cfg, input, eml_dir, categories, format, out)
        }
        Command::ClassifySender { sender } => cmd_classify_sender(&sender),
        Command::Filter {
            sender,
            subject,
            body,
        } => cmd_filter(&sender, &subject, &body),
        Command::Categorize {
            merchant,
            description,
            categories,
        } => cmd_categorize(&merchant, description.as_deref(), categories.as_deref()),
        Command::Summary {
            input,
            from,
            to,
            json,
        } => cmd_summary(&input, from, to, json),
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                let path = config::config_path()?;
                let cfg = config::load_config_from(&path)?;
                println!("# {}", path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
        },
    }
}

fn cmd_process(
    cfg: &Config,
    input: Option<PathBuf>,
    eml_dir: Option<PathBuf>,
    categories: Option<PathBuf>,
    format: Option<OutputFormat>,
    out: Option<PathBuf>,
) -> Result<()> {
    let emails = match (input, eml_dir) {
        (Some(path), None) => input::load_json_emails(&path)?,
        (None, Some(dir)) => input::load_eml_dir(&dir)?,
        _ => bail!("pass exactly one of --input or --eml-dir"),
    };
    if emails.len() > cfg.pipeline.max_batch_size {
        bail!(
            "{} emails exceeds max_batch_size ({}); raise it in config.toml or split the input",
            emails.len(),
            cfg.pipeline.max_batch_size
        );
    }

    let categories = input::load_categories(categories.as_deref())?;
    let registry = InstitutionRegistry::builtin()?.with_timezone(cfg.timezone()?);
    let clock = SystemClock;

    let outcome = Pipeline::new(&registry, &categories, &clock).process_batch(&emails);

    let format = format.unwrap_or(cfg.output.format);
    write_records(&outcome.records, format, out.as_deref())?;

    for skip in &outcome.skips {
        eprintln!("skipped {}: {}", skip.email_id, skip.reason);
    }
    eprintln!("{}", outcome.status_message());
    Ok(())
}

fn write_records(records: &[ExtractedTransaction], format: OutputFormat, out: Option<&Path>) -> Result<()> {
    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(File::create(path).with_context(|| format!("create {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        OutputFormat::Json => {
            let mut writer = writer;
            write_json(records, &mut writer).context("write JSON records")?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(records, writer).context("write CSV records")?,
    }
    Ok(())
}

fn cmd_classify_sender(sender: &str) -> Result<()> {
    let registry = InstitutionRegistry::builtin()?;
    match registry.classify(sender) {
        Some(profile) => println!("{} ({})", profile.key, profile.display_name),
        None => println!("unrecognized"),
    }
    Ok(())
}

fn cmd_filter(sender: &str, subject: &str, body: &str) -> Result<()> {
    let registry = InstitutionRegistry::builtin()?;
    let decision = EmailFilter::new(&registry).evaluate(sender, subject, body);
    let verdict = if decision.accepted() { "transaction" } else { "not a transaction" };
    println!("{} ({:?})", verdict, decision);
    Ok(())
}

fn cmd_categorize(merchant: &str, description: Option<&str>, categories: Option<&Path>) -> Result<()> {
    let categories = input::load_categories(categories)?;
    let categorizer = Categorizer::new(&categories);
    let category = match description {
        Some(description) => categorizer.categorize(merchant, description),
        None => categorizer.categorize_merchant(merchant),
    };
    println!("{}", category);
    Ok(())
}

fn cmd_summary(input: &Path, from: NaiveDate, to: NaiveDate, json: bool) -> Result<()> {
    let records = input::load_records(input)?;
    let summary = summarize(&records, DateRange::new(from, to));

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Spending {} to {}: {} across {} transactions\n",
        summary.range.start, summary.range.end, summary.total_spent, summary.transaction_count
    );
    println!("By category:");
    for (name, total) in summary.top_categories() {
        println!("  {:<24} {:>12}  ({})", name, total.amount, total.count);
    }
    println!("\nBy account:");
    for account in summary.accounts.values() {
        println!("  {:<24} {:>12}  ({})", account.display, account.amount, account.count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_requires_one_source() {
        assert!(Cli::try_parse_from(["paymetrics", "process"]).is_err());
        assert!(
            Cli::try_parse_from(["paymetrics", "process", "--input", "a.json", "--eml-dir", "mail"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["paymetrics", "process", "--eml-dir", "mail"]).is_ok());
    }

    #[test]
    fn test_summary_parses_dates() {
        let cli = Cli::try_parse_from([
            "paymetrics", "summary", "--input", "r.csv", "--from", "2025-08-01", "--to", "2025-08-31",
        ])
        .unwrap();
        match cli.command {
            Command::Summary { from, to, .. } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_write_records_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&[], OutputFormat::Csv, Some(&path)).unwrap();
        assert!(path.exists());
    }
}
