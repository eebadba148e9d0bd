use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::SqlitePool;

mod config;
mod db;
mod derive;
mod export;
mod flags;
mod models;
mod ordering;
mod report;
mod sanitize;
mod scorecard;
mod scoring;

use config::Config;
use scorecard::{FieldEdit, Scorecard};

#[derive(Parser)]
#[command(name = "weekly-scorecard")]
#[command(about = "Personal weekly scorecard with streak-based red flags", long_about = None)]
struct Cli {
    /// Overrides SCORECARD_DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Replace the stored scorecard with four sample weeks
    Seed,
    /// Print every week with its score, grade and flags
    Show {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Add an empty week (defaults to the week after the latest one)
    Add {
        #[arg(long)]
        week: Option<NaiveDate>,
    },
    /// Copy the latest week's numbers into the following week
    CopyPrevious,
    /// Set one field of a week; an empty value clears a number
    Set {
        #[arg(long)]
        week: String,
        #[arg(long)]
        field: String,
        #[arg(long, default_value = "")]
        value: String,
    },
    /// Delete a week (the last remaining week is kept)
    Delete {
        #[arg(long)]
        week: String,
    },
    /// Replace the scorecard with a JSON export
    Import {
        #[arg(long)]
        json: PathBuf,
    },
    /// Write entries as JSON or derived weeks as CSV
    #[command(group(
        ArgGroup::new("format")
            .args(["json", "csv"])
            .required(true)
            .multiple(false)
    ))]
    Export {
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.database_url);
    tracing::debug!(database_url = %config.database_url, store_key = %config.store_key, "configuration loaded");

    let pool = db::connect(&config.database_url).await?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::init_db(&pool).await?;
            let count = db::seed(&pool, &config.store_key, today).await?;
            println!("Seeded {count} sample weeks.");
        }
        Commands::Show { limit } => {
            let scorecard = load_scorecard(&pool, &config, today).await?;
            let derived = scorecard.derived();
            let skip = limit.map_or(0, |limit| derived.len().saturating_sub(limit));
            print!("{}", report::build_table(&derived[skip..]));
        }
        Commands::Add { week } => {
            let mut scorecard = load_scorecard(&pool, &config, today).await?;
            let week_start = week
                .map(scorecard::week_start_for)
                .unwrap_or_else(|| scorecard.next_week_start());
            let entry = scorecard.add_week(week_start);
            db::save(&pool, &config.store_key, scorecard.entries()).await?;
            println!("Added week {}.", entry.week_start);
        }
        Commands::CopyPrevious => {
            let mut scorecard = load_scorecard(&pool, &config, today).await?;
            let entry = scorecard.copy_previous_week();
            db::save(&pool, &config.store_key, scorecard.entries()).await?;
            println!("Copied previous week into {}.", entry.week_start);
        }
        Commands::Set { week, field, value } => {
            let mut scorecard = load_scorecard(&pool, &config, today).await?;
            let edit = FieldEdit::parse(&field, &value)?;
            scorecard.apply_edit(&week, edit)?;
            db::save(&pool, &config.store_key, scorecard.entries()).await?;
            println!("Updated {field} for {week}.");
        }
        Commands::Delete { week } => {
            let mut scorecard = load_scorecard(&pool, &config, today).await?;
            if scorecard.remove_week(&week)? {
                db::save(&pool, &config.store_key, scorecard.entries()).await?;
                println!("Deleted week {week}.");
            } else {
                println!("Kept week {week}: the scorecard needs at least one week.");
            }
        }
        Commands::Import { json } => {
            let text = std::fs::read_to_string(&json)
                .with_context(|| format!("failed to read {}", json.display()))?;
            let mut scorecard = load_scorecard(&pool, &config, today).await?;
            let imported = match scorecard.import(&text) {
                Ok(count) => count,
                Err(err) => {
                    tracing::warn!(error = %err, path = %json.display(), "import rejected");
                    anyhow::bail!("import rejected, scorecard unchanged: {err}");
                }
            };
            db::save(&pool, &config.store_key, scorecard.entries()).await?;
            println!("Imported {imported} weeks from {}.", json.display());
        }
        Commands::Export { json, csv } => {
            let scorecard = load_scorecard(&pool, &config, today).await?;
            if let Some(path) = json {
                std::fs::write(&path, export::entries_to_json(scorecard.entries())?)?;
                println!("Exported {} weeks to {}.", scorecard.entries().len(), path.display());
            } else if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                export::write_derived_csv(file, &scorecard.derived())?;
                println!("Exported {} weeks to {}.", scorecard.entries().len(), path.display());
            }
        }
        Commands::Report { out } => {
            let scorecard = load_scorecard(&pool, &config, today).await?;
            let report = report::build_report(&scorecard.derived());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn load_scorecard(
    pool: &SqlitePool,
    config: &Config,
    today: NaiveDate,
) -> anyhow::Result<Scorecard> {
    db::init_db(pool).await?;
    let stored = db::load(pool, &config.store_key).await?;
    Ok(Scorecard::load(stored.as_deref(), today))
}
