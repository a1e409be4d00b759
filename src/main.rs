//! Vitalscore: health-risk self-assessment from the command line.
//!
//! Thin driver over the library: run one assessment (optionally saving it
//! to a per-account history), browse and prune the history, or check the
//! prediction service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vitalscore::adapters::{HttpPredictor, SqliteStore, TokioScheduler};
use vitalscore::application::{HistoryFilter, HistoryService, ScoreSource, ScoringService};
use vitalscore::domain::{BiometricInput, RiskLevel, Sex, ShapValues, UserId};
use vitalscore::ports::Predictor;

#[derive(Parser)]
#[command(name = "vitalscore", about = "Health-risk self-assessment", version)]
struct Cli {
    /// Prediction service base URL (falls back to VITALSCORE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// History database path
    #[arg(long, global = true, default_value = "vitalscore.db")]
    db: String,

    /// Account identity (email) for history operations
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one assessment
    Assess {
        #[arg(long)]
        age: u32,
        /// male or female
        #[arg(long)]
        sex: String,
        /// Systolic blood pressure in mmHg
        #[arg(long)]
        systolic: i32,
        /// Diastolic blood pressure in mmHg
        #[arg(long)]
        diastolic: i32,
        /// Resting heart rate in bpm
        #[arg(long)]
        heart_rate: i32,
        #[arg(long)]
        bmi: f64,
        /// SHAP weights as a JSON object
        #[arg(long)]
        shap_json: Option<String>,
        /// Save the result to the account history (requires --user)
        #[arg(long)]
        save: bool,
    },
    /// List saved assessments (requires --user)
    History {
        /// Free-text filter
        #[arg(long, default_value = "")]
        search: String,
        /// Risk band filter: low, moderate or high
        #[arg(long)]
        risk: Option<String>,
        /// Earliest date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Latest date (inclusive), YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Remove all saved assessments for the account (requires --user)
    Clear,
    /// Check the prediction service
    Health,
}

fn predictor(api_url: Option<&str>) -> HttpPredictor {
    match api_url {
        Some(url) => HttpPredictor::new(url, Duration::from_secs(4)),
        None => HttpPredictor::from_env(),
    }
}

fn open_history(db: &str, user: &str) -> Result<HistoryService<SqliteStore, TokioScheduler>> {
    let store = Arc::new(SqliteStore::open(db).context("Failed to open history database")?);
    let history = HistoryService::new(store, Arc::new(TokioScheduler::new()));
    history.set_identity(Some(UserId::new(user)));
    Ok(history)
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {label} date '{value}', expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Assess {
            age,
            sex,
            systolic,
            diastolic,
            heart_rate,
            bmi,
            shap_json,
            save,
        } => {
            let sex: Sex = sex.parse().map_err(|e: String| anyhow!(e))?;
            let input = BiometricInput {
                age,
                sex,
                systolic_bp: systolic,
                diastolic_bp: diastolic,
                heart_rate,
                bmi,
            };
            if let Err(errors) = input.validate() {
                return Err(anyhow!(errors.join("; ")));
            }

            let weights = shap_json
                .as_deref()
                .map(ShapValues::from_json)
                .transpose()?;

            let scoring = ScoringService::new(Arc::new(predictor(cli.api_url.as_deref())));
            let outcome = scoring.assess(&input, weights).await;

            let source = match outcome.source {
                ScoreSource::Remote => "remote model",
                ScoreSource::RuleBased => "rule-based fallback",
            };
            println!("Heart disease:  {:>3}/100  {} ({source})",
                outcome.assessment.heart_disease.score,
                outcome.assessment.heart_disease.risk);
            println!("Neurological:   {:>3}/100  {} (local rules)",
                outcome.assessment.neurological.score,
                outcome.assessment.neurological.risk);
            println!();
            for factor in &outcome.factors {
                match factor.shap_value {
                    Some(w) => println!("  {:<22} {:<14} impact: {:<8} weight: {w:+.3}",
                        factor.name, factor.value, factor.impact.to_string()),
                    None => println!("  {:<22} {:<14} impact: {}",
                        factor.name, factor.value, factor.impact),
                }
            }

            if save {
                let user = cli
                    .user
                    .as_deref()
                    .ok_or_else(|| anyhow!("--save requires --user"))?;
                let history = open_history(&cli.db, user)?;
                match history.save(&outcome) {
                    Some(record) => println!("\nSaved as {}", record.id),
                    None => println!("\nNot saved"),
                }
            }
        }

        Command::History {
            search,
            risk,
            from,
            to,
            page,
        } => {
            let user = cli
                .user
                .as_deref()
                .ok_or_else(|| anyhow!("history requires --user"))?;
            let history = open_history(&cli.db, user)?;

            let filter = HistoryFilter {
                search,
                risk: risk
                    .as_deref()
                    .map(str::parse::<RiskLevel>)
                    .transpose()
                    .map_err(|e| anyhow!(e))?,
                date_start: from.as_deref().map(|d| parse_date("from", d)).transpose()?,
                date_end: to.as_deref().map(|d| parse_date("to", d)).transpose()?,
            };

            let view = history.page(&filter, page);
            if view.entries.is_empty() {
                println!("No assessments found.");
            }
            let now = Utc::now();
            for entry in &view.entries {
                let pending = match entry.remaining_seconds(now) {
                    Some(secs) => format!("  [deleting in {secs}s]"),
                    None => String::new(),
                };
                println!(
                    "{}  {}  heart: {} ({})  neuro: {} ({}){pending}",
                    entry.record.id,
                    entry.record.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.record.assessment.heart_disease.risk,
                    entry.record.assessment.heart_disease.score,
                    entry.record.assessment.neurological.risk,
                    entry.record.assessment.neurological.score,
                );
            }
            println!(
                "\n{} result(s), page {}/{}",
                view.total_matches, view.page, view.total_pages
            );
        }

        Command::Clear => {
            let user = cli
                .user
                .as_deref()
                .ok_or_else(|| anyhow!("clear requires --user"))?;
            let history = open_history(&cli.db, user)?;
            history.clear_all();
            println!("All assessments cleared for {user}.");
        }

        Command::Health => {
            let predictor = predictor(cli.api_url.as_deref());
            match predictor.health().await {
                Ok(status) => println!(
                    "{}: status={}, model_loaded={}",
                    predictor.base_url(),
                    status.status,
                    status.model_loaded
                ),
                Err(e) => return Err(anyhow!("Health check failed: {e}")),
            }
        }
    }

    Ok(())
}
