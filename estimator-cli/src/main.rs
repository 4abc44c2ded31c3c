use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{debug, info};

use estimator_cli::app::{self, ProjectArgs};
use estimator_cli::config::AppConfig;
use estimator_cli::render::{EstimateReport, OptionsReport, SuggestionsReport};
use estimator_cli::wizard::{WizardSession, WizardSettings};
use estimator_cli::{logging, projects};
use estimator_core::EstimateMode;
use estimator_core::calculations::{EstimateCalculator, suggest_defaults};
use estimator_core::wizard::DraftManager;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Construction cost estimator for residential projects in the Tri-Cities
/// area.
///
/// Prices a project from its type, size, location, materials and features,
/// either in one shot from flags or through a three-step interactive wizard.
#[derive(Debug, Parser)]
struct Cli {
    /// Configuration file. Defaults to `estimator.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `estimator_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a project described by flags.
    Estimate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Running estimate only: no timeline or confidence assessment.
        #[arg(long)]
        preview: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest defaults for fields left empty.
    Suggest {
        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long)]
        json: bool,
    },

    /// Step through the questions interactively; progress is saved as a draft.
    Wizard,

    /// List every option with the multiplier currently in effect.
    Options,

    /// Price every project in a CSV file.
    Batch {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let rates = app::load_rate_tables(config.rates_file.as_deref())?;
    let calculator = Arc::new(EstimateCalculator::new(rates));
    let today = Local::now().date_naive();

    match cli.command {
        Command::Estimate {
            project,
            preview,
            json,
        } => {
            let input = project.into_input()?;
            let mode = if preview {
                EstimateMode::Preview
            } else {
                EstimateMode::Full
            };
            let estimate = calculator.calculate(&input, mode, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                print!("{}", EstimateReport::new(&estimate, &input));
            }
        }
        Command::Suggest { project, json } => {
            let input = project.into_input()?;
            let suggestions = suggest_defaults(&input, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print!("{}", SuggestionsReport(&suggestions));
            }
        }
        Command::Wizard => {
            let store = app::open_draft_store(&config.store).await?;
            let drafts = DraftManager::new(&*store).with_max_age(config.draft_max_age());

            let settings = WizardSettings {
                today,
                debounce: config.debounce(),
                calculation_delay: config.calculation_delay(),
                confirm_restore: config.confirm_restore,
            };
            let stdin = BufReader::new(tokio::io::stdin());
            let mut session =
                WizardSession::new(stdin, io::stdout(), Arc::clone(&calculator), drafts, settings);
            session.run().await?;
        }
        Command::Options => {
            print!("{}", OptionsReport(calculator.rates()));
        }
        Command::Batch { file } => {
            let rows = projects::load_from_file(&file)?;
            info!(count = rows.len(), "pricing batch");
            for line in app::batch_lines(&calculator, &rows, today) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
