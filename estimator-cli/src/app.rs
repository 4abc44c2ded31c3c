//! Glue between configuration, storage backends and the estimator core.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use estimator_core::calculations::{EstimateCalculator, RateTables};
use estimator_core::{DraftStore, EstimateMode, ProjectInput};
use estimator_data::RateTableLoader;
use estimator_store_sqlite::SqliteDraftStore;
use tracing::{debug, info};

use crate::config::{StoreBackend, StoreSettings};
use crate::projects::ProjectRow;
use crate::utils::{format_currency, normalize_size};

/// Opens the draft store named by the `[store]` table, schema included.
pub async fn open_draft_store(settings: &StoreSettings) -> Result<Box<dyn DraftStore>> {
    debug!(backend = ?settings.backend, "opening draft store");
    match settings.backend {
        StoreBackend::Sqlite => {
            let store = SqliteDraftStore::open(&settings.connection_string)
                .await
                .with_context(|| {
                    format!("Failed to open draft store: {}", settings.connection_string)
                })?;
            Ok(Box::new(store))
        }
    }
}

/// Built-in rate tables, with overrides from `rates_file` applied.
pub fn load_rate_tables(rates_file: Option<&Path>) -> Result<RateTables> {
    let mut tables = RateTables::default();
    let Some(path) = rates_file else {
        return Ok(tables);
    };

    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let records = RateTableLoader::parse(file)
        .with_context(|| format!("Failed to parse rates: {}", path.display()))?;
    let applied = RateTableLoader::apply(&mut tables, &records)
        .with_context(|| format!("Invalid rates in: {}", path.display()))?;

    info!(path = %path.display(), applied, "loaded rate overrides");
    Ok(tables)
}

/// Project fields accepted on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Project type, e.g. "Kitchen Remodel"
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Location, e.g. "Pasco, WA"
    #[arg(long)]
    pub location: Option<String>,

    /// Size in square feet, e.g. 1200 or "1,200 sq ft"
    #[arg(long)]
    pub size: Option<String>,

    /// Material grade, e.g. "Standard Grade"
    #[arg(long)]
    pub material: Option<String>,

    /// Special feature; repeat for several
    #[arg(long = "feature", value_name = "FEATURE")]
    pub features: Vec<String>,

    #[arg(long)]
    pub complexity: Option<String>,

    /// Desired timeline, free text
    #[arg(long)]
    pub timeline: Option<String>,

    /// Budget range, free text
    #[arg(long)]
    pub budget: Option<String>,

    /// Apply the 10% veteran discount
    #[arg(long, default_value_t = false)]
    pub veteran: bool,
}

impl ProjectArgs {
    pub fn into_input(self) -> Result<ProjectInput> {
        let size = normalize_size(self.size.as_deref().unwrap_or_default())?;
        let mut input = ProjectInput {
            project_type: self.project_type.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            size,
            timeline: self.timeline.unwrap_or_default(),
            budget: self.budget.unwrap_or_default(),
            complexity: self.complexity.unwrap_or_default(),
            is_veteran: self.veteran,
            ..ProjectInput::default()
        };
        if let Some(material) = &self.material {
            input.set_material(material);
        }
        for feature in &self.features {
            if !input.features.contains(feature) {
                input.toggle_feature(feature);
            }
        }
        Ok(input)
    }
}

/// One line per CSV row: total and cost per sq ft, or why it was skipped.
pub fn batch_lines(
    calculator: &EstimateCalculator,
    rows: &[ProjectRow],
    today: NaiveDate,
) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(idx, result)| {
            let row = idx + 1;
            let project = match result {
                Ok(project) => project,
                Err(e) => return format!("{row:>4}  {:<22} skipped: {e}", "-"),
            };
            match calculator.calculate(project, EstimateMode::Full, today) {
                Ok(estimate) => format!(
                    "{row:>4}  {:<22} {:>8} sq ft  {:>12}  {:>6}/sq ft",
                    project.project_type,
                    estimate.square_footage,
                    format_currency(estimate.total_cost),
                    format_currency(estimate.cost_per_sq_ft),
                ),
                Err(e) => format!("{row:>4}  {:<22} skipped: {e}", project.project_type),
            }
        })
        .collect()
}
