//! CSV loader for batches of projects to price.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Only the
//! first three columns are required. A malformed file fails as a whole; a
//! row with an unreadable `size` or `is_veteran` cell fails on its own and
//! the rest of the batch still loads.
//!
//! | Column | Required | Notes |
//! |----------------|----------|---------------------------------------------------|
//! | `project_type` | yes | e.g. `Kitchen Remodel`; unknown types price at the default rate |
//! | `location` | yes | e.g. `Pasco, WA` (quote it, it contains a comma) |
//! | `size` | yes | square feet; `1,200` and `1200 sq ft` are accepted |
//! | `materials` | no | material grade, e.g. `Standard Grade` |
//! | `features` | no | `;`-separated, e.g. `Smart Home Technology;Landscaping` |
//! | `complexity` | no | |
//! | `timeline` | no | free text |
//! | `budget` | no | free text |
//! | `is_veteran` | no | `yes`/`no`/`true`/`false`; empty means no |
//!
//! ### Example
//!
//! ```csv
//! project_type,location,size,materials,features,is_veteran
//! Kitchen Remodel,"Pasco, WA",1000,Standard Grade,,no
//! Deck/Patio,"Richland, WA",400 sq ft,,Landscaping;Custom Lighting,yes
//! ```

use std::path::Path;

use anyhow::Context;
use estimator_core::ProjectInput;
use serde::Deserialize;
use tracing::debug;

use crate::utils::{ParseSizeError, normalize_size};

#[derive(Debug, Deserialize)]
struct CsvRow {
    project_type: String,
    location: String,
    size: String,
    #[serde(default)]
    materials: String,
    #[serde(default)]
    features: String,
    #[serde(default)]
    complexity: String,
    #[serde(default)]
    timeline: String,
    #[serde(default)]
    budget: String,
    #[serde(default)]
    is_veteran: String,
}

/// Errors that can occur while loading a project batch.
#[derive(Debug, thiserror::Error)]
pub enum ProjectsLoadError {
    /// Bad structure, missing required column or wrong column count.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("row {row}: {source}")]
    InvalidSize {
        row: usize,
        #[source]
        source: ParseSizeError,
    },

    #[error("row {row}: unrecognised is_veteran value '{value}'")]
    InvalidFlag { value: String, row: usize },
}

/// One loaded row, or why it could not be read.
pub type ProjectRow = Result<ProjectInput, ProjectsLoadError>;

fn parse_flag(
    value: &str,
    row: usize,
) -> Result<bool, ProjectsLoadError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "no" | "n" | "false" | "0" => Ok(false),
        "yes" | "y" | "true" | "1" => Ok(true),
        _ => Err(ProjectsLoadError::InvalidFlag {
            value: value.to_string(),
            row,
        }),
    }
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<ProjectInput, ProjectsLoadError> {
    let size = normalize_size(&row.size).map_err(|source| ProjectsLoadError::InvalidSize {
        row: row_number,
        source,
    })?;

    Ok(ProjectInput {
        project_type: row.project_type,
        location: row.location,
        size,
        timeline: row.timeline,
        budget: row.budget,
        complexity: row.complexity,
        materials: split_list(&row.materials).into_iter().take(1).collect(),
        features: split_list(&row.features),
        is_veteran: parse_flag(&row.is_veteran, row_number)?,
    })
}

/// Parses CSV text into one entry per row, in file order.
///
/// # Errors
/// [`ProjectsLoadError::Parse`] for structural problems: a missing
/// required column or a row with the wrong number of fields.
pub fn load_from_str(input: &str) -> Result<Vec<ProjectRow>, ProjectsLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = convert_row(result?, idx + 1);
        if let Err(e) = &row {
            debug!(error = %e, "unreadable project row");
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> anyhow::Result<Vec<ProjectRow>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    let projects = load_from_str(&contents)
        .with_context(|| format!("Failed to load projects from: {}", path.display()))?;
    Ok(projects)
}
