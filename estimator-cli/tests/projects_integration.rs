//! Loads the on-disk project batch and prices it end to end.

use std::path::Path;

use chrono::NaiveDate;
use estimator_cli::{app, projects};
use estimator_core::EstimateMode;
use estimator_core::calculations::{EstimateCalculator, RateTables};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("projects.csv")
        .leak()
}

fn spring() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
}

#[test]
fn fixture_loads_every_row() {
    let rows = projects::load_from_file(fixture_path()).expect("fixture should load");

    assert_eq!(rows.len(), 5);
    let deck = rows[1].as_ref().unwrap();
    let home = rows[2].as_ref().unwrap();
    assert_eq!(deck.size, "400");
    assert_eq!(home.size, "2400");
    assert_eq!(home.budget, "$500,000 - $750,000");
    assert!(deck.is_veteran);
    assert_eq!(
        deck.features,
        vec!["Landscaping".to_string(), "Custom Lighting".to_string()]
    );
    assert!(rows[4].is_err());
}

#[test]
fn fixture_kitchen_prices_at_base_rate() {
    let rows = projects::load_from_file(fixture_path()).unwrap();
    let calculator = EstimateCalculator::new(RateTables::default());

    let estimate = calculator
        .calculate(rows[0].as_ref().unwrap(), EstimateMode::Full, spring())
        .unwrap();

    assert_eq!(estimate.total_cost, dec!(200000));
    assert_eq!(estimate.cost_per_sq_ft, dec!(200));
}

#[test]
fn batch_lines_skip_bad_rows_and_price_the_rest() {
    let rows = projects::load_from_file(fixture_path()).unwrap();
    let calculator = EstimateCalculator::new(RateTables::default());

    let lines = app::batch_lines(&calculator, &rows, spring());

    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("$200,000"));
    assert!(!lines[1].contains("skipped"));
    assert!(!lines[2].contains("skipped"));
    assert!(lines[3].contains("Bathroom Remodel"));
    assert!(lines[3].contains("skipped:"));
    assert!(lines[4].contains("skipped: row 5: invalid project size 'about 900'"));
}

#[test]
fn missing_file_names_path() {
    let err = projects::load_from_file(Path::new("/nonexistent/projects.csv")).unwrap_err();

    assert!(err.to_string().contains("/nonexistent/projects.csv"));
}
