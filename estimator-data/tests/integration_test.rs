//! Integration tests for loading rate overrides from the bundled fixture.

use estimator_core::calculations::{EstimateCalculator, RateTables};
use estimator_core::{EstimateMode, ProjectInput, Season};
use estimator_data::{RateLoaderError, RateTableLoader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const TEST_RATES: &str = include_str!("../test-data/rates.csv");

fn loaded_tables() -> RateTables {
    let records = RateTableLoader::parse(TEST_RATES.as_bytes()).expect("Failed to parse CSV");
    let mut tables = RateTables::default();
    RateTableLoader::apply(&mut tables, &records).expect("Failed to apply rates");
    tables
}

#[test]
fn test_fixture_parses_all_records() {
    let records = RateTableLoader::parse(TEST_RATES.as_bytes()).unwrap();

    assert_eq!(records.len(), 7);
    assert_eq!(records[3].key, "Spokane, WA");
}

#[test]
fn test_fixture_overrides_defaults() {
    let tables = loaded_tables();

    assert_eq!(tables.base_rate("Kitchen Remodel"), dec!(210));
    assert_eq!(tables.base_rate("Tiny House"), dec!(175));
    assert_eq!(tables.material_multiplier(Some("Premium/Luxury")), dec!(1.45));
    assert_eq!(tables.location_multiplier("Spokane, WA"), dec!(1.12));
    assert_eq!(tables.location_multiplier("Moses Lake, WA"), dec!(1.01));
    assert_eq!(tables.seasonal_multiplier(Season::Winter), dec!(1.15));
    assert_eq!(tables.complexity_multiplier("Very Complex"), dec!(1.7));
}

#[test]
fn test_untouched_entries_keep_defaults() {
    let tables = loaded_tables();
    let defaults = RateTables::default();

    assert_eq!(tables.base_rate("Deck/Patio"), defaults.base_rate("Deck/Patio"));
    assert_eq!(
        tables.seasonal_multiplier(Season::Summer),
        defaults.seasonal_multiplier(Season::Summer)
    );
}

#[test]
fn test_rows_include_new_keys() {
    let rows = loaded_tables().rows();

    assert_eq!(rows.len(), RateTables::default().rows().len() + 2);
    assert!(rows.contains(&("base_rate", "Tiny House".to_string(), dec!(175))));
}

#[test]
fn test_loaded_rates_drive_pricing() {
    let calculator = EstimateCalculator::new(loaded_tables());
    let input = ProjectInput {
        project_type: "Kitchen Remodel".to_string(),
        location: "Pasco, WA".to_string(),
        size: "1000".to_string(),
        materials: vec!["Standard Grade".to_string()],
        ..ProjectInput::default()
    };
    let spring = chrono::NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

    let estimate = calculator
        .calculate(&input, EstimateMode::Preview, spring)
        .unwrap();

    assert_eq!(estimate.total_cost, dec!(210000));
}

#[test]
fn test_unknown_table_in_file_is_rejected() {
    let csv = "table,key,value\nfinish,Matte,1.1\n";
    let records = RateTableLoader::parse(csv.as_bytes()).unwrap();
    let mut tables = RateTables::default();

    let err = RateTableLoader::apply(&mut tables, &records).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unknown rate table 'finish' (expected base_rate, material, location, season or complexity)"
    );
    assert!(matches!(err, RateLoaderError::UnknownTable(_)));
}
