use std::io::Read;

use estimator_core::Season;
use estimator_core::calculations::RateTables;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading rate table overrides.
#[derive(Debug, Error)]
pub enum RateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown rate table '{0}' (expected base_rate, material, location, season or complexity)")]
    UnknownTable(String),

    #[error("Unknown season '{0}' (expected winter, spring, summer or fall)")]
    UnknownSeason(String),

    #[error("Rate for {table} '{key}' must be positive, got {value}")]
    NonPositiveValue {
        table: String,
        key: String,
        value: Decimal,
    },
}

impl From<csv::Error> for RateLoaderError {
    fn from(err: csv::Error) -> Self {
        RateLoaderError::CsvParse(err.to_string())
    }
}

/// Where a validated record lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateTarget {
    BaseRate,
    Material,
    Location,
    Season(Season),
    Complexity,
}

impl RateTarget {
    fn resolve(record: &RateRecord) -> Result<Self, RateLoaderError> {
        match record.table.as_str() {
            "base_rate" => Ok(Self::BaseRate),
            "material" => Ok(Self::Material),
            "location" => Ok(Self::Location),
            "season" => Season::parse(&record.key)
                .map(Self::Season)
                .ok_or_else(|| RateLoaderError::UnknownSeason(record.key.clone())),
            "complexity" => Ok(Self::Complexity),
            other => Err(RateLoaderError::UnknownTable(other.to_string())),
        }
    }
}

/// A single record from a rates CSV file.
///
/// - `table`: one of `base_rate`, `material`, `location`, `season`, `complexity`
/// - `key`: the catalog label the rate applies to (e.g. `Kitchen Remodel`)
/// - `value`: cost per square foot for `base_rate`, a multiplier otherwise
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateRecord {
    pub table: String,
    pub key: String,
    pub value: Decimal,
}

/// Loader for rate table overrides from CSV files.
///
/// Records replace existing entries or add new keys; entries not mentioned
/// in the file keep their built-in values.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse rate records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateRecord>, RateLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Apply `records` on top of `tables`, returning the number applied.
    ///
    /// Every record is validated before any is applied, so a bad file leaves
    /// `tables` untouched.
    pub fn apply(
        tables: &mut RateTables,
        records: &[RateRecord],
    ) -> Result<usize, RateLoaderError> {
        let mut validated = Vec::with_capacity(records.len());
        for record in records {
            let target = RateTarget::resolve(record)?;
            if record.value <= Decimal::ZERO {
                return Err(RateLoaderError::NonPositiveValue {
                    table: record.table.clone(),
                    key: record.key.clone(),
                    value: record.value,
                });
            }
            validated.push((target, record));
        }

        for (target, record) in &validated {
            let value = record.value;
            let key = record.key.clone();
            match target {
                RateTarget::BaseRate => tables.base_rates.insert(key, value),
                RateTarget::Material => tables.material_multipliers.insert(key, value),
                RateTarget::Location => tables.location_multipliers.insert(key, value),
                RateTarget::Season(season) => tables.seasonal_factors.insert(*season, value),
                RateTarget::Complexity => tables.complexity_multipliers.insert(key, value),
            };
            debug!(table = %record.table, key = %record.key, %value, "applied rate");
        }

        Ok(validated.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "table,key,value\n";

    fn parse(rows: &str) -> Vec<RateRecord> {
        RateTableLoader::parse(format!("{HEADER}{rows}").as_bytes()).expect("Failed to parse CSV")
    }

    #[test]
    fn test_parse_single_record() {
        let records = parse("base_rate,Kitchen Remodel,210");

        assert_eq!(
            records,
            vec![RateRecord {
                table: "base_rate".to_string(),
                key: "Kitchen Remodel".to_string(),
                value: dec!(210),
            }]
        );
    }

    #[test]
    fn test_parse_quoted_key_with_comma() {
        let records = parse("location,\"Spokane, WA\",1.12");

        assert_eq!(records[0].key, "Spokane, WA");
        assert_eq!(records[0].value, dec!(1.12));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let records = parse(" material , Budget-Friendly , 0.75 ");

        assert_eq!(records[0].table, "material");
        assert_eq!(records[0].key, "Budget-Friendly");
        assert_eq!(records[0].value, dec!(0.75));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let result = RateTableLoader::parse("table,key\nbase_rate,Other".as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let RateLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_decimal() {
        let result = RateTableLoader::parse(format!("{HEADER}base_rate,Other,cheap").as_bytes());

        assert!(matches!(result, Err(RateLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_apply_overrides_and_extends() {
        let mut tables = RateTables::default();
        let records = parse("base_rate,Kitchen Remodel,210\nbase_rate,Tiny House,175");

        let applied = RateTableLoader::apply(&mut tables, &records).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(tables.base_rate("Kitchen Remodel"), dec!(210));
        assert_eq!(tables.base_rate("Tiny House"), dec!(175));
        assert_eq!(tables.base_rate("Deck/Patio"), dec!(80));
    }

    #[test]
    fn test_apply_season_is_case_insensitive() {
        let mut tables = RateTables::default();
        let records = parse("season,Winter,1.2");

        RateTableLoader::apply(&mut tables, &records).unwrap();

        assert_eq!(tables.seasonal_multiplier(Season::Winter), dec!(1.2));
    }

    #[test]
    fn test_apply_every_table() {
        let mut tables = RateTables::default();
        let records = parse(
            "material,Standard Grade,1.05\n\
             location,\"Pasco, WA\",1.01\n\
             season,summer,1.12\n\
             complexity,Simple,0.85",
        );

        let applied = RateTableLoader::apply(&mut tables, &records).unwrap();

        assert_eq!(applied, 4);
        assert_eq!(tables.material_multiplier(Some("Standard Grade")), dec!(1.05));
        assert_eq!(tables.location_multiplier("Pasco, WA"), dec!(1.01));
        assert_eq!(tables.seasonal_multiplier(Season::Summer), dec!(1.12));
        assert_eq!(tables.complexity_multiplier("Simple"), dec!(0.85));
    }

    #[test]
    fn test_apply_unknown_table() {
        let mut tables = RateTables::default();
        let records = parse("labor,Kitchen Remodel,1.1");

        let err = RateTableLoader::apply(&mut tables, &records).unwrap_err();

        assert!(matches!(err, RateLoaderError::UnknownTable(t) if t == "labor"));
    }

    #[test]
    fn test_apply_unknown_season() {
        let mut tables = RateTables::default();
        let records = parse("season,monsoon,1.1");

        let err = RateTableLoader::apply(&mut tables, &records).unwrap_err();

        assert!(matches!(err, RateLoaderError::UnknownSeason(s) if s == "monsoon"));
    }

    #[test]
    fn test_apply_rejects_non_positive_values() {
        for value in ["0", "-1.5"] {
            let mut tables = RateTables::default();
            let records = parse(&format!("material,Standard Grade,{value}"));

            let err = RateTableLoader::apply(&mut tables, &records).unwrap_err();

            assert!(
                matches!(err, RateLoaderError::NonPositiveValue { .. }),
                "Expected NonPositiveValue for {value}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_apply_bad_record_leaves_tables_untouched() {
        let mut tables = RateTables::default();
        let records = parse("base_rate,Kitchen Remodel,999\nbase_rate,Other,0");

        let result = RateTableLoader::apply(&mut tables, &records);

        assert!(result.is_err());
        assert_eq!(tables, RateTables::default());
    }
}
