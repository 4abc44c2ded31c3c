use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use estimator_core::calculations::RateTables;
use estimator_data::RateTableLoader;

/// Print the pricing rate tables, optionally merged with overrides from a
/// CSV file.
///
/// The CSV file should have the following columns:
/// - table: base_rate, material, location, season or complexity
/// - key: the label the rate applies to (e.g. "Kitchen Remodel")
/// - value: cost per square foot for base_rate, a multiplier otherwise
///
/// Output is CSV in the same format, so it can be edited and fed back in.
#[derive(Parser, Debug)]
#[command(name = "estimator-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a CSV file with rate overrides
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Only validate the file; do not print the tables
    #[arg(short, long, default_value_t = false)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut tables = RateTables::default();

    if let Some(path) = &args.file {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;

        let records = RateTableLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

        let applied = RateTableLoader::apply(&mut tables, &records)
            .with_context(|| format!("Invalid rates in: {}", path.display()))?;

        eprintln!("Applied {} rate overrides from {}", applied, path.display());
    }

    if args.check {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["table", "key", "value"])?;
    for (table, key, value) in tables.rows() {
        writer.write_record([table, key.as_str(), value.to_string().as_str()])?;
    }
    writer.flush().context("Failed to write rate tables")?;

    Ok(())
}
