//! CSV interfaces around the core: raw-record ingestion, engine run files,
//! and statistics export. The engine writes one file per run, named
//! `results_<MODEL>_L<L>_T<T>.csv`, with per-step columns only; the
//! simulation identity lives in the filename.

use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use serde::Deserialize;

use crate::errors::{SchemaError, StatsError};
use crate::records::{DerivedStatistics, Model, RawRecord};

/// Columns required in a combined raw-record table.
pub const RAW_COLUMNS: [&str; 9] = [
    "simulation_id",
    "model",
    "temperature",
    "lattice_size",
    "step",
    "energy",
    "magnetization",
    "energy_squared",
    "magnetization_squared",
];

/// Columns written by the simulation engine per run file.
pub const ENGINE_COLUMNS: [&str; 5] = [
    "step",
    "energy",
    "magnetization",
    "energy_squared",
    "magnetization_squared",
];

/// Check a header row against the required columns, reporting every missing
/// column at once rather than failing on the first.
fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

/// Read a combined raw-record CSV (all nine columns per row).
pub fn read_raw_csv(path: &Path) -> Result<Vec<RawRecord>, StatsError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    check_columns(rdr.headers()?, &RAW_COLUMNS)?;

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRecord>().enumerate() {
        let record = result.map_err(|source| SchemaError::MalformedRow {
            // +2: one for the header, one for 1-based numbering
            row: idx as u64 + 2,
            source,
        })?;
        records.push(record);
    }
    info!("read {} raw records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse the engine's run-file naming convention,
/// `results_<MODEL>_L<L>_T<T>.csv`, e.g. `results_Ising_L16_T2.50.csv`.
pub fn parse_results_filename(name: &str) -> Result<(Model, u32, f64), SchemaError> {
    let bad = || SchemaError::BadResultsFilename(name.to_string());

    let stem = name.strip_suffix(".csv").ok_or_else(bad)?;
    let rest = stem.strip_prefix("results_").ok_or_else(bad)?;

    let mut parts = rest.split('_');
    let model_tag = parts.next().ok_or_else(bad)?;
    let l_part = parts.next().ok_or_else(bad)?;
    let t_part = parts.next().ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }

    let model = Model::from_str(model_tag)?;
    let lattice_size: u32 = l_part
        .strip_prefix('L')
        .and_then(|s| s.parse().ok())
        .ok_or_else(bad)?;
    let temperature: f64 = t_part
        .strip_prefix('T')
        .and_then(|s| s.parse().ok())
        .ok_or_else(bad)?;

    Ok((model, lattice_size, temperature))
}

#[derive(Debug, Deserialize)]
struct EngineRow {
    step: u64,
    energy: f64,
    magnetization: f64,
    energy_squared: f64,
    magnetization_squared: f64,
}

/// Read one engine run file, taking the simulation identity from the
/// filename and the given id.
pub fn read_engine_run(path: &Path, simulation_id: u64) -> Result<Vec<RawRecord>, StatsError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SchemaError::BadResultsFilename(path.display().to_string()))?;
    let (model, lattice_size, temperature) = parse_results_filename(filename)?;

    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    check_columns(rdr.headers()?, &ENGINE_COLUMNS)?;

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<EngineRow>().enumerate() {
        let row = result.map_err(|source| SchemaError::MalformedRow {
            row: idx as u64 + 2,
            source,
        })?;
        records.push(RawRecord {
            simulation_id,
            model,
            temperature,
            lattice_size,
            step: row.step,
            energy: row.energy,
            magnetization: row.magnetization,
            energy_squared: row.energy_squared,
            magnetization_squared: row.magnetization_squared,
        });
    }
    Ok(records)
}

/// Write the statistics table. Column order matches [`DerivedStatistics`]
/// field order; NaN errors are written as `NaN`.
pub fn write_statistics(path: &Path, stats: &[DerivedStatistics]) -> Result<(), StatsError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;
    for record in stats {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    info!("wrote {} statistics rows to {}", stats.len(), path.display());
    Ok(())
}
