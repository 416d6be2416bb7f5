//! Error types returned by the statistics engine.

use thiserror::Error;

/// Input data does not match the expected raw-record schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("simulation {simulation_id}: field `{field}` is malformed ({detail})")]
    MalformedField {
        simulation_id: u64,
        field: &'static str,
        detail: String,
    },

    #[error("row {row}: {source}")]
    MalformedRow {
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("`{0}` does not match the engine convention results_<MODEL>_L<L>_T<T>.csv")]
    BadResultsFilename(String),

    #[error("unknown model tag `{0}` (expected Ising, Clock or XY)")]
    UnknownModel(String),
}

/// A series handed directly to the aggregator was unusable. With a
/// validated pipeline upstream this indicates a grouping bug, not bad data.
#[derive(Error, Debug)]
pub enum InvalidInput {
    #[error("observation series is empty")]
    EmptySeries,

    #[error("temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),

    #[error("lattice size must be at least 1")]
    ZeroLatticeSize,
}

/// Top-level error for the pipeline and the I/O layer.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Input(#[from] InvalidInput),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
