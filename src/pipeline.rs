//! Per-simulation statistics pipeline: group raw records, compute point
//! estimates and jackknife errors per group, emit one row per simulation.

use std::collections::HashMap;

use log::{info, warn};
use rayon::prelude::*;

use crate::error_analysis::{block_jackknife_errors, DEFAULT_TARGET_BLOCKS};
use crate::errors::{SchemaError, StatsError};
use crate::observables::Observables;
use crate::records::{DerivedStatistics, ObservationSeries, RawRecord, Sample, SimulationKey};

/// Configuration for one pipeline run. Groups share no state, so the
/// per-group computation runs in parallel.
#[derive(Debug, Clone)]
pub struct StatsPipeline {
    /// Use ⟨|M|⟩ for the magnetization estimate (susceptibility always
    /// uses signed M regardless).
    pub use_abs_magnetization: bool,
    /// Target jackknife block count, see [`DEFAULT_TARGET_BLOCKS`].
    pub target_blocks: usize,
}

impl Default for StatsPipeline {
    fn default() -> Self {
        StatsPipeline {
            use_abs_magnetization: true,
            target_blocks: DEFAULT_TARGET_BLOCKS,
        }
    }
}

impl StatsPipeline {
    pub fn new(use_abs_magnetization: bool, target_blocks: usize) -> Self {
        StatsPipeline {
            use_abs_magnetization,
            target_blocks,
        }
    }

    /// Run the full pipeline: validate, group by (simulation id, model, T, L),
    /// sort each group by step, compute statistics, and return one record per
    /// simulation sorted by (model, temperature, simulation id).
    ///
    /// Validation failures abort the whole batch with a [`SchemaError`]
    /// naming the offending simulation and field; nothing is dropped
    /// silently.
    pub fn run(&self, records: &[RawRecord]) -> Result<Vec<DerivedStatistics>, StatsError> {
        for record in records {
            validate_record(record)?;
        }

        let mut groups: HashMap<SimulationKey, Vec<Sample>> = HashMap::new();
        for record in records {
            groups
                .entry(SimulationKey::of(record))
                .or_default()
                .push(Sample::from(record));
        }
        info!(
            "computing statistics for {} simulation(s) from {} raw records",
            groups.len(),
            records.len()
        );

        let series: Vec<ObservationSeries> = groups
            .into_iter()
            .map(|(key, samples)| ObservationSeries::new(key, samples))
            .collect();

        let mut stats = series
            .par_iter()
            .map(|s| self.compute_one(s))
            .collect::<Result<Vec<DerivedStatistics>, StatsError>>()?;

        stats.sort_by(|a, b| {
            a.model
                .cmp(&b.model)
                .then(a.temperature.total_cmp(&b.temperature))
                .then(a.simulation_id.cmp(&b.simulation_id))
        });
        Ok(stats)
    }

    /// Statistics for a single simulation's series.
    pub fn compute_one(&self, series: &ObservationSeries) -> Result<DerivedStatistics, StatsError> {
        let key = series.key;
        let obs = Observables::compute(
            &series.samples,
            key.lattice_size,
            key.temperature,
            self.use_abs_magnetization,
        )?;
        let errors = block_jackknife_errors(
            &series.samples,
            key.lattice_size,
            key.temperature,
            self.use_abs_magnetization,
            self.target_blocks,
        );
        if series.samples.len() <= 1 {
            warn!(
                "simulation {}: single-sample series, jackknife errors are NaN",
                key.simulation_id
            );
        }

        Ok(DerivedStatistics {
            simulation_id: key.simulation_id,
            model: key.model,
            temperature: key.temperature,
            lattice_size: key.lattice_size,
            energy_per_spin: obs.energy_per_spin,
            magnetization_per_spin: obs.magnetization_per_spin,
            heat_capacity: obs.heat_capacity,
            susceptibility: obs.susceptibility,
            error_energy: errors.energy,
            error_magnetization: errors.magnetization,
            error_cv: errors.heat_capacity,
            error_chi: errors.susceptibility,
        })
    }
}

fn validate_record(record: &RawRecord) -> Result<(), SchemaError> {
    let malformed = |field: &'static str, detail: String| SchemaError::MalformedField {
        simulation_id: record.simulation_id,
        field,
        detail,
    };

    let numeric_fields = [
        ("energy", record.energy),
        ("magnetization", record.magnetization),
        ("energy_squared", record.energy_squared),
        ("magnetization_squared", record.magnetization_squared),
    ];
    for (name, value) in numeric_fields {
        if !value.is_finite() {
            return Err(malformed(name, format!("non-finite value {value}")));
        }
    }
    if !record.temperature.is_finite() || record.temperature <= 0.0 {
        return Err(malformed(
            "temperature",
            format!("must be positive and finite, got {}", record.temperature),
        ));
    }
    if record.lattice_size == 0 {
        return Err(malformed("lattice_size", "must be at least 1".to_string()));
    }
    Ok(())
}
