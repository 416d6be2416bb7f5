//! Input and output record types shared by the pipeline and the I/O layer.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// Lattice spin model tag, as written by the simulation engine.
///
/// Variants are declared in tag-alphabetical order so that the derived
/// ordering matches sorting by tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Model {
    Clock,
    Ising,
    #[serde(rename = "XY")]
    XY,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Clock => "Clock",
            Model::Ising => "Ising",
            Model::XY => "XY",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clock" => Ok(Model::Clock),
            "Ising" => Ok(Model::Ising),
            "XY" => Ok(Model::XY),
            other => Err(SchemaError::UnknownModel(other.to_string())),
        }
    }
}

/// One per-step row of raw engine output, tagged with its simulation identity.
///
/// `energy_squared` and `magnetization_squared` are trusted as supplied by
/// the engine and never recomputed from `energy`/`magnetization`; depending
/// on the model they may be second moments with cross terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub simulation_id: u64,
    pub model: Model,
    pub temperature: f64,
    pub lattice_size: u32,
    pub step: u64,
    pub energy: f64,
    pub magnetization: f64,
    pub energy_squared: f64,
    pub magnetization_squared: f64,
}

/// The per-step payload once the identity columns are split off into the key.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub step: u64,
    pub energy: f64,
    pub magnetization: f64,
    pub energy_squared: f64,
    pub magnetization_squared: f64,
}

impl From<&RawRecord> for Sample {
    fn from(r: &RawRecord) -> Self {
        Sample {
            step: r.step,
            energy: r.energy,
            magnetization: r.magnetization,
            energy_squared: r.energy_squared,
            magnetization_squared: r.magnetization_squared,
        }
    }
}

/// Grouping key for one simulation run. The full tuple (not just the id)
/// guards against inconsistent tagging upstream.
#[derive(Debug, Clone, Copy)]
pub struct SimulationKey {
    pub simulation_id: u64,
    pub model: Model,
    pub temperature: f64,
    pub lattice_size: u32,
}

impl SimulationKey {
    pub fn of(record: &RawRecord) -> Self {
        SimulationKey {
            simulation_id: record.simulation_id,
            model: record.model,
            temperature: record.temperature,
            lattice_size: record.lattice_size,
        }
    }
}

// Temperatures are compared by bit pattern so records group exactly the way
// the engine wrote them (no epsilon fuzzing of the key).
impl PartialEq for SimulationKey {
    fn eq(&self, other: &Self) -> bool {
        self.simulation_id == other.simulation_id
            && self.model == other.model
            && self.temperature.to_bits() == other.temperature.to_bits()
            && self.lattice_size == other.lattice_size
    }
}

impl Eq for SimulationKey {}

impl Hash for SimulationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.simulation_id.hash(state);
        self.model.hash(state);
        self.temperature.to_bits().hash(state);
        self.lattice_size.hash(state);
    }
}

/// One simulation's time series, sorted by step ascending.
#[derive(Debug, Clone)]
pub struct ObservationSeries {
    pub key: SimulationKey,
    pub samples: Vec<Sample>,
}

impl ObservationSeries {
    /// Build a series from grouped records, restoring step order.
    /// The sort is stable, so equal steps keep their input order.
    pub fn new(key: SimulationKey, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.step);
        ObservationSeries { key, samples }
    }

    /// Number of spins N = L².
    pub fn n_spins(&self) -> f64 {
        (self.key.lattice_size as f64) * (self.key.lattice_size as f64)
    }
}

/// One output row per simulation: point estimates plus jackknife errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedStatistics {
    pub simulation_id: u64,
    pub model: Model,
    pub temperature: f64,
    pub lattice_size: u32,
    pub energy_per_spin: f64,
    pub magnetization_per_spin: f64,
    pub heat_capacity: f64,
    pub susceptibility: f64,
    pub error_energy: f64,
    pub error_magnetization: f64,
    pub error_cv: f64,
    pub error_chi: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_tags_round_trip() {
        for tag in ["Ising", "Clock", "XY"] {
            let m: Model = tag.parse().unwrap();
            assert_eq!(m.as_str(), tag);
        }
        assert!("Potts".parse::<Model>().is_err());
    }

    #[test]
    fn model_ordering_matches_tag_names() {
        let mut models = [Model::XY, Model::Ising, Model::Clock];
        models.sort();
        assert_eq!(models, [Model::Clock, Model::Ising, Model::XY]);
    }

    #[test]
    fn series_sorts_by_step() {
        let key = SimulationKey {
            simulation_id: 1,
            model: Model::Ising,
            temperature: 2.0,
            lattice_size: 4,
        };
        let samples = vec![
            Sample { step: 30, energy: 3.0, magnetization: 0.0, energy_squared: 9.0, magnetization_squared: 0.0 },
            Sample { step: 10, energy: 1.0, magnetization: 0.0, energy_squared: 1.0, magnetization_squared: 0.0 },
            Sample { step: 20, energy: 2.0, magnetization: 0.0, energy_squared: 4.0, magnetization_squared: 0.0 },
        ];
        let series = ObservationSeries::new(key, samples);
        let steps: Vec<u64> = series.samples.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![10, 20, 30]);
        assert_eq!(series.n_spins(), 16.0);
    }
}
