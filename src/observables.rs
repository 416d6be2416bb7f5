//! Point estimates of the four thermodynamic observables.

use crate::errors::InvalidInput;
use crate::records::Sample;

/// Means of the raw observables over a (sub)series. The jackknife estimator
/// builds these from running totals; the aggregator builds them from the
/// full series. Both feed the same formulas in [`Observables::from_means`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct SeriesMeans {
    pub(crate) energy: f64,
    pub(crate) magnetization: f64,
    pub(crate) abs_magnetization: f64,
    pub(crate) energy_squared: f64,
    pub(crate) magnetization_squared: f64,
}

impl SeriesMeans {
    pub(crate) fn from_samples(samples: &[Sample]) -> Self {
        let n = samples.len() as f64;
        let mut e = 0.0;
        let mut m = 0.0;
        let mut m_abs = 0.0;
        let mut e2 = 0.0;
        let mut m2 = 0.0;
        for s in samples {
            e += s.energy;
            m += s.magnetization;
            m_abs += s.magnetization.abs();
            e2 += s.energy_squared;
            m2 += s.magnetization_squared;
        }
        SeriesMeans {
            energy: e / n,
            magnetization: m / n,
            abs_magnetization: m_abs / n,
            energy_squared: e2 / n,
            magnetization_squared: m2 / n,
        }
    }
}

/// Per-spin point estimates for one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub energy_per_spin: f64,
    pub magnetization_per_spin: f64,
    pub heat_capacity: f64,
    pub susceptibility: f64,
}

impl Observables {
    /// Fluctuation formulas, shared between the full-series estimate and
    /// every jackknife replicate so the two can never drift apart.
    ///
    /// Susceptibility always uses signed M: with |M| it would be biased
    /// in the symmetry-broken phase. `use_abs_magnetization` only selects
    /// the magnetization estimate shown to the user.
    pub(crate) fn from_means(
        means: &SeriesMeans,
        n_spins: f64,
        temperature: f64,
        use_abs_magnetization: bool,
    ) -> Self {
        let m_source = if use_abs_magnetization {
            means.abs_magnetization
        } else {
            means.magnetization
        };
        Observables {
            energy_per_spin: means.energy / n_spins,
            magnetization_per_spin: m_source / n_spins,
            heat_capacity: (means.energy_squared - means.energy * means.energy)
                / (n_spins * temperature * temperature),
            susceptibility: (means.magnetization_squared
                - means.magnetization * means.magnetization)
                / (n_spins * temperature),
        }
    }

    /// Compute the four point estimates from a raw series.
    pub fn compute(
        samples: &[Sample],
        lattice_size: u32,
        temperature: f64,
        use_abs_magnetization: bool,
    ) -> Result<Self, InvalidInput> {
        if samples.is_empty() {
            return Err(InvalidInput::EmptySeries);
        }
        if temperature <= 0.0 {
            return Err(InvalidInput::NonPositiveTemperature(temperature));
        }
        if lattice_size == 0 {
            return Err(InvalidInput::ZeroLatticeSize);
        }
        let n_spins = (lattice_size as f64) * (lattice_size as f64);
        let means = SeriesMeans::from_samples(samples);
        Ok(Observables::from_means(
            &means,
            n_spins,
            temperature,
            use_abs_magnetization,
        ))
    }
}
