//! Post-processing for MCMC lattice spin model runs (Ising, Clock, XY).
//!
//! Raw per-step observables from the simulation engine are aggregated into
//! per-spin thermodynamic averages (energy, magnetization, heat capacity,
//! susceptibility) with block-jackknife error bars that account for serial
//! correlation in the Markov chain.

pub mod errors;
pub mod records;
pub mod observables;
pub mod error_analysis;
pub mod pipeline;
pub mod io;
