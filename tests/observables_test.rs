use mcmc_stats::errors::InvalidInput;
use mcmc_stats::observables::Observables;
use mcmc_stats::records::Sample;

fn sample(step: u64, e: f64, m: f64) -> Sample {
    Sample {
        step,
        energy: e,
        magnetization: m,
        energy_squared: e * e,
        magnetization_squared: m * m,
    }
}

#[test]
fn test_scenario_ground_state() {
    // L=2 (N=4), T=2.0, five identical ground-state samples
    let samples: Vec<Sample> = (0..5).map(|i| sample(i, -8.0, 4.0)).collect();
    let obs = Observables::compute(&samples, 2, 2.0, true).unwrap();

    assert_eq!(obs.energy_per_spin, -2.0);
    assert_eq!(obs.magnetization_per_spin, 1.0);
    assert_eq!(obs.heat_capacity, 0.0, "constant series has zero fluctuation");
    assert_eq!(obs.susceptibility, 0.0);
}

#[test]
fn test_constant_series_has_zero_fluctuations() {
    let samples: Vec<Sample> = (0..50).map(|i| sample(i, -3.5, 1.25)).collect();
    let obs = Observables::compute(&samples, 4, 1.7, true).unwrap();

    assert!(obs.heat_capacity.abs() < 1e-12);
    assert!(obs.susceptibility.abs() < 1e-12);
}

#[test]
fn test_abs_magnetization_toggle() {
    // M symmetric around zero: signed mean vanishes, |M| mean does not.
    let samples = vec![
        sample(0, -8.0, -4.0),
        sample(1, -8.0, 4.0),
        sample(2, -8.0, -4.0),
        sample(3, -8.0, 4.0),
    ];

    let with_abs = Observables::compute(&samples, 2, 1.0, true).unwrap();
    let signed = Observables::compute(&samples, 2, 1.0, false).unwrap();

    assert_eq!(with_abs.magnetization_per_spin, 1.0);
    assert!(signed.magnetization_per_spin.abs() < 1e-12);

    // Susceptibility never uses |M|, so the flag must not change it:
    // <M²> = 16, <M> = 0, chi = 16 / (4 · 1) = 4
    assert_eq!(with_abs.susceptibility, signed.susceptibility);
    assert!((with_abs.susceptibility - 4.0).abs() < 1e-12);
}

#[test]
fn test_alternating_energy_series() {
    // L=2 (N=4), T=1.0, 20 samples alternating E between -8 and 0:
    // <E> = -4, so e = -1.0, and the energy fluctuation is nonzero.
    let samples: Vec<Sample> = (0..20)
        .map(|i| sample(i, if i % 2 == 0 { -8.0 } else { 0.0 }, 0.0))
        .collect();
    let obs = Observables::compute(&samples, 2, 1.0, true).unwrap();

    assert_eq!(obs.energy_per_spin, -1.0);
    // <E²> = 32, <E>² = 16, cv = (32 - 16) / (4 · 1) = 4
    assert!((obs.heat_capacity - 4.0).abs() < 1e-12);
    assert!(obs.heat_capacity > 0.0);
}

#[test]
fn test_point_estimates_are_order_independent() {
    let forward: Vec<Sample> = (0..30)
        .map(|i| sample(i, -8.0 + (i % 3) as f64, (i % 5) as f64 - 2.0))
        .collect();
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = Observables::compute(&forward, 4, 2.0, true).unwrap();
    let b = Observables::compute(&reversed, 4, 2.0, true).unwrap();

    assert!((a.energy_per_spin - b.energy_per_spin).abs() < 1e-12);
    assert!((a.magnetization_per_spin - b.magnetization_per_spin).abs() < 1e-12);
    assert!((a.heat_capacity - b.heat_capacity).abs() < 1e-12);
    assert!((a.susceptibility - b.susceptibility).abs() < 1e-12);
}

#[test]
fn test_empty_series_is_rejected() {
    let result = Observables::compute(&[], 2, 2.0, true);
    assert!(matches!(result, Err(InvalidInput::EmptySeries)));
}

#[test]
fn test_non_positive_temperature_is_rejected() {
    let samples = [sample(0, -8.0, 4.0)];
    assert!(matches!(
        Observables::compute(&samples, 2, 0.0, true),
        Err(InvalidInput::NonPositiveTemperature(_))
    ));
    assert!(matches!(
        Observables::compute(&samples, 2, -1.0, true),
        Err(InvalidInput::NonPositiveTemperature(_))
    ));
}

#[test]
fn test_determinism() {
    let samples: Vec<Sample> = (0..100)
        .map(|i| sample(i, -6.0 + (i as f64 * 0.731).sin(), (i as f64 * 0.313).cos()))
        .collect();

    let a = Observables::compute(&samples, 8, 2.269, true).unwrap();
    let b = Observables::compute(&samples, 8, 2.269, true).unwrap();

    assert_eq!(a.energy_per_spin.to_bits(), b.energy_per_spin.to_bits());
    assert_eq!(a.magnetization_per_spin.to_bits(), b.magnetization_per_spin.to_bits());
    assert_eq!(a.heat_capacity.to_bits(), b.heat_capacity.to_bits());
    assert_eq!(a.susceptibility.to_bits(), b.susceptibility.to_bits());
}
