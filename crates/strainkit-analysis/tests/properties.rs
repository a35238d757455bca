//! Property-based tests for strainkit-analysis transforms.
//!
//! Length preservation and finiteness of whitening and frequency shifting
//! for arbitrary signal lengths, spacings, and shifts.

use proptest::prelude::*;
use strainkit_analysis::{InterpolatedPsd, PowerSpectralDensity, freq_shift, whiten};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whitening with any strictly positive PSD returns exactly N finite samples.
    #[test]
    fn whiten_preserves_length(
        signal in prop::collection::vec(-1.0f64..=1.0, 1..600),
        dt in 1e-4f64..1e-1,
        level in 1e-3f64..1e3,
    ) {
        let y = whiten(&signal, &move |f: f64| level * (1.0 + f), dt).unwrap();
        prop_assert_eq!(y.len(), signal.len());
        prop_assert!(y.iter().all(|v| v.is_finite()));
    }

    /// Frequency shifting returns exactly N samples for any non-negative shift.
    #[test]
    fn freq_shift_preserves_length(
        signal in prop::collection::vec(-1.0f64..=1.0, 1..600),
        fshift in 0.0f64..5000.0,
        sample_rate in 1.0f64..8192.0,
    ) {
        let y = freq_shift(&signal, fshift, sample_rate).unwrap();
        prop_assert_eq!(y.len(), signal.len());
        prop_assert!(y.iter().all(|v| v.is_finite()));
    }

    /// Shifting never adds energy: bins are moved or cleared, never duplicated.
    #[test]
    fn freq_shift_does_not_add_energy(
        signal in prop::collection::vec(-1.0f64..=1.0, 2..400),
        fshift in 0.0f64..200.0,
    ) {
        let energy = |s: &[f64]| s.iter().map(|v| v * v).sum::<f64>();
        let y = freq_shift(&signal, fshift, 512.0).unwrap();
        prop_assert!(energy(&y) <= 2.0 * energy(&signal) + 1e-9);
    }

    /// Interpolated PSD values stay within the range of their knots.
    #[test]
    fn interpolated_psd_bounded_by_knots(
        power in prop::collection::vec(0.0f64..10.0, 2..50),
        query in -10.0f64..100.0,
    ) {
        let freqs: Vec<f64> = (0..power.len()).map(|i| i as f64).collect();
        let lo = power.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = power.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let psd = InterpolatedPsd::new(freqs, power).unwrap();

        let p = psd.power(query);
        prop_assert!(p >= lo - 1e-12 && p <= hi + 1e-12);
    }
}
