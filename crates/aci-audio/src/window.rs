//! Symmetric window functions.
//!
//! Every cosine-sum family is evaluated on `length` points spread evenly over
//! `[-π, π]`, endpoints included, which makes the coefficients symmetric about
//! the center (not the periodic variant used for spectral averaging).

use std::f64::consts::PI;

use aci_core::config::WindowType;
use aci_core::error::{CoreError, CoreResult};

/// Cosine-sum coefficients `a_k` of `w(x) = Σ a_k cos(k x)`.
fn cosine_terms(kind: WindowType) -> &'static [f64] {
    match kind {
        WindowType::Hann => &[0.5, 0.5],
        WindowType::Hamming => &[0.54, 0.46],
        WindowType::Blackman => &[0.42, 0.50, 0.08],
        WindowType::Rectangular => &[1.0],
    }
}

/// Compute `length` coefficients of the symmetric `kind` window.
///
/// # Errors
/// [`CoreError::NonPositive`] if `length` is 0.
///
/// # Example
/// ```
/// use aci_audio::window::compute_window;
/// use aci_core::config::WindowType;
/// let w = compute_window(WindowType::Hann, 5).unwrap();
/// assert_eq!(w.len(), 5);
/// assert!(w[0].abs() < 1e-12 && (w[2] - 1.0).abs() < 1e-12);
/// ```
pub fn compute_window(kind: WindowType, length: usize) -> CoreResult<Vec<f64>> {
    if length == 0 {
        return Err(CoreError::NonPositive {
            name: "window length",
        });
    }
    if length == 1 {
        return Ok(vec![1.0]);
    }

    let terms = cosine_terms(kind);
    let step = 2.0 * PI / (length - 1) as f64;

    let window = (0..length)
        .map(|n| {
            let x = if n == length - 1 {
                PI
            } else {
                n as f64 * step - PI
            };
            terms
                .iter()
                .enumerate()
                .map(|(k, &a)| a * (k as f64 * x).cos())
                .sum()
        })
        .collect();

    Ok(window)
}

/// Look up a window family by name, then compute it.
///
/// # Errors
/// [`CoreError::UnknownWindow`] for an unrecognized name,
/// [`CoreError::NonPositive`] if `length` is 0.
///
/// # Example
/// ```
/// use aci_audio::window::window_by_name;
/// assert_eq!(window_by_name("hamming", 8).unwrap().len(), 8);
/// assert!(window_by_name("triangle", 8).is_err());
/// ```
pub fn window_by_name(name: &str, length: usize) -> CoreResult<Vec<f64>> {
    compute_window(name.parse()?, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric(w: &[f64]) {
        let n = w.len();
        for i in 0..n / 2 {
            assert!(
                (w[i] - w[n - 1 - i]).abs() < 1e-12,
                "coefficient {i} differs from its mirror"
            );
        }
    }

    #[test]
    fn length_matches_for_every_family() {
        for kind in WindowType::ALL {
            for len in [1, 2, 3, 4, 17, 256, 512, 1023] {
                assert_eq!(compute_window(kind, len).unwrap().len(), len);
            }
        }
    }

    #[test]
    fn all_families_are_symmetric() {
        for kind in WindowType::ALL {
            assert_symmetric(&compute_window(kind, 64).unwrap());
            assert_symmetric(&compute_window(kind, 65).unwrap());
        }
    }

    #[test]
    fn hann_matches_closed_form() {
        let len = 16;
        let w = compute_window(WindowType::Hann, len).unwrap();
        for (n, &v) in w.iter().enumerate() {
            let expected = 0.5 - 0.5 * (2.0 * PI * n as f64 / (len - 1) as f64).cos();
            assert!((v - expected).abs() < 1e-12);
        }
        assert_eq!(w[0], 0.0);
        assert_eq!(w[len - 1], 0.0);
    }

    #[test]
    fn hamming_endpoints_sit_on_pedestal() {
        let w = compute_window(WindowType::Hamming, 9).unwrap();
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blackman_peaks_at_one() {
        let w = compute_window(WindowType::Blackman, 11).unwrap();
        assert!((w[5] - 1.0).abs() < 1e-12);
        assert!(w[0].abs() < 1e-12);
    }

    #[test]
    fn rectangular_is_all_ones() {
        assert!(
            compute_window(WindowType::Rectangular, 10)
                .unwrap()
                .iter()
                .all(|&v| v == 1.0)
        );
    }

    #[test]
    fn zero_length_is_a_configuration_error() {
        assert_eq!(
            compute_window(WindowType::Hann, 0),
            Err(CoreError::NonPositive {
                name: "window length"
            })
        );
    }

    #[test]
    fn single_point_window_is_one() {
        assert_eq!(compute_window(WindowType::Blackman, 1).unwrap(), vec![1.0]);
    }
}
