use std::borrow::Cow;
use std::sync::Arc;

use aci_core::config::{SpectrogramFlags, WindowSpec};
use aci_core::error::{CoreError, CoreResult};
use aci_core::signal::AudioSignal;
use aci_core::spectrogram::Spectrogram;
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::frames::FrameSlicer;
use crate::window::compute_window;

/// Spectrogram pipeline: framed, windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan, window and scratch buffers once; `compute`
/// can then be called on any number of signals with the same geometry.
///
/// # Example
/// ```
/// use aci_audio::fft::SpectrogramTransform;
/// use aci_core::config::{SpectrogramFlags, WindowSpec};
/// let transform = SpectrogramTransform::new(WindowSpec::default(), SpectrogramFlags::default());
/// assert!(transform.is_ok());
/// ```
pub struct SpectrogramTransform {
    spec: WindowSpec,
    flags: SpectrogramFlags,
    slicer: FrameSlicer,
    input_buf: Vec<f64>,
    spectrum_buf: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
    plan: Arc<dyn RealToComplex<f64>>,
    /// Window coefficients, one per frame sample.
    window: Vec<f64>,
}

impl SpectrogramTransform {
    /// Plan the FFT and compute the window for `spec`.
    ///
    /// # Errors
    /// [`CoreError::NonPositive`] if the window length or hop is 0.
    pub fn new(spec: WindowSpec, flags: SpectrogramFlags) -> CoreResult<Self> {
        let slicer = FrameSlicer::new(&spec)?;
        let window = compute_window(spec.kind, spec.length)?;

        let mut planner = RealFftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(spec.length);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        Ok(Self {
            spec,
            flags,
            slicer,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        })
    }

    /// Window geometry.
    #[must_use]
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Post-processing switches.
    #[must_use]
    pub fn flags(&self) -> &SpectrogramFlags {
        &self.flags
    }

    /// Rows each spectrogram will have.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.flags.bins.bin_count(self.spec.length)
    }

    /// Frequency of each retained row: `k · (sr/2) / floor(L/2)`.
    ///
    /// A one-sample window has no half length; its single kept bin sits at 0 Hz.
    #[must_use]
    pub fn frequency_axis(&self, sample_rate: u32) -> Vec<f64> {
        let half = self.spec.half_length();
        if half == 0 {
            return vec![0.0; self.bin_count()];
        }
        let nyquist = f64::from(sample_rate) / 2.0;
        (0..self.bin_count())
            .map(|k| k as f64 * nyquist / half as f64)
            .collect()
    }

    /// Compute the spectrogram of `signal`.
    ///
    /// Signals shorter than the window give a spectrogram with zero columns.
    ///
    /// # Errors
    /// [`CoreError::Fft`] if the FFT plan rejects its buffers.
    pub fn compute(&mut self, signal: &AudioSignal) -> CoreResult<Spectrogram> {
        self.compute_samples(signal.samples(), signal.sample_rate())
    }

    fn compute_samples(&mut self, samples: &[f64], sample_rate: u32) -> CoreResult<Spectrogram> {
        let samples = if self.flags.scale_audio {
            scale_to_unit(samples)
        } else {
            Cow::Borrowed(samples)
        };

        let bins = self.bin_count();
        let frames = self.slicer.frame_count(samples.len());
        let mut values = vec![0.0; bins * frames];

        for (t, frame) in self.slicer.frames(&samples).enumerate() {
            // Copy and window
            for ((slot, &s), &w) in self.input_buf.iter_mut().zip(frame).zip(&self.window) {
                *slot = s * w;
            }

            // Forward FFT
            self.plan
                .process_with_scratch(
                    &mut self.input_buf,
                    &mut self.spectrum_buf,
                    &mut self.scratch,
                )
                .map_err(|e| CoreError::Fft(e.to_string()))?;

            // Magnitude (or power), written down column t
            for (k, c) in self.spectrum_buf.iter().take(bins).enumerate() {
                let magnitude = c.norm();
                values[k * frames + t] = if self.flags.square {
                    magnitude * magnitude
                } else {
                    magnitude
                };
            }
        }

        if self.flags.normalized {
            let max = values.iter().copied().fold(0.0f64, f64::max);
            if max > 0.0 {
                for v in &mut values {
                    *v /= max;
                }
            }
        }

        let rate = f64::from(sample_rate);
        let times = (0..frames)
            .map(|t| self.slicer.anchor(t) as f64 / rate)
            .collect();

        Spectrogram::new(
            bins,
            frames,
            values,
            self.frequency_axis(sample_rate),
            times,
        )
    }
}

/// Divide by the peak absolute value; silence is passed through unchanged.
fn scale_to_unit(samples: &[f64]) -> Cow<'_, [f64]> {
    let peak = samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        Cow::Owned(samples.iter().map(|s| s / peak).collect())
    } else {
        Cow::Borrowed(samples)
    }
}

/// One-shot spectrogram of a raw sample buffer.
///
/// # Errors
/// [`CoreError::NonPositive`] for a zero sample rate, window length or hop.
///
/// # Example
/// ```
/// use aci_audio::fft::compute_spectrogram;
/// use aci_core::config::{SpectrogramFlags, WindowSpec};
/// let spec = compute_spectrogram(&[0.0; 3], 22050, &WindowSpec::default(), &SpectrogramFlags::default()).unwrap();
/// assert_eq!(spec.shape(), (256, 0));
/// ```
pub fn compute_spectrogram(
    samples: &[f64],
    sample_rate: u32,
    spec: &WindowSpec,
    flags: &SpectrogramFlags,
) -> CoreResult<Spectrogram> {
    if sample_rate == 0 {
        return Err(CoreError::NonPositive {
            name: "sample rate",
        });
    }
    SpectrogramTransform::new(*spec, *flags)?.compute_samples(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aci_core::config::{BinRetention, WindowType};
    use std::f64::consts::PI;

    fn amplitude_flags() -> SpectrogramFlags {
        SpectrogramFlags {
            scale_audio: false,
            square: false,
            normalized: false,
            bins: BinRetention::DropNyquist,
        }
    }

    #[test]
    fn ramp_gives_seven_columns_of_two_bins() {
        let samples: Vec<f64> = (0..16).map(f64::from).collect();
        let spec = WindowSpec::new(4, 2, WindowType::Hann);
        let s = compute_spectrogram(&samples, 8, &spec, &amplitude_flags()).unwrap();
        assert_eq!(s.shape(), (2, 7));
        assert_eq!(s.frequencies(), &[0.0, 2.0]);
        assert_eq!(s.times(), &[0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5]);
    }

    #[test]
    fn ramp_column_matches_manual_dft() {
        let samples: Vec<f64> = (0..16).map(f64::from).collect();
        let spec = WindowSpec::new(4, 2, WindowType::Hann);
        let s = compute_spectrogram(&samples, 8, &spec, &amplitude_flags()).unwrap();
        let w = compute_window(WindowType::Hann, 4).unwrap();
        for t in 0..7 {
            let frame: Vec<f64> = (0..4).map(|i| samples[2 * t + i] * w[i]).collect();
            for k in 0..2 {
                let (mut re, mut im) = (0.0, 0.0);
                for (n, x) in frame.iter().enumerate() {
                    let angle = -2.0 * PI * (k * n) as f64 / 4.0;
                    re += x * angle.cos();
                    im += x * angle.sin();
                }
                let expected = (re * re + im * im).sqrt();
                assert!((s.value(k, t) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn frequency_axis_is_scaled_by_half_window() {
        let transform =
            SpectrogramTransform::new(WindowSpec::new(500, 250, WindowType::Hann), amplitude_flags())
                .unwrap();
        let axis = transform.frequency_axis(44100);
        assert_eq!(axis.len(), 250);
        for (k, f) in axis.iter().enumerate() {
            let expected = k as f64 * (44100.0 / 2.0) / 250.0;
            assert_eq!(f.to_bits(), expected.to_bits(), "bin {k}");
        }
    }

    #[test]
    fn single_sample_window_axis_is_zero() {
        let flags = SpectrogramFlags {
            bins: BinRetention::KeepNyquist,
            ..amplitude_flags()
        };
        let transform =
            SpectrogramTransform::new(WindowSpec::new(1, 1, WindowType::Hann), flags).unwrap();
        assert_eq!(transform.frequency_axis(8000), vec![0.0]);
    }

    #[test]
    fn keep_nyquist_adds_one_row() {
        let flags = SpectrogramFlags {
            bins: BinRetention::KeepNyquist,
            ..SpectrogramFlags::default()
        };
        let s = compute_spectrogram(&vec![0.1; 2048], 1000, &WindowSpec::default(), &flags).unwrap();
        assert_eq!(s.bins(), 257);
        assert_eq!(s.frequencies().len(), 257);
        assert!((s.frequencies()[256] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn square_is_magnitude_squared() {
        let samples: Vec<f64> = (0..64).map(|i| (f64::from(i) * 0.3).sin()).collect();
        let spec = WindowSpec::new(16, 8, WindowType::Hann);
        let amp = compute_spectrogram(&samples, 100, &spec, &amplitude_flags()).unwrap();
        let pow = compute_spectrogram(
            &samples,
            100,
            &spec,
            &SpectrogramFlags {
                square: true,
                ..amplitude_flags()
            },
        )
        .unwrap();
        for (a, p) in amp.values().iter().zip(pow.values()) {
            assert!((a * a - p).abs() < 1e-12);
        }
    }

    #[test]
    fn scaling_makes_output_gain_independent() {
        let samples: Vec<f64> = (0..256).map(|i| (f64::from(i) * 0.2).sin()).collect();
        let loud: Vec<f64> = samples.iter().map(|s| s * 1000.0).collect();
        let flags = SpectrogramFlags::default();
        let spec = WindowSpec::new(64, 32, WindowType::Hann);
        let a = compute_spectrogram(&samples, 1000, &spec, &flags).unwrap();
        let b = compute_spectrogram(&loud, 1000, &spec, &flags).unwrap();
        for (x, y) in a.values().iter().zip(b.values()) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn normalized_peak_is_one() {
        let samples: Vec<f64> = (0..1024).map(|i| (f64::from(i) * 0.05).sin()).collect();
        let flags = SpectrogramFlags {
            normalized: true,
            ..SpectrogramFlags::default()
        };
        let s = compute_spectrogram(&samples, 8000, &WindowSpec::new(128, 64, WindowType::Hann), &flags)
            .unwrap();
        assert!((s.max_value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn silence_is_all_zero_without_nan() {
        let flags = SpectrogramFlags {
            normalized: true,
            ..SpectrogramFlags::default()
        };
        let s = compute_spectrogram(&vec![0.0; 4096], 22050, &WindowSpec::default(), &flags).unwrap();
        assert_eq!(s.frames(), 15);
        assert!(s.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn centered_times_point_at_frame_centers() {
        let spec = WindowSpec {
            centered: true,
            ..WindowSpec::new(100, 50, WindowType::Hann)
        };
        let s = compute_spectrogram(&vec![0.0; 300], 100, &spec, &amplitude_flags()).unwrap();
        assert_eq!(s.times(), &[0.5, 1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        assert!(
            compute_spectrogram(&[0.0; 8], 0, &WindowSpec::default(), &amplitude_flags()).is_err()
        );
    }

    #[test]
    fn transform_is_reusable_across_signals() {
        let mut transform =
            SpectrogramTransform::new(WindowSpec::new(32, 16, WindowType::Hamming), amplitude_flags())
                .unwrap();
        let a = AudioSignal::new(vec![1.0; 64], 1000).unwrap();
        let b = AudioSignal::new(vec![0.0; 10], 1000).unwrap();
        assert_eq!(transform.compute(&a).unwrap().frames(), 3);
        assert_eq!(transform.compute(&b).unwrap().frames(), 0);
    }
}
