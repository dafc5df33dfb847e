use crate::error::{CoreError, CoreResult};

/// Mono sample buffer plus its sample rate.
///
/// Immutable once built: produced by the loader, consumed by the spectrogram
/// transform.
///
/// # Example
/// ```
/// use aci_core::signal::AudioSignal;
/// let signal = AudioSignal::new(vec![0.0; 22050], 22050).unwrap();
/// assert!((signal.duration_secs() - 1.0).abs() < 1e-12);
/// assert!(AudioSignal::new(vec![0.0; 4], 0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioSignal {
    /// Wrap `samples` recorded at `sample_rate` Hz.
    ///
    /// # Errors
    /// [`CoreError::NonPositive`] if `sample_rate` is 0.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> CoreResult<Self> {
        if sample_rate == 0 {
            return Err(CoreError::NonPositive {
                name: "sample rate",
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Widen `f32` samples (as produced by decoders) to `f64`.
    ///
    /// # Errors
    /// [`CoreError::NonPositive`] if `sample_rate` is 0.
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> CoreResult<Self> {
        Self::new(samples.iter().map(|&s| f64::from(s)).collect(), sample_rate)
    }

    /// Sample values.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value, 0 for an empty signal.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_uses_absolute_value() {
        let signal = AudioSignal::new(vec![0.25, -0.75, 0.5], 8000).unwrap();
        assert!((signal.peak() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_signal_is_valid() {
        let signal = AudioSignal::from_f32(&[], 44100).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.peak(), 0.0);
        assert_eq!(signal.duration_secs(), 0.0);
    }
}
