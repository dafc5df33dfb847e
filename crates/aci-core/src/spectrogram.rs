use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Frequency × time magnitude (or power) matrix.
///
/// Rows are frequency bins in ascending order, columns are frames in the
/// order the slicer produced them. Values are stored row-major so that a
/// single bin's history is one contiguous slice.
///
/// `frequencies` has one entry per row (Hz), `times` one entry per column
/// (seconds at the frame anchor).
///
/// # Example
/// ```
/// use aci_core::spectrogram::Spectrogram;
/// let spec = Spectrogram::from_rows(&[vec![1.0, 2.0, 3.0], vec![0.0, 0.5, 0.0]]).unwrap();
/// assert_eq!(spec.shape(), (2, 3));
/// assert_eq!(spec.row(0), &[1.0, 2.0, 3.0]);
/// assert_eq!(spec.value(1, 1), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram {
    bins: usize,
    frames: usize,
    values: Vec<f64>,
    frequencies: Vec<f64>,
    times: Vec<f64>,
}

impl Spectrogram {
    /// Assemble a spectrogram from a row-major buffer and its two axes.
    ///
    /// # Errors
    /// [`CoreError::Config`] if the buffer or an axis disagrees with
    /// `bins × frames`.
    pub fn new(
        bins: usize,
        frames: usize,
        values: Vec<f64>,
        frequencies: Vec<f64>,
        times: Vec<f64>,
    ) -> CoreResult<Self> {
        let spec = Self {
            bins,
            frames,
            values,
            frequencies,
            times,
        };
        spec.check_shape()?;
        Ok(spec)
    }

    /// Build from explicit rows; both axes are plain indices.
    ///
    /// # Errors
    /// [`CoreError::Config`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> CoreResult<Self> {
        let bins = rows.len();
        let frames = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != frames) {
            return Err(CoreError::Config("rows of unequal length".into()));
        }
        let values = rows.iter().flatten().copied().collect();
        Self::new(
            bins,
            frames,
            values,
            (0..bins).map(|k| k as f64).collect(),
            (0..frames).map(|t| t as f64).collect(),
        )
    }

    /// Re-check the invariants, e.g. after deserialization.
    ///
    /// # Errors
    /// [`CoreError::Config`] on any length mismatch.
    pub fn check_shape(&self) -> CoreResult<()> {
        if self.values.len() != self.bins * self.frames {
            return Err(CoreError::Config(format!(
                "spectrogram buffer holds {} values, expected {}×{}",
                self.values.len(),
                self.bins,
                self.frames
            )));
        }
        if self.frequencies.len() != self.bins {
            return Err(CoreError::Config(format!(
                "frequency axis has {} entries for {} bins",
                self.frequencies.len(),
                self.bins
            )));
        }
        if self.times.len() != self.frames {
            return Err(CoreError::Config(format!(
                "time axis has {} entries for {} frames",
                self.times.len(),
                self.frames
            )));
        }
        Ok(())
    }

    /// Number of frequency rows.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of time columns.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// `(bins, frames)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.bins, self.frames)
    }

    /// `true` when there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Entry at (`bin`, `frame`).
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[must_use]
    pub fn value(&self, bin: usize, frame: usize) -> f64 {
        assert!(frame < self.frames, "frame index out of range");
        self.values[bin * self.frames + frame]
    }

    /// One frequency bin across all frames.
    ///
    /// # Panics
    /// Panics if `bin >= bins()`.
    #[must_use]
    pub fn row(&self, bin: usize) -> &[f64] {
        &self.values[bin * self.frames..(bin + 1) * self.frames]
    }

    /// Iterate over rows, lowest frequency first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.bins).map(|k| self.row(k))
    }

    /// One frame across all bins, lowest frequency first.
    pub fn column(&self, frame: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.bins).map(move |k| self.value(k, frame))
    }

    /// Row-major value buffer.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Frequency of each row in Hz.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Anchor time of each column in seconds.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Largest entry, 0 for an empty matrix.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0f64, f64::max)
    }

    /// Smallest entry, 0 for an empty matrix.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}
