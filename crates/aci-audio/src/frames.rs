use std::iter::FusedIterator;

use aci_core::config::WindowSpec;
use aci_core::error::CoreResult;

/// Splits a sample buffer into overlapping fixed-length frames.
///
/// Frames start at `0, hop, 2·hop, …` and stop as soon as the next frame
/// would run past the end; trailing samples are dropped, never padded.
///
/// In centered mode the frame centers sit at `L/2, L/2 + hop, …` and a frame
/// spans `[center − L/2, center − L/2 + L)`, so the frames themselves are the
/// same as in the non-centered mode. Only their anchor (reported by
/// [`FrameSlicer::anchor`]) moves from the first sample to the center.
///
/// # Example
/// ```
/// use aci_audio::frames::FrameSlicer;
/// use aci_core::config::{WindowSpec, WindowType};
/// let slicer = FrameSlicer::new(&WindowSpec::new(4, 2, WindowType::Hann)).unwrap();
/// let samples: Vec<f64> = (0..16).map(f64::from).collect();
/// assert_eq!(slicer.frame_count(samples.len()), 7);
/// let last = slicer.frames(&samples).last().unwrap();
/// assert_eq!(last, &[12.0, 13.0, 14.0, 15.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSlicer {
    length: usize,
    hop: usize,
    centered: bool,
}

impl FrameSlicer {
    /// Build a slicer from a validated window spec.
    ///
    /// # Errors
    /// [`aci_core::CoreError::NonPositive`] if length or hop is 0.
    pub fn new(spec: &WindowSpec) -> CoreResult<Self> {
        spec.validate()?;
        Ok(Self {
            length: spec.length,
            hop: spec.hop,
            centered: spec.centered,
        })
    }

    /// Frame length in samples.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Hop in samples.
    #[must_use]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of frames for a buffer of `n` samples:
    /// `floor((n − L) / hop) + 1` when `n ≥ L`, else 0.
    #[must_use]
    pub fn frame_count(&self, n: usize) -> usize {
        if n < self.length {
            0
        } else {
            (n - self.length) / self.hop + 1
        }
    }

    /// First sample of frame `index`.
    #[must_use]
    pub fn start(&self, index: usize) -> usize {
        index * self.hop
    }

    /// Sample position the frame is attributed to: its first sample, or its
    /// center in centered mode.
    #[must_use]
    pub fn anchor(&self, index: usize) -> usize {
        if self.centered {
            self.start(index) + self.length / 2
        } else {
            self.start(index)
        }
    }

    /// Lazily iterate over the frames of `samples`. The returned iterator can
    /// be cloned to restart from its current position.
    #[must_use]
    pub fn frames<'a>(&self, samples: &'a [f64]) -> Frames<'a> {
        Frames {
            samples,
            length: self.length,
            hop: self.hop,
            next: 0,
            count: self.frame_count(samples.len()),
        }
    }
}

/// Iterator over the frames of one buffer, see [`FrameSlicer::frames`].
#[derive(Clone, Debug)]
pub struct Frames<'a> {
    samples: &'a [f64],
    length: usize,
    hop: usize,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let start = self.next * self.hop;
        self.next += 1;
        Some(&self.samples[start..start + self.length])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use aci_core::config::WindowType;

    fn slicer(length: usize, hop: usize, centered: bool) -> FrameSlicer {
        FrameSlicer::new(&WindowSpec {
            length,
            hop,
            kind: WindowType::Hann,
            centered,
        })
        .unwrap()
    }

    #[test]
    fn ramp_yields_seven_frames_with_expected_bounds() {
        let samples: Vec<f64> = (0..16).map(f64::from).collect();
        let s = slicer(4, 2, false);
        let frames: Vec<&[f64]> = s.frames(&samples).collect();
        assert_eq!(frames.len(), 7);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(*frame, &samples[2 * i..2 * i + 4]);
        }
    }

    #[test]
    fn count_matches_closed_form_over_sweep() {
        for n in 0..200 {
            for length in 1..24 {
                for hop in 1..12 {
                    let s = slicer(length, hop, false);
                    let expected = if n >= length {
                        (n - length) / hop + 1
                    } else {
                        0
                    };
                    let samples = vec![0.0; n];
                    assert_eq!(s.frame_count(n), expected);
                    assert_eq!(s.frames(&samples).count(), expected);
                }
            }
        }
    }

    #[test]
    fn short_buffer_yields_no_frames() {
        let s = slicer(512, 256, false);
        assert_eq!(s.frames(&[1.0, 2.0, 3.0]).next(), None);
    }

    #[test]
    fn centered_frames_stay_inside_the_buffer() {
        let samples: Vec<f64> = (0..20).map(f64::from).collect();
        let s = slicer(6, 4, true);
        let frames: Vec<&[f64]> = s.frames(&samples).collect();
        assert_eq!(frames.len(), 4);
        for (i, frame) in frames.iter().enumerate() {
            let center = s.anchor(i);
            assert_eq!(center, 3 + 4 * i);
            assert_eq!(frame[0], (center - 3) as f64);
            assert!(center + 3 <= samples.len());
        }
    }

    #[test]
    fn anchors_follow_mode() {
        assert_eq!(slicer(8, 3, false).anchor(2), 6);
        assert_eq!(slicer(8, 3, true).anchor(2), 10);
    }

    #[test]
    fn iterator_is_restartable_and_exact() {
        let samples = vec![0.5; 10];
        let s = slicer(4, 3, false);
        let it = s.frames(&samples);
        assert_eq!(it.len(), 3);
        let again = it.clone();
        assert_eq!(it.count(), again.count());
        assert_eq!(s.frames(&samples).count(), 3);
    }

    #[test]
    fn zero_hop_is_rejected() {
        assert!(
            FrameSlicer::new(&WindowSpec {
                length: 4,
                hop: 0,
                kind: WindowType::Hann,
                centered: false,
            })
            .is_err()
        );
    }
}
