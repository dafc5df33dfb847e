//! Acoustic Complexity Index (Pieretti, Farina & Morri, 2011).

use std::ops::Range;

use aci_core::aci::AciResult;
use aci_core::error::{CoreError, CoreResult};
use aci_core::spectrogram::Spectrogram;

/// Trailing spectrogram columns excluded from block partitioning.
///
/// The last frames of a recording are often cut short by the recorder; they
/// are left out of the index rather than scored.
pub const TAIL_MARGIN: usize = 10;

/// Column ranges of the blocks scored for a spectrogram of `frames` columns.
///
/// Blocks start every `block_size` columns while the start lies before
/// `frames − TAIL_MARGIN`; a block may extend into the tail, but one that
/// would run past the last column is dropped.
///
/// # Example
/// ```
/// use aci_audio::aci::block_ranges;
/// assert_eq!(block_ranges(35, 10), vec![0..10, 10..20, 20..30]);
/// assert_eq!(block_ranges(15, 10), vec![0..10]);
/// assert!(block_ranges(10, 1).is_empty());
/// ```
#[must_use]
pub fn block_ranges(frames: usize, block_size: usize) -> Vec<Range<usize>> {
    if block_size == 0 {
        return Vec::new();
    }
    (0..frames.saturating_sub(TAIL_MARGIN))
        .step_by(block_size)
        .map(|start| start..start + block_size)
        .take_while(|block| block.end <= frames)
        .collect()
}

/// ACI of one frequency row over one block: total absolute change divided by
/// total intensity, 0 for a silent row.
fn row_contribution(row: &[f64]) -> f64 {
    let total: f64 = row.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let change: f64 = row.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    change / total
}

/// Compute the ACI of `spectrogram` with blocks of `block_size` columns.
///
/// Spectrograms too short for a single block give an empty result with a
/// global value of 0.
///
/// # Errors
/// [`CoreError::NonPositive`] if `block_size` is 0.
///
/// # Example
/// ```
/// use aci_audio::aci::compute_aci;
/// use aci_core::spectrogram::Spectrogram;
/// let rows = vec![vec![1.0, 3.0, 1.0, 3.0].repeat(5)];
/// let spec = Spectrogram::from_rows(&rows).unwrap();
/// let result = compute_aci(&spec, 2).unwrap();
/// assert_eq!(result.per_block(), &[0.5; 5]);
/// assert_eq!(result.global(), 2.5);
/// ```
pub fn compute_aci(spectrogram: &Spectrogram, block_size: usize) -> CoreResult<AciResult> {
    if block_size == 0 {
        return Err(CoreError::NonPositive { name: "block size" });
    }

    let blocks = block_ranges(spectrogram.frames(), block_size);
    if blocks.is_empty() {
        return Ok(AciResult::empty(block_size));
    }

    let per_block: Vec<f64> = blocks
        .into_iter()
        .map(|range| {
            spectrogram
                .rows()
                .map(|row| row_contribution(&row[range.clone()]))
                .sum::<f64>()
        })
        .collect();

    Ok(AciResult::from_blocks(per_block, block_size))
}
