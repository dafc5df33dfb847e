use serde::{Deserialize, Serialize};

/// Acoustic Complexity Index of one spectrogram.
///
/// `global` is always the sum of `per_block`, computed here from the blocks
/// so the two cannot drift apart.
///
/// # Example
/// ```
/// use aci_core::aci::AciResult;
/// let result = AciResult::from_blocks(vec![1.5, 2.0, 0.25], 10);
/// assert_eq!(result.global(), 3.75);
/// assert_eq!(result.block_count(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AciResult {
    global: f64,
    per_block: Vec<f64>,
    block_size: usize,
}

impl AciResult {
    /// Sum `per_block` in time order.
    #[must_use]
    pub fn from_blocks(per_block: Vec<f64>, block_size: usize) -> Self {
        let global = per_block.iter().sum();
        Self {
            global,
            per_block,
            block_size,
        }
    }

    /// No block fitted: global 0, no per-block values.
    #[must_use]
    pub fn empty(block_size: usize) -> Self {
        Self {
            global: 0.0,
            per_block: Vec::new(),
            block_size,
        }
    }

    /// Sum over all blocks.
    #[must_use]
    pub fn global(&self) -> f64 {
        self.global
    }

    /// One value per block, in time order.
    #[must_use]
    pub fn per_block(&self) -> &[f64] {
        &self.per_block
    }

    /// Columns per block.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.per_block.len()
    }

    /// `true` when no block fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_block.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_zero() {
        let result = AciResult::empty(7);
        assert_eq!(result.global(), 0.0);
        assert!(result.is_empty());
        assert_eq!(result.block_size(), 7);
    }

    #[test]
    fn global_matches_sum_exactly() {
        let blocks = vec![0.1, 0.2, 0.3, 1e-17, 42.0];
        let expected: f64 = blocks.iter().sum();
        let result = AciResult::from_blocks(blocks, 5);
        assert_eq!(result.global().to_bits(), expected.to_bits());
    }
}
