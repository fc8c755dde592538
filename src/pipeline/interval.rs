//! Fixed-width interval splitting
//!
//! The baseline splitter: no entropy search at all. At each depth `d` the
//! value axis `[0, max_value]` is cut into bins of width `max_value / 2^d`,
//! and partition boundaries fall wherever the sorted sequence crosses a bin
//! edge. Empty bins produce no partitions, so the boundary count is at most
//! `2^max_depth - 1`.

use crate::events::LabeledValue;

use super::partition::{Partition, SplitTree};
use super::splitter::{FeatureSplitter, SplitResult};

/// Splits a sorted sequence into regular value intervals by successive
/// halving, one halving per depth.
pub struct RegularIntervalSplitter {
    max_depth: u32,
}

impl RegularIntervalSplitter {
    /// `max_depth` must be positive; configuration validation enforces
    /// this before the splitter is built.
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl FeatureSplitter for RegularIntervalSplitter {
    fn split<'a>(&self, values: &'a [LabeledValue]) -> SplitResult<'a> {
        let mut tree = SplitTree::new();
        let n = values.len();
        if n == 0 {
            return SplitResult {
                boundaries: Vec::new(),
                tree,
            };
        }
        // values are sorted ascending, so the axis maximum is the last one
        let max_value = values[n - 1].value;
        if max_value <= 0.0 {
            return SplitResult {
                boundaries: Vec::new(),
                tree,
            };
        }

        for depth in 1..=self.max_depth {
            let interval = max_value / 2f64.powi(depth as i32);
            let level = tree.entry(depth as usize).or_default();

            let mut start = 0usize;
            let mut threshold = interval;
            for (i, pair) in values.iter().enumerate() {
                if pair.value > threshold {
                    if i > start {
                        level.insert(Partition::new(values, start, i - 1));
                        start = i;
                    }
                    while pair.value > threshold {
                        threshold += interval;
                    }
                }
            }
            level.insert(Partition::new(values, start, n - 1));
        }

        // the trailing partition's end is not a cut point
        let boundaries = tree
            .get(&(self.max_depth as usize))
            .map(|level| {
                level
                    .iter()
                    .map(|p| p.end())
                    .filter(|&end| end + 1 < n)
                    .collect()
            })
            .unwrap_or_default();

        SplitResult { boundaries, tree }
    }
}
