//! Recursive entropy-driven split search
//!
//! The recursive driver repeatedly cuts a sorted (outcome, value) sequence
//! at the index of maximum information gain, consulting a pluggable
//! [`SplitStrategy`] to decide whether each candidate cut is worth keeping.
//! Every decision records the resulting partitions (two children on accept,
//! the node unchanged on reject) into a per-depth [`SplitTree`] so callers
//! can compute level-by-level entropy afterwards.

use std::collections::{BTreeMap, BTreeSet};

use crate::events::LabeledValue;

use super::entropy;
use super::partition::{Partition, SplitTree};

/// Outcome of one top-level split run.
pub struct SplitResult<'a> {
    /// Ascending boundary indices `i`: everything at `i` or below falls in
    /// one bucket, everything above in the next.
    pub boundaries: Vec<usize>,
    /// Partitions recorded at each recursion depth.
    pub tree: SplitTree<'a>,
}

/// A top-level splitting policy: turns a sorted labeled-value sequence into
/// boundary indices plus the per-depth partition record.
pub trait FeatureSplitter: Send + Sync {
    fn split<'a>(&self, values: &'a [LabeledValue]) -> SplitResult<'a>;
}

/// Decides whether the best candidate cut found for a partition should be
/// kept. Consulted once per node with the candidate index of strictly
/// greatest information gain.
pub trait SplitStrategy: Send + Sync {
    fn accept_split(&self, partition: &Partition<'_>, index: usize, gain: f64) -> bool;
}

/// Accept a split when its gain reaches a configured fraction of the parent
/// partition's own entropy (not of the global root entropy).
pub struct InformationGainThreshold {
    threshold: f64,
}

impl InformationGainThreshold {
    /// `threshold` must lie in `[0, 1)`; configuration validation enforces
    /// this before a splitter is built.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl SplitStrategy for InformationGainThreshold {
    fn accept_split(&self, partition: &Partition<'_>, _index: usize, gain: f64) -> bool {
        gain >= self.threshold * partition.entropy()
    }
}

/// Fayyad & Irani's minimum description length stop test: accept a split
/// only when its gain exceeds the encoding cost of describing it.
pub struct FayyadIraniMdl;

impl SplitStrategy for FayyadIraniMdl {
    fn accept_split(&self, partition: &Partition<'_>, index: usize, _gain: f64) -> bool {
        let values = partition.values();
        let (start, end) = (partition.start(), partition.end());

        let mut left_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut right_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, pair) in values.iter().enumerate().take(end + 1).skip(start) {
            let side = if i <= index {
                &mut left_counts
            } else {
                &mut right_counts
            };
            *side.entry(pair.outcome.as_str()).or_insert(0) += 1;
        }

        let total = partition.size() as f64;
        let left_size = index - start + 1;
        let right_size = end - index;

        let prior_entropy = partition.entropy();
        let entropy_left = entropy::entropy(left_counts.values(), left_size);
        let entropy_right = entropy::entropy(right_counts.values(), right_size);
        let split_entropy = (left_size as f64 / total) * entropy_left
            + (right_size as f64 / total) * entropy_right;
        let gain = prior_entropy - split_entropy;

        // classes present in the whole node and in each child
        let k = partition.outcome_counts().len() as f64;
        let k_left = left_counts.len() as f64;
        let k_right = right_counts.len() as f64;

        let delta = (3f64.powf(k) - 2.0).ln()
            - (k * prior_entropy - k_right * entropy_right - k_left * entropy_left);
        let mdl_penalty = ((total - 1.0).ln() + delta) / total;

        gain > mdl_penalty
    }
}

struct BestSplit {
    index: usize,
    gain: f64,
    entropy_left: f64,
    entropy_right: f64,
}

/// Binary recursive partitioner driven by a [`SplitStrategy`].
pub struct RecursiveSplitter<S: SplitStrategy> {
    strategy: S,
    min_node_size: usize,
    max_depth: Option<u32>,
    min_error_rate: Option<f64>,
}

impl<S: SplitStrategy> RecursiveSplitter<S> {
    pub fn new(
        strategy: S,
        min_node_size: usize,
        max_depth: Option<u32>,
        min_error_rate: Option<f64>,
    ) -> Self {
        Self {
            strategy,
            min_node_size,
            max_depth,
            min_error_rate,
        }
    }

    fn split_internal<'a>(
        &self,
        partition: Partition<'a>,
        depth: usize,
        boundaries: &mut BTreeSet<usize>,
        tree: &mut SplitTree<'a>,
    ) {
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth as usize {
                return;
            }
        }
        let values = partition.values();
        let (start, end) = (partition.start(), partition.end());

        let Some(index) = self.find_best_split(partition, depth, tree) else {
            return;
        };
        boundaries.insert(index);

        if index - start + 1 >= 2 * self.min_node_size {
            self.split_internal(Partition::new(values, start, index), depth + 1, boundaries, tree);
        }
        if end - index >= 2 * self.min_node_size {
            self.split_internal(Partition::new(values, index + 1, end), depth + 1, boundaries, tree);
        }
    }

    /// Search `partition` for the boundary of strictly greatest information
    /// gain and ask the strategy whether to keep it. Records the resulting
    /// partitions (children on accept, the node itself on reject) at
    /// `depth` in the tree.
    fn find_best_split<'a>(
        &self,
        partition: Partition<'a>,
        depth: usize,
        tree: &mut SplitTree<'a>,
    ) -> Option<usize> {
        let level = tree.entry(depth).or_default();
        let values = partition.values();
        let (start, end) = (partition.start(), partition.end());
        let total = partition.size();
        let parent_entropy = partition.entropy();

        // a single-outcome node cannot be improved
        if parent_entropy == 0.0 {
            level.insert(partition);
            return None;
        }

        if let Some(min_error_rate) = self.min_error_rate {
            let misclassified = total - partition.majority_outcome_count();
            let error_rate = misclassified as f64 / total as f64 * 100.0;
            if min_error_rate > 0.0 && error_rate < min_error_rate {
                level.insert(partition);
                return None;
            }
        }

        // Single left-to-right sweep: move one element at a time from the
        // right count table to the left one, so the whole search is O(n)
        // per partition rather than O(n^2).
        let mut right_counts: BTreeMap<&str, usize> = partition.outcome_counts().clone();
        let mut left_counts: BTreeMap<&str, usize> =
            right_counts.keys().map(|&outcome| (outcome, 0)).collect();
        let mut left_total = 0usize;
        let mut right_total = total;

        let mut best: Option<BestSplit> = None;
        for i in start..end {
            let outcome = values[i].outcome.as_str();
            *left_counts.entry(outcome).or_insert(0) += 1;
            if let Some(count) = right_counts.get_mut(outcome) {
                *count -= 1;
            }
            left_total += 1;
            right_total -= 1;

            // cannot cut between tied values: both must land on one side
            if values[i].value == values[i + 1].value {
                continue;
            }
            if left_total < self.min_node_size || right_total < self.min_node_size {
                continue;
            }

            let entropy_left = entropy::entropy(left_counts.values(), left_total);
            let entropy_right = entropy::entropy(right_counts.values(), right_total);
            let split_entropy = (left_total as f64 / total as f64) * entropy_left
                + (right_total as f64 / total as f64) * entropy_right;
            let gain = parent_entropy - split_entropy;

            // strict > keeps the lowest index among equal-gain candidates
            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(BestSplit {
                    index: i,
                    gain,
                    entropy_left,
                    entropy_right,
                });
            }
        }

        let accepted =
            best.filter(|b| self.strategy.accept_split(&partition, b.index, b.gain));
        match accepted {
            Some(b) => {
                level.insert(Partition::with_entropy(values, start, b.index, b.entropy_left));
                level.insert(Partition::with_entropy(values, b.index + 1, end, b.entropy_right));
                Some(b.index)
            }
            None => {
                level.insert(partition);
                None
            }
        }
    }
}

impl<S: SplitStrategy> FeatureSplitter for RecursiveSplitter<S> {
    fn split<'a>(&self, values: &'a [LabeledValue]) -> SplitResult<'a> {
        let mut boundaries = BTreeSet::new();
        let mut tree = SplitTree::new();
        if !values.is_empty() {
            let root = Partition::new(values, 0, values.len() - 1);
            self.split_internal(root, 1, &mut boundaries, &mut tree);
        }
        SplitResult {
            boundaries: boundaries.into_iter().collect(),
            tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::LabeledValue;

    fn labeled(pairs: &[(&str, f64)]) -> Vec<LabeledValue> {
        pairs
            .iter()
            .map(|&(outcome, value)| LabeledValue::new(outcome, value))
            .collect()
    }

    fn info_gain_splitter(threshold: f64) -> RecursiveSplitter<InformationGainThreshold> {
        RecursiveSplitter::new(InformationGainThreshold::new(threshold), 1, None, None)
    }

    #[test]
    fn test_root_split_lands_at_maximum_gain() {
        // A B B A A: the best cut separates the B-run plus leading A from
        // the trailing A-run, between indices 2 and 3
        let values = labeled(&[("A", 1.0), ("B", 2.0), ("B", 3.0), ("A", 4.0), ("A", 4.0)]);
        let splitter = RecursiveSplitter::new(InformationGainThreshold::new(0.01), 2, None, None);
        let result = splitter.split(&values);
        assert_eq!(result.boundaries, [2]);
    }

    #[test]
    fn test_pure_sequence_yields_no_boundaries() {
        let values = labeled(&[("A", 1.0), ("A", 2.0), ("A", 3.0), ("A", 4.0)]);
        let result = info_gain_splitter(0.0).split(&values);
        assert!(result.boundaries.is_empty());
        // the root partition is still recorded, unchanged, at depth 1
        let depth1 = &result.tree[&1];
        assert_eq!(depth1.len(), 1);
        assert_eq!(depth1.iter().next().map(|p| (p.start(), p.end())), Some((0, 3)));
    }

    #[test]
    fn test_default_threshold_scenario_finds_two_boundaries() {
        let values = labeled(&[
            ("A", 1.0),
            ("B", 2.0),
            ("B", 3.0),
            ("B", 4.0),
            ("A", 5.0),
            ("A", 5.0),
        ]);
        let result = info_gain_splitter(0.0).split(&values);
        assert_eq!(result.boundaries, [0, 3]);
    }

    #[test]
    fn test_mdl_scenario_finds_two_boundaries() {
        let values = labeled(&[
            ("A", 1.0),
            ("B", 2.0),
            ("B", 3.0),
            ("B", 4.0),
            ("B", 4.0),
            ("A", 5.0),
            ("A", 5.0),
            ("A", 5.0),
            ("A", 6.0),
        ]);
        let splitter = RecursiveSplitter::new(FayyadIraniMdl, 1, None, None);
        let result = splitter.split(&values);
        assert_eq!(result.boundaries, [0, 4]);
    }

    #[test]
    fn test_never_cuts_between_tied_values() {
        // the only informative cut would fall inside the tie at 2.0
        let values = labeled(&[("A", 1.0), ("A", 2.0), ("B", 2.0), ("B", 3.0)]);
        let result = info_gain_splitter(0.0).split(&values);
        for &boundary in &result.boundaries {
            assert_ne!(values[boundary].value, values[boundary + 1].value);
        }
    }

    #[test]
    fn test_min_node_size_limits_candidates() {
        let values = labeled(&[("A", 1.0), ("B", 2.0), ("B", 3.0), ("B", 4.0)]);
        // min_node_size 2 forbids the otherwise-best cut after index 0
        let splitter = RecursiveSplitter::new(InformationGainThreshold::new(0.0), 2, None, None);
        let result = splitter.split(&values);
        assert_eq!(result.boundaries, [1]);
    }

    #[test]
    fn test_max_depth_bounds_boundary_count() {
        let values = labeled(&[
            ("A", 1.0),
            ("B", 2.0),
            ("A", 3.0),
            ("B", 4.0),
            ("A", 5.0),
            ("B", 6.0),
            ("A", 7.0),
            ("B", 8.0),
        ]);
        let splitter =
            RecursiveSplitter::new(InformationGainThreshold::new(0.0), 1, Some(2), None);
        let result = splitter.split(&values);
        assert!(result.boundaries.len() <= 3, "got {:?}", result.boundaries);
        assert!(result.tree.keys().all(|&depth| depth <= 2));
    }

    #[test]
    fn test_min_error_rate_skips_nearly_pure_nodes() {
        // one B among nine As: error rate 10%, below the 20% floor
        let values = labeled(&[
            ("A", 1.0),
            ("A", 2.0),
            ("A", 3.0),
            ("A", 4.0),
            ("A", 5.0),
            ("A", 6.0),
            ("A", 7.0),
            ("A", 8.0),
            ("A", 9.0),
            ("B", 10.0),
        ]);
        let splitter =
            RecursiveSplitter::new(InformationGainThreshold::new(0.0), 1, None, Some(20.0));
        let result = splitter.split(&values);
        assert!(result.boundaries.is_empty());
    }

    #[test]
    fn test_information_gain_is_never_negative() {
        let values = labeled(&[
            ("A", 1.0),
            ("B", 1.5),
            ("A", 2.0),
            ("A", 3.0),
            ("B", 4.5),
            ("B", 5.0),
            ("A", 6.0),
        ]);
        let result = info_gain_splitter(0.0).split(&values);
        // weighted child entropy at any depth never exceeds the root's
        let root = Partition::new(&values, 0, values.len() - 1);
        let total = values.len() as f64;
        for partitions in result.tree.values() {
            let covered: usize = partitions.iter().map(|p| p.size()).sum();
            if covered == values.len() {
                let weighted: f64 = partitions
                    .iter()
                    .map(|p| p.size() as f64 / total * p.entropy())
                    .sum();
                assert!(weighted <= root.entropy() + 1e-12);
            }
        }
    }

    #[test]
    fn test_high_threshold_rejects_weak_split() {
        // best gain is well under 90% of the parent entropy
        let values = labeled(&[("A", 1.0), ("B", 2.0), ("A", 3.0), ("B", 4.0)]);
        let result = info_gain_splitter(0.9).split(&values);
        assert!(result.boundaries.is_empty());
        // rejection records the node unchanged
        assert_eq!(result.tree[&1].len(), 1);
    }

    #[test]
    fn test_rerunning_on_pure_partition_is_idempotent() {
        let values = labeled(&[("A", 1.0), ("A", 2.0)]);
        let splitter = info_gain_splitter(0.0);
        for _ in 0..2 {
            assert!(splitter.split(&values).boundaries.is_empty());
        }
    }

    #[test]
    fn test_empty_and_singleton_sequences() {
        let splitter = info_gain_splitter(0.0);

        let empty: Vec<LabeledValue> = Vec::new();
        let result = splitter.split(&empty);
        assert!(result.boundaries.is_empty());
        assert!(result.tree.is_empty());

        let single = labeled(&[("A", 1.0)]);
        let result = splitter.split(&single);
        assert!(result.boundaries.is_empty());
    }

    #[test]
    fn test_children_recorded_with_search_entropies() {
        let values = labeled(&[("A", 1.0), ("A", 2.0), ("B", 3.0), ("B", 4.0)]);
        let result = info_gain_splitter(0.0).split(&values);
        assert_eq!(result.boundaries, [1]);
        let depth1: Vec<_> = result.tree[&1].iter().collect();
        assert_eq!(depth1.len(), 2);
        // both children are pure
        assert_eq!(depth1[0].entropy(), 0.0);
        assert_eq!(depth1[1].entropy(), 0.0);
    }
}
