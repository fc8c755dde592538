//! Partitions over a sorted labeled-value sequence
//!
//! A [`Partition`] is a contiguous inclusive index range over a sequence of
//! (outcome, value) pairs sorted ascending by value. Outcome counts, the
//! majority-outcome count, and entropy are computed on first access and
//! memoized; a partition is never mutated after construction.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::events::LabeledValue;

use super::entropy;

/// Partitions recorded per recursion depth (1-based), rebuilt fresh for
/// every top-level `split()` invocation. Each depth holds at most two
/// partitions per split accepted at the previous depth; the ordered set
/// gives deterministic iteration by (start, end).
pub type SplitTree<'a> = BTreeMap<usize, BTreeSet<Partition<'a>>>;

#[derive(Debug, Clone)]
struct CountTable<'a> {
    counts: BTreeMap<&'a str, usize>,
    majority: usize,
}

/// A contiguous, non-empty index range `[start, end]` over a sorted
/// labeled-value sequence, with cached entropy bookkeeping.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    values: &'a [LabeledValue],
    start: usize,
    end: usize,
    counts: OnceCell<CountTable<'a>>,
    entropy: OnceCell<f64>,
}

impl<'a> Partition<'a> {
    /// Create a partition over `values[start..=end]`. The range must be
    /// non-empty and in bounds.
    pub fn new(values: &'a [LabeledValue], start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end < values.len());
        Self {
            values,
            start,
            end,
            counts: OnceCell::new(),
            entropy: OnceCell::new(),
        }
    }

    /// Create a partition whose entropy is already known, so the split
    /// search's running computation is not repeated.
    pub fn with_entropy(values: &'a [LabeledValue], start: usize, end: usize, entropy: f64) -> Self {
        let partition = Self::new(values, start, end);
        let _ = partition.entropy.set(entropy);
        partition
    }

    /// The full underlying sequence (not just this partition's range).
    pub fn values(&self) -> &'a [LabeledValue] {
        self.values
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn size(&self) -> usize {
        self.end - self.start + 1
    }

    fn count_table(&self) -> &CountTable<'a> {
        self.counts.get_or_init(|| {
            let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
            let mut majority = 0;
            for pair in &self.values[self.start..=self.end] {
                let count = counts.entry(pair.outcome.as_str()).or_insert(0);
                *count += 1;
                if *count > majority {
                    majority = *count;
                }
            }
            CountTable { counts, majority }
        })
    }

    /// Outcome label to count of occurrences within this range.
    pub fn outcome_counts(&self) -> &BTreeMap<&'a str, usize> {
        &self.count_table().counts
    }

    /// Count of the most frequent outcome within this range.
    pub fn majority_outcome_count(&self) -> usize {
        self.count_table().majority
    }

    /// Shannon entropy (nats) of this range's outcome distribution.
    pub fn entropy(&self) -> f64 {
        *self
            .entropy
            .get_or_init(|| entropy::entropy(self.outcome_counts().values(), self.size()))
    }
}

// Ordering is by range only; cached statistics are ignored.
impl PartialEq for Partition<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Partition<'_> {}

impl PartialOrd for Partition<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Partition<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}
