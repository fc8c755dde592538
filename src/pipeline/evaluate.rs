//! Feature evaluation - entropy level profiles
//!
//! Answers "how much does knowing this feature tell us about the outcome?"
//! without rewriting any events. The result is a vector of entropy levels:
//! level 0 is the outcome entropy of the whole training set, level 1
//! conditions only on the feature's presence or absence, and each further
//! level conditions on one more depth of the splitter's partition tree.
//! Lower is better; the drop from first to last level is the feature's
//! information gain.

use std::collections::BTreeMap;

use anyhow::{bail, Result};

use crate::config::{ConfigError, SplitterConfig};
use crate::events::{sort_labeled_values, EventStore, LabeledValue};

use super::entropy;
use super::splitter::FeatureSplitter;

/// Computes entropy level profiles for individual features.
pub struct FeatureEvaluator {
    splitter: Box<dyn FeatureSplitter>,
}

impl FeatureEvaluator {
    /// Validate the configuration and build the splitter it describes.
    pub fn new(config: &SplitterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            splitter: config.build_splitter()?,
        })
    }

    /// Entropy levels of `feature` against the full outcome set.
    pub fn evaluate_feature(&self, events: &EventStore, feature: &str) -> Result<Vec<f64>> {
        self.evaluate(events, feature, None)
    }

    /// Entropy levels of `feature` in a one-vs-rest view: every outcome
    /// other than `test_outcome` is collapsed into a single rest class.
    pub fn evaluate_feature_vs(
        &self,
        events: &EventStore,
        feature: &str,
        test_outcome: &str,
    ) -> Result<Vec<f64>> {
        self.evaluate(events, feature, Some(test_outcome))
    }

    fn evaluate(
        &self,
        events: &EventStore,
        feature: &str,
        test_outcome: Option<&str>,
    ) -> Result<Vec<f64>> {
        let collapse = |outcome: &str| -> String {
            match test_outcome {
                Some(target) if outcome != target => String::new(),
                _ => outcome.to_string(),
            }
        };

        let mut total_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut with_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut without_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut values: Vec<LabeledValue> = Vec::new();
        let mut training_total = 0usize;

        for event in events {
            if event.is_test() {
                continue;
            }
            training_total += 1;
            let outcome = collapse(event.outcome());
            // a discretized feature is found through its bucket name
            if let Some(index) = event.lookup_feature(feature) {
                *with_counts.entry(outcome.clone()).or_insert(0) += 1;
                values.push(LabeledValue::new(outcome.clone(), event.weights()[index]));
            } else {
                *without_counts.entry(outcome.clone()).or_insert(0) += 1;
            }
            *total_counts.entry(outcome).or_insert(0) += 1;
        }
        if training_total == 0 {
            bail!("Cannot evaluate feature '{}': no training events", feature);
        }

        let total = training_total as f64;
        let with_total = values.len();
        let without_total = training_total - with_total;

        let feature_entropy = if with_total > 0 {
            entropy::entropy(with_counts.values(), with_total)
        } else {
            0.0
        };
        let non_feature_entropy = if without_total > 0 {
            entropy::entropy(without_counts.values(), without_total)
        } else {
            0.0
        };
        let proportional_feature = with_total as f64 / total * feature_entropy;
        let proportional_non_feature = without_total as f64 / total * non_feature_entropy;

        let mut levels = Vec::new();
        levels.push(entropy::entropy(total_counts.values(), training_total));
        levels.push(proportional_feature + proportional_non_feature);

        sort_labeled_values(&mut values);
        let result = self.splitter.split(&values);
        if let Some(&max_depth) = result.tree.keys().max() {
            for depth in 1..=max_depth {
                let level = match result.tree.get(&depth) {
                    Some(partitions) if !partitions.is_empty() => {
                        let partitioned: f64 = partitions
                            .iter()
                            .map(|p| p.size() as f64 / total * p.entropy())
                            .sum();
                        proportional_non_feature + partitioned
                    }
                    // nothing recorded at this depth: fall back on the
                    // undivided presence entropy
                    _ => proportional_non_feature + proportional_feature,
                };
                levels.push(level);
            }
        }
        Ok(levels)
    }
}
