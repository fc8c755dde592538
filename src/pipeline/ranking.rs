//! Feature ranking by information gain
//!
//! Evaluates every feature in a store and orders them by the entropy drop
//! between their first and last levels. Bucket features produced by
//! discretization are ranked under their base name.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SplitterConfig;
use crate::events::{EventStore, NOMINAL_MARKER};

use super::entropy;
use super::evaluate::FeatureEvaluator;

/// One ranked feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureGain {
    pub feature: String,
    pub information_gain: f64,
}

/// The ranking result: the training set's outcome entropy plus the top
/// features in descending gain order.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRanking {
    pub event_space_entropy: f64,
    pub features: Vec<FeatureGain>,
}

/// Rank features by information gain, keeping the best `count`. With a
/// `test_outcome` the gain is measured one-vs-rest against that outcome.
pub fn rank_features(
    events: &EventStore,
    config: &SplitterConfig,
    test_outcome: Option<&str>,
    count: usize,
) -> Result<FeatureRanking> {
    let evaluator = FeatureEvaluator::new(config)?;

    // bucket features rank under their base name
    let features: BTreeSet<String> = events
        .feature_names()
        .into_iter()
        .map(|name| match name.find(NOMINAL_MARKER) {
            Some(i) => name[..i].to_string(),
            None => name,
        })
        .collect();
    let features: Vec<String> = features.into_iter().collect();

    let progress = ProgressBar::new(features.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("   Ranking [{bar:40.cyan/blue}] {pos}/{len} features ({percent}%) [{eta}]")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut gains: Vec<FeatureGain> = features
        .par_iter()
        .map(|feature| {
            let levels = match test_outcome {
                Some(outcome) => evaluator.evaluate_feature_vs(events, feature, outcome)?,
                None => evaluator.evaluate_feature(events, feature)?,
            };
            let first = levels.first().copied().unwrap_or(0.0);
            let last = levels.last().copied().unwrap_or(0.0);
            progress.inc(1);
            Ok(FeatureGain {
                feature: feature.clone(),
                information_gain: first - last,
            })
        })
        .collect::<Result<_>>()?;
    progress.finish_and_clear();

    gains.sort_by(|a, b| {
        b.information_gain
            .partial_cmp(&a.information_gain)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    gains.truncate(count);

    let mut outcome_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut training_total = 0usize;
    for event in events {
        if event.is_test() {
            continue;
        }
        *outcome_counts.entry(event.outcome()).or_insert(0) += 1;
        training_total += 1;
    }
    let event_space_entropy = if training_total > 0 {
        entropy::entropy(outcome_counts.values(), training_total)
    } else {
        0.0
    };

    Ok(FeatureRanking {
        event_space_entropy,
        features: gains,
    })
}
