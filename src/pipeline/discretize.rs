//! Feature discretization - numeric weights to categorical buckets
//!
//! For each numeric feature, the discretizer gathers its (outcome, weight)
//! pairs from training events, sorts them by value, runs the configured
//! splitter, and converts the accepted boundaries into threshold values
//! halfway between neighbouring weights. Every event carrying the feature
//! (test events included) then has its numeric entry replaced by a
//! categorical bucket feature `name:::cN` with weight 1.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::{ConfigError, SplitterConfig};
use crate::events::{sort_labeled_values, EventStore, LabeledValue, NOMINAL_MARKER};

use super::splitter::FeatureSplitter;

/// Rewrites numeric features into categorical bucket features using a
/// configured splitting policy.
pub struct FeatureDiscretizer {
    splitter: Box<dyn FeatureSplitter>,
}

impl FeatureDiscretizer {
    /// Validate the configuration and build the splitter it describes.
    pub fn new(config: &SplitterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            splitter: config.build_splitter()?,
        })
    }

    /// Compute the ascending threshold values for one numeric feature from
    /// the training events only. A feature absent from every training
    /// event, or one the splitter declines to cut, yields an empty list.
    pub fn find_split_values(&self, events: &EventStore, feature: &str) -> Result<Vec<f64>> {
        if feature.contains(NOMINAL_MARKER) {
            bail!("Feature '{}' is nominal and cannot be discretized", feature);
        }

        let mut values: Vec<LabeledValue> = Vec::new();
        for event in events {
            if event.is_test() {
                continue;
            }
            if let Some(index) = event.feature_index(feature) {
                values.push(LabeledValue::new(event.outcome(), event.weights()[index]));
            }
        }
        sort_labeled_values(&mut values);

        let result = self.splitter.split(&values);
        let mut split_values: Vec<f64> = result
            .boundaries
            .iter()
            .map(|&i| (values[i].value + values[i + 1].value) / 2.0)
            .collect();
        // neighbouring boundaries can collapse to the same midpoint
        split_values.dedup();
        Ok(split_values)
    }

    /// Discretize one feature in place across all events, training and
    /// test alike. Nominal features are left untouched. Returns the
    /// threshold values used.
    pub fn discretize_feature(&self, events: &mut EventStore, feature: &str) -> Result<Vec<f64>> {
        if feature.contains(NOMINAL_MARKER) {
            return Ok(Vec::new());
        }
        let split_values = self.find_split_values(events, feature)?;
        apply_split_values(events, feature, &split_values);
        Ok(split_values)
    }

    /// Discretize every numeric feature in the store. Split searches run
    /// in parallel over read-only events; the rewrite pass is sequential.
    /// Returns the threshold values per feature.
    pub fn discretize_all(&self, events: &mut EventStore) -> Result<BTreeMap<String, Vec<f64>>> {
        let features: Vec<String> = events.numeric_feature_names().into_iter().collect();

        let progress = ProgressBar::new(features.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("   Discretizing [{bar:40.cyan/blue}] {pos}/{len} features ({percent}%) [{eta}]")
                .unwrap()
                .progress_chars("█▓░"),
        );

        let events_view: &EventStore = events;
        let split_map: BTreeMap<String, Vec<f64>> = features
            .par_iter()
            .map(|feature| {
                let split_values = self.find_split_values(events_view, feature)?;
                progress.inc(1);
                Ok((feature.clone(), split_values))
            })
            .collect::<Result<_>>()?;
        progress.finish_and_clear();

        for (feature, split_values) in &split_map {
            apply_split_values(events, feature, split_values);
        }
        Ok(split_map)
    }
}

/// Rewrite every event carrying `feature` against the given ascending
/// threshold values: the numeric entry is removed and a bucket feature
/// `name:::cN` with weight 1 appended, where `N` is the index of the first
/// threshold at or above the weight (one past the last otherwise). With no
/// thresholds every carrier lands in bucket `c0`.
pub fn apply_split_values(events: &mut EventStore, feature: &str, split_values: &[f64]) {
    for event in events.iter_mut() {
        let Some(index) = event.feature_index(feature) else {
            continue;
        };
        let (_, weight) = event.remove_feature(index);
        let bucket = split_values
            .iter()
            .position(|&threshold| weight <= threshold)
            .unwrap_or(split_values.len());
        event.add_feature(format!("{feature}{NOMINAL_MARKER}c{bucket}"));
    }
}
