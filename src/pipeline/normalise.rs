//! Feature weight normalisation
//!
//! Rescales numeric feature weights onto a common `[0, scale]` range so
//! that features measured in wildly different units become comparable.
//! Limits are derived from training events only and can be captured and
//! re-applied to another store, so test data is always scaled by the
//! training distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{EventStore, NOMINAL_MARKER};

/// How a feature's normalisation limit is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormaliseMethod {
    /// Limit is the feature's maximum training weight: the maximum maps
    /// to `scale` exactly.
    #[default]
    ByMax,
    /// Limit is twice the feature's mean training weight, so outliers do
    /// not compress the bulk of the distribution. Weights above the limit
    /// exceed `scale`.
    ByMean,
}

impl std::fmt::Display for NormaliseMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormaliseMethod::ByMax => write!(f, "by-max"),
            NormaliseMethod::ByMean => write!(f, "by-mean"),
        }
    }
}

impl std::str::FromStr for NormaliseMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "by-max" => Ok(NormaliseMethod::ByMax),
            "by-mean" => Ok(NormaliseMethod::ByMean),
            _ => Err(format!(
                "Unknown normalisation method: '{}'. Use 'by-max' or 'by-mean'.",
                s
            )),
        }
    }
}

/// Per-feature divisors plus the target scale, captured from one store so
/// they can be re-applied to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalisationLimits {
    pub scale: f64,
    pub limits: BTreeMap<String, f64>,
}

/// Derive limits from the store's training events and normalise every
/// event in place. Returns the limits for later re-use.
pub fn normalise(events: &mut EventStore, method: NormaliseMethod, scale: f64) -> NormalisationLimits {
    let mut maxima: BTreeMap<String, f64> = BTreeMap::new();
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for event in events.iter() {
        if event.is_test() {
            continue;
        }
        for (name, &weight) in event.features().iter().zip(event.weights()) {
            if name.contains(NOMINAL_MARKER) {
                continue;
            }
            let max = maxima.entry(name.clone()).or_insert(f64::MIN);
            if weight > *max {
                *max = weight;
            }
            let (sum, count) = sums.entry(name.clone()).or_insert((0.0, 0));
            *sum += weight;
            *count += 1;
        }
    }

    let limits: BTreeMap<String, f64> = match method {
        NormaliseMethod::ByMax => maxima,
        NormaliseMethod::ByMean => sums
            .into_iter()
            .map(|(name, (sum, count))| (name, 2.0 * sum / count as f64))
            .collect(),
    };

    let limits = NormalisationLimits { scale, limits };
    apply_limits(events, &limits);
    limits
}

/// Normalise every event against previously captured limits. Nominal
/// features, and features without a positive limit, keep their raw weight.
pub fn apply_limits(events: &mut EventStore, limits: &NormalisationLimits) {
    for event in events.iter_mut() {
        let weights: Vec<f64> = event
            .features()
            .iter()
            .zip(event.weights())
            .map(|(name, &weight)| {
                if name.contains(NOMINAL_MARKER) {
                    return weight;
                }
                match limits.limits.get(name) {
                    Some(&limit) if limit > 0.0 => weight / limit * limits.scale,
                    _ => weight,
                }
            })
            .collect();
        event.set_weights(weights);
    }
}
