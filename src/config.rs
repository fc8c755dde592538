//! Splitter configuration and validation
//!
//! All configuration is checked once, up front, before any feature is
//! processed. A malformed configuration is fatal: inconsistent bucket
//! boundaries would silently corrupt downstream training.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{
    FayyadIraniMdl, FeatureSplitter, InformationGainThreshold, RecursiveSplitter,
    RegularIntervalSplitter,
};

/// Errors raised by configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The information-gain threshold is a fraction of the parent
    /// partition's entropy and must lie in `[0, 1)`.
    #[error("information_gain_threshold must be in [0, 1), got {0}")]
    InformationGainThresholdOutOfRange(f64),

    /// A split must leave at least one element on each side.
    #[error("min_node_size must be at least 1")]
    ZeroMinNodeSize,

    /// Regular-interval splitting has no gain-based stop condition; the
    /// depth is the sole control and must be given.
    #[error("regular-interval splitting requires a positive max_depth")]
    MissingMaxDepth,
}

/// Splitting policy selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitterType {
    /// Accept a split when its gain reaches a configured fraction of the
    /// parent partition's entropy.
    #[default]
    InformationGain,
    /// Accept a split when its gain exceeds the Fayyad-Irani minimum
    /// description length penalty.
    FayyadIrani,
    /// Fixed-width bins at `max_value / 2^depth`; no gain search.
    RegularIntervals,
}

impl std::fmt::Display for SplitterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitterType::InformationGain => write!(f, "information-gain"),
            SplitterType::FayyadIrani => write!(f, "fayyad-irani"),
            SplitterType::RegularIntervals => write!(f, "regular-intervals"),
        }
    }
}

impl std::str::FromStr for SplitterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "information-gain" => Ok(SplitterType::InformationGain),
            "fayyad-irani" => Ok(SplitterType::FayyadIrani),
            "regular-intervals" => Ok(SplitterType::RegularIntervals),
            _ => Err(format!(
                "Unknown splitter type: '{}'. Use 'information-gain', 'fayyad-irani' or 'regular-intervals'.",
                s
            )),
        }
    }
}

/// Configuration for a feature splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Splitting policy
    pub splitter: SplitterType,
    /// Minimum elements per child after a split
    pub min_node_size: usize,
    /// Recursion depth ceiling; `None` is unbounded. Bounds the split
    /// count to at most `2^max_depth - 1`.
    pub max_depth: Option<u32>,
    /// Skip splitting a node whose majority-class error rate (in percent)
    /// is already below this value; `None` disables the heuristic.
    pub min_error_rate: Option<f64>,
    /// Fraction of the parent partition's entropy a split's gain must
    /// reach to be accepted (information-gain policy only)
    pub information_gain_threshold: f64,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            splitter: SplitterType::default(),
            min_node_size: 1,
            max_depth: None,
            min_error_rate: None,
            information_gain_threshold: 0.0,
        }
    }
}

impl SplitterConfig {
    /// Check the configuration. Called once before any run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.information_gain_threshold < 0.0 || self.information_gain_threshold >= 1.0 {
            return Err(ConfigError::InformationGainThresholdOutOfRange(
                self.information_gain_threshold,
            ));
        }
        if self.min_node_size == 0 {
            return Err(ConfigError::ZeroMinNodeSize);
        }
        if self.splitter == SplitterType::RegularIntervals
            && self.max_depth.filter(|&d| d > 0).is_none()
        {
            return Err(ConfigError::MissingMaxDepth);
        }
        Ok(())
    }

    /// Validate and construct the configured splitter.
    pub fn build_splitter(&self) -> Result<Box<dyn FeatureSplitter>, ConfigError> {
        self.validate()?;
        let splitter: Box<dyn FeatureSplitter> = match self.splitter {
            SplitterType::InformationGain => Box::new(RecursiveSplitter::new(
                InformationGainThreshold::new(self.information_gain_threshold),
                self.min_node_size,
                self.max_depth,
                self.min_error_rate,
            )),
            SplitterType::FayyadIrani => Box::new(RecursiveSplitter::new(
                FayyadIraniMdl,
                self.min_node_size,
                self.max_depth,
                self.min_error_rate,
            )),
            SplitterType::RegularIntervals => {
                // validate() guarantees a positive depth here
                Box::new(RegularIntervalSplitter::new(self.max_depth.unwrap_or(1)))
            }
        };
        Ok(splitter)
    }
}
