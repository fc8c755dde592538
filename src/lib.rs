//! Entrobin: Entropy-Driven Feature Discretization
//!
//! A library for converting continuous-valued features into discrete
//! categorical buckets that maximize predictive information gain against
//! a known outcome label, using recursive entropy-based splitting
//! (information-gain threshold or Fayyad-Irani MDL) or fixed regular
//! intervals.

pub mod config;
pub mod events;
pub mod pipeline;
