//! Explainable candidate screening.
//!
//! Candidate profiles are encoded against a fixed training schema, classified by a
//! gradient-boosted tree ensemble into one of three hiring decisions, and explained by
//! per-feature Shapley attributions over the ensemble.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
