//! Candidate designation engine for a transient-detection pipeline.
//!
//! Takes raw detections produced by image differencing, persists them keyed by
//! `candid`, and assigns each newly discovered source a permanent survey
//! designation (`<prefix><year><letters>`), grouping repeat detections of the
//! same physical object under one designation across nights.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod designation;
pub mod jd;
pub mod models;
pub mod resolver;
/// Diesel table definitions (generated).
#[allow(missing_docs)]
pub mod schema;
pub mod sequence;
pub mod sky;
pub mod store;
