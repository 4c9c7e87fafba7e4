//! Pipeline configuration: parsing, validation, and loading.
//!
//! The subsystem is driven by a small TOML file with two sections:
//!
//! ```toml
//! [association]
//! radius_arcsec = 2.0
//! time_window_days = 30.0
//! min_significance = 5.0
//! # max_magnitude = 21.5      # optional faint cut
//!
//! [designation]
//! prefix = "WNTR"             # may be empty
//! min_width = 2               # default 2
//! year_base = 22
//! ```
//!
//! The association constants are survey policy, not code: there are no
//! built-in numeric defaults, and loading fails if they are missing.
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]

use std::num::NonZeroUsize;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use toml::from_str;

use crate::designation::DesignationScheme;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Proximity-matching and eligibility policy.
    pub association: AssociationConfig,
    /// Naming scheme parameters.
    pub designation: DesignationConfig,
}

/// Proximity-matching and eligibility policy for the association resolver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationConfig {
    /// Match radius for spatial association, arcseconds.
    pub radius_arcsec: f64,
    /// Half-width of the observation-time window around the query time, days.
    pub time_window_days: f64,
    /// Minimum detection significance (`scorr`) required to mint a new
    /// designation. Detections below it are persisted but left unassociated.
    pub min_significance: f64,
    /// Optional faint cut: detections with `magpsf` above this value never
    /// mint a new designation.
    #[serde(default)]
    pub max_magnitude: Option<f64>,
}

/// Naming scheme parameters for the designation encoder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DesignationConfig {
    /// Survey prefix prepended to every designation (e.g. "WNTR").
    /// May be empty.
    #[serde(default)]
    pub prefix: String,
    /// Minimum width of the alphabetic suffix.
    #[serde(default = "default_min_width")]
    pub min_width: usize,
    /// Starting value of the year counter (e.g. the two-digit year). Applied
    /// only when seeding a fresh database; rollovers advance it from there.
    pub year_base: i64,
}

fn default_min_width() -> usize {
    2
}

impl DesignationConfig {
    /// Build the encoder for this scheme.
    pub fn scheme(&self) -> anyhow::Result<DesignationScheme> {
        let width = NonZeroUsize::new(self.min_width)
            .context("designation.min_width must be at least 1")?;
        Ok(DesignationScheme::new(self.prefix.clone(), width))
    }
}

/// Validate a parsed configuration, rejecting out-of-range policy values.
pub fn validate_config(cfg: &PipelineConfig) -> anyhow::Result<()> {
    let a = &cfg.association;
    if !(a.radius_arcsec.is_finite() && a.radius_arcsec > 0.0) {
        bail!("association.radius_arcsec must be finite and > 0");
    }
    if !(a.time_window_days.is_finite() && a.time_window_days > 0.0) {
        bail!("association.time_window_days must be finite and > 0");
    }
    if !a.min_significance.is_finite() {
        bail!("association.min_significance must be finite");
    }
    if let Some(m) = a.max_magnitude {
        if !m.is_finite() {
            bail!("association.max_magnitude must be finite");
        }
    }

    let d = &cfg.designation;
    if d.min_width == 0 {
        bail!("designation.min_width must be at least 1");
    }
    if !(0..=9999).contains(&d.year_base) {
        bail!("designation.year_base must be in 0..=9999");
    }
    if !d.prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("designation.prefix must be ASCII alphabetic");
    }
    Ok(())
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<PipelineConfig> {
    let cfg: PipelineConfig = from_str(toml_str).context("failed to parse config TOML")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Read a configuration TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<PipelineConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
