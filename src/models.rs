//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::candidates`] — one row per difference-image detection
//! - [`crate::schema::name_sequences`] — durable counters behind designation
//!   allocation (see [`crate::sequence`])
//!
//! See the migrations for constraints (e.g. `candid` primary key, nullable
//! cross-match columns, `created_at` default).

use crate::schema::*;
use diesel::prelude::*;
use serde::Deserialize;

/// A row in [`crate::schema::candidates`]: one detection of a point source in
/// a single difference image.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = candidates, primary_key(candid), check_for_backend(diesel::sqlite::Sqlite))]
pub struct Candidate {
    /// Detection identifier, assigned upstream at extraction. Immutable,
    /// never reused.
    pub candid: i64,
    /// Survey designation this detection is associated with; NULL until the
    /// resolver names it. Once set it is never changed to a different value.
    pub objectid: Option<String>,
    /// Right ascension, degrees, `[0, 360)`.
    pub ra: f64,
    /// Declination, degrees, `[-90, 90]`.
    pub dec: f64,
    /// Observation time of the exposure, Julian date.
    pub jd: f64,
    /// Photometric filter id.
    pub fid: i32,
    /// Difference image that produced this detection.
    pub diffimname: String,
    /// Science image behind the subtraction.
    pub sciimname: String,
    /// Reference image behind the subtraction.
    pub refimname: String,
    /// PSF-fit magnitude.
    pub magpsf: f64,
    /// 1-sigma uncertainty on `magpsf`.
    pub sigmapsf: f64,
    /// Reduced chi-square of the PSF fit.
    pub chipsf: f64,
    /// Semi-major axis of the source profile, pixels.
    pub aimage: f64,
    /// Semi-minor axis of the source profile, pixels.
    pub bimage: f64,
    /// Elongation (`aimage / bimage`).
    pub elong: f64,
    /// Full width at half maximum, pixels.
    pub fwhm: f64,
    /// Detection significance score from the subtraction; gates eligibility
    /// to mint a new designation.
    pub scorr: f64,
    /// X pixel coordinate on the difference image.
    pub xpos: f64,
    /// Y pixel coordinate on the difference image.
    pub ypos: f64,
    /// Photometric zero-point of the science image.
    pub magzpsci: f64,
    /// Uncertainty on `magzpsci`.
    pub magzpsciunc: f64,
    /// 2MASS J magnitude of the nearest catalog counterpart, if any.
    pub tmjmag1: Option<f64>,
    /// 2MASS H magnitude of the nearest catalog counterpart, if any.
    pub tmhmag1: Option<f64>,
    /// 2MASS K magnitude of the nearest catalog counterpart, if any.
    pub tmkmag1: Option<f64>,
    /// 2MASS catalog identifier of the counterpart, if any.
    pub tmobjectid1: Option<String>,
    /// Row creation timestamp, RFC3339 UTC (database default).
    pub created_at: String,
}

/// Insertable form of [`Candidate`] as delivered by the extraction stage.
///
/// `objectid` and `created_at` are absent: the designation is assigned by the
/// resolver after insertion and the timestamp defaults in the database.
/// Derives `Deserialize` so the CLI can read `[[detection]]` records straight
/// from a TOML file.
#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = candidates)]
pub struct NewCandidate {
    /// Detection identifier, assigned upstream. See [`Candidate::candid`].
    pub candid: i64,
    /// Right ascension, degrees.
    pub ra: f64,
    /// Declination, degrees.
    pub dec: f64,
    /// Observation time, Julian date.
    pub jd: f64,
    /// Photometric filter id.
    pub fid: i32,
    /// Difference image name.
    pub diffimname: String,
    /// Science image name.
    pub sciimname: String,
    /// Reference image name.
    pub refimname: String,
    /// PSF-fit magnitude.
    pub magpsf: f64,
    /// 1-sigma uncertainty on `magpsf`.
    pub sigmapsf: f64,
    /// Reduced chi-square of the PSF fit.
    pub chipsf: f64,
    /// Semi-major axis, pixels.
    pub aimage: f64,
    /// Semi-minor axis, pixels.
    pub bimage: f64,
    /// Elongation.
    pub elong: f64,
    /// FWHM, pixels.
    pub fwhm: f64,
    /// Detection significance score.
    pub scorr: f64,
    /// X pixel coordinate.
    pub xpos: f64,
    /// Y pixel coordinate.
    pub ypos: f64,
    /// Photometric zero-point.
    pub magzpsci: f64,
    /// Zero-point uncertainty.
    pub magzpsciunc: f64,
    /// 2MASS J magnitude, if cross-matched.
    #[serde(default)]
    pub tmjmag1: Option<f64>,
    /// 2MASS H magnitude, if cross-matched.
    #[serde(default)]
    pub tmhmag1: Option<f64>,
    /// 2MASS K magnitude, if cross-matched.
    #[serde(default)]
    pub tmkmag1: Option<f64>,
    /// 2MASS catalog identifier, if cross-matched.
    #[serde(default)]
    pub tmobjectid1: Option<String>,
}
