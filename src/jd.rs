//! Julian date conversion helpers.
//!
//! Detection timestamps travel through the pipeline as Julian dates (days
//! since the Julian epoch, as `f64`). These helpers convert to and from
//! `chrono` UTC instants at the edges, for logging and reporting; all window
//! arithmetic stays in plain JD days.

use chrono::{DateTime, Utc};

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Convert a Julian date to a UTC instant, at millisecond precision.
///
/// Returns `None` for values outside chrono's representable range.
pub fn jd_to_utc(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round();
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

/// Convert a UTC instant to a Julian date.
pub fn utc_to_jd(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}
