//! Detection store (SQLite).

use crate::models::{Candidate, NewCandidate};

/// Errors that can occur while interacting with the detection store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert reused an existing `candid`. Indicates a caller bug or a
    /// replayed message; never retried automatically.
    #[error("detection {candid} already exists")]
    DuplicateKey {
        /// The colliding detection identifier.
        candid: i64,
    },
    /// A lookup or attach referenced a `candid` that is not in the store.
    #[error("detection {candid} not found")]
    NotFound {
        /// The missing detection identifier.
        candid: i64,
    },
    /// An attach tried to re-label a detection that already carries a
    /// different designation. Designations are immutable once assigned.
    #[error("detection {candid} is already assigned to {existing:?}")]
    AlreadyAssigned {
        /// The detection identifier.
        candid: i64,
        /// The designation the row already carries.
        existing: String,
    },
}

/// Result type used throughout the store for fallible operations.
pub type StoreResult<T> = anyhow::Result<T>;

/// Portable surface; the SQLite implementation lives in `repo.rs`.
pub trait CandidateStore {
    /// Insert a detection row, returning its `candid`.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the identifier is already
    /// used; the store is left unchanged.
    fn insert(&self, conn: &mut diesel::SqliteConnection, new: &NewCandidate) -> StoreResult<i64>;

    /// All detections within `radius_arcsec` of `(ra, dec)` whose observation
    /// time lies within `window_days` of `jd`, ordered by `jd` ascending.
    ///
    /// Restartable: plain query, no cursor state.
    fn find_nearby(
        &self,
        conn: &mut diesel::SqliteConnection,
        ra: f64,
        dec: f64,
        radius_arcsec: f64,
        jd: f64,
        window_days: f64,
    ) -> StoreResult<Vec<Candidate>>;

    /// Attach a designation to a detection.
    ///
    /// Fails with [`StoreError::NotFound`] if the row is absent and with
    /// [`StoreError::AlreadyAssigned`] if it carries a different designation.
    /// Re-attaching the same designation is an idempotent no-op, which keeps
    /// retried ingestion safe.
    fn attach_designation(
        &self,
        conn: &mut diesel::SqliteConnection,
        candid: i64,
        designation: &str,
    ) -> StoreResult<()>;

    /// All detections grouped under one designation, ordered by `jd`
    /// ascending. The downstream query surface for alerting collaborators.
    fn by_designation(
        &self,
        conn: &mut diesel::SqliteConnection,
        designation: &str,
    ) -> StoreResult<Vec<Candidate>>;
}

mod repo;
pub use repo::SqliteStore;
