//! Association resolver: the per-detection naming state machine.
//!
//! Each incoming detection is inserted and then resolved in one immediate
//! transaction:
//!
//! 1. **Lookup** — nearby prior detections within the configured radius and
//!    time window.
//! 2. **Match found** — reuse the neighbors' designation; terminal
//!    [`Outcome::Associated`] with `new_object = false`.
//! 3. **No match, ineligible** — the detection is persisted with a NULL
//!    designation; terminal [`Outcome::Unassociated`]. It may be retroactively
//!    named when a later eligible detection of the same object arrives.
//! 4. **No match, eligible** — draw the next ordinal and current year from
//!    [`crate::sequence`], encode, attach; terminal [`Outcome::Associated`]
//!    with `new_object = true`. Unnamed neighbors join the new object.
//!
//! ## Races between workers
//!
//! Lookup-then-attach is a check-then-act race: two workers can each see no
//! match for two detections of the same object and both mint a name. That is
//! tolerated by design (no global spatial lock; ingestion stays available).
//! When a later detection finds neighbors carrying different designations, it
//! deterministically takes the lexicographically smallest one and flags the
//! conflict for external reconciliation. Nothing here ever merges or deletes
//! a designation.

use anyhow::Context;
use diesel::SqliteConnection;
use std::collections::BTreeSet;

use crate::config::AssociationConfig;
use crate::designation::DesignationScheme;
use crate::models::NewCandidate;
use crate::sequence;
use crate::store::CandidateStore;

/// Terminal state of resolving one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The detection now carries a designation.
    Associated {
        /// The designation attached to the detection.
        designation: String,
        /// True when this detection minted the designation (a new object),
        /// false when it joined an existing one.
        new_object: bool,
        /// True when nearby detections carried more than one distinct
        /// designation and the tie-break picked the smallest. Flagged for
        /// external reconciliation.
        conflict: bool,
    },
    /// Persisted without a designation: no spatial match and below the
    /// eligibility policy.
    Unassociated,
}

/// Drives detection ingestion: store, naming scheme, and association policy.
pub struct AssociationResolver<S> {
    store: S,
    scheme: DesignationScheme,
    cfg: AssociationConfig,
}

impl<S: CandidateStore> AssociationResolver<S> {
    /// Assemble a resolver from its parts.
    pub fn new(store: S, scheme: DesignationScheme, cfg: AssociationConfig) -> Self {
        Self { store, scheme, cfg }
    }

    /// Access the underlying detection store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist one detection and resolve its designation.
    ///
    /// Runs as a single immediate transaction: the row insert, the
    /// association decision, any ordinal draw, and the designation write
    /// commit together or not at all. A `DuplicateKey` from a replayed
    /// `candid` rolls everything back and surfaces to the caller, which makes
    /// re-queuing a detection after a transient failure safe.
    pub fn resolve(
        &self,
        conn: &mut SqliteConnection,
        new: &NewCandidate,
    ) -> anyhow::Result<Outcome> {
        conn.immediate_transaction::<_, anyhow::Error, _>(|conn| self.resolve_in_tx(conn, new))
    }

    fn resolve_in_tx(
        &self,
        conn: &mut SqliteConnection,
        new: &NewCandidate,
    ) -> anyhow::Result<Outcome> {
        self.store.insert(conn, new)?;

        let neighbors: Vec<_> = self
            .store
            .find_nearby(
                conn,
                new.ra,
                new.dec,
                self.cfg.radius_arcsec,
                new.jd,
                self.cfg.time_window_days,
            )?
            .into_iter()
            .filter(|r| r.candid != new.candid)
            .collect();

        let named: BTreeSet<&str> = neighbors
            .iter()
            .filter_map(|r| r.objectid.as_deref())
            .collect();

        if let Some(smallest) = named.iter().next() {
            let designation = smallest.to_string();
            let conflict = named.len() > 1;
            if conflict {
                tracing::warn!(
                    candid = new.candid,
                    designations = ?named,
                    chosen = %designation,
                    "multiple designations within match radius; needs reconciliation"
                );
            }
            self.store
                .attach_designation(conn, new.candid, &designation)?;
            return Ok(Outcome::Associated {
                designation,
                new_object: false,
                conflict,
            });
        }

        if !self.eligible(new) {
            tracing::debug!(
                candid = new.candid,
                scorr = new.scorr,
                magpsf = new.magpsf,
                "below designation policy; persisted unassociated"
            );
            return Ok(Outcome::Unassociated);
        }

        let ordinal = u64::try_from(sequence::next_ordinal(conn)?)
            .context("ordinal counter out of range")?;
        let year = u32::try_from(sequence::current_year(conn)?)
            .context("year counter out of range")?;
        let designation = self.scheme.encode(year, ordinal)?;

        self.store
            .attach_designation(conn, new.candid, &designation)?;

        // Sub-threshold neighbors recorded earlier now belong to this object.
        for prior in neighbors.iter().filter(|r| r.objectid.is_none()) {
            self.store
                .attach_designation(conn, prior.candid, &designation)?;
        }

        tracing::info!(candid = new.candid, %designation, "minted new designation");
        Ok(Outcome::Associated {
            designation,
            new_object: true,
            conflict: false,
        })
    }

    fn eligible(&self, new: &NewCandidate) -> bool {
        new.scorr >= self.cfg.min_significance
            && self.cfg.max_magnitude.is_none_or(|m| new.magpsf <= m)
    }
}
