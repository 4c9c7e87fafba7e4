use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::models::{Candidate, NewCandidate};
use crate::schema::candidates::dsl as c;
use crate::sky;
use crate::store::{CandidateStore, StoreError, StoreResult};

/// Detection store backed by a SQLite database.
pub struct SqliteStore;

impl SqliteStore {
    /// Create the store handle. Stateless; all state lives in the database.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqliteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateStore for SqliteStore {
    fn insert(&self, conn: &mut SqliteConnection, new: &NewCandidate) -> StoreResult<i64> {
        match diesel::insert_into(c::candidates).values(new).execute(conn) {
            Ok(_) => Ok(new.candid),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::DuplicateKey { candid: new.candid }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_nearby(
        &self,
        conn: &mut SqliteConnection,
        ra: f64,
        dec: f64,
        radius_arcsec: f64,
        jd: f64,
        window_days: f64,
    ) -> StoreResult<Vec<Candidate>> {
        let radius_deg = sky::arcsec_to_deg(radius_arcsec);

        // Indexable prefilter: declination band + time window. The exact
        // great-circle cut happens below on the loaded rows.
        let mut query = c::candidates
            .select(Candidate::as_select())
            .filter(c::dec.between(dec - radius_deg, dec + radius_deg))
            .filter(c::jd.between(jd - window_days, jd + window_days))
            .into_boxed();

        // RA band narrows the scan away from the poles. Near a pole cos(dec)
        // collapses and the band would span the whole circle, so skip it.
        let cos_dec = dec.to_radians().cos();
        if cos_dec > 1e-6 {
            let dra = (radius_deg / cos_dec).min(180.0);
            let lo = ra - dra;
            let hi = ra + dra;
            if lo < 0.0 {
                // Band wraps the 0/360 seam on the low side.
                query = query.filter(c::ra.ge(lo + 360.0).or(c::ra.le(hi)));
            } else if hi >= 360.0 {
                query = query.filter(c::ra.ge(lo).or(c::ra.le(hi - 360.0)));
            } else {
                query = query.filter(c::ra.between(lo, hi));
            }
        }

        let mut rows: Vec<Candidate> = query.load(conn)?;
        rows.retain(|r| sky::angular_separation_arcsec(ra, dec, r.ra, r.dec) <= radius_arcsec);
        rows.sort_by(|a, b| a.jd.total_cmp(&b.jd));
        Ok(rows)
    }

    fn attach_designation(
        &self,
        conn: &mut SqliteConnection,
        candid: i64,
        designation: &str,
    ) -> StoreResult<()> {
        let current = c::candidates
            .find(candid)
            .select(c::objectid)
            .first::<Option<String>>(conn)
            .optional()?;

        match current {
            None => Err(StoreError::NotFound { candid }.into()),
            Some(Some(existing)) if existing == designation => Ok(()),
            Some(Some(existing)) => Err(StoreError::AlreadyAssigned { candid, existing }.into()),
            Some(None) => {
                diesel::update(c::candidates.find(candid))
                    .set(c::objectid.eq(designation))
                    .execute(conn)?;
                Ok(())
            }
        }
    }

    fn by_designation(
        &self,
        conn: &mut SqliteConnection,
        designation: &str,
    ) -> StoreResult<Vec<Candidate>> {
        let rows = c::candidates
            .filter(c::objectid.eq(designation))
            .order(c::jd.asc())
            .select(Candidate::as_select())
            .load(conn)?;
        Ok(rows)
    }
}
