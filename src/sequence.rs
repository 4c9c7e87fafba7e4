//! Durable monotonic counters behind designation allocation.
//!
//! Two named counters live in [`crate::schema::name_sequences`]: the per-year
//! ordinal and the year code. Each counter stores its last-issued value, so
//! the next ordinal is always `value + 1` and the first issued ordinal after
//! seeding (or a rollover) is 1.
//!
//! Concurrency: [`next_ordinal`] is a single `UPDATE .. RETURNING` statement,
//! so SQLite's writer lock linearizes concurrent callers and the new value is
//! committed before it is returned. Two callers can never observe the same
//! ordinal, across threads, processes, or restarts. Nothing caches a "next
//! value" in memory.
//!
//! Rollover is explicit (an operator action at the year boundary, surfaced as
//! the `rollover` CLI subcommand); there is no time-based trigger.

use diesel::prelude::*;

use crate::schema::name_sequences::dsl as ns;

/// Name of the per-year ordinal counter row.
pub const ORDINAL_SEQUENCE: &str = "ordinal";
/// Name of the year-code counter row.
pub const YEAR_SEQUENCE: &str = "year";

/// Errors raised by the sequence allocator.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// A counter row is missing; [`ensure_seeded`] was never run on this
    /// database.
    #[error("sequence {name:?} is not seeded")]
    Unseeded {
        /// Name of the missing counter.
        name: &'static str,
    },
}

/// Idempotently create both counter rows.
///
/// The ordinal counter seeds at 0 (next issued value is 1); the year counter
/// seeds at `year_base` from configuration. Re-running against an already
/// seeded database changes nothing, so every worker can call this at startup.
pub fn ensure_seeded(conn: &mut SqliteConnection, year_base: i64) -> anyhow::Result<()> {
    diesel::insert_or_ignore_into(ns::name_sequences)
        .values((ns::name.eq(ORDINAL_SEQUENCE), ns::value.eq(0_i64)))
        .execute(conn)?;
    diesel::insert_or_ignore_into(ns::name_sequences)
        .values((ns::name.eq(YEAR_SEQUENCE), ns::value.eq(year_base)))
        .execute(conn)?;
    Ok(())
}

/// Atomically increment and return the per-year ordinal.
///
/// Starts at 1 after seeding. Every returned value is distinct within the
/// current year epoch; gaps from aborted enclosing transactions are possible,
/// duplicates are not.
pub fn next_ordinal(conn: &mut SqliteConnection) -> anyhow::Result<i64> {
    let value = diesel::update(ns::name_sequences.filter(ns::name.eq(ORDINAL_SEQUENCE)))
        .set(ns::value.eq(ns::value + 1))
        .returning(ns::value)
        .get_result::<i64>(conn)
        .optional()?;

    match value {
        Some(v) => Ok(v),
        None => Err(SequenceError::Unseeded {
            name: ORDINAL_SEQUENCE,
        }
        .into()),
    }
}

/// Return the current year code without mutating it.
pub fn current_year(conn: &mut SqliteConnection) -> anyhow::Result<i64> {
    let value = ns::name_sequences
        .filter(ns::name.eq(YEAR_SEQUENCE))
        .select(ns::value)
        .first::<i64>(conn)
        .optional()?;

    match value {
        Some(v) => Ok(v),
        None => Err(SequenceError::Unseeded {
            name: YEAR_SEQUENCE,
        }
        .into()),
    }
}

/// Advance to the next year: increment the year code by exactly 1 and reset
/// the ordinal counter so the next issued ordinal is 1 again.
///
/// Both writes happen in one immediate transaction; a rollover is either fully
/// applied or not at all. Returns the new year code.
pub fn rollover_year(conn: &mut SqliteConnection) -> anyhow::Result<i64> {
    conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let year = diesel::update(ns::name_sequences.filter(ns::name.eq(YEAR_SEQUENCE)))
            .set(ns::value.eq(ns::value + 1))
            .returning(ns::value)
            .get_result::<i64>(conn)
            .optional()?
            .ok_or(SequenceError::Unseeded {
                name: YEAR_SEQUENCE,
            })?;

        let reset = diesel::update(ns::name_sequences.filter(ns::name.eq(ORDINAL_SEQUENCE)))
            .set(ns::value.eq(0_i64))
            .execute(conn)?;
        if reset == 0 {
            return Err(SequenceError::Unseeded {
                name: ORDINAL_SEQUENCE,
            }
            .into());
        }

        Ok(year)
    })
}
