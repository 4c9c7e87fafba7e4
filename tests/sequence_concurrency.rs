use std::collections::BTreeSet;
use std::thread;

use candidate_namer::db::connection::connect_sqlite;
use candidate_namer::sequence::{self, SequenceError};

mod common;
use common::setup_db;

#[test]
fn concurrent_callers_never_observe_the_same_ordinal() {
    let (db, mut conn) = setup_db();
    sequence::ensure_seeded(&mut conn, 22).unwrap();
    drop(conn);

    const WORKERS: usize = 8;
    const DRAWS: usize = 5;

    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let path = db.path.clone();
        handles.push(thread::spawn(move || {
            // Each worker gets its own connection, as in real ingestion.
            let mut conn = connect_sqlite(&path).expect("connect");
            let mut drawn = Vec::with_capacity(DRAWS);
            for _ in 0..DRAWS {
                drawn.push(sequence::next_ordinal(&mut conn).expect("next_ordinal"));
            }
            drawn
        }));
    }

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.join().expect("worker thread"));
    }

    let distinct: BTreeSet<i64> = all.iter().copied().collect();
    assert_eq!(distinct.len(), WORKERS * DRAWS, "duplicate ordinal issued");
    // No aborted transactions here, so the values are also gap-free.
    assert_eq!(*distinct.first().unwrap(), 1);
    assert_eq!(*distinct.last().unwrap(), (WORKERS * DRAWS) as i64);
}

#[test]
fn seeding_is_idempotent() {
    let (_db, mut conn) = setup_db();
    sequence::ensure_seeded(&mut conn, 22).unwrap();
    assert_eq!(sequence::next_ordinal(&mut conn).unwrap(), 1);

    // Another worker starting up must not reset anything.
    sequence::ensure_seeded(&mut conn, 22).unwrap();
    assert_eq!(sequence::next_ordinal(&mut conn).unwrap(), 2);
    assert_eq!(sequence::current_year(&mut conn).unwrap(), 22);
}

#[test]
fn rollover_bumps_year_and_restarts_ordinals() {
    let (_db, mut conn) = setup_db();
    sequence::ensure_seeded(&mut conn, 22).unwrap();

    for expect in 1..=3 {
        assert_eq!(sequence::next_ordinal(&mut conn).unwrap(), expect);
    }
    assert_eq!(sequence::current_year(&mut conn).unwrap(), 22);

    assert_eq!(sequence::rollover_year(&mut conn).unwrap(), 23);
    assert_eq!(sequence::current_year(&mut conn).unwrap(), 23);
    assert_eq!(sequence::next_ordinal(&mut conn).unwrap(), 1);

    // currentYear never mutates.
    assert_eq!(sequence::current_year(&mut conn).unwrap(), 23);
}

#[test]
fn rollover_on_fresh_database_runs_after_migrations() {
    // Startup order used by every DB-touching subcommand: migrate, connect,
    // seed. On a file that has never existed, rollover must then work rather
    // than fail with a missing name_sequences table.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir
        .path()
        .join("fresh.sqlite3")
        .to_string_lossy()
        .into_owned();

    candidate_namer::db::migrate::run_sqlite(&path).expect("migrations on fresh db");
    let mut conn = connect_sqlite(&path).expect("connect");
    sequence::ensure_seeded(&mut conn, 22).unwrap();

    assert_eq!(sequence::rollover_year(&mut conn).unwrap(), 23);
    assert_eq!(sequence::next_ordinal(&mut conn).unwrap(), 1);
}

#[test]
fn unseeded_database_is_a_typed_error() {
    let (_db, mut conn) = setup_db();

    let err = sequence::next_ordinal(&mut conn).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SequenceError>(),
        Some(SequenceError::Unseeded { name: "ordinal" })
    ));

    let err = sequence::current_year(&mut conn).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SequenceError>(),
        Some(SequenceError::Unseeded { name: "year" })
    ));
}
