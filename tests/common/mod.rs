#![allow(dead_code)]

use candidate_namer::db::{connection, migrate};
use candidate_namer::models::NewCandidate;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

/// A plausible detection row with the interesting fields pinned and the rest
/// filled with survey-typical values.
pub fn detection(candid: i64, ra: f64, dec: f64, jd: f64, scorr: f64) -> NewCandidate {
    NewCandidate {
        candid,
        ra,
        dec,
        jd,
        fid: 1,
        diffimname: format!("diff_{candid}.fits"),
        sciimname: format!("sci_{candid}.fits"),
        refimname: "ref_field_0001.fits".into(),
        magpsf: 18.4,
        sigmapsf: 0.08,
        chipsf: 1.1,
        aimage: 2.3,
        bimage: 2.1,
        elong: 1.1,
        fwhm: 2.8,
        scorr,
        xpos: 512.0,
        ypos: 1024.0,
        magzpsci: 26.2,
        magzpsciunc: 0.02,
        tmjmag1: None,
        tmhmag1: None,
        tmkmag1: None,
        tmobjectid1: None,
    }
}
