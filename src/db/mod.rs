//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helper: [`connection::connect_sqlite`] applies WAL,
//!   foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations and a runner: [`migrate::run_sqlite`].
//!
//! Example:
//! ```no_run
//! use candidate_namer::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("candidate_namer_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
