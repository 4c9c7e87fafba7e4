use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use candidate_namer::models::NewCandidate;
use candidate_namer::resolver::{AssociationResolver, Outcome};
use candidate_namer::store::{CandidateStore, SqliteStore};
use candidate_namer::{config, db, jd, sequence};

#[derive(Parser)]
#[command(version, about = "Candidate designation CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Ingest detections from a TOML file and resolve their designations.
    Ingest {
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long, value_name = "FILE")]
        config: String,
    },
    /// Advance the year counter; the next ordinal restarts at 1.
    Rollover {
        #[arg(long, value_name = "FILE")]
        config: String,
    },
    /// Decode a designation back into its (year, ordinal) pair.
    Decode {
        name: String,
        #[arg(long, value_name = "FILE")]
        config: String,
    },
    /// List all detections grouped under one designation.
    Show { designation: String },
}

/// Shape of the ingest file: a sequence of `[[detection]]` tables.
#[derive(Deserialize)]
struct IngestFile {
    #[serde(rename = "detection")]
    detections: Vec<NewCandidate>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    match cli.cmd {
        Cmd::Ingest { file, config } => {
            let cfg = config::load_config_path(&config)?;
            db::migrate::run_sqlite(&db_url)?;
            let mut conn = db::connection::connect_sqlite(&db_url)?;
            sequence::ensure_seeded(&mut conn, cfg.designation.year_base)?;

            let resolver = AssociationResolver::new(
                SqliteStore::new(),
                cfg.designation.scheme()?,
                cfg.association.clone(),
            );

            let text =
                std::fs::read_to_string(&file).with_context(|| format!("read ingest file {file}"))?;
            let batch: IngestFile = toml::from_str(&text).context("failed to parse ingest TOML")?;

            // One detection's failure must not block the rest of the batch.
            for det in &batch.detections {
                match resolver.resolve(&mut conn, det) {
                    Ok(Outcome::Associated {
                        designation,
                        new_object,
                        conflict,
                    }) => {
                        let kind = if new_object { "new" } else { "known" };
                        let flag = if conflict { " [conflict]" } else { "" };
                        println!("{} -> {designation} ({kind}){flag}", det.candid);
                    }
                    Ok(Outcome::Unassociated) => {
                        println!("{} -> unassociated", det.candid);
                    }
                    Err(e) => {
                        tracing::error!(candid = det.candid, error = %e, "detection failed");
                    }
                }
            }
        }
        Cmd::Rollover { config } => {
            let cfg = config::load_config_path(&config)?;
            db::migrate::run_sqlite(&db_url)?;
            let mut conn = db::connection::connect_sqlite(&db_url)?;
            sequence::ensure_seeded(&mut conn, cfg.designation.year_base)?;
            let year = sequence::rollover_year(&mut conn)?;
            println!("year counter is now {year}");
        }
        Cmd::Decode { name, config } => {
            let cfg = config::load_config_path(&config)?;
            let (year, ordinal) = cfg.designation.scheme()?.decode(&name)?;
            println!("{name}: year {year}, ordinal {ordinal}");
        }
        Cmd::Show { designation } => {
            db::migrate::run_sqlite(&db_url)?;
            let mut conn = db::connection::connect_sqlite(&db_url)?;
            let store = SqliteStore::new();
            let rows = store.by_designation(&mut conn, &designation)?;
            if rows.is_empty() {
                println!("no detections under {designation}");
            }
            for row in rows {
                let when = jd::jd_to_utc(row.jd)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| format!("jd {}", row.jd));
                println!(
                    "{}  {}  ra={:.6} dec={:.6}  magpsf={:.2} scorr={:.1}",
                    row.candid, when, row.ra, row.dec, row.magpsf, row.scorr
                );
            }
        }
    }

    Ok(())
}
