//! SQLite-backed storage handle.
//!
//! A `Database` is constructed explicitly at the start of a run and passed to
//! each component; there is no process-wide connection.

pub mod observations;
pub mod registry;
pub mod schema;
pub mod stats;

pub use observations::{insert_observation_lines, load_station_observations};
pub use registry::{find_station, list_station_ids, list_stations, resolve_station_id};
pub use stats::{load_yearly_stats, upsert_yearly_stat};

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database file and bootstrap the schema
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // WAL lets the read API see either pre- or post-commit state while a run writes
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %journal_mode, "Opened database");

        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and benchmarks
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::setup_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn observation_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM raw_observations", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn station_observation_count(&self, station_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM raw_observations WHERE station_id = ?1",
            params![station_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn yearly_stat_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM yearly_stats", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Administrative delete; observations and stats go with the station
    pub fn delete_station(&mut self, code: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM stations WHERE code = ?1", params![code])?;

        if deleted == 0 {
            return Err(ProcessingError::StationNotFound {
                code: code.to_string(),
            });
        }

        info!(station = code, "Deleted station and its observations/stats");
        Ok(())
    }
}
