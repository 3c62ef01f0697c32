//! Station code to id mapping.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::station::{validate_code, Station};

/// Return the id for `code`, creating the station on first use.
///
/// Inserts with `ON CONFLICT DO NOTHING` and then re-reads, so the unique
/// constraint on `code` decides which writer creates the row.
pub fn resolve_station_id(conn: &Connection, code: &str) -> Result<i64> {
    validate_code(code)?;

    conn.execute(
        "INSERT INTO stations (code) VALUES (?1) ON CONFLICT(code) DO NOTHING",
        params![code],
    )?;

    let id = conn.query_row(
        "SELECT id FROM stations WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub fn find_station(conn: &Connection, code: &str) -> Result<Option<Station>> {
    let station = conn
        .query_row(
            "SELECT id, code FROM stations WHERE code = ?1",
            params![code],
            |row| Ok(Station::new(row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(station)
}

pub fn list_station_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM stations ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;

    Ok(ids)
}

pub fn list_stations(conn: &Connection) -> Result<Vec<Station>> {
    let mut stmt = conn.prepare("SELECT id, code FROM stations ORDER BY code")?;
    let stations = stmt
        .query_map([], |row| Ok(Station::new(row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(stations)
}
