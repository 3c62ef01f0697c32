use rusqlite::Connection;

use crate::error::Result;

/// Create tables and indexes if they do not exist yet
pub fn setup_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS raw_observations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_id INTEGER NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            tmax_tenths INTEGER,
            tmin_tenths INTEGER,
            prcp_tenths INTEGER,
            UNIQUE (station_id, date)
        );

        CREATE TABLE IF NOT EXISTS yearly_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_id INTEGER NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
            year INTEGER NOT NULL,
            avg_tmax_c REAL,
            avg_tmin_c REAL,
            total_prcp_cm REAL,
            count_tmax INTEGER NOT NULL DEFAULT 0,
            count_tmin INTEGER NOT NULL DEFAULT 0,
            count_prcp INTEGER NOT NULL DEFAULT 0,
            UNIQUE (station_id, year)
        );

        CREATE INDEX IF NOT EXISTS idx_raw_observations_date ON raw_observations(date);
        CREATE INDEX IF NOT EXISTS idx_yearly_stats_year ON yearly_stats(year);",
    )?;

    Ok(())
}
