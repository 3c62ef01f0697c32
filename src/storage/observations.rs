use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{ObservationLine, RawObservation};

/// Insert lines for one station, skipping dates that already exist.
///
/// Returns the number of rows actually inserted; existing rows are left as
/// they are.
pub fn insert_observation_lines(
    conn: &Connection,
    station_id: i64,
    lines: &[ObservationLine],
) -> Result<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO raw_observations (station_id, date, tmax_tenths, tmin_tenths, prcp_tenths)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(station_id, date) DO NOTHING",
    )?;

    let mut inserted = 0;
    for line in lines {
        inserted += stmt.execute(params![
            station_id,
            line.date,
            line.tmax_tenths,
            line.tmin_tenths,
            line.prcp_tenths,
        ])?;
    }

    Ok(inserted)
}

/// All observations for a station in date order
pub fn load_station_observations(conn: &Connection, station_id: i64) -> Result<Vec<RawObservation>> {
    let mut stmt = conn.prepare(
        "SELECT id, station_id, date, tmax_tenths, tmin_tenths, prcp_tenths
         FROM raw_observations
         WHERE station_id = ?1
         ORDER BY date",
    )?;

    let observations = stmt
        .query_map(params![station_id], |row| {
            Ok(RawObservation {
                id: row.get(0)?,
                station_id: row.get(1)?,
                date: row.get(2)?,
                tmax_tenths: row.get(3)?,
                tmin_tenths: row.get(4)?,
                prcp_tenths: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(observations)
}
