use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::YearlyStat;

/// Insert or fully overwrite the row for (station, year)
pub fn upsert_yearly_stat(conn: &Connection, stat: &YearlyStat) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO yearly_stats (
            station_id, year, avg_tmax_c, avg_tmin_c, total_prcp_cm,
            count_tmax, count_tmin, count_prcp
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(station_id, year) DO UPDATE SET
            avg_tmax_c = excluded.avg_tmax_c,
            avg_tmin_c = excluded.avg_tmin_c,
            total_prcp_cm = excluded.total_prcp_cm,
            count_tmax = excluded.count_tmax,
            count_tmin = excluded.count_tmin,
            count_prcp = excluded.count_prcp",
    )?;

    stmt.execute(params![
        stat.station_id,
        stat.year,
        stat.avg_tmax_c,
        stat.avg_tmin_c,
        stat.total_prcp_cm,
        stat.count_tmax,
        stat.count_tmin,
        stat.count_prcp,
    ])?;

    Ok(())
}

/// Stored stats for a station in year order
pub fn load_yearly_stats(conn: &Connection, station_id: i64) -> Result<Vec<YearlyStat>> {
    let mut stmt = conn.prepare(
        "SELECT station_id, year, avg_tmax_c, avg_tmin_c, total_prcp_cm,
                count_tmax, count_tmin, count_prcp
         FROM yearly_stats
         WHERE station_id = ?1
         ORDER BY year",
    )?;

    let stats = stmt
        .query_map(params![station_id], |row| {
            Ok(YearlyStat {
                station_id: row.get(0)?,
                year: row.get(1)?,
                avg_tmax_c: row.get(2)?,
                avg_tmin_c: row.get(3)?,
                total_prcp_cm: row.get(4)?,
                count_tmax: row.get(5)?,
                count_tmin: row.get(6)?,
                count_prcp: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(stats)
}
