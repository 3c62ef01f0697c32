use rusqlite::{params_from_iter, types::Value, Connection};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{ObservationView, YearlyStat, YearlyStatView};
use crate::query::filters::{where_clause, ObservationFilter, StatsFilter};
use crate::settings::Settings;
use crate::utils::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Requested page, as given by a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Page after defaults and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

/// Read-only access to observations and yearly stats
#[derive(Debug, Clone)]
pub struct QueryService {
    default_page_size: u32,
    max_page_size: u32,
}

impl QueryService {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_page_size, settings.max_page_size)
    }

    /// Apply the default page size and clamp the limit to `[1, max]`
    pub fn resolve_page(&self, request: PageRequest) -> Page {
        Page {
            limit: request
                .limit
                .unwrap_or(self.default_page_size)
                .clamp(1, self.max_page_size),
            offset: request.offset.unwrap_or(0),
        }
    }

    /// Observations in display units, ordered by date then station code
    pub fn list_observations(
        &self,
        conn: &Connection,
        filter: &ObservationFilter,
        page: PageRequest,
    ) -> Result<Vec<ObservationView>> {
        let (clause, mut values) = where_clause(&filter.predicates());
        let page = self.resolve_page(page);
        values.push(Value::Integer(i64::from(page.limit)));
        values.push(Value::Integer(i64::from(page.offset)));

        let sql = format!(
            "SELECT s.code, o.date, o.tmax_tenths, o.tmin_tenths, o.prcp_tenths
             FROM raw_observations o
             JOIN stations s ON s.id = o.station_id{}
             ORDER BY o.date, s.code
             LIMIT ? OFFSET ?",
            clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(ObservationView::from_tenths(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Yearly stats ordered by station code then year
    pub fn list_yearly_stats(
        &self,
        conn: &Connection,
        filter: &StatsFilter,
        page: PageRequest,
    ) -> Result<Vec<YearlyStatView>> {
        let (clause, mut values) = where_clause(&filter.predicates());
        let page = self.resolve_page(page);
        values.push(Value::Integer(i64::from(page.limit)));
        values.push(Value::Integer(i64::from(page.offset)));

        let sql = format!(
            "SELECT s.code, y.station_id, y.year, y.avg_tmax_c, y.avg_tmin_c, y.total_prcp_cm,
                    y.count_tmax, y.count_tmin, y.count_prcp
             FROM yearly_stats y
             JOIN stations s ON s.id = y.station_id{}
             ORDER BY s.code, y.year
             LIMIT ? OFFSET ?",
            clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                let stat = YearlyStat {
                    station_id: row.get(1)?,
                    year: row.get(2)?,
                    avg_tmax_c: row.get(3)?,
                    avg_tmin_c: row.get(4)?,
                    total_prcp_cm: row.get(5)?,
                    count_tmax: row.get(6)?,
                    count_tmin: row.get(7)?,
                    count_prcp: row.get(8)?,
                };
                Ok(YearlyStatView::from_stat(row.get(0)?, stat))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl Default for QueryService {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}
