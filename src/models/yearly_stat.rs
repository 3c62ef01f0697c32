use serde::{Deserialize, Serialize};

/// Yearly aggregate for one station, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStat {
    pub station_id: i64,
    pub year: i32,
    pub avg_tmax_c: Option<f64>,
    pub avg_tmin_c: Option<f64>,
    pub total_prcp_cm: Option<f64>,
    pub count_tmax: u32,
    pub count_tmin: u32,
    pub count_prcp: u32,
}

/// A yearly aggregate as served by the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStatView {
    pub station: String,
    pub year: i32,
    pub avg_tmax_c: Option<f64>,
    pub avg_tmin_c: Option<f64>,
    pub total_prcp_cm: Option<f64>,
    pub count_tmax: u32,
    pub count_tmin: u32,
    pub count_prcp: u32,
}

impl YearlyStatView {
    pub fn from_stat(station: String, stat: YearlyStat) -> Self {
        Self {
            station,
            year: stat.year,
            avg_tmax_c: stat.avg_tmax_c,
            avg_tmin_c: stat.avg_tmin_c,
            total_prcp_cm: stat.total_prcp_cm,
            count_tmax: stat.count_tmax,
            count_tmin: stat.count_tmin,
            count_prcp: stat.count_prcp,
        }
    }
}
