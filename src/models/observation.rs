use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::constants::MISSING_VALUE;
use crate::utils::units::{tenths_to_celsius, tenths_to_mm};

/// One parsed data line, values still in source tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLine {
    pub date: NaiveDate,
    pub tmax_tenths: Option<i32>,
    pub tmin_tenths: Option<i32>,
    pub prcp_tenths: Option<i32>,
}

impl ObservationLine {
    /// Build a line from raw source integers, mapping the -9999 sentinel to None
    pub fn from_source(date: NaiveDate, tmax: i32, tmin: i32, prcp: i32) -> Self {
        Self {
            date,
            tmax_tenths: missing_to_none(tmax),
            tmin_tenths: missing_to_none(tmin),
            prcp_tenths: missing_to_none(prcp),
        }
    }
}

fn missing_to_none(value: i32) -> Option<i32> {
    if value == MISSING_VALUE {
        None
    } else {
        Some(value)
    }
}

/// A stored daily observation for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub id: i64,
    pub station_id: i64,
    pub date: NaiveDate,
    pub tmax_tenths: Option<i32>,
    pub tmin_tenths: Option<i32>,
    pub prcp_tenths: Option<i32>,
}

/// An observation as served by the read API, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationView {
    pub station: String,
    pub date: NaiveDate,
    pub tmax_c: Option<f64>,
    pub tmin_c: Option<f64>,
    pub prcp_mm: Option<f64>,
}

impl ObservationView {
    pub fn from_tenths(
        station: String,
        date: NaiveDate,
        tmax_tenths: Option<i32>,
        tmin_tenths: Option<i32>,
        prcp_tenths: Option<i32>,
    ) -> Self {
        Self {
            station,
            date,
            tmax_c: tenths_to_celsius(tmax_tenths),
            tmin_c: tenths_to_celsius(tmin_tenths),
            prcp_mm: tenths_to_mm(prcp_tenths),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_maps_to_none() {
        let date = NaiveDate::from_ymd_opt(1985, 1, 2).unwrap();
        let line = ObservationLine::from_source(date, -9999, -9999, -9999);

        assert_eq!(line.tmax_tenths, None);
        assert_eq!(line.tmin_tenths, None);
        assert_eq!(line.prcp_tenths, None);
    }

    #[test]
    fn test_zero_is_not_missing() {
        let date = NaiveDate::from_ymd_opt(1985, 1, 3).unwrap();
        let line = ObservationLine::from_source(date, 222, 111, 0);

        assert_eq!(line.tmax_tenths, Some(222));
        assert_eq!(line.tmin_tenths, Some(111));
        assert_eq!(line.prcp_tenths, Some(0));
    }

    #[test]
    fn test_view_conversion() {
        let date = NaiveDate::from_ymd_opt(1985, 1, 1).unwrap();
        let view = ObservationView::from_tenths("X".to_string(), date, Some(100), Some(-50), None);

        assert_eq!(view.tmax_c, Some(10.0));
        assert_eq!(view.tmin_c, Some(-5.0));
        assert_eq!(view.prcp_mm, None);
    }
}
