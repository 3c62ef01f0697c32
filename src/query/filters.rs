//! Typed filter predicates for the read queries.
//!
//! Filters are turned into an explicit list of predicates first and only
//! then rendered to SQL, so precedence between filters lives in one place.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::Deserialize;

/// One `WHERE` condition with its bound value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    StationCode(String),
    DateEquals(NaiveDate),
    DateFrom(NaiveDate),
    DateTo(NaiveDate),
    YearEquals(i32),
}

impl Predicate {
    fn sql(&self) -> &'static str {
        match self {
            Predicate::StationCode(_) => "s.code = ?",
            Predicate::DateEquals(_) => "o.date = ?",
            Predicate::DateFrom(_) => "o.date >= ?",
            Predicate::DateTo(_) => "o.date <= ?",
            Predicate::YearEquals(_) => "y.year = ?",
        }
    }

    fn value(&self) -> Value {
        match self {
            Predicate::StationCode(code) => Value::Text(code.clone()),
            // Same text layout rusqlite uses when storing a NaiveDate
            Predicate::DateEquals(d) | Predicate::DateFrom(d) | Predicate::DateTo(d) => {
                Value::Text(d.format("%Y-%m-%d").to_string())
            }
            Predicate::YearEquals(year) => Value::Integer(i64::from(*year)),
        }
    }
}

/// Render predicates as a `WHERE` clause (empty when there are none)
pub fn where_clause(predicates: &[Predicate]) -> (String, Vec<Value>) {
    if predicates.is_empty() {
        return (String::new(), Vec::new());
    }

    let conditions: Vec<&str> = predicates.iter().map(Predicate::sql).collect();
    let values = predicates.iter().map(Predicate::value).collect();

    (format!(" WHERE {}", conditions.join(" AND ")), values)
}

/// An empty `?station=` means no station filter
fn station_code(station: Option<&str>) -> Option<&str> {
    station.filter(|code| !code.is_empty())
}

/// Filters for raw observations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObservationFilter {
    pub station: Option<String>,
    pub on_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ObservationFilter {
    /// Exact date wins: when `on_date` is set the range bounds are ignored.
    /// Range bounds are inclusive.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(code) = station_code(self.station.as_deref()) {
            predicates.push(Predicate::StationCode(code.to_string()));
        }

        if let Some(date) = self.on_date {
            predicates.push(Predicate::DateEquals(date));
        } else {
            if let Some(start) = self.start_date {
                predicates.push(Predicate::DateFrom(start));
            }
            if let Some(end) = self.end_date {
                predicates.push(Predicate::DateTo(end));
            }
        }

        predicates
    }
}

/// Filters for yearly stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatsFilter {
    pub station: Option<String>,
    pub year: Option<i32>,
}

impl StatsFilter {
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(code) = station_code(self.station.as_deref()) {
            predicates.push(Predicate::StationCode(code.to_string()));
        }
        if let Some(year) = self.year {
            predicates.push(Predicate::YearEquals(year));
        }

        predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_date_overrides_range() {
        let filter = ObservationFilter {
            station: Some("X".to_string()),
            on_date: Some(date(1990, 1, 1)),
            start_date: Some(date(1980, 1, 1)),
            end_date: Some(date(2000, 1, 1)),
        };

        assert_eq!(
            filter.predicates(),
            vec![
                Predicate::StationCode("X".to_string()),
                Predicate::DateEquals(date(1990, 1, 1)),
            ]
        );
    }

    #[test]
    fn test_range_predicates() {
        let filter = ObservationFilter {
            start_date: Some(date(1985, 1, 1)),
            end_date: Some(date(1985, 12, 31)),
            ..Default::default()
        };

        let (clause, values) = where_clause(&filter.predicates());
        assert_eq!(clause, " WHERE o.date >= ? AND o.date <= ?");
        assert_eq!(
            values,
            vec![
                Value::Text("1985-01-01".to_string()),
                Value::Text("1985-12-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_station_is_no_filter() {
        let observations = ObservationFilter {
            station: Some(String::new()),
            ..Default::default()
        };
        assert!(observations.predicates().is_empty());

        let stats = StatsFilter {
            station: Some(String::new()),
            year: Some(1985),
        };
        assert_eq!(stats.predicates(), vec![Predicate::YearEquals(1985)]);
    }

    #[test]
    fn test_empty_filter() {
        let (clause, values) = where_clause(&StatsFilter::default().predicates());
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }
}
