use crate::error::{ProcessingError, Result};
use crate::models::{RawObservation, YearlyStat};
use crate::storage::{list_station_ids, load_station_observations, upsert_yearly_stat, Database};
use crate::utils::units::{mean_tenths_to_celsius, tenths_mm_sum_to_cm};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Running sums for one (station, year) group
#[derive(Debug, Default, Clone, Copy)]
struct YearAccumulator {
    tmax_sum: i64,
    tmax_count: u32,
    tmin_sum: i64,
    tmin_count: u32,
    prcp_sum: i64,
    prcp_count: u32,
}

impl YearAccumulator {
    fn add(&mut self, observation: &RawObservation) {
        if let Some(v) = observation.tmax_tenths {
            self.tmax_sum += i64::from(v);
            self.tmax_count += 1;
        }
        if let Some(v) = observation.tmin_tenths {
            self.tmin_sum += i64::from(v);
            self.tmin_count += 1;
        }
        if let Some(v) = observation.prcp_tenths {
            self.prcp_sum += i64::from(v);
            self.prcp_count += 1;
        }
    }

    fn finish(self, station_id: i64, year: i32) -> YearlyStat {
        YearlyStat {
            station_id,
            year,
            avg_tmax_c: mean_tenths_to_celsius(mean(self.tmax_sum, self.tmax_count)),
            avg_tmin_c: mean_tenths_to_celsius(mean(self.tmin_sum, self.tmin_count)),
            // An empty sum is missing, not zero
            total_prcp_cm: tenths_mm_sum_to_cm((self.prcp_count > 0).then_some(self.prcp_sum)),
            count_tmax: self.tmax_count,
            count_tmin: self.tmin_count,
            count_prcp: self.prcp_count,
        }
    }
}

fn mean(sum: i64, count: u32) -> Option<f64> {
    (count > 0).then(|| sum as f64 / f64::from(count))
}

/// Group observations by calendar year and compute one stat per year.
///
/// Pure function of its input; results are in ascending year order.
pub fn compute_yearly_stats(station_id: i64, observations: &[RawObservation]) -> Vec<YearlyStat> {
    let mut years: BTreeMap<i32, YearAccumulator> = BTreeMap::new();

    for observation in observations {
        years
            .entry(observation.date.year())
            .or_default()
            .add(observation);
    }

    years
        .into_iter()
        .map(|(year, acc)| acc.finish(station_id, year))
        .collect()
}

/// Outcome of an aggregation run over every station
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregationSummary {
    pub stations_total: usize,
    pub failed_stations: Vec<i64>,
    pub stats_written: usize,
}

impl AggregationSummary {
    /// Error for the invoker when any station failed
    pub fn into_result(self) -> Result<Self> {
        if self.failed_stations.is_empty() {
            Ok(self)
        } else {
            Err(ProcessingError::PartialFailure {
                failed: self.failed_stations.len(),
                total: self.stations_total,
                unit: "stations",
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Recompute and overwrite every yearly stat for one station.
    ///
    /// Always rebuilt from all current observations, inside one transaction.
    pub fn recompute_stats(&self, db: &mut Database, station_id: i64) -> Result<Vec<YearlyStat>> {
        let tx = db.connection_mut().transaction()?;

        let observations = load_station_observations(&tx, station_id)?;
        let stats = compute_yearly_stats(station_id, &observations);

        for stat in &stats {
            upsert_yearly_stat(&tx, stat)?;
        }

        tx.commit()?;

        debug!(
            station_id,
            observations = observations.len(),
            years = stats.len(),
            "Recomputed station stats"
        );
        Ok(stats)
    }

    /// Recompute stats for every known station.
    ///
    /// Stations are independent: one failing is logged and the rest still run.
    pub fn recompute_all(&self, db: &mut Database) -> Result<AggregationSummary> {
        let station_ids = list_station_ids(db.connection())?;
        let mut summary = AggregationSummary {
            stations_total: station_ids.len(),
            ..Default::default()
        };

        for station_id in station_ids {
            match self.recompute_stats(db, station_id) {
                Ok(stats) => summary.stats_written += stats.len(),
                Err(e) => {
                    error!(station_id, error = %e, "Failed to recompute station stats");
                    summary.failed_stations.push(station_id);
                }
            }
        }

        info!(
            stations = summary.stations_total,
            failed = summary.failed_stations.len(),
            stats_written = summary.stats_written,
            "Aggregation complete"
        );
        Ok(summary)
    }
}
