use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rusqlite::params;
use std::fs;
use tempfile::TempDir;
use wx_processor::models::YearlyStat;
use wx_processor::processors::{IngestOutcome, Ingester, StatsAggregator};
use wx_processor::query::{ObservationFilter, PageRequest, QueryService, StatsFilter};
use wx_processor::storage::{find_station, load_yearly_stats, resolve_station_id, Database};

const SCENARIO_A: &str = "19850101\t100\t-50\t123\n19850102\t-9999\t-9999\t-9999\n19850103\t222\t111\t0\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_scenario_a_file_ingestion() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("TEST0001.txt");
    fs::write(&path, SCENARIO_A).unwrap();

    let mut db = Database::open(&dir.path().join("weather.db")).unwrap();
    let ingester = Ingester::new(2);

    let first = ingester.ingest_file(&mut db, "TEST0001", &path).unwrap();
    assert_eq!(first, IngestOutcome { processed: 3, inserted: 3 });

    let second = ingester.ingest_file(&mut db, "TEST0001", &path).unwrap();
    assert_eq!(second, IngestOutcome { processed: 3, inserted: 0 });

    let station = find_station(db.connection(), "TEST0001").unwrap().unwrap();
    assert_eq!(db.station_observation_count(station.id).unwrap(), 3);

    // Day two: every sentinel stored as NULL, never as -9999
    let day_two: (Option<i32>, Option<i32>, Option<i32>) = db
        .connection()
        .query_row(
            "SELECT tmax_tenths, tmin_tenths, prcp_tenths FROM raw_observations
             WHERE station_id = ?1 AND date = ?2",
            params![station.id, date(1985, 1, 2)],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(day_two, (None, None, None));

    let sentinels: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM raw_observations
             WHERE tmax_tenths = -9999 OR tmin_tenths = -9999 OR prcp_tenths = -9999",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sentinels, 0);
}

#[test]
fn test_directory_ingestion_is_idempotent() {
    let data_dir = TempDir::new().unwrap();
    fs::write(data_dir.path().join("USC00110072.txt"), SCENARIO_A).unwrap();
    fs::write(
        data_dir.path().join("USC00110187.txt"),
        "20000101 100 0 20\n20000102 200 100 -9999\n20000103 1 2\n",
    )
    .unwrap();
    fs::write(data_dir.path().join(".DS_Store"), "junk").unwrap();
    fs::write(data_dir.path().join("README.md"), "# not data").unwrap();

    let db_dir = TempDir::new().unwrap();
    let mut db = Database::open(&db_dir.path().join("weather.db")).unwrap();
    let ingester = Ingester::new(4);

    let first = ingester.ingest_directory(&mut db, data_dir.path(), None).unwrap();
    assert_eq!(first.files_total, 2);
    assert!(first.failed_files.is_empty());
    assert_eq!(first.processed, 5);
    assert_eq!(first.inserted, 5);

    let rows_after_first = db.observation_count().unwrap();

    let second = ingester.ingest_directory(&mut db, data_dir.path(), None).unwrap();
    assert_eq!(second.processed, 5);
    assert_eq!(second.inserted, 0);
    assert_eq!(db.observation_count().unwrap(), rows_after_first);
}

#[test]
fn test_scenario_b_aggregation() {
    let mut db = Database::open_in_memory().unwrap();
    let station_id = resolve_station_id(db.connection(), "X").unwrap();

    let rows = [
        (date(2000, 1, 1), Some(100), Some(0), Some(20)),
        (date(2000, 1, 2), Some(200), Some(100), None),
        (date(2001, 5, 1), None, None, Some(10)),
    ];
    for (day, tmax, tmin, prcp) in rows {
        db.connection()
            .execute(
                "INSERT INTO raw_observations (station_id, date, tmax_tenths, tmin_tenths, prcp_tenths)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![station_id, day, tmax, tmin, prcp],
            )
            .unwrap();
    }

    let aggregator = StatsAggregator::new();
    aggregator.recompute_all(&mut db).unwrap();
    let first = load_yearly_stats(db.connection(), station_id).unwrap();

    assert_eq!(
        first,
        vec![
            YearlyStat {
                station_id,
                year: 2000,
                avg_tmax_c: Some(15.0),
                avg_tmin_c: Some(5.0),
                total_prcp_cm: Some(0.2),
                count_tmax: 2,
                count_tmin: 2,
                count_prcp: 1,
            },
            YearlyStat {
                station_id,
                year: 2001,
                avg_tmax_c: None,
                avg_tmin_c: None,
                total_prcp_cm: Some(0.1),
                count_tmax: 0,
                count_tmin: 0,
                count_prcp: 1,
            },
        ]
    );

    aggregator.recompute_all(&mut db).unwrap();
    assert_eq!(load_yearly_stats(db.connection(), station_id).unwrap(), first);
}

#[test]
fn test_ingest_aggregate_query_pipeline() {
    let data_dir = TempDir::new().unwrap();
    fs::write(data_dir.path().join("TEST0001.txt"), SCENARIO_A).unwrap();

    let mut db = Database::open_in_memory().unwrap();
    Ingester::new(1)
        .ingest_directory(&mut db, data_dir.path(), None)
        .unwrap()
        .into_result()
        .unwrap();
    StatsAggregator::new()
        .recompute_all(&mut db)
        .unwrap()
        .into_result()
        .unwrap();

    let queries = QueryService::default();
    let records = queries
        .list_observations(
            db.connection(),
            &ObservationFilter {
                station: Some("TEST0001".to_string()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].tmax_c, Some(22.2));
    assert_eq!(records[2].prcp_mm, Some(0.0));

    let stats = queries
        .list_yearly_stats(db.connection(), &StatsFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].count_tmax, 2);
    assert_eq!(stats[0].count_prcp, 2);
    assert_eq!(stats[0].avg_tmax_c, Some(16.1));
    assert_eq!(stats[0].total_prcp_cm, Some(1.23));
}

#[test]
fn test_delete_station_cascades() {
    let mut db = Database::open_in_memory().unwrap();
    Ingester::new(1)
        .ingest(&mut db, "GONE", SCENARIO_A.as_bytes())
        .unwrap();
    Ingester::new(1)
        .ingest(&mut db, "KEPT", "19900101 1 1 1\n".as_bytes())
        .unwrap();
    StatsAggregator::new().recompute_all(&mut db).unwrap();
    assert_eq!(db.yearly_stat_count().unwrap(), 2);

    db.delete_station("GONE").unwrap();

    assert!(find_station(db.connection(), "GONE").unwrap().is_none());
    assert_eq!(db.observation_count().unwrap(), 1);
    assert_eq!(db.yearly_stat_count().unwrap(), 1);
}
