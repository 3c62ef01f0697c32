pub mod ingester;
pub mod stats_aggregator;

pub use ingester::{IngestOutcome, IngestSummary, Ingester};
pub use stats_aggregator::{compute_yearly_stats, AggregationSummary, StatsAggregator};
