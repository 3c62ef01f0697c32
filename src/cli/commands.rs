use chrono::Utc;
use tracing::{error, info};

use crate::cli::args::{Cli, Commands};
use crate::cli::logging::init_logging;
use crate::error::Result;
use crate::processors::{Ingester, StatsAggregator};
use crate::query::QueryService;
use crate::server::{self, AppState};
use crate::settings::Settings;
use crate::storage::Database;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        settings.database_path = path;
    }

    // Failing to open storage is fatal for the whole run
    let mut db = Database::open(&settings.database_path)?;

    match cli.command {
        Commands::Ingest {
            data_dir,
            max_workers,
            mmap,
            no_progress,
        } => {
            let started = Utc::now();
            info!(
                started_at = %started.to_rfc3339(),
                data_dir = %data_dir.display(),
                database = %settings.database_path.display(),
                "Ingestion started"
            );

            let ingester = Ingester::new(max_workers)
                .with_data_file_extension(&settings.data_file_extension)
                .with_mmap(mmap);

            // Sized by ingest_directory once the file list is known
            let progress = ProgressReporter::new(0, "Ingesting station files...", no_progress);

            let summary = ingester.ingest_directory(&mut db, &data_dir, Some(&progress))?;

            info!(
                finished_at = %Utc::now().to_rfc3339(),
                files = summary.files_total,
                failed = summary.failed_files.len(),
                processed = summary.processed,
                inserted = summary.inserted,
                "Ingestion finished"
            );

            summary.into_result()?;
        }

        Commands::Aggregate => {
            let started = Utc::now();
            info!(started_at = %started.to_rfc3339(), "Stats computation started");

            let summary = StatsAggregator::new().recompute_all(&mut db)?;

            info!(
                finished_at = %Utc::now().to_rfc3339(),
                stations = summary.stations_total,
                stats_written = summary.stats_written,
                "Stats computation finished"
            );

            summary.into_result()?;
        }

        Commands::Serve { bind } => {
            let bind_address = bind.unwrap_or_else(|| settings.bind_address.clone());
            let state = AppState::new(db, QueryService::from_settings(&settings));

            if let Err(e) = server::serve(state, &bind_address).await {
                error!(error = %e, "Server stopped");
                return Err(e);
            }
        }

        Commands::DeleteStation { code } => {
            db.delete_station(&code)?;
        }
    }

    Ok(())
}
