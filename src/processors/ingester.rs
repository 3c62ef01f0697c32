use crate::error::{ProcessingError, Result};
use crate::models::ObservationLine;
use crate::readers::{ObservationReader, ParsedSource};
use crate::storage::{insert_observation_lines, resolve_station_id, Database};
use crate::utils::constants::DEFAULT_DATA_FILE_EXTENSION;
use crate::utils::filename::{is_data_file, station_code_from_path};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Counts for one ingested source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    /// Lines that parsed, whether or not they produced a new row
    pub processed: usize,
    /// Lines that produced a genuinely new row
    pub inserted: usize,
}

/// Totals for a directory run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub files_total: usize,
    pub failed_files: Vec<String>,
    pub processed: usize,
    pub inserted: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: IngestOutcome) {
        self.processed += outcome.processed;
        self.inserted += outcome.inserted;
    }

    /// Error for the invoker when any file failed
    pub fn into_result(self) -> Result<Self> {
        if self.failed_files.is_empty() {
            Ok(self)
        } else {
            Err(ProcessingError::PartialFailure {
                failed: self.failed_files.len(),
                total: self.files_total,
                unit: "files",
            })
        }
    }
}

pub struct Ingester {
    max_workers: usize,
    data_file_extension: String,
    reader: ObservationReader,
}

impl Ingester {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            data_file_extension: DEFAULT_DATA_FILE_EXTENSION.to_string(),
            reader: ObservationReader::new(),
        }
    }

    pub fn with_data_file_extension(mut self, extension: &str) -> Self {
        self.data_file_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = ObservationReader::with_mmap(use_mmap);
        self
    }

    /// Ingest a line-oriented source for one station
    pub fn ingest<R: BufRead>(
        &self,
        db: &mut Database,
        station_code: &str,
        source: R,
    ) -> Result<IngestOutcome> {
        let parsed = self.reader.parse_reader(source)?;
        self.load_observations(db, station_code, &parsed.observations)
    }

    /// Ingest one station file
    pub fn ingest_file(
        &self,
        db: &mut Database,
        station_code: &str,
        path: &Path,
    ) -> Result<IngestOutcome> {
        let parsed = self.reader.read_observations(path)?;
        self.load_observations(db, station_code, &parsed.observations)
    }

    /// Write parsed lines for one station in a single transaction.
    ///
    /// Station creation is part of the same transaction, so a failed load
    /// leaves nothing behind.
    pub fn load_observations(
        &self,
        db: &mut Database,
        station_code: &str,
        observations: &[ObservationLine],
    ) -> Result<IngestOutcome> {
        let tx = db.connection_mut().transaction()?;

        let station_id = resolve_station_id(&tx, station_code)?;
        let inserted = insert_observation_lines(&tx, station_id, observations)?;

        tx.commit()?;

        Ok(IngestOutcome {
            processed: observations.len(),
            inserted,
        })
    }

    /// Eligible data files in `dir`, sorted by name
    pub fn find_data_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_data_file(&path, &self.data_file_extension) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Ingest every data file in a directory.
    ///
    /// Files are parsed in parallel batches and written one transaction per
    /// file. A file that fails is logged and skipped; an unreadable directory
    /// fails the whole run.
    pub fn ingest_directory(
        &self,
        db: &mut Database,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestSummary> {
        if !dir.is_dir() {
            return Err(ProcessingError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Data directory not found: {}", dir.display()),
            )));
        }

        let files = self.find_data_files(dir)?;
        let mut summary = IngestSummary {
            files_total: files.len(),
            ..Default::default()
        };

        if let Some(p) = progress {
            p.set_length(files.len() as u64);
        }

        if files.is_empty() {
            warn!(dir = %dir.display(), extension = %self.data_file_extension, "No data files found");
            return Ok(summary);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        for batch in files.chunks(self.max_workers) {
            let parsed: Vec<(&PathBuf, Result<ParsedSource>)> = pool.install(|| {
                batch
                    .par_iter()
                    .map(|path| (path, self.reader.read_observations(path)))
                    .collect()
            });

            for (path, parsed_source) in parsed {
                let file_name = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());

                if let Some(p) = progress {
                    p.set_message(&format!("Ingesting {}", file_name));
                }

                match self.load_parsed_file(db, path, parsed_source) {
                    Ok(outcome) => {
                        info!(
                            file = %file_name,
                            processed = outcome.processed,
                            inserted = outcome.inserted,
                            "Ingested file"
                        );
                        summary.record(outcome);
                    }
                    Err(e) => {
                        error!(file = %file_name, error = %e, "Failed to ingest file");
                        summary.failed_files.push(file_name);
                    }
                }

                if let Some(p) = progress {
                    p.increment(1);
                }
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Ingested {} files ({} inserted)",
                summary.files_total - summary.failed_files.len(),
                summary.inserted
            ));
        }

        Ok(summary)
    }

    fn load_parsed_file(
        &self,
        db: &mut Database,
        path: &Path,
        parsed: Result<ParsedSource>,
    ) -> Result<IngestOutcome> {
        let parsed = parsed?;
        let station_code = station_code_from_path(path)?;

        if parsed.stats.malformed_lines > 0 {
            warn!(
                station = %station_code,
                malformed = parsed.stats.malformed_lines,
                "Skipped malformed lines"
            );
        }

        self.load_observations(db, &station_code, &parsed.observations)
    }
}

impl Default for Ingester {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
