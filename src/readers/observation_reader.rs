use crate::error::{ProcessingError, Result};
use crate::models::ObservationLine;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, FIELDS_PER_LINE, SOURCE_DATE_FORMAT, SOURCE_DATE_LEN,
};
use chrono::NaiveDate;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Line counts for one parsed source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub parsed_lines: usize,
    pub malformed_lines: usize,
}

/// Parsed observations with the line counts that produced them
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub observations: Vec<ObservationLine>,
    pub stats: ParseStats,
}

impl ParsedSource {
    fn push_line(&mut self, line: &str) {
        self.stats.total_lines += 1;

        let line = line.trim();
        if line.is_empty() {
            self.stats.blank_lines += 1;
            return;
        }

        match parse_observation_line(line) {
            Some(observation) => {
                self.stats.parsed_lines += 1;
                self.observations.push(observation);
            }
            None => {
                self.stats.malformed_lines += 1;
                debug!(
                    line_number = self.stats.total_lines,
                    content = line,
                    "Skipping malformed line"
                );
            }
        }
    }
}

/// Reader for per-station `YYYYMMDD TMAX TMIN PRCP` files
pub struct ObservationReader {
    use_mmap: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read and parse every line of a station file
    pub fn read_observations(&self, path: &Path) -> Result<ParsedSource> {
        if self.use_mmap {
            self.read_observations_mmap(path)
        } else {
            let file = File::open(path)?;
            self.parse_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
        }
    }

    /// Parse any line-oriented source
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParsedSource> {
        let mut parsed = ParsedSource::default();

        for line_result in reader.lines() {
            parsed.push_line(&line_result?);
        }

        Ok(parsed)
    }

    fn read_observations_mmap(&self, path: &Path) -> Result<ParsedSource> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(ParsedSource::default());
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        let mut parsed = ParsedSource::default();
        for line in content.lines() {
            parsed.push_line(line);
        }

        Ok(parsed)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one trimmed, non-blank line; `None` means malformed
pub fn parse_observation_line(line: &str) -> Option<ObservationLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != FIELDS_PER_LINE {
        return None;
    }

    let date = parse_source_date(parts[0]).ok()?;
    let tmax = parts[1].parse::<i32>().ok()?;
    let tmin = parts[2].parse::<i32>().ok()?;
    let prcp = parts[3].parse::<i32>().ok()?;

    Some(ObservationLine::from_source(date, tmax, tmin, prcp))
}

/// Parse an 8-digit `YYYYMMDD` date
pub fn parse_source_date(field: &str) -> Result<NaiveDate> {
    if field.len() != SOURCE_DATE_LEN || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Invalid date format: '{}'",
            field
        )));
    }

    Ok(NaiveDate::parse_from_str(field, SOURCE_DATE_FORMAT)?)
}
