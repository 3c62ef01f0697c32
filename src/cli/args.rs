use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wx-processor")]
#[command(about = "Station weather ingestion, yearly statistics and read API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "SQLite database file [default: weather.db]")]
    pub database: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: wx-processor.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest every per-station data file in a directory
    Ingest {
        #[arg(help = "Directory of per-station files (station code = file name)")]
        data_dir: PathBuf,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Read files through a memory map")]
        mmap: bool,

        #[arg(long, help = "Disable the progress bar")]
        no_progress: bool,
    },

    /// Recompute yearly statistics for every known station
    Aggregate,

    /// Serve raw observations and yearly statistics over HTTP
    Serve {
        #[arg(short, long, help = "Listen address [default: 127.0.0.1:8000]")]
        bind: Option<String>,
    },

    /// Delete a station together with its observations and statistics
    DeleteStation {
        #[arg(help = "Station code")]
        code: String,
    },
}
