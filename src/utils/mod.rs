pub mod constants;
pub mod filename;
pub mod progress;
pub mod units;

pub use constants::*;
pub use filename::{is_data_file, station_code_from_path};
pub use progress::ProgressReporter;
