/// Sentinel used by the source files for a missing measurement
pub const MISSING_VALUE: i32 = -9999;

/// Number of whitespace separated fields on a data line
pub const FIELDS_PER_LINE: usize = 4;

/// Date layout of the first field on a data line
pub const SOURCE_DATE_FORMAT: &str = "%Y%m%d";
pub const SOURCE_DATE_LEN: usize = 8;

/// File names
pub const DEFAULT_DATABASE_FILE: &str = "weather.db";
pub const DEFAULT_CONFIG_FILE: &str = "wx-processor.toml";
pub const DEFAULT_DATA_FILE_EXTENSION: &str = "txt";

/// Read API defaults
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
