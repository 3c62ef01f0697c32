use crate::error::{ProcessingError, Result};
use std::path::Path;

/// Whether a directory entry is a station data file.
///
/// Hidden files (leading `.`) are never data files; the extension check is
/// case-insensitive.
pub fn is_data_file(path: &Path, extension: &str) -> bool {
    let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
        return false;
    };

    if name.starts_with('.') {
        return false;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Derive the station code from a data file name (e.g. USC00110072.txt -> USC00110072)
pub fn station_code_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Cannot derive station code from path: {}",
                path.display()
            ))
        })?;

    Ok(stem.to_string())
}
