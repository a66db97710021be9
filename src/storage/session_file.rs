//! Recorded session persistence.
//!
//! Sessions are stored as pretty-printed JSON so they stay inspectable
//! and diffable. The file holds the raw measurement data only; derived
//! views (merged rows, zone times) are recomputed on load.

use crate::recording::MeasurementsData;
use std::path::Path;

/// Save recorded session data to a JSON file.
pub fn save_session(data: &MeasurementsData, path: &Path) -> Result<(), SessionFileError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionFileError::IoError(e.to_string()))?;
    }

    let content = serde_json::to_string_pretty(data)
        .map_err(|e| SessionFileError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SessionFileError::IoError(e.to_string()))?;

    Ok(())
}

/// Load recorded session data from a JSON file.
pub fn load_session(path: &Path) -> Result<MeasurementsData, SessionFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SessionFileError::IoError(e.to_string()))?;

    serde_json::from_str(&content).map_err(|e| SessionFileError::ParseError(e.to_string()))
}

/// Session file storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionFileError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
