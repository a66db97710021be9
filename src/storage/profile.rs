//! Athlete profile persistence.
//!
//! The profile supplies the reference values (FTP, max HR) that key the
//! zone trackers. Missing values mean "zones unavailable" and are valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Athlete profile with physiological reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteProfile {
    /// Display name
    pub name: String,
    /// Functional Threshold Power in watts (50-600)
    pub ftp: Option<f64>,
    /// Maximum heart rate in bpm (100-250)
    pub max_hr: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
}

impl Default for AthleteProfile {
    fn default() -> Self {
        Self {
            name: "Cyclist".to_string(),
            ftp: None,
            max_hr: None,
            weight_kg: None,
        }
    }
}

impl AthleteProfile {
    /// Validate an FTP value (50-600 watts).
    pub fn validate_ftp(ftp: f64) -> bool {
        (50.0..=600.0).contains(&ftp)
    }

    /// Validate a max heart rate value (100-250 bpm).
    pub fn validate_max_hr(max_hr: f64) -> bool {
        (100.0..=250.0).contains(&max_hr)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if let Some(ftp) = self.ftp {
            if !Self::validate_ftp(ftp) {
                return Err(ProfileError::InvalidFtp(ftp));
            }
        }
        if let Some(max_hr) = self.max_hr {
            if !Self::validate_max_hr(max_hr) {
                return Err(ProfileError::InvalidMaxHr(max_hr));
            }
        }
        Ok(())
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "velolog", "VeloLog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default profile file path.
pub fn default_profile_path() -> PathBuf {
    get_data_dir().join("profile.toml")
}

/// Load an athlete profile from a TOML file.
///
/// A missing file yields the default profile (first-run behavior). A
/// present file with out-of-range reference values is rejected.
pub fn load_profile(path: &Path) -> Result<AthleteProfile, ProfileError> {
    if !path.exists() {
        return Ok(AthleteProfile::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ProfileError::IoError(e.to_string()))?;

    let profile: AthleteProfile =
        toml::from_str(&content).map_err(|e| ProfileError::ParseError(e.to_string()))?;

    profile.validate()?;
    Ok(profile)
}

/// Save an athlete profile to a TOML file.
pub fn save_profile(profile: &AthleteProfile, path: &Path) -> Result<(), ProfileError> {
    profile.validate()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ProfileError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(profile).map_err(|e| ProfileError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ProfileError::IoError(e.to_string()))?;

    Ok(())
}

/// Profile storage errors.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("FTP out of range (50-600 watts): {0}")]
    InvalidFtp(f64),

    #[error("Max heart rate out of range (100-250 bpm): {0}")]
    InvalidMaxHr(f64),
}
