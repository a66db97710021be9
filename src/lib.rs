//! VeloLog - Workout Recording Core
//!
//! A recording core for cycling workouts: validated measurement storage,
//! a 1-second merged timeline, power and heart rate zone tracking, and
//! deterministic CSV and TCX export.

pub mod metrics;
pub mod recording;
pub mod storage;

// Re-export commonly used types
pub use metrics::tracker::ZoneTracker;
pub use metrics::zones::ZoneSet;
pub use recording::exporter_csv::{csv_string, csv_string_with_laps};
pub use recording::exporter_tcx::tcx_string;
pub use recording::resample::merge_measurements;
pub use recording::session::RecordingSession;
pub use recording::store::MeasurementStore;
pub use recording::types::{Measurement, MeasurementsData, MetricKind};
pub use storage::profile::AthleteProfile;
