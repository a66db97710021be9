//! Recording module for workout data capture and export.

pub mod exporter_csv;
pub mod exporter_tcx;
pub mod resample;
pub mod session;
pub mod store;
pub mod types;

pub use exporter_csv::{csv_string, csv_string_with_laps, export_csv_to_file, generate_csv_filename};
pub use exporter_tcx::{export_tcx_to_file, generate_tcx_filename, tcx_string};
pub use resample::{merge_measurements, MERGE_STEP_MS, MERGE_TOLERANCE_MS};
pub use session::RecordingSession;
pub use store::MeasurementStore;
pub use types::{
    iso_timestamp, ExportError, GpsPoint, LapMarker, Measurement, MeasurementsData,
    MergedDataPoint, MetricKind, SessionError, SessionStatus, StoreError,
};
