//! Validated append-only store for sensor measurement streams.

use super::types::{GpsPoint, LapMarker, Measurement, MeasurementsData, MetricKind};

/// Per-metric append-only store backing one recording session.
///
/// Sensor collaborators push values through `add`/`add_gps`; readers get
/// immutable access to the recorded sequences. Bad sensor data is dropped
/// with a diagnostic, never surfaced as an error.
#[derive(Debug, Default)]
pub struct MeasurementStore {
    data: MeasurementsData,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to the `kind` sequence if it passes the range check.
    ///
    /// Out-of-range and non-finite values are dropped with a log line.
    /// Timestamps must be non-decreasing per metric; a regression is logged
    /// but the entry is still appended in arrival order, and resampling
    /// output is undefined for unordered input.
    pub fn add(&mut self, kind: MetricKind, entry: Measurement) {
        if !kind.accepts(entry.value) {
            tracing::warn!(
                "Dropping out-of-range {} measurement: {}",
                kind,
                entry.value
            );
            return;
        }

        let sequence = self.data.sequence_mut(kind);
        if let Some(last) = sequence.last() {
            if entry.timestamp_ms < last.timestamp_ms {
                tracing::debug!(
                    "Timestamp regression in {} stream: {} after {}",
                    kind,
                    entry.timestamp_ms,
                    last.timestamp_ms
                );
            }
        }
        sequence.push(entry);
    }

    /// Append a GPS fix after a plausibility check on the coordinates.
    pub fn add_gps(&mut self, point: GpsPoint) {
        let plausible = point.lat.is_finite()
            && point.lon.is_finite()
            && point.lat.abs() <= 90.0
            && point.lon.abs() <= 180.0;
        if !plausible {
            tracing::warn!(
                "Dropping implausible GPS fix: lat={}, lon={}",
                point.lat,
                point.lon
            );
            return;
        }
        self.data.gps.push(point);
    }

    /// Append a lap marker. Numbering is the caller's responsibility.
    pub fn add_lap(&mut self, marker: LapMarker) {
        self.data.laps.push(marker);
    }

    /// Empty every sequence at once, lap markers included.
    pub fn clear(&mut self) {
        self.data = MeasurementsData::default();
    }

    /// True when at least one metric or GPS sample has been recorded.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// The measurements recorded for `kind`.
    pub fn measurements(&self, kind: MetricKind) -> &[Measurement] {
        self.data.sequence(kind)
    }

    /// All recorded GPS fixes in arrival order.
    pub fn gps(&self) -> &[GpsPoint] {
        &self.data.gps
    }

    /// All lap markers in insertion order.
    pub fn laps(&self) -> &[LapMarker] {
        &self.data.laps
    }

    /// Read access to everything recorded so far.
    pub fn data(&self) -> &MeasurementsData {
        &self.data
    }

    /// Structurally independent copy of the recorded data.
    pub fn snapshot(&self) -> MeasurementsData {
        self.data.clone()
    }
}
