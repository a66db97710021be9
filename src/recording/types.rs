//! Core data types for workout measurement capture and export.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single timestamped sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Value in the metric's natural unit (watts, bpm, rpm, km/h, m)
    pub value: f64,
}

impl Measurement {
    /// Create a measurement at the given timestamp.
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Metric channels the store records, one ordered sequence each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Power in watts
    Power,
    /// Heart rate in BPM
    HeartRate,
    /// Cadence in RPM
    Cadence,
    /// Speed in km/h
    Speed,
    /// Cumulative distance in meters
    Distance,
    /// Altitude in meters
    Altitude,
}

impl MetricKind {
    /// All metric channels, in store field order.
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Power,
        MetricKind::HeartRate,
        MetricKind::Cadence,
        MetricKind::Speed,
        MetricKind::Distance,
        MetricKind::Altitude,
    ];

    /// Valid half-open value range `[min, max)` for this metric.
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            MetricKind::Power => (0.0, 3000.0),
            MetricKind::HeartRate => (0.0, 300.0),
            MetricKind::Cadence => (0.0, 300.0),
            MetricKind::Speed => (0.0, 150.0),
            MetricKind::Distance => (0.0, 1_000_000.0),
            MetricKind::Altitude => (-500.0, 9000.0),
        }
    }

    /// Whether `value` passes this metric's range check.
    ///
    /// Non-finite values never pass; the upper bound is exclusive.
    pub fn accepts(&self, value: f64) -> bool {
        let (min, max) = self.valid_range();
        value.is_finite() && value >= min && value < max
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::Power => write!(f, "power"),
            MetricKind::HeartRate => write!(f, "heartrate"),
            MetricKind::Cadence => write!(f, "cadence"),
            MetricKind::Speed => write!(f, "speed"),
            MetricKind::Distance => write!(f, "distance"),
            MetricKind::Altitude => write!(f, "altitude"),
        }
    }
}

impl std::str::FromStr for MetricKind {
    type Err = StoreError;

    /// Parse a metric tag from external input (CLI arguments, session files).
    ///
    /// An unknown tag is a caller contract violation, not bad sensor data,
    /// and is surfaced as an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power" => Ok(MetricKind::Power),
            "heartrate" | "heart_rate" | "hr" => Ok(MetricKind::HeartRate),
            "cadence" => Ok(MetricKind::Cadence),
            "speed" => Ok(MetricKind::Speed),
            "distance" => Ok(MetricKind::Distance),
            "altitude" => Ok(MetricKind::Altitude),
            _ => Err(StoreError::UnknownMetric(s.to_string())),
        }
    }
}

/// A GPS fix from the position provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Reported horizontal accuracy in meters
    pub accuracy: f64,
    /// Altitude in meters, if the fix carried one
    pub altitude: Option<f64>,
    /// Ground speed in m/s, if the fix carried one
    pub speed: Option<f64>,
    /// Heading in degrees, if the fix carried one
    pub heading: Option<f64>,
}

/// A lap boundary inserted during the workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapMarker {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// 1-based sequential lap number
    pub number: u32,
}

/// Every sequence captured during one recording session.
///
/// Sequences are append-only and timestamp-ordered per metric (producer
/// precondition); `clear` on the owning store empties all of them at once,
/// never a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementsData {
    pub power: Vec<Measurement>,
    pub heart_rate: Vec<Measurement>,
    pub cadence: Vec<Measurement>,
    pub speed: Vec<Measurement>,
    pub distance: Vec<Measurement>,
    pub altitude: Vec<Measurement>,
    pub gps: Vec<GpsPoint>,
    pub laps: Vec<LapMarker>,
}

impl MeasurementsData {
    /// The sequence recorded for `kind`.
    pub fn sequence(&self, kind: MetricKind) -> &[Measurement] {
        match kind {
            MetricKind::Power => &self.power,
            MetricKind::HeartRate => &self.heart_rate,
            MetricKind::Cadence => &self.cadence,
            MetricKind::Speed => &self.speed,
            MetricKind::Distance => &self.distance,
            MetricKind::Altitude => &self.altitude,
        }
    }

    pub(crate) fn sequence_mut(&mut self, kind: MetricKind) -> &mut Vec<Measurement> {
        match kind {
            MetricKind::Power => &mut self.power,
            MetricKind::HeartRate => &mut self.heart_rate,
            MetricKind::Cadence => &mut self.cadence,
            MetricKind::Speed => &mut self.speed,
            MetricKind::Distance => &mut self.distance,
            MetricKind::Altitude => &mut self.altitude,
        }
    }

    /// True when no metric sequence and no GPS fix has been recorded.
    ///
    /// Lap markers alone do not count as data.
    pub fn is_empty(&self) -> bool {
        MetricKind::ALL.iter().all(|kind| self.sequence(*kind).is_empty()) && self.gps.is_empty()
    }

    /// First and last observed timestamp across all non-empty sequences,
    /// GPS included. `None` when nothing has been recorded.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let mut start: Option<i64> = None;
        let mut end: Option<i64> = None;

        let mut observe = |first: Option<i64>, last: Option<i64>| {
            if let Some(first) = first {
                start = Some(start.map_or(first, |s: i64| s.min(first)));
            }
            if let Some(last) = last {
                end = Some(end.map_or(last, |e: i64| e.max(last)));
            }
        };

        for kind in MetricKind::ALL {
            let seq = self.sequence(kind);
            observe(
                seq.first().map(|m| m.timestamp_ms),
                seq.last().map(|m| m.timestamp_ms),
            );
        }
        observe(
            self.gps.first().map(|p| p.timestamp_ms),
            self.gps.last().map(|p| p.timestamp_ms),
        );

        match (start, end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// One tick of the merged 1-second timeline.
///
/// Derived on demand by the resampler; never persisted. A `None` field means
/// no real sample of that metric fell within the merge tolerance of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MergedDataPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub power: Option<f64>,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
    pub speed: Option<f64>,
    pub distance: Option<f64>,
    pub altitude: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Lifecycle status of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Not recording
    #[default]
    Idle,
    /// Actively recording
    Recording,
    /// Recording paused
    Paused,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "Idle"),
            SessionStatus::Recording => write!(f, "Recording"),
            SessionStatus::Paused => write!(f, "Paused"),
        }
    }
}

/// Errors from the measurement store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A metric tag from external input did not name a known channel
    #[error("Unknown metric type: {0}")]
    UnknownMetric(String),
}

/// Errors from session lifecycle misuse.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Already recording
    #[error("Recording already in progress")]
    AlreadyRecording,

    /// Not currently recording
    #[error("Not currently recording")]
    NotRecording,
}

/// Errors during export document generation or writing.
#[derive(Debug, Error)]
pub enum ExportError {
    /// XML generation error
    #[error("XML error: {0}")]
    XmlError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Format a millisecond timestamp as an ISO-8601 UTC string
/// (`2021-03-04T05:06:07.000Z` shape), the form shared by the CSV
/// `timestamp` column and every TCX time field.
pub fn iso_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
