//! Shared builders for integration tests.

use velolog::recording::{GpsPoint, Measurement, MetricKind, RecordingSession};
use velolog::storage::AthleteProfile;

pub fn test_profile() -> AthleteProfile {
    AthleteProfile {
        name: "Integration Rider".to_string(),
        ftp: Some(250.0),
        max_hr: Some(185.0),
        weight_kg: Some(70.0),
    }
}

/// Record a deterministic two-lap workout: 120 seconds of power, heart
/// rate, cadence and GPS at 1 Hz, with a lap marker at the minute.
///
/// Power holds 180 W for the first minute and 260 W for the second, so
/// zone assertions have exact expected values.
pub fn record_workout() -> RecordingSession {
    let mut session = RecordingSession::new(&test_profile());
    session.start().unwrap();

    for i in 0..120i64 {
        if i == 60 {
            session.add_lap(60_000).unwrap();
        }

        let ts = i * 1000;
        let watts = if i < 60 { 180.0 } else { 260.0 };

        session
            .record(MetricKind::Power, Measurement::new(ts, watts))
            .unwrap();
        session
            .record(
                MetricKind::HeartRate,
                Measurement::new(ts, 120.0 + (i % 40) as f64),
            )
            .unwrap();
        session
            .record(MetricKind::Cadence, Measurement::new(ts, 90.0))
            .unwrap();
        session
            .record_gps(GpsPoint {
                timestamp_ms: ts,
                lat: 48.137 + i as f64 * 1e-5,
                lon: 11.575,
                accuracy: 4.0,
                altitude: Some(520.0),
                speed: Some(8.3),
                heading: None,
            })
            .unwrap();
    }

    session
}
