//! Integration tests for the full recording flow.

use crate::common;
use velolog::recording::{merge_measurements, Measurement, MetricKind, SessionStatus};

#[test]
fn test_two_lap_workout_flow() {
    let session = common::record_workout();

    assert_eq!(session.status(), SessionStatus::Recording);
    assert_eq!(session.elapsed_ms(), 119_000);

    let data = session.data();
    assert_eq!(data.power.len(), 120);
    assert_eq!(data.gps.len(), 120);
    assert_eq!(data.laps.len(), 1);
    assert_eq!(data.laps[0].number, 1);

    // 0..=119_000 at one row per second
    let merged = merge_measurements(data);
    assert_eq!(merged.len(), 120);
    assert_eq!(merged[60].power, Some(260.0));
}

#[test]
fn test_zone_distribution_after_workout() {
    let session = common::record_workout();

    // 180 W at FTP 250 is 72% (Endurance), 260 W is 104% (Threshold).
    // The minute boundary delta lands in Endurance because dwell is
    // attributed to the zone of the previous sample.
    let distribution = session.power_zone_distribution();
    assert_eq!(distribution.total_time_ms, 119_000);
    assert_eq!(distribution.zones[1].name, "Endurance");
    assert_eq!(distribution.zones[1].time_in_zone_ms, 60_000);
    assert_eq!(distribution.zones[3].name, "Threshold");
    assert_eq!(distribution.zones[3].time_in_zone_ms, 59_000);

    let hr = session.hr_zone_distribution();
    assert_eq!(hr.total_time_ms, 119_000);
}

#[test]
fn test_pause_blocks_recording_mid_workout() {
    let mut session = common::record_workout();

    session.pause().unwrap();
    assert!(session
        .record(MetricKind::Power, Measurement::new(120_000, 200.0))
        .is_err());

    session.resume().unwrap();
    session
        .record(MetricKind::Power, Measurement::new(120_000, 200.0))
        .unwrap();

    assert_eq!(session.data().power.len(), 121);
}

#[test]
fn test_out_of_range_samples_are_dropped_in_flow() {
    let mut session = common::record_workout();

    // Spike beyond the valid power range disappears silently
    session
        .record(MetricKind::Power, Measurement::new(120_000, 5000.0))
        .unwrap();

    assert_eq!(session.data().power.len(), 120);
    assert_eq!(session.current_power_zone().unwrap().name, "Threshold");
}

#[test]
fn test_restart_gives_clean_session() {
    let mut session = common::record_workout();
    session.pause().unwrap();
    session.start().unwrap();

    assert!(!session.has_data());
    assert_eq!(session.power_zone_distribution().total_time_ms, 0);
    assert_eq!(session.add_lap(0).unwrap().number, 1);
}
