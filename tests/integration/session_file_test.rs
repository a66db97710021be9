//! Integration tests for session persistence and re-export.

use crate::common;
use velolog::recording::{csv_string_with_laps, tcx_string, MetricKind, RecordingSession};
use velolog::storage::{load_profile, load_session, save_profile, save_session};

#[test]
fn test_save_load_export_round_trip() {
    let session = common::record_workout();
    let data = session.snapshot();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workout.json");

    save_session(&data, &path).unwrap();
    let loaded = load_session(&path).unwrap();

    assert_eq!(loaded, data);

    // Exports are derived purely from the data, so a persistence round
    // trip must not change them
    assert_eq!(csv_string_with_laps(&loaded), csv_string_with_laps(&data));
    assert_eq!(tcx_string(&loaded), tcx_string(&data));
}

#[test]
fn test_replay_rebuilds_zone_distribution() {
    let recorded = common::record_workout();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workout.json");
    save_session(&recorded.snapshot(), &path).unwrap();

    let loaded = load_session(&path).unwrap();
    let mut replay = RecordingSession::new(&common::test_profile());
    replay.start().unwrap();
    for kind in MetricKind::ALL {
        for measurement in loaded.sequence(kind) {
            replay.record(kind, *measurement).unwrap();
        }
    }

    assert_eq!(
        replay.power_zone_distribution(),
        recorded.power_zone_distribution()
    );
    assert_eq!(
        replay.hr_zone_distribution(),
        recorded.hr_zone_distribution()
    );
}

#[test]
fn test_profile_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.toml");

    let profile = common::test_profile();
    save_profile(&profile, &path).unwrap();

    assert_eq!(load_profile(&path).unwrap(), profile);
}
