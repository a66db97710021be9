//! Integration tests for exporting a recorded session.

use crate::common;
use velolog::recording::{
    csv_string, csv_string_with_laps, export_csv_to_file, export_tcx_to_file,
    generate_csv_filename, generate_tcx_filename, tcx_string,
};

#[test]
fn test_csv_with_laps_attributes_rows_to_laps() {
    let session = common::record_workout();
    let csv = csv_string_with_laps(session.data());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "timestamp,lap,power,cadence,heartrate,speed,distance,altitude,lat,lon"
    );
    assert_eq!(lines.len(), 121);

    // Lap column flips at the marker timestamp
    assert!(lines[1].starts_with("1970-01-01T00:00:00.000Z,1,180,90,120"));
    assert!(lines[60].starts_with("1970-01-01T00:00:59.000Z,1,180,90"));
    assert!(lines[61].starts_with("1970-01-01T00:01:00.000Z,2,260,90,140"));
}

#[test]
fn test_plain_csv_has_no_lap_column() {
    let session = common::record_workout();
    let csv = csv_string(session.data());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "timestamp,power,cadence,heartrate,speed,distance,altitude,lat,lon"
    );
    assert!(lines[1].starts_with("1970-01-01T00:00:00.000Z,180,90,120"));
}

#[test]
fn test_tcx_splits_laps_at_marker() {
    let session = common::record_workout();
    let tcx = tcx_string(session.data());

    assert!(tcx.contains("<Id>1970-01-01T00:00:00.000Z</Id>"));
    assert_eq!(tcx.matches("<Lap StartTime=").count(), 2);
    assert!(tcx.contains("<Lap StartTime=\"1970-01-01T00:01:00.000Z\">"));

    // 59 whole seconds on each side of the marker
    assert_eq!(tcx.matches("<TotalTimeSeconds>59</TotalTimeSeconds>").count(), 2);
    assert_eq!(tcx.matches("<Trackpoint>").count(), 120);
    assert_eq!(tcx.matches("<Watts>").count(), 120);
    assert_eq!(tcx.matches("<AverageHeartRateBpm>").count(), 2);
}

#[test]
fn test_file_export_matches_string_render() {
    let session = common::record_workout();
    let data = session.snapshot();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("workout.csv");
    export_csv_to_file(&data, &csv_path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        csv_string_with_laps(&data)
    );

    let tcx_path = dir.path().join("workout.tcx");
    export_tcx_to_file(&data, &tcx_path).unwrap();
    assert_eq!(std::fs::read_to_string(&tcx_path).unwrap(), tcx_string(&data));
}

#[test]
fn test_generated_filenames_use_session_start() {
    let session = common::record_workout();

    assert_eq!(
        generate_csv_filename(session.data()),
        "VeloLog_19700101_000000.csv"
    );
    assert_eq!(
        generate_tcx_filename(session.data()),
        "VeloLog_19700101_000000.tcx"
    );
}
