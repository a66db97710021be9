//! CSV export of the merged workout timeline.

use crate::recording::resample::merge_measurements;
use crate::recording::types::{iso_timestamp, ExportError, MeasurementsData, MergedDataPoint};
use chrono::{DateTime, TimeZone, Utc};

/// Render the merged 1-second timeline as CSV.
///
/// One row per merged data point; metrics with no sample near a tick stay
/// empty. Returns an empty string when nothing has been recorded.
pub fn csv_string(data: &MeasurementsData) -> String {
    render_csv(data, false)
}

/// Render the merged 1-second timeline as CSV with a lap column.
///
/// The lap for a row is one more than the highest lap marker number at or
/// before the row's timestamp; rows before the first marker are lap 1.
pub fn csv_string_with_laps(data: &MeasurementsData) -> String {
    render_csv(data, true)
}

fn render_csv(data: &MeasurementsData, with_laps: bool) -> String {
    let merged = merge_measurements(data);
    if merged.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    if with_laps {
        output.push_str("timestamp,lap,power,cadence,heartrate,speed,distance,altitude,lat,lon\n");
    } else {
        output.push_str("timestamp,power,cadence,heartrate,speed,distance,altitude,lat,lon\n");
    }

    let mut lap_index = 0;
    for point in &merged {
        if with_laps {
            while lap_index < data.laps.len()
                && data.laps[lap_index].timestamp_ms <= point.timestamp_ms
            {
                lap_index += 1;
            }
            let lap = match lap_index {
                0 => 1,
                i => data.laps[i - 1].number + 1,
            };
            output.push_str(&format!(
                "{},{},{}\n",
                iso_timestamp(point.timestamp_ms),
                lap,
                metric_fields(point)
            ));
        } else {
            output.push_str(&format!(
                "{},{}\n",
                iso_timestamp(point.timestamp_ms),
                metric_fields(point)
            ));
        }
    }

    output
}

fn metric_fields(point: &MergedDataPoint) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        integer_field(point.power),
        integer_field(point.cadence),
        integer_field(point.heart_rate),
        point.speed.map_or(String::new(), |v| format!("{:.1}", v)),
        integer_field(point.distance),
        integer_field(point.altitude),
        point.lat.map_or(String::new(), |v| format!("{:.6}", v)),
        point.lon.map_or(String::new(), |v| format!("{:.6}", v))
    )
}

fn integer_field(value: Option<f64>) -> String {
    value.map_or(String::new(), |v| format!("{}", v.round() as i64))
}

/// Render the lap-aware CSV and write it to a file.
pub fn export_csv_to_file(
    data: &MeasurementsData,
    path: &std::path::Path,
) -> Result<(), ExportError> {
    std::fs::write(path, csv_string_with_laps(data))?;
    Ok(())
}

/// Generate a default filename for a CSV export.
pub fn generate_csv_filename(data: &MeasurementsData) -> String {
    let start_ms = data.time_bounds().map_or(0, |(start, _)| start);
    let timestamp = Utc
        .timestamp_millis_opt(start_ms)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
        .format("%Y%m%d_%H%M%S");
    format!("VeloLog_{}.csv", timestamp)
}
