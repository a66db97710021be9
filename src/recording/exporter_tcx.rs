//! TCX export of recorded workout data.
//!
//! Trackpoints come from the raw union of power, cadence and heart-rate
//! timestamps, not from the resampled grid, so the document reflects what
//! the sensors actually delivered.

use crate::recording::types::{iso_timestamp, ExportError, Measurement, MeasurementsData};
use chrono::{DateTime, TimeZone, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// TCX XML namespaces
const NS_TCX: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
const NS_TPX: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd";

/// Forward-only lookup for the measurement at an exact timestamp.
///
/// Queries must come in ascending timestamp order. When a sequence holds
/// several samples at the same timestamp the first one wins.
struct ExactCursor<'a> {
    samples: &'a [Measurement],
    index: usize,
}

impl<'a> ExactCursor<'a> {
    fn new(samples: &'a [Measurement]) -> Self {
        Self { samples, index: 0 }
    }

    fn value_at(&mut self, timestamp_ms: i64) -> Option<f64> {
        while self.index < self.samples.len()
            && self.samples[self.index].timestamp_ms < timestamp_ms
        {
            self.index += 1;
        }
        match self.samples.get(self.index) {
            Some(sample) if sample.timestamp_ms == timestamp_ms => Some(sample.value),
            _ => None,
        }
    }
}

struct MetricCursors<'a> {
    power: ExactCursor<'a>,
    cadence: ExactCursor<'a>,
    heart_rate: ExactCursor<'a>,
}

/// Render the recorded workout as a Training Center Database document.
///
/// One `<Activity Sport="Biking">` with one `<Lap>` per span between lap
/// markers; the first lap starts at the earliest sample, each marker opens
/// the next. Returns an empty string when no power, cadence or heart-rate
/// measurement exists at all.
pub fn tcx_string(data: &MeasurementsData) -> String {
    match build_document(data) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::warn!("TCX generation failed: {}", e);
            String::new()
        }
    }
}

fn build_document(data: &MeasurementsData) -> Result<String, ExportError> {
    let union = timestamp_union(data);
    if union.is_empty() {
        return Ok(String::new());
    }

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    let mut root = BytesStart::new("TrainingCenterDatabase");
    root.push_attribute(("xmlns", NS_TCX));
    root.push_attribute(("xmlns:xsi", NS_XSI));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    writer
        .write_event(Event::Start(root))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::Start(BytesStart::new("Activities")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    let mut activity = BytesStart::new("Activity");
    activity.push_attribute(("Sport", "Biking"));
    writer
        .write_event(Event::Start(activity))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    // Activity Id is the time of the first sample.
    write_element(&mut writer, "Id", &iso_timestamp(union[0]))?;

    let mut cursors = MetricCursors {
        power: ExactCursor::new(&data.power),
        cadence: ExactCursor::new(&data.cadence),
        heart_rate: ExactCursor::new(&data.heart_rate),
    };

    let mut lap_starts = vec![union[0]];
    lap_starts.extend(data.laps.iter().map(|marker| marker.timestamp_ms));

    for (index, &start_ms) in lap_starts.iter().enumerate() {
        let end_ms = lap_starts.get(index + 1).copied().unwrap_or(i64::MAX);
        write_lap(&mut writer, data, &union, start_ms, end_ms, &mut cursors)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Activity")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new("Activities")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new("TrainingCenterDatabase")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).map_err(|e| ExportError::XmlError(e.to_string()))
}

/// Sorted, deduplicated union of power, cadence and heart-rate timestamps.
fn timestamp_union(data: &MeasurementsData) -> Vec<i64> {
    let mut union: Vec<i64> = data
        .power
        .iter()
        .chain(&data.cadence)
        .chain(&data.heart_rate)
        .map(|m| m.timestamp_ms)
        .collect();
    union.sort_unstable();
    union.dedup();
    union
}

/// Write one lap covering sample timestamps in `[start_ms, end_ms)`.
fn write_lap<W: std::io::Write>(
    writer: &mut Writer<W>,
    data: &MeasurementsData,
    union: &[i64],
    start_ms: i64,
    end_ms: i64,
    cursors: &mut MetricCursors<'_>,
) -> Result<(), ExportError> {
    let points: Vec<i64> = union
        .iter()
        .copied()
        .filter(|&t| t >= start_ms && t < end_ms)
        .collect();

    let mut lap = BytesStart::new("Lap");
    lap.push_attribute(("StartTime", iso_timestamp(start_ms).as_str()));
    writer
        .write_event(Event::Start(lap))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    // Whole seconds between the lap's first and last sample.
    let total_seconds = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (last - first) / 1000,
        _ => 0,
    };
    write_element(writer, "TotalTimeSeconds", &total_seconds.to_string())?;

    let lap_heart_rates: Vec<f64> = data
        .heart_rate
        .iter()
        .filter(|m| m.timestamp_ms >= start_ms && m.timestamp_ms < end_ms)
        .map(|m| m.value)
        .collect();

    if !lap_heart_rates.is_empty() {
        let average = lap_heart_rates.iter().sum::<f64>() / lap_heart_rates.len() as f64;
        let maximum = lap_heart_rates.iter().fold(f64::MIN, |a, &b| a.max(b));
        write_heart_rate_element(writer, "AverageHeartRateBpm", average.round() as i64)?;
        write_heart_rate_element(writer, "MaximumHeartRateBpm", maximum.round() as i64)?;
    }

    write_element(writer, "Intensity", "Active")?;
    write_element(writer, "TriggerMethod", "Manual")?;

    writer
        .write_event(Event::Start(BytesStart::new("Track")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    for &timestamp_ms in &points {
        write_trackpoint(writer, timestamp_ms, cursors)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Track")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new("Lap")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Write one trackpoint carrying the metrics measured at exactly this
/// timestamp.
fn write_trackpoint<W: std::io::Write>(
    writer: &mut Writer<W>,
    timestamp_ms: i64,
    cursors: &mut MetricCursors<'_>,
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new("Trackpoint")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    write_element(writer, "Time", &iso_timestamp(timestamp_ms))?;

    if let Some(heart_rate) = cursors.heart_rate.value_at(timestamp_ms) {
        write_heart_rate_element(writer, "HeartRateBpm", heart_rate.round() as i64)?;
    }

    if let Some(cadence) = cursors.cadence.value_at(timestamp_ms) {
        write_element(writer, "Cadence", &(cadence.round() as i64).to_string())?;
    }

    if let Some(power) = cursors.power.value_at(timestamp_ms) {
        writer
            .write_event(Event::Start(BytesStart::new("Extensions")))
            .map_err(|e| ExportError::XmlError(e.to_string()))?;

        let mut tpx = BytesStart::new("TPX");
        tpx.push_attribute(("xmlns", NS_TPX));
        writer
            .write_event(Event::Start(tpx))
            .map_err(|e| ExportError::XmlError(e.to_string()))?;

        write_element(writer, "Watts", &(power.round() as i64).to_string())?;

        writer
            .write_event(Event::End(BytesEnd::new("TPX")))
            .map_err(|e| ExportError::XmlError(e.to_string()))?;

        writer
            .write_event(Event::End(BytesEnd::new("Extensions")))
            .map_err(|e| ExportError::XmlError(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Trackpoint")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Write a simple element with text content.
fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Write a heart rate element with its Value sub-element.
fn write_heart_rate_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: i64,
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    write_element(writer, "Value", &value.to_string())?;

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Render the TCX document and write it to a file.
pub fn export_tcx_to_file(
    data: &MeasurementsData,
    path: &std::path::Path,
) -> Result<(), ExportError> {
    std::fs::write(path, tcx_string(data))?;
    Ok(())
}

/// Generate a default filename for a TCX export.
pub fn generate_tcx_filename(data: &MeasurementsData) -> String {
    let start_ms = data.time_bounds().map_or(0, |(start, _)| start);
    let timestamp = Utc
        .timestamp_millis_opt(start_ms)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
        .format("%Y%m%d_%H%M%S");
    format!("VeloLog_{}.tcx", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::types::LapMarker;

    fn create_test_data() -> MeasurementsData {
        let mut data = MeasurementsData::default();
        for second in 0..6 {
            let t = second * 1_000;
            data.power.push(Measurement::new(t, 200.0));
            data.cadence.push(Measurement::new(t, 85.0));
            data.heart_rate.push(Measurement::new(t, 140.0));
        }
        data
    }

    #[test]
    fn test_tcx_empty_data_is_empty_string() {
        let data = MeasurementsData::default();
        assert_eq!(tcx_string(&data), "");
    }

    #[test]
    fn test_tcx_without_track_metrics_is_empty_string() {
        let mut data = MeasurementsData::default();
        data.speed.push(Measurement::new(0, 30.0));
        data.altitude.push(Measurement::new(0, 520.0));

        assert_eq!(tcx_string(&data), "");
    }

    #[test]
    fn test_tcx_document_skeleton() {
        let xml = tcx_string(&create_test_data());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<TrainingCenterDatabase"));
        assert!(xml.contains("<Activity Sport=\"Biking\">"));
        assert!(xml.contains("</TrainingCenterDatabase>"));
    }

    #[test]
    fn test_tcx_id_is_first_sample_time() {
        let mut data = MeasurementsData::default();
        data.power.push(Measurement::new(5_000, 210.0));
        data.heart_rate.push(Measurement::new(3_000, 130.0));

        let xml = tcx_string(&data);
        assert!(xml.contains("<Id>1970-01-01T00:00:03.000Z</Id>"));
    }

    #[test]
    fn test_tcx_lap_marker_splits_laps() {
        let mut data = create_test_data();
        data.laps.push(LapMarker {
            timestamp_ms: 3_000,
            number: 1,
        });

        let xml = tcx_string(&data);

        assert_eq!(xml.matches("<Lap StartTime=").count(), 2);
        assert!(xml.contains("<Lap StartTime=\"1970-01-01T00:00:00.000Z\">"));
        assert!(xml.contains("<Lap StartTime=\"1970-01-01T00:00:03.000Z\">"));
    }

    #[test]
    fn test_tcx_lap_total_time_truncates_to_seconds() {
        let mut data = MeasurementsData::default();
        data.power.push(Measurement::new(0, 200.0));
        data.power.push(Measurement::new(2_700, 205.0));

        let xml = tcx_string(&data);
        assert!(xml.contains("<TotalTimeSeconds>2</TotalTimeSeconds>"));
    }

    #[test]
    fn test_tcx_trackpoints_follow_raw_timestamps() {
        let mut data = MeasurementsData::default();
        data.power.push(Measurement::new(0, 200.0));
        data.power.push(Measurement::new(2_500, 220.0));

        let xml = tcx_string(&data);

        assert_eq!(xml.matches("<Trackpoint>").count(), 2);
        assert!(xml.contains("<Time>1970-01-01T00:00:02.500Z</Time>"));
    }

    #[test]
    fn test_tcx_trackpoint_carries_only_measured_metrics() {
        let mut data = MeasurementsData::default();
        data.power.push(Measurement::new(0, 200.0));
        data.heart_rate.push(Measurement::new(0, 120.0));
        data.heart_rate.push(Measurement::new(1_000, 125.0));

        let xml = tcx_string(&data);

        assert_eq!(xml.matches("<Trackpoint>").count(), 2);
        assert_eq!(xml.matches("<Watts>").count(), 1);
        assert_eq!(xml.matches("<HeartRateBpm>").count(), 2);
        assert_eq!(xml.matches("<Cadence>").count(), 0);
    }

    #[test]
    fn test_tcx_heart_rate_uses_nested_value() {
        let xml = tcx_string(&create_test_data());

        assert!(xml.contains("<HeartRateBpm>"));
        assert!(xml.contains("<Value>140</Value>"));
    }

    #[test]
    fn test_tcx_power_extension_namespace_is_inline() {
        let xml = tcx_string(&create_test_data());

        assert!(xml.contains(
            "<TPX xmlns=\"http://www.garmin.com/xmlschemas/ActivityExtension/v2\">"
        ));
        assert!(xml.contains("<Watts>200</Watts>"));
    }

    #[test]
    fn test_tcx_lap_summary_fields() {
        let mut data = MeasurementsData::default();
        data.heart_rate.push(Measurement::new(0, 100.0));
        data.heart_rate.push(Measurement::new(1_000, 140.0));

        let xml = tcx_string(&data);

        assert!(xml.contains("<AverageHeartRateBpm>"));
        assert!(xml.contains("<Value>120</Value>"));
        assert!(xml.contains("<MaximumHeartRateBpm>"));
        assert!(xml.contains("<Value>140</Value>"));
        assert!(xml.contains("<Intensity>Active</Intensity>"));
        assert!(xml.contains("<TriggerMethod>Manual</TriggerMethod>"));
    }

    #[test]
    fn test_tcx_values_round_to_nearest_integer() {
        let mut data = MeasurementsData::default();
        data.power.push(Measurement::new(0, 199.6));
        data.cadence.push(Measurement::new(0, 84.4));

        let xml = tcx_string(&data);

        assert!(xml.contains("<Watts>200</Watts>"));
        assert!(xml.contains("<Cadence>84</Cadence>"));
    }

    #[test]
    fn test_generate_filename() {
        let filename = generate_tcx_filename(&create_test_data());

        assert!(filename.starts_with("VeloLog_"));
        assert!(filename.ends_with(".tcx"));
    }
}
