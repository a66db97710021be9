//! Nearest-neighbor resampling of irregular sensor streams onto a common
//! 1-second timeline.

use super::types::{Measurement, MeasurementsData, MergedDataPoint};

/// Spacing of the merged timeline in milliseconds.
pub const MERGE_STEP_MS: i64 = 1000;

/// Maximum distance between a tick and a real sample for the sample to
/// count as present at that tick. The comparison is strict.
pub const MERGE_TOLERANCE_MS: i64 = 1000;

/// Forward-only cursor over one timestamp-ordered sequence.
///
/// Ticks must be queried in ascending order; the cursor never rewinds.
/// A fresh cursor is built per merge pass so the pass stays a pure
/// function of its inputs.
struct NearestCursor<'a> {
    samples: &'a [Measurement],
    index: usize,
}

impl<'a> NearestCursor<'a> {
    fn new(samples: &'a [Measurement]) -> Self {
        Self { samples, index: 0 }
    }

    /// Value of the sample nearest to `tick`, if one lies within
    /// `MERGE_TOLERANCE_MS`. Equidistant neighbors resolve to the earlier
    /// sample.
    fn value_at(&mut self, tick: i64) -> Option<f64> {
        while self.index < self.samples.len() && self.samples[self.index].timestamp_ms < tick {
            self.index += 1;
        }

        let after = self.samples.get(self.index);
        let before = match self.index {
            0 => None,
            i => self.samples.get(i - 1),
        };

        let candidate = match (before, after) {
            (Some(before), Some(after)) => {
                let before_distance = (tick - before.timestamp_ms).abs();
                let after_distance = (after.timestamp_ms - tick).abs();
                if before_distance <= after_distance {
                    before
                } else {
                    after
                }
            }
            (Some(before), None) => before,
            (None, Some(after)) => after,
            (None, None) => return None,
        };

        if (candidate.timestamp_ms - tick).abs() < MERGE_TOLERANCE_MS {
            Some(candidate.value)
        } else {
            None
        }
    }
}

/// Merge all recorded sequences onto a single 1-second grid.
///
/// The grid spans from the earliest to the latest timestamp observed across
/// every non-empty sequence, GPS included. Each tick carries, per metric,
/// the value of the nearest real sample within tolerance, or `None` when no
/// sample is close enough. GPS latitude and longitude are resampled as two
/// independent metrics. Output is recomputed from scratch on every call;
/// for fixed input it is fully deterministic.
pub fn merge_measurements(data: &MeasurementsData) -> Vec<MergedDataPoint> {
    let Some((start, end)) = data.time_bounds() else {
        return Vec::new();
    };

    let lat_samples: Vec<Measurement> = data
        .gps
        .iter()
        .map(|p| Measurement::new(p.timestamp_ms, p.lat))
        .collect();
    let lon_samples: Vec<Measurement> = data
        .gps
        .iter()
        .map(|p| Measurement::new(p.timestamp_ms, p.lon))
        .collect();

    let mut power = NearestCursor::new(&data.power);
    let mut heart_rate = NearestCursor::new(&data.heart_rate);
    let mut cadence = NearestCursor::new(&data.cadence);
    let mut speed = NearestCursor::new(&data.speed);
    let mut distance = NearestCursor::new(&data.distance);
    let mut altitude = NearestCursor::new(&data.altitude);
    let mut lat = NearestCursor::new(&lat_samples);
    let mut lon = NearestCursor::new(&lon_samples);

    let mut merged = Vec::with_capacity(((end - start) / MERGE_STEP_MS + 1) as usize);
    let mut tick = start;
    while tick <= end {
        merged.push(MergedDataPoint {
            timestamp_ms: tick,
            power: power.value_at(tick),
            heart_rate: heart_rate.value_at(tick),
            cadence: cadence.value_at(tick),
            speed: speed.value_at(tick),
            distance: distance.value_at(tick),
            altitude: altitude.value_at(tick),
            lat: lat.value_at(tick),
            lon: lon.value_at(tick),
        });
        tick += MERGE_STEP_MS;
    }

    merged
}
