//! Live zone classification and time-in-zone accounting.

use serde::{Deserialize, Serialize};

use crate::metrics::zones::{Color, ZoneSet};

/// Classification result for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSample {
    /// 1-based zone number
    pub zone: u8,
    /// Zone name
    pub name: String,
    /// Position within the zone band, 0-100
    pub percent_in_zone: f64,
}

/// Accumulated dwell time for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTime {
    /// 1-based zone number
    pub zone: u8,
    /// Zone name
    pub name: String,
    /// Display color of the zone band
    pub color: Color,
    /// Milliseconds spent in this zone
    pub time_in_zone_ms: i64,
}

/// Snapshot of per-zone dwell times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    pub zones: Vec<ZoneTime>,
    pub total_time_ms: i64,
}

/// Classifies a live stream of samples into zones and integrates exposure
/// time per zone.
///
/// One independent instance per metric. The reference value (FTP or max HR)
/// normalizes samples into band fractions; without one, classification is
/// disabled and `update` is a no-op.
#[derive(Debug, Clone)]
pub struct ZoneTracker {
    zones: ZoneSet,
    reference: Option<f64>,
    current_index: Option<usize>,
    current_sample: Option<ZoneSample>,
    last_sample_ms: Option<i64>,
    dwell_ms: Vec<i64>,
}

impl ZoneTracker {
    /// Create a tracker over `zones`, normalized by `reference`.
    ///
    /// A missing, non-finite, or non-positive reference disables
    /// classification.
    pub fn new(zones: ZoneSet, reference: Option<f64>) -> Self {
        let dwell_ms = vec![0; zones.len()];
        Self {
            zones,
            reference: reference.filter(|r| r.is_finite() && *r > 0.0),
            current_index: None,
            current_sample: None,
            last_sample_ms: None,
            dwell_ms,
        }
    }

    /// Tracker over the Coggan power bands, referenced to FTP in watts.
    pub fn power(ftp: Option<f64>) -> Self {
        Self::new(ZoneSet::power_default(), ftp)
    }

    /// Tracker over the heart rate bands, referenced to max HR in BPM.
    pub fn heart_rate(max_hr: Option<f64>) -> Self {
        Self::new(ZoneSet::heart_rate_default(), max_hr)
    }

    /// The active reference value, if classification is enabled.
    pub fn reference(&self) -> Option<f64> {
        self.reference
    }

    /// The zone table this tracker classifies against.
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Replace the reference value and restart accumulation.
    ///
    /// Dwell times are not comparable across a reference change, so the
    /// distribution is zeroed along with the current-zone state.
    pub fn set_reference(&mut self, reference: Option<f64>) {
        self.reference = reference.filter(|r| r.is_finite() && *r > 0.0);
        tracing::debug!("Zone reference changed to {:?}", self.reference);
        self.reset();
    }

    /// Classify one sample and account dwell time since the previous one.
    ///
    /// Elapsed time is attributed to the zone that was active at the
    /// previous sample (the zone just left). Returns `None` without
    /// touching any state when no reference is set or the value is not
    /// finite.
    pub fn update(&mut self, value: f64, timestamp_ms: i64) -> Option<ZoneSample> {
        let reference = self.reference?;
        if !value.is_finite() || self.zones.is_empty() {
            return None;
        }

        let fraction = value / reference;
        let index = self.zones.classify(fraction);

        if let (Some(last_ms), Some(previous_zone)) = (self.last_sample_ms, self.current_index) {
            let delta = timestamp_ms - last_ms;
            if delta > 0 {
                self.dwell_ms[previous_zone] += delta;
            }
        }

        let matched = &self.zones.bands()[index];
        let sample = ZoneSample {
            zone: matched.zone,
            name: matched.name.clone(),
            percent_in_zone: matched.percent_within(fraction),
        };

        self.current_index = Some(index);
        self.current_sample = Some(sample.clone());
        self.last_sample_ms = Some(timestamp_ms);

        Some(sample)
    }

    /// The most recent classification, if any sample has been seen.
    pub fn current_zone(&self) -> Option<&ZoneSample> {
        self.current_sample.as_ref()
    }

    /// Zero the accumulated dwell times and forget the current zone.
    ///
    /// The reference value survives; use `set_reference` to change it.
    pub fn reset(&mut self) {
        self.current_index = None;
        self.current_sample = None;
        self.last_sample_ms = None;
        self.dwell_ms.fill(0);
    }

    /// Snapshot of the per-zone dwell times plus their sum.
    pub fn distribution(&self) -> ZoneDistribution {
        let zones = self
            .zones
            .bands()
            .iter()
            .zip(&self.dwell_ms)
            .map(|(zone_band, ms)| ZoneTime {
                zone: zone_band.zone,
                name: zone_band.name.clone(),
                color: zone_band.color,
                time_in_zone_ms: *ms,
            })
            .collect();

        ZoneDistribution {
            zones,
            total_time_ms: self.dwell_ms.iter().sum(),
        }
    }
}
