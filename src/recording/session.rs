//! Recording session lifecycle and live zone tracking.

use crate::metrics::tracker::{ZoneDistribution, ZoneSample, ZoneTracker};
use crate::recording::store::MeasurementStore;
use crate::recording::types::{
    GpsPoint, LapMarker, Measurement, MeasurementsData, MetricKind, SessionError, SessionStatus,
};
use crate::storage::profile::AthleteProfile;
use uuid::Uuid;

/// Records workout data and tracks live zone state.
pub struct RecordingSession {
    /// Session identity, regenerated on every start
    id: Uuid,
    /// Validated measurement storage
    store: MeasurementStore,
    /// Power zone tracker keyed on FTP
    power_zones: ZoneTracker,
    /// Heart rate zone tracker keyed on max HR
    hr_zones: ZoneTracker,
    /// Current lifecycle status
    status: SessionStatus,
    /// Number the next lap marker receives
    next_lap: u32,
}

impl RecordingSession {
    /// Create a new session keyed on the athlete's reference values.
    pub fn new(profile: &AthleteProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: MeasurementStore::default(),
            power_zones: ZoneTracker::power(profile.ftp),
            hr_zones: ZoneTracker::heart_rate(profile.max_hr),
            status: SessionStatus::Idle,
            next_lap: 1,
        }
    }

    /// Create a new session without reference values.
    ///
    /// Measurements are stored as usual; zone classification stays off
    /// until `set_ftp` or `set_max_hr` supplies a reference.
    pub fn with_defaults() -> Self {
        Self::new(&AthleteProfile::default())
    }

    /// Get the session identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start recording, discarding any previously recorded data.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Recording {
            return Err(SessionError::AlreadyRecording);
        }

        self.id = Uuid::new_v4();
        self.store.clear();
        self.power_zones.reset();
        self.hr_zones.reset();
        self.next_lap = 1;
        self.status = SessionStatus::Recording;

        tracing::info!("Started recording session {}", self.id);
        Ok(())
    }

    /// Pause recording.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Recording {
            return Err(SessionError::NotRecording);
        }

        self.status = SessionStatus::Paused;
        tracing::info!("Paused recording");
        Ok(())
    }

    /// Resume recording.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Paused {
            return Err(SessionError::NotRecording);
        }

        self.status = SessionStatus::Recording;
        tracing::info!("Resumed recording");
        Ok(())
    }

    /// Record a metric measurement.
    ///
    /// Out-of-range values are dropped by the store; the zone trackers
    /// only ever see values the store accepted.
    pub fn record(&mut self, kind: MetricKind, measurement: Measurement) -> Result<(), SessionError> {
        if self.status != SessionStatus::Recording {
            return Err(SessionError::NotRecording);
        }

        self.store.add(kind, measurement);

        if kind.accepts(measurement.value) {
            match kind {
                MetricKind::Power => {
                    self.power_zones
                        .update(measurement.value, measurement.timestamp_ms);
                }
                MetricKind::HeartRate => {
                    self.hr_zones
                        .update(measurement.value, measurement.timestamp_ms);
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Record a GPS fix.
    pub fn record_gps(&mut self, point: GpsPoint) -> Result<(), SessionError> {
        if self.status != SessionStatus::Recording {
            return Err(SessionError::NotRecording);
        }

        self.store.add_gps(point);
        Ok(())
    }

    /// Insert a lap marker at the given timestamp.
    ///
    /// Lap numbers are sequential from 1 within one recording.
    pub fn add_lap(&mut self, timestamp_ms: i64) -> Result<LapMarker, SessionError> {
        if self.status != SessionStatus::Recording {
            return Err(SessionError::NotRecording);
        }

        let marker = LapMarker {
            timestamp_ms,
            number: self.next_lap,
        };
        self.next_lap += 1;
        self.store.add_lap(marker);

        tracing::info!("Marked lap {} at {} ms", marker.number, marker.timestamp_ms);
        Ok(marker)
    }

    /// Update the FTP reference; restarts power zone accumulation.
    pub fn set_ftp(&mut self, ftp: Option<f64>) {
        self.power_zones.set_reference(ftp);
    }

    /// Update the max heart rate reference; restarts HR zone accumulation.
    pub fn set_max_hr(&mut self, max_hr: Option<f64>) {
        self.hr_zones.set_reference(max_hr);
    }

    /// Get the active FTP reference.
    pub fn ftp(&self) -> Option<f64> {
        self.power_zones.reference()
    }

    /// Get the active max heart rate reference.
    pub fn max_hr(&self) -> Option<f64> {
        self.hr_zones.reference()
    }

    /// Get the zone of the most recent power measurement.
    pub fn current_power_zone(&self) -> Option<&ZoneSample> {
        self.power_zones.current_zone()
    }

    /// Get the zone of the most recent heart rate measurement.
    pub fn current_hr_zone(&self) -> Option<&ZoneSample> {
        self.hr_zones.current_zone()
    }

    /// Get accumulated time per power zone.
    pub fn power_zone_distribution(&self) -> ZoneDistribution {
        self.power_zones.distribution()
    }

    /// Get accumulated time per heart rate zone.
    pub fn hr_zone_distribution(&self) -> ZoneDistribution {
        self.hr_zones.distribution()
    }

    /// Check whether any measurement or GPS fix has been recorded.
    pub fn has_data(&self) -> bool {
        self.store.has_data()
    }

    /// Get the recorded data.
    pub fn data(&self) -> &MeasurementsData {
        self.store.data()
    }

    /// Get an owned copy of the recorded data.
    pub fn snapshot(&self) -> MeasurementsData {
        self.store.snapshot()
    }

    /// Get the current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Wall-clock span of the recorded data in milliseconds.
    ///
    /// Zero when nothing has been recorded. Pauses are not subtracted;
    /// the span runs from first to last observed timestamp.
    pub fn elapsed_ms(&self) -> i64 {
        self.store
            .data()
            .time_bounds()
            .map_or(0, |(start, end)| end - start)
    }

    /// Discard all recorded data and return to idle.
    ///
    /// Reference values survive a reset.
    pub fn reset(&mut self) {
        self.store.clear();
        self.power_zones.reset();
        self.hr_zones.reset();
        self.next_lap = 1;
        self.status = SessionStatus::Idle;
        tracing::info!("Reset recording session");
    }
}
