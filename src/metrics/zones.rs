//! Power and heart rate zone definitions.
//!
//! Bands are expressed as fractions of a personal reference value (FTP for
//! power, max heart rate for HR) so one table serves every athlete. Each
//! tracker instance owns its own table; there is no process-wide zone
//! state.

use serde::{Deserialize, Serialize};

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex string form, e.g. `#ff8000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One contiguous zone band, bounded as fractions of the reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    /// 1-based zone number
    pub zone: u8,
    /// Zone name
    pub name: String,
    /// Lower bound as a fraction of the reference value
    pub min_fraction: f64,
    /// Upper bound as a fraction of the reference value. Classification
    /// treats the last band as open above; its `max_fraction` is the
    /// nominal span used only for percent-into-zone scaling.
    pub max_fraction: f64,
    /// Display color
    pub color: Color,
}

impl ZoneBand {
    /// Linear position of `fraction` within this band, expressed 0-100.
    ///
    /// Values outside the band clamp to the ends.
    pub fn percent_within(&self, fraction: f64) -> f64 {
        let span = self.max_fraction - self.min_fraction;
        if span <= 0.0 {
            return 0.0;
        }
        ((fraction - self.min_fraction) / span * 100.0).clamp(0.0, 100.0)
    }
}

/// An ordered, contiguous, exhaustive set of zone bands.
///
/// The first band is open below and the last is open above. Bands must be
/// sorted ascending with touching bounds; the defaults below satisfy this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    bands: Vec<ZoneBand>,
}

/// Default power zone colors (Coggan standard)
pub const POWER_ZONE_COLORS: [Color; 7] = [
    Color::new(128, 128, 128), // Z1: Gray (Active Recovery)
    Color::new(0, 128, 255),   // Z2: Blue (Endurance)
    Color::new(0, 200, 100),   // Z3: Green (Tempo)
    Color::new(255, 200, 0),   // Z4: Yellow (Threshold)
    Color::new(255, 128, 0),   // Z5: Orange (VO2max)
    Color::new(255, 50, 50),   // Z6: Red (Anaerobic)
    Color::new(180, 0, 180),   // Z7: Purple (Neuromuscular)
];

/// Default heart rate zone colors
pub const HR_ZONE_COLORS: [Color; 5] = [
    Color::new(128, 128, 128), // Z1: Gray (Recovery)
    Color::new(0, 128, 255),   // Z2: Blue (Aerobic)
    Color::new(0, 200, 100),   // Z3: Green (Tempo)
    Color::new(255, 200, 0),   // Z4: Yellow (Threshold)
    Color::new(255, 50, 50),   // Z5: Red (Anaerobic)
];

fn band(zone: u8, name: &str, min_fraction: f64, max_fraction: f64, color: Color) -> ZoneBand {
    ZoneBand {
        zone,
        name: name.to_string(),
        min_fraction,
        max_fraction,
        color,
    }
}

impl ZoneSet {
    /// Build a set from custom bands. Bands must be non-empty, ordered
    /// ascending, and contiguous.
    pub fn new(bands: Vec<ZoneBand>) -> Self {
        Self { bands }
    }

    /// Coggan 7-zone power bands as fractions of FTP.
    pub fn power_default() -> Self {
        Self::new(vec![
            band(1, "Active Recovery", 0.0, 0.55, POWER_ZONE_COLORS[0]),
            band(2, "Endurance", 0.55, 0.75, POWER_ZONE_COLORS[1]),
            band(3, "Tempo", 0.75, 0.90, POWER_ZONE_COLORS[2]),
            band(4, "Threshold", 0.90, 1.05, POWER_ZONE_COLORS[3]),
            band(5, "VO2max", 1.05, 1.20, POWER_ZONE_COLORS[4]),
            band(6, "Anaerobic", 1.20, 1.50, POWER_ZONE_COLORS[5]),
            band(7, "Neuromuscular", 1.50, 3.00, POWER_ZONE_COLORS[6]),
        ])
    }

    /// 5-zone heart rate bands as fractions of max HR.
    pub fn heart_rate_default() -> Self {
        Self::new(vec![
            band(1, "Recovery", 0.0, 0.60, HR_ZONE_COLORS[0]),
            band(2, "Aerobic", 0.60, 0.70, HR_ZONE_COLORS[1]),
            band(3, "Tempo", 0.70, 0.80, HR_ZONE_COLORS[2]),
            band(4, "Threshold", 0.80, 0.90, HR_ZONE_COLORS[3]),
            band(5, "Anaerobic", 0.90, 1.20, HR_ZONE_COLORS[4]),
        ])
    }

    /// All bands in ascending order.
    pub fn bands(&self) -> &[ZoneBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Index of the band containing `fraction`.
    ///
    /// Bands are evaluated in ascending order and the first match wins, so
    /// a fraction sitting exactly on a shared bound classifies into the
    /// higher band (whose inclusive lower bound it meets): exactly 90% of
    /// FTP is Threshold, not Tempo. The last band absorbs everything above
    /// it.
    pub fn classify(&self, fraction: f64) -> usize {
        for (index, zone_band) in self.bands.iter().enumerate() {
            if index + 1 == self.bands.len() || fraction < zone_band.max_fraction {
                return index;
            }
        }
        0
    }
}
