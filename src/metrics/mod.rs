//! Metrics module for training zones and time-in-zone tracking.

pub mod tracker;
pub mod zones;

pub use tracker::{ZoneDistribution, ZoneSample, ZoneTime, ZoneTracker};
pub use zones::{Color, ZoneBand, ZoneSet};
