use mylocations_entities::geo::Distance;
use std::time::Duration;

pub const DEFAULT_DESIRED_ACCURACY: Distance = Distance::from_meters(10.0);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_FIX_AGE: Duration = Duration::from_secs(5);
pub const DEFAULT_STABLE_DISTANCE: Distance = Distance::from_meters(1.0);
pub const DEFAULT_STABLE_INTERVAL: Duration = Duration::from_secs(10);

/// Thresholds that decide when a location is good enough.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Streaming stops as soon as a fix is at least this accurate.
    pub desired_accuracy: Distance,
    /// Give up when no fix arrived within this time.
    pub timeout: Duration,
    /// Fixes older than this at delivery are cached values and get dropped.
    pub max_fix_age: Duration,
    /// A fix that is not more accurate but this close to the current one...
    pub stable_distance: Distance,
    /// ...and arrives this much later stops streaming as well.
    pub stable_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            desired_accuracy: DEFAULT_DESIRED_ACCURACY,
            timeout: DEFAULT_TIMEOUT,
            max_fix_age: DEFAULT_MAX_FIX_AGE,
            stable_distance: DEFAULT_STABLE_DISTANCE,
            stable_interval: DEFAULT_STABLE_INTERVAL,
        }
    }
}
