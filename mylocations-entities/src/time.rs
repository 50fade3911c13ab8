use std::{fmt, ops::Sub};
use ::time::{format_description::FormatItem, macros::format_description, Duration, OffsetDateTime};

// Formats like "Oct 15, 2026, 3:04 PM"
const DATE_TIME_FORMAT: &[FormatItem] = format_description!(
    "[month repr:short] [day padding:none], [year], [hour repr:12 padding:none]:[minute] [period]"
);

// A timestamp in UTC with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        OffsetDateTime::now_utc().into()
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds * 1000)
    }

    pub const fn into_millis(self) -> i64 {
        self.0
    }

    pub const fn into_seconds(self) -> i64 {
        self.0 / 1000
    }

    pub fn to_offset_date_time(self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000_000).ok()
    }

    /// Human readable medium date with short time.
    pub fn to_date_time_label(self) -> String {
        self.to_offset_date_time()
            .and_then(|dt| dt.format(DATE_TIME_FORMAT).ok())
            .unwrap_or_default()
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(from: OffsetDateTime) -> Self {
        Self((from.unix_timestamp_nanos() / 1_000_000) as i64)
    }
}

impl From<i64> for Timestamp {
    fn from(from: i64) -> Self {
        Self(from)
    }
}

impl From<Timestamp> for i64 {
    fn from(from: Timestamp) -> Self {
        from.0
    }
}

/// Signed time span between two timestamps.
impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration::milliseconds(self.0 - rhs.0)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.whole_milliseconds() as i64)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.to_offset_date_time() {
            Some(dt) => write!(f, "{dt}"),
            None => write!(f, "{}ms", self.0),
        }
    }
}
