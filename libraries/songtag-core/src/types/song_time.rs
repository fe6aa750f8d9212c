/// Song duration type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration of a song with millisecond precision
///
/// Stored as a 32 bit millisecond count, which covers songs of up to
/// roughly 49 days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongTime(u32);

impl SongTime {
    pub const ZERO: Self = Self(0);

    /// Create from whole seconds
    pub fn from_s(s: u32) -> Self {
        Self(s.saturating_mul(1000))
    }

    /// Create from fractional seconds
    pub fn from_s_f64(s: f64) -> Self {
        Self((s * 1000.0) as u32)
    }

    /// Create from milliseconds
    pub fn from_ms(ms: u32) -> Self {
        Self(ms)
    }

    pub fn to_ms(self) -> u32 {
        self.0
    }

    /// Convert to a count of `1 / base` second units, e.g. samples at a rate
    pub fn to_scale(self, base: u32) -> u64 {
        u64::from(self.0) * u64::from(base) / 1000
    }

    pub fn to_double_s(self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<Duration> for SongTime {
    fn from(d: Duration) -> Self {
        Self(u32::try_from(d.as_millis()).unwrap_or(u32::MAX))
    }
}

impl From<SongTime> for Duration {
    fn from(t: SongTime) -> Self {
        Duration::from_millis(u64::from(t.0))
    }
}
