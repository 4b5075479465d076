//! Version stamps and change events

use serde::{Deserialize, Serialize};

/// Monotonic marker identifying a particular question-set revision.
///
/// Wall-clock derived (milliseconds since the Unix epoch), but never
/// trusted to be unique on its own: [`VersionStamp::next_after`] clamps
/// to at least one past the previous stamp, so successive replaces get
/// strictly increasing stamps even under clock skew or sub-millisecond
/// bursts. Consumers use stamps only for staleness detection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionStamp(u64);

impl VersionStamp {
    /// The stamp of a set that has never been committed.
    pub const ZERO: VersionStamp = VersionStamp(0);

    /// Current wall-clock time as a stamp.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis().max(0) as u64)
    }

    /// The stamp for a replace that follows `prev`: current wall-clock
    /// time, but always strictly greater than `prev`.
    pub fn next_after(prev: VersionStamp) -> Self {
        Self(Self::now().0.max(prev.0 + 1))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification that the authoritative set advanced to a new stamp.
///
/// Ephemeral — produced once per successful replace, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub version: VersionStamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_strictly_increases() {
        let first = VersionStamp::now();
        let second = VersionStamp::next_after(first);
        let third = VersionStamp::next_after(second);
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_next_after_outruns_future_clock() {
        // A stamp far in the future must still be exceeded.
        let future = VersionStamp::from_millis(u64::MAX - 1);
        assert!(VersionStamp::next_after(future) > future);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let stamp = VersionStamp::from_millis(1234);
        assert_eq!(serde_json::to_string(&stamp).unwrap(), "1234");
    }
}
