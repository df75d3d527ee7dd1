use serde::{Deserialize, Serialize};

/// An inclusive range of unix-millis instants used for booking-ledger and
/// availability queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    pub fn duration(&self) -> i64 {
        self.end_ts - self.start_ts
    }

    /// Whether this span covers more than the given duration limit.
    pub fn greater_than(&self, duration_limit: i64) -> bool {
        self.duration() > duration_limit
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts <= self.end_ts
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn span_limits() {
        let span = TimeSpan::new(0, 1000 * 60 * 60 * 24);
        assert!(!span.greater_than(1000 * 60 * 60 * 24));
        assert!(span.greater_than(1000 * 60 * 60 * 23));
        assert!(span.contains(0));
        assert!(span.contains(500));
        assert!(!span.contains(-1));
    }
}
