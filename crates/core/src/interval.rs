#![forbid(unsafe_code)]

//! Half-open time ranges in unix-epoch milliseconds.

/// `[start_ms, end_ms)` with `start_ms < end_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    start_ms: i64,
    end_ms: i64,
}

impl TimeRange {
    /// Returns `None` when the range would be empty or inverted.
    pub fn new(start_ms: i64, end_ms: i64) -> Option<Self> {
        if end_ms <= start_ms {
            return None;
        }
        Some(Self { start_ms, end_ms })
    }

    pub fn start_ms(self) -> i64 {
        self.start_ms
    }

    pub fn end_ms(self) -> i64 {
        self.end_ms
    }

    /// Half-open overlap: sharing only a boundary point is not an overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Non-strict containment: equal boundaries still count as contained.
    pub fn contains(self, other: Self) -> bool {
        self.start_ms <= other.start_ms && other.end_ms <= self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i64, end: i64) -> TimeRange {
        TimeRange::new(start, end).expect("valid range")
    }

    #[test]
    fn rejects_empty_and_inverted() {
        assert!(TimeRange::new(10, 10).is_none());
        assert!(TimeRange::new(10, 5).is_none());
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        assert!(!range(0, 10).overlaps(range(10, 20)));
        assert!(!range(10, 20).overlaps(range(0, 10)));
        assert!(range(0, 11).overlaps(range(10, 20)));
    }

    #[test]
    fn containment_is_non_strict_on_boundaries() {
        let window = range(100, 200);
        assert!(window.contains(range(100, 200)));
        assert!(window.contains(range(120, 180)));
        assert!(!window.contains(range(99, 150)));
        assert!(!window.contains(range(150, 201)));
    }
}
