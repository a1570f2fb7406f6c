//! Request lifecycle bookkeeping
//!
//! Every async operation a slice starts goes through three phases:
//! pending (`begin`), then fulfilled or rejected. [`RequestTracker`] records
//! the phase plus the sequence number of the most recently issued request,
//! so a response that arrives after a newer request was issued can be
//! recognised as stale and dropped instead of overwriting fresher data.

use std::fmt;

/// Tri-state lifecycle flag of one request family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Settled,
}

/// Monotonically increasing request number, scoped to one tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Status and sequencing for one family of requests (list, detail, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTracker {
    status: RequestStatus,
    latest: RequestSeq,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending phase: issue the next sequence number and mark loading.
    pub fn begin(&mut self) -> RequestSeq {
        self.latest = self.latest.next();
        self.status = RequestStatus::Loading;
        self.latest
    }

    /// Whether a response tagged with `seq` belongs to the latest request.
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq == self.latest
    }

    /// Fulfilled/rejected phase for `seq`.
    ///
    /// Returns `false` and leaves the tracker untouched when `seq` is stale.
    pub fn settle(&mut self, seq: RequestSeq) -> bool {
        if !self.is_current(seq) {
            tracing::debug!(%seq, latest = %self.latest, "dropping stale response");
            return false;
        }
        self.status = RequestStatus::Settled;
        true
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn latest(&self) -> RequestSeq {
        self.latest
    }

    /// Back to idle. The sequence keeps counting so responses to requests
    /// issued before the reset are still recognised as stale.
    pub fn reset(&mut self) {
        self.status = RequestStatus::Idle;
    }
}

/// A status/error/data triple for one independently loaded resource.
///
/// Used by the dashboard where each statistic panel loads on its own: a
/// rejected cell keeps its previous `data` and only records the error.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCell<T> {
    tracker: RequestTracker,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for RequestCell<T> {
    fn default() -> Self {
        Self {
            tracker: RequestTracker::default(),
            data: None,
            error: None,
        }
    }
}

impl<T> RequestCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending: mark loading, clear the error, keep the data.
    pub fn begin(&mut self) -> RequestSeq {
        self.error = None;
        self.tracker.begin()
    }

    /// Fulfilled: replace the data. Returns `false` for stale responses.
    pub fn fulfill(&mut self, seq: RequestSeq, data: T) -> bool {
        if !self.tracker.settle(seq) {
            return false;
        }
        self.data = Some(data);
        self.error = None;
        true
    }

    /// Rejected: record the error, keep the last good data.
    pub fn reject(&mut self, seq: RequestSeq, error: impl Into<String>) -> bool {
        if !self.tracker.settle(seq) {
            return false;
        }
        self.error = Some(error.into());
        true
    }

    pub fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    pub fn status(&self) -> RequestStatus {
        self.tracker.status()
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_sequence_increases() {
        let mut tracker = RequestTracker::new();
        assert_eq!(tracker.status(), RequestStatus::Idle);

        let first = tracker.begin();
        let second = tracker.begin();

        assert!(second > first);
        assert!(tracker.is_loading());
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_stale_settle_is_ignored() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(!tracker.settle(first));
        assert!(tracker.is_loading());

        assert!(tracker.settle(second));
        assert_eq!(tracker.status(), RequestStatus::Settled);
    }

    #[test]
    fn test_reset_keeps_counting() {
        let mut tracker = RequestTracker::new();
        let before = tracker.begin();
        tracker.reset();

        assert_eq!(tracker.status(), RequestStatus::Idle);
        let after = tracker.begin();
        assert!(after > before);
    }

    #[test]
    fn test_cell_reject_keeps_data() {
        let mut cell = RequestCell::new();
        let seq = cell.begin();
        assert!(cell.fulfill(seq, 42));

        let seq = cell.begin();
        assert!(cell.is_loading());
        assert!(cell.reject(seq, "boom"));

        assert!(!cell.is_loading());
        assert_eq!(cell.data, Some(42));
        assert_eq!(cell.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_cell_begin_clears_error() {
        let mut cell: RequestCell<u8> = RequestCell::new();
        let seq = cell.begin();
        cell.reject(seq, "nope");

        cell.begin();
        assert!(cell.error.is_none());
    }

    #[test]
    fn test_cell_stale_fulfill_dropped() {
        let mut cell = RequestCell::new();
        let old = cell.begin();
        let new = cell.begin();

        assert!(cell.fulfill(new, "fresh"));
        assert!(!cell.fulfill(old, "stale"));
        assert_eq!(cell.data, Some("fresh"));
    }
}
