//! Per-channel job queue and cookie tracking
//!
//! A bounded FIFO split into two regions: sets that have been *issued*
//! (eligible to run, oldest first) and sets that have only been *submitted*.
//! Issuing moves every submitted set into the issued region at once.
//!
//! Cookies identify submitted work. They count up from [`MIN_COOKIE`] and
//! wrap back to it, and completion checks tolerate the wrap.

use crate::internal::constants::MIN_COOKIE;

// =============================================================================
// Cookies
// =============================================================================

/// Identifier handed out when a transfer set is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cookie(i32);

impl Cookie {
    /// Raw cookie value
    #[inline(always)]
    pub const fn value(self) -> i32 {
        self.0
    }
}

/// Last assigned and last completed cookie of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieTracker {
    last_assigned: i32,
    last_completed: i32,
}

impl CookieTracker {
    /// Tracker with nothing assigned yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_assigned: MIN_COOKIE - 1,
            last_completed: MIN_COOKIE - 1,
        }
    }

    /// Hand out the next cookie
    pub fn assign(&mut self) -> Cookie {
        let mut next = self.last_assigned.wrapping_add(1);
        if next < MIN_COOKIE {
            next = MIN_COOKIE;
        }
        self.last_assigned = next;
        Cookie(next)
    }

    /// Record `cookie` as the latest completion
    pub fn complete(&mut self, cookie: Cookie) {
        self.last_completed = cookie.0;
    }

    /// Whether `cookie` has completed, allowing for wraparound
    #[must_use]
    pub fn is_complete(&self, cookie: Cookie) -> bool {
        let (done, used, c) = (self.last_completed, self.last_assigned, cookie.0);
        if done <= used {
            c <= done || c > used
        } else {
            c <= done && c > used
        }
    }

    /// Most recently assigned cookie value
    #[inline(always)]
    pub const fn last_assigned(&self) -> i32 {
        self.last_assigned
    }

    /// Most recently completed cookie value
    #[inline(always)]
    pub const fn last_completed(&self) -> i32 {
        self.last_completed
    }
}

impl Default for CookieTracker {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Pending Queue
// =============================================================================

/// Bounded FIFO of submitted and issued work.
pub struct PendingQueue<T, const Q: usize> {
    slots: [Option<T>; Q],
    /// Index of the oldest entry
    head: usize,
    /// Number of entries
    len: usize,
    /// Entries from `head` that have been issued
    issued: usize,
}

impl<T, const Q: usize> PendingQueue<T, Q> {
    /// Create an empty queue
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; Q],
            head: 0,
            len: 0,
            issued: 0,
        }
    }

    /// Capacity in entries
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        Q
    }

    /// Number of queued entries
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is queued
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether another push would fail
    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        self.len == Q
    }

    /// Entries eligible to run
    #[inline(always)]
    pub const fn issued_len(&self) -> usize {
        self.issued
    }

    /// Entries submitted but not yet issued
    #[inline(always)]
    pub const fn submitted_len(&self) -> usize {
        self.len - self.issued
    }

    /// Append a submitted entry, handing it back when the queue is full
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        let tail = (self.head + self.len) % Q;
        self.slots[tail] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Move every submitted entry into the issued region; returns how many
    /// entries are issued afterwards
    pub fn issue_all(&mut self) -> usize {
        self.issued = self.len;
        self.issued
    }

    /// Take the oldest issued entry
    pub fn pop_issued(&mut self) -> Option<T> {
        if self.issued == 0 {
            return None;
        }
        self.issued -= 1;
        self.pop_front()
    }

    /// Take the oldest entry regardless of region
    pub fn pop_any(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.issued = self.issued.saturating_sub(1);
        self.pop_front()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % Q].as_ref())
    }

    fn pop_front(&mut self) -> Option<T> {
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % Q;
        self.len -= 1;
        item
    }
}

impl<T, const Q: usize> Default for PendingQueue<T, Q> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn cookies_start_at_one_and_count_up() {
        let mut tracker = CookieTracker::new();
        assert_eq!(tracker.assign(), Cookie(1));
        assert_eq!(tracker.assign(), Cookie(2));
        assert_eq!(tracker.last_assigned(), 2);
    }

    #[test]
    fn cookies_wrap_back_to_minimum() {
        let mut tracker = CookieTracker {
            last_assigned: i32::MAX,
            last_completed: i32::MAX,
        };
        assert_eq!(tracker.assign(), Cookie(MIN_COOKIE));
    }

    #[test]
    fn completion_follows_last_completed() {
        let mut tracker = CookieTracker::new();
        let a = tracker.assign();
        let b = tracker.assign();
        assert!(!tracker.is_complete(a));
        assert!(!tracker.is_complete(b));

        tracker.complete(a);
        assert!(tracker.is_complete(a));
        assert!(!tracker.is_complete(b));

        tracker.complete(b);
        assert!(tracker.is_complete(b));
    }

    #[test]
    fn completion_tolerates_wraparound() {
        let mut tracker = CookieTracker {
            last_assigned: i32::MAX - 1,
            last_completed: i32::MAX - 2,
        };
        let old = Cookie(i32::MAX - 1);
        let a = tracker.assign();
        let b = tracker.assign();
        assert_eq!(a, Cookie(i32::MAX));
        assert_eq!(b, Cookie(MIN_COOKIE));

        tracker.complete(a);
        assert!(tracker.is_complete(old));
        assert!(tracker.is_complete(a));
        assert!(!tracker.is_complete(b));

        tracker.complete(b);
        assert!(tracker.is_complete(b));
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue: PendingQueue<u32, 4> = PendingQueue::new();
        queue.push(10).unwrap();
        queue.push(20).unwrap();
        queue.push(30).unwrap();
        queue.issue_all();

        assert_eq!(queue.pop_issued(), Some(10));
        assert_eq!(queue.pop_issued(), Some(20));
        assert_eq!(queue.pop_issued(), Some(30));
        assert_eq!(queue.pop_issued(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_rejects_when_full() {
        let mut queue: PendingQueue<u32, 2> = PendingQueue::new();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert!(queue.is_full());
        assert_eq!(queue.push(3), Err(3));
    }

    #[test]
    fn submitted_entries_wait_for_issue() {
        let mut queue: PendingQueue<u32, 4> = PendingQueue::new();
        queue.push(1).unwrap();
        assert_eq!(queue.submitted_len(), 1);
        assert_eq!(queue.pop_issued(), None);

        assert_eq!(queue.issue_all(), 1);
        queue.push(2).unwrap();
        assert_eq!(queue.issued_len(), 1);
        assert_eq!(queue.submitted_len(), 1);

        assert_eq!(queue.pop_issued(), Some(1));
        assert_eq!(queue.pop_issued(), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn queue_wraps_around_storage() {
        let mut queue: PendingQueue<u32, 3> = PendingQueue::new();
        for round in 0..5 {
            queue.push(round * 2).unwrap();
            queue.push(round * 2 + 1).unwrap();
            queue.issue_all();
            assert_eq!(queue.pop_issued(), Some(round * 2));
            assert_eq!(queue.pop_issued(), Some(round * 2 + 1));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_any_drains_both_regions() {
        let mut queue: PendingQueue<u32, 4> = PendingQueue::new();
        queue.push(1).unwrap();
        queue.issue_all();
        queue.push(2).unwrap();

        let drained: Vec<u32> = core::iter::from_fn(|| queue.pop_any()).collect();
        assert_eq!(drained, std::vec![1, 2]);
        assert_eq!(queue.issued_len(), 0);
    }

    #[test]
    fn iter_visits_oldest_first() {
        let mut queue: PendingQueue<u32, 3> = PendingQueue::new();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.issue_all();
        queue.pop_issued();
        queue.push(3).unwrap();
        queue.push(4).unwrap();

        let seen: Vec<u32> = queue.iter().copied().collect();
        assert_eq!(seen, std::vec![2, 3, 4]);
    }
}
