//! Transfer descriptor sets

use heapless::Vec;

use super::pool::{PoolEntry, TcdPool};
use super::queue::Cookie;
use crate::driver::config::Direction;

/// One memory range of a scatter-gather request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SgEntry {
    /// Device-visible start address
    pub addr: u32,
    /// Length in bytes
    pub len: u32,
}

impl SgEntry {
    /// Create a range
    #[must_use]
    pub const fn new(addr: u32, len: u32) -> Self {
        Self { addr, len }
    }
}

/// A chain of TCDs built for one transfer request.
///
/// Owns its pool entries in chain order. Every entry is returned to the
/// channel pool when the set completes, fails, is cancelled or released.
#[derive(Debug)]
#[must_use = "a transfer set owns pool descriptors; submit or release it"]
pub struct TransferSet<const N: usize> {
    pub(crate) entries: Vec<PoolEntry, N>,
    direction: Direction,
    cyclic: bool,
    cyclic_len: u32,
    cookie: Option<Cookie>,
    channel: Option<usize>,
}

impl<const N: usize> TransferSet<N> {
    pub(crate) fn new(
        entries: Vec<PoolEntry, N>,
        direction: Direction,
        cyclic: bool,
        cyclic_len: u32,
    ) -> Self {
        Self {
            entries,
            direction,
            cyclic,
            cyclic_len,
            cookie: None,
            channel: None,
        }
    }

    /// Number of TCDs in the chain
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain is empty (never true for a built set)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pool entries in chain order
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    /// Direction the set was built for
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the chain is a closed ring
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Ring buffer length for cyclic sets, 0 otherwise
    pub fn cyclic_len(&self) -> u32 {
        self.cyclic_len
    }

    /// Cookie assigned at submission
    pub fn cookie(&self) -> Option<Cookie> {
        self.cookie
    }

    pub(crate) fn set_cookie(&mut self, cookie: Cookie) {
        self.cookie = Some(cookie);
    }

    /// Channel whose pool holds the entries
    pub fn channel(&self) -> Option<usize> {
        self.channel
    }

    pub(crate) fn set_channel(&mut self, ch: usize) {
        self.channel = Some(ch);
    }

    /// Return every entry to `pool`
    pub(crate) fn release_into(self, pool: &mut TcdPool<N>) {
        for entry in self.entries {
            pool.free(entry);
        }
    }
}
