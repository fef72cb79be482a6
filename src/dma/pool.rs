//! Per-channel TCD pool
//!
//! A fixed array of 32-byte aligned descriptors with an in-use map. Slots
//! live inside the pool for the lifetime of the channel, so the address of a
//! slot is also the address the controller follows when it loads a linked
//! TCD. Allocation is bounded and never waits.

use super::tcd::Tcd;

/// Owning handle to one pool slot.
///
/// Pairs the slot index (the CPU-side handle) with the address the
/// controller uses for it. Not `Clone`: each entry goes back to its pool
/// exactly once through [`TcdPool::free`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoolEntry {
    index: u16,
    phys: u32,
}

impl PoolEntry {
    /// Slot index inside the pool
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Device-visible address of the slot
    #[inline(always)]
    pub fn phys(&self) -> u32 {
        self.phys
    }
}

/// Statically sized TCD pool.
pub struct TcdPool<const N: usize> {
    slots: [Tcd; N],
    in_use: [bool; N],
    free: usize,
}

impl<const N: usize> TcdPool<N> {
    /// Create an empty pool
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { Tcd::new() }; N],
            in_use: [false; N],
            free: N,
        }
    }

    /// Total number of slots
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of free slots
    #[inline(always)]
    pub const fn available(&self) -> usize {
        self.free
    }

    /// Take a free slot, cleared, or `None` when the pool is exhausted
    pub fn alloc(&mut self) -> Option<PoolEntry> {
        let index = self.in_use.iter().position(|used| !used)?;
        self.in_use[index] = true;
        self.free -= 1;
        self.slots[index].clear();
        Some(PoolEntry {
            index: index as u16,
            phys: self.phys_addr(index),
        })
    }

    /// Return a slot to the pool
    pub fn free(&mut self, entry: PoolEntry) {
        let index = entry.index();
        debug_assert!(self.in_use[index], "TCD slot {index} freed twice");
        if self.in_use[index] {
            self.in_use[index] = false;
            self.free += 1;
        }
    }

    /// Descriptor behind an entry
    #[inline(always)]
    pub fn tcd(&self, entry: &PoolEntry) -> &Tcd {
        &self.slots[entry.index()]
    }

    /// Device-visible address of slot `index`.
    ///
    /// The controller sees memory at the CPU address on the supported parts.
    #[inline(always)]
    fn phys_addr(&self, index: usize) -> u32 {
        &self.slots[index] as *const Tcd as usize as u32
    }
}

impl<const N: usize> Default for TcdPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dma::tcd::TcdParams;

    #[test]
    fn pool_starts_full() {
        let pool: TcdPool<4> = TcdPool::new();
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.available(), 4);
    }

    #[test]
    fn alloc_hands_out_distinct_aligned_slots() {
        let mut pool: TcdPool<3> = TcdPool::new();
        let a = pool.alloc().unwrap();
        let b = pool.alloc().unwrap();

        assert_ne!(a.index(), b.index());
        assert_eq!(a.phys() % 32, 0);
        assert_eq!(b.phys().wrapping_sub(a.phys()), 32);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn alloc_exhausts() {
        let mut pool: TcdPool<2> = TcdPool::new();
        let _a = pool.alloc().unwrap();
        let _b = pool.alloc().unwrap();
        assert!(pool.alloc().is_none());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn free_makes_slot_reusable() {
        let mut pool: TcdPool<1> = TcdPool::new();
        let a = pool.alloc().unwrap();
        let index = a.index();
        pool.free(a);
        assert_eq!(pool.available(), 1);

        let b = pool.alloc().unwrap();
        assert_eq!(b.index(), index);
    }

    #[test]
    fn alloc_returns_cleared_slot() {
        let mut pool: TcdPool<1> = TcdPool::new();
        let a = pool.alloc().unwrap();
        pool.tcd(&a).fill(&TcdParams {
            src: 0x1000,
            iter: 7,
            enable_sg: true,
            ..TcdParams::default()
        });
        pool.free(a);

        let b = pool.alloc().unwrap();
        assert_eq!(pool.tcd(&b).to_bytes(), [0u8; 32]);
    }

    #[test]
    fn phys_matches_slot_address() {
        let mut pool: TcdPool<2> = TcdPool::new();
        let a = pool.alloc().unwrap();
        let addr = pool.tcd(&a) as *const Tcd as usize as u32;
        assert_eq!(a.phys(), addr);
    }
}
