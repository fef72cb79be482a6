//! Descriptor model and job queue
//!
//! Everything between a caller's transfer request and the hardware lives
//! here, independent of any register layout:
//!
//! - [`tcd`]: the hardware-exact Transfer Control Descriptor
//! - [`pool`]: the per-channel, statically sized TCD pool
//! - [`builder`]: scatter-gather and cyclic chain construction
//! - [`queue`]: the submitted/issued FIFO and cookie tracking
//! - [`residue`]: bytes-remaining computation
//!
//! All memory is statically allocated using const generics.
//!
//! # Example
//!
//! ```ignore
//! use fsl_edma::dma::{SgEntry, TcdPool};
//! use fsl_edma::dma::builder::prepare_scatter_gather;
//!
//! let mut pool: TcdPool<8> = TcdPool::new();
//! let ranges = [SgEntry::new(0x2000_0000, 64), SgEntry::new(0x2000_0040, 32)];
//! let set = prepare_scatter_gather(&mut pool, &slave, &ranges, Direction::DevToMem)?;
//! ```

pub mod builder;
pub mod pool;
pub mod queue;
pub mod residue;
mod set;
pub mod tcd;

pub use pool::{PoolEntry, TcdPool};
pub use queue::{Cookie, CookieTracker, PendingQueue};
pub use residue::Progress;
pub use set::{SgEntry, TransferSet};
pub use tcd::{Tcd, TcdParams};

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile to prevent compiler optimization
/// from reordering or caching descriptor field accesses.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// Safety: VolatileCell is safe to share between threads because all access
// is through volatile operations on naturally aligned words.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }
}
