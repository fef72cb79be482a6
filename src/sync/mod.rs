//! Synchronization and async support
//!
//! - **Primitives** (`primitives`): ISR-safe building blocks
//!   - [`CriticalSectionCell`] - interior mutability under a critical section
//!   - [`AtomicWaker`] - waker slot filled by futures, drained by interrupts
//!
//! - **Async Support** (`asynch`, feature `async`)
//!   - [`CompletionFuture`] - resolves when a submitted transfer finishes
//!
//! # Example
//!
//! ```ignore
//! use fsl_edma::sync::CriticalSectionCell;
//!
//! static COUNT: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
//!
//! COUNT.with(|c| *c += 1);
//! ```

mod primitives;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::CriticalSectionCell;

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(feature = "async")]
pub use asynch::CompletionFuture;
