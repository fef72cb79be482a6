//! Freescale eDMA Engine
//!
//! A `no_std`, `no_alloc` driver engine for the Freescale/NXP enhanced DMA
//! (eDMA) controller found on Vybrid VF610 and the S32 families.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Descriptor Layer** ([`dma`]): hardware-exact TCDs, per-channel pools,
//!    scatter-gather and cyclic chain builders, cookies and residue
//! 2. **Engine Layer** ([`driver`]): the per-channel state machine, DMAMUX
//!    routing, interrupt dispatch and power management
//! 3. **Register Layer** (internal): endian-aware register access and the
//!    eDMA2/eDMA3 register sequences
//!
//! ## Supported Controllers
//!
//! | Variant | Generation | DMAMUX mapping | Interrupt lines |
//! |---------|------------|----------------|-----------------|
//! | [`Variant::Vf610`] | eDMA2 | identity | error, transfer |
//! | [`Variant::S32v234`] | eDMA2 | swizzled per 4 | error, 2x transfer |
//! | [`Variant::S32Gen1`] | eDMA3 | swizzled per 4 | error, 2x transfer |
//!
//! The controller register block may be big-endian
//! ([`EdmaConfig::with_big_endian`]); TCDs in memory are always little-endian.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and logging
//! - `async`: Enable completion futures with per-channel wakers
//!
//! # Example
//!
//! ```ignore
//! use fsl_edma::{Direction, Edma, EdmaConfig, EdmaDefault, IrqKind, MmioRegion, SlaveConfig};
//! use fsl_edma::dma::SgEntry;
//!
//! static EDMA: EdmaDefault = Edma::new(
//!     unsafe { MmioRegion::new(0x4001_8000) },
//!     unsafe { [MmioRegion::new(0x4002_4000), MmioRegion::new(0x400A_1000)] },
//!     EdmaConfig::new(),
//! );
//!
//! EDMA.init();
//! let ch = EDMA.request_channel(0, 12)?;
//! EDMA.configure(ch, SlaveConfig::new(Direction::MemToDev, 0x4002_C034))?;
//!
//! let set = EDMA.prepare_scatter_gather(ch, &[SgEntry::new(buf, 512)], Direction::MemToDev)?;
//! let cookie = EDMA.submit(ch, set)?;
//! EDMA.issue_pending(ch)?;
//!
//! #[interrupt]
//! fn DMA0_DMA16() {
//!     EDMA.handle_irq(IrqKind::Transfer);
//! }
//! ```
//!
//! # Memory Requirements
//!
//! Each channel holds `POOL` TCDs of 32 bytes plus room for `QUEUE` pending
//! sets. With the defaults (16 TCDs, 4 sets) a 32-channel engine needs on
//! the order of 50 KB, and the TCD pools must be reachable by the controller.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod dma;
pub mod driver;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::channel::{Callback, ChannelEvent, CookieState, TransferState};
pub use driver::config::{
    BusWidth, ChannelStatus, Direction, EdmaConfig, Endianness, Generation, PowerState,
    SlaveConfig, Variant,
};
pub use driver::edma::{Edma, EdmaDefault};
pub use driver::error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, Result};
pub use driver::interrupt::{InterruptStatus, IrqKind, IrqLine, IrqReturn};
pub use internal::register::{MmioRegion, RegisterIo};

#[cfg(feature = "async")]
pub use sync::CompletionFuture;

/// Low-level register layout for advanced use.
///
/// Offsets are relative to the controller block base.
///
/// # Safety
///
/// Writing these registers behind the engine's back breaks its channel
/// bookkeeping. Use only for diagnostics or bring-up.
pub mod unsafe_registers {
    pub use crate::internal::register::edma;
    pub use crate::internal::register::{read_reg, write_reg, write_reg8, write_reg16};
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Timing
        DEFAULT_IDLE_TIMEOUT_US,
        // Sizing
        DEFAULT_POOL_SIZE,
        DEFAULT_QUEUE_DEPTH,
        IDLE_POLL_INTERVAL_US,
        MAX_CHANNELS,
        // Descriptors
        MAX_ITERATIONS,
        TCD_SIZE,
    };
}
