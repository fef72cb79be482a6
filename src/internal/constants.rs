//! Centralized Constants
//!
//! Single source of truth for sizing defaults and limits used throughout the
//! eDMA engine.
//!
//! # Note
//!
//! Hardware register offsets and bit definitions remain in their respective
//! modules (`register/edma.rs`, `register/mux.rs`, `dma/tcd.rs`).

// =============================================================================
// Sizing
// =============================================================================

/// Maximum channels one controller exposes (one status bit each)
pub const MAX_CHANNELS: usize = 32;

/// Default number of TCD slots in each channel's pool
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Default depth of each channel's submitted/issued queue
pub const DEFAULT_QUEUE_DEPTH: usize = 4;

// =============================================================================
// Descriptor Limits
// =============================================================================

/// Size and required alignment of one TCD in bytes
pub const TCD_SIZE: usize = 32;

/// Largest major iteration count (CITER/BITER are 15 bits wide)
pub const MAX_ITERATIONS: u32 = 0x7FFF;

// =============================================================================
// Cookies
// =============================================================================

/// First cookie handed out after reset or wraparound
pub const MIN_COOKIE: i32 = 1;

// =============================================================================
// Timing
// =============================================================================

/// Polling interval for `wait_idle` in microseconds
pub const IDLE_POLL_INTERVAL_US: u32 = 10;

/// Default `wait_idle` timeout in microseconds
pub const DEFAULT_IDLE_TIMEOUT_US: u32 = 10_000;
