//! Core driver components for the Freescale eDMA controller.
//!
//! - [`config`] - SoC variants, slave configuration and state enums
//! - [`error`] - Error types and result aliases
//! - [`channel`] - Per-channel events and status reporting
//! - [`edma`] - The engine: channel lifecycle, routing, power management
//! - [`interrupt`] - Transfer-complete and error dispatch
//!
//! # Example
//!
//! ```ignore
//! use fsl_edma::driver::{Direction, EdmaConfig, SlaveConfig, Variant};
//!
//! let config = EdmaConfig::new().with_variant(Variant::S32v234);
//! let slave = SlaveConfig::new(Direction::MemToDev, 0x4002_C034);
//! ```

pub mod channel;
pub mod config;
pub mod edma;
pub mod error;
pub mod interrupt;

pub use channel::{Callback, ChannelEvent, CookieState, TransferState};
pub use config::{
    BusWidth, ChannelStatus, Direction, EdmaConfig, Endianness, Generation, PowerState,
    SlaveConfig, Variant,
};
pub use edma::{Edma, EdmaDefault};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, Result};
pub use interrupt::{InterruptStatus, IrqKind, IrqLine, IrqReturn};
