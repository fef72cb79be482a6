//! Configuration types for the eDMA engine

use crate::driver::interrupt::{IrqKind, IrqLine};
use crate::internal::register::mux::{
    ChannelMapping, s32v234_channel_mapping, vf610_channel_mapping,
};
use crate::internal::register::ops::{ControllerOps, Edma2Ops, Edma3Ops};

/// Register-layout generation of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Generation {
    /// Global request/interrupt registers with byte-wide set/clear ports
    Edma2,
    /// One control page per channel
    Edma3,
}

/// SoC integration of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Vybrid VF610
    #[default]
    Vf610,
    /// S32V234
    S32v234,
    /// S32 Gen1 (S32G2/S32R45)
    S32Gen1,
}

const VF610_IRQS: [IrqLine; 2] = [
    IrqLine::new("edma-err", IrqKind::Combined),
    IrqLine::new("edma-tx", IrqKind::Transfer),
];

const S32_IRQS: [IrqLine; 3] = [
    IrqLine::new("edma-err", IrqKind::Combined),
    IrqLine::new("edma-tx_0-15", IrqKind::Transfer),
    IrqLine::new("edma-tx_16-31", IrqKind::Transfer),
];

impl Variant {
    /// Register-layout generation used by this SoC
    #[must_use]
    pub const fn generation(self) -> Generation {
        match self {
            Variant::Vf610 | Variant::S32v234 => Generation::Edma2,
            Variant::S32Gen1 => Generation::Edma3,
        }
    }

    /// Interrupt lines the integration must route to the engine.
    ///
    /// Each line's [`IrqKind`] selects the handler to call; see
    /// [`Edma::handle_irq`](crate::Edma::handle_irq).
    #[must_use]
    pub const fn irq_lines(self) -> &'static [IrqLine] {
        match self {
            Variant::Vf610 => &VF610_IRQS,
            Variant::S32v234 | Variant::S32Gen1 => &S32_IRQS,
        }
    }

    pub(crate) const fn ops(self) -> &'static dyn ControllerOps {
        match self.generation() {
            Generation::Edma2 => &Edma2Ops,
            Generation::Edma3 => &Edma3Ops,
        }
    }

    pub(crate) const fn mux_mapping(self) -> ChannelMapping {
        match self {
            Variant::Vf610 => vf610_channel_mapping,
            Variant::S32v234 | Variant::S32Gen1 => s32v234_channel_mapping,
        }
    }
}

/// Byte order of the controller's register block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endianness {
    /// Little-endian registers
    #[default]
    Little,
    /// Big-endian registers; sub-word registers sit at mirrored offsets
    Big,
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdmaConfig {
    /// SoC integration
    pub variant: Variant,
    /// Register byte order
    pub endianness: Endianness,
}

impl EdmaConfig {
    /// Create a new configuration with defaults (VF610, little-endian)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variant: Variant::Vf610,
            endianness: Endianness::Little,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the SoC variant
    #[must_use]
    pub const fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the register byte order
    #[must_use]
    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Select big-endian registers when `big` is set
    #[must_use]
    pub const fn with_big_endian(mut self, big: bool) -> Self {
        self.endianness = if big {
            Endianness::Big
        } else {
            Endianness::Little
        };
        self
    }
}

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Memory to memory
    MemToMem,
    /// Memory to peripheral
    #[default]
    MemToDev,
    /// Peripheral to memory
    DevToMem,
    /// Peripheral to peripheral
    DevToDev,
}

impl Direction {
    /// Whether this is one of the two peripheral directions the engine serves
    #[must_use]
    pub const fn is_slave(self) -> bool {
        matches!(self, Direction::MemToDev | Direction::DevToMem)
    }
}

/// Peripheral register access width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusWidth {
    /// 8-bit
    Bytes1 = 1,
    /// 16-bit
    Bytes2 = 2,
    /// 32-bit
    #[default]
    Bytes4 = 4,
    /// 64-bit
    Bytes8 = 8,
}

impl BusWidth {
    /// Width in bytes
    #[must_use]
    pub const fn bytes(self) -> u32 {
        self as u32
    }

    /// Parse a width in bytes
    #[must_use]
    pub const fn from_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            1 => Some(BusWidth::Bytes1),
            2 => Some(BusWidth::Bytes2),
            4 => Some(BusWidth::Bytes4),
            8 => Some(BusWidth::Bytes8),
            _ => None,
        }
    }

    /// SSIZE/DSIZE transfer size code
    #[must_use]
    pub const fn size_code(self) -> u16 {
        match self {
            BusWidth::Bytes1 => 0,
            BusWidth::Bytes2 => 1,
            BusWidth::Bytes4 => 2,
            BusWidth::Bytes8 => 3,
        }
    }
}

/// Peripheral side of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveConfig {
    /// Direction transfers on this channel run
    pub direction: Direction,
    /// Peripheral FIFO/register address
    pub dev_addr: u32,
    /// Peripheral access width
    pub addr_width: BusWidth,
    /// Elements moved per peripheral request
    pub burst: u32,
}

impl SlaveConfig {
    /// Create a configuration for `direction` with a 32-bit, single-element burst
    #[must_use]
    pub const fn new(direction: Direction, dev_addr: u32) -> Self {
        Self {
            direction,
            dev_addr,
            addr_width: BusWidth::Bytes4,
            burst: 1,
        }
    }

    /// Set the peripheral access width
    #[must_use]
    pub const fn with_addr_width(mut self, addr_width: BusWidth) -> Self {
        self.addr_width = addr_width;
        self
    }

    /// Set the burst length in elements
    #[must_use]
    pub const fn with_burst(mut self, burst: u32) -> Self {
        self.burst = burst;
        self
    }

    /// Bytes moved per minor loop
    #[must_use]
    pub const fn nbytes(&self) -> u32 {
        self.addr_width.bytes().saturating_mul(self.burst)
    }
}

/// Channel transfer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelStatus {
    /// No active transfer
    #[default]
    Idle,
    /// Hardware executing a transfer set
    Active,
    /// Request line disabled, active set retained
    Paused,
    /// Hardware error; blocks issue until terminated
    Error,
    /// Last one-shot set finished
    Complete,
}

/// Channel power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Normal operation
    #[default]
    Running,
    /// Suspended; issue is deferred
    Suspended,
}

// =============================================================================
// Unit Tests
// =============================================================================
