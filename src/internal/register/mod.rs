//! Memory-mapped register access for the eDMA controller
//!
//! Two layers live here:
//!
//! - [`RegisterIo`]: raw, native-order volatile accesses at an offset from the
//!   base of a register block. [`MmioRegion`] is the hardware implementation;
//!   tests substitute a recording mock.
//! - [`EdmaRegs`]: applies the controller's byte order on top of a
//!   [`RegisterIo`]. The eDMA block's endianness is independent of the CPU's,
//!   and on big-endian blocks 8-bit and 16-bit registers also sit at mirrored
//!   offsets within their 32-bit word.
//!
//! All register access is volatile to ensure proper hardware interaction.

pub mod edma;
pub mod mux;
pub mod ops;

use crate::driver::config::Endianness;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Write a 16-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and 2-byte aligned.
#[inline(always)]
pub unsafe fn write_reg16(addr: usize, value: u16) {
    unsafe { core::ptr::write_volatile(addr as *mut u16, value) }
}

/// Write an 8-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid.
#[inline(always)]
pub unsafe fn write_reg8(addr: usize, value: u8) {
    unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
}

// =============================================================================
// Raw I/O
// =============================================================================

/// Native-order volatile access to one register block.
///
/// Offsets are relative to the block base. Values pass through unchanged;
/// byte-order handling belongs to [`EdmaRegs`].
pub trait RegisterIo {
    /// Read a 32-bit word at `offset`
    fn read_u32(&self, offset: usize) -> u32;
    /// Write a byte at `offset`
    fn write_u8(&self, offset: usize, value: u8);
    /// Write a halfword at `offset`
    fn write_u16(&self, offset: usize, value: u16);
    /// Write a 32-bit word at `offset`
    fn write_u32(&self, offset: usize, value: u32);
}

/// A register block mapped at a fixed physical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioRegion {
    base: usize,
}

impl MmioRegion {
    /// Create a region rooted at `base`.
    ///
    /// # Safety
    /// `base` must be the address of a mapped register block that stays valid
    /// for the lifetime of the region, and no other code may drive the same
    /// block concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the block
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterIo for MmioRegion {
    #[inline(always)]
    fn read_u32(&self, offset: usize) -> u32 {
        // SAFETY: validity of base was promised in `new`
        unsafe { read_reg(self.base + offset) }
    }

    #[inline(always)]
    fn write_u8(&self, offset: usize, value: u8) {
        // SAFETY: validity of base was promised in `new`
        unsafe { write_reg8(self.base + offset, value) }
    }

    #[inline(always)]
    fn write_u16(&self, offset: usize, value: u16) {
        // SAFETY: validity of base was promised in `new`
        unsafe { write_reg16(self.base + offset, value) }
    }

    #[inline(always)]
    fn write_u32(&self, offset: usize, value: u32) {
        // SAFETY: validity of base was promised in `new`
        unsafe { write_reg(self.base + offset, value) }
    }
}

// =============================================================================
// Endian-aware access
// =============================================================================

/// Byte lane of an 8-bit register inside a big-endian 32-bit word
const BE_BYTE_LANE: usize = 0x3;

/// Halfword lane of a 16-bit register inside a big-endian 32-bit word
const BE_HALF_LANE: usize = 0x2;

/// Logical register operations, already corrected for controller byte order.
///
/// Object safe so controller-generation strategies can take `&dyn`.
pub(crate) trait RegisterAccess {
    /// Read a 32-bit register
    fn read32(&self, offset: usize) -> u32;
    /// Write an 8-bit register
    fn write8(&self, value: u8, offset: usize);
    /// Write a 16-bit register
    fn write16(&self, value: u16, offset: usize);
    /// Write a 32-bit register
    fn write32(&self, value: u32, offset: usize);
}

/// Register block of one eDMA controller with its configured byte order.
#[derive(Debug)]
pub struct EdmaRegs<R> {
    io: R,
    endianness: Endianness,
}

impl<R: RegisterIo> EdmaRegs<R> {
    /// Wrap a raw register block
    pub const fn new(io: R, endianness: Endianness) -> Self {
        Self { io, endianness }
    }

    fn is_big(&self) -> bool {
        self.endianness == Endianness::Big
    }
}

impl<R: RegisterIo> RegisterAccess for EdmaRegs<R> {
    fn read32(&self, offset: usize) -> u32 {
        let raw = self.io.read_u32(offset);
        if self.is_big() {
            u32::from_be(raw)
        } else {
            u32::from_le(raw)
        }
    }

    fn write8(&self, value: u8, offset: usize) {
        if self.is_big() {
            self.io.write_u8(offset ^ BE_BYTE_LANE, value);
        } else {
            self.io.write_u8(offset, value);
        }
    }

    fn write16(&self, value: u16, offset: usize) {
        if self.is_big() {
            self.io.write_u16(offset ^ BE_HALF_LANE, value.to_be());
        } else {
            self.io.write_u16(offset, value.to_le());
        }
    }

    fn write32(&self, value: u32, offset: usize) {
        if self.is_big() {
            self.io.write_u32(offset, value.to_be());
        } else {
            self.io.write_u32(offset, value.to_le());
        }
    }
}
