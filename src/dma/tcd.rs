//! Transfer Control Descriptor (TCD)
//!
//! One unit of eDMA work: addresses, offsets, minor-loop byte count, major
//! iteration counts, the scatter-gather link and control flags. The memory
//! image uses the same 32-byte layout as a channel's live TCD register block,
//! so the controller can load the next descriptor on its own when
//! scatter-gather is enabled.
//!
//! Multi-byte fields are stored little-endian regardless of the controller's
//! register byte order. Accessors convert on the way in and out.

use super::VolatileCell;
use crate::internal::constants::{MAX_ITERATIONS, TCD_SIZE};

/// ATTR field bits
pub mod attr {
    /// Destination transfer size field
    #[inline(always)]
    pub const fn dsize(code: u16) -> u16 {
        code & 0x0007
    }

    /// Destination address modulo field
    #[inline(always)]
    pub const fn dmod(bits: u16) -> u16 {
        (bits & 0x001F) << 3
    }

    /// Source transfer size field
    #[inline(always)]
    pub const fn ssize(code: u16) -> u16 {
        (code & 0x0007) << 8
    }

    /// Source address modulo field
    #[inline(always)]
    pub const fn smod(bits: u16) -> u16 {
        (bits & 0x001F) << 11
    }

    /// Size code for 32-byte bursts
    pub const SIZE_32BYTE: u16 = 5;
}

/// CSR field bits
pub mod csr {
    /// Channel start
    pub const START: u16 = 1 << 0;
    /// Interrupt when the major loop completes
    pub const INT_MAJOR: u16 = 1 << 1;
    /// Interrupt at half of the major loop
    pub const INT_HALF: u16 = 1 << 2;
    /// Clear the request enable when the major loop completes
    pub const D_REQ: u16 = 1 << 3;
    /// Load the next TCD from DLAST_SGA when the major loop completes
    pub const E_SG: u16 = 1 << 4;
    /// Channel-to-channel link on major loop completion
    pub const MAJOR_LINK: u16 = 1 << 5;
    /// Channel active (hardware-owned)
    pub const ACTIVE: u16 = 1 << 6;
    /// Major loop done (hardware-owned)
    pub const DONE: u16 = 1 << 7;
}

/// Field values for [`Tcd::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcdParams {
    /// Source address
    pub src: u32,
    /// Destination address
    pub dst: u32,
    /// Transfer attributes
    pub attr: u16,
    /// Signed source offset per element
    pub soff: u16,
    /// Bytes per minor loop
    pub nbytes: u32,
    /// Source adjustment after the major loop
    pub slast: u32,
    /// Major iteration count (masked to 15 bits)
    pub iter: u16,
    /// Signed destination offset per element
    pub doff: u16,
    /// Destination adjustment, or next TCD address with `enable_sg`
    pub dlast_sga: u32,
    /// Interrupt when the major loop completes
    pub major_int: bool,
    /// Drop the request enable when the major loop completes
    pub disable_req: bool,
    /// Chain to the TCD at `dlast_sga`
    pub enable_sg: bool,
}

/// Transfer Control Descriptor (32 bytes, 32-byte aligned).
#[repr(C, align(32))]
pub struct Tcd {
    saddr: VolatileCell<u32>,
    soff: VolatileCell<u16>,
    attr: VolatileCell<u16>,
    nbytes: VolatileCell<u32>,
    slast: VolatileCell<u32>,
    daddr: VolatileCell<u32>,
    doff: VolatileCell<u16>,
    citer: VolatileCell<u16>,
    dlast_sga: VolatileCell<u32>,
    csr: VolatileCell<u16>,
    biter: VolatileCell<u16>,
}

impl Tcd {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = TCD_SIZE;

    /// Create a new zeroed descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            saddr: VolatileCell::new(0),
            soff: VolatileCell::new(0),
            attr: VolatileCell::new(0),
            nbytes: VolatileCell::new(0),
            slast: VolatileCell::new(0),
            daddr: VolatileCell::new(0),
            doff: VolatileCell::new(0),
            citer: VolatileCell::new(0),
            dlast_sga: VolatileCell::new(0),
            csr: VolatileCell::new(0),
            biter: VolatileCell::new(0),
        }
    }

    /// Populate every field. CITER and BITER receive the same count.
    pub fn fill(&self, params: &TcdParams) {
        let iter = params.iter & MAX_ITERATIONS as u16;

        self.saddr.set(params.src.to_le());
        self.daddr.set(params.dst.to_le());
        self.attr.set(params.attr.to_le());
        self.soff.set(params.soff.to_le());
        self.nbytes.set(params.nbytes.to_le());
        self.slast.set(params.slast.to_le());
        self.citer.set(iter.to_le());
        self.doff.set(params.doff.to_le());
        self.dlast_sga.set(params.dlast_sga.to_le());
        self.biter.set(iter.to_le());

        let mut flags = 0;
        if params.major_int {
            flags |= csr::INT_MAJOR;
        }
        if params.disable_req {
            flags |= csr::D_REQ;
        }
        if params.enable_sg {
            flags |= csr::E_SG;
        }
        self.csr.set(flags.to_le());
    }

    /// Zero every field
    pub fn clear(&self) {
        self.fill(&TcdParams::default());
    }

    /// Source address
    #[inline(always)]
    pub fn saddr(&self) -> u32 {
        u32::from_le(self.saddr.get())
    }

    /// Source offset
    #[inline(always)]
    pub fn soff(&self) -> u16 {
        u16::from_le(self.soff.get())
    }

    /// Transfer attributes
    #[inline(always)]
    pub fn attr(&self) -> u16 {
        u16::from_le(self.attr.get())
    }

    /// Bytes per minor loop
    #[inline(always)]
    pub fn nbytes(&self) -> u32 {
        u32::from_le(self.nbytes.get())
    }

    /// Last source adjustment
    #[inline(always)]
    pub fn slast(&self) -> u32 {
        u32::from_le(self.slast.get())
    }

    /// Destination address
    #[inline(always)]
    pub fn daddr(&self) -> u32 {
        u32::from_le(self.daddr.get())
    }

    /// Destination offset
    #[inline(always)]
    pub fn doff(&self) -> u16 {
        u16::from_le(self.doff.get())
    }

    /// Current major iteration count
    #[inline(always)]
    pub fn citer(&self) -> u16 {
        u16::from_le(self.citer.get())
    }

    /// Last destination adjustment or scatter-gather link
    #[inline(always)]
    pub fn dlast_sga(&self) -> u32 {
        u32::from_le(self.dlast_sga.get())
    }

    /// Control and status flags
    #[inline(always)]
    pub fn csr(&self) -> u16 {
        u16::from_le(self.csr.get())
    }

    /// Beginning major iteration count
    #[inline(always)]
    pub fn biter(&self) -> u16 {
        u16::from_le(self.biter.get())
    }

    /// Whether the controller chains to the TCD at [`dlast_sga`](Self::dlast_sga)
    #[inline(always)]
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.csr() & csr::E_SG != 0
    }

    /// Bytes this descriptor moves over its whole major loop
    #[inline(always)]
    #[must_use]
    pub fn size(&self) -> usize {
        self.nbytes() as usize * self.biter() as usize
    }

    /// Copy of the in-memory image, exactly as the controller reads it
    #[must_use]
    pub fn to_bytes(&self) -> [u8; TCD_SIZE] {
        // SAFETY: Tcd is repr(C), exactly TCD_SIZE bytes with no padding, and
        // every field is plain integer storage.
        unsafe { core::ptr::read_volatile(self as *const Tcd as *const [u8; TCD_SIZE]) }
    }
}

impl Default for Tcd {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Tcd {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tcd")
            .field("saddr", &format_args!("{:#010x}", self.saddr()))
            .field("daddr", &format_args!("{:#010x}", self.daddr()))
            .field("nbytes", &self.nbytes())
            .field("citer", &self.citer())
            .field("biter", &self.biter())
            .field("dlast_sga", &format_args!("{:#010x}", self.dlast_sga()))
            .field("csr", &format_args!("{:#06x}", self.csr()))
            .finish_non_exhaustive()
    }
}
