//! eDMA Controller Register Definitions
//!
//! Offsets are relative to the controller base. The second-generation block
//! (eDMA2) keeps global request/interrupt registers with byte-wide set/clear
//! ports; the third generation (eDMA3) moves control into one 4 KiB page per
//! channel.

// =============================================================================
// eDMA2 Register Offsets
// =============================================================================

/// Control Register offset
pub const EDMA_CR: usize = 0x00;
/// Error Status Register offset
pub const EDMA_ES: usize = 0x04;
/// Enable Request Register offset
pub const EDMA_ERQ: usize = 0x0C;
/// Enable Error Interrupt Register offset
pub const EDMA_EEI: usize = 0x14;
/// Clear Enable Error Interrupt port (8-bit)
pub const EDMA_CEEI: usize = 0x18;
/// Set Enable Error Interrupt port (8-bit)
pub const EDMA_SEEI: usize = 0x19;
/// Clear Enable Request port (8-bit)
pub const EDMA_CERQ: usize = 0x1A;
/// Set Enable Request port (8-bit)
pub const EDMA_SERQ: usize = 0x1B;
/// Clear DONE Status port (8-bit)
pub const EDMA_CDNE: usize = 0x1C;
/// Set START Bit port (8-bit)
pub const EDMA_SSRT: usize = 0x1D;
/// Clear Error port (8-bit)
pub const EDMA_CERR: usize = 0x1E;
/// Clear Interrupt Request port (8-bit)
pub const EDMA_CINT: usize = 0x1F;
/// Interrupt Request Register offset
pub const EDMA_INTR: usize = 0x24;
/// Error Register offset
pub const EDMA_ERR: usize = 0x2C;

/// Channel TCD block offset (eDMA2)
#[inline(always)]
pub const fn edma_tcd(ch: usize) -> usize {
    0x1000 + 32 * ch
}

// =============================================================================
// eDMA2 Control Register (CR) Bits
// =============================================================================

/// Enable Debug
pub const EDMA_CR_EDBG: u32 = 1 << 1;
/// Enable Round Robin Channel Arbitration
pub const EDMA_CR_ERCA: u32 = 1 << 2;
/// Enable Round Robin Group Arbitration
pub const EDMA_CR_ERGA: u32 = 1 << 3;
/// Halt On Error
pub const EDMA_CR_HOE: u32 = 1 << 4;
/// Halt DMA Operations
pub const EDMA_CR_HALT: u32 = 1 << 5;

/// Channel field of the byte-wide set/clear ports
#[inline(always)]
pub const fn edma_port_channel(ch: usize) -> u8 {
    (ch & 0x1F) as u8
}

// =============================================================================
// eDMA3 Register Offsets
// =============================================================================

/// Management Page Control Register offset
pub const EDMA3_MP_CSR: usize = 0x00;
/// Management Page Error Status Register offset
pub const EDMA3_MP_ES: usize = 0x04;

/// Channel Control and Status Register offset
#[inline(always)]
pub const fn edma3_ch_csr(ch: usize) -> usize {
    0x4000 + ch * 0x1000
}

/// Channel Error Status Register offset
#[inline(always)]
pub const fn edma3_ch_es(ch: usize) -> usize {
    0x4004 + ch * 0x1000
}

/// Channel Interrupt Status Register offset
#[inline(always)]
pub const fn edma3_ch_int(ch: usize) -> usize {
    0x4008 + ch * 0x1000
}

/// Channel TCD block offset (eDMA3)
#[inline(always)]
pub const fn edma3_tcd(ch: usize) -> usize {
    0x4020 + 0x1000 * ch
}

// =============================================================================
// eDMA3 Bits
// =============================================================================

/// Enable Round Robin Channel Arbitration
pub const EDMA3_MP_CSR_ERCA: u32 = 1 << 2;
/// Error status valid: at least one channel has a logged error
pub const EDMA3_MP_ES_VLD: u32 = 1 << 31;
/// Enable DMA request
pub const EDMA3_CHN_CSR_ERQ: u32 = 1 << 0;
/// Enable error interrupt
pub const EDMA3_CHN_CSR_EEI: u32 = 1 << 2;
/// Channel error flag
pub const EDMA3_CHN_ES_ERR: u32 = 1 << 31;
/// Channel interrupt request flag
pub const EDMA3_CHN_INT_INT: u32 = 1 << 0;

// =============================================================================
// TCD Field Offsets (within a channel's TCD block)
// =============================================================================

/// Source address (32-bit)
pub const TCD_SADDR: usize = 0x00;
/// Source offset (16-bit)
pub const TCD_SOFF: usize = 0x04;
/// Transfer attributes (16-bit)
pub const TCD_ATTR: usize = 0x06;
/// Minor loop byte count (32-bit)
pub const TCD_NBYTES: usize = 0x08;
/// Last source address adjustment (32-bit)
pub const TCD_SLAST: usize = 0x0C;
/// Destination address (32-bit)
pub const TCD_DADDR: usize = 0x10;
/// Destination offset (16-bit)
pub const TCD_DOFF: usize = 0x14;
/// Current major iteration count (16-bit)
pub const TCD_CITER: usize = 0x16;
/// Last destination adjustment or next TCD address (32-bit)
pub const TCD_DLAST_SGA: usize = 0x18;
/// Control and status (16-bit)
pub const TCD_CSR: usize = 0x1C;
/// Beginning major iteration count (16-bit)
pub const TCD_BITER: usize = 0x1E;
