//! Controller-generation strategies
//!
//! eDMA2 and eDMA3 expose the same per-channel controls through different
//! register layouts. The engine selects one [`ControllerOps`] from the SoC
//! variant at construction and never branches on the generation afterwards.

use super::RegisterAccess;
use super::edma::*;

/// Per-generation register sequences.
pub(crate) trait ControllerOps: Sync {
    /// Enable the hardware request line and error interrupt of `ch`
    fn enable_request(&self, regs: &dyn RegisterAccess, ch: usize);

    /// Disable the hardware request line and error interrupt of `ch`
    fn disable_request(&self, regs: &dyn RegisterAccess, ch: usize);

    /// Enable round-robin arbitration
    fn enable_arbitration(&self, regs: &dyn RegisterAccess);

    /// Offset of the live TCD register block of `ch`
    fn tcd_base(&self, ch: usize) -> usize;

    /// Bitmask of channels with a pending transfer-complete interrupt
    fn transfer_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> u32;

    /// Acknowledge the transfer-complete interrupt of `ch`
    fn ack_transfer(&self, regs: &dyn RegisterAccess, ch: usize);

    /// Bitmask of channels with a latched error, `None` when the controller
    /// reports nothing at all
    fn error_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> Option<u32>;

    /// Acknowledge the error of `ch`
    fn ack_error(&self, regs: &dyn RegisterAccess, ch: usize);

    /// Clear every pending transfer-complete interrupt
    fn clear_all_transfer(&self, regs: &dyn RegisterAccess, channels: usize);
}

/// Second-generation controller (Vybrid VF610, S32V234)
#[derive(Debug)]
pub(crate) struct Edma2Ops;

/// Third-generation controller (S32 Gen1)
#[derive(Debug)]
pub(crate) struct Edma3Ops;

impl ControllerOps for Edma2Ops {
    fn enable_request(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write8(edma_port_channel(ch), EDMA_SEEI);
        regs.write8(ch as u8, EDMA_SERQ);
    }

    fn disable_request(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write8(ch as u8, EDMA_CERQ);
        regs.write8(edma_port_channel(ch), EDMA_CEEI);
    }

    fn enable_arbitration(&self, regs: &dyn RegisterAccess) {
        regs.write32(EDMA_CR_ERGA | EDMA_CR_ERCA, EDMA_CR);
    }

    fn tcd_base(&self, ch: usize) -> usize {
        edma_tcd(ch)
    }

    fn transfer_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> u32 {
        regs.read32(EDMA_INTR) & channel_mask(channels)
    }

    fn ack_transfer(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write8(edma_port_channel(ch), EDMA_CINT);
    }

    fn error_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> Option<u32> {
        let err = regs.read32(EDMA_ERR) & channel_mask(channels);
        (err != 0).then_some(err)
    }

    fn ack_error(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write8(edma_port_channel(ch), EDMA_CERR);
    }

    fn clear_all_transfer(&self, regs: &dyn RegisterAccess, _channels: usize) {
        regs.write32(!0, EDMA_INTR);
    }
}

impl ControllerOps for Edma3Ops {
    fn enable_request(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write32(EDMA3_CHN_CSR_ERQ | EDMA3_CHN_CSR_EEI, edma3_ch_csr(ch));
    }

    fn disable_request(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write32(0, edma3_ch_csr(ch));
    }

    fn enable_arbitration(&self, regs: &dyn RegisterAccess) {
        regs.write32(EDMA3_MP_CSR_ERCA, EDMA3_MP_CSR);
    }

    fn tcd_base(&self, ch: usize) -> usize {
        edma3_tcd(ch)
    }

    fn transfer_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> u32 {
        (0..channels)
            .filter(|&ch| regs.read32(edma3_ch_int(ch)) & EDMA3_CHN_INT_INT != 0)
            .fold(0, |mask, ch| mask | (1u32 << ch))
    }

    fn ack_transfer(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write32(EDMA3_CHN_INT_INT, edma3_ch_int(ch));
    }

    fn error_pending(&self, regs: &dyn RegisterAccess, channels: usize) -> Option<u32> {
        if regs.read32(EDMA3_MP_ES) & EDMA3_MP_ES_VLD == 0 {
            return None;
        }
        Some(
            (0..channels)
                .filter(|&ch| regs.read32(edma3_ch_es(ch)) & EDMA3_CHN_ES_ERR != 0)
                .fold(0, |mask, ch| mask | (1u32 << ch)),
        )
    }

    fn ack_error(&self, regs: &dyn RegisterAccess, ch: usize) {
        regs.write32(EDMA3_CHN_ES_ERR, edma3_ch_es(ch));
    }

    fn clear_all_transfer(&self, regs: &dyn RegisterAccess, channels: usize) {
        for ch in 0..channels {
            regs.write32(!0, edma3_ch_int(ch));
        }
    }
}

/// Mask covering the low `channels` bits
#[inline(always)]
const fn channel_mask(channels: usize) -> u32 {
    if channels >= 32 {
        u32::MAX
    } else {
        (1 << channels) - 1
    }
}
