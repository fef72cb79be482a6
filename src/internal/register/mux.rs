//! DMAMUX Channel Routing
//!
//! Each controller sits behind [`DMAMUX_NR`] mux blocks. Channels are split
//! evenly between them, and a channel's CHCFG byte routes one peripheral
//! request source onto it. Mux blocks are little-endian byte registers, so
//! writes bypass the controller's endian handling.

use super::RegisterIo;

/// Number of DMAMUX blocks per controller
pub const DMAMUX_NR: usize = 2;

/// Slot disabled
pub const CHCFG_DIS: u8 = 0x00;
/// Slot enable bit
pub const CHCFG_ENBL: u8 = 0x80;
/// Request source field mask
pub const CHCFG_SOURCE_MASK: u32 = 0x3F;

/// Map a channel's index within its mux group to the CHCFG byte offset.
pub type ChannelMapping = fn(u32) -> u32;

/// Identity mapping (Vybrid VF610)
pub fn vf610_channel_mapping(channel: u32) -> u32 {
    channel
}

/// Byte-reversed mapping within each 32-bit word (S32 parts)
pub fn s32v234_channel_mapping(channel: u32) -> u32 {
    4 * (channel / 4) + ((4 - channel % 4) - 1)
}

/// Location of one channel's CHCFG register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MuxSlot {
    /// Which mux block
    pub block: usize,
    /// Byte offset inside the block
    pub offset: usize,
}

impl MuxSlot {
    /// Locate channel `ch` among `channels` controller channels
    pub fn locate(ch: usize, channels: usize, mapping: ChannelMapping) -> Self {
        let per_mux = channels / DMAMUX_NR;
        Self {
            block: ch / per_mux,
            offset: mapping((ch % per_mux) as u32) as usize,
        }
    }

    /// Route request `source` to the slot, or disable it with `None`
    pub fn write<R: RegisterIo>(self, blocks: &[R; DMAMUX_NR], source: Option<u32>) {
        let value = match source.map(|source| source & CHCFG_SOURCE_MASK) {
            Some(slot) if slot != 0 => CHCFG_ENBL | slot as u8,
            _ => CHCFG_DIS,
        };
        blocks[self.block].write_u8(self.offset, value);
    }
}
