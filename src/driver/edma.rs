//! The eDMA engine.
//!
//! [`Edma`] owns the controller register block, the two DMAMUX blocks and
//! one [`Channel`] per hardware channel, each behind its own critical
//! section. It exposes the channel lifecycle:
//!
//! - Channel allocation and DMAMUX routing
//! - Slave configuration and descriptor preparation
//! - Submission, issue, pause/resume and terminate
//! - Status and residue queries
//! - Power suspend/resume
//!
//! For interrupt dispatch, see the [`interrupt`](super::interrupt) module.
//!
//! # Placement
//!
//! TCD chains link descriptors by their device address, and the descriptors
//! live inside the engine. Construct the engine in a `static` (or otherwise
//! pin it) before preparing any transfer; moving it afterwards invalidates
//! every prepared chain.

use embedded_hal::delay::DelayNs;

use super::channel::{Callback, Channel, ChannelEvent, ChannelHw, CookieState, TransferState};
use super::config::{ChannelStatus, Direction, EdmaConfig, PowerState, SlaveConfig, Variant};
use super::error::{ConfigError, DmaError, Result};
use crate::dma::{Cookie, SgEntry, TransferSet};
use crate::internal::constants::{
    DEFAULT_POOL_SIZE, DEFAULT_QUEUE_DEPTH, IDLE_POLL_INTERVAL_US, MAX_CHANNELS,
};
use crate::internal::register::mux::{DMAMUX_NR, MuxSlot};
use crate::internal::register::ops::ControllerOps;
use crate::internal::register::{EdmaRegs, MmioRegion, RegisterIo};
#[cfg(feature = "async")]
use crate::sync::AtomicWaker;
use crate::sync::CriticalSectionCell;

/// Freescale eDMA engine
///
/// # Type Parameters
/// * `R` - Register block access ([`MmioRegion`] on hardware)
/// * `CHANNELS` - Hardware channels (even, at most 32)
/// * `POOL` - TCDs per channel
/// * `QUEUE` - Pending sets per channel
///
/// # Example
/// ```ignore
/// static EDMA: EdmaDefault = Edma::new(
///     unsafe { MmioRegion::new(0x4001_8000) },
///     unsafe { [MmioRegion::new(0x4002_4000), MmioRegion::new(0x400A_1000)] },
///     EdmaConfig::new().with_variant(Variant::Vf610),
/// );
///
/// EDMA.init();
/// let ch = EDMA.request_channel(0, 12)?;
/// EDMA.configure(ch, SlaveConfig::new(Direction::DevToMem, 0x4003_8004))?;
/// let set = EDMA.prepare_scatter_gather(ch, &ranges, Direction::DevToMem)?;
/// let cookie = EDMA.submit(ch, set)?;
/// EDMA.issue_pending(ch)?;
/// ```
pub struct Edma<
    R: RegisterIo,
    const CHANNELS: usize,
    const POOL: usize = DEFAULT_POOL_SIZE,
    const QUEUE: usize = DEFAULT_QUEUE_DEPTH,
> {
    regs: EdmaRegs<R>,
    mux: [R; DMAMUX_NR],
    variant: Variant,
    ops: &'static dyn ControllerOps,
    channels: [CriticalSectionCell<Channel<POOL, QUEUE>>; CHANNELS],
    #[cfg(feature = "async")]
    wakers: [AtomicWaker; CHANNELS],
}

/// 32-channel memory-mapped engine with default pool and queue sizes
pub type EdmaDefault = Edma<MmioRegion, 32>;

impl<R: RegisterIo, const CHANNELS: usize, const POOL: usize, const QUEUE: usize>
    Edma<R, CHANNELS, POOL, QUEUE>
{
    /// Create an engine over a controller block and its DMAMUX blocks.
    ///
    /// Nothing is written to the hardware until [`init`](Self::init).
    pub const fn new(regs: R, mux: [R; DMAMUX_NR], config: EdmaConfig) -> Self {
        const {
            assert!(CHANNELS > 0 && CHANNELS <= MAX_CHANNELS);
            assert!(CHANNELS % DMAMUX_NR == 0);
        }
        Self {
            regs: EdmaRegs::new(regs, config.endianness),
            mux,
            variant: config.variant,
            ops: config.variant.ops(),
            channels: [const { CriticalSectionCell::new(Channel::new()) }; CHANNELS],
            #[cfg(feature = "async")]
            wakers: [const { AtomicWaker::new() }; CHANNELS],
        }
    }

    /// SoC variant the engine was built for
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of hardware channels
    pub const fn channel_count(&self) -> usize {
        CHANNELS
    }

    /// Bring the controller to a known state: every live TCD control word
    /// cleared, every mux slot disabled, pending completions dropped and
    /// round-robin arbitration enabled.
    pub fn init(&self) {
        for ch in 0..CHANNELS {
            self.hw(ch).clear_tcd_csr();
            self.mux_route(ch, None);
        }
        self.ops.clear_all_transfer(&self.regs, CHANNELS);
        self.ops.enable_arbitration(&self.regs);
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    pub(crate) fn hw(&self, ch: usize) -> ChannelHw<'_> {
        ChannelHw::new(&self.regs, self.ops, ch)
    }

    pub(crate) fn ops(&self) -> &'static dyn ControllerOps {
        self.ops
    }

    pub(crate) fn regs(&self) -> &EdmaRegs<R> {
        &self.regs
    }

    fn cell(&self, ch: usize) -> Result<&CriticalSectionCell<Channel<POOL, QUEUE>>> {
        self.channels.get(ch).ok_or(ConfigError::InvalidChannel.into())
    }

    /// Run `f` on channel `ch` inside its critical section
    pub(crate) fn with_channel<T>(
        &self,
        ch: usize,
        f: impl FnOnce(&mut Channel<POOL, QUEUE>, &ChannelHw<'_>) -> T,
    ) -> Result<T> {
        let hw = self.hw(ch);
        Ok(self.cell(ch)?.with(|channel| f(channel, &hw)))
    }

    fn mux_route(&self, ch: usize, source: Option<u32>) {
        MuxSlot::locate(ch, CHANNELS, self.variant.mux_mapping()).write(&self.mux, source);
    }

    /// Deliver `event` to the callback and any waiting future.
    pub(crate) fn notify(
        &self,
        ch: usize,
        event: Option<ChannelEvent>,
        callback: Option<Callback>,
    ) {
        let Some(event) = event else {
            return;
        };
        if let Some(callback) = callback {
            callback(ch, event);
        }
        self.wake(ch);
    }

    #[cfg(feature = "async")]
    pub(crate) fn wake(&self, ch: usize) {
        if let Some(waker) = self.wakers.get(ch) {
            waker.wake();
        }
    }

    #[cfg(not(feature = "async"))]
    #[inline(always)]
    pub(crate) fn wake(&self, _ch: usize) {}

    #[cfg(feature = "async")]
    pub(crate) fn waker(&self, ch: usize) -> Option<&AtomicWaker> {
        self.wakers.get(ch)
    }

    // =========================================================================
    // Channel allocation and routing
    // =========================================================================

    /// Allocate the first free channel served by DMAMUX block `mux_group`
    /// and route request `source` to it.
    ///
    /// # Errors
    ///
    /// `InvalidMuxGroup` for a group past the last DMAMUX block,
    /// `NoFreeChannel` when every channel of the group is taken.
    pub fn request_channel(&self, mux_group: usize, source: u32) -> Result<usize> {
        if mux_group >= DMAMUX_NR {
            return Err(ConfigError::InvalidMuxGroup.into());
        }
        let per_mux = CHANNELS / DMAMUX_NR;
        for ch in mux_group * per_mux..(mux_group + 1) * per_mux {
            let claimed = self.with_channel(ch, |channel, _| {
                if channel.is_allocated() {
                    return false;
                }
                channel.set_allocated(true);
                channel.set_slave_id(source);
                true
            })?;
            if claimed {
                self.mux_route(ch, Some(source));
                return Ok(ch);
            }
        }
        Err(ConfigError::NoFreeChannel.into())
    }

    /// Stop `ch`, drop all of its work and routing, and mark it free
    pub fn release_channel(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, hw| channel.reset(hw))?;
        self.mux_route(ch, None);
        self.wake(ch);
        Ok(())
    }

    /// Route DMAMUX request `source` to `ch`; source 0 leaves the slot disabled
    pub fn bind_peripheral(&self, ch: usize, source: u32) -> Result<()> {
        self.with_channel(ch, |channel, _| channel.set_slave_id(source))?;
        self.mux_route(ch, Some(source));
        Ok(())
    }

    /// Remove the DMAMUX routing of `ch`
    pub fn unbind(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, _| channel.set_slave_id(0))?;
        self.mux_route(ch, None);
        Ok(())
    }

    /// Install or clear the completion callback of `ch`
    pub fn set_callback(&self, ch: usize, callback: Option<Callback>) -> Result<()> {
        self.with_channel(ch, |channel, _| channel.set_callback(callback))
    }

    // =========================================================================
    // Configuration and preparation
    // =========================================================================

    /// Set the peripheral side of `ch`.
    ///
    /// # Errors
    ///
    /// `InvalidDirection` unless the direction is `MemToDev` or `DevToMem`.
    pub fn configure(&self, ch: usize, slave: SlaveConfig) -> Result<()> {
        self.with_channel(ch, |channel, _| channel.configure(slave))?
    }

    /// Build a one-shot chain from the channel's pool.
    ///
    /// See [`prepare_scatter_gather`](crate::dma::builder::prepare_scatter_gather)
    /// for the chain layout and failure modes; additionally `NotConfigured`
    /// before [`configure`](Self::configure).
    pub fn prepare_scatter_gather(
        &self,
        ch: usize,
        ranges: &[SgEntry],
        direction: Direction,
    ) -> Result<TransferSet<POOL>> {
        let mut set = self.with_channel(ch, |channel, _| {
            channel.prepare_scatter_gather(ranges, direction)
        })??;
        set.set_channel(ch);
        Ok(set)
    }

    /// Build a cyclic ring from the channel's pool.
    pub fn prepare_cyclic(
        &self,
        ch: usize,
        buf_addr: u32,
        buf_len: u32,
        period_len: u32,
        direction: Direction,
    ) -> Result<TransferSet<POOL>> {
        let mut set = self.with_channel(ch, |channel, _| {
            channel.prepare_cyclic(buf_addr, buf_len, period_len, direction)
        })??;
        set.set_channel(ch);
        Ok(set)
    }

    /// Queue a prepared set on the channel that built it.
    ///
    /// # Errors
    ///
    /// `QueueFull` when the pending queue has no room; the set's descriptors
    /// are returned to the pool.
    pub fn submit(&self, ch: usize, set: TransferSet<POOL>) -> Result<Cookie> {
        let set = self.check_owner(ch, set)?;
        let cell = self.cell(ch)?;
        cell.with(|channel| channel.submit(set))
    }

    /// Return a prepared, never submitted set to the pool of `ch`
    pub fn release(&self, ch: usize, set: TransferSet<POOL>) -> Result<()> {
        let set = self.check_owner(ch, set)?;
        let cell = self.cell(ch)?;
        cell.with(|channel| channel.release(set));
        Ok(())
    }

    /// Pass `set` through if it was built on `ch`.
    ///
    /// A set offered to another channel goes back to the pool it came from
    /// and the call fails with `InvalidChannel`.
    fn check_owner(&self, ch: usize, set: TransferSet<POOL>) -> Result<TransferSet<POOL>> {
        match set.channel() {
            Some(owner) if owner != ch => {
                #[cfg(feature = "defmt")]
                defmt::warn!("edma: set built on ch{} offered to ch{}", owner, ch);
                self.cell(owner)?.with(|channel| channel.release(set));
                Err(ConfigError::InvalidChannel.into())
            }
            _ => Ok(set),
        }
    }

    // =========================================================================
    // Transfer control
    // =========================================================================

    /// Make every submitted set eligible and arm the oldest one if the
    /// channel is not busy. Deferred while suspended or in `Error`.
    pub fn issue_pending(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, hw| channel.issue_pending(hw))
    }

    /// Stop the request line; the active set stays loaded
    pub fn pause(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, hw| channel.pause(hw))
    }

    /// Re-enable the request line of a paused channel
    pub fn resume(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, hw| channel.resume(hw))
    }

    /// Stop `ch` and discard its active and queued sets
    pub fn terminate(&self, ch: usize) -> Result<()> {
        self.with_channel(ch, |channel, hw| channel.terminate(hw))?;
        self.wake(ch);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current status of `ch`
    pub fn channel_status(&self, ch: usize) -> Result<ChannelStatus> {
        self.with_channel(ch, |channel, _| channel.status())
    }

    /// `Complete` once `cookie` has finished, otherwise the channel status
    pub fn status(&self, ch: usize, cookie: Cookie) -> Result<ChannelStatus> {
        Ok(self.tx_status(ch, cookie)?.status)
    }

    /// Status plus bytes remaining for `cookie`
    pub fn tx_status(&self, ch: usize, cookie: Cookie) -> Result<TransferState> {
        self.with_channel(ch, |channel, hw| channel.tx_status(hw, cookie))
    }

    /// Where `cookie` is in the channel's lifecycle
    pub fn cookie_state(&self, ch: usize, cookie: Cookie) -> Result<CookieState> {
        self.with_channel(ch, |channel, _| channel.cookie_state(cookie))
    }

    /// Power state of `ch`
    pub fn power_state(&self, ch: usize) -> Result<PowerState> {
        self.with_channel(ch, |channel, _| channel.power_state())
    }

    /// Unused TCDs in the pool of `ch`
    pub fn free_descriptors(&self, ch: usize) -> Result<usize> {
        self.with_channel(ch, |channel, _| channel.free_descriptors())
    }

    /// Poll until `ch` leaves `Active`.
    ///
    /// # Errors
    ///
    /// `HardwareError` if the channel ends up in `Error`, `Timeout` if it is
    /// still active after `timeout_us`.
    pub fn wait_idle<D: DelayNs>(&self, ch: usize, delay: &mut D, timeout_us: u32) -> Result<()> {
        let mut remaining = timeout_us;
        loop {
            match self.channel_status(ch)? {
                ChannelStatus::Error => return Err(DmaError::HardwareError.into()),
                ChannelStatus::Active => {}
                _ => return Ok(()),
            }
            if remaining == 0 {
                return Err(DmaError::Timeout.into());
            }
            let step = remaining.min(IDLE_POLL_INTERVAL_US);
            delay.delay_us(step);
            remaining -= step;
        }
    }

    // =========================================================================
    // Power management
    // =========================================================================

    /// Prepare for power-down.
    ///
    /// Channels still running are force-stopped and unrouted; every channel
    /// defers issue until [`resume_power`](Self::resume_power).
    pub fn suspend(&self) {
        for ch in 0..CHANNELS {
            let Ok(busy) = self.with_channel(ch, |channel, hw| channel.suspend(hw)) else {
                continue;
            };
            if busy {
                #[cfg(feature = "defmt")]
                defmt::warn!("edma: ch{} still busy at suspend", ch);
                self.mux_route(ch, None);
            }
        }
    }

    /// Restore the controller after power-up: clear live TCD control words,
    /// restore routing of bound channels and re-enable arbitration.
    pub fn resume_power(&self) {
        for ch in 0..CHANNELS {
            let Ok(source) = self.with_channel(ch, |channel, hw| {
                channel.resume_power(hw);
                channel.slave_id()
            }) else {
                continue;
            };
            if source != 0 {
                self.mux_route(ch, Some(source));
            }
        }
        self.ops.enable_arbitration(&self.regs);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::config::{BusWidth, Endianness};
    use crate::driver::error::Error;
    use crate::internal::register::edma::*;
    use crate::testing::{MockDelay, MockRegisters, RegWrite};

    pub(crate) struct Rig {
        pub regs: MockRegisters,
        pub mux: [MockRegisters; DMAMUX_NR],
        pub edma: Edma<MockRegisters, 32, 8, 4>,
    }

    pub(crate) fn rig(config: EdmaConfig) -> Rig {
        let regs = MockRegisters::new();
        let mux = [MockRegisters::new(), MockRegisters::new()];
        let edma = Edma::new(regs.clone(), [mux[0].clone(), mux[1].clone()], config);
        Rig { regs, mux, edma }
    }

    fn rx_slave() -> SlaveConfig {
        SlaveConfig::new(Direction::DevToMem, 0x4003_8004)
            .with_addr_width(BusWidth::Bytes4)
            .with_burst(4)
    }

    #[test]
    fn init_clears_csr_mux_and_enables_arbitration() {
        let rig = rig(EdmaConfig::new());
        rig.edma.init();

        let writes = rig.regs.writes();
        for ch in 0..32 {
            assert!(writes.contains(&RegWrite::half(0, edma_tcd(ch) + TCD_CSR)));
        }
        assert!(writes.contains(&RegWrite::word(!0, EDMA_INTR)));
        assert_eq!(
            writes.last(),
            Some(&RegWrite::word(EDMA_CR_ERGA | EDMA_CR_ERCA, EDMA_CR))
        );
        assert_eq!(rig.mux[0].writes().len(), 16);
        assert_eq!(rig.mux[1].writes().len(), 16);
    }

    #[test]
    fn request_channel_picks_first_free_in_group() {
        let rig = rig(EdmaConfig::new());

        assert_eq!(rig.edma.request_channel(0, 12), Ok(0));
        assert_eq!(rig.edma.request_channel(0, 13), Ok(1));
        assert_eq!(rig.edma.request_channel(1, 20), Ok(16));

        assert_eq!(rig.mux[0].get8(0), 0x80 | 12);
        assert_eq!(rig.mux[0].get8(1), 0x80 | 13);
        assert_eq!(rig.mux[1].get8(0), 0x80 | 20);
    }

    #[test]
    fn request_channel_uses_s32_mux_mapping() {
        let rig = rig(EdmaConfig::new().with_variant(Variant::S32v234));
        assert_eq!(rig.edma.request_channel(0, 5), Ok(0));
        assert_eq!(rig.mux[0].writes(), std::vec![RegWrite::byte(0x85, 3)]);
    }

    #[test]
    fn request_channel_exhausts_group() {
        let rig = rig(EdmaConfig::new());
        for expected in 0..16 {
            assert_eq!(rig.edma.request_channel(0, 1), Ok(expected));
        }
        assert_eq!(
            rig.edma.request_channel(0, 1),
            Err(ConfigError::NoFreeChannel.into())
        );
        assert_eq!(
            rig.edma.request_channel(2, 1),
            Err(ConfigError::InvalidMuxGroup.into())
        );
    }

    #[test]
    fn release_channel_frees_and_unroutes() {
        let rig = rig(EdmaConfig::new());
        let ch = rig.edma.request_channel(0, 12).unwrap();
        rig.edma.configure(ch, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(ch, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        rig.edma.submit(ch, set).unwrap();

        rig.edma.release_channel(ch).unwrap();

        assert_eq!(rig.mux[0].get8(0), 0);
        assert_eq!(rig.edma.free_descriptors(ch), Ok(8));
        assert_eq!(rig.edma.request_channel(0, 7), Ok(ch));
    }

    #[test]
    fn bind_and_unbind_program_mux() {
        let rig = rig(EdmaConfig::new());
        rig.edma.bind_peripheral(17, 0x45).unwrap();
        assert_eq!(rig.mux[1].get8(1), 0x80 | 0x05);
        rig.edma.unbind(17).unwrap();
        assert_eq!(rig.mux[1].get8(1), 0);
    }

    #[test]
    fn bind_to_source_zero_keeps_slot_off() {
        let rig = rig(EdmaConfig::new());
        rig.edma.bind_peripheral(17, 0).unwrap();
        assert_eq!(rig.mux[1].writes(), std::vec![RegWrite::byte(0, 1)]);
    }

    #[test]
    fn set_stays_with_the_channel_it_was_built_on() {
        let rig = rig(EdmaConfig::new());
        rig.edma.configure(1, rx_slave()).unwrap();
        rig.edma.configure(2, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(2, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        assert_eq!(set.channel(), Some(2));
        assert_eq!(rig.edma.free_descriptors(2), Ok(7));
        rig.regs.clear_writes();

        let err: Error = ConfigError::InvalidChannel.into();
        assert_eq!(rig.edma.submit(1, set), Err(err));
        assert_eq!(rig.edma.free_descriptors(2), Ok(8));
        assert_eq!(rig.edma.free_descriptors(1), Ok(8));
        rig.edma.issue_pending(1).unwrap();
        assert_eq!(rig.edma.channel_status(1), Ok(ChannelStatus::Idle));
        assert!(rig.regs.writes().is_empty());

        let set = rig
            .edma
            .prepare_cyclic(2, 0x2000_0000, 128, 64, Direction::DevToMem)
            .unwrap();
        assert_eq!(rig.edma.release(40, set), Err(err));
        assert_eq!(rig.edma.free_descriptors(2), Ok(8));
    }

    #[test]
    fn invalid_channel_is_rejected() {
        let rig = rig(EdmaConfig::new());
        let err: Error = ConfigError::InvalidChannel.into();
        assert_eq!(rig.edma.issue_pending(32), Err(err));
        assert_eq!(rig.edma.terminate(40), Err(err));
        assert_eq!(rig.edma.configure(32, rx_slave()), Err(err));
    }

    #[test]
    fn prepare_uses_configured_channel() {
        let rig = rig(EdmaConfig::new());
        rig.edma.configure(4, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_cyclic(4, 0x2000_0000, 256, 64, Direction::DevToMem)
            .unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(rig.edma.free_descriptors(4), Ok(4));

        rig.edma.release(4, set).unwrap();
        assert_eq!(rig.edma.free_descriptors(4), Ok(8));
    }

    #[test]
    fn big_endian_controller_swaps_register_writes() {
        let rig = rig(EdmaConfig::new().with_big_endian(true));
        rig.edma.configure(2, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(2, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        rig.edma.submit(2, set).unwrap();
        rig.edma.issue_pending(2).unwrap();

        let base = edma_tcd(2);
        assert_eq!(rig.regs.get_be32(base + TCD_DADDR), 0x2000_0000);
        assert_eq!(rig.regs.get_be32(base + TCD_NBYTES), 16);
        let writes = rig.regs.writes();
        assert_eq!(writes[0], RegWrite::half(0, (base + TCD_CSR) ^ 2));
        assert!(writes.contains(&RegWrite::byte(2, EDMA_SERQ ^ 3)));
    }

    #[test]
    fn tcd_memory_stays_little_endian_on_big_endian_controller() {
        let rig = rig(EdmaConfig::new().with_endianness(Endianness::Big));
        rig.edma.configure(0, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(0, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        let bytes = rig
            .edma
            .with_channel(0, |channel, _| channel.head_tcd_bytes(&set))
            .unwrap();
        assert_eq!(&bytes[0x10..0x14], &0x2000_0000u32.to_le_bytes());
        rig.edma.release(0, set).unwrap();
    }

    #[test]
    fn wait_idle_times_out_on_busy_channel() {
        let rig = rig(EdmaConfig::new());
        rig.edma.configure(1, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(1, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        rig.edma.submit(1, set).unwrap();
        rig.edma.issue_pending(1).unwrap();

        let mut delay = MockDelay::new();
        assert_eq!(
            rig.edma.wait_idle(1, &mut delay, 100),
            Err(DmaError::Timeout.into())
        );
        assert_eq!(delay.total_us(), 100);

        rig.edma.terminate(1).unwrap();
        assert_eq!(rig.edma.wait_idle(1, &mut delay, 100), Ok(()));
    }

    #[test]
    fn wait_idle_stops_at_exact_timeout() {
        let rig = rig(EdmaConfig::new());
        rig.edma.configure(1, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(1, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        rig.edma.submit(1, set).unwrap();
        rig.edma.issue_pending(1).unwrap();

        let mut delay = MockDelay::new();
        assert_eq!(
            rig.edma.wait_idle(1, &mut delay, 25),
            Err(DmaError::Timeout.into())
        );
        assert_eq!(delay.total_us(), 25);

        let mut delay = MockDelay::new();
        assert_eq!(
            rig.edma.wait_idle(1, &mut delay, 0),
            Err(DmaError::Timeout.into())
        );
        assert_eq!(delay.total_us(), 0);
    }

    #[test]
    fn suspend_stops_busy_channels_and_resume_restores() {
        let rig = rig(EdmaConfig::new());
        let ch = rig.edma.request_channel(0, 9).unwrap();
        rig.edma.configure(ch, rx_slave()).unwrap();
        let set = rig
            .edma
            .prepare_scatter_gather(ch, &[SgEntry::new(0x2000_0000, 64)], Direction::DevToMem)
            .unwrap();
        rig.edma.submit(ch, set).unwrap();
        rig.edma.issue_pending(ch).unwrap();

        rig.edma.suspend();
        assert_eq!(rig.mux[0].get8(0), 0);
        assert_eq!(rig.edma.power_state(ch), Ok(PowerState::Suspended));
        assert_eq!(rig.edma.power_state(5), Ok(PowerState::Suspended));

        rig.regs.clear_writes();
        rig.edma.resume_power();
        assert_eq!(rig.mux[0].get8(0), 0x80 | 9);
        assert_eq!(rig.edma.power_state(ch), Ok(PowerState::Running));
        assert_eq!(
            rig.regs.writes().last(),
            Some(&RegWrite::word(EDMA_CR_ERGA | EDMA_CR_ERCA, EDMA_CR))
        );
    }

    #[test]
    fn resume_power_uses_edma3_arbitration() {
        let rig = rig(EdmaConfig::new().with_variant(Variant::S32Gen1));
        rig.edma.resume_power();
        assert_eq!(
            rig.regs.writes().last(),
            Some(&RegWrite::word(EDMA3_MP_CSR_ERCA, EDMA3_MP_CSR))
        );
    }
}
