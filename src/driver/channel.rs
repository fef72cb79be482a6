//! Virtual channel state machine
//!
//! A [`Channel`] is the software side of one hardware channel: its slave
//! configuration, TCD pool, pending queue, the set the hardware is running
//! and the cookie bookkeeping. It never touches registers directly; every
//! transition that needs the hardware goes through a [`ChannelHw`] handle.
//!
//! # State Machine
//!
//! ```text
//!            issue_pending              completion (one-shot)
//!   Idle ─────────────────▶ Active ─────────────────────────▶ Complete
//!    ▲                       │  ▲                                 │
//!    │             pause     │  │ resume                          │ next issued set
//!    │                       ▼  │                                 ▼
//!    │                      Paused                              Active
//!    │
//!    └──── terminate (from any state)     error irq ──▶ Error (until terminate)
//! ```
//!
//! Cyclic sets stay `Active` through every period until terminated.

use crate::dma::builder::{prepare_cyclic, prepare_scatter_gather};
use crate::dma::residue::{Progress, residue};
use crate::dma::{Cookie, CookieTracker, PendingQueue, SgEntry, Tcd, TcdPool, TransferSet};
use crate::driver::config::{ChannelStatus, Direction, PowerState, SlaveConfig};
use crate::driver::error::{ConfigError, DmaError, Error, Result};
use crate::internal::register::RegisterAccess;
use crate::internal::register::edma::*;
use crate::internal::register::ops::ControllerOps;

// =============================================================================
// Events and Queries
// =============================================================================

/// Notification delivered to a channel callback after an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelEvent {
    /// A one-shot set finished
    Complete(Cookie),
    /// A cyclic set finished one period
    Period(Cookie),
    /// The hardware flagged an error; carries the cookie of the discarded
    /// set, if one was running
    Error(Option<Cookie>),
}

/// Per-channel completion callback.
///
/// Runs in interrupt context, outside the channel lock, with the channel
/// index and the event.
pub type Callback = fn(usize, ChannelEvent);

/// Where a submitted cookie currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CookieState {
    /// Finished
    Complete,
    /// Running on the hardware
    Active,
    /// Waiting in the pending queue
    Queued,
    /// Not known to the channel: discarded by terminate or error
    Unknown,
}

/// Status of a channel together with the bytes left for one cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferState {
    /// `Complete` for a finished cookie, otherwise the channel status
    pub status: ChannelStatus,
    /// Bytes still to move for the cookie
    pub residue: usize,
}

// =============================================================================
// Hardware Handle
// =============================================================================

/// Register access scoped to one channel.
pub(crate) struct ChannelHw<'a> {
    regs: &'a dyn RegisterAccess,
    ops: &'static dyn ControllerOps,
    index: usize,
}

impl<'a> ChannelHw<'a> {
    pub(crate) fn new(
        regs: &'a dyn RegisterAccess,
        ops: &'static dyn ControllerOps,
        index: usize,
    ) -> Self {
        Self { regs, ops, index }
    }

    pub(crate) fn enable_request(&self) {
        self.ops.enable_request(self.regs, self.index);
    }

    pub(crate) fn disable_request(&self) {
        self.ops.disable_request(self.regs, self.index);
    }

    /// Drop a latched transfer-complete flag
    pub(crate) fn ack_transfer(&self) {
        self.ops.ack_transfer(self.regs, self.index);
    }

    /// Copy `tcd` into the live TCD registers.
    ///
    /// CSR is zeroed before any other field and written last, so the channel
    /// never sees a half-loaded descriptor with START or E_SG set.
    pub(crate) fn load_tcd(&self, tcd: &Tcd) {
        let base = self.ops.tcd_base(self.index);
        let regs = self.regs;

        regs.write16(0, base + TCD_CSR);
        regs.write32(tcd.saddr(), base + TCD_SADDR);
        regs.write32(tcd.daddr(), base + TCD_DADDR);
        regs.write16(tcd.attr(), base + TCD_ATTR);
        regs.write16(tcd.soff(), base + TCD_SOFF);
        regs.write32(tcd.nbytes(), base + TCD_NBYTES);
        regs.write32(tcd.slast(), base + TCD_SLAST);
        regs.write16(tcd.citer(), base + TCD_CITER);
        regs.write16(tcd.biter(), base + TCD_BITER);
        regs.write16(tcd.doff(), base + TCD_DOFF);
        regs.write32(tcd.dlast_sga(), base + TCD_DLAST_SGA);
        regs.write16(tcd.csr(), base + TCD_CSR);
    }

    /// Zero the live CSR (no start, no link, no interrupts)
    pub(crate) fn clear_tcd_csr(&self) {
        self.regs.write16(0, self.ops.tcd_base(self.index) + TCD_CSR);
    }

    /// Memory-side address the hardware is currently at
    pub(crate) fn current_addr(&self, direction: Direction) -> u32 {
        let field = match direction {
            Direction::MemToDev => TCD_SADDR,
            _ => TCD_DADDR,
        };
        self.regs.read32(self.ops.tcd_base(self.index) + field)
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Software state of one hardware channel.
pub(crate) struct Channel<const POOL: usize, const QUEUE: usize> {
    status: ChannelStatus,
    pm_state: PowerState,
    /// Bound DMAMUX source, 0 when none
    slave_id: u32,
    allocated: bool,
    slave: Option<SlaveConfig>,
    /// Set currently loaded into the hardware
    active: Option<TransferSet<POOL>>,
    queue: PendingQueue<TransferSet<POOL>, QUEUE>,
    pool: TcdPool<POOL>,
    cookies: CookieTracker,
    callback: Option<Callback>,
}

impl<const POOL: usize, const QUEUE: usize> Channel<POOL, QUEUE> {
    pub(crate) const fn new() -> Self {
        Self {
            status: ChannelStatus::Idle,
            pm_state: PowerState::Running,
            slave_id: 0,
            allocated: false,
            slave: None,
            active: None,
            queue: PendingQueue::new(),
            pool: TcdPool::new(),
            cookies: CookieTracker::new(),
            callback: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub(crate) fn status(&self) -> ChannelStatus {
        self.status
    }

    pub(crate) fn power_state(&self) -> PowerState {
        self.pm_state
    }

    pub(crate) fn slave_id(&self) -> u32 {
        self.slave_id
    }

    pub(crate) fn set_slave_id(&mut self, id: u32) {
        self.slave_id = id;
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub(crate) fn set_allocated(&mut self, allocated: bool) {
        self.allocated = allocated;
    }

    pub(crate) fn callback(&self) -> Option<Callback> {
        self.callback
    }

    pub(crate) fn set_callback(&mut self, callback: Option<Callback>) {
        self.callback = callback;
    }

    pub(crate) fn free_descriptors(&self) -> usize {
        self.pool.available()
    }

    // -------------------------------------------------------------------------
    // Configuration and preparation
    // -------------------------------------------------------------------------

    pub(crate) fn configure(&mut self, slave: SlaveConfig) -> Result<()> {
        if !slave.direction.is_slave() {
            return Err(ConfigError::InvalidDirection.into());
        }
        self.slave = Some(slave);
        Ok(())
    }

    fn slave(&self) -> Result<SlaveConfig> {
        self.slave.ok_or(Error::Config(ConfigError::NotConfigured))
    }

    pub(crate) fn prepare_scatter_gather(
        &mut self,
        ranges: &[SgEntry],
        direction: Direction,
    ) -> Result<TransferSet<POOL>> {
        let slave = self.slave()?;
        let set = prepare_scatter_gather(&mut self.pool, &slave, ranges, direction);
        #[cfg(feature = "defmt")]
        if matches!(set, Err(Error::Dma(DmaError::AllocationExhausted))) {
            defmt::warn!("edma: no free TCDs for {} ranges", ranges.len());
        }
        set
    }

    pub(crate) fn prepare_cyclic(
        &mut self,
        buf_addr: u32,
        buf_len: u32,
        period_len: u32,
        direction: Direction,
    ) -> Result<TransferSet<POOL>> {
        let slave = self.slave()?;
        prepare_cyclic(&mut self.pool, &slave, buf_addr, buf_len, period_len, direction)
    }

    /// Queue `set` and hand out its cookie. A full queue gives the set's
    /// descriptors back to the pool.
    pub(crate) fn submit(&mut self, mut set: TransferSet<POOL>) -> Result<Cookie> {
        if self.queue.is_full() {
            set.release_into(&mut self.pool);
            return Err(DmaError::QueueFull.into());
        }
        let cookie = self.cookies.assign();
        set.set_cookie(cookie);
        if let Err(set) = self.queue.push(set) {
            set.release_into(&mut self.pool);
            return Err(DmaError::QueueFull.into());
        }
        Ok(cookie)
    }

    /// Drop a prepared set that was never submitted
    pub(crate) fn release(&mut self, set: TransferSet<POOL>) {
        set.release_into(&mut self.pool);
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    pub(crate) fn issue_pending(&mut self, hw: &ChannelHw<'_>) {
        if self.pm_state == PowerState::Suspended || self.status == ChannelStatus::Error {
            return;
        }
        self.queue.issue_all();
        if self.active.is_none() {
            self.xfer_next(hw);
        }
    }

    /// Arm the oldest issued set; false when nothing is issued
    fn xfer_next(&mut self, hw: &ChannelHw<'_>) -> bool {
        let Some(set) = self.queue.pop_issued() else {
            return false;
        };
        if set.is_empty() {
            set.release_into(&mut self.pool);
            return false;
        }
        hw.load_tcd(self.pool.tcd(&set.entries()[0]));
        hw.enable_request();
        self.active = Some(set);
        self.status = ChannelStatus::Active;
        true
    }

    pub(crate) fn pause(&mut self, hw: &ChannelHw<'_>) {
        if self.active.is_some() {
            hw.disable_request();
            self.status = ChannelStatus::Paused;
        }
    }

    pub(crate) fn resume(&mut self, hw: &ChannelHw<'_>) {
        if self.active.is_some() && self.status == ChannelStatus::Paused {
            hw.enable_request();
            self.status = ChannelStatus::Active;
        }
    }

    /// Stop the channel and drop all work.
    ///
    /// A completion latched by the stopped set is acknowledged so it cannot
    /// retire the next set.
    pub(crate) fn terminate(&mut self, hw: &ChannelHw<'_>) {
        hw.disable_request();
        hw.ack_transfer();
        self.drain();
        self.status = ChannelStatus::Idle;
    }

    /// Return the active set and every queued set to the pool
    fn drain(&mut self) {
        if let Some(set) = self.active.take() {
            set.release_into(&mut self.pool);
        }
        while let Some(set) = self.queue.pop_any() {
            set.release_into(&mut self.pool);
        }
    }

    /// Major-loop completion of the active set.
    ///
    /// A one-shot set is retired and the next issued set armed in the same
    /// call. `None` when nothing was running (late interrupt after
    /// terminate).
    pub(crate) fn on_transfer_complete(&mut self, hw: &ChannelHw<'_>) -> Option<ChannelEvent> {
        let Some(set) = self.active.take() else {
            #[cfg(feature = "defmt")]
            defmt::debug!("edma: ch{} completion with no active set", hw.index);
            return None;
        };

        let cookie = set.cookie();
        if set.is_cyclic() {
            self.active = Some(set);
            return cookie.map(ChannelEvent::Period);
        }

        set.release_into(&mut self.pool);
        if let Some(cookie) = cookie {
            self.cookies.complete(cookie);
        }
        self.status = ChannelStatus::Complete;
        if self.pm_state == PowerState::Running {
            self.xfer_next(hw);
        }
        cookie.map(ChannelEvent::Complete)
    }

    /// Hardware error on this channel: stop it and discard the active set
    pub(crate) fn on_error(&mut self, hw: &ChannelHw<'_>) -> ChannelEvent {
        hw.disable_request();
        let cookie = self.active.take().and_then(|set| {
            let cookie = set.cookie();
            set.release_into(&mut self.pool);
            cookie
        });
        self.status = ChannelStatus::Error;
        #[cfg(feature = "defmt")]
        defmt::error!("edma: ch{} transfer error", hw.index);
        ChannelEvent::Error(cookie)
    }

    /// Stop a busy channel for power-down; true if it was running
    pub(crate) fn suspend(&mut self, hw: &ChannelHw<'_>) -> bool {
        let busy = self.status == ChannelStatus::Active;
        if busy {
            hw.disable_request();
        }
        self.pm_state = PowerState::Suspended;
        busy
    }

    pub(crate) fn resume_power(&mut self, hw: &ChannelHw<'_>) {
        self.pm_state = PowerState::Running;
        hw.clear_tcd_csr();
    }

    /// Return the channel to its unallocated state
    pub(crate) fn reset(&mut self, hw: &ChannelHw<'_>) {
        hw.disable_request();
        hw.ack_transfer();
        self.drain();
        self.status = ChannelStatus::Idle;
        self.slave_id = 0;
        self.allocated = false;
        self.slave = None;
        self.callback = None;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub(crate) fn cookie_state(&self, cookie: Cookie) -> CookieState {
        if self.cookies.is_complete(cookie) {
            CookieState::Complete
        } else if self.active.as_ref().is_some_and(|s| s.cookie() == Some(cookie)) {
            CookieState::Active
        } else if self.queue.iter().any(|s| s.cookie() == Some(cookie)) {
            CookieState::Queued
        } else {
            CookieState::Unknown
        }
    }

    pub(crate) fn tx_status(&self, hw: &ChannelHw<'_>, cookie: Cookie) -> TransferState {
        if self.cookies.is_complete(cookie) {
            return TransferState {
                status: ChannelStatus::Complete,
                residue: 0,
            };
        }

        let active = self.active.as_ref().filter(|s| s.cookie() == Some(cookie));
        let residue = if let Some(set) = active {
            let addr = hw.current_addr(set.direction());
            residue(set, &self.pool, Progress::InFlight(addr))
        } else if let Some(set) = self.queue.iter().find(|s| s.cookie() == Some(cookie)) {
            residue(set, &self.pool, Progress::Queued)
        } else {
            0
        };

        TransferState {
            status: self.status,
            residue,
        }
    }

    /// Memory image of the first TCD of `set`
    #[cfg(test)]
    pub(crate) fn head_tcd_bytes(
        &self,
        set: &TransferSet<POOL>,
    ) -> [u8; crate::internal::constants::TCD_SIZE] {
        self.pool.tcd(&set.entries()[0]).to_bytes()
    }
}

// =============================================================================
// Tests
// =============================================================================
