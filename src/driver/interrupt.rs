//! Interrupt dispatch for the eDMA engine.
//!
//! The controller raises two kinds of interrupt: transfer-complete and
//! error. Depending on the SoC they arrive on separate lines or share one;
//! [`Variant::irq_lines`](super::config::Variant::irq_lines) says which
//! handler each line needs.
//!
//! Every handler reads the pending channels once, acknowledges each one and
//! drives its state machine inside the channel's critical section. Callbacks
//! and wakers run afterwards, outside the lock.

use super::edma::Edma;
use crate::internal::register::RegisterIo;

// =============================================================================
// Interrupt Lines
// =============================================================================

/// Outcome of a handler, for shared interrupt lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// At least one channel was serviced
    Handled,
    /// Nothing pending; pass the interrupt on
    NotHandled,
}

/// Which handler an interrupt line needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqKind {
    /// Transfer-complete and error share the line
    Combined,
    /// Transfer-complete only
    Transfer,
    /// Error only
    Error,
}

/// One interrupt line of an SoC integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqLine {
    /// Line name as the SoC documentation spells it
    pub name: &'static str,
    /// Handler to call
    pub kind: IrqKind,
}

impl IrqLine {
    /// Describe a line
    pub const fn new(name: &'static str, kind: IrqKind) -> Self {
        Self { name, kind }
    }
}

/// Order in which a shared line is serviced; later passes run only when
/// every earlier pass found nothing.
const COMBINED_ORDER: [IrqKind; 2] = [IrqKind::Transfer, IrqKind::Error];

// =============================================================================
// Interrupt Status
// =============================================================================

/// Pending channel bitmasks, bit *n* for channel *n*.
///
/// # Example
///
/// ```ignore
/// let status = edma.interrupt_status();
/// for ch in status.errored_channels() {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Channels with a pending transfer-complete interrupt
    pub transfer: u32,
    /// Channels with a latched error
    pub error: u32,
}

impl InterruptStatus {
    /// Whether anything is pending
    #[inline]
    pub fn any(&self) -> bool {
        self.transfer != 0 || self.error != 0
    }

    /// Whether any channel reports an error
    #[inline]
    pub fn has_error(&self) -> bool {
        self.error != 0
    }

    /// Channels with a pending completion, lowest first
    pub fn completed_channels(&self) -> impl Iterator<Item = usize> {
        channels_in(self.transfer)
    }

    /// Channels with a latched error, lowest first
    pub fn errored_channels(&self) -> impl Iterator<Item = usize> {
        channels_in(self.error)
    }
}

fn channels_in(mask: u32) -> impl Iterator<Item = usize> {
    (0..u32::BITS as usize).filter(move |&ch| mask & (1u32 << ch) != 0)
}

// =============================================================================
// Handlers
// =============================================================================

impl<R: RegisterIo, const CHANNELS: usize, const POOL: usize, const QUEUE: usize>
    Edma<R, CHANNELS, POOL, QUEUE>
{
    /// Read pending interrupts without acknowledging anything
    pub fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus {
            transfer: self.ops().transfer_pending(self.regs(), CHANNELS),
            error: self
                .ops()
                .error_pending(self.regs(), CHANNELS)
                .unwrap_or(0),
        }
    }

    /// Service one interrupt line.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[interrupt]
    /// fn DMA0() {
    ///     EDMA.handle_irq(IrqKind::Combined);
    /// }
    /// ```
    pub fn handle_irq(&self, kind: IrqKind) -> IrqReturn {
        match kind {
            IrqKind::Combined => self.handle_combined_irq(),
            IrqKind::Transfer => self.handle_transfer_irq(),
            IrqKind::Error => self.handle_error_irq(),
        }
    }

    /// Transfer-complete handler.
    ///
    /// A one-shot set is retired and the next issued set armed; a cyclic set
    /// reports a period. A channel with nothing active (terminated while the
    /// interrupt was in flight) is only acknowledged.
    pub fn handle_transfer_irq(&self) -> IrqReturn {
        let pending = self.ops().transfer_pending(self.regs(), CHANNELS);
        if pending == 0 {
            return IrqReturn::NotHandled;
        }

        for ch in channels_in(pending) {
            self.ops().ack_transfer(self.regs(), ch);
            let Ok((event, callback)) = self.with_channel(ch, |channel, hw| {
                (channel.on_transfer_complete(hw), channel.callback())
            }) else {
                continue;
            };
            self.notify(ch, event, callback);
        }
        IrqReturn::Handled
    }

    /// Error handler.
    ///
    /// Each flagged channel has its request line disabled and its active set
    /// discarded, and stays in `Error` until terminated. On eDMA3 a valid
    /// MP_ES counts as handled even when no channel reports the error.
    pub fn handle_error_irq(&self) -> IrqReturn {
        let Some(pending) = self.ops().error_pending(self.regs(), CHANNELS) else {
            return IrqReturn::NotHandled;
        };

        for ch in channels_in(pending) {
            let Ok((event, callback)) = self.with_channel(ch, |channel, hw| {
                (channel.on_error(hw), channel.callback())
            }) else {
                continue;
            };
            self.ops().ack_error(self.regs(), ch);
            self.notify(ch, Some(event), callback);
        }
        IrqReturn::Handled
    }

    /// Handler for a line carrying both sources.
    ///
    /// Completions take priority: the error pass only runs when no channel
    /// completed. An error latched alongside a completion stays pending and
    /// is serviced by the next interrupt.
    pub fn handle_combined_irq(&self) -> IrqReturn {
        for kind in COMBINED_ORDER {
            if self.handle_irq(kind) == IrqReturn::Handled {
                #[cfg(feature = "defmt")]
                if kind == IrqKind::Transfer && self.interrupt_status().has_error() {
                    defmt::debug!("edma: error pending behind completion");
                }
                return IrqReturn::Handled;
            }
        }
        IrqReturn::NotHandled
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
