//! Testing utilities and mock implementations
//!
//! Mock register blocks and delays for exercising the engine on the host
//! without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use crate::internal::register::RegisterIo;

// =============================================================================
// Mock Register Block
// =============================================================================

/// One recorded register write, value as it reached the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    /// Access width in bytes
    pub width: u8,
    /// Raw value written
    pub value: u32,
    /// Offset from the block base
    pub offset: usize,
}

impl RegWrite {
    pub fn byte(value: u8, offset: usize) -> Self {
        Self {
            width: 1,
            value: value as u32,
            offset,
        }
    }

    pub fn half(value: u16, offset: usize) -> Self {
        Self {
            width: 2,
            value: value as u32,
            offset,
        }
    }

    pub fn word(value: u32, offset: usize) -> Self {
        Self {
            width: 4,
            value,
            offset,
        }
    }
}

#[derive(Debug, Default)]
struct RegisterFile {
    /// Byte-addressed contents; unset bytes read as zero
    bytes: HashMap<usize, u8>,
    /// Every write in program order
    write_log: Vec<RegWrite>,
    /// Byte ports that clear a bit of a little-endian status word
    clear_ports: Vec<(usize, usize)>,
}

impl RegisterFile {
    fn store(&mut self, offset: usize, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.bytes.insert(offset + i, *b);
        }
    }

    fn apply_clear_port(&mut self, offset: usize, value: u8) {
        let Some(&(_, status)) = self.clear_ports.iter().find(|(port, _)| *port == offset) else {
            return;
        };
        let word = u32::from_le_bytes(self.load(status)) & !(1u32 << (value & 0x1F));
        self.store(status, &word.to_le_bytes());
    }

    fn load<const W: usize>(&self, offset: usize) -> [u8; W] {
        let mut out = [0u8; W];
        for (i, b) in out.iter_mut().enumerate() {
            *b = self.bytes.get(&(offset + i)).copied().unwrap_or(0);
        }
        out
    }
}

/// Byte-addressed register block with a write log.
///
/// Accesses are native-order, like the bus: whatever byte order the
/// caller applied is what lands in memory. Clones share the same block, so
/// a test can hand one clone to the engine and inspect another.
///
/// # Example
///
/// ```ignore
/// let mock = MockRegisters::new();
/// let regs = EdmaRegs::new(mock.clone(), Endianness::Big);
/// regs.write32(0x10, 0x24);
/// assert_eq!(mock.get_be32(0x24), 0x10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRegisters {
    state: Rc<RefCell<RegisterFile>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far
    pub fn writes(&self) -> Vec<RegWrite> {
        self.state.borrow().write_log.clone()
    }

    /// Forget recorded writes (contents are kept)
    pub fn clear_writes(&self) {
        self.state.borrow_mut().write_log.clear();
    }

    pub fn get8(&self, offset: usize) -> u8 {
        self.state.borrow().load::<1>(offset)[0]
    }

    pub fn get_le16(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.state.borrow().load(offset))
    }

    pub fn get_le32(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.state.borrow().load(offset))
    }

    pub fn get_be32(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.state.borrow().load(offset))
    }

    /// Preload a little-endian word without logging a write
    pub fn set_le32(&self, offset: usize, value: u32) {
        self.state.borrow_mut().store(offset, &value.to_le_bytes());
    }

    /// Make byte writes of `n` to `port` clear bit `n` of the little-endian
    /// word at `status`, like the eDMA2 CINT/CERR ports
    pub fn emulate_clear_port(&self, port: usize, status: usize) {
        self.state.borrow_mut().clear_ports.push((port, status));
    }

    /// Preload a big-endian word without logging a write
    pub fn set_be32(&self, offset: usize, value: u32) {
        self.state.borrow_mut().store(offset, &value.to_be_bytes());
    }
}

impl RegisterIo for MockRegisters {
    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_ne_bytes(self.state.borrow().load(offset))
    }

    fn write_u8(&self, offset: usize, value: u8) {
        let mut state = self.state.borrow_mut();
        state.store(offset, &[value]);
        state.apply_clear_port(offset, value);
        state.write_log.push(RegWrite::byte(value, offset));
    }

    fn write_u16(&self, offset: usize, value: u16) {
        let mut state = self.state.borrow_mut();
        state.store(offset, &value.to_ne_bytes());
        state.write_log.push(RegWrite::half(value, offset));
    }

    fn write_u32(&self, offset: usize, value: u32) {
        let mut state = self.state.borrow_mut();
        state.store(offset, &value.to_ne_bytes());
        state.write_log.push(RegWrite::word(value, offset));
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Wake Counting
// =============================================================================

/// Waker target that counts how often it was woken
#[cfg(feature = "async")]
#[derive(Debug, Default)]
pub struct WakeCounter {
    count: std::sync::atomic::AtomicUsize,
}

#[cfg(feature = "async")]
impl WakeCounter {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.count.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn waker(self: &std::sync::Arc<Self>) -> core::task::Waker {
        core::task::Waker::from(self.clone())
    }
}

#[cfg(feature = "async")]
impl std::task::Wake for WakeCounter {
    fn wake(self: std::sync::Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &std::sync::Arc<Self>) {
        self.count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn mock_registers_log_and_store() {
        let mock = MockRegisters::new();
        mock.write_u8(0x1B, 0x04);
        mock.write_u32(0x24, 0x0102_0304);

        assert_eq!(
            mock.writes(),
            std::vec![RegWrite::byte(0x04, 0x1B), RegWrite::word(0x0102_0304, 0x24)]
        );
        assert_eq!(mock.get8(0x1B), 0x04);
        assert_eq!(mock.read_u32(0x24), 0x0102_0304);

        mock.clear_writes();
        assert!(mock.writes().is_empty());
        assert_eq!(mock.read_u32(0x24), 0x0102_0304);
    }

    #[test]
    fn clones_share_contents() {
        let mock = MockRegisters::new();
        let other = mock.clone();
        other.set_le32(0x10, 0xAABB_CCDD);
        assert_eq!(mock.get_le32(0x10), 0xAABB_CCDD);
        assert_eq!(mock.get8(0x10), 0xDD);
        assert_eq!(mock.get_le16(0x12), 0xAABB);
    }

    #[test]
    fn unset_registers_read_zero() {
        let mock = MockRegisters::new();
        assert_eq!(mock.read_u32(0x4000), 0);
    }

    #[test]
    fn clear_port_drops_status_bit() {
        let mock = MockRegisters::new();
        mock.emulate_clear_port(0x1F, 0x24);
        mock.set_le32(0x24, (1 << 6) | (1 << 2));

        mock.write_u8(0x1F, 6);
        assert_eq!(mock.get_le32(0x24), 1 << 2);
        mock.write_u8(0x1E, 2);
        assert_eq!(mock.get_le32(0x24), 1 << 2);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();
        delay.delay_us(10);
        delay.delay_ns(500);
        assert_eq!(delay.total_ns(), 10_500);
        assert_eq!(delay.total_us(), 10);
    }
}
