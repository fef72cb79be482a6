//! Bytes remaining for a transfer set
//!
//! The controller exposes progress only as the current source or
//! destination address of the TCD it is executing. The memory side of the
//! set's direction decides which one to follow.

use super::pool::TcdPool;
use super::set::TransferSet;
use super::tcd::Tcd;
use crate::driver::config::Direction;

/// Where a set stands relative to the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Still queued; nothing has executed
    Queued,
    /// Executing; the hardware reports this memory-side address
    InFlight(u32),
}

/// Memory-side address of `tcd` for a set running in `direction`
#[inline(always)]
pub fn memory_addr(tcd: &Tcd, direction: Direction) -> u32 {
    match direction {
        Direction::MemToDev => tcd.saddr(),
        _ => tcd.daddr(),
    }
}

/// Bytes `set` still has to move.
///
/// - Cyclic: the ring buffer length minus the distance of the current
///   address from the ring start; the full buffer length while queued.
/// - Queued one-shot: the configured size of every TCD.
/// - In flight, one-shot: TCDs before the one containing the current
///   address count as done; the containing TCD contributes what is left of
///   its span, later TCDs their full size. An address outside every span
///   (hardware between descriptors) reports the fully subtracted value.
pub fn residue<const N: usize>(
    set: &TransferSet<N>,
    pool: &TcdPool<N>,
    progress: Progress,
) -> usize {
    let mut tcds = set.entries().iter().map(|entry| pool.tcd(entry));

    if set.is_cyclic() {
        let len = set.cyclic_len() as usize;
        let Progress::InFlight(current) = progress else {
            return len;
        };
        let start = tcds.next().map_or(current, |tcd| memory_addr(tcd, set.direction()));
        let elapsed = current.wrapping_sub(start) as usize;
        return len.saturating_sub(elapsed);
    }

    let total: usize = tcds.clone().map(Tcd::size).sum();
    let Progress::InFlight(current) = progress else {
        return total;
    };

    let mut remaining = total;
    for tcd in tcds {
        let size = tcd.size();
        let start = memory_addr(tcd, set.direction());
        remaining -= size;
        let offset = current.wrapping_sub(start) as usize;
        if current >= start && offset < size {
            remaining += size - offset;
            break;
        }
    }
    remaining
}
