//! Scatter-gather and cyclic chain construction
//!
//! Both builders validate the whole request before touching the pool, take
//! every pool entry the chain needs up front (returning all of them if any
//! allocation fails) and only then write descriptors.
//!
//! Memory-side addresses advance by the element width; the peripheral
//! address stays fixed.

use heapless::Vec;

use super::pool::{PoolEntry, TcdPool};
use super::set::{SgEntry, TransferSet};
use super::tcd::{TcdParams, attr};
use crate::driver::config::{Direction, SlaveConfig};
use crate::driver::error::{ConfigError, DmaError, Result};
use crate::internal::constants::MAX_ITERATIONS;

/// Build a one-shot chain with one TCD per range.
///
/// Every TCD but the last links to its successor; the last one raises the
/// major interrupt and drops the request line.
///
/// # Errors
///
/// - `InvalidDirection` if `direction` is not a peripheral direction or
///   differs from `slave.direction`
/// - `InvalidLength` for an empty request, a zero minor loop, or a range
///   whose iteration count falls outside `1..=0x7FFF`
/// - `AllocationExhausted` if the pool cannot supply every TCD
pub fn prepare_scatter_gather<const N: usize>(
    pool: &mut TcdPool<N>,
    slave: &SlaveConfig,
    ranges: &[SgEntry],
    direction: Direction,
) -> Result<TransferSet<N>> {
    check_direction(slave, direction)?;
    let nbytes = minor_loop_bytes(slave)?;
    if ranges.is_empty() {
        return Err(DmaError::InvalidLength.into());
    }
    for range in ranges {
        iterations(range.len, nbytes)?;
    }

    let entries = alloc_chain(pool, ranges.len())?;
    let last = ranges.len() - 1;

    for (i, range) in ranges.iter().enumerate() {
        let link = if i < last { entries[i + 1].phys() } else { 0 };
        let mut params = segment(slave, range.addr, nbytes, iterations(range.len, nbytes)?);
        params.dlast_sga = link;
        params.enable_sg = i < last;
        params.major_int = i == last;
        params.disable_req = i == last;
        pool.tcd(&entries[i]).fill(&params);
    }

    Ok(TransferSet::new(entries, direction, false, 0))
}

/// Build a closed ring of `buf_len / period_len` TCDs over one buffer.
///
/// Every segment raises the major interrupt and links to the next, the last
/// one back to the first. None drops the request line, so the ring runs
/// until the channel is terminated.
///
/// # Errors
///
/// Same as [`prepare_scatter_gather`]; additionally `InvalidLength` when the
/// period is zero or longer than the buffer.
pub fn prepare_cyclic<const N: usize>(
    pool: &mut TcdPool<N>,
    slave: &SlaveConfig,
    buf_addr: u32,
    buf_len: u32,
    period_len: u32,
    direction: Direction,
) -> Result<TransferSet<N>> {
    check_direction(slave, direction)?;
    let nbytes = minor_loop_bytes(slave)?;
    if period_len == 0 || buf_len < period_len {
        return Err(DmaError::InvalidLength.into());
    }
    let iter = iterations(period_len, nbytes)?;
    let segments = (buf_len / period_len) as usize;

    let entries = alloc_chain(pool, segments)?;
    let buf_end = buf_addr.wrapping_add(buf_len);
    let mut addr = buf_addr;

    for i in 0..segments {
        if addr >= buf_end {
            addr = buf_addr;
        }
        let mut params = segment(slave, addr, nbytes, iter);
        params.dlast_sga = entries[(i + 1) % segments].phys();
        params.enable_sg = true;
        params.major_int = true;
        pool.tcd(&entries[i]).fill(&params);
        addr = addr.wrapping_add(period_len);
    }

    Ok(TransferSet::new(entries, direction, true, buf_len))
}

fn check_direction(slave: &SlaveConfig, direction: Direction) -> Result<()> {
    if !direction.is_slave() || direction != slave.direction {
        return Err(ConfigError::InvalidDirection.into());
    }
    Ok(())
}

fn minor_loop_bytes(slave: &SlaveConfig) -> Result<u32> {
    match slave.nbytes() {
        0 => Err(DmaError::InvalidLength.into()),
        nbytes => Ok(nbytes),
    }
}

fn iterations(len: u32, nbytes: u32) -> Result<u16> {
    let iter = len / nbytes;
    if iter == 0 || iter > MAX_ITERATIONS {
        return Err(DmaError::InvalidLength.into());
    }
    Ok(iter as u16)
}

/// Take `count` entries, or none at all.
fn alloc_chain<const N: usize>(pool: &mut TcdPool<N>, count: usize) -> Result<Vec<PoolEntry, N>> {
    let mut entries: Vec<PoolEntry, N> = Vec::new();

    while entries.len() < count {
        let taken = match pool.alloc() {
            Some(entry) => entries.push(entry).map_err(|entry| pool.free(entry)).is_ok(),
            None => false,
        };
        if !taken {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "eDMA: TCD pool exhausted ({} of {} allocated)",
                entries.len(),
                count
            );
            for entry in entries {
                pool.free(entry);
            }
            return Err(DmaError::AllocationExhausted.into());
        }
    }
    Ok(entries)
}

/// Common fields of one segment at memory address `mem_addr`
fn segment(slave: &SlaveConfig, mem_addr: u32, nbytes: u32, iter: u16) -> TcdParams {
    let width = slave.addr_width;
    let (src, dst, soff, doff) = match slave.direction {
        Direction::MemToDev => (mem_addr, slave.dev_addr, width.bytes() as u16, 0),
        _ => (slave.dev_addr, mem_addr, 0, width.bytes() as u16),
    };
    TcdParams {
        src,
        dst,
        attr: attr::ssize(width.size_code()) | attr::dsize(width.size_code()),
        soff,
        nbytes,
        slast: 0,
        iter,
        doff,
        ..TcdParams::default()
    }
}
