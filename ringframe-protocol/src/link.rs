//! Moving bytes between a UART and a ring
//!
//! These sit at the collaborator boundary: [`receive`] feeds a ring from
//! a receiver, [`transmit`] drains queued bytes into a transmitter. Both
//! are generic over [`Fifo`], so a [`SharedRing`](ringframe_core::SharedRing)
//! filled from an interrupt works the same as a locally owned ring.

use ringframe_core::Fifo;
use ringframe_hal::{UartRx, UartTx};

/// Bytes moved per `write_blocking` call when transmitting
const TX_CHUNK_SIZE: usize = 32;

/// Outcome of one [`receive`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Bytes read from the UART
    pub received: usize,
    /// Bytes the ring refused because it was full
    pub dropped: usize,
}

/// Read one chunk from `rx` and push it into `fifo`
///
/// `buf` bounds how much is read at once. Bytes the ring refuses are
/// counted in [`RxStats::dropped`] and lost; with overwrite enabled the
/// ring discards its oldest bytes instead and nothing is dropped here.
pub fn receive<R, F>(rx: &mut R, fifo: &mut F, buf: &mut [u8]) -> Result<RxStats, R::Error>
where
    R: UartRx,
    F: Fifo + ?Sized,
{
    let received = rx.read_blocking(buf)?;
    let mut stats = RxStats {
        received,
        dropped: 0,
    };

    for &byte in &buf[..received] {
        if fifo.push(byte).is_err() {
            stats.dropped += 1;
        }
    }

    if stats.dropped > 0 {
        warn!("RX ring full, dropped {} of {} bytes", stats.dropped, received);
    } else if received > 0 {
        trace!("RX: {} bytes", received);
    }

    Ok(stats)
}

/// Drain every queued byte from `fifo` into `tx`, then flush
///
/// Returns the number of bytes written. On a write error the chunk in
/// flight is lost; bytes still queued stay in the ring.
pub fn transmit<T, F>(tx: &mut T, fifo: &mut F) -> Result<usize, T::Error>
where
    T: UartTx,
    F: Fifo + ?Sized,
{
    let mut chunk = [0u8; TX_CHUNK_SIZE];
    let mut written = 0;

    loop {
        let mut n = 0;
        while n < TX_CHUNK_SIZE {
            match fifo.pop() {
                Ok(byte) => {
                    chunk[n] = byte;
                    n += 1;
                }
                Err(_) => break,
            }
        }
        if n == 0 {
            break;
        }
        tx.write_blocking(&chunk[..n])?;
        written += n;
    }

    tx.flush()?;
    Ok(written)
}
