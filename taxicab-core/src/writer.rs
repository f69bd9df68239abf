//! Block-buffered result writer.
//!
//! Records are formatted into a fixed byte buffer and handed to the sink in
//! large blocks. The buffer is flushed as soon as its free space
//! drops below the flush margin, so a record is never split across flushes.
//!
//! # Record Format
//!
//! ```text
//! a SP b SP c SP d SP sum LF
//! ```
//!
//! All fields are unsigned decimal with no leading zeros.

use crate::detector::Solution;
use anyhow::{Context, Result};
use std::io::Write;

/// Digits per limb when printing a `u128` (largest k with 10^k - 1 < 2^64)
pub const LIMB_DIGITS: usize = 19;

/// 10^19
const LIMB_BASE: u128 = 10_000_000_000_000_000_000;

/// Writes `value` zero-padded to at least `width` digits, returns the length.
fn write_u64(buf: &mut [u8], mut value: u64, width: usize) -> usize {
    let mut digits = [b'0'; 20];
    let mut start = digits.len();

    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }

    let len = (digits.len() - start).max(width);
    buf[..len].copy_from_slice(&digits[digits.len() - len..]);
    len
}

/// Formats a `u128` as decimal into `buf` and returns the number of bytes
/// written.
///
/// The value is split into base-10^19 limbs. The most significant limb is
/// printed as is and every following limb is zero-padded to 19 digits.
///
/// # Panics
///
/// Panics if `buf` is shorter than the formatted value (at most 39 bytes).
pub fn format_u128(buf: &mut [u8], value: u128) -> usize {
    if value < LIMB_BASE {
        // Fits in u64
        return write_u64(buf, value as u64, 0);
    }

    let leading = value / LIMB_BASE;
    let trailing = (value % LIMB_BASE) as u64;

    let len = format_u128(buf, leading);
    len + write_u64(&mut buf[len..], trailing, LIMB_DIGITS)
}

/// Longest record any configuration can produce: four 10-digit `u32` bases,
/// a 39-digit `u128` sum, four spaces and the newline
pub const MAX_RECORD_LEN: usize = 4 * 10 + 39 + 5;

/// Fixed-capacity buffer in front of an output sink
#[derive(Debug)]
pub struct ResultWriter<W: Write> {
    /// Destination of flushed blocks
    sink: W,

    /// Record buffer; bytes `[0, pos)` are complete records
    buffer: Box<[u8]>,

    /// Occupancy cursor
    pos: usize,

    /// Flush once fewer than this many bytes are free
    margin: usize,

    /// Set after a failed write; the sink state is unknown from then on
    failed: bool,
}

impl<W: Write> ResultWriter<W> {
    /// Creates a writer with a `capacity`-byte buffer.
    ///
    /// `margin` should be at least the longest record the search can produce
    /// (see `SearchConfig::max_record_len`). A smaller margin only costs an
    /// extra flush when a record does not fit.
    ///
    /// # Errors
    ///
    /// Returns an error if the margin is zero or does not leave room for a
    /// record in an empty buffer.
    pub fn with_capacity(sink: W, capacity: usize, margin: usize) -> Result<Self> {
        if margin == 0 || capacity <= margin {
            anyhow::bail!("Buffer capacity {capacity} must exceed flush margin {margin}");
        }

        Ok(Self {
            sink,
            buffer: vec![0; capacity].into_boxed_slice(),
            pos: 0,
            margin,
            failed: false,
        })
    }

    /// Formats one record into the buffer.
    ///
    /// # Returns
    ///
    /// `true` if this call flushed the buffer to the sink
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A flush fails, or an earlier one did
    /// - The record is longer than the whole buffer
    pub fn push(&mut self, solution: &Solution) -> Result<bool> {
        if self.failed {
            anyhow::bail!("Result writer is unusable after a failed write");
        }

        let mut record = [0u8; MAX_RECORD_LEN];
        let mut len = 0;

        for base in [solution.a, solution.b, solution.c, solution.d] {
            len += write_u64(&mut record[len..], u64::from(base), 0);
            record[len] = b' ';
            len += 1;
        }

        len += format_u128(&mut record[len..], solution.sum);
        record[len] = b'\n';
        len += 1;

        let mut flushed = false;

        // Only reachable when the margin is shorter than this record
        if self.buffer.len() - self.pos < len {
            self.flush()?;
            flushed = true;
            if self.buffer.len() < len {
                anyhow::bail!(
                    "Record of {} bytes does not fit in a {}-byte buffer",
                    len,
                    self.buffer.len()
                );
            }
        }

        self.buffer[self.pos..self.pos + len].copy_from_slice(&record[..len]);
        self.pos += len;

        if self.buffer.len() - self.pos < self.margin {
            self.flush()?;
            flushed = true;
        }

        Ok(flushed)
    }

    /// Writes all buffered records to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write, or rejected an earlier
    /// one. Bytes already handed to the sink stay there; the buffer is
    /// discarded and never written again, so no record is duplicated.
    pub fn flush(&mut self) -> Result<()> {
        if self.failed {
            anyhow::bail!("Result writer is unusable after a failed write");
        }

        let len = std::mem::take(&mut self.pos);
        let written = match self.sink.write_all(&self.buffer[..len]) {
            Ok(()) => self.sink.flush(),
            Err(err) => Err(err),
        };

        if let Err(err) = written {
            self.failed = true;
            return Err(err).context("Failed to write results");
        }

        Ok(())
    }

    /// Flushes and releases the writer.
    ///
    /// Prefer this over relying on `Drop`, which cannot report errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn finish(mut self) -> Result<()> {
        self.flush()
    }

    /// Bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.pos
    }

    /// Buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<W: Write> Drop for ResultWriter<W> {
    fn drop(&mut self) {
        // Best effort; finish() reports errors. A failed writer stays silent.
        if !self.failed {
            let _ = self.flush();
        }
    }
}
