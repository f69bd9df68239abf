//! Search configuration.
//!
//! The exponent, the bound and the buffering parameters are fixed when the
//! binary is built. Changing any of them requires a rebuild. The same values
//! are also available at runtime through [`SearchConfig`], which lets tests
//! and library users run small searches without recompiling.
//!
//! # Overflow
//!
//! Every sum `a^N + b^N` is computed in 128-bit arithmetic. The build-time
//! constants are checked by a `const` assertion, so an (N, B) whose largest
//! sum `2 * B^N` does not fit is rejected by the compiler:
//!
//! ```compile_fail
//! use taxicab_core::config::max_sum;
//!
//! const _: () = assert!(max_sum(5, u32::MAX).is_some());
//! ```

use anyhow::Result;

/// Exponent N of the power sum
pub const EXPONENT: u32 = 4;

/// Inclusive upper bound B on the bases
pub const BOUND: u32 = 1_001_805;

/// Stop after this many hits (0 = unlimited)
pub const MAX_HITS: u64 = 30_000;

/// Result buffer capacity in bytes (512 KiB)
pub const BUFFER_SIZE: usize = 512 * 1024;

/// Number of new hits between progress updates
pub const UPDATE_INTERVAL: u64 = 100;

const _: () = assert!(
    max_sum(EXPONENT, BOUND).is_some(),
    "EXPONENT and BOUND produce sums that do not fit in 128 bits"
);

/// Returns `bound^exponent`, or `None` if it does not fit in a `u128`.
pub const fn max_power(exponent: u32, bound: u32) -> Option<u128> {
    (bound as u128).checked_pow(exponent)
}

/// Returns the largest sum `2 * bound^exponent` the search can produce, or
/// `None` if it does not fit in a `u128`.
///
/// The result is always even, so it can never collide with `u128::MAX`.
pub const fn max_sum(exponent: u32, bound: u32) -> Option<u128> {
    match max_power(exponent, bound) {
        Some(power) => power.checked_mul(2),
        None => None,
    }
}

/// Number of decimal digits needed to print `value`.
pub const fn decimal_digits(mut value: u128) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

/// Runtime view of the search parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Exponent N
    pub exponent: u32,

    /// Inclusive upper bound B on `a` and `c`
    pub bound: u32,

    /// Hit budget (0 = unlimited)
    pub max_hits: u64,

    /// Result buffer capacity in bytes
    pub buffer_size: usize,

    /// Hits between progress updates
    pub update_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exponent: EXPONENT,
            bound: BOUND,
            max_hits: MAX_HITS,
            buffer_size: BUFFER_SIZE,
            update_interval: UPDATE_INTERVAL,
        }
    }
}

impl SearchConfig {
    /// Creates a configuration for the given exponent and bound, keeping the
    /// build-time buffering parameters and an unlimited hit budget.
    pub fn new(exponent: u32, bound: u32) -> Self {
        Self { exponent, bound, max_hits: 0, ..Self::default() }
    }

    /// Sets the hit budget (0 = unlimited)
    #[must_use]
    pub fn with_max_hits(mut self, max_hits: u64) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Sets the result buffer capacity
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The exponent, the bound or the update interval is zero
    /// - `2 * bound^exponent` does not fit in 128 bits
    /// - The buffer cannot hold at least one record beyond its flush margin
    pub fn validate(&self) -> Result<()> {
        if self.exponent == 0 {
            anyhow::bail!("Exponent must be at least 1");
        }

        if self.bound == 0 {
            anyhow::bail!("Bound must be at least 1");
        }

        if self.update_interval == 0 {
            anyhow::bail!("Update interval must be at least 1");
        }

        if max_sum(self.exponent, self.bound).is_none() {
            anyhow::bail!(
                "Configuration overflow: 2 * {}^{} does not fit in 128 bits",
                self.bound,
                self.exponent
            );
        }

        let record_len = self.max_record_len();
        if self.buffer_size <= record_len {
            anyhow::bail!(
                "Buffer size {} is too small: records can be {} bytes long",
                self.buffer_size,
                record_len
            );
        }

        Ok(())
    }

    /// Length in bytes of the longest record this configuration can emit.
    ///
    /// Four base fields, the sum field, four spaces and the newline.
    pub fn max_record_len(&self) -> usize {
        let base_digits = decimal_digits(u128::from(self.bound));
        let sum_digits = decimal_digits(max_sum(self.exponent, self.bound).unwrap_or(u128::MAX));
        4 * base_digits + sum_digits + 5
    }
}
