//! Precomputed table of Nth powers.
//!
//! Every heap push needs `a^N + b^N`. Precomputing the powers turns each key
//! into two table reads and one 128-bit add.

use crate::config::max_sum;
use anyhow::Result;

/// Read-only mapping `i -> i^N` for `0 <= i <= B`
#[derive(Debug, Clone)]
pub struct PowerTable {
    exponent: u32,
    powers: Vec<u128>,
}

impl PowerTable {
    /// Builds the table for the given exponent and bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the exponent or bound is zero, or if the largest
    /// sum `2 * bound^exponent` does not fit in 128 bits.
    pub fn new(exponent: u32, bound: u32) -> Result<Self> {
        if exponent == 0 || bound == 0 {
            anyhow::bail!("Exponent and bound must be positive (got N = {exponent}, B = {bound})");
        }

        if max_sum(exponent, bound).is_none() {
            anyhow::bail!(
                "Configuration overflow: sums of {}th powers up to {} do not fit in 128 bits",
                exponent,
                bound
            );
        }

        // Overflow is ruled out above, plain multiplication is safe
        let powers = (0..=bound).map(|i| u128::from(i).pow(exponent)).collect();

        Ok(Self { exponent, powers })
    }

    /// Returns `i^N`.
    ///
    /// # Panics
    ///
    /// Panics if `i` exceeds the bound.
    #[inline]
    pub fn get(&self, i: u32) -> u128 {
        self.powers[i as usize]
    }

    /// Returns `a^N + b^N`
    #[inline]
    pub fn sum(&self, a: u32, b: u32) -> u128 {
        self.get(a) + self.get(b)
    }

    /// Exponent N
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Inclusive bound B
    pub fn bound(&self) -> u32 {
        // The table holds B + 1 entries and B itself is a u32
        (self.powers.len() - 1) as u32
    }

    /// Number of entries (B + 1)
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Always false: index 0 is present in every table
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        let table = PowerTable::new(4, 158).unwrap();

        assert_eq!(table.len(), 159);
        assert_eq!(table.bound(), 158);
        assert_eq!(table.exponent(), 4);
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(1), 1);
        assert_eq!(table.get(59), 12_117_361);
        assert_eq!(table.get(158), 623_201_296);
    }

    #[test]
    fn test_sum_ramanujan() {
        let table = PowerTable::new(4, 158).unwrap();
        assert_eq!(table.sum(158, 59), 635_318_657);
        assert_eq!(table.sum(134, 133), 635_318_657);
    }

    #[test]
    fn test_exponent_one() {
        let table = PowerTable::new(1, 10).unwrap();
        for i in 0..=10 {
            assert_eq!(table.get(i), u128::from(i));
        }
    }

    #[test]
    fn test_rejects_overflow() {
        let result = PowerTable::new(5, u32::MAX);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("overflow"));
    }

    #[test]
    fn test_rejects_zero() {
        assert!(PowerTable::new(0, 10).is_err());
        assert!(PowerTable::new(4, 0).is_err());
    }
}
