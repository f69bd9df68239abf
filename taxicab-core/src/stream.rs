//! Ordered enumeration of power sums.
//!
//! # Column Sweep
//!
//! Think of the virtual matrix `M[a][b] = a^N + b^N` restricted to `b <= a`.
//! Each column `a` is already sorted (the sum grows with `b`), so the stream
//! is a k-way merge of `B` sorted columns:
//!
//! - The heap starts with the head `(a, 1)` of every column
//! - Each pop emits the smallest live sum and pushes the next cell of the
//!   same column, if there is one
//!
//! # Invariants
//!
//! - The heap holds exactly one node per active column, so it never grows
//!   beyond `B` nodes
//! - Every pair `(a, b)` with `1 <= b <= a <= B` is emitted exactly once
//! - Emitted sums are non-decreasing

use crate::powers::PowerTable;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A candidate pair with its precomputed sum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumNode {
    /// Larger base (column)
    pub a: u32,
    /// Smaller base, `1 <= b <= a`
    pub b: u32,
    /// `a^N + b^N`
    pub sum: u128,
}

impl SumNode {
    /// The `(a, b)` pair of this node
    #[inline]
    pub fn pair(&self) -> (u32, u32) {
        (self.a, self.b)
    }
}

// Ties on `sum` break by column, then row. Any consistent order works for
// the detector; this one keeps runs reproducible.
impl Ord for SumNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sum
            .cmp(&other.sum)
            .then_with(|| self.a.cmp(&other.a))
            .then_with(|| self.b.cmp(&other.b))
    }
}

impl PartialOrd for SumNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap driven stream of every pair in non-decreasing sum order
#[derive(Debug)]
pub struct OrderedSumStream<'a> {
    powers: &'a PowerTable,
    heap: BinaryHeap<Reverse<SumNode>>,
}

impl<'a> OrderedSumStream<'a> {
    /// Builds the initial heap: the head `(a, 1)` of every column.
    ///
    /// The heads are collected first and heapified in O(B).
    pub fn new(powers: &'a PowerTable) -> Self {
        let heads: Vec<_> = (1..=powers.bound())
            .map(|a| Reverse(SumNode { a, b: 1, sum: powers.sum(a, 1) }))
            .collect();

        Self { powers, heap: BinaryHeap::from(heads) }
    }

    /// Number of live nodes (one per active column)
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True once every pair has been emitted
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Smallest live node, without consuming it
    pub fn peek(&self) -> Option<&SumNode> {
        self.heap.peek().map(|Reverse(node)| node)
    }
}

impl Iterator for OrderedSumStream<'_> {
    type Item = SumNode;

    fn next(&mut self) -> Option<SumNode> {
        let Reverse(node) = self.heap.pop()?;

        // Advance the column; the diagonal cell retires it
        if node.b < node.a {
            let b = node.b + 1;
            self.heap.push(Reverse(SumNode { a: node.a, b, sum: self.powers.sum(node.a, b) }));
        }

        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At least one pair per live column
        (self.heap.len(), None)
    }
}
