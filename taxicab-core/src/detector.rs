//! Coincidence detection over the ordered sum stream.
//!
//! Sums arrive non-decreasing, so all pairs sharing a sum form one
//! contiguous run. For a run of `k` pairs the detector emits
//! `k * (k - 1) / 2` solutions, pairing each new pair against every earlier
//! pair of the run: `(p1, p2), (p1, p3), (p2, p3), (p1, p4), ...`

use crate::stream::SumNode;
use anyhow::Result;
use std::fmt;
use std::ops::ControlFlow;

/// One hit: `a^N + b^N = c^N + d^N = sum`, with `(a, b)` seen before `(c, d)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Solution {
    /// Larger base of the earlier pair
    pub a: u32,
    /// Smaller base of the earlier pair
    pub b: u32,
    /// Larger base of the later pair
    pub c: u32,
    /// Smaller base of the later pair
    pub d: u32,
    /// The shared value `a^N + b^N = c^N + d^N`
    pub sum: u128,
}

impl Solution {
    /// The two pairs in a canonical order, for set comparisons that must not
    /// depend on heap tie-breaking.
    pub fn unordered(&self) -> ((u32, u32), (u32, u32)) {
        let first = (self.a, self.b);
        let second = (self.c, self.d);
        if first <= second { (first, second) } else { (second, first) }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {} {}", self.a, self.b, self.c, self.d, self.sum)
    }
}

/// Groups consecutive equal-sum pairs and emits every distinct combination
#[derive(Debug)]
pub struct CoincidenceDetector {
    /// Hit budget (0 = unlimited)
    max_hits: u64,

    /// Hits emitted so far
    hits: u64,

    /// Sum of the current run (`None` before the first node)
    prev_sum: Option<u128>,

    /// Pairs of the current run, in arrival order
    prev_pairs: Vec<(u32, u32)>,
}

impl CoincidenceDetector {
    /// Creates a detector with the given hit budget (0 = unlimited)
    pub fn new(max_hits: u64) -> Self {
        Self { max_hits, hits: 0, prev_sum: None, prev_pairs: Vec::with_capacity(8) }
    }

    /// Number of hits emitted so far
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// True once the hit budget is spent
    pub fn is_done(&self) -> bool {
        self.max_hits > 0 && self.hits >= self.max_hits
    }

    /// Feeds the next node of the stream.
    ///
    /// `on_hit` receives every solution the node completes, together with the
    /// running hit count (starting at 1).
    ///
    /// Returns `ControlFlow::Break` once the hit budget is reached; the rest
    /// of the current run is dropped and later calls emit nothing.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `on_hit`.
    pub fn observe<F>(&mut self, node: &SumNode, mut on_hit: F) -> Result<ControlFlow<()>>
    where
        F: FnMut(&Solution, u64) -> Result<()>,
    {
        if self.is_done() {
            return Ok(ControlFlow::Break(()));
        }

        let pair = node.pair();

        if self.prev_sum != Some(node.sum) {
            // New run
            self.prev_pairs.clear();
            self.prev_pairs.push(pair);
            self.prev_sum = Some(node.sum);
            return Ok(ControlFlow::Continue(()));
        }

        let mut halted = false;
        for &(a, b) in &self.prev_pairs {
            // The column sweep never repeats a pair; guard anyway
            if (a, b) == pair {
                continue;
            }

            self.hits += 1;
            let solution = Solution { a, b, c: node.a, d: node.b, sum: node.sum };
            on_hit(&solution, self.hits)?;

            if self.max_hits > 0 && self.hits >= self.max_hits {
                halted = true;
                break;
            }
        }

        if halted {
            self.prev_pairs.clear();
            return Ok(ControlFlow::Break(()));
        }

        self.prev_pairs.push(pair);
        Ok(ControlFlow::Continue(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(a: u32, b: u32, sum: u128) -> SumNode {
        SumNode { a, b, sum }
    }

    fn feed(detector: &mut CoincidenceDetector, nodes: &[SumNode]) -> Vec<Solution> {
        let mut found = Vec::new();
        for n in nodes {
            let flow = detector
                .observe(n, |s, _| {
                    found.push(*s);
                    Ok(())
                })
                .unwrap();
            if flow.is_break() {
                break;
            }
        }
        found
    }

    #[test]
    fn test_distinct_sums_emit_nothing() {
        let mut detector = CoincidenceDetector::new(0);
        let found = feed(&mut detector, &[node(1, 1, 2), node(2, 1, 5), node(2, 2, 8)]);

        assert!(found.is_empty());
        assert_eq!(detector.hits(), 0);
    }

    #[test]
    fn test_pair_emits_one_solution() {
        let mut detector = CoincidenceDetector::new(0);
        let found = feed(
            &mut detector,
            &[node(5, 5, 50), node(7, 1, 50), node(7, 2, 53)],
        );

        assert_eq!(found, vec![Solution { a: 5, b: 5, c: 7, d: 1, sum: 50 }]);
        assert_eq!(detector.hits(), 1);
    }

    #[test]
    fn test_run_emission_order() {
        // 325 = 15^2 + 10^2 = 17^2 + 6^2 = 18^2 + 1^2
        let mut detector = CoincidenceDetector::new(0);
        let found = feed(
            &mut detector,
            &[node(15, 10, 325), node(17, 6, 325), node(18, 1, 325)],
        );

        let pairs: Vec<_> = found.iter().map(|s| (s.a, s.b, s.c, s.d)).collect();
        assert_eq!(pairs, vec![(15, 10, 17, 6), (15, 10, 18, 1), (17, 6, 18, 1)]);
    }

    #[test]
    fn test_identical_pair_is_filtered() {
        let mut detector = CoincidenceDetector::new(0);
        let found = feed(&mut detector, &[node(3, 2, 13), node(3, 2, 13)]);

        assert!(found.is_empty());
    }

    #[test]
    fn test_hit_budget_stops_mid_run() {
        let mut detector = CoincidenceDetector::new(2);
        let nodes = [
            node(15, 10, 325),
            node(17, 6, 325),
            node(18, 1, 325),
            node(20, 5, 425),
            node(19, 8, 425),
        ];
        let found = feed(&mut detector, &nodes);

        assert_eq!(found.len(), 2);
        assert!(detector.is_done());

        // Later nodes are ignored
        let flow = detector.observe(&node(19, 8, 425), |_, _| Ok(())).unwrap();
        assert!(flow.is_break());
        assert_eq!(detector.hits(), 2);
    }

    #[test]
    fn test_hit_numbers_are_sequential() {
        let mut detector = CoincidenceDetector::new(0);
        let mut numbers = Vec::new();
        for n in [node(15, 10, 325), node(17, 6, 325), node(18, 1, 325)] {
            detector
                .observe(&n, |_, hit| {
                    numbers.push(hit);
                    Ok(())
                })
                .unwrap();
        }

        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut detector = CoincidenceDetector::new(0);
        detector.observe(&node(5, 5, 50), |_, _| Ok(())).unwrap();

        let result = detector.observe(&node(7, 1, 50), |_, _| anyhow::bail!("sink closed"));
        assert!(result.unwrap_err().to_string().contains("sink closed"));
    }

    #[test]
    fn test_unordered_and_display() {
        let s = Solution { a: 158, b: 59, c: 134, d: 133, sum: 635_318_657 };

        assert_eq!(s.unordered(), ((134, 133), (158, 59)));
        assert_eq!(s.to_string(), "158 59 134 133 635318657");
    }
}
