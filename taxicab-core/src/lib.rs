//! Taxicab - ordered search for equal sums of like powers
//!
//! Finds every quadruple `(a, b, c, d)` with `1 <= b <= a <= B` and
//! `1 <= d <= c <= B` such that `a^N + b^N = c^N + d^N`.
//!
//! # How It Works
//!
//! - A [`PowerTable`] holds `i^N` for `0 <= i <= B` in 128-bit integers
//! - An [`OrderedSumStream`] merges the `B` sorted columns of the virtual
//!   matrix `a^N + b^N` through a min-heap, producing every pair in
//!   non-decreasing sum order with O(B) memory
//! - A [`CoincidenceDetector`] watches for runs of equal sums and emits every
//!   distinct combination of pairs in a run
//! - A [`ResultWriter`] formats hits into a fixed buffer and flushes it to
//!   the output in large blocks
//!
//! # Example
//!
//! ```no_run
//! use taxicab_core::{OutputFile, Search, SearchConfig, SilentStatus};
//!
//! # fn main() -> anyhow::Result<()> {
//! let search = Search::new(SearchConfig::new(4, 158))?;
//!
//! let mut output = OutputFile::create("results.txt")?;
//! let summary = search.run(&mut output, &mut SilentStatus)?;
//! output.commit()?;
//!
//! assert_eq!(summary.hits, 1); // 59^4 + 158^4 = 133^4 + 134^4
//! # Ok(())
//! # }
//! ```
//!
//! # Scope
//!
//! The search is single-threaded and runs to completion or to the hit
//! budget. There is no checkpointing and no resume.

pub mod config;
pub mod detector;
mod output;
pub mod powers;
pub mod status;
pub mod stream;
pub mod verify;
pub mod writer;

pub use config::SearchConfig;
pub use detector::{CoincidenceDetector, Solution};
pub use output::OutputFile;
pub use powers::PowerTable;
pub use status::{ConsoleStatus, SilentStatus, StatusSink};
pub use stream::{OrderedSumStream, SumNode};
pub use verify::{VerifyReport, verify_results};
pub use writer::ResultWriter;

use anyhow::Result;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every pair was visited
    Exhausted,

    /// The hit budget was reached
    HitLimit,
}

/// Result of a completed search
#[derive(Debug, Clone)]
pub struct SearchSummary {
    /// Records written
    pub hits: u64,

    /// Pairs popped from the stream
    pub pairs_visited: u64,

    /// Why the search stopped
    pub termination: Termination,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// A validated search, ready to run
#[derive(Debug, Clone)]
pub struct Search {
    config: SearchConfig,
}

impl Search {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (see
    /// [`SearchConfig::validate`]).
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this search runs with
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search, streaming every hit to `sink`.
    ///
    /// # Arguments
    ///
    /// * `sink` - Destination of the record stream
    /// * `status` - Receiver of progress messages
    ///
    /// The buffered records are flushed before this returns, whether the
    /// search ran out of pairs or hit its budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the power table cannot be built or a write to the
    /// sink fails. Records flushed before the failure remain in the sink.
    pub fn run<W, S>(&self, sink: W, status: &mut S) -> Result<SearchSummary>
    where
        W: Write,
        S: StatusSink + ?Sized,
    {
        let config = &self.config;
        let started = Instant::now();

        let budget = if config.max_hits > 0 {
            format!("up to {} ", config.max_hits)
        } else {
            String::new()
        };
        status.message(&format!(
            "Searching for {}solutions with N = {} and an upper bound of {}",
            budget, config.exponent, config.bound
        ));

        status.message(&format!("Precomputing powers of {}", config.exponent));
        let powers = PowerTable::new(config.exponent, config.bound)?;
        debug!(entries = powers.len(), elapsed = ?started.elapsed(), "power table ready");

        status.message("Initializing heap");
        let mut stream = OrderedSumStream::new(&powers);
        debug!(nodes = stream.len(), "heap initialized");

        let mut writer =
            ResultWriter::with_capacity(sink, config.buffer_size, config.max_record_len())?;
        let mut detector = CoincidenceDetector::new(config.max_hits);
        let mut pairs_visited = 0u64;
        let mut termination = Termination::Exhausted;

        status.message("Beginning search loop.");
        status.progress(0, config.max_hits);

        for node in stream.by_ref() {
            pairs_visited += 1;

            let flow = detector.observe(&node, |solution, hit| {
                if writer.push(solution)? {
                    debug!(hit, "result buffer flushed");
                }
                if hit % config.update_interval == 0 {
                    status.progress(hit, config.max_hits);
                }
                Ok(())
            })?;

            if flow.is_break() {
                termination = Termination::HitLimit;
                break;
            }
        }

        writer.finish()?;

        let hits = detector.hits();
        status.progress(hits, config.max_hits);
        status.finish();

        let summary =
            SearchSummary { hits, pairs_visited, termination, elapsed: started.elapsed() };
        info!(
            hits = summary.hits,
            pairs_visited = summary.pairs_visited,
            termination = ?summary.termination,
            elapsed = ?summary.elapsed,
            "search finished"
        );

        Ok(summary)
    }

    /// Runs the search and collects every hit in memory.
    ///
    /// Intended for small bounds; the hit budget still applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the power table cannot be built.
    pub fn solutions(&self) -> Result<Vec<Solution>> {
        let powers = PowerTable::new(self.config.exponent, self.config.bound)?;
        let mut detector = CoincidenceDetector::new(self.config.max_hits);
        let mut found = Vec::new();

        for node in OrderedSumStream::new(&powers) {
            let flow = detector.observe(&node, |solution, _| {
                found.push(*solution);
                Ok(())
            })?;

            if flow.is_break() {
                break;
            }
        }

        Ok(found)
    }
}
