//! Human-readable progress reporting.
//!
//! Status output is best effort: a failing terminal never aborts a search.

use std::io::{self, Stdout, Write};

/// Receiver of progress messages
pub trait StatusSink {
    /// One complete line of text
    fn message(&mut self, text: &str);

    /// Hit counter, rewritten in place (`max_hits` = 0 means unlimited)
    fn progress(&mut self, hits: u64, max_hits: u64);

    /// Called once when the search ends
    fn finish(&mut self);
}

/// Writes status lines to a terminal-like stream (stdout by default)
#[derive(Debug)]
pub struct ConsoleStatus<W: Write = Stdout> {
    out: W,
}

impl ConsoleStatus<Stdout> {
    /// Status on stdout
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleStatus<W> {
    /// Status on an arbitrary stream
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying stream
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusSink for ConsoleStatus<W> {
    fn message(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn progress(&mut self, hits: u64, max_hits: u64) {
        let _ = if max_hits > 0 {
            write!(self.out, "\r{hits}/{max_hits} hits found.")
        } else {
            write!(self.out, "\r{hits} hits found.")
        };
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

/// Discards all status output
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentStatus;

impl StatusSink for SilentStatus {
    fn message(&mut self, _text: &str) {}

    fn progress(&mut self, _hits: u64, _max_hits: u64) {}

    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_progress_rewrites_line() {
        let mut status = ConsoleStatus::new(Vec::new());
        status.message("Beginning search loop.");
        status.progress(0, 30);
        status.progress(10, 30);
        status.finish();

        let text = String::from_utf8(status.into_inner()).unwrap();
        assert_eq!(text, "Beginning search loop.\n\r0/30 hits found.\r10/30 hits found.\n");
    }

    #[test]
    fn test_console_progress_unlimited() {
        let mut status = ConsoleStatus::new(Vec::new());
        status.progress(42, 0);

        assert_eq!(String::from_utf8(status.into_inner()).unwrap(), "\r42 hits found.");
    }
}
