//! Re-checking a results file.
//!
//! Every line is parsed back into a [`Solution`] and both of its pairs are
//! recomputed against a power table. Parse failures are hard errors; records
//! that parse but do not hold are collected in the report.

use crate::detector::Solution;
use crate::powers::PowerTable;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::BufRead;
use std::str::FromStr;

/// Outcome of [`verify_results`]
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Records read
    pub total: u64,

    /// Records that satisfy the equation
    pub valid: u64,

    /// Line number (1-based) and record of every failed check
    pub invalid: Vec<(u64, Solution)>,

    /// Distinct sums among valid records
    pub sums: BTreeSet<u128>,
}

impl VerifyReport {
    /// True if every record checked out
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

fn parse_field<T: FromStr>(field: &str) -> Result<T> {
    if field.is_empty() {
        anyhow::bail!("Empty field");
    }

    if !field.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Non-digit characters in field {field:?}");
    }

    if field.len() > 1 && field.starts_with('0') {
        anyhow::bail!("Leading zero in field {field:?}");
    }

    field.parse().map_err(|_| anyhow::anyhow!("Field {field:?} out of range"))
}

/// Parses one record line (without its trailing newline).
///
/// # Errors
///
/// Returns an error unless the line is exactly five unsigned decimal fields
/// with no leading zeros, separated by single spaces.
pub fn parse_record(line: &str) -> Result<Solution> {
    let fields: Vec<&str> = line.split(' ').collect();
    let [a, b, c, d, sum] = fields.as_slice() else {
        anyhow::bail!("Expected 5 fields, found {}", fields.len());
    };

    Ok(Solution {
        a: parse_field(a)?,
        b: parse_field(b)?,
        c: parse_field(c)?,
        d: parse_field(d)?,
        sum: parse_field(sum)?,
    })
}

/// Checks a single record against the table.
///
/// A record holds when both pairs lie in the triangular region bounded by
/// the table, are distinct, and both sum to the recorded value.
pub fn check_record(solution: &Solution, powers: &PowerTable) -> bool {
    let bound = powers.bound();
    let in_region = |a: u32, b: u32| b >= 1 && b <= a && a <= bound;

    in_region(solution.a, solution.b)
        && in_region(solution.c, solution.d)
        && (solution.a, solution.b) != (solution.c, solution.d)
        && powers.sum(solution.a, solution.b) == solution.sum
        && powers.sum(solution.c, solution.d) == solution.sum
}

/// Reads a results file and checks every record.
///
/// Lines are split on bare LF only. A CR before the LF, or a last line with
/// no LF at all, is a malformed record.
///
/// # Errors
///
/// Returns an error if reading fails or a line is malformed.
pub fn verify_results<R: BufRead>(mut reader: R, powers: &PowerTable) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();
    let mut line = Vec::new();
    let mut line_no = 0u64;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let Some(record) = line.strip_suffix(b"\n") else {
            anyhow::bail!("Line {line_no} is not terminated by a newline");
        };
        let text = std::str::from_utf8(record)
            .with_context(|| format!("Malformed record on line {line_no}"))?;
        let solution =
            parse_record(text).with_context(|| format!("Malformed record on line {line_no}"))?;

        report.total += 1;
        if check_record(&solution, powers) {
            report.valid += 1;
            report.sums.insert(solution.sum);
        } else {
            report.invalid.push((line_no, solution));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_record() {
        let s = parse_record("134 133 158 59 635318657").unwrap();
        assert_eq!(s, Solution { a: 134, b: 133, c: 158, d: 59, sum: 635_318_657 });
    }

    #[test]
    fn test_parse_record_rejects_bad_lines() {
        for line in [
            "",
            "1 2 3 4",
            "1 2 3 4 5 6",
            "1  2 3 4 5",
            "01 2 3 4 5",
            "1 2 3 4 -5",
            "1 2 3 4 5 ",
            "1\t2 3 4 5",
            "99999999999 1 1 1 2",
        ] {
            assert!(parse_record(line).is_err(), "accepted {line:?}");
        }
    }

    #[test]
    fn test_parse_wide_sum() {
        let s = parse_record("1 1 1 1 340282366920938463463374607431768211455").unwrap();
        assert_eq!(s.sum, u128::MAX);
    }

    #[test]
    fn test_verify_counts() {
        let table = PowerTable::new(4, 158).unwrap();
        let input = "134 133 158 59 635318657\n158 59 134 133 635318657\n134 133 158 58 635318657\n";

        let report = verify_results(Cursor::new(input), &table).unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].0, 3);
        assert_eq!(report.sums.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_check_record_region() {
        let table = PowerTable::new(2, 10).unwrap();

        assert!(check_record(&Solution { a: 5, b: 5, c: 7, d: 1, sum: 50 }, &table));
        // b > a
        assert!(!check_record(&Solution { a: 1, b: 7, c: 5, d: 5, sum: 50 }, &table));
        // identical pairs
        assert!(!check_record(&Solution { a: 5, b: 5, c: 5, d: 5, sum: 50 }, &table));
        // beyond the table
        assert!(!check_record(&Solution { a: 11, b: 2, c: 10, d: 5, sum: 125 }, &table));
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let table = PowerTable::new(2, 10).unwrap();
        let result = verify_results(Cursor::new("5 5 7 1 50\nnot a record\n"), &table);

        assert!(format!("{:#}", result.unwrap_err()).contains("line 2"));
    }

    #[test]
    fn test_crlf_line_endings_are_rejected() {
        let table = PowerTable::new(2, 10).unwrap();
        let result = verify_results(Cursor::new("5 5 7 1 50\r\n"), &table);

        assert!(format!("{:#}", result.unwrap_err()).contains("line 1"));
    }

    #[test]
    fn test_missing_final_newline_is_rejected() {
        let table = PowerTable::new(2, 10).unwrap();
        let result = verify_results(Cursor::new("5 5 7 1 50\n5 5 7 1 50"), &table);

        assert!(result.unwrap_err().to_string().contains("Line 2 is not terminated"));
    }

    #[test]
    fn test_empty_input() {
        let table = PowerTable::new(2, 10).unwrap();
        let report = verify_results(Cursor::new(""), &table).unwrap();

        assert_eq!(report.total, 0);
        assert!(report.is_clean());
    }
}
