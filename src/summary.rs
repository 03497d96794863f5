use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::filter::{Criterion, Verdict};

/// Pass/fail counts of a filtering run, along with where and when it ran.
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub fqsieve_version: String,
    pub input_path: String,
    pub output_path: String,
    pub run_date: String,
    pub elapsed: f64,
    pub read_count: usize,
    pub passed: usize,
    pub failed_quality: usize,
    pub failed_gc: usize,
    pub failed_length: usize,
    /// Reads that could not be evaluated, e.g. because they were empty.
    pub skipped: usize,
}

impl FilterSummary {
    /// Counts one evaluated read.
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accept => self.passed += 1,
            Verdict::Reject(Criterion::Quality) => self.failed_quality += 1,
            Verdict::Reject(Criterion::Gc) => self.failed_gc += 1,
            Verdict::Reject(Criterion::Length) => self.failed_length += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.failed_quality + self.failed_gc + self.failed_length
    }

    /// Stamps the summary with the version and the current time.
    pub fn stamp(&mut self) {
        self.fqsieve_version = crate::cli::VERSION.to_string();
        self.run_date = format!("{:?}", chrono::offset::Local::now());
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &str) -> Result<()> {
        info!("Writing summary to {path}");
        let file = File::create(path).with_context(|| format!("Unable to create {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Could not serialize summary")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_criterion() {
        let mut summary = FilterSummary::default();
        summary.add(Verdict::Accept);
        summary.add(Verdict::Reject(Criterion::Gc));
        summary.add(Verdict::Reject(Criterion::Gc));
        summary.add(Verdict::Reject(Criterion::Length));

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed_gc, 2);
        assert_eq!(summary.failed_quality, 0);
        assert_eq!(summary.rejected(), 3);
    }

    #[test]
    fn serializes_counts() {
        let summary = FilterSummary {
            read_count: 3,
            passed: 2,
            skipped: 1,
            ..FilterSummary::default()
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["read_count"], 3);
        assert_eq!(value["passed"], 2);
        assert_eq!(value["skipped"], 1);
    }
}
