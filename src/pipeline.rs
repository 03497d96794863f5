//! The two filtering pipelines.
//!
//! * [`filter_batch`] works on an in-memory [`ReadBatch`]. A read that cannot be evaluated
//!   (for instance an empty read) aborts the whole batch.
//! * [`filter_stream`] and [`filter_fastq`] make a single pass over a record stream, writing
//!   accepted reads as they go. A read that cannot be evaluated is skipped and reported on
//!   the error channel of the [`Diagnostics`]; malformed input aborts the run.
//!
//! Both run the quality, GC and length predicates in that order and keep the input order.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::bound::{BoundPolicy, BoundSpec};
use crate::diagnostics::Diagnostics;
use crate::filter::{self, FilterError, FilterOpts};
use crate::io::{self, until_err, Record};
use crate::summary::FilterSummary;

/// Reads keyed by identifier, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadBatch {
    records: IndexMap<String, Record>,
}

impl ReadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a batch, failing on the first repeated identifier.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, FilterError> {
        let mut batch = ReadBatch::new();
        for record in records {
            batch.insert(record)?;
        }
        Ok(batch)
    }

    /// Adds a read. Identifiers must be unique within a batch.
    pub fn insert(&mut self, record: Record) -> Result<(), FilterError> {
        if self.records.contains_key(&record.id) {
            return Err(FilterError::DuplicateIdentifier { id: record.id });
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

/// Keeps the reads `pred` accepts, stopping at the first error.
fn retain<'a>(
    reads: impl IntoIterator<Item = &'a Record>,
    pred: impl Fn(&Record) -> Result<bool, FilterError>,
) -> Result<Vec<&'a Record>, FilterError> {
    reads
        .into_iter()
        .map(|r| pred(r).map(|keep| (r, keep)))
        .filter_map_ok(|(r, keep)| keep.then_some(r))
        .collect()
}

/// Filters a batch in three stages (quality, then GC, then length), each stage working on
/// the survivors of the previous one.
///
/// # Errors
///
/// Returns the first [`FilterError`] raised by a predicate; no partial result is produced.
pub fn filter_batch(batch: &ReadBatch, opts: &FilterOpts) -> Result<ReadBatch, FilterError> {
    let reads = retain(batch.iter(), |r| filter::quality_predicate(r, opts.quality))?;
    let reads = retain(reads, |r| filter::gc_predicate(r, &opts.gc, opts.policy))?;
    let reads = retain(reads, |r| Ok(filter::length_predicate(r, &opts.len, opts.policy)))?;

    Ok(ReadBatch {
        records: reads
            .into_iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect(),
    })
}

/// Filter settings as a user gives them: bounds may be a scalar or a pair, and the quality
/// threshold may be negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterSettings {
    pub gc: BoundSpec,
    pub len: BoundSpec,
    pub quality_threshold: i64,
    pub policy: BoundPolicy,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            gc: BoundSpec::Pair(0, 100),
            len: BoundSpec::Pair(0, 1 << 32),
            quality_threshold: 0,
            policy: BoundPolicy::Inclusive,
        }
    }
}

impl FilterSettings {
    /// Resolves the settings into [`FilterOpts`]. Scalar bounds become `(0, v)`, reported on
    /// the info channel. A negative quality threshold is clamped to 0 and reported on the
    /// error channel.
    pub fn normalize(&self, diagnostics: &mut Diagnostics) -> FilterOpts {
        let gc = self.gc.normalize();
        if self.gc.is_scalar() {
            diagnostics.info(format!(
                "gc_bounds={} interpreted as upper bound, using {gc}",
                self.gc
            ));
        }

        let len = self.len.normalize();
        if self.len.is_scalar() {
            diagnostics.info(format!(
                "length_bounds={} interpreted as upper bound, using {len}",
                self.len
            ));
        }

        let quality = if self.quality_threshold < 0 {
            diagnostics.error(format!(
                "quality_threshold={}, can't be lower than 0, change to 0",
                self.quality_threshold
            ));
            0
        } else {
            self.quality_threshold
        };

        FilterOpts {
            quality: quality as f64,
            gc,
            len,
            policy: self.policy,
        }
    }
}

/// Filters a stream of records in a single pass, writing accepted reads to `writer` in FASTQ
/// format.
///
/// # Errors
///
/// Stops at the first `Err` yielded by `records`, or at the first failed write. Reads that
/// fail evaluation do not stop the pass; they are skipped and reported.
pub fn filter_stream(
    records: impl Iterator<Item = Result<Record>>,
    writer: &mut impl Write,
    opts: &FilterOpts,
    diagnostics: &mut Diagnostics,
) -> Result<FilterSummary> {
    // Start with a placeholder error object. This will be mutated if there are errors during
    // iteration through the reads.
    let mut err = Ok(());
    let mut summary = FilterSummary::default();

    records
        .scan(&mut err, until_err)
        .try_for_each(|rec| -> Result<()> {
            summary.read_count += 1;

            if summary.read_count % 50000 == 0 {
                info!("Processed: {}", summary.read_count)
            }

            match filter::check(&rec, opts) {
                Ok(verdict) => {
                    match verdict {
                        filter::Verdict::Accept => io::write_read(writer, &rec)?,
                        filter::Verdict::Reject(criterion) => {
                            debug!("{} rejected on {criterion}", rec.id)
                        }
                    }
                    summary.add(verdict);
                }
                Err(e) => {
                    diagnostics.error(format!("skipping read: {e}"));
                    summary.skipped += 1;
                }
            }

            Ok(())
        })?;

    err?;
    Ok(summary)
}

/// Filters the FASTQ file at `input` into a new FASTQ file at `output`.
///
/// Both files are closed when this returns, whether or not it succeeds.
///
/// # Errors
///
/// This function will return an error if:
/// * `input` cannot be opened, or `output` cannot be created.
/// * `input` is not well-formed FASTQ.
/// * Writing to `output` fails.
pub fn filter_fastq(
    input: &str,
    output: &str,
    settings: &FilterSettings,
    diagnostics: &mut Diagnostics,
) -> Result<FilterSummary> {
    // time everything!
    let now = std::time::Instant::now();

    let opts = settings.normalize(diagnostics);
    debug!("Filtering with {opts:?}");

    let records = io::read_fastq(input)?;
    let file = File::create(output).with_context(|| format!("Unable to create file {output}"))?;
    let mut writer = BufWriter::new(file);

    let mut summary = filter_stream(records, &mut writer, &opts, diagnostics)
        .with_context(|| format!("Failed to filter {input}"))?;
    writer.flush()?;

    summary.stamp();
    summary.input_path = input.to_string();
    summary.output_path = output.to_string();
    summary.elapsed = now.elapsed().as_secs_f64();

    info!(
        "Stats: {} reads, {} passed, {} rejected, {} skipped, {:.1}s runtime",
        summary.read_count,
        summary.passed,
        summary.rejected(),
        summary.skipped,
        summary.elapsed,
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::diagnostics::MemorySink;
    use std::io::Cursor;

    fn read(id: &str, seq: &str, qual: &str) -> Record {
        Record::new(id, seq, qual).unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            read("long_gc", "GCGCGCGCGC", "IIIIIIIIII"),
            read("short_at", "ATAT", "IIII"),
            read("low_qual", "ACGTACGT", "!!!!!!!!"),
            read("mid", "ACGTAC", "555555"),
        ]
    }

    fn ids(batch: &ReadBatch) -> Vec<&str> {
        batch.ids().collect()
    }

    fn diagnostics() -> (Diagnostics, MemorySink, MemorySink) {
        let info = MemorySink::new();
        let error = MemorySink::new();
        (Diagnostics::new(info.clone(), error.clone()), info, error)
    }

    #[test]
    fn duplicate_identifiers_are_reported() {
        let mut batch = ReadBatch::new();
        batch.insert(read("a", "A", "I")).unwrap();
        assert_eq!(
            batch.insert(read("a", "C", "I")),
            Err(FilterError::DuplicateIdentifier { id: "a".into() })
        );
        assert_eq!(batch.get("a").unwrap().seq(), "A");
    }

    #[test]
    fn default_batch_filter_keeps_everything_in_order() {
        let batch = ReadBatch::from_records(sample()).unwrap();
        let out = filter_batch(&batch, &FilterOpts::default()).unwrap();
        assert_eq!(out, batch);
        assert_eq!(ids(&out), vec!["long_gc", "short_at", "low_qual", "mid"]);
    }

    #[test]
    fn batch_filter_is_conjunctive() {
        let batch = ReadBatch::from_records(sample()).unwrap();
        let opts = FilterOpts {
            quality: 10.0,
            gc: Bound::new(0.0, 60.0),
            len: Bound::new(5.0, 100.0),
            ..FilterOpts::default()
        };

        let out = filter_batch(&batch, &opts).unwrap();
        assert_eq!(ids(&out), vec!["mid"]);

        // every survivor passes every predicate, and every passing read survives
        for r in batch.iter() {
            let passes = filter::quality_predicate(r, opts.quality).unwrap()
                && filter::gc_predicate(r, &opts.gc, opts.policy).unwrap()
                && filter::length_predicate(r, &opts.len, opts.policy);
            assert_eq!(passes, out.get(&r.id).is_some(), "{}", r.id);
        }

        // relaxing one predicate never lets in a read rejected by the others
        let relaxed = filter_batch(
            &batch,
            &FilterOpts {
                quality: 0.0,
                ..opts
            },
        )
        .unwrap();
        assert_eq!(ids(&relaxed), vec!["low_qual", "mid"]);
    }

    #[test]
    fn batch_filter_excludes_all() {
        let batch = ReadBatch::from_records(sample()).unwrap();
        let opts = FilterOpts {
            len: BoundSpec::from(1).normalize(),
            ..FilterOpts::default()
        };
        assert!(filter_batch(&batch, &opts).unwrap().is_empty());
    }

    #[test]
    fn empty_read_aborts_batch() {
        let batch = ReadBatch::from_records(vec![read("ok", "ACGT", "IIII"), read("empty", "", "")])
            .unwrap();
        assert_eq!(
            filter_batch(&batch, &FilterOpts::default()),
            Err(FilterError::EmptyQuality { id: "empty".into() })
        );
    }

    #[test]
    fn normalize_reports_scalars_and_clamps() {
        let (mut diag, info, error) = diagnostics();
        let settings = FilterSettings {
            gc: BoundSpec::Scalar(50),
            quality_threshold: -11,
            ..FilterSettings::default()
        };

        let opts = settings.normalize(&mut diag);
        assert_eq!(opts.quality, 0.0);
        assert_eq!(opts.gc, Bound::new(0.0, 50.0));
        assert_eq!(
            info.lines(),
            vec!["INFO - gc_bounds=50 interpreted as upper bound, using (0, 50)"]
        );
        assert_eq!(
            error.lines(),
            vec!["ERROR - quality_threshold=-11, can't be lower than 0, change to 0"]
        );
    }

    #[test]
    fn default_settings_normalize_to_default_opts() {
        let (mut diag, info, error) = diagnostics();
        assert_eq!(
            FilterSettings::default().normalize(&mut diag),
            FilterOpts::default()
        );
        assert!(info.lines().is_empty());
        assert!(error.lines().is_empty());
    }

    #[test]
    fn stream_writes_accepted_reads() {
        let (mut diag, _, _) = diagnostics();
        let opts = FilterOpts {
            len: Bound::upper(6.0),
            ..FilterOpts::default()
        };
        let mut out = Cursor::new(Vec::new());

        let summary =
            filter_stream(sample().into_iter().map(Ok), &mut out, &opts, &mut diag).unwrap();

        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "@short_at\nATAT\n+\nIIII\n@mid\nACGTAC\n+\n555555\n"
        );
        assert_eq!(summary.read_count, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed_length, 2);
    }

    #[test]
    fn stream_skips_unevaluable_reads() {
        let (mut diag, _, error) = diagnostics();
        let records = vec![read("empty", "", ""), read("ok", "ACGT", "IIII")];
        let mut out = Cursor::new(Vec::new());

        let summary = filter_stream(
            records.into_iter().map(Ok),
            &mut out,
            &FilterOpts::default(),
            &mut diag,
        )
        .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "@ok\nACGT\n+\nIIII\n"
        );
        let lines = error.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ERROR - skipping read: read empty"));
    }

    #[test]
    fn stream_stops_on_input_error() {
        let (mut diag, _, _) = diagnostics();
        let records = vec![
            Ok(read("a", "ACGT", "IIII")),
            Err(anyhow::anyhow!("malformed")),
            Ok(read("b", "ACGT", "IIII")),
        ];
        let mut out = Cursor::new(Vec::new());

        let result = filter_stream(
            records.into_iter(),
            &mut out,
            &FilterOpts::default(),
            &mut diag,
        );
        assert!(result.is_err());
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "@a\nACGT\n+\nIIII\n"
        );
    }

    #[test]
    fn exclusive_policy_drops_boundary_reads() {
        let (mut diag, _, _) = diagnostics();
        let settings = FilterSettings {
            policy: BoundPolicy::Exclusive,
            ..FilterSettings::default()
        };
        let opts = settings.normalize(&mut diag);
        let mut out = Cursor::new(Vec::new());

        // short_at has 0% GC and long_gc 100% GC, which sit on the ends of (0, 100)
        let summary =
            filter_stream(sample().into_iter().map(Ok), &mut out, &opts, &mut diag).unwrap();
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed_gc, 2);
    }
}
