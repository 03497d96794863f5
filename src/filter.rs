use std::fmt;

use thiserror::Error;

use crate::bound::{Bound, BoundPolicy, DEFAULT_GC, DEFAULT_LENGTH};
use crate::io::Record;
use crate::quality::QualityError;
use crate::seq::dna;

/// Normalized filter settings. The defaults accept every read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterOpts {
    /// Minimum mean Phred quality.
    pub quality: f64,
    /// Allowed GC content, in percent.
    pub gc: Bound,
    /// Allowed read length.
    pub len: Bound,
    pub policy: BoundPolicy,
}

impl Default for FilterOpts {
    fn default() -> Self {
        FilterOpts {
            quality: 0.0,
            gc: DEFAULT_GC,
            len: DEFAULT_LENGTH,
            policy: BoundPolicy::Inclusive,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("read {id} has an empty sequence, so its GC content is undefined")]
    EmptySequence { id: String },

    #[error("read {id} has an empty quality string, so its mean quality is undefined")]
    EmptyQuality { id: String },

    #[error("read {id} has an invalid quality string")]
    Quality {
        id: String,
        #[source]
        source: QualityError,
    },

    #[error("read identifier {id} appears more than once")]
    DuplicateIdentifier { id: String },
}

/// The criterion a read was rejected on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
    Quality,
    Gc,
    Length,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Quality => f.write_str("quality"),
            Criterion::Gc => f.write_str("GC content"),
            Criterion::Length => f.write_str("length"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Criterion),
}

/// Accepts a read whose mean Phred quality is at least `threshold`.
pub fn quality_predicate(read: &Record, threshold: f64) -> Result<bool, FilterError> {
    let mean = read.phred_quality_avg().map_err(|e| match e {
        QualityError::EmptyQuality => FilterError::EmptyQuality {
            id: read.id.clone(),
        },
        source => FilterError::Quality {
            id: read.id.clone(),
            source,
        },
    })?;
    Ok(mean >= threshold)
}

/// Percentage of G and C bases in the read.
pub fn gc_percent(read: &Record) -> Result<f64, FilterError> {
    if read.is_empty() {
        return Err(FilterError::EmptySequence {
            id: read.id.clone(),
        });
    }
    let gc = dna::gc_count(read.seq().as_bytes());
    Ok(100.0 * gc as f64 / read.len() as f64)
}

pub fn gc_predicate(
    read: &Record,
    bound: &Bound,
    policy: BoundPolicy,
) -> Result<bool, FilterError> {
    Ok(bound.contains(gc_percent(read)?, policy))
}

pub fn length_predicate(read: &Record, bound: &Bound, policy: BoundPolicy) -> bool {
    bound.contains(read.len() as f64, policy)
}

/// Runs the quality, GC and length predicates in that order, stopping at the first one that
/// rejects the read.
pub fn check(read: &Record, opts: &FilterOpts) -> Result<Verdict, FilterError> {
    if !quality_predicate(read, opts.quality)? {
        return Ok(Verdict::Reject(Criterion::Quality));
    }
    if !gc_predicate(read, &opts.gc, opts.policy)? {
        return Ok(Verdict::Reject(Criterion::Gc));
    }
    if !length_predicate(read, &opts.len, opts.policy) {
        return Ok(Verdict::Reject(Criterion::Length));
    }
    Ok(Verdict::Accept)
}

pub fn filter(read: &Record, opts: &FilterOpts) -> Result<bool, FilterError> {
    Ok(check(read, opts)? == Verdict::Accept)
}
