use std::fs::File;
use std::io::{BufReader, Read, Write};

use anyhow::Context;
use needletail::parser::{FastqReader, SequenceRecord};
use needletail::FastxReader;
use thiserror::Error;

use crate::quality::{self, QualityError};

/// A single read: identifier, bases and Phred+33 qualities of the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    seq: String,
    qual: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("read {id} has {seq_len} bases but {qual_len} quality scores")]
    LengthMismatch {
        id: String,
        seq_len: usize,
        qual_len: usize,
    },

    #[error("read {id} has no quality line")]
    MissingQuality { id: String },

    #[error("read {id} is not valid UTF-8")]
    Utf8 { id: String },
}

impl Record {
    /// Creates a record, checking that `seq` and `qual` have the same length.
    pub fn new(
        id: impl Into<String>,
        seq: impl Into<String>,
        qual: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let (id, seq, qual) = (id.into(), seq.into(), qual.into());

        if seq.len() != qual.len() {
            return Err(RecordError::LengthMismatch {
                id,
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }

        Ok(Record { id, seq, qual })
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    pub fn qual(&self) -> &str {
        &self.qual
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn phred_quality_total(&self) -> Result<u64, QualityError> {
        quality::total_quality(self.qual.as_bytes())
    }

    pub fn phred_quality_avg(&self) -> Result<f64, QualityError> {
        quality::mean_quality(self.qual.as_bytes())
    }
}

impl<'a> TryFrom<SequenceRecord<'a>> for Record {
    type Error = RecordError;

    fn try_from(rec: SequenceRecord<'a>) -> Result<Self, Self::Error> {
        let id = String::from_utf8_lossy(rec.id()).to_string();
        let Some(qual) = rec.qual() else {
            return Err(RecordError::MissingQuality { id });
        };

        let utf8 = |bytes: &[u8]| {
            String::from_utf8(bytes.to_vec()).map_err(|_| RecordError::Utf8 { id: id.clone() })
        };
        let seq = utf8(rec.raw_seq())?;
        let qual = utf8(qual)?;

        Record::new(id, seq, qual)
    }
}

/// Iterates over the records of a FASTQ stream.
///
/// # Returns
/// An iterator of Results. When an Error is encountered, the caller should stop immediately;
/// see `until_err`.
pub fn iter_records<R: Read + Send>(reader: R) -> impl Iterator<Item = anyhow::Result<Record>> {
    let mut fastq_reader = FastqReader::new(reader);

    std::iter::from_fn(move || {
        let rec = match fastq_reader.next()? {
            Ok(rec) => rec,
            Err(e) => return Some(Err(anyhow::Error::new(e).context("Malformed FASTQ input"))),
        };
        Some(Record::try_from(rec).map_err(anyhow::Error::from))
    })
}

/// Opens a FASTQ file and iterates over its records. See `iter_records`.
///
/// # Errors
///
/// This function will return an error if the file cannot be opened.
pub fn read_fastq(input: &str) -> anyhow::Result<impl Iterator<Item = anyhow::Result<Record>>> {
    let file = File::open(input).with_context(|| format!("Unable to open file {input}"))?;
    Ok(iter_records(BufReader::new(file)))
}

/// Utility function to extract the error from an iterator and stop iteration immediately. Useful
/// for iterators which yield a Result<T>.
///
/// # Returns
///
/// This function returns an `Option<T>`. If the item is `Ok`, it returns `Some(T)`.
/// If the item is `Err`, it updates `err` with the error and returns `None`.
pub fn until_err<T>(err: &mut &mut anyhow::Result<()>, item: anyhow::Result<T>) -> Option<T> {
    match item {
        Ok(item) => Some(item),
        Err(e) => {
            **err = Err(e);
            None
        }
    }
}

/// Writes a record as a four-line FASTQ entry.
///
/// # Arguments
///
/// * `writer` - Any `std::io::Write`. Since this is `std::io::Write` and *not*
///   `std::fmt::Write`, this does not accept Strings; use a `std::io::Cursor` instead.
/// * `record` - The record to write.
pub fn write_read(writer: &mut impl Write, record: &Record) -> std::io::Result<()> {
    writeln!(writer, "@{}\n{}\n+\n{}", record.id, record.seq, record.qual)
}
