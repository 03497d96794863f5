use crate::seq::{BasicReport, Sequence, SequenceError};

/// Transformations available on nucleic acid sequences.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// DNA to RNA: T becomes U
    Transcribe,

    /// Reverse the order of the bases
    Reverse,

    /// Complement every base
    Complement,

    /// Reverse, then complement
    ReverseComplement,
}

impl Operation {
    pub fn apply(self, seq: &Sequence) -> Result<Sequence, SequenceError> {
        match self {
            Operation::Transcribe => seq.transcribe(),
            Operation::Reverse => seq.reverse(),
            Operation::Complement => seq.complement(),
            Operation::ReverseComplement => seq.reverse_complement(),
        }
    }
}

/// Applies `op` to every sequence. All sequences are validated as nucleic acids before any
/// of them is transformed.
pub fn run<S: AsRef<str>>(
    op: Operation,
    sequences: &[S],
) -> Result<Vec<Sequence>, SequenceError> {
    let sequences = sequences
        .iter()
        .map(|s| Sequence::nucleic(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    sequences.iter().map(|s| op.apply(s)).collect()
}

/// Reports on the basic residues of each amino acid sequence.
pub fn basic_reports<S: AsRef<str>>(sequences: &[S]) -> Result<Vec<BasicReport>, SequenceError> {
    sequences
        .iter()
        .map(|s| Sequence::amino_acid(s.as_ref()).is_basic())
        .collect()
}
