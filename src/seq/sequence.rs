use std::fmt;

use thiserror::Error;

use super::dna;

/// The family a [`Sequence`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Dna,
    Rna,
    AminoAcid,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Dna => f.write_str("DNA"),
            Kind::Rna => f.write_str("RNA"),
            Kind::AminoAcid => f.write_str("amino acid"),
        }
    }
}

/// A biological sequence, tagged by family. DNA and RNA are nucleic acids and are validated
/// against the nucleotide alphabet; amino acid sequences are accepted as-is.
///
/// Every transformation returns a new `Sequence`; the source is never modified.
///
/// The variants can be built directly, in which case nothing is checked until a
/// transformation runs. Use [`Sequence::dna`], [`Sequence::rna`] or [`Sequence::nucleic`]
/// to validate up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sequence {
    Dna(String),
    Rna(String),
    AminoAcid(String),
}

impl Sequence {
    /// Creates a validated DNA sequence.
    pub fn dna(s: impl Into<String>) -> Result<Self, SequenceError> {
        let seq = Sequence::Dna(s.into());
        seq.validate()?;
        Ok(seq)
    }

    /// Creates a validated RNA sequence.
    pub fn rna(s: impl Into<String>) -> Result<Self, SequenceError> {
        let seq = Sequence::Rna(s.into());
        seq.validate()?;
        Ok(seq)
    }

    pub fn amino_acid(s: impl Into<String>) -> Self {
        Sequence::AminoAcid(s.into())
    }

    /// Creates a validated nucleic acid, choosing RNA when the symbols contain a U and DNA
    /// otherwise.
    pub fn nucleic(s: impl Into<String>) -> Result<Self, SequenceError> {
        let s = s.into();
        if s.bytes().any(dna::is_uracil) {
            Self::rna(s)
        } else {
            Self::dna(s)
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Sequence::Dna(_) => Kind::Dna,
            Sequence::Rna(_) => Kind::Rna,
            Sequence::AminoAcid(_) => Kind::AminoAcid,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sequence::Dna(s) | Sequence::Rna(s) | Sequence::AminoAcid(s) => s,
        }
    }

    /// Number of symbols (characters, not bytes).
    pub fn len(&self) -> usize {
        self.as_str().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// The symbol at position `i`, if any.
    pub fn get(&self, i: usize) -> Option<char> {
        self.as_str().chars().nth(i)
    }

    pub fn is_nucleic(&self) -> bool {
        matches!(self, Sequence::Dna(_) | Sequence::Rna(_))
    }

    /// Checks the alphabet of a nucleic acid: every symbol must be one of `ACGTU` (either
    /// case) and T and U may not both be present. DNA may not contain U, and RNA may not
    /// contain T. Amino acid sequences always pass.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if !self.is_nucleic() {
            return Ok(());
        }

        let symbols = self.as_str().as_bytes();
        let invalid = |reason| SequenceError::InvalidAlphabet {
            sequence: self.as_str().to_string(),
            reason,
        };

        if symbols.is_empty() {
            return Err(invalid("sequence is empty"));
        }
        if !dna::nucleic_alphabet().is_word(symbols) {
            return Err(invalid("symbols must be one of A, C, G, T, U"));
        }
        let has_thymine = symbols.iter().any(|b| dna::is_thymine(*b));
        let has_uracil = symbols.iter().any(|b| dna::is_uracil(*b));
        if has_thymine && has_uracil {
            return Err(invalid("T and U cannot appear in the same sequence"));
        }

        match self {
            Sequence::Dna(_) if has_uracil => Err(invalid("DNA cannot contain U")),
            Sequence::Rna(_) if has_thymine => Err(invalid("RNA cannot contain T")),
            _ => Ok(()),
        }
    }

    /// Builds a sequence of the same family from new symbols.
    fn with_symbols(&self, s: String) -> Self {
        match self {
            Sequence::Dna(_) => Sequence::Dna(s),
            Sequence::Rna(_) => Sequence::Rna(s),
            Sequence::AminoAcid(_) => Sequence::AminoAcid(s),
        }
    }

    fn map_bases(&self, f: impl Fn(u8) -> u8) -> String {
        self.as_str().bytes().map(f).map(char::from).collect()
    }

    /// Complements every base, keeping case: A↔T, C↔G, and U→A. For RNA, A maps to U
    /// instead, so the complement of RNA is again RNA.
    pub fn complement(&self) -> Result<Self, SequenceError> {
        let bases = match self {
            Sequence::Dna(_) => self.map_bases(dna::complement),
            Sequence::Rna(_) => self.map_bases(dna::complement_rna),
            Sequence::AminoAcid(s) => {
                return Err(SequenceError::NotNucleicAcid {
                    kind: Kind::AminoAcid,
                    sequence: s.clone(),
                })
            }
        };
        self.validate()?;
        Ok(self.with_symbols(bases))
    }

    /// Reverses the symbol order. Nucleic acids are validated first.
    pub fn reverse(&self) -> Result<Self, SequenceError> {
        self.validate()?;
        Ok(self.with_symbols(self.as_str().chars().rev().collect()))
    }

    pub fn reverse_complement(&self) -> Result<Self, SequenceError> {
        self.complement()?.reverse()
    }

    /// Transcribes DNA into RNA by replacing T with U (and t with u).
    pub fn transcribe(&self) -> Result<Self, SequenceError> {
        let Sequence::Dna(_) = self else {
            return Err(SequenceError::NotDna {
                kind: self.kind(),
                sequence: self.as_str().to_string(),
            });
        };
        self.validate()?;
        Ok(Sequence::Rna(self.map_bases(dna::transcribe)))
    }

    /// Reports whether any basic residue (K, R or H, either case) is present in an amino
    /// acid sequence.
    pub fn is_basic(&self) -> Result<BasicReport, SequenceError> {
        let Sequence::AminoAcid(s) = self else {
            return Err(SequenceError::NotAminoAcid {
                kind: self.kind(),
                sequence: self.as_str().to_string(),
            });
        };

        let found = s
            .bytes()
            .any(|b| matches!(b, b'K' | b'R' | b'H' | b'k' | b'r' | b'h'));

        Ok(if found {
            BasicReport::Present
        } else {
            BasicReport::Absent
        })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The observation produced by [`Sequence::is_basic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicReport {
    Present,
    Absent,
}

impl fmt::Display for BasicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicReport::Present => f.write_str("There are basic amino acids here"),
            BasicReport::Absent => f.write_str("There are no basic amino acids here"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("`{sequence}` is not a valid nucleic acid: {reason}")]
    InvalidAlphabet {
        sequence: String,
        reason: &'static str,
    },

    #[error("{kind} sequence `{sequence}` is not a nucleic acid and has no complement")]
    NotNucleicAcid { kind: Kind, sequence: String },

    #[error("only DNA can be transcribed, but `{sequence}` is {kind}")]
    NotDna { kind: Kind, sequence: String },

    #[error("basic residues are only reported for amino acids, but `{sequence}` is {kind}")]
    NotAminoAcid { kind: Kind, sequence: String },
}
