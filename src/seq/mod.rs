pub mod dna;
pub mod sequence;

pub use self::sequence::{BasicReport, Kind, Sequence, SequenceError};
