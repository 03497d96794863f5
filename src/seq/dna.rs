use bio::alphabets::Alphabet;

/// Every symbol allowed in a nucleic acid sequence, in both cases.
pub const NUCLEIC_SYMBOLS: &[u8] = b"ACGTUacgtu";

/// Returns the `bio` alphabet over [`NUCLEIC_SYMBOLS`].
pub fn nucleic_alphabet() -> Alphabet {
    Alphabet::new(NUCLEIC_SYMBOLS)
}

#[inline(always)]
pub fn is_thymine(b: u8) -> bool {
    matches!(b, b'T' | b't')
}

#[inline(always)]
pub fn is_uracil(b: u8) -> bool {
    matches!(b, b'U' | b'u')
}

#[inline(always)]
pub fn is_gc(b: u8) -> bool {
    matches!(b, b'G' | b'g' | b'C' | b'c')
}

/// Complements a single base, keeping its case. U pairs with A, since a sequence never
/// holds both T and U.
#[inline(always)]
pub fn complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'a' => b't',
        b'T' => b'A',
        b't' => b'a',
        b'C' => b'G',
        b'c' => b'g',
        b'G' => b'C',
        b'g' => b'c',
        b'U' => b'A',
        b'u' => b'a',
        other => other,
    }
}

/// Same as [`complement`], except A pairs with U so that RNA stays RNA.
#[inline(always)]
pub fn complement_rna(b: u8) -> u8 {
    match b {
        b'A' => b'U',
        b'a' => b'u',
        other => complement(other),
    }
}

#[inline(always)]
pub fn transcribe(b: u8) -> u8 {
    match b {
        b'T' => b'U',
        b't' => b'u',
        other => other,
    }
}

/// Number of G and C bases (either case) in `seq`.
pub fn gc_count(seq: &[u8]) -> usize {
    seq.iter().filter(|b| is_gc(**b)).count()
}
