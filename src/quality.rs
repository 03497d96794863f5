use thiserror::Error;

/// Offset of the Phred+33 encoding: `score = character_code - 33`.
pub const PHRED_OFFSET: u8 = 33;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QualityError {
    #[error("cannot take the mean of an empty quality string")]
    EmptyQuality,

    #[error("quality symbol {symbol:?} is below the Phred+33 offset")]
    BelowOffset { symbol: char },
}

/// Decodes a single Phred+33 symbol into its score.
#[inline]
pub fn decode_symbol(symbol: u8) -> Result<u8, QualityError> {
    symbol
        .checked_sub(PHRED_OFFSET)
        .ok_or(QualityError::BelowOffset {
            symbol: symbol as char,
        })
}

/// Decodes a Phred+33 quality string into numeric scores.
pub fn decode(qual: &[u8]) -> Result<Vec<u8>, QualityError> {
    qual.iter().map(|x| decode_symbol(*x)).collect()
}

/// Sum of the decoded scores.
pub fn total_quality(qual: &[u8]) -> Result<u64, QualityError> {
    qual.iter()
        .map(|x| decode_symbol(*x).map(u64::from))
        .sum()
}

/// Mean of the decoded scores.
///
/// # Errors
///
/// Returns [`QualityError::EmptyQuality`] if `qual` is empty, or
/// [`QualityError::BelowOffset`] if a symbol does not encode a score.
pub fn mean_quality(qual: &[u8]) -> Result<f64, QualityError> {
    if qual.is_empty() {
        return Err(QualityError::EmptyQuality);
    }
    Ok(total_quality(qual)? as f64 / qual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_phred33() {
        assert_eq!(decode(b"!+5?I~").unwrap(), vec![0, 10, 20, 30, 40, 93]);
    }

    #[test]
    fn total_and_mean() {
        assert_eq!(total_quality(b"II!!").unwrap(), 80);
        assert_eq!(mean_quality(b"II!!").unwrap(), 20.0);
        assert_eq!(total_quality(b"").unwrap(), 0);
    }

    #[test]
    fn empty_quality_has_no_mean() {
        assert_eq!(mean_quality(b""), Err(QualityError::EmptyQuality));
    }

    #[test]
    fn symbols_below_offset_are_rejected() {
        assert_eq!(
            decode(b"II "),
            Err(QualityError::BelowOffset { symbol: ' ' })
        );
        assert!(mean_quality(b"I\tI").is_err());
    }
}
