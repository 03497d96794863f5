use std::fmt;

use thiserror::Error;

/// Default GC-content bound, in percent.
pub const DEFAULT_GC: Bound = Bound::new(0.0, 100.0);

/// Default length bound: anything up to 2^32 bases.
pub const DEFAULT_LENGTH: Bound = Bound::new(0.0, 4_294_967_296.0);

/// How a value is compared against the ends of a [`Bound`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BoundPolicy {
    /// Accept `low <= x <= high`.
    #[default]
    Inclusive,

    /// Reject when `low >= x` or `x >= high`. This is the comparison used by earlier
    /// versions of the file filter.
    Exclusive,
}

/// A closed interval `[low, high]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bound {
    pub low: f64,
    pub high: f64,
}

impl Bound {
    pub const fn new(low: f64, high: f64) -> Self {
        Bound { low, high }
    }

    /// The interval `[0, high]`.
    pub const fn upper(high: f64) -> Self {
        Bound { low: 0.0, high }
    }

    pub fn contains(&self, v: f64, policy: BoundPolicy) -> bool {
        match policy {
            BoundPolicy::Inclusive => (self.low <= v) && (v <= self.high),
            BoundPolicy::Exclusive => (self.low < v) && (v < self.high),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// A bound as supplied by a user: either a single upper bound, or a `(low, high)` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoundSpec {
    Scalar(u64),
    Pair(u64, u64),
}

impl BoundSpec {
    /// Converts into a [`Bound`]. A scalar `v` is always the upper bound, giving `(0, v)`.
    pub fn normalize(self) -> Bound {
        match self {
            BoundSpec::Scalar(v) => Bound::upper(v as f64),
            BoundSpec::Pair(low, high) => Bound::new(low as f64, high as f64),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, BoundSpec::Scalar(_))
    }
}

impl From<u64> for BoundSpec {
    fn from(v: u64) -> Self {
        BoundSpec::Scalar(v)
    }
}

impl From<(u64, u64)> for BoundSpec {
    fn from((low, high): (u64, u64)) -> Self {
        BoundSpec::Pair(low, high)
    }
}

impl fmt::Display for BoundSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundSpec::Scalar(v) => write!(f, "{v}"),
            BoundSpec::Pair(low, high) => write!(f, "({low}, {high})"),
        }
    }
}

/// Error produced when a bound argument is neither an integer nor an integer pair.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid bound format: {0}")]
pub struct InvalidBoundFormat(String);

impl<'a> TryFrom<&'a str> for BoundSpec {
    type Error = InvalidBoundFormat;

    fn try_from(arg: &'a str) -> Result<BoundSpec, Self::Error> {
        let parts: Vec<&str> = arg.split(',').map(str::trim).collect();

        let parse = |s: &str, which: &str| {
            s.parse::<u64>().map_err(|_| {
                InvalidBoundFormat(format!(
                    "invalid {which} value: '{s}' (should be a non-negative integer)"
                ))
            })
        };

        match parts[..] {
            [high] => Ok(BoundSpec::Scalar(parse(high, "upper")?)),
            [low, high] => {
                let low = parse(low, "lower")?;
                let high = parse(high, "upper")?;
                if low > high {
                    return Err(InvalidBoundFormat(format!(
                        "lower bound {low} is greater than upper bound {high}"
                    )));
                }
                Ok(BoundSpec::Pair(low, high))
            }
            _ => Err(InvalidBoundFormat(indoc::formatdoc! {"
            Expected format '<max>' or '<min>,<max>', got '{arg}'. For example:
              --lenb 50
              --lenb 0,50
              --gc 20,80
            "})),
        }
    }
}
