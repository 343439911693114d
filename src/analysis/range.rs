use std::fmt;
use std::ops::{Add, Neg};
use std::str::FromStr;
use thiserror::Error;

/// Lower sentinel, absorbing under addition. It is `-POS_INF` rather than
/// `i64::MIN` so negation is exact on every bound; `i64::MIN` clamps to it.
pub const NEG_INF: i64 = -i64::MAX;
/// Upper sentinel, absorbing under addition and negation.
pub const POS_INF: i64 = i64::MAX;

/// A closed interval of integers. `start <= end` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: i64,
    pub end: i64,
}

/// Any possible integer.
pub const UNDEF: Range = Range {
    start: NEG_INF,
    end: POS_INF,
};

impl Range {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub const fn constant(value: i64) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.start == self.end
    }

    pub fn is_undef(&self) -> bool {
        *self == UNDEF
    }

    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn hull(self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn intersect(self, other: Range) -> Option<Range> {
        if self.end < other.start || other.end < self.start {
            return None;
        }
        Some(Range {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Exact set difference. A range strictly inside `self` splits it in two.
    pub fn subtract(self, other: Range) -> Vec<Range> {
        if self.start < other.start && other.end < self.end {
            return vec![
                Range::new(self.start, other.start - 1),
                Range::new(other.end + 1, self.end),
            ];
        }
        if other.contains_range(&self) {
            return Vec::new();
        }
        if self.intersect(other).is_none() {
            return vec![self];
        }
        let trimmed = if self.start < other.start {
            Range::new(self.start, other.start - 1)
        } else {
            Range::new(other.end + 1, self.end)
        };
        assert!(
            trimmed.start <= trimmed.end,
            "subtracting {other} from {self} produced an inverted range"
        );
        vec![trimmed]
    }

    /// Adds a finite offset to both bounds, leaving infinite bounds alone.
    pub fn shift(self, delta: i64) -> Range {
        self + Range::constant(delta)
    }
}

fn negate_bound(bound: i64) -> i64 {
    -bound.max(NEG_INF)
}

fn add_bound(a: i64, b: i64, absorbing: i64) -> i64 {
    if a == absorbing || b == absorbing {
        return absorbing;
    }
    let other = if absorbing == NEG_INF { POS_INF } else { NEG_INF };
    if a == other || b == other {
        return other;
    }
    a.saturating_add(b).max(NEG_INF)
}

impl Neg for Range {
    type Output = Range;

    fn neg(self) -> Range {
        Range {
            start: negate_bound(self.end),
            end: negate_bound(self.start),
        }
    }
}

impl Add for Range {
    type Output = Range;

    fn add(self, other: Range) -> Range {
        Range {
            start: add_bound(self.start, other.start, NEG_INF),
            end: add_bound(self.end, other.end, POS_INF),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undef() {
            return write!(f, "any");
        }
        if self.is_constant() {
            return write!(f, "{}", self.start);
        }
        if self.start == NEG_INF {
            write!(f, "(-∞, ")?;
        } else {
            write!(f, "[{}, ", self.start)?;
        }
        if self.end == POS_INF {
            write!(f, "∞)")
        } else {
            write!(f, "{}]", self.end)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid range `{input}`: expected `any`, `n`, `a..b`, `a..` or `..b`")]
pub struct RangeParseError {
    pub input: String,
}

impl FromStr for Range {
    type Err = RangeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        let invalid = || RangeParseError {
            input: input.to_string(),
        };
        if text == "any" {
            return Ok(UNDEF);
        }
        let Some((lo, hi)) = text.split_once("..") else {
            return text
                .parse::<i64>()
                .map(|value| Range::constant(value.max(NEG_INF)))
                .map_err(|_| invalid());
        };
        let bound = |part: &str, open: i64| -> Result<i64, RangeParseError> {
            let part = part.trim();
            if part.is_empty() {
                Ok(open)
            } else {
                part.parse::<i64>()
                    .map(|value| value.max(NEG_INF))
                    .map_err(|_| invalid())
            }
        };
        let range = Range::new(bound(lo, NEG_INF)?, bound(hi, POS_INF)?);
        if range.start > range.end {
            return Err(invalid());
        }
        Ok(range)
    }
}
