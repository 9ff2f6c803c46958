//! Range expressions and the normalised interval sets they describe.
//!
//! A range expression is a comma-separated list of atoms:
//!
//! ```text
//! -       everything
//! N       the single position N
//! -N      0 through N
//! N-      N through the upper bound (unbounded by default)
//! A-B     A through B
//! ```
//!
//! Empty atoms are ignored, so `"1,,3,"` is the same as `"1,3"`.
//! Normalisation sorts the atoms and merges every pair that overlaps or
//! touches, leaving the smallest sorted list of disjoint intervals that
//! covers the same positions.
//!
//! ```
//! use csvtool_rs::{Bound, Interval, IntervalSet};
//!
//! let set: IntervalSet = "-4,6-8,7-11,10-".parse().unwrap();
//! assert_eq!(
//!     set.intervals(),
//!     &[Interval::new(0, Bound::At(4)), Interval::new(6, Bound::Unbounded)]
//! );
//! assert_eq!(set.to_string(), "0-4,6-");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RangeError;

/// Upper end of an interval.
///
/// `Unbounded` orders after every finite bound, so sorting intervals by
/// `(lower, upper)` needs no sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    At(u64),
    Unbounded,
}

impl Bound {
    /// Whether `value` is at or below this bound.
    pub fn admits(self, value: u64) -> bool {
        match self {
            Bound::At(upper) => value <= upper,
            Bound::Unbounded => true,
        }
    }
}

/// Closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub lower: u64,
    pub upper: Bound,
}

impl Interval {
    pub fn new(lower: u64, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// Single-position interval `[n, n]`.
    pub fn point(n: u64) -> Self {
        Self::new(n, Bound::At(n))
    }

    pub fn contains(&self, value: u64) -> bool {
        self.lower <= value && self.upper.admits(value)
    }

    /// True when `later` (which sorts after `self`) overlaps `self` or starts
    /// immediately after it.
    fn touches(&self, later: &Interval) -> bool {
        match self.upper {
            Bound::At(upper) => later.lower <= upper.saturating_add(1),
            Bound::Unbounded => true,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Bound::At(upper) if upper == self.lower => write!(f, "{}", self.lower),
            Bound::At(upper) => write!(f, "{}-{}", self.lower, upper),
            Bound::Unbounded => write!(f, "{}-", self.lower),
        }
    }
}

/// Sorted, disjoint, non-adjacent intervals.
///
/// Built only by [`normalize`] (or parsing), never mutated afterwards.
/// Clones share storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IntervalSet {
    intervals: Arc<[Interval]>,
}

impl IntervalSet {
    /// The set covering nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The set covering every position, i.e. `"-"`.
    pub fn all() -> Self {
        Self {
            intervals: Arc::from([Interval::new(0, Bound::Unbounded)]),
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of intervals (not positions).
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn contains(&self, value: u64) -> bool {
        let idx = self.intervals.partition_point(|i| i.lower <= value);
        idx > 0 && self.intervals[idx - 1].contains(value)
    }

    /// Ascending cursor over every covered position.
    pub fn positions(&self) -> Positions {
        Positions {
            intervals: Arc::clone(&self.intervals),
            index: 0,
            cursor: None,
        }
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for IntervalSet {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s, Bound::Unbounded)
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{interval}")?;
        }
        Ok(())
    }
}

/// Iterator over the positions covered by an [`IntervalSet`], ascending.
///
/// An unbounded last interval runs on to `u64::MAX`.
#[derive(Debug, Clone)]
pub struct Positions {
    intervals: Arc<[Interval]>,
    index: usize,
    cursor: Option<u64>,
}

impl Iterator for Positions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let interval = *self.intervals.get(self.index)?;
        let value = self.cursor.unwrap_or(interval.lower);

        let last = match interval.upper {
            Bound::At(upper) => value >= upper,
            Bound::Unbounded => value == u64::MAX,
        };
        if last {
            self.index += 1;
            self.cursor = None;
        } else {
            self.cursor = Some(value + 1);
        }

        Some(value)
    }
}

/// Parse a range expression into a normalised [`IntervalSet`].
///
/// `upper` is used for atoms with an open upper end (`N-` and `-`).
pub fn normalize(expr: &str, upper: Bound) -> Result<IntervalSet, RangeError> {
    let mut candidates = expr
        .split(',')
        .filter_map(|atom| parse_atom(atom, upper).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    candidates.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(candidates.len());
    for next in candidates {
        match merged.last_mut() {
            Some(current) if current.touches(&next) => {
                current.upper = current.upper.max(next.upper);
            }
            _ => merged.push(next),
        }
    }

    Ok(IntervalSet {
        intervals: merged.into(),
    })
}

/// Parse one atom. `Ok(None)` for an atom covering nothing: an empty atom,
/// a descending `A-B`, or `N-` with `N` past the open upper bound.
fn parse_atom(atom: &str, open_upper: Bound) -> Result<Option<Interval>, RangeError> {
    let atom = atom.trim();
    let parts: Vec<&str> = atom.split('-').map(str::trim).collect();

    let interval = match parts.as_slice() {
        [""] => return Ok(None),
        [single] => Interval::point(parse_bound(atom, single)?),
        [lower, upper] => {
            let lower = if lower.is_empty() {
                0
            } else {
                parse_bound(atom, lower)?
            };
            let upper = if upper.is_empty() {
                open_upper
            } else {
                Bound::At(parse_bound(atom, upper)?)
            };
            if !upper.admits(lower) {
                return Ok(None);
            }
            Interval::new(lower, upper)
        }
        _ => {
            return Err(RangeError::TooManyParts {
                atom: atom.to_string(),
                parts: parts.len(),
            });
        }
    };

    Ok(Some(interval))
}

fn parse_bound(atom: &str, bound: &str) -> Result<u64, RangeError> {
    bound.parse().map_err(|_| RangeError::InvalidBound {
        atom: atom.to_string(),
        bound: bound.to_string(),
    })
}
