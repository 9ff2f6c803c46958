//! Positional filtering of an arbitrary sequence by an [`IntervalSet`].
//!
//! A [`RangeFilter`] pairs an input with a set of 0-based positions. Each
//! traversal walks the input and the covered positions side by side, so
//! nothing is buffered and infinite inputs work:
//!
//! ```
//! use csvtool_rs::RangeFilter;
//!
//! let filter = RangeFilter::new(0..10, "0,2-4,8-", false).unwrap();
//! assert_eq!(filter.iter().collect::<Vec<_>>(), vec![0, 2, 3, 4, 8, 9]);
//!
//! let inverted = RangeFilter::new(0..10, "0,2-4,8-", true).unwrap();
//! assert_eq!(inverted.iter().collect::<Vec<_>>(), vec![1, 5, 6, 7]);
//! ```

use crate::error::RangeError;
use crate::range::{IntervalSet, Positions};

/// Anything a filter can take its positions from: a parsed [`IntervalSet`]
/// or a range expression still to be normalised.
pub trait RangeSource {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError>;
}

impl RangeSource for IntervalSet {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError> {
        Ok(self)
    }
}

impl RangeSource for &IntervalSet {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError> {
        Ok(self.clone())
    }
}

impl RangeSource for &str {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError> {
        self.parse()
    }
}

impl RangeSource for String {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError> {
        self.parse()
    }
}

impl RangeSource for &String {
    fn into_interval_set(self) -> Result<IntervalSet, RangeError> {
        self.parse()
    }
}

/// An input sequence restricted to (or, inverted, excluding) the positions
/// in an [`IntervalSet`].
///
/// Traversals are independent: [`RangeFilter::iter`] starts again from
/// position 0 each time it is called.
#[derive(Debug, Clone)]
pub struct RangeFilter<I> {
    input: I,
    ranges: IntervalSet,
    invert: bool,
}

impl<I: IntoIterator> RangeFilter<I> {
    /// Build a filter, normalising `ranges` first if it is an expression.
    pub fn new(input: I, ranges: impl RangeSource, invert: bool) -> Result<Self, RangeError> {
        Ok(Self::from_set(input, ranges.into_interval_set()?, invert))
    }

    pub fn from_set(input: I, ranges: IntervalSet, invert: bool) -> Self {
        Self {
            input,
            ranges,
            invert,
        }
    }

    pub fn ranges(&self) -> &IntervalSet {
        &self.ranges
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Start a fresh traversal over a copy of the input.
    pub fn iter(&self) -> RangeIter<I::IntoIter>
    where
        I: Clone,
    {
        RangeIter::new(self.input.clone().into_iter(), &self.ranges, self.invert)
    }
}

impl<I: IntoIterator> IntoIterator for RangeFilter<I> {
    type Item = I::Item;
    type IntoIter = RangeIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        RangeIter::new(self.input.into_iter(), &self.ranges, self.invert)
    }
}

impl<I: IntoIterator + Clone> IntoIterator for &RangeFilter<I> {
    type Item = I::Item;
    type IntoIter = RangeIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One traversal of a [`RangeFilter`].
///
/// Holds two forward cursors: the position of the next input element and
/// the next covered position. Once the covered positions run out every
/// later element counts as uncovered, but the input is still drained to
/// its end.
#[derive(Debug, Clone)]
pub struct RangeIter<J> {
    input: J,
    covered: Positions,
    next_covered: Option<u64>,
    position: u64,
    invert: bool,
}

impl<J> RangeIter<J> {
    fn new(input: J, ranges: &IntervalSet, invert: bool) -> Self {
        let mut covered = ranges.positions();
        let next_covered = covered.next();
        Self {
            input,
            covered,
            next_covered,
            position: 0,
            invert,
        }
    }

    /// Number of input elements consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &J {
        &self.input
    }

    pub fn get_mut(&mut self) -> &mut J {
        &mut self.input
    }

    pub fn into_inner(self) -> J {
        self.input
    }
}

impl<J: Iterator> Iterator for RangeIter<J> {
    type Item = J::Item;

    fn next(&mut self) -> Option<J::Item> {
        loop {
            let item = self.input.next()?;
            let position = self.position;
            self.position += 1;

            let covered = self.next_covered == Some(position);
            if covered {
                self.next_covered = self.covered.next();
            }
            if covered != self.invert {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.input.size_hint().1)
    }
}
