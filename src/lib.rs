//! # csvtool-rs
//!
//! Extract, reorder and rename columns of a CSV stream, keeping only the
//! lines picked out by a compact range language.
//!
//! ## Overview
//!
//! - **Range expressions**: `"-4,6,8,10-"` style lists of positions,
//!   normalised into sorted, disjoint intervals ([`IntervalSet`])
//! - **Range filters**: lazy, restartable filtering of any sequence by
//!   element position ([`RangeFilter`])
//! - **Extraction**: the CSV workflow built on both ([`extract`])
//!
//! ## Example
//!
//! ```
//! use csvtool_rs::RangeFilter;
//!
//! let lines = ["header", "a", "b", "c", "d"];
//! let kept: Vec<&str> = RangeFilter::new(lines, "0,2-3", false)
//!     .unwrap()
//!     .into_iter()
//!     .collect();
//!
//! assert_eq!(kept, vec!["header", "b", "c"]);
//! ```

pub mod columns;
pub mod error;
pub mod extract;
pub mod filter;
pub mod input;
pub mod range;

pub use columns::{Column, ColumnSpec, Projection};
pub use error::{ExtractError, RangeError};
pub use extract::{ExtractOptions, ExtractSummary, extract};
pub use filter::{RangeFilter, RangeIter, RangeSource};
pub use input::{FilteredLines, Lines};
pub use range::{Bound, Interval, IntervalSet, Positions, normalize};
