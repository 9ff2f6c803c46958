//! The column-extraction workflow.
//!
//! Reads CSV from any `BufRead`, keeps only the physical lines selected by
//! the row filter (line 0 is the header line), projects each record onto
//! the requested columns and writes the result as CSV.
//!
//! ```
//! use csvtool_rs::{ColumnSpec, ExtractOptions, extract};
//!
//! let input = "id,name,dept\n1,Smith,Sales\n2,Jones,Eng\n";
//! let mut output = Vec::new();
//! let options = ExtractOptions::new(vec![ColumnSpec::Index(2), ColumnSpec::Index(1)]);
//!
//! let summary = extract(input.as_bytes(), &mut output, &options).unwrap();
//! assert_eq!(summary.rows_written, 2);
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "\"dept\",\"name\"\n\"Sales\",\"Smith\"\n\"Eng\",\"Jones\"\n"
//! );
//! ```

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, error, info, warn};

use crate::columns::{ColumnSpec, Projection};
use crate::error::ExtractError;
use crate::input::FilteredLines;
use crate::range::IntervalSet;

/// What to extract and how.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub columns: Vec<ColumnSpec>,
    /// Replacement header, one name per column.
    pub new_names: Option<Vec<String>>,
    /// Physical lines to keep (or drop, when `invert`).
    pub rows: IntervalSet,
    pub invert: bool,
    pub print_header: bool,
}

impl ExtractOptions {
    /// Keep every line, print the original names of `columns` as header.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            new_names: None,
            rows: IntervalSet::all(),
            invert: false,
            print_header: true,
        }
    }

    /// Check the options for consistency before any input is read.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.columns.is_empty() {
            return Err(ExtractError::NoColumns);
        }
        if let Some(names) = &self.new_names
            && names.len() != self.columns.len()
        {
            return Err(ExtractError::RenameCount {
                names: names.len(),
                columns: self.columns.len(),
            });
        }
        Ok(())
    }
}

/// Record counts and row-width diagnostics from one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractSummary {
    /// Data records read (the header is not counted).
    pub rows_read: usize,
    pub rows_written: usize,
    pub header_width: usize,
    /// Record width -> number of records of that width, header included.
    pub widths: BTreeMap<usize, usize>,
}

impl ExtractSummary {
    /// True when every record had the same width as the header.
    pub fn is_rectangular(&self) -> bool {
        self.widths.len() <= 1
    }
}

/// Run the extraction from `input` to `output`.
pub fn extract<R: BufRead, W: Write>(
    input: R,
    output: W,
    options: &ExtractOptions,
) -> Result<ExtractSummary, ExtractError> {
    options.validate()?;

    let lines = FilteredLines::new(input, options.rows.clone(), options.invert);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(lines);
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(output);

    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(ExtractError::MissingHeader);
    }
    let header = record.clone();

    let mut summary = ExtractSummary {
        header_width: header.len(),
        ..Default::default()
    };
    summary.widths.insert(header.len(), 1);
    info!("Header has {} columns", header.len());

    let projection = Projection::resolve(&options.columns, &header)?;
    let working: Vec<String> = projection
        .columns()
        .iter()
        .map(|c| format!("({:?}, {})", c.name, c.index))
        .collect();
    info!("Working on columns: [{}]", working.join(", "));

    if options.print_header {
        match &options.new_names {
            Some(names) => writer.write_record(names)?,
            None => writer.write_record(projection.names())?,
        }
    }

    let mut line = 0;
    while reader.read_record(&mut record)? {
        line += 1;
        summary.rows_read += 1;

        let width = record.len();
        *summary.widths.entry(width).or_insert(0) += 1;
        if width != summary.header_width {
            warn!(
                "Line {line} width ({width}) different to header width ({})",
                summary.header_width
            );
        }

        let Some(fields) = projection.project(&record) else {
            error!("Bounds error on line {line}");
            return Err(ExtractError::RowTooShort {
                line,
                width,
                index: projection.max_index(),
            });
        };
        writer.write_record(fields)?;
        summary.rows_written += 1;
    }
    writer.flush()?;

    debug!(
        "Read {} physical lines, wrote {} records",
        reader.get_ref().lines_read(),
        summary.rows_written
    );
    if !summary.is_rectangular() {
        warn!(
            "Line size histogram shows there were {} line lengths",
            summary.widths.len()
        );
    }

    Ok(summary)
}
