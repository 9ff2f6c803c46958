//! Physical-line input for the extraction workflow.
//!
//! Row filters count physical lines, not CSV records, so the input is first
//! split into raw lines, passed through a [`RangeFilter`], and then handed
//! back to the CSV reader as a byte stream.

use std::io::{self, BufRead, Read};

use crate::filter::{RangeFilter, RangeIter};
use crate::range::IntervalSet;

/// Raw lines of a reader, each including its terminating `\n` (if any).
///
/// Stops at the first read error and keeps it for [`Lines::take_error`].
#[derive(Debug)]
pub struct Lines<R> {
    reader: R,
    error: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            error: None,
            done: false,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(line),
            Err(e) => {
                self.done = true;
                self.error = Some(e);
                None
            }
        }
    }
}

/// `Read` adapter yielding only the selected lines of `reader`.
pub struct FilteredLines<R> {
    lines: RangeIter<Lines<R>>,
    current: Vec<u8>,
    offset: usize,
}

impl<R: BufRead> FilteredLines<R> {
    pub fn new(reader: R, rows: IntervalSet, invert: bool) -> Self {
        let lines = RangeFilter::from_set(Lines::new(reader), rows, invert).into_iter();
        Self {
            lines,
            current: Vec::new(),
            offset: 0,
        }
    }

    /// Physical lines consumed from the underlying reader so far.
    pub fn lines_read(&self) -> u64 {
        self.lines.position()
    }
}

impl<R: BufRead> Read for FilteredLines<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.offset == self.current.len() {
            match self.lines.next() {
                Some(line) => {
                    self.current = line;
                    self.offset = 0;
                }
                None => {
                    return match self.lines.get_mut().take_error() {
                        Some(e) => Err(e),
                        None => Ok(0),
                    };
                }
            }
        }

        let n = buf.len().min(self.current.len() - self.offset);
        buf[..n].copy_from_slice(&self.current[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str, rows: &str, invert: bool) -> String {
        let mut out = String::new();
        FilteredLines::new(Cursor::new(input), rows.parse().unwrap(), invert)
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_lines_keep_terminators() {
        let lines: Vec<Vec<u8>> = Lines::new(Cursor::new("a\nb\r\nc")).collect();
        assert_eq!(lines, vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_filtered_lines() {
        assert_eq!(read_all("h\n1\n2\n3\n", "0,2-", false), "h\n2\n3\n");
        assert_eq!(read_all("h\n1\n2\n3\n", "0,2-", true), "1\n");
    }

    #[test]
    fn test_small_buffer_reads() {
        let mut reader = FilteredLines::new(Cursor::new("abc\ndef\n"), IntervalSet::all(), false);
        let mut buf = [0u8; 2];
        let mut out = Vec::new();
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"abc\ndef\n");
        assert_eq!(reader.lines_read(), 2);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_read_error_is_not_swallowed() {
        let reader = io::BufReader::new(FailingReader);
        let mut filtered = FilteredLines::new(reader, IntervalSet::empty(), false);
        let err = filtered.read(&mut [0u8; 8]).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
