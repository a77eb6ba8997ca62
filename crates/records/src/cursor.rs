use crate::error::{Error, Result};
use crate::layout::{Field, Layout, VALUES};

use log::trace;

/// Read-only cursor over the lines of one section body
///
/// The lines are never consumed. The cursor only tracks the index of the next
/// line to read, so a failure can always report exactly where in the block it
/// happened and the same block can be re-read from any point.
///
/// ```rust
/// # use nucov_records::LineCursor;
/// let lines = [
///     " 1.000000+0 2.000000+0 3.000000+0 4.000000+0 5.000000+0 6.000000+0",
///     " 7.000000+0 8.000000+0 0.000000+0                                 ",
/// ];
/// let mut cursor = LineCursor::new(&lines);
/// assert_eq!(cursor.values(8).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
/// assert!(cursor.is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct LineCursor<'a, S: AsRef<str>> {
    lines: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> LineCursor<'a, S> {
    /// Start a cursor at the first line of the block
    pub fn new(lines: &'a [S]) -> Self {
        Self { lines, position: 0 }
    }

    /// Index of the next line to be read
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of lines not yet read
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.position
    }

    /// True if nothing but blank lines remain
    pub fn is_exhausted(&self) -> bool {
        self.lines[self.position..]
            .iter()
            .all(|l| l.as_ref().trim().is_empty())
    }

    /// Advance past the next line, returning its content
    pub fn next_line(&mut self) -> Result<&'a str> {
        let line = self
            .lines
            .get(self.position)
            .ok_or(Error::EndOfBlock)
            .map_err(|e| e.at_line(self.position))?;
        self.position += 1;
        Ok(line.as_ref())
    }

    /// Decode the next line with the given layout
    pub fn decode_next(&mut self, layout: &Layout) -> Result<Vec<Field>> {
        let index = self.position;
        let line = self.next_line()?;
        layout.decode(line).map_err(|e| e.at_line(index))
    }

    /// Collect `n` values from as many [VALUES] lines as needed
    ///
    /// Reads `ceil(n/6)` lines and drops any padding after the `n`th value.
    /// A count larger than the remaining lines can hold fails before anything
    /// is read.
    pub fn values(&mut self, n: usize) -> Result<Vec<f64>> {
        let start = self.position;
        let available = self.remaining() * VALUES.len();
        if n > available {
            return Err(Error::UnexpectedEndOfBlock {
                expected: n,
                found: available,
            }
            .at_line(self.lines.len()));
        }

        let mut values = Vec::with_capacity(n + VALUES.len());
        while values.len() < n {
            values.extend(self.decode_next(&VALUES)?.iter().map(Field::as_f64));
        }

        values.truncate(n);
        trace!("Read {n} values from lines {start}..{}", self.position);
        Ok(values)
    }
}
