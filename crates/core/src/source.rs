//! Read access to an already-open tabular source.

use crate::error::{ReportError, ReportResult};
use crate::value::RawValue;

/// A rectangular source addressed with 1-based row and column numbers.
///
/// Reading past the populated area yields [`RawValue::Empty`], matching how a
/// spreadsheet's used range behaves. Row or column `0` is an access error.
pub trait SourceReader {
    /// Number of rows in the used range.
    fn row_count(&self) -> usize;

    /// Number of columns in the used range.
    fn column_count(&self) -> usize;

    /// Raw value at a 1-based `(row, column)`.
    fn value(&self, row: usize, column: usize) -> ReportResult<RawValue>;
}

impl<T: SourceReader + ?Sized> SourceReader for &T {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn value(&self, row: usize, column: usize) -> ReportResult<RawValue> {
        (**self).value(row, column)
    }
}

/// Reject the 0 coordinate of a 1-based address.
pub fn check_address(row: usize, column: usize) -> ReportResult<()> {
    if row == 0 || column == 0 {
        return Err(ReportError::source_access(format!(
            "cell address ({row}, {column}) is not 1-based"
        )));
    }
    Ok(())
}

/// In-memory source, mostly useful for tests and for callers that already hold the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySource {
    rows: Vec<Vec<RawValue>>,
}

impl MemorySource {
    /// Create a source from row-major data. Rows may be ragged.
    #[must_use]
    pub fn from_rows<T: Into<RawValue>>(rows: Vec<Vec<T>>) -> Self {
        MemorySource {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append a row at the bottom.
    pub fn push_row<T: Into<RawValue>>(&mut self, row: Vec<T>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }
}

impl SourceReader for MemorySource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn value(&self, row: usize, column: usize) -> ReportResult<RawValue> {
        check_address(row, column)?;
        Ok(self
            .rows
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .cloned()
            .unwrap_or_default())
    }
}
