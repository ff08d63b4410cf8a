use crate::error::{Result, SheetError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use reportgen_core::source::check_address;
use reportgen_core::{RawValue, ReportResult, SourceReader};
use std::path::Path;

/// Options for reading Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    /// Worksheet to read; the first one when unset
    pub sheet_name: Option<String>,
}

impl XlsxReadOptions {
    /// Read a specific worksheet
    #[must_use]
    pub fn with_sheet(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name = sheet_name;
        self
    }
}

/// Convert calamine Data to RawValue
fn data_to_raw_value(data: &Data) -> RawValue {
    match data {
        Data::Empty => RawValue::Empty,
        Data::Bool(b) => RawValue::Bool(*b),
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::String(s) => RawValue::String(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(RawValue::Float(dt.as_f64()), RawValue::DateTime),
        Data::DateTimeIso(s) => RawValue::String(s.clone()),
        Data::DurationIso(s) => RawValue::String(s.clone()),
        Data::Error(e) => RawValue::String(e.to_string()),
    }
}

fn open_error(path: &Path, message: impl ToString) -> SheetError {
    SheetError::Open {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// One worksheet's used range, read into memory.
///
/// The workbook handle is opened and released inside [`XlsxSource::open_with_options`];
/// nothing stays open afterwards. Row and column numbers are 1-based and relative
/// to the used range, as a spreadsheet's `UsedRange` reports them.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    sheet_name: String,
    range: Range<Data>,
}

impl XlsxSource {
    /// Load the first worksheet of an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &XlsxReadOptions::default())
    }

    /// Load a worksheet of an Excel file with options
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, sheet not found, or read fails.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &XlsxReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| open_error(path, e))?;

        let sheet_name = match &options.sheet_name {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(SheetError::SheetNotFound { name: name.clone() });
                }
                name.clone()
            }
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| SheetError::NoSheets {
                    path: path.display().to_string(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| open_error(path, e))?;

        tracing::debug!(
            "read sheet '{}' from {}: {} rows x {} columns",
            sheet_name,
            path.display(),
            range.height(),
            range.width()
        );

        Ok(XlsxSource { sheet_name, range })
    }

    /// Get sheet names from an Excel file without loading data
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened.
    pub fn sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let workbook = open_workbook_auto(path).map_err(|e| open_error(path, e))?;
        Ok(workbook.sheet_names())
    }

    /// Name of the worksheet that was read
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }
}

impl SourceReader for XlsxSource {
    fn row_count(&self) -> usize {
        self.range.height()
    }

    fn column_count(&self) -> usize {
        self.range.width()
    }

    fn value(&self, row: usize, column: usize) -> ReportResult<RawValue> {
        check_address(row, column)?;
        Ok(self
            .range
            .get((row - 1, column - 1))
            .map(data_to_raw_value)
            .unwrap_or_default())
    }
}
