use reportgen_core::ReportError;
use thiserror::Error;

/// Errors that can occur while reading or writing workbooks
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Cannot open workbook {path}: {message}")]
    Open { path: String, message: String },

    #[error("Workbook has no sheets: {path}")]
    NoSheets { path: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Index overflow: {0}")]
    IndexOverflow(String),

    #[error("XLSX write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// True when the source workbook itself could not be read.
    #[must_use]
    pub fn is_source_access(&self) -> bool {
        matches!(
            self,
            SheetError::Open { .. }
                | SheetError::NoSheets { .. }
                | SheetError::SheetNotFound { .. }
                | SheetError::Report(ReportError::SourceAccess(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
