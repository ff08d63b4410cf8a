//! Error types for reportgen.

use thiserror::Error;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Reasons a raw cell value could not be converted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Text that no supported date layout accepts.
    #[error("'{0}' is not a recognizable date")]
    InvalidDate(String),

    /// A value kind that can never be read as a date.
    #[error("{kind} value '{value}' cannot be read as a date")]
    NotADate { kind: &'static str, value: String },

    /// Numeric serial outside the range Excel can represent.
    #[error("date serial {0} is out of range")]
    SerialOutOfRange(f64),
}

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A field's export name has no matching source header.
    #[error("Configuration error: no source header matches field '{field}'")]
    UnmatchedField { field: String },

    /// A field name referenced by the report is not part of the catalog.
    #[error("Configuration error: field '{field}' is not defined in the report")]
    UnknownField { field: String },

    /// Any other configuration problem detected before rows are read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A cell could not be converted per its field's declared type.
    #[error("Conversion error at row {row}, field '{field}': {source}")]
    Conversion {
        row: usize,
        field: String,
        #[source]
        source: ConvertError,
    },

    /// The tabular source could not be read.
    #[error("Source access error: {0}")]
    SourceAccess(String),

    /// Cancellation was requested between rows.
    #[error("Build cancelled before row {row}")]
    Cancelled { row: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a source access error.
    pub fn source_access(message: impl Into<String>) -> Self {
        Self::SourceAccess(message.into())
    }

    /// True for errors raised while validating configuration, before any row is read.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnmatchedField { .. } | Self::UnknownField { .. } | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_names_row_and_field() {
        let err = ReportError::Conversion {
            row: 7,
            field: "DueDate".to_string(),
            source: ConvertError::InvalidDate("soon".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("row 7"));
        assert!(message.contains("DueDate"));
        assert!(message.contains("soon"));
    }

    #[test]
    fn test_is_configuration() {
        assert!(ReportError::UnmatchedField {
            field: "x".to_string()
        }
        .is_configuration());
        assert!(ReportError::config("bad range").is_configuration());
        assert!(!ReportError::source_access("closed").is_configuration());
    }
}
