//! Workbook I/O for reportgen
//!
//! Reads a source worksheet through calamine and renders a built report with
//! rust_xlsxwriter. The row logic itself lives in `reportgen-core`.
//!
//! # Examples
//!
//! ```no_run
//! use reportgen_core::{HeaderIndex, ReportBuilder, ReportDefinition};
//! use reportgen_sheet::{ReportWriter, XlsxSource};
//!
//! let definition = ReportDefinition::from_json_file("weekly.json").unwrap();
//! let source = XlsxSource::open(definition.source_path()).unwrap();
//! let headers = HeaderIndex::from_source(&source, definition.header_row).unwrap();
//! let catalog = definition.bind(&headers).unwrap();
//!
//! let rows = ReportBuilder::new(&catalog)
//!     .first_row(definition.first_row)
//!     .divider_field(definition.divider_field())
//!     .build(&source)
//!     .unwrap();
//!
//! ReportWriter::new(&definition.name, &catalog)
//!     .save(&rows, "weekly_out.xlsx")
//!     .unwrap();
//! ```

mod error;
mod writer;
mod xlsx;

/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export the report renderer.
pub use writer::{parse_color, ReportWriter};
/// Re-export the Excel source and its read options.
pub use xlsx::{XlsxReadOptions, XlsxSource};
