//! # reportgen-core
//!
//! Row transformation and divider insertion for reportgen.
//!
//! This crate provides:
//! - Field definitions and header binding
//! - Cell value conversion by field type and null policy
//! - Row materialization and emptiness detection
//! - Out-of-cycle divider detection
//! - The report row sequence builder
//!
//! Reading a real workbook and rendering the result live in `reportgen-sheet`;
//! everything here works against the [`SourceReader`] trait.

/// Report row sequence builder.
pub mod builder;
/// Cell value conversion.
pub mod convert;
/// Report definition files.
pub mod definition;
/// Divider detection.
pub mod divider;
/// Error types and result aliases.
pub mod error;
/// Field definitions, header index and catalog.
pub mod field;
/// Row materialization.
pub mod materialize;
/// Progress events and cancellation.
pub mod progress;
/// Output cells and rows.
pub mod row;
/// Source access trait and in-memory source.
pub mod source;
/// Raw source values.
pub mod value;

pub use builder::{ReportBuilder, ReportRows};
pub use convert::convert;
pub use definition::ReportDefinition;
pub use divider::find_divider;
pub use error::{ConvertError, ReportError, ReportResult};
pub use field::{DataType, Field, FieldCatalog, HeaderIndex};
pub use materialize::{is_blank, is_empty, materialize};
pub use progress::{CancelToken, ChannelObserver, Progress, ProgressObserver};
pub use row::{Cell, Row};
pub use source::{MemorySource, SourceReader};
pub use value::RawValue;
