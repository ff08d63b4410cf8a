//! Turning one source row into a row of converted cells.

use crate::convert::convert;
use crate::error::{ReportError, ReportResult};
use crate::field::FieldCatalog;
use crate::row::{Cell, Row};
use crate::source::SourceReader;

/// Read and convert every catalog field of `row_index`, in catalog order.
///
/// Non-exported fields are carried too, so all rows have the same length.
pub fn materialize<S: SourceReader + ?Sized>(
    source: &S,
    row_index: usize,
    catalog: &FieldCatalog,
) -> ReportResult<Row> {
    let mut cells = Vec::with_capacity(catalog.len());
    for field in catalog {
        let raw = source.value(row_index, field.source_position)?;
        let value = convert(&raw, field).map_err(|source| ReportError::Conversion {
            row: row_index,
            field: field.export_name.clone(),
            source,
        })?;
        cells.push(Cell::for_field(field, value));
    }
    Ok(Row::data(cells))
}

/// Whether a materialized row has no content once null sentinels are discounted.
///
/// A value equal to its field's null value counts as empty, so a row whose
/// every populated value coincides with its sentinel is reported empty too.
#[must_use]
pub fn is_blank(row: &Row, catalog: &FieldCatalog) -> bool {
    row.cells()
        .iter()
        .zip(catalog)
        .all(|(cell, field)| cell.value.is_empty() || cell.value == field.null_value)
}

/// Whether source row `row_index` is empty under the field catalog.
///
/// Reads the source and has no other effect.
pub fn is_empty<S: SourceReader + ?Sized>(
    source: &S,
    row_index: usize,
    catalog: &FieldCatalog,
) -> ReportResult<bool> {
    let row = materialize(source, row_index, catalog)?;
    Ok(is_blank(&row, catalog))
}
