//! Building the final, divider-annotated row sequence for a report.

use crate::divider::find_divider;
use crate::error::{ReportError, ReportResult};
use crate::field::FieldCatalog;
use crate::materialize::{is_blank, materialize};
use crate::progress::{CancelToken, Progress, ProgressObserver};
use crate::row::Row;
use crate::source::SourceReader;

/// The finished row sequence handed to a renderer.
///
/// Every row in it is committed; there is no way to mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportRows {
    rows: Vec<Row>,
    divider_position: Option<usize>,
}

impl ReportRows {
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Total rows including the divider.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the divider row in the sequence, if one was inserted.
    #[must_use]
    pub fn divider_position(&self) -> Option<usize> {
        self.divider_position
    }

    /// Rows that came from the source.
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.rows.len() - usize::from(self.divider_position.is_some())
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ReportRows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ReportRows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Walks a source range, drops empty rows and splices in the divider.
///
/// ```
/// use reportgen_core::{Field, FieldCatalog, HeaderIndex, MemorySource, ReportBuilder};
///
/// let headers = HeaderIndex::from_names(["Name"]);
/// let fields = vec![Field::new("Name").with_export_position(1).with_null_value("N/A")];
/// let catalog = FieldCatalog::bind(&fields, &headers).unwrap();
///
/// let source = MemorySource::from_rows(vec![vec!["Alpha"], vec![""], vec!["Beta"]]);
/// let rows = ReportBuilder::new(&catalog).build(&source).unwrap();
/// assert_eq!(rows.len(), 2);
/// ```
pub struct ReportBuilder<'a> {
    catalog: &'a FieldCatalog,
    first_row: usize,
    last_row: Option<usize>,
    divider_field: Option<String>,
    observer: Option<&'a dyn ProgressObserver>,
    cancel: Option<CancelToken>,
}

impl<'a> ReportBuilder<'a> {
    /// Start a build over `catalog`, reading from row 1 to the end of the source.
    #[must_use]
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        ReportBuilder {
            catalog,
            first_row: 1,
            last_row: None,
            divider_field: None,
            observer: None,
            cancel: None,
        }
    }

    /// First 1-based source row holding data.
    #[must_use]
    pub fn first_row(mut self, row: usize) -> Self {
        self.first_row = row;
        self
    }

    /// Last 1-based source row to read; defaults to the source's row count.
    #[must_use]
    pub fn last_row(mut self, row: usize) -> Self {
        self.last_row = Some(row);
        self
    }

    /// Export name of the flag field whose first change places the divider.
    #[must_use]
    pub fn divider_field<S: Into<String>>(mut self, field: Option<S>) -> Self {
        self.divider_field = field.map(Into::into);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn notify(&self, event: Progress) {
        if let Some(observer) = self.observer {
            observer.notify(event);
        }
    }

    /// Check the configuration against the catalog and source before any row is read.
    fn validate<S: SourceReader + ?Sized>(&self, source: &S) -> ReportResult<usize> {
        if self.first_row == 0 {
            return Err(ReportError::config("first row index is 1-based"));
        }
        let last_row = match self.last_row {
            Some(last) if last > source.row_count() => {
                return Err(ReportError::config(format!(
                    "last row {last} is past the end of the source ({} rows)",
                    source.row_count()
                )));
            }
            Some(last) => last,
            None => source.row_count(),
        };
        if let Some(flag) = self.divider_field.as_deref().map(str::trim) {
            if !flag.is_empty() && self.catalog.index_of(flag).is_none() {
                return Err(ReportError::UnknownField {
                    field: flag.to_string(),
                });
            }
        }
        Ok(last_row)
    }

    /// Materialize every non-empty row in range and insert the divider.
    ///
    /// Any failure aborts the build and no rows are returned.
    pub fn build<S: SourceReader + ?Sized>(&self, source: &S) -> ReportResult<ReportRows> {
        let last_row = self.validate(source)?;
        let total = (last_row + 1).saturating_sub(self.first_row);
        self.notify(Progress::Status(format!(
            "Reading {total} rows starting at row {}",
            self.first_row
        )));

        let mut rows = Vec::with_capacity(total);
        for (offset, row_index) in (self.first_row..=last_row).enumerate() {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(ReportError::Cancelled { row: row_index });
            }

            let row = materialize(source, row_index, self.catalog)?;
            if is_blank(&row, self.catalog) {
                tracing::debug!("skipping empty source row {}", row_index);
            } else {
                rows.push(row);
            }

            self.notify(Progress::Row {
                current: offset + 1,
                total,
            });
        }

        let divider = find_divider(&rows, self.catalog, self.divider_field.as_deref())?;
        let divider_position = divider.map(|divider| {
            let position = divider.index();
            rows.insert(position, divider);
            self.notify(Progress::Divider { position });
            tracing::info!("inserted divider row at index {}", position);
            position
        });

        for row in &mut rows {
            row.mark_added();
        }

        tracing::info!(
            "built {} report rows from {} source rows",
            rows.len(),
            total
        );
        Ok(ReportRows {
            rows,
            divider_position,
        })
    }
}
