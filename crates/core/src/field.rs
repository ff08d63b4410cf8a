//! Field definitions and the header-bound field catalog.

use crate::error::{ReportError, ReportResult};
use crate::source::SourceReader;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Declared type of a field, selecting the conversion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Text; `|` marks an embedded line break.
    String,
    /// Rendered as `MM/dd/yyyy`.
    Date,
    /// Numbers, booleans and anything undeclared.
    #[default]
    #[serde(other)]
    Other,
}

/// Read an explicit JSON `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One exportable or ignorable column of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    /// Display name written to the output header row.
    pub name: String,
    /// Key matched against source headers and used for special-field lookup.
    pub export_name: String,
    /// 1-based output column; non-positive means defined but not exported.
    #[serde(default, rename = "ExportIndex")]
    pub export_position: i32,
    #[serde(default)]
    pub column_width: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_type: DataType,
    /// Text substituted when the source cell is empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub null_value: String,
    /// 1-based source column, resolved by [`FieldCatalog::bind`]; 0 until then.
    #[serde(skip)]
    pub source_position: usize,
}

impl Field {
    /// Create an unexported text field whose display and export names match.
    #[must_use]
    pub fn new(export_name: impl Into<String>) -> Self {
        let export_name = export_name.into();
        Field {
            name: export_name.clone(),
            export_name,
            export_position: 0,
            column_width: 0.0,
            data_type: DataType::String,
            null_value: String::new(),
            source_position: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_export_position(mut self, position: i32) -> Self {
        self.export_position = position;
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = null_value.into();
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// Whether the field is written to the output.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.export_position >= 1
    }

    /// Case-insensitive match on the export name, same folding as [`HeaderIndex`].
    #[must_use]
    pub fn matches(&self, export_name: &str) -> bool {
        header_key(&self.export_name) == header_key(export_name)
    }
}

/// Case-folded, trimmed form used for every name comparison.
pub(crate) fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Header names of a source, keyed case-insensitively to their 1-based column.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: IndexMap<String, usize>,
}

impl HeaderIndex {
    /// Build from header texts in physical column order. Blank entries keep their slot.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = HeaderIndex::default();
        for (offset, name) in names.into_iter().enumerate() {
            index.insert(offset + 1, name.as_ref());
        }
        index
    }

    /// Read the header texts from one row of a source.
    pub fn from_source<S: SourceReader + ?Sized>(
        source: &S,
        header_row: usize,
    ) -> ReportResult<Self> {
        if header_row == 0 || header_row > source.row_count() {
            return Err(ReportError::config(format!(
                "header row {header_row} is outside the source (1..={})",
                source.row_count()
            )));
        }

        let mut index = HeaderIndex::default();
        for column in 1..=source.column_count() {
            let name = source.value(header_row, column)?.as_text().unwrap_or_default();
            index.insert(column, &name);
        }
        Ok(index)
    }

    fn insert(&mut self, position: usize, name: &str) {
        let name = name.trim();
        self.names.push(name.to_string());
        if name.is_empty() {
            return;
        }
        let key = header_key(name);
        if let Some(existing) = self.positions.get(&key) {
            tracing::warn!(
                "duplicate header '{}' at column {}; keeping column {}",
                name,
                position,
                existing
            );
            return;
        }
        self.positions.insert(key, position);
    }

    /// 1-based column of a header, matched case-insensitively.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&header_key(name)).copied()
    }

    /// Header texts in physical order, blanks included.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Immutable, header-bound list of fields in iteration order.
///
/// The only way to obtain one is [`FieldCatalog::bind`], so every field in a
/// catalog carries a resolved `source_position`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCatalog {
    fields: Vec<Field>,
}

impl FieldCatalog {
    /// Resolve each field's source column by matching its export name to a header.
    ///
    /// Fails on the first field without a matching header.
    pub fn bind(fields: &[Field], headers: &HeaderIndex) -> ReportResult<Self> {
        let mut bound = Vec::with_capacity(fields.len());
        for field in fields {
            let position =
                headers
                    .position(&field.export_name)
                    .ok_or_else(|| ReportError::UnmatchedField {
                        field: field.export_name.clone(),
                    })?;
            tracing::debug!(
                "bound field '{}' to source column {}",
                field.export_name,
                position
            );
            let mut field = field.clone();
            field.source_position = position;
            bound.push(field);
        }

        for name in headers.names().iter().filter(|n| !n.is_empty()) {
            if !bound.iter().any(|f| f.matches(name)) {
                tracing::debug!("source header '{}' has no field and is ignored", name);
            }
        }

        Ok(FieldCatalog { fields: bound })
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields written to the output, in catalog order.
    pub fn exported(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_exported())
    }

    /// Fields defined but not written to the output.
    pub fn excluded(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_exported())
    }

    #[must_use]
    pub fn exported_count(&self) -> usize {
        self.exported().count()
    }

    /// Catalog position of a field looked up by export name.
    #[must_use]
    pub fn index_of(&self, export_name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.matches(export_name))
    }
}

impl<'a> IntoIterator for &'a FieldCatalog {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
