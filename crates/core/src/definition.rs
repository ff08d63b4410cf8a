//! Report definitions as stored on disk.

use crate::error::{ReportError, ReportResult};
use crate::field::{Field, FieldCatalog, HeaderIndex};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_first_row() -> usize {
    3
}

fn default_header_row() -> usize {
    2
}

/// A saved report: where the source lives, which fields to export and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportDefinition {
    pub name: String,
    #[serde(default)]
    pub source_folder: PathBuf,
    #[serde(default)]
    pub source_file: PathBuf,
    #[serde(default)]
    pub export_folder: PathBuf,
    /// Worksheet to read; the first one when unset.
    #[serde(default)]
    pub sheet_name: Option<String>,
    /// Row holding the header names.
    #[serde(default = "default_header_row")]
    pub header_row: usize,
    /// First row holding data.
    #[serde(default = "default_first_row", rename = "FirstRowIndex")]
    pub first_row: usize,
    /// Export name of the out-of-cycle flag field that places the divider.
    #[serde(default)]
    pub divider: Option<String>,
    #[serde(default)]
    pub header_background: Option<String>,
    #[serde(default)]
    pub divider_background: Option<String>,
    pub fields: Vec<Field>,
}

impl ReportDefinition {
    /// Parse a definition and order its fields by export position.
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        let mut definition: ReportDefinition = serde_json::from_str(json)?;
        definition.sort_fields();
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Load every `*.json` definition in `dir`, sorted by file name.
    ///
    /// A file that fails to parse is returned with its error instead of
    /// aborting the whole listing.
    pub fn load_dir<P: AsRef<Path>>(
        dir: P,
    ) -> ReportResult<Vec<(PathBuf, ReportResult<ReportDefinition>)>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let definition = Self::from_json_file(&path);
                if let Err(e) = &definition {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
                (path, definition)
            })
            .collect())
    }

    fn sort_fields(&mut self) {
        self.fields.sort_by_key(|f| f.export_position);
    }

    fn validate(&self) -> ReportResult<()> {
        if self.fields.is_empty() {
            return Err(ReportError::config(format!(
                "report '{}' defines no fields",
                self.name
            )));
        }
        if let Some(field) = self.fields.iter().find(|f| f.export_name.trim().is_empty()) {
            return Err(ReportError::config(format!(
                "field '{}' has no export name",
                field.name
            )));
        }
        if self.header_row == 0 || self.first_row == 0 {
            return Err(ReportError::config("row indexes are 1-based"));
        }
        if self.first_row <= self.header_row {
            tracing::warn!(
                "first data row {} is not below header row {}",
                self.first_row,
                self.header_row
            );
        }
        Ok(())
    }

    /// Path of the source workbook.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.source_folder.join(&self.source_file)
    }

    /// Output path, stamped with the day after `today` as `MMddyy`.
    #[must_use]
    pub fn export_path(&self, today: NaiveDate) -> PathBuf {
        let stamp_day = today + Duration::days(1);
        self.export_folder
            .join(format!("{}_{}.xlsx", self.name, stamp_day.format("%m%d%y")))
    }

    /// Divider field name, with blank treated as unset.
    #[must_use]
    pub fn divider_field(&self) -> Option<&str> {
        self.divider
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Export exactly `columns`, in that order; every other field becomes excluded.
    pub fn reorder<S: AsRef<str>>(&mut self, columns: &[S]) -> ReportResult<()> {
        for name in columns {
            if !self.fields.iter().any(|f| f.matches(name.as_ref())) {
                return Err(ReportError::UnknownField {
                    field: name.as_ref().to_string(),
                });
            }
        }

        for field in &mut self.fields {
            field.export_position = columns
                .iter()
                .position(|name| field.matches(name.as_ref()))
                .map_or(0, |i| i32::try_from(i + 1).unwrap_or(i32::MAX));
        }
        self.sort_fields();
        Ok(())
    }

    /// Bind the fields against the source headers.
    pub fn bind(&self, headers: &HeaderIndex) -> ReportResult<FieldCatalog> {
        FieldCatalog::bind(&self.fields, headers)
    }
}
