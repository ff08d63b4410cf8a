//! Rendering a built report into a new workbook.

use crate::error::{Result, SheetError};
use chrono::NaiveDate;
use reportgen_core::{FieldCatalog, ReportRows, Row};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;

/// Parse `#RRGGBB`, `RRGGBB` or a basic color name.
pub fn parse_color(text: &str) -> Result<Color> {
    let trimmed = text.trim();
    let named = match trimmed.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "blue" => Some(Color::Blue),
        "brown" => Some(Color::Brown),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "green" => Some(Color::Green),
        "lime" => Some(Color::Lime),
        "magenta" => Some(Color::Magenta),
        "navy" => Some(Color::Navy),
        "orange" => Some(Color::Orange),
        "pink" => Some(Color::Pink),
        "purple" => Some(Color::Purple),
        "red" => Some(Color::Red),
        "silver" | "lightgray" | "lightgrey" => Some(Color::Silver),
        "white" => Some(Color::White),
        "yellow" => Some(Color::Yellow),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 {
        return Err(SheetError::InvalidColor(text.to_string()));
    }
    u32::from_str_radix(hex, 16)
        .map(Color::RGB)
        .map_err(|_| SheetError::InvalidColor(text.to_string()))
}

fn cast_row_num(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| SheetError::IndexOverflow(format!("row {value}")))
}

fn cast_col_num(column_number: i32) -> Result<u16> {
    u16::try_from(column_number - 1)
        .map_err(|_| SheetError::IndexOverflow(format!("column {column_number}")))
}

/// Writes a title, a header row and the report rows to a worksheet.
///
/// Only cells with a column number of at least 1 are written. Divider rows are
/// written blank across the exported columns.
#[derive(Debug, Clone)]
pub struct ReportWriter<'a> {
    title: String,
    catalog: &'a FieldCatalog,
    prepared_on: NaiveDate,
    sheet_name: Option<String>,
    header_background: Option<Color>,
    divider_background: Option<Color>,
}

impl<'a> ReportWriter<'a> {
    /// Create a writer for a report named `title` whose rows follow `catalog`.
    #[must_use]
    pub fn new(title: impl Into<String>, catalog: &'a FieldCatalog) -> Self {
        ReportWriter {
            title: title.into(),
            catalog,
            prepared_on: chrono::Local::now().date_naive(),
            sheet_name: None,
            header_background: None,
            divider_background: None,
        }
    }

    /// Date printed in the title row.
    #[must_use]
    pub fn prepared_on(mut self, date: NaiveDate) -> Self {
        self.prepared_on = date;
        self
    }

    #[must_use]
    pub fn sheet_name(mut self, name: Option<String>) -> Self {
        self.sheet_name = name;
        self
    }

    pub fn header_background(mut self, color: Option<&str>) -> Result<Self> {
        self.header_background = color.map(parse_color).transpose()?;
        Ok(self)
    }

    pub fn divider_background(mut self, color: Option<&str>) -> Result<Self> {
        self.divider_background = color.map(parse_color).transpose()?;
        Ok(self)
    }

    /// Text of the merged title row.
    #[must_use]
    pub fn title_text(&self) -> String {
        format!(
            "Report: {} - Prepared {}",
            self.title,
            self.prepared_on.format("%-m/%-d/%Y")
        )
    }

    /// Rightmost exported column number, 0 when nothing is exported.
    fn last_column(&self) -> i32 {
        self.catalog
            .exported()
            .map(|f| f.export_position)
            .max()
            .unwrap_or(0)
    }

    /// Save the rows as a new workbook at `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be built or written.
    pub fn save<P: AsRef<Path>>(&self, rows: &ReportRows, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_to_worksheet(worksheet, rows)?;
        workbook.save(path.as_ref())?;

        tracing::info!(
            "wrote {} rows to {}",
            rows.data_row_count(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Write the report into an existing worksheet
    ///
    /// # Errors
    ///
    /// Returns error if a cell cannot be written.
    pub fn write_to_worksheet(&self, worksheet: &mut Worksheet, rows: &ReportRows) -> Result<()> {
        if let Some(name) = &self.sheet_name {
            worksheet.set_name(name)?;
        }

        let last_column = self.last_column();
        if last_column < 1 {
            tracing::warn!("report '{}' exports no columns", self.title);
            return Ok(());
        }
        let last_col = cast_col_num(last_column)?;

        let title_format = Format::new().set_bold().set_align(FormatAlign::Center);
        if last_col == 0 {
            worksheet.write_string_with_format(TITLE_ROW, 0, self.title_text(), &title_format)?;
        } else {
            worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, &self.title_text(), &title_format)?;
        }

        self.write_headers(worksheet, last_col)?;

        let cell_format = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top);
        let divider_format = match self.divider_background {
            Some(color) => Format::new().set_background_color(color),
            None => Format::new(),
        };

        for (offset, row) in rows.iter().enumerate() {
            let row_num = FIRST_DATA_ROW + cast_row_num(offset)?;
            if row.is_divider() {
                for col in 0..=last_col {
                    worksheet.write_blank(row_num, col, &divider_format)?;
                }
                continue;
            }
            self.write_row(worksheet, row_num, row, &cell_format)?;
        }

        Ok(())
    }

    fn write_headers(&self, worksheet: &mut Worksheet, last_col: u16) -> Result<()> {
        let mut header_format = Format::new().set_bold().set_text_wrap();
        if let Some(color) = self.header_background {
            header_format = header_format.set_background_color(color);
            for col in 0..=last_col {
                worksheet.write_blank(HEADER_ROW, col, &header_format)?;
            }
        }

        for field in self.catalog.exported() {
            let col = cast_col_num(field.export_position)?;
            worksheet.write_string_with_format(HEADER_ROW, col, &field.name, &header_format)?;
            if field.column_width > 0.0 {
                worksheet.set_column_width(col, field.column_width)?;
            }
        }
        Ok(())
    }

    fn write_row(
        &self,
        worksheet: &mut Worksheet,
        row_num: u32,
        row: &Row,
        format: &Format,
    ) -> Result<()> {
        for cell in row.exported_cells() {
            let col = cast_col_num(cell.column_number)?;
            worksheet.write_string_with_format(row_num, col, &cell.value, format)?;
        }
        Ok(())
    }
}
