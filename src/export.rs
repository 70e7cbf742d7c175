use std::fmt;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

use crate::data::model::{
    GroupedCount, Record, COL_COUNT, COL_COUNTRY, COL_DATE, COL_HEADLINE, COL_LINK, COL_SNIPPET,
    COL_TOPIC,
};
use crate::error::ExportError;

pub const GRAPH_SHEET: &str = "Graph Data";
pub const NEWS_SHEET: &str = "News Data";
pub const GRAPH_FILE_STEM: &str = "filtered_graph_data";
pub const NEWS_FILE_STEM: &str = "filtered_news_data";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One typed cell handed to a [`TabularWriter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Count(usize),
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Count(n) => write!(f, "{n}"),
        }
    }
}

/// A row type with a fixed header; every value of the type yields one
/// cell per header, in header order.
pub trait TabularRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<CellValue<'_>>;
}

impl TabularRow for GroupedCount {
    const HEADERS: &'static [&'static str] = &[COL_DATE, COL_TOPIC, COL_COUNT];

    fn cells(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Date(self.date),
            CellValue::Text(&self.topic),
            CellValue::Count(self.count),
        ]
    }
}

impl TabularRow for Record {
    const HEADERS: &'static [&'static str] = &[
        COL_COUNTRY,
        COL_TOPIC,
        COL_DATE,
        COL_HEADLINE,
        COL_SNIPPET,
        COL_LINK,
    ];

    fn cells(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Text(&self.country),
            CellValue::Text(&self.topic),
            CellValue::Date(self.date),
            CellValue::Text(&self.headline),
            CellValue::Text(&self.snippet),
            CellValue::Text(&self.link),
        ]
    }
}

impl<T: TabularRow> TabularRow for &T {
    const HEADERS: &'static [&'static str] = T::HEADERS;

    fn cells(&self) -> Vec<CellValue<'_>> {
        (**self).cells()
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Encodes a header plus rows as a single named sheet in memory.
pub trait TabularWriter {
    /// Extension used for download file names, without the dot.
    fn extension(&self) -> &'static str;

    fn write_sheet(
        &self,
        sheet_name: &str,
        headers: &[&str],
        rows: &[Vec<CellValue<'_>>],
    ) -> Result<Vec<u8>, ExportError>;
}

/// `.xlsx` workbook. Dates become real date cells, counts numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl TabularWriter for XlsxWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write_sheet(
        &self,
        sheet_name: &str,
        headers: &[&str],
        rows: &[Vec<CellValue<'_>>],
    ) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;

        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }
        for (i, row) in rows.iter().enumerate() {
            // Past u32 the encoder reports its own row-limit error.
            let row_num = u32::try_from(i + 1).unwrap_or(u32::MAX);
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Text(s) => sheet.write_string(row_num, col, *s)?,
                    CellValue::Date(d) => sheet.write_date_with_format(row_num, col, d, &date_format)?,
                    CellValue::Count(n) => sheet.write_number(row_num, col, *n as f64)?,
                };
            }
        }
        sheet.autofit();

        Ok(workbook.save_to_buffer()?)
    }
}

/// Plain CSV; the sheet name has nowhere to go and is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvWriter;

impl TabularWriter for CsvWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write_sheet(
        &self,
        _sheet_name: &str,
        headers: &[&str],
        rows: &[Vec<CellValue<'_>>],
    ) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row.iter().map(|c| c.to_string()))?;
        }
        writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Encode `rows` under their type's header as one sheet named `sheet_name`.
/// No row limit is applied here.
pub fn export_rows<R: TabularRow>(
    rows: &[R],
    sheet_name: &str,
    writer: &dyn TabularWriter,
) -> Result<Vec<u8>, ExportError> {
    let cells: Vec<Vec<CellValue<'_>>> = rows.iter().map(TabularRow::cells).collect();
    let bytes = writer.write_sheet(sheet_name, R::HEADERS, &cells)?;
    log::info!(
        "Exported {} rows to sheet '{sheet_name}' ({} bytes, {})",
        rows.len(),
        bytes.len(),
        writer.extension()
    );
    Ok(bytes)
}

/// `filtered_graph_data.xlsx` and friends.
pub fn file_name(stem: &str, writer: &dyn TabularWriter) -> String {
    format!("{stem}.{}", writer.extension())
}
