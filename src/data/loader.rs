use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::dates::{date_from_number, parse_date_text};
use super::model::{
    Dataset, Record, COL_COUNTRY, COL_DATE, COL_HEADLINE, COL_LINK, COL_SNIPPET, COL_TOPIC,
};
use crate::config::DashboardConfig;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the news dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header row first
/// * `.csv`     – header row, one mention per line
/// * `.json`    – `[{ "Country": ..., "Analysis topic": ..., "Date": ... }, ...]`
/// * `.parquet` – flat columns named like the spreadsheet headers
///
/// Rows outside the configured countries/topics and rows whose date cannot
/// be parsed are dropped; neither is an error.
pub fn load_file(path: &Path, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Ok(build_dataset(rows, config))
}

// ---------------------------------------------------------------------------
// Raw rows – one source row before normalisation
// ---------------------------------------------------------------------------

/// A source cell, typed only as far as the file format tells us.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl RawCell {
    fn into_text(self) -> String {
        match self {
            RawCell::Text(s) => s,
            RawCell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", n as i64)
                } else {
                    n.to_string()
                }
            }
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
            RawCell::Empty => String::new(),
        }
    }

    pub(crate) fn to_date(&self) -> Option<NaiveDate> {
        match self {
            RawCell::Text(s) => parse_date_text(s),
            RawCell::Number(n) => date_from_number(*n),
            RawCell::Date(d) => Some(*d),
            RawCell::Empty => None,
        }
    }
}

struct RawRow {
    country: String,
    topic: String,
    date: RawCell,
    headline: String,
    snippet: String,
    link: String,
}

/// Positions of the known columns inside a header row.
struct Columns {
    country: usize,
    topic: usize,
    date: usize,
    headline: Option<usize>,
    snippet: Option<usize>,
    link: Option<usize>,
}

impl Columns {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        Ok(Columns {
            country: require(COL_COUNTRY)?,
            topic: require(COL_TOPIC)?,
            date: require(COL_DATE)?,
            headline: find(COL_HEADLINE),
            snippet: find(COL_SNIPPET),
            link: find(COL_LINK),
        })
    }

    /// Pull the known columns out of one row; `cell` returns
    /// [`RawCell::Empty`] for short rows.
    fn extract(&self, cell: impl Fn(usize) -> RawCell) -> RawRow {
        let optional = |idx: Option<usize>| idx.map(&cell).map(RawCell::into_text).unwrap_or_default();
        RawRow {
            country: cell(self.country).into_text(),
            topic: cell(self.topic).into_text(),
            date: cell(self.date),
            headline: optional(self.headline),
            snippet: optional(self.snippet),
            link: optional(self.link),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Apply the allow-sets and normalise dates, keeping source row order.
fn build_dataset(rows: Vec<RawRow>, config: &DashboardConfig) -> Dataset {
    let total = rows.len();
    let mut outside = 0usize;
    let mut bad_dates = 0usize;
    let mut records = Vec::with_capacity(total);

    for (row_no, row) in rows.into_iter().enumerate() {
        if !config.allows(&row.country, &row.topic) {
            outside += 1;
            continue;
        }
        let Some(date) = row.date.to_date() else {
            log::debug!("Row {row_no}: unparseable date {:?}, dropped", row.date);
            bad_dates += 1;
            continue;
        };
        records.push(Record {
            country: row.country,
            topic: row.topic,
            date,
            headline: row.headline,
            snippet: row.snippet,
            link: row.link,
        });
    }

    log::debug!("{outside} of {total} rows outside the configured countries/topics");
    if bad_dates > 0 {
        log::warn!("Dropped {bad_dates} rows with unparseable dates");
    }
    log::info!("Loaded {} of {total} rows", records.len());

    Dataset::from_records(records)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First worksheet; the first row holds the column names.
fn read_workbook(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    let cols = Columns::resolve(&headers)?;

    Ok(rows
        .map(|row| cols.extract(|i| row.get(i).map(data_to_cell).unwrap_or(RawCell::Empty)))
        .collect())
}

pub(crate) fn data_to_cell(data: &Data) -> RawCell {
    match data {
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        // calamine resolves the workbook's 1900/1904 date system.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| RawCell::Date(dt.date()))
            .unwrap_or(RawCell::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        _ => RawCell::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let cols = Columns::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(cols.extract(|i| match record.get(i) {
            Some(s) if !s.is_empty() => RawCell::Text(s.to_string()),
            _ => RawCell::Empty,
        }));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Numeric dates are read as epoch milliseconds/seconds or Excel serials.
fn read_json(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let items = root.as_array().ok_or(LoadError::JsonShape)?;

    let objects = items
        .iter()
        .map(|v| v.as_object().ok_or(LoadError::JsonShape))
        .collect::<Result<Vec<_>, _>>()?;

    // Header = every key seen, in first-seen order.
    let mut headers: Vec<&str> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key.as_str());
            }
        }
    }
    if objects.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(&headers)?;

    Ok(objects
        .iter()
        .map(|obj| cols.extract(|i| obj.get(headers[i]).map(json_to_cell).unwrap_or(RawCell::Empty)))
        .collect())
}

fn json_to_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::String(s) => RawCell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(RawCell::Number).unwrap_or(RawCell::Empty),
        JsonValue::Bool(b) => RawCell::Text(b.to_string()),
        JsonValue::Null => RawCell::Empty,
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Text columns may be any Arrow string type. The date column may be text,
/// `Date32`/`Date64` or a `Timestamp`; non-text dates are cast to `Date32`.
fn read_parquet(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let headers: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let cols = Columns::resolve(&headers)?;

        let text_col = |idx: usize| cast(batch.column(idx).as_ref(), &DataType::Utf8);
        let country = text_col(cols.country)?;
        let topic = text_col(cols.topic)?;
        let headline = cols.headline.map(text_col).transpose()?;
        let snippet = cols.snippet.map(text_col).transpose()?;
        let link = cols.link.map(text_col).transpose()?;

        let date_source = batch.column(cols.date);
        let date_is_text = matches!(
            date_source.data_type(),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        );
        let date = if date_is_text {
            text_col(cols.date)?
        } else {
            cast(date_source.as_ref(), &DataType::Date32)?
        };

        for row in 0..batch.num_rows() {
            let date_cell = if date_is_text {
                string_cell(date.as_string::<i32>(), row)
            } else {
                date.as_primitive::<Date32Type>()
                    .value_as_date(row)
                    .filter(|_| !date.is_null(row))
                    .map(RawCell::Date)
                    .unwrap_or(RawCell::Empty)
            };
            rows.push(RawRow {
                country: string_cell(country.as_string::<i32>(), row).into_text(),
                topic: string_cell(topic.as_string::<i32>(), row).into_text(),
                date: date_cell,
                headline: optional_text(headline.as_ref(), row),
                snippet: optional_text(snippet.as_ref(), row),
                link: optional_text(link.as_ref(), row),
            });
        }
    }
    Ok(rows)
}

fn string_cell(arr: &StringArray, row: usize) -> RawCell {
    if arr.is_null(row) {
        RawCell::Empty
    } else {
        RawCell::Text(arr.value(row).to_string())
    }
}

fn optional_text(col: Option<&ArrayRef>, row: usize) -> String {
    col.map(|a| string_cell(a.as_string::<i32>(), row).into_text())
        .unwrap_or_default()
}
