use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{Format, Workbook};

const COLUMNS: [&str; 6] = [
    "Country",
    "Analysis topic",
    "Date",
    "Headline",
    "Snippet",
    "Original Link",
];

const COUNTRIES: [&str; 4] = ["Germany", "Austria", "Belgium", "Switzerland"];
const TOPICS: [&str; 6] = [
    "smart #1", "smart #2", "smart #3", "smart #4", "smart #5", "smart #6",
];
const OUTLETS: [&str; 5] = ["autobild", "derstandard", "lesoir", "nzz", "spiegel"];
const ANGLES: [&str; 5] = [
    "price cut announced",
    "first drive review",
    "charging test",
    "dealer network expands",
    "winter range check",
];
const DAYS: u64 = 45;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// One generated source row, already rendered as text.
struct Row([String; 6]);

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    let mut rows = Vec::new();

    for day in 0..DAYS {
        let date = start.checked_add_days(Days::new(day)).unwrap_or(start);
        // Busier mid-week, quieter at the weekend.
        let mentions = 2 + rng.below(if day % 7 < 5 { 9 } else { 4 });

        for n in 0..mentions {
            let country = rng.pick(&COUNTRIES);
            let topic = rng.pick(&TOPICS);
            let outlet = rng.pick(&OUTLETS);
            let angle = rng.pick(&ANGLES);
            rows.push(Row([
                country.to_string(),
                topic.to_string(),
                date.format("%Y-%m-%d").to_string(),
                format!("{topic}: {angle}"),
                format!("{outlet} reports from {country}: the {topic} {angle}."),
                format!("https://{outlet}.example/{date}/{n}"),
            ]));
        }
    }

    // Rows the loader must drop: foreign country, unknown topic, bad date.
    let filler = |country: &str, topic: &str, date: &str| {
        Row([
            country.to_string(),
            topic.to_string(),
            date.to_string(),
            "Filtered out".to_string(),
            String::new(),
            String::new(),
        ])
    };
    rows.push(filler("France", "smart #1", "2025-01-10"));
    rows.push(filler("Germany", "smart #9", "2025-01-11"));
    rows.push(filler("Austria", "smart #2", "n/a"));

    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(&row.0)?;
    }
    writer.flush()?;
    Ok(())
}

/// Same rows as a workbook; parseable dates become real date cells.
fn write_xlsx(rows: &[Row], path: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let row_num = i as u32 + 1;
        for (col, value) in row.0.iter().enumerate() {
            let col = col as u16;
            match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) if col == 2 => sheet.write_date_with_format(row_num, col, &date, &date_format)?,
                _ => sheet.write_string(row_num, col, value)?,
            };
        }
    }
    sheet.autofit();
    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|col| {
            let values: Vec<&str> = rows.iter().map(|r| r.0[col].as_str()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "SAMPLE_dashboard_output.csv";
    let parquet_path = "SAMPLE_dashboard_output.parquet";
    let xlsx_path = "SAMPLE_dashboard_output.xlsx";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;
    write_xlsx(&rows, xlsx_path)?;

    println!(
        "Wrote {} mentions over {DAYS} days to {csv_path}, {parquet_path} and {xlsx_path}",
        rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Data, Reader};

    #[test]
    fn workbook_matches_the_default_data_file_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("SAMPLE_dashboard_output.xlsx");
        let rows = generate(&mut SimpleRng::new(7));
        write_xlsx(&rows, path.to_str().unwrap()).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, COLUMNS);
        assert_eq!(range.height(), rows.len() + 1);
        assert!(matches!(range.get((1, 2)), Some(Data::DateTime(_))));
        // The unparseable filler date stays text.
        assert_eq!(range.get((rows.len(), 2)), Some(&Data::String("n/a".to_string())));
    }
}
