use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// One data row of a source table, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Value of `column`, or the empty string when the row has no such cell.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Shape rules applied while reading a table.
#[derive(Debug, Clone, Copy)]
pub struct TableShape<'a> {
    pub min_columns: usize,
    pub title_column: &'a str,
}

pub fn read_table(path: &Path, shape: TableShape<'_>) -> Result<Vec<RawRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open table {}", path.display()))?;
    let records = read_records(file, shape)
        .with_context(|| format!("failed to read table {}", path.display()))?;

    debug!(path = %path.display(), rows = records.len(), "read table");
    Ok(records)
}

pub fn read_records<R: Read>(input: R, shape: TableShape<'_>) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().context("failed to read header row")?.clone();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.context("failed to read row")?;
        let line = row.position().map(|pos| pos.line()).unwrap_or_default();

        if row.iter().all(str::is_empty) || row.len() < shape.min_columns {
            debug!(line, columns = row.len(), "dropped short row");
            skipped += 1;
            continue;
        }

        let fields: Vec<(String, String)> = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let record = RawRecord::new(fields);

        if record.get(shape.title_column).is_empty() {
            debug!(line, "dropped row with empty title");
            skipped += 1;
            continue;
        }

        records.push(record);
    }

    if skipped > 0 {
        debug!(skipped, "dropped rows failing shape checks");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: TableShape<'static> = TableShape {
        min_columns: 3,
        title_column: "title",
    };

    #[test]
    fn rows_are_keyed_by_header_in_source_order() {
        let csv = "id,title,url\nc1,Intro,https://youtu.be/abcdefghijk\nc2,Second,\n";
        let records = read_records(csv.as_bytes(), SHAPE).expect("read");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), "c1");
        assert_eq!(records[0].get("url"), "https://youtu.be/abcdefghijk");
        assert_eq!(records[1].get("title"), "Second");
        assert_eq!(records[1].get("missing"), "");
    }

    #[test]
    fn short_rows_and_empty_titles_are_dropped() {
        let csv = "id,title,url\nc1,,https://example.com\nc2,Kept\n\nc3,Also kept,x\n";
        let records = read_records(csv.as_bytes(), SHAPE).expect("read");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), "c3");
    }

    #[test]
    fn wide_rows_are_accepted() {
        let csv = "id,title,url\nc1,Intro,x,extra,cells\n";
        let records = read_records(csv.as_bytes(), SHAPE).expect("read");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("url"), "x");
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_table(&dir.path().join("absent.csv"), SHAPE).expect_err("must fail");
        assert!(err.to_string().contains("failed to open table"));
    }
}
