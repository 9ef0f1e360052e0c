// src/pipeline/readers/csv_reader.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::data_model::Record;
use crate::error::{PipelineError, Result};
use crate::pipeline::readers::BaseReader;

/// Reads Records from a UTF-8 CSV source whose first row is the header.
///
/// Rows are matched to the header by position. Short rows are padded with
/// empty values and extra trailing fields are ignored, so a ragged row never
/// aborts a run. Invalid UTF-8 and malformed quoting do.
pub struct CsvReader<R: Read> {
    headers: Vec<String>,
    reader: csv::Reader<R>,
    source: String,
}

impl CsvReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PipelineError::IoError {
                source: std::io::Error::new(
                    e.kind(),
                    format!("cannot open input '{}': {}", path.display(), e),
                ),
            }
        })?;
        Self::from_reader(file, path.display().to_string())
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R, source: impl Into<String>) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let source = source.into();
        info!(source = %source, columns = headers.len(), "Opened CSV input");
        Ok(CsvReader {
            headers,
            reader,
            source,
        })
    }

    /// Streams the remaining rows as Records.
    pub fn records(self) -> impl Iterator<Item = Result<Record>> {
        let CsvReader {
            headers,
            reader,
            source,
        } = self;
        reader
            .into_records()
            .enumerate()
            .map(move |(i, row)| -> Result<Record> {
                Ok(to_record(&headers, &row?, i, &source))
            })
    }
}

fn to_record(headers: &[String], row: &StringRecord, index: usize, source: &str) -> Record {
    if row.len() > headers.len() {
        warn!(
            source = %source,
            row = index + 1,
            extra = row.len() - headers.len(),
            "Row has more fields than the header; extra fields ignored"
        );
    }
    headers
        .iter()
        .enumerate()
        .map(|(col, name)| (name.as_str(), row.get(col).unwrap_or("")))
        .collect()
}

impl<R: Read + 'static> BaseReader for CsvReader<R> {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn read_records(self) -> Result<Box<dyn Iterator<Item = Result<Record>>>> {
        Ok(Box::new(self.records()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_quoted_fields_and_preserves_column_order() {
        let data = "id,type1,url\n1,\"School, ASL\",http://a\n2,\"Multi\nline\",http://b\n";
        let reader = CsvReader::from_reader(data.as_bytes(), "inline").unwrap();
        assert_eq!(reader.headers(), &["id", "type1", "url"]);
        let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("type1"), Some("School, ASL"));
        assert_eq!(records[1].get("type1"), Some("Multi\nline"));
        assert_eq!(
            records[0].columns().collect::<Vec<_>>(),
            vec!["id", "type1", "url"]
        );
    }

    #[test]
    fn test_ragged_rows_are_padded_or_truncated() {
        let data = "a,b,c\n1\n1,2,3,4\n";
        let reader = CsvReader::from_reader(data.as_bytes(), "inline").unwrap();
        let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records[0].get("b"), Some(""));
        assert_eq!(records[0].get("c"), Some(""));
        assert_eq!(records[1].get("c"), Some("3"));
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_header_only_input_yields_no_records() {
        let reader = CsvReader::from_reader("a,b\n".as_bytes(), "inline").unwrap();
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        match CsvReader::from_path("definitely/not/here.csv") {
            Err(PipelineError::IoError { source }) => {
                assert!(source.to_string().contains("definitely/not/here.csv"))
            }
            Err(other) => panic!("Expected IoError, got {:?}", other),
            Ok(_) => panic!("Expected IoError, got Ok"),
        }
    }
}
