use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::debug;

use crate::data_model::Record;
use crate::error::{PipelineError, Result};
use crate::pipeline::writers::BaseWriter;

/// Output column order: every input column in its original position, then
/// each added column not already present, in the order given.
pub fn merge_headers(input: &[String], added: &[String]) -> Vec<String> {
    let mut headers = input.to_vec();
    for column in added {
        if !headers.contains(column) {
            headers.push(column.clone());
        }
    }
    headers
}

/// Writes Records as CSV under a fixed header. The header row is written on
/// construction, so even an empty run produces a well-formed file.
pub struct CsvWriter<W: Write> {
    headers: Vec<String>,
    writer: Option<csv::Writer<W>>,
    written: usize,
}

impl CsvWriter<File> {
    pub fn from_path(path: impl AsRef<Path>, headers: Vec<String>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PipelineError::IoError {
            source: std::io::Error::new(
                e.kind(),
                format!("cannot create output '{}': {}", path.display(), e),
            ),
        })?;
        Self::new(file, headers)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W, headers: Vec<String>) -> Result<Self> {
        let mut writer = WriterBuilder::new().from_writer(inner);
        writer.write_record(&headers)?;
        Ok(CsvWriter {
            headers,
            writer: Some(writer),
            written: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| PipelineError::Unexpected("CSV writer already closed".to_string()))?;
        writer
            .into_inner()
            .map_err(|e| PipelineError::IoError {
                source: std::io::Error::new(e.error().kind(), e.error().to_string()),
            })
    }
}

impl<W: Write> BaseWriter for CsvWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PipelineError::Unexpected("CSV writer already closed".to_string()))?;
        writer.write_record(self.headers.iter().map(|h| record.get(h).unwrap_or("")))?;
        self.written += 1;
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!(records = self.written, "CSV output flushed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::readers::CsvReader;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_headers_appends_only_new_columns() {
        let merged = merge_headers(
            &strings(&["id", "type1", "group"]),
            &strings(&["id", "keywords_processed", "group", "extra"]),
        );
        assert_eq!(merged, strings(&["id", "type1", "group", "keywords_processed", "extra"]));
    }

    #[test]
    fn test_written_csv_reads_back_with_missing_columns_empty() {
        let mut writer = CsvWriter::new(Vec::new(), strings(&["type1", "url", "group"])).unwrap();
        let first: Record = [("type1", "School, ASL"), ("url", "u1"), ("group", "Education")]
            .into_iter()
            .collect();
        let second: Record = [("url", "u2"), ("type1", "Line\nbreak")].into_iter().collect();
        writer.write_record(&first).unwrap();
        writer.write_record(&second).unwrap();
        assert_eq!(writer.written(), 2);
        let bytes = writer.into_inner().unwrap();

        let reader = CsvReader::from_reader(bytes.as_slice(), "roundtrip").unwrap();
        let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records[0].get("type1"), Some("School, ASL"));
        assert_eq!(records[1].get("type1"), Some("Line\nbreak"));
        assert_eq!(records[1].get("group"), Some(""));
        assert_eq!(
            records[1].columns().collect::<Vec<_>>(),
            vec!["type1", "url", "group"]
        );
    }

    #[test]
    fn test_empty_output_still_has_header() {
        let writer = CsvWriter::new(Vec::new(), strings(&["a", "b"])).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), "a,b");
    }
}
