#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use NewsSieve::data_model::Record;
use NewsSieve::error::Result;
use NewsSieve::pipeline::readers::{BaseReader, CsvReader};

// Helper to write an input CSV fixture into a temp dir
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write CSV fixture");
    path
}

// Reads a CSV back as (header, records)
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Record>) {
    let reader = CsvReader::from_path(path).expect("Failed to open CSV output");
    let headers = reader.headers().to_vec();
    let records = reader
        .records()
        .collect::<Result<Vec<_>>>()
        .expect("Failed to read CSV output");
    (headers, records)
}
