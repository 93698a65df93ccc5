//! Chunked CSV writer
//!
//! Buffers flattened rows and flushes them to the sink in fixed-size chunks,
//! so peak memory is bounded by the chunk size no matter how many records an
//! export produces. The first flush creates the file and writes the header
//! row; every later flush appends data rows only.

use crate::core::flatten::{FlatIssue, COLUMNS};
use crate::domain::errors::SonarexError;
use crate::domain::result::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Buffered CSV writer with a fixed flush threshold.
pub struct ChunkedCsvWriter {
    path: PathBuf,
    chunk_size: usize,
    buffer: Vec<FlatIssue>,
    header_written: bool,
    rows_written: u64,
}

impl ChunkedCsvWriter {
    /// Create a writer targeting `path`, flushing every `chunk_size` rows.
    ///
    /// The file itself is not created until the first flush, so a run that
    /// produces no rows leaves no empty artifact behind.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `chunk_size` is zero.
    pub fn create(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SonarexError::Validation(
                "Chunk size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            chunk_size,
            buffer: Vec::with_capacity(chunk_size),
            header_written: false,
            rows_written: 0,
        })
    }

    /// Path of the sink file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total rows flushed so far (excludes rows still buffered).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Append rows, flushing whenever the buffer reaches the chunk size.
    pub fn append(&mut self, rows: impl IntoIterator<Item = FlatIssue>) -> Result<()> {
        for row in rows {
            self.buffer.push(row);
            if self.buffer.len() >= self.chunk_size {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Flush all remaining rows and return the total row count written.
    ///
    /// Closing without ever having flushed is a no-op: no file is created.
    /// Closing with an empty buffer after earlier flushes leaves the
    /// existing file untouched and valid.
    pub fn close(mut self) -> Result<u64> {
        if !self.buffer.is_empty() {
            self.flush()?;
        }
        Ok(self.rows_written)
    }

    /// Write the buffered rows to the sink and clear the buffer.
    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                SonarexError::Io(format!(
                    "Failed to open output file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !self.header_written {
            writer.write_record(COLUMNS)?;
            self.header_written = true;
        }

        for row in &self.buffer {
            writer.write_record(row.to_record())?;
        }

        writer
            .flush()
            .map_err(|e| SonarexError::Io(format!("Failed to flush CSV writer: {e}")))?;

        self.rows_written += self.buffer.len() as u64;
        tracing::debug!(
            path = %self.path.display(),
            flushed = self.buffer.len(),
            total = self.rows_written,
            "Flushed chunk to sink"
        );
        self.buffer.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flatten::flatten_issue;
    use crate::domain::issue::RawIssue;
    use serde_json::json;
    use tempfile::TempDir;
    use test_case::test_case;

    fn row(key: &str) -> FlatIssue {
        let issue: RawIssue = serde_json::from_value(json!({"key": key})).unwrap();
        flatten_issue(&issue)
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test_case(1; "chunk of one")]
    #[test_case(3; "chunk smaller than total")]
    #[test_case(7; "chunk equal to total")]
    #[test_case(100; "chunk larger than total")]
    fn test_all_rows_written_once_in_order(chunk_size: usize) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.csv");

        let mut writer = ChunkedCsvWriter::create(&path, chunk_size).unwrap();
        writer
            .append((0..7).map(|i| row(&format!("KEY-{i}"))))
            .unwrap();
        let total = writer.close().unwrap();

        assert_eq!(total, 7);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 8); // header + 7 rows
        assert!(lines[0].starts_with("key,rule,severity"));
        for (i, line) in lines[1..].iter().enumerate() {
            assert!(line.starts_with(&format!("KEY-{i},")));
        }
    }

    #[test]
    fn test_header_written_exactly_once_across_flushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.csv");

        let mut writer = ChunkedCsvWriter::create(&path, 2).unwrap();
        writer.append([row("A"), row("B")]).unwrap(); // flush 1
        writer.append([row("C"), row("D")]).unwrap(); // flush 2
        writer.append([row("E")]).unwrap(); // buffered
        writer.close().unwrap(); // final flush

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 6);
        let header_count = lines
            .iter()
            .filter(|l| l.starts_with("key,rule"))
            .count();
        assert_eq!(header_count, 1);
    }

    #[test]
    fn test_close_without_rows_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.csv");

        let writer = ChunkedCsvWriter::create(&path, 10).unwrap();
        let total = writer.close().unwrap();

        assert_eq!(total, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_with_empty_buffer_after_flush_keeps_file_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.csv");

        let mut writer = ChunkedCsvWriter::create(&path, 1).unwrap();
        writer.append([row("A")]).unwrap(); // flushed immediately
        let total = writer.close().unwrap();

        assert_eq!(total, 1);
        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.csv");

        let issue: RawIssue = serde_json::from_value(json!({
            "key": "K-1",
            "message": "Remove this, it is unused",
            "tags": ["bug", "cwe"]
        }))
        .unwrap();

        let mut writer = ChunkedCsvWriter::create(&path, 10).unwrap();
        writer.append([flatten_issue(&issue)]).unwrap();
        writer.close().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "K-1");
        let msg_index = COLUMNS.iter().position(|c| *c == "message").unwrap();
        assert_eq!(&record[msg_index], "Remove this, it is unused");
        let tags_index = COLUMNS.iter().position(|c| *c == "tags").unwrap();
        assert_eq!(&record[tags_index], "bug,cwe");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let dir = TempDir::new().unwrap();
        let result = ChunkedCsvWriter::create(dir.path().join("x.csv"), 0);
        assert!(matches!(result, Err(SonarexError::Validation(_))));
    }
}
