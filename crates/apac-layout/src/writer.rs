//! Remittance file writer.
//!
//! Records are written in one pass as raw ASCII bytes. The file is staged
//! next to its destination and renamed into place once fully flushed, so a
//! failed run never leaves a half-written remittance behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::record::Record;

/// Streams encoded records to any writer.
pub struct BatchWriter<W: Write> {
    writer: BufWriter<W>,
    bytes_written: u64,
    records_written: usize,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            bytes_written: 0,
            records_written: 0,
        }
    }

    /// Write one record.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NonAscii`] if the record carries a byte above 0x7F,
    /// [`LayoutError::RecordLength`] if its length does not match its kind,
    /// [`LayoutError::Stream`] if the underlying writer fails.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let kind = record.kind();
        if !record.as_str().is_ascii() {
            return Err(LayoutError::NonAscii { kind });
        }
        if record.len() != kind.length() {
            return Err(LayoutError::RecordLength {
                kind,
                actual: record.len(),
                expected: kind.length(),
            });
        }
        self.writer.write_all(record.as_bytes())?;
        self.bytes_written += record.len() as u64;
        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered bytes and hand back the inner writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| LayoutError::Stream(err.into_error()))
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_all<'a, I>(mut writer: BatchWriter<File>, records: I) -> Result<(File, usize, u64)>
where
    I: IntoIterator<Item = &'a Record>,
{
    for record in records {
        writer.write_record(record)?;
    }
    let records = writer.records_written();
    let bytes = writer.bytes_written();
    Ok((writer.finish()?, records, bytes))
}

/// Write `records` to `path` in order and return the number of bytes written.
pub fn write_batch<'a, I>(path: &Path, records: I) -> Result<u64>
where
    I: IntoIterator<Item = &'a Record>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LayoutError::io("create directory", parent, e))?;
    }

    let temp_path = staging_path(path);
    let file = File::create(&temp_path).map_err(|e| LayoutError::io("create", &temp_path, e))?;
    let writer = BatchWriter::new(file);

    let staged = write_all(writer, records).and_then(|(file, records, bytes)| {
        file.sync_all()
            .map_err(|e| LayoutError::io("sync", &temp_path, e))?;
        Ok((records, bytes))
    });
    let (records, bytes) = match staged {
        Ok(counts) => counts,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(match err {
                LayoutError::Stream(source) => LayoutError::io("write", &temp_path, source),
                other => other,
            });
        }
    };

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(LayoutError::io("rename", path, source));
    }
    debug!(path = %path.display(), records, bytes, "remittance written");
    Ok(bytes)
}
