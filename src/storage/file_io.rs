//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::warn;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read every record of a CSV file, returning an empty list if the file doesn't exist
///
/// Columns are matched by header name and fields are trimmed.
pub fn read_csv<T, P>(path: P) -> Result<Vec<T>, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a header and records to a CSV file atomically (write to temp, then rename)
///
/// The header is always written, so an empty record list still produces a
/// valid table.
pub fn write_csv_atomic<T, P>(path: P, header: &[&str], records: &[T]) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    write_atomic(path, "csv.tmp", |writer| {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer
            .write_record(header)
            .map_err(|e| LedgerError::Storage(format!("Failed to write header: {}", e)))?;

        for record in records {
            csv_writer
                .serialize(record)
                .map_err(|e| LedgerError::Storage(format!("Failed to serialize row: {}", e)))?;
        }

        csv_writer
            .flush()
            .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))
    })
}

/// Append one record to an existing CSV file without touching earlier rows
///
/// The encoded row is written with a single call and synced. A missing
/// trailing newline on the last existing row is repaired first. If the
/// write or sync fails, the file is cut back to its original length.
pub fn append_csv_record<T, P>(path: P, record: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut encoded = Vec::new();
    {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut encoded);
        csv_writer
            .serialize(record)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize row: {}", e)))?;
        csv_writer
            .flush()
            .map_err(|e| LedgerError::Storage(format!("Failed to encode row: {}", e)))?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    if !ends_with_newline(&mut file)
        .map_err(|e| LedgerError::Storage(format!("Failed to inspect {}: {}", path.display(), e)))?
    {
        encoded.insert(0, b'\n');
    }

    let original_len = file
        .metadata()
        .map_err(|e| LedgerError::Storage(format!("Failed to inspect {}: {}", path.display(), e)))?
        .len();

    write_or_rollback(&mut file, original_len, &encoded)
        .map_err(|e| LedgerError::Storage(format!("Failed to append to {}: {}", path.display(), e)))
}

/// A file-like target that can be synced and cut back to a length
trait AppendTarget: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_all()
    }
}

/// Write and sync `bytes`, truncating back to `original_len` on any failure
fn write_or_rollback<T: AppendTarget>(
    target: &mut T,
    original_len: u64,
    bytes: &[u8],
) -> io::Result<()> {
    let result = target.write_all(bytes).and_then(|_| target.sync());

    if let Err(e) = &result {
        if let Err(rollback) = target.truncate_to(original_len) {
            warn!(
                "Append failed ({}) and truncating back to {} bytes also failed: {}",
                e, original_len, rollback
            );
        }
    }

    result
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), "json.tmp", |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Shared temp-file-then-rename routine
///
/// The target is either completely replaced or not modified at all.
fn write_atomic<F>(path: &Path, temp_extension: &str, write: F) -> Result<(), LedgerError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LedgerError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = temp_path_for(path, temp_extension);

    let result = File::create(&temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;

            writer
                .flush()
                .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

            writer
                .get_ref()
                .sync_all()
                .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))
        })
        .and_then(|_| {
            fs::rename(&temp_path, path)
                .map_err(|e| LedgerError::Storage(format!("Failed to rename temp file: {}", e)))
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn temp_path_for(path: &Path, temp_extension: &str) -> PathBuf {
    path.with_extension(temp_extension)
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Row {
        name: String,
        value: i32,
    }

    fn row(name: &str, value: i32) -> Row {
        Row {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<Row> = read_csv(temp_dir.path().join("missing.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");

        let rows = vec![row("a", 1), row("b", 2)];
        write_csv_atomic(&path, &["name", "value"], &rows).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name,value\na,1\nb,2\n");
        let loaded: Vec<Row> = read_csv(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_empty_write_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");

        write_csv_atomic::<Row, _>(&path, &["name", "value"], &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name,value\n");
        let loaded: Vec<Row> = read_csv(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");

        write_csv_atomic(&path, &["name", "value"], &[row("a", 1)]).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("rows.csv.tmp").exists());
    }

    #[test]
    fn test_failed_write_leaves_original() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");
        write_csv_atomic(&path, &["name", "value"], &[row("a", 1)]).unwrap();

        // Make the rename target a directory so the final step fails
        let blocked = temp_dir.path().join("blocked");
        fs::create_dir_all(blocked.join("inner")).unwrap();
        let result = write_csv_atomic(&blocked, &["name", "value"], &[row("b", 2)]);

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert!(!temp_dir.path().join("blocked.csv.tmp").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,value\na,1\n");
    }

    #[test]
    fn test_append_preserves_existing_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");
        write_csv_atomic(&path, &["name", "value"], &[row("a", 1)]).unwrap();

        append_csv_record(&path, &row("b", 2)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name,value\na,1\nb,2\n");
    }

    #[test]
    fn test_append_repairs_missing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");
        fs::write(&path, "name,value\na,1").unwrap();

        append_csv_record(&path, &row("b", 2)).unwrap();

        let loaded: Vec<Row> = read_csv(&path).unwrap();
        assert_eq!(loaded, vec![row("a", 1), row("b", 2)]);
    }

    /// Accepts a limited number of bytes, then fails every write
    struct ShortDisk {
        data: Vec<u8>,
        capacity: usize,
        fail_sync: bool,
    }

    impl ShortDisk {
        fn holding(existing: &[u8], capacity: usize) -> Self {
            Self {
                data: existing.to_vec(),
                capacity,
                fail_sync: false,
            }
        }
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity.saturating_sub(self.data.len());
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = room.min(buf.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl AppendTarget for ShortDisk {
        fn sync(&mut self) -> io::Result<()> {
            if self.fail_sync {
                return Err(io::Error::new(io::ErrorKind::Other, "sync failed"));
            }
            Ok(())
        }

        fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_partial_append_is_rolled_back() {
        let existing = b"name,value\na,1\n";
        let mut disk = ShortDisk::holding(existing, existing.len() + 3);

        let result = write_or_rollback(&mut disk, existing.len() as u64, b"bbbbbb,2\n");

        assert!(result.is_err());
        assert_eq!(disk.data, existing);
    }

    #[test]
    fn test_failed_sync_is_rolled_back() {
        let existing = b"name,value\na,1\n";
        let mut disk = ShortDisk::holding(existing, 1024);
        disk.fail_sync = true;

        let result = write_or_rollback(&mut disk, existing.len() as u64, b"b,2\n");

        assert!(result.is_err());
        assert_eq!(disk.data, existing);
    }

    #[test]
    fn test_successful_append_is_kept() {
        let existing = b"name,value\n";
        let mut disk = ShortDisk::holding(existing, 1024);

        write_or_rollback(&mut disk, existing.len() as u64, b"a,1\n").unwrap();

        assert_eq!(disk.data, b"name,value\na,1\n");
    }

    #[test]
    fn test_read_reports_bad_rows_as_storage_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.csv");
        fs::write(&path, "name,value\na,not-a-number\n").unwrap();

        let result: Result<Vec<Row>, _> = read_csv(&path);
        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &row("a", 1)).unwrap();

        let loaded: Row = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, row("a", 1));
        assert!(!temp_dir.path().join("nested").join("dir").join("test.json.tmp").exists());
    }
}
