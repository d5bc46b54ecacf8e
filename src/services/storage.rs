//! Locked whole-document persistence shared by the stores
//!
//! Both persisted documents are overwritten wholesale on save; callers
//! serialize concurrent writers (single-writer discipline), the locks
//! here only guard against torn reads from other processes.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::types::{DiemtrackError, Result};

/// Read a whole document under a shared lock.
///
/// Returns `Ok(None)` when the file does not exist; IO failures surface
/// to the caller, which degrades to an empty in-memory state.
pub(crate) fn read_document(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()
        .map_err(|e| DiemtrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

    let mut content = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read = reader.read_to_string(&mut content);
    let _ = file.unlock();
    read?;

    Ok(Some(content))
}

/// Save using atomic write (temp file + rename) with exclusive lock.
pub(crate) fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    {
        let mut file = File::create(&temp_path)
            .map_err(|e| DiemtrackError::Storage(format!("Failed to create temp file: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| DiemtrackError::Storage(format!("Failed to write temp file: {}", e)))?;
        file.sync_all()
            .map_err(|e| DiemtrackError::Storage(format!("Failed to sync temp file: {}", e)))?;
    }

    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    target
        .lock_exclusive()
        .map_err(|e| DiemtrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

    let renamed = fs::rename(&temp_path, path)
        .map_err(|e| DiemtrackError::Storage(format!("Failed to rename temp file: {}", e)));
    let _ = target.unlock();
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let result = read_document(&temp.path().join("nope.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");

        write_document(&path, "{\"ok\":true}").unwrap();
        let content = read_document(&path).unwrap().unwrap();
        assert_eq!(content, "{\"ok\":true}");
    }

    #[test]
    fn test_write_replaces_existing_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");

        write_document(&path, "first").unwrap();
        write_document(&path, "second").unwrap();
        assert_eq!(read_document(&path).unwrap().unwrap(), "second");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("doc.json");

        write_document(&path, "{}").unwrap();
        assert!(path.exists());
    }
}
