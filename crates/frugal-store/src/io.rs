//! Atomic file operations and backups

use std::path::{Path, PathBuf};

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

/// Create a timestamped byte-identical backup copy of a file.
///
/// Returns the backup path (`<original>.backup.<unix-millis>`). Backups are
/// never auto-deleted.
pub fn backup_file(path: &Path) -> std::io::Result<PathBuf> {
    let millis = chrono::Utc::now().timestamp_millis();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "conversation".to_string());
    let backup_path = path.with_file_name(format!("{}.backup.{}", file_name, millis));
    std::fs::copy(path, &backup_path)?;
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write() {
        let temp = tempfile::TempDir::new().unwrap();
        let test_file = temp.path().join("atomic.txt");

        let data = b"Hello, world!";
        atomic_write(&test_file, data).unwrap();

        let read_data = std::fs::read(&test_file).unwrap();
        assert_eq!(data, read_data.as_slice());
    }

    #[test]
    fn test_backup_is_byte_identical() {
        let temp = tempfile::TempDir::new().unwrap();
        let original = temp.path().join("conversation.json");
        std::fs::write(&original, b"[{\"role\":\"user\"}]").unwrap();

        let backup = backup_file(&original).unwrap();

        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("conversation.json.backup."));
        assert_eq!(
            std::fs::read(&original).unwrap(),
            std::fs::read(&backup).unwrap()
        );
    }

    #[test]
    fn test_backup_missing_file_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(backup_file(&missing).is_err());
    }
}
