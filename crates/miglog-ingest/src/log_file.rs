//! Locating and reading the migration run log.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Conventional log file name written by the migration tool.
pub const DEFAULT_LOG_FILE_NAME: &str = "dataMigration.log";

/// Resolves the log path for a migration directory, preferring an explicit
/// override when one is given.
pub fn resolve_log_path(migration_dir: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => migration_dir.join(DEFAULT_LOG_FILE_NAME),
    }
}

/// Reads the whole run log into memory. A missing or unreadable log is fatal
/// for the run.
pub fn read_log_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(IngestError::LogNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path).map_err(|e| IngestError::LogRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "read migration log");
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_the_conventional_name_under_the_migration_dir() {
        let resolved = resolve_log_path(Path::new("/srv/migration"), None);
        assert_eq!(resolved, PathBuf::from("/srv/migration/dataMigration.log"));
    }

    #[test]
    fn explicit_path_wins_over_the_convention() {
        let resolved = resolve_log_path(
            Path::new("/srv/migration"),
            Some(Path::new("/tmp/other.log")),
        );
        assert_eq!(resolved, PathBuf::from("/tmp/other.log"));
    }

    #[test]
    fn missing_log_is_reported_with_its_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_LOG_FILE_NAME);
        let err = read_log_file(&path).unwrap_err();
        assert!(matches!(err, IngestError::LogNotFound { .. }));
        assert!(err.to_string().contains("dataMigration.log"));
    }

    #[test]
    fn reads_log_contents_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_LOG_FILE_NAME);
        fs::write(&path, "[step: A]\nline\n").unwrap();
        let contents = read_log_file(&path).unwrap();
        assert_eq!(contents, "[step: A]\nline\n");
    }
}
