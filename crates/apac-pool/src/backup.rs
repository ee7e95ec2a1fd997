//! Timestamped pool backups.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

/// Sibling path `{stem}_BACKUP_{YYYYMMDD_HHMMSS}.{ext}` for `path`.
pub fn backup_path(path: &Path, at: NaiveDateTime) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = at.format("%Y%m%d_%H%M%S");
    let name = match path.extension() {
        Some(ext) => format!("{stem}_BACKUP_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_BACKUP_{stamp}"),
    };
    path.with_file_name(name)
}

/// Copy the pool file to a timestamped sibling before it is loaded.
///
/// Best effort: a failed copy is logged and `None` returned; loading goes
/// ahead regardless.
pub fn backup(path: &Path) -> Option<PathBuf> {
    let target = backup_path(path, Local::now().naive_local());
    match fs::copy(path, &target) {
        Ok(_) => {
            info!(backup = %target.display(), "number pool backed up");
            Some(target)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "number pool backup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 5)
            .and_then(|date| date.and_hms_opt(9, 3, 7))
            .unwrap()
    }

    #[test]
    fn test_backup_path_keeps_extension() {
        let path = Path::new("/data/Numeração OCI.TXT");
        assert_eq!(
            backup_path(path, at()),
            Path::new("/data/Numeração OCI_BACKUP_20240405_090307.TXT")
        );
    }

    #[test]
    fn test_backup_path_without_extension() {
        assert_eq!(
            backup_path(Path::new("pool"), at()),
            Path::new("pool_BACKUP_20240405_090307")
        );
    }

    #[test]
    fn test_backup_missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(backup(&dir.path().join("missing.txt")).is_none());
    }
}
