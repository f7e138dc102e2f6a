//! Dump-file bootstrap
//!
//! Creates the data folder and the per-database dump files on startup.
//! Failures are logged and tolerated: the in-memory state stays
//! authoritative and a later flush retries the write.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::error;

/// Creates `folder` (with parents) and one empty `<file_stem><index>` file
/// per database index, leaving existing files untouched.
pub fn create_folder_and_files(folder: &Path, file_stem: &str, count: usize) {
    if let Err(e) = fs::create_dir_all(folder) {
        error!("unable to create folder {}: {}", folder.display(), e);
        return;
    }
    for index in 0..count {
        let path = folder.join(format!("{}{}", file_stem, index));
        if path.is_file() {
            continue;
        }
        if let Err(e) = OpenOptions::new().write(true).create(true).open(&path) {
            error!("unable to create file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_folder_and_files() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("data");
        create_folder_and_files(&folder, "db_file", 4);
        for index in 0..4 {
            assert!(folder.join(format!("db_file{}", index)).is_file());
        }
    }

    #[test]
    fn test_existing_files_are_left_alone() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("data");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("db_file0"), "k:\"v\"\n").unwrap();

        create_folder_and_files(&folder, "db_file", 2);
        assert_eq!(fs::read_to_string(folder.join("db_file0")).unwrap(), "k:\"v\"\n");
        assert!(folder.join("db_file1").is_file());
    }
}
