#![allow(dead_code)]

use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Helper for managing temporary report and config files in tests
pub struct TempFile {
    pub path: Utf8PathBuf,
    _temp_dir: TempDir,
}

impl TempFile {
    pub fn new(name: &str, content: &str) -> Self {
        let temp = Self::new_empty(name);
        std::fs::write(&temp.path, content).unwrap();
        temp
    }

    /// Path inside a fresh temp dir with nothing written to it
    pub fn new_empty(name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join(name)).unwrap();

        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn dir(&self) -> Utf8PathBuf {
        self.path.parent().unwrap().to_owned()
    }
}
