//! Download targets.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::StorageError;
use crate::interfaces::DownloadSink;

/// Writes downloaded documents as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file_name: &str, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), bytes = contents.len(), "Wrote download");
        Ok(())
    }
}
