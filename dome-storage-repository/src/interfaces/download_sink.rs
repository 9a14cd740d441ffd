//! Download target trait definition.

use crate::errors::StorageError;

/// Host primitive that hands a generated document to the user.
///
/// In a browser this is a client-side file download; the bundled
/// `DirectorySink` writes the file into a directory instead.
pub trait DownloadSink: Send + Sync {
    /// Deliver `contents` as a file called `file_name`.
    fn deliver(&self, file_name: &str, contents: &str) -> Result<(), StorageError>;
}
