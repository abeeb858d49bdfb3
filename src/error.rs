use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a document export. None of these are recoverable
/// per page: a document renders completely or not at all.
#[derive(Error, Debug)]
pub enum Error {
    /// A document descriptor or page sub-descriptor could not be read or parsed.
    #[error("Corrupted document data in {}: {reason}", path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// The document declares no pages.
    #[error("Document '{name}' is empty; aborting export")]
    EmptyDocument { name: String },

    /// A page's background image could not be read or measured.
    #[error("Cannot use page image {}: {reason}", path.display())]
    ImageUnavailable { path: PathBuf, reason: String },

    /// The output artifact could not be written.
    #[error("I/O problem encountered when exporting: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ImageUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
