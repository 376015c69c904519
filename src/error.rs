use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Rejected before pagination starts (bad geometry, scale, header level).
    InvalidInput(String),
    /// The rasterized document could not be loaded (image decode, manifest).
    Source(String),
    /// The PDF writer failed to commit a page or finish the document.
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::Source(msg) => write!(f, "could not load rendered document: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Source(format!("image decode failed: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Source(format!("malformed manifest: {e}"))
    }
}
