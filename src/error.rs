use std::{fmt, path::PathBuf};

/// Errors the clipper reports as distinct conditions rather than generic failures.
#[derive(Debug)]
pub enum ClipError {
    /// The boundary file does not exist.
    MissingBoundary(PathBuf),
    /// An original (unclipped) input file does not exist.
    MissingInput { label: String, path: PathBuf },
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::MissingBoundary(path) => write!(f, "Boundary file {} not found!", path.display()),
            ClipError::MissingInput { path, .. } => {
                let file = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
                write!(f, "Original file {} not found!", file.display())
            }
        }
    }
}

impl std::error::Error for ClipError {}
