/// Error types for the application
///
/// Every failure is recoverable: the window controller turns an `Error`
/// into a status-bar notice and keeps running.
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which part of the program a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or empty image directory, unreadable config
    Configuration,
    /// A single file could not be decoded as an image
    Decode,
    /// Layout save or load failed
    Persistence,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("image folder does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("no images found in folder: {}", .0.display())]
    NoImages(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has no pixels: {}", path.display())]
    EmptyImage { path: PathBuf },

    #[error("cannot write layout {}: {reason}", path.display())]
    LayoutEncode { path: PathBuf, reason: String },

    #[error("cannot read layout {}: {reason}", path.display())]
    LayoutDecode { path: PathBuf, reason: String },

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    /// File or folder the failure is about
    pub fn path(&self) -> &Path {
        match self {
            Error::MissingDirectory(path) | Error::NoImages(path) => path,
            Error::Io { path, .. }
            | Error::Decode { path, .. }
            | Error::EmptyImage { path }
            | Error::LayoutEncode { path, .. }
            | Error::LayoutDecode { path, .. }
            | Error::Config { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingDirectory(_) | Error::NoImages(_) | Error::Config { .. } => {
                ErrorKind::Configuration
            }
            Error::Decode { .. } | Error::EmptyImage { .. } => ErrorKind::Decode,
            Error::Io { .. } | Error::LayoutEncode { .. } | Error::LayoutDecode { .. } => {
                ErrorKind::Persistence
            }
        }
    }
}
