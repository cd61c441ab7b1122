//! Error types for catalog scanning, resource addressing and resource reads.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// A resource URI that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// The URI does not start with this server's scheme prefix.
    #[error("Invalid URI scheme")]
    InvalidScheme,

    /// The remainder after the scheme is not `<service>/<path>` with both parts non-empty.
    #[error("Invalid resource path")]
    InvalidPath,
}

/// Errors raised while resolving or reading a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource identifier is malformed.
    #[error(transparent)]
    InvalidUri(#[from] UriError),

    /// The identifier names a service that is not in the catalog.
    #[error("Service not found: {service}")]
    ServiceNotFound {
        /// Service name parsed from the URI.
        service: String,
    },

    /// The service exists but has no record with this relative path.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Relative path parsed from the URI.
        path: String,
    },

    /// The file content could not be read as UTF-8 text.
    #[error("Cannot read file: {source}")]
    ReadError {
        /// Relative path of the record that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A non-fatal problem encountered while building the catalog.
///
/// Scan issues never abort the scan; the affected entry is left out and the
/// issue is recorded in the [`ScanReport`](super::ScanReport).
#[derive(Debug, Error)]
pub enum ScanIssue {
    /// The configured root does not exist or is not a directory.
    #[error("context path {} does not exist or is not a directory", .path.display())]
    MissingRoot {
        /// The configured root.
        path: PathBuf,
    },

    /// A directory could not be listed because access was denied.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied {
        /// The directory or entry that was skipped.
        path: PathBuf,
    },

    /// An entry could not be read for any other reason (I/O error, symlink loop).
    #[error("skipped {}: {message}", .path.display())]
    Unreadable {
        /// The entry that was skipped.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The entry name is not valid UTF-8 and cannot be addressed by a URI.
    #[error("skipped non-UTF-8 name: {}", .path.display())]
    NonUtf8Name {
        /// The entry that was skipped.
        path: PathBuf,
    },
}

impl ScanIssue {
    /// Classifies a directory traversal error.
    pub(crate) fn from_walk_error(err: &walkdir::Error, fallback: &std::path::Path) -> Self {
        let path = err.path().unwrap_or(fallback).to_path_buf();

        if err.loop_ancestor().is_some() {
            return Self::Unreadable {
                path,
                message: "symlink loop".to_string(),
            };
        }

        match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => Self::PermissionDenied { path },
            _ => Self::Unreadable {
                path,
                message: err.to_string(),
            },
        }
    }
}
