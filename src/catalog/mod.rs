//! The service catalog: an in-memory index of source files grouped by service.
//!
//! The catalog is built once at startup by [`scan`] and is read-only afterwards.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   billing/            service "billing"
//!     Cargo.toml        -> dealmate://billing/Cargo.toml
//!     src/lib.rs        -> dealmate://billing/src/lib.rs
//!     target/...        (never indexed)
//!   .git/               (hidden, not a service)
//! ```
//!
//! # Modules
//!
//! - [`filter`] — which files and directories are indexed
//! - [`scanner`] — directory traversal producing a [`ScanReport`]
//! - [`uri`] — resource URI building and parsing
//! - [`mime`] — content-type labels
//! - [`error`] — error and scan-issue types

pub mod error;
pub mod filter;
pub mod mime;
pub mod scanner;
pub mod uri;

pub use error::{ResourceError, ResourceResult, ScanIssue, UriError};
pub use scanner::{scan, ScanReport};
pub use uri::{ResourcePath, UriScheme, DEFAULT_SCHEME};

use std::path::PathBuf;

use indexmap::IndexMap;

/// One indexed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Base file name.
    pub name: String,
    /// Slash-separated path relative to the service root. Unique within the service.
    pub relative_path: String,
    /// Filesystem path used for content reads. Never sent to clients.
    pub locator: PathBuf,
    /// Owning service name.
    pub service: String,
}

impl FileRecord {
    /// Returns the content-type label for this file.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        mime::mime_type(&self.name)
    }

    /// Returns the `<service>/<relative path>` display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.service, self.relative_path)
    }

    /// Returns the `<service> - <file name>` description.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} - {}", self.service, self.name)
    }

    /// Reads the file content as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReadError`] if the file cannot be read or is
    /// not valid UTF-8.
    pub fn read_text(&self) -> ResourceResult<String> {
        std::fs::read_to_string(&self.locator).map_err(|source| ResourceError::ReadError {
            path: self.relative_path.clone(),
            source,
        })
    }
}

/// Service name to file records, in directory-entry order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: IndexMap<String, Vec<FileRecord>>,
}

impl Catalog {
    /// Returns `true` if no service was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of services.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Number of file records across all services.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    /// Service names in catalog order.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Records of one service, if present.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&[FileRecord]> {
        self.services.get(name).map(Vec::as_slice)
    }

    /// All records, service by service.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.services.values().flatten()
    }

    /// Finds the record addressed by `(service, relative_path)`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ServiceNotFound`] if the service is absent, or
    /// [`ResourceError::FileNotFound`] if the service has no such path.
    pub fn resolve(&self, service: &str, relative_path: &str) -> ResourceResult<&FileRecord> {
        let records = self
            .services
            .get(service)
            .ok_or_else(|| ResourceError::ServiceNotFound {
                service: service.to_string(),
            })?;

        records
            .iter()
            .find(|record| record.relative_path == relative_path)
            .ok_or_else(|| ResourceError::FileNotFound {
                path: relative_path.to_string(),
            })
    }

    /// Adds a scanned service. Only the scanner builds catalogs.
    pub(crate) fn insert_service(&mut self, name: String, records: Vec<FileRecord>) {
        self.services.insert(name, records);
    }
}
