//! Directory traversal that builds the [`Catalog`].
//!
//! Every direct, non-hidden subdirectory of the root is a service. Each
//! service is walked recursively, skipping hidden and build/dependency
//! directories, and every relevant file becomes a [`FileRecord`].
//!
//! The scan never fails. Entries that cannot be read are left out and
//! reported as [`ScanIssue`]s alongside the (possibly partial) catalog.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::error::ScanIssue;
use super::filter::{is_excluded_dir, is_hidden, is_relevant};
use super::{Catalog, FileRecord};

/// Result of a catalog scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// The catalog built from every readable entry.
    pub catalog: Catalog,
    /// Entries that were skipped, with the reason.
    pub issues: Vec<ScanIssue>,
}

impl ScanReport {
    /// Returns `true` if nothing was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    fn record(&mut self, issue: ScanIssue) {
        warn!(%issue, "Catalog scan skipped an entry");
        self.issues.push(issue);
    }
}

/// Scans `root` and builds the catalog.
///
/// A missing root yields an empty catalog and a [`ScanIssue::MissingRoot`].
#[must_use]
pub fn scan(root: &Path) -> ScanReport {
    let mut report = ScanReport::default();

    if !root.is_dir() {
        report.record(ScanIssue::MissingRoot {
            path: root.to_path_buf(),
        });
        return report;
    }

    let entries = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report.record(ScanIssue::from_walk_error(&err, root));
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let Some(service) = entry.file_name().to_str() else {
            report.record(ScanIssue::NonUtf8Name {
                path: entry.path().to_path_buf(),
            });
            continue;
        };

        if is_hidden(service) {
            continue;
        }

        let (records, issues) = scan_service(service, entry.path());
        debug!(service, files = records.len(), "Indexed service");

        for issue in issues {
            report.record(issue);
        }
        report.catalog.insert_service(service.to_string(), records);
    }

    report
}

/// Walks one service directory and returns its records plus any skipped entries.
fn scan_service(service: &str, service_root: &Path) -> (Vec<FileRecord>, Vec<ScanIssue>) {
    let mut records = Vec::new();
    let mut issues = Vec::new();

    let walker = WalkDir::new(service_root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir() && e.file_name().to_str().is_some_and(is_excluded_dir))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                issues.push(ScanIssue::from_walk_error(&err, service_root));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            issues.push(ScanIssue::NonUtf8Name {
                path: entry.path().to_path_buf(),
            });
            continue;
        };

        if !is_relevant(name) {
            continue;
        }

        let Some(relative_path) = relative_path(service_root, entry.path()) else {
            issues.push(ScanIssue::NonUtf8Name {
                path: entry.path().to_path_buf(),
            });
            continue;
        };

        records.push(FileRecord {
            name: name.to_string(),
            relative_path,
            locator: entry.path().to_path_buf(),
            service: service.to_string(),
        });
    }

    (records, issues)
}

/// Joins the components of `path` below `root` with `/`.
///
/// Returns `None` if `path` is not below `root` or a component is not UTF-8.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let segments = path
        .strip_prefix(root)
        .ok()?
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;

    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, relative).unwrap();
    }

    fn paths(report: &ScanReport, service: &str) -> Vec<String> {
        let mut paths: Vec<String> = report
            .catalog
            .service(service)
            .unwrap()
            .iter()
            .map(|r| r.relative_path.clone())
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn missing_root_gives_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let report = scan(&dir.path().join("does-not-exist"));

        assert!(report.catalog.is_empty());
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(report.issues[0], ScanIssue::MissingRoot { .. }));
    }

    #[test]
    fn file_as_root_is_missing_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "file.rs");

        let report = scan(&dir.path().join("file.rs"));
        assert!(report.catalog.is_empty());
        assert!(matches!(report.issues[0], ScanIssue::MissingRoot { .. }));
    }

    #[test]
    fn services_are_top_level_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "alpha/main.py");
        touch(dir.path(), "beta/index.ts");
        touch(dir.path(), ".hidden/secret.rs");
        touch(dir.path(), "top-level.rs");

        let report = scan(dir.path());
        assert!(report.is_complete());

        let mut services: Vec<&str> = report.catalog.service_names().collect();
        services.sort_unstable();
        assert_eq!(services, ["alpha", "beta"]);
    }

    #[test]
    fn excluded_directories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "svc/README.md");
        touch(dir.path(), "svc/node_modules/ignored.js");
        touch(dir.path(), "svc/target/debug/build.rs");
        touch(dir.path(), "svc/pkg/__pycache__/cached.py");
        touch(dir.path(), "svc/.git/config.json");

        let report = scan(dir.path());
        assert_eq!(paths(&report, "svc"), ["README.md"]);
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "svc/src/bin/tool.rs");
        touch(dir.path(), "svc/notes.txt");

        let report = scan(dir.path());
        let records = report.catalog.service("svc").unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.name, "tool.rs");
        assert_eq!(record.relative_path, "src/bin/tool.rs");
        assert_eq!(record.service, "svc");
        assert_eq!(
            record.locator,
            dir.path().join("svc").join("src").join("bin").join("tool.rs")
        );
    }

    #[test]
    fn empty_service_is_still_listed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        touch(dir.path(), "docs/guide.pdf");

        let report = scan(dir.path());
        assert_eq!(report.catalog.service("docs").map(<[_]>::len), Some(0));
    }

    #[test]
    fn relative_path_outside_root() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/c/d.rs")),
            None
        );
        assert_eq!(
            relative_path(Path::new("/a/b"), &PathBuf::from("/a/b/c/d.rs")),
            Some("c/d.rs".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "svc/ok.rs");
        touch(dir.path(), "svc/locked/hidden.rs");

        let locked = dir.path().join("svc/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory anyway.
        let restricted = fs::read_dir(&locked).is_err();
        let report = scan(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let found = paths(&report, "svc");
        assert!(found.contains(&"ok.rs".to_string()));
        if restricted {
            assert_eq!(found, ["ok.rs"]);
            assert!(report
                .issues
                .iter()
                .any(|issue| matches!(issue, ScanIssue::PermissionDenied { .. })));
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_reported() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "svc/a/lib.rs");
        std::os::unix::fs::symlink(dir.path().join("svc"), dir.path().join("svc/a/back")).unwrap();

        let report = scan(dir.path());
        assert_eq!(paths(&report, "svc"), ["a/lib.rs"]);
        assert!(report
            .issues
            .iter()
            .any(|issue| matches!(issue, ScanIssue::Unreadable { .. })));
    }
}
