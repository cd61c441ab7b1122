//! File and directory predicates for the catalog scan.

/// Extensions whose files are always indexed.
const RELEVANT_EXTENSIONS: &[&str] = &[
    ".rs", ".py", ".js", ".ts", ".json", ".toml", ".yml", ".yaml",
];

/// Exact file names that are indexed regardless of extension.
const RELEVANT_NAMES: &[&str] = &[
    "Dockerfile",
    "README.md",
    "Cargo.toml",
    "package.json",
    "requirements.txt",
];

/// Build and dependency directories never descended into.
const EXCLUDED_DIRS: &[&str] = &["target", "node_modules", "__pycache__"];

/// Returns `true` if a file with this name belongs in the catalog.
#[must_use]
pub fn is_relevant(filename: &str) -> bool {
    RELEVANT_EXTENSIONS
        .iter()
        .any(|ext| filename.ends_with(ext))
        || RELEVANT_NAMES.contains(&filename)
}

/// Returns `true` if a directory with this name is hidden.
///
/// Hidden directories are skipped both as services and inside a service.
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Returns `true` if the scan must not descend into a directory with this name.
#[must_use]
pub fn is_excluded_dir(name: &str) -> bool {
    is_hidden(name) || EXCLUDED_DIRS.contains(&name)
}
