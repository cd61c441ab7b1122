//! Content-type labels for resource metadata.

/// Label used when no suffix matches.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

const MIME_TYPES: &[(&str, &str)] = &[
    (".rs", "text/x-rust"),
    (".py", "text/x-python"),
    (".js", "text/javascript"),
    (".ts", "text/typescript"),
    (".json", "application/json"),
    (".md", "text/markdown"),
    (".toml", "text/x-toml"),
    (".yml", "text/yaml"),
    (".yaml", "text/yaml"),
];

/// Returns the content-type label for a file name.
#[must_use]
pub fn mime_type(filename: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(suffix, _)| filename.ends_with(suffix))
        .map_or(DEFAULT_MIME_TYPE, |&(_, mime)| mime)
}
