//! Slug derivation from content file paths.
//!
//! An entry's slug is its path inside the collection directory, extension
//! dropped, each segment slugified. It is the identifier that research and
//! software entries use to reference publications.
//!
//! - `publications/2024-growth-laws.md` → `2024-growth-laws`
//! - `publications/Cell Size Control.md` → `cell-size-control`
//! - `writing/notes/on-models.md` → `notes/on-models`
//! - `research/growth/index.md` → `growth`

use std::path::{Component, Path};

/// Extensions recognized as content entries.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// Slugify one path segment.
///
/// Lowercases, turns each space into a dash, and drops anything that is not
/// alphanumeric, `-` or `_`. Runs of dashes are kept as written.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Whether `path` has a content extension (case-insensitive).
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| CONTENT_EXTENSIONS.contains(&e.as_str()))
}

/// Derive the slug for a file path relative to its collection directory.
///
/// A trailing `index` file takes its directory's name. Returns an empty
/// string for paths with no usable segment.
pub fn slug_from_path(rel: &Path) -> String {
    let mut segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(last);
        if !(stem.eq_ignore_ascii_case("index") && !segments.is_empty()) {
            segments.push(stem);
        }
    }

    segments
        .iter()
        .map(|s| slugify(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
