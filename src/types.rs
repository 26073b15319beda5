//! Types shared between the scan and export stages.

use serde::Serialize;
use std::cmp::Ordering;

/// A validated content entry together with where it came from.
///
/// `data` is one of the collection records in [`crate::schema`]. Entries are
/// immutable once the scan stage has produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    /// Identifier derived from the path inside the collection directory.
    pub slug: String,
    /// Path relative to the content root, with forward slashes.
    pub source_path: String,
    /// Markdown after the front matter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    pub data: T,
}

impl<T> Entry<T> {
    pub fn new(slug: impl Into<String>, data: T) -> Self {
        Self {
            slug: slug.into(),
            source_path: String::new(),
            body: String::new(),
            data,
        }
    }
}

/// Ordering for collections with an optional `order` field.
///
/// Entries with an `order` come first, ascending; entries without one compare
/// equal to each other, so a stable sort keeps their natural (path) order.
pub fn cmp_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
