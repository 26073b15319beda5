//! Shared test utilities for the scholar-site test suite.
//!
//! Provides fixture setup and lookup helpers over scan-phase data
//! (`Manifest`, `Entry`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let paper = find_publication(&manifest, "2024-growth-laws");
//! assert_eq!(paper.data.journal, "Cell Systems");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::schema::{Publication, Research, Software, Writing};
use crate::types::Entry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panicking with the available slugs on miss
// =========================================================================

fn find_entry<'a, T>(entries: &'a [Entry<T>], kind: &str, slug: &str) -> &'a Entry<T> {
    entries.iter().find(|e| e.slug == slug).unwrap_or_else(|| {
        let available = slugs(entries);
        panic!("{kind} '{slug}' not found. Available: {available:?}")
    })
}

/// Find a publication by slug. Panics if not found.
pub fn find_publication<'a>(manifest: &'a Manifest, slug: &str) -> &'a Entry<Publication> {
    find_entry(&manifest.publications, "publication", slug)
}

/// Find a research entry by slug. Panics if not found.
pub fn find_research<'a>(manifest: &'a Manifest, slug: &str) -> &'a Entry<Research> {
    find_entry(&manifest.research, "research entry", slug)
}

/// Find a software entry by slug. Panics if not found.
pub fn find_software<'a>(manifest: &'a Manifest, slug: &str) -> &'a Entry<Software> {
    find_entry(&manifest.software, "software entry", slug)
}

/// Find a writing entry by slug. Panics if not found.
pub fn find_writing<'a>(manifest: &'a Manifest, slug: &str) -> &'a Entry<Writing> {
    find_entry(&manifest.writing, "writing entry", slug)
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All slugs in collection order.
pub fn slugs<T>(entries: &[Entry<T>]) -> Vec<&str> {
    entries.iter().map(|e| e.slug.as_str()).collect()
}
