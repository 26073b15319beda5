//! Content discovery and validation.
//!
//! Stage 1 of the build pipeline. Walks the four collection directories,
//! parses each entry's front matter and validates it against its schema,
//! producing a [`Manifest`] that the export stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                          # Content root
//! ├── config.toml                   # Site configuration (optional)
//! ├── publications/
//! │   ├── 2024-growth-laws.md       # slug: 2024-growth-laws
//! │   └── ribosomes/index.md        # slug: ribosomes
//! ├── research/
//! │   └── growth.md
//! ├── software/
//! │   └── cellsize.md
//! └── writing/
//!     └── notes/on-models.md        # slug: notes/on-models
//! ```
//!
//! A missing collection directory is an empty collection. Hidden files and
//! directories are skipped, as is anything without a Markdown extension.
//!
//! ## Validation
//!
//! Every entry is validated before anything is returned. Problems are
//! collected across all entries and reported together as
//! [`ScanError::Invalid`], each with the entry's path and the offending field
//! paths. Two files resolving to the same slug are also an error.

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, FrontmatterError};
use crate::naming;
use crate::schema::{Collection, Publication, Research, Schema, SchemaError, Software, Writing};
use crate::types::{Entry, cmp_order};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}", describe_invalid(.0))]
    Invalid(Vec<EntryError>),
}

fn describe_invalid(errors: &[EntryError]) -> String {
    let noun = if errors.len() == 1 { "entry" } else { "entries" };
    let mut out = format!("{} invalid {noun}:", errors.len());
    for error in errors {
        out.push_str(&format!("\n  {error}"));
    }
    out
}

/// A single entry that failed to load.
#[derive(Error, Debug)]
#[error("{source_path}: {problem}")]
pub struct EntryError {
    /// Path relative to the content root.
    pub source_path: String,
    pub problem: EntryProblem,
}

#[derive(Error, Debug)]
pub enum EntryProblem {
    #[error("could not read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),
    #[error("file name yields an empty slug")]
    EmptySlug,
    #[error("slug '{0}' is already used by {1}")]
    DuplicateSlug(String, String),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// In path order.
    pub publications: Vec<Entry<Publication>>,
    /// Ordered entries first, by `order`; the rest in path order.
    pub research: Vec<Entry<Research>>,
    /// Same ordering as research.
    pub software: Vec<Entry<Software>>,
    /// In path order, drafts included.
    pub writing: Vec<Entry<Writing>>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Number of entries in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Publications => self.publications.len(),
            Collection::Research => self.research.len(),
            Collection::Software => self.software.len(),
            Collection::Writing => self.writing.len(),
        }
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let mut errors = Vec::new();
    let publications = load_collection::<Publication>(root, Collection::Publications, &mut errors)?;
    let mut research = load_collection::<Research>(root, Collection::Research, &mut errors)?;
    let mut software = load_collection::<Software>(root, Collection::Software, &mut errors)?;
    let writing = load_collection::<Writing>(root, Collection::Writing, &mut errors)?;

    if !errors.is_empty() {
        return Err(ScanError::Invalid(errors));
    }

    research.sort_by(|a, b| cmp_order(a.data.order, b.data.order));
    software.sort_by(|a, b| cmp_order(a.data.order, b.data.order));

    Ok(Manifest {
        publications,
        research,
        software,
        writing,
        config,
    })
}

/// Load and validate every entry of one collection.
///
/// Failures are appended to `errors` so that all collections get reported in
/// one pass; only filesystem walk failures abort early.
fn load_collection<T: Schema + Send>(
    root: &Path,
    collection: Collection,
    errors: &mut Vec<EntryError>,
) -> Result<Vec<Entry<T>>, ScanError> {
    let dir = root.join(collection.dir_name());
    let files = collect_files(&dir)?;

    let results: Vec<Result<Entry<T>, EntryError>> = files
        .par_iter()
        .map(|path| load_entry(root, &dir, path))
        .collect();

    let mut entries: Vec<Entry<T>> = Vec::with_capacity(results.len());
    let mut seen: HashSet<String> = HashSet::new();
    let before = errors.len();
    for result in results {
        match result {
            Ok(entry) if seen.contains(&entry.slug) => {
                let owner = entries
                    .iter()
                    .find(|e| e.slug == entry.slug)
                    .map(|e| e.source_path.clone())
                    .unwrap_or_default();
                errors.push(EntryError {
                    source_path: entry.source_path,
                    problem: EntryProblem::DuplicateSlug(entry.slug, owner),
                });
            }
            Ok(entry) => {
                seen.insert(entry.slug.clone());
                entries.push(entry);
            }
            Err(e) => errors.push(e),
        }
    }

    tracing::info!(
        "{}: {} entries, {} invalid",
        collection,
        entries.len(),
        errors.len() - before
    );
    Ok(entries)
}

/// Content files under `dir`, sorted by path. Empty if `dir` does not exist.
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        tracing::debug!("No directory at {}, collection is empty", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && naming::is_content_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn load_entry<T: Schema>(root: &Path, dir: &Path, path: &Path) -> Result<Entry<T>, EntryError> {
    let source_path = relative_path(root, path);
    let fail = |problem: EntryProblem| EntryError {
        source_path: source_path.clone(),
        problem,
    };

    let slug = naming::slug_from_path(path.strip_prefix(dir).unwrap_or(path));
    if slug.is_empty() {
        return Err(fail(EntryProblem::EmptySlug));
    }

    let content = fs::read_to_string(path).map_err(|e| fail(e.into()))?;
    let (value, body) = frontmatter::parse(&content).map_err(|e| fail(e.into()))?;
    let data = T::validate(&value).map_err(|e| fail(e.into()))?;

    tracing::debug!("Loaded {} as '{}'", source_path, slug);
    Ok(Entry {
        slug,
        source_path,
        body,
        data,
    })
}

/// `path` relative to `root`, with forward slashes on every platform.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
