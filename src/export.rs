//! Display data export.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and derives
//! everything the page templates render: formatted author lists, display
//! dates, Markdown bodies as HTML, and research/software publication lists
//! resolved to full references.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── content.json    # SiteContent, consumed by the templates
//! └── shuffle.js      # Hover animation with constants from [shuffle]
//! ```
//!
//! ## Ordering
//!
//! - Publications and writing: newest first. Undated entries sort last.
//! - Research and software: as scanned (explicit `order` first).
//!
//! Writing entries marked `draft: true` are left out unless
//! `build.include_drafts` is set.

use crate::config::{ShuffleConfig, SiteConfig, SiteInfo};
use crate::format::{emphasize_name, format_authors, format_authors_html, format_date, parse_date};
use crate::resolve::get_publications_by_slugs;
use crate::scan::Manifest;
use crate::schema::{Author, Link, Publication};
use crate::types::Entry;
use maud::html;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const SHUFFLE_JS: &str = include_str!("../static/shuffle.js");

/// Everything the templates need, written as `content.json`.
#[derive(Debug, Serialize)]
pub struct SiteContent {
    pub site: SiteInfo,
    pub publications: Vec<PublicationView>,
    pub research: Vec<ProjectView>,
    pub software: Vec<ProjectView>,
    pub writing: Vec<WritingView>,
}

#[derive(Debug, Serialize)]
pub struct PublicationView {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub date: String,
    /// `Jan 5, 2024`, or `Invalid Date`.
    pub display_date: String,
    pub authors: Vec<Author>,
    /// Plain author line with `†`/`*` markers.
    pub authors_text: String,
    /// HTML author line with `<sup>` markers.
    pub authors_html: String,
    /// Escaped plain author line with the site owner, markers included, in
    /// `<strong class="emphasized-author">`.
    pub authors_emphasized: String,
    pub tags: Vec<String>,
    pub journal: String,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_html: String,
}

/// A publication as listed under a research or software entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationRef {
    pub slug: String,
    pub title: String,
    pub journal: String,
    pub display_date: String,
}

/// A research or software entry.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Resolved references; unknown slugs are already dropped.
    pub publications: Vec<PublicationRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_html: String,
}

#[derive(Debug, Serialize)]
pub struct WritingView {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub display_date: String,
    pub tags: Vec<String>,
    pub draft: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_html: String,
}

/// What [`export`] wrote.
#[derive(Debug)]
pub struct ExportSummary {
    pub publications: usize,
    pub research: usize,
    pub software: usize,
    pub writing: usize,
    pub drafts_skipped: usize,
    pub files: Vec<PathBuf>,
}

/// Write `content.json` and `shuffle.js` into `output_dir`.
pub fn export(manifest: &Manifest, output_dir: &Path) -> Result<ExportSummary, ExportError> {
    let content = build_content(manifest);

    fs::create_dir_all(output_dir)?;

    let content_path = output_dir.join("content.json");
    fs::write(&content_path, serde_json::to_string_pretty(&content)?)?;

    let script_path = output_dir.join("shuffle.js");
    fs::write(&script_path, shuffle_script(&manifest.config.shuffle)?)?;

    let summary = ExportSummary {
        publications: content.publications.len(),
        research: content.research.len(),
        software: content.software.len(),
        writing: content.writing.len(),
        drafts_skipped: manifest.writing.len() - content.writing.len(),
        files: vec![content_path, script_path],
    };
    tracing::info!(
        "Exported {} publications, {} writing entries",
        summary.publications,
        summary.writing
    );
    Ok(summary)
}

/// Derive the display data for every collection.
pub fn build_content(manifest: &Manifest) -> SiteContent {
    let config = &manifest.config;
    let all = &manifest.publications;

    let mut publications: Vec<PublicationView> = all
        .iter()
        .map(|entry| publication_view(entry, config))
        .collect();
    sort_newest_first(&mut publications, |p| &p.date);

    let research = manifest
        .research
        .iter()
        .map(|entry| {
            let data = &entry.data;
            ProjectView {
                slug: entry.slug.clone(),
                title: data.title.clone(),
                description: data.description.clone(),
                order: data.order,
                image: data.image.clone(),
                publications: publication_refs(data.publications.as_deref(), all),
                stack: Vec::new(),
                links: Vec::new(),
                body_html: render_markdown(&entry.body),
            }
        })
        .collect();

    let software = manifest
        .software
        .iter()
        .map(|entry| {
            let data = &entry.data;
            ProjectView {
                slug: entry.slug.clone(),
                title: data.title.clone(),
                description: data.description.clone(),
                order: data.order,
                image: data.image.clone(),
                publications: publication_refs(data.publications.as_deref(), all),
                stack: data.stack.clone().unwrap_or_default(),
                links: data.links.clone().unwrap_or_default(),
                body_html: render_markdown(&entry.body),
            }
        })
        .collect();

    let mut writing: Vec<WritingView> = manifest
        .writing
        .iter()
        .filter(|entry| {
            let keep = config.build.include_drafts || !entry.data.is_draft();
            if !keep {
                tracing::debug!("Skipping draft {}", entry.source_path);
            }
            keep
        })
        .map(|entry| {
            let data = &entry.data;
            WritingView {
                slug: entry.slug.clone(),
                title: data.title.clone(),
                description: data.description.clone(),
                date: data.date.clone(),
                display_date: format_date(&data.date),
                tags: data.tags.clone(),
                draft: data.is_draft(),
                body_html: render_markdown(&entry.body),
            }
        })
        .collect();
    sort_newest_first(&mut writing, |w| &w.date);

    SiteContent {
        site: config.site.clone(),
        publications,
        research,
        software,
        writing,
    }
}

fn publication_view(entry: &Entry<Publication>, config: &SiteConfig) -> PublicationView {
    let data = &entry.data;
    PublicationView {
        slug: entry.slug.clone(),
        title: data.title.clone(),
        description: data.description.clone(),
        summary: data.summary.clone(),
        abstract_text: data.abstract_text.clone(),
        date: data.date.clone(),
        display_date: format_date(&data.date),
        authors: data.authors.clone(),
        authors_text: format_authors(&data.authors),
        authors_html: format_authors_html(&data.authors),
        authors_emphasized: emphasize_name(
            &html! { (format_authors(&data.authors)) }.into_string(),
            &html! { (config.site.emphasized_author) }.into_string(),
        ),
        tags: data.tags.clone().unwrap_or_default(),
        journal: data.journal.clone(),
        doi: data.doi.clone(),
        image: data.image.clone(),
        links: data.links.clone().unwrap_or_default(),
        body_html: render_markdown(&entry.body),
    }
}

fn publication_refs(slugs: Option<&[String]>, all: &[Entry<Publication>]) -> Vec<PublicationRef> {
    get_publications_by_slugs(slugs, all)
        .into_iter()
        .map(|p| PublicationRef {
            slug: p.slug.clone(),
            title: p.data.title.clone(),
            journal: p.data.journal.clone(),
            display_date: format_date(&p.data.date),
        })
        .collect()
}

/// Stable sort, newest first; unparseable dates go last in their original order.
fn sort_newest_first<T>(items: &mut [T], date: impl Fn(&T) -> &String) {
    items.sort_by(|a, b| parse_date(date(b)).cmp(&parse_date(date(a))));
}

/// Convert Markdown to HTML. Whitespace-only input gives an empty string.
///
/// `$...$` and `$$...$$` become `math-inline` / `math-display` spans for
/// KaTeX to typeset in the browser. Tables and `~~strikethrough~~` are on too.
pub fn render_markdown(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }
    let options = Options::ENABLE_MATH | Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// The hover animation script with the configured constants filled in.
pub fn shuffle_script(config: &ShuffleConfig) -> Result<String, ExportError> {
    Ok(SHUFFLE_JS
        .replace("__SHUFFLE_CHARS__", &serde_json::to_string(&config.chars)?)
        .replace("__SPEED_MS__", &config.speed_ms.to_string())
        .replace("__INCREMENT__", &config.increment.to_string())
        .replace("__RESTART__", &config.restart_on_reenter.to_string())
        .replace("__TEXT_ATTR__", &serde_json::to_string(&config.text_attr)?)
        .replace("__TEXT_SELECTOR__", &serde_json::to_string(&config.text_selector)?))
}
