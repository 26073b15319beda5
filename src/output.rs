//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entry is its semantic identity (positional index and title),
//! with the source file shown as an indented `Source:` line. This keeps the
//! output readable as a content inventory while still letting users trace
//! data back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Publications (2)
//!     001 Growth laws (Jan 5, 2024)
//!         Source: publications/2024-growth-laws.md
//!
//! Research (1)
//!     001 Bacterial growth
//!         Source: research/growth.md
//!         How cells decide how fast to grow
//!         Publications: 2024-growth-laws
//!
//! Writing (1)
//!     001 On models (draft)
//!         Source: writing/on-models.md
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Check
//!
//! ```text
//! Dangling references
//!     research/growth → 2021-retracted
//! ```
//!
//! ## Export
//!
//! ```text
//! content.json
//! shuffle.js
//! Exported 2 publications, 1 research, 0 software, 1 writing (1 draft skipped)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::export::ExportSummary;
use crate::format::format_date;
use crate::resolve::DanglingReference;
use crate::scan::Manifest;
use crate::types::Entry;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entry header: positional index + title, with optional detail.
///
/// ```text
/// 001 Growth laws (Jan 5, 2024)
/// 001 Bacterial growth
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Section heading with its entry count, or `None` for an empty collection.
fn section_header(name: &str, count: usize) -> Option<String> {
    (count > 0).then(|| format!("{} ({})", name, count))
}

/// Header and `Source:` line for one entry.
fn entry_lines<T>(
    lines: &mut Vec<String>,
    index: usize,
    entry: &Entry<T>,
    title: &str,
    detail: Option<&str>,
) {
    lines.push(format!("{}{}", indent(1), entity_header(index, title, detail)));
    lines.push(format!("{}Source: {}", indent(2), entry.source_path));
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

struct ProjectLine<'a> {
    source: &'a str,
    title: &'a str,
    description: &'a str,
    publications: Option<&'a [String]>,
}

/// Format scan stage output showing the discovered collections.
///
/// Empty collections are omitted.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut sections: Vec<Vec<String>> = Vec::new();

    if let Some(header) = section_header("Publications", manifest.publications.len()) {
        let mut lines = vec![header];
        for (i, entry) in manifest.publications.iter().enumerate() {
            let date = format_date(&entry.data.date);
            entry_lines(&mut lines, i + 1, entry, &entry.data.title, Some(date.as_str()));
        }
        sections.push(lines);
    }

    // Research and software share a shape: title, description, references
    let research: Vec<ProjectLine> = manifest
        .research
        .iter()
        .map(|e| ProjectLine {
            source: &e.source_path,
            title: &e.data.title,
            description: &e.data.description,
            publications: e.data.publications.as_deref(),
        })
        .collect();
    let software: Vec<ProjectLine> = manifest
        .software
        .iter()
        .map(|e| ProjectLine {
            source: &e.source_path,
            title: &e.data.title,
            description: &e.data.description,
            publications: e.data.publications.as_deref(),
        })
        .collect();

    for (name, projects) in [("Research", research), ("Software", software)] {
        let Some(header) = section_header(name, projects.len()) else {
            continue;
        };
        let mut lines = vec![header];
        for (i, project) in projects.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                entity_header(i + 1, project.title, None)
            ));
            lines.push(format!("{}Source: {}", indent(2), project.source));
            let preview = truncate_desc(project.description.trim(), 60);
            if !preview.is_empty() {
                lines.push(format!("{}{}", indent(2), preview));
            }
            if let Some(slugs) = project.publications.filter(|s| !s.is_empty()) {
                lines.push(format!("{}Publications: {}", indent(2), slugs.join(", ")));
            }
        }
        sections.push(lines);
    }

    if let Some(header) = section_header("Writing", manifest.writing.len()) {
        let mut lines = vec![header];
        for (i, entry) in manifest.writing.iter().enumerate() {
            let detail = entry.data.is_draft().then_some("draft");
            entry_lines(&mut lines, i + 1, entry, &entry.data.title, detail);
        }
        sections.push(lines);
    }

    // Config section
    let mut config_lines = vec!["Config".to_string()];
    if source_root.join("config.toml").exists() {
        config_lines.push(format!("{}config.toml", indent(1)));
    } else {
        config_lines.push(format!("{}(stock defaults)", indent(1)));
    }
    sections.push(config_lines);

    sections.join(&String::new())
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format unresolved publication references found by `check`.
pub fn format_check_output(dangling: &[DanglingReference]) -> Vec<String> {
    if dangling.is_empty() {
        return vec!["No dangling references".to_string()];
    }
    let mut lines = vec!["Dangling references".to_string()];
    for reference in dangling {
        lines.push(format!(
            "{}{}/{} \u{2192} {}",
            indent(1),
            reference.collection.dir_name(),
            reference.from,
            reference.slug
        ));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(dangling: &[DanglingReference]) {
    for line in format_check_output(dangling) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Export output
// ============================================================================

/// Format export stage output: written files relative to `output_dir`, then totals.
pub fn format_export_output(summary: &ExportSummary, output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .files
        .iter()
        .map(|f| f.strip_prefix(output_dir).unwrap_or(f).display().to_string())
        .collect();

    let mut totals = format!(
        "Exported {} publications, {} research, {} software, {} writing",
        summary.publications, summary.research, summary.software, summary.writing
    );
    match summary.drafts_skipped {
        0 => {}
        1 => totals.push_str(" (1 draft skipped)"),
        n => totals.push_str(&format!(" ({} drafts skipped)", n)),
    }
    lines.push(totals);
    lines
}

/// Print export output to stdout.
pub fn print_export_output(summary: &ExportSummary, output_dir: &Path) {
    for line in format_export_output(summary, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
