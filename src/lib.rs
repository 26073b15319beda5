//! # Scholar Site
//!
//! The content core of a personal academic website. Markdown files with YAML
//! front matter are the data source: four collections (publications,
//! research, software, writing) are validated against strict schemas and
//! turned into display-ready JSON for the page templates.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan     content/  →  manifest.json     (front matter → validated entries)
//! 2. Export   manifest  →  dist/content.json (formatted authors, dates, HTML bodies)
//!                       →  dist/shuffle.js   (hover animation)
//! ```
//!
//! The scan stage fails before any output is written if a single entry is
//! invalid, and it reports every problem at once. The export stage never
//! fails on content: unknown publication references are dropped and
//! unparseable dates render as `Invalid Date`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the collection directories, produces the manifest |
//! | [`export`] | Stage 2: derives display data and writes the output directory |
//! | [`schema`] | Collection records and their front matter validation |
//! | [`frontmatter`] | Splits the YAML header from the Markdown body |
//! | [`naming`] | Slug derivation from file paths |
//! | [`format`] | Author list and date formatting |
//! | [`resolve`] | Publication lookups by slug |
//! | [`shuffle`] | The text scramble hover animation, on a virtual clock |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`types`] | The entry envelope shared between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Strict Schemas
//!
//! Unknown front matter keys are errors, the same as unknown `config.toml`
//! keys. A typo such as `jounral:` would otherwise silently drop a field.
//!
//! ## Soft References
//!
//! Research and software entries point at publications by slug. These lists
//! are maintained by hand, so a stale slug is dropped from the output rather
//! than failing the build. `scholar-site check` lists them.
//!
//! ## Deterministic Animation
//!
//! The hover animation is modelled as a state machine driven by an explicit
//! event loop with a virtual clock and an injected RNG. The browser script in
//! `static/shuffle.js` follows the same frame rules.

pub mod config;
pub mod export;
pub mod format;
pub mod frontmatter;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod schema;
pub mod shuffle;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
