//! Front matter extraction from Markdown entries.
//!
//! An entry starts with a `---` fence, a YAML header, and a closing `---`
//! on its own line. Everything after the closing fence is the body.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("no front matter: file must start with a `---` fenced YAML header")]
    Missing,
    #[error("invalid YAML in front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n(.*))?\z")
            .expect("constant pattern")
    })
}

/// Split a document into its raw YAML header and Markdown body.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let caps = fence_regex().captures(content)?;
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());
    Some((yaml, body))
}

/// Parse the front matter of a document into a raw YAML value.
///
/// An empty header yields an empty mapping, so schema validation reports the
/// missing fields rather than a shape error.
pub fn parse(content: &str) -> Result<(Value, String), FrontmatterError> {
    let (yaml, body) = split(content).ok_or(FrontmatterError::Missing)?;
    let value = if yaml.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(yaml)?
    };
    Ok((value, body.to_string()))
}
