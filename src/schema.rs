//! Content collection schemas and structural validation.
//!
//! Every content entry carries a YAML front matter header. The scanner hands
//! the parsed header to this module as a raw [`serde_yaml::Value`] and gets
//! back either a typed record or a [`SchemaError`] listing every offending
//! field, each with a path like `authors[1].name`.
//!
//! ## Collections
//!
//! | Collection | Required | Optional |
//! |------------|----------|----------|
//! | publications | `title`, `date`, `authors`, `journal` | `description`, `summary`, `abstract`, `tags`, `DOI`, `image`, `links` |
//! | research | `title`, `description` | `order`, `image`, `publications` |
//! | software | `title`, `description` | `order`, `image`, `stack`, `links`, `publications` |
//! | writing | `title`, `description`, `date`, `tags` | `draft` |
//!
//! ## Strictness
//!
//! Unknown keys are rejected, the same way `config.toml` rejects them: a typo
//! like `jounral` should fail the build rather than silently drop a field.
//! A key written with no value (`description:`) parses as YAML `null`, which is
//! a type mismatch, not an absent field.
//!
//! Validation walks the whole record instead of stopping at the first problem,
//! so one build run reports everything an author has to fix.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use thiserror::Error;

/// The four content collections, each backed by `content/<dir_name>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Publications,
    Research,
    Software,
    Writing,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Publications,
        Collection::Research,
        Collection::Software,
        Collection::Writing,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Publications => "publications",
            Collection::Research => "research",
            Collection::Software => "software",
            Collection::Writing => "writing",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

// ============================================================================
// Typed records
// ============================================================================

/// A publication author. Order within a publication is meaningful.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Author {
    pub name: String,
    /// Equal-contribution author, rendered with a `†` marker.
    #[serde(skip_serializing_if = "is_false")]
    pub equal: bool,
    /// Corresponding author, rendered with a `*` marker.
    #[serde(skip_serializing_if = "is_false")]
    pub corr: bool,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn equal(mut self) -> Self {
        self.equal = true;
        self
    }

    pub fn corr(mut self) -> Self {
        self.corr = true;
        self
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A named external link (PDF, code, preprint, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publication {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub date: String,
    pub authors: Vec<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub journal: String,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

/// A research theme. `publications` holds publication slugs, checked only
/// at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Research {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Software {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Tech stack labels, e.g. `["Python", "NumPy"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Writing {
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

impl Writing {
    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Unknown,
}

/// One offending field. An empty path refers to the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.problem {
            Problem::Missing => write!(f, "{path}: missing required field"),
            Problem::WrongType { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            Problem::Unknown => write!(f, "{path}: unknown field"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<FieldIssue>,
}

impl SchemaError {
    /// Paths of all offending fields, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.path.as_str()).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A typed front matter record that can be validated from raw YAML.
pub trait Schema: Sized {
    fn validate(value: &Value) -> Result<Self, SchemaError>;
}

// ============================================================================
// Validator
// ============================================================================

const PUBLICATION_FIELDS: &[&str] = &[
    "title",
    "description",
    "summary",
    "abstract",
    "date",
    "authors",
    "tags",
    "journal",
    "DOI",
    "image",
    "links",
];
const AUTHOR_FIELDS: &[&str] = &["name", "equal", "corr"];
const LINK_FIELDS: &[&str] = &["name", "url"];
const RESEARCH_FIELDS: &[&str] = &["title", "description", "order", "image", "publications"];
const SOFTWARE_FIELDS: &[&str] = &[
    "title",
    "description",
    "order",
    "image",
    "stack",
    "links",
    "publications",
];
const WRITING_FIELDS: &[&str] = &["title", "description", "date", "tags", "draft"];

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// A mapping being validated, with the path it was reached by.
struct Fields<'v> {
    map: &'v Mapping,
    path: String,
}

impl<'v> Fields<'v> {
    fn get(&self, key: &str) -> Option<&'v Value> {
        self.map.get(key)
    }

    fn path_of(&self, key: &str) -> String {
        join_path(&self.path, key)
    }
}

/// Accumulates issues while typed fields are extracted.
///
/// Extraction methods always return a value so record construction can carry
/// on after a failure; placeholders never escape because [`Validator::finish`]
/// discards the record when any issue was recorded.
#[derive(Default)]
struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    fn push(&mut self, path: String, problem: Problem) {
        self.issues.push(FieldIssue { path, problem });
    }

    fn wrong_type(&mut self, path: String, expected: &'static str, value: &Value) {
        self.push(
            path,
            Problem::WrongType {
                expected,
                found: type_name(value),
            },
        );
    }

    /// Open a mapping at `path`, flagging keys outside `known`.
    fn record<'v>(
        &mut self,
        value: &'v Value,
        path: String,
        known: &[&str],
    ) -> Option<Fields<'v>> {
        let Value::Mapping(map) = value else {
            self.wrong_type(path, "object", value);
            return None;
        };
        for key in map.keys() {
            match key.as_str() {
                Some(k) if known.contains(&k) => {}
                Some(k) => self.push(join_path(&path, k), Problem::Unknown),
                None => self.push(
                    join_path(&path, &format!("<{} key>", type_name(key))),
                    Problem::Unknown,
                ),
            }
        }
        Some(Fields { map, path })
    }

    fn string(&mut self, path: String, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => {
                self.wrong_type(path, "string", other);
                String::new()
            }
        }
    }

    fn required_string(&mut self, fields: &Fields, key: &str) -> String {
        match fields.get(key) {
            Some(value) => self.string(fields.path_of(key), value),
            None => {
                self.push(fields.path_of(key), Problem::Missing);
                String::new()
            }
        }
    }

    fn optional_string(&mut self, fields: &Fields, key: &str) -> Option<String> {
        let value = fields.get(key)?;
        Some(self.string(fields.path_of(key), value))
    }

    fn optional_bool(&mut self, fields: &Fields, key: &str) -> Option<bool> {
        match fields.get(key)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.wrong_type(fields.path_of(key), "boolean", other);
                None
            }
        }
    }

    fn optional_number(&mut self, fields: &Fields, key: &str) -> Option<f64> {
        match fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            other => {
                self.wrong_type(fields.path_of(key), "number", other);
                None
            }
        }
    }

    fn list<T>(
        &mut self,
        path: String,
        value: &Value,
        mut item: impl FnMut(&mut Self, String, &Value) -> T,
    ) -> Vec<T> {
        let Value::Sequence(seq) = value else {
            self.wrong_type(path, "array", value);
            return Vec::new();
        };
        seq.iter()
            .enumerate()
            .map(|(i, v)| item(self, format!("{path}[{i}]"), v))
            .collect()
    }

    fn required_list<T>(
        &mut self,
        fields: &Fields,
        key: &str,
        item: impl FnMut(&mut Self, String, &Value) -> T,
    ) -> Vec<T> {
        match fields.get(key) {
            Some(value) => self.list(fields.path_of(key), value, item),
            None => {
                self.push(fields.path_of(key), Problem::Missing);
                Vec::new()
            }
        }
    }

    fn optional_list<T>(
        &mut self,
        fields: &Fields,
        key: &str,
        item: impl FnMut(&mut Self, String, &Value) -> T,
    ) -> Option<Vec<T>> {
        let value = fields.get(key)?;
        Some(self.list(fields.path_of(key), value, item))
    }

    fn author(&mut self, path: String, value: &Value) -> Author {
        let Some(fields) = self.record(value, path, AUTHOR_FIELDS) else {
            return Author::default();
        };
        Author {
            name: self.required_string(&fields, "name"),
            equal: self.optional_bool(&fields, "equal").unwrap_or(false),
            corr: self.optional_bool(&fields, "corr").unwrap_or(false),
        }
    }

    fn link(&mut self, path: String, value: &Value) -> Link {
        let Some(fields) = self.record(value, path, LINK_FIELDS) else {
            return Link {
                name: String::new(),
                url: String::new(),
            };
        };
        Link {
            name: self.required_string(&fields, "name"),
            url: self.required_string(&fields, "url"),
        }
    }

    fn finish<T>(self, record: T) -> Result<T, SchemaError> {
        if self.issues.is_empty() {
            Ok(record)
        } else {
            Err(SchemaError {
                issues: self.issues,
            })
        }
    }

    fn fail<T>(self) -> Result<T, SchemaError> {
        Err(SchemaError {
            issues: self.issues,
        })
    }
}

impl Schema for Publication {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let mut v = Validator::default();
        let Some(f) = v.record(value, String::new(), PUBLICATION_FIELDS) else {
            return v.fail();
        };
        let publication = Publication {
            title: v.required_string(&f, "title"),
            description: v.optional_string(&f, "description"),
            summary: v.optional_string(&f, "summary"),
            abstract_text: v.optional_string(&f, "abstract"),
            date: v.required_string(&f, "date"),
            authors: v.required_list(&f, "authors", Validator::author),
            tags: v.optional_list(&f, "tags", Validator::string),
            journal: v.required_string(&f, "journal"),
            doi: v.optional_string(&f, "DOI"),
            image: v.optional_string(&f, "image"),
            links: v.optional_list(&f, "links", Validator::link),
        };
        v.finish(publication)
    }
}

impl Schema for Research {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let mut v = Validator::default();
        let Some(f) = v.record(value, String::new(), RESEARCH_FIELDS) else {
            return v.fail();
        };
        let research = Research {
            title: v.required_string(&f, "title"),
            description: v.required_string(&f, "description"),
            order: v.optional_number(&f, "order"),
            image: v.optional_string(&f, "image"),
            publications: v.optional_list(&f, "publications", Validator::string),
        };
        v.finish(research)
    }
}

impl Schema for Software {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let mut v = Validator::default();
        let Some(f) = v.record(value, String::new(), SOFTWARE_FIELDS) else {
            return v.fail();
        };
        let software = Software {
            title: v.required_string(&f, "title"),
            description: v.required_string(&f, "description"),
            order: v.optional_number(&f, "order"),
            image: v.optional_string(&f, "image"),
            stack: v.optional_list(&f, "stack", Validator::string),
            links: v.optional_list(&f, "links", Validator::link),
            publications: v.optional_list(&f, "publications", Validator::string),
        };
        v.finish(software)
    }
}

impl Schema for Writing {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let mut v = Validator::default();
        let Some(f) = v.record(value, String::new(), WRITING_FIELDS) else {
            return v.fail();
        };
        let writing = Writing {
            title: v.required_string(&f, "title"),
            description: v.required_string(&f, "description"),
            date: v.required_string(&f, "date"),
            tags: v.required_list(&f, "tags", Validator::string),
            draft: v.optional_bool(&f, "draft"),
        };
        v.finish(writing)
    }
}
