//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is optional; stock defaults cover every key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Griffin Chure"
//! url = "https://gchure.bio"
//! emphasized_author = "Griffin Chure"  # Bolded wherever it appears in author lists
//!
//! [shuffle]
//! chars = "0123456789@#$%&*↗{}[]()!<>_+="
//! speed_ms = 30              # Tick interval of the hover animation
//! increment = 0.5            # Characters revealed per tick
//! restart_on_reenter = false # Cancel a running animation when hovered again
//! text_attr = "data-text"    # Hover target attribute holding the text to reveal
//! text_selector = ".shuffle-text" # Element inside the target that animates
//!
//! [build]
//! include_drafts = false     # Export writing entries marked `draft: true`
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [shuffle]
//! speed_ms = 45
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::format::DEFAULT_EMPHASIZED_AUTHOR;
use crate::shuffle::{SHUFFLE_CHARS, ShuffleOptions, TEXT_SELECTOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity.
    pub site: SiteInfo,
    /// Hover animation constants, also baked into `shuffle.js`.
    pub shuffle: ShuffleConfig,
    /// Export behaviour.
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.emphasized_author.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.emphasized_author must not be empty".into(),
            ));
        }
        if self.shuffle.chars.is_empty() {
            return Err(ConfigError::Validation(
                "shuffle.chars must not be empty".into(),
            ));
        }
        if self.shuffle.speed_ms == 0 {
            return Err(ConfigError::Validation(
                "shuffle.speed_ms must be greater than 0".into(),
            ));
        }
        if !self.shuffle.increment.is_finite() || self.shuffle.increment <= 0.0 {
            return Err(ConfigError::Validation(
                "shuffle.increment must be a positive number".into(),
            ));
        }
        if self.shuffle.text_attr.trim().is_empty() {
            return Err(ConfigError::Validation(
                "shuffle.text_attr must not be empty".into(),
            ));
        }
        if self.shuffle.text_selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "shuffle.text_selector must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub url: String,
    /// Name wrapped in `<strong class="emphasized-author">` in author lists.
    pub emphasized_author: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: DEFAULT_EMPHASIZED_AUTHOR.to_string(),
            url: "https://gchure.bio".to_string(),
            emphasized_author: DEFAULT_EMPHASIZED_AUTHOR.to_string(),
        }
    }
}

/// Hover animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShuffleConfig {
    /// Symbols drawn at random for unrevealed positions.
    pub chars: String,
    /// Milliseconds between ticks.
    pub speed_ms: u64,
    /// How far the reveal point advances per tick.
    pub increment: f64,
    /// Cancel an element's running animation when it is hovered again.
    pub restart_on_reenter: bool,
    /// Attribute on the hover target holding the text to reveal.
    pub text_attr: String,
    /// CSS selector, relative to the hover target, of the element that animates.
    pub text_selector: String,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        let options = ShuffleOptions::default();
        Self {
            chars: SHUFFLE_CHARS.to_string(),
            speed_ms: options.speed_ms,
            increment: options.increment,
            restart_on_reenter: options.restart_on_reenter,
            text_attr: options.text_attr,
            text_selector: TEXT_SELECTOR.to_string(),
        }
    }
}

impl ShuffleConfig {
    pub fn options(&self) -> ShuffleOptions {
        ShuffleOptions {
            chars: self.chars.chars().collect(),
            speed_ms: self.speed_ms,
            increment: self.increment,
            restart_on_reenter: self.restart_on_reenter,
            text_attr: self.text_attr.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Export writing entries marked `draft: true`.
    pub include_drafts: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Scholar Site Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file at content/config.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Griffin Chure"
url = "https://gchure.bio"

# Name highlighted in bold wherever it appears in an author list.
emphasized_author = "Griffin Chure"

# ---------------------------------------------------------------------------
# Hover text-scramble animation
# ---------------------------------------------------------------------------
[shuffle]
# Symbols drawn at random for characters not yet revealed.
chars = "0123456789@#$%&*↗{}[]()!<>_+="

# Milliseconds between animation ticks.
speed_ms = 30

# Characters revealed per tick (fractional values slow the reveal down).
increment = 0.5

# Hovering an element that is still animating starts a second, overlapping
# animation. Set to true to cancel the running one first.
restart_on_reenter = false

# Hover targets are the elements carrying this attribute. Its value is the
# text the animation reveals.
text_attr = "data-text"

# Selector, matched inside each hover target, of the element whose text is
# animated. Targets with no match are left alone.
text_selector = ".shuffle-text"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[build]
# Include writing entries marked `draft: true` in content.json.
include_drafts = false
"##
}
