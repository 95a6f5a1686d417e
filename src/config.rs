//! Library configuration.
//!
//! Handles loading, validating, and merging `library.toml`. Stock defaults are
//! the base layer; an optional `library.toml` in the library root overrides
//! any subset of them, and CLI flags override the result.
//!
//! ## Config File Location
//!
//! ```text
//! books/
//! ├── library.toml             # Optional, only read from the root
//! ├── index.html               # Generated
//! ├── المال-والاستثمار/
//! │   └── psychology-of-money-summary.html
//! └── health/
//!     └── why-we-sleep.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 5500
//!
//! [index]
//! file_name = "index.html"  # Generated page, never scanned as a book
//! title = "مكتبتي الشخصية"
//! tagline = "ملخصات الكتب باللغة العربية"
//! count_label = "كتب"       # Shown after the total in the header badge
//! footer = "مكتبة شخصية للملخصات العربية | يتم التحديث تلقائيا"
//! lang = "ar"
//! dir = "rtl"               # rtl, ltr or auto
//!
//! [extract]
//! description_limit = 150   # Characters kept before "..." is appended
//! chapter_label = "فصل"     # Word after the chapter count
//!
//! [theme]
//! background = "#0f0f1a"
//! surface = "#1a1a2e"
//! accent = "#e94560"
//! text = "#e0e0e0"
//! text_muted = "#8888a0"
//!
//! [categories.finance]      # Keyed by directory name
//! icon = "💰"
//! name = "Money"
//! ```
//!
//! Config files are sparse. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file in the library root.
pub const CONFIG_FILE: &str = "library.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Library configuration loaded from `library.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Generated page settings.
    pub index: IndexConfig,
    /// Metadata extraction tuning.
    pub extract: ExtractConfig,
    /// Page colors, emitted as CSS custom properties.
    pub theme: ThemeConfig,
    /// Display labels keyed by category directory name.
    pub categories: BTreeMap<String, CategoryLabel>,
}

impl LibraryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let file_name = &self.index.file_name;
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "index.file_name must be a bare file name".into(),
            ));
        }
        if !file_name.to_ascii_lowercase().ends_with(".html") {
            return Err(ConfigError::Validation(
                "index.file_name must end in .html".into(),
            ));
        }
        if !matches!(self.index.dir.as_str(), "rtl" | "ltr" | "auto") {
            return Err(ConfigError::Validation(
                "index.dir must be one of rtl, ltr, auto".into(),
            ));
        }
        if self.extract.description_limit == 0 {
            return Err(ConfigError::Validation(
                "extract.description_limit must be greater than 0".into(),
            ));
        }
        for (key, value) in self.theme.entries() {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme.{key} must not be empty"
                )));
            }
            // Theme values land inside the page's <style> element.
            if value.contains('<') {
                return Err(ConfigError::Validation(format!(
                    "theme.{key} must not contain '<'"
                )));
            }
        }
        Ok(())
    }
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on. `0.0.0.0` makes the library reachable from phones
    /// on the same network.
    pub bind: String,
    /// TCP port. `0` asks the OS for a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5500,
        }
    }
}

/// Generated index page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// File written in the root and excluded from scanning.
    pub file_name: String,
    pub title: String,
    pub tagline: String,
    pub count_label: String,
    pub footer: String,
    pub lang: String,
    pub dir: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file_name: "index.html".to_string(),
            title: "مكتبتي الشخصية".to_string(),
            tagline: "ملخصات الكتب باللغة العربية".to_string(),
            count_label: "كتب".to_string(),
            footer: "مكتبة شخصية للملخصات العربية | يتم التحديث تلقائيا".to_string(),
            lang: "ar".to_string(),
            dir: "rtl".to_string(),
        }
    }
}

/// Metadata extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Maximum description length in characters before `...` is appended.
    pub description_limit: usize,
    /// Word placed after the chapter count.
    pub chapter_label: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            description_limit: 150,
            chapter_label: "فصل".to_string(),
        }
    }
}

/// Page colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Page background.
    pub background: String,
    /// Header and tile background.
    pub surface: String,
    /// Badges, category headings, dismiss button.
    pub accent: String,
    /// Primary text color.
    pub text: String,
    /// Author lines, tagline.
    pub text_muted: String,
}

impl ThemeConfig {
    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("background", &self.background),
            ("surface", &self.surface),
            ("accent", &self.accent),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
        ]
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#0f0f1a".to_string(),
            surface: "#1a1a2e".to_string(),
            accent: "#e94560".to_string(),
            text: "#e0e0e0".to_string(),
            text_muted: "#8888a0".to_string(),
        }
    }
}

/// Display label for one category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryLabel {
    pub icon: String,
    pub name: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(LibraryConfig::default())?)
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

/// Load `library.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
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
) -> Result<LibraryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LibraryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a library root, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<LibraryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `library.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bookshelf configuration
# =======================
# Place this file in the library root as library.toml.
# All settings are optional; values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Listener
# ---------------------------------------------------------------------------
[server]
# 0.0.0.0 makes the library reachable from other devices on the network.
bind = "0.0.0.0"
port = 5500

# ---------------------------------------------------------------------------
# Generated index page
# ---------------------------------------------------------------------------
[index]
# Written into the library root on every refresh and never treated as a book.
file_name = "index.html"
title = "مكتبتي الشخصية"
tagline = "ملخصات الكتب باللغة العربية"
# Shown after the total number of books in the header badge.
count_label = "كتب"
footer = "مكتبة شخصية للملخصات العربية | يتم التحديث تلقائيا"
lang = "ar"
# Text direction: rtl, ltr or auto.
dir = "rtl"

# ---------------------------------------------------------------------------
# Metadata extraction
# ---------------------------------------------------------------------------
[extract]
# Descriptions longer than this many characters are cut and get "...".
description_limit = 150
# Word placed after the chapter count on each tile.
chapter_label = "فصل"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[theme]
background = "#0f0f1a"
surface = "#1a1a2e"
accent = "#e94560"
text = "#e0e0e0"
text_muted = "#8888a0"

# ---------------------------------------------------------------------------
# Category labels, keyed by directory name
# ---------------------------------------------------------------------------
# Directories without a label show a generic icon and their name with
# dashes turned into spaces.
#
# [categories.finance]
# icon = "💰"
# name = "Money & Investing"
"##
}

/// Generate CSS custom properties from the theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-accent: {accent};
    --color-text: {text};
    --color-text-muted: {text_muted};
}}"#,
        background = theme.background,
        surface = theme.surface,
        accent = theme.accent,
        text = theme.text,
        text_muted = theme.text_muted,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = LibraryConfig::default();
        assert_eq!(config.server.port, 5500);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.index.file_name, "index.html");
        assert_eq!(config.extract.description_limit, 150);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 8080
"#;
        let config: LibraryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        // Defaults preserved
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.index.dir, "rtl");
    }

    #[test]
    fn parse_category_labels() {
        let toml = r#"
[categories.finance]
icon = "$"
name = "Money"
"#;
        let config: LibraryConfig = toml::from_str(toml).unwrap();
        let label = &config.categories["finance"];
        assert_eq!(label.icon, "$");
        assert_eq!(label.name, "Money");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.server.port, 5500);
        assert_eq!(config.theme.accent, "#e94560");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
[index]
title = "Reading Room"
lang = "en"
dir = "ltr"

[theme]
accent = "#336699"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.index.title, "Reading Room");
        assert_eq!(config.index.dir, "ltr");
        assert_eq!(config.theme.accent, "#336699");
        // Unspecified values should be defaults
        assert_eq!(config.theme.background, "#0f0f1a");
        assert_eq!(config.index.file_name, "index.html");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn config_directory_named_like_file_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<LibraryConfig, _> = toml::from_str(
            r#"
[server]
prot = 80
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<LibraryConfig, _> = toml::from_str("[servr]\nport = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_category_key_rejected() {
        let result: Result<LibraryConfig, _> = toml::from_str(
            r#"
[categories.finance]
icon = "$"
name = "Money"
colour = "red"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[extract]\nlimit = 10\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(LibraryConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_index_file_name() {
        let mut config = LibraryConfig::default();
        config.index.file_name = "sub/index.html".to_string();
        assert!(config.validate().is_err());

        config.index.file_name = "index.txt".to_string();
        assert!(config.validate().is_err());

        config.index.file_name = String::new();
        assert!(config.validate().is_err());

        config.index.file_name = "Library.HTML".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_direction() {
        let mut config = LibraryConfig::default();
        config.index.dir = "sideways".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("index.dir"));
    }

    #[test]
    fn validate_description_limit() {
        let mut config = LibraryConfig::default();
        config.extract.description_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_theme_color() {
        let mut config = LibraryConfig::default();
        config.theme.surface = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("theme.surface"));
    }

    #[test]
    fn validate_rejects_markup_in_theme() {
        let mut config = LibraryConfig::default();
        config.theme.accent = "red</style><script>alert(1)</script>".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("theme.accent"));
    }

    #[test]
    fn load_config_rejects_markup_in_theme() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[theme]\nbackground = \"#000</style>\"\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[extract]\ndescription_limit = 0\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[server]
bind = "0.0.0.0"
port = 5500
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[server]\nport = 9000\n").unwrap();
        let merged = merge_toml(base, overlay);
        let server = merged.get("server").unwrap();
        assert_eq!(server.get("port").unwrap().as_integer(), Some(9000));
        assert_eq!(server.get("bind").unwrap().as_str(), Some("0.0.0.0"));
    }

    #[test]
    fn merge_toml_adds_new_category_tables() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[categories.health]
icon = "+"
name = "Health"
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories["health"].name, "Health");
        assert_eq!(config.server.port, 5500);
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("port = 1").unwrap();
        let overlay: toml::Value = toml::from_str("port = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("port").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // stock_config_toml / CSS tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: LibraryConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = LibraryConfig::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.index.title, defaults.index.title);
        assert_eq!(config.index.footer, defaults.index.footer);
        assert_eq!(config.extract.chapter_label, defaults.extract.chapter_label);
        assert_eq!(config.theme.text_muted, defaults.theme.text_muted);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[server]", "[index]", "[extract]", "[theme]", "[categories."] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn generate_theme_css_includes_all_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--color-bg: #0f0f1a"));
        assert!(css.contains("--color-surface: #1a1a2e"));
        assert!(css.contains("--color-accent: #e94560"));
        assert!(css.contains("--color-text: #e0e0e0"));
        assert!(css.contains("--color-text-muted: #8888a0"));
    }
}
