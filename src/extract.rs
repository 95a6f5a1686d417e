//! Metadata extraction from book documents.
//!
//! Book summaries are hand-written HTML pages that share a loose structure:
//! a hero with an icon, an `<h1>` title, an English subtitle, an author line,
//! an intro section and a run of chapter blocks. Rather than parse the DOM,
//! each field is located with its own pattern and taken from the **first**
//! match. Fields are independent: a page missing its subtitle still yields
//! its title, author and so on.
//!
//! ## Field rules
//!
//! | Field | Marker | Default |
//! |-------|--------|---------|
//! | title | first `<h1 ...>text</h1>` | file stem |
//! | subtitle | first `class="subtitle"` element | empty |
//! | author | first `class="author"` element, cut at `—` | empty |
//! | icon | first `class="book-icon"` element | 📖 |
//! | description | first 50–200 character `<p>` after `intro-section`, else after `problem-section` | empty |
//! | chapters | count of `class="chapter"` | empty when zero |
//!
//! Captured text is trimmed and has its character references decoded
//! (`&#128176;` becomes 💰) so the index renderer can escape it once.
//!
//! This is a heuristic, not a validator: malformed markup simply produces
//! fewer matches.

use crate::config::ExtractConfig;
use crate::types::Metadata;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Icon shown for books without a `book-icon` element.
pub const DEFAULT_ICON: &str = "\u{1F4D6}";

/// Appended to descriptions that were cut.
pub const ELLIPSIS: &str = "...";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Patterns ────────────────────────────────────────────────────────────

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h1[^>]*>([^<]+)</h1>").unwrap());

static RE_SUBTITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="subtitle"[^>]*>([^<]+)<"#).unwrap());

static RE_AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="author"[^>]*>([^<]+)"#).unwrap());

static RE_ICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="book-icon"[^>]*>([^<]+)<"#).unwrap());

static RE_INTRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)intro-section[^>]*>.*?<p[^>]*>([^<]{50,200})").unwrap()
});

static RE_PROBLEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)problem-section[^>]*>.*?<p[^>]*>([^<]{50,200})").unwrap()
});

const CHAPTER_MARKER: &str = r#"class="chapter""#;

/// Tunables for a single extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRules {
    /// Characters kept from the description before [`ELLIPSIS`] is appended.
    pub description_limit: usize,
    /// Word placed after the chapter count.
    pub chapter_label: String,
}

impl ExtractRules {
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            description_limit: config.description_limit,
            chapter_label: config.chapter_label.clone(),
        }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from_config(&ExtractConfig::default())
    }
}

/// Read a document from disk and extract its metadata.
///
/// The file stem is used as the title when the page has no `<h1>`. An
/// unreadable file (missing, permission denied, not UTF-8) is the only error.
pub fn read_document(path: &Path, rules: &ExtractRules) -> Result<Metadata, ExtractError> {
    let text = fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract(&text, &stem, rules))
}

/// Extract metadata from the raw text of one document.
pub fn extract(text: &str, fallback_title: &str, rules: &ExtractRules) -> Metadata {
    let title = capture(&RE_TITLE, text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    let subtitle = capture(&RE_SUBTITLE, text).unwrap_or_default();

    let author = capture(&RE_AUTHOR, text)
        .map(|a| strip_author_note(&a))
        .unwrap_or_default();

    let icon = capture(&RE_ICON, text).unwrap_or_else(|| DEFAULT_ICON.to_string());

    let description = capture(&RE_INTRO, text)
        .or_else(|| capture(&RE_PROBLEM, text))
        .map(|d| truncate_description(&d, rules.description_limit))
        .unwrap_or_default();

    let chapters = chapter_label(count_chapters(text), &rules.chapter_label);

    Metadata {
        title,
        subtitle,
        author,
        icon,
        description,
        chapters,
    }
}

/// First capture group of the first match, decoded and trimmed.
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).trim().to_string())
}

/// Author lines often read `Name — Year` or `Name — Publisher`; keep the name.
fn strip_author_note(author: &str) -> String {
    author
        .split('\u{2014}')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Cut `text` to at most `limit` characters, appending [`ELLIPSIS`] if cut.
///
/// Counts Unicode scalar values, so Arabic text is never split mid-character.
pub fn truncate_description(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", text[..byte_idx].trim_end()),
        None => text.to_string(),
    }
}

pub fn count_chapters(text: &str) -> usize {
    text.matches(CHAPTER_MARKER).count()
}

/// `"8 فصل"` for eight chapters, empty for none.
pub fn chapter_label(count: usize, word: &str) -> String {
    if count == 0 {
        String::new()
    } else {
        format!("{count} {word}")
    }
}
