//! Library scanning.
//!
//! Walks the library root one level deep. Every visible subdirectory is a
//! category; every `*.html` file directly inside a category is a book.
//!
//! ## Directory Structure
//!
//! ```text
//! books/                               # Library root
//! ├── index.html                       # Generated, never scanned
//! ├── sw.js                            # Generated service worker
//! ├── library.toml                     # Optional config
//! ├── المال-والاستثمار/                 # Category
//! │   ├── psychology-of-money.html     # Book
//! │   ├── .draft.html                  # Dot-file, skipped
//! │   └── notes/                       # Nested dirs are ignored
//! ├── health/
//! │   └── index.html                   # Reserved name, skipped
//! ├── .git/                            # Hidden, skipped
//! └── __drafts/                        # Internal, skipped
//! ```
//!
//! ## Output
//!
//! A [`Library`] whose categories are sorted by directory name. Categories
//! without a single readable book are left out. Books keep the order the
//! filesystem lists them in.
//!
//! ## Failures
//!
//! Only failing to list the root itself is an error. A book that cannot be
//! read, or a category that cannot be listed, is recorded in
//! [`Library::skipped`] and the scan carries on.

use crate::config::LibraryConfig;
use crate::extract::{self, ExtractError, ExtractRules};
use crate::types::{Category, Document, Library, SkippedDocument};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read library root {}: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

const DOCUMENT_EXTENSION: &str = "html";

/// Scan `root` for categories and books.
pub fn scan(root: &Path, config: &LibraryConfig) -> Result<Library, ScanError> {
    let rules = ExtractRules::from_config(&config.extract);
    let index_name = config.index.file_name.as_str();
    let mut library = Library::default();

    for entry in direct_children(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(ScanError::Root {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(source) => {
                tracing::debug!(error = %source, "skipping unreadable entry in library root");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let documents =
            scan_category(entry.path(), &name, index_name, &rules, &mut library.skipped);
        if !documents.is_empty() {
            library.categories.push(Category { name, documents });
        }
    }

    library.categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(library)
}

/// Immediate children of `dir`, following symlinks, in filesystem order.
fn direct_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
}

/// Dot-directories (`.git`) and dunder directories (`__pycache__`).
fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with("__")
}

/// A visible `*.html` file other than the index. Dot-files are editor
/// leftovers and drafts.
fn is_document(file_name: &str, path: &Path, index_name: &str) -> bool {
    file_name != index_name
        && !file_name.starts_with('.')
        && path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

fn scan_category(
    dir: &Path,
    category: &str,
    index_name: &str,
    rules: &ExtractRules,
    skipped: &mut Vec<SkippedDocument>,
) -> Vec<Document> {
    let mut documents = Vec::new();

    for entry in direct_children(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source
                    .path()
                    .and_then(|p| p.file_name())
                    .map(|f| format!("{category}/{}", f.to_string_lossy()))
                    .unwrap_or_else(|| format!("{category}/"));
                tracing::debug!(%path, error = %source, "skipping unreadable entry");
                skipped.push(SkippedDocument {
                    path,
                    reason: source.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_document(&file_name, entry.path(), index_name) {
            continue;
        }

        let path = format!("{category}/{file_name}");
        match extract::read_document(entry.path(), rules) {
            Ok(meta) => documents.push(Document { meta, path }),
            Err(ExtractError::Read { source, .. }) => {
                tracing::debug!(%path, error = %source, "skipping unreadable document");
                skipped.push(SkippedDocument {
                    path,
                    reason: source.to_string(),
                });
            }
        }
    }

    documents
}
