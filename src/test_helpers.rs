//! Shared test utilities for the bookshelf test suite.
//!
//! Provides sample book documents, on-disk library builders and lookup
//! helpers that work with scan-phase data structures (`Library`, `Category`,
//! `Document`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_book(tmp.path(), "finance", "money.html", "Money", "Someone");
//! let library = scan(tmp.path(), &LibraryConfig::default()).unwrap();
//!
//! let finance = find_category(&library, "finance");
//! let book = find_document(finance, "finance/money.html");
//! assert_eq!(book.meta.title, "Money");
//! ```

use std::fs;
use std::path::Path;

use crate::extract::DEFAULT_ICON;
use crate::types::{Category, Document, Library, Metadata};

// =========================================================================
// Sample documents
// =========================================================================

/// A book summary carrying every marker the extractor looks for.
pub const FULL_BOOK: &str = r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head><meta charset="UTF-8"><title>العمل العميق</title></head>
<body>
<header class="hero">
    <div class="book-icon">🧠</div>
    <h1 class="hero-title">العمل العميق</h1>
    <p class="subtitle">Deep Work</p>
    <p class="author">كال نيوبورت — 2016</p>
</header>
<section class="intro-section">
    <h2>مقدمة</h2>
    <p>Deep work is the ability to focus without distraction on a cognitively demanding task, and it keeps getting rarer.</p>
</section>
<section class="problem-section">
    <p>Shallow work is everywhere: email, meetings and constant context switching all day.</p>
</section>
<div class="chapter"><h3>1</h3></div>
<div class="chapter"><h3>2</h3></div>
<div class="chapter"><h3>3</h3></div>
</body>
</html>
"#;

/// Minimal book page with a title, an author and a long intro paragraph.
pub fn book_html(title: &str, author: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
<h1>{title}</h1>
<p class="author">{author}</p>
<section class="intro-section">
<p>This summary walks through the central ideas of the book one chapter at a time.</p>
</section>
<div class="chapter"></div>
</body></html>
"#
    )
}

/// A document whose title is its stem and whose other fields are defaults.
pub fn document(category: &str, stem: &str) -> Document {
    Document {
        meta: Metadata {
            title: stem.to_string(),
            subtitle: String::new(),
            author: String::new(),
            icon: DEFAULT_ICON.to_string(),
            description: String::new(),
            chapters: String::new(),
        },
        path: format!("{category}/{stem}.html"),
    }
}

/// An in-memory library: `(category, [stems])` in the given order.
pub fn library(shape: &[(&str, &[&str])]) -> Library {
    Library {
        categories: shape
            .iter()
            .map(|(name, stems)| Category {
                name: name.to_string(),
                documents: stems.iter().map(|s| document(name, s)).collect(),
            })
            .collect(),
        skipped: vec![],
    }
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write `root/<category>/<file>` with [`book_html`], creating directories.
pub fn write_book(root: &Path, category: &str, file: &str, title: &str, author: &str) {
    let dir = root.join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), book_html(title, author)).unwrap();
}

// =========================================================================
// Library lookups: panic with a clear message on miss
// =========================================================================

/// Find a category by directory name. Panics if not found.
pub fn find_category<'a>(library: &'a Library, name: &str) -> &'a Category {
    library
        .categories
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names = category_names(library);
            panic!("category '{name}' not found. Available: {names:?}")
        })
}

/// Find a document by its root-relative path. Panics if not found.
pub fn find_document<'a>(category: &'a Category, path: &str) -> &'a Document {
    category
        .documents
        .iter()
        .find(|d| d.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = category.documents.iter().map(|d| d.path.as_str()).collect();
            panic!(
                "document '{path}' not found in category '{}'. Available: {paths:?}",
                category.name
            )
        })
}

/// All category names in library order.
pub fn category_names(library: &Library) -> Vec<&str> {
    library.categories.iter().map(|c| c.name.as_str()).collect()
}
