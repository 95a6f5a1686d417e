//! Records shared by the scanner, the index generator and the CLI output.
//!
//! Everything here lives for a single scan/generate pass. The types derive
//! `Serialize` only so `bookshelf scan --json` can dump what was found;
//! nothing is ever read back.

use serde::Serialize;

/// Metadata pulled out of one book document.
///
/// Every field is always present. Fields whose marker was not found hold the
/// defaults documented in [`crate::extract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub icon: String,
    pub description: String,
    /// Chapter label such as `"8 فصل"`, empty when no chapters were counted.
    pub chapters: String,
}

/// A book document inside a category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    #[serde(flatten)]
    pub meta: Metadata,
    /// Always `<category>/<filename>`, forward slashes, relative to the root.
    pub path: String,
}

/// A category directory and the documents found directly inside it.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Directory name, used as the sort key and for the display lookup.
    pub name: String,
    pub documents: Vec<Document>,
}

/// A document that could not be read and was left out of the index.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: String,
    pub reason: String,
}

/// Result of one scan: non-empty categories sorted by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Library {
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedDocument>,
}

impl Library {
    /// Number of documents across all listed categories.
    pub fn total_documents(&self) -> usize {
        self.categories.iter().map(|c| c.documents.len()).sum()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.categories.iter().flat_map(|c| c.documents.iter())
    }
}
