//! Index page generation.
//!
//! Turns a scanned [`Library`] into the single page written at the library
//! root. The page is self-contained: styles and the viewer script are inlined,
//! and book tiles open the summaries in an in-page `<iframe>` overlay.
//!
//! ## Page Structure
//!
//! ```text
//! button.back-button        # Fixed, shown while a book is open
//! div.book-viewer           # Full-screen overlay holding the iframe
//! header.header             # Title, tagline, "<total> <count_label>" badge
//! main.container
//! └── section.category      # One per non-empty category, sorted by name
//!     ├── h2.category-title # Display icon and name
//!     └── div.books-grid
//!         └── a.book-card   # One tile per book
//! footer.footer
//! script                    # static/viewer.js
//! script                    # static/offline.js
//! ```
//!
//! ## Tile Colors
//!
//! Tiles take their cover color from [`PALETTE`] in encounter order. The
//! position runs across categories, so the first tile of a category picks up
//! where the previous category left off.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from library.toml)
//! - `static/viewer.js`: Viewer overlay and history handling
//! - `static/offline.js`: Service worker registration
//!
//! Rendering is deterministic: the same library and config always produce the
//! same bytes. All extracted text goes through maud and is escaped.
//!
//! ## Offline Copy
//!
//! Every rebuild also writes [`SERVICE_WORKER_FILE`] to the library root,
//! rendered from `static/sw.js`. It precaches the index and every scanned
//! book under a cache name that changes whenever the page or the book list
//! does.
//!
//! ## Writes
//!
//! Both files are written to a dot-prefixed sibling and renamed into place.
//! A response still streaming the previous index keeps reading the old file.

use crate::config::{self, LibraryConfig};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::{Category, Document, Library};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot serialize precache list: {0}")]
    Precache(#[from] serde_json::Error),
}

/// Tile cover colors, matched by `data-color` rules in the stylesheet.
pub const PALETTE: [&str; 10] = [
    "red", "blue", "orange", "green", "crimson", "purple", "teal", "pink", "amber", "cyan",
];

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/viewer.js");
const OFFLINE_JS: &str = include_str!("../static/offline.js");
const SW_TEMPLATE: &str = include_str!("../static/sw.js");

/// Service worker file written at the library root, next to the index.
pub const SERVICE_WORKER_FILE: &str = "sw.js";

/// Prefix of every cache the service worker creates.
pub const CACHE_PREFIX: &str = "bookshelf-";

/// Result of one scan and write cycle.
#[derive(Debug)]
pub struct IndexUpdate {
    pub library: Library,
    pub index_path: PathBuf,
}

/// Scan `root`, render the index and replace `<root>/<index file>` and
/// `<root>/sw.js`.
pub fn update_index(root: &Path, config: &LibraryConfig) -> Result<IndexUpdate, GenerateError> {
    let library = scan::scan(root, config)?;
    let page = render_index(&library, config).into_string();
    let worker = render_service_worker(&library, config, &page)?;

    let index_path = root.join(&config.index.file_name);
    replace_file(&index_path, &page)?;
    replace_file(&root.join(SERVICE_WORKER_FILE), &worker)?;
    tracing::debug!(path = %index_path.display(), "index written");

    Ok(IndexUpdate {
        library,
        index_path,
    })
}

/// Write `contents` to a hidden sibling of `path`, then rename it over `path`.
fn replace_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let write_error = |source: std::io::Error| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&staging, contents).map_err(write_error)?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        write_error(source)
    })
}

/// Root-relative paths the service worker caches on install: the root URL,
/// the index file and every book.
pub fn precache_paths(library: &Library, config: &LibraryConfig) -> Vec<String> {
    let mut paths = vec!["./".to_string(), config.index.file_name.clone()];
    paths.extend(library.documents().map(|d| d.path.clone()));
    paths
}

/// Render `sw.js` for `library`. `page` is the index it ships alongside.
pub fn render_service_worker(
    library: &Library,
    config: &LibraryConfig,
    page: &str,
) -> Result<String, GenerateError> {
    let paths = precache_paths(library, config);

    let mut hasher = DefaultHasher::new();
    page.hash(&mut hasher);
    paths.hash(&mut hasher);
    let cache_name = format!("{CACHE_PREFIX}{:016x}", hasher.finish());

    Ok(SW_TEMPLATE
        .replace("__CACHE_PREFIX__", CACHE_PREFIX)
        .replace("__CACHE_NAME__", &cache_name)
        .replace("__PRECACHE_PATHS__", &serde_json::to_string(&paths)?))
}

/// Palette color for the tile at global position `position`.
pub fn tile_color(position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}

/// Render the complete index page.
pub fn render_index(library: &Library, config: &LibraryConfig) -> Markup {
    let index = &config.index;
    let css = format!("{}\n\n{}", config::generate_theme_css(&config.theme), CSS_STATIC);

    // Global position of each category's first tile.
    let offsets = library.categories.iter().scan(0, |next, category| {
        let start = *next;
        *next += category.documents.len();
        Some(start)
    });

    html! {
        (DOCTYPE)
        html lang=(index.lang) dir=(index.dir) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (index.title) }
                style { (PreEscaped(css)) }
            }
            body {
                button.back-button id="back-button" type="button" aria-label="Close" { "\u{2715}" }
                div.book-viewer id="book-viewer" {
                    iframe id="book-frame" title=(index.title) src="about:blank" {}
                }
                header.header id="header" {
                    h1 { (naming::FALLBACK_CATEGORY_ICON) " " (index.title) }
                    p { (index.tagline) }
                    span.book-count { (library.total_documents()) " " (index.count_label) }
                }
                main.container id="library" {
                    @for (category, first) in library.categories.iter().zip(offsets) {
                        (render_category(category, first, config))
                    }
                }
                footer.footer {
                    p { (index.footer) }
                }
                script { (PreEscaped(JS)) }
                script { (PreEscaped(OFFLINE_JS)) }
            }
        }
    }
}

fn render_category(category: &Category, first: usize, config: &LibraryConfig) -> Markup {
    let display = naming::category_display(&category.name, &config.categories);
    html! {
        section.category data-category=(category.name) {
            h2.category-title {
                span { (display.icon) }
                " " (display.name)
            }
            div.books-grid {
                @for (i, document) in category.documents.iter().enumerate() {
                    (render_tile(document, tile_color(first + i)))
                }
            }
        }
    }
}

/// One book tile. The fragment link keeps the tile usable without script.
fn render_tile(document: &Document, color: &str) -> Markup {
    let meta = &document.meta;
    html! {
        a.book-card href={ "#" (document.path) } data-color=(color) data-path=(document.path) {
            div.book-cover { (meta.icon) }
            div.book-info {
                h3.book-title { (meta.title) }
                p.book-subtitle { (meta.subtitle) }
                p.book-author { (meta.author) }
                p.book-description { (meta.description) }
                span.book-tag { (meta.chapters) }
            }
        }
    }
}
