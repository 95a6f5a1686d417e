//! # Bookshelf
//!
//! A self-updating index for a folder of HTML book summaries. Your filesystem
//! is the data source: directories become categories, `.html` files inside
//! them become books, and the index page is rebuilt from scratch every time
//! someone opens it.
//!
//! # Architecture: Scan, Render, Serve
//!
//! ```text
//! 1. Scan      books/     →  Library          (filesystem → metadata records)
//! 2. Generate  Library    →  books/index.html (one self-contained page)
//! 3. Serve     books/     →  HTTP             (static files, step 1+2 on `/`)
//! ```
//!
//! Nothing is cached between requests. The library is small and hand-curated,
//! so a full rescan per page load keeps the index correct with no watcher and
//! no state to invalidate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Pattern rules that pull title, author, icon, description and chapter count out of one book page |
//! | [`scan`] | Walks category directories and runs the extractor on each book |
//! | [`generate`] | Renders the index page with Maud and writes it, with its service worker, to the root |
//! | [`server`] | Axum router: static files plus a rebuild on every request for the index |
//! | [`config`] | `library.toml` loading, merging, validation, and theme CSS |
//! | [`naming`] | Category display names and icons |
//! | [`types`] | Records shared by scan, generate and output (`Library`, `Document`) |
//! | [`output`] | Console progress lines and server banner |
//!
//! # Design Decisions
//!
//! ## Patterns Over a DOM Parser
//!
//! Book pages are written by hand from a shared template, so a handful of
//! regular expressions find every field. A page that drifts from the template
//! loses fields, never the whole book: each field has a default.
//!
//! ## Maud Over Template Engines
//!
//! The index is generated with [Maud](https://maud.lambda.xyz/). Extracted text
//! is untrusted as far as the page is concerned, and Maud escapes every
//! interpolation. The stylesheet and viewer script are compiled into the
//! binary, so the generated page is a single file with no assets to copy.
//!
//! ## One Thread
//!
//! The server runs on a current-thread Tokio runtime and rebuilds the index
//! inline, so two rebuilds never overlap. A rebuild can still start while an
//! earlier response is streaming the old index. The new page is written to a
//! hidden sibling and renamed into place, so that response keeps reading the
//! file it opened.
//!
//! ## Offline Copy
//!
//! Each rebuild also writes `sw.js`, a service worker that precaches the
//! index and every book. It answers from the network first and falls back to
//! the cache, so an open index never hides books added since the last visit.

pub mod config;
pub mod extract;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
