//! Console output for the CLI and the server.
//!
//! # Output Format
//!
//! ## Startup
//!
//! ```text
//!
//! ==================================================
//!   Personal Library Server
//! ==================================================
//! ```
//!
//! ## Refresh (startup, `generate`, and every request for `/`)
//!
//! ```text
//! [*] Scanning for books...
//!     Found 3 books in 2 categories
//!     [finance]: 2 books
//!     [health]: 1 books
//!     Error reading health/broken.html: stream did not contain valid UTF-8
//!
//! [*] Generating index.html...
//!     Updated /srv/books/index.html
//! ```
//!
//! ## Listening
//!
//! ```text
//!
//! [*] Server starting on port 5500...
//!
//!     Local:   http://localhost:5500
//!     Network: http://192.168.1.20:5500
//!
//! [!] Open the Network URL on your phone!
//!
//! [i] Add new books to any category folder and refresh.
//!     Press Ctrl+C to stop the server.
//!
//! ==================================================
//! ```
//!
//! # Architecture
//!
//! Each message has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::IndexUpdate;
use crate::types::Library;

const RULE_WIDTH: usize = 50;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

// ============================================================================
// Scan inventory
// ============================================================================

/// Format the scan summary: totals, one line per category, then skipped files.
///
/// ```text
/// [*] Scanning for books...
///     Found 3 books in 2 categories
///     [finance]: 2 books
///     [health]: 1 books
/// ```
pub fn format_scan_output(library: &Library) -> Vec<String> {
    let mut lines = vec!["[*] Scanning for books...".to_string()];
    lines.push(format!(
        "{}Found {} books in {} categories",
        indent(1),
        library.total_documents(),
        library.categories.len()
    ));
    for category in &library.categories {
        lines.push(format!(
            "{}[{}]: {} books",
            indent(1),
            category.name,
            category.documents.len()
        ));
    }
    for skipped in &library.skipped {
        lines.push(format!(
            "{}Error reading {}: {}",
            indent(1),
            skipped.path,
            skipped.reason
        ));
    }
    lines
}

pub fn print_scan_output(library: &Library) {
    print_lines(&format_scan_output(library));
}

// ============================================================================
// Index refresh
// ============================================================================

/// Format a full refresh: the scan summary followed by the written file.
pub fn format_update_output(update: &IndexUpdate) -> Vec<String> {
    let file_name = update
        .index_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines = format_scan_output(&update.library);
    lines.push(String::new());
    lines.push(format!("[*] Generating {file_name}..."));
    lines.push(format!(
        "{}Updated {}",
        indent(1),
        update.index_path.display()
    ));
    lines
}

pub fn print_update_output(update: &IndexUpdate) {
    print_lines(&format_update_output(update));
}

// ============================================================================
// Server lifecycle
// ============================================================================

pub fn format_banner() -> Vec<String> {
    vec![
        String::new(),
        rule(),
        "  Personal Library Server".to_string(),
        rule(),
    ]
}

pub fn print_banner() {
    print_lines(&format_banner());
}

/// Format the listening message with the local and network URLs.
pub fn format_listening(port: u16, network_host: &str) -> Vec<String> {
    vec![
        String::new(),
        format!("[*] Server starting on port {port}..."),
        String::new(),
        format!("{}Local:   http://localhost:{port}", indent(1)),
        format!("{}Network: http://{network_host}:{port}", indent(1)),
        String::new(),
        "[!] Open the Network URL on your phone!".to_string(),
        String::new(),
        "[i] Add new books to any category folder and refresh.".to_string(),
        format!("{}Press Ctrl+C to stop the server.", indent(1)),
        String::new(),
        rule(),
        String::new(),
    ]
}

pub fn print_listening(port: u16, network_host: &str) {
    print_lines(&format_listening(port, network_host));
}

pub fn format_port_in_use(port: u16) -> Vec<String> {
    vec![
        String::new(),
        format!("[!] Port {port} is already in use!"),
        format!("{}Try stopping other servers first.", indent(1)),
    ]
}

pub fn print_port_in_use(port: u16) {
    print_lines(&format_port_in_use(port));
}

pub fn format_goodbye() -> Vec<String> {
    vec![String::new(), "Server stopped. Goodbye!".to_string()]
}

pub fn print_goodbye() {
    print_lines(&format_goodbye());
}
