//! Display labels for category directories.
//!
//! A category is named after its directory, which is usually a slug such as
//! `التطوير-الذاتي` or `health-and-fitness`. The header shown on the index
//! page is resolved in three steps, first hit wins:
//!
//! 1. A `[categories.<dir>]` entry in `library.toml`
//! 2. The built-in table of the library's stock categories
//! 3. A generic book-stack icon and the directory name with dashes turned
//!    into spaces

use crate::config::CategoryLabel;
use std::collections::BTreeMap;

/// Icon used for categories without a label.
pub const FALLBACK_CATEGORY_ICON: &str = "\u{1F4DA}";

/// Stock categories: `(directory, icon, display name)`.
const BUILTIN_CATEGORIES: &[(&str, &str, &str)] = &[
    ("المال-والاستثمار", "\u{1F4B0}", "المال والاستثمار"),
    ("الإنتاجية-والتوازن", "\u{26A1}", "الإنتاجية والتوازن"),
    ("التطوير-الذاتي", "\u{1F331}", "التطوير الذاتي"),
    ("القيادة-والأعمال", "\u{1F454}", "القيادة والأعمال"),
    ("الصحة-والعافية", "\u{1F3C3}", "الصحة والعافية"),
];

/// Resolved header for a category section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub icon: String,
    pub name: String,
}

/// Turn a directory slug into a readable title: dashes become spaces.
pub fn display_title(dir_name: &str) -> String {
    dir_name.replace('-', " ")
}

/// Resolve the icon and display name for a category directory.
pub fn category_display(
    dir_name: &str,
    configured: &BTreeMap<String, CategoryLabel>,
) -> CategoryDisplay {
    if let Some(label) = configured.get(dir_name) {
        return CategoryDisplay {
            icon: label.icon.clone(),
            name: label.name.clone(),
        };
    }
    if let Some((_, icon, name)) = BUILTIN_CATEGORIES.iter().find(|(dir, _, _)| *dir == dir_name) {
        return CategoryDisplay {
            icon: (*icon).to_string(),
            name: (*name).to_string(),
        };
    }
    CategoryDisplay {
        icon: FALLBACK_CATEGORY_ICON.to_string(),
        name: display_title(dir_name),
    }
}
