//! Name normalization for icon files and directories.
//!
//! Icon files follow vendor conventions such as
//! `10001-icon-service-Virtual-Machine.svg` or `Storage-Account_COLOR.svg`.
//! These helpers reduce them to the service and category names stored in the
//! catalog.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(_COLOR|\(m\))$").expect("valid suffix pattern"));

static VENDOR_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9\-]*-icon-service-").expect("valid prefix pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]+").expect("valid slug pattern"));

/// Which normalization rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Reconciliation rules: hyphens and underscores survive in service
    /// names, category names keep their spaces.
    Merge,
    /// Rebuild rules: hyphens become spaces in service names, category names
    /// are compacted into a single identifier.
    Rebuild,
}

/// Extract the canonical service name from an icon file name
pub fn extract_service_name(file_name: &str, style: NameStyle) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let name = SUFFIX.replace(&stem, "");
    let name = VENDOR_PREFIX.replace(&name, "");

    match style {
        NameStyle::Merge => name.into_owned(),
        NameStyle::Rebuild => name.replace('-', " "),
    }
}

/// Build the category name for an icon directory
pub fn category_name(dir_name: &str, style: NameStyle) -> String {
    let titled = title_case(&dir_name.replace('-', " "));
    match style {
        NameStyle::Merge => titled,
        NameStyle::Rebuild => compact_identifier(&titled),
    }
}

/// Capitalize each word: a letter following a non-letter is upper-cased,
/// every other letter is lower-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// Drop spaces and `+` to form an identifier
pub fn compact_identifier(text: &str) -> String {
    text.chars().filter(|c| *c != ' ' && *c != '+').collect()
}

/// Matching key for categories and directories. Never persisted.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let cleaned = NON_SLUG.replace_all(&hyphenated, "");
    cleaned.trim_matches('-').to_string()
}

/// Case-insensitive `.svg` extension check
pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}
