//! Slug derivation shared by pages, blog posts and cross-reference keys.
//!
//! A slug is the stable, URL-safe identity of a piece of content:
//!
//! - `About Me.md` → `about-me` (page)
//! - `2026-03-01-Hello, World!.md` → `hello-world` (blog post; date prefix dropped)
//! - `Staff Engineer--ACME Corp` → `staff-engineer-acme-corp` (experience key)
//!
//! Only ASCII letters and digits survive. Every run of anything else collapses
//! into a single dash, and dashes never lead or trail.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("date prefix pattern is valid"));

/// Lower-case `text` and collapse every non-alphanumeric run into one dash.
///
/// - `"Hello, World!"` → `"hello-world"`
/// - `"--Rust & Go--"` → `"rust-go"`
/// - `"Ünïcode"` → `"n-code"` (non-ASCII letters are separators)
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Slug for a Markdown page: the file stem, slugified.
pub fn page_slug(path: &Path) -> String {
    slugify(&file_stem(path))
}

/// Slug for a blog post: the file stem with a leading `YYYY-MM-DD-` removed,
/// then slugified.
pub fn post_slug(path: &Path) -> String {
    let stem = file_stem(path);
    slugify(&DATE_PREFIX.replace(&stem, ""))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
