//! CLI output formatting.
//!
//! Output is an inventory of what the build produced, not a log of what it
//! did: routes first, then the content behind them, then anything the author
//! should look at. File paths appear only as indented context lines.
//!
//! # Output Format
//!
//! ## Check / Build
//!
//! ```text
//! Routes
//! 001 Home → /
//! 002 Skills → /skills
//! 003 About → /about
//! 004 (hidden) → /colophon
//!
//! Blog (2 posts)
//! 001 The moth
//!     2026-04-15 · 1 min · history
//! 002 Nanoseconds
//!     2026-02-01 · 1 min · hardware, teaching
//!
//! Warnings
//!     Skill "Knitting" referenced in project "COBOL" not found in skills.yml
//! ```
//!
//! ## Validation failure
//!
//! ```text
//! Validation failed (2 errors)
//!     resume.yml: name is required and must be a string
//!     projects.yml: projects[0].start is required
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::pipeline::{Publication, WriteReport};
use crate::validate::ValidationError;
use crate::warning::Warning;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Routes, blog and warnings for a compiled publication.
pub fn format_publication(publication: &Publication) -> Vec<String> {
    let mut lines = vec!["Routes".to_string()];
    let manifest = &publication.manifest;
    for (i, route) in manifest.routes.iter().enumerate() {
        let label = manifest
            .nav
            .iter()
            .find(|n| &n.path == route)
            .map(|n| n.label.as_str())
            .unwrap_or("(hidden)");
        lines.push(format!("{} {} \u{2192} {}", format_index(i + 1), label, route));
    }

    let posts = publication.web.blog.posts();
    if !posts.is_empty() {
        lines.push(String::new());
        lines.push(format!("Blog ({})", plural(posts.len(), "post", "posts")));
        for (i, post) in posts.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), post.title));
            let mut detail = Vec::new();
            if let Some(date) = post.publish_on {
                detail.push(date.to_string());
            }
            detail.push(format!("{} min", post.reading_time));
            if !post.tags.is_empty() {
                detail.push(post.tags.join(", "));
            }
            lines.push(format!("{}{}", indent(1), detail.join(" \u{b7} ")));
        }
    }

    lines.extend(format_warnings(&publication.warnings));
    lines
}

pub fn print_publication(publication: &Publication) {
    for line in format_publication(publication) {
        println!("{}", line);
    }
}

/// A `Warnings` block, or nothing when there are none.
pub fn format_warnings(warnings: &[Warning]) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Warnings".to_string()];
    lines.extend(warnings.iter().map(|w| format!("{}{}", indent(1), w)));
    lines
}

/// Every validation error, one per line, under a count header.
pub fn format_validation_errors(errors: &[ValidationError]) -> Vec<String> {
    let mut lines = vec![format!(
        "Validation failed ({})",
        plural(errors.len(), "error", "errors")
    )];
    for e in errors {
        lines.push(format!("{}{}: {} {}", indent(1), e.file, e.field, e.reason));
    }
    lines
}

/// Validation errors go to stderr: they are the reason the build stopped.
pub fn print_validation_errors(errors: &[ValidationError]) {
    for line in format_validation_errors(errors) {
        eprintln!("{}", line);
    }
}

/// Files written, grouped under their top-level directory.
pub fn format_write_report(report: &WriteReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    for file in &report.files {
        let mut parts = file.iter().map(|p| p.to_string_lossy().into_owned());
        let head = parts.next().unwrap_or_default();
        let rest: Vec<String> = parts.collect();
        if rest.is_empty() {
            lines.push(head);
            current = None;
            continue;
        }
        if current.as_deref() != Some(head.as_str()) {
            lines.push(format!("{head}/"));
            current = Some(head);
        }
        lines.push(format!("{}{}", indent(1), rest.join("/")));
    }
    lines.push(format!("Wrote {}", plural(report.files.len(), "file", "files")));
    lines
}

pub fn print_write_report(report: &WriteReport) {
    for line in format_write_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
