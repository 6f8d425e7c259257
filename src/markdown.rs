//! Markdown documents with front-matter, and the custom page compiler.
//!
//! ## Document Format
//!
//! ```text
//! ---                      ← YAML front-matter (or `+++` for TOML)
//! title: Uses
//! nav_order: 20
//! show_in_nav: false
//! ---
//! # What I use             ← body, rendered to HTML
//! ```
//!
//! A file without a leading fence has empty front-matter and is all body. An
//! opening fence without a closing one is an error, as is front-matter that is
//! not a mapping.
//!
//! ## Rendering
//!
//! Bodies are rendered with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! using CommonMark plus tables, footnotes, strikethrough, task lists and smart
//! punctuation. Raw HTML in the body is passed through unchanged: content is
//! authored by the site owner, not by visitors.

use crate::naming;
use crate::source::{self, Format, Mapping};
use crate::types::{DEFAULT_NAV_ORDER, Page, PageMeta};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid front-matter in \"{}\": {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },
}

/// A Markdown source file as read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// A source file split into front-matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub front_matter: Mapping,
    pub body: String,
}

impl Document {
    /// Parse a document, attributing any front-matter error to `path`.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ContentError> {
        split_document(text).map_err(|message| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Front-matter string value, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.front_matter.get(key).and_then(Value::as_str)
    }
}

fn split_document(text: &str) -> Result<Document, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_line = text.lines().next().unwrap_or_default().trim_end();
    let (fence, format) = match first_line {
        "---" => ("---", Format::Yaml),
        "+++" => ("+++", Format::Toml),
        _ => {
            return Ok(Document {
                front_matter: Mapping::new(),
                body: text.to_string(),
            });
        }
    };

    let rest = text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            let raw = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let front_matter = if raw.trim().is_empty() {
                Mapping::new()
            } else {
                source::parse_mapping(raw, format).map_err(|e| e.to_string())?
            };
            return Ok(Document {
                front_matter,
                body: body.to_string(),
            });
        }
        offset += line.len();
    }
    Err(format!("front-matter opened with `{fence}` is never closed"))
}

/// Render Markdown to HTML.
pub fn render_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Read every `*.md` file directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn read_markdown_dir(dir: &Path) -> Result<Vec<SourceFile>, ContentError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ContentError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        let is_markdown = path.extension().is_some_and(|e| e == "md");
        if !entry.file_type().is_file() || !is_markdown {
            continue;
        }
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        files.push(SourceFile {
            path: path.to_path_buf(),
            text,
        });
    }
    Ok(files)
}

/// Compile every page in `dir`. A missing directory yields no pages.
pub fn compile_pages(dir: &Path) -> Result<Vec<Page>, ContentError> {
    let pages = read_markdown_dir(dir)?
        .iter()
        .map(compile_page)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = pages.len(), dir = %dir.display(), "compiled pages");
    Ok(pages)
}

/// Compile a single page.
pub fn compile_page(file: &SourceFile) -> Result<Page, ContentError> {
    let doc = Document::parse(&file.path, &file.text)?;

    // Front-matter slugs become file names in the dataset, so they are
    // slugified like file stems.
    let slug = doc
        .str_field("slug")
        .map(naming::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| naming::page_slug(&file.path));
    let title = doc
        .str_field("title")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| slug.clone());
    let description = doc.str_field("description").unwrap_or_default().to_string();

    let mut extra = doc.front_matter.clone();
    let nav_order = extra
        .remove("nav_order")
        .and_then(|v| read_nav_order(&v))
        .unwrap_or(DEFAULT_NAV_ORDER);
    let show_in_nav = extra.remove("show_in_nav") != Some(Value::Bool(false));

    Ok(Page {
        slug,
        title,
        description,
        content_html: render_markdown(&doc.body),
        meta: PageMeta {
            nav_order,
            show_in_nav,
            extra,
        },
    })
}

/// Numbers and numeric strings (`5`, `0.5`, `"2"`). Anything else is unset.
fn read_nav_order(value: &Value) -> Option<f64> {
    let order = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    order.filter(|o| o.is_finite())
}
