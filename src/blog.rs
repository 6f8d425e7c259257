//! Blog compilation.
//!
//! Posts are Markdown files in the blog directory, one post per file. The file
//! name supplies the slug when front-matter does not: a leading `YYYY-MM-DD-`
//! is dropped, so `2026-03-01-hello-world.md` becomes `hello-world`.
//!
//! ## Front-matter
//!
//! | Key           | Meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `title`       | defaults to the slug                             |
//! | `slug`        | overrides the file-name slug                     |
//! | `description` | defaults to empty                                |
//! | `author`      | defaults to the résumé name                      |
//! | `publish_on`  | hidden until this date                           |
//! | `expire_on`   | hidden from this date on                         |
//! | `updated_on`  | informational                                    |
//! | `draft`       | `true` hides the post regardless of dates        |
//! | `featured`    | boolean flag passed through                      |
//! | `tags`        | list of tag names                                |
//! | `image`       | cover image path passed through                  |
//!
//! Dates are `YYYY-MM-DD` or RFC 3339. A date that cannot be read is treated
//! as unset and reported as a [`Warning::InvalidDate`].
//!
//! ## Feed
//!
//! Surviving posts are sorted newest first by `publish_on`; posts without one
//! sort last and otherwise keep file-name order. The tag index is built from
//! that sorted feed, so each tag lists its posts in feed order.
//!
//! When nothing survives, the result is [`BlogResult::Disabled`] rather than an
//! empty blog: the blog route is dropped instead of rendering an empty page.

use crate::markdown::{self, ContentError, Document, SourceFile};
use crate::naming;
use crate::warning::Warning;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const WORDS_PER_MINUTE: usize = 200;

/// Key under which the TOML deserializer exposes datetimes to serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Inputs that are not part of any post.
#[derive(Debug, Clone)]
pub struct BlogOptions {
    /// Posts scheduled after this date, or expiring on or before it, are hidden.
    pub build_date: NaiveDate,
    /// Author for posts that do not name one.
    pub default_author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub publish_on: Option<NaiveDate>,
    pub expire_on: Option<NaiveDate>,
    pub updated_on: Option<NaiveDate>,
    pub draft: bool,
    pub featured: bool,
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Minutes, at 200 words per minute, never less than one.
    pub reading_time: usize,
    pub content_html: String,
}

/// A compiled blog: the feed, newest first, and a tag index over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub posts: Vec<BlogPost>,
    pub tags: BTreeMap<String, Vec<String>>,
}

/// Either a blog with at least one post, or no blog at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BlogResult {
    #[default]
    Disabled,
    Compiled(Blog),
}

impl BlogResult {
    pub fn is_compiled(&self) -> bool {
        matches!(self, BlogResult::Compiled(_))
    }

    pub fn as_blog(&self) -> Option<&Blog> {
        match self {
            BlogResult::Compiled(blog) => Some(blog),
            BlogResult::Disabled => None,
        }
    }

    /// The feed, or nothing when disabled.
    pub fn posts(&self) -> &[BlogPost] {
        self.as_blog().map(|b| b.posts.as_slice()).unwrap_or_default()
    }
}

/// Output of the blog compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogCompilation {
    pub result: BlogResult,
    pub warnings: Vec<Warning>,
}

/// Compile every post in `dir`. A missing directory disables the blog.
pub fn compile_blog(dir: &Path, options: &BlogOptions) -> Result<BlogCompilation, ContentError> {
    let sources = markdown::read_markdown_dir(dir)?;
    let compilation = compile_posts(&sources, options)?;
    tracing::debug!(
        dir = %dir.display(),
        files = sources.len(),
        published = compilation.result.posts().len(),
        "compiled blog"
    );
    Ok(compilation)
}

/// Compile already-read post sources, in the order given.
pub fn compile_posts(
    sources: &[SourceFile],
    options: &BlogOptions,
) -> Result<BlogCompilation, ContentError> {
    let mut warnings = Vec::new();
    let mut posts = Vec::new();

    for source in sources {
        let doc = Document::parse(&source.path, &source.text)?;
        let mut date = |field: &'static str| match read_date(doc.front_matter.get(field)) {
            Ok(date) => date,
            Err(value) => {
                warnings.push(Warning::InvalidDate {
                    path: source.path.clone(),
                    field,
                    value,
                });
                None
            }
        };
        let publish_on = date("publish_on");
        let expire_on = date("expire_on");
        let updated_on = date("updated_on");

        if doc.front_matter.get("draft") == Some(&Value::Bool(true)) {
            tracing::debug!(path = %source.path.display(), "skipping draft");
            continue;
        }
        if publish_on.is_some_and(|d| d > options.build_date) {
            tracing::debug!(path = %source.path.display(), "skipping scheduled post");
            continue;
        }
        if expire_on.is_some_and(|d| d <= options.build_date) {
            tracing::debug!(path = %source.path.display(), "skipping expired post");
            continue;
        }

        posts.push(build_post(
            &doc,
            &source.path,
            options,
            [publish_on, expire_on, updated_on],
        ));
    }

    if posts.is_empty() {
        return Ok(BlogCompilation {
            result: BlogResult::Disabled,
            warnings,
        });
    }

    // Stable: equal dates keep file-name order. `None` orders below any date.
    posts.sort_by(|a, b| b.publish_on.cmp(&a.publish_on));
    let tags = tag_index(&posts);

    Ok(BlogCompilation {
        result: BlogResult::Compiled(Blog { posts, tags }),
        warnings,
    })
}

fn build_post(
    doc: &Document,
    path: &Path,
    options: &BlogOptions,
    [publish_on, expire_on, updated_on]: [Option<NaiveDate>; 3],
) -> BlogPost {
    let non_empty = |key: &str| doc.str_field(key).filter(|s| !s.is_empty());

    let slug = non_empty("slug")
        .map(naming::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| naming::post_slug(path));
    let title = non_empty("title").unwrap_or(&slug).to_string();

    BlogPost {
        title,
        description: doc.str_field("description").unwrap_or_default().to_string(),
        author: non_empty("author")
            .unwrap_or(&options.default_author)
            .to_string(),
        publish_on,
        expire_on,
        updated_on,
        draft: false,
        featured: doc
            .front_matter
            .get("featured")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        tags: read_tags(doc.front_matter.get("tags")),
        image: non_empty("image").map(str::to_string),
        reading_time: reading_time(&doc.body),
        content_html: markdown::render_markdown(&doc.body),
        slug,
    }
}

/// Minutes to read `body`: one per 200 words, rounded up, at least one.
pub fn reading_time(body: &str) -> usize {
    body.split_whitespace()
        .count()
        .div_ceil(WORDS_PER_MINUTE)
        .max(1)
}

fn tag_index(posts: &[BlogPost]) -> BTreeMap<String, Vec<String>> {
    let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            tags.entry(tag.clone()).or_default().push(post.slug.clone());
        }
    }
    tags
}

fn read_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(tag)) if !tag.is_empty() => vec![tag.clone()],
        _ => Vec::new(),
    }
}

/// Read an optional front-matter date.
///
/// `Err` carries the offending value, rendered for the warning.
fn read_date(value: Option<&Value>) -> Result<Option<NaiveDate>, String> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Object(map)) => match map.get(TOML_DATETIME_KEY) {
            Some(Value::String(s)) => s.as_str(),
            _ => return Err(Value::Object(map.clone()).to_string()),
        },
        Some(other) => return Err(other.to_string()),
    };
    parse_date(text.trim()).map(Some).ok_or_else(|| text.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn options() -> BlogOptions {
        BlogOptions {
            build_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            default_author: "Ada Lovelace".to_string(),
        }
    }

    fn post(name: &str, front_matter: &str, body: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            text: format!("---\n{front_matter}\n---\n{body}"),
        }
    }

    fn slugs(result: &BlogResult) -> Vec<&str> {
        result.posts().iter().map(|p| p.slug.as_str()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    #[test]
    fn drafts_are_excluded_regardless_of_dates() {
        let sources = [
            post("a.md", "draft: true\npublish_on: 2026-01-01", "x"),
            post("b.md", "draft: false\npublish_on: 2026-01-01", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["b"]);
    }

    #[test]
    fn future_posts_are_excluded() {
        let sources = [
            post("future.md", "publish_on: 2026-06-02", "x"),
            post("today.md", "publish_on: 2026-06-01", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["today"]);
    }

    #[test]
    fn expired_posts_are_excluded() {
        let sources = [
            post("expired.md", "expire_on: 2026-06-01", "x"),
            post("live.md", "publish_on: 2026-01-01\nexpire_on: 2026-06-02", "x"),
            post("undated.md", "title: Undated", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["live", "undated"]);
    }

    #[test]
    fn nothing_published_disables_blog() {
        let sources = [post("a.md", "draft: true", "x")];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(out.result, BlogResult::Disabled);
        assert!(out.result.posts().is_empty());
    }

    #[test]
    fn missing_or_empty_dir_disables_blog() {
        let tmp = TempDir::new().unwrap();
        let out = compile_blog(&tmp.path().join("blog"), &options()).unwrap();
        assert_eq!(out.result, BlogResult::Disabled);

        fs::write(tmp.path().join("readme.txt"), "not a post").unwrap();
        let out = compile_blog(tmp.path(), &options()).unwrap();
        assert_eq!(out.result, BlogResult::Disabled);
    }

    // =========================================================================
    // Ordering and tags
    // =========================================================================

    #[test]
    fn newest_first_with_undated_last() {
        let sources = [
            post("2026-01-01-older.md", "publish_on: 2026-01-01", "x"),
            post("undated.md", "title: U", "x"),
            post("2026-03-01-newer.md", "publish_on: 2026-03-01", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["newer", "older", "undated"]);
    }

    #[test]
    fn equal_dates_keep_source_order() {
        let sources = [
            post("b.md", "publish_on: 2026-02-01", "x"),
            post("a.md", "publish_on: 2026-02-01", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["b", "a"]);
    }

    #[test]
    fn tag_index_follows_feed_order() {
        let sources = [
            post("old.md", "publish_on: 2026-01-01\ntags: [rust, web]", "x"),
            post("new.md", "publish_on: 2026-04-01\ntags: [rust]", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        let blog = out.result.as_blog().unwrap();
        assert_eq!(blog.tags["rust"], vec!["new", "old"]);
        assert_eq!(blog.tags["web"], vec!["old"]);
    }

    // =========================================================================
    // Post fields
    // =========================================================================

    #[test]
    fn reading_time_rounds_up_with_floor_of_one() {
        assert_eq!(reading_time(&"word ".repeat(400)), 2);
        assert_eq!(reading_time(&"word ".repeat(401)), 3);
        assert_eq!(reading_time("word"), 1);
        assert_eq!(reading_time(""), 1);
    }

    #[test]
    fn post_defaults() {
        let sources = [post("2026-03-01-Hello, World!.md", "publish_on: 2026-03-01", "Hi there")];
        let out = compile_posts(&sources, &options()).unwrap();
        let p = &out.result.posts()[0];
        assert_eq!(p.slug, "hello-world");
        assert_eq!(p.title, "hello-world");
        assert_eq!(p.description, "");
        assert_eq!(p.author, "Ada Lovelace");
        assert_eq!(p.publish_on, Some(ymd(2026, 3, 1)));
        assert_eq!(p.expire_on, None);
        assert!(!p.draft);
        assert!(!p.featured);
        assert!(p.tags.is_empty());
        assert_eq!(p.image, None);
        assert_eq!(p.reading_time, 1);
        assert!(p.content_html.contains("<p>Hi there</p>"));
    }

    #[test]
    fn post_front_matter_overrides() {
        let sources = [post(
            "x.md",
            "slug: custom\ntitle: Custom\ndescription: About it\nauthor: Grace\nfeatured: true\nimage: /img/cover.png\nupdated_on: 2026-05-01",
            "Body",
        )];
        let out = compile_posts(&sources, &options()).unwrap();
        let p = &out.result.posts()[0];
        assert_eq!(p.slug, "custom");
        assert_eq!(p.title, "Custom");
        assert_eq!(p.description, "About it");
        assert_eq!(p.author, "Grace");
        assert!(p.featured);
        assert_eq!(p.image.as_deref(), Some("/img/cover.png"));
        assert_eq!(p.updated_on, Some(ymd(2026, 5, 1)));
    }

    #[test]
    fn front_matter_slug_is_slugified() {
        let sources = [
            post("2026-01-01-a.md", "slug: ../../../escaped\npublish_on: 2026-01-01", "x"),
            post("2026-01-02-b.md", "slug: \"..\"\npublish_on: 2026-01-02", "x"),
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(slugs(&out.result), vec!["b", "escaped"]);
    }

    #[test]
    fn dates_serialize_as_plain_days() {
        let sources = [post("a.md", "publish_on: 2026-03-01", "x")];
        let out = compile_posts(&sources, &options()).unwrap();
        let json = serde_json::to_value(&out.result.posts()[0]).unwrap();
        assert_eq!(json["publish_on"], "2026-03-01");
        assert_eq!(json["expire_on"], Value::Null);
    }

    #[test]
    fn rfc3339_and_toml_dates_are_accepted() {
        let sources = [
            post("a.md", "publish_on: \"2026-02-01T09:30:00Z\"", "x"),
            SourceFile {
                path: PathBuf::from("b.md"),
                text: "+++\npublish_on = 2026-01-15\n+++\nx".to_string(),
            },
        ];
        let out = compile_posts(&sources, &options()).unwrap();
        let dates: Vec<_> = out.result.posts().iter().map(|p| p.publish_on).collect();
        assert_eq!(dates, vec![Some(ymd(2026, 2, 1)), Some(ymd(2026, 1, 15))]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn unreadable_date_warns_and_counts_as_unset() {
        let sources = [post("a.md", "publish_on: next tuesday", "x")];
        let out = compile_posts(&sources, &options()).unwrap();
        assert_eq!(out.result.posts()[0].publish_on, None);
        assert_eq!(out.warnings.len(), 1);
        assert!(matches!(
            &out.warnings[0],
            Warning::InvalidDate { field: "publish_on", value, .. } if value == "next tuesday"
        ));
    }

    #[test]
    fn malformed_front_matter_is_fatal() {
        let sources = [SourceFile {
            path: PathBuf::from("bad.md"),
            text: "---\ntitle: [oops\n---\nx".to_string(),
        }];
        assert!(compile_posts(&sources, &options()).is_err());
    }

    #[test]
    fn compile_is_repeatable() {
        let sources = [
            post("a.md", "publish_on: 2026-01-01\ntags: [x]", "one"),
            post("b.md", "publish_on: 2026-02-01", "two"),
        ];
        let first = compile_posts(&sources, &options()).unwrap();
        let second = compile_posts(&sources, &options()).unwrap();
        assert_eq!(first, second);
    }
}
