//! # Vitae
//!
//! Compiles a personal profile (résumé, skills, projects, free-form pages and
//! a blog) into a redacted, localized, cross-referenced publication dataset
//! plus a route manifest. Renderers and document exporters consume the
//! dataset; they never read the sources.
//!
//! # Architecture: One Pass, Pure Stages
//!
//! ```text
//! 1. Load       data/*.{yml,toml,json}  →  untyped mappings
//! 2. Validate   mappings                →  every schema error, or typed records
//! 3. Compile    pages/*.md, blog/*.md   →  pages, published posts
//! 4. Project    records + policy        →  web view, print view
//! 5. Resolve    lang + overrides        →  label bundle
//! 6. Index      web view                →  cross-references, route manifest
//! 7. Write      publication             →  dist/data/*.json, robots.txt, ...
//! ```
//!
//! Stages 1 to 6 are pure functions of their inputs and live behind
//! [`pipeline::compile`]; only stage 7 writes. Loading and the two content
//! compilers each run concurrently on rayon.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Locate and parse structured source files into mappings |
//! | [`config`] | Site configuration: stock defaults, layering, `gen-config` |
//! | [`validate`] | Collect every schema error across the four sources |
//! | [`profile`] | Typed résumé, skill and project records |
//! | [`markdown`] | Front-matter splitting, Markdown rendering, custom pages |
//! | [`blog`] | Post scheduling, ordering, tag index, reading time |
//! | [`visibility`] | Four-tier policy and the web/print projections |
//! | [`crossref`] | Skill ↔ experience/project lookup maps |
//! | [`i18n`] | Language packs, overrides, completeness against English |
//! | [`manifest`] | Routes and navigation |
//! | [`seo`] | robots.txt, sitemap, llms.txt, RSS feed |
//! | [`pipeline`] | Stage wiring and the dataset writer |
//! | [`warning`] | Non-fatal diagnostics surfaced to the author |
//! | [`types`] | Shared dataset types (`Page`, `NavItem`) |
//! | [`naming`] | Slugs for entries, pages and posts |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Redaction Before Everything Downstream
//!
//! Cross-references, the manifest and every SEO file are built from the web
//! projection, never from the source records. A field hidden by the policy
//! cannot reach a crawler file through a side door because no code path past
//! the projection can see it.
//!
//! ## Collect, Don't Stop
//!
//! Validation reports every problem in every file at once. Authors edit YAML
//! by hand, and fixing one error per build run is miserable. Problems that do
//! not prevent a correct dataset (an unknown skill name, a missing
//! translation) are warnings, not errors.
//!
//! ## A Disabled Blog Is Not an Empty Blog
//!
//! When no post survives scheduling the blog is [`blog::BlogResult::Disabled`]:
//! no route, no nav entry, no feed. Consumers never have to special-case an
//! empty post list.

pub mod blog;
pub mod config;
pub mod crossref;
pub mod i18n;
pub mod manifest;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod seo;
pub mod source;
pub mod types;
pub mod validate;
pub mod visibility;
pub mod warning;

#[cfg(test)]
pub(crate) mod test_helpers;
