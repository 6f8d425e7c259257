//! Site configuration module.
//!
//! `site.yml` (or `.toml` / `.json`) controls what gets published and how.
//! Configuration is layered: stock defaults are serialized to a value tree and
//! the author's file is merged on top, key by key, before anything is typed.
//! Authors only write the keys they want to change.
//!
//! ## Configuration Options
//!
//! ```yaml
//! lang: en                  # Required. Language pack code, or "custom"
//! title: ...                # Optional; derived from the résumé when absent
//! description: ...          # Optional; the résumé tagline when absent
//! url: https://example.com  # Optional; public URL for sitemap and feed
//! custom_domain: cv.example # Optional; written to CNAME
//! i18n_file: locale.yml     # Label pack used when lang is "custom"
//!
//! i18n_overrides:
//!   labels:
//!     nav_blog: Writing
//!
//! visibility:               # all | web | print | none per content area
//!   education: all
//!   experience: all
//!   experience_company: all
//!   projects: all
//!   community: all
//!   accreditations: all
//!   skills: all
//!   blog: all
//!   contact_email: none
//!   contact_phone: none
//!   location: all
//!   contact_website: all
//!   socials: all
//!   links: all
//!
//! seo:
//!   robots:
//!     indexing: true
//!     follow_links: true
//!   sitemap: true
//!   llms_txt: true
//!   rss: true
//!
//! documents:
//!   pdf: true
//!   docx: true
//!   page_size: A4           # A4 | Letter
//!   filename: resume        # No slashes, no extension
//! ```
//!
//! Keys this module does not interpret (a `theme` block, for instance) are
//! kept and passed through to `data/site.json`.
//!
//! ## Legacy visibility
//!
//! Boolean visibility values and the old `email`/`phone`/`website` keys are
//! rewritten into the four-tier model before the defaults are merged, so the
//! typed [`SiteConfig`] only ever sees tiers.

use crate::source::Mapping;
use crate::visibility::{VisibilityPolicy, normalize_policy_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Site configuration after defaults are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public URL of the deployed site, used by the sitemap and feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub visibility: VisibilityPolicy,
    #[serde(default)]
    pub seo: SeoConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n_overrides: Option<I18nOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n_file: Option<String>,
    /// Everything else in the file, passed through untouched.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl SiteConfig {
    /// Type a merged configuration mapping.
    pub fn from_mapping(site: Mapping) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(site))
    }
}

/// Search-engine and crawler outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub robots: RobotsConfig,
    /// Write `sitemap.xml` (needs a site URL).
    pub sitemap: bool,
    /// Write `llms.txt`.
    pub llms_txt: bool,
    /// Write `feed.xml` (needs a site URL and at least one post).
    pub rss: bool,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            robots: RobotsConfig::default(),
            sitemap: true,
            llms_txt: true,
            rss: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub indexing: bool,
    pub follow_links: bool,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            indexing: true,
            follow_links: true,
        }
    }
}

/// Settings for the printable document exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub pdf: bool,
    pub docx: bool,
    pub page_size: PageSize,
    /// Base file name for exported documents, without extension.
    pub filename: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            pdf: true,
            docx: true,
            page_size: PageSize::A4,
            filename: "resume".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    pub const WIRE_VALUES: [&'static str; 2] = ["A4", "Letter"];
}

/// Label overrides applied on top of the resolved language pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nOverrides {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

// =============================================================================
// Defaults and merging
// =============================================================================

/// The sections that carry stock defaults.
#[derive(Serialize)]
struct SiteDefaults {
    visibility: VisibilityPolicy,
    seo: SeoConfig,
    documents: DocumentsConfig,
}

/// Returns the stock defaults as a JSON object.
///
/// This is the base layer that the author's `site` file is merged onto.
pub fn site_defaults_value() -> Value {
    serde_json::to_value(SiteDefaults {
        visibility: VisibilityPolicy::default(),
        seo: SeoConfig::default(),
        documents: DocumentsConfig::default(),
    })
    .expect("default site settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Objects are merged key-by-key (overlay keys override base keys).
/// - Non-object values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Layer the author's site mapping over the stock defaults.
///
/// A section written as an explicit null (`visibility:` with nothing after
/// it) counts as absent. Legacy visibility values are normalized first.
pub fn apply_site_defaults(mut site: Mapping) -> Mapping {
    for section in ["visibility", "seo", "documents"] {
        if site.get(section).is_some_and(Value::is_null) {
            site.remove(section);
        }
    }
    if let Some(policy) = site.remove("visibility") {
        site.insert("visibility".to_string(), normalize_policy_value(policy));
    }
    match merge_values(site_defaults_value(), Value::Object(site)) {
        Value::Object(merged) => merged,
        _ => unreachable!("merging two objects yields an object"),
    }
}

/// Returns a fully-commented stock `site.yml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_site_config() -> &'static str {
    r##"# Site Configuration
# ==================
# Only `lang` is required. Every other setting is optional; the values shown
# below are the defaults. The same keys work in site.toml or site.json.

# Language pack for UI labels and route names: en, fr, es, de, ar.
# Use "custom" together with `i18n_file` to supply your own pack.
lang: en

# Page title and meta description. When omitted they are derived from
# resume.yml as "Name (Location) - Tagline" and the tagline.
# title: Ada Lovelace
# description: Analytical engine programmer

# Public URL of the deployed site. Needed for sitemap.xml and feed.xml.
# Falls back to the GitHub Pages URL when GITHUB_REPOSITORY is set.
# url: https://example.com

# Custom domain, written to a CNAME file.
# custom_domain: cv.example.com

# Path to a custom label pack, read when lang is "custom".
# i18n_file: locale.yml

# Override individual labels of the selected language pack.
# i18n_overrides:
#   labels:
#     nav_blog: Writing

# ---------------------------------------------------------------------------
# Visibility
# ---------------------------------------------------------------------------
# Where each content area is published:
#   all   - web site and printable documents
#   web   - web site only
#   print - printable documents only
#   none  - nowhere
# `true` and `false` are still accepted and mean `all` and `none`.
visibility:
  education: all
  experience: all
  # Strips only the company name from each experience entry.
  experience_company: all
  projects: all
  community: all
  accreditations: all
  skills: all
  blog: all
  contact_email: none
  contact_phone: none
  location: all
  contact_website: all
  socials: all
  links: all

# ---------------------------------------------------------------------------
# Search engines
# ---------------------------------------------------------------------------
seo:
  robots:
    # false writes `Disallow: /` and a noindex meta tag.
    indexing: true
    follow_links: true
  sitemap: true
  llms_txt: true
  rss: true

# ---------------------------------------------------------------------------
# Printable documents
# ---------------------------------------------------------------------------
documents:
  pdf: true
  docx: true
  # A4 or Letter
  page_size: A4
  # Base name for exported files: no slashes, no extension.
  filename: resume
"##
}
