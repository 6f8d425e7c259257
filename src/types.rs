//! Shared types serialized into the dataset.
//!
//! Pages come out of the Markdown compiler and are consumed by the manifest
//! builder and the route-page writer; navigation entries come out of the
//! manifest builder. Both land in `data/*.json` unchanged.

use crate::source::Mapping;
use serde::{Deserialize, Serialize};

/// Default `nav_order` for pages that do not set one: after everything else.
pub const DEFAULT_NAV_ORDER: f64 = 999.0;

/// A custom page compiled from one Markdown file in the pages directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Front-matter `slug`, or the slugified file stem
    pub slug: String,
    /// Front-matter `title`, or the slug
    pub title: String,
    pub description: String,
    pub content_html: String,
    pub meta: PageMeta,
}

/// Resolved page metadata plus every other front-matter key, verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Any finite number; pages sort ascending on it.
    pub nav_order: f64,
    /// Only a literal `false` in front-matter hides a page from navigation.
    pub show_in_nav: bool,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            nav_order: DEFAULT_NAV_ORDER,
            show_in_nav: true,
            extra: Mapping::new(),
        }
    }
}

/// One navigation entry. Every `path` also appears in the manifest routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}
