//! Route and navigation manifest.
//!
//! The manifest is the single answer to "which pages does this site have":
//! the route-page writer emits one page per route and the nav bar renders the
//! nav list. Order is fixed:
//!
//! 1. `/` (always, with a Home entry)
//! 2. skills, when web-visible and the catalog has at least one skill
//! 3. projects, when web-visible and there is at least one project
//! 4. blog, when web-visible and at least one post was published
//! 5. custom pages, by ascending `nav_order`, ties in source order
//!
//! Skills, projects and blog paths use the localized segments from the label
//! bundle (`route_skills`, ...). Pages with `show_in_nav: false` get a route
//! but no nav entry, so every nav path is a route but not the other way round.

use crate::blog::BlogResult;
use crate::i18n::I18nBundle;
use crate::profile::{ProjectCatalog, SkillCatalog};
use crate::types::{NavItem, Page};
use crate::visibility::VisibilityPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub routes: Vec<String>,
    pub nav: Vec<NavItem>,
}

impl Manifest {
    fn push(&mut self, path: String, label: Option<String>) {
        if let Some(label) = label {
            self.nav.push(NavItem {
                label,
                path: path.clone(),
            });
        }
        self.routes.push(path);
    }
}

/// Everything the manifest depends on. Catalogs and blog are the web
/// projection, so redacted content has already been removed.
#[derive(Debug, Clone, Copy)]
pub struct ManifestInput<'a> {
    pub policy: &'a VisibilityPolicy,
    pub skills: Option<&'a SkillCatalog>,
    pub projects: Option<&'a ProjectCatalog>,
    pub blog: &'a BlogResult,
    pub pages: &'a [Page],
    pub i18n: &'a I18nBundle,
}

/// A built-in section: its visibility gate and where its labels live.
struct Section {
    route_key: &'static str,
    route_default: &'static str,
    nav_key: &'static str,
    nav_default: &'static str,
}

const SKILLS: Section = Section {
    route_key: "route_skills",
    route_default: "skills",
    nav_key: "nav_skills",
    nav_default: "Skills",
};

const PROJECTS: Section = Section {
    route_key: "route_projects",
    route_default: "projects",
    nav_key: "nav_projects",
    nav_default: "Projects",
};

const BLOG: Section = Section {
    route_key: "route_blog",
    route_default: "blog",
    nav_key: "nav_blog",
    nav_default: "Blog",
};

/// Localized path segment for the skills section.
pub fn skills_segment(i18n: &I18nBundle) -> &str {
    i18n.label_or(SKILLS.route_key, SKILLS.route_default)
}

/// Localized path segment for the projects section.
pub fn projects_segment(i18n: &I18nBundle) -> &str {
    i18n.label_or(PROJECTS.route_key, PROJECTS.route_default)
}

/// Localized path segment for the blog section.
pub fn blog_segment(i18n: &I18nBundle) -> &str {
    i18n.label_or(BLOG.route_key, BLOG.route_default)
}

/// Build the manifest.
pub fn build_manifest(input: &ManifestInput<'_>) -> Manifest {
    let i18n = input.i18n;
    let mut manifest = Manifest {
        routes: Vec::new(),
        nav: Vec::new(),
    };
    manifest.push("/".to_string(), Some(i18n.label_or("nav_home", "Home").to_string()));

    let sections = [
        (
            &SKILLS,
            input.policy.skills.is_web_visible() && input.skills.is_some_and(|s| !s.is_empty()),
        ),
        (
            &PROJECTS,
            input.policy.projects.is_web_visible()
                && input.projects.is_some_and(|p| !p.projects.is_empty()),
        ),
        (
            &BLOG,
            input.policy.blog.is_web_visible() && !input.blog.posts().is_empty(),
        ),
    ];
    for (section, included) in sections {
        if included {
            let segment = i18n.label_or(section.route_key, section.route_default);
            let label = i18n.label_or(section.nav_key, section.nav_default);
            manifest.push(format!("/{segment}"), Some(label.to_string()));
        }
    }

    // Stable, so equal nav_order keeps source order.
    let mut pages: Vec<&Page> = input.pages.iter().collect();
    pages.sort_by(|a, b| a.meta.nav_order.total_cmp(&b.meta.nav_order));
    for page in pages {
        let label = page.meta.show_in_nav.then(|| page.title.clone());
        manifest.push(format!("/{}", page.slug), label);
    }

    manifest
}
