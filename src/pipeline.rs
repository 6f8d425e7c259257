//! End-to-end build: sources in, publication dataset out.
//!
//! ```text
//! data/site.yml ─┐
//! resume.yml ────┤  load ─→ validate ─→ type ─┬→ web projection ─→ crossref ─→ manifest
//! skills.yml ────┤                            └→ print projection
//! projects.yml ──┘
//! pages/*.md ────── compile pages ─┐
//! blog/*.md ─────── compile blog ──┴→ (joined into the web projection)
//! ```
//!
//! [`compile`] is pure apart from reading its inputs: it returns a
//! [`Publication`] and touches nothing on disk. [`write_dataset`] is the only
//! step that writes.
//!
//! Any load, validation or content error aborts the build. Everything else
//! (unknown skills, missing labels, unreadable post dates) is collected as a
//! [`Warning`] on the publication and logged as it is found.

use crate::blog::{self, BlogOptions, BlogResult};
use crate::config::{self, SiteConfig};
use crate::crossref::{self, CrossReferenceIndex};
use crate::i18n::{self, BuiltinPacks, DirectoryPacks, I18nBundle, I18nRequest, PackSource};
use crate::manifest::{self, Manifest, ManifestInput};
use crate::markdown::{self, ContentError};
use crate::profile::{ProjectCatalog, ResumeProfile, SkillCatalog};
use crate::seo::{self, SiteMeta};
use crate::source::{self, LoadError, Mapping};
use crate::types::Page;
use crate::validate::{self, ValidationError};
use crate::visibility::{self, Projection};
use crate::warning::Warning;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the inputs live and what day it is.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding `site`, `resume`, `skills` and `projects` sources.
    pub data_dir: PathBuf,
    pub pages_dir: Option<PathBuf>,
    pub blog_dir: Option<PathBuf>,
    /// Reference date for post scheduling and sitemap `lastmod`.
    pub build_date: NaiveDate,
    /// Extra language packs; built-in packs fill the gaps.
    pub i18n_dir: Option<PathBuf>,
}

/// Everything a build produces, before it is written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// Site configuration with defaults applied and title/description filled
    /// in from the résumé where the author left them out.
    pub site: SiteConfig,
    pub meta: SiteMeta,
    pub web: Projection,
    pub print: Projection,
    pub pages: Vec<Page>,
    pub crossref: CrossReferenceIndex,
    pub i18n: I18nBundle,
    pub manifest: Manifest,
    pub warnings: Vec<Warning>,
}

/// The four source documents, located and parsed but not yet validated.
struct Sources {
    site: Located,
    resume: Located,
    skills: Located,
    projects: Located,
}

struct Located {
    path: PathBuf,
    mapping: Mapping,
}

impl Located {
    fn load(dir: &Path, stem: &str) -> Result<Self, LoadError> {
        let path = source::find_source(dir, stem)?;
        let mapping = source::load_mapping(&path)?;
        Ok(Self { path, mapping })
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn load_sources(dir: &Path) -> Result<Sources, LoadError> {
    let ((site, resume), (skills, projects)) = rayon::join(
        || {
            rayon::join(
                || Located::load(dir, "site"),
                || Located::load(dir, "resume"),
            )
        },
        || {
            rayon::join(
                || Located::load(dir, "skills"),
                || Located::load(dir, "projects"),
            )
        },
    );
    Ok(Sources {
        site: site?,
        resume: resume?,
        skills: skills?,
        projects: projects?,
    })
}

/// Run every stage and return the publication.
pub fn compile(options: &BuildOptions) -> Result<Publication, BuildError> {
    let mut sources = load_sources(&options.data_dir)?;
    tracing::debug!(dir = %options.data_dir.display(), "loaded sources");

    sources.site.mapping = config::apply_site_defaults(std::mem::take(&mut sources.site.mapping));
    check(&sources)?;

    let mut site: SiteConfig = typed(&sources.site)?;
    let mut resume: ResumeProfile = typed(&sources.resume)?;
    let skills: SkillCatalog = typed(&sources.skills)?;
    let projects: ProjectCatalog = typed(&sources.projects)?;

    let blog_options = BlogOptions {
        build_date: options.build_date,
        default_author: resume.name.clone(),
    };
    let (pages, compilation) = rayon::join(
        || match &options.pages_dir {
            Some(dir) => markdown::compile_pages(dir),
            None => Ok(Vec::new()),
        },
        || match &options.blog_dir {
            Some(dir) => blog::compile_blog(dir, &blog_options).map(Some),
            None => Ok(None),
        },
    );
    let pages = pages?;
    let mut warnings = Vec::new();
    let blog = match compilation? {
        Some(compilation) => {
            warnings.extend(compilation.warnings);
            if !compilation.result.is_compiled() {
                warnings.push(Warning::BlogDisabled);
            }
            compilation.result
        }
        None => BlogResult::Disabled,
    };

    let custom_file = site.i18n_file.as_ref().map(|f| options.data_dir.join(f));
    let request = I18nRequest {
        lang: &site.lang,
        overrides: site.i18n_overrides.as_ref().map(|o| &o.labels),
        custom_file: custom_file.as_deref(),
    };
    let packs: Box<dyn PackSource> = match &options.i18n_dir {
        Some(dir) => Box::new(DirectoryPacks::new(dir)),
        None => Box::new(BuiltinPacks),
    };
    let (i18n, i18n_warnings) = i18n::resolve_i18n(&request, packs.as_ref());
    warnings.extend(i18n_warnings);

    resume.summary_html = resume
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(markdown::render_markdown);
    let meta = seo::derive_site_meta(&resume);
    site.title.get_or_insert_with(|| meta.title.clone());
    site.description
        .get_or_insert_with(|| meta.description.clone());

    let policy = &site.visibility;
    let web = visibility::filter_for_web(policy, &resume, Some(&skills), Some(&projects), &blog);
    let print = visibility::filter_for_print(policy, &resume, Some(&skills), Some(&projects));

    let (crossref, crossref_warnings) = crossref::build_cross_reference(
        web.skills.as_ref(),
        Some(&web.resume),
        web.projects.as_ref(),
    );
    warnings.extend(crossref_warnings);

    let manifest = manifest::build_manifest(&ManifestInput {
        policy,
        skills: web.skills.as_ref(),
        projects: web.projects.as_ref(),
        blog: &web.blog,
        pages: &pages,
        i18n: &i18n,
    });

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        routes = manifest.routes.len(),
        pages = pages.len(),
        posts = web.blog.posts().len(),
        warnings = warnings.len(),
        "compiled publication"
    );

    Ok(Publication {
        site,
        meta,
        web,
        print,
        pages,
        crossref,
        i18n,
        manifest,
        warnings,
    })
}

/// Validate all four sources, reporting errors under their real file names.
fn check(sources: &Sources) -> Result<(), BuildError> {
    let value = |l: &Located| Value::Object(l.mapping.clone());
    let mut errors = validate::validate(
        &value(&sources.site),
        &value(&sources.resume),
        &value(&sources.skills),
        &value(&sources.projects),
    );
    if errors.is_empty() {
        return Ok(());
    }
    let names = [
        (validate::SITE_FILE, sources.site.file_name()),
        (validate::RESUME_FILE, sources.resume.file_name()),
        (validate::SKILLS_FILE, sources.skills.file_name()),
        (validate::PROJECTS_FILE, sources.projects.file_name()),
    ];
    for error in &mut errors {
        if let Some((_, actual)) = names.iter().find(|(default, _)| *default == error.file) {
            error.file = actual.clone();
        }
    }
    Err(BuildError::Validation(errors))
}

fn typed<T: DeserializeOwned>(located: &Located) -> Result<T, BuildError> {
    serde_json::from_value(Value::Object(located.mapping.clone())).map_err(|e| {
        BuildError::Validation(vec![ValidationError::from_conversion(
            &located.file_name(),
            e,
        )])
    })
}

// =============================================================================
// Dataset writer
// =============================================================================

/// Files written by [`write_dataset`], relative to the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub files: Vec<PathBuf>,
}

struct Writer<'a> {
    root: &'a Path,
    report: WriteReport,
}

impl Writer<'_> {
    fn json(&mut self, rel: impl AsRef<Path>, value: &impl Serialize) -> Result<(), BuildError> {
        let text = serde_json::to_string_pretty(value)?;
        self.text(rel, &text)
    }

    fn text(&mut self, rel: impl AsRef<Path>, text: &str) -> Result<(), BuildError> {
        let rel = rel.as_ref();
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        self.report.files.push(rel.to_path_buf());
        Ok(())
    }

    /// Skips empty output: generators return "" when they have nothing to say.
    fn text_if_any(&mut self, rel: &str, text: &str) -> Result<(), BuildError> {
        if text.is_empty() {
            return Ok(());
        }
        self.text(rel, text)
    }
}

/// Write the publication under `out_dir`.
///
/// JSON goes to `data/`, crawler files to the root. Optional catalogs that
/// were redacted are simply not written, so a consumer can tell "hidden"
/// from "empty".
pub fn write_dataset(
    publication: &Publication,
    out_dir: &Path,
    site_url: &str,
    build_date: NaiveDate,
) -> Result<WriteReport, BuildError> {
    let mut w = Writer {
        root: out_dir,
        report: WriteReport::default(),
    };
    let web = &publication.web;
    let site = &publication.site;

    let mut site_value = serde_json::to_value(site)?;
    if let Value::Object(map) = &mut site_value {
        map.insert("site_url".into(), Value::String(site_url.to_string()));
        map.insert(
            "meta_robots".into(),
            Value::String(seo::meta_robots(&site.seo).to_string()),
        );
    }
    w.json("data/site.json", &site_value)?;
    w.json("data/resume.json", &web.resume)?;
    if let Some(skills) = &web.skills {
        w.json("data/skills.json", skills)?;
    }
    if let Some(projects) = &web.projects {
        w.json("data/projects.json", projects)?;
    }
    w.json("data/crossref.json", &publication.crossref)?;
    w.json("data/i18n.json", &publication.i18n)?;
    w.json("data/manifest.json", &publication.manifest)?;

    if let Some(blog) = web.blog.as_blog() {
        let index = blog
            .posts
            .iter()
            .map(|post| {
                let mut value = serde_json::to_value(post)?;
                if let Value::Object(map) = &mut value {
                    map.remove("content_html");
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        w.json("data/blog/index.json", &index)?;
        w.json("data/blog/tags.json", &blog.tags)?;
        // Own directory, so no slug can shadow index.json or tags.json.
        for post in &blog.posts {
            w.json(format!("data/blog/posts/{}.json", post.slug), post)?;
        }
    }
    for page in &publication.pages {
        w.json(format!("data/pages/{}.json", page.slug), page)?;
    }

    let print = &publication.print;
    w.json("data/print/resume.json", &print.resume)?;
    if let Some(skills) = &print.skills {
        w.json("data/print/skills.json", skills)?;
    }
    if let Some(projects) = &print.projects {
        w.json("data/print/projects.json", projects)?;
    }

    w.text("robots.txt", &seo::robots_txt(&site.seo, site_url))?;
    if site.seo.sitemap {
        let xml = seo::sitemap_xml(
            &publication.manifest.routes,
            site_url,
            build_date,
            &publication.i18n,
            web.blog.posts(),
        );
        w.text_if_any("sitemap.xml", &xml)?;
    }
    if site.seo.llms_txt {
        w.text_if_any("llms.txt", &seo::llms_txt(web))?;
    }
    if site.seo.rss {
        let xml = seo::feed_xml(site, &web.blog, site_url, &publication.i18n);
        w.text_if_any("feed.xml", &xml)?;
    }
    if let Some(domain) = site.custom_domain.as_deref().filter(|d| !d.is_empty()) {
        w.text("CNAME", &format!("{domain}\n"))?;
    }

    tracing::debug!(out = %out_dir.display(), files = w.report.files.len(), "wrote dataset");
    Ok(w.report)
}
