//! Shared test utilities for the vitae test suite.
//!
//! Two kinds of helpers live here:
//!
//! - **Samples**: a small but complete profile (`sample_resume`,
//!   `sample_skills`, ...) for tests that need realistic data and do not care
//!   about its exact shape.
//! - **Builders**: terse constructors (`catalog`, `experience`, `project`,
//!   `page`) for tests that assert on specific values.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let skills = catalog(&[("Languages", &["Rust", "Go"])]);
//! let resume = resume_with(vec![experience("Engineer", Some("ACME"), &["rust"])]);
//! ```

use chrono::NaiveDate;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::blog::{self, BlogOptions, BlogResult};
use crate::config::{self, SiteConfig};
use crate::markdown::SourceFile;
use crate::profile::{Experience, Project, ProjectCatalog, ResumeProfile, Skill, SkillCatalog, SkillCategory};
use crate::source::Mapping;
use crate::types::{Page, PageMeta};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/profile/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/profile");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Samples
// =========================================================================

/// Build date the samples are compiled against.
pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// A résumé with every section and every contact field filled in.
pub fn sample_resume() -> ResumeProfile {
    serde_json::from_value(json!({
        "name": "Ada Lovelace",
        "tagline": "Analyst and metaphysician",
        "summary": "Writes *programs* for machines that do not exist yet.",
        "contact": {
            "email": "ada@example.org",
            "phone": "+44 20 7946 0000",
            "location": {"city": "London", "country": "UK"},
            "website": "https://ada.example.org",
            "socials": [{"type": "GitHub", "username": "ada", "url": "https://github.com/ada"}],
            "links": [{"title": "Notes", "url": "https://ada.example.org/notes"}],
        },
        "education": [{
            "qualification": "Private tuition in mathematics",
            "institution": "University of London",
            "start": 1840,
            "end": 1842,
        }],
        "experience": [
            {
                "title": "Translator",
                "company": "Taylor's Scientific Memoirs",
                "start": "1842",
                "end": "1843",
                "description": "Translated and annotated a memoir on the engine.",
                "skills": ["Mathematics", "french"],
            },
            {
                "title": "Independent researcher",
                "start": "1843",
                "skills": ["Mathematics", "Poetical science"],
            },
        ],
        "community": [{"name": "London Mathematical circle", "role": "Member"}],
        "accreditations": [{"title": "Honorary member", "issuer": "Statistical circle", "date": "1843"}],
    }))
    .unwrap()
}

pub fn sample_skills() -> SkillCatalog {
    serde_json::from_value(json!({
        "categories": [
            {
                "name": "Mathematics",
                "skills": [
                    {"name": "Mathematics", "level": "expert", "years_active": 10},
                    {"name": "Algorithms", "level": "expert"},
                ],
            },
            {
                "name": "Languages",
                "skills": [{"name": "French", "level": 4}],
            },
        ],
    }))
    .unwrap()
}

pub fn sample_projects() -> ProjectCatalog {
    serde_json::from_value(json!({
        "projects": [
            {
                "name": "Note G",
                "description": "Bernoulli numbers on the analytical engine.",
                "start": 1843,
                "url": "https://ada.example.org/note-g",
                "skills": ["Algorithms", "Mathematics"],
            },
            {
                "name": "Flyology",
                "description": "A study of flight.",
                "start": "1828",
                "end": "1829",
            },
        ],
    }))
    .unwrap()
}

/// A compiled blog of two posts, newest first.
pub fn sample_blog() -> BlogResult {
    let sources = [
        SourceFile {
            path: PathBuf::from("blog/2026-01-10-notes.md"),
            text: "---\ntitle: Notes on the engine\npublish_on: 2026-01-10\ntags: [engine]\n---\nSome notes.\n".into(),
        },
        SourceFile {
            path: PathBuf::from("blog/2026-03-01-bernoulli.md"),
            text: "---\ntitle: Bernoulli numbers\ndescription: Computing them by machine\npublish_on: 2026-03-01\ntags: [engine, maths]\n---\nThe *diagram* of Note G.\n".into(),
        },
    ];
    let options = BlogOptions {
        build_date: sample_date(),
        default_author: "Ada Lovelace".into(),
    };
    let compilation = blog::compile_posts(&sources, &options).unwrap();
    assert!(compilation.result.is_compiled());
    compilation.result
}

/// Site configuration with defaults applied and an explicit title.
pub fn sample_site() -> SiteConfig {
    let mut site = Mapping::new();
    site.insert("lang".into(), json!("en"));
    site.insert("title".into(), json!("Ada Lovelace"));
    site.insert("description".into(), json!("Analyst and metaphysician"));
    SiteConfig::from_mapping(config::apply_site_defaults(site)).unwrap()
}

// =========================================================================
// Builders
// =========================================================================

/// A catalog from `(category, [skill names])` pairs. Skills get no level.
pub fn catalog(categories: &[(&str, &[&str])]) -> SkillCatalog {
    SkillCatalog {
        categories: categories
            .iter()
            .map(|(name, skills)| SkillCategory {
                name: Some(name.to_string()),
                skills: skills
                    .iter()
                    .map(|s| Skill {
                        name: s.to_string(),
                        level: None,
                        tags: Vec::new(),
                        extra: Mapping::new(),
                    })
                    .collect(),
                extra: Mapping::new(),
            })
            .collect(),
        extra: Mapping::new(),
    }
}

/// An ongoing role started in 2020.
pub fn experience(title: &str, company: Option<&str>, skills: &[&str]) -> Experience {
    Experience {
        title: Some(title.to_string()),
        company: company.map(str::to_string),
        start: Some("2020".to_string()),
        end: None,
        description: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        extra: Mapping::new(),
    }
}

pub fn resume_with(experience: Vec<Experience>) -> ResumeProfile {
    ResumeProfile {
        name: "Test Person".to_string(),
        tagline: "Tester".to_string(),
        contact: None,
        summary: None,
        summary_html: None,
        education: None,
        experience: Some(experience),
        community: None,
        accreditations: None,
        extra: Mapping::new(),
    }
}

pub fn project(name: &str, skills: &[&str]) -> Project {
    Project {
        name: name.to_string(),
        description: format!("{name} description"),
        start: "2024".to_string(),
        end: None,
        url: None,
        repo: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        extra: Mapping::new(),
    }
}

pub fn page(slug: &str, nav_order: i64, show_in_nav: bool) -> Page {
    Page {
        slug: slug.to_string(),
        title: slug.to_string(),
        description: String::new(),
        content_html: String::new(),
        meta: PageMeta {
            nav_order: nav_order as f64,
            show_in_nav,
            extra: Mapping::new(),
        },
    }
}
