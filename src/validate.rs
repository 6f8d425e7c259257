//! Structural validation of the four source mappings.
//!
//! Validation runs on the untyped values, before anything is deserialized, and
//! never stops at the first problem: every error in every file is collected so
//! the author can fix them in one pass. An empty list is the only passing
//! result; the pipeline refuses to build on anything else.
//!
//! Field paths use dotted keys and indexed arrays, the way an author would
//! find them in the file: `documents.page_size`, `projects[2].start`,
//! `categories[0].skills[3].name`.

use crate::config::PageSize;
use crate::visibility::Visibility;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const SITE_FILE: &str = "site.yml";
pub const RESUME_FILE: &str = "resume.yml";
pub const SKILLS_FILE: &str = "skills.yml";
pub const PROJECTS_FILE: &str = "projects.yml";

/// One schema problem in one source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{file}\" validation failed: {field} {reason}")]
pub struct ValidationError {
    pub file: String,
    /// Path to the offending field, or `(root)` for the whole document.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    /// A structural mismatch found while typing an already-validated mapping.
    pub fn from_conversion(file: &str, error: impl fmt::Display) -> Self {
        Self {
            file: file.to_string(),
            field: "(root)".to_string(),
            reason: format!("has an unexpected shape: {error}"),
        }
    }
}

const REQUIRED_STRING: &str = "is required and must be a string";

/// Collects errors for one file.
struct Report<'a> {
    file: &'a str,
    errors: Vec<ValidationError>,
}

impl<'a> Report<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(ValidationError {
            file: self.file.to_string(),
            field: field.into(),
            reason: reason.into(),
        });
    }

    fn require_string(&mut self, value: &Value, key: &str, field: impl Into<String>) {
        if !is_non_empty_string(value.get(key)) {
            self.push(field, REQUIRED_STRING);
        }
    }

    fn optional_bool(&mut self, value: &Value, key: &str, field: impl Into<String>) {
        if value.get(key).is_some_and(|v| !v.is_boolean()) {
            self.push(field, "must be a boolean");
        }
    }

    fn optional_string(&mut self, value: &Value, key: &str, field: impl Into<String>) {
        if value.get(key).is_some_and(|v| !v.is_string() && !v.is_null()) {
            self.push(field, "must be a string");
        }
    }

    fn string_list(&mut self, value: &Value, key: &str, field: String) {
        match value.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                if items.iter().any(|item| !item.is_string()) {
                    self.push(field, "must be a list of strings");
                }
            }
            Some(_) => self.push(field, "must be a list of strings"),
        }
    }
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

/// Absent, null, `false`, `0` and `""` all count as missing.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Validate all four source documents and return every problem found.
pub fn validate(
    site: &Value,
    resume: &Value,
    skills: &Value,
    projects: &Value,
) -> Vec<ValidationError> {
    let mut errors = validate_site(site);
    errors.extend(validate_resume(resume));
    errors.extend(validate_skills(skills));
    errors.extend(validate_projects(projects));
    errors
}

fn validate_site(data: &Value) -> Vec<ValidationError> {
    let mut report = Report::new(SITE_FILE);
    if !data.is_object() {
        report.push("(root)", "must be a YAML mapping");
        return report.errors;
    }

    report.require_string(data, "lang", "lang");
    for key in ["title", "description", "url", "custom_domain", "i18n_file"] {
        report.optional_string(data, key, key);
    }

    match data.get("visibility") {
        None | Some(Value::Null) => {}
        Some(Value::Object(policy)) => {
            for (key, tier) in policy {
                let known = tier.is_boolean()
                    || tier
                        .as_str()
                        .is_some_and(|s| Visibility::WIRE_VALUES.contains(&s));
                if !known {
                    report.push(
                        format!("visibility.{key}"),
                        "must be one of 'all', 'web', 'print' or 'none'",
                    );
                }
            }
        }
        Some(_) => report.push("visibility", "must be a mapping"),
    }

    match data.get("seo") {
        None | Some(Value::Null) => {}
        Some(seo @ Value::Object(_)) => {
            match seo.get("robots") {
                None | Some(Value::Null) => {}
                Some(robots @ Value::Object(_)) => {
                    report.optional_bool(robots, "indexing", "seo.robots.indexing");
                    report.optional_bool(robots, "follow_links", "seo.robots.follow_links");
                }
                Some(_) => report.push("seo.robots", "must be a mapping"),
            }
            for key in ["sitemap", "llms_txt", "rss"] {
                report.optional_bool(seo, key, format!("seo.{key}"));
            }
        }
        Some(_) => report.push("seo", "must be a mapping"),
    }

    match data.get("documents") {
        None | Some(Value::Null) => {}
        Some(docs @ Value::Object(_)) => {
            report.optional_bool(docs, "pdf", "documents.pdf");
            report.optional_bool(docs, "docx", "documents.docx");
            if let Some(size) = docs.get("page_size")
                && !size
                    .as_str()
                    .is_some_and(|s| PageSize::WIRE_VALUES.contains(&s))
            {
                report.push("documents.page_size", "must be 'A4' or 'Letter'");
            }
            if let Some(name) = docs.get("filename") {
                let valid = name
                    .as_str()
                    .is_some_and(|s| !s.is_empty() && !s.contains(['/', '\\', '.']));
                if !valid {
                    report.push(
                        "documents.filename",
                        "must be a non-empty string without slashes or file extensions",
                    );
                }
            }
        }
        Some(_) => report.push("documents", "must be a mapping"),
    }

    match data.get("i18n_overrides") {
        None | Some(Value::Null) => {}
        Some(overrides @ Value::Object(_)) => match overrides.get("labels") {
            None | Some(Value::Null) => {}
            Some(Value::Object(labels)) => {
                for (key, label) in labels {
                    if !label.is_string() {
                        report.push(format!("i18n_overrides.labels.{key}"), "must be a string");
                    }
                }
            }
            Some(_) => report.push("i18n_overrides.labels", "must be a mapping"),
        },
        Some(_) => report.push("i18n_overrides", "must be a mapping"),
    }

    report.errors
}

fn validate_resume(data: &Value) -> Vec<ValidationError> {
    let mut report = Report::new(RESUME_FILE);
    if !data.is_object() {
        report.push("(root)", "must be a YAML mapping");
        return report.errors;
    }

    report.require_string(data, "name", "name");
    report.require_string(data, "tagline", "tagline");

    match data.get("experience") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                if !entry.is_object() {
                    report.push(format!("experience[{i}]"), "must be an object");
                    continue;
                }
                report.string_list(entry, "skills", format!("experience[{i}].skills"));
            }
        }
        Some(_) => report.push("experience", "must be an array"),
    }

    for section in ["education", "community", "accreditations"] {
        if data
            .get(section)
            .is_some_and(|v| !v.is_array() && !v.is_null())
        {
            report.push(section, "must be an array");
        }
    }

    report.errors
}

fn validate_skills(data: &Value) -> Vec<ValidationError> {
    let mut report = Report::new(SKILLS_FILE);
    if !data.is_object() {
        report.push("(root)", "must be a YAML mapping");
        return report.errors;
    }

    let Some(categories) = data.get("categories").and_then(Value::as_array) else {
        report.push("categories", "is required and must be an array");
        return report.errors;
    };

    for (i, category) in categories.iter().enumerate() {
        if !category.is_object() {
            report.push(format!("categories[{i}]"), "must be an object");
            continue;
        }
        let Some(skills) = category.get("skills").and_then(Value::as_array) else {
            report.push(format!("categories[{i}].skills"), "must be an array");
            continue;
        };
        for (j, skill) in skills.iter().enumerate() {
            if !skill.is_object() {
                report.push(format!("categories[{i}].skills[{j}]"), "must be an object");
                continue;
            }
            report.require_string(skill, "name", format!("categories[{i}].skills[{j}].name"));
        }
    }

    report.errors
}

fn validate_projects(data: &Value) -> Vec<ValidationError> {
    let mut report = Report::new(PROJECTS_FILE);
    if !data.is_object() {
        report.push("(root)", "must be a YAML mapping");
        return report.errors;
    }

    let Some(projects) = data.get("projects").and_then(Value::as_array) else {
        report.push("projects", "is required and must be an array");
        return report.errors;
    };

    for (i, project) in projects.iter().enumerate() {
        if !project.is_object() {
            report.push(format!("projects[{i}]"), "must be an object");
            continue;
        }
        report.require_string(project, "name", format!("projects[{i}].name"));
        report.require_string(project, "description", format!("projects[{i}].description"));
        if !is_present(project.get("start")) {
            report.push(format!("projects[{i}].start"), "is required");
        }
        report.string_list(project, "skills", format!("projects[{i}].skills"));
    }

    report.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{apply_site_defaults, stock_site_config};
    use crate::source::{Format, parse_mapping};
    use serde_json::json;

    fn valid_site() -> Value {
        json!({"lang": "en"})
    }

    fn valid_resume() -> Value {
        json!({"name": "Ada", "tagline": "Engineer"})
    }

    fn valid_skills() -> Value {
        json!({"categories": [{"name": "Tools", "skills": [{"name": "Docker"}]}]})
    }

    fn valid_projects() -> Value {
        json!({"projects": [{"name": "vitae", "description": "CV builder", "start": "2024"}]})
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_inputs_pass() {
        let errors = validate(&valid_site(), &valid_resume(), &valid_skills(), &valid_projects());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn null_inputs_fail_at_root() {
        let errors = validate(&Value::Null, &Value::Null, &Value::Null, &Value::Null);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.field == "(root)"));
        let files: Vec<&str> = errors.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, vec![SITE_FILE, RESUME_FILE, SKILLS_FILE, PROJECTS_FILE]);
    }

    #[test]
    fn errors_from_all_files_are_collected() {
        let errors = validate(
            &json!({"lang": ""}),
            &json!({"name": "Ada"}),
            &json!({"categories": "nope"}),
            &json!({}),
        );
        assert_eq!(fields(&errors), vec!["lang", "tagline", "categories", "projects"]);
    }

    #[test]
    fn error_display() {
        let errors = validate(&json!({}), &valid_resume(), &valid_skills(), &valid_projects());
        assert_eq!(
            errors[0].to_string(),
            "\"site.yml\" validation failed: lang is required and must be a string"
        );
    }

    #[test]
    fn document_settings_are_checked() {
        let site = json!({
            "lang": "en",
            "documents": {"pdf": "yes", "docx": true, "page_size": "A5", "filename": "my.cv"}
        });
        let errors = validate(&site, &valid_resume(), &valid_skills(), &valid_projects());
        assert_eq!(
            fields(&errors),
            vec!["documents.pdf", "documents.page_size", "documents.filename"]
        );
        assert_eq!(errors[1].reason, "must be 'A4' or 'Letter'");
    }

    #[test]
    fn filename_rejects_separators_and_empty() {
        for bad in ["a/b", "a\\b", "", "resume.pdf"] {
            let site = json!({"lang": "en", "documents": {"filename": bad}});
            let errors = validate(&site, &valid_resume(), &valid_skills(), &valid_projects());
            assert_eq!(fields(&errors), vec!["documents.filename"], "{bad:?}");
        }
    }

    #[test]
    fn visibility_values_are_checked() {
        let site = json!({"lang": "en", "visibility": {"skills": "hidden", "blog": true, "links": "web"}});
        let errors = validate(&site, &valid_resume(), &valid_skills(), &valid_projects());
        assert_eq!(fields(&errors), vec!["visibility.skills"]);
    }

    #[test]
    fn seo_and_i18n_settings_are_checked() {
        let site = json!({
            "lang": "en",
            "seo": {"robots": {"indexing": "no"}, "rss": 1},
            "i18n_overrides": {"labels": {"nav_home": 3}},
            "i18n_file": ["a"]
        });
        let errors = validate(&site, &valid_resume(), &valid_skills(), &valid_projects());
        assert_eq!(
            fields(&errors),
            vec!["i18n_file", "seo.robots.indexing", "seo.rss", "i18n_overrides.labels.nav_home"]
        );
    }

    #[test]
    fn skill_categories_are_checked() {
        let skills = json!({"categories": [
            "flat",
            {"name": "No skills"},
            {"skills": [{"level": "expert"}, "bare"]}
        ]});
        let errors = validate(&valid_site(), &valid_resume(), &skills, &valid_projects());
        assert_eq!(
            fields(&errors),
            vec![
                "categories[0]",
                "categories[1].skills",
                "categories[2].skills[0].name",
                "categories[2].skills[1]"
            ]
        );
    }

    #[test]
    fn projects_are_checked() {
        let projects = json!({"projects": [
            {"name": "ok", "description": "fine", "start": 2024},
            {"description": 7},
            42,
            {"name": "x", "description": "y", "start": "", "skills": "Rust"}
        ]});
        let errors = validate(&valid_site(), &valid_resume(), &valid_skills(), &projects);
        assert_eq!(
            fields(&errors),
            vec![
                "projects[1].name",
                "projects[1].description",
                "projects[1].start",
                "projects[2]",
                "projects[3].start",
                "projects[3].skills"
            ]
        );
    }

    #[test]
    fn experience_entries_are_checked() {
        let resume = json!({
            "name": "Ada",
            "tagline": "Engineer",
            "experience": [{"company": "ACME"}, {"title": "Dev", "skills": [1]}, "intern"],
            "education": "none"
        });
        let errors = validate(&valid_site(), &resume, &valid_skills(), &valid_projects());
        assert_eq!(
            fields(&errors),
            vec!["experience[1].skills", "experience[2]", "education"]
        );
    }

    #[test]
    fn untitled_experience_is_valid() {
        let resume = json!({
            "name": "Ada",
            "tagline": "Engineer",
            "experience": [
                {"company": "ACME", "start": 2020, "skills": ["Rust"]},
                {"description": "Freelance work"}
            ]
        });
        let errors = validate(&valid_site(), &resume, &valid_skills(), &valid_projects());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn stock_config_validates() {
        let site = parse_mapping(stock_site_config(), Format::Yaml).unwrap();
        let site = Value::Object(apply_site_defaults(site));
        let errors = validate(&site, &valid_resume(), &valid_skills(), &valid_projects());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn validation_is_pure() {
        let site = json!({"lang": 1});
        let snapshot = site.clone();
        let first = validate(&site, &Value::Null, &valid_skills(), &valid_projects());
        let second = validate(&site, &Value::Null, &valid_skills(), &valid_projects());
        assert_eq!(first, second);
        assert_eq!(site, snapshot);
    }
}
