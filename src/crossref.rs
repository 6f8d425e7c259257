//! Skill cross-references.
//!
//! Experience entries and projects name the skills they used. This module
//! resolves those names against the skill catalog and builds four lookup maps,
//! so the site can show "where was this used" on a skill and "what was used
//! here" on an entry without searching at render time.
//!
//! ```text
//! skillToExperience   docker               → [{title, company, start, end}, ...]
//! skillToProject      docker               → [{name, start}, ...]
//! experienceToSkills  staff-engineer-acme  → [{name, level, category}, ...]
//! projectToSkills     vitae                → [{name, level, category}, ...]
//! ```
//!
//! Skill keys are lower-cased names, so `Docker` in the catalog matches
//! `docker` in an experience entry. Experience keys are
//! `slugify("title--company")` (or just the title), project keys are the
//! slugified project name. Entries whose references all miss get no entry in
//! the entry-to-skills maps.
//!
//! A reference to an unknown skill produces a warning, unless the catalog has
//! no skills at all: an empty catalog means skills are not tracked.

use crate::naming::slugify;
use crate::profile::{ProjectCatalog, ResumeProfile, SkillCatalog};
use crate::warning::{Referrer, Warning};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An experience entry as seen from a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A project as seen from a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
    pub start: String,
}

/// A catalogued skill as seen from an entry, with its catalog display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub name: String,
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReferenceIndex {
    pub skill_to_experience: BTreeMap<String, Vec<ExperienceRef>>,
    pub skill_to_project: BTreeMap<String, Vec<ProjectRef>>,
    pub experience_to_skills: BTreeMap<String, Vec<SkillRef>>,
    pub project_to_skills: BTreeMap<String, Vec<SkillRef>>,
}

/// Resolve experience and project skill references against the catalog.
///
/// Pass the web projection: redacted sections simply contribute nothing.
pub fn build_cross_reference(
    skills: Option<&SkillCatalog>,
    resume: Option<&ResumeProfile>,
    projects: Option<&ProjectCatalog>,
) -> (CrossReferenceIndex, Vec<Warning>) {
    // Later categories overwrite earlier ones on duplicate names.
    let catalog: HashMap<String, SkillRef> = skills
        .into_iter()
        .flat_map(SkillCatalog::skills)
        .map(|(category, skill)| {
            let entry = SkillRef {
                name: skill.name.clone(),
                level: skill.level.clone(),
                category: category.name.clone(),
            };
            (skill.name.to_lowercase(), entry)
        })
        .collect();

    let mut index = CrossReferenceIndex::default();
    let mut warnings = Vec::new();
    let mut miss = |skill: &str, referrer: Referrer, owner: &str| {
        if !catalog.is_empty() {
            warnings.push(Warning::UnmatchedSkill {
                skill: skill.to_string(),
                referrer,
                owner: owner.to_string(),
            });
        }
    };

    let experience = resume.and_then(|r| r.experience.as_deref()).unwrap_or_default();
    for (i, entry) in experience.iter().enumerate() {
        let title = entry.title.as_deref().unwrap_or_default();
        let key = match &entry.company {
            Some(company) => slugify(&format!("{title}--{company}")),
            None => slugify(title),
        };
        // Untitled entries with no company still need a distinct key.
        let key = if key.is_empty() { format!("experience-{i}") } else { key };
        let owner = entry
            .title
            .clone()
            .or_else(|| entry.company.clone())
            .unwrap_or_else(|| format!("experience[{i}]"));
        let mut matched = Vec::new();
        for name in &entry.skills {
            let skill_key = name.to_lowercase();
            match catalog.get(&skill_key) {
                Some(skill) => {
                    index
                        .skill_to_experience
                        .entry(skill_key)
                        .or_default()
                        .push(ExperienceRef {
                            title: entry.title.clone(),
                            company: entry.company.clone(),
                            start: entry.start.clone(),
                            end: entry.end.clone(),
                        });
                    matched.push(skill.clone());
                }
                None => miss(name, Referrer::Experience, &owner),
            }
        }
        if !matched.is_empty() {
            index.experience_to_skills.insert(key, matched);
        }
    }

    let projects = projects.map(|p| p.projects.as_slice()).unwrap_or_default();
    for project in projects {
        let mut matched = Vec::new();
        for name in &project.skills {
            let skill_key = name.to_lowercase();
            match catalog.get(&skill_key) {
                Some(skill) => {
                    index
                        .skill_to_project
                        .entry(skill_key)
                        .or_default()
                        .push(ProjectRef {
                            name: project.name.clone(),
                            start: project.start.clone(),
                        });
                    matched.push(skill.clone());
                }
                None => miss(name, Referrer::Project, &project.name),
            }
        }
        if !matched.is_empty() {
            index
                .project_to_skills
                .insert(slugify(&project.name), matched);
        }
    }

    tracing::debug!(
        skills = catalog.len(),
        referenced = index.skill_to_experience.len() + index.skill_to_project.len(),
        unmatched = warnings.len(),
        "built cross-reference index"
    );
    (index, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{catalog, experience, project, resume_with};
    use serde_json::json;

    #[test]
    fn matches_case_insensitively() {
        let skills = catalog(&[("Tools", &["Docker"])]);
        let resume = resume_with(vec![experience("Engineer", Some("ACME"), &["docker"])]);
        let (index, warnings) = build_cross_reference(Some(&skills), Some(&resume), None);

        assert!(warnings.is_empty());
        assert_eq!(index.skill_to_experience["docker"].len(), 1);
        let refs = &index.experience_to_skills["engineer-acme"];
        assert_eq!(refs[0].name, "Docker");
        assert_eq!(refs[0].category.as_deref(), Some("Tools"));
    }

    #[test]
    fn counts_every_referencing_entry_and_warns_once_per_miss() {
        let skills = catalog(&[("Ops", &["Docker", "Kubernetes"])]);
        let resume = resume_with(vec![
            experience("Platform Lead", Some("ACME"), &["Docker", "Kubernetes"]),
            experience("Developer", None, &["docker", "Python"]),
        ]);
        let (index, warnings) = build_cross_reference(Some(&skills), Some(&resume), None);

        assert_eq!(index.skill_to_experience["docker"].len(), 2);
        assert_eq!(index.skill_to_experience["kubernetes"].len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("Python"));
        assert!(warnings[0].to_string().contains("experience \"Developer\""));
    }

    #[test]
    fn experience_keys() {
        let skills = catalog(&[("Langs", &["Rust"])]);
        let resume = resume_with(vec![
            experience("Staff Engineer", Some("ACME Corp"), &["Rust"]),
            experience("Freelance Consultant", None, &["Rust"]),
        ]);
        let (index, _) = build_cross_reference(Some(&skills), Some(&resume), None);
        let keys: Vec<&str> = index.experience_to_skills.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["freelance-consultant", "staff-engineer-acme-corp"]);
    }

    #[test]
    fn experience_ref_shape() {
        let skills = catalog(&[("Langs", &["Rust"])]);
        let resume = resume_with(vec![experience("Solo", None, &["Rust"])]);
        let (index, _) = build_cross_reference(Some(&skills), Some(&resume), None);
        let value = serde_json::to_value(&index.skill_to_experience["rust"][0]).unwrap();
        assert_eq!(value, json!({"title": "Solo", "start": "2020", "end": null}));
    }

    #[test]
    fn untitled_entries_are_keyed_by_company_or_position() {
        let skills = catalog(&[("Langs", &["Rust"])]);
        let mut at_acme = experience("", Some("ACME"), &["Rust", "Cobol"]);
        at_acme.title = None;
        let mut anonymous = experience("", None, &["Rust"]);
        anonymous.title = None;
        let resume = resume_with(vec![at_acme, anonymous]);
        let (index, warnings) = build_cross_reference(Some(&skills), Some(&resume), None);

        let keys: Vec<&str> = index.experience_to_skills.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["acme", "experience-1"]);
        let value = serde_json::to_value(&index.skill_to_experience["rust"][0]).unwrap();
        assert_eq!(value, json!({"company": "ACME", "start": "2020", "end": null}));
        assert!(warnings[0].to_string().contains("experience \"ACME\""));
    }

    #[test]
    fn entries_without_matches_get_no_entry() {
        let skills = catalog(&[("Langs", &["Rust"])]);
        let resume = resume_with(vec![experience("Dev", None, &["Cobol"])]);
        let (index, warnings) = build_cross_reference(Some(&skills), Some(&resume), None);
        assert!(index.experience_to_skills.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn projects_are_linked() {
        let skills = catalog(&[("Langs", &["Rust", "Go"])]);
        let projects = ProjectCatalog {
            projects: vec![
                project("Vitae CLI", &["rust", "Elm"]),
                project("Other", &["Go"]),
            ],
            ..ProjectCatalog::default()
        };
        let (index, warnings) = build_cross_reference(Some(&skills), None, Some(&projects));

        assert_eq!(index.skill_to_project["rust"][0].name, "Vitae CLI");
        assert_eq!(index.project_to_skills["vitae-cli"][0].name, "Rust");
        assert_eq!(index.project_to_skills["other"][0].name, "Go");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("project \"Vitae CLI\""));
    }

    #[test]
    fn last_category_wins_on_duplicates() {
        let skills = catalog(&[("First", &["Rust"]), ("Second", &["rust"])]);
        let resume = resume_with(vec![experience("Dev", None, &["RUST"])]);
        let (index, _) = build_cross_reference(Some(&skills), Some(&resume), None);
        let refs = &index.experience_to_skills["dev"];
        assert_eq!(refs[0].name, "rust");
        assert_eq!(refs[0].category.as_deref(), Some("Second"));
    }

    #[test]
    fn empty_catalog_suppresses_warnings() {
        let resume = resume_with(vec![experience("Dev", None, &["Rust"])]);
        let (index, warnings) =
            build_cross_reference(Some(&SkillCatalog::default()), Some(&resume), None);
        assert!(warnings.is_empty());
        assert!(index.skill_to_experience.is_empty());

        let (_, warnings) = build_cross_reference(None, Some(&resume), None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn absent_inputs_yield_empty_index() {
        let (index, warnings) = build_cross_reference(None, None, None);
        assert_eq!(index, CrossReferenceIndex::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let value = serde_json::to_value(CrossReferenceIndex::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "skillToExperience": {},
                "skillToProject": {},
                "experienceToSkills": {},
                "projectToSkills": {}
            })
        );
    }
}
