//! Non-fatal build conditions.
//!
//! Stages never abort on degraded input. They return their output plus a list
//! of warnings, and the pipeline concatenates them in stage order. The CLI
//! prints them; library callers can match on the variant.

use std::path::PathBuf;
use thiserror::Error;

/// Which kind of entry referenced an unknown skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referrer {
    Experience,
    Project,
}

impl std::fmt::Display for Referrer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Referrer::Experience => f.write_str("experience"),
            Referrer::Project => f.write_str("project"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("Language pack for \"{lang}\" not found, falling back to English")]
    LocaleFallback { lang: String },
    #[error("Custom locale file \"{}\" not found, falling back to English", .path.display())]
    CustomLocaleFallback { path: PathBuf },
    #[error("i18n key \"{key}\" missing from language pack, using key as fallback")]
    MissingLabel { key: String },
    #[error("Skill \"{skill}\" referenced in {referrer} \"{owner}\" not found in skills.yml")]
    UnmatchedSkill {
        skill: String,
        referrer: Referrer,
        owner: String,
    },
    #[error("No publishable blog posts found, blog will be disabled")]
    BlogDisabled,
    #[error("Unreadable {field} \"{value}\" in \"{}\", treating it as unset", .path.display())]
    InvalidDate {
        path: PathBuf,
        field: &'static str,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_skill_names_referrer() {
        let w = Warning::UnmatchedSkill {
            skill: "Python".into(),
            referrer: Referrer::Project,
            owner: "vitae".into(),
        };
        assert_eq!(
            w.to_string(),
            "Skill \"Python\" referenced in project \"vitae\" not found in skills.yml"
        );
    }

    #[test]
    fn fallback_messages() {
        let w = Warning::LocaleFallback { lang: "xx".into() };
        assert_eq!(
            w.to_string(),
            "Language pack for \"xx\" not found, falling back to English"
        );
        let w = Warning::CustomLocaleFallback {
            path: PathBuf::from("locales/mine.yml"),
        };
        assert!(w.to_string().contains("locales/mine.yml"));
    }
}
