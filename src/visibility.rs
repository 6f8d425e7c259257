//! Audience-tiered redaction.
//!
//! Every content area carries a [`Visibility`] tier saying where it may be
//! published:
//!
//! | Tier    | Web dataset | Print dataset |
//! |---------|-------------|---------------|
//! | `all`   | yes         | yes           |
//! | `web`   | yes         | no            |
//! | `print` | no          | yes           |
//! | `none`  | no          | no            |
//!
//! One policy yields two independent projections of the same source data:
//! [`filter_for_web`] feeds the site and its JSON dataset, [`filter_for_print`]
//! feeds the document exporters. Both build new values and leave their inputs
//! untouched, so the same loaded profile can be projected any number of times.
//!
//! Redaction happens at three granularities:
//!
//! - **Contact fields**: `contact_email`, `contact_phone`, `location`,
//!   `contact_website`, `socials` and `links` each gate one field of the
//!   contact block.
//! - **Sections**: `education`, `experience`, `community` and `accreditations`
//!   remove the whole list.
//! - **Catalogs**: `skills`, `projects` and `blog` make the catalog absent
//!   (not empty) in the projection.
//!
//! `experience_company` is the odd one out: it strips only the `company` of
//! each experience entry and leaves the rest of the entry in place.
//!
//! Older configuration files used booleans instead of tiers. Those are mapped
//! `true → all`, `false → none` by [`normalize_policy_value`] when the site
//! configuration is ingested; nothing past that point sees a boolean.

use crate::blog::BlogResult;
use crate::profile::{ProjectCatalog, ResumeProfile, SkillCatalog};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a content area may be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    All,
    Web,
    Print,
    None,
}

impl Visibility {
    /// Wire values, in tier order.
    pub const WIRE_VALUES: [&'static str; 4] = ["all", "web", "print", "none"];

    pub fn from_legacy(flag: bool) -> Self {
        if flag { Visibility::All } else { Visibility::None }
    }

    pub fn is_web_visible(self) -> bool {
        matches!(self, Visibility::All | Visibility::Web)
    }

    pub fn is_print_visible(self) -> bool {
        matches!(self, Visibility::All | Visibility::Print)
    }

    pub fn is_visible_to(self, audience: Audience) -> bool {
        match audience {
            Audience::Web => self.is_web_visible(),
            Audience::Print => self.is_print_visible(),
        }
    }
}

/// The two publication targets a policy is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Web,
    Print,
}

/// Visibility tier per content area.
///
/// Missing keys take their defaults: everything is `all` except the e-mail
/// address and phone number, which are `none` until the author opts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityPolicy {
    pub education: Visibility,
    pub experience: Visibility,
    pub experience_company: Visibility,
    pub projects: Visibility,
    pub community: Visibility,
    pub accreditations: Visibility,
    pub skills: Visibility,
    pub blog: Visibility,
    pub contact_email: Visibility,
    pub contact_phone: Visibility,
    pub location: Visibility,
    pub contact_website: Visibility,
    pub socials: Visibility,
    pub links: Visibility,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            education: Visibility::All,
            experience: Visibility::All,
            experience_company: Visibility::All,
            projects: Visibility::All,
            community: Visibility::All,
            accreditations: Visibility::All,
            skills: Visibility::All,
            blog: Visibility::All,
            contact_email: Visibility::None,
            contact_phone: Visibility::None,
            location: Visibility::All,
            contact_website: Visibility::All,
            socials: Visibility::All,
            links: Visibility::All,
        }
    }
}

/// Keys used by the boolean-era configuration, and their current names.
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("email", "contact_email"),
    ("phone", "contact_phone"),
    ("website", "contact_website"),
];

/// Bring a raw `visibility` mapping up to the four-tier model.
///
/// Booleans become `all`/`none` and legacy key names are renamed, unless the
/// current name is also present, in which case the current name wins. Values
/// that are neither booleans nor strings are left for the validator to report.
pub fn normalize_policy_value(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    for (legacy, current) in LEGACY_KEYS {
        if let Some(v) = map.remove(*legacy)
            && !map.contains_key(*current)
        {
            map.insert(current.to_string(), v);
        }
    }
    for v in map.values_mut() {
        if let Value::Bool(flag) = v {
            let tier = Visibility::from_legacy(*flag);
            *v = Value::String(Visibility::WIRE_VALUES[tier as usize].to_string());
        }
    }
    Value::Object(map)
}

/// One audience's view of the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub resume: ResumeProfile,
    pub skills: Option<SkillCatalog>,
    pub projects: Option<ProjectCatalog>,
    pub blog: BlogResult,
}

/// Redact for the web site and its JSON dataset.
pub fn filter_for_web(
    policy: &VisibilityPolicy,
    resume: &ResumeProfile,
    skills: Option<&SkillCatalog>,
    projects: Option<&ProjectCatalog>,
    blog: &BlogResult,
) -> Projection {
    let mut projection = project(policy, Audience::Web, resume, skills, projects);
    if policy.blog.is_web_visible() {
        projection.blog = blog.clone();
    }
    projection
}

/// Redact for the printable documents. The blog never reaches print.
pub fn filter_for_print(
    policy: &VisibilityPolicy,
    resume: &ResumeProfile,
    skills: Option<&SkillCatalog>,
    projects: Option<&ProjectCatalog>,
) -> Projection {
    project(policy, Audience::Print, resume, skills, projects)
}

fn project(
    policy: &VisibilityPolicy,
    audience: Audience,
    resume: &ResumeProfile,
    skills: Option<&SkillCatalog>,
    projects: Option<&ProjectCatalog>,
) -> Projection {
    let shown = |v: Visibility| v.is_visible_to(audience);

    let mut resume = resume.clone();

    if let Some(contact) = resume.contact.as_mut() {
        if !shown(policy.contact_email) {
            contact.email = None;
        }
        if !shown(policy.contact_phone) {
            contact.phone = None;
        }
        if !shown(policy.location) {
            contact.location = None;
        }
        if !shown(policy.contact_website) {
            contact.website = None;
        }
        if !shown(policy.socials) {
            contact.socials = None;
        }
        if !shown(policy.links) {
            contact.links = None;
        }
    }

    if !shown(policy.education) {
        resume.education = None;
    }
    if !shown(policy.experience) {
        resume.experience = None;
    }
    if !shown(policy.community) {
        resume.community = None;
    }
    if !shown(policy.accreditations) {
        resume.accreditations = None;
    }

    if !shown(policy.experience_company)
        && let Some(entries) = resume.experience.as_mut()
    {
        for entry in entries {
            entry.company = None;
        }
    }

    Projection {
        resume,
        skills: skills.filter(|_| shown(policy.skills)).cloned(),
        projects: projects.filter(|_| shown(policy.projects)).cloned(),
        blog: BlogResult::Disabled,
    }
}
