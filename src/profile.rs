//! Typed profile records: résumé, skill catalog and project catalog.
//!
//! These are deserialized from the validated source mappings and serialized
//! back out into the dataset. Keys the pipeline does not interpret are kept in
//! each record's `extra` map so author data survives the round trip.
//!
//! Date-ish fields (`start`, `end`, `date`) and skill levels are stored as
//! text. Authors write them as `2021`, `2021-04` or `"Spring 2021"`, and the
//! pipeline only ever compares them for equality or prints them.

use crate::source::Mapping;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: String,
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub summary: Option<String>,
    /// Rendered `summary`, attached when a projection is published.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub summary_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<Vec<Community>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accreditations: Option<Vec<Accreditation>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Vec<Social>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// A location is either free text or `{city, region, country}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Text(String),
    Structured(Place),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl fmt::Display for Location {
    /// `"City, Region, Country"`, skipping missing or empty parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Text(text) => f.write_str(text),
            Location::Structured(place) => {
                let parts: Vec<&str> = [&place.city, &place.region, &place.country]
                    .into_iter()
                    .filter_map(|p| p.as_deref())
                    .filter(|p| !p.is_empty())
                    .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub start: Option<String>,
    /// End date, `"present"`, or absent for an ongoing role.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub description: Option<String>,
    /// Skill names as written by the author; matched case-insensitively.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accreditation {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

// =============================================================================
// Skills
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub categories: Vec<SkillCategory>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl SkillCatalog {
    /// Every skill in catalog order, paired with its category.
    pub fn skills(&self) -> impl Iterator<Item = (&SkillCategory, &Skill)> {
        self.categories
            .iter()
            .flat_map(|cat| cat.skills.iter().map(move |skill| (cat, skill)))
    }

    /// True when no category holds a single skill.
    pub fn is_empty(&self) -> bool {
        self.skills().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub name: Option<String>,
    pub skills: Vec<Skill>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCatalog {
    pub projects: Vec<Project>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(with = "scalar::req")]
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "scalar::opt")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Accept strings, numbers and booleans where the dataset stores text.
mod scalar {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    fn to_text<E: Error>(value: Value) -> Result<Option<String>, E> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(E::custom(format!("expected text, found {other}"))),
        }
    }

    pub mod opt {
        use super::*;

        pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(text) => s.serialize_str(text),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
            to_text(Value::deserialize(d)?)
        }
    }

    pub mod req {
        use super::*;

        pub fn serialize<S: Serializer>(value: &str, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(value)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
            to_text::<D::Error>(Value::deserialize(d)?)?.ok_or_else(|| D::Error::custom("value is required"))
        }
    }
}
