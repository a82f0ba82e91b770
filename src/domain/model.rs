use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::forms::{CertificationForm, ExperienceForm, ProjectForm, SkillForm};
use crate::domain::ports::{Entity, Reconcile};
use crate::utils::error::FolioError;

/// Backend-assigned identifier. Opaque to the client; never generated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Records written by different producers carry text as strings, numbers
/// or `null`. Numbers and booleans keep their literal form; anything else
/// reads as absent.
fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Option::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Option::deserialize(deserializer)?))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| scalar_text(Some(item)))
        .collect())
}

/// An explicit `null` section or collection is the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank strings from form submissions mean "not set".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn first_non_empty(preferred: Option<String>, fallback: Option<String>) -> String {
    preferred
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.filter(|s| !s.is_empty()))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Profile (singleton)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cta: String,
    #[serde(deserialize_with = "lenient_string")]
    pub resume_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_string")]
    pub major: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gpa: String,
}

impl Education {
    pub fn is_empty(&self) -> bool {
        self.degree.is_empty() && self.institution.is_empty() && self.major.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Education,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
}

/// Every field defaults, so a partial document from the backend lands on
/// top of empty values instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "null_as_default")]
    pub hero: Hero,
    #[serde(deserialize_with = "null_as_default")]
    pub about: About,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: Contact,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    #[default]
    Hr,
    Finance,
    Soft,
}

impl SkillCategory {
    /// Fixed display order for grouping.
    pub const ALL: [SkillCategory; 3] = [Self::Hr, Self::Finance, Self::Soft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Finance => "finance",
            Self::Soft => "soft",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hr => "HR Management",
            Self::Finance => "Finance & Accounting",
            Self::Soft => "Leadership & Soft Skills",
        }
    }

    /// Heading on the public page, which words two of the groups
    /// differently from the admin panel.
    pub fn public_label(&self) -> &'static str {
        match self {
            Self::Hr => "HR Management",
            Self::Finance => "Financial Analysis",
            Self::Soft => "Professional Skills",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "finance" => Ok(Self::Finance),
            "soft" => Ok(Self::Soft),
            other => Err(FolioError::validation(
                "category",
                format!("unknown category '{}', expected one of hr, finance, soft", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub technologies: Vec<String>,
}

/// Canonical certification shape. Producers disagree on field names
/// (`name`/`title`, `date`/`year`); both are folded into one shape on
/// ingestion, preferring `title` and `year` when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CertificationWire")]
pub struct Certification {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Deserialize)]
struct CertificationWire {
    #[serde(rename = "_id", alias = "id", default)]
    id: EntityId,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    issuer: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    link: Option<String>,
}

impl From<CertificationWire> for Certification {
    fn from(wire: CertificationWire) -> Self {
        Self {
            id: wire.id,
            name: first_non_empty(wire.title, wire.name),
            issuer: wire.issuer,
            date: first_non_empty(wire.year, wire.date),
            link: wire.link,
        }
    }
}

impl Entity for Skill {
    type Form = SkillForm;
    const RESOURCE: &'static str = "skills";
    const LABEL: &'static str = "skill";
    const RECONCILE: Reconcile = Reconcile::ApplyResponse;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Experience {
    type Form = ExperienceForm;
    const RESOURCE: &'static str = "experience";
    const LABEL: &'static str = "experience";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Project {
    type Form = ProjectForm;
    const RESOURCE: &'static str = "projects";
    const LABEL: &'static str = "project";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Certification {
    type Form = CertificationForm;
    const RESOURCE: &'static str = "certifications";
    const LABEL: &'static str = "certification";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Aggregate read model for the public site
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroups {
    #[serde(deserialize_with = "lenient_list")]
    pub hr: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub finance: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub soft: Vec<String>,
}

impl SkillGroups {
    pub fn get(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Hr => &self.hr,
            SkillCategory::Finance => &self.finance,
            SkillCategory::Soft => &self.soft,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hr.is_empty() && self.finance.is_empty() && self.soft.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    #[serde(deserialize_with = "null_as_default")]
    pub hero: Hero,
    #[serde(deserialize_with = "null_as_default")]
    pub about: About,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: SkillGroups,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: Contact,
}
