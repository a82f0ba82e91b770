//! Transient drafts edited by the entity managers. A form is built empty for
//! create, pre-populated from an entity for edit, validated locally and then
//! turned into the wire payload.

use serde::Serialize;

use crate::domain::model::{Certification, Experience, Project, Skill, SkillCategory};
use crate::domain::ports::{EntityForm, UploadTarget};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required, Validate};

/// Split the comma-joined technologies input. Each element is trimmed,
/// empty segments are dropped and order is preserved.
pub fn split_technologies(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_technologies(technologies: &[String]) -> String {
    technologies.join(", ")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillForm {
    pub name: String,
    pub category: SkillCategory,
}

impl Validate for SkillForm {
    fn validate(&self) -> Result<()> {
        validate_required("name", &self.name)
    }
}

impl EntityForm for SkillForm {
    type Entity = Skill;
    type Payload = SkillForm;

    fn from_entity(entity: &Skill) -> Self {
        Self {
            name: entity.name.clone(),
            category: entity.category,
        }
    }

    fn to_payload(&self) -> Self::Payload {
        self.clone()
    }

    /// The category sticks between consecutive additions.
    fn reset(&mut self) {
        self.name.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceForm {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

impl Validate for ExperienceForm {
    fn validate(&self) -> Result<()> {
        validate_required("role", &self.role)?;
        validate_required("company", &self.company)?;
        validate_required("duration", &self.duration)?;
        validate_required("description", &self.description)
    }
}

impl EntityForm for ExperienceForm {
    type Entity = Experience;
    type Payload = ExperienceForm;

    fn from_entity(entity: &Experience) -> Self {
        Self {
            role: entity.role.clone(),
            company: entity.company.clone(),
            duration: entity.duration.clone(),
            description: entity.description.clone(),
        }
    }

    fn to_payload(&self) -> Self::Payload {
        self.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    /// Comma-joined, as typed.
    pub technologies: String,
    pub description: String,
    pub link: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub technologies: Vec<String>,
}

impl Validate for ProjectForm {
    fn validate(&self) -> Result<()> {
        validate_required("title", &self.title)?;
        validate_required("technologies", &self.technologies)?;
        validate_required("description", &self.description)
    }
}

impl EntityForm for ProjectForm {
    type Entity = Project;
    type Payload = ProjectPayload;

    fn from_entity(entity: &Project) -> Self {
        Self {
            title: entity.title.clone(),
            technologies: join_technologies(&entity.technologies),
            description: entity.description.clone(),
            link: entity.link.clone().unwrap_or_default(),
            image: entity.image.clone().unwrap_or_default(),
        }
    }

    fn to_payload(&self) -> ProjectPayload {
        ProjectPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            image: self.image.clone(),
            technologies: split_technologies(&self.technologies),
        }
    }
}

impl UploadTarget for ProjectForm {
    const FIELD: &'static str = "image";

    fn uploaded_url(&self) -> &str {
        &self.image
    }

    fn set_uploaded_url(&mut self, url: String) {
        self.image = url;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CertificationForm {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: String,
}

impl Validate for CertificationForm {
    fn validate(&self) -> Result<()> {
        validate_required("name", &self.name)?;
        validate_required("issuer", &self.issuer)?;
        validate_required("date", &self.date)
    }
}

impl EntityForm for CertificationForm {
    type Entity = Certification;
    type Payload = CertificationForm;

    fn from_entity(entity: &Certification) -> Self {
        Self {
            name: entity.name.clone(),
            issuer: entity.issuer.clone(),
            date: entity.date.clone(),
            link: entity.link.clone().unwrap_or_default(),
        }
    }

    fn to_payload(&self) -> Self::Payload {
        self.clone()
    }
}

impl UploadTarget for CertificationForm {
    const FIELD: &'static str = "link";

    fn uploaded_url(&self) -> &str {
        &self.link
    }

    fn set_uploaded_url(&mut self, url: String) {
        self.link = url;
    }
}
