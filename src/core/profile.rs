use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::client::ApiClient;
use crate::core::upload::{UploadFile, UploadSlot, Uploader};
use crate::domain::model::Profile;
use crate::domain::ports::{Confirm, Notice, Notifier, Outcome, ProgressObserver};
use crate::utils::error::{FolioError, Result};

/// Addressable profile field, written as a dotted path such as
/// `hero.resumeLink` or `about.education.gpa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    HeroTitle,
    HeroSubtitle,
    HeroDescription,
    HeroCta,
    HeroResumeLink,
    AboutTitle,
    AboutDescription,
    AboutImage,
    EducationDegree,
    EducationMajor,
    EducationInstitution,
    EducationYear,
    EducationGpa,
    ContactEmail,
    ContactPhone,
    ContactLinkedin,
    ContactLocation,
}

impl ProfileField {
    pub const ALL: [ProfileField; 17] = [
        Self::HeroTitle,
        Self::HeroSubtitle,
        Self::HeroDescription,
        Self::HeroCta,
        Self::HeroResumeLink,
        Self::AboutTitle,
        Self::AboutDescription,
        Self::AboutImage,
        Self::EducationDegree,
        Self::EducationMajor,
        Self::EducationInstitution,
        Self::EducationYear,
        Self::EducationGpa,
        Self::ContactEmail,
        Self::ContactPhone,
        Self::ContactLinkedin,
        Self::ContactLocation,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::HeroTitle => "hero.title",
            Self::HeroSubtitle => "hero.subtitle",
            Self::HeroDescription => "hero.description",
            Self::HeroCta => "hero.cta",
            Self::HeroResumeLink => "hero.resumeLink",
            Self::AboutTitle => "about.title",
            Self::AboutDescription => "about.description",
            Self::AboutImage => "about.image",
            Self::EducationDegree => "about.education.degree",
            Self::EducationMajor => "about.education.major",
            Self::EducationInstitution => "about.education.institution",
            Self::EducationYear => "about.education.year",
            Self::EducationGpa => "about.education.gpa",
            Self::ContactEmail => "contact.email",
            Self::ContactPhone => "contact.phone",
            Self::ContactLinkedin => "contact.linkedin",
            Self::ContactLocation => "contact.location",
        }
    }

    /// Fields that hold the URL of an uploaded file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::HeroResumeLink | Self::AboutImage)
    }

    pub fn value<'a>(&self, profile: &'a Profile) -> &'a str {
        match self {
            Self::HeroTitle => &profile.hero.title,
            Self::HeroSubtitle => &profile.hero.subtitle,
            Self::HeroDescription => &profile.hero.description,
            Self::HeroCta => &profile.hero.cta,
            Self::HeroResumeLink => &profile.hero.resume_link,
            Self::AboutTitle => &profile.about.title,
            Self::AboutDescription => &profile.about.description,
            Self::AboutImage => &profile.about.image,
            Self::EducationDegree => &profile.about.education.degree,
            Self::EducationMajor => &profile.about.education.major,
            Self::EducationInstitution => &profile.about.education.institution,
            Self::EducationYear => &profile.about.education.year,
            Self::EducationGpa => &profile.about.education.gpa,
            Self::ContactEmail => &profile.contact.email,
            Self::ContactPhone => &profile.contact.phone,
            Self::ContactLinkedin => &profile.contact.linkedin,
            Self::ContactLocation => &profile.contact.location,
        }
    }

    fn slot<'a>(&self, profile: &'a mut Profile) -> &'a mut String {
        match self {
            Self::HeroTitle => &mut profile.hero.title,
            Self::HeroSubtitle => &mut profile.hero.subtitle,
            Self::HeroDescription => &mut profile.hero.description,
            Self::HeroCta => &mut profile.hero.cta,
            Self::HeroResumeLink => &mut profile.hero.resume_link,
            Self::AboutTitle => &mut profile.about.title,
            Self::AboutDescription => &mut profile.about.description,
            Self::AboutImage => &mut profile.about.image,
            Self::EducationDegree => &mut profile.about.education.degree,
            Self::EducationMajor => &mut profile.about.education.major,
            Self::EducationInstitution => &mut profile.about.education.institution,
            Self::EducationYear => &mut profile.about.education.year,
            Self::EducationGpa => &mut profile.about.education.gpa,
            Self::ContactEmail => &mut profile.contact.email,
            Self::ContactPhone => &mut profile.contact.phone,
            Self::ContactLinkedin => &mut profile.contact.linkedin,
            Self::ContactLocation => &mut profile.contact.location,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ProfileField {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('_', "").to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.path().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                FolioError::validation("field", format!("unknown profile field '{}'", s))
            })
    }
}

/// Editor for the singleton profile document.
pub struct ProfileEditor {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    uploader: Uploader,
    uploads: UploadSlot,
    profile: Profile,
}

impl ProfileEditor {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            uploader: Uploader::new(client.clone()),
            client,
            notifier,
            uploads: UploadSlot::default(),
            profile: Profile::default(),
        }
    }

    pub fn with_uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// `GET /profile`. Missing sections and fields fall back to empty
    /// values; on failure the current values are kept.
    pub async fn load(&mut self) -> Result<&Profile> {
        match self.client.get::<Profile>("profile").await {
            Ok(profile) => {
                self.profile = profile;
                Ok(&self.profile)
            }
            Err(e) => {
                self.notifier.notify(Notice::new(
                    "Failed to load profile",
                    Outcome::Failure(e.user_friendly_message()),
                ));
                Err(e)
            }
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        *field.slot(&mut self.profile) = value.into();
    }

    pub async fn upload(
        &self,
        field: ProfileField,
        file: UploadFile,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<String> {
        if !field.is_file() {
            return Err(FolioError::validation(
                field.path(),
                "only hero.resumeLink and about.image accept uploads",
            ));
        }
        self.uploader
            .upload_tracked(&self.uploads, file, self.notifier.clone(), observer)
            .await
    }

    /// Upload and store the resulting URL on `field`. The field keeps its
    /// previous value if the upload fails.
    pub async fn upload_into(
        &mut self,
        field: ProfileField,
        file: UploadFile,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<String> {
        let url = self.upload(field, file, observer).await?;
        self.set_field(field, url.clone());
        Ok(url)
    }

    /// Clear a file field locally after confirmation. Takes effect on the
    /// server with the next `save`.
    pub fn remove_file(&mut self, field: ProfileField, confirm: &dyn Confirm) -> Result<()> {
        if !field.is_file() {
            return Err(FolioError::validation(field.path(), "not a file field"));
        }
        if !confirm.confirm("Are you sure you want to remove this file?") {
            return Err(FolioError::Cancelled {
                action: "Remove file".to_string(),
            });
        }
        self.set_field(field, String::new());
        self.notifier
            .notify(Notice::new("File removed", Outcome::Success));
        Ok(())
    }

    /// `PUT /profile` with the hero, about and contact sections.
    pub async fn save(&self) -> Result<()> {
        self.notifier
            .notify(Notice::new("Saving profile", Outcome::Pending));
        match self
            .client
            .put::<_, serde::de::IgnoredAny>("profile", &self.profile)
            .await
        {
            Ok(_) => {
                self.notifier
                    .notify(Notice::new("Profile updated", Outcome::Success));
                Ok(())
            }
            Err(e) => {
                let reason = e.server_message().unwrap_or("check the logs").to_string();
                tracing::error!("Profile update error: {}", e);
                self.notifier
                    .notify(Notice::new("Update failed", Outcome::Failure(reason)));
                Err(e)
            }
        }
    }
}
