use serde::de::IgnoredAny;
use std::sync::Arc;

use crate::core::client::ApiClient;
use crate::core::upload::{UploadFile, UploadSlot, Uploader};
use crate::domain::model::{EntityId, Skill, SkillCategory};
use crate::domain::ports::{
    Confirm, Entity, EntityForm, Notice, Notifier, Outcome, ProgressObserver, Reconcile,
    UploadTarget,
};
use crate::utils::error::{FolioError, Result};
use crate::utils::validation::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerState {
    /// List shown, form empty.
    Idle,
    Creating,
    Editing(EntityId),
}

/// CRUD lifecycle for one backend collection. Local items are a transient
/// copy: `load` always replaces them wholesale and list order is whatever
/// the backend returned.
pub struct EntityManager<E: Entity> {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    uploader: Uploader,
    uploads: UploadSlot,
    items: Vec<E>,
    state: ManagerState,
    draft: E::Form,
}

impl<E: Entity> EntityManager<E> {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            uploader: Uploader::new(client.clone()),
            client,
            notifier,
            uploads: UploadSlot::default(),
            items: Vec::new(),
            state: ManagerState::Idle,
            draft: E::Form::default(),
        }
    }

    pub fn with_uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    pub fn draft(&self) -> &E::Form {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut E::Form {
        &mut self.draft
    }

    fn notify(&self, action: impl Into<String>, outcome: Outcome) {
        self.notifier.notify(Notice::new(action, outcome));
    }

    fn item_path(id: &EntityId) -> String {
        format!("{}/{}", E::RESOURCE, id)
    }

    /// Fetch the full collection and replace local state with it.
    pub async fn load(&mut self) -> Result<&[E]> {
        match self.client.get::<Vec<E>>(E::RESOURCE).await {
            Ok(items) => {
                tracing::debug!("Loaded {} {} record(s)", items.len(), E::RESOURCE);
                self.items = items;
                Ok(&self.items)
            }
            Err(e) => {
                self.notify(
                    format!("Failed to load {}", E::RESOURCE),
                    Outcome::Failure(e.user_friendly_message()),
                );
                Err(e)
            }
        }
    }

    pub fn begin_create(&mut self) -> &mut E::Form {
        self.state = ManagerState::Creating;
        self.draft.reset();
        &mut self.draft
    }

    /// Pre-populate the draft from the entity's current fields.
    pub fn begin_edit(&mut self, id: &EntityId) -> Result<&mut E::Form> {
        let draft = match self.get(id) {
            Some(entity) => E::Form::from_entity(entity),
            None => {
                return Err(FolioError::NotFound {
                    resource: E::LABEL.to_string(),
                    id: id.to_string(),
                })
            }
        };
        self.draft = draft;
        self.state = ManagerState::Editing(id.clone());
        Ok(&mut self.draft)
    }

    /// Back to Idle without touching the server.
    pub fn cancel(&mut self) {
        self.state = ManagerState::Idle;
        self.draft.reset();
    }

    /// Submit the current draft: update when editing, create otherwise.
    /// Required fields are checked before anything goes over the wire. On
    /// failure, state and draft stay exactly as they were.
    pub async fn submit(&mut self) -> Result<()> {
        self.draft.validate()?;

        let editing = match &self.state {
            ManagerState::Editing(id) => Some(id.clone()),
            _ => None,
        };
        let (pending, done) = match editing {
            Some(_) => (format!("Updating {}", E::LABEL), format!("Updated {}", E::LABEL)),
            None => (format!("Adding {}", E::LABEL), format!("Added {}", E::LABEL)),
        };
        self.notify(pending, Outcome::Pending);

        let payload = self.draft.to_payload();
        let result = match &editing {
            Some(id) => self.update(id, &payload).await,
            None => self.create(&payload).await,
        };

        match result {
            Ok(()) => {
                self.state = ManagerState::Idle;
                self.draft.reset();
                self.notify(done, Outcome::Success);
                Ok(())
            }
            Err(e) => {
                self.notify(
                    format!("Failed to save {}", E::LABEL),
                    Outcome::Failure(e.user_friendly_message()),
                );
                Err(e)
            }
        }
    }

    /// Replace the draft with `form`, then submit it.
    pub async fn submit_with(&mut self, form: E::Form) -> Result<()> {
        self.draft = form;
        self.submit().await
    }

    async fn create(&mut self, payload: &<E::Form as EntityForm>::Payload) -> Result<()> {
        match E::RECONCILE {
            Reconcile::Reload => {
                self.client.post::<_, IgnoredAny>(E::RESOURCE, payload).await?;
                self.reload_after_mutation().await;
            }
            Reconcile::ApplyResponse => match self.client.post::<_, E>(E::RESOURCE, payload).await? {
                Some(created) => self.items.push(created),
                None => self.reload_after_mutation().await,
            },
        }
        Ok(())
    }

    async fn update(
        &mut self,
        id: &EntityId,
        payload: &<E::Form as EntityForm>::Payload,
    ) -> Result<()> {
        let path = Self::item_path(id);
        match E::RECONCILE {
            Reconcile::Reload => {
                self.client.put::<_, IgnoredAny>(&path, payload).await?;
                self.reload_after_mutation().await;
            }
            Reconcile::ApplyResponse => match self.client.put::<_, E>(&path, payload).await? {
                Some(updated) => {
                    if let Some(slot) = self.items.iter_mut().find(|e| e.id() == id) {
                        *slot = updated;
                    }
                }
                None => self.reload_after_mutation().await,
            },
        }
        Ok(())
    }

    /// The mutation already landed; a failed follow-up reload is reported
    /// but does not undo it.
    async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!("Reload of {} after mutation failed: {}", E::RESOURCE, e);
        }
    }

    /// Delete after confirmation, then drop the id from local state without
    /// reloading.
    pub async fn delete(&mut self, id: &EntityId, confirm: &dyn Confirm) -> Result<()> {
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", E::LABEL)) {
            return Err(FolioError::Cancelled {
                action: format!("Delete {}", E::LABEL),
            });
        }

        self.notify(format!("Deleting {}", E::LABEL), Outcome::Pending);
        match self.client.delete(&Self::item_path(id)).await {
            Ok(()) => {
                self.items.retain(|e| e.id() != id);
                if self.state == ManagerState::Editing(id.clone()) {
                    self.cancel();
                }
                self.notify(format!("Deleted {}", E::LABEL), Outcome::Success);
                Ok(())
            }
            Err(e) => {
                self.notify(
                    format!("Failed to delete {}", E::LABEL),
                    Outcome::Failure(e.user_friendly_message()),
                );
                Err(e)
            }
        }
    }
}

impl<E> EntityManager<E>
where
    E: Entity,
    E::Form: UploadTarget,
{
    pub fn upload_slot(&self) -> &UploadSlot {
        &self.uploads
    }

    /// Upload a file and return its URL. Rejected with `UploadInProgress`
    /// while another upload from this manager is pending.
    pub async fn upload(
        &self,
        file: UploadFile,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<String> {
        self.uploader
            .upload_tracked(&self.uploads, file, self.notifier.clone(), observer)
            .await
    }

    /// Upload and store the URL on the draft's file field. On failure the
    /// previous value is left in place.
    pub async fn upload_into_draft(
        &mut self,
        file: UploadFile,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<String> {
        let url = self.upload(file, observer).await?;
        tracing::debug!("Stored upload on {} draft field {}", E::LABEL, <E::Form as UploadTarget>::FIELD);
        self.draft.set_uploaded_url(url.clone());
        Ok(url)
    }
}

impl EntityManager<Skill> {
    /// Client-side filter, preserving server order.
    pub fn by_category(&self, category: SkillCategory) -> Vec<&Skill> {
        self.items.iter().filter(|s| s.category == category).collect()
    }

    pub fn grouped(&self) -> Vec<(SkillCategory, Vec<&Skill>)> {
        SkillCategory::ALL
            .iter()
            .map(|&category| (category, self.by_category(category)))
            .collect()
    }
}
