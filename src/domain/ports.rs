use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::model::EntityId;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// How a manager brings its local list back in line with the server after a
/// create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Re-fetch the whole collection.
    Reload,
    /// Append the created entity, or replace the updated one in place, from
    /// the mutation response.
    ApplyResponse,
}

/// One backend resource collection (`/skills`, `/projects`, ...).
pub trait Entity: Clone + DeserializeOwned + Send + Sync + 'static {
    type Form: EntityForm<Entity = Self>;

    /// Path segment under the API base URL.
    const RESOURCE: &'static str;
    /// Singular human-readable name used in notices.
    const LABEL: &'static str;
    const RECONCILE: Reconcile = Reconcile::Reload;

    fn id(&self) -> &EntityId;
}

pub trait EntityForm: Default + Clone + Validate + Send + Sync {
    type Entity;
    type Payload: Serialize + Send + Sync;

    fn from_entity(entity: &Self::Entity) -> Self;
    fn to_payload(&self) -> Self::Payload;

    /// Clear the draft after a successful submit or a cancel.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A form with a field that receives the URL of an uploaded file.
pub trait UploadTarget {
    const FIELD: &'static str;

    fn uploaded_url(&self) -> &str;
    fn set_uploaded_url(&mut self, url: String);
}

/// Persists the opaque session token between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Progress(u8),
    Success,
    Failure(String),
}

/// Transient status line naming an action and where it got to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub action: String,
    pub outcome: Outcome,
}

impl Notice {
    pub fn new(action: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            action: action.into(),
            outcome,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.outcome, Outcome::Success | Outcome::Failure(_))
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Interactive yes/no gate in front of destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Receives upload percentages in `[0, 100]`.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}
