pub mod client;
pub mod manager;
pub mod notify;
pub mod portfolio;
pub mod profile;
pub mod session;
pub mod upload;

pub use crate::domain::model::{Certification, Experience, Portfolio, Profile, Project, Skill};
pub use crate::domain::ports::{Confirm, Entity, EntityForm, Notifier, ProgressObserver, TokenStore};
pub use crate::utils::error::Result;
