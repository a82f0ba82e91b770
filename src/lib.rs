#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AppConfig;
pub use crate::core::{
    client::ApiClient,
    manager::{EntityManager, ManagerState},
    portfolio::{fetch_portfolio, render_text},
    profile::{ProfileEditor, ProfileField},
    session::{FileTokenStore, MemoryTokenStore, Session},
    upload::{UploadFile, UploadSlot, Uploader},
};
pub use utils::error::{FolioError, Result};
