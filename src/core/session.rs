use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::core::client::ApiClient;
use crate::domain::ports::TokenStore;
use crate::utils::error::{FolioError, Result};
use crate::utils::validation::validate_required;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token kept as JSON on disk, `~/.config/folio/token.json` unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = std::env::var("FOLIO_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME")
                .map_err(|_| FolioError::config("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("folio")
        };
        Ok(dir.join("token.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&content)?;
        tracing::debug!("Restored session token saved at {}", stored.saved_at);
        Ok(Some(stored.token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        // Mode only applies on creation, so an older file is replaced.
        self.clear()?;
        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
            .open(&self.path)?;
        file.write_all(serde_json::to_string_pretty(&stored)?.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// The token grants admin access; keep it readable by the owner only.
#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Session context handed to the HTTP client at construction. Holds the
/// opaque bearer token; its claims and expiry are never inspected here, the
/// backend is the only judge.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Session seeded from whatever the store holds.
    pub fn restore(store: Arc<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?;
        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            store,
        })
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.save(&token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.store.clear()
    }

    /// Admin gate: checked once before any management command runs.
    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(FolioError::NotAuthenticated)
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// `POST /auth/login` and store the returned token on the client's session.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<()> {
    validate_required("email", email)?;
    validate_required("password", password)?;

    let response: Option<LoginResponse> = client
        .post("auth/login", &LoginRequest { email, password })
        .await?;

    let token = response
        .and_then(|r| r.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FolioError::MissingField {
            field: "token".to_string(),
        })?;

    client.session().set_token(token)?;
    tracing::info!("Logged in as {}", email);
    Ok(())
}

pub fn logout(session: &Session) -> Result<()> {
    session.clear()?;
    tracing::info!("Session cleared");
    Ok(())
}
