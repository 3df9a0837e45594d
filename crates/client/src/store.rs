//! Credential storage: the single source of truth for "am I authenticated,
//! and as whom".
//!
//! The store is injected (`Arc<dyn CredentialStore>`) rather than reached
//! for as an ambient global, so the gateway stays testable without a real
//! storage backend. The user session (token + role) and the kiosk session
//! are independent slots; clearing either is idempotent.

use pointage_core::Role;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage seam for session credentials.
///
/// Storage operations never fail from the caller's point of view: a broken
/// backend degrades to "logged out" (reads return `None`), it does not error.
pub trait CredentialStore: Send + Sync {
    /// Persist the user token and role, overwriting any prior session.
    fn set_user_session(&self, token: &str, role: Role);

    /// Persist the kiosk device token, independent of the user session.
    fn set_kiosk_session(&self, token: &str);

    /// Remove the user token and role. No-op when already absent.
    fn clear_user_session(&self);

    /// Remove the kiosk token. No-op when already absent.
    fn clear_kiosk_session(&self);

    fn user_token(&self) -> Option<String>;

    fn kiosk_token(&self) -> Option<String>;

    fn current_role(&self) -> Option<Role>;
}

/// The three persisted keys, mirroring the browser-local storage layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(rename = "kioskToken", skip_serializing_if = "Option::is_none")]
    kiosk_token: Option<String>,
}

/// In-process store. Default for shells and tests.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<SessionData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn set_user_session(&self, token: &str, role: Role) {
        let mut data = self.data.lock().unwrap();
        data.token = Some(token.to_owned());
        data.role = Some(role);
    }

    fn set_kiosk_session(&self, token: &str) {
        self.data.lock().unwrap().kiosk_token = Some(token.to_owned());
    }

    fn clear_user_session(&self) {
        let mut data = self.data.lock().unwrap();
        data.token = None;
        data.role = None;
    }

    fn clear_kiosk_session(&self) {
        self.data.lock().unwrap().kiosk_token = None;
    }

    fn user_token(&self) -> Option<String> {
        self.data.lock().unwrap().token.clone()
    }

    fn kiosk_token(&self) -> Option<String> {
        self.data.lock().unwrap().kiosk_token.clone()
    }

    fn current_role(&self) -> Option<Role> {
        self.data.lock().unwrap().role
    }
}

/// JSON-file-backed store, the durable analog of browser-local storage.
///
/// Reads of a missing or corrupt file yield `None`; failed writes are logged
/// and swallowed. Both degrade to "logged out" rather than surfacing errors.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> SessionData {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), %e, "corrupt session file, treating as logged out");
                SessionData::default()
            }),
            Err(_) => SessionData::default(),
        }
    }

    fn save(&self, data: &SessionData) {
        let bytes = match serde_json::to_vec_pretty(data) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(%e, "failed to encode session data");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, bytes) {
            tracing::warn!(path = %self.path.display(), %e, "failed to write session file");
        }
    }

    fn update(&self, f: impl FnOnce(&mut SessionData)) {
        let mut data = self.load();
        f(&mut data);
        self.save(&data);
    }
}

impl CredentialStore for FileStore {
    fn set_user_session(&self, token: &str, role: Role) {
        self.update(|d| {
            d.token = Some(token.to_owned());
            d.role = Some(role);
        });
    }

    fn set_kiosk_session(&self, token: &str) {
        self.update(|d| d.kiosk_token = Some(token.to_owned()));
    }

    fn clear_user_session(&self) {
        self.update(|d| {
            d.token = None;
            d.role = None;
        });
    }

    fn clear_kiosk_session(&self) {
        self.update(|d| d.kiosk_token = None);
    }

    fn user_token(&self) -> Option<String> {
        self.load().token
    }

    fn kiosk_token(&self) -> Option<String> {
        self.load().kiosk_token
    }

    fn current_role(&self) -> Option<Role> {
        self.load().role
    }
}
