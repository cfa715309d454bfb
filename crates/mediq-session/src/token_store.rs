use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

const DEFAULT_KEYRING_SERVICE: &str = "mediq-cli";

/// One stored secret: its keyring user, env override, and file under `~/.mediq`.
struct Slot {
    keyring_user: &'static str,
    env: &'static str,
    file_name: &'static str,
}

const SESSION: Slot = Slot {
    keyring_user: "session-token",
    env: "MEDIQ_SESSION__TOKEN",
    file_name: "credentials",
};

const REFRESH: Slot = Slot {
    keyring_user: "refresh-token",
    env: "MEDIQ_SESSION__REFRESH_TOKEN",
    file_name: "refresh",
};

/// Where a stored token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// Keyring service name. Override with `MEDIQ_KEYRING_SERVICE` in tests.
fn keyring_service() -> String {
    std::env::var("MEDIQ_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Store a session token in the OS keychain. Falls back to file if keyring unavailable.
///
/// # Errors
///
/// Returns `SessionError::TokenStore` if both keyring and file storage fail.
pub fn store(token: &str) -> Result<(), SessionError> {
    store_slot(&SESSION, token)
}

/// Load a session token. Priority: keyring → `MEDIQ_SESSION__TOKEN` env → `~/.mediq/credentials`.
#[must_use]
pub fn load() -> Option<String> {
    load_slot(&SESSION)
}

/// Store the refresh token next to the session token.
///
/// # Errors
///
/// Returns `SessionError::TokenStore` if both keyring and file storage fail.
pub fn store_refresh(token: &str) -> Result<(), SessionError> {
    store_slot(&REFRESH, token)
}

/// Load the refresh token. Priority: keyring → `MEDIQ_SESSION__REFRESH_TOKEN` env → `~/.mediq/refresh`.
#[must_use]
pub fn load_refresh() -> Option<String> {
    load_slot(&REFRESH)
}

/// Delete stored session and refresh tokens from keyring and file.
///
/// # Errors
///
/// Returns `SessionError::TokenStore` if a credentials file cannot be removed.
pub fn delete() -> Result<(), SessionError> {
    delete_slot(&SESSION)?;
    delete_slot(&REFRESH)
}

/// Which tier the current session token comes from (for status display).
#[must_use]
pub fn detect_token_source() -> Option<TokenSource> {
    if load_keyring(&SESSION).is_some() {
        return Some(TokenSource::Keyring);
    }
    if load_env(&SESSION).is_some() {
        return Some(TokenSource::Env);
    }
    let path = slot_path(&SESSION).ok()?;
    load_file(&path).map(|_| TokenSource::File)
}

fn store_slot(slot: &Slot, token: &str) -> Result<(), SessionError> {
    match keyring::Entry::new(&keyring_service(), slot.keyring_user) {
        Ok(entry) => match entry.set_password(token) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, user = slot.keyring_user, "keyring store failed; falling back to file");
                store_file(&slot_path(slot)?, token)
            }
        },
        Err(error) => {
            tracing::warn!(%error, user = slot.keyring_user, "keyring unavailable; falling back to file");
            store_file(&slot_path(slot)?, token)
        }
    }
}

fn load_slot(slot: &Slot) -> Option<String> {
    if let Some(token) = load_keyring(slot) {
        return Some(token);
    }

    if let Some(token) = load_env(slot) {
        return Some(token);
    }

    load_file(&slot_path(slot).ok()?)
}

fn delete_slot(slot: &Slot) -> Result<(), SessionError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), slot.keyring_user) {
        let _ = entry.delete_credential();
    }
    delete_file(&slot_path(slot)?)
}

fn load_keyring(slot: &Slot) -> Option<String> {
    let entry = keyring::Entry::new(&keyring_service(), slot.keyring_user).ok()?;
    entry.get_password().ok().filter(|t| !t.is_empty())
}

fn load_env(slot: &Slot) -> Option<String> {
    std::env::var(slot.env).ok().filter(|t| !t.is_empty())
}

// --- Private file helpers ---

fn slot_path(slot: &Slot) -> Result<PathBuf, SessionError> {
    dirs::home_dir()
        .map(|h| h.join(".mediq").join(slot.file_name))
        .ok_or_else(|| {
            SessionError::TokenStore("home directory not found, cannot store credentials".into())
        })
}

fn store_file(path: &Path, token: &str) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SessionError::TokenStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, token)
        .map_err(|e| SessionError::TokenStore(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| SessionError::TokenStore(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn delete_file(path: &Path) -> Result<(), SessionError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            SessionError::TokenStore(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}
