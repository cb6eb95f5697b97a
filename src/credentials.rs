//! Short-lived encrypted cache of the two portal logins.
//!
//! The cache and its key sit side by side in the user's config directory, so this only keeps
//! the passwords out of plain sight; anyone who can read one file can read the other.

use aes_gcm::aead::{Aead, OsRng, rand_core::RngCore};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::credentials::StoredCredentials;

pub const CACHE_FILE: &str = ".parking_creds";
pub const KEY_FILE: &str = ".parking_key";
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

pub fn cache_ttl() -> Duration {
    Duration::hours(5)
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encryption failed")]
    Encrypt,

    #[error("no credentials entered")]
    Empty,

    #[error("no config directory; pass --config-dir or set PARKING_CONFIG_DIR")]
    NoConfigDir,
}

#[derive(Serialize, Deserialize)]
struct CachePayload {
    credentials: StoredCredentials,
    timestamp: i64,
}

pub struct CredentialStore {
    cache_path: PathBuf,
    cipher: Aes256Gcm,
}

impl CredentialStore {
    /// Opens the store in `dir`, creating the directory and key file on first use.
    pub fn open(dir: &Path) -> Result<Self, CredentialError> {
        fs::create_dir_all(dir)?;
        let key = load_or_create_key(&dir.join(KEY_FILE))?;
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CredentialError::Encrypt)?;
        Ok(CredentialStore {
            cache_path: dir.join(CACHE_FILE),
            cipher,
        })
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn save(&self, creds: &StoredCredentials) -> Result<(), CredentialError> {
        self.save_at(creds, Utc::now())
    }

    pub fn save_at(
        &self,
        creds: &StoredCredentials,
        now: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        let payload = CachePayload {
            credentials: creds.clone(),
            timestamp: now.timestamp(),
        };
        let plaintext = serde_json::to_vec(&payload)?;

        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);
        let encrypted = self
            .cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_slice())
            .map_err(|_| CredentialError::Encrypt)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + encrypted.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&encrypted);
        fs::write(&self.cache_path, B64.encode(blob))?;
        debug!("credentials cached at {}", self.cache_path.display());
        Ok(())
    }

    /// Cached credentials, or `None` if absent, unreadable or expired.
    pub fn load(&self) -> Option<StoredCredentials> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Option<StoredCredentials> {
        let raw = fs::read_to_string(&self.cache_path).ok()?;
        let payload = match self.decrypt(&raw) {
            Some(payload) => payload,
            None => {
                warn!("credential cache is unreadable, ignoring it");
                return None;
            }
        };

        if now.timestamp() - payload.timestamp > cache_ttl().num_seconds() {
            info!("cached credentials expired");
            self.clear();
            return None;
        }
        Some(payload.credentials)
    }

    pub fn clear(&self) {
        remove_cache(&self.cache_path);
    }

    fn decrypt(&self, raw: &str) -> Option<CachePayload> {
        let blob = B64.decode(raw.trim()).ok()?;
        if blob.len() <= NONCE_LEN {
            return None;
        }
        let (iv, data) = blob.split_at(NONCE_LEN);
        let plaintext = self.cipher.decrypt(Nonce::from_slice(iv), data).ok()?;
        serde_json::from_slice(&plaintext).ok()
    }
}

fn remove_cache(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("failed to remove credential cache: {}", e);
        }
    }
}

fn load_or_create_key(path: &Path) -> Result<Vec<u8>, CredentialError> {
    if let Ok(raw) = fs::read_to_string(path) {
        match B64.decode(raw.trim()) {
            Ok(key) if key.len() == KEY_LEN => return Ok(key),
            _ => warn!("key file {} is invalid, generating a new one", path.display()),
        }
    }

    let mut key = vec![0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    fs::write(path, B64.encode(&key))?;
    Ok(key)
}

/// All four values from the environment, if every one is set.
pub fn from_env() -> Option<StoredCredentials> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    Some(StoredCredentials {
        t2_username: var("T2_USERNAME")?,
        t2_password: var("T2_PASSWORD")?,
        offstreet_email: var("OFFSTREET_EMAIL")?,
        offstreet_password: var("OFFSTREET_PASSWORD")?,
    })
}

/// Asks the operator on the terminal. Passwords are read without echo.
pub fn prompt() -> Result<StoredCredentials, CredentialError> {
    let creds = StoredCredentials {
        t2_username: ask("T2 username: ")?,
        t2_password: ask_secret("T2 password: ")?,
        offstreet_email: ask("Offstreet e-mail: ")?,
        offstreet_password: ask_secret("Offstreet password: ")?,
    };
    if creds.t2_username.is_empty() || creds.offstreet_email.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(creds)
}

fn ask(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_secret(label: &str) -> io::Result<String> {
    rpassword::prompt_password(label)
}

/// `env` first, then the cache in `dir`, then the terminal. Fresh answers are cached.
///
/// The cache directory is only required, and the key file only created, when `env` is `None`.
pub fn resolve(
    env: Option<StoredCredentials>,
    dir: Option<&Path>,
    clear: bool,
) -> Result<StoredCredentials, CredentialError> {
    if clear {
        if let Some(dir) = dir {
            info!("clearing cached credentials");
            remove_cache(&dir.join(CACHE_FILE));
        }
    }
    if let Some(creds) = env {
        debug!("using credentials from the environment");
        return Ok(creds);
    }

    let store = CredentialStore::open(dir.ok_or(CredentialError::NoConfigDir)?)?;
    if let Some(creds) = store.load() {
        info!("using cached credentials");
        return Ok(creds);
    }

    let creds = prompt()?;
    store.save(&creds)?;
    Ok(creds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredCredentials {
        StoredCredentials {
            t2_username: "parker".into(),
            t2_password: "hunter2".into(),
            offstreet_email: "parker@example.edu".into(),
            offstreet_password: "swordfish".into(),
        }
    }

    #[test]
    fn round_trips_and_stays_encrypted() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        store.save(&sample()).unwrap();

        let on_disk = fs::read_to_string(store.cache_path()).unwrap();
        assert!(!on_disk.contains("hunter2"));
        assert!(dir.path().join(KEY_FILE).exists());

        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn key_file_is_reused_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        CredentialStore::open(dir.path())
            .unwrap()
            .save(&sample())
            .unwrap();

        let reopened = CredentialStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load(), Some(sample()));
    }

    #[test]
    fn expires_after_five_hours() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        let saved_at = Utc::now();
        store.save_at(&sample(), saved_at).unwrap();

        let later = saved_at + Duration::hours(4) + Duration::minutes(59);
        assert!(store.load_at(later).is_some());

        let expired = saved_at + Duration::hours(5) + Duration::seconds(1);
        assert!(store.load_at(expired).is_none());
        assert!(!store.cache_path().exists());
    }

    #[test]
    fn corrupt_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        fs::write(store.cache_path(), "not even base64 !!").unwrap();
        assert!(store.load().is_none());

        fs::write(store.cache_path(), B64.encode([0u8; 40])).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn replaced_key_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        CredentialStore::open(dir.path())
            .unwrap()
            .save(&sample())
            .unwrap();
        fs::write(dir.path().join(KEY_FILE), "garbage").unwrap();

        let store = CredentialStore::open(dir.path()).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn environment_needs_no_config_dir() {
        assert_eq!(resolve(Some(sample()), None, true).unwrap(), sample());

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(Some(sample()), Some(dir.path()), false).unwrap(), sample());
        assert!(!dir.path().join(KEY_FILE).exists());
    }

    #[test]
    fn cache_is_used_when_environment_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        CredentialStore::open(dir.path())
            .unwrap()
            .save(&sample())
            .unwrap();
        assert_eq!(resolve(None, Some(dir.path()), false).unwrap(), sample());
    }

    #[test]
    fn clear_flag_removes_cache_without_touching_key() {
        let dir = tempfile::tempdir().unwrap();
        CredentialStore::open(dir.path())
            .unwrap()
            .save(&sample())
            .unwrap();
        resolve(Some(sample()), Some(dir.path()), true).unwrap();
        assert!(!dir.path().join(CACHE_FILE).exists());
        assert!(dir.path().join(KEY_FILE).exists());
    }

    #[test]
    fn missing_dir_without_environment_is_an_error() {
        assert!(matches!(
            resolve(None, None, false),
            Err(CredentialError::NoConfigDir)
        ));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        store.clear();
        store.save(&sample()).unwrap();
        store.clear();
        assert!(store.load().is_none());
    }
}
