/*
[INPUT]:  Credential snapshots and a storage location
[OUTPUT]: Durable credential survives process restarts
[POS]:    Auth layer - credential persistence backends
[UPDATE]: When the on-disk layout or storage backend changes
*/

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Credential;
use crate::http::Result;

/// Durable storage for the session credential.
pub trait CredentialPersistence: Send + Sync + Debug {
    /// Load the stored credential; a missing record is the unauthenticated state.
    fn load(&self) -> Result<Credential>;

    /// Overwrite the stored credential.
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// On-disk layout: the two preference keys `token` and `user_id`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(default)]
    token: String,
    #[serde(default)]
    user_id: i64,
}

/// Stores the credential as a small JSON file with owner-only permissions.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "credential".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CredentialPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Credential> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored credential");
            return Ok(Credential::unauthenticated());
        }
        let content = fs::read(&self.path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Credential::unauthenticated());
        }
        // an unreadable record is a signed-out session, not a fatal error
        let stored: StoredCredential = match serde_json::from_slice(&content) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "malformed credential file, starting signed out"
                );
                return Ok(Credential::unauthenticated());
            }
        };
        Ok(Credential {
            token: stored.token,
            user_id: stored.user_id,
        }
        .normalized())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredCredential {
            token: credential.token.clone(),
            user_id: credential.user_id,
        };
        let encoded = serde_json::to_vec_pretty(&stored)?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, encoded)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&temp_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms)?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory persistence for tests and throwaway sessions.
///
/// Clones share the same slot, so a test can keep one handle and inspect
/// what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Arc<Mutex<Credential>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Arc::new(Mutex::new(credential)),
        }
    }

    /// Last credential written.
    pub fn stored(&self) -> Credential {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialPersistence for MemoryPersistence {
    fn load(&self) -> Result<Credential> {
        Ok(self.stored().normalized())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = credential.clone();
        Ok(())
    }
}

/// Loads signed out and refuses every save, like a full or read-only disk.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct FailingPersistence;

#[cfg(test)]
impl CredentialPersistence for FailingPersistence {
    fn load(&self) -> Result<Credential> {
        Ok(Credential::unauthenticated())
    }

    fn save(&self, _credential: &Credential) -> Result<()> {
        Err(std::io::Error::other("disk full").into())
    }
}
