/*
[INPUT]:  Outcomes reported by finished API tasks
[OUTPUT]: Current credential snapshot, change notifications, durable copy
[POS]:    Auth layer - single source of truth for the session credential
[UPDATE]: When credential mutation rules or persistence strategy change
*/

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{Credential, CredentialPersistence, MemoryPersistence, Outcome};
use crate::http::Result;

/// Thread-safe credential store.
///
/// Reads are plain snapshots. Mutations update the in-memory pair in one
/// step, broadcast it to subscribers, then persist it. Clones share state.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    current: watch::Sender<Credential>,
    persistence: Box<dyn CredentialPersistence>,
    // held across update + persist so the durable copy matches the last write
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Seed the store from durable storage.
    pub fn load(persistence: impl CredentialPersistence + 'static) -> Result<Self> {
        let credential = persistence.load()?;
        info!(
            authenticated = credential.is_authenticated(),
            user_id = credential.user_id,
            "credential store loaded"
        );
        Ok(Self::with_credential(persistence, credential))
    }

    /// Store backed by memory only, starting unauthenticated.
    pub fn in_memory() -> Self {
        Self::with_credential(MemoryPersistence::new(), Credential::unauthenticated())
    }

    fn with_credential(
        persistence: impl CredentialPersistence + 'static,
        credential: Credential,
    ) -> Self {
        let (current, _) = watch::channel(credential.normalized());
        Self {
            inner: Arc::new(StoreInner {
                current,
                persistence: Box::new(persistence),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Current credential snapshot.
    pub fn read(&self) -> Credential {
        self.inner.current.borrow().clone()
    }

    /// Watch every credential change, e.g. to drop cached data on logout.
    pub fn subscribe(&self) -> watch::Receiver<Credential> {
        self.inner.current.subscribe()
    }

    /// Overwrite both fields (fresh login).
    pub fn replace(&self, token: impl Into<String>, user_id: i64) -> Result<()> {
        let next = Credential::new(token, user_id);
        self.write(|current| *current = next)
    }

    /// Overwrite the token only.
    ///
    /// An empty token means the server did not rotate it. A token arriving
    /// while unauthenticated is ignored, since there is no user id to pair it
    /// with.
    pub fn renew(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.is_empty() {
            return Ok(());
        }
        if !self.read().is_authenticated() {
            debug!("ignoring rotated token while unauthenticated");
            return Ok(());
        }
        self.write(|current| {
            if current.is_authenticated() {
                current.token = token;
            }
        })
    }

    /// Reset to the unauthenticated state.
    pub fn clear(&self) -> Result<()> {
        self.write(|current| *current = Credential::unauthenticated())
    }

    /// Apply a task's [`Outcome`].
    pub fn apply(&self, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::LoginSuccessful { user_id, token } => {
                info!(user_id, "login successful");
                self.replace(token.clone(), *user_id)
            }
            Outcome::RenewSuccessful { token } => self.renew(token.clone()),
            Outcome::ClearCredential => {
                info!("session invalidated, clearing credential");
                self.clear()
            }
            Outcome::NoOp => Ok(()),
        }
    }

    fn write(&self, update: impl FnOnce(&mut Credential)) -> Result<()> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.inner.current.send_if_modified(|current| {
            let before = current.clone();
            update(current);
            *current != before
        });

        let snapshot = self.read();
        self.inner.persistence.save(&snapshot).inspect_err(|err| {
            warn!(error = %err, "failed to persist credential");
        })
    }
}
