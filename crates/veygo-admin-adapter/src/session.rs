/*
[INPUT]:  Veygo client, serial task queue, admin credentials
[OUTPUT]: High-level admin operations returning typed results
[POS]:    Session layer - the entry point screens and the console talk to
[UPDATE]: When adding admin operations or changing profile caching
*/

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::auth::{Credential, CredentialStore};
use crate::http::{Reply, Result, VeygoClient, settle};
use crate::queue::SerialTaskQueue;
use crate::types::{
    AddApartmentStatus, Apartment, LoginRequest, NewApartment, PublishRenter, Tax,
    TransponderCompany,
};

type ProfileCache = Arc<Mutex<Option<PublishRenter>>>;

/// Admin session: every call goes through the serial queue.
#[derive(Debug, Clone)]
pub struct AdminSession {
    client: Arc<VeygoClient>,
    queue: SerialTaskQueue,
    admin: ProfileCache,
}

impl AdminSession {
    pub fn new(client: VeygoClient, store: CredentialStore) -> Self {
        Self {
            client: Arc::new(client),
            queue: SerialTaskQueue::new(store),
            admin: Arc::new(Mutex::new(None)),
        }
    }

    pub fn queue(&self) -> &SerialTaskQueue {
        &self.queue
    }

    pub fn credential(&self) -> Credential {
        self.queue.store().read()
    }

    /// Profile from the last successful login or validation.
    ///
    /// Only returned while the stored credential still belongs to that admin,
    /// whichever task cleared or replaced it.
    pub fn admin(&self) -> Option<PublishRenter> {
        let user_id = self.credential().user_id;
        lock(&self.admin)
            .clone()
            .filter(|admin| admin.id == user_id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<PublishRenter> {
        let request = LoginRequest::new(email, password);
        let admin = self
            .run_profile(move |client, _| async move { client.login(&request).await })
            .await?;
        info!(admin_id = admin.id, "admin logged in");
        Ok(admin)
    }

    /// Validate the stored credential and refresh the cached profile.
    pub async fn validate(&self) -> Result<PublishRenter> {
        self.run_profile(|client, credential| async move {
            client.retrieve_admin(&credential).await
        })
        .await
    }

    /// Revoke the token server-side; the local credential is cleared on success.
    pub async fn logout(&self) -> Result<()> {
        self.run(|client, credential| async move { client.remove_token(&credential).await })
            .await?;
        info!("admin logged out");
        Ok(())
    }

    pub async fn apartments(&self) -> Result<Vec<Apartment>> {
        self.run(|client, credential| async move { client.get_all_apartments(&credential).await })
            .await
    }

    pub async fn taxes(&self) -> Result<Vec<Tax>> {
        self.run(|client, credential| async move { client.get_taxes(&credential).await })
            .await
    }

    pub async fn add_apartment(&self, apartment: NewApartment) -> Result<AddApartmentStatus> {
        self.run(move |client, credential| async move {
            client.add_apartment(&credential, &apartment).await
        })
        .await
    }

    pub async fn toll_companies(&self) -> Result<Vec<TransponderCompany>> {
        self.run(|client, credential| async move { client.get_toll_companies(&credential).await })
            .await
    }

    pub async fn renters(&self) -> Result<Vec<PublishRenter>> {
        self.run(|client, credential| async move { client.get_users(&credential).await })
            .await
    }

    /// Queue one client call. A clearing outcome drops the cached profile
    /// before the next task runs.
    async fn run<T, F, Fut>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<VeygoClient>, Credential) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Reply<T>>> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let admin = Arc::clone(&self.admin);
        self.queue
            .call(move |credential| async move {
                let (result, outcome) = settle(call(client, credential).await);
                if outcome.is_clear() {
                    lock(&admin).take();
                }
                (result, outcome)
            })
            .await
    }

    /// Like [`Self::run`] for calls returning the admin profile, which is cached.
    async fn run_profile<F, Fut>(&self, call: F) -> Result<PublishRenter>
    where
        F: FnOnce(Arc<VeygoClient>, Credential) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Reply<PublishRenter>>> + Send + 'static,
    {
        let admin = Arc::clone(&self.admin);
        self.run(move |client, credential| async move {
            let reply = call(client, credential).await?;
            *lock(&admin) = Some(reply.data.clone());
            Ok(reply)
        })
        .await
    }
}

fn lock(cache: &ProfileCache) -> MutexGuard<'_, Option<PublishRenter>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
