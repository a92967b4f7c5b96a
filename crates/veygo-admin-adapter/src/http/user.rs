/*
[INPUT]:  Current credential
[OUTPUT]: Renter accounts with renew outcome
[POS]:    HTTP layer - user endpoints (require auth)
[UPDATE]: When user endpoints change
*/

// ### User Endpoints

use crate::auth::Credential;
use crate::http::{Reply, Result, VeygoClient};
use crate::types::{PublishRenter, RentersEnvelope};

impl VeygoClient {
    /// List renter accounts
    ///
    /// GET /api/v1/user/get-users
    pub async fn get_users(&self, credential: &Credential) -> Result<Reply<Vec<PublishRenter>>> {
        let reply: Reply<RentersEnvelope> =
            self.get_json("/api/v1/user/get-users", credential).await?;
        Ok(reply.map(|envelope| envelope.renters))
    }
}
