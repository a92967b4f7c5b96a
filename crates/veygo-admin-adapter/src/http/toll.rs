/*
[INPUT]:  Current credential
[OUTPUT]: Toll transponder companies with renew outcome
[POS]:    HTTP layer - toll endpoints (require auth)
[UPDATE]: When toll endpoints change
*/

use crate::auth::Credential;
use crate::http::{Reply, Result, VeygoClient};
use crate::types::{TransponderCompaniesEnvelope, TransponderCompany};

impl VeygoClient {
    /// List toll transponder companies
    ///
    /// GET /api/v1/toll/get-company
    pub async fn get_toll_companies(
        &self,
        credential: &Credential,
    ) -> Result<Reply<Vec<TransponderCompany>>> {
        let reply: Reply<TransponderCompaniesEnvelope> =
            self.get_json("/api/v1/toll/get-company", credential).await?;
        Ok(reply.map(|envelope| envelope.transponder_companies))
    }
}
