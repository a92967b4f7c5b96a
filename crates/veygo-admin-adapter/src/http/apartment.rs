/*
[INPUT]:  Current credential and new-apartment payloads
[OUTPUT]: Apartments, taxes and add-apartment status with renew outcomes
[POS]:    HTTP layer - apartment and tax endpoints (require auth)
[UPDATE]: When apartment endpoints or payloads change
*/

// ### Apartment Endpoints

use reqwest::{Method, StatusCode};

use crate::auth::Credential;
use crate::http::{Reply, Result, VeygoClient, VeygoError};
use crate::types::{AddApartmentStatus, Apartment, ApartmentsEnvelope, NewApartment, Tax, TaxesEnvelope};

impl VeygoClient {
    /// List every apartment
    ///
    /// GET /api/v1/apartment/get-all-apartments
    pub async fn get_all_apartments(&self, credential: &Credential) -> Result<Reply<Vec<Apartment>>> {
        let reply: Reply<ApartmentsEnvelope> = self
            .get_json("/api/v1/apartment/get-all-apartments", credential)
            .await?;
        Ok(reply.map(|envelope| envelope.apartments))
    }

    /// List every tax
    ///
    /// GET /api/v1/apartment/get-taxes
    pub async fn get_taxes(&self, credential: &Credential) -> Result<Reply<Vec<Tax>>> {
        let reply: Reply<TaxesEnvelope> = self
            .get_json("/api/v1/apartment/get-taxes", credential)
            .await?;
        Ok(reply.map(|envelope| envelope.taxes))
    }

    /// Create an apartment
    ///
    /// POST /api/v1/apartment/add-apartment
    ///
    /// 201 means created, 406 means an apartment with the same identity
    /// already exists. Both still rotate the token.
    pub async fn add_apartment(
        &self,
        credential: &Credential,
        apartment: &NewApartment,
    ) -> Result<Reply<AddApartmentStatus>> {
        let builder = self
            .authed_request(Method::POST, "/api/v1/apartment/add-apartment", credential)?
            .json(apartment);
        let response = self.send(builder).await?;

        let status = match response.status() {
            StatusCode::CREATED => AddApartmentStatus::Created,
            StatusCode::NOT_ACCEPTABLE => AddApartmentStatus::AlreadyExists,
            status => return Err(VeygoError::from_status(status)),
        };
        Ok(Reply::new(status, response.outcome()))
    }
}
