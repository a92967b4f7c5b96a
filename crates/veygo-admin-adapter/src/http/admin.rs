/*
[INPUT]:  Admin email/password and the current credential
[OUTPUT]: Admin profile with the login / renew / clear outcome
[POS]:    HTTP layer - session endpoints (login, validate, logout)
[UPDATE]: When session endpoints or their status codes change
*/

// ### Session Endpoints

use reqwest::{Method, StatusCode};

use crate::auth::{Credential, Outcome};
use crate::http::{Reply, Result, VeygoClient, VeygoError};
use crate::types::{AdminEnvelope, LoginRequest, PublishRenter};

impl VeygoClient {
    /// Log in with email and password
    ///
    /// POST /api/v1/admin/login
    ///
    /// A 401 here means wrong credentials, not an expired session, so it maps
    /// to [`VeygoError::InvalidLogin`] and leaves the stored credential alone.
    pub async fn login(&self, request: &LoginRequest) -> Result<Reply<PublishRenter>> {
        let builder = self
            .request(Method::POST, "/api/v1/admin/login")?
            .json(request);
        let response = self.send(builder).await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(VeygoError::InvalidLogin),
            status => return Err(VeygoError::from_status(status)),
        }

        let envelope: AdminEnvelope = response.json()?;
        let token = response.rotated_token().ok_or_else(|| {
            VeygoError::InvalidResponse("login response is missing the token header".to_string())
        })?;

        let outcome = Outcome::LoginSuccessful {
            user_id: envelope.admin.id,
            token: token.to_string(),
        };
        Ok(Reply::new(envelope.admin, outcome))
    }

    /// Validate the stored session and fetch the signed-in admin
    ///
    /// GET /api/v1/admin/retrieve
    pub async fn retrieve_admin(&self, credential: &Credential) -> Result<Reply<PublishRenter>> {
        let reply: Reply<AdminEnvelope> = self
            .get_json("/api/v1/admin/retrieve", credential)
            .await?;
        Ok(reply.map(|envelope| envelope.admin))
    }

    /// Revoke the current token server-side
    ///
    /// GET /api/v1/user/remove-token
    pub async fn remove_token(&self, credential: &Credential) -> Result<Reply<()>> {
        let builder = self.authed_request(Method::GET, "/api/v1/user/remove-token", credential)?;
        let response = self.send(builder).await?;
        response.ensure_success()?;
        Ok(Reply::new((), Outcome::ClearCredential))
    }
}
