/*
[INPUT]:  Raw reqwest responses
[OUTPUT]: Status, rotated token, JSON body and the credential outcome
[POS]:    HTTP layer - response inspection shared by every endpoint
[UPDATE]: When response headers or content checks change
*/

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::auth::{Outcome, TOKEN_HEADER, classify};
use crate::http::{Result, VeygoError};

/// Fully read response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: Option<String>,
    rotated_token: Option<String>,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) async fn read(response: Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers();
        let content_type = header_string(headers.get(CONTENT_TYPE));
        let rotated_token = header_string(headers.get(TOKEN_HEADER)).filter(|t| !t.is_empty());
        let body = response.bytes().await?.to_vec();

        Ok(Self {
            status,
            content_type,
            rotated_token,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn rotated_token(&self) -> Option<&str> {
        self.rotated_token.as_deref()
    }

    /// Credential outcome of this response.
    pub fn outcome(&self) -> Outcome {
        classify(self.status, self.rotated_token())
    }

    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|value| {
            value
                .split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        })
    }

    /// Error out unless the status is 2xx. Session rejections map to their own variants.
    pub fn ensure_success(&self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(VeygoError::from_status(self.status))
        }
    }

    /// Decode the body, which must be `application/json`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_json() {
            return Err(VeygoError::UnexpectedContentType(
                self.content_type.clone().unwrap_or_else(|| "N/A".to_string()),
            ));
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| VeygoError::InvalidResponse(format!("Failed to decode body: {e}")))
    }
}

fn header_string(value: Option<&reqwest::header::HeaderValue>) -> Option<String> {
    value
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}

/// Typed data plus the outcome the task should hand back to the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub outcome: Outcome,
}

impl<T> Reply<T> {
    pub fn new(data: T, outcome: Outcome) -> Self {
        Self { data, outcome }
    }

    pub fn into_parts(self) -> (T, Outcome) {
        (self.data, self.outcome)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            data: f(self.data),
            outcome: self.outcome,
        }
    }
}

/// Split a call result into the caller's result and the task's outcome.
///
/// This is the boundary where a task stops propagating errors: whatever went
/// wrong becomes an [`Outcome`].
pub fn settle<T>(result: Result<Reply<T>>) -> (Result<T>, Outcome) {
    match result {
        Ok(reply) => {
            let (data, outcome) = reply.into_parts();
            (Ok(data), outcome)
        }
        Err(err) => {
            let outcome = err.outcome();
            (Err(err), outcome)
        }
    }
}
