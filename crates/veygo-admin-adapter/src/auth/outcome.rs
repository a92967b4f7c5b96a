/*
[INPUT]:  HTTP status codes and rotated `token` response headers
[OUTPUT]: Credential outcomes applied by the serial task queue
[POS]:    Auth layer - response classification contract
[UPDATE]: When the backend changes how it signals rotation or rejection
*/

use std::fmt;

use reqwest::StatusCode;

use crate::auth::credential::redacted;

/// Name of the response header carrying a rotated token.
pub const TOKEN_HEADER: &str = "token";

/// What a finished task observed about the session.
#[derive(Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A fresh credential was established.
    LoginSuccessful { user_id: i64, token: String },
    /// Session still valid; the server rotated the token. Empty means no rotation.
    RenewSuccessful { token: String },
    /// Session no longer valid; wipe the credential.
    ClearCredential,
    /// Nothing credential-affecting was observed.
    NoOp,
}

impl Outcome {
    pub fn renew(token: impl Into<String>) -> Self {
        Outcome::RenewSuccessful {
            token: token.into(),
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Outcome::ClearCredential)
    }

    /// Variant name, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::LoginSuccessful { .. } => "login_successful",
            Outcome::RenewSuccessful { .. } => "renew_successful",
            Outcome::ClearCredential => "clear_credential",
            Outcome::NoOp => "no_op",
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::LoginSuccessful { user_id, token } => f
                .debug_struct("LoginSuccessful")
                .field("user_id", user_id)
                .field("token", &redacted(token))
                .finish(),
            Outcome::RenewSuccessful { token } => f
                .debug_struct("RenewSuccessful")
                .field("token", &redacted(token))
                .finish(),
            Outcome::ClearCredential => f.write_str("ClearCredential"),
            Outcome::NoOp => f.write_str("NoOp"),
        }
    }
}

/// Map a server verdict to an [`Outcome`].
///
/// 401 and 403 invalidate the session. Any other status renews when a
/// non-empty rotated token came back, and is a no-op otherwise.
pub fn classify(status: StatusCode, rotated_token: Option<&str>) -> Outcome {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Outcome::ClearCredential;
    }
    match rotated_token.map(str::trim) {
        Some(token) if !token.is_empty() => Outcome::renew(token),
        _ => Outcome::NoOp,
    }
}
