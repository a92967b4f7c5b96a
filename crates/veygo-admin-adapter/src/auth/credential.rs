/*
[INPUT]:  Session token and user id issued by the Veygo backend
[OUTPUT]: Credential snapshot and the `auth` header value
[POS]:    Auth layer - credential value type
[UPDATE]: When the auth header format changes
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the request header carrying the credential.
pub const AUTH_HEADER: &str = "auth";

/// Session credential shared by every authenticated request.
///
/// Either fully empty (`""`, `0`) or fully set. Use [`Credential::new`] to
/// build one; a half-set pair collapses to the unauthenticated state.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user_id: i64,
}

impl Credential {
    pub fn new(token: impl Into<String>, user_id: i64) -> Self {
        let token = token.into();
        if token.is_empty() || user_id <= 0 {
            return Self::unauthenticated();
        }
        Self { token, user_id }
    }

    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() && self.user_id > 0
    }

    /// Value for the `auth` header: `<token>$<userId>`.
    pub fn header_value(&self) -> String {
        format!("{}${}", self.token, self.user_id)
    }

    /// Collapse a mixed pair (e.g. loaded from a damaged file) to unauthenticated.
    pub(crate) fn normalized(self) -> Self {
        Self::new(self.token, self.user_id)
    }
}

// token stays out of logs and panic messages
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &redacted(&self.token))
            .field("user_id", &self.user_id)
            .finish()
    }
}

pub(crate) fn redacted(token: &str) -> &'static str {
    if token.is_empty() { "" } else { "<redacted>" }
}
