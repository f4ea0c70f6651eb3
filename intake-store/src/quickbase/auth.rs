//! Temporary-token authorization.
//!
//! Every record operation is authorized by a short-lived token scoped to
//! one table, exchanged just-in-time via `GET /auth/temporary/{table}`.
//! Tokens are never persisted across operations.

use serde::Deserialize;

// Header names must be lowercase for static construction
pub const REALM_HEADER: &str = "qb-realm-hostname";
pub const APP_TOKEN_HEADER: &str = "qb-app-token";
pub const TEMP_TOKEN_SCHEME: &str = "QB-TEMP-TOKEN";

/// Response of the temporary-token exchange
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryAuthorization {
    pub temporary_authorization: String,
}
