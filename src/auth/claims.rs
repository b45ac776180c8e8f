use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds within their tenant. Stored as the `user_role`
/// Postgres enum and carried in the JWT as an uppercase string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Treasurer,
    Auditor,
}

/// JWT payload used for authentication.
///
/// `tenant_id` is optional on purpose: a structurally valid token minted
/// without a tenant claim still decodes, and the extractor rejects it with
/// a precise "tenant context missing" error instead of a generic parse
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user ID
    #[serde(rename = "tenantId")]
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub role: Role,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
