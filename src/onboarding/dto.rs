use serde::{Deserialize, Serialize};

use crate::auth::repo::User;
use crate::onboarding::repo::Tenant;

/// Public registration body for a new church.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub church_name: String,
    pub slug: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// Created tenant and admin; the user's password hash is skipped by serde.
#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub tenant: Tenant,
    pub user: User,
}
