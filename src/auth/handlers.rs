use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{AuthResponse, LoginRequest},
    jwt::JwtKeys,
    password::verify_password,
    repo::User,
};
use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let candidates = User::find_by_email(&state.db, &payload.email).await?;

    let mut matched = None;
    for user in candidates {
        if verify_password(&payload.password, &user.password_hash).map_err(ApiError::internal)? {
            matched = Some(user);
            break;
        }
    }

    let user = matched.ok_or_else(|| {
        warn!(email = %payload.email, "login failed");
        ApiError::Authentication("Invalid credentials".into())
    })?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign(user.id, user.tenant_id, &user.email, user.role)
        .map_err(ApiError::internal)?;

    info!(user_id = %user.id, tenant_id = %user.tenant_id, "user logged in");
    Ok(Json(AuthResponse { access_token, user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("tesoureiro@igreja.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(""));
    }
}
