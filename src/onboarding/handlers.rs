use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::auth::handlers::is_valid_email;
use crate::error::ApiError;
use crate::onboarding::dto::{OnboardingRequest, OnboardingResponse};
use crate::onboarding::services::provision_tenant;
use crate::state::AppState;

pub fn onboarding_routes() -> Router<AppState> {
    Router::new().route("/onboarding", post(onboard))
}

fn is_valid_slug(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    }
    slug.len() >= 3 && SLUG_RE.is_match(slug)
}

fn validate(payload: &OnboardingRequest) -> Result<(), ApiError> {
    if payload.church_name.trim().is_empty() {
        return Err(ApiError::Validation("Church name must not be empty".into()));
    }
    if !is_valid_slug(&payload.slug) {
        return Err(ApiError::Validation(
            "Slug must be at least 3 lowercase URL-safe characters".into(),
        ));
    }
    if payload.admin_name.trim().is_empty() {
        return Err(ApiError::Validation("Admin name must not be empty".into()));
    }
    if !is_valid_email(&payload.admin_email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.admin_password.len() < 6 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn onboard(
    State(state): State<AppState>,
    Json(mut payload): Json<OnboardingRequest>,
) -> Result<(StatusCode, Json<OnboardingResponse>), ApiError> {
    payload.admin_email = payload.admin_email.trim().to_lowercase();
    payload.slug = payload.slug.trim().to_string();

    if let Err(e) = validate(&payload) {
        warn!(slug = %payload.slug, "onboarding rejected");
        return Err(e);
    }

    let (tenant, user) = provision_tenant(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(OnboardingResponse { tenant, user })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            church_name: "Igreja Batista Central".into(),
            slug: "batista-central".into(),
            admin_name: "João Silva".into(),
            admin_email: "joao@batistacentral.org".into(),
            admin_password: "s3nh4-forte".into(),
        }
    }

    #[test]
    fn slug_format() {
        assert!(is_valid_slug("batista-central"));
        assert!(is_valid_slug("igreja123"));
        assert!(!is_valid_slug("ab"));
        assert!(!is_valid_slug("Maiuscula"));
        assert!(!is_valid_slug("com espaço"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("under_score"));
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let mut req = request();
        req.admin_password = "12345".into();
        assert!(matches!(
            validate(&req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn rejects_bad_email() {
        let mut req = request();
        req.admin_email = "nope".into();
        assert!(matches!(
            validate(&req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn rejects_empty_church_name() {
        let mut req = request();
        req.church_name = "   ".into();
        assert!(matches!(
            validate(&req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
