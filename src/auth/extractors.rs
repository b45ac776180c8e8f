use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Authenticated caller identity, derived from a verified bearer token.
///
/// Every service and repo call takes its tenant id from here, never from
/// client-supplied input. Rejections: missing/invalid header and bad or
/// tenant-less tokens are 401; role checks are a separate 403 via
/// [`CallerContext::require_role`].
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CallerContext {
    /// Role gate applied by handlers that restrict who may call them.
    /// Handlers without a restriction skip this and accept any
    /// authenticated role.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            warn!(user_id = %self.user_id, role = ?self.role, "insufficient role");
            Err(ApiError::Forbidden("Insufficient role".into()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Authentication("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Authentication("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Authentication("Invalid or expired token".into())
        })?;

        let tenant_id = claims.tenant_id.ok_or_else(|| {
            warn!(user_id = %claims.sub, "token lacks tenant claim");
            ApiError::Authentication("Tenant context missing".into())
        })?;

        Ok(CallerContext {
            user_id: claims.sub,
            tenant_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Best-effort client address for the audit trail: first hop of
/// `x-forwarded-for` when present, otherwise the socket peer.
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let ip = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(ClientIp(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;
    use jsonwebtoken::{encode, Header};
    use time::OffsetDateTime;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/transactions");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = CallerContext::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = CallerContext::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let token = keys
            .sign(user_id, tenant_id, "t@c.org", Role::Treasurer)
            .unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let ctx = CallerContext::from_request_parts(&mut parts, &state)
            .await
            .expect("extract");
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.tenant_id, tenant_id);
        assert_eq!(ctx.role, Role::Treasurer);
    }

    #[tokio::test]
    async fn rejects_token_without_tenant_claim_for_any_role() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let now = OffsetDateTime::now_utc();

        for role in [Role::Admin, Role::Treasurer, Role::Auditor] {
            let claims = crate::auth::claims::Claims {
                sub: Uuid::new_v4(),
                tenant_id: None,
                email: "t@c.org".into(),
                role,
                iat: now.unix_timestamp() as usize,
                exp: (now + time::Duration::minutes(5)).unix_timestamp() as usize,
                iss: "test-issuer".into(),
                aud: "test-aud".into(),
            };
            let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
            let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
            let err = CallerContext::from_request_parts(&mut parts, &state)
                .await
                .unwrap_err();
            match err {
                ApiError::Authentication(msg) => assert_eq!(msg, "Tenant context missing"),
                other => panic!("expected authentication error, got {other:?}"),
            }
        }
    }

    #[test]
    fn require_role_allows_member_and_rejects_outsider() {
        let ctx = CallerContext {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "t@c.org".into(),
            role: Role::Auditor,
        };
        assert!(ctx.require_role(&[Role::Admin, Role::Auditor]).is_ok());
        let err = ctx
            .require_role(&[Role::Admin, Role::Treasurer])
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn client_ip_prefers_forwarded_header() {
        let (mut parts, _) = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(())
            .unwrap()
            .into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip.as_deref(), Some("203.0.113.9"));
    }

    #[tokio::test]
    async fn client_ip_absent_when_nothing_known() {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(ip.is_none());
    }
}
