use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::claims::Role;
use crate::auth::extractors::CallerContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::UserListItem;
use crate::users::repo;

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ctx: CallerContext,
) -> Result<Json<Vec<UserListItem>>, ApiError> {
    ctx.require_role(&[Role::Admin])?;
    let rows = repo::list_with_sample(&state.db, ctx.tenant_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
