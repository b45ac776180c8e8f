use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::audit::recorder::AuditAction;
use crate::auth::claims::Role;
use crate::auth::extractors::{CallerContext, ClientIp};
use crate::categories::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::categories::repo::AccountCategory;
use crate::error::{is_foreign_key_violation, ApiError};
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    ctx: CallerContext,
) -> Result<Json<Vec<AccountCategory>>, ApiError> {
    let categories = AccountCategory::list(&state.db, ctx.tenant_id).await?;
    Ok(Json(categories))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    ctx: CallerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountCategory>, ApiError> {
    let category = AccountCategory::find(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<AccountCategory>), ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer])?;

    if payload.name.trim().is_empty() {
        warn!("empty category name");
        return Err(ApiError::Validation("Name must not be empty".into()));
    }

    let category =
        AccountCategory::create(&state.db, ctx.tenant_id, payload.name.trim(), payload.kind)
            .await?;

    info!(category_id = %category.id, tenant_id = %ctx.tenant_id, "category created");
    state.audit.record(
        &ctx,
        AuditAction::Create,
        "/categories",
        serde_json::to_value(&payload).unwrap_or_else(|_| json!({})),
        ip,
    );
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<AccountCategory>, ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer])?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name must not be empty".into()));
        }
    }

    // Tenant-scoped existence check before mutating.
    AccountCategory::find(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;

    let category = AccountCategory::update(
        &state.db,
        ctx.tenant_id,
        id,
        payload.name.as_deref().map(str::trim),
        payload.kind,
    )
    .await?;

    info!(category_id = %id, tenant_id = %ctx.tenant_id, "category updated");
    state.audit.record(
        &ctx,
        AuditAction::Update,
        format!("/categories/{id}"),
        serde_json::to_value(&payload).unwrap_or_else(|_| json!({})),
        ip,
    );
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountCategory>, ApiError> {
    ctx.require_role(&[Role::Admin])?;

    let category = AccountCategory::find(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;

    AccountCategory::delete(&state.db, ctx.tenant_id, id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ApiError::Conflict("Category is referenced by transactions".into())
            } else {
                e.into()
            }
        })?;

    info!(category_id = %id, tenant_id = %ctx.tenant_id, "category deleted");
    state.audit.record(
        &ctx,
        AuditAction::Delete,
        format!("/categories/{id}"),
        json!({}),
        ip,
    );
    Ok(Json(category))
}
