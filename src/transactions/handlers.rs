use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::audit::recorder::AuditAction;
use crate::auth::claims::Role;
use crate::auth::extractors::{CallerContext, ClientIp};
use crate::categories::repo::AccountCategory;
use crate::error::ApiError;
use crate::state::AppState;
use crate::transactions::dto::{
    CreateTransactionRequest, TransactionWithCategory, UpdateTransactionRequest,
};
use crate::transactions::repo::Transaction;

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/:id",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    ctx: CallerContext,
) -> Result<Json<Vec<TransactionWithCategory>>, ApiError> {
    let rows = Transaction::list_with_category(&state.db, ctx.tenant_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    ctx: CallerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionWithCategory>, ApiError> {
    let row = Transaction::find_with_category(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer])?;

    if payload.amount <= Decimal::ZERO {
        warn!(amount = %payload.amount, "non-positive amount");
        return Err(ApiError::Validation("Amount must be positive".into()));
    }

    // The category must exist within the caller's tenant; a category from
    // another tenant is indistinguishable from a missing one.
    AccountCategory::find(&state.db, ctx.tenant_id, payload.category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;

    let transaction =
        Transaction::create(&state.db, ctx.tenant_id, ctx.user_id, &payload).await?;

    info!(transaction_id = %transaction.id, tenant_id = %ctx.tenant_id, "transaction created");
    state.audit.record(
        &ctx,
        AuditAction::Create,
        "/transactions",
        serde_json::to_value(&payload).unwrap_or_else(|_| json!({})),
        ip,
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[instrument(skip(state, payload))]
pub async fn update_transaction(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer])?;

    if let Some(amount) = payload.amount {
        if amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Amount must be positive".into()));
        }
    }

    Transaction::find(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;

    // A changed category re-runs the tenant check.
    if let Some(category_id) = payload.category_id {
        AccountCategory::find(&state.db, ctx.tenant_id, category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;
    }

    let transaction = Transaction::update(&state.db, ctx.tenant_id, id, &payload).await?;

    info!(transaction_id = %id, tenant_id = %ctx.tenant_id, "transaction updated");
    state.audit.record(
        &ctx,
        AuditAction::Update,
        format!("/transactions/{id}"),
        serde_json::to_value(&payload).unwrap_or_else(|_| json!({})),
        ip,
    );
    Ok(Json(transaction))
}

#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    ctx: CallerContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer])?;

    let transaction = Transaction::find(&state.db, ctx.tenant_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;

    Transaction::delete(&state.db, ctx.tenant_id, id).await?;

    info!(transaction_id = %id, tenant_id = %ctx.tenant_id, "transaction deleted");
    state.audit.record(
        &ctx,
        AuditAction::Delete,
        format!("/transactions/{id}"),
        json!({}),
        ip,
    );
    Ok(Json(transaction))
}
