use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::categories::repo::CategoryType;
use crate::transactions::dto::{CreateTransactionRequest, UpdateTransactionRequest};

/// Transaction record in the database. `amount` is NUMERIC end to end;
/// no float ever touches a currency value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub date: Date,
    pub description: Option<String>,
    pub attachment_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

/// Flat join row of a transaction with its category; mapped into the
/// nested response shape by the dto layer and consumed directly by the
/// report aggregator.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionCategoryRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub date: Date,
    pub description: Option<String>,
    pub attachment_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub category_name: String,
    pub category_type: CategoryType,
}

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT t.id, t.tenant_id, t.category_id, t.amount, t.date, t.description,
           t.attachment_url, t.created_by, t.created_at,
           c.name AS category_name, c.type AS category_type
    FROM transactions t
    JOIN account_categories c ON c.id = t.category_id
"#;

impl Transaction {
    pub async fn list_with_category(
        db: &PgPool,
        tenant_id: Uuid,
    ) -> sqlx::Result<Vec<TransactionCategoryRow>> {
        sqlx::query_as::<_, TransactionCategoryRow>(&format!(
            "{SELECT_WITH_CATEGORY} WHERE t.tenant_id = $1 ORDER BY t.date DESC, t.created_at DESC"
        ))
        .bind(tenant_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_with_category(
        db: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> sqlx::Result<Option<TransactionCategoryRow>> {
        sqlx::query_as::<_, TransactionCategoryRow>(&format!(
            "{SELECT_WITH_CATEGORY} WHERE t.id = $1 AND t.tenant_id = $2"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(db)
        .await
    }

    /// Transactions whose date falls in `[start, end]`, newest first.
    pub async fn list_in_range(
        db: &PgPool,
        tenant_id: Uuid,
        start: Date,
        end: Date,
    ) -> sqlx::Result<Vec<TransactionCategoryRow>> {
        sqlx::query_as::<_, TransactionCategoryRow>(&format!(
            "{SELECT_WITH_CATEGORY}
             WHERE t.tenant_id = $1 AND t.date >= $2 AND t.date <= $3
             ORDER BY t.date DESC, t.created_at DESC"
        ))
        .bind(tenant_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
    }

    /// Tenant-scoped existence check used before update/delete.
    pub async fn find(db: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, tenant_id, category_id, amount, date, description,
                   attachment_url, created_by, created_at
            FROM transactions
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        tenant_id: Uuid,
        created_by: Uuid,
        req: &CreateTransactionRequest,
    ) -> sqlx::Result<Transaction> {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (tenant_id, category_id, amount, date, description, attachment_url, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tenant_id, category_id, amount, date, description,
                      attachment_url, created_by, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(req.category_id)
        .bind(req.amount)
        .bind(req.date)
        .bind(&req.description)
        .bind(&req.attachment_url)
        .bind(created_by)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored values.
    pub async fn update(
        db: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
        req: &UpdateTransactionRequest,
    ) -> sqlx::Result<Transaction> {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET category_id = COALESCE($3, category_id),
                amount = COALESCE($4, amount),
                date = COALESCE($5, date),
                description = COALESCE($6, description),
                attachment_url = COALESCE($7, attachment_url)
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, category_id, amount, date, description,
                      attachment_url, created_by, created_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(req.category_id)
        .bind(req.amount)
        .bind(req.date)
        .bind(&req.description)
        .bind(&req.attachment_url)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM transactions
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
