use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// INCOME or EXPENSE, stored as the `category_type` Postgres enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "category_type", rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

/// Chart-of-accounts entry, scoped to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountCategory {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: CategoryType,
    pub created_at: OffsetDateTime,
}

impl AccountCategory {
    pub async fn list(db: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<AccountCategory>> {
        sqlx::query_as::<_, AccountCategory>(
            r#"
            SELECT id, tenant_id, name, type, created_at
            FROM account_categories
            WHERE tenant_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(db)
        .await
    }

    /// Tenant-scoped lookup: an id belonging to another tenant resolves to
    /// `None`, same as a nonexistent one.
    pub async fn find(
        db: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> sqlx::Result<Option<AccountCategory>> {
        sqlx::query_as::<_, AccountCategory>(
            r#"
            SELECT id, tenant_id, name, type, created_at
            FROM account_categories
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
        name: &str,
        kind: CategoryType,
    ) -> sqlx::Result<AccountCategory> {
        sqlx::query_as::<_, AccountCategory>(
            r#"
            INSERT INTO account_categories (tenant_id, name, type)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, type, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(kind)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored values.
    pub async fn update(
        db: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        kind: Option<CategoryType>,
    ) -> sqlx::Result<AccountCategory> {
        sqlx::query_as::<_, AccountCategory>(
            r#"
            UPDATE account_categories
            SET name = COALESCE($3, name),
                type = COALESCE($4, type)
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, name, type, created_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(name)
        .bind(kind)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM account_categories
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
