use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::auth::repo::User;
use crate::categories::repo::CategoryType;

/// Tenant (church) record. Created once at onboarding; immutable here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub plan: String,
    pub created_at: OffsetDateTime,
}

pub async fn slug_taken<'e>(ex: impl PgExecutor<'e>, slug: &str) -> sqlx::Result<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as(r#"SELECT id FROM tenants WHERE slug = $1"#)
        .bind(slug)
        .fetch_optional(ex)
        .await?;
    Ok(row.is_some())
}

pub async fn insert_tenant<'e>(
    ex: impl PgExecutor<'e>,
    name: &str,
    slug: &str,
) -> sqlx::Result<Tenant> {
    sqlx::query_as::<_, Tenant>(
        r#"
        INSERT INTO tenants (name, slug, plan)
        VALUES ($1, $2, 'FREE')
        RETURNING id, name, slug, plan, created_at
        "#,
    )
    .bind(name)
    .bind(slug)
    .fetch_one(ex)
    .await
}

pub async fn insert_user<'e>(
    ex: impl PgExecutor<'e>,
    tenant_id: Uuid,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (tenant_id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, tenant_id, name, email, password_hash, role, created_at
        "#,
    )
    .bind(tenant_id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(ex)
    .await
}

pub async fn insert_category<'e>(
    ex: impl PgExecutor<'e>,
    tenant_id: Uuid,
    name: &str,
    kind: CategoryType,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO account_categories (tenant_id, name, type)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(tenant_id)
    .bind(name)
    .bind(kind)
    .execute(ex)
    .await?;
    Ok(())
}
