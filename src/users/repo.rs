use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use crate::auth::claims::Role;

/// Flat row for the user listing: the user plus their most recent
/// transaction, when they have one.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithSampleRow {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub transaction_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

pub async fn list_with_sample(db: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<UserWithSampleRow>> {
    sqlx::query_as::<_, UserWithSampleRow>(
        r#"
        SELECT u.id, u.email, u.role,
               t.id AS transaction_id, t.amount, t.date, t.description
        FROM users u
        LEFT JOIN LATERAL (
            SELECT id, amount, date, description
            FROM transactions
            WHERE tenant_id = u.tenant_id AND created_by = u.id
            ORDER BY date DESC, created_at DESC
            LIMIT 1
        ) t ON true
        WHERE u.tenant_id = $1
        ORDER BY u.created_at ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(db)
    .await
}
