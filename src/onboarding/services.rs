use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::claims::Role;
use crate::auth::password::hash_password;
use crate::auth::repo::User;
use crate::categories::repo::CategoryType;
use crate::error::{is_unique_violation, ApiError};
use crate::onboarding::dto::OnboardingRequest;
use crate::onboarding::repo::{self, Tenant};

/// Default chart of accounts seeded for every new tenant.
pub const DEFAULT_INCOME_CATEGORIES: [&str; 4] = ["Dízimos", "Ofertas", "Doações", "Eventos"];
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 7] = [
    "Aluguel",
    "Água",
    "Luz",
    "Manutenção",
    "Ação social",
    "Missionários",
    "Salários / prebendas",
];

/// Provision a tenant, its administrator, and the default chart of
/// accounts in one database transaction: concurrent readers never see a
/// tenant without its admin. The slug pre-check gives the friendly 409;
/// the UNIQUE constraint on `tenants.slug` closes the race when two
/// registrations collide.
pub async fn provision_tenant(
    db: &PgPool,
    req: &OnboardingRequest,
) -> Result<(Tenant, User), ApiError> {
    if repo::slug_taken(db, &req.slug).await? {
        warn!(slug = %req.slug, "slug already exists");
        return Err(ApiError::Conflict("Tenant slug already exists".into()));
    }

    let password_hash = hash_password(&req.admin_password).map_err(ApiError::internal)?;

    let mut tx = db.begin().await?;

    let tenant = repo::insert_tenant(&mut *tx, req.church_name.trim(), &req.slug)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Tenant slug already exists".into())
            } else {
                e.into()
            }
        })?;

    let user = repo::insert_user(
        &mut *tx,
        tenant.id,
        req.admin_name.trim(),
        &req.admin_email,
        &password_hash,
        Role::Admin,
    )
    .await?;

    for name in DEFAULT_INCOME_CATEGORIES {
        repo::insert_category(&mut *tx, tenant.id, name, CategoryType::Income).await?;
    }
    for name in DEFAULT_EXPENSE_CATEGORIES {
        repo::insert_category(&mut *tx, tenant.id, name, CategoryType::Expense).await?;
    }

    tx.commit().await?;

    info!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant provisioned");
    Ok((tenant, user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chart_has_eleven_categories() {
        assert_eq!(DEFAULT_INCOME_CATEGORIES.len(), 4);
        assert_eq!(DEFAULT_EXPENSE_CATEGORIES.len(), 7);
        assert_eq!(
            DEFAULT_INCOME_CATEGORIES.len() + DEFAULT_EXPENSE_CATEGORIES.len(),
            11
        );
    }

    #[test]
    fn default_chart_names_are_unique() {
        let mut all: Vec<&str> = DEFAULT_INCOME_CATEGORIES
            .iter()
            .chain(DEFAULT_EXPENSE_CATEGORIES.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 11);
    }
}
