use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::categories::repo::CategoryType;
use crate::transactions::repo::TransactionCategoryRow;

// ISO date (`YYYY-MM-DD`) serde support for `time::Date`, per spec
// ("ISO parsing via `format_description`"). `iso_date::option` handles the
// optional field on the partial-update body.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Create body. Tenant id and author are taken from the caller context,
/// never from the body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub attachment_url: Option<String>,
}

/// Partial update body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub amount: Option<Decimal>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

/// Transaction joined with its category, as returned by list/get and the
/// report's raw transaction list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithCategory {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub description: Option<String>,
    pub attachment_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub category: CategoryRef,
}

impl From<TransactionCategoryRow> for TransactionWithCategory {
    fn from(row: TransactionCategoryRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            category_id: row.category_id,
            amount: row.amount,
            date: row.date,
            description: row.description,
            attachment_url: row.attachment_url,
            created_by: row.created_by,
            created_at: row.created_at,
            category: CategoryRef {
                id: row.category_id,
                name: row.category_name,
                kind: row.category_type,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_parses_iso_date_and_decimal_amount() {
        let body = r#"{
            "amount": "150.75",
            "date": "2025-03-09",
            "description": "Oferta de domingo",
            "categoryId": "4dc5f5a4-9df8-4f08-a67a-4f6f8a9b2a77"
        }"#;
        let parsed: CreateTransactionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.amount, "150.75".parse::<Decimal>().unwrap());
        assert_eq!(parsed.date.to_string(), "2025-03-09");
        assert!(parsed.attachment_url.is_none());
    }

    #[test]
    fn body_supplied_tenant_id_is_ignored() {
        let body = r#"{
            "amount": "10",
            "date": "2025-01-01",
            "categoryId": "4dc5f5a4-9df8-4f08-a67a-4f6f8a9b2a77",
            "tenantId": "11111111-1111-1111-1111-111111111111"
        }"#;
        let parsed: CreateTransactionRequest = serde_json::from_str(body).unwrap();
        let round = serde_json::to_value(&parsed).unwrap();
        assert!(round.get("tenantId").is_none());
    }

    #[test]
    fn row_maps_to_nested_category() {
        let row = TransactionCategoryRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount: Decimal::from(100),
            date: Date::from_calendar_date(2025, time::Month::March, 9).unwrap(),
            description: None,
            attachment_url: None,
            created_by: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            category_name: "Dízimos".into(),
            category_type: CategoryType::Income,
        };
        let dto = TransactionWithCategory::from(row.clone());
        assert_eq!(dto.category.id, row.category_id);
        assert_eq!(dto.category.name, "Dízimos");
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["category"]["type"], "INCOME");
    }
}
