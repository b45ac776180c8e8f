use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::users::repo::UserWithSampleRow;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSample {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: Date,
    pub description: Option<String>,
}

/// Listing entry: identity plus one recent transaction as a sample of the
/// user's activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub last_transaction: Option<TransactionSample>,
}

impl From<UserWithSampleRow> for UserListItem {
    fn from(row: UserWithSampleRow) -> Self {
        let last_transaction = match (row.transaction_id, row.amount, row.date) {
            (Some(id), Some(amount), Some(date)) => Some(TransactionSample {
                id,
                amount,
                date,
                description: row.description,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            last_transaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_without_transaction_maps_to_none() {
        let row = UserWithSampleRow {
            id: Uuid::new_v4(),
            email: "aud@igreja.org".into(),
            role: Role::Auditor,
            transaction_id: None,
            amount: None,
            date: None,
            description: None,
        };
        let item = UserListItem::from(row);
        assert!(item.last_transaction.is_none());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["lastTransaction"], serde_json::Value::Null);
    }

    #[test]
    fn row_with_transaction_maps_to_sample() {
        let tx_id = Uuid::new_v4();
        let row = UserWithSampleRow {
            id: Uuid::new_v4(),
            email: "tes@igreja.org".into(),
            role: Role::Treasurer,
            transaction_id: Some(tx_id),
            amount: Some(Decimal::from(250)),
            date: Some(Date::from_calendar_date(2025, time::Month::May, 4).unwrap()),
            description: Some("Oferta".into()),
        };
        let item = UserListItem::from(row);
        let sample = item.last_transaction.expect("sample");
        assert_eq!(sample.id, tx_id);
        assert_eq!(sample.amount, Decimal::from(250));
    }
}
