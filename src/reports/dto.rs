use serde::{Deserialize, Serialize};
use time::Date;

use crate::reports::services::{CategorySlice, Totals};
use crate::transactions::dto::TransactionWithCategory;

/// Query string for the summary report. Dates arrive as raw strings so an
/// empty `?startDate=&endDate=` reads as "not provided" instead of a
/// deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Period {
    pub start: Date,
    pub end: Date,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub period: Period,
    pub totals: Totals,
    pub category_breakdown: Vec<CategorySlice>,
    /// Raw rows kept for client-side export.
    pub transactions: Vec<TransactionWithCategory>,
}
