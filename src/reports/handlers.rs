use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use tracing::{instrument, warn};

use crate::auth::claims::Role;
use crate::auth::extractors::CallerContext;
use crate::error::ApiError;
use crate::reports::dto::{Period, SummaryQuery, SummaryResponse};
use crate::reports::services::summarize;
use crate::state::AppState;
use crate::transactions::repo::Transaction;

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/reports/summary", get(summary))
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<Date>, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Date::parse(s, &format).map(Some).map_err(|_| {
            warn!(field, value = s, "invalid date");
            ApiError::Validation(format!("{field} must be an ISO date (YYYY-MM-DD)"))
        }),
    }
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    ctx: CallerContext,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    ctx.require_role(&[Role::Admin, Role::Treasurer, Role::Auditor])?;

    // Default window: the 30 days ending today.
    let end = parse_date(query.end_date.as_deref(), "endDate")?
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let start =
        parse_date(query.start_date.as_deref(), "startDate")?.unwrap_or(end - Duration::days(30));

    if start > end {
        return Err(ApiError::Validation(
            "startDate must not be after endDate".into(),
        ));
    }

    let rows = Transaction::list_in_range(&state.db, ctx.tenant_id, start, end).await?;
    let (totals, category_breakdown) = summarize(&rows);

    Ok(Json(SummaryResponse {
        period: Period { start, end },
        totals,
        category_breakdown,
        transactions: rows.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parse_date_accepts_iso() {
        let date = parse_date(Some("2025-03-09"), "startDate").unwrap().unwrap();
        assert_eq!(
            date,
            Date::from_calendar_date(2025, Month::March, 9).unwrap()
        );
    }

    #[test]
    fn parse_date_treats_empty_as_absent() {
        assert!(parse_date(Some(""), "startDate").unwrap().is_none());
        assert!(parse_date(Some("   "), "startDate").unwrap().is_none());
        assert!(parse_date(None, "startDate").unwrap().is_none());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date(Some("03/09/2025"), "endDate").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(parse_date(Some("2025-13-01"), "endDate").is_err());
    }
}
