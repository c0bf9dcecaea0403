//! HTTP surface: axum handlers over the ledger service.
//!
//! Handlers translate between the shared wire DTOs and the domain types,
//! and map the error taxonomy onto status codes: validation and selector
//! problems are 400s, storage failures 500s, and a delete of a missing id
//! is a plain 200 with `deleted = false`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use shared::{
    AddRecordRequest, CategoryTotalDto, DeleteRecordResponse, HighestExpenseDto, MonthlyTotalDto,
    PeriodSummaryDto, RecordDto, RecordListResponse, WeekdayTotalDto,
};

use crate::domain::models::{Record, RecordKind};
use crate::domain::{aggregation, AddRecord, LedgerError, LedgerService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerService,
}

impl AppState {
    pub fn new(ledger: LedgerService) -> Self {
        Self { ledger }
    }
}

/// Build the `/api` router.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/income", get(list_income).post(add_income))
        .route("/records/:kind/:id", delete(delete_record))
        .route("/stats/categories", get(category_stats))
        .route("/stats/monthly", get(monthly_stats))
        .route("/stats/summary", get(period_summary));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Query parameters for the record list endpoints.
#[derive(Deserialize, Debug)]
pub struct MonthQuery {
    /// `yyyy-mm` or `yyyy`; absent means all records.
    pub month: Option<String>,
}

impl MonthQuery {
    /// HTML month inputs submit an empty string when cleared; treat that
    /// the same as an absent parameter. Any other value parses strictly.
    fn selector(&self) -> Option<&str> {
        self.month.as_deref().filter(|m| !m.is_empty())
    }
}

/// Query parameters for the stats endpoints.
#[derive(Deserialize, Debug)]
pub struct StatsQuery {
    /// `expense` (default) or `income`.
    pub kind: Option<String>,
    pub month: Option<String>,
}

impl StatsQuery {
    fn kind(&self) -> Option<RecordKind> {
        match self.kind.as_deref() {
            Some(value) => RecordKind::parse(value),
            None => Some(RecordKind::Expense),
        }
    }

    fn selector(&self) -> Option<&str> {
        self.month.as_deref().filter(|m| !m.is_empty())
    }
}

/// Handler for `GET /api/expenses`.
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    info!("GET /api/expenses - query: {:?}", query);
    list_records(&state, RecordKind::Expense, query.selector()).await
}

/// Handler for `GET /api/income`.
pub async fn list_income(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    info!("GET /api/income - query: {:?}", query);
    list_records(&state, RecordKind::Income, query.selector()).await
}

async fn list_records(state: &AppState, kind: RecordKind, selector: Option<&str>) -> Response {
    match state.ledger.records_for_selector(kind, selector).await {
        Ok(mut records) => {
            // Newest first for display; storage order is unspecified.
            records.sort_by(|a, b| b.date.cmp(&a.date));
            let records = records.into_iter().map(to_dto).collect();
            (StatusCode::OK, Json(RecordListResponse { records })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Handler for `POST /api/expenses`.
pub async fn add_expense(
    State(state): State<AppState>,
    Json(request): Json<AddRecordRequest>,
) -> Response {
    info!("POST /api/expenses - request: {:?}", request);
    add_record(&state, RecordKind::Expense, request).await
}

/// Handler for `POST /api/income`.
pub async fn add_income(
    State(state): State<AppState>,
    Json(request): Json<AddRecordRequest>,
) -> Response {
    info!("POST /api/income - request: {:?}", request);
    add_record(&state, RecordKind::Income, request).await
}

async fn add_record(state: &AppState, kind: RecordKind, request: AddRecordRequest) -> Response {
    let command = AddRecord {
        description: request.description,
        amount: request.amount,
        date: request.date,
        category: request.category,
    };
    match state.ledger.add_record(kind, command).await {
        Ok(record) => (StatusCode::CREATED, Json(to_dto(record))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for `DELETE /api/records/:kind/:id`, the single delete path
/// for both collections.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    info!("DELETE /api/records/{}/{}", kind, id);

    let Some(kind) = RecordKind::parse(&kind) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown record kind '{kind}'"),
        )
            .into_response();
    };

    match state.ledger.delete_record(kind, &id).await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(DeleteRecordResponse { success: true, deleted }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for `GET /api/stats/categories`.
pub async fn category_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Response {
    info!("GET /api/stats/categories - query: {:?}", query);

    let Some(kind) = query.kind() else {
        return unknown_kind_response(&query);
    };

    match state.ledger.records_for_selector(kind, query.selector()).await {
        Ok(records) => {
            let totals: Vec<CategoryTotalDto> = aggregation::category_totals(&records)
                .into_iter()
                .map(|t| CategoryTotalDto {
                    category: t.category.as_str().to_string(),
                    label: t.category.info().label.to_string(),
                    total: t.total,
                    percentage: t.percentage,
                })
                .collect();
            (StatusCode::OK, Json(totals)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Handler for `GET /api/stats/monthly`.
pub async fn monthly_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Response {
    info!("GET /api/stats/monthly - query: {:?}", query);

    let Some(kind) = query.kind() else {
        return unknown_kind_response(&query);
    };

    match state.ledger.records_for_selector(kind, query.selector()).await {
        Ok(records) => {
            let series: Vec<MonthlyTotalDto> = aggregation::monthly_series(&records)
                .into_iter()
                .map(|m| MonthlyTotalDto { month: m.month, total: m.total })
                .collect();
            (StatusCode::OK, Json(series)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Handler for `GET /api/stats/summary`: balance plus spending patterns
/// for the selected period.
pub async fn period_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    info!("GET /api/stats/summary - query: {:?}", query);

    let expenses = match state
        .ledger
        .records_for_selector(RecordKind::Expense, query.selector())
        .await
    {
        Ok(records) => records,
        Err(e) => return error_response(e),
    };
    let income = match state
        .ledger
        .records_for_selector(RecordKind::Income, query.selector())
        .await
    {
        Ok(records) => records,
        Err(e) => return error_response(e),
    };

    let summary = aggregation::spending_summary(&expenses);
    let dto = PeriodSummaryDto {
        total_income: aggregation::total(&income),
        total_expenses: summary.total,
        balance: aggregation::balance(&income, &expenses),
        expense_count: summary.count,
        average_expense: summary.average,
        highest_expense: summary.highest.map(|h| HighestExpenseDto {
            description: h.description,
            amount: h.amount,
            date: h.date,
        }),
        busiest_weekday: summary.busiest_weekday.map(|w| WeekdayTotalDto {
            weekday: w.weekday.to_string(),
            total: w.total,
        }),
    };

    (StatusCode::OK, Json(dto)).into_response()
}

fn to_dto(record: Record) -> RecordDto {
    RecordDto {
        id: record.id,
        description: record.description,
        amount: record.amount,
        date: record.date,
        category: record.category.as_str().to_string(),
        created_at: record.created_at,
        kind: record.kind.as_str().to_string(),
    }
}

fn unknown_kind_response(query: &StatsQuery) -> Response {
    (
        StatusCode::BAD_REQUEST,
        format!("unknown record kind {:?}", query.kind),
    )
        .into_response()
}

fn error_response(e: LedgerError) -> Response {
    if e.is_client_error() {
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    } else {
        tracing::error!("ledger operation failed: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "storage failure").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    async fn setup_test_state() -> AppState {
        let db = DbConnection::init_test().await.expect("test database");
        AppState::new(LedgerService::new(db))
    }

    fn coffee_request() -> AddRecordRequest {
        AddRecordRequest {
            description: "Coffee".to_string(),
            amount: dec!(4.50),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            category: "food".to_string(),
        }
    }

    #[tokio::test]
    async fn add_expense_returns_created() {
        let state = setup_test_state().await;

        let response = add_expense(State(state), Json(coffee_request())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn add_expense_rejects_empty_description() {
        let state = setup_test_state().await;

        let mut request = coffee_request();
        request.description = String::new();

        let response = add_expense(State(state), Json(request)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_expenses_rejects_malformed_month() {
        let state = setup_test_state().await;

        let query = MonthQuery { month: Some("not-a-month".to_string()) };
        let response = list_expenses(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_expenses_treats_empty_month_as_no_filter() {
        let state = setup_test_state().await;

        let _ = add_expense(State(state.clone()), Json(coffee_request())).await;

        let query = MonthQuery { month: Some(String::new()) };
        let response = list_expenses(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_is_ok_even_when_record_is_missing() {
        let state = setup_test_state().await;

        let response = delete_record(
            State(state),
            Path(("expense".to_string(), "no-such-id".to_string())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_rejects_unknown_kind() {
        let state = setup_test_state().await;

        let response = delete_record(
            State(state),
            Path(("savings".to_string(), "some-id".to_string())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_endpoints_default_to_expenses() {
        let state = setup_test_state().await;
        let _ = add_expense(State(state.clone()), Json(coffee_request())).await;

        let query = StatsQuery { kind: None, month: Some("2024-03".to_string()) };
        let response = category_stats(State(state.clone()), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let query = StatsQuery { kind: Some("income".to_string()), month: None };
        let response = monthly_stats(State(state.clone()), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let query = StatsQuery { kind: Some("savings".to_string()), month: None };
        let response = category_stats(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_handles_an_empty_period() {
        let state = setup_test_state().await;

        let query = MonthQuery { month: Some("2024-03".to_string()) };
        let response = period_summary(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
